use anyhow::{Context, Result};
use ecc_core::DEFAULT_BRANCH_CODE;
use ecc_finance::batch::{
    DEFAULT_CLEARING_ACCOUNT, DEFAULT_COMMISSION_ACCOUNT, DEFAULT_COMMISSION_AMOUNT,
    DEFAULT_COMMISSION_THRESHOLD,
};
use ecc_finance::{ClearingParams, CommissionParams};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::state::{ecc_home, ensure_ecc_home};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub clearing: ClearingSection,
    #[serde(default)]
    pub commission: CommissionSection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClearingSection {
    pub account: String,
    pub branch: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CommissionSection {
    pub account: String,
    pub amount: Decimal,
    /// Cheques strictly above this amount are charged.
    pub threshold: Decimal,
}

impl Default for ClearingSection {
    fn default() -> Self {
        Self {
            account: DEFAULT_CLEARING_ACCOUNT.to_string(),
            branch: DEFAULT_BRANCH_CODE.to_string(),
        }
    }
}

impl Default for CommissionSection {
    fn default() -> Self {
        Self {
            account: DEFAULT_COMMISSION_ACCOUNT.to_string(),
            amount: Decimal::from(DEFAULT_COMMISSION_AMOUNT),
            threshold: Decimal::from(DEFAULT_COMMISSION_THRESHOLD),
        }
    }
}

/// Command-line values that take precedence over the file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub clearing_account: Option<String>,
    pub branch: Option<String>,
    pub commission_account: Option<String>,
    pub commission_amount: Option<Decimal>,
    pub threshold: Option<Decimal>,
}

/// A blank value means "use the default".
fn pick(flag: Option<&str>, configured: &str, default: &str) -> String {
    [flag.unwrap_or(""), configured]
        .into_iter()
        .map(str::trim)
        .find(|v| !v.is_empty())
        .unwrap_or(default)
        .to_string()
}

impl Config {
    pub fn clearing_params(&self, overrides: &Overrides) -> ClearingParams {
        ClearingParams {
            account: pick(
                overrides.clearing_account.as_deref(),
                &self.clearing.account,
                DEFAULT_CLEARING_ACCOUNT,
            ),
            branch: pick(overrides.branch.as_deref(), &self.clearing.branch, DEFAULT_BRANCH_CODE),
        }
    }

    pub fn commission_params(&self, overrides: &Overrides) -> CommissionParams {
        CommissionParams {
            account: pick(
                overrides.commission_account.as_deref(),
                &self.commission.account,
                DEFAULT_COMMISSION_ACCOUNT,
            ),
            amount: overrides.commission_amount.unwrap_or(self.commission.amount),
            threshold: overrides.threshold.unwrap_or(self.commission.threshold),
            clearing_branch: self.clearing_params(overrides).branch,
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    Ok(ecc_home()?.join("config.toml"))
}

/// Load `explicit` if given (it must exist), else `~/.ecc/config.toml` if present, else defaults.
pub fn load_config(explicit: Option<&Path>) -> Result<Config> {
    let p = match explicit {
        Some(p) => p.to_path_buf(),
        None => {
            let p = config_path()?;
            if !p.exists() {
                return Ok(Config::default());
            }
            p
        }
    };
    let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    toml::from_str(&s).with_context(|| format!("parse {}", p.display()))
}

pub fn save_config(cfg: &Config) -> Result<PathBuf> {
    let p = ensure_ecc_home()?.join("config.toml");
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(&p, s).with_context(|| format!("write {}", p.display()))?;
    Ok(p)
}

pub fn init_config() -> Result<()> {
    let p = config_path()?;
    if p.exists() {
        println!("Config already exists: {}", p.display());
        return Ok(());
    }
    let p = save_config(&Config::default())?;
    println!("Wrote {}", p.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_file() {
        let cfg = Config::default();
        let clearing = cfg.clearing_params(&Overrides::default());
        assert_eq!(clearing, ClearingParams::default());
        let commission = cfg.commission_params(&Overrides::default());
        assert_eq!(commission, CommissionParams::default());
    }

    #[test]
    fn test_partial_file_and_blank_values() {
        let cfg: Config = toml::from_str(
            r#"
            [clearing]
            account = "  "
            branch = "318"
            "#,
        )
        .unwrap();
        let clearing = cfg.clearing_params(&Overrides::default());
        assert_eq!(clearing.account, "9313102000");
        assert_eq!(clearing.branch, "318");
        assert_eq!(cfg.commission.threshold, Decimal::from(200_000));
    }

    #[test]
    fn test_flags_override_file() {
        let cfg: Config = toml::from_str(
            r#"
            [commission]
            account = "1111111111"
            amount = "20"
            threshold = "100000"
            "#,
        )
        .unwrap();
        let overrides = Overrides {
            commission_amount: Some(Decimal::from(25)),
            branch: Some("401".to_string()),
            ..Overrides::default()
        };
        let params = cfg.commission_params(&overrides);
        assert_eq!(params.account, "1111111111");
        assert_eq!(params.amount, Decimal::from(25));
        assert_eq!(params.threshold, Decimal::from(100_000));
        assert_eq!(params.clearing_branch, "401");
    }
}
