//! Cheque records recovered from a clearing report.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EccError, Result};
use crate::shape::{is_account_number, is_branch_code, is_cheque_number, is_pay_account};

/// Pay bank used when the report row does not name one.
pub const UNKNOWN_BANK: &str = "CLG";

/// Branch code used when the report row does not carry one.
pub const DEFAULT_BRANCH_CODE: &str = "255";

/// Exclusive upper bound for a plausible cheque amount.
pub const AMOUNT_CEILING: i64 = 100_000_000;

/// Outcome of clearing, derived from the free-text reason column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Disposition {
    Accepted,
    InsufficientFunds,
    Other,
    NoReason,
}

impl Disposition {
    /// Classify a reason string. `ACCEPTED` wins over the insufficient-funds markers.
    pub fn classify(reason: &str) -> Self {
        let reason = reason.trim().to_uppercase();
        if reason.contains("ACCEPTED") {
            Disposition::Accepted
        } else if reason.contains("INSUFFICIENT") || reason.contains("FUNDS") {
            Disposition::InsufficientFunds
        } else if !reason.is_empty() {
            Disposition::Other
        } else {
            Disposition::NoReason
        }
    }
}

/// One cheque line of the clearing report.
///
/// The three mandatory fields are validated in [`ChequeRecord::new`], so every value of
/// this type satisfies them; consumers never re-check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawChequeRecord")]
pub struct ChequeRecord {
    bfd_account: String,
    cheque_amount: Decimal,
    cheque_number: String,
    pay_bank_name: String,
    pay_account: String,
    branch_code: String,
    reason: String,
}

#[derive(Deserialize)]
struct RawChequeRecord {
    bfd_account: String,
    cheque_amount: Decimal,
    cheque_number: String,
    #[serde(default)]
    pay_bank_name: String,
    #[serde(default)]
    pay_account: String,
    #[serde(default)]
    branch_code: String,
    #[serde(default)]
    reason: String,
}

impl TryFrom<RawChequeRecord> for ChequeRecord {
    type Error = EccError;

    fn try_from(raw: RawChequeRecord) -> Result<Self> {
        Ok(ChequeRecord::new(raw.bfd_account, raw.cheque_amount, raw.cheque_number)?
            .with_pay_bank(raw.pay_bank_name)
            .with_pay_account(raw.pay_account)
            .with_branch_code(raw.branch_code)
            .with_reason(raw.reason))
    }
}

impl ChequeRecord {
    /// Build a record from its mandatory fields.
    ///
    /// - `bfd_account`: 12-17 digits
    /// - `cheque_amount`: strictly between 0 and 100,000,000
    /// - `cheque_number`: 6-10 digits
    pub fn new(
        bfd_account: impl Into<String>,
        cheque_amount: Decimal,
        cheque_number: impl Into<String>,
    ) -> Result<Self> {
        let bfd_account = bfd_account.into().trim().to_string();
        let cheque_number = cheque_number.into().trim().to_string();

        if !is_account_number(&bfd_account) {
            return Err(EccError::InvalidRecord(format!(
                "BFD account '{}' is not 12-17 digits",
                bfd_account
            )));
        }
        if !is_cheque_number(&cheque_number) {
            return Err(EccError::InvalidRecord(format!(
                "cheque number '{}' is not 6-10 digits",
                cheque_number
            )));
        }
        if !is_plausible_amount(cheque_amount) {
            return Err(EccError::InvalidRecord(format!(
                "cheque amount {} is outside (0, {})",
                cheque_amount, AMOUNT_CEILING
            )));
        }

        Ok(Self {
            bfd_account,
            cheque_amount,
            cheque_number,
            pay_bank_name: UNKNOWN_BANK.to_string(),
            pay_account: String::new(),
            branch_code: DEFAULT_BRANCH_CODE.to_string(),
            reason: String::new(),
        })
    }

    /// Pay bank; blank input keeps the `CLG` sentinel.
    pub fn with_pay_bank(mut self, name: impl Into<String>) -> Self {
        let name = name.into().trim().to_string();
        if !name.is_empty() {
            self.pay_bank_name = name;
        }
        self
    }

    /// Pay account; anything that is not 8+ digits leaves it empty.
    pub fn with_pay_account(mut self, account: impl Into<String>) -> Self {
        let account = account.into().trim().to_string();
        self.pay_account = if is_pay_account(&account) {
            account
        } else {
            String::new()
        };
        self
    }

    /// Branch code; anything that is not exactly 3 digits keeps the default.
    pub fn with_branch_code(mut self, code: impl Into<String>) -> Self {
        let code = code.into().trim().to_string();
        if is_branch_code(&code) {
            self.branch_code = code;
        }
        self
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = reason.into().trim().to_string();
        self
    }

    pub fn bfd_account(&self) -> &str {
        &self.bfd_account
    }

    pub fn cheque_amount(&self) -> Decimal {
        self.cheque_amount
    }

    pub fn cheque_number(&self) -> &str {
        &self.cheque_number
    }

    pub fn pay_bank_name(&self) -> &str {
        &self.pay_bank_name
    }

    pub fn pay_account(&self) -> &str {
        &self.pay_account
    }

    pub fn branch_code(&self) -> &str {
        &self.branch_code
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }

    pub fn disposition(&self) -> Disposition {
        Disposition::classify(&self.reason)
    }

    pub fn is_accepted(&self) -> bool {
        self.disposition() == Disposition::Accepted
    }

    /// Ledger branch of the originating account: its first three digits.
    pub fn account_branch(&self) -> &str {
        &self.bfd_account[..3]
    }

    /// Pay bank as written into ledger descriptions: upper-case, no spaces.
    pub fn ledger_bank(&self) -> String {
        self.pay_bank_name.to_uppercase().replace(' ', "")
    }
}

/// `0 < amount < 100,000,000`
pub fn is_plausible_amount(amount: Decimal) -> bool {
    amount > Decimal::ZERO && amount < Decimal::from(AMOUNT_CEILING)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn amount(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_record_defaults() {
        let r = ChequeRecord::new("98765432109876", amount("50000.00"), "1234567").unwrap();
        assert_eq!(r.pay_bank_name(), "CLG");
        assert_eq!(r.pay_account(), "");
        assert_eq!(r.branch_code(), "255");
        assert_eq!(r.reason(), "");
        assert_eq!(r.account_branch(), "987");
        assert_eq!(r.disposition(), Disposition::NoReason);
    }

    #[test]
    fn test_mandatory_fields_rejected() {
        assert!(ChequeRecord::new("12345", amount("10.00"), "1234567").is_err());
        assert!(ChequeRecord::new("98765432109876", amount("10.00"), "12345").is_err());
        assert!(ChequeRecord::new("98765432109876", Decimal::ZERO, "1234567").is_err());
        assert!(ChequeRecord::new("98765432109876", amount("100000000"), "1234567").is_err());
        assert!(ChequeRecord::new("98765432109876", amount("99999999.99"), "1234567").is_ok());
    }

    #[test]
    fn test_optional_fields_fall_back() {
        let r = ChequeRecord::new("98765432109876", amount("10"), "1234567")
            .unwrap()
            .with_pay_bank("  ")
            .with_pay_account("1234")
            .with_branch_code("25");
        assert_eq!(r.pay_bank_name(), "CLG");
        assert_eq!(r.pay_account(), "");
        assert_eq!(r.branch_code(), "255");
    }

    #[test]
    fn test_disposition_classification() {
        assert_eq!(Disposition::classify("accepted"), Disposition::Accepted);
        assert_eq!(Disposition::classify("INSUFFICIENT FUNDS"), Disposition::InsufficientFunds);
        assert_eq!(Disposition::classify("FUNDS ARRANGED"), Disposition::InsufficientFunds);
        assert_eq!(Disposition::classify("SIGNATURE DIFFERS"), Disposition::Other);
        assert_eq!(Disposition::classify("   "), Disposition::NoReason);
    }

    #[test]
    fn test_ledger_bank_strips_spaces() {
        let r = ChequeRecord::new("98765432109876", amount("10"), "1234567")
            .unwrap()
            .with_pay_bank("nic asia");
        assert_eq!(r.ledger_bank(), "NICASIA");
    }

    #[test]
    fn test_deserialize_enforces_invariants() {
        let ok = r#"{"bfd_account":"98765432109876","cheque_amount":"250.50","cheque_number":"1234567"}"#;
        let r: ChequeRecord = serde_json::from_str(ok).unwrap();
        assert_eq!(r.cheque_amount(), amount("250.50"));
        assert_eq!(r.pay_bank_name(), "CLG");

        let bad = r#"{"bfd_account":"123","cheque_amount":"250.50","cheque_number":"1234567"}"#;
        assert!(serde_json::from_str::<ChequeRecord>(bad).is_err());
    }
}
