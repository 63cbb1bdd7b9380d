//! Single-field extractors.
//!
//! Every field is read by an ordered rule table: a positional rule for the nominal report
//! layout first, then scanning rules for rows whose columns have shifted. The first rule
//! that yields a value wins. Layout drift is absorbed by editing [`ColumnLayout`] or a
//! table, not the evaluation code.

pub mod cells;
pub mod tokens;

use std::str::FromStr;
use std::sync::LazyLock;

use ecc_core::{is_plausible_amount, ChequeRecord};
use regex::Regex;
use rust_decimal::Decimal;
use tracing::trace;

use crate::observer::RowOutcome;

/// Words that mark a disposition reason.
pub const REASON_KEYWORDS: &[&str] = &[
    "INSUFFICIENT",
    "SIGNATURE",
    "CLOSED",
    "STOP",
    "PAYMENT",
    "DRAWER",
    "IRREGULAR",
    "FUNDS",
    "REFER",
    "EXCEEDS",
    "AMOUNT",
    "WORDS",
    "FIGURES",
    "DIFFER",
    "POST",
    "DATED",
    "STALE",
    "MUTILATED",
    "CLEARING",
    "ENDORSEMENT",
    "ACCEPTED",
    "INVALID",
    "WRONG",
];

/// Column labels and fragments that are never a reason on their own.
pub const REASON_STOPLIST: &[&str] = &["CLG", "BANK", "ENDORSEMENT", "BFD", "PAY", "ACCOUNT"];

/// A report artifact code that looks like a branch code but is not one.
pub const BRANCH_NOISE: &str = "201";

/// Nominal column positions of the clearing report table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnLayout {
    pub cheque_number: usize,
    pub branch_code: usize,
    pub bfd_account: usize,
    pub pay_bank: usize,
    pub pay_account: usize,
    pub amount: usize,
    pub reason: usize,
    /// Rows narrower than this are not cheque rows.
    pub min_cells: usize,
}

impl Default for ColumnLayout {
    fn default() -> Self {
        Self {
            cheque_number: 6,
            branch_code: 7,
            bfd_account: 9,
            pay_bank: 11,
            pay_account: 12,
            amount: 13,
            reason: 13,
            min_cells: 9,
        }
    }
}

/// One entry of a rule table.
pub struct Rule<C, T> {
    pub name: &'static str,
    pub apply: fn(&C) -> Option<T>,
}

/// Evaluate `rules` in order; the first hit wins.
pub fn first_match<C, T>(rules: &[Rule<C, T>], ctx: &C) -> Option<T> {
    rules.iter().find_map(|rule| {
        let value = (rule.apply)(ctx);
        if value.is_some() {
            trace!(rule = rule.name, "field rule matched");
        }
        value
    })
}

/// Pay bank and pay account are located together.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BankInfo {
    pub name: Option<String>,
    pub account: Option<String>,
}

/// Raw field values of one row, before validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldSet {
    pub bfd_account: Option<String>,
    pub cheque_number: Option<String>,
    pub cheque_amount: Option<Decimal>,
    pub bank: BankInfo,
    pub branch_code: Option<String>,
    pub reason: Option<String>,
}

impl FieldSet {
    pub fn missing(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.bfd_account.is_none() {
            missing.push("bfd_account");
        }
        if self.cheque_amount.is_none() {
            missing.push("cheque_amount");
        }
        if self.cheque_number.is_none() {
            missing.push("cheque_number");
        }
        missing
    }

    /// Validate into a record, or explain why the row is dropped.
    pub fn into_record(self) -> Result<ChequeRecord, RowOutcome> {
        let (Some(account), Some(amount), Some(number)) =
            (&self.bfd_account, self.cheque_amount, &self.cheque_number)
        else {
            return Err(RowOutcome::Incomplete {
                missing: self.missing(),
            });
        };

        let record = ChequeRecord::new(account.as_str(), amount, number.as_str())
            .map_err(|e| RowOutcome::Invalid { reason: e.to_string() })?;

        Ok(record
            .with_pay_bank(self.bank.name.unwrap_or_default())
            .with_pay_account(self.bank.account.unwrap_or_default())
            .with_branch_code(self.branch_code.unwrap_or_default())
            .with_reason(self.reason.unwrap_or_default()))
    }
}

static ALPHA: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\p{Alphabetic}+$").expect("valid alpha regex"));

/// Digits mixed with thousands separators and decimal points, e.g. `50,000.00`.
static NUMERIC_TEXT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9,.]*[0-9][0-9,.]*$").expect("valid numeric regex"));

/// A thousands separator or a decimal point somewhere in the cell.
static AMOUNT_SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[,.]").expect("valid separator regex"));

/// Cell text that can be read as an amount once commas are dropped.
static AMOUNT_TEXT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-?[0-9,]*\.?[0-9]+$").expect("valid amount regex"));

static BARE_AMOUNT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{3,}$").expect("valid bare amount regex"));

pub fn is_alpha(s: &str) -> bool {
    ALPHA.is_match(s)
}

pub fn is_numeric_text(s: &str) -> bool {
    NUMERIC_TEXT.is_match(s)
}

pub fn has_amount_separator(s: &str) -> bool {
    AMOUNT_SEPARATOR.is_match(s)
}

/// Parse an amount cell after dropping thousands separators. Only plausible cheque
/// amounts are returned.
pub fn parse_amount(s: &str) -> Option<Decimal> {
    let s = s.trim();
    if !AMOUNT_TEXT.is_match(s) {
        return None;
    }
    Decimal::from_str(&s.replace(',', ""))
        .ok()
        .filter(|amount| is_plausible_amount(*amount))
}

/// An amount written with a separator: `12,500.00`, `980.50`.
pub fn separated_amount(s: &str) -> Option<Decimal> {
    if has_amount_separator(s) {
        parse_amount(s)
    } else {
        None
    }
}

/// An amount written as bare digits, at least three of them.
pub fn bare_amount(s: &str) -> Option<Decimal> {
    if BARE_AMOUNT.is_match(s) {
        parse_amount(s)
    } else {
        None
    }
}

/// Whether `s` contains any of the disposition keywords.
pub fn has_reason_keyword(upper: &str) -> bool {
    REASON_KEYWORDS.iter().any(|k| upper.contains(k))
}
