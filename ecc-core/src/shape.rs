//! Shapes of the numeric tokens a clearing report is made of.
//!
//! ASCII digits only; report text never carries other numerals.

use std::sync::LazyLock;

use regex::Regex;

static DIGITS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+$").expect("valid digits regex"));

/// BFD (depositor) account number.
static ACCOUNT_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{12,17}$").expect("valid account regex"));

static CHEQUE_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{6,10}$").expect("valid cheque regex"));

static BRANCH_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{3}$").expect("valid branch regex"));

/// Clearing code printed just before the pay bank name.
static BANK_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{3,4}$").expect("valid bank code regex"));

static PAY_ACCOUNT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{8,}$").expect("valid pay account regex"));

pub fn is_digits(s: &str) -> bool {
    DIGITS.is_match(s)
}

pub fn is_account_number(s: &str) -> bool {
    ACCOUNT_NUMBER.is_match(s)
}

pub fn is_cheque_number(s: &str) -> bool {
    CHEQUE_NUMBER.is_match(s)
}

pub fn is_branch_code(s: &str) -> bool {
    BRANCH_CODE.is_match(s)
}

pub fn is_bank_code(s: &str) -> bool {
    BANK_CODE.is_match(s)
}

pub fn is_pay_account(s: &str) -> bool {
    PAY_ACCOUNT.is_match(s)
}
