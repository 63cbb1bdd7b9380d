//! Text-mode field rules over the whitespace tokens of one report line.

use std::sync::LazyLock;

use ecc_core::bank::is_canonical_bank;
use ecc_core::normalize_bank_name;
use ecc_core::shape::{is_account_number, is_branch_code, is_cheque_number, is_pay_account};
use regex::Regex;
use rust_decimal::Decimal;

use crate::observer::RowOutcome;

use super::{
    bare_amount, first_match, has_reason_keyword, is_alpha, separated_amount, BankInfo, FieldSet,
    Rule, BRANCH_NOISE,
};

/// Upper-case words that are never a pay bank.
const BANK_STOPLIST: &[&str] = &["ACCEPTED", "BANK", "ENDORSEMENT", "IRREGULAR", "FUND", "BFD", "PAY"];

/// Words that never belong to a reason collected from a line.
const LINE_REASON_STOPLIST: &[&str] = &["CLG", "BANK", "BFD", "PAY"];

/// Minimum token count of a cheque line.
pub const MIN_TOKENS: usize = 9;

/// A comma, or a decimal point with a digit on either side of it somewhere in the token.
static AMOUNT_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r",|[0-9].*\.|\..*[0-9]").expect("valid amount token regex"));

/// A comma touching a digit ends the reason walk.
static AMOUNT_BOUNDARY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9],|,[0-9]").expect("valid amount boundary regex"));

/// One tokenized line plus the following line, for bank names that wrap.
pub struct LineCtx<'a> {
    pub tokens: Vec<&'a str>,
    pub next_line: Option<&'a str>,
}

impl<'a> LineCtx<'a> {
    pub fn new(line: &'a str, next_line: Option<&'a str>) -> Self {
        Self {
            tokens: line.split_whitespace().collect(),
            next_line,
        }
    }
}

/// A token shaped like a cheque number.
pub fn is_cheque_token(token: &str) -> bool {
    is_cheque_number(token)
}

/// A token shaped like an amount: has a comma, or a decimal point next to digits.
pub fn is_amount_token(token: &str) -> bool {
    AMOUNT_TOKEN.is_match(token)
}

/// Whether a line looks like a cheque line at all.
pub fn is_cheque_line(ctx: &LineCtx) -> bool {
    ctx.tokens.iter().any(|t| is_cheque_token(t)) && ctx.tokens.iter().any(|t| is_amount_token(t))
}

/// Why a line is not a cheque line, or `None` when it should be read.
pub fn line_admission(ctx: &LineCtx) -> Option<RowOutcome> {
    if ctx.tokens.len() < MIN_TOKENS {
        return Some(RowOutcome::TooShort { width: ctx.tokens.len() });
    }
    if !is_cheque_line(ctx) {
        return Some(RowOutcome::NoChequeTokens);
    }
    None
}

/// Longest 12-17 digit token; the first one wins a tie.
fn account_longest(ctx: &LineCtx) -> Option<String> {
    let mut best: Option<&str> = None;
    for token in ctx.tokens.iter().filter(|t| is_account_number(t)) {
        match best {
            Some(b) if b.len() >= token.len() => {}
            _ => best = Some(*token),
        }
    }
    best.map(str::to_string)
}

fn cheque_first(ctx: &LineCtx) -> Option<String> {
    ctx.tokens
        .iter()
        .find(|t| is_cheque_token(t))
        .map(|t| t.to_string())
}

fn amount_last_separated(ctx: &LineCtx) -> Option<Decimal> {
    ctx.tokens.iter().rev().find_map(|t| separated_amount(t))
}

fn amount_last_bare(ctx: &LineCtx) -> Option<Decimal> {
    ctx.tokens.iter().rev().find_map(|t| bare_amount(t))
}

fn branch_first(ctx: &LineCtx) -> Option<String> {
    ctx.tokens
        .iter()
        .find(|t| is_branch_code(t) && **t != BRANCH_NOISE)
        .map(|t| t.to_string())
}

fn is_bank_token(token: &str) -> bool {
    is_alpha(token)
        && (2..=12).contains(&token.chars().count())
        && token.chars().all(char::is_uppercase)
        && !BANK_STOPLIST.contains(&token)
}

/// First upper-case word is the pay bank. A short one may continue with the upper-case
/// word that opens the next line.
/// The pay account, when present, is the token right after it.
fn bank_from_tokens(ctx: &LineCtx) -> Option<BankInfo> {
    let (index, token) = ctx
        .tokens
        .iter()
        .enumerate()
        .find(|(_, t)| is_bank_token(t))?;

    let mut name = token.to_string();
    if name.chars().count() < 6 {
        let continuation = ctx
            .next_line
            .and_then(|line| line.split_whitespace().next())
            .filter(|t| {
                is_alpha(t) && t.chars().count() <= 6 && t.chars().all(char::is_uppercase)
            });
        if let Some(rest) = continuation {
            let combined = format!("{}{}", name, rest);
            if is_canonical_bank(&combined) || combined.chars().count() >= 4 {
                name = combined;
            }
        }
    }

    let account = ctx
        .tokens
        .get(index + 1)
        .filter(|t| is_pay_account(t))
        .map(|t| t.to_string());

    Some(BankInfo {
        name: Some(normalize_bank_name(&name.to_uppercase())),
        account,
    })
}

/// Collect reason words walking back from the end of the line, stopping at the amount.
fn reason_from_tokens(ctx: &LineCtx) -> Option<String> {
    let mut words = Vec::new();
    for token in ctx.tokens.iter().rev() {
        if AMOUNT_BOUNDARY.is_match(token) {
            break;
        }
        let upper = token.to_uppercase();
        if has_reason_keyword(&upper) {
            words.push(upper);
        } else if token.chars().count() < 3 {
            continue;
        } else if is_alpha(token) && !LINE_REASON_STOPLIST.contains(&upper.as_str()) {
            words.push(upper);
        }
    }

    if words.is_empty() {
        return None;
    }
    words.reverse();
    Some(words.join(" "))
}

pub struct TokenRules;

impl TokenRules {
    pub fn account<'a>() -> [Rule<LineCtx<'a>, String>; 1] {
        [Rule { name: "account.longest-token", apply: account_longest }]
    }

    pub fn cheque_number<'a>() -> [Rule<LineCtx<'a>, String>; 1] {
        [Rule { name: "cheque.first-token", apply: cheque_first }]
    }

    pub fn amount<'a>() -> [Rule<LineCtx<'a>, Decimal>; 2] {
        [
            Rule { name: "amount.last-separated", apply: amount_last_separated },
            Rule { name: "amount.last-bare", apply: amount_last_bare },
        ]
    }

    pub fn branch_code<'a>() -> [Rule<LineCtx<'a>, String>; 1] {
        [Rule { name: "branch.first-token", apply: branch_first }]
    }

    pub fn bank<'a>() -> [Rule<LineCtx<'a>, BankInfo>; 1] {
        [Rule { name: "bank.upper-word", apply: bank_from_tokens }]
    }

    pub fn reason<'a>() -> [Rule<LineCtx<'a>, String>; 1] {
        [Rule { name: "reason.trailing-words", apply: reason_from_tokens }]
    }
}

/// Apply every field's rule table to one admitted line.
pub fn read_line(ctx: &LineCtx) -> FieldSet {
    FieldSet {
        bfd_account: first_match(&TokenRules::account(), ctx),
        cheque_number: first_match(&TokenRules::cheque_number(), ctx),
        cheque_amount: first_match(&TokenRules::amount(), ctx),
        bank: first_match(&TokenRules::bank(), ctx).unwrap_or_default(),
        branch_code: first_match(&TokenRules::branch_code(), ctx),
        reason: first_match(&TokenRules::reason(), ctx),
    }
}
