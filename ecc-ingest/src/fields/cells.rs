//! Table-mode field rules over the cells of one report row.

use std::cmp::Reverse;

use ecc_core::normalize_bank_name;
use ecc_core::shape::{
    is_account_number, is_bank_code, is_branch_code, is_cheque_number, is_digits, is_pay_account,
};
use rust_decimal::Decimal;

use crate::observer::RowOutcome;

use super::{
    bare_amount, first_match, has_reason_keyword, is_alpha, is_numeric_text, separated_amount,
    BankInfo, ColumnLayout, FieldSet, Rule, BRANCH_NOISE, REASON_STOPLIST,
};

/// First-cell labels of header rows.
pub const HEADER_LABELS: &[&str] = &[
    "SESSION", "SN", "S.N", "S.N.", "SR", "NO", "SERIAL", "DATE", "SEQUENCE",
];

/// First-cell fragments of footer rows.
pub const FOOTER_MARKERS: &[&str] = &["TOTAL", "END OF REPORT"];

/// A table row with trimmed cells (missing cells are empty) and the layout to read it by.
pub struct RowCtx<'a> {
    pub cells: &'a [String],
    pub layout: &'a ColumnLayout,
}

impl RowCtx<'_> {
    fn cell(&self, index: usize) -> Option<&str> {
        self.cells
            .get(index)
            .map(String::as_str)
            .filter(|c| !c.is_empty())
    }

    fn non_empty(&self) -> impl Iterator<Item = (usize, &str)> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, c)| !c.is_empty())
            .map(|(i, c)| (i, c.as_str()))
    }
}

fn account_at_column(ctx: &RowCtx) -> Option<String> {
    ctx.cell(ctx.layout.bfd_account)
        .filter(|c| is_account_number(c))
        .map(str::to_string)
}

/// Longest 12-17 digit cell; ties go to the cell nearest the nominal column, then the leftmost.
fn account_scan(ctx: &RowCtx) -> Option<String> {
    let nominal = ctx.layout.bfd_account;
    ctx.non_empty()
        .filter(|(_, c)| is_account_number(c))
        .min_by_key(|(i, c)| (Reverse(c.len()), i.abs_diff(nominal), *i))
        .map(|(_, c)| c.to_string())
}

fn cheque_at_column(ctx: &RowCtx) -> Option<String> {
    ctx.cell(ctx.layout.cheque_number)
        .filter(|c| is_cheque_number(c))
        .map(str::to_string)
}

fn cheque_scan(ctx: &RowCtx) -> Option<String> {
    ctx.non_empty()
        .find(|(_, c)| is_cheque_number(c))
        .map(|(_, c)| c.to_string())
}

fn amount_at_column(ctx: &RowCtx) -> Option<Decimal> {
    ctx.cell(ctx.layout.amount).and_then(separated_amount)
}

fn amount_scan_separated(ctx: &RowCtx) -> Option<Decimal> {
    ctx.non_empty().find_map(|(_, c)| separated_amount(c))
}

fn amount_scan_bare(ctx: &RowCtx) -> Option<Decimal> {
    ctx.non_empty().find_map(|(_, c)| bare_amount(c))
}

fn branch_at_column(ctx: &RowCtx) -> Option<String> {
    ctx.cell(ctx.layout.branch_code)
        .filter(|c| is_branch_code(c))
        .map(str::to_string)
}

fn branch_scan(ctx: &RowCtx) -> Option<String> {
    ctx.non_empty()
        .find(|(_, c)| is_branch_code(c) && *c != BRANCH_NOISE)
        .map(|(_, c)| c.to_string())
}

/// Bank names wrap inside their cell; the pieces are joined back together.
fn bank_cell_name(cell: &str) -> String {
    let joined: String = if cell.contains('\n') {
        cell.lines().map(str::trim).collect()
    } else {
        cell.to_string()
    };
    normalize_bank_name(&joined.trim().to_uppercase())
}

fn pay_account_cell(cell: Option<&str>) -> Option<String> {
    cell.filter(|c| is_pay_account(c))
        .map(str::to_string)
}

fn bank_at_columns(ctx: &RowCtx) -> Option<BankInfo> {
    let name = ctx
        .cell(ctx.layout.pay_bank)
        .filter(|c| c.contains('\n') || !is_digits(c))
        .map(bank_cell_name)?;
    Some(BankInfo {
        name: Some(name),
        account: pay_account_cell(ctx.cell(ctx.layout.pay_account)),
    })
}

/// A 3-4 digit cell (bank code) followed by the bank name and, optionally, the pay account.
/// The pay account falls back to its nominal column when the cell after the name is not one.
fn bank_scan(ctx: &RowCtx) -> Option<BankInfo> {
    let width = ctx.cells.len();
    ctx.non_empty().find_map(|(i, c)| {
        if !is_bank_code(c) || i + 2 >= width {
            return None;
        }
        let next = ctx.cell(i + 1)?;
        if !(is_alpha(next) || next.contains('\n')) {
            return None;
        }
        Some(BankInfo {
            name: Some(bank_cell_name(next)),
            account: pay_account_cell(ctx.cell(i + 2))
                .or_else(|| pay_account_cell(ctx.cell(ctx.layout.pay_account))),
        })
    })
}

fn pay_account_only(ctx: &RowCtx) -> Option<BankInfo> {
    pay_account_cell(ctx.cell(ctx.layout.pay_account)).map(|account| BankInfo {
        name: None,
        account: Some(account),
    })
}

fn reason_at_column(ctx: &RowCtx) -> Option<String> {
    ctx.cell(ctx.layout.reason)
        .map(str::to_uppercase)
        .filter(|c| c.chars().count() >= 3 && !is_numeric_text(c))
}

/// Walk from the end of the row: the first keyword cell, or failing that the first
/// multi-word alphabetic cell.
fn reason_scan(ctx: &RowCtx) -> Option<String> {
    ctx.cells.iter().rev().find_map(|cell| {
        let upper = cell.trim().to_uppercase();
        if upper.is_empty() || is_numeric_text(&upper) || upper.chars().count() < 3 {
            return None;
        }
        if REASON_STOPLIST.contains(&upper.as_str()) {
            return None;
        }
        if has_reason_keyword(&upper)
            || (upper.contains(' ') && upper.chars().any(char::is_alphabetic))
        {
            return Some(upper);
        }
        None
    })
}

/// Rule tables, in priority order.
pub struct CellRules;

impl CellRules {
    pub fn account<'a>() -> [Rule<RowCtx<'a>, String>; 2] {
        [
            Rule { name: "account.column", apply: account_at_column },
            Rule { name: "account.scan", apply: account_scan },
        ]
    }

    pub fn cheque_number<'a>() -> [Rule<RowCtx<'a>, String>; 2] {
        [
            Rule { name: "cheque.column", apply: cheque_at_column },
            Rule { name: "cheque.scan", apply: cheque_scan },
        ]
    }

    pub fn amount<'a>() -> [Rule<RowCtx<'a>, Decimal>; 3] {
        [
            Rule { name: "amount.column", apply: amount_at_column },
            Rule { name: "amount.scan-separated", apply: amount_scan_separated },
            Rule { name: "amount.scan-bare", apply: amount_scan_bare },
        ]
    }

    pub fn branch_code<'a>() -> [Rule<RowCtx<'a>, String>; 2] {
        [
            Rule { name: "branch.column", apply: branch_at_column },
            Rule { name: "branch.scan", apply: branch_scan },
        ]
    }

    pub fn bank<'a>() -> [Rule<RowCtx<'a>, BankInfo>; 3] {
        [
            Rule { name: "bank.columns", apply: bank_at_columns },
            Rule { name: "bank.scan", apply: bank_scan },
            Rule { name: "bank.account-only", apply: pay_account_only },
        ]
    }

    pub fn reason<'a>() -> [Rule<RowCtx<'a>, String>; 2] {
        [
            Rule { name: "reason.column", apply: reason_at_column },
            Rule { name: "reason.scan", apply: reason_scan },
        ]
    }
}

/// Why a row is not a cheque row, if it is not.
pub fn admission(cells: &[String], layout: &ColumnLayout) -> Option<RowOutcome> {
    if cells.len() < layout.min_cells {
        return Some(RowOutcome::TooShort { width: cells.len() });
    }
    let first = cells.first().map(|c| c.trim().to_uppercase()).unwrap_or_default();
    if HEADER_LABELS.contains(&first.as_str()) {
        return Some(RowOutcome::Header);
    }
    if FOOTER_MARKERS.iter().any(|m| first.contains(m)) {
        return Some(RowOutcome::Footer);
    }
    None
}

/// Apply every field's rule table to one admitted row.
pub fn read_row(cells: &[String], layout: &ColumnLayout) -> FieldSet {
    let ctx = RowCtx { cells, layout };
    FieldSet {
        bfd_account: first_match(&CellRules::account(), &ctx),
        cheque_number: first_match(&CellRules::cheque_number(), &ctx),
        cheque_amount: first_match(&CellRules::amount(), &ctx),
        bank: first_match(&CellRules::bank(), &ctx).unwrap_or_default(),
        branch_code: first_match(&CellRules::branch_code(), &ctx),
        reason: first_match(&CellRules::reason(), &ctx),
    }
}

/// Trim decoder cells; absent cells become empty strings.
pub fn normalize_cells(row: &[Option<String>]) -> Vec<String> {
    row.iter()
        .map(|c| c.as_deref().unwrap_or("").trim().to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::row_from;

    fn cells(raw: &[&str]) -> Vec<String> {
        normalize_cells(&row_from(raw))
    }

    fn scenario_row() -> Vec<String> {
        cells(&[
            "1", "", "", "", "", "", "1234567", "255", "", "98765432109876", "", "CITIZE",
            "12345678", "50,000.00", "INSUFFICIENT FUNDS",
        ])
    }

    #[test]
    fn test_read_nominal_row() {
        let layout = ColumnLayout::default();
        let fields = read_row(&scenario_row(), &layout);

        assert_eq!(fields.bfd_account.as_deref(), Some("98765432109876"));
        assert_eq!(fields.cheque_number.as_deref(), Some("1234567"));
        assert_eq!(fields.branch_code.as_deref(), Some("255"));
        assert_eq!(fields.bank.name.as_deref(), Some("CITIZENS"));
        assert_eq!(fields.bank.account.as_deref(), Some("12345678"));
        assert_eq!(fields.cheque_amount, Some(Decimal::from(50_000)));
        assert_eq!(fields.reason.as_deref(), Some("INSUFFICIENT FUNDS"));
    }

    #[test]
    fn test_shifted_row_uses_scans() {
        // Two columns dropped before the cheque number: nothing sits where the layout expects it.
        let row = cells(&[
            "7", "", "", "", "1234567", "", "", "98765432109876", "", "0401", "SIDDH",
            "22334455", "", "", "1,200.00", "SIGNATURE DIFFERS",
        ]);
        let fields = read_row(&row, &ColumnLayout::default());

        assert_eq!(fields.bfd_account.as_deref(), Some("98765432109876"));
        assert_eq!(fields.cheque_number.as_deref(), Some("1234567"));
        assert_eq!(fields.cheque_amount, Some(Decimal::from(1200)));
        assert_eq!(fields.bank.name.as_deref(), Some("SIDDHARTHA"));
        assert_eq!(fields.bank.account.as_deref(), Some("22334455"));
        assert_eq!(fields.reason.as_deref(), Some("SIGNATURE DIFFERS"));
    }

    #[test]
    fn test_account_scan_prefers_longest_then_nearest() {
        let layout = ColumnLayout::default();
        let row = cells(&[
            "1", "111111111111", "", "", "", "", "", "", "", "", "222222222222", "33333333333333",
        ]);
        let ctx = RowCtx { cells: &row, layout: &layout };
        assert_eq!(account_scan(&ctx).as_deref(), Some("33333333333333"));

        let row = cells(&["1", "111111111111", "", "", "", "", "", "", "", "", "222222222222"]);
        let ctx = RowCtx { cells: &row, layout: &layout };
        assert_eq!(account_scan(&ctx).as_deref(), Some("222222222222"));
    }

    #[test]
    fn test_branch_scan_skips_noise_code() {
        let layout = ColumnLayout::default();
        let row = cells(&["1", "201", "", "", "", "", "", "", "", "", "318"]);
        let ctx = RowCtx { cells: &row, layout: &layout };
        assert_eq!(branch_scan(&ctx).as_deref(), Some("318"));
    }

    #[test]
    fn test_wrapped_bank_cell_is_joined() {
        let layout = ColumnLayout::default();
        let mut row = scenario_row();
        row[11] = "MACH\nAPUCHARE".to_string();
        let ctx = RowCtx { cells: &row, layout: &layout };
        assert_eq!(
            bank_at_columns(&ctx).and_then(|b| b.name).as_deref(),
            Some("MACHAPUCHARE")
        );
    }

    #[test]
    fn test_amount_column_needs_separator() {
        let layout = ColumnLayout::default();
        let mut row = scenario_row();
        row[13] = "50000".to_string();
        let ctx = RowCtx { cells: &row, layout: &layout };
        assert_eq!(amount_at_column(&ctx), None);
        // the bare-digit scan picks up the first plausible number instead
        assert!(first_match(&CellRules::amount(), &ctx).is_some());
    }

    #[test]
    fn test_reason_scan_skips_stoplist_and_numbers() {
        let layout = ColumnLayout::default();
        let row = cells(&[
            "1", "", "", "", "", "", "1234567", "255", "", "98765432109876", "", "NABIL",
            "12345678", "", "ACCEPTED", "BANK", "12.00",
        ]);
        let ctx = RowCtx { cells: &row, layout: &layout };
        assert_eq!(reason_scan(&ctx).as_deref(), Some("ACCEPTED"));
    }

    #[test]
    fn test_admission_rules() {
        let layout = ColumnLayout::default();
        assert_eq!(
            admission(&cells(&["1", "2", "3"]), &layout),
            Some(RowOutcome::TooShort { width: 3 })
        );
        let header = cells(&["S.N.", "a", "b", "c", "d", "e", "f", "g", "h"]);
        assert_eq!(admission(&header, &layout), Some(RowOutcome::Header));
        let footer = cells(&["Grand Total", "a", "b", "c", "d", "e", "f", "g", "h"]);
        assert_eq!(admission(&footer, &layout), Some(RowOutcome::Footer));
        let end = cells(&["*** End of Report ***", "", "", "", "", "", "", "", ""]);
        assert_eq!(admission(&end, &layout), Some(RowOutcome::Footer));
        assert_eq!(admission(&scenario_row(), &layout), None);
    }

    #[test]
    fn test_bank_scan_falls_back_to_pay_account_column() {
        let layout = ColumnLayout::default();
        let row = cells(&[
            "1", "", "", "0401", "NABIL", "", "1234567", "255", "", "98765432109876", "", "",
            "12345678", "2,000.00",
        ]);
        let ctx = RowCtx { cells: &row, layout: &layout };
        assert!(bank_at_columns(&ctx).is_none());
        let bank = bank_scan(&ctx).unwrap();
        assert_eq!(bank.name.as_deref(), Some("NABIL"));
        assert_eq!(bank.account.as_deref(), Some("12345678"));
    }

    #[test]
    fn test_bank_scan_joins_wrapped_name() {
        let layout = ColumnLayout::default();
        let row = cells(&[
            "1", "", "", "0401", "MACH\nAPUCHARE", "22334455", "1234567", "255", "",
            "98765432109876", "", "", "", "2,000.00",
        ]);
        let fields = read_row(&row, &layout);
        assert_eq!(fields.bank.name.as_deref(), Some("MACHAPUCHARE"));
        assert_eq!(fields.bank.account.as_deref(), Some("22334455"));
    }

    #[test]
    fn test_reason_scan_takes_multi_word_text_without_keyword() {
        let layout = ColumnLayout::default();
        let row = cells(&[
            "1", "", "", "", "", "", "1234567", "255", "", "98765432109876", "", "NABIL",
            "12345678", "2,000.00", "", "Kindly contact drawee", "CLG",
        ]);
        let ctx = RowCtx { cells: &row, layout: &layout };
        assert_eq!(reason_scan(&ctx).as_deref(), Some("KINDLY CONTACT DRAWEE"));
        assert_eq!(read_row(&row, &layout).reason.as_deref(), Some("KINDLY CONTACT DRAWEE"));
    }
}
