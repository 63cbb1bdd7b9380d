//! Ledger rows and batches for the core-banking batch import.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Column header of a batch file.
pub const LEDGER_HEADER: [&str; 7] = [
    "BRANCHCODE",
    "MAINCODE",
    "TRANCODE",
    "AMOUNT",
    "LCYAMOUNT",
    "DESC1",
    "DESC2",
];

/// Fixed transaction codes of the batch import.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TranCode {
    /// `055`: entry against the originating (customer) account
    #[serde(rename = "055")]
    Debit,
    /// `555`: entry against the clearing or commission account
    #[serde(rename = "555")]
    Credit,
}

impl TranCode {
    pub fn as_str(self) -> &'static str {
        match self {
            TranCode::Debit => "055",
            TranCode::Credit => "555",
        }
    }

    /// Parse a transaction code cell.
    ///
    /// Spreadsheets tend to coerce `055` into `55` or `55.0`, so numeric forms are
    /// accepted as long as they denote the same integer.
    pub fn parse(cell: &str) -> Option<Self> {
        let cell = cell.trim();
        match cell {
            "055" => return Some(TranCode::Debit),
            "555" => return Some(TranCode::Credit),
            _ => {}
        }

        let integral = cell
            .strip_suffix(".0")
            .or_else(|| cell.strip_suffix(".00"))
            .unwrap_or(cell);
        match integral.parse::<u32>().ok()? {
            55 => Some(TranCode::Debit),
            555 => Some(TranCode::Credit),
            _ => None,
        }
    }
}

impl fmt::Display for TranCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One positional row of a batch file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerRow {
    pub branch_code: String,
    pub main_code: String,
    pub tran_code: TranCode,
    pub amount: Decimal,
    /// Local-currency amount; always equal to `amount` here.
    pub lcy_amount: Decimal,
    pub desc1: String,
    pub desc2: String,
}

impl LedgerRow {
    pub fn new(
        branch_code: impl Into<String>,
        main_code: impl Into<String>,
        tran_code: TranCode,
        amount: Decimal,
        desc1: impl Into<String>,
        desc2: impl Into<String>,
    ) -> Self {
        Self {
            branch_code: branch_code.into(),
            main_code: main_code.into(),
            tran_code,
            amount,
            lcy_amount: amount,
            desc1: desc1.into(),
            desc2: desc2.into(),
        }
    }

    /// Cheque number carried by a debit row: the last whitespace token of DESC2.
    pub fn cheque_reference(&self) -> Option<&str> {
        self.desc2.split_whitespace().last()
    }

    /// The seven cells in file order, amounts rendered with 2 decimals.
    pub fn to_cells(&self) -> [String; 7] {
        [
            self.branch_code.clone(),
            self.main_code.clone(),
            self.tran_code.as_str().to_string(),
            format!("{:.2}", self.amount),
            format!("{:.2}", self.lcy_amount),
            self.desc1.clone(),
            self.desc2.clone(),
        ]
    }
}

/// Which generator (or reconciliation) produced a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BatchKind {
    Full,
    Accepted,
    Commission,
    Reconciled,
}

impl BatchKind {
    /// File name the batch is conventionally delivered under.
    pub fn file_stem(self) -> &'static str {
        match self {
            BatchKind::Full => "ecc_batch",
            BatchKind::Accepted => "ecc_batch_accepted",
            BatchKind::Commission => "comm_batch",
            BatchKind::Reconciled => "final_batch",
        }
    }
}

impl fmt::Display for BatchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BatchKind::Full => "full",
            BatchKind::Accepted => "accepted",
            BatchKind::Commission => "commission",
            BatchKind::Reconciled => "reconciled",
        };
        f.write_str(s)
    }
}

/// Ordered ledger rows: a debit block followed by an equally long credit block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerBatch {
    pub kind: BatchKind,
    /// Header row; `None` for headerless imports.
    pub header: Option<Vec<String>>,
    pub rows: Vec<LedgerRow>,
}

impl LedgerBatch {
    /// Assemble a batch from its two blocks. Row `i` of `debits` pairs with row `i` of `credits`.
    pub fn from_blocks(
        kind: BatchKind,
        header: Option<Vec<String>>,
        debits: Vec<LedgerRow>,
        credits: Vec<LedgerRow>,
    ) -> Self {
        let mut rows = debits;
        rows.extend(credits);
        Self { kind, header, rows }
    }

    pub fn standard_header() -> Vec<String> {
        LEDGER_HEADER.iter().map(|h| h.to_string()).collect()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of debit/credit pairs.
    pub fn pair_count(&self) -> usize {
        self.rows.len() / 2
    }

    pub fn debits(&self) -> impl Iterator<Item = &LedgerRow> {
        self.rows.iter().filter(|r| r.tran_code == TranCode::Debit)
    }

    pub fn credits(&self) -> impl Iterator<Item = &LedgerRow> {
        self.rows.iter().filter(|r| r.tran_code == TranCode::Credit)
    }

    /// Sum of all row amounts; zero for a balanced full or accepted batch.
    pub fn net_amount(&self) -> Decimal {
        self.rows.iter().map(|r| r.amount).sum()
    }
}
