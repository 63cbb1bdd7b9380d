//! Error taxonomy shared by the extraction and ledger crates.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::ledger::BatchKind;

#[derive(Debug, Error)]
pub enum EccError {
    #[error("no cheque data extracted from {pages} page(s); upload an ECC report")]
    NoDataExtracted { pages: usize },

    #[error("no ACCEPTED cheques found among {total} record(s); check the reason column")]
    NoAcceptedRecords { total: usize },

    #[error("no cheques with amount greater than Rs.{threshold} among {total} record(s)")]
    NoEligibleRecords { threshold: Decimal, total: usize },

    #[error("no cheque records supplied for the {0} batch")]
    NoRecords(BatchKind),

    #[error("ledger structure error: {debit_rows} debit (055) rows vs {credit_rows} credit (555) rows")]
    StructuralMismatch { debit_rows: usize, credit_rows: usize },

    #[error("none of the {pairs} ledger pair(s) matched the {accepted} accepted cheque number(s)")]
    NoMatches { accepted: usize, pairs: usize },

    #[error("invalid cheque record: {0}")]
    InvalidRecord(String),

    #[error("malformed ledger at line {line}: {reason}")]
    MalformedLedger { line: usize, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl EccError {
    /// True for the aggregate-empty conditions a caller reports as a plain user message.
    pub fn is_empty_result(&self) -> bool {
        matches!(
            self,
            EccError::NoDataExtracted { .. }
                | EccError::NoAcceptedRecords { .. }
                | EccError::NoEligibleRecords { .. }
                | EccError::NoRecords(_)
                | EccError::NoMatches { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, EccError>;
