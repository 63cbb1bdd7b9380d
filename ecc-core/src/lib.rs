//! ecc-core: typed domain for clearing-report cheques and the ledger batches built from them.

pub mod bank;
pub mod cheque;
pub mod error;
pub mod ledger;
pub mod shape;

pub use bank::normalize_bank_name;
pub use cheque::{
    is_plausible_amount, ChequeRecord, Disposition, AMOUNT_CEILING, DEFAULT_BRANCH_CODE, UNKNOWN_BANK,
};
pub use error::{EccError, Result};
pub use ledger::{BatchKind, LedgerBatch, LedgerRow, TranCode, LEDGER_HEADER};
