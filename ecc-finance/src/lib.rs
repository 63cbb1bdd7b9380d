//! ecc-finance: record filters, ledger batch generation, reconciliation, and the CSV and
//! report renderings of their output.

pub mod batch;
pub mod filter;
pub mod ledger_csv;
pub mod reconcile;
pub mod report;
pub mod summary;

pub use batch::{
    generate_accepted_batch, generate_commission_batch, generate_full_batch, ClearingParams,
    CommissionParams,
};
pub use filter::{accepted_cheque_numbers, filter_accepted, filter_by_threshold};
pub use ledger_csv::{read_ledger, write_batch, ReadLedger};
pub use reconcile::reconcile;
pub use report::{format_amount, write_report};
pub use summary::DispositionSummary;
