//! Record filters. Both are pure predicates over distinct fields, so they compose in
//! either order.

use std::collections::BTreeSet;

use ecc_core::ChequeRecord;
use rust_decimal::Decimal;

/// Records whose reason contains `ACCEPTED`, in input order.
pub fn filter_accepted(records: &[ChequeRecord]) -> Vec<ChequeRecord> {
    records.iter().filter(|r| r.is_accepted()).cloned().collect()
}

/// Records whose amount is strictly greater than `threshold`, in input order.
pub fn filter_by_threshold(records: &[ChequeRecord], threshold: Decimal) -> Vec<ChequeRecord> {
    records
        .iter()
        .filter(|r| r.cheque_amount() > threshold)
        .cloned()
        .collect()
}

/// Cheque numbers of the accepted records.
pub fn accepted_cheque_numbers(records: &[ChequeRecord]) -> BTreeSet<String> {
    records
        .iter()
        .filter(|r| r.is_accepted())
        .map(|r| r.cheque_number().to_string())
        .collect()
}
