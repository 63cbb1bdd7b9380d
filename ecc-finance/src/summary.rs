//! Counts and totals per disposition, as shown alongside an extracted report.

use ecc_core::{ChequeRecord, Disposition};
use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DispositionSummary {
    pub total_count: usize,
    pub total_amount: Decimal,
    pub accepted_count: usize,
    pub accepted_amount: Decimal,
    pub insufficient_funds_count: usize,
    pub insufficient_funds_amount: Decimal,
    pub other_reasons_count: usize,
    pub other_reasons_amount: Decimal,
    pub no_reason_count: usize,
}

impl DispositionSummary {
    pub fn from_records(records: &[ChequeRecord]) -> Self {
        let mut summary = Self::default();
        for record in records {
            let amount = record.cheque_amount();
            summary.total_count += 1;
            summary.total_amount += amount;
            match record.disposition() {
                Disposition::Accepted => {
                    summary.accepted_count += 1;
                    summary.accepted_amount += amount;
                }
                Disposition::InsufficientFunds => {
                    summary.insufficient_funds_count += 1;
                    summary.insufficient_funds_amount += amount;
                }
                Disposition::Other => {
                    summary.other_reasons_count += 1;
                    summary.other_reasons_amount += amount;
                }
                Disposition::NoReason => summary.no_reason_count += 1,
            }
        }
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_buckets() {
        let record = |n: &str, amount: i64, reason: &str| {
            ChequeRecord::new("98765432109876", Decimal::from(amount), n)
                .unwrap()
                .with_reason(reason)
        };
        let records = vec![
            record("1000001", 100, "ACCEPTED"),
            record("1000002", 200, "ACCEPTED"),
            record("1000003", 300, "INSUFFICIENT FUNDS"),
            record("1000004", 400, "SIGNATURE DIFFERS"),
            record("1000005", 500, ""),
        ];
        let summary = DispositionSummary::from_records(&records);

        assert_eq!(summary.total_count, 5);
        assert_eq!(summary.total_amount, Decimal::from(1500));
        assert_eq!(summary.accepted_count, 2);
        assert_eq!(summary.accepted_amount, Decimal::from(300));
        assert_eq!(summary.insufficient_funds_count, 1);
        assert_eq!(summary.other_reasons_amount, Decimal::from(400));
        assert_eq!(summary.no_reason_count, 1);
    }
}
