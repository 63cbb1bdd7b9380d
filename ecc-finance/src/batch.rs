//! Ledger batch generation.
//!
//! Every batch is two blocks of equal length: one debit (`055`) row per eligible record,
//! then one credit (`555`) row per record in the same order, so row `i` pairs with row
//! `i + N`. Full and accepted batches move the cheque amount from the clearing account to
//! the customer account (debit side positive). The commission batch moves a fixed charge
//! out of the customer account into the commission account (debit side negative).

use ecc_core::{
    BatchKind, ChequeRecord, EccError, LedgerBatch, LedgerRow, Result, TranCode,
    DEFAULT_BRANCH_CODE,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::filter::{filter_accepted, filter_by_threshold};

pub const DEFAULT_CLEARING_ACCOUNT: &str = "9313102000";
pub const DEFAULT_COMMISSION_ACCOUNT: &str = "9505062601";
pub const DEFAULT_COMMISSION_AMOUNT: i64 = 15;
pub const DEFAULT_COMMISSION_THRESHOLD: i64 = 200_000;

/// Where cleared cheque amounts are booked against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClearingParams {
    pub account: String,
    pub branch: String,
}

impl Default for ClearingParams {
    fn default() -> Self {
        Self {
            account: DEFAULT_CLEARING_ACCOUNT.to_string(),
            branch: DEFAULT_BRANCH_CODE.to_string(),
        }
    }
}

/// Commission charged on large cheques.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommissionParams {
    pub account: String,
    pub amount: Decimal,
    /// Only cheques strictly above this amount are charged.
    pub threshold: Decimal,
    pub clearing_branch: String,
}

impl Default for CommissionParams {
    fn default() -> Self {
        Self {
            account: DEFAULT_COMMISSION_ACCOUNT.to_string(),
            amount: Decimal::from(DEFAULT_COMMISSION_AMOUNT),
            threshold: Decimal::from(DEFAULT_COMMISSION_THRESHOLD),
            clearing_branch: DEFAULT_BRANCH_CODE.to_string(),
        }
    }
}

/// DESC2 of a customer-side row: `CLG {BANK} {cheque_number}`.
fn clearing_reference(record: &ChequeRecord) -> String {
    format!("CLG {} {}", record.ledger_bank(), record.cheque_number())
}

fn transfer_rows(
    records: &[ChequeRecord],
    clearing: &ClearingParams,
) -> (Vec<LedgerRow>, Vec<LedgerRow>) {
    let debits = records
        .iter()
        .map(|r| {
            LedgerRow::new(
                r.account_branch(),
                r.bfd_account(),
                TranCode::Debit,
                r.cheque_amount(),
                "",
                clearing_reference(r),
            )
        })
        .collect();

    let credits = records
        .iter()
        .map(|r| {
            LedgerRow::new(
                clearing.branch.as_str(),
                clearing.account.as_str(),
                TranCode::Credit,
                -r.cheque_amount(),
                format!("CLG TFR {}", r.bfd_account()),
                format!("{} {}", r.ledger_bank(), r.pay_account()).trim_end(),
            )
        })
        .collect();

    (debits, credits)
}

/// One debit/credit pair per record.
pub fn generate_full_batch(
    records: &[ChequeRecord],
    clearing: &ClearingParams,
) -> Result<LedgerBatch> {
    if records.is_empty() {
        return Err(EccError::NoRecords(BatchKind::Full));
    }
    let (debits, credits) = transfer_rows(records, clearing);
    let batch = LedgerBatch::from_blocks(
        BatchKind::Full,
        Some(LedgerBatch::standard_header()),
        debits,
        credits,
    );
    info!(records = records.len(), rows = batch.len(), "full batch generated");
    Ok(batch)
}

/// One debit/credit pair per accepted record.
pub fn generate_accepted_batch(
    records: &[ChequeRecord],
    clearing: &ClearingParams,
) -> Result<LedgerBatch> {
    let accepted = filter_accepted(records);
    if accepted.is_empty() {
        return Err(EccError::NoAcceptedRecords { total: records.len() });
    }
    let (debits, credits) = transfer_rows(&accepted, clearing);
    let batch = LedgerBatch::from_blocks(
        BatchKind::Accepted,
        Some(LedgerBatch::standard_header()),
        debits,
        credits,
    );
    info!(
        records = records.len(),
        accepted = accepted.len(),
        rows = batch.len(),
        "accepted batch generated"
    );
    Ok(batch)
}

/// `Ecc Charge Rs.250000`, or `Ecc Charge Rs.250000.50` for fractional cheque amounts.
fn charge_description(cheque_amount: Decimal) -> String {
    if cheque_amount.fract().is_zero() {
        format!("Ecc Charge Rs.{}", cheque_amount.trunc().normalize())
    } else {
        format!("Ecc Charge Rs.{:.2}", cheque_amount)
    }
}

/// One commission pair per record above the threshold. The batch has no header row.
pub fn generate_commission_batch(
    records: &[ChequeRecord],
    params: &CommissionParams,
) -> Result<LedgerBatch> {
    let eligible = filter_by_threshold(records, params.threshold);
    if eligible.is_empty() {
        return Err(EccError::NoEligibleRecords {
            threshold: params.threshold,
            total: records.len(),
        });
    }

    let debits = eligible
        .iter()
        .map(|r| {
            LedgerRow::new(
                r.account_branch(),
                r.bfd_account(),
                TranCode::Debit,
                -params.amount,
                charge_description(r.cheque_amount()),
                clearing_reference(r),
            )
        })
        .collect();

    let credits = eligible
        .iter()
        .map(|r| {
            LedgerRow::new(
                params.clearing_branch.as_str(),
                params.account.as_str(),
                TranCode::Credit,
                params.amount,
                charge_description(r.cheque_amount()),
                r.bfd_account(),
            )
        })
        .collect();

    let batch = LedgerBatch::from_blocks(BatchKind::Commission, None, debits, credits);
    info!(
        records = records.len(),
        eligible = eligible.len(),
        threshold = %params.threshold,
        rows = batch.len(),
        "commission batch generated"
    );
    Ok(batch)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(account: &str, number: &str, amount: Decimal, reason: &str) -> ChequeRecord {
        ChequeRecord::new(account, amount, number)
            .unwrap()
            .with_pay_bank("NIC ASIA")
            .with_pay_account("12345678")
            .with_reason(reason)
    }

    fn sample() -> Vec<ChequeRecord> {
        vec![
            record("98765432109876", "1234567", Decimal::from(50_000), "INSUFFICIENT FUNDS"),
            record("12345678901234", "2345678", Decimal::new(25_000_050, 2), "ACCEPTED"),
            record("55566677788899", "3456789", Decimal::from(1_200), "ACCEPTED"),
        ]
    }

    #[test]
    fn test_full_batch_rows() {
        let records = sample();
        let batch = generate_full_batch(&records, &ClearingParams::default()).unwrap();

        assert_eq!(batch.kind, BatchKind::Full);
        assert_eq!(batch.header, Some(LedgerBatch::standard_header()));
        assert_eq!(batch.len(), 2 * records.len());

        let debit = &batch.rows[0];
        assert_eq!(debit.branch_code, "987");
        assert_eq!(debit.main_code, "98765432109876");
        assert_eq!(debit.tran_code, TranCode::Debit);
        assert_eq!(debit.amount, Decimal::from(50_000));
        assert_eq!(debit.desc1, "");
        assert_eq!(debit.desc2, "CLG NICASIA 1234567");
        assert_eq!(debit.cheque_reference(), Some("1234567"));

        let credit = &batch.rows[3];
        assert_eq!(credit.branch_code, "255");
        assert_eq!(credit.main_code, "9313102000");
        assert_eq!(credit.tran_code, TranCode::Credit);
        assert_eq!(credit.amount, Decimal::from(-50_000));
        assert_eq!(credit.desc1, "CLG TFR 98765432109876");
        assert_eq!(credit.desc2, "NICASIA 12345678");
    }

    #[test]
    fn test_full_batch_pairing_law() {
        let records = sample();
        let batch = generate_full_batch(&records, &ClearingParams::default()).unwrap();
        let n = records.len();

        for (i, record) in records.iter().enumerate() {
            let debit = &batch.rows[i];
            let credit = &batch.rows[i + n];
            assert_eq!(debit.main_code, record.bfd_account());
            assert_eq!(credit.desc1, format!("CLG TFR {}", record.bfd_account()));
            assert_eq!(debit.amount + credit.amount, Decimal::ZERO);
        }
        assert_eq!(batch.net_amount(), Decimal::ZERO);
    }

    #[test]
    fn test_credit_desc2_without_pay_account() {
        let records =
            vec![ChequeRecord::new("98765432109876", Decimal::from(500), "1234567").unwrap()];
        let batch = generate_full_batch(&records, &ClearingParams::default()).unwrap();
        assert_eq!(batch.rows[0].desc2, "CLG CLG 1234567");
        assert_eq!(batch.rows[1].desc2, "CLG");
    }

    #[test]
    fn test_accepted_batch_filters() {
        let batch = generate_accepted_batch(&sample(), &ClearingParams::default()).unwrap();
        assert_eq!(batch.kind, BatchKind::Accepted);
        assert_eq!(batch.pair_count(), 2);
        let numbers: Vec<_> = batch.debits().filter_map(|r| r.cheque_reference()).collect();
        assert_eq!(numbers, vec!["2345678", "3456789"]);
    }

    #[test]
    fn test_empty_inputs_are_named_conditions() {
        let clearing = ClearingParams::default();
        assert!(matches!(
            generate_full_batch(&[], &clearing),
            Err(EccError::NoRecords(BatchKind::Full))
        ));

        let rejected = vec![record("98765432109876", "1234567", Decimal::from(10), "STOP PAYMENT")];
        assert!(matches!(
            generate_accepted_batch(&rejected, &clearing),
            Err(EccError::NoAcceptedRecords { total: 1 })
        ));
        assert!(matches!(
            generate_commission_batch(&rejected, &CommissionParams::default()),
            Err(EccError::NoEligibleRecords { total: 1, .. })
        ));
    }

    #[test]
    fn test_commission_batch_single_eligible() {
        let records = vec![
            record("98765432109876", "1234567", Decimal::from(250_000), "ACCEPTED"),
            record("12345678901234", "2345678", Decimal::from(200_000), "ACCEPTED"),
        ];
        let batch = generate_commission_batch(&records, &CommissionParams::default()).unwrap();

        assert_eq!(batch.kind, BatchKind::Commission);
        assert_eq!(batch.header, None);
        assert_eq!(batch.len(), 2);

        let debit = &batch.rows[0];
        assert_eq!(debit.tran_code, TranCode::Debit);
        assert_eq!(debit.branch_code, "987");
        assert_eq!(debit.amount, Decimal::from(-15));
        assert_eq!(debit.desc1, "Ecc Charge Rs.250000");
        assert_eq!(debit.desc2, "CLG NICASIA 1234567");
        assert_eq!(debit.to_cells()[3], "-15.00");

        let credit = &batch.rows[1];
        assert_eq!(credit.tran_code, TranCode::Credit);
        assert_eq!(credit.main_code, "9505062601");
        assert_eq!(credit.branch_code, "255");
        assert_eq!(credit.amount, Decimal::from(15));
        assert_eq!(credit.desc1, "Ecc Charge Rs.250000");
        assert_eq!(credit.desc2, "98765432109876");
        assert_eq!(credit.to_cells()[3], "15.00");
    }

    #[test]
    fn test_charge_description_formats() {
        assert_eq!(charge_description(Decimal::new(25_000_000, 2)), "Ecc Charge Rs.250000");
        assert_eq!(charge_description(Decimal::new(25_000_050, 2)), "Ecc Charge Rs.250000.50");
    }
}
