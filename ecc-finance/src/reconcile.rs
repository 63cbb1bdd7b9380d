//! Reconciliation of a previously generated full batch against a fresh accepted set.
//!
//! The supplied ledger must come from the full-batch generator unchanged: debit row `i`
//! and credit row `i` are taken to describe the same cheque. No matching beyond that
//! positional pairing is attempted.

use std::collections::BTreeSet;

use ecc_core::{BatchKind, EccError, LedgerBatch, LedgerRow, Result};
use tracing::{debug, info};

/// Keep the debit/credit pairs whose cheque number (last token of the debit DESC2) is in
/// `accepted`. The header row is carried over; kept pairs are written debit block first.
pub fn reconcile(ledger: &LedgerBatch, accepted: &BTreeSet<String>) -> Result<LedgerBatch> {
    let debits: Vec<&LedgerRow> = ledger.debits().collect();
    let credits: Vec<&LedgerRow> = ledger.credits().collect();

    if debits.len() != credits.len() {
        return Err(EccError::StructuralMismatch {
            debit_rows: debits.len(),
            credit_rows: credits.len(),
        });
    }

    let mut kept_debits = Vec::new();
    let mut kept_credits = Vec::new();
    for (index, (debit, credit)) in debits.iter().zip(&credits).enumerate() {
        let cheque = debit.cheque_reference();
        let keep = cheque.is_some_and(|c| accepted.contains(c));
        debug!(pair = index, cheque = ?cheque, keep, "ledger pair checked");
        if keep {
            kept_debits.push((*debit).clone());
            kept_credits.push((*credit).clone());
        }
    }

    if kept_debits.is_empty() {
        return Err(EccError::NoMatches {
            accepted: accepted.len(),
            pairs: debits.len(),
        });
    }

    info!(
        pairs = debits.len(),
        kept = kept_debits.len(),
        accepted = accepted.len(),
        "ledger reconciled"
    );
    Ok(LedgerBatch::from_blocks(
        BatchKind::Reconciled,
        ledger.header.clone(),
        kept_debits,
        kept_credits,
    ))
}
