//! Ledger batches as CSV. The spreadsheet container used at the bank is produced from this
//! by external tooling; amounts are always written with two decimals.

use std::io::{Read, Write};
use std::str::FromStr;

use ecc_core::{BatchKind, EccError, LedgerBatch, LedgerRow, Result, TranCode};
use rust_decimal::Decimal;
use tracing::{info, warn};

/// Write the header (when present) and every row.
pub fn write_batch<W: Write>(batch: &LedgerBatch, writer: W) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);

    if let Some(header) = &batch.header {
        wtr.write_record(header)?;
    }
    for row in &batch.rows {
        wtr.write_record(row.to_cells())?;
    }
    wtr.flush()?;
    Ok(())
}

/// A ledger read back from CSV.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadLedger {
    pub batch: LedgerBatch,
    /// Rows with a transaction code other than `055` / `555`.
    pub skipped: usize,
}

fn parse_amount(cell: Option<&str>, line: usize, column: &str) -> Result<Decimal> {
    let raw = cell.map(str::trim).unwrap_or("");
    let cleaned: String = raw.chars().filter(|c| *c != ',').collect();
    Decimal::from_str(&cleaned).map_err(|_| EccError::MalformedLedger {
        line,
        reason: format!("{} '{}' is not a number", column, raw),
    })
}

fn text(cell: Option<&str>) -> String {
    cell.map(str::trim).unwrap_or("").to_string()
}

/// Read a full-batch ledger. A first row without a transaction code is taken as the
/// header. Blank rows are ignored; rows with any other transaction code are skipped and
/// counted.
pub fn read_ledger<R: Read>(reader: R) -> Result<ReadLedger> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut header = None;
    let mut rows = Vec::new();
    let mut skipped = 0;
    let mut seen_content = false;

    for (index, result) in rdr.records().enumerate() {
        let record = result?;
        let line = index + 1;
        if record.iter().all(|c| c.trim().is_empty()) {
            continue;
        }

        let code = record.get(2).and_then(TranCode::parse);
        let Some(tran_code) = code else {
            if !seen_content {
                header = Some(record.iter().map(|c| c.trim().to_string()).collect());
            } else {
                warn!(line, code = record.get(2).unwrap_or(""), "skipping ledger row");
                skipped += 1;
            }
            seen_content = true;
            continue;
        };
        seen_content = true;

        if record.len() < 5 {
            return Err(EccError::MalformedLedger {
                line,
                reason: format!("expected 7 columns, found {}", record.len()),
            });
        }

        let amount = parse_amount(record.get(3), line, "AMOUNT")?;
        let lcy_amount = match record.get(4).map(str::trim) {
            Some(cell) if !cell.is_empty() => parse_amount(Some(cell), line, "LCYAMOUNT")?,
            _ => amount,
        };

        rows.push(LedgerRow {
            branch_code: text(record.get(0)),
            main_code: text(record.get(1)),
            tran_code,
            amount,
            lcy_amount,
            desc1: text(record.get(5)),
            desc2: text(record.get(6)),
        });
    }

    info!(rows = rows.len(), skipped, header = header.is_some(), "ledger read");
    Ok(ReadLedger {
        batch: LedgerBatch {
            kind: BatchKind::Full,
            header,
            rows,
        },
        skipped,
    })
}
