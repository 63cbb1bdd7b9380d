//! Table mode: every row of every table on a page, read through the cell rule tables.

use ecc_core::ChequeRecord;

use crate::fields::cells::{admission, normalize_cells, read_row};
use crate::fields::ColumnLayout;
use crate::observer::{ExtractionMode, ExtractionObserver, PageStats, RowLocation, RowOutcome};
use crate::types::Table;

/// Extract the records of one page's tables, in table then row order.
pub fn extract_tables(
    page: usize,
    tables: &[Table],
    layout: &ColumnLayout,
    observer: &mut dyn ExtractionObserver,
) -> (Vec<ChequeRecord>, PageStats) {
    let mut stats = PageStats::new(page, ExtractionMode::Table, tables.len());
    let mut records = Vec::new();

    for (table_index, table) in tables.iter().enumerate() {
        for (row_index, row) in table.iter().enumerate() {
            let cells = normalize_cells(row);
            let outcome = match admission(&cells, layout) {
                Some(rejected) => rejected,
                None => match read_row(&cells, layout).into_record() {
                    Ok(record) => {
                        records.push(record);
                        RowOutcome::Extracted
                    }
                    Err(dropped) => dropped,
                },
            };

            stats.record(&outcome);
            observer.on_row(
                RowLocation {
                    page,
                    table: Some(table_index),
                    row: row_index,
                },
                &outcome,
            );
        }
    }

    (records, stats)
}
