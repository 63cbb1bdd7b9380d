//! Text mode: pages without tables are read line by line from their plain text.

use ecc_core::ChequeRecord;

use crate::fields::tokens::{line_admission, read_line, LineCtx};
use crate::observer::{ExtractionMode, ExtractionObserver, PageStats, RowLocation, RowOutcome};

/// Extract the records of one page's text, in line order.
pub fn extract_text(
    page: usize,
    text: &str,
    observer: &mut dyn ExtractionObserver,
) -> (Vec<ChequeRecord>, PageStats) {
    let mut stats = PageStats::new(page, ExtractionMode::Text, 0);
    let mut records = Vec::new();
    let lines: Vec<&str> = text.lines().collect();

    for (index, line) in lines.iter().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let ctx = LineCtx::new(line, lines.get(index + 1).copied());
        let outcome = match line_admission(&ctx) {
            Some(rejected) => rejected,
            None => match read_line(&ctx).into_record() {
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
                table: None,
                row: index,
            },
            &outcome,
        );
    }

    (records, stats)
}
