//! Document extraction: pick table or text mode per page and concatenate the records.

use ecc_core::{ChequeRecord, EccError, Result};
use tracing::{info, warn};

use crate::fields::ColumnLayout;
use crate::observer::{ExtractionObserver, TracingObserver};
use crate::table_mode::extract_tables;
use crate::text_mode::extract_text;
use crate::types::{Document, PageSource};

/// Runs extraction with a given column layout.
#[derive(Debug, Clone, Default)]
pub struct Extractor {
    layout: ColumnLayout,
}

impl Extractor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_layout(mut self, layout: ColumnLayout) -> Self {
        self.layout = layout;
        self
    }

    pub fn layout(&self) -> &ColumnLayout {
        &self.layout
    }

    /// Extract every page in order. Pages with at least one table use table mode, the
    /// rest fall back to their text. Zero records overall is `NoDataExtracted`.
    pub fn extract<S: PageSource>(
        &self,
        pages: &[S],
        observer: &mut dyn ExtractionObserver,
    ) -> Result<Vec<ChequeRecord>> {
        let mut records = Vec::new();

        for (index, page) in pages.iter().enumerate() {
            let number = index + 1;
            let (page_records, stats) = if !page.tables().is_empty() {
                extract_tables(number, page.tables(), &self.layout, observer)
            } else {
                match page.text() {
                    Some(text) => extract_text(number, text, observer),
                    None => {
                        warn!(page = number, "page has neither tables nor text");
                        extract_text(number, "", observer)
                    }
                }
            };
            observer.on_page(&stats);
            records.extend(page_records);
        }

        if records.is_empty() {
            return Err(EccError::NoDataExtracted { pages: pages.len() });
        }

        info!(pages = pages.len(), records = records.len(), "extraction complete");
        Ok(records)
    }
}

/// Extract a decoded report with the default layout, logging through `tracing`.
pub fn extract(document: &Document) -> Result<Vec<ChequeRecord>> {
    Extractor::new().extract(&document.pages, &mut TracingObserver)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observer::StatsCollector;
    use crate::types::{row_from, Page};
    use crate::ExtractionMode;

    fn table_page() -> Page {
        Page::from_tables(vec![vec![
            row_from(&["S.N.", "", "", "", "", "", "Cheque", "Branch", "", "Account"]),
            row_from(&[
                "1", "", "", "", "", "", "1234567", "255", "", "98765432109876", "", "CITIZE",
                "12345678", "50,000.00", "INSUFFICIENT FUNDS",
            ]),
            row_from(&[
                "2", "", "", "", "", "", "2345678", "255", "", "98765432100000", "", "NABIL",
                "87654321", "250,000.00", "ACCEPTED",
            ]),
        ]])
    }

    fn text_page() -> Page {
        Page::from_text(
            "3 2024-07-01 3456789 310 11122233344455 0405 SUNRI 55667788 300,000.00 ACCEPTED\n",
        )
    }

    #[test]
    fn test_pages_concatenate_in_order() {
        let document = Document::new(vec![table_page(), text_page()]);
        let mut stats = StatsCollector::default();
        let records = Extractor::new().extract(&document.pages, &mut stats).unwrap();

        let numbers: Vec<&str> = records.iter().map(|r| r.cheque_number()).collect();
        assert_eq!(numbers, vec!["1234567", "2345678", "3456789"]);
        assert_eq!(records[2].pay_bank_name(), "SUNRISE");
        assert_eq!(records[2].branch_code(), "310");

        assert_eq!(stats.pages.len(), 2);
        assert_eq!(stats.pages[0].mode, ExtractionMode::Table);
        assert_eq!(stats.pages[1].mode, ExtractionMode::Text);
        assert_eq!(stats.total_records(), 3);
    }

    #[test]
    fn test_extraction_is_deterministic() {
        let document = Document::new(vec![table_page(), text_page()]);
        let first = extract(&document).unwrap();
        let second = extract(&document).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_no_data_is_an_error() {
        let document = Document::new(vec![Page::from_text("nothing to see here"), Page::default()]);
        let err = extract(&document).unwrap_err();
        assert!(matches!(err, EccError::NoDataExtracted { pages: 2 }));
        assert!(err.is_empty_result());
    }
}
