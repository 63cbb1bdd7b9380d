//! Extraction observability: per-row outcomes and per-page counters.
//!
//! Observers are notified after each decision has been made; nothing they do feeds
//! back into extraction.

use serde::Serialize;
use tracing::{debug, info};

/// Which path a page went through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractionMode {
    Table,
    Text,
}

/// Position of a row (table mode) or line (text mode) within the document. 1-based page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RowLocation {
    pub page: usize,
    pub table: Option<usize>,
    pub row: usize,
}

/// What happened to one row or line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "kebab-case")]
pub enum RowOutcome {
    Extracted,
    /// Fewer cells / tokens than a cheque line has.
    TooShort { width: usize },
    Header,
    Footer,
    /// Text line without a cheque-number token and an amount token.
    NoChequeTokens,
    /// Admitted, but at least one mandatory field was not found.
    Incomplete { missing: Vec<&'static str> },
    /// Fields found but the record failed validation.
    Invalid { reason: String },
}

/// Per-page counters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageStats {
    pub page: usize,
    pub mode: ExtractionMode,
    pub tables: usize,
    pub rows_seen: usize,
    pub rows_admitted: usize,
    pub rejected_short: usize,
    pub rejected_header: usize,
    pub rejected_footer: usize,
    pub rejected_no_tokens: usize,
    pub dropped_incomplete: usize,
    pub dropped_invalid: usize,
    pub records: usize,
}

impl PageStats {
    pub fn new(page: usize, mode: ExtractionMode, tables: usize) -> Self {
        Self {
            page,
            mode,
            tables,
            rows_seen: 0,
            rows_admitted: 0,
            rejected_short: 0,
            rejected_header: 0,
            rejected_footer: 0,
            rejected_no_tokens: 0,
            dropped_incomplete: 0,
            dropped_invalid: 0,
            records: 0,
        }
    }

    pub fn record(&mut self, outcome: &RowOutcome) {
        self.rows_seen += 1;
        match outcome {
            RowOutcome::Extracted => {
                self.rows_admitted += 1;
                self.records += 1;
            }
            RowOutcome::TooShort { .. } => self.rejected_short += 1,
            RowOutcome::Header => self.rejected_header += 1,
            RowOutcome::Footer => self.rejected_footer += 1,
            RowOutcome::NoChequeTokens => self.rejected_no_tokens += 1,
            RowOutcome::Incomplete { .. } => {
                self.rows_admitted += 1;
                self.dropped_incomplete += 1;
            }
            RowOutcome::Invalid { .. } => {
                self.rows_admitted += 1;
                self.dropped_invalid += 1;
            }
        }
    }
}

/// Sink for extraction events. Both methods default to doing nothing.
pub trait ExtractionObserver {
    fn on_row(&mut self, _location: RowLocation, _outcome: &RowOutcome) {}
    fn on_page(&mut self, _stats: &PageStats) {}
}

/// Ignores everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl ExtractionObserver for NoopObserver {}

/// Forwards events to `tracing`: rows at debug, pages at info.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl ExtractionObserver for TracingObserver {
    fn on_row(&mut self, location: RowLocation, outcome: &RowOutcome) {
        debug!(
            page = location.page,
            table = ?location.table,
            row = location.row,
            outcome = ?outcome,
            "row processed"
        );
    }

    fn on_page(&mut self, stats: &PageStats) {
        info!(
            page = stats.page,
            mode = ?stats.mode,
            tables = stats.tables,
            rows = stats.rows_seen,
            admitted = stats.rows_admitted,
            records = stats.records,
            "page extracted"
        );
    }
}

/// Keeps every page's counters, e.g. for a summary after the run.
#[derive(Debug, Clone, Default)]
pub struct StatsCollector {
    pub pages: Vec<PageStats>,
}

impl StatsCollector {
    pub fn total_records(&self) -> usize {
        self.pages.iter().map(|p| p.records).sum()
    }

    pub fn total_rows(&self) -> usize {
        self.pages.iter().map(|p| p.rows_seen).sum()
    }
}

impl ExtractionObserver for StatsCollector {
    fn on_page(&mut self, stats: &PageStats) {
        self.pages.push(stats.clone());
    }
}
