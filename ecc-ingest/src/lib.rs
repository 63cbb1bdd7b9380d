//! ecc-ingest: clearing-report ingestion. Turns decoded report pages (tables or plain text)
//! into validated cheque records.

pub mod fields;
pub mod observer;
pub mod pipeline;
pub mod table_mode;
pub mod text_mode;
pub mod types;

pub use fields::ColumnLayout;
pub use observer::{
    ExtractionMode, ExtractionObserver, NoopObserver, PageStats, RowLocation, RowOutcome,
    StatsCollector, TracingObserver,
};
pub use pipeline::{extract, Extractor};
pub use types::{Document, Page, PageSource, Table};
