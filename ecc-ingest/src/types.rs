use serde::{Deserialize, Serialize};

/// A decoded table: rows of optional cell text, as a PDF table extractor yields them.
pub type Table = Vec<Vec<Option<String>>>;

/// What the ingestion pipeline needs from a document decoder, per page.
pub trait PageSource {
    /// Tables found on the page; empty when the page has none.
    fn tables(&self) -> &[Table];
    /// Plain text of the page, lines separated by `\n`.
    fn text(&self) -> Option<&str>;
}

/// Decoder output for one page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    #[serde(default)]
    pub tables: Vec<Table>,
    #[serde(default)]
    pub text: Option<String>,
}

impl Page {
    pub fn from_tables(tables: Vec<Table>) -> Self {
        Self { tables, text: None }
    }

    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            tables: Vec::new(),
            text: Some(text.into()),
        }
    }
}

impl PageSource for Page {
    fn tables(&self) -> &[Table] {
        &self.tables
    }

    fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }
}

/// A decoded clearing report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub pages: Vec<Page>,
}

impl Document {
    pub fn new(pages: Vec<Page>) -> Self {
        Self { pages }
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}

/// Build a table row from string literals; empty strings become `None` cells.
pub fn row_from<S: AsRef<str>>(cells: &[S]) -> Vec<Option<String>> {
    cells
        .iter()
        .map(|c| {
            let c = c.as_ref();
            if c.is_empty() { None } else { Some(c.to_string()) }
        })
        .collect()
}
