/// Paragraph sources the reader analyzes from.

use std::path::Path;

use crate::schema::document::{BookMeta, Document};

/// Paragraph text by index, with a known total count.
pub trait DocumentStore: Send + Sync {
    fn paragraph(&self, index: usize) -> Option<String>;

    fn paragraph_count(&self) -> usize;

    /// Catalogue metadata, if the store knows it.
    fn meta(&self) -> Option<BookMeta> {
        None
    }
}

impl DocumentStore for Document {
    fn paragraph(&self, index: usize) -> Option<String> {
        Document::paragraph(self, index).map(str::to_string)
    }

    fn paragraph_count(&self) -> usize {
        self.len()
    }

    fn meta(&self) -> Option<BookMeta> {
        Some(self.meta.clone())
    }
}

/// Bare paragraphs with no metadata.
impl DocumentStore for Vec<String> {
    fn paragraph(&self, index: usize) -> Option<String> {
        self.get(index).cloned()
    }

    fn paragraph_count(&self) -> usize {
        self.len()
    }
}

/// Read a plain-text file into a `Document`.
pub fn load_document(meta: BookMeta, path: &Path) -> Result<Document, std::io::Error> {
    let text = std::fs::read_to_string(path)?;
    Ok(Document::from_text(meta, &text))
}
