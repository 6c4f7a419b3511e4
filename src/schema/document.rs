use serde::{Deserialize, Serialize};

/// Newtype wrapper for book IDs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BookId(pub u64);

/// Catalogue metadata for a book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookMeta {
    pub id: BookId,
    pub title: String,
    pub author: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub isbn: Option<String>,
    #[serde(default)]
    pub published_year: Option<i32>,
}

/// A book's metadata plus its body as an ordered list of paragraphs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub meta: BookMeta,
    pub paragraphs: Vec<String>,
}

impl Document {
    /// Build a document from plain text. Paragraphs are separated by one
    /// or more blank lines; lines within a paragraph are joined with a
    /// single space.
    pub fn from_text(meta: BookMeta, text: &str) -> Self {
        let mut paragraphs = Vec::new();
        let mut current: Vec<&str> = Vec::new();

        for line in text.lines() {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                if !current.is_empty() {
                    paragraphs.push(current.join(" "));
                    current.clear();
                }
                continue;
            }
            current.push(trimmed);
        }
        if !current.is_empty() {
            paragraphs.push(current.join(" "));
        }

        Self { meta, paragraphs }
    }

    pub fn paragraph(&self, index: usize) -> Option<&str> {
        self.paragraphs.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.paragraphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paragraphs.is_empty()
    }
}
