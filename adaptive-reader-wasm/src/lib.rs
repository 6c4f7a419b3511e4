//! WASM bindings for adaptive-reader — powers the interactive reading demo.

use std::sync::Arc;
use wasm_bindgen::prelude::*;

use adaptive_reader::core::identity::InMemoryUsers;
use adaptive_reader::core::reader::AdaptiveReader;
use adaptive_reader::schema::content::ContentType;
use adaptive_reader::schema::document::{BookId, BookMeta, Document};
use adaptive_reader::schema::pattern::{ReadingEvent, UserId, UserProfile};

const SAMPLE_CHAPTER: &str = include_str!("../../tests/fixtures/chapter.txt");

const DEMO_USER: &str = "reader";

// ---------------------------------------------------------------------------
// JSON helper types for communication across the WASM boundary
// ---------------------------------------------------------------------------
#[derive(serde::Serialize)]
struct BookInfo {
    title: String,
    paragraphs: usize,
}

// ---------------------------------------------------------------------------
// ReaderDemo — the main exported struct
// ---------------------------------------------------------------------------
#[wasm_bindgen]
pub struct ReaderDemo {
    reader: AdaptiveReader,
    user: UserId,
}

#[wasm_bindgen]
impl ReaderDemo {
    /// Create a demo over `text`, or over the bundled sample chapter when
    /// `text` is empty. `normal_wpm` of 0 means "use the default".
    #[wasm_bindgen(constructor)]
    pub fn new(title: &str, text: &str, normal_wpm: u32) -> Result<ReaderDemo, JsError> {
        let body = if text.trim().is_empty() { SAMPLE_CHAPTER } else { text };
        let meta = BookMeta {
            id: BookId(1),
            title: title.to_string(),
            author: String::new(),
            description: None,
            isbn: None,
            published_year: None,
        };
        let document = Document::from_text(meta, body);

        let user = UserId::new(DEMO_USER);
        let users = Arc::new(InMemoryUsers::new());
        users.register(UserProfile {
            username: user.clone(),
            normal_reading_speed: (normal_wpm > 0).then_some(normal_wpm),
        });

        let reader = AdaptiveReader::builder()
            .documents(Arc::new(document))
            .users(users)
            .build()
            .map_err(|e| JsError::new(&format!("Reader build error: {e}")))?;

        Ok(ReaderDemo { reader, user })
    }

    /// Return JSON `{ "title": ..., "paragraphs": n }`.
    pub fn book_info(&self) -> Result<String, JsError> {
        let info = BookInfo {
            title: self.reader.book().map(|b| b.title).unwrap_or_default(),
            paragraphs: self.reader.paragraph_count(),
        };
        serde_json::to_string(&info)
            .map_err(|e| JsError::new(&format!("Serialization error: {e}")))
    }

    /// Return the analysis of paragraph `index` as JSON.
    pub fn analyze(&self, index: usize) -> Result<String, JsError> {
        let analyzed = self
            .reader
            .analyze(index)
            .map_err(|e| JsError::new(&e.to_string()))?;
        serde_json::to_string(&analyzed)
            .map_err(|e| JsError::new(&format!("Serialization error: {e}")))
    }

    /// Render paragraph `index` for the demo user. `version` is one of
    /// `full`, `condensed`, `summary`, `auto`; anything else renders full.
    pub fn render(&self, index: usize, version: &str) -> Result<String, JsError> {
        let content = self
            .reader
            .get_adaptive_tag(index, version, &self.user)
            .map_err(|e| JsError::new(&e.to_string()))?;
        serde_json::to_string(&content)
            .map_err(|e| JsError::new(&format!("Serialization error: {e}")))
    }

    /// Record a reading event and return the updated pattern as JSON.
    ///
    /// Expected JSON shape:
    /// ```json
    /// { "contentType": "dialogue", "observedWpm": 180.0, "dwellTimeSeconds": 6.5 }
    /// ```
    pub fn record(&self, event_json: &str) -> Result<String, JsError> {
        let event: ReadingEvent = serde_json::from_str(event_json)
            .map_err(|e| JsError::new(&format!("Invalid event JSON: {e}")))?;
        let pattern = self
            .reader
            .record_reading_event(&self.user, &self.user, &event)
            .map_err(|e| JsError::new(&e.to_string()))?;
        serde_json::to_string(&pattern)
            .map_err(|e| JsError::new(&format!("Serialization error: {e}")))
    }

    /// Return every learned pattern of the demo user as a JSON object
    /// keyed by content type.
    pub fn patterns(&self) -> Result<String, JsError> {
        let patterns = self
            .reader
            .get_patterns(&self.user, &self.user)
            .map_err(|e| JsError::new(&e.to_string()))?;
        serde_json::to_string(&patterns)
            .map_err(|e| JsError::new(&format!("Serialization error: {e}")))
    }

    /// Return JSON array of content type names.
    pub fn content_types() -> String {
        let names: Vec<&str> = ContentType::ALL.iter().map(|ct| ct.name()).collect();
        serde_json::to_string(&names).unwrap_or_else(|_| "[]".to_string())
    }

    /// Return JSON array of accepted version tags.
    pub fn versions() -> String {
        serde_json::to_string(&["full", "condensed", "summary", "auto"])
            .unwrap_or_else(|_| "[]".to_string())
    }
}
