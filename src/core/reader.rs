/// The adaptive reader: paragraph lookup → analysis → version selection,
/// plus the reading-event learning loop.
///
/// Wires together the document store, user profiles, identity, pattern
/// store, analyzer, selector, and tracker.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

use crate::core::analyzer::ParagraphAnalyzer;
use crate::core::config::{ConfigError, ReaderConfig};
use crate::core::documents::DocumentStore;
use crate::core::identity::{IdentityProvider, InMemoryUsers, ProfileStore};
use crate::core::keywords::KeywordTable;
use crate::core::selector::AdaptiveSelector;
use crate::core::tracker::{InMemoryPatternStore, PatternStore, PatternTracker};
use crate::schema::content::{AdaptiveContent, AnalyzedParagraph, ContentType, RequestedVersion};
use crate::schema::document::BookMeta;
use crate::schema::pattern::{ReadingEvent, ReadingPattern, UserId};

#[derive(Debug, Error)]
pub enum ReaderError {
    #[error("paragraph {index} not found (document has {count})")]
    NotFound { index: usize, count: usize },
    #[error("unauthorized: {0}")]
    Unauthorized(String),
    #[error("{caller} may not access the reading patterns of {subject}")]
    Forbidden { caller: UserId, subject: UserId },
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
}

/// The top-level reader. Built via `AdaptiveReader::builder()`.
pub struct AdaptiveReader {
    documents: Arc<dyn DocumentStore>,
    profiles: Arc<dyn ProfileStore>,
    identity: Arc<dyn IdentityProvider>,
    analyzer: ParagraphAnalyzer,
    selector: AdaptiveSelector,
    tracker: PatternTracker,
    config: ReaderConfig,
}

/// Builder for constructing an `AdaptiveReader`.
pub struct AdaptiveReaderBuilder {
    config_path: Option<String>,
    keywords_path: Option<String>,
    /// Directly provided config (for testing without files).
    config: Option<ReaderConfig>,
    /// Directly provided keyword table (for testing without files).
    keywords: Option<KeywordTable>,
    documents: Option<Arc<dyn DocumentStore>>,
    profiles: Option<Arc<dyn ProfileStore>>,
    identity: Option<Arc<dyn IdentityProvider>>,
    pattern_store: Option<Arc<dyn PatternStore>>,
}

impl AdaptiveReader {
    pub fn builder() -> AdaptiveReaderBuilder {
        AdaptiveReaderBuilder {
            config_path: None,
            keywords_path: None,
            config: None,
            keywords: None,
            documents: None,
            profiles: None,
            identity: None,
            pattern_store: None,
        }
    }

    pub fn config(&self) -> &ReaderConfig {
        &self.config
    }

    pub fn paragraph_count(&self) -> usize {
        self.documents.paragraph_count()
    }

    pub fn book(&self) -> Option<BookMeta> {
        self.documents.meta()
    }

    /// Resolve a bearer credential to a user.
    pub fn authenticate(&self, credential: Option<&str>) -> Result<UserId, ReaderError> {
        self.identity.authenticate(credential)
    }

    /// Analyze the paragraph at `index`.
    pub fn analyze(&self, index: usize) -> Result<AnalyzedParagraph, ReaderError> {
        let text = self.paragraph_text(index)?;
        Ok(self.analyzer.analyze(&text, index))
    }

    /// Render the paragraph at `index` for `user`.
    pub fn get_adaptive(
        &self,
        index: usize,
        version: RequestedVersion,
        user: &UserId,
    ) -> Result<AdaptiveContent, ReaderError> {
        let analyzed = self.analyze(index)?;
        Ok(self
            .selector
            .select(&analyzed, version, |ct| self.tracker.pattern(user, ct)))
    }

    /// Like `get_adaptive`, from a raw version tag. Unknown tags render
    /// the full text; the fallback is logged as invalid input.
    pub fn get_adaptive_tag(
        &self,
        index: usize,
        tag: &str,
        user: &UserId,
    ) -> Result<AdaptiveContent, ReaderError> {
        let (version, recognized) = RequestedVersion::parse_lenient(tag);
        if !recognized {
            let diagnostic = ReaderError::InvalidInput(format!("unknown version tag '{}'", tag));
            warn!(%user, index, error = %diagnostic, "falling back to full rendering");
        }
        self.get_adaptive(index, version, user)
    }

    /// Fold a reading event into `subject`'s pattern. Only the subject may
    /// record their own events.
    pub fn record_reading_event(
        &self,
        caller: &UserId,
        subject: &UserId,
        event: &ReadingEvent,
    ) -> Result<ReadingPattern, ReaderError> {
        authorize(caller, subject)?;
        let normal_wpm = self.profiles.normal_reading_speed(subject);
        debug!(user = %subject, content_type = %event.content_type, "recording reading event");
        Ok(self.tracker.record_event(subject, event, normal_wpm))
    }

    /// Every stored pattern of `subject`. Only the subject may read them.
    pub fn get_patterns(
        &self,
        caller: &UserId,
        subject: &UserId,
    ) -> Result<BTreeMap<ContentType, ReadingPattern>, ReaderError> {
        authorize(caller, subject)?;
        Ok(self.tracker.patterns(subject).into_iter().collect())
    }

    fn paragraph_text(&self, index: usize) -> Result<String, ReaderError> {
        self.documents
            .paragraph(index)
            .ok_or_else(|| ReaderError::NotFound {
                index,
                count: self.documents.paragraph_count(),
            })
    }
}

fn authorize(caller: &UserId, subject: &UserId) -> Result<(), ReaderError> {
    if caller != subject {
        warn!(%caller, %subject, "rejected cross-user pattern access");
        return Err(ReaderError::Forbidden {
            caller: caller.clone(),
            subject: subject.clone(),
        });
    }
    Ok(())
}

impl AdaptiveReaderBuilder {
    pub fn config_path(mut self, path: &str) -> Self {
        self.config_path = Some(path.to_string());
        self
    }

    pub fn keywords_path(mut self, path: &str) -> Self {
        self.keywords_path = Some(path.to_string());
        self
    }

    /// Provide config directly (for testing without files).
    pub fn with_config(mut self, config: ReaderConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Provide a keyword table directly (for testing without files).
    pub fn with_keywords(mut self, keywords: KeywordTable) -> Self {
        self.keywords = Some(keywords);
        self
    }

    pub fn documents(mut self, documents: Arc<dyn DocumentStore>) -> Self {
        self.documents = Some(documents);
        self
    }

    pub fn profiles(mut self, profiles: Arc<dyn ProfileStore>) -> Self {
        self.profiles = Some(profiles);
        self
    }

    pub fn identity(mut self, identity: Arc<dyn IdentityProvider>) -> Self {
        self.identity = Some(identity);
        self
    }

    /// Use one user table for both profiles and identity.
    pub fn users(self, users: Arc<InMemoryUsers>) -> Self {
        self.profiles(users.clone()).identity(users)
    }

    pub fn pattern_store(mut self, store: Arc<dyn PatternStore>) -> Self {
        self.pattern_store = Some(store);
        self
    }

    pub fn build(self) -> Result<AdaptiveReader, ReaderError> {
        // Files override anything provided directly
        let config = match self.config_path {
            Some(ref path) => ReaderConfig::load_from_ron(Path::new(path))?,
            None => {
                let config = self.config.unwrap_or_default();
                config.validate()?;
                config
            }
        };
        let keywords = match self.keywords_path {
            Some(ref path) => KeywordTable::load_from_ron(Path::new(path))?,
            None => self.keywords.unwrap_or_default(),
        };

        let users = Arc::new(InMemoryUsers::new());
        let documents: Arc<dyn DocumentStore> = match self.documents {
            Some(documents) => documents,
            None => Arc::new(Vec::<String>::new()),
        };
        let profiles: Arc<dyn ProfileStore> = match self.profiles {
            Some(profiles) => profiles,
            None => users.clone(),
        };
        let identity: Arc<dyn IdentityProvider> = match self.identity {
            Some(identity) => identity,
            None => users,
        };
        let store: Arc<dyn PatternStore> = match self.pattern_store {
            Some(store) => store,
            None => Arc::new(InMemoryPatternStore::new()),
        };

        let keywords = Arc::new(keywords);
        Ok(AdaptiveReader {
            documents,
            profiles,
            identity,
            analyzer: ParagraphAnalyzer::new(keywords, &config),
            selector: AdaptiveSelector::new(&config),
            tracker: PatternTracker::new(store, &config),
            config,
        })
    }
}
