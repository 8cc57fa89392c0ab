//! Test utilities: mock implementations of all core traits.
//!
//! Handwritten mocks for dependency injection in unit tests.
//! All mocks use `Arc<Mutex<_>>` for interior mutability, allowing
//! test assertions on recorded calls.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::error::AppError;
use crate::models::{ParsedDocument, TaggedDocument};
use crate::pipeline::{PipelineEvent, PipelineReporter};
use crate::traits::{DocumentReader, Fetcher, Tagger};

// ---------------------------------------------------------------------------
// MockFetcher
// ---------------------------------------------------------------------------

/// Mock fetcher that serves the same body for every URL unless a route or
/// a one-shot error overrides it.
#[derive(Clone)]
pub struct MockFetcher {
    body: String,
    /// Returned (once) by the next call, whatever the URL.
    error: Arc<Mutex<Option<AppError>>>,
    /// Per-URL responses, each consumed by the first request for that URL.
    routes: Arc<Mutex<HashMap<String, Result<String, AppError>>>>,
    delay: Option<Duration>,
    requested: Arc<Mutex<Vec<String>>>,
}

impl MockFetcher {
    pub fn new(body: &str) -> Self {
        Self {
            body: body.to_string(),
            error: Arc::new(Mutex::new(None)),
            routes: Arc::new(Mutex::new(HashMap::new())),
            delay: None,
            requested: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_error(error: AppError) -> Self {
        let fetcher = Self::new("");
        *fetcher.error.lock().unwrap() = Some(error);
        fetcher
    }

    pub fn with_route(self, url: &str, response: Result<String, AppError>) -> Self {
        self.routes
            .lock()
            .unwrap()
            .insert(url.to_string(), response);
        self
    }

    /// Sleep before answering every request.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// URLs requested so far, in call order.
    pub fn requested(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }

    async fn respond(&self, url: &str) -> Result<String, AppError> {
        self.requested.lock().unwrap().push(url.to_string());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        if let Some(e) = self.error.lock().unwrap().take() {
            return Err(e);
        }
        if let Some(response) = self.routes.lock().unwrap().remove(url) {
            return response;
        }
        Ok(self.body.clone())
    }
}

impl Fetcher for MockFetcher {
    async fn fetch(&self, url: &str) -> Result<String, AppError> {
        self.respond(url).await
    }

    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, AppError> {
        self.respond(url).await.map(String::into_bytes)
    }
}

// ---------------------------------------------------------------------------
// MockDocumentReader
// ---------------------------------------------------------------------------

/// Mock reader that returns a fixed document and records the paths it read.
#[derive(Clone)]
pub struct MockDocumentReader {
    document: ParsedDocument,
    error: Arc<Mutex<Option<AppError>>>,
    delay: Option<Duration>,
    paths: Arc<Mutex<Vec<PathBuf>>>,
}

impl MockDocumentReader {
    pub fn new(document: ParsedDocument) -> Self {
        Self {
            document,
            error: Arc::new(Mutex::new(None)),
            delay: None,
            paths: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Reader that returns a document with no pages.
    pub fn empty() -> Self {
        Self::new(ParsedDocument::default())
    }

    pub fn with_error(error: AppError) -> Self {
        let reader = Self::empty();
        *reader.error.lock().unwrap() = Some(error);
        reader
    }

    /// Block the calling thread before reading.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn paths(&self) -> Vec<PathBuf> {
        self.paths.lock().unwrap().clone()
    }
}

impl DocumentReader for MockDocumentReader {
    fn read_pages(&self, path: &Path) -> Result<ParsedDocument, AppError> {
        self.paths.lock().unwrap().push(path.to_path_buf());
        if !path.exists() {
            return Err(AppError::DocumentError(format!(
                "{} does not exist",
                path.display()
            )));
        }
        if let Some(delay) = self.delay {
            std::thread::sleep(delay);
        }
        if let Some(e) = self.error.lock().unwrap().take() {
            return Err(e);
        }
        Ok(self.document.clone())
    }
}

// ---------------------------------------------------------------------------
// MockTagger
// ---------------------------------------------------------------------------

/// Mock tagger that ignores its input and returns a fixed tagged document.
#[derive(Clone)]
pub struct MockTagger {
    document: TaggedDocument,
    panics: bool,
    texts: Arc<Mutex<Vec<String>>>,
}

impl MockTagger {
    pub fn new(document: TaggedDocument) -> Self {
        Self {
            document,
            panics: false,
            texts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Tagger that panics on every call.
    pub fn panicking() -> Self {
        Self {
            panics: true,
            ..Self::new(TaggedDocument::default())
        }
    }

    /// Texts passed to `tag`, in call order.
    pub fn texts(&self) -> Vec<String> {
        self.texts.lock().unwrap().clone()
    }
}

impl Tagger for MockTagger {
    fn tag(&self, text: &str) -> Result<TaggedDocument, AppError> {
        if self.panics {
            panic!("tagger backend crashed");
        }
        self.texts.lock().unwrap().push(text.to_string());
        Ok(self.document.clone())
    }
}

// ---------------------------------------------------------------------------
// MockReporter
// ---------------------------------------------------------------------------

/// Mock pipeline reporter that records event labels.
#[derive(Default, Clone)]
pub struct MockReporter {
    events: Arc<Mutex<Vec<String>>>,
}

impl MockReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }
}

impl PipelineReporter for MockReporter {
    fn report(&self, event: PipelineEvent<'_>) {
        let label = match &event {
            PipelineEvent::Validated { .. } => "Validated",
            PipelineEvent::ValidationFailed { .. } => "ValidationFailed",
            PipelineEvent::Skipped { .. } => "Skipped",
            PipelineEvent::TaskStarted { .. } => "TaskStarted",
            PipelineEvent::Extracted { .. } => "Extracted",
            PipelineEvent::Analysed { .. } => "Analysed",
            PipelineEvent::TaskFailed { .. } => "TaskFailed",
            PipelineEvent::Finished { .. } => "Finished",
        };
        self.events.lock().unwrap().push(label.to_string());
    }
}
