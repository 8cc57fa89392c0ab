use std::future::Future;
use std::path::Path;

use crate::error::AppError;
use crate::models::{ParsedDocument, TaggedDocument};

/// Retrieves remote content over HTTP.
pub trait Fetcher: Send + Sync + Clone {
    /// Fetch a page body as text.
    fn fetch(&self, url: &str) -> impl Future<Output = Result<String, AppError>> + Send;

    /// Fetch a binary body (PDF downloads).
    fn fetch_bytes(&self, url: &str) -> impl Future<Output = Result<Vec<u8>, AppError>> + Send;
}

/// Reads the text of a document stored on disk, page by page.
///
/// Implementations are synchronous; callers run them on a blocking thread.
pub trait DocumentReader: Send + Sync + Clone {
    /// Returns every page's text in page order, failing on the first page
    /// that cannot be read. Pages without text are returned as empty
    /// strings; dropping them is left to the caller.
    fn read_pages(&self, path: &Path) -> Result<ParsedDocument, AppError>;
}

/// Tokenizer, sentence segmenter and part-of-speech tagger.
///
/// Tags follow the Penn Treebank tag set; sentence-final punctuation is
/// tagged `.`.
pub trait Tagger: Send + Sync + Clone {
    fn tag(&self, text: &str) -> Result<TaggedDocument, AppError>;
}
