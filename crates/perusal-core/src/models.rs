use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::AppError;

/// Category of a reading resource.
///
/// Decides both the validation rule and the extraction strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Blog,
    Substack,
    ArxivPdf,
    ArxivHtml,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 4] = [
        ResourceKind::Blog,
        ResourceKind::Substack,
        ResourceKind::ArxivPdf,
        ResourceKind::ArxivHtml,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Blog => "blog",
            ResourceKind::Substack => "substack",
            ResourceKind::ArxivPdf => "arxiv_pdf",
            ResourceKind::ArxivHtml => "arxiv_html",
        }
    }

    /// Whether the kind gets complexity scoring. Blogs are passed through.
    pub fn is_scored(&self) -> bool {
        !matches!(self, ResourceKind::Blog)
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ResourceKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "blog" => Ok(ResourceKind::Blog),
            "substack" => Ok(ResourceKind::Substack),
            "arxiv_pdf" => Ok(ResourceKind::ArxivPdf),
            "arxiv_html" => Ok(ResourceKind::ArxivHtml),
            _ => Err(AppError::ValidationError("invalid resource type".into())),
        }
    }
}

/// Discrete multiplier applied to the base reading time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Complexity {
    Low,
    Moderate,
    High,
}

impl Complexity {
    pub fn factor(&self) -> f64 {
        match self {
            Complexity::Low => 1.0,
            Complexity::Moderate => 1.5,
            Complexity::High => 2.0,
        }
    }
}

/// One reading resource and the state derived from it.
#[derive(Debug, Clone, PartialEq)]
pub struct ReadingResource {
    pub kind: ResourceKind,
    pub raw_url: String,
    /// Set only once validation for `kind` has succeeded.
    pub validated_url: Option<Url>,
    /// Text fragments in extraction order. For documents, one entry per
    /// page with text; blank pages are skipped, so an index is not a page
    /// number.
    pub raw_content: Vec<String>,
    pub title: String,
    pub word_count: usize,
    pub complexity: Option<Complexity>,
    /// Set only after both extraction and analysis succeeded.
    pub read_time: Option<Duration>,
}

impl ReadingResource {
    pub fn new(kind: ResourceKind, raw_url: impl Into<String>) -> Self {
        Self {
            kind,
            raw_url: raw_url.into(),
            validated_url: None,
            raw_content: Vec::new(),
            title: String::new(),
            word_count: 0,
            complexity: None,
            read_time: None,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.validated_url.is_some()
    }

    pub fn is_extracted(&self) -> bool {
        !self.raw_content.is_empty()
    }
}

/// A resource submitted to the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceRequest {
    pub kind: ResourceKind,
    pub url: String,
}

impl ResourceRequest {
    pub fn new(kind: ResourceKind, url: impl Into<String>) -> Self {
        Self {
            kind,
            url: url.into(),
        }
    }
}

/// URL lists grouped by kind, as collected by the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceBatch {
    pub blog: Vec<String>,
    pub substack: Vec<String>,
    pub arxiv_pdf: Vec<String>,
    pub arxiv_html: Vec<String>,
}

impl ResourceBatch {
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn len(&self) -> usize {
        self.blog.len() + self.substack.len() + self.arxiv_pdf.len() + self.arxiv_html.len()
    }

    /// Flatten into requests: blogs, then Substack, then arXiv PDF, then arXiv HTML.
    pub fn into_requests(self) -> Vec<ResourceRequest> {
        let groups = [
            (ResourceKind::Blog, self.blog),
            (ResourceKind::Substack, self.substack),
            (ResourceKind::ArxivPdf, self.arxiv_pdf),
            (ResourceKind::ArxivHtml, self.arxiv_html),
        ];

        groups
            .into_iter()
            .flat_map(|(kind, urls)| {
                urls.into_iter()
                    .map(move |url| ResourceRequest::new(kind, url))
            })
            .collect()
    }
}

/// Pipeline stage an error was raised in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorKind {
    Validation,
    Extraction,
    Analysis,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorKind::Validation => "validation",
            ErrorKind::Extraction => "extraction",
            ErrorKind::Analysis => "analysis",
        };
        write!(f, "{s}")
    }
}

/// An error reported for one resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceError {
    pub kind: ErrorKind,
    pub url: String,
    pub message: String,
}

impl ResourceError {
    pub fn new(kind: ErrorKind, url: impl Into<String>, error: &AppError) -> Self {
        Self {
            kind,
            url: url.into(),
            message: error.to_string(),
        }
    }
}

impl fmt::Display for ResourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.kind, self.url, self.message)
    }
}

/// Everything the pipeline produced.
#[derive(Debug, Clone, Default)]
pub struct PipelineResult {
    /// One entry per request, in request order.
    pub resources: Vec<ReadingResource>,
    /// Collected errors, in no particular order.
    pub errors: Vec<ResourceError>,
}

impl PipelineResult {
    pub fn errors_of(&self, kind: ErrorKind) -> impl Iterator<Item = &ResourceError> {
        self.errors.iter().filter(move |e| e.kind == kind)
    }

    /// Resources that carry a reading time.
    pub fn analysed(&self) -> impl Iterator<Item = &ReadingResource> {
        self.resources.iter().filter(|r| r.read_time.is_some())
    }
}

/// One token with its Penn Treebank part-of-speech tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub text: String,
    pub tag: String,
}

impl Token {
    pub fn new(text: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            tag: tag.into(),
        }
    }

    /// Verbs, subordinating conjunctions/prepositions and wh-words.
    pub fn deepens_clause(&self) -> bool {
        self.tag.starts_with("VB") || matches!(self.tag.as_str(), "IN" | "WDT" | "WP" | "WRB")
    }

    pub fn ends_sentence(&self) -> bool {
        matches!(self.tag.as_str(), "." | "!" | "?")
    }
}

/// Output of a [`Tagger`](crate::traits::Tagger).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaggedDocument {
    pub tokens: Vec<Token>,
    pub sentence_count: usize,
}

/// Text pulled out of a downloaded document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedDocument {
    pub title: Option<String>,
    /// One entry per page, in page order, blank pages included.
    pub pages: Vec<String>,
}
