//! Kind-specific content extraction.
//!
//! HTML resources are fetched and reduced to the text of a fixed set of
//! elements. arXiv PDFs are downloaded into the staging directory and read
//! page by page through a [`DocumentReader`].

use scraper::{Html, Selector};

use crate::error::AppError;
use crate::models::{ReadingResource, ResourceKind};
use crate::staging::StagingConfig;
use crate::traits::{DocumentReader, Fetcher};

/// Text fragments and title pulled from one resource.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageContent {
    pub title: String,
    pub fragments: Vec<String>,
}

/// CSS selectors used for one kind of HTML page.
struct HtmlStrategy {
    content: &'static str,
    /// Tried in order; the first selector with a non-empty match wins.
    titles: &'static [&'static str],
}

fn html_strategy(kind: ResourceKind) -> Result<HtmlStrategy, AppError> {
    match kind {
        ResourceKind::Blog => Ok(HtmlStrategy {
            content: "h1, p, span",
            titles: &["title", "h1"],
        }),
        ResourceKind::Substack | ResourceKind::ArxivHtml => Ok(HtmlStrategy {
            content: "p",
            titles: &[
                "h1.post-title, h1.article-title, h1.ltx_title_document",
                "title",
            ],
        }),
        ResourceKind::ArxivPdf => Err(AppError::ExtractionError(
            "arxiv_pdf resources are documents, not HTML pages".into(),
        )),
    }
}

fn selector(css: &str) -> Result<Selector, AppError> {
    Selector::parse(css)
        .map_err(|e| AppError::ExtractionError(format!("invalid selector '{css}': {e}")))
}

/// Collapse runs of whitespace into single spaces.
fn normalize(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Select title and content fragments from an HTML page.
pub fn select_page_content(kind: ResourceKind, html: &str) -> Result<PageContent, AppError> {
    let strategy = html_strategy(kind)?;
    let document = Html::parse_document(html);

    let content = selector(strategy.content)?;
    let fragments = document
        .select(&content)
        .map(|el| normalize(&el.text().collect::<String>()))
        .filter(|text| !text.is_empty())
        .collect();

    let mut title = String::new();
    for css in strategy.titles {
        let sel = selector(css)?;
        if let Some(found) = document
            .select(&sel)
            .map(|el| normalize(&el.text().collect::<String>()))
            .find(|text| !text.is_empty())
        {
            title = found;
            break;
        }
    }

    Ok(PageContent { title, fragments })
}

/// Turns a validated resource into raw text using the strategy for its kind.
#[derive(Clone)]
pub struct ContentExtractor<F, D>
where
    F: Fetcher,
    D: DocumentReader,
{
    fetcher: F,
    reader: D,
    staging: StagingConfig,
}

impl<F, D> ContentExtractor<F, D>
where
    F: Fetcher,
    D: DocumentReader + 'static,
{
    pub fn new(fetcher: F, reader: D, staging: StagingConfig) -> Self {
        Self {
            fetcher,
            reader,
            staging,
        }
    }

    pub fn staging(&self) -> &StagingConfig {
        &self.staging
    }

    /// Populate `raw_content` and `title` on the resource.
    ///
    /// The resource is left untouched on failure.
    pub async fn extract(&self, resource: &mut ReadingResource) -> Result<(), AppError> {
        let url = resource
            .validated_url
            .as_ref()
            .ok_or_else(|| AppError::ExtractionError("resource has no validated URL".into()))?
            .to_string();

        let content = match resource.kind {
            ResourceKind::Blog | ResourceKind::Substack | ResourceKind::ArxivHtml => {
                self.extract_page(resource.kind, &url).await?
            }
            ResourceKind::ArxivPdf => self.extract_document(&url).await?,
        };

        tracing::info!(
            %url,
            kind = %resource.kind,
            fragments = content.fragments.len(),
            "Extracted content"
        );

        resource.raw_content = content.fragments;
        resource.title = content.title;
        Ok(())
    }

    async fn extract_page(&self, kind: ResourceKind, url: &str) -> Result<PageContent, AppError> {
        // A failed fetch returns here, before any selector work can report
        // its own error.
        let html = self.fetcher.fetch(url).await?;
        tracing::debug!(%url, bytes = html.len(), "Fetched page");

        select_page_content(kind, &html)
    }

    async fn extract_document(&self, url: &str) -> Result<PageContent, AppError> {
        let bytes = self.fetcher.fetch_bytes(url).await?;
        tracing::debug!(%url, bytes = bytes.len(), "Downloaded document");

        let staged = self.staging.stage(&bytes).await?;

        let reader = self.reader.clone();
        let path = staged.path().to_path_buf();
        let parsed = tokio::task::spawn_blocking(move || reader.read_pages(&path)).await;
        staged.release().await;

        let parsed = parsed
            .map_err(|e| AppError::DocumentError(format!("document reader task failed: {e}")))??;

        // Blank pages carry no words; fragments stop lining up with page
        // numbers once one is skipped.
        let fragments: Vec<String> = parsed
            .pages
            .iter()
            .map(|page| page.trim())
            .filter(|page| !page.is_empty())
            .map(str::to_string)
            .collect();

        if fragments.is_empty() {
            return Err(AppError::ExtractionError(
                "document has no extractable text".into(),
            ));
        }

        Ok(PageContent {
            title: parsed.title.map(|t| normalize(&t)).unwrap_or_default(),
            fragments,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ParsedDocument;
    use crate::testutil::*;

    const BLOG_HTML: &str = r#"<html><head><title>My Essay</title></head><body>
        <h1>Heading</h1>
        <p>First   paragraph.</p>
        <div><span>Inline note</span></div>
        <p>   </p>
        <li>ignored item</li>
    </body></html>"#;

    const SUBSTACK_HTML: &str = r#"<html><head><title>Site title</title></head><body>
        <h1 class="post-title">The Post</h1>
        <h2>Subtitle not captured</h2>
        <p>Body one.</p><span>not captured</span><p>Body two.</p>
    </body></html>"#;

    fn extractor(
        fetcher: MockFetcher,
        reader: MockDocumentReader,
        dir: &std::path::Path,
    ) -> ContentExtractor<MockFetcher, MockDocumentReader> {
        ContentExtractor::new(fetcher, reader, StagingConfig::new(dir))
    }

    fn validated(kind: ResourceKind, url: &str) -> ReadingResource {
        let mut r = ReadingResource::new(kind, url);
        r.validate().unwrap();
        r
    }

    #[test]
    fn test_blog_selects_headings_paragraphs_and_spans() {
        let content = select_page_content(ResourceKind::Blog, BLOG_HTML).unwrap();
        assert_eq!(content.title, "My Essay");
        assert_eq!(
            content.fragments,
            vec!["Heading", "First paragraph.", "Inline note"]
        );
    }

    #[test]
    fn test_blog_title_falls_back_to_first_h1() {
        let html = "<html><body><h1>Only heading</h1><h1>Second</h1><p>x</p></body></html>";
        let content = select_page_content(ResourceKind::Blog, html).unwrap();
        assert_eq!(content.title, "Only heading");
    }

    #[test]
    fn test_substack_selects_paragraphs_only() {
        let content = select_page_content(ResourceKind::Substack, SUBSTACK_HTML).unwrap();
        assert_eq!(content.title, "The Post");
        assert_eq!(content.fragments, vec!["Body one.", "Body two."]);
    }

    #[test]
    fn test_arxiv_html_title_from_ltx_heading() {
        let html = r#"<html><head><title>[2401.00001] Paper</title></head><body>
            <h1 class="ltx_title ltx_title_document">Attention Is Enough</h1>
            <p>Abstract text.</p></body></html>"#;
        let content = select_page_content(ResourceKind::ArxivHtml, html).unwrap();
        assert_eq!(content.title, "Attention Is Enough");
        assert_eq!(content.fragments, vec!["Abstract text."]);
    }

    #[test]
    fn test_title_falls_back_to_title_element() {
        let html = "<html><head><title>Fallback</title></head><body><p>x</p></body></html>";
        let content = select_page_content(ResourceKind::Substack, html).unwrap();
        assert_eq!(content.title, "Fallback");
    }

    #[test]
    fn test_pdf_kind_has_no_html_strategy() {
        let err = select_page_content(ResourceKind::ArxivPdf, "<p>x</p>").unwrap_err();
        assert!(matches!(err, AppError::ExtractionError(_)));
    }

    #[tokio::test]
    async fn test_extract_html_populates_resource() {
        let tmp = tempfile::tempdir().unwrap();
        let ex = extractor(
            MockFetcher::new(SUBSTACK_HTML),
            MockDocumentReader::empty(),
            tmp.path(),
        );
        let mut r = validated(ResourceKind::Substack, "https://foo.substack.com/post/x");

        ex.extract(&mut r).await.unwrap();
        assert_eq!(r.title, "The Post");
        assert_eq!(r.raw_content.len(), 2);
    }

    #[tokio::test]
    async fn test_unvalidated_resource_fails_extraction() {
        let tmp = tempfile::tempdir().unwrap();
        let fetcher = MockFetcher::new(BLOG_HTML);
        let ex = extractor(fetcher.clone(), MockDocumentReader::empty(), tmp.path());
        let mut r = ReadingResource::new(ResourceKind::Substack, "https://foo.substack.com/about");

        let err = ex.extract(&mut r).await.unwrap_err();
        assert!(err.to_string().contains("no validated URL"));
        assert!(fetcher.requested().is_empty());
    }

    #[tokio::test]
    async fn test_fetch_error_propagates_and_leaves_resource_untouched() {
        let tmp = tempfile::tempdir().unwrap();
        let ex = extractor(
            MockFetcher::with_error(AppError::HttpError("HTTP 503".into())),
            MockDocumentReader::empty(),
            tmp.path(),
        );
        let mut r = validated(ResourceKind::Blog, "https://example.com/essay");

        let err = ex.extract(&mut r).await.unwrap_err();
        assert!(matches!(err, AppError::HttpError(_)));
        assert!(r.raw_content.is_empty());
        assert!(r.title.is_empty());
    }

    #[tokio::test]
    async fn test_pdf_pages_are_collected_in_order() {
        let tmp = tempfile::tempdir().unwrap();
        let reader = MockDocumentReader::new(ParsedDocument {
            title: Some("A  Paper".into()),
            pages: vec!["Page one.".into(), "  ".into(), "Page three.".into()],
        });
        let ex = extractor(MockFetcher::new("%PDF-1.5"), reader.clone(), tmp.path());
        let mut r = validated(ResourceKind::ArxivPdf, "https://arxiv.org/pdf/1234");

        ex.extract(&mut r).await.unwrap();
        assert_eq!(r.title, "A Paper");
        assert_eq!(r.raw_content, vec!["Page one.", "Page three."]);

        // The reader saw the staged file, which was removed afterwards.
        let seen = reader.paths();
        assert_eq!(seen.len(), 1);
        assert!(seen[0].starts_with(tmp.path()));
        assert!(!seen[0].exists());
    }

    #[tokio::test]
    async fn test_pdf_blank_leading_page_shifts_fragments() {
        let tmp = tempfile::tempdir().unwrap();
        let reader = MockDocumentReader::new(ParsedDocument {
            title: None,
            pages: vec!["\n\t ".into(), "Body on page two.".into()],
        });
        let ex = extractor(MockFetcher::new("%PDF-1.5"), reader, tmp.path());
        let mut r = validated(ResourceKind::ArxivPdf, "https://arxiv.org/pdf/1234");

        ex.extract(&mut r).await.unwrap();
        assert_eq!(r.raw_content, vec!["Body on page two."]);
        assert!(r.title.is_empty());
    }

    #[tokio::test]
    async fn test_pdf_without_text_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let reader = MockDocumentReader::new(ParsedDocument {
            title: None,
            pages: vec![" ".into()],
        });
        let ex = extractor(MockFetcher::new("%PDF-1.5"), reader, tmp.path());
        let mut r = validated(ResourceKind::ArxivPdf, "https://arxiv.org/pdf/1234");

        let err = ex.extract(&mut r).await.unwrap_err();
        assert!(matches!(err, AppError::ExtractionError(_)));
        assert!(r.raw_content.is_empty());
    }

    #[tokio::test]
    async fn test_pdf_reader_error_propagates() {
        let tmp = tempfile::tempdir().unwrap();
        let ex = extractor(
            MockFetcher::new("garbage"),
            MockDocumentReader::with_error(AppError::DocumentError("invalid file header".into())),
            tmp.path(),
        );
        let mut r = validated(ResourceKind::ArxivPdf, "https://arxiv.org/pdf/1234");

        let err = ex.extract(&mut r).await.unwrap_err();
        assert!(matches!(err, AppError::DocumentError(_)));
    }

    #[tokio::test]
    async fn test_pdf_download_error_skips_staging() {
        let tmp = tempfile::tempdir().unwrap();
        let staging = tmp.path().join("staging");
        let ex = ContentExtractor::new(
            MockFetcher::with_error(AppError::NetworkError("connection refused".into())),
            MockDocumentReader::empty(),
            StagingConfig::new(&staging),
        );
        let mut r = validated(ResourceKind::ArxivPdf, "https://arxiv.org/pdf/1234");

        let err = ex.extract(&mut r).await.unwrap_err();
        assert!(matches!(err, AppError::NetworkError(_)));
        assert!(!staging.exists());
    }
}
