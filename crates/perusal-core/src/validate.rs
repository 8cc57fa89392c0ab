//! Per-kind URL validation.
//!
//! Validation is pure string work: it parses the URL and checks the host
//! and path against the rule for the declared [`ResourceKind`]. Nothing
//! here touches the network.

use url::Url;

use crate::error::AppError;
use crate::models::{ReadingResource, ResourceKind};

const SUBSTACK_HOST: &str = "substack.com";
const ARXIV_HOST: &str = "arxiv.org";

/// Validate `raw_url` against the rule for `kind`.
///
/// | kind         | host                      | path contains |
/// |--------------|---------------------------|---------------|
/// | `Blog`       | any                       | -             |
/// | `Substack`   | contains `substack.com`   | `post`        |
/// | `ArxivPdf`   | exactly `arxiv.org`       | `pdf`         |
/// | `ArxivHtml`  | exactly `arxiv.org`       | `html`        |
pub fn validate(kind: ResourceKind, raw_url: &str) -> Result<Url, AppError> {
    let url = Url::parse(raw_url.trim())
        .map_err(|e| AppError::ValidationError(format!("malformed URL: {e}")))?;

    let host = url.host_str().unwrap_or_default();
    let path = url.path();

    let accepted = match kind {
        ResourceKind::Blog => true,
        ResourceKind::Substack => host.contains(SUBSTACK_HOST) && path.contains("post"),
        ResourceKind::ArxivPdf => host == ARXIV_HOST && path.contains("pdf"),
        ResourceKind::ArxivHtml => host == ARXIV_HOST && path.contains("html"),
    };

    if accepted {
        Ok(url)
    } else {
        Err(AppError::ValidationError(rejection_message(kind).into()))
    }
}

fn rejection_message(kind: ResourceKind) -> &'static str {
    match kind {
        ResourceKind::Blog => "invalid blog URL",
        ResourceKind::Substack => "invalid Substack URL",
        ResourceKind::ArxivPdf => "invalid arXiv PDF URL",
        ResourceKind::ArxivHtml => "invalid arXiv HTML URL",
    }
}

impl ReadingResource {
    /// Validate the raw URL for this resource's kind and record the result.
    ///
    /// On failure `validated_url` is left unset.
    pub fn validate(&mut self) -> Result<&Url, AppError> {
        let url = validate(self.kind, &self.raw_url)?;
        Ok(self.validated_url.insert(url))
    }
}
