use std::path::Path;

use lopdf::{Document, Object};
use perusal_core::error::AppError;
use perusal_core::models::ParsedDocument;
use perusal_core::traits::DocumentReader;

/// PDF text extraction using lopdf.
///
/// Pages are read in page-number order. The first page whose text stream
/// cannot be decoded aborts the whole document.
#[derive(Debug, Default, Clone, Copy)]
pub struct LopdfReader;

impl LopdfReader {
    pub fn new() -> Self {
        Self
    }
}

impl DocumentReader for LopdfReader {
    fn read_pages(&self, path: &Path) -> Result<ParsedDocument, AppError> {
        let doc = Document::load(path).map_err(|e| {
            AppError::DocumentError(format!("Failed to open {}: {e}", path.display()))
        })?;

        let pages = doc.get_pages();
        if pages.is_empty() {
            return Err(AppError::DocumentError(format!(
                "{} has no pages",
                path.display()
            )));
        }

        let mut texts = Vec::with_capacity(pages.len());
        for &page_number in pages.keys() {
            let text = doc.extract_text(&[page_number]).map_err(|e| {
                AppError::DocumentError(format!("Failed to extract page {page_number}: {e}"))
            })?;
            texts.push(text);
        }

        tracing::debug!(path = %path.display(), pages = texts.len(), "Read document");

        Ok(ParsedDocument {
            title: document_title(&doc),
            pages: texts,
        })
    }
}

/// `/Title` from the trailer's `/Info` dictionary, if any.
fn document_title(doc: &Document) -> Option<String> {
    let info = doc.trailer.get(b"Info").ok()?;
    let (_, info) = doc.dereference(info).ok()?;
    let title = info.as_dict().ok()?.get(b"Title").ok()?;
    let (_, title) = doc.dereference(title).ok()?;

    match title {
        Object::String(bytes, _) => Some(decode_text_string(bytes)),
        _ => None,
    }
    .map(|t| t.trim().to_string())
    .filter(|t| !t.is_empty())
}

/// PDF text strings are UTF-16BE with a byte-order mark, or single-byte
/// PDFDocEncoding (read here as Latin-1).
fn decode_text_string(bytes: &[u8]) -> String {
    match bytes {
        [0xFE, 0xFF, rest @ ..] => {
            let units = rest
                .chunks_exact(2)
                .map(|pair| u16::from_be_bytes([pair[0], pair[1]]));
            char::decode_utf16(units)
                .map(|c| c.unwrap_or(char::REPLACEMENT_CHARACTER))
                .collect()
        }
        _ => bytes.iter().map(|&b| char::from(b)).collect(),
    }
}
