use std::path::Path;
use tracing::warn;

use crate::{KnowledgeError, Result};

/// Extract text from a PDF page by page, in page order. Pages whose text
/// cannot be decoded contribute nothing rather than failing the document.
pub fn extract(path: &Path) -> Result<String> {
    let doc = lopdf::Document::load(path)
        .map_err(|e| KnowledgeError::Extraction(format!("failed to load PDF: {e}")))?;

    let mut out = String::new();
    for (page_number, _) in doc.get_pages() {
        match doc.extract_text(&[page_number]) {
            Ok(text) => out.push_str(&text),
            Err(e) => {
                warn!(
                    "No extractable text on page {} of {}: {}",
                    page_number,
                    path.display(),
                    e
                );
            }
        }
        out.push('\n');
    }

    Ok(out)
}
