//! Format detection and text extraction for ingested files.
//!
//! Each supported format has its own backend; every backend failure is
//! surfaced as a single `KnowledgeError::Extraction` so callers never need
//! to know which backend was involved.

#[cfg(test)]
mod tests;

mod docx;
mod image;
mod pdf;
mod text;

use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::debug;

use crate::{KnowledgeError, Result};

/// Coarse classification of a source file. New formats are added by
/// extending this set and dispatching in `extract_text`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Pdf,
    WordDocument,
    Image,
    Other,
}

/// Classify a file from its leading bytes, falling back to the extension
/// for content without a recognizable signature. Fails only when the path
/// does not exist.
pub fn detect_kind(path: &Path) -> Result<FileKind> {
    if !path.is_file() {
        return Err(KnowledgeError::NotFound(path.display().to_string()));
    }

    let mut header = [0u8; 16];
    let read = File::open(path)?.read(&mut header)?;

    Ok(classify(&header[..read], path))
}

fn classify(header: &[u8], path: &Path) -> FileKind {
    if header.starts_with(b"%PDF") {
        return FileKind::Pdf;
    }

    if header.starts_with(&[0x50, 0x4B, 0x03, 0x04]) {
        // A zip container is a Word document only if it carries the
        // WordprocessingML part.
        if docx::is_docx(path) {
            return FileKind::WordDocument;
        }
        return FileKind::Other;
    }

    if is_image_signature(header) {
        return FileKind::Image;
    }

    match mime_guess::from_path(path).first() {
        Some(mime) if mime == mime_guess::mime::APPLICATION_PDF => FileKind::Pdf,
        Some(mime) if mime.type_() == mime_guess::mime::IMAGE => FileKind::Image,
        Some(mime) if is_word_mime(mime.essence_str()) => FileKind::WordDocument,
        _ => FileKind::Other,
    }
}

fn is_word_mime(essence: &str) -> bool {
    essence == "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
        || essence == "application/msword"
}

fn is_image_signature(header: &[u8]) -> bool {
    const PNG: &[u8] = &[0x89, b'P', b'N', b'G'];
    const JPEG: &[u8] = &[0xFF, 0xD8, 0xFF];
    const TIFF_LE: &[u8] = &[b'I', b'I', 0x2A, 0x00];
    const TIFF_BE: &[u8] = &[b'M', b'M', 0x00, 0x2A];

    header.starts_with(PNG)
        || header.starts_with(JPEG)
        || header.starts_with(b"GIF8")
        || header.starts_with(b"BM")
        || header.starts_with(TIFF_LE)
        || header.starts_with(TIFF_BE)
        || (header.len() >= 12 && header.starts_with(b"RIFF") && &header[8..12] == b"WEBP")
}

/// Extract plain text from a file, dispatching on its detected kind.
///
/// Side effects are limited to reading the source file (and, for images,
/// invoking the OCR binary).
pub fn extract_text(path: &Path) -> Result<String> {
    let kind = detect_kind(path)?;
    debug!("Extracting text from {} as {:?}", path.display(), kind);

    let result = match kind {
        FileKind::Pdf => pdf::extract(path),
        FileKind::WordDocument => docx::extract(path),
        FileKind::Image => image::extract(path),
        FileKind::Other => text::extract(path),
    };

    result.map_err(|e| match e {
        KnowledgeError::Extraction(_) | KnowledgeError::NotFound(_) => e,
        other => KnowledgeError::Extraction(other.to_string()),
    })
}
