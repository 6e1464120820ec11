use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::{KnowledgeError, Result};

const DOCUMENT_PART: &str = "word/document.xml";

/// Whether a zip container carries the WordprocessingML document part.
pub(super) fn is_docx(path: &Path) -> bool {
    let Ok(file) = File::open(path) else {
        return false;
    };
    let Ok(mut archive) = zip::ZipArchive::new(file) else {
        return false;
    };
    archive.by_name(DOCUMENT_PART).is_ok()
}

/// Extract the visible text of a .docx file.
pub fn extract(path: &Path) -> Result<String> {
    let file = File::open(path)?;
    let mut archive = zip::ZipArchive::new(file)
        .map_err(|e| KnowledgeError::Extraction(format!("failed to open Word document: {e}")))?;

    let mut xml = String::new();
    archive
        .by_name(DOCUMENT_PART)
        .map_err(|e| KnowledgeError::Extraction(format!("missing {DOCUMENT_PART}: {e}")))?
        .read_to_string(&mut xml)?;

    Ok(plain_text_from_document_xml(&xml))
}

/// Pull visible text out of WordprocessingML: the contents of `<w:t>` runs,
/// with paragraph ends becoming newlines and explicit tabs and breaks
/// preserved. Everything else (styling, tables markup, properties) is
/// dropped.
fn plain_text_from_document_xml(xml: &str) -> String {
    let mut out = String::new();
    let mut cursor = 0usize;

    while let Some(open_rel) = xml[cursor..].find('<') {
        let open = cursor + open_rel;
        let Some(close_rel) = xml[open..].find('>') else {
            break;
        };
        let close = open + close_rel;
        let tag = &xml[open + 1..close];
        cursor = close + 1;

        if let Some(closing) = tag.strip_prefix('/') {
            if closing.trim() == "w:p" {
                out.push('\n');
            }
            continue;
        }

        let self_closing = tag.ends_with('/');
        let name = tag
            .split([' ', '/', '\t', '\r', '\n'])
            .next()
            .unwrap_or_default();

        match name {
            "w:t" if !self_closing => {
                if let Some(end_rel) = xml[cursor..].find('<') {
                    unescape_into(&xml[cursor..cursor + end_rel], &mut out);
                    cursor += end_rel;
                }
            }
            "w:tab" => out.push('\t'),
            "w:br" | "w:cr" => out.push('\n'),
            _ => {}
        }
    }

    out
}

/// Decode the XML character references that WordprocessingML emits.
fn unescape_into(text: &str, out: &mut String) {
    let mut rest = text;
    while let Some(pos) = rest.find('&') {
        out.push_str(&rest[..pos]);
        rest = &rest[pos..];

        let Some(end) = rest.find(';') else {
            out.push_str(rest);
            return;
        };

        match &rest[..=end] {
            "&lt;" => out.push('<'),
            "&gt;" => out.push('>'),
            "&amp;" => out.push('&'),
            "&quot;" => out.push('"'),
            "&apos;" => out.push('\''),
            entity => {
                let decoded = entity
                    .strip_prefix("&#x")
                    .or_else(|| entity.strip_prefix("&#X"))
                    .and_then(|digits| u32::from_str_radix(&digits[..digits.len() - 1], 16).ok())
                    .or_else(|| {
                        entity
                            .strip_prefix("&#")
                            .and_then(|digits| digits[..digits.len() - 1].parse::<u32>().ok())
                    })
                    .and_then(char::from_u32);
                match decoded {
                    Some(ch) => out.push(ch),
                    None => out.push_str(entity),
                }
            }
        }
        rest = &rest[end + 1..];
    }
    out.push_str(rest);
}

#[cfg(test)]
pub(super) fn text_from_xml(xml: &str) -> String {
    plain_text_from_document_xml(xml)
}
