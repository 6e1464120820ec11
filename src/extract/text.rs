use std::path::Path;

use crate::Result;

/// Fallback extractor: read the file as text, replacing any invalid UTF-8
/// sequences rather than failing.
pub fn extract(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
