use std::io::ErrorKind;
use std::path::Path;
use std::process::Command;

use crate::{KnowledgeError, Result};

/// OCR an image by validating it with the image decoder and then handing
/// it to the `tesseract` binary on the PATH.
pub fn extract(path: &Path) -> Result<String> {
    // Reject files that merely look like images before spawning OCR.
    image::ImageReader::open(path)?
        .with_guessed_format()?
        .decode()
        .map_err(|e| KnowledgeError::Extraction(format!("image decode failed: {e}")))?;

    let output = Command::new("tesseract")
        .arg(path)
        .arg("stdout")
        .output()
        .map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                KnowledgeError::Extraction(
                    "tesseract OCR binary not found on PATH; install tesseract-ocr".to_string(),
                )
            } else {
                KnowledgeError::Extraction(format!("failed to run tesseract: {e}"))
            }
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(KnowledgeError::Extraction(format!(
            "tesseract exited with {}: {}",
            output.status,
            stderr.trim()
        )));
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}
