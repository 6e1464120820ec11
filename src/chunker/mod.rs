#[cfg(test)]
mod tests;

use tracing::debug;

/// Structural break points tried in order, most coarse first. A separator
/// stays attached to the text that follows it, so headings begin chunks.
const SEPARATORS: &[&str] = &[
    "\n# ", "\n## ", "\n### ", "\n#### ", "\n##### ", "\n###### ", "\n```", "\n\n", "\n", " ",
];

/// Splits normalized text into overlapping chunks along markdown-like
/// boundaries.
///
/// Sizes are measured in characters. Consecutive chunks overlap by up to
/// `chunk_overlap` characters of the preceding chunk's tail, trimmed where
/// necessary so that no chunk exceeds `chunk_size`.
#[derive(Debug, Clone)]
pub struct TextSplitter {
    chunk_size: usize,
    chunk_overlap: usize,
}

impl TextSplitter {
    /// Create a splitter. `chunk_overlap` must be smaller than `chunk_size`;
    /// config validation enforces this before a splitter is built.
    #[inline]
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        debug_assert!(chunk_overlap < chunk_size);
        Self {
            chunk_size,
            chunk_overlap,
        }
    }

    /// Split `text` into ordered chunks. Whitespace-only input yields no
    /// chunks; the ingestion pipeline rejects such input before reaching
    /// the splitter.
    #[inline]
    pub fn split(&self, text: &str) -> Vec<String> {
        if text.trim().is_empty() {
            return Vec::new();
        }

        let pieces = self.split_recursive(text, SEPARATORS);
        let chunks = self.merge(pieces);

        debug!(
            "Split {} chars into {} chunks (size {}, overlap {})",
            text.chars().count(),
            chunks.len(),
            self.chunk_size,
            self.chunk_overlap
        );

        chunks
    }

    /// Break text into pieces no longer than `chunk_size`, preferring the
    /// coarsest structural separator present and descending to finer ones
    /// only for pieces that are still too long.
    fn split_recursive(&self, text: &str, separators: &[&str]) -> Vec<String> {
        if char_len(text) <= self.chunk_size {
            return vec![text.to_string()];
        }

        let Some((sep, rest)) = separators.split_first() else {
            return hard_split(text, self.chunk_size);
        };

        if !text.contains(sep) {
            return self.split_recursive(text, rest);
        }

        let mut pieces = Vec::new();
        for part in split_keeping_separator(text, sep) {
            if char_len(part) <= self.chunk_size {
                pieces.push(part.to_string());
            } else {
                pieces.extend(self.split_recursive(part, rest));
            }
        }
        pieces
    }

    /// Greedily pack pieces into chunks, seeding each new chunk with the
    /// tail of the previous one for cross-boundary context.
    fn merge(&self, pieces: Vec<String>) -> Vec<String> {
        let mut chunks: Vec<String> = Vec::new();
        let mut current = String::new();
        let mut current_len = 0usize;

        for piece in pieces {
            let piece_len = char_len(&piece);

            if current_len > 0 && current_len + piece_len > self.chunk_size {
                chunks.push(std::mem::take(&mut current));

                // Overlap budget shrinks when the next piece nearly fills
                // the chunk on its own.
                let budget = self
                    .chunk_overlap
                    .min(self.chunk_size.saturating_sub(piece_len));
                let previous = chunks.last().map(String::as_str).unwrap_or_default();
                current = char_tail(previous, budget).to_string();
                current_len = char_len(&current);
            }

            current.push_str(&piece);
            current_len += piece_len;
        }

        if !current.is_empty() {
            chunks.push(current);
        }

        chunks.retain(|c| !c.trim().is_empty());
        chunks
    }
}

fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Split on every occurrence of `sep`, keeping the separator as the prefix
/// of the following piece. The pieces concatenate back to the input.
fn split_keeping_separator<'a>(text: &'a str, sep: &str) -> Vec<&'a str> {
    let mut pieces = Vec::new();
    let mut start = 0usize;
    let mut cursor = 0usize;

    while let Some(rel) = text[cursor..].find(sep) {
        let pos = cursor + rel;
        if pos > start {
            pieces.push(&text[start..pos]);
            start = pos;
        }
        cursor = pos + sep.len();
    }

    if start < text.len() {
        pieces.push(&text[start..]);
    }

    pieces
}

/// Last-resort split at exact character counts, for text with no usable
/// structure (e.g. one enormous word).
fn hard_split(text: &str, size: usize) -> Vec<String> {
    let mut out = Vec::new();
    let mut current = String::new();
    let mut count = 0usize;

    for ch in text.chars() {
        current.push(ch);
        count += 1;
        if count == size {
            out.push(std::mem::take(&mut current));
            count = 0;
        }
    }

    if !current.is_empty() {
        out.push(current);
    }

    out
}

/// The trailing `n` characters of `s`, on a char boundary.
fn char_tail(s: &str, n: usize) -> &str {
    if n == 0 {
        return "";
    }
    let total = s.chars().count();
    if total <= n {
        return s;
    }
    match s.char_indices().nth(total - n) {
        Some((idx, _)) => &s[idx..],
        None => "",
    }
}
