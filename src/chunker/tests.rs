use super::*;

fn numbered_paragraphs(count: usize) -> String {
    let mut text = String::new();
    for i in 0..count {
        text.push_str(&format!(
            "Paragraph {i} discusses topic number {i} in moderate detail, \
             covering its background and one worked example."
        ));
        if i + 1 < count {
            text.push_str("\n\n");
        }
    }
    text
}

/// Strip each chunk's overlap prefix (the longest prefix that is a suffix
/// of the previous chunk) and concatenate what remains.
fn reconstruct(chunks: &[String], max_overlap: usize) -> String {
    let mut out = String::new();
    for (i, chunk) in chunks.iter().enumerate() {
        if i == 0 {
            out.push_str(chunk);
            continue;
        }
        let prev = &chunks[i - 1];
        let limit = chunk.chars().count().min(max_overlap);
        let mut skip_bytes = 0;
        for n in (1..=limit).rev() {
            let prefix: String = chunk.chars().take(n).collect();
            if prev.ends_with(&prefix) {
                skip_bytes = prefix.len();
                break;
            }
        }
        out.push_str(&chunk[skip_bytes..]);
    }
    out
}

#[test]
fn short_text_is_single_chunk() {
    let splitter = TextSplitter::new(800, 160);
    let chunks = splitter.split("A short note.");

    assert_eq!(chunks, vec!["A short note.".to_string()]);
}

#[test]
fn whitespace_only_yields_no_chunks() {
    let splitter = TextSplitter::new(800, 160);

    assert!(splitter.split("").is_empty());
    assert!(splitter.split("   \n\n\t  ").is_empty());
}

#[test]
fn chunks_never_exceed_chunk_size() {
    let splitter = TextSplitter::new(200, 40);
    let text = numbered_paragraphs(30);

    for chunk in splitter.split(&text) {
        assert!(
            chunk.chars().count() <= 200,
            "chunk of {} chars exceeds limit",
            chunk.chars().count()
        );
    }
}

#[test]
fn consecutive_chunks_overlap() {
    let splitter = TextSplitter::new(200, 40);
    let text = numbered_paragraphs(30);
    let chunks = splitter.split(&text);

    assert!(chunks.len() > 1);
    for pair in chunks.windows(2) {
        // The next chunk must begin with some tail of the previous one.
        let overlap_found = (1..=40).rev().any(|n| {
            let candidate: String = pair[1].chars().take(n).collect();
            pair[0].ends_with(&candidate)
        });
        assert!(overlap_found, "no overlap between consecutive chunks");
    }
}

#[test]
fn coverage_reconstructs_original_text() {
    let splitter = TextSplitter::new(800, 160);
    let text = numbered_paragraphs(40);
    let chunks = splitter.split(&text);

    assert!(chunks.len() > 1);
    assert_eq!(reconstruct(&chunks, 160), text);
}

#[test]
fn headings_survive_splitting_intact() {
    let splitter = TextSplitter::new(120, 20);
    let mut text = String::from("Intro paragraph before any heading.");
    for i in 0..6 {
        text.push_str(&format!(
            "\n## Section {i}\nBody text for section {i} that is long enough \
             to matter when packing chunks."
        ));
    }

    let chunks = splitter.split(&text);

    // Splitting happens at heading boundaries, so no heading line is ever
    // torn across two chunks.
    for i in 0..6 {
        let heading = format!("## Section {i}");
        assert!(
            chunks.iter().any(|c| c.contains(&heading)),
            "heading '{heading}' was split across chunks"
        );
    }
}

#[test]
fn unsplittable_text_falls_back_to_hard_split() {
    let splitter = TextSplitter::new(100, 10);
    let text = "x".repeat(950);
    let chunks = splitter.split(&text);

    assert!(chunks.iter().all(|c| c.chars().count() <= 100));
    let total: usize = chunks.iter().map(|c| c.chars().count()).sum();
    // Hard-split chunks still carry overlap seeds, so the total is at
    // least the original length.
    assert!(total >= 950);
}

#[test]
fn exhausted_overlap_budget_drops_the_seed() {
    // When a piece fills the chunk on its own the overlap budget is zero,
    // and the new chunk must start empty rather than keeping the whole
    // previous chunk as its seed.
    let splitter = TextSplitter::new(100, 10);
    let text = "x".repeat(300);
    let chunks = splitter.split(&text);

    let sizes: Vec<usize> = chunks.iter().map(|c| c.chars().count()).collect();
    assert!(
        sizes.iter().all(|&n| n <= 100),
        "chunk sizes exceed limit: {sizes:?}"
    );
    assert_eq!(sizes, vec![100, 100, 100]);
}

#[test]
fn multibyte_text_splits_on_char_boundaries() {
    let splitter = TextSplitter::new(100, 10);
    let text = "héllo wörld ünïcode ".repeat(40);
    let chunks = splitter.split(&text);

    assert!(chunks.len() > 1);
    for chunk in &chunks {
        assert!(chunk.chars().count() <= 100);
    }
}

#[test]
fn order_is_preserved() {
    let splitter = TextSplitter::new(150, 30);
    let text = numbered_paragraphs(20);
    let chunks = splitter.split(&text);

    let mut last_seen = None;
    for chunk in &chunks {
        if let Some(pos) = chunk.find("Paragraph ") {
            let digits: String = chunk[pos + 10..]
                .chars()
                .take_while(char::is_ascii_digit)
                .collect();
            if let Ok(n) = digits.parse::<usize>() {
                if let Some(prev) = last_seen {
                    assert!(n >= prev, "paragraph {n} appeared after {prev}");
                }
                last_seen = Some(n);
            }
        }
    }
    assert!(last_seen.is_some());
}
