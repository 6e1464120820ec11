use criterion::{Criterion, criterion_group, criterion_main};
use knowledge_mcp::chunker::TextSplitter;
use std::hint::black_box;

fn sample_document() -> String {
    let mut text = String::new();
    for section in 0..30 {
        text.push_str(&format!("\n## Section {section}\n"));
        for paragraph in 0..6 {
            text.push_str(&format!(
                "Paragraph {paragraph} of section {section} covers its topic in a few \
                 sentences, with enough length that packing and overlap both matter.\n\n"
            ));
        }
    }
    text
}

pub fn criterion_benchmark(c: &mut Criterion) {
    let text = sample_document();
    let splitter = TextSplitter::new(800, 160);
    c.bench_function("chunking", |b| b.iter(|| splitter.split(black_box(&text))));
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
