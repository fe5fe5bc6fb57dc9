use criterion::{Criterion, black_box, criterion_group, criterion_main};

use markpad::document::Document;

fn sample_document(paragraphs: usize) -> String {
    let mut out = String::from("# Benchmark Document\n\n");
    for i in 0..paragraphs {
        out.push_str(&format!(
            "## Section {i}\n\nSome *styled* text with `code` and a [link](https://example.com) \
             that is long enough to wrap at narrow widths.\n\n- item one\n- item two\n\n\
             > a quote line\n\n```\nlet x = {i};\n```\n\n"
        ));
    }
    out
}

fn bench_parse(c: &mut Criterion) {
    let small = sample_document(5);
    let medium = sample_document(50);
    let large = sample_document(500);

    let mut group = c.benchmark_group("parse");
    group.bench_function("small", |b| {
        b.iter(|| Document::parse_with_layout(black_box(&small), 80));
    });
    group.bench_function("medium", |b| {
        b.iter(|| Document::parse_with_layout(black_box(&medium), 80));
    });
    group.bench_function("large", |b| {
        b.iter(|| Document::parse_with_layout(black_box(&large), 80));
    });
    group.finish();
}

fn bench_wrap_widths(c: &mut Criterion) {
    let doc = sample_document(50);

    let mut group = c.benchmark_group("wrap_width");
    for width in [40u16, 80, 120] {
        group.bench_function(width.to_string(), |b| {
            b.iter(|| Document::parse_with_layout(black_box(&doc), width));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_parse, bench_wrap_widths);
criterion_main!(benches);
