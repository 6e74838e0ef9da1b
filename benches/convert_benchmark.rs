//! Benchmarks for mdlex conversion performance.
//!
//! Run with: cargo bench
//!
//! These benchmarks use synthetic Markdown documents.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

/// Creates a synthetic document with the given number of sections.
fn create_test_markdown(sections: usize) -> String {
    let mut content = String::new();

    for i in 0..sections {
        content.push_str(&format!("## Section {}\n\n", i + 1));
        content.push_str(
            "Some **bold** text, some *italic* text and a [link](https://example.com).\n\n",
        );
        content.push_str("한국어 문장과 日本語のテキスト.\n\n");
        content.push_str("- first\n- second\n  - nested\n\n");
        content.push_str(&format!(
            "```rust\nfn section_{}() -> usize {{\n    {}\n}}\n```\n\n",
            i, i
        ));
    }

    content
}

/// Benchmark Markdown parsing into the syntax tree.
fn bench_parse(c: &mut Criterion) {
    let markdown = create_test_markdown(20);

    c.bench_function("parse_markdown", |b| {
        b.iter(|| mdlex::parse_markdown(black_box(&markdown)));
    });
}

/// Benchmark conversion with and without highlighting.
fn bench_convert(c: &mut Criterion) {
    let mut group = c.benchmark_group("convert");

    for sections in [1, 10, 50].iter() {
        let root = mdlex::parse_markdown(&create_test_markdown(*sections));

        group.bench_function(format!("{}_sections_plain", sections), |b| {
            let builder = mdlex::Mdlex::new().with_highlight(false);
            b.iter(|| builder.convert_ast(black_box(&root)));
        });

        group.bench_function(format!("{}_sections_parallel", sections), |b| {
            let builder = mdlex::Mdlex::new();
            b.iter(|| builder.convert_ast(black_box(&root)));
        });

        group.bench_function(format!("{}_sections_sequential", sections), |b| {
            let builder = mdlex::Mdlex::new().sequential();
            b.iter(|| builder.convert_ast(black_box(&root)));
        });
    }

    group.finish();
}

/// Benchmark pagination and page JSON output.
fn bench_pages(c: &mut Criterion) {
    let result = mdlex::Mdlex::new()
        .with_highlight(false)
        .convert_markdown(&create_test_markdown(50));

    c.bench_function("paginate", |b| {
        b.iter(|| black_box(&result).pages());
    });

    c.bench_function("pages_to_json", |b| {
        b.iter(|| {
            for page in result.pages() {
                let _ = page.to_json(mdlex::JsonFormat::Compact);
            }
        });
    });
}

/// Benchmark window updates while scrolling.
fn bench_window(c: &mut Criterion) {
    c.bench_function("window_scroll_1000_pages", |b| {
        b.iter(|| {
            let mut manager =
                mdlex::WindowManager::new(1000, mdlex::WindowConfig::default());
            for index in 0..1000 {
                let _ = manager.on_visibility(black_box(index), true);
            }
        });
    });
}

criterion_group!(benches, bench_parse, bench_convert, bench_pages, bench_window);
criterion_main!(benches);
