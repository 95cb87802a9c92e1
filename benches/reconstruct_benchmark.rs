//! Benchmarks for layout reconstruction and normalization.
//!
//! Run with: cargo bench
//!
//! Fragments are synthetic: a page of justified lines, shuffled so the
//! reading-order sort has real work to do.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use reflow::{normalize, Fragment, Page, Reconstructor};

const WORDS: &[&str] = &[
    "Accessible", "reading", "starts", "with", "text", "in", "the", "right", "order",
];

/// A page of `lines` lines, eight words per line, emitted in scrambled order.
fn synthetic_page(number: u32, lines: usize) -> Page {
    let mut fragments = Vec::with_capacity(lines * 8);
    for line in 0..lines {
        // Paragraph gap every tenth line
        let y = 780.0 - line as f32 * 14.0 - (line / 10) as f32 * 20.0;
        let mut x = 72.0;
        for word in 0..8 {
            let text = WORDS[(line + word) % WORDS.len()];
            let width = text.len() as f32 * 5.5;
            fragments.push(Fragment::new(text, x, y, width));
            x += width + 4.0;
        }
    }

    // Deterministic scramble
    let len = fragments.len();
    for i in 0..len {
        fragments.swap(i, (i * 7919 + 13) % len);
    }
    Page::with_fragments(number, fragments)
}

fn bench_reconstruct_page(c: &mut Criterion) {
    let mut group = c.benchmark_group("reconstruct_page");
    let reconstructor = Reconstructor::default();

    for lines in [10, 50, 200] {
        let page = synthetic_page(1, lines);
        group.bench_with_input(BenchmarkId::from_parameter(lines), &page, |b, page| {
            b.iter(|| reconstructor.reconstruct_page(black_box(&page.fragments)));
        });
    }

    group.finish();
}

fn bench_reconstruct_document(c: &mut Criterion) {
    let mut group = c.benchmark_group("reconstruct_document");
    let reconstructor = Reconstructor::default();
    let pages: Vec<Page> = (1..=50).map(|n| synthetic_page(n, 50)).collect();

    group.bench_function("sequential_50_pages", |b| {
        b.iter(|| reconstructor.reconstruct_document(black_box(&pages)));
    });
    group.bench_function("parallel_50_pages", |b| {
        b.iter(|| reconstructor.reconstruct_document_parallel(black_box(&pages)));
    });

    group.finish();
}

fn bench_normalize(c: &mut Criterion) {
    let pages: Vec<Page> = (1..=20).map(|n| synthetic_page(n, 50)).collect();
    let text = Reconstructor::default().reconstruct_document(&pages);

    c.bench_function("normalize_20_pages", |b| {
        b.iter(|| normalize(black_box(&text)));
    });
}

criterion_group!(
    benches,
    bench_reconstruct_page,
    bench_reconstruct_document,
    bench_normalize,
);
criterion_main!(benches);
