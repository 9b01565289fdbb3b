//! Alignment and matching throughput on long, repetitive paragraphs

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::hint::black_box;
use tikkun_core::matching::MatchStrategy;
use tikkun_core::{BoundaryMatcher, WordAligner};

const WORDS: &[&str] = &[
    "ויאמר", "אליו", "הילד", "ילד", "אל", "הבית", "ושם", "ישב", "זמן", "רב", "ולא", "ידע",
];

/// Paragraph of `words` tokens drawn cyclically from a small vocabulary
fn generate_paragraph(words: usize) -> String {
    WORDS
        .iter()
        .cycle()
        .take(words)
        .copied()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Same paragraph with every 50th word corrected and a few insertions
fn corrupt(paragraph: &str) -> String {
    let mut out = Vec::new();
    for (i, word) in paragraph.split(' ').enumerate() {
        if i % 50 == 7 {
            out.push("יֶלֶד");
        } else {
            out.push(word);
        }
        if i % 333 == 0 {
            out.push("נוסף");
        }
    }
    out.join(" ")
}

fn bench_alignment(c: &mut Criterion) {
    let mut group = c.benchmark_group("alignment");
    let aligner = WordAligner::default();

    for words in [500, 2_000, 8_000] {
        let original = generate_paragraph(words);
        let corrected = corrupt(&original);
        group.throughput(Throughput::Bytes(original.len() as u64));

        group.bench_with_input(
            BenchmarkId::new("default", words),
            &(original.clone(), corrected.clone()),
            |b, (original, corrected)| {
                b.iter(|| aligner.align(black_box(original), black_box(corrected)));
            },
        );

        // force the lookahead scan instead of the LCS table
        let scanning = WordAligner::default().with_lcs_cell_limit(0);
        group.bench_with_input(
            BenchmarkId::new("scan", words),
            &(original, corrected),
            |b, (original, corrected)| {
                b.iter(|| scanning.align(black_box(original), black_box(corrected)));
            },
        );
    }

    group.finish();
}

fn bench_matching(c: &mut Criterion) {
    let mut group = c.benchmark_group("boundary_matching");
    let text = generate_paragraph(8_000);
    group.throughput(Throughput::Bytes(text.len() as u64));

    for strategy in [MatchStrategy::Lookaround, MatchStrategy::CaptureTrim] {
        let matcher = BoundaryMatcher::default().with_strategy(strategy);
        let Ok(pattern) = matcher.compile("ילד") else {
            continue;
        };
        group.bench_with_input(BenchmarkId::new("find", strategy), &text, |b, text| {
            b.iter(|| pattern.find(black_box(text)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_alignment, bench_matching);
criterion_main!(benches);
