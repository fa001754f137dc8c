//! Benchmarks for document chunking and message formatting.
//!
//! These benchmarks measure:
//! - Chunk splitting at several document sizes, with and without overlap
//! - Fence splitting and escaping of chat replies

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use tabletalk::chat::format_message;
use tabletalk::ingestion::CharacterChunker;

/// Deterministic ASCII prose of exactly `chars` characters.
fn build_document(chars: usize) -> String {
    let sentence = "The orders table keeps one row per order with totals in cents. ";
    let mut text = String::with_capacity(chars + sentence.len());
    while text.len() < chars {
        text.push_str(sentence);
    }
    text.truncate(chars);
    text
}

/// A chat reply interleaving prose with `fences` fenced SQL blocks.
fn build_reply(fences: usize) -> String {
    let mut reply = String::from("Here is what I found about the schema.\n");
    for i in 0..fences {
        reply.push_str("Some context about table usage and joins.\n");
        reply.push_str(&format!(
            "```SELECT col_{i} FROM orders WHERE total > {i}```\n"
        ));
    }
    reply.push_str("Let me know if you need anything else.");
    reply
}

fn bench_chunking(c: &mut Criterion) {
    let mut group = c.benchmark_group("chunking");

    for doc_chars in [1_000, 32_000, 256_000] {
        let document = build_document(doc_chars);

        let no_overlap = CharacterChunker::new(1000, 0).expect("valid chunker");
        group.bench_with_input(
            BenchmarkId::new("no_overlap", doc_chars),
            &document,
            |b, document| {
                b.iter(|| no_overlap.split(document));
            },
        );

        let ten_percent = CharacterChunker::new(1000, 100).expect("valid chunker");
        group.bench_with_input(
            BenchmarkId::new("overlap_100", doc_chars),
            &document,
            |b, document| {
                b.iter(|| ten_percent.split(document));
            },
        );
    }

    group.finish();
}

fn bench_formatting(c: &mut Criterion) {
    let mut group = c.benchmark_group("format_message");

    for fences in [0usize, 4, 16] {
        let reply = build_reply(fences);
        group.bench_with_input(BenchmarkId::new("fences", fences), &reply, |b, reply| {
            b.iter(|| format_message(reply));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_chunking, bench_formatting);
criterion_main!(benches);
