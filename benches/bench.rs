//! Criterion benchmarks for Pilum.
//!
//! Covers the hot paths of the engine:
//! - Text analysis
//! - Indexing and committing documents
//! - Term, range and boolean query evaluation

use std::hint::black_box;
use std::sync::Arc;

use criterion::{BatchSize, Criterion, Throughput, criterion_group, criterion_main};
use pilum::analysis::analyzer::analyzer::Analyzer;
use pilum::analysis::analyzer::standard::StandardAnalyzer;
use pilum::document::Document;
use pilum::index::Index;
use pilum::query::{BooleanQuery, Query, RangeQuery, TermQuery, TfIdfScorer};
use pilum::schema::{FieldOption, Schema};

const WORDS: &[&str] = &[
    "search", "engine", "full", "text", "index", "query", "document", "field", "term",
    "boolean", "range", "score", "analysis", "token", "segment", "snapshot", "commit",
    "reader", "writer", "storage", "posting", "numeric", "point", "paging",
];

/// Generate test documents for benchmarking.
fn generate_test_documents(count: usize) -> Vec<String> {
    let mut documents = Vec::with_capacity(count);
    for i in 0..count {
        let doc_length = 50 + (i % 100);
        let doc_words: Vec<&str> = (0..doc_length)
            .map(|j| WORDS[(i * 7 + j * 13) % WORDS.len()])
            .collect();
        documents.push(doc_words.join(" "));
    }
    documents
}

fn schema() -> Schema {
    Schema::new()
        .with_field("contents", FieldOption::text())
        .unwrap()
        .with_field("price", FieldOption::numeric_point())
        .unwrap()
}

fn build_index(texts: &[String]) -> Index {
    let index = Index::in_memory(schema()).unwrap();
    let writer = index.writer().unwrap();
    for (i, text) in texts.iter().enumerate() {
        let doc = Document::builder(Arc::clone(index.schema()))
            .add_text("contents", text.as_str())
            .add_numeric("price", (i % 500) as f64)
            .build()
            .unwrap();
        writer.add_document(doc).unwrap();
        if i % 1000 == 999 {
            writer.commit().unwrap();
        }
    }
    writer.close().unwrap();
    index
}

/// Benchmark text analysis.
fn bench_text_analysis(c: &mut Criterion) {
    let mut group = c.benchmark_group("text_analysis");

    let analyzer = StandardAnalyzer::new().unwrap();
    let texts = generate_test_documents(100);

    group.throughput(Throughput::Elements(100));
    group.bench_function("analyze_batch_documents", |b| {
        b.iter(|| {
            for text in &texts {
                let tokens = analyzer.analyze(black_box(text)).unwrap().count();
                black_box(tokens);
            }
        })
    });

    group.finish();
}

/// Benchmark indexing and committing.
fn bench_indexing(c: &mut Criterion) {
    let mut group = c.benchmark_group("indexing");
    group.sample_size(20);

    let texts = generate_test_documents(1000);

    group.throughput(Throughput::Elements(1000));
    group.bench_function("index_and_commit_1000", |b| {
        b.iter_batched(
            || Index::in_memory(schema()).unwrap(),
            |index| {
                let writer = index.writer().unwrap();
                for (i, text) in texts.iter().enumerate() {
                    let doc = Document::builder(Arc::clone(index.schema()))
                        .add_text("contents", text.as_str())
                        .add_numeric("price", i as f64)
                        .build()
                        .unwrap();
                    writer.add_document(doc).unwrap();
                }
                writer.close().unwrap();
                black_box(index.stats())
            },
            BatchSize::LargeInput,
        )
    });

    group.finish();
}

/// Benchmark query evaluation over a 5000 document index.
fn bench_queries(c: &mut Criterion) {
    let mut group = c.benchmark_group("queries");

    let index = build_index(&generate_test_documents(5000));
    let searcher = index.reader().searcher();
    let scorer = TfIdfScorer::new();

    let term: Query = TermQuery::new("contents", "snapshot").into();
    group.bench_function("term_query", |b| {
        b.iter(|| black_box(searcher.search(black_box(&term), &scorer, 10).unwrap()))
    });

    let range: Query = RangeQuery::new("price", 100.0, 300.0).into();
    group.bench_function("range_query", |b| {
        b.iter(|| black_box(searcher.search(black_box(&range), &scorer, 10).unwrap()))
    });

    let boolean: Query = BooleanQuery::builder()
        .must(TermQuery::new("contents", "segment"))
        .must(RangeQuery::new("price", 100.0, 300.0))
        .must_not(TermQuery::new("contents", "paging"))
        .build()
        .into();
    group.bench_function("boolean_query", |b| {
        b.iter(|| black_box(searcher.search(black_box(&boolean), &scorer, 10).unwrap()))
    });

    group.finish();
}

criterion_group!(benches, bench_text_analysis, bench_indexing, bench_queries);
criterion_main!(benches);
