//! Integration tests for commit visibility, snapshot isolation and the writer slot.

use std::collections::BTreeSet;
use std::sync::Arc;
use std::thread;

use pilum::document::Document;
use pilum::error::{PilumError, Result};
use pilum::index::Index;
use pilum::query::{ConstantScorer, Query, TermQuery};
use pilum::schema::{FieldOption, Schema};

fn schema() -> Schema {
    Schema::new()
        .with_field("contents", FieldOption::text())
        .unwrap()
        .with_field("path", FieldOption::keyword().stored(true))
        .unwrap()
}

fn doc(index: &Index, path: &str, contents: &str) -> Document {
    Document::builder(Arc::clone(index.schema()))
        .add_keyword("path", path)
        .add_text("contents", contents)
        .build()
        .unwrap()
}

fn count(index: &Index, query: Query) -> u64 {
    index.reader().searcher().count(&query).unwrap()
}

#[test]
fn test_uncommitted_documents_are_invisible() -> Result<()> {
    let index = Index::in_memory(schema())?;
    let writer = index.writer()?;

    writer.add_document(doc(&index, "a.txt", "rust search engine"))?;
    let before = index.reader();
    assert_eq!(before.doc_count(), 0);
    assert_eq!(count(&index, TermQuery::new("contents", "rust").into()), 0);

    writer.commit()?;
    let after = index.reader();
    assert_eq!(after.doc_count(), 1);
    assert_eq!(after.generation(), before.generation() + 1);
    assert_eq!(count(&index, TermQuery::new("contents", "rust").into()), 1);

    // The reader opened before the commit still sees its own snapshot.
    assert_eq!(before.doc_count(), 0);
    let top = before
        .searcher()
        .search(&TermQuery::new("contents", "rust").into(), &ConstantScorer::default(), 10)?;
    assert_eq!(top.total_hits, 0);

    writer.close()?;
    Ok(())
}

#[test]
fn test_empty_commit_publishes_nothing() -> Result<()> {
    let index = Index::in_memory(schema())?;
    let writer = index.writer()?;

    writer.commit()?;
    assert_eq!(index.stats().generation, 0);

    writer.add_document(doc(&index, "a.txt", "one"))?;
    writer.commit()?;
    writer.commit()?;
    assert_eq!(index.stats().generation, 1);
    assert_eq!(writer.stats().commits, 1);
    Ok(())
}

#[test]
fn test_doc_ids_continue_across_commits() -> Result<()> {
    let index = Index::in_memory(schema())?;
    let writer = index.writer()?;

    assert_eq!(writer.add_document(doc(&index, "a", "one"))?, 0);
    assert_eq!(writer.add_document(doc(&index, "b", "two"))?, 1);
    writer.commit()?;
    assert_eq!(writer.add_document(doc(&index, "c", "three"))?, 2);
    writer.commit()?;

    let reader = index.reader();
    assert_eq!(reader.doc_count(), 3);
    let path = reader.document(2).and_then(|d| d.get_field("path").cloned());
    assert_eq!(path.and_then(|v| v.as_keyword().map(str::to_string)), Some("c".to_string()));
    Ok(())
}

#[test]
fn test_rollback_discards_buffer() -> Result<()> {
    let index = Index::in_memory(schema())?;
    let writer = index.writer()?;

    writer.add_document(doc(&index, "a", "kept"))?;
    writer.commit()?;
    writer.add_document(doc(&index, "b", "discarded"))?;
    assert_eq!(writer.pending_docs(), 1);

    writer.rollback()?;
    assert_eq!(writer.pending_docs(), 0);
    writer.commit()?;

    assert_eq!(index.reader().doc_count(), 1);
    assert_eq!(count(&index, TermQuery::new("contents", "discarded").into()), 0);
    // Doc id 1 is handed out again after the rollback.
    assert_eq!(writer.add_document(doc(&index, "c", "again"))?, 1);
    Ok(())
}

#[test]
fn test_single_writer_slot() -> Result<()> {
    let index = Index::in_memory(schema())?;
    let writer = index.writer()?;

    match index.writer() {
        Err(PilumError::InvalidOperation(_)) => {}
        other => panic!("expected InvalidOperation, got {other:?}"),
    }

    writer.add_document(doc(&index, "a", "closing commits"))?;
    writer.close()?;
    writer.close()?;
    assert!(writer.is_closed());
    assert_eq!(index.reader().doc_count(), 1);
    assert!(writer.add_document(doc(&index, "b", "late")).is_err());

    let second = index.writer()?;
    drop(second);
    let _third = index.writer()?;
    Ok(())
}

#[test]
fn test_dropping_writer_commits_pending() -> Result<()> {
    let index = Index::in_memory(schema())?;
    {
        let writer = index.writer()?;
        writer.add_document(doc(&index, "a", "dropped writer"))?;
    }
    assert_eq!(index.reader().doc_count(), 1);
    Ok(())
}

#[test]
fn test_concurrent_adds_get_distinct_ids() -> Result<()> {
    let index = Index::in_memory(schema())?;
    let writer = Arc::new(index.writer()?);

    let handles: Vec<_> = (0..2)
        .map(|t| {
            let writer = Arc::clone(&writer);
            let index = index.clone();
            thread::spawn(move || {
                let mut ids = Vec::new();
                for i in 0..100 {
                    let d = doc(&index, &format!("{t}-{i}"), "concurrent writes");
                    ids.push(writer.add_document(d).unwrap());
                    if i % 25 == 0 {
                        writer.commit().unwrap();
                    }
                }
                ids
            })
        })
        .collect();

    let mut ids = BTreeSet::new();
    for handle in handles {
        for id in handle.join().unwrap() {
            assert!(ids.insert(id), "doc id {id} assigned twice");
        }
    }
    writer.commit()?;

    assert_eq!(ids.len(), 200);
    assert_eq!(ids.iter().copied().collect::<Vec<_>>(), (0..200).collect::<Vec<_>>());
    assert_eq!(index.reader().doc_count(), 200);
    assert_eq!(count(&index, TermQuery::new("contents", "concurrent").into()), 200);
    Ok(())
}

#[test]
fn test_readers_during_commits() -> Result<()> {
    let index = Index::in_memory(schema())?;
    let writer = index.writer()?;

    let reader_index = index.clone();
    let reader = thread::spawn(move || {
        let mut last_generation = 0;
        for _ in 0..200 {
            let reader = reader_index.reader();
            let snapshot_docs = reader.doc_count();
            let hits = reader
                .searcher()
                .count(&TermQuery::new("contents", "batch").into())
                .unwrap();
            // A search sees exactly the documents of its snapshot.
            assert_eq!(hits, snapshot_docs);
            assert!(reader.generation() >= last_generation);
            last_generation = reader.generation();
        }
    });

    for batch in 0..20 {
        for i in 0..5 {
            writer.add_document(doc(&index, &format!("{batch}-{i}"), "batch"))?;
        }
        writer.commit()?;
    }
    reader.join().unwrap();

    assert_eq!(index.stats().generation, 20);
    assert_eq!(index.stats().segment_count, 20);
    Ok(())
}
