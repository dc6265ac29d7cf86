//! Integration tests for paging through search results.

use std::sync::Arc;

use pilum::document::Document;
use pilum::error::{PilumError, Result};
use pilum::index::Index;
use pilum::query::*;
use pilum::schema::{FieldOption, Schema};

/// 23 documents all matching `kind:item`.
fn index_of_23() -> Index {
    let schema = Schema::new()
        .with_field("kind", FieldOption::keyword())
        .unwrap()
        .with_field("rank", FieldOption::numeric_point())
        .unwrap();
    let index = Index::in_memory(schema).unwrap();
    let writer = index.writer().unwrap();
    for i in 0..23 {
        let doc = Document::builder(Arc::clone(index.schema()))
            .add_keyword("kind", "item")
            .add_numeric("rank", i as f64)
            .build()
            .unwrap();
        writer.add_document(doc).unwrap();
    }
    writer.close().unwrap();
    index
}

fn cursor(index: &Index, config: PagingConfig) -> PagingCursor {
    index
        .reader()
        .searcher()
        .paginate(
            TermQuery::new("kind", "item").into(),
            Arc::new(ConstantScorer::default()),
            config,
        )
        .unwrap()
}

fn page_doc_ids(cursor: &PagingCursor) -> Vec<u64> {
    cursor.page().unwrap().hits.iter().map(|h| h.doc_id).collect()
}

#[test]
fn test_pages_of_ten() -> Result<()> {
    let index = index_of_23();
    let mut cursor = cursor(&index, PagingConfig::default());

    assert_eq!(cursor.total_hits(), 23);
    assert_eq!(cursor.total_pages(), 3);
    assert_eq!(cursor.buffered(), 23);
    assert_eq!(page_doc_ids(&cursor), (0..10).collect::<Vec<_>>());
    assert!(!cursor.has_previous());

    assert!(cursor.next()?);
    assert_eq!(cursor.page()?.number, 2);
    assert!(cursor.next()?);
    let page = cursor.page()?;
    assert_eq!((page.start, page.end), (20, 23));
    assert_eq!(page.hits.len(), 3);
    assert!(!cursor.has_next());
    assert!(!cursor.next()?);

    assert!(cursor.previous()?);
    assert_eq!(cursor.page()?.start, 10);
    Ok(())
}

#[test]
fn test_jump() -> Result<()> {
    let index = index_of_23();
    let mut cursor = cursor(&index, PagingConfig::default());

    cursor.jump(3)?;
    assert_eq!(page_doc_ids(&cursor), vec![20, 21, 22]);

    match cursor.jump(4) {
        Err(PilumError::PageOutOfRange { page, total_pages }) => {
            assert_eq!((page, total_pages), (4, 3));
        }
        other => panic!("expected PageOutOfRange, got {other:?}"),
    }
    assert!(cursor.jump(0).is_err());
    // A failed jump leaves the cursor where it was.
    assert_eq!(cursor.state(), CursorState::Viewing { page_start: 20 });
    Ok(())
}

#[test]
fn test_collect_more() -> Result<()> {
    let index = index_of_23();
    let config = PagingConfig {
        hits_per_page: 10,
        initial_pages: 1,
    };

    let mut cursor = cursor(&index, config);
    assert_eq!(cursor.buffered(), 10);
    assert!(!cursor.needs_more());
    cursor.next()?;
    assert!(cursor.needs_more());
    assert!(cursor.page()?.truncated);
    assert!(cursor.page()?.hits.is_empty());

    cursor.fetch_all()?;
    assert_eq!(cursor.buffered(), 23);
    assert!(!cursor.needs_more());
    assert_eq!(page_doc_ids(&cursor), (10..20).collect::<Vec<_>>());

    let mut declined = self::cursor(&index, config);
    declined.next()?;
    declined.decline_more()?;
    assert_eq!(declined.state(), CursorState::Exhausted);
    assert!(declined.is_finished());
    assert!(declined.next().is_err());
    Ok(())
}

#[test]
fn test_quit_and_empty_results() -> Result<()> {
    let index = index_of_23();
    let mut cursor = cursor(&index, PagingConfig::default());
    cursor.quit();
    assert!(cursor.is_finished());
    assert!(cursor.page().is_err());

    let mut empty = index.reader().searcher().paginate(
        TermQuery::new("kind", "missing").into(),
        Arc::new(ConstantScorer::default()),
        PagingConfig::default(),
    )?;
    assert_eq!(empty.total_pages(), 0);
    assert!(empty.page()?.hits.is_empty());
    assert!(!empty.next()?);
    assert!(empty.jump(1).is_err());
    Ok(())
}

#[test]
fn test_zero_page_size_rejected() {
    let index = index_of_23();
    let result = index.reader().searcher().paginate(
        TermQuery::new("kind", "item").into(),
        Arc::new(ConstantScorer::default()),
        PagingConfig {
            hits_per_page: 0,
            initial_pages: 5,
        },
    );
    assert!(result.is_err());
}
