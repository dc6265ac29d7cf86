//! Page-by-page navigation over search results.
//!
//! A [`PagingCursor`] starts from a capped result buffer
//! (`initial_pages * hits_per_page` hits) and the true total hit count. When
//! a page reaches past the end of the buffer, the front end either asks for
//! every hit ([`fetch_all`](PagingCursor::fetch_all), which re-runs the query
//! with `limit = total_hits`) or gives up
//! ([`decline_more`](PagingCursor::decline_more)).
//!
//! ```text
//! Viewing(start) --next/previous/jump--> Viewing(start')
//! Viewing(start) --fetch_all--> Reevaluating --> Viewing(start)
//! Viewing(start) --decline_more--> Exhausted
//! any            --quit--> Quit
//! ```

use std::sync::Arc;

use crate::error::{PilumError, Result};
use crate::query::collector::Hit;
use crate::query::evaluator::Searcher;
use crate::query::query::Query;
use crate::query::scorer::Scorer;

/// Page size and initial fetch size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PagingConfig {
    pub hits_per_page: usize,
    /// Number of pages collected by the first evaluation.
    pub initial_pages: usize,
}

impl Default for PagingConfig {
    fn default() -> Self {
        PagingConfig {
            hits_per_page: 10,
            initial_pages: 5,
        }
    }
}

impl PagingConfig {
    fn initial_limit(&self) -> usize {
        self.hits_per_page.saturating_mul(self.initial_pages)
    }
}

/// Where the cursor is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorState {
    /// Showing the page starting at this hit index.
    Viewing { page_start: usize },
    /// Re-running the query for all hits.
    Reevaluating,
    /// The buffer ended before the total and no more hits will be fetched.
    Exhausted,
    /// Terminal.
    Quit,
}

/// One page of hits.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<'a> {
    /// 1-based page number.
    pub number: usize,
    /// Index of the first hit on the page.
    pub start: usize,
    /// Index one past the last hit the page should show.
    pub end: usize,
    /// The buffered hits of the page; shorter than `end - start` when truncated.
    pub hits: &'a [Hit],
    pub total_hits: u64,
    /// The buffer ends before the page does.
    pub truncated: bool,
}

/// Interactive navigation over the results of one query.
pub struct PagingCursor {
    searcher: Searcher,
    query: Query,
    scorer: Arc<dyn Scorer>,
    config: PagingConfig,
    hits: Vec<Hit>,
    total_hits: u64,
    state: CursorState,
}

impl PagingCursor {
    /// Evaluate `query` once, collecting the first `initial_pages` pages.
    pub fn new(
        searcher: Searcher,
        query: Query,
        scorer: Arc<dyn Scorer>,
        config: PagingConfig,
    ) -> Result<Self> {
        if config.hits_per_page == 0 {
            return Err(PilumError::invalid_argument("hits_per_page must be positive"));
        }

        let top_docs = searcher.search(&query, scorer.as_ref(), config.initial_limit())?;
        Ok(PagingCursor {
            searcher,
            query,
            scorer,
            config,
            hits: top_docs.hits,
            total_hits: top_docs.total_hits,
            state: CursorState::Viewing { page_start: 0 },
        })
    }

    pub fn state(&self) -> CursorState {
        self.state
    }

    pub fn query(&self) -> &Query {
        &self.query
    }

    pub fn total_hits(&self) -> u64 {
        self.total_hits
    }

    pub fn hits_per_page(&self) -> usize {
        self.config.hits_per_page
    }

    /// Number of hits currently buffered.
    pub fn buffered(&self) -> usize {
        self.hits.len()
    }

    pub fn total_pages(&self) -> usize {
        self.total().div_ceil(self.config.hits_per_page)
    }

    /// The page being viewed.
    pub fn page(&self) -> Result<Page<'_>> {
        let page_start = self.viewing_start()?;
        let end = self.total().min(page_start + self.config.hits_per_page);
        let shown_start = page_start.min(self.hits.len());
        let shown_end = end.min(self.hits.len()).max(shown_start);

        Ok(Page {
            number: page_start / self.config.hits_per_page + 1,
            start: page_start,
            end,
            hits: &self.hits[shown_start..shown_end],
            total_hits: self.total_hits,
            truncated: end > self.hits.len(),
        })
    }

    /// Whether the current page runs past the buffer, so more hits must be
    /// fetched (or declined) before it can be shown in full.
    pub fn needs_more(&self) -> bool {
        match self.state {
            CursorState::Viewing { page_start } => {
                self.total().min(page_start + self.config.hits_per_page) > self.hits.len()
            }
            _ => false,
        }
    }

    pub fn has_next(&self) -> bool {
        matches!(self.state, CursorState::Viewing { page_start }
            if page_start + self.config.hits_per_page < self.total())
    }

    pub fn has_previous(&self) -> bool {
        matches!(self.state, CursorState::Viewing { page_start } if page_start > 0)
    }

    /// Move to the next page if there is one. Returns whether the cursor moved.
    pub fn next(&mut self) -> Result<bool> {
        let page_start = self.viewing_start()?;
        let next_start = page_start + self.config.hits_per_page;
        if next_start < self.total() {
            self.state = CursorState::Viewing {
                page_start: next_start,
            };
            return Ok(true);
        }
        Ok(false)
    }

    /// Move to the previous page, stopping at the first. Returns whether the cursor moved.
    pub fn previous(&mut self) -> Result<bool> {
        let page_start = self.viewing_start()?;
        let previous_start = page_start.saturating_sub(self.config.hits_per_page);
        self.state = CursorState::Viewing {
            page_start: previous_start,
        };
        Ok(previous_start != page_start)
    }

    /// Jump to a 1-based page.
    ///
    /// Fails with `PageOutOfRange`, leaving the cursor where it was, if the
    /// page starts at or beyond the total hit count.
    pub fn jump(&mut self, page: usize) -> Result<()> {
        self.viewing_start()?;

        let start = page
            .checked_sub(1)
            .and_then(|index| index.checked_mul(self.config.hits_per_page));
        match start {
            Some(start) if start < self.total() => {
                self.state = CursorState::Viewing { page_start: start };
                Ok(())
            }
            _ => Err(PilumError::PageOutOfRange {
                page,
                total_pages: self.total_pages(),
            }),
        }
    }

    /// Re-run the query collecting every hit, then keep viewing the same page.
    ///
    /// If evaluation fails the cursor is left as it was.
    pub fn fetch_all(&mut self) -> Result<()> {
        let page_start = self.viewing_start()?;
        self.state = CursorState::Reevaluating;

        log::debug!(
            "re-evaluating `{}` for all {} hits",
            self.query,
            self.total_hits
        );
        let limit = usize::try_from(self.total_hits).unwrap_or(usize::MAX);
        let result = self
            .searcher
            .search(&self.query, self.scorer.as_ref(), limit);

        self.state = CursorState::Viewing { page_start };
        let top_docs = result?;
        self.hits = top_docs.hits;
        self.total_hits = top_docs.total_hits;
        Ok(())
    }

    /// Decline to fetch more hits when the buffer ends before the total.
    pub fn decline_more(&mut self) -> Result<()> {
        self.viewing_start()?;
        if (self.hits.len() as u64) >= self.total_hits {
            return Err(PilumError::invalid_operation(
                "all hits are already buffered",
            ));
        }
        self.state = CursorState::Exhausted;
        Ok(())
    }

    pub fn quit(&mut self) {
        self.state = CursorState::Quit;
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.state, CursorState::Exhausted | CursorState::Quit)
    }

    fn total(&self) -> usize {
        usize::try_from(self.total_hits).unwrap_or(usize::MAX)
    }

    fn viewing_start(&self) -> Result<usize> {
        match self.state {
            CursorState::Viewing { page_start } => Ok(page_start),
            other => Err(PilumError::invalid_operation(format!(
                "cursor is not viewing a page ({other:?})"
            ))),
        }
    }
}

impl std::fmt::Debug for PagingCursor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PagingCursor")
            .field("query", &self.query.to_string())
            .field("scorer", &self.scorer.name())
            .field("config", &self.config)
            .field("buffered", &self.hits.len())
            .field("total_hits", &self.total_hits)
            .field("state", &self.state)
            .finish()
    }
}
