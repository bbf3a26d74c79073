//! Rate-limited pagination loop
//!
//! For every page: wait for a rate limiter slot, fetch the page, filter its
//! items, merge the survivors into the running top-K set, and continue while
//! the API reports more pages. Any error ends the run and discards the
//! partial ranking.

use std::sync::Arc;

use sx_http::PageFetcher;
use sx_http::SearchParams;
use sx_ratelimit::CancellationToken;
use sx_ratelimit::RateLimiter;
use sx_types::Item;
use sx_types::Page;
use tracing::debug;
use tracing::info;
use tracing::warn;

use crate::error::Result;
use crate::error::SearchError;
use crate::filter::Filter;
use crate::filter::Unanswered;
use crate::topk::TopQuestions;

/// Remaining daily quota below which every page logs a warning
const LOW_QUOTA_THRESHOLD: u32 = 10;

/// Counters for a completed run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub pages: u32,
    pub items_seen: usize,
    pub items_kept: usize,
    pub quota_remaining: Option<u32>,
}

/// Drives one search run at a time over a fetcher, filter and shared rate limiter
pub struct Orchestrator<F, P = Unanswered> {
    limiter: Arc<dyn RateLimiter>,
    fetcher: F,
    filter: P,
}

impl<F: PageFetcher> Orchestrator<F> {
    /// Orchestrator ranking unanswered questions only
    pub fn new(limiter: Arc<dyn RateLimiter>, fetcher: F) -> Self {
        Self { limiter, fetcher, filter: Unanswered }
    }
}

impl<F: PageFetcher, P: Filter> Orchestrator<F, P> {
    /// Orchestrator with a caller supplied filter
    pub fn with_filter(limiter: Arc<dyn RateLimiter>, fetcher: F, filter: P) -> Self {
        Self { limiter, fetcher, filter }
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Run the search to completion and return the final ranking
    pub async fn run(&self, params: &SearchParams, cancel: &CancellationToken) -> Result<TopQuestions> {
        self.run_with_summary(params, cancel).await.map(|(top, _)| top)
    }

    /// Run the search, also returning per-run counters
    pub async fn run_with_summary(&self, params: &SearchParams, cancel: &CancellationToken) -> Result<(TopQuestions, RunSummary)> {
        let mut top = TopQuestions::new();
        let mut summary = RunSummary::default();
        let mut page_number: u32 = 1;

        loop {
            self.limiter.acquire_one(cancel).await.map_err(|err| {
                debug!(page = page_number, error = %err, "Rate limiter refused call slot");
                SearchError::from(err)
            })?;

            let page = self.fetcher.fetch(params, page_number).await.map_err(|err| SearchError::from_fetch(page_number, err))?;
            self.observe_page(page_number, &page);

            let Page { items, has_more, quota, .. } = page;
            summary.pages += 1;
            summary.items_seen += items.len();
            summary.quota_remaining = Some(quota.quota_remaining);

            let kept: Vec<Item> = items.into_iter().filter(|item| self.filter.keep(item)).collect();
            summary.items_kept += kept.len();

            top = top.merge(kept);

            if !has_more {
                break;
            }
            page_number = page_number.saturating_add(1);
        }

        info!(
            pages = summary.pages,
            items_seen = summary.items_seen,
            items_kept = summary.items_kept,
            ranked = top.len(),
            "Search run complete"
        );

        Ok((top, summary))
    }

    fn observe_page(&self, page_number: u32, page: &Page) {
        debug!(
            page = page_number,
            items = page.items.len(),
            has_more = page.has_more,
            quota_used = page.quota.used(),
            quota_remaining = page.quota.quota_remaining,
            "Processing page"
        );

        if page.quota.quota_max > 0 && page.quota.quota_remaining < LOW_QUOTA_THRESHOLD {
            warn!(quota_remaining = page.quota.quota_remaining, quota_max = page.quota.quota_max, "API quota nearly exhausted");
        }

        if let Some(backoff) = page.backoff {
            warn!(page = page_number, backoff_secs = backoff, "API asked for a backoff before the next request");
        }
    }
}
