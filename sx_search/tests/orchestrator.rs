//! End-to-end tests of the pagination loop with scripted pages

use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::AtomicU32;
use std::sync::atomic::Ordering;
use std::time::Duration;

use proptest::prelude::*;
use sx_http::HttpError;
use sx_http::PageFetcher;
use sx_http::SearchParams;
use sx_ratelimit::CancellationToken;
use sx_ratelimit::RateLimitError;
use sx_ratelimit::RateLimiter;
use sx_ratelimit::TokenBucket;
use sx_search::Orchestrator;
use sx_search::SearchError;
use sx_search::TOP_K;
use sx_types::Item;
use sx_types::Page;

/// Replays a fixed list of page outcomes and records the page numbers requested
struct ScriptedFetcher {
    pages: Mutex<VecDeque<sx_http::Result<Page>>>,
    requested: Mutex<Vec<u32>>,
}

impl ScriptedFetcher {
    fn new(pages: Vec<sx_http::Result<Page>>) -> Self {
        Self { pages: Mutex::new(pages.into()), requested: Mutex::new(Vec::new()) }
    }

    fn requested(&self) -> Vec<u32> {
        self.requested.lock().unwrap().clone()
    }
}

impl PageFetcher for ScriptedFetcher {
    fn fetch<'a>(&'a self, _params: &'a SearchParams, page: u32) -> Pin<Box<dyn Future<Output = sx_http::Result<Page>> + Send + 'a>> {
        Box::pin(async move {
            self.requested.lock().unwrap().push(page);
            self.pages.lock().unwrap().pop_front().unwrap_or_else(|| panic!("Unexpected fetch of page {page}"))
        })
    }
}

/// Grants every call slot except the Nth, which reports cancellation
struct CancelOnNth {
    nth: u32,
    calls: AtomicU32,
}

impl RateLimiter for CancelOnNth {
    fn try_acquire(&self, _weight: u32) -> sx_ratelimit::Result<()> {
        Ok(())
    }

    fn acquire<'a>(&'a self, _weight: u32, _cancel: &'a CancellationToken) -> Pin<Box<dyn Future<Output = sx_ratelimit::Result<()>> + Send + 'a>> {
        Box::pin(async move {
            let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            if call == self.nth { Err(RateLimitError::Cancelled) } else { Ok(()) }
        })
    }

    fn available(&self) -> u32 {
        u32::MAX
    }

    fn capacity(&self) -> u32 {
        u32::MAX
    }

    fn reset(&self) {
        self.calls.store(0, Ordering::SeqCst);
    }
}

fn params() -> SearchParams {
    SearchParams::trailing_year("git", Some("go".to_string()))
}

fn limiter() -> Arc<dyn RateLimiter> {
    Arc::new(TokenBucket::new(30, 1.0))
}

/// Unanswered items with consecutive ids starting at `first_id`
fn unanswered(first_id: u64, view_counts: &[u64]) -> Vec<Item> {
    view_counts
        .iter()
        .enumerate()
        .map(|(i, &views)| {
            let id = first_id + i as u64;
            Item::new(id, views, 1_700_000_000, format!("https://stackoverflow.com/questions/{id}"))
        })
        .collect()
}

fn view_counts(items: &[Item]) -> Vec<u64> {
    items.iter().map(|item| item.view_count).collect()
}

#[tokio::test(start_paused = true)]
async fn test_two_page_scenario() {
    let fetcher = ScriptedFetcher::new(vec![
        Ok(Page::new(unanswered(1, &[10, 50, 5, 20, 90, 3, 40]), true)),
        Ok(Page::new(unanswered(100, &[200, 1]), false)),
    ]);
    let orchestrator = Orchestrator::new(limiter(), fetcher);

    let top = orchestrator.run(&params(), &CancellationToken::new()).await.unwrap();

    assert_eq!(view_counts(top.as_slice()), vec![200, 90, 50, 40, 20]);
    assert_eq!(orchestrator.fetcher().requested(), vec![1, 2]);
}

#[tokio::test(start_paused = true)]
async fn test_single_page_scenario() {
    let fetcher = ScriptedFetcher::new(vec![Ok(Page::new(unanswered(1, &[1, 2, 3]), false))]);
    let orchestrator = Orchestrator::new(limiter(), fetcher);

    let top = orchestrator.run(&params(), &CancellationToken::new()).await.unwrap();

    assert_eq!(top.len(), 3);
    assert_eq!(view_counts(top.as_slice()), vec![3, 2, 1]);
    assert_eq!(orchestrator.fetcher().requested(), vec![1], "exactly one fetch when page 1 is the last page");
}

#[tokio::test(start_paused = true)]
async fn test_answered_items_are_excluded() {
    let mut items = unanswered(1, &[5, 6]);
    items.push(Item::new(50, 10_000, 0, "https://stackoverflow.com/questions/50").answered());
    let fetcher = ScriptedFetcher::new(vec![Ok(Page::new(items, false))]);
    let orchestrator = Orchestrator::new(limiter(), fetcher);

    let top = orchestrator.run(&params(), &CancellationToken::new()).await.unwrap();

    assert_eq!(view_counts(top.as_slice()), vec![6, 5]);
    assert!(top.iter().all(|item| !item.is_answered));
}

#[tokio::test(start_paused = true)]
async fn test_transport_error_discards_partial_ranking() {
    let fetcher = ScriptedFetcher::new(vec![
        Ok(Page::new(unanswered(1, &[10, 50, 5, 20, 90, 3, 40]), true)),
        Err(HttpError::UnexpectedStatus(502)),
    ]);
    let orchestrator = Orchestrator::new(limiter(), fetcher);

    let result = orchestrator.run(&params(), &CancellationToken::new()).await;

    match result {
        Err(SearchError::Transport { page, source }) => {
            assert_eq!(page, 2);
            assert!(matches!(source, HttpError::UnexpectedStatus(502)));
        }
        other => panic!("Expected transport error, got: {other:?}"),
    }
    assert_eq!(orchestrator.fetcher().requested(), vec![1, 2]);
}

#[tokio::test(start_paused = true)]
async fn test_decode_error_fails_run() {
    let json_err = serde_json::from_str::<Page>("{\"items\": 3}").unwrap_err();
    let fetcher = ScriptedFetcher::new(vec![Err(HttpError::JsonError(json_err))]);
    let orchestrator = Orchestrator::new(limiter(), fetcher);

    let result = orchestrator.run(&params(), &CancellationToken::new()).await;

    assert!(matches!(result, Err(SearchError::Decode { page: 1, .. })), "got: {result:?}");
}

#[tokio::test(start_paused = true)]
async fn test_cancelled_acquire_stops_before_fetch() {
    let fetcher = ScriptedFetcher::new(vec![
        Ok(Page::new(unanswered(1, &[1]), true)),
        Ok(Page::new(unanswered(2, &[2]), true)),
        Ok(Page::new(unanswered(3, &[3]), true)),
    ]);
    let limiter = Arc::new(CancelOnNth { nth: 3, calls: AtomicU32::new(0) });
    let orchestrator = Orchestrator::new(limiter, fetcher);

    let result = orchestrator.run(&params(), &CancellationToken::new()).await;

    assert!(matches!(result, Err(SearchError::RateLimitCancelled)), "got: {result:?}");
    assert_eq!(orchestrator.fetcher().requested(), vec![1, 2], "no fetch for the cancelled page or later");
}

#[tokio::test(start_paused = true)]
async fn test_cancellation_while_waiting_for_token() {
    let pages = (0..5).map(|i| Ok(Page::new(unanswered(i * 10, &[i]), true))).collect();
    let fetcher = ScriptedFetcher::new(pages);
    let orchestrator = Orchestrator::new(Arc::new(TokenBucket::new(2, 1.0)), fetcher);

    let cancel = CancellationToken::new();
    let canceller = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(500)).await;
        canceller.cancel();
    });

    let result = orchestrator.run(&params(), &cancel).await;

    assert!(matches!(result, Err(SearchError::RateLimitCancelled)), "got: {result:?}");
    assert_eq!(orchestrator.fetcher().requested(), vec![1, 2], "burst of two, then the third wait is cancelled");
}

#[tokio::test(start_paused = true)]
async fn test_pages_beyond_burst_are_paced() {
    let pages = (0..33).map(|i| Ok(Page::new(unanswered(i * 10, &[i]), i < 32))).collect();
    let orchestrator = Orchestrator::new(limiter(), ScriptedFetcher::new(pages));
    let start = tokio::time::Instant::now();

    let top = orchestrator.run(&params(), &CancellationToken::new()).await.unwrap();

    // 30 pages ride the burst, the remaining 3 each wait a second
    assert!(start.elapsed() >= Duration::from_secs(3));
    assert_eq!(orchestrator.fetcher().requested().len(), 33);
    assert_eq!(view_counts(top.as_slice()), vec![32, 31, 30, 29, 28]);
}

fn run_blocking(orchestrator: &Orchestrator<ScriptedFetcher>) -> sx_search::Result<sx_search::TopQuestions> {
    tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .start_paused(true)
        .build()
        .unwrap()
        .block_on(orchestrator.run(&params(), &CancellationToken::new()))
}

proptest! {
    #[test]
    fn prop_run_properties(pages in proptest::collection::vec(proptest::collection::vec((0u64..10_000, any::<bool>()), 0..30), 1..6)) {
        let page_count = pages.len();
        let mut next_id = 0u64;
        let mut expected_unanswered = Vec::new();
        let mut scripted = Vec::new();

        for (index, page) in pages.into_iter().enumerate() {
            let items: Vec<Item> = page
                .into_iter()
                .map(|(views, answered)| {
                    next_id += 1;
                    let item = Item::new(next_id, views, 0, format!("https://stackoverflow.com/questions/{next_id}"));
                    if answered { item.answered() } else { item }
                })
                .collect();
            expected_unanswered.extend(items.iter().filter(|item| !item.is_answered).cloned());
            scripted.push(Ok(Page::new(items, index + 1 < page_count)));
        }

        let orchestrator = Orchestrator::new(limiter(), ScriptedFetcher::new(scripted));
        let top = run_blocking(&orchestrator).unwrap();

        prop_assert_eq!(top.len(), expected_unanswered.len().min(TOP_K));
        prop_assert!(top.as_slice().windows(2).all(|pair| pair[0].view_count >= pair[1].view_count));
        prop_assert!(top.iter().all(|item| !item.is_answered));
        prop_assert_eq!(orchestrator.fetcher().requested(), (1..=page_count as u32).collect::<Vec<_>>());
    }
}
