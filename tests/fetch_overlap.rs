use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use futures::future::join_all;
use leadgrid::api::models::Listing;
use leadgrid::core::guard::OverlapPolicy;
use leadgrid::core::sort::{SortKey, SortSpec};
use leadgrid::core::source::{ListingSource, LocalSource, PageRequest, PageResult};
use leadgrid::core::view::{FetchOutcome, ListingView, ViewConfig};
use leadgrid::error::AppError;

/// Local rows served after a delay, recording every request it sees.
struct SlowSource {
    inner: LocalSource,
    delay: Duration,
    calls: AtomicUsize,
    seen: Mutex<Vec<SortSpec>>,
}

impl SlowSource {
    fn new(delay: Duration) -> Self {
        let rows = [("a", 300.0), ("b", 100.0), ("c", 200.0)]
            .into_iter()
            .map(|(id, price)| Listing {
                listing_id: Some(id.to_string()),
                list_price: Some(price),
                ..Default::default()
            })
            .collect();
        Self {
            inner: LocalSource::new(rows),
            delay,
            calls: AtomicUsize::new(0),
            seen: Mutex::new(Vec::new()),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ListingSource for SlowSource {
    async fn fetch_page(&self, request: &PageRequest) -> Result<PageResult, AppError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen
            .lock()
            .expect("seen lock")
            .push(request.sort);
        tokio::time::sleep(self.delay).await;
        self.inner.fetch_page(request).await
    }

    fn describe(&self) -> String {
        "slow".to_string()
    }
}

fn view_over(source: Arc<SlowSource>, policy: OverlapPolicy) -> ListingView {
    let config = ViewConfig {
        overlap_policy: policy,
        ..Default::default()
    };
    ListingView::new(source, config).expect("view")
}

fn ids(view: &ListingView) -> Vec<String> {
    view.rows().iter().map(|row| row.id().to_string()).collect()
}

#[tokio::test(start_paused = true)]
async fn test_identical_overlapping_refreshes_issue_one_call() {
    let source = Arc::new(SlowSource::new(Duration::from_millis(200)));
    let view = view_over(Arc::clone(&source), OverlapPolicy::LatestWins);

    let outcomes = join_all((0..5).map(|_| view.refresh())).await;

    assert_eq!(source.calls(), 1);
    assert_eq!(
        outcomes[0],
        FetchOutcome::Applied {
            rows: 3,
            total_count: 3
        }
    );
    assert!(
        outcomes[1..]
            .iter()
            .all(|outcome| *outcome == FetchOutcome::Coalesced)
    );
}

#[tokio::test(start_paused = true)]
async fn test_latest_trigger_wins_over_in_flight_fetch() {
    let source = Arc::new(SlowSource::new(Duration::from_millis(200)));
    let view = view_over(Arc::clone(&source), OverlapPolicy::LatestWins);

    let (first, second) = tokio::join!(view.refresh(), async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        view.set_sort(SortSpec::from(SortKey::PriceLow));
        view.refresh().await
    });

    assert_eq!(second, FetchOutcome::Queued);
    // The holder discards its own stale page and runs the queued one
    assert_eq!(
        first,
        FetchOutcome::Applied {
            rows: 3,
            total_count: 3
        }
    );
    assert_eq!(source.calls(), 2);
    assert_eq!(
        *source.seen.lock().expect("seen lock"),
        vec![SortSpec::default(), SortSpec::from(SortKey::PriceLow)]
    );
    assert_eq!(ids(&view), vec!["b", "c", "a"]);
}

#[tokio::test(start_paused = true)]
async fn test_drop_policy_ignores_overlapping_trigger() {
    let source = Arc::new(SlowSource::new(Duration::from_millis(200)));
    let view = view_over(Arc::clone(&source), OverlapPolicy::Drop);

    let (first, second) = tokio::join!(view.refresh(), async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        view.set_sort(SortSpec::from(SortKey::PriceLow));
        view.refresh().await
    });

    assert_eq!(second, FetchOutcome::Dropped);
    assert!(matches!(first, FetchOutcome::Applied { .. }));
    assert_eq!(source.calls(), 1);

    // The next trigger after the fetch settles goes through
    assert!(matches!(view.refresh().await, FetchOutcome::Applied { .. }));
    assert_eq!(ids(&view), vec!["b", "c", "a"]);
}

#[tokio::test(start_paused = true)]
async fn test_closed_view_discards_in_flight_result() {
    let source = Arc::new(SlowSource::new(Duration::from_millis(200)));
    let view = view_over(Arc::clone(&source), OverlapPolicy::LatestWins);

    let (outcome, _) = tokio::join!(view.refresh(), async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        view.close();
    });

    assert_eq!(outcome, FetchOutcome::Closed);
    assert!(view.rows().is_empty());
    assert_eq!(view.refresh().await, FetchOutcome::Closed);
}

fn fresh_collection() -> LocalSource {
    LocalSource::new(
        ["n0", "n1"]
            .into_iter()
            .map(|id| Listing {
                listing_id: Some(id.to_string()),
                ..Default::default()
            })
            .collect(),
    )
}

#[tokio::test(start_paused = true)]
async fn test_replaced_source_mid_fetch_never_shows_old_rows() {
    let source = Arc::new(SlowSource::new(Duration::from_millis(200)));
    let view = view_over(Arc::clone(&source), OverlapPolicy::LatestWins);

    let (first, second) = tokio::join!(view.refresh(), async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        view.replace_source(Arc::new(fresh_collection()));
        view.refresh().await
    });

    // Same page, filter and sort as the in-flight fetch, but another collection
    assert_eq!(second, FetchOutcome::Queued);
    assert_eq!(
        first,
        FetchOutcome::Applied {
            rows: 2,
            total_count: 2
        }
    );
    assert_eq!(source.calls(), 1);
    assert_eq!(ids(&view), vec!["n0", "n1"]);
    assert_eq!(view.stats().total_count, 2);
}

#[tokio::test(start_paused = true)]
async fn test_replaced_source_under_drop_policy_discards_old_page() {
    let source = Arc::new(SlowSource::new(Duration::from_millis(200)));
    let view = view_over(Arc::clone(&source), OverlapPolicy::Drop);

    let (first, second) = tokio::join!(view.refresh(), async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        view.replace_source(Arc::new(fresh_collection()));
        view.refresh().await
    });

    assert_eq!(second, FetchOutcome::Dropped);
    assert_eq!(first, FetchOutcome::Superseded);
    assert!(view.rows().is_empty());
    assert!(!view.stats().loading);

    assert!(matches!(view.refresh().await, FetchOutcome::Applied { .. }));
    assert_eq!(ids(&view), vec!["n0", "n1"]);
}
