//! The listing view: one page of rows, windowed, with filter, sort and
//! pagination state and a single-flight fetch loop.
//!
//! All methods take `&self`; state sits behind mutexes so the view can be
//! shared through an `Arc` between an input loop and a fetch task. Event
//! callbacks run outside the state lock, except the closure passed to
//! [`ListingView::render`], which must not call back into the view.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use log::{debug, error, warn};

use crate::api::models::Listing;
use crate::core::filter::{FilterField, FilterSpec, FilterValue};
use crate::core::guard::{Admission, FetchGuard, OverlapPolicy};
use crate::core::overlay::{AnnotatedRow, Membership, annotate_window};
use crate::core::pagination::{PageDelegate, PaginationController};
use crate::core::sort::SortSpec;
use crate::core::source::{ListingSource, PageRequest, PageResult};
use crate::display::window::{HeightCache, ViewportWindower, VisibleRange};
use crate::error::{AppError, ValidationError};

/// Notifications from the view. Every method has a no-op default.
pub trait ViewEvents: Send + Sync {
    /// Fired after every fetch resolution, success or not.
    fn on_stats_change(&self, _stats: &ViewStats) {}
    fn on_select(&self, _id: &str, _selected: bool) {}
    fn on_save(&self, _row: &Listing, _saved: bool) {}
    fn on_action(&self, _action: &str, _row: &Listing) {}
}

/// Events sink that ignores everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopEvents;

impl ViewEvents for NoopEvents {}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ViewStats {
    pub total_count: usize,
    pub total_pages: usize,
    pub current_page: usize,
    pub page_size: usize,
    pub loaded_rows: usize,
    pub active_filters: usize,
    pub loading: bool,
    /// Set when the last fetch was rejected by local validation.
    pub warning: Option<String>,
}

/// Standalone views print their own pagination summary; embedded ones
/// leave that to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewVariant {
    #[default]
    Standalone,
    Embedded,
}

/// A scroll container owned by the caller.
pub trait ScrollHost: Send + Sync {
    fn scroll_offset(&self) -> f64;
    fn viewport_height(&self) -> f64;
}

enum ScrollContainer {
    Owned { offset: f64, height: f64 },
    Host { host: Arc<dyn ScrollHost>, content_top: f64 },
}

impl ScrollContainer {
    /// Scroll offset relative to the first row, and viewport height.
    fn metrics(&self) -> (f64, f64) {
        match self {
            ScrollContainer::Owned { offset, height } => (*offset, *height),
            ScrollContainer::Host { host, content_top } => (
                (host.scroll_offset() - content_top).max(0.0),
                host.viewport_height(),
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ViewConfig {
    pub page_size: usize,
    pub row_height: f64,
    pub overscan: usize,
    pub viewport_height: f64,
    pub overlap_policy: OverlapPolicy,
    pub variant: ViewVariant,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            page_size: 25,
            row_height: 72.0,
            overscan: 5,
            viewport_height: 600.0,
            overlap_policy: OverlapPolicy::default(),
            variant: ViewVariant::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    Applied { rows: usize, total_count: usize },
    /// Local validation failed; the page is empty and a warning is set.
    Rejected(ValidationError),
    /// The source failed; the page is empty. Not retried.
    Failed(String),
    Queued,
    Coalesced,
    Dropped,
    /// Resolved after a newer trigger; discarded.
    Superseded,
    Closed,
}

struct ViewState {
    filter: FilterSpec,
    sort: SortSpec,
    pagination: PaginationController,
    rows: Vec<Listing>,
    loading: bool,
    warning: Option<String>,
}

impl ViewState {
    fn stats(&self) -> ViewStats {
        ViewStats {
            total_count: self.pagination.total_count(),
            total_pages: self.pagination.total_pages(),
            current_page: self.pagination.current_page(),
            page_size: self.pagination.page_size(),
            loaded_rows: self.rows.len(),
            active_filters: self.filter.active_count(),
            loading: self.loading,
            warning: self.warning.clone(),
        }
    }

    fn clear_page(&mut self) {
        self.rows.clear();
        self.pagination.set_total_count(0);
    }
}

/// The current collection. `epoch` bumps on every swap.
struct SourceSlot {
    epoch: u64,
    source: Arc<dyn ListingSource>,
}

/// What the fetch guard compares: a request against one collection.
#[derive(Debug, Clone, PartialEq)]
struct FetchKey {
    epoch: u64,
    request: PageRequest,
}

fn lock<T: ?Sized>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

pub struct ListingView {
    source: Mutex<SourceSlot>,
    guard: FetchGuard<FetchKey>,
    state: Mutex<ViewState>,
    heights: Mutex<HeightCache>,
    scroll: Mutex<ScrollContainer>,
    windower: ViewportWindower,
    events: Arc<dyn ViewEvents>,
    variant: ViewVariant,
    closed: AtomicBool,
}

impl ListingView {
    pub fn new(source: Arc<dyn ListingSource>, config: ViewConfig) -> Result<Self, ValidationError> {
        let windower = ViewportWindower::new(config.row_height, config.overscan)?;
        let pagination = PaginationController::new(config.page_size)?;

        Ok(Self {
            source: Mutex::new(SourceSlot { epoch: 0, source }),
            guard: FetchGuard::new(config.overlap_policy),
            state: Mutex::new(ViewState {
                filter: FilterSpec::new(),
                sort: SortSpec::default(),
                pagination,
                rows: Vec::new(),
                loading: false,
                warning: None,
            }),
            heights: Mutex::new(HeightCache::new(config.row_height)),
            scroll: Mutex::new(ScrollContainer::Owned {
                offset: 0.0,
                height: config.viewport_height.max(0.0),
            }),
            windower,
            events: Arc::new(NoopEvents),
            variant: config.variant,
            closed: AtomicBool::new(false),
        })
    }

    pub fn with_events(mut self, events: Arc<dyn ViewEvents>) -> Self {
        self.events = events;
        self
    }

    /// Read scroll position from a parent container. `content_top` is where
    /// the first row sits inside that container.
    pub fn with_scroll_host(self, host: Arc<dyn ScrollHost>, content_top: f64) -> Self {
        *lock(&self.scroll) = ScrollContainer::Host { host, content_top };
        self
    }

    /// Hand page state to a caller. The callbacks run while the view's state
    /// is locked and must not call back into the view.
    pub fn with_page_delegate(self, delegate: PageDelegate) -> Result<Self, ValidationError> {
        {
            let mut state = lock(&self.state);
            let page_size = state.pagination.page_size();
            state.pagination = PaginationController::delegated(page_size, delegate)?;
        }
        Ok(self)
    }

    pub fn variant(&self) -> ViewVariant {
        self.variant
    }

    pub fn overlap_policy(&self) -> OverlapPolicy {
        self.guard.policy()
    }

    pub fn current_request(&self) -> PageRequest {
        let state = lock(&self.state);
        PageRequest {
            page: state.pagination.current_page(),
            page_size: state.pagination.page_size(),
            filter: state.filter.clone(),
            sort: state.sort,
        }
    }

    pub fn filter(&self) -> FilterSpec {
        lock(&self.state).filter.clone()
    }

    pub fn sort(&self) -> SortSpec {
        lock(&self.state).sort
    }

    /// Edit the filter spec. Any effective change returns to page 1.
    /// Returns whether the filter changed; on error nothing is modified.
    pub fn update_filter<F>(&self, edit: F) -> Result<bool, ValidationError>
    where
        F: FnOnce(&mut FilterSpec) -> Result<(), ValidationError>,
    {
        let mut state = lock(&self.state);
        let mut next = state.filter.clone();
        edit(&mut next)?;
        if next == state.filter {
            return Ok(false);
        }

        debug!(
            "filters changed: {} -> {} active",
            state.filter.active_count(),
            next.active_count()
        );
        state.filter = next;
        state.pagination.reset();
        drop(state);
        self.scroll_to_top();
        Ok(true)
    }

    pub fn set_filter(&self, field: FilterField, value: FilterValue) -> Result<bool, ValidationError> {
        self.update_filter(|spec| spec.set(field, value))
    }

    pub fn clear_filter(&self, field: FilterField) -> bool {
        self.update_filter(|spec| {
            spec.remove(field);
            Ok(())
        })
        .unwrap_or(false)
    }

    pub fn clear_filters(&self) -> bool {
        self.update_filter(|spec| {
            spec.clear();
            Ok(())
        })
        .unwrap_or(false)
    }

    pub fn set_sort(&self, sort: SortSpec) -> bool {
        let mut state = lock(&self.state);
        if state.sort == sort {
            return false;
        }
        debug!("sort changed: {} -> {}", state.sort, sort);
        state.sort = sort;
        state.pagination.reset();
        drop(state);
        self.scroll_to_top();
        true
    }

    pub fn go_to_page(&self, page: usize) -> usize {
        let page = lock(&self.state).pagination.go_to_page(page);
        self.scroll_to_top();
        page
    }

    pub fn next_page(&self) -> bool {
        let moved = lock(&self.state).pagination.next_page();
        if moved {
            self.scroll_to_top();
        }
        moved
    }

    pub fn previous_page(&self) -> bool {
        let moved = lock(&self.state).pagination.previous_page();
        if moved {
            self.scroll_to_top();
        }
        moved
    }

    pub fn set_page_size(&self, page_size: usize) -> Result<(), ValidationError> {
        lock(&self.state).pagination.set_page_size(page_size)?;
        self.scroll_to_top();
        Ok(())
    }

    /// Accept page state from a delegating caller.
    pub fn sync_page(&self, page: usize, page_size: usize) -> Result<(), ValidationError> {
        lock(&self.state).pagination.sync(page, page_size)
    }

    /// Switch to another collection. Returns to page 1 and drops measured
    /// heights of the previous collection.
    pub fn replace_source(&self, source: Arc<dyn ListingSource>) {
        debug!("source replaced with {}", source.describe());
        {
            let mut slot = lock(&self.source);
            slot.epoch += 1;
            slot.source = source;
        }
        {
            let mut state = lock(&self.state);
            state.pagination.reset();
            state.clear_page();
        }
        lock(&self.heights).clear();
        self.scroll_to_top();
    }

    /// Fetch the page for the current state, subject to the overlap policy.
    pub async fn refresh(&self) -> FetchOutcome {
        if self.is_closed() {
            return FetchOutcome::Closed;
        }

        let key = FetchKey {
            epoch: lock(&self.source).epoch,
            request: self.current_request(),
        };
        let mut permit = match self.guard.try_enter(key) {
            Admission::Entered(permit) => permit,
            Admission::Queued => {
                debug!("fetch queued behind in-flight request");
                return FetchOutcome::Queued;
            }
            Admission::Coalesced => return FetchOutcome::Coalesced,
            Admission::Dropped => {
                warn!("fetch dropped: another fetch is in flight");
                return FetchOutcome::Dropped;
            }
        };

        loop {
            let epoch = permit.request().epoch;
            let source = {
                let slot = lock(&self.source);
                (slot.epoch == epoch).then(|| Arc::clone(&slot.source))
            };

            let outcome = match source {
                Some(source) => {
                    lock(&self.state).loading = true;
                    let request = &permit.request().request;
                    let result = source.fetch_page(request).await;

                    if self.is_closed() {
                        debug!("view closed; discarding page {}", request.page);
                        return FetchOutcome::Closed;
                    }

                    // A swap during the fetch makes the result stale under either policy
                    if permit.is_current() && lock(&self.source).epoch == epoch {
                        self.apply(&source.describe(), request, result)
                    } else {
                        warn!(
                            "discarding superseded page {} (generation {})",
                            request.page,
                            permit.generation()
                        );
                        lock(&self.state).loading = false;
                        FetchOutcome::Superseded
                    }
                }
                None => {
                    debug!("collection replaced before fetch; skipping");
                    FetchOutcome::Superseded
                }
            };

            match permit.advance() {
                Some(next) => permit = next,
                None => return outcome,
            }
        }
    }

    fn apply(
        &self,
        source: &str,
        request: &PageRequest,
        result: Result<PageResult, AppError>,
    ) -> FetchOutcome {
        let (outcome, stats) = {
            let mut state = lock(&self.state);
            state.loading = false;

            let outcome = match result {
                Ok(page) => {
                    let rows = page.rows.len();
                    let total_count = page.total_count;
                    state.pagination.set_total_count(total_count);
                    state.rows = page.rows;
                    state.warning = None;
                    FetchOutcome::Applied { rows, total_count }
                }
                Err(AppError::Validation(err)) => {
                    warn!("{}: {}", source, err);
                    state.clear_page();
                    state.warning = Some(err.to_string());
                    FetchOutcome::Rejected(err)
                }
                Err(err) => {
                    error!("{}: failed to load page {}: {}", source, request.page, err);
                    state.clear_page();
                    state.warning = None;
                    FetchOutcome::Failed(err.to_string())
                }
            };
            (outcome, state.stats())
        };

        self.events.on_stats_change(&stats);
        outcome
    }

    pub fn stats(&self) -> ViewStats {
        lock(&self.state).stats()
    }

    /// Pagination summary line; `None` for embedded views.
    pub fn summary(&self) -> Option<String> {
        match self.variant {
            ViewVariant::Standalone => Some(lock(&self.state).pagination.get_pagination_info()),
            ViewVariant::Embedded => None,
        }
    }

    /// Snapshot of the loaded page.
    pub fn rows(&self) -> Vec<Listing> {
        lock(&self.state).rows.clone()
    }

    /// Update the owned scroll offset. Ignored when a host owns scrolling.
    pub fn on_scroll(&self, offset: f64) {
        match &mut *lock(&self.scroll) {
            ScrollContainer::Owned { offset: current, .. } => *current = offset.max(0.0),
            ScrollContainer::Host { .. } => debug!("scroll is driven by the host container"),
        }
    }

    pub fn on_resize(&self, viewport_height: f64) {
        if let ScrollContainer::Owned { height, .. } = &mut *lock(&self.scroll) {
            *height = viewport_height.max(0.0);
        }
    }

    fn scroll_to_top(&self) {
        if let ScrollContainer::Owned { offset, .. } = &mut *lock(&self.scroll) {
            *offset = 0.0;
        }
    }

    /// Report a rendered row's real height. Returns true when layout changed.
    pub fn record_row_height(&self, id: &str, height: f64) -> bool {
        lock(&self.heights).record(id, height)
    }

    pub fn visible_range(&self) -> VisibleRange {
        let (offset, height) = lock(&self.scroll).metrics();
        let state = lock(&self.state);
        self.window(&state.rows, offset, height)
    }

    fn window(&self, rows: &[Listing], offset: f64, height: f64) -> VisibleRange {
        let keys: Vec<&str> = rows.iter().map(Listing::id).collect();
        let heights = lock(&self.heights);
        self.windower.compute_measured(&keys, &heights, offset, height)
    }

    /// Run `f` over the annotated rows of the current window.
    pub fn render<R>(
        &self,
        selection: &dyn Membership,
        saved: &dyn Membership,
        f: impl FnOnce(&[AnnotatedRow<'_>]) -> R,
    ) -> R {
        let (offset, height) = lock(&self.scroll).metrics();
        let state = lock(&self.state);
        let range = self.window(&state.rows, offset, height);
        let annotated = annotate_window(&state.rows, &range, selection, saved);
        f(&annotated)
    }

    fn find_row(&self, id: &str) -> Option<Listing> {
        lock(&self.state)
            .rows
            .iter()
            .find(|row| row.id() == id)
            .cloned()
    }

    /// Report a selection toggle for a loaded row.
    pub fn toggle_select(&self, id: &str, selection: &dyn Membership, saved: &dyn Membership) -> bool {
        let Some(row) = self.find_row(id) else {
            return false;
        };
        AnnotatedRow::new(0, 0.0, &row, selection, saved).toggle_select(self.events.as_ref());
        true
    }

    /// Report a save toggle for a loaded row.
    pub fn toggle_save(&self, id: &str, selection: &dyn Membership, saved: &dyn Membership) -> bool {
        let Some(row) = self.find_row(id) else {
            return false;
        };
        AnnotatedRow::new(0, 0.0, &row, selection, saved).toggle_save(self.events.as_ref());
        true
    }

    pub fn trigger_action(&self, id: &str, action: &str) -> bool {
        let Some(row) = self.find_row(id) else {
            return false;
        };
        self.events.on_action(action, &row);
        true
    }

    /// Tear the view down. In-flight results are discarded and later
    /// refreshes do nothing.
    pub fn close(&self) {
        if !self.closed.swap(true, Ordering::SeqCst) {
            debug!("view closed");
            let mut state = lock(&self.state);
            state.loading = false;
        }
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::filter::NumericRange;
    use crate::core::sort::SortKey;
    use crate::core::source::LocalSource;
    use crate::error::ApiError;
    use async_trait::async_trait;
    use std::collections::HashSet;
    use std::sync::atomic::AtomicUsize;

    fn priced(count: usize) -> Vec<Listing> {
        (0..count)
            .map(|i| Listing {
                listing_id: Some(format!("L{:03}", i)),
                list_price: Some(10_000.0 * i as f64),
                ..Default::default()
            })
            .collect()
    }

    fn local_view(count: usize) -> ListingView {
        ListingView::new(Arc::new(LocalSource::new(priced(count))), ViewConfig::default())
            .expect("view")
    }

    #[derive(Default)]
    struct StatsRecorder {
        stats: Mutex<Vec<ViewStats>>,
    }

    impl ViewEvents for StatsRecorder {
        fn on_stats_change(&self, stats: &ViewStats) {
            self.stats.lock().unwrap().push(stats.clone());
        }
    }

    struct FailingSource {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl ListingSource for FailingSource {
        async fn fetch_page(&self, _request: &PageRequest) -> Result<PageResult, AppError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(ApiError::Http {
                status: 500,
                endpoint: "/listings/paginated".to_string(),
                message: "boom".to_string(),
            }
            .into())
        }

        fn describe(&self) -> String {
            "failing".to_string()
        }
    }

    #[test]
    fn test_invalid_config_rejected() {
        let source: Arc<dyn ListingSource> = Arc::new(LocalSource::new(Vec::new()));
        let zero_page = ViewConfig {
            page_size: 0,
            ..Default::default()
        };
        assert!(ListingView::new(Arc::clone(&source), zero_page).is_err());

        let bad_height = ViewConfig {
            row_height: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            ListingView::new(source, bad_height),
            Err(ValidationError::InvalidRowHeight { .. })
        ));
    }

    #[tokio::test]
    async fn test_refresh_applies_page_and_emits_stats() {
        let recorder = Arc::new(StatsRecorder::default());
        let view = local_view(120).with_events(recorder.clone());

        let outcome = view.refresh().await;
        assert_eq!(
            outcome,
            FetchOutcome::Applied {
                rows: 25,
                total_count: 120
            }
        );

        let stats = recorder.stats.lock().unwrap();
        assert_eq!(stats.len(), 1);
        assert_eq!(stats[0].total_pages, 5);
        assert!(!stats[0].loading);
    }

    #[tokio::test]
    async fn test_filter_change_resets_page() {
        let view = local_view(120);
        view.refresh().await;
        assert_eq!(view.go_to_page(3), 3);

        let changed = view
            .set_filter(
                FilterField::Price,
                FilterValue::Range(NumericRange::at_least(500_000.0)),
            )
            .expect("filter");
        assert!(changed);
        assert_eq!(view.current_request().page, 1);

        view.refresh().await;
        let stats = view.stats();
        assert_eq!(stats.total_count, 70);
        assert_eq!(stats.total_pages, 3);
        assert_eq!(stats.active_filters, 1);
    }

    #[tokio::test]
    async fn test_sort_and_page_size_changes_reset_page() {
        let view = local_view(120);
        view.refresh().await;

        view.go_to_page(4);
        assert!(view.set_sort(SortSpec::from(SortKey::PriceHigh)));
        assert_eq!(view.current_request().page, 1);
        assert!(!view.set_sort(SortSpec::from(SortKey::PriceHigh)));

        view.go_to_page(2);
        view.set_page_size(50).expect("page size");
        assert_eq!(view.current_request().page, 1);
        assert_eq!(view.current_request().page_size, 50);
    }

    #[tokio::test]
    async fn test_unchanged_filter_keeps_page() {
        let view = local_view(120);
        view.refresh().await;
        view.go_to_page(2);
        let changed = view
            .set_filter(FilterField::Search, FilterValue::Text("  ".to_string()))
            .expect("filter");
        assert!(!changed);
        assert_eq!(view.current_request().page, 2);
    }

    #[tokio::test]
    async fn test_network_failure_clears_page() {
        let source = Arc::new(FailingSource {
            calls: AtomicUsize::new(0),
        });
        let view = ListingView::new(source.clone(), ViewConfig::default()).expect("view");

        let outcome = view.refresh().await;
        assert!(matches!(outcome, FetchOutcome::Failed(_)));
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);

        let stats = view.stats();
        assert_eq!(stats.total_count, 0);
        assert_eq!(stats.loaded_rows, 0);
        assert!(!stats.loading);
        assert!(stats.warning.is_none());
    }

    #[tokio::test]
    async fn test_replace_source_resets_state() {
        let view = local_view(120);
        view.refresh().await;
        view.go_to_page(2);
        view.record_row_height("L030", 200.0);

        view.replace_source(Arc::new(LocalSource::new(priced(3))));
        assert_eq!(view.current_request().page, 1);
        assert!(view.rows().is_empty());

        view.refresh().await;
        assert_eq!(view.stats().total_count, 3);
    }

    #[tokio::test]
    async fn test_closed_view_ignores_refresh() {
        let view = local_view(10);
        view.close();
        assert_eq!(view.refresh().await, FetchOutcome::Closed);
        assert!(view.rows().is_empty());
    }

    #[tokio::test]
    async fn test_windowing_uses_owned_scroll() {
        let view = local_view(25);
        view.refresh().await;
        view.on_resize(144.0);
        view.on_scroll(720.0);

        let range = view.visible_range();
        // Rows 10..=11 visible, five rows of overscan on each side
        assert_eq!(range.start_index(), 5);
        assert_eq!(range.end_index(), Some(17));

        view.set_sort(SortSpec::from(SortKey::PriceLow));
        assert_eq!(view.visible_range().start_index(), 0);
    }

    struct FixedHost;

    impl ScrollHost for FixedHost {
        fn scroll_offset(&self) -> f64 {
            1000.0
        }

        fn viewport_height(&self) -> f64 {
            72.0
        }
    }

    #[tokio::test]
    async fn test_windowing_reads_host_scroll() {
        let view = local_view(25).with_scroll_host(Arc::new(FixedHost), 280.0);
        view.refresh().await;
        view.on_scroll(0.0);

        // 1000 - 280 = 720 into the table
        let range = view.visible_range();
        assert_eq!(range.start_index(), 5);
    }

    #[tokio::test]
    async fn test_render_annotates_window() {
        let view = local_view(5);
        view.refresh().await;

        // Relevance sort with equal scores and no dates falls back to price desc
        let selection: HashSet<String> = ["L004".to_string()].into_iter().collect();
        let saved: HashSet<String> = HashSet::new();
        let first = view.render(&selection, &saved, |rows| {
            (rows.len(), rows[0].row.id().to_string(), rows[0].is_selected)
        });
        assert_eq!(first, (5, "L004".to_string(), true));
    }

    #[tokio::test]
    async fn test_summary_suppressed_when_embedded() {
        let standalone = local_view(30);
        standalone.refresh().await;
        assert_eq!(
            standalone.summary().as_deref(),
            Some("Showing 1-25 of 30 listings (Page 1 of 2)")
        );

        let embedded = ListingView::new(
            Arc::new(LocalSource::new(priced(30))),
            ViewConfig {
                variant: ViewVariant::Embedded,
                ..Default::default()
            },
        )
        .expect("view");
        embedded.refresh().await;
        assert!(embedded.summary().is_none());
    }
}
