use crate::core::source::total_pages;
use crate::error::ValidationError;

type PageCallback = Box<dyn Fn(usize) + Send + Sync>;

/// Callbacks for a caller that owns the page state
pub struct PageDelegate {
    on_page_change: PageCallback,
    on_page_size_change: PageCallback,
}

impl PageDelegate {
    pub fn new(
        on_page_change: impl Fn(usize) + Send + Sync + 'static,
        on_page_size_change: impl Fn(usize) + Send + Sync + 'static,
    ) -> Self {
        Self {
            on_page_change: Box::new(on_page_change),
            on_page_size_change: Box::new(on_page_size_change),
        }
    }
}

impl std::fmt::Debug for PageDelegate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("PageDelegate")
    }
}

/// Who drives page state
#[derive(Debug, Default)]
pub enum PaginationMode {
    #[default]
    SelfManaged,
    /// Every change is also reported to the caller, which may correct the
    /// local mirror through [`PaginationController::sync`].
    Delegated(PageDelegate),
}

/// Pagination controller - current page, page size and total count
///
/// Pages are 1-based. Any change to filters, sort, collection or page size
/// must go through [`reset`](PaginationController::reset) so a stale page is
/// never requested.
#[derive(Debug)]
pub struct PaginationController {
    current_page: usize,
    page_size: usize,
    total_count: usize,
    mode: PaginationMode,
}

impl PaginationController {
    /// Create new self-managed controller
    pub fn new(page_size: usize) -> Result<Self, ValidationError> {
        Self::with_mode(page_size, PaginationMode::SelfManaged)
    }

    /// Create new controller that reports to a caller
    pub fn delegated(page_size: usize, delegate: PageDelegate) -> Result<Self, ValidationError> {
        Self::with_mode(page_size, PaginationMode::Delegated(delegate))
    }

    fn with_mode(page_size: usize, mode: PaginationMode) -> Result<Self, ValidationError> {
        if page_size == 0 {
            return Err(ValidationError::ZeroPageSize);
        }
        Ok(Self {
            current_page: 1,
            page_size,
            total_count: 0,
            mode,
        })
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn total_count(&self) -> usize {
        self.total_count
    }

    pub fn total_pages(&self) -> usize {
        total_pages(self.total_count, self.page_size)
    }

    pub fn is_delegated(&self) -> bool {
        matches!(self.mode, PaginationMode::Delegated(_))
    }

    pub fn is_first_page(&self) -> bool {
        self.current_page <= 1
    }

    pub fn is_last_page(&self) -> bool {
        self.current_page >= self.total_pages()
    }

    pub fn has_next(&self) -> bool {
        !self.is_last_page()
    }

    pub fn has_previous(&self) -> bool {
        !self.is_first_page()
    }

    /// Record the total reported by the latest fetch
    pub fn set_total_count(&mut self, total_count: usize) {
        self.total_count = total_count;
    }

    /// Move to a page, clamped to the known page range
    pub fn go_to_page(&mut self, page: usize) -> usize {
        let page = page.clamp(1, self.total_pages().max(1));
        self.apply_page(page);
        page
    }

    /// Move to next page
    pub fn next_page(&mut self) -> bool {
        if self.is_last_page() {
            return false;
        }
        self.apply_page(self.current_page + 1);
        true
    }

    /// Move to previous page
    pub fn previous_page(&mut self) -> bool {
        if self.is_first_page() {
            return false;
        }
        self.apply_page(self.current_page - 1);
        true
    }

    pub fn first_page(&mut self) {
        self.apply_page(1);
    }

    pub fn last_page(&mut self) {
        self.apply_page(self.total_pages());
    }

    /// Back to page 1. Returns true when the page actually moved.
    pub fn reset(&mut self) -> bool {
        let moved = self.current_page != 1;
        self.apply_page(1);
        moved
    }

    /// Change page size; always returns to page 1
    pub fn set_page_size(&mut self, page_size: usize) -> Result<(), ValidationError> {
        if page_size == 0 {
            return Err(ValidationError::ZeroPageSize);
        }
        if page_size == self.page_size {
            return Ok(());
        }
        self.page_size = page_size;
        if let PaginationMode::Delegated(delegate) = &self.mode {
            (delegate.on_page_size_change)(page_size);
        }
        self.apply_page(1);
        Ok(())
    }

    /// Accept page state from the caller without notifying it back
    pub fn sync(&mut self, page: usize, page_size: usize) -> Result<(), ValidationError> {
        if page_size == 0 {
            return Err(ValidationError::ZeroPageSize);
        }
        self.current_page = page.max(1);
        self.page_size = page_size;
        Ok(())
    }

    fn apply_page(&mut self, page: usize) {
        let page = page.max(1);
        let changed = page != self.current_page;
        self.current_page = page;
        if let (true, PaginationMode::Delegated(delegate)) = (changed, &self.mode) {
            (delegate.on_page_change)(page);
        }
    }

    /// Get current page information: (page, total pages, first item, last item)
    pub fn get_page_info(&self) -> (usize, usize, usize, usize) {
        let offset = (self.current_page - 1) * self.page_size;
        let start_item = (offset + 1).min(self.total_count);
        let end_item = (offset + self.page_size).min(self.total_count);
        (self.current_page, self.total_pages(), start_item, end_item)
    }

    /// Generate pagination information string
    pub fn get_pagination_info(&self) -> String {
        if self.total_count == 0 {
            return "No listings found".to_string();
        }

        let (current_page, total_pages, start_item, end_item) = self.get_page_info();
        if (current_page - 1) * self.page_size >= self.total_count {
            return format!(
                "Page {} of {} is past the end ({} listings)",
                current_page, total_pages, self.total_count
            );
        }
        format!(
            "Showing {}-{} of {} listings (Page {} of {})",
            start_item, end_item, self.total_count, current_page, total_pages
        )
    }
}
