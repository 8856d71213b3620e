pub use error::AppError;

/// Main architecture layers (dependency flow: CLI → Core → Storage)
pub mod cli; // Command-line interface
pub mod core; // View engine
pub mod storage; // Configuration and API key lookup

/// Support modules (used across layers)
pub mod api; // Listings API client
pub mod display; // Windowing and table output
pub mod error; // Error handling
pub mod utils; // Shared utilities and helpers

pub type Result<T> = std::result::Result<T, AppError>;

pub mod prelude {
    pub use crate::api::models::Listing;
    pub use crate::core::filter::{FilterField, FilterSpec, FilterValue, NumericRange};
    pub use crate::core::guard::OverlapPolicy;
    pub use crate::core::pagination::{PageDelegate, PaginationController};
    pub use crate::core::sort::{SortField, SortKey, SortOrder, SortSpec};
    pub use crate::core::source::{ListingSource, LocalSource, PageRequest, PageResult, RemoteSource};
    pub use crate::core::view::{FetchOutcome, ListingView, ViewConfig, ViewEvents, ViewVariant};
    pub use crate::display::window::{VisibleRange, compute_visible_range};
}
