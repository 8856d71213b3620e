pub mod table;
pub mod window;

pub use table::{ListingTable, should_use_colors};
pub use window::{HeightCache, ViewportWindower, VisibleRange, compute_visible_range};
