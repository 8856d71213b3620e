//! Core layer: filter and sort composition, data sources, fetch guarding,
//! pagination and the windowed listing view that ties them together.

pub mod debounce;
pub mod filter;
pub mod geo;
pub mod guard;
pub mod identity;
pub mod overlay;
pub mod pagination;
pub mod plan;
pub mod sort;
pub mod source;
pub mod view;
