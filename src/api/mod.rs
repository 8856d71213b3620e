//! API module - HTTP access to the listings backend
//!
//! Row models, the reqwest client for the paginated endpoint and the
//! serializer that turns a page request into query parameters.

pub mod client;
pub mod models;
pub mod query;
