//! CLI layer: argument types and command dispatch

pub mod dispatcher;
pub mod main_types;
