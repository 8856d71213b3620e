//! Storage layer for leadgrid
//!
//! Handles the TOML configuration file and API key lookup.
//! The API key only ever comes from the command line or the environment.

use crate::error::StorageError;

pub mod config;
pub mod credentials;

type Result<T> = std::result::Result<T, StorageError>;
