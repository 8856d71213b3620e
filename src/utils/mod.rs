//! Utils module - Shared utilities and helpers
//!
//! This module provides utility functions and helpers that are used across
//! multiple layers of the application architecture.

/// Conversions from transport errors into the crate's error types
pub mod error_helpers;

/// Logger installation and verbose printing
pub mod logging;

/// Text truncation and value formatting
pub mod text;

/// Input validation and numeric filter parsing
pub mod validation;
