//! Input validation and sanitization utilities
//!
//! This module provides utilities for validating user input, configuration
//! values and numeric filter bounds before they reach the data sources.

use crate::error::{CliError, ValidationError};

/// Validate that a URL is properly formatted
pub fn validate_url(url: &str) -> crate::Result<()> {
    if url.is_empty() {
        return Err(CliError::InvalidArguments("URL cannot be empty".to_string()).into());
    }

    // Basic URL validation - must start with http:// or https://
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(CliError::InvalidArguments(format!(
            "Invalid URL '{}': URL must start with http:// or https://",
            url
        ))
        .into());
    }

    Ok(())
}

/// Parse a numeric filter bound typed by a user.
///
/// Accepts plain numbers and currency-formatted input such as `$1,250,000`.
/// Anything else is a [`ValidationError::MalformedNumber`].
pub fn parse_numeric_input(field: &str, input: &str) -> Result<f64, ValidationError> {
    let malformed = || ValidationError::MalformedNumber {
        field: field.to_string(),
        input: input.to_string(),
    };

    let cleaned: String = input
        .trim()
        .chars()
        .filter(|c| !matches!(c, '$' | ',' | '_' | ' '))
        .collect();

    if cleaned.is_empty() {
        return Err(malformed());
    }

    cleaned
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(malformed)
}

/// Parse an optional numeric bound; empty input means "no bound".
pub fn parse_optional_bound(field: &str, input: &str) -> Result<Option<f64>, ValidationError> {
    if input.trim().is_empty() {
        Ok(None)
    } else {
        parse_numeric_input(field, input).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url_accepts_valid_urls() {
        assert!(validate_url("http://localhost:3000").is_ok());
        assert!(validate_url("https://api.example.com").is_ok());
    }

    #[test]
    fn test_validate_url_rejects_invalid_urls() {
        assert!(validate_url("").is_err());
        assert!(validate_url("localhost:3000").is_err());
        assert!(validate_url("ftp://example.com").is_err());
    }

    #[test]
    fn test_parse_numeric_input_accepts_currency() {
        assert_eq!(parse_numeric_input("price", "500000"), Ok(500000.0));
        assert_eq!(parse_numeric_input("price", " $1,250,000 "), Ok(1_250_000.0));
        assert_eq!(parse_numeric_input("baths", "2.5"), Ok(2.5));
        assert_eq!(parse_numeric_input("score", "-3"), Ok(-3.0));
    }

    #[test]
    fn test_parse_numeric_input_rejects_garbage() {
        let err = parse_numeric_input("price", "cheap").unwrap_err();
        assert_eq!(
            err,
            ValidationError::MalformedNumber {
                field: "price".to_string(),
                input: "cheap".to_string(),
            }
        );
        assert!(parse_numeric_input("price", "").is_err());
        assert!(parse_numeric_input("price", "$").is_err());
        assert!(parse_numeric_input("price", "inf").is_err());
    }

    #[test]
    fn test_parse_optional_bound() {
        assert_eq!(parse_optional_bound("price", "  "), Ok(None));
        assert_eq!(parse_optional_bound("price", "10"), Ok(Some(10.0)));
        assert!(parse_optional_bound("price", "ten").is_err());
    }
}
