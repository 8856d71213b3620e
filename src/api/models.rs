use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Where a row's identifier came from when it entered a data source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyOrigin {
    /// The upstream store supplied `listing_id`.
    #[default]
    Native,
    /// `listing_id` was missing; `property_url` was promoted.
    SecondaryKey,
    /// Neither was present; a content-hash surrogate was synthesized.
    Surrogate,
}

/// One property record as served by the listings API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Listing {
    #[serde(default)]
    pub listing_id: Option<String>,
    #[serde(default)]
    pub property_url: Option<String>,

    #[serde(default)]
    pub street: Option<String>,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub zip_code: Option<String>,

    #[serde(default, deserialize_with = "lenient_number")]
    pub list_price: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub beds: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub full_baths: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub half_baths: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub sqft: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub year_built: Option<f64>,

    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub active: Option<bool>,
    /// 0..=100 when present.
    #[serde(default, deserialize_with = "lenient_number")]
    pub ai_investment_score: Option<f64>,

    #[serde(default)]
    pub agent_name: Option<String>,
    #[serde(default)]
    pub agent_email: Option<String>,
    #[serde(default)]
    pub agent_phone: Option<String>,

    #[serde(default, deserialize_with = "lenient_datetime")]
    pub time_listed: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient_datetime")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient_datetime")]
    pub updated_at: Option<DateTime<Utc>>,

    /// Auxiliary payload: a JSON object, or raw text.
    #[serde(default)]
    pub other: Option<Value>,

    #[serde(skip)]
    pub key_origin: KeyOrigin,
}

const DESCRIPTION_KEYS: [&str; 3] = ["description", "remarks", "public_remarks"];

impl Listing {
    /// Row identifier. Empty only for rows that never went through ingestion.
    pub fn id(&self) -> &str {
        self.listing_id.as_deref().unwrap_or_default()
    }

    pub fn secondary_key(&self) -> Option<&str> {
        self.property_url.as_deref().filter(|url| !url.is_empty())
    }

    pub fn address_line(&self) -> String {
        let street = self.street.as_deref().unwrap_or_default().trim();
        match self.unit.as_deref().map(str::trim) {
            Some(unit) if !unit.is_empty() => format!("{} {}", street, unit),
            _ => street.to_string(),
        }
    }

    pub fn price_or_zero(&self) -> f64 {
        self.list_price.unwrap_or(0.0)
    }

    pub fn score_or_zero(&self) -> f64 {
        self.ai_investment_score.unwrap_or(0.0)
    }

    pub fn total_baths(&self) -> Option<f64> {
        match (self.full_baths, self.half_baths) {
            (None, None) => None,
            (full, half) => Some(full.unwrap_or(0.0) + half.unwrap_or(0.0) * 0.5),
        }
    }

    /// Timestamp used for "newest first" ordering.
    pub fn recency(&self) -> Option<DateTime<Utc>> {
        self.time_listed.or(self.created_at)
    }

    /// Best-effort description from the auxiliary payload.
    pub fn description(&self) -> Option<String> {
        match self.other.as_ref()? {
            Value::Object(map) => description_from_object(map),
            Value::String(raw) => {
                let trimmed = raw.trim();
                if trimmed.is_empty() {
                    return None;
                }
                match serde_json::from_str::<Value>(trimmed) {
                    Ok(Value::Object(map)) => description_from_object(&map),
                    _ => Some(trimmed.to_string()),
                }
            }
            _ => None,
        }
    }

    /// String field from the auxiliary payload object, if any.
    pub fn other_str(&self, key: &str) -> Option<&str> {
        self.other.as_ref()?.get(key)?.as_str()
    }
}

fn description_from_object(map: &serde_json::Map<String, Value>) -> Option<String> {
    DESCRIPTION_KEYS
        .iter()
        .filter_map(|key| map.get(*key).and_then(Value::as_str))
        .map(str::trim)
        .find(|text| !text.is_empty())
        .map(str::to_string)
}

/// Response body of `GET /listings/paginated`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PaginatedResponse {
    #[serde(default)]
    pub data: Vec<Listing>,
    #[serde(default)]
    pub count: Option<u64>,
    #[serde(default)]
    pub error: Option<String>,
}

fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => crate::utils::validation::parse_numeric_input("value", &s).ok(),
        _ => None,
    })
}

fn lenient_datetime<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.as_deref().and_then(parse_timestamp))
}

/// Parse RFC 3339, naive `YYYY-MM-DDTHH:MM:SS` (assumed UTC) or a bare date.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_listing_with_missing_fields() {
        let listing: Listing = serde_json::from_value(json!({
            "listing_id": "L-1",
            "city": "Austin",
            "list_price": 525000,
            "ai_investment_score": null,
            "unexpected_column": true
        }))
        .expect("listing should deserialize");

        assert_eq!(listing.id(), "L-1");
        assert_eq!(listing.city.as_deref(), Some("Austin"));
        assert_eq!(listing.list_price, Some(525000.0));
        assert_eq!(listing.ai_investment_score, None);
        assert_eq!(listing.score_or_zero(), 0.0);
        assert_eq!(listing.key_origin, KeyOrigin::Native);
    }

    #[test]
    fn test_lenient_numbers_and_timestamps() {
        let listing: Listing = serde_json::from_value(json!({
            "list_price": "$1,250,000",
            "beds": "3",
            "sqft": "not a number",
            "time_listed": "2024-03-01T12:00:00",
            "created_at": "2024-02-01T08:00:00+00:00",
            "updated_at": "34 minutes"
        }))
        .expect("listing should deserialize");

        assert_eq!(listing.list_price, Some(1_250_000.0));
        assert_eq!(listing.beds, Some(3.0));
        assert_eq!(listing.sqft, None);
        assert!(listing.time_listed.is_some());
        assert!(listing.created_at.is_some());
        assert_eq!(listing.updated_at, None);
        assert_eq!(listing.recency(), listing.time_listed);
    }

    #[test]
    fn test_description_from_object_and_text() {
        let mut listing = Listing {
            other: Some(json!({"description": "  Charming bungalow  ", "mls": "X"})),
            ..Default::default()
        };
        assert_eq!(listing.description().as_deref(), Some("Charming bungalow"));

        listing.other = Some(json!("{\"remarks\": \"Needs TLC\"}"));
        assert_eq!(listing.description().as_deref(), Some("Needs TLC"));

        listing.other = Some(json!("Corner lot, motivated seller"));
        assert_eq!(
            listing.description().as_deref(),
            Some("Corner lot, motivated seller")
        );

        listing.other = Some(json!({"photos": []}));
        assert_eq!(listing.description(), None);

        listing.other = None;
        assert_eq!(listing.description(), None);
    }

    #[test]
    fn test_address_line_and_baths() {
        let listing = Listing {
            street: Some("12 Oak St".to_string()),
            unit: Some("Apt 4".to_string()),
            full_baths: Some(2.0),
            half_baths: Some(1.0),
            ..Default::default()
        };
        assert_eq!(listing.address_line(), "12 Oak St Apt 4");
        assert_eq!(listing.total_baths(), Some(2.5));
        assert_eq!(Listing::default().total_baths(), None);
    }

    #[test]
    fn test_paginated_response_defaults() {
        let response: PaginatedResponse =
            serde_json::from_value(json!({"error": "boom"})).expect("should deserialize");
        assert!(response.data.is_empty());
        assert_eq!(response.count, None);
        assert_eq!(response.error.as_deref(), Some("boom"));
    }

    #[test]
    fn test_parse_timestamp_bare_date() {
        let parsed = parse_timestamp("2023-12-25").expect("date should parse");
        assert_eq!(parsed.to_rfc3339(), "2023-12-25T00:00:00+00:00");
        assert!(parse_timestamp("Single-family").is_none());
    }
}
