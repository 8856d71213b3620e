//! Declarative filters and their row predicate.
//!
//! A [`FilterSpec`] maps each filter group to a typed value. Entries that no
//! longer constrain anything are removed from the map instead of being kept
//! as empty sentinels, so the active filter count is simply the map length.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::api::models::Listing;
use crate::error::ValidationError;
use crate::utils::validation::parse_optional_bound;

/// Editing widget a filter group uses; decides the value type it accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterKind {
    MultiSelect,
    Range,
    Checkbox,
    Text,
}

impl fmt::Display for FilterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FilterKind::MultiSelect => "multi-select",
            FilterKind::Range => "range",
            FilterKind::Checkbox => "checkbox",
            FilterKind::Text => "text",
        };
        f.write_str(name)
    }
}

/// UI grouping only. Never affects evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterCategory {
    Person,
    Company,
    Property,
}

/// Identifier of a filter group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterField {
    Status,
    Price,
    Beds,
    Baths,
    Sqft,
    YearBuilt,
    Score,
    HasAgentEmail,
    HasAgentPhone,
    HasAgentName,
    Search,
    AgentName,
    ListingSource,
    City,
    State,
    Zip,
}

/// Static description of a filter group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterGroup {
    pub field: FilterField,
    pub label: &'static str,
    pub kind: FilterKind,
    pub category: FilterCategory,
}

impl FilterField {
    pub const ALL: [FilterField; 16] = [
        FilterField::Status,
        FilterField::Price,
        FilterField::Beds,
        FilterField::Baths,
        FilterField::Sqft,
        FilterField::YearBuilt,
        FilterField::Score,
        FilterField::HasAgentEmail,
        FilterField::HasAgentPhone,
        FilterField::HasAgentName,
        FilterField::Search,
        FilterField::AgentName,
        FilterField::ListingSource,
        FilterField::City,
        FilterField::State,
        FilterField::Zip,
    ];

    pub fn group(self) -> FilterGroup {
        use FilterCategory::*;
        use FilterKind::*;

        let (label, kind, category) = match self {
            FilterField::Status => ("Status", MultiSelect, Property),
            FilterField::Price => ("Price", Range, Property),
            FilterField::Beds => ("Beds", Range, Property),
            FilterField::Baths => ("Baths", Range, Property),
            FilterField::Sqft => ("Square feet", Range, Property),
            FilterField::YearBuilt => ("Year built", Range, Property),
            FilterField::Score => ("AI score", Range, Property),
            FilterField::HasAgentEmail => ("Has agent email", Checkbox, Person),
            FilterField::HasAgentPhone => ("Has agent phone", Checkbox, Person),
            FilterField::HasAgentName => ("Has agent name", Checkbox, Person),
            FilterField::Search => ("Search", Text, Property),
            FilterField::AgentName => ("Agent name", Text, Person),
            FilterField::ListingSource => ("Listing source", Text, Company),
            FilterField::City => ("City", MultiSelect, Property),
            FilterField::State => ("State", MultiSelect, Property),
            FilterField::Zip => ("Zip", MultiSelect, Property),
        };

        FilterGroup {
            field: self,
            label,
            kind,
            category,
        }
    }

    pub fn kind(self) -> FilterKind {
        self.group().kind
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FilterField::Status => "status",
            FilterField::Price => "price",
            FilterField::Beds => "beds",
            FilterField::Baths => "baths",
            FilterField::Sqft => "sqft",
            FilterField::YearBuilt => "year_built",
            FilterField::Score => "score",
            FilterField::HasAgentEmail => "has_agent_email",
            FilterField::HasAgentPhone => "has_agent_phone",
            FilterField::HasAgentName => "has_agent_name",
            FilterField::Search => "search",
            FilterField::AgentName => "agent_name",
            FilterField::ListingSource => "listing_source",
            FilterField::City => "city",
            FilterField::State => "state",
            FilterField::Zip => "zip",
        }
    }

    /// Numeric accessor for range groups. Missing values compare as 0.
    fn numeric(self, row: &Listing) -> f64 {
        let value = match self {
            FilterField::Price => row.list_price,
            FilterField::Beds => row.beds,
            FilterField::Baths => row.total_baths(),
            FilterField::Sqft => row.sqft,
            FilterField::YearBuilt => row.year_built,
            FilterField::Score => row.ai_investment_score,
            _ => None,
        };
        value.unwrap_or(0.0)
    }

    /// Text accessor for checkbox, text and geographic groups.
    fn text(self, row: &Listing) -> Option<String> {
        match self {
            FilterField::HasAgentEmail => row.agent_email.clone(),
            FilterField::HasAgentPhone => row.agent_phone.clone(),
            FilterField::HasAgentName | FilterField::AgentName => row.agent_name.clone(),
            FilterField::ListingSource => row.other_str("listing_source_name").map(str::to_string),
            FilterField::Search => Some(
                [
                    Some(row.address_line()),
                    row.city.clone(),
                    row.state.clone(),
                    row.zip_code.clone(),
                ]
                .into_iter()
                .flatten()
                .collect::<Vec<_>>()
                .join(" "),
            ),
            FilterField::City => row.city.clone(),
            FilterField::State => row.state.clone(),
            FilterField::Zip => row.zip_code.clone(),
            FilterField::Status => row.status.clone(),
            _ => None,
        }
    }
}

impl fmt::Display for FilterField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterField {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FilterField::ALL
            .into_iter()
            .find(|field| field.as_str() == s.trim())
            .ok_or_else(|| ValidationError::UnknownFilter {
                name: s.to_string(),
            })
    }
}

/// Inclusive numeric bounds; either side may be open.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct NumericRange {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl NumericRange {
    pub fn new(min: Option<f64>, max: Option<f64>) -> Self {
        Self { min, max }
    }

    pub fn at_least(min: f64) -> Self {
        Self::new(Some(min), None)
    }

    pub fn at_most(max: f64) -> Self {
        Self::new(None, Some(max))
    }

    pub fn contains(&self, value: f64) -> bool {
        self.min.is_none_or(|min| value >= min) && self.max.is_none_or(|max| value <= max)
    }

    pub fn is_open(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterValue {
    MultiSelect(BTreeSet<String>),
    Range(NumericRange),
    Checkbox(bool),
    Text(String),
}

impl FilterValue {
    pub fn options<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        FilterValue::MultiSelect(values.into_iter().map(Into::into).collect())
    }

    pub fn kind(&self) -> FilterKind {
        match self {
            FilterValue::MultiSelect(_) => FilterKind::MultiSelect,
            FilterValue::Range(_) => FilterKind::Range,
            FilterValue::Checkbox(_) => FilterKind::Checkbox,
            FilterValue::Text(_) => FilterKind::Text,
        }
    }

    /// False for values that would not exclude any row.
    pub fn is_constraining(&self) -> bool {
        match self {
            FilterValue::MultiSelect(values) => values.iter().any(|v| !v.trim().is_empty()),
            FilterValue::Range(range) => !range.is_open(),
            FilterValue::Checkbox(checked) => *checked,
            FilterValue::Text(text) => !text.trim().is_empty(),
        }
    }

    fn normalized(self) -> Self {
        match self {
            FilterValue::MultiSelect(values) => FilterValue::MultiSelect(
                values
                    .into_iter()
                    .map(|v| v.trim().to_string())
                    .filter(|v| !v.is_empty())
                    .collect(),
            ),
            FilterValue::Text(text) => FilterValue::Text(text.trim().to_string()),
            other => other,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FilterSpec {
    entries: BTreeMap<FilterField, FilterValue>,
}

impl FilterSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a group's value. A non-constraining value removes the entry.
    pub fn set(&mut self, field: FilterField, value: FilterValue) -> Result<(), ValidationError> {
        let expected = field.kind();
        if value.kind() != expected {
            return Err(ValidationError::FilterKindMismatch {
                field: field.to_string(),
                expected: expected.to_string(),
            });
        }

        let value = value.normalized();
        if value.is_constraining() {
            self.entries.insert(field, value);
        } else {
            self.entries.remove(&field);
        }
        Ok(())
    }

    /// Builder-style [`FilterSpec::set`].
    pub fn with(mut self, field: FilterField, value: FilterValue) -> Result<Self, ValidationError> {
        self.set(field, value)?;
        Ok(self)
    }

    /// Parse raw min/max input for a range group. On malformed input the
    /// existing entry is left untouched.
    pub fn set_range_input(
        &mut self,
        field: FilterField,
        min: &str,
        max: &str,
    ) -> Result<(), ValidationError> {
        let min = parse_optional_bound(field.as_str(), min)?;
        let max = parse_optional_bound(field.as_str(), max)?;
        self.set(field, FilterValue::Range(NumericRange::new(min, max)))
    }

    /// Add one option to a multi-select group.
    pub fn add_option(&mut self, field: FilterField, option: &str) -> Result<(), ValidationError> {
        let mut values = self.selected(field)?;
        values.insert(option.trim().to_string());
        self.set(field, FilterValue::MultiSelect(values))
    }

    /// Remove one option from a multi-select group, dropping the entry when empty.
    pub fn remove_option(
        &mut self,
        field: FilterField,
        option: &str,
    ) -> Result<(), ValidationError> {
        let mut values = self.selected(field)?;
        values.remove(option.trim());
        self.set(field, FilterValue::MultiSelect(values))
    }

    /// Currently selected options of a multi-select group.
    pub fn selected(&self, field: FilterField) -> Result<BTreeSet<String>, ValidationError> {
        if field.kind() != FilterKind::MultiSelect {
            return Err(ValidationError::FilterKindMismatch {
                field: field.to_string(),
                expected: FilterKind::MultiSelect.to_string(),
            });
        }
        Ok(match self.entries.get(&field) {
            Some(FilterValue::MultiSelect(values)) => values.clone(),
            _ => BTreeSet::new(),
        })
    }

    pub fn remove(&mut self, field: FilterField) -> Option<FilterValue> {
        self.entries.remove(&field)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn get(&self, field: FilterField) -> Option<&FilterValue> {
        self.entries.get(&field)
    }

    pub fn iter(&self) -> impl Iterator<Item = (FilterField, &FilterValue)> {
        self.entries.iter().map(|(field, value)| (*field, value))
    }

    /// Number of filter groups that currently constrain rows.
    pub fn active_count(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Conjunctive predicate over every present entry.
    pub fn matches(&self, row: &Listing) -> bool {
        self.entries
            .iter()
            .all(|(field, value)| evaluate(*field, value, row))
    }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn evaluate(field: FilterField, value: &FilterValue, row: &Listing) -> bool {
    match value {
        FilterValue::MultiSelect(options) => match field {
            FilterField::Status => options.iter().any(|option| {
                if option.eq_ignore_ascii_case("active") {
                    row.active == Some(true)
                } else {
                    row.status
                        .as_deref()
                        .is_some_and(|status| contains_ignore_case(status, option))
                }
            }),
            _ => {
                let Some(actual) = field.text(row) else {
                    return false;
                };
                let actual = actual.trim();
                options
                    .iter()
                    .any(|option| option.eq_ignore_ascii_case(actual) || option == actual)
            }
        },
        FilterValue::Range(range) => range.contains(field.numeric(row)),
        FilterValue::Checkbox(required) => {
            !required || field.text(row).is_some_and(|text| !text.trim().is_empty())
        }
        FilterValue::Text(needle) => field
            .text(row)
            .is_some_and(|text| contains_ignore_case(&text, needle)),
    }
}
