//! Whitelisted table names and the query-string form of a page request.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::filter::{FilterField, FilterValue};
use crate::core::source::PageRequest;
use crate::error::ValidationError;

/// Tables the paginated endpoint is allowed to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableName {
    Listings,
    ExpiredListings,
    ProbateLeads,
    FsboLeads,
    FrboLeads,
    ForeclosureListings,
    Imports,
    Trash,
}

impl TableName {
    pub const ALL: [TableName; 8] = [
        TableName::Listings,
        TableName::ExpiredListings,
        TableName::ProbateLeads,
        TableName::FsboLeads,
        TableName::FrboLeads,
        TableName::ForeclosureListings,
        TableName::Imports,
        TableName::Trash,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TableName::Listings => "listings",
            TableName::ExpiredListings => "expired_listings",
            TableName::ProbateLeads => "probate_leads",
            TableName::FsboLeads => "fsbo_leads",
            TableName::FrboLeads => "frbo_leads",
            TableName::ForeclosureListings => "foreclosure_listings",
            TableName::Imports => "imports",
            TableName::Trash => "trash",
        }
    }
}

impl fmt::Display for TableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TableName {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TableName::ALL
            .into_iter()
            .find(|table| table.as_str() == s)
            .ok_or_else(|| ValidationError::UnknownTable {
                name: s.to_string(),
            })
    }
}

/// Query parameter name for a filter group.
fn param_name(field: FilterField) -> &'static str {
    match field {
        FilterField::Status => "status",
        FilterField::Price => "Price",
        FilterField::Beds => "Beds",
        FilterField::Baths => "Baths",
        FilterField::Sqft => "Sqft",
        FilterField::YearBuilt => "YearBuilt",
        FilterField::Score => "Score",
        FilterField::HasAgentEmail => "hasAgentEmail",
        FilterField::HasAgentPhone => "hasAgentPhone",
        FilterField::HasAgentName => "hasAgentName",
        FilterField::Search => "search",
        FilterField::AgentName => "agentName",
        FilterField::ListingSource => "listingSource",
        FilterField::City => "city",
        FilterField::State => "state",
        FilterField::Zip => "zip",
    }
}

fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

/// Serialize a page request for `GET /listings/paginated`.
///
/// Absent filter entries produce no parameter. Multi-select values are
/// comma-joined; range bounds become `min<Name>` / `max<Name>`.
pub fn to_query_params(table: TableName, request: &PageRequest) -> Vec<(String, String)> {
    let mut params = vec![
        ("table".to_string(), table.as_str().to_string()),
        ("page".to_string(), request.page.to_string()),
        ("pageSize".to_string(), request.page_size.to_string()),
        ("sortBy".to_string(), request.sort.field.column().to_string()),
        ("sortOrder".to_string(), request.sort.order.as_str().to_string()),
    ];

    for (field, value) in request.filter.iter() {
        let name = param_name(field);
        match value {
            FilterValue::MultiSelect(options) => {
                let joined = options.iter().cloned().collect::<Vec<_>>().join(",");
                params.push((name.to_string(), joined));
            }
            FilterValue::Range(range) => {
                if let Some(min) = range.min {
                    params.push((format!("min{}", name), format_number(min)));
                }
                if let Some(max) = range.max {
                    params.push((format!("max{}", name), format_number(max)));
                }
            }
            FilterValue::Checkbox(checked) => {
                params.push((name.to_string(), checked.to_string()));
            }
            FilterValue::Text(text) => {
                params.push((name.to_string(), text.clone()));
            }
        }
    }

    params
}
