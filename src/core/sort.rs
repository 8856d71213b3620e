//! Sort presets and the stable row comparator.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::api::models::Listing;
use crate::error::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    /// Score, then recency, then price.
    #[default]
    Relevance,
    Price,
    Date,
    Score,
    Beds,
    Sqft,
}

impl SortField {
    /// Column name understood by the remote paginated endpoint.
    pub fn column(self) -> &'static str {
        match self {
            SortField::Relevance => "relevance",
            SortField::Price => "list_price",
            SortField::Date => "time_listed",
            SortField::Score => "ai_investment_score",
            SortField::Beds => "beds",
            SortField::Sqft => "sqft",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn as_str(self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }

    fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct SortSpec {
    pub field: SortField,
    pub order: SortOrder,
}

impl SortSpec {
    pub fn new(field: SortField, order: SortOrder) -> Self {
        Self { field, order }
    }

    /// Total order over rows for this spec. Ties compare equal so a stable
    /// sort keeps input order.
    pub fn compare(&self, a: &Listing, b: &Listing) -> Ordering {
        let ordering = match self.field {
            SortField::Relevance => relevance(a, b),
            SortField::Price => a.price_or_zero().total_cmp(&b.price_or_zero()),
            SortField::Date => a.recency().cmp(&b.recency()),
            SortField::Score => a.score_or_zero().total_cmp(&b.score_or_zero()),
            SortField::Beds => number(a.beds).total_cmp(&number(b.beds)),
            SortField::Sqft => number(a.sqft).total_cmp(&number(b.sqft)),
        };
        self.order.apply(ordering)
    }

    /// Stable in-place sort of borrowed rows.
    pub fn sort(&self, rows: &mut [&Listing]) {
        rows.sort_by(|a, b| self.compare(a, b));
    }
}

impl From<SortKey> for SortSpec {
    fn from(key: SortKey) -> Self {
        match key {
            SortKey::Relevance => SortSpec::new(SortField::Relevance, SortOrder::Desc),
            SortKey::PriceHigh => SortSpec::new(SortField::Price, SortOrder::Desc),
            SortKey::PriceLow => SortSpec::new(SortField::Price, SortOrder::Asc),
            SortKey::DateNew => SortSpec::new(SortField::Date, SortOrder::Desc),
            SortKey::DateOld => SortSpec::new(SortField::Date, SortOrder::Asc),
            SortKey::ScoreHigh => SortSpec::new(SortField::Score, SortOrder::Desc),
        }
    }
}

impl fmt::Display for SortSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.field.column(), self.order.as_str())
    }
}

fn number(value: Option<f64>) -> f64 {
    value.unwrap_or(0.0)
}

// Ascending relevance; SortOrder::Desc flips it so the best rows lead.
fn relevance(a: &Listing, b: &Listing) -> Ordering {
    a.score_or_zero()
        .total_cmp(&b.score_or_zero())
        .then_with(|| a.recency().cmp(&b.recency()))
        .then_with(|| a.price_or_zero().total_cmp(&b.price_or_zero()))
}

/// Named sort presets offered by the list header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    #[default]
    Relevance,
    PriceHigh,
    PriceLow,
    DateNew,
    DateOld,
    ScoreHigh,
}

impl SortKey {
    pub const ALL: [SortKey; 6] = [
        SortKey::Relevance,
        SortKey::PriceHigh,
        SortKey::PriceLow,
        SortKey::DateNew,
        SortKey::DateOld,
        SortKey::ScoreHigh,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SortKey::Relevance => "relevance",
            SortKey::PriceHigh => "price_high",
            SortKey::PriceLow => "price_low",
            SortKey::DateNew => "date_new",
            SortKey::DateOld => "date_old",
            SortKey::ScoreHigh => "score_high",
        }
    }
}

impl FromStr for SortKey {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace('-', "_");
        SortKey::ALL
            .into_iter()
            .find(|key| key.as_str() == wanted)
            .ok_or_else(|| ValidationError::UnknownSortKey {
                name: s.to_string(),
            })
    }
}
