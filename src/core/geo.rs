//! City / state / zip option lists with debounced search.
//!
//! Options are derived from the loaded rows, grouped by trimmed value and
//! ordered by frequency. Each dimension keeps its own search text; the
//! visible option list only follows the search once the input has been
//! quiet for [`GEO_SEARCH_DEBOUNCE`]. Selections live in the shared
//! [`FilterSpec`] so they compose with every other filter.

use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::str::FromStr;

use log::debug;

use crate::api::models::Listing;
use crate::core::debounce::{Debounced, GEO_SEARCH_DEBOUNCE};
use crate::core::filter::{FilterField, FilterSpec};
use crate::error::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GeoDimension {
    #[default]
    City,
    State,
    Zip,
}

impl GeoDimension {
    pub const ALL: [GeoDimension; 3] = [GeoDimension::City, GeoDimension::State, GeoDimension::Zip];

    pub fn filter_field(self) -> FilterField {
        match self {
            GeoDimension::City => FilterField::City,
            GeoDimension::State => FilterField::State,
            GeoDimension::Zip => FilterField::Zip,
        }
    }

    fn value(self, row: &Listing) -> Option<&str> {
        match self {
            GeoDimension::City => row.city.as_deref(),
            GeoDimension::State => row.state.as_deref(),
            GeoDimension::Zip => row.zip_code.as_deref(),
        }
    }

    fn index(self) -> usize {
        match self {
            GeoDimension::City => 0,
            GeoDimension::State => 1,
            GeoDimension::Zip => 2,
        }
    }
}

impl fmt::Display for GeoDimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.filter_field().as_str())
    }
}

impl FromStr for GeoDimension {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "city" => Ok(GeoDimension::City),
            "state" => Ok(GeoDimension::State),
            "zip" | "zip_code" => Ok(GeoDimension::Zip),
            _ => Err(ValidationError::UnknownFilter {
                name: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeoOption {
    pub label: String,
    pub count: usize,
}

/// Distinct trimmed values with their row counts, most frequent first,
/// ties broken alphabetically. Blank values are skipped.
pub fn derive_options(rows: &[Listing], dimension: GeoDimension) -> Vec<GeoOption> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for value in rows.iter().filter_map(|row| dimension.value(row)) {
        let value = value.trim();
        if !value.is_empty() {
            *counts.entry(value).or_insert(0) += 1;
        }
    }

    let mut options: Vec<GeoOption> = counts
        .into_iter()
        .map(|(label, count)| GeoOption {
            label: label.to_string(),
            count,
        })
        .collect();
    options.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.label.cmp(&b.label)));
    options
}

#[derive(Debug, Clone)]
struct DimensionState {
    search: Debounced<String>,
    all: Vec<GeoOption>,
    visible: Vec<GeoOption>,
}

impl DimensionState {
    fn new() -> Self {
        Self {
            search: Debounced::new(String::new(), GEO_SEARCH_DEBOUNCE),
            all: Vec::new(),
            visible: Vec::new(),
        }
    }

    fn refilter(&mut self) {
        let needle = self.search.settled().trim().to_lowercase();
        self.visible = if needle.is_empty() {
            self.all.clone()
        } else {
            self.all
                .iter()
                .filter(|option| option.label.to_lowercase().contains(&needle))
                .cloned()
                .collect()
        };
    }
}

#[derive(Debug, Clone)]
pub struct GeoFilter {
    active: GeoDimension,
    dimensions: [DimensionState; 3],
}

impl Default for GeoFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl GeoFilter {
    pub fn new() -> Self {
        Self {
            active: GeoDimension::default(),
            dimensions: [DimensionState::new(), DimensionState::new(), DimensionState::new()],
        }
    }

    pub fn from_rows(rows: &[Listing]) -> Self {
        let mut filter = Self::new();
        filter.rebuild(rows);
        filter
    }

    /// Recompute option lists after the loaded rows change.
    pub fn rebuild(&mut self, rows: &[Listing]) {
        for dimension in GeoDimension::ALL {
            let state = &mut self.dimensions[dimension.index()];
            state.all = derive_options(rows, dimension);
            state.refilter();
        }
        debug!("geo options rebuilt from {} rows", rows.len());
    }

    pub fn active_tab(&self) -> GeoDimension {
        self.active
    }

    pub fn set_tab(&mut self, dimension: GeoDimension) {
        self.active = dimension;
    }

    /// Record search input for a dimension; takes effect after the quiet period.
    pub fn type_search(&mut self, dimension: GeoDimension, text: &str) {
        self.dimensions[dimension.index()]
            .search
            .push(text.to_string());
    }

    pub fn search_text(&self, dimension: GeoDimension) -> &str {
        self.dimensions[dimension.index()].search.raw()
    }

    /// Apply every search whose quiet period has elapsed.
    /// Returns true when any visible option list changed.
    pub fn poll(&mut self) -> bool {
        let mut changed = false;
        for state in &mut self.dimensions {
            if state.search.poll() {
                state.refilter();
                changed = true;
            }
        }
        changed
    }

    /// Wait for a dimension's pending search to settle, then apply it.
    pub async fn settle(&mut self, dimension: GeoDimension) -> bool {
        let state = &mut self.dimensions[dimension.index()];
        let changed = state.search.settle().await;
        if changed {
            state.refilter();
        }
        changed
    }

    pub fn options(&self, dimension: GeoDimension) -> &[GeoOption] {
        &self.dimensions[dimension.index()].visible
    }

    pub fn select(
        &self,
        dimension: GeoDimension,
        label: &str,
        spec: &mut FilterSpec,
    ) -> Result<(), ValidationError> {
        spec.add_option(dimension.filter_field(), label)
    }

    pub fn deselect(
        &self,
        dimension: GeoDimension,
        label: &str,
        spec: &mut FilterSpec,
    ) -> Result<(), ValidationError> {
        spec.remove_option(dimension.filter_field(), label)
    }

    pub fn selected(
        &self,
        dimension: GeoDimension,
        spec: &FilterSpec,
    ) -> Result<BTreeSet<String>, ValidationError> {
        spec.selected(dimension.filter_field())
    }
}
