//! Selection and saved-state annotations over windowed rows.
//!
//! Membership is owned by the caller; the overlay only reads it and reports
//! toggles through [`ViewEvents`].

use std::collections::{BTreeSet, HashSet};
use std::hash::BuildHasher;

use crate::api::models::Listing;
use crate::core::view::ViewEvents;
use crate::display::window::VisibleRange;

/// Read-only set of row keys.
pub trait Membership {
    fn contains_key(&self, key: &str) -> bool;
}

impl<S: BuildHasher> Membership for HashSet<String, S> {
    fn contains_key(&self, key: &str) -> bool {
        self.contains(key)
    }
}

impl Membership for BTreeSet<String> {
    fn contains_key(&self, key: &str) -> bool {
        self.contains(key)
    }
}

impl Membership for [String] {
    fn contains_key(&self, key: &str) -> bool {
        self.iter().any(|k| k == key)
    }
}

/// Selection is keyed by row id only.
pub fn is_selected(selection: &dyn Membership, row: &Listing) -> bool {
    selection.contains_key(row.id())
}

/// A row counts as saved when its id or its secondary key is in the set.
pub fn is_saved(membership: &dyn Membership, row: &Listing) -> bool {
    membership.contains_key(row.id())
        || row
            .secondary_key()
            .is_some_and(|key| membership.contains_key(key))
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnnotatedRow<'a> {
    pub index: usize,
    pub offset: f64,
    pub row: &'a Listing,
    pub is_selected: bool,
    pub is_saved: bool,
}

impl<'a> AnnotatedRow<'a> {
    pub fn new(
        index: usize,
        offset: f64,
        row: &'a Listing,
        selection: &dyn Membership,
        saved: &dyn Membership,
    ) -> Self {
        Self {
            index,
            offset,
            row,
            is_selected: is_selected(selection, row),
            is_saved: is_saved(saved, row),
        }
    }

    pub fn toggle_select(&self, events: &dyn ViewEvents) {
        events.on_select(self.row.id(), !self.is_selected);
    }

    pub fn toggle_save(&self, events: &dyn ViewEvents) {
        events.on_save(self.row, !self.is_saved);
    }

    pub fn action(&self, name: &str, events: &dyn ViewEvents) {
        events.on_action(name, self.row);
    }
}

/// Annotate the rows of a computed window.
pub fn annotate_window<'a>(
    rows: &'a [Listing],
    range: &VisibleRange,
    selection: &dyn Membership,
    saved: &dyn Membership,
) -> Vec<AnnotatedRow<'a>> {
    range
        .indices()
        .zip(range.row_offsets())
        .filter_map(|(index, offset)| {
            rows.get(index)
                .map(|row| AnnotatedRow::new(index, *offset, row, selection, saved))
        })
        .collect()
}
