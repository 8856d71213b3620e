//! Viewport windowing: which rows of a page need to be materialized.
//!
//! With a fixed row estimate the math is closed-form. Once real heights are
//! measured, [`HeightCache`] switches to prefix sums so offsets stay exact.

use std::collections::HashMap;
use std::ops::Range;

use crate::error::ValidationError;

/// Rows to render plus their vertical offsets. `start..end` is half-open;
/// an empty page yields an empty range.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct VisibleRange {
    start: usize,
    end: usize,
    row_offsets: Vec<f64>,
    total_height: f64,
}

impl VisibleRange {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn start_index(&self) -> usize {
        self.start
    }

    /// Last rendered index, inclusive.
    pub fn end_index(&self) -> Option<usize> {
        (!self.is_empty()).then(|| self.end - 1)
    }

    pub fn indices(&self) -> Range<usize> {
        self.start..self.end
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    pub fn contains(&self, index: usize) -> bool {
        self.indices().contains(&index)
    }

    /// Vertical offsets of the rendered rows, aligned with `indices()`.
    pub fn row_offsets(&self) -> &[f64] {
        &self.row_offsets
    }

    pub fn offset_of(&self, index: usize) -> Option<f64> {
        if !self.contains(index) {
            return None;
        }
        self.row_offsets.get(index - self.start).copied()
    }

    /// Height of the full scrollable content.
    pub fn total_height(&self) -> f64 {
        self.total_height
    }
}

fn valid_height(height: f64) -> bool {
    height.is_finite() && height > 0.0
}

fn clean_offset(value: f64) -> f64 {
    if value.is_finite() { value.max(0.0) } else { 0.0 }
}

/// Fixed-estimate windowing.
///
/// Includes every row intersecting `[scroll_offset, scroll_offset +
/// viewport_height)` plus `overscan` rows on each side, clipped to the page.
/// A non-positive or non-finite row height yields an empty range.
pub fn compute_visible_range(
    row_count: usize,
    estimated_row_height: f64,
    scroll_offset: f64,
    viewport_height: f64,
    overscan: usize,
) -> VisibleRange {
    if row_count == 0 || !valid_height(estimated_row_height) {
        return VisibleRange::empty();
    }

    let scroll = clean_offset(scroll_offset);
    let viewport = clean_offset(viewport_height);
    let last_row = row_count - 1;

    let first_visible = (scroll / estimated_row_height).floor() as usize;
    let past_visible = ((scroll + viewport) / estimated_row_height).ceil() as usize;

    let end_inclusive = past_visible.saturating_add(overscan).min(last_row);
    let start = first_visible.saturating_sub(overscan).min(end_inclusive);
    let end = end_inclusive + 1;

    VisibleRange {
        start,
        end,
        row_offsets: (start..end)
            .map(|i| i as f64 * estimated_row_height)
            .collect(),
        total_height: row_count as f64 * estimated_row_height,
    }
}

/// Validated windowing parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportWindower {
    row_height: f64,
    overscan: usize,
}

impl ViewportWindower {
    pub fn new(row_height: f64, overscan: usize) -> Result<Self, ValidationError> {
        if !valid_height(row_height) {
            return Err(ValidationError::InvalidRowHeight { value: row_height });
        }
        Ok(Self {
            row_height,
            overscan,
        })
    }

    pub fn row_height(&self) -> f64 {
        self.row_height
    }

    pub fn overscan(&self) -> usize {
        self.overscan
    }

    pub fn compute(&self, row_count: usize, scroll_offset: f64, viewport_height: f64) -> VisibleRange {
        compute_visible_range(
            row_count,
            self.row_height,
            scroll_offset,
            viewport_height,
            self.overscan,
        )
    }

    /// Windowing that honours measured heights where known.
    pub fn compute_measured(
        &self,
        keys: &[&str],
        heights: &HeightCache,
        scroll_offset: f64,
        viewport_height: f64,
    ) -> VisibleRange {
        if heights.is_empty() {
            return self.compute(keys.len(), scroll_offset, viewport_height);
        }
        heights.compute(keys, scroll_offset, viewport_height, self.overscan)
    }
}

/// Measured row heights keyed by row id, falling back to an estimate.
#[derive(Debug, Clone)]
pub struct HeightCache {
    estimate: f64,
    measured: HashMap<String, f64>,
}

impl HeightCache {
    pub fn new(estimate: f64) -> Self {
        Self {
            estimate,
            measured: HashMap::new(),
        }
    }

    /// Store a measurement. Returns true when it changed layout.
    pub fn record(&mut self, key: &str, height: f64) -> bool {
        if !valid_height(height) {
            return false;
        }
        match self.measured.insert(key.to_string(), height) {
            Some(previous) => previous != height,
            None => height != self.estimate,
        }
    }

    pub fn height_of(&self, key: &str) -> f64 {
        self.measured.get(key).copied().unwrap_or(self.estimate)
    }

    pub fn clear(&mut self) {
        self.measured.clear();
    }

    pub fn len(&self) -> usize {
        self.measured.len()
    }

    pub fn is_empty(&self) -> bool {
        self.measured.is_empty()
    }

    /// Top offset of every row plus the content height.
    fn prefix_offsets(&self, keys: &[&str]) -> (Vec<f64>, f64) {
        let mut offsets = Vec::with_capacity(keys.len());
        let mut acc = 0.0;
        for key in keys {
            offsets.push(acc);
            acc += self.height_of(key);
        }
        (offsets, acc)
    }

    pub fn compute(
        &self,
        keys: &[&str],
        scroll_offset: f64,
        viewport_height: f64,
        overscan: usize,
    ) -> VisibleRange {
        if keys.is_empty() || !valid_height(self.estimate) {
            return VisibleRange::empty();
        }

        let (offsets, total_height) = self.prefix_offsets(keys);
        let scroll = clean_offset(scroll_offset);
        let bottom = scroll + clean_offset(viewport_height);
        let last_row = keys.len() - 1;

        // Row i ends where row i + 1 starts, so the tops after the first are
        // the bottoms of every row but the last.
        let first_visible = offsets[1..]
            .partition_point(|next_top| *next_top <= scroll)
            .min(last_row);
        // Rows whose top edge is above the viewport bottom.
        let visible_end = offsets.partition_point(|top| *top < bottom);

        let end_inclusive = visible_end
            .saturating_sub(1)
            .max(first_visible)
            .saturating_add(overscan)
            .min(last_row);
        let start = first_visible.saturating_sub(overscan).min(end_inclusive);
        let end = end_inclusive + 1;

        VisibleRange {
            start,
            end,
            row_offsets: offsets[start..end].to_vec(),
            total_height,
        }
    }
}
