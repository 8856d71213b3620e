use crate::api::models::Listing;
use crate::core::filter::FilterSpec;
use crate::core::sort::SortSpec;
use crate::core::source::PageResult;

/// A filter predicate paired with a comparator. Local evaluation and the
/// remote query serializer both derive from the same filter values.
#[derive(Debug, Clone, Copy)]
pub struct QueryPlan<'a> {
    filter: &'a FilterSpec,
    sort: &'a SortSpec,
}

impl<'a> QueryPlan<'a> {
    pub fn new(filter: &'a FilterSpec, sort: &'a SortSpec) -> Self {
        Self { filter, sort }
    }

    pub fn matches(&self, row: &Listing) -> bool {
        self.filter.matches(row)
    }

    /// Matching rows in sort order, borrowed from the input.
    pub fn select<'r>(&self, rows: &'r [Listing]) -> Vec<&'r Listing> {
        let mut selected: Vec<&Listing> = rows.iter().filter(|row| self.matches(row)).collect();
        self.sort.sort(&mut selected);
        selected
    }

    /// Filter, sort, then slice one page. Pages past the end are empty.
    pub fn execute(&self, rows: &[Listing], page: usize, page_size: usize) -> PageResult {
        let selected = self.select(rows);
        let total_count = selected.len();
        let start = page.saturating_sub(1).saturating_mul(page_size);

        let rows = selected
            .into_iter()
            .skip(start)
            .take(page_size)
            .cloned()
            .collect();

        PageResult { rows, total_count }
    }
}
