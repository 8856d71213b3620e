use crate::core::geo::GeoOption;
use crate::core::overlay::AnnotatedRow;
use crate::display::window::VisibleRange;
use crate::utils::text::{format_count, format_price, truncate_text};
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table, presets};
use crossterm::terminal;
use std::collections::BTreeSet;

/// Colors only make sense on an interactive terminal
pub fn should_use_colors() -> bool {
    atty::is(atty::Stream::Stdout) && std::env::var_os("NO_COLOR").is_none()
}

/// Formatter for listing pages
pub struct ListingTable {
    max_width: Option<usize>,
    use_colors: bool,
}

impl Default for ListingTable {
    fn default() -> Self {
        Self::new()
    }
}

impl ListingTable {
    /// Create a new ListingTable instance
    pub fn new() -> Self {
        Self {
            max_width: Self::detect_terminal_width(),
            use_colors: should_use_colors(),
        }
    }

    /// Detect terminal width
    fn detect_terminal_width() -> Option<usize> {
        match terminal::size() {
            Ok((cols, _rows)) => Some((cols as usize).clamp(40, 200)),
            Err(_) => Some(80),
        }
    }

    pub fn with_max_width(mut self, width: usize) -> Self {
        self.max_width = Some(width);
        self
    }

    pub fn with_colors(mut self, use_colors: bool) -> Self {
        self.use_colors = use_colors;
        self
    }

    fn base_table(&self) -> Table {
        let mut table = Table::new();
        table.load_preset(presets::UTF8_FULL);
        table.set_content_arrangement(ContentArrangement::Dynamic);
        let width = self.max_width.unwrap_or(80);
        table.set_width(width.saturating_sub(6).max(40) as u16);
        table
    }

    fn header(&self, table: &mut Table, names: &[&str]) {
        if self.use_colors {
            table.set_header(
                names
                    .iter()
                    .map(|name| Cell::new(name).add_attribute(Attribute::Bold).fg(Color::Cyan)),
            );
        } else {
            table.set_header(names.to_vec());
        }
    }

    /// Address column width for the current terminal
    fn address_width(&self) -> usize {
        match self.max_width.unwrap_or(80) {
            w if w < 80 => 18,
            w if w < 120 => 28,
            _ => 40,
        }
    }

    /// Render annotated rows of one window
    pub fn render_rows(&self, rows: &[AnnotatedRow<'_>]) -> String {
        let mut table = self.base_table();
        self.header(
            &mut table,
            &[
                "#", "Sel", "Saved", "Address", "City", "ST", "Zip", "Price", "Bd", "Ba", "Sqft",
                "Status", "Score", "Agent",
            ],
        );

        let address_width = self.address_width();
        for annotated in rows {
            let row = annotated.row;
            let mut selected = Cell::new(if annotated.is_selected { "x" } else { "" });
            let mut saved = Cell::new(if annotated.is_saved { "*" } else { "" });
            if self.use_colors {
                selected = selected.fg(Color::Green);
                saved = saved.fg(Color::Yellow);
            }

            table.add_row(vec![
                Cell::new(annotated.index + 1),
                selected,
                saved,
                Cell::new(truncate_text(&row.address_line(), address_width)),
                Cell::new(row.city.as_deref().unwrap_or("-")),
                Cell::new(row.state.as_deref().unwrap_or("-")),
                Cell::new(row.zip_code.as_deref().unwrap_or("-")),
                Cell::new(format_price(row.list_price)),
                Cell::new(format_count(row.beds)),
                Cell::new(format_count(row.total_baths())),
                Cell::new(format_count(row.sqft)),
                Cell::new(truncate_text(row.status.as_deref().unwrap_or("-"), 14)),
                Cell::new(format_count(row.ai_investment_score)),
                Cell::new(truncate_text(row.agent_name.as_deref().unwrap_or("-"), 20)),
            ]);
        }

        table.to_string()
    }

    /// Render geographic options with their counts and selection marks
    pub fn render_geo_options(&self, options: &[GeoOption], selected: &BTreeSet<String>) -> String {
        let mut table = self.base_table();
        self.header(&mut table, &["", "Value", "Listings"]);
        for option in options {
            let mark = if selected.contains(&option.label) { "x" } else { "" };
            table.add_row(vec![
                Cell::new(mark),
                Cell::new(truncate_text(&option.label, 40)),
                Cell::new(option.count),
            ]);
        }
        table.to_string()
    }

    /// One line describing a computed window
    pub fn describe_window(range: &VisibleRange) -> String {
        match range.end_index() {
            Some(end) => format!(
                "Rendering rows {}-{} (content height {:.0}px)",
                range.start_index() + 1,
                end + 1,
                range.total_height()
            ),
            None => "Nothing to render".to_string(),
        }
    }
}
