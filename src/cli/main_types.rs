use crate::core::filter::{FilterField, FilterSpec, FilterValue};
use crate::error::ValidationError;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "leadgrid")]
#[command(about = "Page, filter and window lead listings from a CRM backend or a JSON export")]
#[command(version)]
pub struct Cli {
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true)]
    pub config_dir: Option<String>,

    /// Base URL of the listings API
    #[arg(long, global = true, env = "LEADGRID_URL")]
    pub url: Option<String>,

    #[arg(long, global = true, env = "LEADGRID_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch one page of listings and render its visible window
    Page(PageArgs),
    /// List city, state or zip options with row counts
    Geo(GeoArgs),
    /// Compute which rows a viewport would render
    Window(WindowArgs),
    /// Configuration management
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show the current configuration
    Show,
    /// Set configuration value
    Set {
        /// Configuration key
        key: String,
        /// Configuration value
        value: String,
    },
}

#[derive(Args, Debug, Clone, Default)]
pub struct SourceArgs {
    /// Read listings from a JSON export instead of the API
    #[arg(long)]
    pub file: Option<PathBuf>,
    /// Table to read (defaults to the configured table)
    #[arg(long)]
    pub table: Option<String>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// Status values, comma separated ("active" matches the active flag)
    #[arg(long, value_delimiter = ',')]
    pub status: Vec<String>,
    #[arg(long)]
    pub min_price: Option<String>,
    #[arg(long)]
    pub max_price: Option<String>,
    #[arg(long)]
    pub min_beds: Option<String>,
    #[arg(long)]
    pub max_beds: Option<String>,
    #[arg(long)]
    pub min_baths: Option<String>,
    #[arg(long)]
    pub max_baths: Option<String>,
    #[arg(long)]
    pub min_sqft: Option<String>,
    #[arg(long)]
    pub max_sqft: Option<String>,
    #[arg(long)]
    pub min_year: Option<String>,
    #[arg(long)]
    pub max_year: Option<String>,
    #[arg(long)]
    pub min_score: Option<String>,
    #[arg(long)]
    pub max_score: Option<String>,
    #[arg(long, value_delimiter = ',')]
    pub city: Vec<String>,
    #[arg(long, value_delimiter = ',')]
    pub state: Vec<String>,
    #[arg(long, value_delimiter = ',')]
    pub zip: Vec<String>,
    /// Free text over street, city, state and zip
    #[arg(long)]
    pub search: Option<String>,
    #[arg(long)]
    pub agent: Option<String>,
    /// Listing source name, e.g. "Redfin"
    #[arg(long)]
    pub listing_source: Option<String>,
    #[arg(long)]
    pub has_agent_email: bool,
    #[arg(long)]
    pub has_agent_phone: bool,
    #[arg(long)]
    pub has_agent_name: bool,
}

impl FilterArgs {
    pub fn to_spec(&self) -> Result<FilterSpec, ValidationError> {
        let mut spec = FilterSpec::new();

        let ranges = [
            (FilterField::Price, &self.min_price, &self.max_price),
            (FilterField::Beds, &self.min_beds, &self.max_beds),
            (FilterField::Baths, &self.min_baths, &self.max_baths),
            (FilterField::Sqft, &self.min_sqft, &self.max_sqft),
            (FilterField::YearBuilt, &self.min_year, &self.max_year),
            (FilterField::Score, &self.min_score, &self.max_score),
        ];
        for (field, min, max) in ranges {
            spec.set_range_input(
                field,
                min.as_deref().unwrap_or_default(),
                max.as_deref().unwrap_or_default(),
            )?;
        }

        let options = [
            (FilterField::Status, &self.status),
            (FilterField::City, &self.city),
            (FilterField::State, &self.state),
            (FilterField::Zip, &self.zip),
        ];
        for (field, values) in options {
            spec.set(field, FilterValue::options(values.iter().cloned()))?;
        }

        let texts = [
            (FilterField::Search, &self.search),
            (FilterField::AgentName, &self.agent),
            (FilterField::ListingSource, &self.listing_source),
        ];
        for (field, text) in texts {
            spec.set(field, FilterValue::Text(text.clone().unwrap_or_default()))?;
        }

        let checkboxes = [
            (FilterField::HasAgentEmail, self.has_agent_email),
            (FilterField::HasAgentPhone, self.has_agent_phone),
            (FilterField::HasAgentName, self.has_agent_name),
        ];
        for (field, checked) in checkboxes {
            spec.set(field, FilterValue::Checkbox(checked))?;
        }

        Ok(spec)
    }
}

#[derive(Args, Debug, Clone)]
pub struct PageArgs {
    #[command(flatten)]
    pub source: SourceArgs,
    #[command(flatten)]
    pub filters: FilterArgs,
    /// relevance, price_high, price_low, date_new, date_old or score_high
    #[arg(long, default_value = "relevance")]
    pub sort: String,
    #[arg(long, default_value_t = 1)]
    pub page: usize,
    #[arg(long)]
    pub page_size: Option<usize>,
    /// Scroll offset into the page, in pixels
    #[arg(long, default_value_t = 0.0)]
    pub scroll: f64,
    /// Viewport height in pixels
    #[arg(long)]
    pub viewport: Option<f64>,
    /// Ids of selected rows
    #[arg(long, value_delimiter = ',')]
    pub selected: Vec<String>,
    /// Ids or property URLs of saved rows
    #[arg(long, value_delimiter = ',')]
    pub saved: Vec<String>,
    /// Omit the pagination summary line
    #[arg(long)]
    pub embedded: bool,
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug, Clone)]
pub struct GeoArgs {
    #[command(flatten)]
    pub source: SourceArgs,
    #[command(flatten)]
    pub filters: FilterArgs,
    /// city, state or zip
    #[arg(long, default_value = "city")]
    pub dimension: String,
    /// Narrow the option list
    #[arg(long)]
    pub find: Option<String>,
    /// Rows sampled to build the option list
    #[arg(long, default_value_t = 500)]
    pub limit: usize,
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug, Clone)]
pub struct WindowArgs {
    /// Rows on the page
    pub rows: usize,
    #[arg(long, default_value_t = 0.0)]
    pub scroll: f64,
    #[arg(long)]
    pub viewport: Option<f64>,
    #[arg(long)]
    pub row_height: Option<f64>,
    #[arg(long)]
    pub overscan: Option<usize>,
    #[arg(long)]
    pub json: bool,
}
