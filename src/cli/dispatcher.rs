use crate::api::client::ListingsClient;
use crate::cli::main_types::{Commands, ConfigCommands, GeoArgs, PageArgs, SourceArgs, WindowArgs};
use crate::core::geo::{GeoDimension, GeoFilter};
use crate::core::sort::{SortKey, SortSpec};
use crate::core::source::{ListingSource, LocalSource, PageRequest, RemoteSource};
use crate::core::view::{FetchOutcome, ListingView, ViewVariant};
use crate::display::table::ListingTable;
use crate::display::window::{ViewportWindower, compute_visible_range};
use crate::error::{AppError, CliError, DisplayError};
use crate::storage::config::Config;
use crate::storage::credentials::Credentials;
use crate::utils::error_helpers::convert_io_to_display_error;
use crate::utils::logging::print_verbose;
use crate::utils::validation::validate_url;
use serde_json::{Value, json};
use std::collections::HashSet;
use std::fmt::Display;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;

// println! panics on a closed pipe; report it instead
fn emit(text: impl Display) -> Result<(), AppError> {
    let mut out = io::stdout().lock();
    writeln!(out, "{}", text).map_err(|e| convert_io_to_display_error(e, "write output"))?;
    Ok(())
}

pub struct Dispatcher {
    config: Config,
    config_path: Option<PathBuf>,
    credentials: Credentials,
    url: Option<String>,
    verbose: bool,
}

impl Dispatcher {
    // Instance method for verbose logging
    fn log_verbose(&self, msg: &str) {
        print_verbose(self.verbose, msg);
    }

    pub fn new(
        config: Config,
        config_path: Option<PathBuf>,
        credentials: Credentials,
        url: Option<String>,
        verbose: bool,
    ) -> Self {
        Self {
            config,
            config_path,
            credentials,
            url,
            verbose,
        }
    }

    pub async fn dispatch(&self, command: Commands) -> Result<(), AppError> {
        match command {
            Commands::Page(args) => self.handle_page(args).await,
            Commands::Geo(args) => self.handle_geo(args).await,
            Commands::Window(args) => self.handle_window(args),
            Commands::Config { command } => self.handle_config_command(command),
        }
    }

    fn build_source(&self, args: &SourceArgs) -> Result<Arc<dyn ListingSource>, AppError> {
        if let Some(path) = &args.file {
            self.log_verbose(&format!("Reading listings from {}", path.display()));
            return Ok(Arc::new(LocalSource::from_json_file(path)?));
        }

        let url = self
            .config
            .resolve_api_url(self.url.clone())
            .map_err(|_| CliError::NoDataSource {
                hint: "Pass --file <PATH> for a JSON export, or --url / LEADGRID_URL for the API"
                    .to_string(),
            })?;
        validate_url(&url)?;

        let mut client = ListingsClient::with_timeout(url, self.config.timeout_seconds)?;
        if let Some(key) = self.credentials.api_key() {
            client.set_api_key(key.to_string());
        }

        let table = args.table.clone().unwrap_or_else(|| self.config.table.clone());
        self.log_verbose(&format!("Reading table '{}' from {}", table, client.base_url));
        Ok(Arc::new(RemoteSource::new(client, table)))
    }

    async fn handle_page(&self, args: PageArgs) -> Result<(), AppError> {
        let source = self.build_source(&args.source)?;
        let variant = if args.embedded {
            ViewVariant::Embedded
        } else {
            ViewVariant::Standalone
        };

        let mut view_config = self.config.view_config(variant);
        if let Some(page_size) = args.page_size {
            view_config.page_size = page_size;
        }
        if let Some(viewport) = args.viewport {
            view_config.viewport_height = viewport;
        }
        let page_size = view_config.page_size;

        let view = ListingView::new(source, view_config)?;
        let filter = args.filters.to_spec()?;
        view.update_filter(|spec| {
            *spec = filter;
            Ok(())
        })?;
        view.set_sort(SortSpec::from(args.sort.parse::<SortKey>()?));
        view.sync_page(args.page, page_size)?;

        match view.refresh().await {
            FetchOutcome::Failed(message) => return Err(CliError::FetchFailed(message).into()),
            FetchOutcome::Rejected(err) => eprintln!("⚠️  {}", err),
            outcome => self.log_verbose(&format!("Fetch outcome: {:?}", outcome)),
        }
        view.on_scroll(args.scroll);

        let selected: HashSet<String> = args.selected.into_iter().collect();
        let saved: HashSet<String> = args.saved.into_iter().collect();

        if args.json {
            let stats = view.stats();
            let rows: Vec<Value> = view.render(&selected, &saved, |rows| {
                rows.iter()
                    .map(|annotated| {
                        let mut value = serde_json::to_value(annotated.row).unwrap_or(Value::Null);
                        if let Value::Object(map) = &mut value {
                            map.insert("index".to_string(), json!(annotated.index));
                            map.insert("offset".to_string(), json!(annotated.offset));
                            map.insert("is_selected".to_string(), json!(annotated.is_selected));
                            map.insert("is_saved".to_string(), json!(annotated.is_saved));
                        }
                        value
                    })
                    .collect()
            });
            let output = json!({
                "page": stats.current_page,
                "page_size": stats.page_size,
                "total_count": stats.total_count,
                "total_pages": stats.total_pages,
                "warning": stats.warning,
                "rows": rows,
            });
            let pretty = serde_json::to_string_pretty(&output)
                .map_err(|e| DisplayError::TableFormat(e.to_string()))?;
            return emit(pretty);
        }

        let table = ListingTable::new();
        let rendered = view.render(&selected, &saved, |rows| table.render_rows(rows));
        emit(rendered)?;
        if let Some(summary) = view.summary() {
            emit(summary)?;
        }
        self.log_verbose(&ListingTable::describe_window(&view.visible_range()));
        Ok(())
    }

    async fn handle_geo(&self, args: GeoArgs) -> Result<(), AppError> {
        let dimension: GeoDimension = args.dimension.parse()?;
        let source = self.build_source(&args.source)?;
        let request = PageRequest::new(1, args.limit, args.filters.to_spec()?, SortSpec::default())?;
        let page = source.fetch_page(&request).await?;
        self.log_verbose(&format!(
            "Building {} options from {} rows",
            dimension,
            page.rows.len()
        ));

        let mut geo = GeoFilter::from_rows(&page.rows);
        geo.set_tab(dimension);
        if let Some(text) = &args.find {
            geo.type_search(dimension, text);
            geo.settle(dimension).await;
        }
        let selected = geo.selected(dimension, &request.filter)?;

        if args.json {
            let options: Vec<Value> = geo
                .options(dimension)
                .iter()
                .map(|option| {
                    json!({
                        "label": option.label,
                        "count": option.count,
                        "selected": selected.contains(&option.label),
                    })
                })
                .collect();
            return emit(json!({ "dimension": dimension.to_string(), "options": options }));
        }

        emit(ListingTable::new().render_geo_options(geo.options(dimension), &selected))
    }

    fn handle_window(&self, args: WindowArgs) -> Result<(), AppError> {
        let row_height = args.row_height.unwrap_or(self.config.row_height);
        let viewport = args.viewport.unwrap_or(self.config.viewport_height);
        let overscan = args.overscan.unwrap_or(self.config.overscan);
        // Bad geometry is an error here, not an empty window
        ViewportWindower::new(row_height, overscan)?;

        let range = compute_visible_range(args.rows, row_height, args.scroll, viewport, overscan);
        if args.json {
            emit(json!({
                "start_index": range.start_index(),
                "end_index": range.end_index(),
                "row_offsets": range.row_offsets(),
                "total_height": range.total_height(),
            }))
        } else {
            emit(ListingTable::describe_window(&range))
        }
    }

    fn handle_config_command(&self, command: ConfigCommands) -> Result<(), AppError> {
        match command {
            ConfigCommands::Show => {
                self.log_verbose("Attempting config show command");
                println!("Current Configuration:");
                println!("=====================");
                for key in Config::KEYS {
                    let value = self.config.get_value(key)?;
                    let value = if value.is_empty() {
                        "(not set)".to_string()
                    } else {
                        value
                    };
                    println!("{:<16} {}", key, value);
                }
                match self.credentials.masked_key() {
                    Some(masked) => println!("{:<16} {}", "api_key", masked),
                    None => println!("{:<16} (not set)", "api_key"),
                }
                Ok(())
            }
            ConfigCommands::Set { key, value } => {
                self.log_verbose(&format!("Setting {} = {}", key, value));
                let mut config = self.config.clone();
                config.set_value(&key, &value)?;
                config.save(self.config_path.clone())?;
                println!("✅ Set {} = {}", key, config.get_value(&key)?);
                Ok(())
            }
        }
    }
}
