use clap::Parser;
use leadgrid::cli::dispatcher::Dispatcher;
use leadgrid::cli::main_types::Cli;
use leadgrid::storage::config::Config;
use leadgrid::storage::credentials::Credentials;
use leadgrid::utils::logging::init_logger;
use std::path::PathBuf;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(err) = init_logger(cli.verbose) {
        eprintln!("Warning: failed to initialise logging: {}", err);
    }

    // Load Config
    let config_path = cli
        .config_dir
        .as_ref()
        .map(|dir| PathBuf::from(dir).join("config.toml"));

    let config = match Config::load(config_path.clone()) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Error loading config: {}", err);
            std::process::exit(1);
        }
    };

    if cli.verbose {
        eprintln!("Verbose mode is enabled");
        if let Some(config_dir) = &cli.config_dir {
            eprintln!("Using config directory: {}", config_dir);
        }
    }

    let credentials = Credentials::resolve(cli.api_key);
    let dispatcher = Dispatcher::new(config, config_path, credentials, cli.url, cli.verbose);

    // Execute the command
    if let Err(e) = dispatcher.dispatch(cli.command).await {
        eprintln!("{} Error: {}", e.severity().emoji(), e);
        if let Some(hint) = e.troubleshooting_hint() {
            eprintln!("💡 {}", hint);
        }
        std::process::exit(1);
    }
}
