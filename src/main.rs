//! ScribeBooth CLI entry point

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use scribe_booth::cli::{
    app::{get_api_key, load_merged_config, run_devices, run_record, EXIT_ERROR, EXIT_USAGE_ERROR},
    args::{Cli, Commands, RecordOptions},
    config_cmd::handle_config_command,
    profiles_cmd::handle_profiles_command,
    presenter::Presenter,
};
use scribe_booth::domain::config::AppConfig;
use scribe_booth::domain::error::ConfigError;
use scribe_booth::infrastructure::{ProfilesClient, XdgConfigStore};

#[tokio::main(flavor = "multi_thread", worker_threads = 2)]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let presenter = Presenter::new();

    // Handle subcommands
    match cli.command {
        Some(Commands::Devices) => {
            return run_devices().await;
        }
        Some(Commands::Config { action }) => {
            let store = XdgConfigStore::new();
            if let Err(e) = handle_config_command(action, &store, &presenter).await {
                presenter.error(&e.to_string());
                let code = match e {
                    ConfigError::ValidationError { .. } => EXIT_USAGE_ERROR,
                    _ => EXIT_ERROR,
                };
                return ExitCode::from(code);
            }
            return ExitCode::SUCCESS;
        }
        Some(Commands::Profiles { action }) => {
            let config = load_merged_config(AppConfig::empty()).await;
            let api_key = match get_api_key().await {
                Ok(key) => key,
                Err(e) => {
                    presenter.error(&e);
                    return ExitCode::from(EXIT_ERROR);
                }
            };

            let client = ProfilesClient::new(config.server_url_or_default(), api_key);
            if let Err(e) = handle_profiles_command(action, &client, &presenter).await {
                presenter.error(&e.to_string());
                return ExitCode::from(EXIT_ERROR);
            }
            return ExitCode::SUCCESS;
        }
        None => {}
    }

    // Build CLI config from args
    let cli_config = AppConfig {
        api_key: None, // API key comes from env/file only
        server_url: cli.server.clone(),
        device: cli.device.clone(),
        notify: if cli.notify { Some(true) } else { None },
    };

    // Merge config
    let config = load_merged_config(cli_config).await;

    let api_key = match get_api_key().await {
        Ok(key) => key,
        Err(e) => {
            presenter.error(&e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let options = RecordOptions {
        device: config.device.clone(),
        title: cli.title.clone(),
        notify: config.notify_or_default(),
        server_url: config.server_url_or_default().to_string(),
        api_key,
    };

    run_record(options).await
}
