use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use page_insights::{
    build_pipeline,
    config::{Config, DatabaseConfig, LogFormat, LoggingConfig, StorageConfig},
    server::{self, AppState},
    storage::SettingsDatabase,
};

#[derive(Debug, Parser)]
#[command(name = "page-insights", version, about = "Facebook Page analytics dashboard server")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the HTTP server (default)
    Serve,
    /// Run one analysis cycle and write the report file
    Refresh,
    /// Copy page credentials from Postgres into the settings file
    FetchSettings {
        /// Row id in the facebook_settings table
        #[arg(long)]
        id: i64,
        /// Destination file (defaults to FACEBOOK_SETTINGS_PATH)
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // The credential loader only talks to Postgres
    let command = match cli.command.unwrap_or(Command::Serve) {
        Command::FetchSettings { id, output } => {
            init_logging(&LoggingConfig::from_env());
            return fetch_settings(id, output).await;
        }
        command => command,
    };

    // Load configuration
    let config = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config.logging);

    info!(
        version = env!("CARGO_PKG_VERSION"),
        "Page Insights starting..."
    );

    match command {
        Command::Refresh => run_refresh(config).await,
        _ => run_server(config).await,
    }
}

async fn run_server(config: Config) -> anyhow::Result<()> {
    let pipeline = build_pipeline(&config)?;

    if config.server.refresh_on_startup {
        match &config.facebook {
            Some(settings) => {
                info!("Running startup refresh");
                if let Err(e) = pipeline.run_cycle(settings).await {
                    warn!(error = %e, "Startup refresh failed");
                }
            }
            None => warn!("Skipping startup refresh, Facebook credentials not found"),
        }
    }

    let state = Arc::new(AppState::new(
        pipeline,
        config.facebook.clone(),
        &config.server.static_dir,
    ));

    if let Err(e) = server::serve(state, &config.server.host, config.server.port).await {
        error!(error = %e, "Server error");
        return Err(e.into());
    }

    info!("Server shutdown complete");
    Ok(())
}

async fn run_refresh(config: Config) -> anyhow::Result<()> {
    let Some(settings) = config.facebook.clone() else {
        error!("Facebook credentials not found");
        anyhow::bail!("Facebook credentials not found");
    };

    let pipeline = build_pipeline(&config)?;
    let report = pipeline.run_cycle(&settings).await?;

    println!("{}", serde_json::to_string_pretty(&report)?);
    info!(
        path = %config.storage.output_path.display(),
        engagement_rate = report.metrics.derived.engagement_rate,
        "Refresh complete"
    );
    Ok(())
}

async fn fetch_settings(id: i64, output: Option<PathBuf>) -> anyhow::Result<()> {
    let db_config = DatabaseConfig::from_env()?;
    let storage = StorageConfig::from_env();
    let database = SettingsDatabase::connect(&db_config).await?;
    let result = database.fetch_facebook_settings(id).await;
    database.close().await;

    match result? {
        Some(settings) => {
            let path = output.unwrap_or(storage.settings_path);
            settings.save(&path)?;
            info!(record_id = id, path = %path.display(), "Facebook settings saved");
            println!("Saved Facebook settings to {}", path.display());
        }
        None => {
            warn!(record_id = id, "No facebook_settings record");
            println!("No facebook_settings record with id {}", id);
        }
    }
    Ok(())
}

/// Initialize tracing/logging
fn init_logging(config: &LoggingConfig) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    match config.format {
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        LogFormat::Pretty => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }
}
