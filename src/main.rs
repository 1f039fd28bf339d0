use anyhow::Result;
use campus_insight::app::facade::DatasetManager;
use campus_insight::{Config, server};
use clap::Parser;
use colored::*;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// CLI arguments for the campus-insight service
#[derive(Debug, Clone, Parser)]
#[command(
    name = "campus-insight",
    version,
    about = "Analytical HTTP service for university course-section and campus-room data",
    long_about = "Ingests course-section (zip+JSON) and campus-room (zip+HTML) archives, \
                  persists them as typed datasets, and evaluates a structured JSON query \
                  language over them: filtering, grouping, aggregation, ordering and \
                  projection."
)]
struct Args {
    /// HTTP listen port
    #[arg(short = 'p', long = "port", value_name = "PORT")]
    port: Option<u16>,

    /// Directory holding persisted dataset documents
    #[arg(short = 'd', long = "data-dir", value_name = "PATH")]
    data_dir: Option<PathBuf>,

    /// Base URL of the address geocoding service
    #[arg(long = "geocoder-url", value_name = "URL")]
    geocoder_url: Option<String>,

    /// Maximum accepted archive size in megabytes
    #[arg(long = "max-archive-mb", value_name = "MB")]
    max_archive_mb: Option<usize>,

    /// Number of parallel workers for archive parsing and geocoding
    #[arg(short = 'j', long = "workers", value_name = "COUNT")]
    workers: Option<usize>,

    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v: debug, -vv: trace)"
    )]
    verbose: u8,

    /// Suppress output except errors
    #[arg(short = 'q', long = "quiet", conflicts_with = "verbose")]
    quiet: bool,
}

impl Args {
    /// Build the service configuration, applying CLI overrides
    fn to_config(&self) -> Config {
        let mut config = Config::default();

        if let Some(port) = self.port {
            config = config.with_port(port);
        }
        if let Some(data_dir) = &self.data_dir {
            config = config.with_storage_dir(data_dir.clone());
        }
        if let Some(geocoder_url) = &self.geocoder_url {
            config = config.with_geocoder_base(geocoder_url.clone());
        }
        if let Some(max_archive_mb) = self.max_archive_mb {
            config = config.with_max_archive_bytes(max_archive_mb * 1024 * 1024);
        }
        if let Some(workers) = self.workers {
            config = config.with_ingest_workers(workers);
        }

        config
    }

    /// Determine the log level from the verbosity flags
    fn log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => "info",
                1 => "debug",
                _ => "trace",
            }
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(args.log_level())),
        )
        .init();

    let config = args.to_config();
    config.validate()?;

    println!(
        "{} {}",
        "Storage directory:".bright_cyan(),
        config.storage_dir.display()
    );
    println!(
        "{} {}",
        "Geocoder:".bright_cyan(),
        config.geocoder_base
    );

    let manager = Arc::new(DatasetManager::new(&config)?);

    println!(
        "{} {}",
        "Serving on port".bright_green(),
        config.port.to_string().bright_white().bold()
    );

    if let Err(e) = server::serve(config, manager).await {
        eprintln!("{} {:#}", "Error:".bright_red().bold(), e);
        std::process::exit(1);
    }

    Ok(())
}
