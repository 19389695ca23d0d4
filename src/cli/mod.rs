//! CLI adapter for sitesearch
//!
//! Runs searches against a content fixture (items plus search documents
//! as JSON), explains composed queries, and inspects configuration.
//!
//! # Architecture
//!
//! ```text
//!              +------------------+
//!              |     core/        |
//!              |  (domain logic)  |
//!              +--------+---------+
//!                       |
//!                       v
//!              +------------------+
//!              |      cli/        |
//!              | (clap adapter)   |
//!              +------------------+
//! ```

pub mod commands;
pub mod output;

use crate::core::config::{Config, LoggingConfig};
use crate::core::error::SiteSearchError;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// sitesearch - Filtered, faceted site search
///
/// Compose site-search queries from a phrase, scope, language and facet
/// parameters and run them against a content fixture.
#[derive(Parser, Debug)]
#[command(name = "sitesearch")]
#[command(version)]
#[command(about = "Site-search query builder", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format
    #[arg(long, global = true, default_value = "human")]
    pub format: OutputFormat,

    /// Configuration file (overrides SITESEARCH_CONFIG and the XDG config)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output (default)
    #[default]
    Human,
    /// JSON output for scripting
    Json,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Search a content fixture
    Search(commands::SearchArgs),

    /// Normalize a search phrase
    Normalize(commands::NormalizeArgs),

    /// Show current configuration
    #[command(name = "show-config")]
    ShowConfig(commands::ConfigArgs),
}

/// Install the tracing subscriber.
///
/// `SITESEARCH_LOG`, then `RUST_LOG`, then the configured level decide
/// the filter. Logs go to stderr so JSON output stays parseable.
pub fn init_logging(config: &LoggingConfig) {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_env("SITESEARCH_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(&config.level));

    let registry = tracing_subscriber::registry().with(filter);

    // A subscriber may already be installed (tests); keep it
    let _ = if config.json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init()
    } else {
        registry
            .with(fmt::layer().compact().with_writer(std::io::stderr))
            .try_init()
    };
}

/// Load configuration, honoring an explicit `--config` file
pub fn load_config(path: Option<&PathBuf>) -> crate::core::error::Result<Config> {
    match path {
        Some(path) => {
            let mut config = Config::from_file(path)?;
            config.merge_env();
            config.validate()?;
            Ok(config)
        }
        None => Config::load(),
    }
}

/// Run the CLI with the provided arguments
pub fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(cli.config.as_ref())?;

    init_logging(&config.logging);
    config.log_config();

    match cli.command {
        Commands::Search(args) => commands::search::execute(args, config, cli.format),
        Commands::Normalize(args) => commands::normalize::execute(args, &config, cli.format),
        Commands::ShowConfig(args) => commands::config::execute(args, &config, cli.format),
    }
}

/// Process exit code for a failed run
///
/// 2 for bad configuration or content, 3 when no search index could be
/// resolved, 1 for anything else.
pub fn exit_code(err: &(dyn std::error::Error + 'static)) -> i32 {
    match err.downcast_ref::<SiteSearchError>() {
        Some(e) if e.is_bad_request() => 2,
        Some(e) if e.is_unavailable() => 3,
        _ => 1,
    }
}
