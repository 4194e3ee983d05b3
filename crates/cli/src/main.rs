//! quizgen CLI: the main entry point.
//!
//! Commands:
//! - `serve`: Start the HTTP generation service
//! - `generate`: Run one generation request and print the response
//! - `allocate`: Show how N items split across kinds, difficulties and levels
//! - `config`: Print, inspect or validate configuration

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "quizgen",
    about = "quizgen: quota-allocated parallel question generation",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP generation service
    Serve {
        /// Override the port
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Generate items for one request and print the response JSON
    Generate {
        /// JSON request body (same shape as the HTTP endpoint)
        #[arg(short, long)]
        request: Option<PathBuf>,

        /// Source (caller application) id
        #[arg(short, long, default_value = "cli")]
        source: String,

        /// Content locator, overrides the request file
        #[arg(short, long)]
        locator: Option<String>,

        /// Total item count, overrides the request file
        #[arg(short, long)]
        total: Option<usize>,
    },

    /// Print the allocation table for a request without generating anything
    Allocate {
        /// Total item count
        #[arg(short, long, default_value_t = 10)]
        total: usize,

        /// Kind weights, e.g. `mcq=0.4,fib=0.3,tf=0.3`
        #[arg(short, long, default_value = "mcq=0.4,fib=0.3,tf=0.3")]
        kinds: String,

        /// Difficulty weights
        #[arg(short, long, default_value = "basic=0.3,intermediate=0.3,advanced=0.4")]
        difficulties: String,

        /// Cognitive-level weights
        #[arg(short, long, default_value = "remember=0.3,apply=0.4,analyze=0.3")]
        levels: String,
    },

    /// Configuration commands (prints the default config when no action is given)
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration
    Show,
    /// Validate the configuration file
    Validate,
    /// Print the config file path
    Path,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Serve { port } => commands::serve::run(port).await?,
        Commands::Generate {
            request,
            source,
            locator,
            total,
        } => commands::generate::run(request, &source, locator, total).await?,
        Commands::Allocate {
            total,
            kinds,
            difficulties,
            levels,
        } => commands::allocate::run(total, &kinds, &difficulties, &levels)?,
        Commands::Config { action } => match action {
            None => commands::config_cmd::print_default(),
            Some(ConfigAction::Show) => commands::config_cmd::show()?,
            Some(ConfigAction::Validate) => commands::config_cmd::validate()?,
            Some(ConfigAction::Path) => commands::config_cmd::path(),
        },
    }

    Ok(())
}
