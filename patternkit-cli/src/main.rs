//! # patternkit CLI
//!
//! Command-line interface for browsing, verifying and serving PatternKit
//! content.

mod commands;
mod payload;

use clap::{Parser, Subcommand, ValueEnum};
use patternkit_core::Topic;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "patternkit")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "patternkit.yml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the slugs stored for a topic
    Slugs {
        /// Topic: pattern or data-structure
        topic: Topic,
    },

    /// List entry summaries sorted by title
    List {
        /// Topic: pattern or data-structure
        topic: Topic,

        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Show a single compiled entry
    Show {
        /// Topic: pattern or data-structure
        topic: Topic,

        /// Entry slug
        slug: String,

        /// Output format
        #[arg(long, value_enum, default_value_t = ShowFormat::Json)]
        format: ShowFormat,
    },

    /// Parse and compile every entry and report problems
    Verify {
        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Serve the read-only JSON API
    Serve {
        /// Server port (defaults to the configured port)
        #[arg(long)]
        port: Option<u16>,
    },
}

#[derive(Copy, Clone, ValueEnum)]
pub enum ShowFormat {
    Json,
    Html,
    Frontmatter,
    Raw,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let subscriber = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(if cli.verbose {
                tracing::Level::DEBUG.into()
            } else {
                tracing::Level::INFO.into()
            }),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Slugs { topic } => commands::list_slugs(&cli.config, topic).await,
        Commands::List { topic, json } => commands::list_summaries(&cli.config, topic, json).await,
        Commands::Show {
            topic,
            slug,
            format,
        } => commands::show_entry(&cli.config, topic, &slug, format).await,
        Commands::Verify { json } => commands::verify_content(&cli.config, json).await,
        Commands::Serve { port } => commands::serve(&cli.config, port).await,
    }
}
