//! CLI entry point for changelog-rs

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use changelog_rs::commands::new::NewEntry;
use changelog_rs::Changelog;

#[derive(Parser)]
#[command(name = "changelog-rs")]
#[command(version)]
#[command(about = "Serve a product changelog from Markdown files", long_about = None)]
struct Cli {
    /// Set the base directory (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the changelog server
    #[command(alias = "s")]
    Server {
        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// IP address to bind to
        #[arg(short, long, default_value = "localhost")]
        ip: String,

        /// Disable file watching and live reload
        #[arg(long)]
        r#static: bool,
    },

    /// List products or entries
    List {
        /// What to list (products, entries)
        #[arg(default_value = "entries")]
        r#type: String,

        /// Only list entries of this product
        #[arg(long)]
        product: Option<String>,
    },

    /// Create a new changelog entry
    New {
        /// Title of the entry
        title: String,

        /// Product the entry belongs to
        #[arg(short, long)]
        product: String,

        /// Release version shown next to the entry
        #[arg(short, long)]
        version: Option<String>,

        /// Tags (repeatable)
        #[arg(short, long = "tag")]
        tags: Vec<String>,
    },

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "changelog_rs=debug,info"
    } else {
        "changelog_rs=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine base directory
    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir().context("Cannot determine current directory")?,
    };

    match cli.command {
        Commands::Server { port, ip, r#static } => {
            let app = Changelog::new(&base_dir)?;
            tracing::info!("Serving {:?}", app.content_dir);
            changelog_rs::server::start(&app, &ip, port, !r#static).await?;
        }

        Commands::List { r#type, product } => {
            let app = Changelog::new(&base_dir)?;
            changelog_rs::commands::list::run(&app, &r#type, product.as_deref())?;
        }

        Commands::New {
            title,
            product,
            version,
            tags,
        } => {
            let app = Changelog::new(&base_dir)?;
            tracing::info!("Creating new entry for {}: {}", product, title);
            let path = changelog_rs::commands::new::create_entry(
                &app,
                &NewEntry {
                    title: &title,
                    product: &product,
                    version: version.as_deref(),
                    tags: &tags,
                },
            )?;
            println!("Created: {:?}", path);
        }

        Commands::Version => {
            println!("changelog-rs version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
