//! CLI entry point for encyclopedia

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "encyclopedia")]
#[command(version)]
#[command(about = "A small flat-file markdown wiki", long_about = None)]
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
    /// Initialize a new wiki with a few sample entries
    Init {
        /// Directory to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        folder: PathBuf,
    },

    /// List entries
    #[command(alias = "ls")]
    List {
        /// Only list entries whose title contains this text
        #[arg(short, long)]
        search: Option<String>,
    },

    /// Create a new entry
    New {
        /// Title of the new entry
        title: String,

        /// Markdown body
        #[arg(long, conflicts_with = "file")]
        content: Option<String>,

        /// Read the markdown body from a file
        #[arg(short, long)]
        file: Option<PathBuf>,
    },

    /// Print an entry rendered as HTML
    Show {
        /// Title of the entry
        title: String,
    },

    /// Start the wiki server
    #[command(alias = "s")]
    Serve {
        /// Port to listen on (overrides _config.yml)
        #[arg(short, long)]
        port: Option<u16>,

        /// IP address to bind to (overrides _config.yml)
        #[arg(short, long)]
        ip: Option<String>,

        /// Open browser automatically
        #[arg(short, long)]
        open: bool,
    },

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "encyclopedia=debug,info"
    } else {
        "encyclopedia=info"
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
        None => std::env::current_dir().context("Failed to read current directory")?,
    };

    match cli.command {
        Commands::Init { folder } => {
            let target_dir = if folder.is_absolute() {
                folder
            } else {
                base_dir.join(folder)
            };
            tracing::info!("Initializing wiki in {:?}", target_dir);
            encyclopedia::commands::init::init_wiki(&target_dir)?;
            println!("Initialized wiki in {:?}", target_dir);
        }

        Commands::List { search } => {
            let wiki = encyclopedia::Wiki::new(&base_dir)?;
            encyclopedia::commands::list::run(&wiki, search.as_deref())?;
        }

        Commands::New {
            title,
            content,
            file,
        } => {
            let wiki = encyclopedia::Wiki::new(&base_dir)?;
            tracing::info!("Creating entry {:?}", title);
            encyclopedia::commands::new::create_entry(
                &wiki,
                &title,
                content.as_deref(),
                file.as_deref(),
            )?;
        }

        Commands::Show { title } => {
            let wiki = encyclopedia::Wiki::new(&base_dir)?;
            encyclopedia::commands::show::run(&wiki, &title)?;
        }

        Commands::Serve { port, ip, open } => {
            let wiki = encyclopedia::Wiki::new(&base_dir)?;
            let ip = ip.unwrap_or_else(|| wiki.config.server.ip.clone());
            let port = port.unwrap_or(wiki.config.server.port);

            tracing::info!("Starting server at http://{}:{}", ip, port);
            encyclopedia::server::start(&wiki, &ip, port, open).await?;
        }

        Commands::Version => {
            println!("encyclopedia version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
