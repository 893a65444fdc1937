//! CLI entry point for devblog-rs

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use devblog_rs::query::SortOrder;

#[derive(Parser)]
#[command(name = "devblog-rs")]
#[command(author = "devblog-rs contributors")]
#[command(version = "0.1.0")]
#[command(about = "Browse, filter and serve a developer blog's posts", long_about = None)]
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
    /// List site content
    List {
        /// Type of content to list (post, tag, category, featured, recent)
        #[arg(default_value = "post")]
        r#type: String,

        /// Free-text search over title, excerpt, tags, category and author
        #[arg(short, long)]
        search: Option<String>,

        /// Only posts with any of these tags
        #[arg(short, long)]
        tag: Vec<String>,

        /// Only posts in any of these categories
        #[arg(long)]
        category: Vec<String>,

        /// Page to show (1-based)
        #[arg(short, long, default_value = "1")]
        page: usize,

        /// Sort order (newest, insertion); defaults to the configured order
        #[arg(long)]
        sort: Option<SortOrder>,
    },

    /// Show an article
    Show {
        /// Post id
        id: String,
    },

    /// Subscribe to the newsletter
    Subscribe {
        /// Email address
        email: String,
    },

    /// Start the API server
    #[command(alias = "s")]
    Server {
        /// Port to listen on
        #[arg(short, long, default_value = "4000")]
        port: u16,

        /// IP address to bind to
        #[arg(short, long, default_value = "localhost")]
        ip: String,

        /// Reload posts when the data file changes
        #[arg(short, long)]
        watch: bool,
    },

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "devblog_rs=debug,info"
    } else {
        "devblog_rs=info"
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
        None => std::env::current_dir()?,
    };

    match cli.command {
        Commands::List {
            r#type,
            search,
            tag,
            category,
            page,
            sort,
        } => {
            let blog = devblog_rs::Blog::new(&base_dir)?;

            let state = devblog_rs::commands::list::filter_state(
                search.as_deref(),
                &tag,
                &category,
                page,
            );
            let sort = sort.unwrap_or(blog.config.default_sort);

            devblog_rs::commands::list::run(&blog, &r#type, &state, sort)?;
        }

        Commands::Show { id } => {
            let blog = devblog_rs::Blog::new(&base_dir)?;
            devblog_rs::commands::show::run(&blog, &id)?;
        }

        Commands::Subscribe { email } => {
            let blog = devblog_rs::Blog::new(&base_dir)?;
            devblog_rs::commands::subscribe::run(&blog, &email).await?;
        }

        Commands::Server { port, ip, watch } => {
            let blog = devblog_rs::Blog::new(&base_dir)?;
            tracing::info!("Starting server at http://{}:{}", ip, port);
            devblog_rs::server::start(blog, &ip, port, watch).await?;
        }

        Commands::Version => {
            println!("devblog-rs version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
