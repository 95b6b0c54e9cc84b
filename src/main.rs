//! CLI entry point for folio

use anyhow::Result;
use chrono::Local;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use folio::content::ContentType;
use folio::{commands, server, BuildOptions, Folio};

#[derive(Parser)]
#[command(name = "folio")]
#[command(version)]
#[command(about = "A static site generator for Markdown content", long_about = None)]
struct Cli {
    /// Site directory (defaults to current directory)
    #[arg(short = 'd', long = "dir", global = true)]
    dir: Option<PathBuf>,

    /// Log level
    #[arg(short, long, global = true, value_enum, default_value_t = LogLevel::Info)]
    verbose: LogLevel,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
}

impl LogLevel {
    fn filter(self) -> &'static str {
        match self {
            LogLevel::Debug => "folio=debug,info",
            LogLevel::Info => "folio=info,warn",
            LogLevel::Warning => "warn",
            LogLevel::Error => "error",
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Build the site
    #[command(alias = "b")]
    Build {
        /// Site config file, repeatable; later files override earlier ones
        #[arg(short, long = "config")]
        config: Vec<PathBuf>,

        /// Style file merged into the theme section, repeatable
        #[arg(short, long = "style")]
        style: Vec<PathBuf>,

        /// Output directory
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Build, then serve the site with live reload
    #[command(alias = "s")]
    Serve {
        /// Address to bind to
        #[arg(long, default_value = "localhost")]
        host: String,

        /// Port to listen on
        #[arg(short, long, default_value = "8000")]
        port: u16,

        /// Open the site in a browser
        #[arg(long)]
        open: bool,
    },

    /// Create a new site
    Init {
        /// Directory to create
        name: PathBuf,
    },

    /// Create a new post, page or project
    New {
        /// Title of the new content
        title: String,

        /// Content type
        #[arg(short = 't', long = "type", default_value = "post",
              value_parser = ["post", "page", "project"])]
        kind: String,
    },

    /// List posts, pages, projects or the terms of a taxonomy
    List {
        #[arg(default_value = "posts")]
        what: String,
    },

    /// Empty the output directory
    Clean,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| cli.verbose.filter().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let site_dir = match cli.dir {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };

    match cli.command {
        Commands::Build {
            config,
            style,
            output,
        } => {
            let options = BuildOptions {
                config_files: config,
                style_files: style,
                output,
            };
            let summary = commands::build::run(&site_dir, &options)?;
            println!(
                "Built {} pages in {:.2}s",
                summary.total_pages(),
                summary.elapsed.as_secs_f64()
            );
        }

        Commands::Serve { host, port, open } => {
            let options = BuildOptions::default();
            let folio = Folio::open(&site_dir, &options)?;
            folio.build()?;
            server::start(&folio, options, &host, port, open).await?;
        }

        Commands::Init { name } => {
            let target_dir = if name.is_absolute() {
                name
            } else {
                site_dir.join(name)
            };
            commands::init::init_site(&target_dir)?;
            println!("Created new site in {:?}", target_dir);
            println!(
                "Run `folio serve -d {}` to start the development server",
                target_dir.display()
            );
        }

        Commands::New { title, kind } => {
            let content_type = ContentType::from_name(&kind)
                .ok_or_else(|| anyhow::anyhow!("Unknown content type: {}", kind))?;
            let config = folio::config::load_or_default(
                &[site_dir.join(folio::config::DEFAULT_CONFIG_FILE)],
                &[],
            );
            let path = commands::new::create_content(
                &site_dir,
                &config,
                &title,
                content_type,
                Local::now().date_naive(),
            )?;
            println!("Created: {:?}", path);
        }

        Commands::List { what } => {
            let folio = Folio::open(&site_dir, &BuildOptions::default())?;
            commands::list::run(&folio, &what)?;
        }

        Commands::Clean => {
            let folio = Folio::open(&site_dir, &BuildOptions::default())?;
            commands::clean::run(&folio)?;
            println!("Cleaned successfully!");
        }
    }

    Ok(())
}
