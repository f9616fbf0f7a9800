use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use stagehand_core::AppConfig;

mod commands;

#[derive(Parser)]
#[command(name = "stagehand")]
#[command(author, version, about = "Scroll-captured card stack for the exhibition page, in your terminal")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Use this config file instead of ~/.config/stagehand/config.toml
    #[arg(short = 'c', long = "config", global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the page in the terminal
    Run,
    /// Replay a JSON script of capture inputs and print what happened
    Simulate {
        /// Script file, a JSON array of { "at_ms", "event" } steps
        script: PathBuf,
        /// Viewport width in pixels used to size the panel travel
        #[arg(short = 'w', long, default_value_t = 1280.0)]
        viewport_width: f64,
        /// Pretty-print each report instead of one JSON line per step
        #[arg(long)]
        pretty: bool,
    },
    /// Inspect or create the configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the config file location
    Path,
    /// Print the effective configuration
    Show,
    /// Write the default configuration
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Log to stderr, or to `log_file` while the terminal UI owns the screen.
/// RUST_LOG wins over the configured level.
fn init_logging(config: &AppConfig, log_file: Option<&PathBuf>) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.general.log_level));

    match log_file {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("cannot open log file {}", path.display()))?;
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_target(false)
                        .with_ansi(false)
                        .with_writer(Mutex::new(file)),
                )
                .init();
        }
        None => {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_target(false)
                        .with_writer(std::io::stderr),
                )
                .init();
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = cli.config.unwrap_or_else(AppConfig::config_path);
    let config = Arc::new(
        AppConfig::load_from(&config_path)
            .with_context(|| format!("failed to load {}", config_path.display()))?,
    );

    match cli.command {
        Some(Commands::Run) | None => {
            init_logging(&config, Some(&config.log_path()))?;
            commands::run::run(config)
        }
        Some(Commands::Simulate {
            script,
            viewport_width,
            pretty,
        }) => {
            init_logging(&config, None)?;
            commands::simulate::run(&config, &script, viewport_width, pretty).await
        }
        Some(Commands::Config { action }) => {
            init_logging(&config, None)?;
            match action {
                ConfigAction::Path => commands::config::path(&config_path),
                ConfigAction::Show => commands::config::show(&config),
                ConfigAction::Init { force } => commands::config::init(&config_path, force),
            }
        }
    }
}
