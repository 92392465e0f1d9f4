use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use glidetrack_core::AppConfig;

mod commands;

#[derive(Parser)]
#[command(name = "glidetrack")]
#[command(author, version, about = "A scroll-driven carousel for the terminal")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Read configuration from this file instead of ~/.config/glidetrack/config.toml
    #[arg(short = 'c', long = "config", global = true)]
    config_path: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the interactive carousel
    Run {
        /// Number of demo slides
        #[arg(short = 'n', long)]
        slides: Option<usize>,
        /// Enable loop mode
        #[arg(long = "loop")]
        loop_enabled: bool,
        /// Start autoplay
        #[arg(long)]
        autoplay: bool,
    },
    /// Replay a scripted scenario headlessly and print events as JSON lines
    Simulate {
        /// TOML script; the built-in demo runs when omitted
        script: Option<PathBuf>,
        /// Override the script's slide count
        #[arg(short = 'n', long)]
        slides: Option<usize>,
        /// Force loop mode on
        #[arg(long = "loop")]
        loop_enabled: bool,
    },
    /// Inspect or create the configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration
    Show,
    /// Print the configuration file path
    Path,
    /// Write a default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = cli.config_path.unwrap_or_else(AppConfig::config_path);
    let mut config = AppConfig::load_from(&config_path)?;

    // The terminal UI owns stdout, so its logs go to a file
    let interactive = matches!(cli.command, Some(Commands::Run { .. }) | None);
    init_logging(&config, interactive)?;

    match cli.command {
        Some(Commands::Run {
            slides,
            loop_enabled,
            autoplay,
        }) => {
            if let Some(count) = slides {
                config.ui.slide_count = count;
            }
            config.slider.loop_enabled |= loop_enabled;
            config.slider.autoplay |= autoplay;
            commands::run::run(Arc::new(config)).await
        }
        None => commands::run::run(Arc::new(config)).await,
        Some(Commands::Simulate {
            script,
            slides,
            loop_enabled,
        }) => commands::simulate::run(script.as_deref(), slides, loop_enabled).await,
        Some(Commands::Config { action }) => match action {
            ConfigAction::Show => commands::config::show(&config),
            ConfigAction::Path => commands::config::path(&config_path),
            ConfigAction::Init { force } => commands::config::init(&config_path, force),
        },
    }
}

fn init_logging(config: &AppConfig, to_file: bool) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| config.general.log_level.clone()),
    );

    if to_file {
        let log_path = config.log_path();
        if let Some(parent) = log_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)?;
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_ansi(false)
                    .with_writer(Mutex::new(file)),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
    Ok(())
}
