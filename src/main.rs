use anyhow::{Context, Result};
use clap::Parser;
use mole_snake::game::GameConfig;
use mole_snake::modes::PlayMode;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser)]
#[command(name = "mole_snake")]
#[command(version, about = "Whack the moles, never the snake")]
struct Cli {
    /// TOML file with game settings
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of cells on the board
    #[arg(long)]
    grid_size: Option<usize>,

    /// Cells per row
    #[arg(long)]
    columns: Option<usize>,

    /// Seconds on the countdown
    #[arg(long)]
    time: Option<u32>,

    /// Maximum moles on the board at once
    #[arg(long)]
    max_moles: Option<usize>,

    /// Milliseconds between mole spawns
    #[arg(long)]
    mole_period_ms: Option<u64>,

    /// Milliseconds between snake moves
    #[arg(long)]
    snake_period_ms: Option<u64>,

    /// Milliseconds between countdown decrements
    #[arg(long)]
    countdown_period_ms: Option<u64>,

    /// Milliseconds a mole stays up before it hides
    #[arg(long)]
    mole_expiry_ms: Option<u64>,

    /// RNG seed for a reproducible game
    #[arg(long)]
    seed: Option<u64>,

    /// Write logs to this file (filter with RUST_LOG)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Print the effective configuration as TOML and exit
    #[arg(long)]
    print_config: bool,
}

impl Cli {
    fn into_config(self) -> Result<(GameConfig, bool)> {
        let mut config = match &self.config {
            Some(path) => GameConfig::load(path)?,
            None => GameConfig::default(),
        };

        if let Some(grid_size) = self.grid_size {
            config.grid_size = grid_size;
        }
        if let Some(columns) = self.columns {
            config.columns = columns;
        }
        if let Some(time) = self.time {
            config.time_budget = time;
        }
        if let Some(max_moles) = self.max_moles {
            config.max_concurrent_moles = max_moles;
        }
        if let Some(period) = self.mole_period_ms {
            config.mole_period_ms = period;
        }
        if let Some(period) = self.snake_period_ms {
            config.snake_period_ms = period;
        }
        if let Some(period) = self.countdown_period_ms {
            config.countdown_period_ms = period;
        }
        if let Some(expiry) = self.mole_expiry_ms {
            config.mole_expiry_ms = expiry;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        if self.log_file.is_some() {
            config.log_file = self.log_file;
        }

        config.validate()?;
        Ok((config, self.print_config))
    }
}

fn init_tracing(log_file: Option<&Path>) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .context("Failed to build log filter")?;

    // The TUI owns the terminal, so logs only ever go to a file
    let Some(path) = log_file else {
        tracing_subscriber::registry().with(env_filter).init();
        return Ok(());
    };

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file {}", path.display()))?;
    tracing_subscriber::registry()
        .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
        .with(env_filter)
        .init();

    tracing::info!(path = %path.display(), "Logging initialized");
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let (config, print_config) = cli.into_config()?;

    if print_config {
        let text = toml::to_string(&config).context("Failed to serialize config")?;
        print!("{text}");
        return Ok(());
    }

    init_tracing(config.log_file.as_deref())?;

    let mut play_mode = PlayMode::new(config)?;
    play_mode.run().await?;

    Ok(())
}
