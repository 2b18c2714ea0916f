use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Errors raised while loading or validating a [`GameConfig`]
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("grid must have at least one cell")]
    EmptyGrid,
    #[error("columns must be between 1 and the grid size ({grid_size}), got {columns}")]
    BadColumns { columns: usize, grid_size: usize },
    #[error("time budget must be at least one second")]
    NoTime,
    #[error("at least one concurrent mole must be allowed")]
    NoMoles,
    #[error("{0} must be greater than zero")]
    ZeroPeriod(&'static str),
    #[error("failed to read config at {path:?}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config at {path:?}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Configuration for one game session.
///
/// Fixed at game start; changing it only takes effect on the next `start`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Number of cells on the board
    pub grid_size: usize,
    /// Cells per row when drawn
    pub columns: usize,
    /// Seconds on the countdown
    pub time_budget: u32,
    /// Cap on moles alive at the same time
    pub max_concurrent_moles: usize,
    pub mole_period_ms: u64,
    pub snake_period_ms: u64,
    pub countdown_period_ms: u64,
    /// Lifetime of a single mole
    pub mole_expiry_ms: u64,
    /// Fixed RNG seed for reproducible sessions
    pub seed: Option<u64>,
    /// File that receives tracing output
    pub log_file: Option<PathBuf>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_size: 12,
            columns: 4,
            time_budget: 30,
            max_concurrent_moles: 3,
            mole_period_ms: 1000,
            snake_period_ms: 2000,
            countdown_period_ms: 1000,
            mole_expiry_ms: 2000,
            seed: None,
            log_file: None,
        }
    }
}

impl GameConfig {
    /// Create a configuration with a custom board, keeping reference timing
    pub fn new(grid_size: usize, columns: usize) -> Self {
        Self {
            grid_size,
            columns,
            ..Default::default()
        }
    }

    /// Load a configuration from a TOML file; missing keys take defaults
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid_size == 0 {
            return Err(ConfigError::EmptyGrid);
        }
        if self.columns == 0 || self.columns > self.grid_size {
            return Err(ConfigError::BadColumns {
                columns: self.columns,
                grid_size: self.grid_size,
            });
        }
        if self.time_budget == 0 {
            return Err(ConfigError::NoTime);
        }
        if self.max_concurrent_moles == 0 {
            return Err(ConfigError::NoMoles);
        }
        for (name, value) in [
            ("mole_period_ms", self.mole_period_ms),
            ("snake_period_ms", self.snake_period_ms),
            ("countdown_period_ms", self.countdown_period_ms),
            ("mole_expiry_ms", self.mole_expiry_ms),
        ] {
            if value == 0 {
                return Err(ConfigError::ZeroPeriod(name));
            }
        }
        Ok(())
    }

    /// Number of rows needed to draw the board
    pub fn rows(&self) -> usize {
        self.grid_size.div_ceil(self.columns.max(1))
    }

    pub fn periods(&self) -> ClockPeriods {
        ClockPeriods {
            mole_spawn: Duration::from_millis(self.mole_period_ms),
            snake_move: Duration::from_millis(self.snake_period_ms),
            countdown: Duration::from_millis(self.countdown_period_ms),
            mole_expiry: Duration::from_millis(self.mole_expiry_ms),
        }
    }
}

/// Timing of the clock streams, derived from [`GameConfig`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockPeriods {
    pub mole_spawn: Duration,
    pub snake_move: Duration,
    pub countdown: Duration,
    pub mole_expiry: Duration,
}

impl Default for ClockPeriods {
    fn default() -> Self {
        GameConfig::default().periods()
    }
}
