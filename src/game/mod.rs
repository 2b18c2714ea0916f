//! Core game logic for whack-a-mole with a snake
//!
//! This module contains the timed state machine without any terminal I/O.
//! Everything it wants shown goes through the [`GameView`] trait.

pub mod activation;
pub mod clock;
pub mod config;
pub mod controller;
pub mod invariants;
pub mod snake;
pub mod spawner;
pub mod state;
pub mod view;

// Re-export commonly used types
pub use activation::{Activation, GameOverKind};
pub use clock::{ClockEvent, ClockTick, GameClock};
pub use config::{ClockPeriods, ConfigError, GameConfig};
pub use controller::{GameController, Phase};
pub use invariants::{InvariantViolation, check_invariants};
pub use snake::SnakeAgent;
pub use spawner::{MoleSpawner, SpawnOutcome};
pub use state::{Cell, CellId, GameState, LiveMole};
pub use view::{BoardView, CellView, GameView};
