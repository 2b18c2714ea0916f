//! Mole Snake - whack-a-mole in the terminal, with a snake you must not click
//!
//! This library provides:
//! - Core game logic: state, mole spawner, snake, clock and controller (game module)
//! - TUI rendering of the board (render module)
//! - Keyboard and mouse input mapping (input module)
//! - Per-run results (metrics module)
//! - The interactive play loop (modes module)

pub mod game;
pub mod input;
pub mod metrics;
pub mod modes;
pub mod render;
