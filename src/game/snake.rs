use rand::Rng;
use rand::rngs::StdRng;

use super::state::{CellId, GameState};

/// Moves the snake to a random cell on every tick
pub struct SnakeAgent {
    rng: StdRng,
}

impl SnakeAgent {
    pub fn new(rng: StdRng) -> Self {
        Self { rng }
    }

    /// Vacate the current cell and occupy a uniformly random one.
    ///
    /// Any cell may be picked, including the current one and cells with a
    /// mole. Returns the new cell, or `None` on an empty board.
    pub fn tick(&mut self, state: &mut GameState) -> Option<CellId> {
        if state.grid_size() == 0 {
            return None;
        }

        let target = self.rng.gen_range(0..state.grid_size());
        let previous = state.move_snake(target);
        tracing::debug!(from = ?previous, to = target, "snake moved");
        Some(target)
    }
}
