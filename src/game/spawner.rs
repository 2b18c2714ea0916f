use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use super::state::{CellId, GameState, LiveMole};

/// What a single spawner tick did to the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SpawnOutcome {
    /// Oldest mole removed to make room under the cap
    pub evicted: Option<LiveMole>,
    /// Newly placed mole; its expiry timer is the caller's to schedule
    pub spawned: Option<LiveMole>,
}

impl SpawnOutcome {
    pub fn changed_board(&self) -> bool {
        self.evicted.is_some() || self.spawned.is_some()
    }
}

/// Places moles on random empty cells, keeping at most `max_concurrent` alive
pub struct MoleSpawner {
    max_concurrent: usize,
    rng: StdRng,
}

impl MoleSpawner {
    pub fn new(max_concurrent: usize, rng: StdRng) -> Self {
        Self {
            max_concurrent,
            rng,
        }
    }

    pub fn max_concurrent(&self) -> usize {
        self.max_concurrent
    }

    /// Run one spawn tick.
    ///
    /// Evicts the oldest mole first if the board is already at the cap, then
    /// spawns on a random mole-free cell stamped with `now`. A full board
    /// spawns nothing.
    pub fn tick(&mut self, state: &mut GameState, now: u64) -> SpawnOutcome {
        self.tick_excluding(state, now, None)
    }

    /// Same as [`tick`](Self::tick), but never spawns on `exclude`.
    ///
    /// Used for the backfill after a hit, so a mole never pops straight back
    /// out of the hole that was just whacked.
    pub fn tick_excluding(
        &mut self,
        state: &mut GameState,
        now: u64,
        exclude: Option<CellId>,
    ) -> SpawnOutcome {
        let mut outcome = SpawnOutcome::default();

        if state.live_mole_count() + 1 > self.max_concurrent {
            outcome.evicted = state.evict_oldest();
            if let Some(mole) = outcome.evicted {
                tracing::debug!(
                    cell = mole.cell_id,
                    spawn_tick = mole.spawn_tick,
                    "mole evicted at cap"
                );
            }
        }

        let mut empty = state.empty_cells();
        if let Some(excluded) = exclude {
            empty.retain(|&cell| cell != excluded);
        }
        let Some(&cell_id) = empty.choose(&mut self.rng) else {
            tracing::trace!("no empty cell, skipping spawn");
            return outcome;
        };

        outcome.spawned = state.place_mole(cell_id, now);
        if let Some(mole) = outcome.spawned {
            tracing::debug!(
                cell = mole.cell_id,
                spawn_tick = mole.spawn_tick,
                "mole spawned"
            );
        }
        outcome
    }
}
