use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio::sync::mpsc;

use super::{
    activation::{Activation, GameOverKind},
    clock::{ClockEvent, ClockTick, GameClock},
    config::{ConfigError, GameConfig},
    invariants::check_invariants,
    snake::SnakeAgent,
    spawner::MoleSpawner,
    state::{CellId, GameState, LiveMole},
    view::{BoardView, GameView},
};

/// Where the game is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Waiting for the first `start`
    Idle,
    Running,
    /// Finished; frozen until the next `start`
    Over(GameOverKind),
}

/// Owns the game state and applies clock ticks and player input to it
pub struct GameController<V: GameView> {
    config: GameConfig,
    state: GameState,
    phase: Phase,
    spawner: MoleSpawner,
    snake: SnakeAgent,
    clock: GameClock,
    view: V,
    /// Source of mole spawn stamps; never reset, so mole ids stay unique
    /// across sessions
    stamp: u64,
}

impl<V: GameView> GameController<V> {
    /// Create an idle controller and the channel its clock reports on.
    ///
    /// The caller feeds every tick from the receiver back into
    /// [`handle_tick`](Self::handle_tick).
    pub fn new(
        config: GameConfig,
        view: V,
    ) -> Result<(Self, mpsc::UnboundedReceiver<ClockTick>), ConfigError> {
        config.validate()?;

        let (spawner_rng, snake_rng) = match config.seed {
            Some(seed) => (
                StdRng::seed_from_u64(seed),
                StdRng::seed_from_u64(seed.rotate_left(32) ^ 0x5eed),
            ),
            None => (StdRng::from_entropy(), StdRng::from_entropy()),
        };
        let (clock, ticks) = GameClock::new(config.periods());

        let mut controller = Self {
            state: GameState::new(config.grid_size, config.time_budget),
            phase: Phase::Idle,
            spawner: MoleSpawner::new(config.max_concurrent_moles, spawner_rng),
            snake: SnakeAgent::new(snake_rng),
            clock,
            view,
            stamp: 0,
            config,
        };
        controller.push_full_view();
        Ok((controller, ticks))
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.phase == Phase::Running
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn clock(&self) -> &GameClock {
        &self.clock
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    /// Start a fresh game, cancelling any game still in progress.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(&mut self) {
        if self.phase == Phase::Running {
            tracing::info!(score = self.state.score(), "restarting game in progress");
        }

        self.state.reset(self.config.grid_size, self.config.time_budget);
        let session = self.clock.start();
        self.phase = Phase::Running;

        tracing::info!(
            session,
            grid_size = self.config.grid_size,
            time_budget = self.config.time_budget,
            "game started"
        );
        self.push_full_view();
        self.check_state();
    }

    /// The player clicked `cell_id`.
    ///
    /// The snake takes precedence over a mole on the same cell.
    pub fn activate(&mut self, cell_id: CellId) -> Activation {
        if self.phase != Phase::Running {
            tracing::trace!(cell_id, phase = ?self.phase, "activation ignored, game not running");
            return Activation::Ignored;
        }
        let Some(cell) = self.state.cell(cell_id).copied() else {
            tracing::trace!(cell_id, "activation ignored, no such cell");
            return Activation::Ignored;
        };

        if cell.has_snake {
            tracing::info!(cell_id, score = self.state.score(), "snake hit");
            self.state.flood_snake();
            self.render_board();
            self.finish(GameOverKind::SnakeHit);
            return Activation::SnakeHit;
        }

        if cell.has_mole {
            if let Some(mole) = self.state.mole_at(cell_id) {
                self.state.remove_mole(mole);
                self.clock.cancel_expiry(mole);
            }
            let score = self.state.add_point();
            tracing::debug!(cell_id, score, "mole hit");
            self.view.update_score(score);
            if !self.spawn_mole(Some(cell_id)) {
                self.render_board();
            }
            self.check_state();
            return Activation::Scored(score);
        }

        tracing::trace!(cell_id, "activation ignored, empty cell");
        Activation::Ignored
    }

    /// Apply one clock tick. Ticks from an earlier session, or arriving
    /// while the game is not running, are dropped.
    pub fn handle_tick(&mut self, tick: ClockTick) {
        if tick.session != self.clock.session() || self.phase != Phase::Running {
            tracing::trace!(?tick, "stale clock tick dropped");
            return;
        }

        match tick.event {
            ClockEvent::MoleSpawn => {
                self.spawn_mole(None);
            }
            ClockEvent::SnakeMove => {
                if self.snake.tick(&mut self.state).is_some() {
                    self.render_board();
                }
            }
            ClockEvent::Countdown => self.count_down(),
            ClockEvent::MoleExpired(mole) => self.expire_mole(mole),
        }
        self.check_state();
    }

    /// Run one spawner tick and keep the expiry timers in step.
    /// Returns whether the board was redrawn.
    fn spawn_mole(&mut self, exclude: Option<CellId>) -> bool {
        self.stamp += 1;
        let outcome = self
            .spawner
            .tick_excluding(&mut self.state, self.stamp, exclude);

        if let Some(evicted) = outcome.evicted {
            self.clock.cancel_expiry(evicted);
        }
        if let Some(spawned) = outcome.spawned {
            self.clock.schedule_expiry(spawned);
        }
        if outcome.changed_board() {
            self.render_board();
        }
        outcome.changed_board()
    }

    fn expire_mole(&mut self, mole: LiveMole) {
        self.clock.cancel_expiry(mole);
        if self.state.remove_mole(mole) {
            tracing::debug!(cell = mole.cell_id, spawn_tick = mole.spawn_tick, "mole expired");
            self.render_board();
        }
    }

    fn count_down(&mut self) {
        let time_left = self.state.count_down();
        self.view.update_timer(time_left);
        if time_left == 0 {
            tracing::info!(score = self.state.score(), "time is over");
            self.finish(GameOverKind::Timeout);
        }
    }

    fn finish(&mut self, kind: GameOverKind) {
        self.clock.cancel();
        self.phase = Phase::Over(kind);
        self.view.show_game_over(kind);
    }

    fn render_board(&mut self) {
        let board = BoardView::describe(self.state.cells());
        self.view.render_board(&board);
    }

    fn push_full_view(&mut self) {
        self.render_board();
        self.view.update_score(self.state.score());
        self.view.update_timer(self.state.time_left());
    }

    fn check_state(&self) {
        if cfg!(debug_assertions) {
            let violations = check_invariants(&self.state, self.config.max_concurrent_moles);
            debug_assert!(violations.is_empty(), "{violations:?}");
        }
    }
}
