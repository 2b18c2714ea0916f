//! Timers driving a running game.
//!
//! Three periodic streams (mole spawn, snake move, countdown) and one
//! one-shot timer per live mole. Every timer runs as its own tokio task and
//! only sends a [`ClockTick`] into a single channel; the controller drains
//! that channel on one task, so game state is never touched concurrently.

use std::collections::HashMap;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval_at, sleep_until};

use super::config::ClockPeriods;
use super::state::LiveMole;

/// What a timer firing asks the controller to do
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClockEvent {
    MoleSpawn,
    SnakeMove,
    Countdown,
    /// A single mole's lifetime ran out
    MoleExpired(LiveMole),
}

/// A clock event tagged with the session that produced it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockTick {
    pub session: u64,
    pub event: ClockEvent,
}

pub struct GameClock {
    periods: ClockPeriods,
    tx: mpsc::UnboundedSender<ClockTick>,
    session: u64,
    streams: Vec<JoinHandle<()>>,
    expiries: HashMap<LiveMole, JoinHandle<()>>,
}

impl GameClock {
    /// Create a stopped clock and the receiving end of its event channel
    pub fn new(periods: ClockPeriods) -> (Self, mpsc::UnboundedReceiver<ClockTick>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let clock = Self {
            periods,
            tx,
            session: 0,
            streams: Vec::new(),
            expiries: HashMap::new(),
        };
        (clock, rx)
    }

    /// Session of the most recent `start`; 0 before the first one
    pub fn session(&self) -> u64 {
        self.session
    }

    pub fn is_running(&self) -> bool {
        !self.streams.is_empty()
    }

    /// Number of mole expiry timers still pending
    pub fn pending_expiries(&self) -> usize {
        self.expiries.values().filter(|h| !h.is_finished()).count()
    }

    #[cfg(test)]
    pub(crate) fn is_expiry_pending(&self, mole: LiveMole) -> bool {
        self.expiries.get(&mole).is_some_and(|h| !h.is_finished())
    }

    /// Cancel everything outstanding and start the three periodic streams.
    ///
    /// Each stream's first tick arrives one full period after this call.
    /// Must be called from within a tokio runtime.
    pub fn start(&mut self) -> u64 {
        self.cancel();
        self.session += 1;

        let origin = Instant::now();
        let streams = [
            (ClockEvent::MoleSpawn, self.periods.mole_spawn),
            (ClockEvent::Countdown, self.periods.countdown),
            (ClockEvent::SnakeMove, self.periods.snake_move),
        ];
        for (event, period) in streams {
            let task = run_stream(self.tx.clone(), self.session, event, origin, period);
            self.streams.push(tokio::spawn(task));
        }

        tracing::debug!(session = self.session, "clock started");
        self.session
    }

    /// Arm the lifetime timer of a freshly spawned mole
    pub fn schedule_expiry(&mut self, mole: LiveMole) {
        self.expiries.retain(|_, handle| !handle.is_finished());

        let tx = self.tx.clone();
        let session = self.session;
        let deadline = Instant::now() + self.periods.mole_expiry;
        let handle = tokio::spawn(async move {
            sleep_until(deadline).await;
            let _ = tx.send(ClockTick {
                session,
                event: ClockEvent::MoleExpired(mole),
            });
        });

        if let Some(previous) = self.expiries.insert(mole, handle) {
            previous.abort();
        }
    }

    /// Disarm a mole's lifetime timer; unknown moles are ignored
    pub fn cancel_expiry(&mut self, mole: LiveMole) {
        if let Some(handle) = self.expiries.remove(&mole) {
            handle.abort();
        }
    }

    /// Stop the periodic streams and every pending expiry
    pub fn cancel(&mut self) {
        if self.streams.is_empty() && self.expiries.is_empty() {
            return;
        }
        for handle in self.streams.drain(..) {
            handle.abort();
        }
        for (_, handle) in self.expiries.drain() {
            handle.abort();
        }
        tracing::debug!(session = self.session, "clock cancelled");
    }
}

impl Drop for GameClock {
    fn drop(&mut self) {
        self.cancel();
    }
}

async fn run_stream(
    tx: mpsc::UnboundedSender<ClockTick>,
    session: u64,
    event: ClockEvent,
    origin: Instant,
    period: Duration,
) {
    let mut ticker = interval_at(origin + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;
        if tx.send(ClockTick { session, event }).is_err() {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::sleep;

    fn drain(rx: &mut mpsc::UnboundedReceiver<ClockTick>) -> Vec<ClockTick> {
        let mut ticks = Vec::new();
        while let Ok(tick) = rx.try_recv() {
            ticks.push(tick);
        }
        ticks
    }

    fn count(ticks: &[ClockTick], event: ClockEvent) -> usize {
        ticks.iter().filter(|t| t.event == event).count()
    }

    #[tokio::test(start_paused = true)]
    async fn test_streams_tick_at_their_periods() {
        let (mut clock, mut rx) = GameClock::new(ClockPeriods::default());
        let session = clock.start();
        assert!(clock.is_running());

        sleep(Duration::from_millis(500)).await;
        assert!(drain(&mut rx).is_empty());

        sleep(Duration::from_millis(1600)).await;
        let ticks = drain(&mut rx);
        assert_eq!(count(&ticks, ClockEvent::MoleSpawn), 2);
        assert_eq!(count(&ticks, ClockEvent::Countdown), 2);
        assert_eq!(count(&ticks, ClockEvent::SnakeMove), 1);
        assert!(ticks.iter().all(|t| t.session == session));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_stops_all_streams() {
        let (mut clock, mut rx) = GameClock::new(ClockPeriods::default());
        clock.start();
        clock.schedule_expiry(LiveMole {
            cell_id: 0,
            spawn_tick: 1,
        });
        clock.cancel();
        assert!(!clock.is_running());

        sleep(Duration::from_secs(10)).await;
        assert!(drain(&mut rx).is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_does_not_duplicate_streams() {
        let (mut clock, mut rx) = GameClock::new(ClockPeriods::default());
        let first = clock.start();
        sleep(Duration::from_millis(300)).await;
        let second = clock.start();
        assert_eq!(second, first + 1);

        sleep(Duration::from_millis(1100)).await;
        let ticks = drain(&mut rx);
        assert_eq!(count(&ticks, ClockEvent::MoleSpawn), 1);
        assert_eq!(count(&ticks, ClockEvent::Countdown), 1);
        assert!(ticks.iter().all(|t| t.session == second));
    }

    #[tokio::test(start_paused = true)]
    async fn test_expiry_fires_once_after_lifetime() {
        let (mut clock, mut rx) = GameClock::new(ClockPeriods::default());
        let mole = LiveMole {
            cell_id: 4,
            spawn_tick: 9,
        };
        clock.schedule_expiry(mole);
        assert_eq!(clock.pending_expiries(), 1);

        sleep(Duration::from_millis(1900)).await;
        assert!(drain(&mut rx).is_empty());

        sleep(Duration::from_millis(200)).await;
        let ticks = drain(&mut rx);
        assert_eq!(ticks.len(), 1);
        assert_eq!(ticks[0].event, ClockEvent::MoleExpired(mole));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_expiry() {
        let (mut clock, mut rx) = GameClock::new(ClockPeriods::default());
        let mole = LiveMole {
            cell_id: 1,
            spawn_tick: 2,
        };
        clock.schedule_expiry(mole);
        clock.cancel_expiry(mole);
        clock.cancel_expiry(mole);

        sleep(Duration::from_secs(3)).await;
        assert!(drain(&mut rx).is_empty());
    }
}
