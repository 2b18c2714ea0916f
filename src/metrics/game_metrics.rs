use crate::game::GameOverKind;

/// Results of the games played since the program started
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GameMetrics {
    pub high_score: u32,
    pub games_played: u32,
    pub timeouts: u32,
    pub snake_hits: u32,
}

impl GameMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_game_over(&mut self, kind: GameOverKind, final_score: u32) {
        self.games_played += 1;
        match kind {
            GameOverKind::Timeout => self.timeouts += 1,
            GameOverKind::SnakeHit => self.snake_hits += 1,
        }
        if final_score > self.high_score {
            self.high_score = final_score;
        }
    }
}
