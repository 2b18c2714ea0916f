use crate::game::{BoardView, GameOverKind, GameView};

/// Latest picture the game core pushed, waiting to be drawn
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Screen {
    pub board: BoardView,
    pub score: u32,
    pub time_left: u32,
    /// End-of-game message, cleared when a new game starts
    pub message: Option<GameOverKind>,
}

impl Screen {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear_message(&mut self) {
        self.message = None;
    }
}

impl GameView for Screen {
    fn render_board(&mut self, board: &BoardView) {
        self.board.clone_from(board);
    }

    fn update_score(&mut self, score: u32) {
        self.score = score;
    }

    fn update_timer(&mut self, time_left: u32) {
        self.time_left = time_left;
    }

    fn show_game_over(&mut self, kind: GameOverKind) {
        self.message = Some(kind);
    }
}
