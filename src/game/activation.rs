use std::fmt;

/// How a game ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameOverKind {
    /// The countdown reached zero
    Timeout,
    /// The player clicked the snake
    SnakeHit,
}

impl GameOverKind {
    /// Message shown to the player when the game ends this way
    pub fn message(&self) -> &'static str {
        match self {
            GameOverKind::Timeout => "Time is over!",
            GameOverKind::SnakeHit => "Game over! You clicked the snake.",
        }
    }
}

impl fmt::Display for GameOverKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Result of the player activating a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    /// Nothing happened: inert cell, unknown cell, or game not running
    Ignored,
    /// A mole was hit; carries the new score
    Scored(u32),
    /// The snake was hit and the game is over
    SnakeHit,
}
