//! The seam between the game core and whatever draws it.

use super::activation::GameOverKind;
use super::state::Cell;

/// What a single cell should look like
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellView {
    Empty,
    Mole,
    Snake,
    /// Mole and snake share the cell; clicking it is a snake hit
    MoleAndSnake,
}

impl CellView {
    pub fn has_snake(&self) -> bool {
        matches!(self, CellView::Snake | CellView::MoleAndSnake)
    }

    pub fn has_mole(&self) -> bool {
        matches!(self, CellView::Mole | CellView::MoleAndSnake)
    }
}

impl From<&Cell> for CellView {
    fn from(cell: &Cell) -> Self {
        match (cell.has_mole, cell.has_snake) {
            (false, false) => CellView::Empty,
            (true, false) => CellView::Mole,
            (false, true) => CellView::Snake,
            (true, true) => CellView::MoleAndSnake,
        }
    }
}

/// Render description of the whole board, indexed by cell id
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BoardView {
    pub cells: Vec<CellView>,
}

impl BoardView {
    /// Project the board cells into a render description
    pub fn describe(cells: &[Cell]) -> Self {
        Self {
            cells: cells.iter().map(CellView::from).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Sink for everything the core wants shown to the player
pub trait GameView {
    fn render_board(&mut self, board: &BoardView);
    fn update_score(&mut self, score: u32);
    fn update_timer(&mut self, time_left: u32);
    fn show_game_over(&mut self, kind: GameOverKind);
}
