use std::collections::VecDeque;

/// Index of a cell on the board, in `0..grid_size`
pub type CellId = usize;

/// A single cell of the board
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub id: CellId,
    pub has_mole: bool,
    pub has_snake: bool,
}

impl Cell {
    pub fn new(id: CellId) -> Self {
        Self {
            id,
            has_mole: false,
            has_snake: false,
        }
    }
}

/// A mole currently on the board.
///
/// The `(cell_id, spawn_tick)` pair is the mole's identity: expiry timers,
/// cap-eviction and clicks all remove moles by this value, never by cell alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LiveMole {
    pub cell_id: CellId,
    pub spawn_tick: u64,
}

/// Complete game state
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    cells: Vec<Cell>,
    /// Oldest mole at the front
    live_moles: VecDeque<LiveMole>,
    score: u32,
    time_left: u32,
    snake_cell: Option<CellId>,
}

impl GameState {
    /// Create a fresh state with `grid_size` empty cells
    pub fn new(grid_size: usize, time_budget: u32) -> Self {
        let mut state = Self {
            cells: Vec::new(),
            live_moles: VecDeque::new(),
            score: 0,
            time_left: 0,
            snake_cell: None,
        };
        state.reset(grid_size, time_budget);
        state
    }

    /// Reinitialize every field to its start value
    pub fn reset(&mut self, grid_size: usize, time_budget: u32) {
        self.cells = (0..grid_size).map(Cell::new).collect();
        self.live_moles.clear();
        self.score = 0;
        self.time_left = time_budget;
        self.snake_cell = None;
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn cell(&self, id: CellId) -> Option<&Cell> {
        self.cells.get(id)
    }

    pub fn grid_size(&self) -> usize {
        self.cells.len()
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn time_left(&self) -> u32 {
        self.time_left
    }

    pub fn snake_cell(&self) -> Option<CellId> {
        self.snake_cell
    }

    /// Live moles in spawn order, oldest first
    pub fn live_moles(&self) -> impl ExactSizeIterator<Item = &LiveMole> {
        self.live_moles.iter()
    }

    pub fn live_mole_count(&self) -> usize {
        self.live_moles.len()
    }

    /// The live mole sitting on `cell_id`, if any
    pub fn mole_at(&self, cell_id: CellId) -> Option<LiveMole> {
        self.live_moles
            .iter()
            .copied()
            .find(|mole| mole.cell_id == cell_id)
    }

    /// Ids of every cell without a mole (the snake does not block a spawn)
    pub fn empty_cells(&self) -> Vec<CellId> {
        self.cells
            .iter()
            .filter(|cell| !cell.has_mole)
            .map(|cell| cell.id)
            .collect()
    }

    /// Put a mole on an empty cell and append it to the live queue.
    ///
    /// Returns `None` when the cell does not exist or already has a mole.
    pub fn place_mole(&mut self, cell_id: CellId, spawn_tick: u64) -> Option<LiveMole> {
        let cell = self.cells.get_mut(cell_id)?;
        if cell.has_mole {
            return None;
        }
        cell.has_mole = true;

        let mole = LiveMole {
            cell_id,
            spawn_tick,
        };
        self.live_moles.push_back(mole);
        Some(mole)
    }

    /// Remove the oldest live mole, regardless of its own expiry
    pub fn evict_oldest(&mut self) -> Option<LiveMole> {
        let mole = self.live_moles.pop_front()?;
        if let Some(cell) = self.cells.get_mut(mole.cell_id) {
            cell.has_mole = false;
        }
        Some(mole)
    }

    /// Remove a mole by identity.
    ///
    /// Returns `false` (and touches nothing) if that mole is already gone,
    /// so a newer mole on the same cell survives a stale removal.
    pub fn remove_mole(&mut self, mole: LiveMole) -> bool {
        let Some(index) = self.live_moles.iter().position(|live| *live == mole) else {
            return false;
        };
        self.live_moles.remove(index);
        if let Some(cell) = self.cells.get_mut(mole.cell_id) {
            cell.has_mole = false;
        }
        true
    }

    /// Move the snake to `cell_id`, vacating its previous cell.
    ///
    /// Returns the previous cell. Out-of-range ids leave the snake where it is.
    pub fn move_snake(&mut self, cell_id: CellId) -> Option<CellId> {
        if cell_id >= self.cells.len() {
            return self.snake_cell;
        }

        let previous = self.snake_cell.take();
        if let Some(prev) = previous
            && let Some(cell) = self.cells.get_mut(prev)
        {
            cell.has_snake = false;
        }

        self.cells[cell_id].has_snake = true;
        self.snake_cell = Some(cell_id);
        previous
    }

    /// Mark every cell as holding the snake (the snake-hit board)
    pub fn flood_snake(&mut self) {
        for cell in &mut self.cells {
            cell.has_snake = true;
        }
    }

    /// Add one point and return the new score
    pub fn add_point(&mut self) -> u32 {
        self.score = self.score.saturating_add(1);
        self.score
    }

    /// Take one second off the timer, never going below zero
    pub fn count_down(&mut self) -> u32 {
        self.time_left = self.time_left.saturating_sub(1);
        self.time_left
    }

    /// Number of cells currently marked with the snake
    pub fn snake_cell_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.has_snake).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_is_empty() {
        let state = GameState::new(12, 30);
        assert_eq!(state.grid_size(), 12);
        assert_eq!(state.score(), 0);
        assert_eq!(state.time_left(), 30);
        assert_eq!(state.live_mole_count(), 0);
        assert_eq!(state.snake_cell(), None);
        assert!(state.cells().iter().all(|c| !c.has_mole && !c.has_snake));
        assert!(state.cells().iter().enumerate().all(|(i, c)| c.id == i));
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut state = GameState::new(12, 30);
        state.place_mole(3, 1);
        state.move_snake(5);
        state.add_point();
        state.count_down();

        state.reset(9, 20);

        assert_eq!(state, GameState::new(9, 20));
    }

    #[test]
    fn test_place_mole_rejects_occupied_and_out_of_range() {
        let mut state = GameState::new(4, 30);
        assert!(state.place_mole(1, 1).is_some());
        assert!(state.place_mole(1, 2).is_none());
        assert!(state.place_mole(4, 3).is_none());
        assert_eq!(state.live_mole_count(), 1);
    }

    #[test]
    fn test_evict_oldest_is_fifo() {
        let mut state = GameState::new(4, 30);
        state.place_mole(2, 1);
        state.place_mole(0, 2);

        let evicted = state.evict_oldest().unwrap();
        assert_eq!(evicted.cell_id, 2);
        assert!(!state.cell(2).unwrap().has_mole);
        assert!(state.cell(0).unwrap().has_mole);
        assert_eq!(state.live_mole_count(), 1);
    }

    #[test]
    fn test_remove_mole_is_idempotent() {
        let mut state = GameState::new(4, 30);
        let mole = state.place_mole(2, 1).unwrap();

        assert!(state.remove_mole(mole));
        assert!(!state.remove_mole(mole));
        assert_eq!(state.live_mole_count(), 0);
    }

    #[test]
    fn test_stale_removal_spares_newer_mole_on_same_cell() {
        let mut state = GameState::new(4, 30);
        let old = state.place_mole(2, 1).unwrap();
        state.evict_oldest();
        let new = state.place_mole(2, 7).unwrap();

        assert!(!state.remove_mole(old));
        assert!(state.cell(2).unwrap().has_mole);
        assert_eq!(state.mole_at(2), Some(new));
    }

    #[test]
    fn test_move_snake_vacates_previous_cell() {
        let mut state = GameState::new(4, 30);
        assert_eq!(state.move_snake(1), None);
        assert_eq!(state.move_snake(3), Some(1));
        assert!(!state.cell(1).unwrap().has_snake);
        assert!(state.cell(3).unwrap().has_snake);
        assert_eq!(state.snake_cell_count(), 1);

        // Staying put is allowed
        assert_eq!(state.move_snake(3), Some(3));
        assert_eq!(state.snake_cell_count(), 1);
    }

    #[test]
    fn test_flood_marks_every_cell() {
        let mut state = GameState::new(6, 30);
        state.move_snake(2);
        state.flood_snake();
        assert_eq!(state.snake_cell_count(), 6);
    }

    #[test]
    fn test_count_down_saturates() {
        let mut state = GameState::new(4, 1);
        assert_eq!(state.count_down(), 0);
        assert_eq!(state.count_down(), 0);
    }
}
