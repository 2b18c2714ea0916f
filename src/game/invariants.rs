//! Board invariants - sanity checks that detect bugs.
//!
//! None of these should ever trigger while the controller drives the state.
//! Debug builds check them after every controller mutation.

use std::collections::HashSet;
use std::fmt;

use super::state::GameState;

/// Invariant violation error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub message: String,
}

impl InvariantViolation {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invariant violation: {}", self.message)
    }
}

impl std::error::Error for InvariantViolation {}

/// Check all board invariants.
///
/// Returns every violation found, or an empty list if all invariants hold.
#[must_use]
pub fn check_invariants(state: &GameState, max_concurrent_moles: usize) -> Vec<InvariantViolation> {
    let mut violations = Vec::new();

    if state.live_mole_count() > max_concurrent_moles {
        violations.push(InvariantViolation::new(format!(
            "{} live moles > cap {}",
            state.live_mole_count(),
            max_concurrent_moles
        )));
    }

    let mut mole_cells = HashSet::new();
    for mole in state.live_moles() {
        if !mole_cells.insert(mole.cell_id) {
            violations.push(InvariantViolation::new(format!(
                "cell {} holds more than one live mole",
                mole.cell_id
            )));
        }
    }

    for cell in state.cells() {
        if cell.has_mole != mole_cells.contains(&cell.id) {
            violations.push(InvariantViolation::new(format!(
                "cell {} mole flag is {} but live queue disagrees",
                cell.id, cell.has_mole
            )));
        }
    }

    let snakes = state.snake_cell_count();
    let flooded = snakes == state.grid_size() && snakes > 1;
    if snakes > 1 && !flooded {
        violations.push(InvariantViolation::new(format!(
            "{snakes} cells hold the snake"
        )));
    }

    if !flooded {
        let flagged = state.cells().iter().find(|c| c.has_snake).map(|c| c.id);
        if flagged != state.snake_cell() {
            violations.push(InvariantViolation::new(format!(
                "snake cell is {:?} but flags say {:?}",
                state.snake_cell(),
                flagged
            )));
        }
    }

    violations
}
