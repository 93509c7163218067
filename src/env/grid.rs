use crate::env::CliffWalkingAction;
use crate::utils::{from_1d_to_2d, from_2d_to_1d};

/// A `(row, col)` grid coordinate.
pub type Cell = (usize, usize);

#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
pub struct GridShape {
    pub nrow: usize,
    pub ncol: usize,
}

impl GridShape {
    pub fn new(nrow: usize, ncol: usize) -> Self {
        Self { nrow, ncol }
    }

    pub fn n_states(&self) -> usize {
        self.nrow * self.ncol
    }

    pub fn contains(&self, cell: Cell) -> bool {
        cell.0 < self.nrow && cell.1 < self.ncol
    }

    #[inline(always)]
    pub fn to_state(&self, cell: Cell) -> usize {
        from_2d_to_1d(self.ncol, cell.0, cell.1)
    }

    #[inline(always)]
    pub fn to_cell(&self, state: usize) -> Cell {
        from_1d_to_2d(self.ncol, state)
    }

    /// Moves one cell in the action's direction, staying in place along an
    /// axis when the move would leave the grid.
    pub fn clamped_move(&self, (row, col): Cell, action: CliffWalkingAction) -> Cell {
        match action {
            CliffWalkingAction::Up => (row.saturating_sub(1), col),
            CliffWalkingAction::Right => (row, (col + 1).min(self.ncol - 1)),
            CliffWalkingAction::Down => ((row + 1).min(self.nrow - 1), col),
            CliffWalkingAction::Left => (row, col.saturating_sub(1)),
        }
    }

    /// The in-bounds neighbour in the action's direction, if there is one.
    pub fn neighbour(&self, cell: Cell, action: CliffWalkingAction) -> Option<Cell> {
        if self.leaves_grid(cell, action) {
            None
        } else {
            Some(self.clamped_move(cell, action))
        }
    }

    pub fn leaves_grid(&self, (row, col): Cell, action: CliffWalkingAction) -> bool {
        match action {
            CliffWalkingAction::Up => row == 0,
            CliffWalkingAction::Right => col + 1 >= self.ncol,
            CliffWalkingAction::Down => row + 1 >= self.nrow,
            CliffWalkingAction::Left => col == 0,
        }
    }
}
