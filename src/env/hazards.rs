use fxhash::{FxBuildHasher, FxHashSet};
use indexmap::IndexSet;
use rand::Rng;

use crate::env::{Cell, CliffWalkingAction, EnvError, GridShape};

/// Hazard states in the order they were placed.
pub type HazardSet = IndexSet<usize, FxBuildHasher>;

/// Source of candidate hazard cells.
pub trait CellSampler {
    fn sample_cell(&mut self, shape: GridShape) -> Cell;
}

impl<R: Rng> CellSampler for R {
    fn sample_cell(&mut self, shape: GridShape) -> Cell {
        (self.gen_range(0..shape.nrow), self.gen_range(0..shape.ncol))
    }
}

/// Depth-first search from `start`, refusing hazards and the grid edge.
/// Succeeds as soon as `goal` shows up among the neighbours of an expanded cell.
pub fn is_reachable(shape: GridShape, hazards: &HazardSet, start: Cell, goal: Cell) -> bool {
    if start == goal {
        return true;
    }
    let mut frontier: Vec<Cell> = vec![start];
    let mut discovered: FxHashSet<Cell> = FxHashSet::default();
    while let Some(cell) = frontier.pop() {
        if !discovered.insert(cell) {
            continue;
        }
        for action in CliffWalkingAction::ALL {
            let Some(next) = shape.neighbour(cell, action) else {
                continue;
            };
            if next == goal {
                return true;
            }
            if !hazards.contains(&shape.to_state(next)) {
                frontier.push(next);
            }
        }
    }
    false
}

/// Rejection sampler for random hazard layouts.
///
/// Without an attempt limit the loop only ends once `count` hazards are placed,
/// so an infeasible count never returns.
#[derive(Debug, Copy, Clone)]
pub struct HazardPlacer {
    shape: GridShape,
    start: Cell,
    goal: Cell,
    count: usize,
    max_attempts: Option<usize>,
}

impl HazardPlacer {
    pub fn new(shape: GridShape, start: Cell, goal: Cell, count: usize) -> Self {
        Self {
            shape,
            start,
            goal,
            count,
            max_attempts: None,
        }
    }

    pub fn with_max_attempts(mut self, max_attempts: Option<usize>) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    pub fn place<S: CellSampler + ?Sized>(&self, sampler: &mut S) -> Result<HazardSet, EnvError> {
        let mut hazards: HazardSet = HazardSet::default();
        let mut attempts: usize = 0;
        while hazards.len() < self.count {
            if self.max_attempts.is_some_and(|max| attempts >= max) {
                return Err(EnvError::PlacementExhausted {
                    placed: hazards.len(),
                    requested: self.count,
                    attempts,
                });
            }
            attempts += 1;
            let cell: Cell = sampler.sample_cell(self.shape);
            if !self.shape.contains(cell) || cell == self.start || cell == self.goal {
                continue;
            }
            if !hazards.insert(self.shape.to_state(cell)) {
                continue;
            }
            if !is_reachable(self.shape, &hazards, self.start, self.goal) {
                hazards.pop();
            }
        }
        Ok(hazards)
    }
}

/// The textbook cliff: the bottom row between the two corners.
pub fn classic_layout(shape: GridShape, start: Cell, goal: Cell) -> HazardSet {
    let Some(row) = shape.nrow.checked_sub(1) else {
        return HazardSet::default();
    };
    (1..shape.ncol.saturating_sub(1))
        .map(|col| (row, col))
        .filter(|cell| *cell != start && *cell != goal)
        .map(|cell| shape.to_state(cell))
        .collect()
}
