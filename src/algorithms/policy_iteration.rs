use ndarray::{Array1, Array2};

use crate::env::{CliffWalkingAction, TransitionTable};

#[derive(Debug, Clone)]
pub struct Solution {
    /// Chosen action per state. `None` when every action from that state is
    /// masked or has no finite return.
    pub policy: Vec<Option<CliffWalkingAction>>,
    pub values: Array1<f64>,
    pub iterations: usize,
}

impl Solution {
    pub fn action(&self, state: usize) -> Option<CliffWalkingAction> {
        self.policy[state]
    }
}

/// Synchronous value sweeps alternated with greedy extraction, stopping once
/// the extracted policy stops moving.
///
/// Neither loop is capped: a zero threshold, or a discount that does not
/// contract, may never return.
#[derive(Debug, Copy, Clone)]
pub struct PolicyIteration {
    discount_factor: f64,
    threshold: f64,
}

impl PolicyIteration {
    pub fn new(discount_factor: f64, threshold: f64) -> Self {
        Self {
            discount_factor,
            threshold,
        }
    }

    fn action_value(
        &self,
        table: &TransitionTable,
        state: usize,
        action: CliffWalkingAction,
        values: &Array1<f64>,
    ) -> f64 {
        table
            .outcomes(state, action)
            .iter()
            .map(|t| t.probability * (t.reward + self.discount_factor * values[t.next_state]))
            .sum()
    }

    /// One Bellman optimality backup of every state from the same snapshot.
    pub fn sweep(&self, table: &TransitionTable, values: &Array1<f64>) -> Array1<f64> {
        Array1::from_shape_fn(table.n_states(), |state| {
            CliffWalkingAction::ALL
                .iter()
                .map(|a| self.action_value(table, state, *a, values))
                .fold(f64::NEG_INFINITY, f64::max)
        })
    }

    /// Greedy action for `state`, never picking a move off the grid edge.
    /// Ties go to the lowest action id.
    pub fn best_action(
        &self,
        table: &TransitionTable,
        state: usize,
        values: &Array1<f64>,
    ) -> Option<CliffWalkingAction> {
        let shape = table.shape();
        let cell = shape.to_cell(state);
        let mut max_v: f64 = f64::NEG_INFINITY;
        let mut best: Option<CliffWalkingAction> = None;
        for action in CliffWalkingAction::ALL {
            if shape.leaves_grid(cell, action) {
                continue;
            }
            let v = self.action_value(table, state, action, values);
            if v > max_v {
                max_v = v;
                best = Some(action);
            }
        }
        best
    }

    fn extract(
        &self,
        table: &TransitionTable,
        values: &Array1<f64>,
    ) -> (Array2<f64>, Vec<Option<CliffWalkingAction>>) {
        let mut distribution = Array2::zeros((table.n_states(), CliffWalkingAction::COUNT));
        let mut actions = Vec::with_capacity(table.n_states());
        for state in 0..table.n_states() {
            let best = self.best_action(table, state, values);
            if let Some(action) = best {
                distribution[[state, action.index()]] = 1.0;
            }
            actions.push(best);
        }
        (distribution, actions)
    }

    pub fn solve(&self, table: &TransitionTable) -> Solution {
        let n_states = table.n_states();
        let n_actions = CliffWalkingAction::COUNT;
        let mut values: Array1<f64> = Array1::zeros(n_states);
        let mut policy: Array2<f64> =
            Array2::from_elem((n_states, n_actions), 1.0 / n_actions as f64);
        let mut iterations: usize = 0;
        loop {
            iterations += 1;
            let new_values = self.sweep(table, &values);
            let (new_policy, actions) = self.extract(table, &new_values);
            let delta = (&policy - &new_policy).fold(0.0_f64, |acc, d| acc.max(d.abs()));
            if delta < self.threshold {
                return Solution {
                    policy: actions,
                    values: new_values,
                    iterations,
                };
            }
            policy = new_policy;
            values = new_values;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::{Cell, GridShape, HazardSet};

    const SHAPE: GridShape = GridShape { nrow: 4, ncol: 12 };
    const START: Cell = (3, 0);
    const GOAL: Cell = (3, 11);

    fn open_table() -> TransitionTable {
        TransitionTable::build(SHAPE, START, GOAL, &HazardSet::default())
    }

    #[test]
    fn sweep_uses_the_previous_snapshot() {
        let table = open_table();
        let zeros = Array1::zeros(table.n_states());
        let once = PolicyIteration::new(0.99, 1e-4).sweep(&table, &zeros);
        // raw table: every move is a third of -0.2
        for v in once.iter() {
            assert!((v - (-0.2 / 3.0)).abs() < 1e-12);
        }
    }

    #[test]
    fn edge_actions_are_masked() {
        let table = open_table();
        let solver = PolicyIteration::new(0.99, 1e-4);
        // zero values leave every legal action tied, so the first legal one wins
        let zeros = Array1::zeros(table.n_states());
        assert_eq!(solver.best_action(&table, 0, &zeros), Some(CliffWalkingAction::Right));
        assert_eq!(solver.best_action(&table, 11, &zeros), Some(CliffWalkingAction::Down));
        assert_eq!(solver.best_action(&table, 47, &zeros), Some(CliffWalkingAction::Up));
        assert_eq!(solver.best_action(&table, 20, &zeros), Some(CliffWalkingAction::Up));
    }

    #[test]
    fn single_cell_grid_has_no_action() {
        let shape = GridShape::new(1, 1);
        let table = TransitionTable::build(shape, (0, 0), (0, 0), &HazardSet::default());
        let solution = PolicyIteration::new(0.9, 1e-4).solve(&table);
        assert_eq!(solution.policy, vec![None]);
        assert_eq!(solution.action(0), None);
    }

    #[test]
    fn converged_policy_never_leaves_the_grid() {
        let hazards: HazardSet = [SHAPE.to_state((2, 3)), SHAPE.to_state((1, 7))]
            .into_iter()
            .collect();
        let table = TransitionTable::build(SHAPE, START, GOAL, &hazards);
        let solution = PolicyIteration::new(0.99, 1e-4).solve(&table);
        assert_eq!(solution.values.len(), 48);
        for (state, action) in solution.policy.iter().enumerate() {
            let action = action.expect("every cell of a 4x12 grid has a legal move");
            assert!(!SHAPE.leaves_grid(SHAPE.to_cell(state), action));
        }
    }

    #[test]
    fn stops_once_policy_is_stable() {
        let solution = PolicyIteration::new(0.99, 1e-4).solve(&open_table());
        assert!(solution.iterations >= 2);
    }
}
