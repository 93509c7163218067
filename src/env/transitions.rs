use std::ops::Index;

use crate::env::{Cell, CliffWalkingAction, GridShape, HazardSet};
use crate::utils::categorical_sample;

pub const HAZARD_REWARD: f64 = -100.0;
pub const STEP_REWARD: f64 = -0.2;
/// Mass of a regular move. Sized for a three-way action split at execution
/// time, so a single entry does not sum to one on its own.
pub const STEP_PROBABILITY: f64 = 1.0 / 3.0;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Transition {
    pub probability: f64,
    pub next_state: usize,
    pub reward: f64,
    pub terminal: bool,
}

type Outcomes = [Vec<Transition>; CliffWalkingAction::COUNT];

/// Outcome lists for every `(state, action)` pair of a grid.
///
/// Every list is non-empty. Only rewards can change after `build`.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct TransitionTable {
    shape: GridShape,
    entries: Vec<Outcomes>,
}

impl TransitionTable {
    fn compile(
        shape: GridShape,
        start: Cell,
        goal: Cell,
        hazards: &HazardSet,
        cell: Cell,
        action: CliffWalkingAction,
    ) -> Transition {
        let new_cell: Cell = shape.clamped_move(cell, action);
        let new_state: usize = shape.to_state(new_cell);
        if hazards.contains(&new_state) {
            return Transition {
                probability: 1.0,
                next_state: shape.to_state(start),
                reward: HAZARD_REWARD,
                terminal: false,
            };
        }
        Transition {
            probability: STEP_PROBABILITY,
            next_state: new_state,
            reward: STEP_REWARD,
            terminal: new_cell == goal,
        }
    }

    pub fn build(shape: GridShape, start: Cell, goal: Cell, hazards: &HazardSet) -> Self {
        let mut entries: Vec<Outcomes> = Vec::with_capacity(shape.n_states());
        for state in 0..shape.n_states() {
            let cell = shape.to_cell(state);
            entries.push(CliffWalkingAction::ALL.map(|a| {
                vec![Self::compile(shape, start, goal, hazards, cell, a)]
            }));
        }
        Self { shape, entries }
    }

    pub fn shape(&self) -> GridShape {
        self.shape
    }

    pub fn n_states(&self) -> usize {
        self.entries.len()
    }

    pub fn outcomes(&self, state: usize, action: CliffWalkingAction) -> &[Transition] {
        &self.entries[state][action.index()]
    }

    /// Rewards are the only field callers may rewrite.
    pub fn for_each_reward_mut<F>(&mut self, state: usize, mut f: F)
    where
        F: FnMut(&mut f64),
    {
        for outcomes in self.entries[state].iter_mut() {
            for transition in outcomes.iter_mut() {
                f(&mut transition.reward);
            }
        }
    }

    /// Outcome probabilities scaled to sum to one, as `sample` draws them.
    pub fn execution_probabilities(&self, state: usize, action: CliffWalkingAction) -> Vec<f64> {
        let outcomes = self.outcomes(state, action);
        let total: f64 = outcomes.iter().map(|t| t.probability).sum();
        outcomes.iter().map(|t| t.probability / total).collect()
    }

    pub fn sample(&self, state: usize, action: CliffWalkingAction, random: f64) -> &Transition {
        let outcomes = self.outcomes(state, action);
        let probs: Vec<f64> = outcomes.iter().map(|t| t.probability).collect();
        let i = categorical_sample(&probs, random).unwrap_or(0);
        &outcomes[i]
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, CliffWalkingAction, &[Transition])> {
        self.entries.iter().enumerate().flat_map(|(state, outcomes)| {
            CliffWalkingAction::ALL
                .into_iter()
                .map(move |a| (state, a, outcomes[a.index()].as_slice()))
        })
    }
}

impl Index<(usize, CliffWalkingAction)> for TransitionTable {
    type Output = [Transition];

    fn index(&self, (state, action): (usize, CliffWalkingAction)) -> &Self::Output {
        self.outcomes(state, action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHAPE: GridShape = GridShape { nrow: 4, ncol: 12 };
    const START: Cell = (3, 0);
    const GOAL: Cell = (3, 11);

    fn table_with(hazards: &[Cell]) -> (TransitionTable, HazardSet) {
        let hazards: HazardSet = hazards.iter().map(|c| SHAPE.to_state(*c)).collect();
        (TransitionTable::build(SHAPE, START, GOAL, &hazards), hazards)
    }

    #[test]
    fn every_pair_has_one_outcome() {
        let (table, _) = table_with(&[(1, 1), (2, 5)]);
        assert_eq!(table.n_states(), 48);
        assert_eq!(table.iter().count(), 48 * 4);
        for (_, _, outcomes) in table.iter() {
            assert_eq!(outcomes.len(), 1);
        }
    }

    #[test]
    fn entering_a_hazard_sends_back_to_start() {
        let (table, _) = table_with(&[(1, 1)]);
        let cases = [
            ((0, 1), CliffWalkingAction::Down),
            ((1, 0), CliffWalkingAction::Right),
            ((2, 1), CliffWalkingAction::Up),
            ((1, 2), CliffWalkingAction::Left),
        ];
        for (cell, action) in cases {
            let t = table[(SHAPE.to_state(cell), action)][0];
            assert_eq!(t.probability, 1.0);
            assert_eq!(t.next_state, 36);
            assert_eq!(t.reward, HAZARD_REWARD);
            assert!(!t.terminal);
        }
    }

    #[test]
    fn regular_moves_carry_a_third() {
        let (table, _) = table_with(&[]);
        let t = table[(SHAPE.to_state((2, 3)), CliffWalkingAction::Right)][0];
        assert_eq!(t.probability, STEP_PROBABILITY);
        assert_eq!(t.next_state, SHAPE.to_state((2, 4)));
        assert_eq!(t.reward, STEP_REWARD);
        assert!(!t.terminal);
    }

    #[test]
    fn reaching_the_goal_terminates() {
        let (table, _) = table_with(&[]);
        let from_left = table[(SHAPE.to_state((3, 10)), CliffWalkingAction::Right)][0];
        let from_above = table[(SHAPE.to_state((2, 11)), CliffWalkingAction::Down)][0];
        let staying = table[(SHAPE.to_state((3, 11)), CliffWalkingAction::Right)][0];
        assert!(from_left.terminal && from_above.terminal && staying.terminal);
        assert_eq!(from_left.next_state, 47);
    }

    #[test]
    fn edge_moves_stay_in_place() {
        let (table, _) = table_with(&[]);
        for col in 0..SHAPE.ncol {
            let state = SHAPE.to_state((0, col));
            assert_eq!(table[(state, CliffWalkingAction::Up)][0].next_state, state);
        }
        for row in 0..SHAPE.nrow {
            let left = SHAPE.to_state((row, 0));
            let right = SHAPE.to_state((row, 11));
            assert_eq!(table[(left, CliffWalkingAction::Left)][0].next_state, left);
            assert_eq!(table[(right, CliffWalkingAction::Right)][0].next_state, right);
        }
    }

    #[test]
    fn execution_probabilities_sum_to_one() {
        let (table, _) = table_with(&[(0, 3), (2, 7)]);
        for state in 0..table.n_states() {
            for action in CliffWalkingAction::ALL {
                let total: f64 = table.execution_probabilities(state, action).iter().sum();
                assert!((total - 1.0).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn sampling_a_single_outcome_is_deterministic() {
        let (table, _) = table_with(&[]);
        for random in [0.0, 0.5, 0.99] {
            let t = table.sample(0, CliffWalkingAction::Down, random);
            assert_eq!(t.next_state, 12);
        }
    }

    #[test]
    fn rewards_are_rewritable() {
        let (mut table, _) = table_with(&[]);
        table.for_each_reward_mut(5, |r| *r = 1.5);
        for action in CliffWalkingAction::ALL {
            assert_eq!(table[(5, action)][0].reward, 1.5);
            assert_eq!(table[(6, action)][0].reward, STEP_REWARD);
        }
    }
}
