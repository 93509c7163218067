use crate::env::{Cell, HazardSet, TransitionTable};
use crate::utils::euclidean_distance;

/// Rewrites every reward of a non-hazard state with minus its distance to the goal.
///
/// Hazard states keep whatever rewards they had. The rewrite depends only on
/// the source state, so moves into a hazard from a safe state lose their
/// penalty as well.
#[derive(Debug, Clone)]
pub struct RewardShaping {
    goal: Cell,
    hazards: HazardSet,
}

impl RewardShaping {
    pub fn new(goal: Cell, hazards: HazardSet) -> Self {
        Self { goal, hazards }
    }

    pub fn reward_for(&self, cell: Cell) -> f64 {
        -euclidean_distance(cell, self.goal)
    }

    pub fn apply(&self, mut table: TransitionTable) -> TransitionTable {
        let shape = table.shape();
        for state in 0..table.n_states() {
            if self.hazards.contains(&state) {
                continue;
            }
            let reward = self.reward_for(shape.to_cell(state));
            table.for_each_reward_mut(state, |r| *r = reward);
        }
        table
    }
}
