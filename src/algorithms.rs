mod policy_iteration;
mod reward_shaping;

pub use policy_iteration::{PolicyIteration, Solution};
pub use reward_shaping::RewardShaping;

use crate::env::CliffWalkingEnv;

/// Shapes the env's rewards in place, then solves the shaped table.
///
/// The env keeps the shaped rewards, so episodes stepped afterwards report them.
pub fn solve_env(env: &mut CliffWalkingEnv, discount_factor: f64, threshold: f64) -> Solution {
    let shaping = RewardShaping::new(env.goal(), env.hazards().clone());
    env.map_transitions(|table| shaping.apply(table));
    PolicyIteration::new(discount_factor, threshold).solve(env.transitions())
}
