pub mod algorithms;
pub mod env;
pub mod utils;

pub use algorithms::{solve_env, PolicyIteration, RewardShaping, Solution};
pub use env::{
    CliffWalkingAction, CliffWalkingConfig, CliffWalkingEnv, DiscreteEnv, EnvError, HazardLayout,
};
