mod action;
mod cliff_walking;
mod grid;
mod hard_mode;
mod hazards;
mod transitions;

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EnvError {
    #[error("invalid action {0}, must be in [0, 1, 2, 3]")]
    InvalidAction(usize),

    #[error("environment not ready, call reset first")]
    EnvNotReady,

    #[error("placed {placed} of {requested} hazards before giving up after {attempts} attempts")]
    PlacementExhausted {
        placed: usize,
        requested: usize,
        attempts: usize,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

pub trait DiscreteEnv<T> {
    fn reset(&mut self) -> T;
    fn step(&mut self, action: usize) -> Result<(T, f64, bool), EnvError>;
    fn render(&self) -> String;
}

pub use action::CliffWalkingAction;
pub use cliff_walking::{CliffWalkingConfig, CliffWalkingEnv, HazardLayout};
pub use grid::{Cell, GridShape};
pub use hard_mode::{ActionSubstitution, SubstitutionRule};
pub use hazards::{classic_layout, is_reachable, CellSampler, HazardPlacer, HazardSet};
pub use transitions::{
    Transition, TransitionTable, HAZARD_REWARD, STEP_PROBABILITY, STEP_REWARD,
};
