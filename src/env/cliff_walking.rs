use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::env::{
    classic_layout, ActionSubstitution, Cell, CellSampler, CliffWalkingAction, DiscreteEnv,
    EnvError, GridShape, HazardPlacer, HazardSet, TransitionTable,
};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum HazardLayout {
    /// `count` cells drawn at random, keeping the goal reachable.
    /// `max_attempts: None` retries forever.
    Random {
        count: usize,
        max_attempts: Option<usize>,
    },
    Classic,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CliffWalkingConfig {
    pub nrow: usize,
    pub ncol: usize,
    pub start: Cell,
    pub goal: Cell,
    pub layout: HazardLayout,
    pub hard_mode: bool,
    pub substitution: ActionSubstitution,
    pub max_steps: u128,
    pub seed: u64,
}

impl Default for CliffWalkingConfig {
    fn default() -> Self {
        Self {
            nrow: 4,
            ncol: 12,
            start: (3, 0),
            goal: (3, 11),
            layout: HazardLayout::Random {
                count: 10,
                max_attempts: None,
            },
            hard_mode: true,
            substitution: ActionSubstitution::reference(),
            max_steps: 100,
            seed: 42,
        }
    }
}

impl CliffWalkingConfig {
    fn validate(&self) -> Result<GridShape, EnvError> {
        let shape = GridShape::new(self.nrow, self.ncol);
        if shape.n_states() == 0 {
            return Err(EnvError::InvalidConfig(format!(
                "grid {}x{} has no cells",
                self.nrow, self.ncol
            )));
        }
        for (name, cell) in [("start", self.start), ("goal", self.goal)] {
            if !shape.contains(cell) {
                return Err(EnvError::InvalidConfig(format!(
                    "{name} {cell:?} is outside the {}x{} grid",
                    self.nrow, self.ncol
                )));
            }
        }
        if self.layout == HazardLayout::Classic && self.nrow < 2 {
            return Err(EnvError::InvalidConfig(
                "classic layout needs at least two rows".to_string(),
            ));
        }
        Ok(shape)
    }

    fn place_hazards<S: CellSampler + ?Sized>(
        &self,
        shape: GridShape,
        sampler: &mut S,
    ) -> Result<HazardSet, EnvError> {
        match self.layout {
            HazardLayout::Random {
                count,
                max_attempts,
            } => HazardPlacer::new(shape, self.start, self.goal, count)
                .with_max_attempts(max_attempts)
                .place(sampler),
            HazardLayout::Classic => Ok(classic_layout(shape, self.start, self.goal)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CliffWalkingEnv {
    ready: bool,
    shape: GridShape,
    start: Cell,
    goal: Cell,
    hazards: HazardSet,
    transitions: TransitionTable,
    hard_mode: bool,
    substitution: ActionSubstitution,
    player_pos: usize,
    max_steps: u128,
    curr_step: u128,
    rng: StdRng,
}

impl CliffWalkingEnv {
    /// Builds the env, drawing hazards from the seeded RNG that later drives `step`.
    pub fn new(config: CliffWalkingConfig) -> Result<Self, EnvError> {
        let shape = config.validate()?;
        let mut rng = StdRng::seed_from_u64(config.seed);
        let hazards = config.place_hazards(shape, &mut rng)?;
        Ok(Self::assemble(config, shape, hazards, rng))
    }

    /// Builds the env with hazards drawn from `sampler`.
    pub fn with_sampler<S: CellSampler + ?Sized>(
        config: CliffWalkingConfig,
        sampler: &mut S,
    ) -> Result<Self, EnvError> {
        let shape = config.validate()?;
        let hazards = config.place_hazards(shape, sampler)?;
        let rng = StdRng::seed_from_u64(config.seed);
        Ok(Self::assemble(config, shape, hazards, rng))
    }

    fn assemble(
        config: CliffWalkingConfig,
        shape: GridShape,
        hazards: HazardSet,
        rng: StdRng,
    ) -> Self {
        let transitions = TransitionTable::build(shape, config.start, config.goal, &hazards);
        Self {
            ready: false,
            shape,
            start: config.start,
            goal: config.goal,
            hazards,
            transitions,
            hard_mode: config.hard_mode,
            substitution: config.substitution,
            player_pos: shape.to_state(config.start),
            max_steps: config.max_steps,
            curr_step: 0,
            rng,
        }
    }

    pub fn shape(&self) -> GridShape {
        self.shape
    }

    pub fn start(&self) -> Cell {
        self.start
    }

    pub fn goal(&self) -> Cell {
        self.goal
    }

    pub fn start_state(&self) -> usize {
        self.shape.to_state(self.start)
    }

    pub fn goal_state(&self) -> usize {
        self.shape.to_state(self.goal)
    }

    pub fn hazards(&self) -> &HazardSet {
        &self.hazards
    }

    pub fn is_hazard(&self, state: usize) -> bool {
        self.hazards.contains(&state)
    }

    pub fn transitions(&self) -> &TransitionTable {
        &self.transitions
    }

    /// Replaces the table with `f(table)`. Used for one-shot reward rewrites.
    pub fn map_transitions<F>(&mut self, f: F)
    where
        F: FnOnce(TransitionTable) -> TransitionTable,
    {
        let table = std::mem::take(&mut self.transitions);
        self.transitions = f(table);
    }

    pub fn is_hard_mode(&self) -> bool {
        self.hard_mode
    }

    pub fn player_pos(&self) -> usize {
        self.player_pos
    }
}

impl DiscreteEnv<usize> for CliffWalkingEnv {
    fn reset(&mut self) -> usize {
        self.player_pos = self.start_state();
        self.ready = true;
        self.curr_step = 0;
        self.player_pos
    }

    fn step(&mut self, action: usize) -> Result<(usize, f64, bool), EnvError> {
        let action = CliffWalkingAction::try_from(action)?;
        if !self.ready {
            return Err(EnvError::EnvNotReady);
        }
        if self.curr_step >= self.max_steps {
            self.ready = false;
            return Ok((self.player_pos, 0.0, true));
        }
        self.curr_step += 1;
        let executed = if self.hard_mode {
            self.substitution.substitute(action, self.rng.gen())
        } else {
            action
        };
        let random: f64 = self.rng.gen();
        let t = *self.transitions.sample(self.player_pos, executed, random);
        self.player_pos = t.next_state;
        if t.terminal {
            self.ready = false;
        }
        Ok((t.next_state, t.reward, t.terminal))
    }

    fn render(&self) -> String {
        let mut rows: Vec<String> = Vec::with_capacity(self.shape.nrow);
        for row in 0..self.shape.nrow {
            let line: String = (0..self.shape.ncol)
                .map(|col| {
                    let state = self.shape.to_state((row, col));
                    if state == self.player_pos {
                        '@'
                    } else if (row, col) == self.goal {
                        'G'
                    } else if (row, col) == self.start {
                        'S'
                    } else if self.is_hazard(state) {
                        '!'
                    } else {
                        '_'
                    }
                })
                .collect();
            rows.push(line);
        }
        rows.join("\n")
    }
}
