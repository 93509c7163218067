use std::time::Instant;

use cliff_walking_mdp::env::{CliffWalkingConfig, CliffWalkingEnv, DiscreteEnv, HazardLayout};
use cliff_walking_mdp::{solve_env, Solution};

extern crate structopt;

use kdam::tqdm;
use structopt::StructOpt;

/// Build a hazard grid, solve it with policy iteration and follow the resulting policy
#[derive(StructOpt, Debug)]
#[structopt(name = "RLRust - CliffWalking - policy iteration")]
struct Cli {
    /// Show example of episode
    #[structopt(long = "show_example")]
    show_example: bool,

    /// Number of grid rows
    #[structopt(long = "rows", default_value = "4")]
    rows: usize,

    /// Number of grid columns
    #[structopt(long = "cols", default_value = "12")]
    cols: usize,

    /// Number of randomly placed hazards
    #[structopt(long = "num_cliffs", default_value = "10")]
    num_cliffs: usize,

    /// Use the fixed bottom-row cliff instead of random hazards
    #[structopt(long = "classic")]
    classic: bool,

    /// Give up hazard placement after this many draws (retries forever if omitted)
    #[structopt(long = "max_attempts")]
    max_attempts: Option<usize>,

    /// Disable the hard mode action substitution
    #[structopt(long = "easy")]
    easy: bool,

    /// Seed for hazard placement and action sampling
    #[structopt(long = "seed", default_value = "42")]
    seed: u64,

    /// Discont factor used by the value sweeps
    #[structopt(long = "discount_factor", default_value = "0.99")]
    discount_factor: f64,

    /// Stop once the policy changes less than this between iterations
    #[structopt(long = "threshold", default_value = "1e-4")]
    threshold: f64,

    /// Number of episodes to run with the solved policy
    #[structopt(long = "n_episodes", short = "n", default_value = "1000")]
    n_episodes: u128,

    /// Maximum number of steps per episode
    #[structopt(long = "max_steps", default_value = "100")]
    max_steps: u128,
}

fn print_policy(env: &CliffWalkingEnv, solution: &Solution) {
    let shape = env.shape();
    for row in 0..shape.nrow {
        let line: String = (0..shape.ncol)
            .map(|col| {
                let state = shape.to_state((row, col));
                if env.is_hazard(state) {
                    '!'
                } else if (row, col) == env.goal() {
                    'G'
                } else {
                    solution.action(state).map_or('.', |a| a.arrow())
                }
            })
            .collect();
        println!("{}", line);
    }
}

fn print_values(env: &CliffWalkingEnv, solution: &Solution) {
    let shape = env.shape();
    for row in 0..shape.nrow {
        let line: Vec<String> = (0..shape.ncol)
            .map(|col| format!("{:>8.2}", solution.values[shape.to_state((row, col))]))
            .collect();
        println!("{}", line.join(""));
    }
}

fn example(env: &mut CliffWalkingEnv, solution: &Solution) {
    let mut epi_reward = 0.0;
    let mut state = env.reset();
    let mut steps: i32 = 0;
    loop {
        println!("{}", env.render());
        let Some(action) = solution.action(state) else {
            println!("no action available from state {}", state);
            break;
        };
        steps += 1;
        let (next_state, reward, terminated) = match env.step(action.index()) {
            Ok(step) => step,
            Err(e) => panic!("{}", e),
        };
        println!("{} -> step reward {:?}", action.label(), reward);
        state = next_state;
        epi_reward += reward;
        if terminated {
            println!("{}", env.render());
            println!("episode reward {:?}", epi_reward);
            println!("terminated with {:?} steps", steps);
            break;
        }
    }
}

fn main() {
    let cli: Cli = Cli::from_args();

    let layout: HazardLayout = if cli.classic {
        HazardLayout::Classic
    } else {
        HazardLayout::Random {
            count: cli.num_cliffs,
            max_attempts: cli.max_attempts,
        }
    };
    let bottom: usize = cli.rows.saturating_sub(1);
    let config = CliffWalkingConfig {
        nrow: cli.rows,
        ncol: cli.cols,
        start: (bottom, 0),
        goal: (bottom, cli.cols.saturating_sub(1)),
        layout,
        hard_mode: !cli.easy,
        max_steps: cli.max_steps,
        seed: cli.seed,
        ..CliffWalkingConfig::default()
    };

    let mut env: CliffWalkingEnv = match CliffWalkingEnv::new(config) {
        Ok(env) => env,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };
    println!("{}", env.render());

    let now: Instant = Instant::now();
    let solution: Solution = solve_env(&mut env, cli.discount_factor, cli.threshold);
    println!(
        "Policy iteration converged after {} iterations in {:.2?}",
        solution.iterations,
        now.elapsed()
    );

    println!("Optimal policy:");
    print_policy(&env, &solution);
    println!("Values:");
    print_values(&env, &solution);

    if cli.show_example {
        example(&mut env, &solution);
    }

    let mut arrivals: u128 = 0;
    let mut total_reward: f64 = 0.0;
    for _episode in tqdm!(0..cli.n_episodes) {
        let mut state: usize = env.reset();
        while let Some(action) = solution.action(state) {
            let (next_state, reward, terminated) = match env.step(action.index()) {
                Ok(step) => step,
                Err(e) => panic!("{}", e),
            };
            total_reward += reward;
            state = next_state;
            if terminated {
                if state == env.goal_state() {
                    arrivals += 1;
                }
                break;
            }
        }
    }
    println!(
        "Reached the goal in {} of {} episodes, mean reward {:.3}",
        arrivals,
        cli.n_episodes,
        total_reward / cli.n_episodes.max(1) as f64
    );
}
