//! Solver traits and configuration.

use crate::result::SolveResult;
use crate::sa::{MAX_COOLING_RATE, MIN_COOLING_RATE};
use crate::{Error, Result};
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Optimization strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Strategy {
    /// Greedy initial placement followed by compaction (fast, lower quality).
    Greedy,
    /// Simulated Annealing over the greedy layout.
    #[default]
    SimulatedAnnealing,
}

impl Strategy {
    /// Returns a short, stable name for reporting.
    pub fn name(&self) -> &'static str {
        match self {
            Strategy::Greedy => "greedy",
            Strategy::SimulatedAnnealing => "simulated-annealing",
        }
    }
}

impl FromStr for Strategy {
    type Err = Error;

    /// Parses `greedy`, `sa` or `simulated-annealing`, ignoring case and separators.
    fn from_str(s: &str) -> Result<Self> {
        let key: String = s
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .flat_map(char::to_lowercase)
            .collect();
        match key.as_str() {
            "greedy" | "blf" => Ok(Strategy::Greedy),
            "sa" | "simulatedannealing" | "annealing" => Ok(Strategy::SimulatedAnnealing),
            _ => Err(Error::ConfigError(format!("unknown strategy '{}'", s))),
        }
    }
}

/// Common configuration for solvers.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Config {
    /// Optimization strategy.
    pub strategy: Strategy,

    /// Largest allowed `max(W, H) / min(W, H)` of the bounding box before a penalty applies.
    ///
    /// Any positive value is accepted. A bound below 1 can never be met, so every
    /// layout then pays the aspect penalty.
    pub max_aspect_ratio: f64,

    /// Total annealing iterations (None = derived from the block count).
    pub max_iterations: Option<u64>,

    /// Maximum computation time in milliseconds (0 = unlimited).
    pub time_limit_ms: u64,

    /// Random seed. Runs with the same seed and input produce the same layout.
    pub seed: Option<u64>,

    /// Starting temperature (None = derived from the total block area).
    pub initial_temp: Option<f64>,

    /// Geometric cooling factor applied every iteration,
    /// between [`MIN_COOLING_RATE`] and [`MAX_COOLING_RATE`].
    pub cooling_rate: f64,

    /// Run the compaction pass after optimization.
    pub compaction: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            strategy: Strategy::default(),
            max_aspect_ratio: 2.0,
            max_iterations: None,
            time_limit_ms: 0,
            seed: None,
            initial_temp: None,
            cooling_rate: 0.995,
            compaction: true,
        }
    }
}

impl Config {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the optimization strategy.
    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Sets the maximum aspect ratio.
    pub fn with_max_aspect_ratio(mut self, ratio: f64) -> Self {
        self.max_aspect_ratio = ratio;
        self
    }

    /// Sets the annealing iteration budget.
    pub fn with_max_iterations(mut self, iterations: u64) -> Self {
        self.max_iterations = Some(iterations);
        self
    }

    /// Sets the time limit in milliseconds.
    pub fn with_time_limit(mut self, ms: u64) -> Self {
        self.time_limit_ms = ms;
        self
    }

    /// Sets the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Overrides the starting temperature.
    pub fn with_initial_temp(mut self, temp: f64) -> Self {
        self.initial_temp = Some(temp);
        self
    }

    /// Sets the cooling rate.
    pub fn with_cooling_rate(mut self, rate: f64) -> Self {
        self.cooling_rate = rate;
        self
    }

    /// Enables or disables the compaction pass.
    pub fn with_compaction(mut self, enabled: bool) -> Self {
        self.compaction = enabled;
        self
    }

    /// Checks the configuration for values no solver can work with.
    pub fn validate(&self) -> Result<()> {
        if !self.max_aspect_ratio.is_finite() || self.max_aspect_ratio <= 0.0 {
            return Err(Error::ConfigError(format!(
                "max_aspect_ratio must be positive and finite, got {}",
                self.max_aspect_ratio
            )));
        }
        if !(MIN_COOLING_RATE..=MAX_COOLING_RATE).contains(&self.cooling_rate) {
            return Err(Error::ConfigError(format!(
                "cooling_rate must lie in [{}, {}], got {}",
                MIN_COOLING_RATE, MAX_COOLING_RATE, self.cooling_rate
            )));
        }
        if let Some(temp) = self.initial_temp {
            if !temp.is_finite() || temp <= 0.0 {
                return Err(Error::ConfigError(format!(
                    "initial_temp must be positive and finite, got {}",
                    temp
                )));
            }
        }
        Ok(())
    }
}

/// Progress callback for long-running operations.
pub type ProgressCallback = Box<dyn Fn(ProgressInfo) + Send + Sync>;

/// Progress information during solving.
#[derive(Debug, Clone)]
pub struct ProgressInfo {
    /// Iterations completed so far.
    pub iteration: u64,
    /// Iteration budget of the run.
    pub max_iterations: u64,
    /// Current temperature.
    pub temperature: f64,
    /// Best cost found so far.
    pub best_cost: f64,
    /// Cost of the current solution.
    pub current_cost: f64,
    /// Elapsed time in milliseconds.
    pub elapsed_ms: u64,
    /// Whether the solver is still running.
    pub running: bool,
}

/// Trait for layout solvers.
pub trait Solver {
    /// The input item type this solver handles.
    type Item;

    /// Solves the layout problem from scratch.
    fn solve(&self, items: &[Self::Item]) -> Result<SolveResult>;

    /// Continues optimizing from a previous result instead of a fresh layout.
    fn refine(&self, items: &[Self::Item], previous: &SolveResult) -> Result<SolveResult>;

    /// Solves with a progress callback.
    fn solve_with_progress(
        &self,
        items: &[Self::Item],
        callback: ProgressCallback,
    ) -> Result<SolveResult>;

    /// Cancels an ongoing solve operation.
    fn cancel(&self);
}
