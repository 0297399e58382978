//! Simulated Annealing framework for cost minimization.

use rand::prelude::*;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Smallest temperature the builders accept.
const MIN_TEMPERATURE: f64 = 1e-12;

/// Smallest accepted geometric cooling factor.
pub const MIN_COOLING_RATE: f64 = 0.001;

/// Largest accepted geometric cooling factor.
pub const MAX_COOLING_RATE: f64 = 0.99999;

/// Configuration for Simulated Annealing.
///
/// The temperature cools geometrically (`T_new = T * cooling_rate`) after each
/// level and never drops below `final_temp`.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SaConfig {
    /// Initial temperature.
    pub initial_temp: f64,
    /// Final (minimum) temperature.
    pub final_temp: f64,
    /// Geometric cooling factor, between [`MIN_COOLING_RATE`] and [`MAX_COOLING_RATE`].
    pub cooling_rate: f64,
    /// Number of iterations at each temperature level.
    pub iterations_per_temp: usize,
    /// Total iteration budget. Once `final_temp` is reached the run keeps
    /// iterating at that temperature until the budget is spent.
    pub max_iterations: u64,
    /// Maximum time limit (None = unlimited).
    pub time_limit: Option<Duration>,
    /// Record the best cost every this many temperature levels.
    pub history_stride: usize,
}

impl Default for SaConfig {
    fn default() -> Self {
        Self {
            initial_temp: 1000.0,
            final_temp: 0.001,
            cooling_rate: 0.95,
            iterations_per_temp: 100,
            max_iterations: 100_000,
            time_limit: None,
            history_stride: 1,
        }
    }
}

impl SaConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the initial temperature.
    pub fn with_initial_temp(mut self, temp: f64) -> Self {
        self.initial_temp = temp.max(MIN_TEMPERATURE);
        self
    }

    /// Sets the final temperature.
    pub fn with_final_temp(mut self, temp: f64) -> Self {
        self.final_temp = temp.max(MIN_TEMPERATURE);
        self
    }

    /// Sets the cooling rate, clamped to the accepted range.
    pub fn with_cooling_rate(mut self, rate: f64) -> Self {
        self.cooling_rate = rate.clamp(MIN_COOLING_RATE, MAX_COOLING_RATE);
        self
    }

    /// Sets the iterations per temperature level.
    pub fn with_iterations_per_temp(mut self, iterations: usize) -> Self {
        self.iterations_per_temp = iterations.max(1);
        self
    }

    /// Sets the maximum iterations.
    pub fn with_max_iterations(mut self, iterations: u64) -> Self {
        self.max_iterations = iterations;
        self
    }

    /// Sets the time limit.
    pub fn with_time_limit(mut self, duration: Duration) -> Self {
        self.time_limit = Some(duration);
        self
    }

    /// Sets how many temperature levels pass between history samples.
    pub fn with_history_stride(mut self, stride: usize) -> Self {
        self.history_stride = stride.max(1);
        self
    }
}

/// Trait for solutions in Simulated Annealing.
pub trait SaSolution: Clone {
    /// Returns the cost of this solution. Lower values are better.
    fn cost(&self) -> f64;

    /// Sets the cost.
    fn set_cost(&mut self, value: f64);
}

/// Neighborhood operator types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum NeighborhoodOperator {
    /// Swap the positions of two elements.
    Swap,
    /// Relocate an element to a new position.
    Relocate,
    /// Rotate/change orientation of an element.
    Rotation,
    /// Rebuild the arrangement of several elements at once.
    Repack,
}

/// Trait for problem-specific SA operations.
pub trait SaProblem {
    /// The solution type for this problem.
    type Solution: SaSolution;

    /// Generates a neighbor solution using the specified operator.
    ///
    /// Returns `None` when no move is possible; the iteration then counts as rejected.
    fn neighbor<R: Rng>(
        &self,
        solution: &Self::Solution,
        operator: NeighborhoodOperator,
        rng: &mut R,
    ) -> Option<Self::Solution>;

    /// Evaluates the cost of a solution and stores it with [`SaSolution::set_cost`].
    fn evaluate(&self, solution: &mut Self::Solution);

    /// Returns available neighborhood operators for this problem.
    fn available_operators(&self) -> Vec<NeighborhoodOperator> {
        vec![
            NeighborhoodOperator::Relocate,
            NeighborhoodOperator::Rotation,
            NeighborhoodOperator::Swap,
        ]
    }

    /// Called after each temperature level (for progress reporting).
    fn on_temperature_change(
        &self,
        _temperature: f64,
        _iteration: u64,
        _best: &Self::Solution,
        _current: &Self::Solution,
    ) {
    }
}

/// Result of a SA run.
#[derive(Debug, Clone)]
pub struct SaResult<S: SaSolution> {
    /// The best solution found.
    pub best: S,
    /// Final temperature reached.
    pub final_temperature: f64,
    /// Total iterations performed.
    pub iterations: u64,
    /// Number of accepted moves.
    pub accepted: u64,
    /// Total elapsed time.
    pub elapsed: Duration,
    /// Whether the run was stopped through the cancel flag.
    pub cancelled: bool,
    /// Best-cost history (sampled at temperature changes, non-increasing).
    pub history: Vec<f64>,
}

/// Simulated Annealing runner.
pub struct SaRunner<P: SaProblem> {
    config: SaConfig,
    problem: P,
    cancelled: Arc<AtomicBool>,
}

impl<P: SaProblem> SaRunner<P> {
    /// Creates a new SA runner.
    pub fn new(config: SaConfig, problem: P) -> Self {
        Self {
            config,
            problem,
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Shares an externally owned cancel flag with this runner.
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancelled = flag;
        self
    }

    /// Returns a handle to cancel the algorithm.
    pub fn cancel_handle(&self) -> Arc<AtomicBool> {
        self.cancelled.clone()
    }

    /// Returns the problem being optimized.
    pub fn problem(&self) -> &P {
        &self.problem
    }

    /// Returns the runner configuration.
    pub fn config(&self) -> &SaConfig {
        &self.config
    }

    /// Runs the algorithm starting from a given solution.
    ///
    /// The temperature always restarts at `initial_temp`, so a previous best can
    /// be refined with a fresh annealing schedule.
    pub fn run_from<R: Rng>(&self, initial: P::Solution, rng: &mut R) -> SaResult<P::Solution> {
        let start = Instant::now();
        let mut history = Vec::new();

        let mut current = initial;
        self.problem.evaluate(&mut current);
        let mut best = current.clone();
        let mut best_cost = best.cost();

        let mut temperature = self.config.initial_temp;
        let mut iteration = 0u64;
        let mut accepted = 0u64;
        let mut level = 0usize;
        let mut cancelled = false;

        let operators = self.problem.available_operators();
        let max_iterations = self.config.max_iterations;

        loop {
            if self.cancelled.load(Ordering::Relaxed) {
                cancelled = true;
                break;
            }

            if let Some(limit) = self.config.time_limit {
                if start.elapsed() > limit {
                    break;
                }
            }

            if iteration >= max_iterations || operators.is_empty() {
                break;
            }

            for _ in 0..self.config.iterations_per_temp {
                iteration += 1;

                let operator = operators[rng.gen_range(0..operators.len())];

                if let Some(mut neighbor) = self.problem.neighbor(&current, operator, rng) {
                    self.problem.evaluate(&mut neighbor);

                    let delta = neighbor.cost() - current.cost();

                    // Metropolis criterion
                    let accept = if delta <= 0.0 {
                        true
                    } else {
                        let probability = (-delta / temperature).exp();
                        rng.gen::<f64>() < probability
                    };

                    if accept {
                        accepted += 1;
                        current = neighbor;

                        if current.cost() < best_cost {
                            best = current.clone();
                            best_cost = best.cost();
                        }
                    }
                }

                if iteration >= max_iterations {
                    break;
                }
            }

            level += 1;
            if level % self.config.history_stride == 0 {
                history.push(best_cost);
            }

            self.problem
                .on_temperature_change(temperature, iteration, &best, &current);

            temperature = (temperature * self.config.cooling_rate).max(self.config.final_temp);
        }

        history.push(best_cost);

        SaResult {
            best,
            final_temperature: temperature,
            iterations: iteration,
            accepted,
            elapsed: start.elapsed(),
            cancelled,
            history,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;

    /// Minimize |x - target| over integers in `0..=limit`.
    #[derive(Clone)]
    struct LineProblem {
        target: i64,
        limit: i64,
    }

    #[derive(Debug, Clone)]
    struct Point {
        x: i64,
        cost: f64,
    }

    impl SaSolution for Point {
        fn cost(&self) -> f64 {
            self.cost
        }

        fn set_cost(&mut self, value: f64) {
            self.cost = value;
        }
    }

    impl SaProblem for LineProblem {
        type Solution = Point;

        fn neighbor<R: Rng>(
            &self,
            solution: &Self::Solution,
            operator: NeighborhoodOperator,
            rng: &mut R,
        ) -> Option<Self::Solution> {
            let step = match operator {
                NeighborhoodOperator::Relocate => rng.gen_range(-5..=5),
                _ => rng.gen_range(-1..=1),
            };
            let x = (solution.x + step).clamp(0, self.limit);
            if x == solution.x {
                return None;
            }
            Some(Point {
                x,
                cost: f64::INFINITY,
            })
        }

        fn evaluate(&self, solution: &mut Self::Solution) {
            solution.set_cost((solution.x - self.target).abs() as f64);
        }
    }

    fn problem() -> LineProblem {
        LineProblem {
            target: 37,
            limit: 200,
        }
    }

    fn far_start() -> Point {
        Point {
            x: 200,
            cost: f64::INFINITY,
        }
    }

    #[test]
    fn test_sa_basic() {
        let config = SaConfig::default()
            .with_initial_temp(10.0)
            .with_final_temp(0.01)
            .with_cooling_rate(0.95)
            .with_iterations_per_temp(20)
            .with_max_iterations(5000);

        let runner = SaRunner::new(config, problem());
        let mut rng = StdRng::seed_from_u64(42);
        let result = runner.run_from(far_start(), &mut rng);

        assert!(result.best.cost() <= 2.0);
        assert_eq!(result.iterations, 5000);
        assert!(!result.cancelled);
    }

    #[test]
    fn test_history_is_non_increasing() {
        let config = SaConfig::default()
            .with_initial_temp(50.0)
            .with_iterations_per_temp(10)
            .with_max_iterations(2000);

        let runner = SaRunner::new(config, problem());
        let mut rng = StdRng::seed_from_u64(7);
        let result = runner.run_from(far_start(), &mut rng);

        assert!(!result.history.is_empty());
        for pair in result.history.windows(2) {
            assert!(pair[1] <= pair[0]);
        }
        assert_eq!(*result.history.last().unwrap(), result.best.cost());
    }

    #[test]
    fn test_temperature_floor_with_budget() {
        let config = SaConfig::default()
            .with_initial_temp(1.0)
            .with_final_temp(0.5)
            .with_cooling_rate(0.5)
            .with_iterations_per_temp(1)
            .with_max_iterations(100);

        let runner = SaRunner::new(config, problem());
        let result = runner.run_from(far_start(), &mut StdRng::seed_from_u64(1));

        assert_eq!(result.iterations, 100);
        assert_eq!(result.final_temperature, 0.5);
    }

    #[test]
    fn test_run_from_keeps_better_start() {
        let config = SaConfig::default().with_max_iterations(500);
        let runner = SaRunner::new(config, problem());

        let start = Point {
            x: 37,
            cost: f64::INFINITY,
        };
        let result = runner.run_from(start, &mut StdRng::seed_from_u64(3));

        assert_eq!(result.best.cost(), 0.0);
        assert_eq!(result.best.x, 37);
    }

    #[test]
    fn test_impossible_moves_are_rejected() {
        let stuck = LineProblem {
            target: 0,
            limit: 0,
        };
        let config = SaConfig::default()
            .with_iterations_per_temp(10)
            .with_max_iterations(300);
        let runner = SaRunner::new(config, stuck);

        let start = Point {
            x: 0,
            cost: f64::INFINITY,
        };
        let result = runner.run_from(start, &mut StdRng::seed_from_u64(8));

        assert_eq!(result.iterations, 300);
        assert_eq!(result.accepted, 0);
        assert_eq!(result.best.x, 0);
    }

    #[test]
    fn test_cooling_rate_is_clamped() {
        assert_eq!(SaConfig::new().with_cooling_rate(2.0).cooling_rate, MAX_COOLING_RATE);
        assert_eq!(SaConfig::new().with_cooling_rate(0.0).cooling_rate, MIN_COOLING_RATE);
        assert_eq!(SaConfig::new().with_cooling_rate(0.99995).cooling_rate, 0.99995);
    }

    #[test]
    fn test_cancel_before_start() {
        let runner = SaRunner::new(SaConfig::default(), problem());
        runner.cancel_handle().store(true, Ordering::Relaxed);

        let result = runner.run_from(far_start(), &mut StdRng::seed_from_u64(42));

        assert!(result.cancelled);
        assert_eq!(result.iterations, 0);
        assert_eq!(result.best.x, 200);
    }

    #[test]
    fn test_shared_cancel_flag() {
        let flag = Arc::new(AtomicBool::new(true));
        let runner = SaRunner::new(SaConfig::default(), problem()).with_cancel_flag(flag.clone());
        assert!(Arc::ptr_eq(&flag, &runner.cancel_handle()));
        assert!(runner.run_from(far_start(), &mut StdRng::seed_from_u64(0)).cancelled);
    }

    #[test]
    fn test_history_stride() {
        let config = SaConfig::default()
            .with_iterations_per_temp(1)
            .with_max_iterations(100)
            .with_history_stride(10);

        let runner = SaRunner::new(config, problem());
        let result = runner.run_from(far_start(), &mut StdRng::seed_from_u64(42));

        // 10 sampled levels plus the final entry
        assert_eq!(result.history.len(), 11);
    }
}
