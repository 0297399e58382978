//! Simulated Annealing over floorplans.
//!
//! The annealer starts from a complete layout (greedy or resumed) and explores
//! it with four neighborhood operators:
//!
//! - **Relocate**: move a unit to the best or a random free candidate position
//! - **Rotation**: rotate up to three units; groups are transposed whole
//! - **Swap**: exchange the positions of two units
//! - **Repack**: shuffle the free units and pack them onto rows
//!
//! Temperatures scale with the total block area, so the same schedule works
//! for layouts measured in microns or in millimeters.

use crate::constraint::Classification;
use crate::cost::CostModel;
use crate::floorplan::FloorPlan;
use crate::perturb::{PerturbationConfig, Perturber};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::{Duration, Instant};
use u_floorplan_core::sa::{NeighborhoodOperator, SaConfig, SaProblem, SaResult, SaRunner, SaSolution};
use u_floorplan_core::solver::{Config, ProgressCallback, ProgressInfo};

/// Starting temperature as a fraction of the total block area.
pub const INITIAL_TEMP_SCALE: f64 = 0.25;

/// Floor temperature as a fraction of the total block area.
pub const FINAL_TEMP_SCALE: f64 = 1e-4;

/// Iterations granted regardless of block count.
pub const BASE_ITERATIONS: u64 = 2_000;

/// Additional iterations per block.
pub const ITERATIONS_PER_BLOCK: u64 = 500;

/// Upper bound on the derived iteration budget.
pub const MAX_AUTO_ITERATIONS: u64 = 30_000;

/// Default iteration budget for `block_count` blocks.
pub fn default_iterations(block_count: usize) -> u64 {
    (BASE_ITERATIONS + ITERATIONS_PER_BLOCK * block_count as u64).min(MAX_AUTO_ITERATIONS)
}

/// Builds the annealing schedule for a problem with the given total block area.
pub fn sa_config_for(config: &Config, block_count: usize, total_area: f64) -> SaConfig {
    let scale = if total_area > 0.0 { total_area } else { 1.0 };
    let initial_temp = config.initial_temp.unwrap_or(INITIAL_TEMP_SCALE * scale);
    let final_temp = (FINAL_TEMP_SCALE * scale).min(initial_temp);
    let budget = config
        .max_iterations
        .unwrap_or_else(|| default_iterations(block_count));

    let mut sa = SaConfig::default()
        .with_initial_temp(initial_temp)
        .with_final_temp(final_temp)
        .with_cooling_rate(config.cooling_rate)
        .with_iterations_per_temp(1)
        .with_max_iterations(budget)
        .with_history_stride((budget / 200).max(1) as usize);
    if config.time_limit_ms > 0 {
        sa = sa.with_time_limit(Duration::from_millis(config.time_limit_ms));
    }
    sa
}

/// SA problem definition for floorplanning.
pub struct SaFloorplanProblem {
    start: FloorPlan,
    classification: Classification,
    model: CostModel,
    perturbation: PerturbationConfig,
    max_iterations: u64,
    report_every: u64,
    progress: Option<ProgressCallback>,
    started: Instant,
}

impl SaFloorplanProblem {
    /// Creates a problem that anneals from `start`.
    pub fn new(
        start: FloorPlan,
        classification: Classification,
        model: CostModel,
        perturbation: PerturbationConfig,
        max_iterations: u64,
    ) -> Self {
        Self {
            start,
            classification,
            model,
            perturbation,
            max_iterations,
            report_every: (max_iterations / 20).max(1),
            progress: None,
            started: Instant::now(),
        }
    }

    /// Attaches a progress callback.
    pub fn with_progress(mut self, callback: ProgressCallback) -> Self {
        self.progress = Some(callback);
        self
    }

    /// The cost model used for evaluation.
    pub fn model(&self) -> &CostModel {
        &self.model
    }
}

impl SaProblem for SaFloorplanProblem {
    type Solution = FloorPlan;

    fn neighbor<R: rand::Rng>(
        &self,
        solution: &Self::Solution,
        operator: NeighborhoodOperator,
        rng: &mut R,
    ) -> Option<Self::Solution> {
        Perturber::new(&self.classification, &self.model, &self.perturbation)
            .perturb(solution, operator, rng)
    }

    fn evaluate(&self, solution: &mut Self::Solution) {
        let cost = self.model.cost(solution);
        solution.set_cost(cost);
    }

    fn available_operators(&self) -> Vec<NeighborhoodOperator> {
        vec![
            NeighborhoodOperator::Relocate,
            NeighborhoodOperator::Rotation,
            NeighborhoodOperator::Swap,
            NeighborhoodOperator::Repack,
        ]
    }

    fn on_temperature_change(
        &self,
        temperature: f64,
        iteration: u64,
        best: &Self::Solution,
        current: &Self::Solution,
    ) {
        if iteration % self.report_every != 0 {
            return;
        }

        log::debug!(
            "SA Floorplan Iteration {}: temp={:.4}, best_cost={:.2}, current_cost={:.2}",
            iteration,
            temperature,
            best.cost(),
            current.cost()
        );

        if let Some(callback) = &self.progress {
            callback(ProgressInfo {
                iteration,
                max_iterations: self.max_iterations,
                temperature,
                best_cost: best.cost(),
                current_cost: current.cost(),
                elapsed_ms: self.started.elapsed().as_millis() as u64,
                running: true,
            });
        }
    }
}

/// Runs SA-based floorplan optimization from `start`.
pub fn run_sa_floorplan<R: rand::Rng>(
    problem: SaFloorplanProblem,
    sa_config: SaConfig,
    cancelled: Arc<AtomicBool>,
    rng: &mut R,
) -> SaResult<FloorPlan> {
    let start = problem.start.clone();
    let runner = SaRunner::new(sa_config, problem).with_cancel_flag(cancelled);
    runner.run_from(start, rng)
}
