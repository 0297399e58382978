//! Floorplanning solver.

use crate::block::{build_blocks, Block, BlockSpec};
use crate::compaction::compact;
use crate::constraint::{classify, Classification};
use crate::cost::CostModel;
use crate::floorplan::FloorPlan;
use crate::initial::initial_placement;
use crate::perturb::PerturbationConfig;
use crate::sa_floorplan::{run_sa_floorplan, sa_config_for, SaFloorplanProblem};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use u_floorplan_core::rect::EPSILON;
use u_floorplan_core::sa::SaSolution;
use u_floorplan_core::solver::{Config, ProgressCallback, ProgressInfo, Solver, Strategy};
use u_floorplan_core::{Error, Result, SolveResult};

/// Constrained rectangular block floorplanner.
pub struct Floorplanner {
    config: Config,
    perturbation: PerturbationConfig,
    cancelled: Arc<AtomicBool>,
}

/// What the optimization phase handed back.
struct Outcome {
    plan: FloorPlan,
    iterations: u64,
    history: Vec<f64>,
    cancelled: bool,
}

impl Floorplanner {
    /// Creates a new floorplanner with the given configuration.
    pub fn new(config: Config) -> Self {
        Self {
            config,
            perturbation: PerturbationConfig::default(),
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Creates a floorplanner with default configuration.
    pub fn default_config() -> Self {
        Self::new(Config::default())
    }

    /// Overrides the perturbation tuning.
    pub fn with_perturbation(mut self, perturbation: PerturbationConfig) -> Self {
        self.perturbation = perturbation;
        self
    }

    /// Returns the solver configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns a handle that cancels a running solve when set to true.
    pub fn cancel_handle(&self) -> Arc<AtomicBool> {
        self.cancelled.clone()
    }

    fn run(
        &self,
        specs: &[BlockSpec],
        previous: Option<&SolveResult>,
        progress: Option<ProgressCallback>,
    ) -> Result<SolveResult> {
        let start = Instant::now();
        self.config.validate()?;
        let blocks = build_blocks(specs)?;
        let classification = classify(&blocks)?;

        // Reset cancellation flag
        self.cancelled.store(false, Ordering::Relaxed);

        if self.config.max_aspect_ratio < 1.0 {
            log::warn!(
                "max_aspect_ratio {} is below 1 and cannot be met; every layout pays the aspect penalty",
                self.config.max_aspect_ratio
            );
        }
        let model = CostModel::new(self.config.max_aspect_ratio);
        let strategy = self.config.strategy;

        if blocks.is_empty() {
            let mut result = SolveResult::new().with_strategy(strategy.name());
            result.aspect_ratio = 1.0;
            result.computation_time_ms = start.elapsed().as_millis() as u64;
            return Ok(result);
        }

        let plan = match previous {
            Some(prev) => resume_plan(blocks, prev)?,
            None => initial_placement(blocks, &classification, &model),
        };
        log::debug!(
            "Starting {} from {} layout: cost={:.2}, violations={}",
            strategy.name(),
            if previous.is_some() { "resumed" } else { "greedy" },
            model.cost(&plan),
            plan.violations()
        );

        let progress = progress.map(Arc::new);
        let mut outcome = match strategy {
            Strategy::Greedy => Outcome {
                plan,
                iterations: 0,
                history: Vec::new(),
                cancelled: false,
            },
            Strategy::SimulatedAnnealing => {
                self.anneal(plan, &classification, model, progress.clone())
            }
        };

        if self.config.compaction {
            let slides = compact(&mut outcome.plan, &classification, &model);
            log::debug!("Compaction performed {} slides", slides);
        }
        outcome.plan.normalize();

        let result = build_result(&outcome, &model, strategy, start);
        log::info!(
            "Floorplan ({}): {} blocks, area={:.2}, aspect={:.3}, violations={}+{}, {} iterations in {}ms",
            strategy.name(),
            result.placements.len(),
            result.area,
            result.aspect_ratio,
            result.location_violations,
            result.neighbor_violations,
            result.iterations,
            result.computation_time_ms
        );

        if let Some(callback) = progress {
            (*callback)(ProgressInfo {
                iteration: result.iterations,
                max_iterations: result.iterations,
                temperature: 0.0,
                best_cost: result.best_cost,
                current_cost: result.best_cost,
                elapsed_ms: result.computation_time_ms,
                running: false,
            });
        }

        Ok(result)
    }

    fn anneal(
        &self,
        plan: FloorPlan,
        classification: &Classification,
        model: CostModel,
        progress: Option<Arc<ProgressCallback>>,
    ) -> Outcome {
        let sa_config = sa_config_for(&self.config, plan.len(), plan.block_area());
        let budget = sa_config.max_iterations;

        let mut problem = SaFloorplanProblem::new(
            plan,
            classification.clone(),
            model,
            self.perturbation.clone(),
            budget,
        );
        if let Some(callback) = progress {
            problem = problem.with_progress(Box::new(move |info: ProgressInfo| (*callback)(info)));
        }

        let mut rng = match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let result = run_sa_floorplan(problem, sa_config, self.cancelled.clone(), &mut rng);
        log::debug!(
            "SA finished: {} iterations, {} accepted, best_cost={:.2}, final_temp={:.4}",
            result.iterations,
            result.accepted,
            result.best.cost(),
            result.final_temperature
        );

        Outcome {
            plan: result.best,
            iterations: result.iterations,
            history: result.history,
            cancelled: result.cancelled,
        }
    }
}

/// Copies a previous layout onto freshly validated blocks.
fn resume_plan(blocks: Vec<Block>, previous: &SolveResult) -> Result<FloorPlan> {
    if previous.placements.len() != blocks.len() {
        return Err(Error::InvalidResume(format!(
            "expected {} placements, found {}",
            blocks.len(),
            previous.placements.len()
        )));
    }

    let by_name: HashMap<&str, usize> = previous
        .placements
        .iter()
        .enumerate()
        .map(|(i, p)| (p.name.as_str(), i))
        .collect();

    let mut plan = FloorPlan::new(blocks);
    for i in 0..plan.len() {
        let block = plan.block(i);
        let placed = by_name
            .get(block.name.as_str())
            .map(|&p| &previous.placements[p])
            .ok_or_else(|| {
                Error::InvalidResume(format!("no placement for block '{}'", block.name))
            })?;

        let (w, h) = placed.original_size();
        let tol = EPSILON * block.width.max(block.height);
        if (w - block.width).abs() > tol || (h - block.height).abs() > tol {
            return Err(Error::InvalidResume(format!(
                "block '{}' is {}x{} but was placed as {}x{}",
                block.name, block.width, block.height, w, h
            )));
        }

        plan.set_rotated(i, placed.rotated);
        plan.place(i, placed.x, placed.y);
    }

    if plan.has_overlaps() {
        return Err(Error::InvalidResume(
            "placements overlap each other".to_string(),
        ));
    }

    plan.normalize();
    Ok(plan)
}

fn build_result(
    outcome: &Outcome,
    model: &CostModel,
    strategy: Strategy,
    start: Instant,
) -> SolveResult {
    let breakdown = model.evaluate(&outcome.plan);
    let (width, height) = outcome
        .plan
        .bounding_box()
        .map_or((0.0, 0.0), |bb| (bb.width(), bb.height()));

    let mut result = SolveResult::new().with_strategy(strategy.name());
    result.placements = outcome.plan.to_placements();
    result.bounding_width = width;
    result.bounding_height = height;
    result.area = breakdown.area;
    result.aspect_ratio = breakdown.aspect_ratio;
    result.location_violations = breakdown.location_violations;
    result.neighbor_violations = breakdown.neighbor_violations;
    result.iterations = outcome.iterations;
    result.best_cost = breakdown.total;
    result.cost_history = outcome.history.clone();
    result.cancelled = outcome.cancelled;
    result.computation_time_ms = start.elapsed().as_millis() as u64;
    result
}

impl Solver for Floorplanner {
    type Item = BlockSpec;

    fn solve(&self, items: &[Self::Item]) -> Result<SolveResult> {
        self.run(items, None, None)
    }

    fn refine(&self, items: &[Self::Item], previous: &SolveResult) -> Result<SolveResult> {
        self.run(items, Some(previous), None)
    }

    fn solve_with_progress(
        &self,
        items: &[Self::Item],
        callback: ProgressCallback,
    ) -> Result<SolveResult> {
        self.run(items, None, Some(callback))
    }

    fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }
}
