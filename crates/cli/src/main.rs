//! Floorplan CLI

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use u_floorplan_core::{SolveResult, SolveSummary, Strategy};
use u_floorplan_planner::block::build_blocks;
use u_floorplan_planner::constraint::classify;
use u_floorplan_planner::document::{result_from_json, result_to_json, FloorplanRequest};
use u_floorplan_planner::{Floorplanner, Solver};

#[derive(Parser)]
#[command(name = "floorplan")]
#[command(about = "Constrained rectangular block floorplanner")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Place the blocks of a JSON document
    Plan {
        /// Path to the JSON block document
        file: PathBuf,

        /// Maximum bounding-box aspect ratio
        #[arg(short, long)]
        aspect: Option<f64>,

        /// Annealing iteration budget
        #[arg(short, long)]
        iterations: Option<u64>,

        /// Random seed for reproducible layouts
        #[arg(short, long)]
        seed: Option<u64>,

        /// Time limit in milliseconds
        #[arg(short, long)]
        time_limit: Option<u64>,

        /// Optimization strategy
        #[arg(long, value_enum)]
        strategy: Option<StrategyArg>,

        /// Continue from a previously saved result (JSON)
        #[arg(short, long)]
        resume: Option<PathBuf>,

        /// Skip the compaction pass
        #[arg(long)]
        no_compaction: bool,

        /// Output file for the result (JSON)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Validate a JSON document and show its neighbor groups
    Check {
        /// Path to the JSON block document
        file: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum StrategyArg {
    /// Greedy placement and compaction only
    Greedy,
    /// Simulated Annealing
    Sa,
}

impl From<StrategyArg> for Strategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Greedy => Strategy::Greedy,
            StrategyArg::Sa => Strategy::SimulatedAnnealing,
        }
    }
}

fn read_request(path: &Path) -> anyhow::Result<FloorplanRequest> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let request = FloorplanRequest::from_json(&json)
        .with_context(|| format!("failed to parse {}", path.display()))?;
    Ok(request)
}

fn print_result(result: &SolveResult) {
    println!(
        "{:<20} {:>10} {:>10} {:>10} {:>10} {:>8}",
        "Block", "X", "Y", "Width", "Height", "Rotated"
    );
    println!("{:-<73}", "");
    for p in &result.placements {
        println!(
            "{:<20} {:>10.2} {:>10.2} {:>10.2} {:>10.2} {:>8}",
            p.name,
            p.x,
            p.y,
            p.width,
            p.height,
            if p.rotated { "yes" } else { "" }
        );
    }

    let summary = SolveSummary::from(result);
    println!();
    println!("Summary ({}):", summary.strategy);
    println!(
        "  Bounding box:        {:.2} x {:.2}",
        result.bounding_width, result.bounding_height
    );
    println!("  Area:                {:.2}", summary.area);
    println!("  Aspect ratio:        {:.3}", summary.aspect_ratio);
    println!("  Density:             {:.1}%", summary.density_percent);
    println!("  Location violations: {}", result.location_violations);
    println!("  Neighbor violations: {}", result.neighbor_violations);
    println!("  Iterations:          {}", result.iterations);
    println!("  Time:                {}ms", summary.time_ms);
    if result.cancelled {
        println!("  (cancelled before the iteration budget was used)");
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Plan {
            file,
            aspect,
            iterations,
            seed,
            time_limit,
            strategy,
            resume,
            no_compaction,
            output,
        } => {
            let request = read_request(&file)?;

            let mut config = request.to_config()?;
            if let Some(ratio) = aspect {
                config = config.with_max_aspect_ratio(ratio);
            }
            if let Some(n) = iterations {
                config = config.with_max_iterations(n);
            }
            if let Some(s) = seed {
                config = config.with_seed(s);
            }
            if let Some(ms) = time_limit {
                config = config.with_time_limit(ms);
            }
            if let Some(s) = strategy {
                config = config.with_strategy(s.into());
            }
            if no_compaction {
                config = config.with_compaction(false);
            }

            let planner = Floorplanner::new(config);
            let result = match resume {
                Some(path) => {
                    let json = std::fs::read_to_string(&path)
                        .with_context(|| format!("failed to read {}", path.display()))?;
                    let previous = result_from_json(&json)?;
                    println!("Resuming from: {}", path.display());
                    planner.refine(&request.blocks, &previous)?
                }
                None => planner.solve(&request.blocks)?,
            };

            print_result(&result);

            if let Some(path) = output {
                std::fs::write(&path, result_to_json(&result)?)
                    .with_context(|| format!("failed to write {}", path.display()))?;
                println!("\nResult saved to: {}", path.display());
            }
        }

        Commands::Check { file } => {
            let request = read_request(&file)?;
            let blocks = build_blocks(&request.blocks)?;
            let classification = classify(&blocks)?;

            println!("{} blocks are valid.", blocks.len());
            println!("\nNeighbor groups:");
            if classification.groups.is_empty() {
                println!("  (none)");
            }
            for (i, group) in classification.groups.iter().enumerate() {
                let names: Vec<&str> = group
                    .members
                    .iter()
                    .map(|&m| blocks[m].name.as_str())
                    .collect();
                println!(
                    "  #{:<3} anchor={:<16} members={}",
                    i + 1,
                    blocks[group.anchor].name,
                    names.join(", ")
                );
            }

            println!("\nSingletons:");
            for &s in &classification.singletons {
                println!("  - {} ({})", blocks[s].name, blocks[s].location);
            }
        }
    }

    Ok(())
}
