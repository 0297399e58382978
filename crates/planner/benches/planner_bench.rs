//! Benchmarks for floorplanning.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use u_floorplan_core::solver::Solver;
use u_floorplan_planner::{BlockSpec, Config, Floorplanner, LocationPreference, Strategy};

fn soc_blocks() -> Vec<BlockSpec> {
    let mut blocks = vec![
        BlockSpec::new("cpu", 100.0, 80.0).with_location(LocationPreference::TopLeftCorner),
        BlockSpec::new("l2", 60.0, 80.0).with_neighbor("cpu"),
        BlockSpec::new("gpu", 90.0, 90.0).with_location(LocationPreference::BottomRightCorner),
        BlockSpec::new("dram_ctl", 40.0, 70.0).with_neighbor("gpu"),
        BlockSpec::new("pll", 20.0, 20.0).with_location(LocationPreference::Center),
    ];
    blocks.extend((0..7).map(|i| {
        BlockSpec::new(
            format!("io{}", i),
            20.0 + 5.0 * i as f64,
            30.0 + 3.0 * (7 - i) as f64,
        )
    }));
    blocks
}

fn planner_benchmark(c: &mut Criterion) {
    let blocks = soc_blocks();

    let greedy = Floorplanner::new(Config::new().with_strategy(Strategy::Greedy));
    c.bench_function("greedy_12_blocks", |b| {
        b.iter(|| black_box(greedy.solve(black_box(&blocks))))
    });

    let annealing = Floorplanner::new(Config::new().with_max_iterations(2_000).with_seed(1));
    c.bench_function("anneal_12_blocks_2k_iterations", |b| {
        b.iter(|| black_box(annealing.solve(black_box(&blocks))))
    });
}

criterion_group!(benches, planner_benchmark);
criterion_main!(benches);
