//! Integration tests for u-floorplan-planner.

use u_floorplan_planner::{
    BlockSpec, Config, Error, Floorplanner, LocationPreference, SolveResult, Solver, Strategy,
};

fn assert_no_overlaps(result: &SolveResult) {
    let rects: Vec<_> = result.placements.iter().map(|p| p.rect()).collect();
    for (i, a) in rects.iter().enumerate() {
        for (j, b) in rects.iter().enumerate().skip(i + 1) {
            assert!(
                !a.intersects(b),
                "{} overlaps {}",
                result.placements[i].name,
                result.placements[j].name
            );
        }
    }
}

fn assert_abut(result: &SolveResult, a: &str, b: &str) {
    let ra = result.placement(a).unwrap().rect();
    let rb = result.placement(b).unwrap().rect();
    assert!(ra.abuts(&rb), "{} does not abut {}", a, b);
}

/// Seeds swept by the scenarios that must hold on every run.
const SEEDS: [u64; 10] = [1, 7, 42, 99, 123, 2024, 4242, 9001, 31337, 65535];

fn seeded(iterations: u64) -> Floorplanner {
    with_seed(iterations, 2024)
}

fn with_seed(iterations: u64, seed: u64) -> Floorplanner {
    Floorplanner::new(Config::new().with_max_iterations(iterations).with_seed(seed))
}

fn four_blocks() -> Vec<BlockSpec> {
    vec![
        BlockSpec::new("A", 40.0, 30.0),
        BlockSpec::new("B", 30.0, 20.0),
        BlockSpec::new("C", 50.0, 25.0),
        BlockSpec::new("D", 20.0, 20.0),
    ]
}

mod constraint_tests {
    use super::*;

    #[test]
    fn test_processor_memory_layout() {
        let blocks = vec![
            BlockSpec::new("Processor", 100.0, 80.0)
                .with_location(LocationPreference::TopLeftCorner),
            BlockSpec::new("Memory", 60.0, 100.0).with_neighbor("Processor"),
        ];
        for seed in SEEDS {
            let result = with_seed(2_000, seed).solve(&blocks).unwrap();

            assert_no_overlaps(&result);
            assert_eq!(result.location_violations, 0, "seed {}", seed);
            assert_eq!(result.neighbor_violations, 0, "seed {}", seed);
            assert_abut(&result, "Processor", "Memory");

            let cpu = result.placement("Processor").unwrap();
            assert!(cpu.x.abs() < 1e-6 && cpu.y.abs() < 1e-6);
            assert!(result.area >= 14_000.0);
        }
    }

    #[test]
    fn test_independent_pairs() {
        let blocks = vec![
            BlockSpec::new("A", 40.0, 30.0),
            BlockSpec::new("B", 20.0, 30.0).with_neighbor("A"),
            BlockSpec::new("C", 35.0, 25.0),
            BlockSpec::new("D", 35.0, 15.0).with_neighbor("C"),
        ];
        for seed in SEEDS {
            let result = with_seed(1_500, seed).solve(&blocks).unwrap();

            assert_no_overlaps(&result);
            assert_eq!(result.neighbor_violations, 0, "seed {}", seed);
            assert_abut(&result, "A", "B");
            assert_abut(&result, "C", "D");
        }
    }

    #[test]
    fn test_pairs_with_location_constraints() {
        let blocks = vec![
            BlockSpec::new("A", 60.0, 50.0).with_location(LocationPreference::TopLeftCorner),
            BlockSpec::new("B", 40.0, 50.0).with_neighbor("A"),
            BlockSpec::new("C", 30.0, 30.0).with_location(LocationPreference::BottomRightCorner),
            BlockSpec::new("D", 20.0, 30.0).with_neighbor("C"),
        ];
        for seed in SEEDS {
            let result = with_seed(1_500, seed).solve(&blocks).unwrap();

            assert_no_overlaps(&result);
            assert!(result.is_feasible(), "seed {}", seed);
            assert_abut(&result, "A", "B");
            assert_abut(&result, "C", "D");

            let c = result.placement("C").unwrap().rect();
            assert!((c.max_x - result.bounding_width).abs() < 1e-6);
            assert!((c.max_y - result.bounding_height).abs() < 1e-6);
        }
    }

    #[test]
    fn test_every_location_preference() {
        for pref in LocationPreference::ALL {
            let blocks = vec![
                BlockSpec::new("P", 20.0, 20.0).with_location(pref),
                BlockSpec::new("X", 40.0, 40.0),
                BlockSpec::new("Y", 40.0, 40.0),
                BlockSpec::new("Z", 40.0, 40.0),
            ];
            for seed in &SEEDS[..5] {
                let result = with_seed(500, *seed).solve(&blocks).unwrap();

                assert_no_overlaps(&result);
                assert_eq!(
                    result.location_violations, 0,
                    "preference {} not met with seed {}",
                    pref, seed
                );
            }
        }
    }

    #[test]
    fn test_tiny_blocks_do_not_overlap() {
        for scale in [1e-6, 1e-5, 1.0] {
            let blocks = vec![
                BlockSpec::new("Processor", 100.0 * scale, 80.0 * scale)
                    .with_location(LocationPreference::TopLeftCorner),
                BlockSpec::new("Memory", 60.0 * scale, 100.0 * scale).with_neighbor("Processor"),
                BlockSpec::new("Cache", 40.0 * scale, 40.0 * scale)
                    .with_location(LocationPreference::BottomRightCorner),
            ];
            let result = with_seed(1_000, 1).solve(&blocks).unwrap();

            // Any overlap above a thousandth of the block scale is a real one.
            for (i, a) in result.placements.iter().enumerate() {
                for b in &result.placements[i + 1..] {
                    let (ra, rb) = (a.rect(), b.rect());
                    let ox = ra.max_x.min(rb.max_x) - ra.min_x.max(rb.min_x);
                    let oy = ra.max_y.min(rb.max_y) - ra.min_y.max(rb.min_y);
                    assert!(
                        ox <= 1e-3 * scale || oy <= 1e-3 * scale,
                        "{} overlaps {} at scale {}",
                        a.name,
                        b.name,
                        scale
                    );
                }
            }
            assert_no_overlaps(&result);
            assert!(result.is_feasible(), "scale {}", scale);
            assert_abut(&result, "Processor", "Memory");
            assert!(result.area >= 15_600.0 * scale * scale * (1.0 - 1e-9));
        }
    }

    #[test]
    fn test_chain_degrades_gracefully() {
        let blocks = vec![
            BlockSpec::new("A", 50.0, 40.0).with_location(LocationPreference::TopLeftCorner),
            BlockSpec::new("B", 30.0, 30.0).with_neighbor("A"),
            BlockSpec::new("C", 20.0, 40.0)
                .with_neighbor("B")
                .with_location(LocationPreference::Center),
            BlockSpec::new("D", 25.0, 25.0)
                .with_neighbor("C")
                .with_location(LocationPreference::BottomRightCorner),
            BlockSpec::new("E", 40.0, 20.0),
        ];
        let result = seeded(1_500).solve(&blocks).unwrap();

        assert_eq!(result.placements.len(), 5);
        assert_no_overlaps(&result);
        assert!(result.neighbor_violations <= 3);
        assert!(result.location_violations <= 3);
    }

    #[test]
    fn test_cycle_rejected_before_placement() {
        let blocks = vec![
            BlockSpec::new("A", 10.0, 10.0).with_neighbor("C"),
            BlockSpec::new("B", 10.0, 10.0).with_neighbor("A"),
            BlockSpec::new("C", 10.0, 10.0).with_neighbor("B"),
        ];
        match seeded(100).solve(&blocks) {
            Err(Error::CyclicNeighborDependency(path)) => {
                assert_eq!(path.first(), path.last());
                assert_eq!(path.len(), 4);
            }
            other => panic!("expected a cycle error, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_dimension() {
        let blocks = vec![BlockSpec::new("A", 10.0, -1.0)];
        assert!(matches!(
            seeded(100).solve(&blocks),
            Err(Error::InvalidDimension { .. })
        ));
    }
}

mod optimization_tests {
    use super::*;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_aspect_ratio_bound() {
        let result = seeded(3_000).solve(&four_blocks()).unwrap();
        assert_no_overlaps(&result);
        assert!(result.aspect_ratio <= 2.0 + 1e-9);
        assert!(result.area >= 3_600.0 - 1e-9);
    }

    #[test]
    fn test_progressive_never_grows_area() {
        let mut blocks = four_blocks();
        blocks.push(BlockSpec::new("E", 15.0, 20.0).with_neighbor("A"));
        let planner = seeded(2_000);

        let first = planner.solve(&blocks).unwrap();
        let second = planner.refine(&blocks, &first).unwrap();

        assert!(first.is_feasible());
        assert!(second.best_cost <= first.best_cost + 1e-9);
        assert!(second.area <= first.area + 1e-9);
        assert_no_overlaps(&second);
    }

    #[test]
    fn test_best_cost_history_is_monotone() {
        let result = seeded(4_000).solve(&four_blocks()).unwrap();
        assert!(!result.cost_history.is_empty());
        for pair in result.cost_history.windows(2) {
            assert!(pair[1] <= pair[0]);
        }
    }

    #[test]
    fn test_same_seed_same_layout() {
        let first = seeded(1_000).solve(&four_blocks()).unwrap();
        let second = seeded(1_000).solve(&four_blocks()).unwrap();
        assert_eq!(first.placements, second.placements);
    }

    #[test]
    fn test_compaction_is_idempotent() {
        let blocks = vec![
            BlockSpec::new("A", 40.0, 30.0).with_location(LocationPreference::TopRightCorner),
            BlockSpec::new("B", 25.0, 35.0).with_neighbor("A"),
            BlockSpec::new("C", 30.0, 30.0),
            BlockSpec::new("D", 10.0, 45.0),
        ];
        let first = seeded(1_000).solve(&blocks).unwrap();

        let greedy = Floorplanner::new(Config::new().with_strategy(Strategy::Greedy));
        let again = greedy.refine(&blocks, &first).unwrap();
        assert_eq!(again.placements, first.placements);
    }

    #[test]
    fn test_greedy_strategy() {
        let greedy = Floorplanner::new(Config::new().with_strategy(Strategy::Greedy));
        let result = greedy.solve(&four_blocks()).unwrap();

        assert_eq!(result.iterations, 0);
        assert_eq!(result.placements.len(), 4);
        assert_no_overlaps(&result);
        assert_eq!(result.strategy.as_deref(), Some("greedy"));
    }

    #[test]
    fn test_time_limit_stops_early() {
        let planner = Floorplanner::new(
            Config::new()
                .with_max_iterations(5_000_000)
                .with_time_limit(5)
                .with_seed(1),
        );
        let result = planner.solve(&four_blocks()).unwrap();
        assert!(result.iterations < 5_000_000);
        assert!(!result.cancelled);
        assert_no_overlaps(&result);
    }

    #[test]
    fn test_cancel_from_another_thread() {
        let planner = Floorplanner::new(Config::new().with_max_iterations(5_000_000).with_seed(1));
        let handle = planner.cancel_handle();

        let canceller = thread::spawn(move || {
            thread::sleep(Duration::from_millis(20));
            handle.store(true, std::sync::atomic::Ordering::Relaxed);
        });
        let result = planner.solve(&four_blocks()).unwrap();
        canceller.join().unwrap();

        assert!(result.cancelled);
        assert!(result.iterations < 5_000_000);
        assert_no_overlaps(&result);
    }
}
