use crate::ecs::Store;
use crate::systems::collision::{Detector, DetectorConfig, WorldBounds};
use crate::systems::solver::{Solver, SolverConfig};

use super::perf_stats::PerfStats;
use super::PhysicsWorld;

pub(super) fn create_physics_world(width: f64, height: f64) -> PhysicsWorld {
    PhysicsWorld {
        store: Store::new(),
        solver: Solver::new(SolverConfig::default()),
        detector: Detector::new(DetectorConfig::default()),
        bounds: WorldBounds::new(width, height),
        events: Vec::with_capacity(64),
        frame: 0,
        perf_enabled: false,
        perf_stats: PerfStats::default(),
    }
}
