use crate::core::{ConfigResult, Vector};
use crate::systems::collision::{DetectorConfig, WorldBounds};
use crate::systems::solver::SolverPatch;

use super::perf_stats::PerfStats;
use super::PhysicsWorld;

pub(super) fn enable_perf_metrics(world: &mut PhysicsWorld, enabled: bool) {
    world.perf_enabled = enabled;
    if !enabled {
        world.perf_stats.reset();
    }
}

pub(super) fn get_perf_stats(world: &PhysicsWorld) -> PerfStats {
    world.perf_stats.clone()
}

pub(super) fn configure(world: &mut PhysicsWorld, patch: &SolverPatch) -> ConfigResult<()> {
    world.solver.configure(patch)
}

pub(super) fn configure_json(world: &mut PhysicsWorld, json: &str) -> ConfigResult<()> {
    let patch = SolverPatch::from_json(json).inspect_err(|e| log::warn!("solver config rejected: {e}"))?;
    configure(world, &patch)
}

pub(super) fn configure_detector_json(world: &mut PhysicsWorld, json: &str) -> ConfigResult<()> {
    let config =
        DetectorConfig::from_json(json).inspect_err(|e| log::warn!("detector config rejected: {e}"))?;
    log::debug!("detector configured: {config:?}");
    world.detector.configure(config);
    Ok(())
}

pub(super) fn set_gravity(world: &mut PhysicsWorld, x: f64, y: f64) -> ConfigResult<()> {
    let patch = SolverPatch { gravity: Some(Vector::new(x, y)), ..SolverPatch::default() };
    configure(world, &patch)
}

pub(super) fn set_bounds(world: &mut PhysicsWorld, width: f64, height: f64) {
    world.bounds = WorldBounds::new(width, height);
}
