use crate::core::PerfTimer;
use crate::domain::{Body, Constraint};

use super::PhysicsWorld;

pub(super) fn step(world: &mut PhysicsWorld, dt: f64) {
    let perf_on = world.perf_enabled;
    let step_start = if perf_on { Some(PerfTimer::start()) } else { None };

    let Some(timings) = world.solver.step(
        &mut world.store,
        &world.detector,
        world.bounds,
        &mut world.events,
        dt,
    ) else {
        return;
    };
    world.frame += 1;

    if let Some(t0) = step_start {
        let stats = &mut world.perf_stats;
        stats.reset();
        stats.step_ms = t0.elapsed_ms();
        stats.detect_ms = timings.detect_ms;
        stats.solve_ms = timings.solve_ms;
        stats.integrate_ms = timings.integrate_ms;
        stats.contact_count = world.events.len() as u32;
        stats.body_count = world.store.table::<Body>().len() as u32;
        stats.constraint_count = world.store.table::<Constraint>().len() as u32;
    }
}
