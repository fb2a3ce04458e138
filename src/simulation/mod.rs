//! PhysicsWorld - orchestration of store, detector and solver
//!
//! The world owns the store and calls the solver once per fixed step. It
//! does no physics itself: every method delegates to one of the submodules
//! below, and the `#[wasm_bindgen]` facade in turn delegates to the world.

use crate::core::{ConfigResult, StoreResult, Vector};
use crate::domain::{Body, Position};
use crate::ecs::{Entity, Store};
use crate::systems::collision::{Detector, DetectorConfig, WorldBounds};
use crate::systems::solver::{self, CollisionEvent, Solver, SolverConfig, SolverPatch};

#[path = "perf/perf_stats.rs"]
mod perf_stats;
#[path = "step/step.rs"]
mod step;
#[path = "commands/commands.rs"]
mod commands;
#[path = "init/init.rs"]
mod init;
#[path = "init/settings.rs"]
mod settings;
mod facade;

pub use facade::World;
pub use perf_stats::PerfStats;

/// The simulation world
pub struct PhysicsWorld {
    store: Store,
    solver: Solver,
    detector: Detector,
    bounds: WorldBounds,

    // Contacts of the last step, in contact-table order
    events: Vec<CollisionEvent>,
    frame: u64,

    // Perf metrics
    perf_enabled: bool,
    perf_stats: PerfStats,
}

impl PhysicsWorld {
    /// Create a world spanning `[0, width] x [0, height]`
    pub fn new(width: f64, height: f64) -> Self {
        init::create_physics_world(width, height)
    }

    pub fn width(&self) -> f64 { self.bounds.width }

    pub fn height(&self) -> f64 { self.bounds.height }

    pub fn bounds(&self) -> WorldBounds { self.bounds }

    pub fn frame(&self) -> u64 { self.frame }

    pub fn store(&self) -> &Store { &self.store }

    /// Direct store access for scene setup. Do not hold across `step`.
    pub fn store_mut(&mut self) -> &mut Store { &mut self.store }

    pub fn solver(&self) -> &Solver { &self.solver }

    pub fn solver_config(&self) -> &SolverConfig { self.solver.config() }

    pub fn detector_config(&self) -> &DetectorConfig { self.detector.config() }

    /// Contacts found by the last step
    pub fn events(&self) -> &[CollisionEvent] { &self.events }

    pub fn collisions_json(&self) -> String {
        serde_json::to_string(&self.events).unwrap_or_else(|e| {
            log::error!("collision events failed to serialize: {e}");
            "[]".to_string()
        })
    }

    // === Settings ===

    pub fn configure(&mut self, patch: &SolverPatch) -> ConfigResult<()> {
        settings::configure(self, patch)
    }

    /// Merge a JSON solver patch such as `{"iterations": 8, "sleep": false}`
    pub fn configure_json(&mut self, json: &str) -> ConfigResult<()> {
        settings::configure_json(self, json)
    }

    pub fn configure_detector_json(&mut self, json: &str) -> ConfigResult<()> {
        settings::configure_detector_json(self, json)
    }

    pub fn set_gravity(&mut self, x: f64, y: f64) -> ConfigResult<()> {
        settings::set_gravity(self, x, y)
    }

    pub fn set_bounds(&mut self, width: f64, height: f64) {
        settings::set_bounds(self, width, height);
    }

    /// Enable or disable per-step perf metrics (adds timing overhead when enabled)
    pub fn enable_perf_metrics(&mut self, enabled: bool) {
        settings::enable_perf_metrics(self, enabled);
    }

    /// Get last step perf snapshot (zeros when perf disabled)
    pub fn get_perf_stats(&self) -> PerfStats {
        settings::get_perf_stats(self)
    }

    // === Entities ===

    pub fn spawn_json(&mut self, json: &str) -> StoreResult<Entity> {
        commands::spawn_json(self, json)
    }

    /// Spawn a sleep-capable circle; `inv_mass` 0 makes it immovable
    pub fn spawn_circle(&mut self, x: f64, y: f64, radius: f64, inv_mass: f64) -> StoreResult<Entity> {
        commands::spawn_circle(self, x, y, radius, inv_mass)
    }

    /// Spawn a sleep-capable box; `inv_mass` 0 makes it immovable
    pub fn spawn_box(
        &mut self,
        x: f64,
        y: f64,
        half_width: f64,
        half_height: f64,
        inv_mass: f64,
    ) -> StoreResult<Entity> {
        commands::spawn_box(self, x, y, half_width, half_height, inv_mass)
    }

    pub fn destroy(&mut self, id: Entity) -> bool {
        commands::destroy(self, id)
    }

    /// Accumulate a force for the next step, waking the body now
    pub fn apply_force(&mut self, id: Entity, force: Vector) -> bool {
        commands::apply_force(self, id, force)
    }

    /// Accumulate an impulse for the next step, waking the body now
    pub fn apply_impulse(&mut self, id: Entity, impulse: Vector) -> bool {
        commands::apply_impulse(self, id, impulse)
    }

    pub fn set_velocity(&mut self, id: Entity, vel: Vector) -> bool {
        commands::set_velocity(self, id, vel)
    }

    pub fn position(&self, id: Entity) -> Option<Vector> {
        self.store.get::<Position>(id).map(|p| p.0)
    }

    pub fn velocity(&self, id: Entity) -> Option<Vector> {
        self.store.get::<Body>(id).map(|b| b.vel)
    }

    pub fn is_sleeping(&self, id: Entity) -> bool {
        solver::is_sleeping(&self.store, id)
    }

    /// Swap in a different store. Contacts are dropped and the outgoing
    /// store's constraint impulses are zeroed before it is handed back.
    pub fn replace_store(&mut self, store: Store) -> Store {
        commands::replace_store(self, store)
    }

    /// Drop every entity and start over at frame 0
    pub fn reset(&mut self) {
        commands::reset(self);
    }

    /// Advance by `dt` seconds. Non-positive or non-finite `dt` is ignored.
    pub fn step(&mut self, dt: f64) {
        step::step(self, dt);
    }
}

#[cfg(test)]
#[path = "tests/tests.rs"]
mod tests;
