//! Sequential-impulse solver
//!
//! One call to [`Solver::step`] runs the fixed phase order:
//!
//! 1. integrate forces and gravity
//! 2. springs
//! 3. drag and velocity clamps
//! 4. detection into the persistent contact table
//! 5. gravity cancel on resting contacts
//! 6. constraint refresh
//! 7. warm start
//! 8. restitution targets
//! 9. iterations: normal, friction, positional bias, constraint bias
//! 10. integrate positions
//! 11. sleep timers
//!
//! Sleeping and immovable bodies never receive velocity writes; every write
//! goes through `add_velocity`, which checks both.

mod config;
mod constraints;
mod contacts;
mod forces;
mod impulse;
mod integrate;
mod sleep;

use crate::core::{ConfigResult, PerfTimer, Vector};
use crate::domain::{Body, Constraint};
use crate::ecs::{ComponentKind, Entity, Store, StoreId};
use crate::systems::collision::{Detector, WorldBounds};

pub use config::{SolverConfig, SolverPatch};
pub use contacts::{CollisionEvent, Contact, ContactKey, ContactTable};
pub(crate) use sleep::{is_sleeping, wake};

/// Copy of `id`'s body; boundaries and bodiless colliders act as the
/// immovable default.
fn body_or_fixed(store: &Store, id: Option<Entity>) -> Body {
    id.and_then(|id| store.get::<Body>(id)).copied().unwrap_or_default()
}

fn add_velocity(store: &mut Store, id: Option<Entity>, dv: Vector) {
    let Some(id) = id else {
        return;
    };
    if sleep::is_sleeping(store, id) {
        return;
    }
    if let Some(body) = store.get_mut::<Body>(id) {
        if body.is_movable() {
            body.vel += dv;
        }
    }
}

/// Timings of the last step's phase groups, in milliseconds.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct StepTimings {
    pub detect_ms: f64,
    pub solve_ms: f64,
    pub integrate_ms: f64,
}

#[derive(Debug, Default)]
pub struct Solver {
    config: SolverConfig,
    contacts: ContactTable,
    bound_store: Option<StoreId>,
}

impl Solver {
    pub fn new(config: SolverConfig) -> Self {
        Self { config, contacts: ContactTable::new(), bound_store: None }
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Merge `patch` into the current config. A rejected patch leaves the
    /// config unchanged.
    pub fn configure(&mut self, patch: &SolverPatch) -> ConfigResult<()> {
        match self.config.merged(patch) {
            Ok(next) => {
                log::debug!("solver configured: {next:?}");
                self.config = next;
                Ok(())
            }
            Err(err) => {
                log::warn!("solver config rejected: {err}");
                Err(err)
            }
        }
    }

    pub fn contacts(&self) -> &ContactTable {
        &self.contacts
    }

    /// Forget all contacts and zero every constraint impulse in `store`.
    pub fn reset(&mut self, store: &mut Store) {
        log::debug!("solver reset: dropping {} contacts", self.contacts.len());
        self.contacts.clear();
        for (_, c) in store.table_mut::<Constraint>().iter_mut() {
            c.impulse = 0.0;
        }
        self.bound_store = Some(store.id());
    }

    /// Advance `store` by `dt` seconds, replacing `events` with this step's
    /// contacts. Non-positive or non-finite `dt` is ignored and yields `None`.
    pub fn step(
        &mut self,
        store: &mut Store,
        detector: &Detector,
        bounds: WorldBounds,
        events: &mut Vec<CollisionEvent>,
        dt: f64,
    ) -> Option<StepTimings> {
        let mut timings = StepTimings::default();
        if !(dt.is_finite() && dt > 0.0) {
            log::warn!("step skipped: dt = {dt}");
            return None;
        }

        if self.bound_store != Some(store.id()) {
            if self.bound_store.is_some() {
                log::debug!("store changed, dropping {} contacts", self.contacts.len());
            }
            self.contacts.clear();
            self.bound_store = Some(store.id());
        }
        let config = self.config;

        forces::integrate_forces(store, config.gravity, dt);
        forces::apply_springs(store, dt);
        forces::apply_drag(store, dt);

        let timer = PerfTimer::start();
        self.contacts.begin();
        detector.detect(store, bounds, |report| self.contacts.upsert(&report));
        self.contacts.sweep();
        events.clear();
        events.extend(self.contacts.iter().map(CollisionEvent::from));
        timings.detect_ms = timer.elapsed_ms();

        let timer = PerfTimer::start();
        let contacts = self.contacts.as_mut_slice();
        let constraint_ids = store.query_ids(&[ComponentKind::Constraint]);

        forces::correct_resting_gravity(store, contacts, &config, dt);
        constraints::refresh(store, &constraint_ids, config.constraint_slop);

        let factor = config.warm_start.then_some(config.warm_start_factor);
        impulse::warm_start(store, contacts, factor);
        constraints::warm_start(store, &constraint_ids, factor);

        impulse::prepare_bounce(store, contacts, config.restitution_threshold);

        for _ in 0..config.iterations {
            impulse::solve_normal(store, contacts);
            impulse::solve_friction(store, contacts);
            impulse::solve_position(store, contacts, config.baumgarte, config.slop, dt);
            constraints::solve(store, &constraint_ids, dt);
        }
        timings.solve_ms = timer.elapsed_ms();

        let timer = PerfTimer::start();
        integrate::integrate_positions(store, dt);
        if config.sleep {
            sleep::update_individual(store, dt);
            sleep::update_groups(store, dt);
        }
        timings.integrate_ms = timer.elapsed_ms();

        log::trace!(
            "step dt={dt}: {} contacts, {} constraints",
            self.contacts.len(),
            constraint_ids.len()
        );
        Some(timings)
    }
}
