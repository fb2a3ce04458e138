//! Distance constraints
//!
//! Each step refreshes normal and error from live positions, warm starts the
//! stored impulse, then solves a velocity bias `-error * stiffness / dt` once
//! per iteration alongside the contacts.

use crate::domain::{Body, Constraint, ConstraintMode, Position};
use crate::ecs::{Entity, Store};

use super::{add_velocity, body_or_fixed};

pub(super) fn refresh(store: &mut Store, ids: &[Entity], constraint_slop: f64) {
    for &id in ids {
        let Some(&c) = store.get::<Constraint>(id) else {
            continue;
        };
        let (Some(pa), Some(pb)) = (store.get::<Position>(c.a), store.get::<Position>(c.b)) else {
            continue;
        };
        let d = pb.0 - pa.0;
        let Some(c) = store.get_mut::<Constraint>(id) else {
            continue;
        };

        let dist = d.length();
        c.normal = d.div(dist);
        c.error = dist - c.dist;

        let slack = match c.mode {
            ConstraintMode::Rope => c.error <= -constraint_slop,
            ConstraintMode::Buffer => c.error >= constraint_slop,
            ConstraintMode::Rod => false,
        };
        if slack {
            c.impulse = 0.0;
        }
    }
}

/// Scale and reapply each stored impulse, or drop them all when `factor`
/// is `None`.
pub(super) fn warm_start(store: &mut Store, ids: &[Entity], factor: Option<f64>) {
    for &id in ids {
        let Some(c) = store.get_mut::<Constraint>(id) else {
            continue;
        };
        let Some(factor) = factor else {
            c.impulse = 0.0;
            continue;
        };
        c.impulse *= factor;
        let c = *c;

        let inv_a = body_or_fixed(store, Some(c.a)).inv_mass;
        let inv_b = body_or_fixed(store, Some(c.b)).inv_mass;
        add_velocity(store, Some(c.a), c.normal * (-c.impulse * inv_a));
        add_velocity(store, Some(c.b), c.normal * (c.impulse * inv_b));
    }
}

/// One sequential-impulse pass over the active constraints.
pub(super) fn solve(store: &mut Store, ids: &[Entity], dt: f64) {
    for &id in ids {
        let Some(&c) = store.get::<Constraint>(id) else {
            continue;
        };
        let (Some(&ba), Some(&bb)) = (store.get::<Body>(c.a), store.get::<Body>(c.b)) else {
            continue;
        };
        let im = ba.inv_mass + bb.inv_mass;
        if im == 0.0 || c.is_slack() {
            continue;
        }

        let n = c.normal;
        let vn = (bb.vel - ba.vel).dot(n);
        let bias = -c.error * c.stiffness / dt;
        let dj = (-vn + bias) / im;
        let next = match c.mode {
            ConstraintMode::Rope => (c.impulse + dj).min(0.0),
            ConstraintMode::Buffer => (c.impulse + dj).max(0.0),
            ConstraintMode::Rod => c.impulse + dj,
        };
        let j = next - c.impulse;
        if let Some(stored) = store.get_mut::<Constraint>(id) {
            stored.impulse = next;
        }

        add_velocity(store, Some(c.a), n * (-j * ba.inv_mass));
        add_velocity(store, Some(c.b), n * (j * bb.inv_mass));
    }
}
