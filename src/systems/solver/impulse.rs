//! Contact impulses
//!
//! Accumulated impulses are clamped, not the per-pass deltas: `jn >= 0`,
//! `|jt| <= mu * jn`, `bias >= 0`. Only the change from the previous
//! accumulated value is applied to the bodies.

use crate::core::Vector;
use crate::domain::Body;
use crate::ecs::Store;

use super::contacts::Contact;
use super::{add_velocity, body_or_fixed, sleep};

/// Scale and reapply stored impulses, or drop them all when `factor` is
/// `None`.
pub(super) fn warm_start(store: &mut Store, contacts: &mut [Contact], factor: Option<f64>) {
    for c in contacts.iter_mut() {
        let Some(factor) = factor else {
            c.jn = 0.0;
            c.jt = 0.0;
            c.bias = 0.0;
            continue;
        };
        c.bias *= factor;
        c.jn *= factor;
        c.jt *= factor;

        let inv_a = body_or_fixed(store, Some(c.a)).inv_mass;
        let inv_b = body_or_fixed(store, c.b).inv_mass;
        let p = c.normal * (c.bias + c.jn) + c.normal.tangent() * c.jt;
        add_velocity(store, Some(c.a), p * -inv_a);
        add_velocity(store, c.b, p * inv_b);
    }
}

/// Target separating velocity from restitution, fixed for the whole solve.
pub(super) fn prepare_bounce(store: &Store, contacts: &mut [Contact], threshold: f64) {
    for c in contacts.iter_mut() {
        let a = body_or_fixed(store, Some(c.a));
        let b = body_or_fixed(store, c.b);
        let vn = (b.vel - a.vel).dot(c.normal);
        c.bounce = if vn < -threshold { -a.restitution.min(b.restitution) * vn } else { 0.0 };
    }
}

fn apply_pair(store: &mut Store, c: &Contact, dir: Vector, j: f64, a: &Body, b: &Body) {
    add_velocity(store, Some(c.a), dir * (-j * a.inv_mass));
    add_velocity(store, c.b, dir * (j * b.inv_mass));
}

pub(super) fn solve_normal(store: &mut Store, contacts: &mut [Contact]) {
    for c in contacts.iter_mut() {
        let a = body_or_fixed(store, Some(c.a));
        let b = body_or_fixed(store, c.b);
        let im = a.inv_mass + b.inv_mass;
        if im == 0.0 {
            continue;
        }

        let vn = (b.vel - a.vel).dot(c.normal);
        let dj = (-vn + c.bounce) / im;
        let next = (c.jn + dj).max(0.0);
        let j = next - c.jn;
        c.jn = next;

        if j > sleep::wake_threshold(store, c.a) {
            sleep::wake(store, c.a);
        }
        if let Some(b_id) = c.b {
            if j > sleep::wake_threshold(store, b_id) {
                sleep::wake(store, b_id);
            }
        }
        apply_pair(store, c, c.normal, j, &a, &b);
    }
}

pub(super) fn solve_friction(store: &mut Store, contacts: &mut [Contact]) {
    for c in contacts.iter_mut() {
        let a = body_or_fixed(store, Some(c.a));
        let other_mu = c.b.and_then(|id| store.get::<Body>(id)).map(|b| b.mu);
        if a.mu == 0.0 || other_mu == Some(0.0) {
            continue;
        }
        let b = body_or_fixed(store, c.b);
        let im = a.inv_mass + b.inv_mass;
        if im == 0.0 {
            continue;
        }

        let t = c.normal.tangent();
        let vt = (b.vel - a.vel).dot(t);
        let dj = -vt / im;
        let max = a.mu * other_mu.unwrap_or(1.0) * c.jn;
        let next = (c.jt + dj).max(-max).min(max);
        let j = next - c.jt;
        c.jt = next;

        apply_pair(store, c, t, j, &a, &b);
    }
}

/// Baumgarte correction: push apart at `baumgarte * (penetration - slop) / dt`.
pub(super) fn solve_position(
    store: &mut Store,
    contacts: &mut [Contact],
    baumgarte: f64,
    slop: f64,
    dt: f64,
) {
    for c in contacts.iter_mut() {
        if c.penetration < slop {
            continue;
        }
        let a = body_or_fixed(store, Some(c.a));
        let b = body_or_fixed(store, c.b);
        let im = a.inv_mass + b.inv_mass;
        if im == 0.0 {
            continue;
        }

        let vn = (b.vel - a.vel).dot(c.normal);
        let target = baumgarte * (c.penetration - slop) / dt;
        let dj = (-vn + target) / im;
        let next = (c.bias + dj).max(0.0);
        let j = next - c.bias;
        c.bias = next;

        apply_pair(store, c, c.normal, j, &a, &b);
    }
}
