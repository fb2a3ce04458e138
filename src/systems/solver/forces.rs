//! Force phases: accumulated forces and gravity, springs, drag, and the
//! gravity cancel on resting contacts.

use crate::core::Vector;
use crate::domain::{Body, Position, Spring};
use crate::ecs::{ComponentKind, Store};

use super::contacts::Contact;
use super::{add_velocity, body_or_fixed, sleep, SolverConfig};

/// Ground drag is tuned as a per-frame percentage at 62.5 Hz.
const GROUND_DRAG_RATE: f64 = 62.5;

pub(super) fn integrate_forces(store: &mut Store, gravity: Vector, dt: f64) {
    for id in store.query_ids(&[ComponentKind::Position, ComponentKind::Body]) {
        let Some(body) = store.get::<Body>(id) else {
            continue;
        };
        if !body.force.is_zero() || !body.impulse.is_zero() {
            sleep::wake(store, id);
        }
        if sleep::is_sleeping(store, id) {
            continue;
        }
        let Some(body) = store.get_mut::<Body>(id) else {
            continue;
        };

        if body.is_movable() {
            let inv = body.inv_mass;
            body.vel += body.force * (inv * dt) + body.impulse * inv;
            body.vel += body.gravity.unwrap_or(gravity) * dt;
        }
        body.force = Vector::ZERO;
        body.impulse = Vector::ZERO;
        body.pre_vel = body.vel;
    }
}

pub(super) fn apply_springs(store: &mut Store, dt: f64) {
    for id in store.query_ids(&[ComponentKind::Spring]) {
        let Some(&spring) = store.get::<Spring>(id) else {
            continue;
        };
        let (Some(pa), Some(pb)) =
            (store.get::<Position>(spring.a), store.get::<Position>(spring.b))
        else {
            continue;
        };
        let d = pb.0 - pa.0;
        let (Some(&ba), Some(&bb)) = (store.get::<Body>(spring.a), store.get::<Body>(spring.b))
        else {
            continue;
        };
        let im = ba.inv_mass + bb.inv_mass;
        if im == 0.0 {
            continue;
        }

        let dist = d.length();
        let n = d.div(dist);
        let force = -(dist - spring.length) * spring.spring;
        add_velocity(store, Some(spring.a), n * (-force * ba.inv_mass * dt));
        add_velocity(store, Some(spring.b), n * (force * bb.inv_mass * dt));

        // damping: decay the relative normal velocity exponentially
        let va = body_or_fixed(store, Some(spring.a)).vel;
        let vb = body_or_fixed(store, Some(spring.b)).vel;
        let nv = (vb - va).dot(n);
        let damped = nv * (-spring.damping * im * dt).exp();
        let j = (damped - nv) / im;
        add_velocity(store, Some(spring.a), n * (-j * ba.inv_mass));
        add_velocity(store, Some(spring.b), n * (j * bb.inv_mass));
    }
}

pub(super) fn apply_drag(store: &mut Store, dt: f64) {
    for id in store.query_ids(&[ComponentKind::Position, ComponentKind::Body]) {
        if sleep::is_sleeping(store, id) {
            continue;
        }
        let Some(body) = store.get_mut::<Body>(id) else {
            continue;
        };
        if !body.is_movable() {
            continue;
        }

        let linear = body.vel * -body.linear_drag;
        let quad = if body.quad_drag != 0.0 {
            body.vel * (-body.quad_drag * body.vel.length())
        } else {
            Vector::ZERO
        };
        body.vel += (linear + quad) * (body.inv_mass * dt);

        if let Some(max) = body.vx_max {
            body.vel.x = body.vel.x.max(-max).min(max);
        }
        if let Some(max) = body.vy_max {
            body.vel.y = body.vel.y.max(-max).min(max);
        }
    }
}

/// Cancel this step's gravity along the normal for a movable body pressing
/// into an immovable one, and apply ground drag on floor-like normals.
pub(super) fn correct_resting_gravity(
    store: &mut Store,
    contacts: &[Contact],
    config: &SolverConfig,
    dt: f64,
) {
    let ground = dt * GROUND_DRAG_RATE;

    for c in contacts {
        let a = body_or_fixed(store, Some(c.a));
        let b = body_or_fixed(store, c.b);
        if a.inv_mass + b.inv_mass == 0.0 {
            continue;
        }
        let n = c.normal;

        if !sleep::is_sleeping(store, c.a) && a.vel.dot(n) > 0.0 && b.inv_mass == 0.0 {
            if let Some(body) = store.get_mut::<Body>(c.a) {
                if body.mu == 0.0 {
                    let gn = (body.gravity.unwrap_or(config.gravity) * dt).dot(n);
                    body.vel -= n * gn;
                }
                if n.y < 0.0 {
                    body.vel.x *= 1.0 - body.ground_drag * ground;
                }
            }
        }

        let Some(b_id) = c.b else {
            continue;
        };
        if !sleep::is_sleeping(store, b_id) && b.vel.dot(n) < 0.0 && a.inv_mass == 0.0 {
            if let Some(body) = store.get_mut::<Body>(b_id) {
                if body.mu == 0.0 {
                    let gn = (body.gravity.unwrap_or(config.gravity) * dt).dot(n);
                    body.vel -= n * gn;
                }
                if n.y > 0.0 {
                    body.vel.x *= 1.0 - body.ground_drag * ground;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Sleep;
    use crate::ecs::Entity;
    use crate::systems::collision::{BoundaryTag, ContactReport, Counterpart};
    use crate::systems::solver::contacts::ContactTable;

    fn spawn(store: &mut Store, x: f64, body: Body) -> Entity {
        let id = store.create();
        store.add(id, Position::new(x, 0.0)).unwrap().add(id, body).unwrap();
        id
    }

    #[test]
    fn forces_and_impulses_integrate_then_clear() {
        let mut store = Store::new();
        let mut body = Body::dynamic(0.5);
        body.apply_force(Vector::new(2.0, 0.0));
        body.apply_impulse(Vector::new(0.0, 4.0));
        let id = spawn(&mut store, 0.0, body);

        integrate_forces(&mut store, Vector::new(0.0, -10.0), 0.1);
        let body = store.get::<Body>(id).unwrap();
        assert!((body.vel.x - 0.1).abs() < 1e-12);
        assert!((body.vel.y - 1.0).abs() < 1e-12);
        assert!(body.force.is_zero() && body.impulse.is_zero());
        assert_eq!(body.pre_vel, body.vel);
    }

    #[test]
    fn gravity_override_and_fixed_bodies() {
        let mut store = Store::new();
        let floaty = spawn(
            &mut store,
            0.0,
            Body { gravity: Some(Vector::new(0.0, 1.0)), ..Body::dynamic(1.0) },
        );
        let wall = spawn(
            &mut store,
            1.0,
            Body { gravity: Some(Vector::new(0.0, 1.0)), ..Body::fixed() },
        );

        integrate_forces(&mut store, Vector::new(0.0, -10.0), 1.0);
        assert_eq!(store.get::<Body>(floaty).unwrap().vel, Vector::new(0.0, 1.0));
        assert_eq!(store.get::<Body>(wall).unwrap().vel, Vector::ZERO);
    }

    #[test]
    fn sleeping_bodies_wake_on_force() {
        let mut store = Store::new();
        let still = spawn(&mut store, 0.0, Body::dynamic(1.0));
        let pushed = spawn(&mut store, 1.0, Body::dynamic(1.0));
        for id in [still, pushed] {
            store.add(id, Sleep { is_sleeping: true, ..Sleep::default() }).unwrap();
        }
        store.get_mut::<Body>(pushed).unwrap().apply_impulse(Vector::new(1.0, 0.0));

        integrate_forces(&mut store, Vector::ZERO, 0.1);
        assert!(store.get::<Sleep>(still).unwrap().is_sleeping);
        assert!(!store.get::<Sleep>(pushed).unwrap().is_sleeping);
        assert_eq!(store.get::<Body>(pushed).unwrap().vel, Vector::new(1.0, 0.0));
    }

    #[test]
    fn stretched_spring_pulls_together() {
        let mut store = Store::new();
        let a = spawn(&mut store, 0.0, Body::dynamic(1.0));
        let b = spawn(&mut store, 3.0, Body::dynamic(1.0));
        let s = store.create();
        store.add(s, Spring::new(a, b, 1.0, 10.0)).unwrap();

        apply_springs(&mut store, 0.1);
        let va = store.get::<Body>(a).unwrap().vel;
        let vb = store.get::<Body>(b).unwrap().vel;
        assert!(va.x > 0.0 && vb.x < 0.0);
        assert!((va.x + vb.x).abs() < 1e-12);
    }

    #[test]
    fn spring_damping_decays_relative_velocity() {
        let mut store = Store::new();
        let a = spawn(&mut store, 0.0, Body::dynamic(1.0).with_velocity(-1.0, 0.0));
        let b = spawn(&mut store, 1.0, Body::dynamic(1.0).with_velocity(1.0, 0.0));
        let s = store.create();
        store.add(s, Spring::new(a, b, 1.0, 0.0).with_damping(5.0)).unwrap();

        apply_springs(&mut store, 0.1);
        let va = store.get::<Body>(a).unwrap().vel.x;
        let vb = store.get::<Body>(b).unwrap().vel.x;
        let expected = 2.0 * (-5.0f64 * 2.0 * 0.1).exp();
        assert!(((vb - va) - expected).abs() < 1e-12);
    }

    fn resting(a: Entity, other: Counterpart, normal: Vector) -> ContactTable {
        let mut table = ContactTable::new();
        table.begin();
        table.upsert(&ContactReport { a, other, normal, penetration: 0.0 });
        table.sweep();
        table
    }

    #[test]
    fn resting_gravity_is_cancelled_on_either_side() {
        let config = SolverConfig::default();
        let dt = 0.1;
        let fall = Vector::new(0.0, -0.98);

        let mut store = Store::new();
        let on_floor = spawn(&mut store, 0.0, Body { vel: fall, ..Body::dynamic(1.0) });
        let mut contacts = resting(on_floor, Counterpart::Boundary(BoundaryTag::Floor), Vector::DOWN);
        correct_resting_gravity(&mut store, contacts.as_mut_slice(), &config, dt);
        assert!(store.get::<Body>(on_floor).unwrap().vel.length() < 1e-12);

        let shelf = spawn(&mut store, 1.0, Body::fixed());
        let on_shelf = spawn(&mut store, 1.0, Body { vel: fall, ..Body::dynamic(1.0) });
        let mut contacts = resting(shelf, Counterpart::Body(on_shelf), Vector::UP);
        correct_resting_gravity(&mut store, contacts.as_mut_slice(), &config, dt);
        assert!(store.get::<Body>(on_shelf).unwrap().vel.length() < 1e-12);
    }

    #[test]
    fn resting_correction_skips_frictional_bodies_but_drags() {
        let config = SolverConfig::default();
        let mut store = Store::new();
        let id = spawn(
            &mut store,
            0.0,
            Body { vel: Vector::new(2.0, -1.0), ground_drag: 0.1, mu: 0.5, ..Body::dynamic(1.0) },
        );
        let mut contacts = resting(id, Counterpart::Boundary(BoundaryTag::Floor), Vector::DOWN);
        correct_resting_gravity(&mut store, contacts.as_mut_slice(), &config, 0.016);
        let vel = store.get::<Body>(id).unwrap().vel;
        assert_eq!(vel.y, -1.0);
        assert!((vel.x - 2.0 * (1.0 - 0.1)).abs() < 1e-12);
    }

    #[test]
    fn quadratic_drag_scales_with_speed() {
        let mut store = Store::new();
        let id = spawn(
            &mut store,
            0.0,
            Body { quad_drag: 0.1, ..Body::dynamic(1.0).with_velocity(3.0, 4.0) },
        );
        let heavy = spawn(
            &mut store,
            1.0,
            Body { quad_drag: 0.1, ..Body::dynamic(0.5).with_velocity(3.0, 4.0) },
        );
        apply_drag(&mut store, 0.1);

        // |v| = 5, so dv = -0.1 * 5 * v * dt
        let vel = store.get::<Body>(id).unwrap().vel;
        assert!((vel.x - 2.85).abs() < 1e-12);
        assert!((vel.y - 3.8).abs() < 1e-12);
        let vel = store.get::<Body>(heavy).unwrap().vel;
        assert!((vel.x - 2.925).abs() < 1e-12);
    }

    #[test]
    fn drag_slows_and_clamps() {
        let mut store = Store::new();
        let id = spawn(
            &mut store,
            0.0,
            Body {
                linear_drag: 1.0,
                vx_max: Some(0.5),
                ..Body::dynamic(1.0).with_velocity(2.0, -1.0)
            },
        );
        apply_drag(&mut store, 0.1);
        let vel = store.get::<Body>(id).unwrap().vel;
        assert_eq!(vel.x, 0.5);
        assert!((vel.y + 0.9).abs() < 1e-12);
    }
}
