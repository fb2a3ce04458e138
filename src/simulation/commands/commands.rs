use crate::core::{StoreResult, Vector};
use crate::domain::{Aabb, Body, Circle, Collider, Position, Sleep};
use crate::ecs::{Entity, Store};
use crate::systems::solver;

use super::PhysicsWorld;

pub(super) fn spawn_json(world: &mut PhysicsWorld, json: &str) -> StoreResult<Entity> {
    world.store.spawn_json(json)
}

fn spawn_body(world: &mut PhysicsWorld, x: f64, y: f64, inv_mass: f64) -> StoreResult<Entity> {
    let id = world.store.create();
    world
        .store
        .add(id, Position::new(x, y))?
        .add(id, Body::dynamic(inv_mass.max(0.0)))?
        .add(id, Sleep::default())?;
    Ok(id)
}

pub(super) fn spawn_circle(
    world: &mut PhysicsWorld,
    x: f64,
    y: f64,
    radius: f64,
    inv_mass: f64,
) -> StoreResult<Entity> {
    let id = spawn_body(world, x, y, inv_mass)?;
    world.store.add(id, Collider::circle())?.add(id, Circle { radius })?;
    Ok(id)
}

pub(super) fn spawn_box(
    world: &mut PhysicsWorld,
    x: f64,
    y: f64,
    half_width: f64,
    half_height: f64,
    inv_mass: f64,
) -> StoreResult<Entity> {
    let id = spawn_body(world, x, y, inv_mass)?;
    world.store.add(id, Collider::aabb())?.add(id, Aabb::new(half_width, half_height))?;
    Ok(id)
}

pub(super) fn destroy(world: &mut PhysicsWorld, id: Entity) -> bool {
    world.store.destroy(id)
}

/// Run `f` on `id`'s body after waking it. False when there is no body.
fn with_awake_body(world: &mut PhysicsWorld, id: Entity, f: impl FnOnce(&mut Body)) -> bool {
    if !world.store.has::<Body>(id) {
        return false;
    }
    solver::wake(&mut world.store, id);
    match world.store.get_mut::<Body>(id) {
        Some(body) => {
            f(body);
            true
        }
        None => false,
    }
}

pub(super) fn apply_force(world: &mut PhysicsWorld, id: Entity, force: Vector) -> bool {
    with_awake_body(world, id, |body| body.apply_force(force))
}

pub(super) fn apply_impulse(world: &mut PhysicsWorld, id: Entity, impulse: Vector) -> bool {
    with_awake_body(world, id, |body| body.apply_impulse(impulse))
}

pub(super) fn set_velocity(world: &mut PhysicsWorld, id: Entity, vel: Vector) -> bool {
    with_awake_body(world, id, |body| body.vel = vel)
}

pub(super) fn replace_store(world: &mut PhysicsWorld, store: Store) -> Store {
    let mut old = std::mem::replace(&mut world.store, store);
    world.solver.reset(&mut old);
    world.events.clear();
    log::debug!("store replaced: {} entities out, {} in", old.len(), world.store.len());
    old
}

pub(super) fn reset(world: &mut PhysicsWorld) {
    replace_store(world, Store::new());
    world.frame = 0;
    world.perf_stats.reset();
}
