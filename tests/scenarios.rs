use particula_rigid::domain::{Aabb, Body, Circle, Collider, Constraint, Group, GroupRef, Position, Sleep};
use particula_rigid::systems::solver::ContactKey;
use particula_rigid::{ComponentKind, Entity, PhysicsWorld, Store, Vector};

const DT: f64 = 1.0 / 60.0;

fn zero_g(width: f64, height: f64) -> PhysicsWorld {
    let mut world = PhysicsWorld::new(width, height);
    world.set_gravity(0.0, 0.0).unwrap();
    world
}

fn pos(world: &PhysicsWorld, id: Entity) -> Vector {
    world.position(id).unwrap()
}

fn vel(world: &PhysicsWorld, id: Entity) -> Vector {
    world.velocity(id).unwrap()
}

#[test]
fn elastic_pair_swaps_velocities() {
    let mut world = zero_g(20.0, 20.0);
    // penetration 0.004, under the default slop
    let a = world.spawn_circle(9.002, 10.0, 1.0, 1.0).unwrap();
    let b = world.spawn_circle(10.998, 10.0, 1.0, 1.0).unwrap();
    world.set_velocity(a, Vector::new(1.0, 0.0));
    world.set_velocity(b, Vector::new(-1.0, 0.0));

    world.step(DT);

    assert_eq!(vel(&world, a), Vector::new(-1.0, 0.0));
    assert_eq!(vel(&world, b), Vector::new(1.0, 0.0));
    assert!((pos(&world, b) - pos(&world, a)).length() >= 2.0);
}

#[test]
fn deep_overlap_separates() {
    let mut world = zero_g(20.0, 20.0);
    let a = world.spawn_circle(9.25, 10.0, 1.0, 1.0).unwrap();
    let b = world.spawn_circle(10.75, 10.0, 1.0, 1.0).unwrap();
    world.set_velocity(a, Vector::new(1.0, 0.0));
    world.set_velocity(b, Vector::new(-1.0, 0.0));

    // restitution swaps the pair, then the positional bias adds
    // 0.2 * (0.5 - 0.005) / dt of separating speed on top
    world.step(DT);
    let (va, vb) = (vel(&world, a), vel(&world, b));
    assert!((va.x + 2.97).abs() < 1e-9, "va {}", va.x);
    assert!((vb.x - 2.97).abs() < 1e-9, "vb {}", vb.x);
    assert!(((pos(&world, b) - pos(&world, a)).length() - 1.599).abs() < 1e-9);

    for _ in 0..9 {
        world.step(DT);
    }

    assert!((pos(&world, b) - pos(&world, a)).length() > 2.0);
    assert!(vel(&world, a).x < 0.0);
    assert!(vel(&world, b).x > 0.0);
    assert!(world.events().is_empty());
}

#[test]
fn circle_settles_on_floor_and_sleeps() {
    let mut world = PhysicsWorld::new(10.0, 10.0);
    let id = world.spawn_circle(5.0, 1.0, 1.0, 1.0).unwrap();

    for _ in 0..120 {
        world.step(DT);
    }

    assert!(world.is_sleeping(id));
    assert_eq!(pos(&world, id).y, 1.0);
    assert_eq!(vel(&world, id), Vector::ZERO);
}

#[test]
fn rod_converges_and_conserves_momentum() {
    let mut world = zero_g(10.0, 10.0);
    let store = world.store_mut();
    let a = store.create();
    let b = store.create();
    store.add(a, Position::new(4.0, 5.0)).unwrap().add(a, Body::dynamic(1.0)).unwrap();
    store.add(b, Position::new(6.0, 5.0)).unwrap().add(b, Body::dynamic(1.0)).unwrap();
    let rod = store.create();
    store.add(rod, Constraint::rod(a, b, 1.0)).unwrap();

    for _ in 0..60 {
        world.step(DT);
    }

    let dist = (pos(&world, b) - pos(&world, a)).length();
    assert!((dist - 1.0).abs() <= 0.01, "distance {dist}");
    let momentum = vel(&world, a) + vel(&world, b);
    assert!(momentum.length() < 1e-9);
}

#[test]
fn query_is_driven_by_rarest_component() {
    let mut store = Store::new();
    for i in 0..1000 {
        let id = store.create();
        store.add(id, Position::new(i as f64, 0.0)).unwrap();
        if i % 200 == 0 {
            store.add(id, Body::dynamic(1.0)).unwrap();
        }
    }

    let mut query = store.query(&[ComponentKind::Position, ComponentKind::Body]);
    assert_eq!(query.by_ref().count(), 5);
    assert_eq!(query.scanned(), 5);
    assert_eq!(query.driver_kind(), Some(ComponentKind::Body));

    let mut rows = store.query_rows::<(Position, Body)>();
    assert_eq!(rows.by_ref().count(), 5);
    assert_eq!(rows.scanned(), 5);
}

#[test]
fn immovable_bodies_never_change() {
    let mut world = PhysicsWorld::new(10.0, 10.0);
    let shelf = world.spawn_box(5.0, 3.0, 3.0, 0.5, 0.0).unwrap();
    let pinned = world.spawn_circle(8.0, 6.0, 0.5, 0.0).unwrap();
    world.store_mut().get_mut::<Body>(pinned).unwrap().gravity = Some(Vector::new(0.0, -50.0));
    for (x, y) in [(4.0, 4.5), (5.5, 5.0), (7.8, 7.2)] {
        world.spawn_circle(x, y, 0.5, 1.0).unwrap();
    }

    let mut touched = false;
    for _ in 0..180 {
        world.step(DT);
        touched |= world.events().iter().any(|e| e.a == shelf || e.b == Some(shelf));
        assert_eq!(pos(&world, shelf), Vector::new(5.0, 3.0));
        assert_eq!(vel(&world, shelf), Vector::ZERO);
        assert_eq!(pos(&world, pinned), Vector::new(8.0, 6.0));
        assert_eq!(vel(&world, pinned), Vector::ZERO);
    }
    assert!(touched);
}

#[test]
fn stale_contacts_are_dropped() {
    let mut world = zero_g(20.0, 20.0);
    let a = world.spawn_circle(9.5, 10.0, 1.0, 1.0).unwrap();
    let b = world.spawn_circle(11.0, 10.0, 1.0, 1.0).unwrap();
    world.step(DT);
    let key = ContactKey::Pair(a.min(b), a.max(b));
    assert!(world.solver().contacts().get(key).is_some());

    world.store_mut().get_mut::<Position>(b).unwrap().0 = Vector::new(16.0, 10.0);
    world.step(DT);
    assert!(world.solver().contacts().get(key).is_none());
    assert!(world.events().iter().all(|e| e.b != Some(b)));
}

#[test]
fn contact_impulses_stay_in_friction_cone() {
    let mut world = PhysicsWorld::new(12.0, 12.0);
    let mut ids = Vec::new();
    for (i, x) in [2.0, 3.9, 5.8, 7.7].into_iter().enumerate() {
        let id = world.spawn_circle(x, 1.0 + i as f64 * 0.1, 1.0, 1.0).unwrap();
        let body = world.store_mut().get_mut::<Body>(id).unwrap();
        body.mu = 0.5;
        body.vel = Vector::new(3.0 - i as f64 * 2.0, 0.0);
        ids.push(id);
    }

    for _ in 0..90 {
        world.step(DT);
        for c in world.solver().contacts().iter() {
            let mu = if c.b.is_some() { 0.25 } else { 0.5 };
            assert!(c.jn >= 0.0, "negative normal impulse {}", c.jn);
            assert!(c.jt.abs() <= mu * c.jn + 1e-9, "jt {} outside cone of jn {}", c.jt, c.jn);
        }
    }
}

#[test]
fn impulse_wakes_sleeping_body() {
    let mut world = PhysicsWorld::new(10.0, 10.0);
    let id = world.spawn_circle(5.0, 1.0, 1.0, 1.0).unwrap();
    for _ in 0..120 {
        world.step(DT);
    }
    assert!(world.is_sleeping(id));

    world.apply_impulse(id, Vector::new(0.0, 3.0));
    assert!(!world.is_sleeping(id));
    assert_eq!(world.store().get::<Sleep>(id).unwrap().sleep_timer, 0.0);
    world.step(DT);
    assert!(pos(&world, id).y > 1.0);
}

#[test]
fn impulse_written_to_store_wakes_at_next_step() {
    let mut world = zero_g(10.0, 10.0);
    let id = world.spawn_circle(5.0, 5.0, 1.0, 1.0).unwrap();
    world.store_mut().get_mut::<Sleep>(id).unwrap().is_sleeping = true;
    world.store_mut().get_mut::<Body>(id).unwrap().apply_impulse(Vector::new(1.0, 0.0));

    world.step(DT);
    assert!(!world.is_sleeping(id));
    assert_eq!(vel(&world, id), Vector::new(1.0, 0.0));
}

#[test]
fn group_shares_one_sleep_record() {
    let mut world = PhysicsWorld::new(10.0, 10.0);
    let store = world.store_mut();
    let owner = store.create();
    let mut members = Vec::new();
    for x in [3.0, 7.0] {
        let id = store.create();
        store
            .add(id, Position::new(x, 1.0))
            .unwrap()
            .add(id, Body::dynamic(1.0))
            .unwrap()
            .add(id, Collider::circle())
            .unwrap()
            .add(id, Circle { radius: 1.0 })
            .unwrap()
            .add(id, GroupRef(owner))
            .unwrap();
        members.push(id);
    }
    store
        .add(owner, Sleep::default())
        .unwrap()
        .add(owner, Group::new(members.iter().copied()))
        .unwrap();

    for _ in 0..120 {
        world.step(DT);
    }
    assert!(world.store().get::<Sleep>(owner).unwrap().is_sleeping);
    assert!(members.iter().all(|&m| world.is_sleeping(m)));

    world.apply_force(members[0], Vector::new(5.0, 0.0));
    assert!(!world.is_sleeping(members[1]));
}

#[test]
fn box_rests_on_box() {
    let mut world = PhysicsWorld::new(10.0, 10.0);
    let base = world.spawn_box(5.0, 1.0, 2.0, 1.0, 0.0).unwrap();
    let top = world.store_mut().create();
    world
        .store_mut()
        .add(top, Position::new(5.0, 2.5))
        .unwrap()
        .add(top, Body::dynamic(1.0).with_restitution(0.0))
        .unwrap()
        .add(top, Collider::aabb())
        .unwrap()
        .add(top, Aabb::new(0.5, 0.5))
        .unwrap();

    for _ in 0..120 {
        world.step(DT);
    }
    let y = pos(&world, top).y;
    assert!(y > 2.4 && y <= 2.5 + 1e-9, "top box at {y}");
    assert_eq!(pos(&world, base), Vector::new(5.0, 1.0));
}

#[test]
fn replacing_the_store_starts_from_clean_contacts() {
    let mut world = PhysicsWorld::new(10.0, 10.0);
    world.spawn_circle(5.0, 1.0, 1.0, 1.0).unwrap();
    world.step(DT);
    assert_eq!(world.solver().contacts().len(), 1);

    let mut next = Store::new();
    let id = next.create();
    next.add(id, Position::new(5.0, 5.0)).unwrap().add(id, Body::dynamic(1.0)).unwrap();
    world.replace_store(next);
    assert!(world.solver().contacts().is_empty());
    world.step(DT);
    assert!(world.events().is_empty());
}
