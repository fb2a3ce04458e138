//! Sleep bookkeeping
//!
//! An entity's effective [`Sleep`] record is resolved at use time:
//! its group owner's record when it has a [`GroupRef`] to an entity holding
//! one, else its own, else none (always awake).

use crate::domain::{Body, Group, GroupRef, Sleep};
use crate::ecs::{ComponentKind, Entity, Store};

/// Wake threshold used for entities without any sleep record.
const IMPLICIT_WAKE_THRESHOLD: f64 = 0.007;

/// Entity whose `Sleep` governs `id`, if any.
pub(crate) fn owner(store: &Store, id: Entity) -> Option<Entity> {
    if let Some(&GroupRef(group)) = store.get::<GroupRef>(id) {
        if store.has::<Sleep>(group) {
            return Some(group);
        }
    }
    store.has::<Sleep>(id).then_some(id)
}

pub(crate) fn is_sleeping(store: &Store, id: Entity) -> bool {
    owner(store, id)
        .and_then(|o| store.get::<Sleep>(o))
        .is_some_and(|s| s.is_sleeping)
}

pub(crate) fn wake_threshold(store: &Store, id: Entity) -> f64 {
    owner(store, id)
        .and_then(|o| store.get::<Sleep>(o))
        .map_or(IMPLICIT_WAKE_THRESHOLD, |s| s.wake_threshold)
}

/// Wake whatever record governs `id`. No-op for entities without one.
pub(crate) fn wake(store: &mut Store, id: Entity) {
    if let Some(o) = owner(store, id) {
        if let Some(sleep) = store.get_mut::<Sleep>(o) {
            sleep.wake();
        }
    }
}

fn has_valid_group_ref(store: &Store, id: Entity) -> bool {
    store
        .get::<GroupRef>(id)
        .is_some_and(|&GroupRef(group)| store.has::<Sleep>(group))
}

/// Per-entity timers for `{Body, Sleep}` entities not governed by a group.
pub(crate) fn update_individual(store: &mut Store, dt: f64) {
    for id in store.query_ids(&[ComponentKind::Body, ComponentKind::Sleep]) {
        if has_valid_group_ref(store, id) {
            continue;
        }
        let Some(speed_sq) = store.get::<Body>(id).map(|b| b.vel.length_squared()) else {
            continue;
        };
        if let Some(sleep) = store.get_mut::<Sleep>(id) {
            if !sleep.is_sleeping {
                sleep.observe(speed_sq, dt);
            }
        }
    }
}

/// Shared timers for `{Sleep, Group}` owners, driven by the fastest member.
pub(crate) fn update_groups(store: &mut Store, dt: f64) {
    for id in store.query_ids(&[ComponentKind::Sleep, ComponentKind::Group]) {
        let Some(group) = store.get::<Group>(id) else {
            continue;
        };
        let max_speed_sq = group
            .iter()
            .map(|&m| store.get::<Body>(m).map_or(0.0, |b| b.vel.length_squared()))
            .fold(0.0, f64::max);
        if let Some(sleep) = store.get_mut::<Sleep>(id) {
            if !sleep.is_sleeping {
                sleep.observe(max_speed_sq, dt);
            }
        }
    }
}
