//! Position integration
//!
//! The only phase without cross-entity writes, so it runs over the dense
//! Position rows in parallel when the `parallel` feature is on.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::core::Vector;
use crate::domain::{Body, Position};
use crate::ecs::{Entity, Store};

use super::sleep;

fn displacement(store: &Store, id: Entity, dt: f64) -> Option<Vector> {
    let body = store.get::<Body>(id)?;
    if !body.is_movable() || sleep::is_sleeping(store, id) {
        return None;
    }
    Some(body.vel * dt)
}

pub(super) fn integrate_positions(store: &mut Store, dt: f64) {
    #[cfg(feature = "parallel")]
    {
        let moves: Vec<Option<Vector>> = {
            let store = &*store;
            store
                .table::<Position>()
                .ids()
                .par_iter()
                .map(|&id| displacement(store, id, dt))
                .collect()
        };
        let (_, rows) = store.table_mut::<Position>().parts_mut();
        rows.par_iter_mut().zip(moves.par_iter()).for_each(|(pos, step)| {
            if let Some(step) = step {
                pos.0 += *step;
            }
        });
    }

    #[cfg(not(feature = "parallel"))]
    {
        let moves: Vec<Option<Vector>> = store
            .table::<Position>()
            .ids()
            .iter()
            .map(|&id| displacement(store, id, dt))
            .collect();
        let (_, rows) = store.table_mut::<Position>().parts_mut();
        for (pos, step) in rows.iter_mut().zip(&moves) {
            if let Some(step) = step {
                pos.0 += *step;
            }
        }
    }
}
