//! Collision detection
//!
//! Brute-force O(n²) pass over every `{Position, Collider}` entity: world
//! edges first, then each unordered pair once. Contacts are reported through
//! a callback so the solver can upsert them into its persistent table without
//! an intermediate allocation.

mod boundary;
mod narrow;

use serde::{Deserialize, Serialize};

use crate::core::{ConfigResult, Vector};
use crate::domain::{Aabb, Body, Circle, Collider, Position, ShapeKind};
use crate::ecs::{ComponentKind, Entity, Store};

pub use boundary::{Boundary, BoundaryTag, WorldBounds};
pub use narrow::Shape;

/// What the first entity of a contact is touching.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Counterpart {
    Body(Entity),
    Boundary(BoundaryTag),
}

/// One overlap found this step. `normal` points from `a` towards the
/// counterpart; `penetration >= 0`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ContactReport {
    pub a: Entity,
    pub other: Counterpart,
    pub normal: Vector,
    pub penetration: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DetectorConfig {
    pub boundary: Boundary,
    /// Layer the world edges belong to.
    pub boundary_layer: u16,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self { boundary: Boundary::ALL, boundary_layer: 1 }
    }
}

impl DetectorConfig {
    pub fn from_json(json: &str) -> ConfigResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Snapshot of a collidable entity for one detection pass
#[derive(Clone, Copy, Debug)]
struct Proxy {
    id: Entity,
    pos: Vector,
    vel: Option<Vector>,
    collider: Collider,
    shape: Shape,
}

#[derive(Debug, Default)]
pub struct Detector {
    config: DetectorConfig,
}

impl Detector {
    pub fn new(config: DetectorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    pub fn configure(&mut self, config: DetectorConfig) {
        self.config = config;
    }

    /// Report every boundary violation and overlapping pair in `store`.
    pub fn detect<F>(&self, store: &Store, bounds: WorldBounds, mut emit: F)
    where
        F: FnMut(ContactReport),
    {
        let proxies = collect_proxies(store);

        for (i, a) in proxies.iter().enumerate() {
            if a.collider.mask & self.config.boundary_layer != 0 {
                for tag in BoundaryTag::ALL {
                    if !self.config.boundary.contains(tag.flag()) {
                        continue;
                    }
                    let penetration = boundary::penetration(tag, a.pos, a.shape, bounds);
                    if penetration >= 0.0 {
                        emit(ContactReport {
                            a: a.id,
                            other: Counterpart::Boundary(tag),
                            normal: tag.normal(),
                            penetration,
                        });
                    }
                }
            }

            for b in &proxies[i + 1..] {
                if !a.collider.accepts(&b.collider) {
                    continue;
                }
                if let Some(report) = test_pair(a, b) {
                    emit(report);
                }
            }
        }
    }
}

fn collect_proxies(store: &Store) -> Vec<Proxy> {
    store
        .query(&[ComponentKind::Position, ComponentKind::Collider])
        .filter_map(|id| {
            let pos = store.get::<Position>(id)?.0;
            let collider = *store.get::<Collider>(id)?;
            let shape = match collider.shape {
                ShapeKind::Circle => {
                    Shape::Circle { radius: store.get::<Circle>(id)?.radius }
                }
                ShapeKind::Aabb => {
                    let Aabb { half_width, half_height } = *store.get::<Aabb>(id)?;
                    Shape::Aabb { half_width, half_height }
                }
            };
            let vel = store.get::<Body>(id).map(|b| b.vel);
            Some(Proxy { id, pos, vel, collider, shape })
        })
        .collect()
}

fn test_pair(a: &Proxy, b: &Proxy) -> Option<ContactReport> {
    let (first, second, hit) = match (a.shape, b.shape) {
        (Shape::Circle { radius: ra }, Shape::Circle { radius: rb }) => {
            (a, b, narrow::circle_circle(a.pos, ra, b.pos, rb)?)
        }
        (
            Shape::Aabb { half_width: wa, half_height: ha },
            Shape::Aabb { half_width: wb, half_height: hb },
        ) => (a, b, narrow::aabb_aabb(a.pos, (wa, ha), b.pos, (wb, hb))?),
        (Shape::Circle { radius }, Shape::Aabb { half_width, half_height }) => (
            a,
            b,
            narrow::circle_aabb(a.pos, radius, a.vel, b.pos, (half_width, half_height))?,
        ),
        // circle is always the first side of a circle-box contact
        (Shape::Aabb { half_width, half_height }, Shape::Circle { radius }) => (
            b,
            a,
            narrow::circle_aabb(b.pos, radius, b.vel, a.pos, (half_width, half_height))?,
        ),
    };

    Some(ContactReport {
        a: first.id,
        other: Counterpart::Body(second.id),
        normal: hit.normal,
        penetration: hit.penetration,
    })
}
