//! Named-component spawning
//!
//! Scenes describe entities as JSON objects keyed by component name:
//!
//! ```json
//! { "position": { "x": 2, "y": 3 }, "body": { "invMass": 1 }, "circle": null }
//! ```
//!
//! A `null` entry attaches the component with its defaults. Unknown names and
//! malformed data reject the whole entity; nothing is left half-built.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::core::{StoreError, StoreResult};
use crate::domain::{
    Aabb, Body, Circle, Collider, Constraint, Group, GroupRef, Position, Sleep, Spring,
};

use super::store::{Component, ComponentKind, Store};
use super::Entity;

/// Component name -> partial component data.
pub type EntitySpec = Map<String, Value>;

/// What a `null` entry stands for. A group ref has no default target, so it
/// stays `null` and fails to decode.
fn or_default(kind: ComponentKind, value: Value) -> Value {
    match (kind, value) {
        (ComponentKind::Group, Value::Null) => Value::Array(Vec::new()),
        (ComponentKind::GroupRef, Value::Null) => Value::Null,
        (_, Value::Null) => Value::Object(Map::new()),
        (_, value) => value,
    }
}

fn decode<C: Component + DeserializeOwned>(value: Value) -> StoreResult<C> {
    let value = or_default(C::KIND, value);
    serde_json::from_value(value).map_err(|source| StoreError::InvalidComponent {
        name: C::KIND.name().to_string(),
        source,
    })
}

fn attach(store: &mut Store, id: Entity, kind: ComponentKind, value: Value) -> StoreResult<()> {
    match kind {
        ComponentKind::Position => store.add(id, decode::<Position>(value)?),
        ComponentKind::Body => store.add(id, decode::<Body>(value)?),
        ComponentKind::Collider => store.add(id, decode::<Collider>(value)?),
        ComponentKind::Circle => store.add(id, decode::<Circle>(value)?),
        ComponentKind::Aabb => store.add(id, decode::<Aabb>(value)?),
        ComponentKind::Sleep => store.add(id, decode::<Sleep>(value)?),
        ComponentKind::Group => store.add(id, decode::<Group>(value)?),
        ComponentKind::GroupRef => store.add(id, decode::<GroupRef>(value)?),
        ComponentKind::Constraint => store.add(id, decode::<Constraint>(value)?),
        ComponentKind::Spring => store.add(id, decode::<Spring>(value)?),
    }?;
    Ok(())
}

impl Store {
    /// Create an entity and attach every component named in `spec`.
    pub fn spawn(&mut self, spec: EntitySpec) -> StoreResult<Entity> {
        let mut parts = Vec::with_capacity(spec.len());
        for (name, value) in spec {
            let kind =
                ComponentKind::from_name(&name).ok_or(StoreError::UnknownComponent(name))?;
            parts.push((kind, value));
        }

        let id = self.create();
        for (kind, value) in parts {
            if let Err(err) = attach(self, id, kind, value) {
                self.destroy(id);
                log::warn!("spawn rejected: {err}");
                return Err(err);
            }
        }
        Ok(id)
    }

    pub fn spawn_json(&mut self, json: &str) -> StoreResult<Entity> {
        match serde_json::from_str::<Value>(json) {
            Ok(Value::Object(spec)) => self.spawn(spec),
            Ok(other) => Err(StoreError::InvalidSpec(format!("expected object, got {other}"))),
            Err(e) => Err(StoreError::InvalidSpec(e.to_string())),
        }
    }
}
