//! Component data types
//!
//! Every component deserializes from a partial JSON object with the same
//! defaults a freshly spawned entity gets, so scene files only spell out what
//! differs.

use std::collections::BTreeSet;
use std::ops::{Deref, DerefMut};

use serde::{Deserialize, Serialize};

use crate::core::Vector;
use crate::ecs::Entity;

/// World-space position of an entity
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Position(pub Vector);

impl Position {
    pub const fn new(x: f64, y: f64) -> Self {
        Self(Vector::new(x, y))
    }
}

impl Deref for Position {
    type Target = Vector;
    fn deref(&self) -> &Vector {
        &self.0
    }
}

impl DerefMut for Position {
    fn deref_mut(&mut self) -> &mut Vector {
        &mut self.0
    }
}

/// Non-rotating point mass
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Body {
    pub vel: Vector,
    /// Replaces world gravity for this body when set.
    pub gravity: Option<Vector>,
    pub vx_max: Option<f64>,
    pub vy_max: Option<f64>,
    /// 0 = immovable.
    pub inv_mass: f64,
    pub restitution: f64,
    pub ground_drag: f64,
    pub mu: f64,
    pub linear_drag: f64,
    pub quad_drag: f64,
    /// Accumulated until the next step, then cleared.
    pub force: Vector,
    /// Accumulated until the next step, then cleared.
    pub impulse: Vector,
    /// Velocity right after force integration, for cosmetic consumers.
    #[serde(skip)]
    pub pre_vel: Vector,
}

impl Default for Body {
    fn default() -> Self {
        Self {
            vel: Vector::ZERO,
            gravity: None,
            vx_max: None,
            vy_max: None,
            inv_mass: 0.0,
            restitution: 1.0,
            ground_drag: 0.0,
            mu: 0.0,
            linear_drag: 0.0,
            quad_drag: 0.0,
            force: Vector::ZERO,
            impulse: Vector::ZERO,
            pre_vel: Vector::ZERO,
        }
    }
}

impl Body {
    /// Movable body with the given inverse mass.
    pub fn dynamic(inv_mass: f64) -> Self {
        Self { inv_mass, ..Self::default() }
    }

    /// Immovable body (infinite mass).
    pub fn fixed() -> Self {
        Self::default()
    }

    pub fn with_velocity(mut self, x: f64, y: f64) -> Self {
        self.vel = Vector::new(x, y);
        self
    }

    pub fn with_restitution(mut self, restitution: f64) -> Self {
        self.restitution = restitution.clamp(0.0, 1.0);
        self
    }

    pub fn with_friction(mut self, mu: f64) -> Self {
        self.mu = mu;
        self
    }

    #[inline]
    pub fn is_movable(&self) -> bool {
        self.inv_mass != 0.0
    }

    /// Add a force for the next step.
    pub fn apply_force(&mut self, force: Vector) {
        self.force += force;
    }

    /// Add an impulse for the next step.
    pub fn apply_impulse(&mut self, impulse: Vector) {
        self.impulse += impulse;
    }
}

/// Narrow-phase shape selector; the payload lives in [`Circle`] or [`Aabb`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    #[default]
    Circle,
    Aabb,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Collider {
    #[serde(rename = "type")]
    pub shape: ShapeKind,
    pub layer: u16,
    pub mask: u16,
}

impl Default for Collider {
    fn default() -> Self {
        Self { shape: ShapeKind::Circle, layer: 1, mask: u16::MAX }
    }
}

impl Collider {
    pub fn circle() -> Self {
        Self::default()
    }

    pub fn aabb() -> Self {
        Self { shape: ShapeKind::Aabb, ..Self::default() }
    }

    pub fn with_layers(mut self, layer: u16, mask: u16) -> Self {
        self.layer = layer;
        self.mask = mask;
        self
    }

    /// Both masks must accept the other's layer.
    #[inline]
    pub fn accepts(&self, other: &Collider) -> bool {
        (self.mask & other.layer) != 0 && (other.mask & self.layer) != 0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Circle {
    pub radius: f64,
}

impl Default for Circle {
    fn default() -> Self {
        Self { radius: 1.0 }
    }
}

/// Axis-aligned box, centered on the entity position
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Aabb {
    pub half_width: f64,
    pub half_height: f64,
}

impl Default for Aabb {
    fn default() -> Self {
        Self { half_width: 1.0, half_height: 1.0 }
    }
}

impl Aabb {
    pub fn new(half_width: f64, half_height: f64) -> Self {
        Self { half_width, half_height }
    }
}

/// Sleep state with hysteresis: `sleep_threshold` is a speed, compared
/// squared; `wake_threshold` is an impulse magnitude.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Sleep {
    pub is_sleeping: bool,
    pub sleep_timer: f64,
    pub time_to_sleep: f64,
    pub sleep_threshold: f64,
    pub wake_threshold: f64,
}

impl Default for Sleep {
    fn default() -> Self {
        Self {
            is_sleeping: false,
            sleep_timer: 0.0,
            time_to_sleep: 0.5,
            sleep_threshold: 0.05,
            wake_threshold: 0.007,
        }
    }
}

impl Sleep {
    #[inline]
    pub fn wake(&mut self) {
        self.is_sleeping = false;
        self.sleep_timer = 0.0;
    }

    /// Advance the timer with the squared speed observed this step.
    pub fn observe(&mut self, speed_squared: f64, dt: f64) {
        if speed_squared < self.sleep_threshold * self.sleep_threshold {
            self.sleep_timer += dt;
        } else {
            self.sleep_timer = 0.0;
        }

        if self.sleep_timer >= self.time_to_sleep {
            self.is_sleeping = true;
            self.sleep_timer = 0.0;
        }
    }
}

/// Members sharing the owner's [`Sleep`] record
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Group(pub BTreeSet<Entity>);

impl Group {
    pub fn new(members: impl IntoIterator<Item = Entity>) -> Self {
        Self(members.into_iter().collect())
    }
}

impl Deref for Group {
    type Target = BTreeSet<Entity>;
    fn deref(&self) -> &BTreeSet<Entity> {
        &self.0
    }
}

impl DerefMut for Group {
    fn deref_mut(&mut self) -> &mut BTreeSet<Entity> {
        &mut self.0
    }
}

/// Id of the entity owning this member's authoritative [`Sleep`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupRef(pub Entity);

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConstraintMode {
    /// Fixed distance.
    #[default]
    Rod,
    /// Maximum distance; slack when closer.
    Rope,
    /// Minimum distance; slack when farther.
    Buffer,
}

/// Distance constraint between two bodies, solved as a velocity bias
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Constraint {
    #[serde(default)]
    pub mode: ConstraintMode,
    pub a: Entity,
    pub b: Entity,
    #[serde(default = "one")]
    pub dist: f64,
    #[serde(default = "default_stiffness")]
    pub stiffness: f64,
    /// Unit a->b, refreshed every step.
    #[serde(default = "right")]
    pub normal: Vector,
    /// Current distance minus target, refreshed every step.
    #[serde(default)]
    pub error: f64,
    /// Accumulated impulse, carried across steps for warm starting.
    #[serde(default)]
    pub impulse: f64,
}

impl Constraint {
    pub fn new(mode: ConstraintMode, a: Entity, b: Entity, dist: f64) -> Self {
        Self {
            mode,
            a,
            b,
            dist,
            stiffness: default_stiffness(),
            normal: Vector::RIGHT,
            error: 0.0,
            impulse: 0.0,
        }
    }

    pub fn rod(a: Entity, b: Entity, dist: f64) -> Self {
        Self::new(ConstraintMode::Rod, a, b, dist)
    }

    pub fn rope(a: Entity, b: Entity, dist: f64) -> Self {
        Self::new(ConstraintMode::Rope, a, b, dist)
    }

    pub fn buffer(a: Entity, b: Entity, dist: f64) -> Self {
        Self::new(ConstraintMode::Buffer, a, b, dist)
    }

    pub fn with_stiffness(mut self, stiffness: f64) -> Self {
        self.stiffness = stiffness.clamp(0.0, 1.0);
        self
    }

    /// Whether the current error leaves this constraint inactive.
    #[inline]
    pub fn is_slack(&self) -> bool {
        match self.mode {
            ConstraintMode::Rod => false,
            ConstraintMode::Rope => self.error <= 0.0,
            ConstraintMode::Buffer => self.error >= 0.0,
        }
    }
}

/// Damped spring between two bodies, applied as a force every step
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Spring {
    pub a: Entity,
    pub b: Entity,
    /// Rest length.
    #[serde(default = "one")]
    pub length: f64,
    /// Spring constant.
    #[serde(default = "one")]
    pub spring: f64,
    #[serde(default)]
    pub damping: f64,
}

impl Spring {
    pub fn new(a: Entity, b: Entity, length: f64, spring: f64) -> Self {
        Self { a, b, length, spring, damping: 0.0 }
    }

    pub fn with_damping(mut self, damping: f64) -> Self {
        self.damping = damping;
        self
    }
}

fn one() -> f64 {
    1.0
}

fn default_stiffness() -> f64 {
    0.8
}

fn right() -> Vector {
    Vector::RIGHT
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_fills_defaults() {
        let body: Body = serde_json::from_str(r#"{ "invMass": 2.0, "mu": 0.3 }"#).unwrap();
        assert_eq!(body.inv_mass, 2.0);
        assert_eq!(body.mu, 0.3);
        assert_eq!(body.restitution, 1.0);
        assert!(body.gravity.is_none());

        let col: Collider = serde_json::from_str(r#"{ "type": "aabb", "layer": 2 }"#).unwrap();
        assert_eq!(col.shape, ShapeKind::Aabb);
        assert_eq!(col.mask, u16::MAX);
    }

    #[test]
    fn constraint_requires_endpoints() {
        assert!(serde_json::from_str::<Constraint>(r#"{ "mode": "rope" }"#).is_err());
        let c: Constraint = serde_json::from_str(r#"{ "mode": "rope", "a": 1, "b": 2 }"#).unwrap();
        assert_eq!(c.mode, ConstraintMode::Rope);
        assert_eq!(c.dist, 1.0);
        assert_eq!(c.stiffness, 0.8);
        assert_eq!(c.normal, Vector::RIGHT);
    }

    #[test]
    fn layer_filter_is_symmetric() {
        let a = Collider::circle().with_layers(0b01, 0b10);
        let b = Collider::circle().with_layers(0b10, 0b01);
        let c = Collider::circle().with_layers(0b10, 0b10);
        assert!(a.accepts(&b));
        assert!(b.accepts(&a));
        assert!(!a.accepts(&c));
        assert!(!c.accepts(&a));
    }

    #[test]
    fn sleep_observe_accumulates_and_resets() {
        let mut s = Sleep { time_to_sleep: 0.1, ..Sleep::default() };
        s.observe(0.0, 0.06);
        assert!(!s.is_sleeping);
        s.observe(1.0, 0.06);
        assert_eq!(s.sleep_timer, 0.0);
        s.observe(0.0, 0.06);
        s.observe(0.0, 0.06);
        assert!(s.is_sleeping);
        assert_eq!(s.sleep_timer, 0.0);
    }
}
