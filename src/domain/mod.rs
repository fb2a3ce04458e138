//! Domain data: the component types the store holds.

pub mod components;

pub use components::{
    Aabb, Body, Circle, Collider, Constraint, ConstraintMode, Group, GroupRef, Position, ShapeKind,
    Sleep, Spring,
};
