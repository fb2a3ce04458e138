//! World edges
//!
//! The world is the rectangle `[0, width] x [0, height]` with y pointing up.
//! Each edge is enabled independently and reports contacts with a fixed
//! world-axis normal pointing out of the world.

use serde::{Deserialize, Serialize};

use crate::core::Vector;

use super::narrow::Shape;

/// Bit set of enabled world edges
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Boundary(pub u8);

impl Boundary {
    pub const NONE: Self = Self(0);
    pub const FLOOR: Self = Self(1 << 0);
    pub const CEILING: Self = Self(1 << 1);
    pub const LEFT: Self = Self(1 << 2);
    pub const RIGHT: Self = Self(1 << 3);
    pub const ALL: Self = Self((1 << 4) - 1);

    #[inline]
    pub fn contains(self, other: Boundary) -> bool {
        self.0 & other.0 == other.0 && other.0 != 0
    }
}

impl Default for Boundary {
    fn default() -> Self {
        Self::ALL
    }
}

impl std::ops::BitOr for Boundary {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// Which edge a boundary contact is against
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoundaryTag {
    Floor,
    Ceiling,
    Left,
    Right,
}

impl BoundaryTag {
    pub const ALL: [BoundaryTag; 4] =
        [BoundaryTag::Floor, BoundaryTag::Ceiling, BoundaryTag::Left, BoundaryTag::Right];

    pub fn flag(self) -> Boundary {
        match self {
            BoundaryTag::Floor => Boundary::FLOOR,
            BoundaryTag::Ceiling => Boundary::CEILING,
            BoundaryTag::Left => Boundary::LEFT,
            BoundaryTag::Right => Boundary::RIGHT,
        }
    }

    pub fn normal(self) -> Vector {
        match self {
            BoundaryTag::Floor => Vector::DOWN,
            BoundaryTag::Ceiling => Vector::UP,
            BoundaryTag::Left => Vector::LEFT,
            BoundaryTag::Right => Vector::RIGHT,
        }
    }
}

/// Size of the simulated rectangle, supplied by the caller each step
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct WorldBounds {
    pub width: f64,
    pub height: f64,
}

impl Default for WorldBounds {
    fn default() -> Self {
        Self { width: 1.0, height: 1.0 }
    }
}

impl WorldBounds {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Signed depth past `tag`'s edge; contact when `>= 0`.
pub(super) fn penetration(tag: BoundaryTag, pos: Vector, shape: Shape, bounds: WorldBounds) -> f64 {
    let (hw, hh) = match shape {
        Shape::Circle { radius } => (radius, radius),
        Shape::Aabb { half_width, half_height } => (half_width, half_height),
    };
    match tag {
        BoundaryTag::Floor => hh - pos.y,
        BoundaryTag::Ceiling => pos.y + hh - bounds.height,
        BoundaryTag::Left => hw - pos.x,
        BoundaryTag::Right => pos.x + hw - bounds.width,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_combine() {
        let b = Boundary::FLOOR | Boundary::LEFT;
        assert!(b.contains(Boundary::FLOOR));
        assert!(!b.contains(Boundary::CEILING));
        assert!(Boundary::ALL.contains(Boundary::RIGHT));
        assert!(!Boundary::ALL.contains(Boundary::NONE));
    }

    #[test]
    fn circle_and_box_edges() {
        let bounds = WorldBounds::new(10.0, 10.0);
        let circle = Shape::Circle { radius: 1.0 };
        assert_eq!(penetration(BoundaryTag::Floor, Vector::new(5.0, 0.5), circle, bounds), 0.5);
        assert_eq!(penetration(BoundaryTag::Ceiling, Vector::new(5.0, 9.5), circle, bounds), 0.5);

        let boxed = Shape::Aabb { half_width: 2.0, half_height: 1.0 };
        assert_eq!(penetration(BoundaryTag::Left, Vector::new(1.5, 5.0), boxed, bounds), 0.5);
        assert_eq!(penetration(BoundaryTag::Right, Vector::new(5.0, 5.0), boxed, bounds), -3.0);
    }
}
