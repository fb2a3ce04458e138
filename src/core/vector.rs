//! Vector - 2D float vector for physics calculations
//!
//! Copy semantics: operators return new values, the `*_assign` operators and
//! `set` mutate in place.

use serde::{Deserialize, Serialize};

/// Divisors at or below this are treated as zero.
const EPSILON: f64 = 1e-12;

/// Result of dividing by a degenerate length.
const FALLBACK_NORMAL: Vector = Vector { x: 0.0, y: 1.0 };

/// 2D vector in world units
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vector {
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
}

impl Vector {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };
    pub const ONE: Self = Self { x: 1.0, y: 1.0 };
    pub const UP: Self = Self { x: 0.0, y: 1.0 };
    pub const DOWN: Self = Self { x: 0.0, y: -1.0 };
    pub const LEFT: Self = Self { x: -1.0, y: 0.0 };
    pub const RIGHT: Self = Self { x: 1.0, y: 0.0 };

    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn set(&mut self, x: f64, y: f64) -> &mut Self {
        self.x = x;
        self.y = y;
        self
    }

    /// Exactly (0, 0); no tolerance.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }

    #[inline]
    pub fn length_squared(&self) -> f64 {
        self.x * self.x + self.y * self.y
    }

    #[inline]
    pub fn length(&self) -> f64 {
        self.x.hypot(self.y)
    }

    #[inline]
    pub fn dot(&self, other: Vector) -> f64 {
        self.x * other.x + self.y * other.y
    }

    /// Clockwise perpendicular `(y, -x)`, the friction tangent for a normal.
    #[inline]
    pub fn tangent(&self) -> Self {
        Self { x: self.y, y: -self.x }
    }

    /// Divide by `scalar`, or return the fallback normal `(0, 1)` when the
    /// divisor is not meaningfully positive.
    #[inline]
    pub fn div(&self, scalar: f64) -> Self {
        if scalar > EPSILON {
            Self { x: self.x / scalar, y: self.y / scalar }
        } else {
            FALLBACK_NORMAL
        }
    }

    /// Unit vector in the same direction; `(0, 1)` for a degenerate length.
    #[inline]
    pub fn normalize(&self) -> Self {
        self.div(self.length())
    }
}

impl std::ops::Add for Vector {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self { x: self.x + rhs.x, y: self.y + rhs.y }
    }
}

impl std::ops::Sub for Vector {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self { x: self.x - rhs.x, y: self.y - rhs.y }
    }
}

impl std::ops::Mul<f64> for Vector {
    type Output = Self;
    #[inline]
    fn mul(self, rhs: f64) -> Self {
        Self { x: self.x * rhs, y: self.y * rhs }
    }
}

impl std::ops::Neg for Vector {
    type Output = Self;
    #[inline]
    fn neg(self) -> Self {
        Self { x: -self.x, y: -self.y }
    }
}

impl std::ops::AddAssign for Vector {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl std::ops::SubAssign for Vector {
    #[inline]
    fn sub_assign(&mut self, rhs: Self) {
        self.x -= rhs.x;
        self.y -= rhs.y;
    }
}

impl std::ops::MulAssign<f64> for Vector {
    #[inline]
    fn mul_assign(&mut self, rhs: f64) {
        self.x *= rhs;
        self.y *= rhs;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_unit_length() {
        let n = Vector::new(3.0, 4.0).normalize();
        assert!((n.x - 0.6).abs() < 1e-12);
        assert!((n.y - 0.8).abs() < 1e-12);
    }

    #[test]
    fn normalize_zero_falls_back_to_up() {
        assert_eq!(Vector::ZERO.normalize(), Vector::UP);
        assert_eq!(Vector::new(1.0, 1.0).div(0.0), Vector::UP);
        assert_eq!(Vector::new(1.0, 1.0).div(-2.0), Vector::UP);
    }

    #[test]
    fn in_place_ops_mutate() {
        let mut v = Vector::new(1.0, 2.0);
        v += Vector::ONE;
        v -= Vector::new(0.5, 0.5);
        v *= 2.0;
        assert_eq!(v, Vector::new(3.0, 5.0));
        v.set(0.0, 0.0);
        assert!(v.is_zero());
    }

    #[test]
    fn tangent_is_perpendicular() {
        let n = Vector::new(0.6, 0.8);
        assert_eq!(n.dot(n.tangent()), 0.0);
        assert_eq!(Vector::DOWN.tangent(), Vector::LEFT);
    }
}
