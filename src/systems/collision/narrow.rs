//! Narrow phase: exhaustive shape-pair tests
//!
//! Every test returns the normal pointing from the first shape towards the
//! second, and a non-negative penetration.

use crate::core::Vector;

/// Below this the circle's velocity is too small to pick a push-out axis.
const VELOCITY_EPSILON: f64 = 1e-5;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Shape {
    Circle { radius: f64 },
    Aabb { half_width: f64, half_height: f64 },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hit {
    pub normal: Vector,
    pub penetration: f64,
}

pub fn circle_circle(a: Vector, ra: f64, b: Vector, rb: f64) -> Option<Hit> {
    let d = b - a;
    let dist2 = d.length_squared();
    let r = ra + rb;
    if dist2 > r * r {
        return None;
    }
    let dist = dist2.sqrt();
    Some(Hit { normal: d.div(dist), penetration: r - dist })
}

/// Separating axis is the one with the smaller overlap; ties go to x.
pub fn aabb_aabb(a: Vector, ha: (f64, f64), b: Vector, hb: (f64, f64)) -> Option<Hit> {
    let dx = b.x - a.x;
    let px = ha.0 + hb.0 - dx.abs();
    if px < 0.0 {
        return None;
    }
    let dy = b.y - a.y;
    let py = ha.1 + hb.1 - dy.abs();
    if py < 0.0 {
        return None;
    }

    if px <= py {
        let normal = if dx < 0.0 { Vector::LEFT } else { Vector::RIGHT };
        Some(Hit { normal, penetration: px })
    } else {
        let normal = if dy < 0.0 { Vector::DOWN } else { Vector::UP };
        Some(Hit { normal, penetration: py })
    }
}

/// Circle at `c` against the box at `b`. When the circle center is inside the
/// box (or on its edge) there is no closest-point direction, so the normal
/// follows the circle's dominant velocity axis, falling back to the nearest
/// face, and the penetration pushes the whole circle out through that face.
pub fn circle_aabb(
    c: Vector,
    radius: f64,
    velocity: Option<Vector>,
    b: Vector,
    half: (f64, f64),
) -> Option<Hit> {
    let (min_x, max_x) = (b.x - half.0, b.x + half.0);
    let (min_y, max_y) = (b.y - half.1, b.y + half.1);

    let closest = Vector::new(c.x.max(min_x).min(max_x), c.y.max(min_y).min(max_y));
    let d = closest - c;
    let dist2 = d.length_squared();

    if dist2 > 0.0 {
        if dist2 > radius * radius {
            return None;
        }
        let dist = dist2.sqrt();
        return Some(Hit { normal: d.div(dist), penetration: radius - dist });
    }

    let normal = velocity
        .and_then(dominant_axis)
        .unwrap_or_else(|| nearest_face(c, b, half));

    let penetration = if normal == Vector::LEFT {
        radius + (c.x - min_x)
    } else if normal == Vector::RIGHT {
        radius + (max_x - c.x)
    } else if normal == Vector::DOWN {
        radius + (c.y - min_y)
    } else {
        radius + (max_y - c.y)
    };

    Some(Hit { normal, penetration })
}

fn dominant_axis(v: Vector) -> Option<Vector> {
    let (ax, ay) = (v.x.abs(), v.y.abs());
    if ax > ay {
        if ax > VELOCITY_EPSILON {
            return Some(if v.x > 0.0 { Vector::RIGHT } else { Vector::LEFT });
        }
    } else if ay > VELOCITY_EPSILON {
        return Some(if v.y > 0.0 { Vector::UP } else { Vector::DOWN });
    }
    None
}

fn nearest_face(c: Vector, b: Vector, half: (f64, f64)) -> Vector {
    let dx = c.x - b.x;
    let dy = c.y - b.y;
    let ox = half.0 - dx.abs();
    let oy = half.1 - dy.abs();
    if ox < oy {
        if dx > 0.0 { Vector::RIGHT } else { Vector::LEFT }
    } else if dy > 0.0 {
        Vector::UP
    } else {
        Vector::DOWN
    }
}
