//! Planar vector helpers shared by the topology algorithms.
//!
//! All coordinates are `[f64; 2]`. The engine is strictly planar;
//! documents carrying a third component have it dropped at load time.

pub mod intersect;
pub mod polygon;

use serde::{Deserialize, Serialize};

/// Default geometric tolerance: two points closer than this are the
/// same point. Always caller-overridable, since "same point" is
/// scale-dependent.
pub const EPSILON: f64 = 1e-6;

/// A 2D point or vector.
pub type Point = [f64; 2];

#[inline]
pub fn sub(a: Point, b: Point) -> Point {
    [a[0] - b[0], a[1] - b[1]]
}

#[inline]
pub fn add(a: Point, b: Point) -> Point {
    [a[0] + b[0], a[1] + b[1]]
}

#[inline]
pub fn scale(a: Point, s: f64) -> Point {
    [a[0] * s, a[1] * s]
}

/// 2D cross product (z-component of the 3D cross).
#[inline]
pub fn cross(a: Point, b: Point) -> f64 {
    a[0] * b[1] - a[1] * b[0]
}

#[inline]
pub fn dot(a: Point, b: Point) -> f64 {
    a[0] * b[0] + a[1] * b[1]
}

#[inline]
pub fn magnitude(a: Point) -> f64 {
    dot(a, a).sqrt()
}

#[inline]
pub fn distance(a: Point, b: Point) -> f64 {
    magnitude(sub(a, b))
}

/// Validate a caller-supplied tolerance.
pub fn check_epsilon(epsilon: f64) -> Result<f64, crate::graph_error::GraphError> {
    if epsilon.is_finite() && epsilon >= 0.0 {
        Ok(epsilon)
    } else {
        Err(crate::graph_error::GraphError::InvalidEpsilon(epsilon))
    }
}

/// Axis-aligned bounding rectangle of a point set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingRect {
    pub min: Point,
    pub max: Point,
}

impl BoundingRect {
    /// Smallest rectangle enclosing `points`; `None` when empty.
    pub fn from_points<'a, I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a Point>,
    {
        let mut iter = points.into_iter();
        let first = *iter.next()?;
        let mut rect = BoundingRect {
            min: first,
            max: first,
        };
        for p in iter {
            rect.min[0] = rect.min[0].min(p[0]);
            rect.min[1] = rect.min[1].min(p[1]);
            rect.max[0] = rect.max[0].max(p[0]);
            rect.max[1] = rect.max[1].max(p[1]);
        }
        Some(rect)
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.max[0] - self.min[0]
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.max[1] - self.min[1]
    }
}
