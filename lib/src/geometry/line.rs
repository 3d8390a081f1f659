//! Directed line segments.

use super::{Point, PointF};
use crate::{Coord, CoordF};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// A directed line segment from `a` to `b`.
///
/// Island boundaries are handed around as ordered `Lines`; the direction
/// matters (the island interior lies to the left of a counter-clockwise
/// contour segment).
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Line {
    pub a: Point,
    pub b: Point,
}

impl Line {
    #[inline]
    pub const fn new(a: Point, b: Point) -> Self {
        Self { a, b }
    }

    #[inline]
    pub fn length(&self) -> CoordF {
        self.a.distance(&self.b)
    }

    /// Direction vector `b - a`.
    #[inline]
    pub fn direction(&self) -> Point {
        self.b - self.a
    }

    /// Unit direction vector as floats.
    #[inline]
    pub fn direction_f(&self) -> PointF {
        (self.b.to_f64() - self.a.to_f64()).normalize()
    }

    #[inline]
    pub fn middle(&self) -> Point {
        Point::new(
            self.a.x / 2 + self.b.x / 2 + (self.a.x % 2 + self.b.x % 2) / 2,
            self.a.y / 2 + self.b.y / 2 + (self.a.y % 2 + self.b.y % 2) / 2,
        )
    }

    /// Point at parameter `t` ∈ [0, 1] along the segment.
    pub fn point_at(&self, t: CoordF) -> Point {
        Point::new(
            (self.a.x as CoordF + t * (self.b.x - self.a.x) as CoordF).round() as Coord,
            (self.a.y as CoordF + t * (self.b.y - self.a.y) as CoordF).round() as Coord,
        )
    }

    /// Closest point on the segment to `p`.
    #[inline]
    pub fn project_point(&self, p: &Point) -> Point {
        p.project_onto_segment(self.a, self.b)
    }

    /// Distance from `p` to the segment.
    #[inline]
    pub fn distance_to_point(&self, p: &Point) -> CoordF {
        p.distance(&self.project_point(p))
    }

    /// Unsigned distance from `p` to the infinite carrier line.
    pub fn perp_distance_to(&self, p: &Point) -> CoordF {
        let dir = self.direction();
        let len = dir.length();
        if len == 0.0 {
            return self.a.distance(p);
        }
        (dir.cross(&(*p - self.a)) as CoordF).abs() / len
    }

    /// True when `p` lies on the segment within `tolerance`.
    #[inline]
    pub fn contains_point(&self, p: &Point, tolerance: Coord) -> bool {
        self.distance_to_point(p) <= tolerance as CoordF
    }

    /// Scalar projection of `p` onto the segment direction, unclamped.
    ///
    /// Larger values are farther from `a` toward `b`; used to order several
    /// points lying on the same segment.
    pub fn param_along(&self, p: &Point) -> CoordF {
        let dir = self.direction();
        let len_sq = dir.dot(&dir);
        if len_sq == 0 {
            return 0.0;
        }
        (*p - self.a).dot(&dir) as CoordF / len_sq as CoordF
    }

    /// Ordering of two points along the segment from `a` toward `b`.
    pub fn cmp_along(&self, p: &Point, q: &Point) -> Ordering {
        self.param_along(p)
            .partial_cmp(&self.param_along(q))
            .unwrap_or(Ordering::Equal)
    }
}

impl fmt::Debug for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Line({:?} -> {:?})", self.a, self.b)
    }
}

/// A collection of directed line segments.
pub type Lines = Vec<Line>;
