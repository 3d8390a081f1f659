//! Polygons with holes.

use super::{BoundingBox, Lines, Point, Polygon};
use crate::{Coord, CoordF};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A polygon with holes: one outer contour plus zero or more hole rings.
///
/// The contour is counter-clockwise, holes are clockwise, holes lie strictly
/// inside the contour and do not touch each other.
#[derive(Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExPolygon {
    pub contour: Polygon,
    pub holes: Vec<Polygon>,
}

impl ExPolygon {
    #[inline]
    pub fn new(contour: Polygon) -> Self {
        Self {
            contour,
            holes: Vec::new(),
        }
    }

    #[inline]
    pub fn with_holes(contour: Polygon, holes: Vec<Polygon>) -> Self {
        Self { contour, holes }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.contour.is_empty()
    }

    /// Contour area minus hole areas.
    pub fn area(&self) -> CoordF {
        let holes: CoordF = self.holes.iter().map(|h| h.area()).sum();
        self.contour.area() - holes
    }

    pub fn perimeter(&self) -> CoordF {
        let holes: CoordF = self.holes.iter().map(|h| h.perimeter()).sum();
        self.contour.perimeter() + holes
    }

    #[inline]
    pub fn bounding_box(&self) -> BoundingBox {
        self.contour.bounding_box()
    }

    #[inline]
    pub fn centroid(&self) -> Point {
        self.contour.centroid()
    }

    /// Inside the contour and outside every hole.
    pub fn contains_point(&self, p: &Point) -> bool {
        if !self.contour.contains_point(p) {
            return false;
        }
        !self.holes.iter().any(|hole| hole.contains_point(p))
    }

    /// Closest point on any boundary ring to `p`.
    pub fn closest_point(&self, p: &Point) -> Point {
        let mut closest = self.contour.closest_point(p);
        let mut min_dist = p.distance_squared(&closest);
        for hole in &self.holes {
            let candidate = hole.closest_point(p);
            let dist = p.distance_squared(&candidate);
            if dist < min_dist {
                min_dist = dist;
                closest = candidate;
            }
        }
        closest
    }

    /// Distance from `p` to the nearest boundary ring.
    pub fn distance_to_boundary(&self, p: &Point) -> CoordF {
        p.distance(&self.closest_point(p))
    }

    /// Force contour counter-clockwise and holes clockwise.
    pub fn make_canonical(&mut self) {
        self.contour.make_counter_clockwise();
        for hole in &mut self.holes {
            hole.make_clockwise();
        }
    }

    pub fn translate(&mut self, v: Point) {
        self.contour.translate(v);
        for hole in &mut self.holes {
            hole.translate(v);
        }
    }

    pub fn rotate_around(&mut self, angle: CoordF, center: Point) {
        self.contour.rotate_around(angle, center);
        for hole in &mut self.holes {
            hole.rotate_around(angle, center);
        }
    }

    /// Douglas-Peucker simplification of all rings; holes that collapse are
    /// dropped.
    pub fn simplify_dp(&self, tolerance: Coord) -> ExPolygon {
        let contour = self.contour.simplify_dp(tolerance);
        let holes = self
            .holes
            .iter()
            .map(|h| h.simplify_dp(tolerance))
            .filter(|h| h.len() >= 3)
            .collect();
        ExPolygon { contour, holes }
    }

    /// Boundary as directed segments: contour edges first, then each hole's
    /// edges in ring order. Segment indices produced here are the "source
    /// indices" the skeleton and field code exchange.
    pub fn boundary_lines(&self) -> Lines {
        let mut lines = self.contour.lines();
        for hole in &self.holes {
            lines.extend(hole.lines());
        }
        lines
    }

    /// For each boundary segment index, the index of the segment that
    /// continues it (sharing its `b` endpoint) within the same ring.
    pub fn boundary_successors(&self) -> Vec<usize> {
        let mut successors = Vec::with_capacity(self.contour.len());
        let mut start = 0;
        for ring_len in std::iter::once(self.contour.len()).chain(self.holes.iter().map(|h| h.len()))
        {
            for i in 0..ring_len {
                successors.push(start + (i + 1) % ring_len);
            }
            start += ring_len;
        }
        successors
    }

    /// Total number of vertices over all rings.
    pub fn point_count(&self) -> usize {
        self.contour.len() + self.holes.iter().map(|h| h.len()).sum::<usize>()
    }

    /// All rings as polygons, contour first.
    pub fn rings(&self) -> Vec<&Polygon> {
        let mut rings = Vec::with_capacity(1 + self.holes.len());
        rings.push(&self.contour);
        rings.extend(self.holes.iter());
        rings
    }

    pub fn is_valid(&self) -> bool {
        self.contour.len() >= 3 && self.holes.iter().all(|h| h.len() >= 3)
    }

    pub fn rectangle(min: Point, max: Point) -> Self {
        Self::new(Polygon::rectangle(min, max))
    }
}

impl fmt::Debug for ExPolygon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ExPolygon({} contour points, {} holes)",
            self.contour.len(),
            self.holes.len()
        )
    }
}

impl From<Polygon> for ExPolygon {
    fn from(polygon: Polygon) -> Self {
        Self::new(polygon)
    }
}

/// A collection of polygons with holes.
pub type ExPolygons = Vec<ExPolygon>;

#[cfg(test)]
mod tests {
    use super::*;

    fn square_with_hole() -> ExPolygon {
        let contour = Polygon::rectangle(Point::new(0, 0), Point::new(100, 100));
        let mut hole = Polygon::rectangle(Point::new(25, 25), Point::new(75, 75));
        hole.make_clockwise();
        ExPolygon::with_holes(contour, vec![hole])
    }

    #[test]
    fn test_area_subtracts_holes() {
        let ex = square_with_hole();
        assert!((ex.area() - 7500.0).abs() < 1.0);
    }

    #[test]
    fn test_contains_point() {
        let ex = square_with_hole();
        assert!(ex.contains_point(&Point::new(10, 10)));
        assert!(!ex.contains_point(&Point::new(50, 50))); // in the hole
        assert!(!ex.contains_point(&Point::new(-10, 50)));
    }

    #[test]
    fn test_boundary_lines_order() {
        let ex = square_with_hole();
        let lines = ex.boundary_lines();
        assert_eq!(lines.len(), 8);
        // contour edges come first
        assert_eq!(lines[0].a, Point::new(0, 0));
        // each ring is closed
        assert_eq!(lines[3].b, lines[0].a);
        assert_eq!(lines[7].b, lines[4].a);
    }

    #[test]
    fn test_boundary_successors_wrap_per_ring() {
        let ex = square_with_hole();
        let next = ex.boundary_successors();
        assert_eq!(next[0], 1);
        assert_eq!(next[3], 0); // contour wraps
        assert_eq!(next[4], 5);
        assert_eq!(next[7], 4); // hole wraps
    }

    #[test]
    fn test_closest_point_prefers_hole() {
        let ex = square_with_hole();
        let closest = ex.closest_point(&Point::new(50, 50));
        assert!((Point::new(50, 50).distance(&closest) - 25.0).abs() < 1.5);
    }

    #[test]
    fn test_simplify_drops_degenerate_holes() {
        let contour = Polygon::rectangle(Point::new(0, 0), Point::new(1000, 1000));
        let sliver = Polygon::from_points(vec![
            Point::new(500, 500),
            Point::new(600, 501),
            Point::new(700, 500),
            Point::new(600, 499),
        ]);
        let ex = ExPolygon::with_holes(contour, vec![sliver]);
        let simplified = ex.simplify_dp(10);
        assert!(simplified.holes.is_empty());
    }
}
