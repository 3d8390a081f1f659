//! Closed polygon contours.

use super::{BoundingBox, Line, Lines, Point, Points};
use crate::{Coord, CoordF};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A closed polygon given by its vertex sequence.
///
/// The last point implicitly connects back to the first. Outer contours are
/// counter-clockwise (positive area), holes clockwise (negative area).
#[derive(Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Polygon {
    points: Points,
}

impl Polygon {
    #[inline]
    pub fn new() -> Self {
        Self { points: Vec::new() }
    }

    #[inline]
    pub fn from_points(points: Points) -> Self {
        Self { points }
    }

    #[inline]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    #[inline]
    pub fn push(&mut self, point: Point) {
        self.points.push(point);
    }

    /// Vertex at `index`, wrapping past the end.
    #[inline]
    pub fn point_at(&self, index: usize) -> Point {
        self.points[index % self.points.len()]
    }

    /// Edge from vertex `index` to its successor.
    #[inline]
    pub fn edge(&self, index: usize) -> Line {
        let len = self.points.len();
        Line::new(self.points[index % len], self.points[(index + 1) % len])
    }

    /// All edges in vertex order.
    pub fn lines(&self) -> Lines {
        if self.points.len() < 2 {
            return Vec::new();
        }
        (0..self.points.len()).map(|i| self.edge(i)).collect()
    }

    /// Signed area by the shoelace formula; positive for counter-clockwise.
    pub fn signed_area(&self) -> CoordF {
        if self.points.len() < 3 {
            return 0.0;
        }
        let mut sum: i128 = 0;
        for i in 0..self.points.len() {
            let j = (i + 1) % self.points.len();
            sum += self.points[i].x as i128 * self.points[j].y as i128;
            sum -= self.points[j].x as i128 * self.points[i].y as i128;
        }
        sum as CoordF / 2.0
    }

    #[inline]
    pub fn area(&self) -> CoordF {
        self.signed_area().abs()
    }

    #[inline]
    pub fn is_counter_clockwise(&self) -> bool {
        self.signed_area() > 0.0
    }

    #[inline]
    pub fn is_clockwise(&self) -> bool {
        self.signed_area() < 0.0
    }

    pub fn make_counter_clockwise(&mut self) {
        if self.is_clockwise() {
            self.reverse();
        }
    }

    pub fn make_clockwise(&mut self) {
        if self.is_counter_clockwise() {
            self.reverse();
        }
    }

    pub fn reverse(&mut self) {
        self.points.reverse();
    }

    pub fn perimeter(&self) -> CoordF {
        if self.points.len() < 2 {
            return 0.0;
        }
        (0..self.points.len()).map(|i| self.edge(i).length()).sum()
    }

    /// Area-weighted centroid; falls back to the vertex average for
    /// degenerate rings.
    pub fn centroid(&self) -> Point {
        if self.points.is_empty() {
            return Point::zero();
        }
        if self.points.len() < 3 {
            let sum_x: i128 = self.points.iter().map(|p| p.x as i128).sum();
            let sum_y: i128 = self.points.iter().map(|p| p.y as i128).sum();
            return Point::new(
                (sum_x / self.points.len() as i128) as Coord,
                (sum_y / self.points.len() as i128) as Coord,
            );
        }

        let mut cx: i128 = 0;
        let mut cy: i128 = 0;
        let mut area: i128 = 0;
        for i in 0..self.points.len() {
            let j = (i + 1) % self.points.len();
            let cross = self.points[i].x as i128 * self.points[j].y as i128
                - self.points[j].x as i128 * self.points[i].y as i128;
            cx += (self.points[i].x as i128 + self.points[j].x as i128) * cross;
            cy += (self.points[i].y as i128 + self.points[j].y as i128) * cross;
            area += cross;
        }
        if area == 0 {
            let sum_x: i128 = self.points.iter().map(|p| p.x as i128).sum();
            let sum_y: i128 = self.points.iter().map(|p| p.y as i128).sum();
            return Point::new(
                (sum_x / self.points.len() as i128) as Coord,
                (sum_y / self.points.len() as i128) as Coord,
            );
        }
        Point::new((cx / (3 * area)) as Coord, (cy / (3 * area)) as Coord)
    }

    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox::from_points(&self.points)
    }

    /// Ray-casting point-in-polygon test.
    pub fn contains_point(&self, p: &Point) -> bool {
        if self.points.len() < 3 {
            return false;
        }
        let mut inside = false;
        let mut j = self.points.len() - 1;
        for i in 0..self.points.len() {
            let pi = &self.points[i];
            let pj = &self.points[j];
            if ((pi.y > p.y) != (pj.y > p.y))
                && (p.x as i128)
                    < (pj.x as i128 - pi.x as i128) * (p.y as i128 - pi.y as i128)
                        / (pj.y as i128 - pi.y as i128)
                        + pi.x as i128
            {
                inside = !inside;
            }
            j = i;
        }
        inside
    }

    /// Closest point on the boundary to `p`.
    pub fn closest_point(&self, p: &Point) -> Point {
        if self.points.is_empty() {
            return Point::zero();
        }
        if self.points.len() == 1 {
            return self.points[0];
        }
        let mut closest = self.points[0];
        let mut min_dist = i128::MAX;
        for i in 0..self.points.len() {
            let proj = self.edge(i).project_point(p);
            let dist = p.distance_squared(&proj);
            if dist < min_dist {
                min_dist = dist;
                closest = proj;
            }
        }
        closest
    }

    /// Distance from `p` to the polygon boundary.
    pub fn distance_to_point(&self, p: &Point) -> CoordF {
        p.distance(&self.closest_point(p))
    }

    pub fn translate(&mut self, v: Point) {
        for p in &mut self.points {
            *p = *p + v;
        }
    }

    pub fn rotate(&mut self, angle: CoordF) {
        for p in &mut self.points {
            *p = p.rotate(angle);
        }
    }

    pub fn rotate_around(&mut self, angle: CoordF, center: Point) {
        for p in &mut self.points {
            *p = p.rotate_around(angle, center);
        }
    }

    /// Douglas-Peucker simplification with the given perpendicular
    /// tolerance.
    ///
    /// The ring is split at the vertex farthest from vertex 0 and both open
    /// chains are simplified independently, so the result is independent of
    /// collinear runs crossing the seam.
    pub fn simplify_dp(&self, tolerance: Coord) -> Polygon {
        if self.points.len() <= 3 {
            return self.clone();
        }
        let anchor = self
            .points
            .iter()
            .enumerate()
            .max_by_key(|(_, p)| self.points[0].distance_squared(p))
            .map(|(i, _)| i)
            .unwrap_or(0);
        if anchor == 0 {
            return self.clone();
        }

        let mut first: Points = self.points[0..=anchor].to_vec();
        let mut second: Points = self.points[anchor..].to_vec();
        second.push(self.points[0]);

        first = douglas_peucker(&first, tolerance as CoordF);
        second = douglas_peucker(&second, tolerance as CoordF);

        // drop the duplicated split vertex and the duplicated seam vertex
        let mut points = first;
        points.extend_from_slice(&second[1..second.len() - 1]);
        Polygon::from_points(points)
    }

    // ------------------------------------------------------------------
    // Shape constructors (test geometry and callers)
    // ------------------------------------------------------------------

    /// Axis-aligned rectangle spanning `min..max`, counter-clockwise.
    pub fn rectangle(min: Point, max: Point) -> Self {
        Self::from_points(vec![
            min,
            Point::new(max.x, min.y),
            max,
            Point::new(min.x, max.y),
        ])
    }

    /// Axis-aligned `width` × `height` rectangle centered on the origin.
    pub fn centered_rect(width: Coord, height: Coord) -> Self {
        Self::rectangle(
            Point::new(-width / 2, -height / 2),
            Point::new(width - width / 2, height - height / 2),
        )
    }

    /// Square with side `size` centered on the origin.
    pub fn centered_square(size: Coord) -> Self {
        Self::centered_rect(size, size)
    }

    /// Regular `segments`-gon approximating a circle.
    pub fn circle(center: Point, radius: Coord, segments: usize) -> Self {
        let mut points = Vec::with_capacity(segments);
        for i in 0..segments {
            let angle = 2.0 * std::f64::consts::PI * i as CoordF / segments as CoordF;
            points.push(Point::new(
                center.x + (radius as CoordF * angle.cos()).round() as Coord,
                center.y + (radius as CoordF * angle.sin()).round() as Coord,
            ));
        }
        Self::from_points(points)
    }

    /// Equilateral triangle with side `size`, centroid on the origin.
    pub fn equilateral_triangle(size: Coord) -> Self {
        let height = (size as CoordF * 3f64.sqrt() / 2.0).round() as Coord;
        Self::from_points(vec![
            Point::new(-size / 2, -height / 3),
            Point::new(size / 2, -height / 3),
            Point::new(0, 2 * height / 3),
        ])
    }

    /// Isosceles triangle with base `base` and height `height`, base
    /// centered below the origin.
    pub fn isosceles_triangle(base: Coord, height: Coord) -> Self {
        Self::from_points(vec![
            Point::new(-base / 2, -height / 3),
            Point::new(base / 2, -height / 3),
            Point::new(0, 2 * height / 3),
        ])
    }
}

/// Open-chain Douglas-Peucker; keeps both endpoints.
fn douglas_peucker(points: &[Point], tolerance: CoordF) -> Points {
    if points.len() < 3 {
        return points.to_vec();
    }
    let chord = Line::new(points[0], points[points.len() - 1]);
    let mut max_dist = 0.0;
    let mut max_index = 0;
    for (i, p) in points.iter().enumerate().skip(1).take(points.len() - 2) {
        let dist = if chord.a == chord.b {
            chord.a.distance(p)
        } else {
            chord.perp_distance_to(p)
        };
        if dist > max_dist {
            max_dist = dist;
            max_index = i;
        }
    }
    if max_dist <= tolerance {
        return vec![points[0], points[points.len() - 1]];
    }
    let mut left = douglas_peucker(&points[0..=max_index], tolerance);
    let right = douglas_peucker(&points[max_index..], tolerance);
    left.pop();
    left.extend(right);
    left
}

impl fmt::Debug for Polygon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Polygon({} points)", self.points.len())
    }
}

impl From<Points> for Polygon {
    fn from(points: Points) -> Self {
        Self::from_points(points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_square() -> Polygon {
        Polygon::rectangle(Point::new(0, 0), Point::new(100, 100))
    }

    #[test]
    fn test_area_and_orientation() {
        let sq = unit_square();
        assert!((sq.signed_area() - 10_000.0).abs() < 1e-9);
        assert!(sq.is_counter_clockwise());

        let mut cw = sq.clone();
        cw.reverse();
        assert!(cw.is_clockwise());
    }

    #[test]
    fn test_centroid() {
        let sq = unit_square();
        assert_eq!(sq.centroid(), Point::new(50, 50));
    }

    #[test]
    fn test_contains_point() {
        let sq = unit_square();
        assert!(sq.contains_point(&Point::new(50, 50)));
        assert!(!sq.contains_point(&Point::new(150, 50)));
        assert!(!sq.contains_point(&Point::new(-1, 50)));
    }

    #[test]
    fn test_closest_point() {
        let sq = unit_square();
        assert_eq!(sq.closest_point(&Point::new(50, -20)), Point::new(50, 0));
    }

    #[test]
    fn test_simplify_dp_removes_collinear() {
        let poly = Polygon::from_points(vec![
            Point::new(0, 0),
            Point::new(50, 0),
            Point::new(100, 0),
            Point::new(100, 100),
            Point::new(0, 100),
        ]);
        let simplified = poly.simplify_dp(1);
        assert_eq!(simplified.len(), 4);
        assert!((simplified.area() - poly.area()).abs() < 1.0);
    }

    #[test]
    fn test_simplify_dp_keeps_shape() {
        let circle = Polygon::circle(Point::zero(), 1_000_000, 64);
        let simplified = circle.simplify_dp(10_000);
        assert!(simplified.len() < 64);
        assert!(simplified.len() >= 8);
        // area stays within a few percent
        assert!((simplified.area() - circle.area()).abs() / circle.area() < 0.05);
    }

    #[test]
    fn test_equilateral_triangle_centroid() {
        let tri = Polygon::equilateral_triangle(3_000_000);
        let c = tri.centroid();
        assert!(c.x.abs() < 2_000);
        assert!(c.y.abs() < 2_000);
    }

    #[test]
    fn test_circle_area() {
        let r = 1_000_000i64;
        let circle = Polygon::circle(Point::zero(), r, 360);
        let expected = std::f64::consts::PI * (r as CoordF) * (r as CoordF);
        assert!((circle.area() - expected).abs() / expected < 0.01);
    }
}
