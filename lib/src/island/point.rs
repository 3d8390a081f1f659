//! Support points and their movement policies.
//!
//! Every sampled point carries a [`Placement`] describing how far the
//! alignment step may move it. Shared restriction data (the inner inset
//! polygons, the outline segment sequences) is stored once in
//! [`SupportPoints`] and referenced by index, so cloning a point stays
//! cheap and merging point sets cannot dangle.

use super::skeleton::{EdgeId, SkeletonGraph};
use crate::geometry::{ExPolygon, Line, Lines, Point};
use crate::{Coord, CoordF};
use serde::{Deserialize, Serialize};

/// Why a support point exists; preserved in the output for callers and
/// tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SupportPointKind {
    /// Single point covering a tiny island, at the bounding-box center.
    OneBbCenter,
    /// Single point at the middle of a short skeleton.
    OneCenter,
    /// One of two stretched points on a short, thin island.
    TwoPoints,
    /// Fallback pair when part sampling produced too few points.
    TwoPointsBackup,
    /// Thin-part point at a part end.
    ThinPart,
    /// Thin-part point along the skeleton.
    ThinPartChange,
    /// Thin-part point closing a skeleton cycle.
    ThinPartLoop,
    /// Thick-part point on the inset outline.
    ThickOutline,
    /// Thick-part point on the interior grid.
    ThickInner,
}

/// Movement restriction applied during alignment.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Placement {
    /// Never moves.
    #[default]
    Fixed,
    /// Slides along one skeleton edge.
    Skeleton { edge: EdgeId },
    /// Slides along a sequence of inset outline segments, at most
    /// `max_align_distance` of arc length away from its origin.
    Outline {
        restriction: usize,
        origin_arc: CoordF,
    },
    /// Moves freely inside one inset polygon.
    Inner { inner: usize },
}

/// A support point of one island.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupportPoint {
    pub position: Point,
    pub kind: SupportPointKind,
    #[serde(skip)]
    pub(crate) placement: Placement,
}

impl SupportPoint {
    pub fn fixed(position: Point, kind: SupportPointKind) -> Self {
        Self {
            position,
            kind,
            placement: Placement::Fixed,
        }
    }

    #[inline]
    pub fn can_move(&self) -> bool {
        self.placement != Placement::Fixed
    }
}

/// A run of inset outline segments one or more [`SupportPoint`]s slide
/// along.
#[derive(Debug, Clone)]
pub struct OutlineRestriction {
    pub lines: Lines,
    /// Prefix sums: `arc_start[i]` is the arc length before `lines[i]`.
    arc_start: Vec<CoordF>,
    pub total_length: CoordF,
    /// Closed ring: sliding wraps around.
    pub cyclic: bool,
    pub max_align_distance: Coord,
}

impl OutlineRestriction {
    pub fn new(lines: Lines, cyclic: bool, max_align_distance: Coord) -> Self {
        let mut arc_start = Vec::with_capacity(lines.len());
        let mut total_length = 0.0;
        for line in &lines {
            arc_start.push(total_length);
            total_length += line.length();
        }
        Self {
            lines,
            arc_start,
            total_length,
            cyclic,
            max_align_distance,
        }
    }

    /// Arc-length coordinate of a parameter position on one segment.
    pub fn arc_at(&self, line: usize, ratio: CoordF) -> CoordF {
        self.arc_start[line] + ratio * self.lines[line].length()
    }

    /// Point at a given arc-length coordinate.
    pub fn point_at_arc(&self, arc: CoordF) -> Point {
        let arc = if self.cyclic {
            arc.rem_euclid(self.total_length.max(1.0))
        } else {
            arc.clamp(0.0, self.total_length)
        };
        for (i, line) in self.lines.iter().enumerate() {
            let length = line.length();
            if arc <= self.arc_start[i] + length || i + 1 == self.lines.len() {
                let t = if length > 0.0 {
                    ((arc - self.arc_start[i]) / length).clamp(0.0, 1.0)
                } else {
                    0.0
                };
                return line.point_at(t);
            }
        }
        self.lines[0].a
    }

    /// Arc distance between two arc coordinates, respecting wrap-around.
    fn arc_distance(&self, a: CoordF, b: CoordF) -> CoordF {
        let direct = (a - b).abs();
        if self.cyclic {
            direct.min(self.total_length - direct)
        } else {
            direct
        }
    }

    /// Closest point to `target` on the restriction, no farther than
    /// `max_align_distance` of arc length from `origin_arc`.
    fn constrained_closest(&self, target: &Point, origin_arc: CoordF) -> Point {
        let budget = self.max_align_distance as CoordF;
        let mut best = self.point_at_arc(origin_arc);
        let mut best_dist = target.distance(&best);
        for (i, line) in self.lines.iter().enumerate() {
            let projected = line.project_point(target);
            let arc = self.arc_at(i, line.param_along(&projected).clamp(0.0, 1.0));
            let candidate = if self.arc_distance(arc, origin_arc) <= budget {
                projected
            } else {
                // clamp to the admissible arc interval end nearest the
                // projection
                let forward = self.point_at_arc(origin_arc + budget);
                let backward = self.point_at_arc(origin_arc - budget);
                if target.distance(&forward) < target.distance(&backward) {
                    forward
                } else {
                    backward
                }
            };
            let dist = target.distance(&candidate);
            if dist < best_dist {
                best_dist = dist;
                best = candidate;
            }
        }
        best
    }
}

/// Support point set of one island plus the shared restriction stores.
#[derive(Debug, Clone, Default)]
pub struct SupportPoints {
    pub points: Vec<SupportPoint>,
    pub outlines: Vec<OutlineRestriction>,
    pub inners: Vec<ExPolygon>,
}

impl SupportPoints {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn push_fixed(&mut self, position: Point, kind: SupportPointKind) {
        self.points.push(SupportPoint::fixed(position, kind));
    }

    pub fn push_skeleton(&mut self, position: Point, edge: EdgeId, kind: SupportPointKind) {
        self.points.push(SupportPoint {
            position,
            kind,
            placement: Placement::Skeleton { edge },
        });
    }

    /// Register an outline restriction; returns its index for
    /// [`Self::push_outline`].
    pub fn add_outline_restriction(&mut self, restriction: OutlineRestriction) -> usize {
        self.outlines.push(restriction);
        self.outlines.len() - 1
    }

    pub fn push_outline(&mut self, restriction: usize, line: usize, ratio: CoordF) {
        let r = &self.outlines[restriction];
        let position = r.lines[line].point_at(ratio);
        let origin_arc = r.arc_at(line, ratio);
        self.points.push(SupportPoint {
            position,
            kind: SupportPointKind::ThickOutline,
            placement: Placement::Outline {
                restriction,
                origin_arc,
            },
        });
    }

    /// Register an inner polygon; returns its index for
    /// [`Self::push_inner`].
    pub fn add_inner_polygon(&mut self, inner: ExPolygon) -> usize {
        self.inners.push(inner);
        self.inners.len() - 1
    }

    pub fn push_inner(&mut self, position: Point, inner: usize) {
        self.points.push(SupportPoint {
            position,
            kind: SupportPointKind::ThickInner,
            placement: Placement::Inner { inner },
        });
    }

    /// Move point `index` toward `target` under its placement restriction;
    /// returns the displacement actually applied.
    pub fn move_point(
        &mut self,
        index: usize,
        target: Point,
        graph: Option<&SkeletonGraph>,
    ) -> Coord {
        let point = &self.points[index];
        let new_position = match &point.placement {
            Placement::Fixed => return 0,
            Placement::Skeleton { edge } => match graph {
                Some(graph) => {
                    let e = graph.edge(*edge);
                    let line = Line::new(graph.node(e.from).point, graph.node(e.to).point);
                    line.project_point(&target)
                }
                None => return 0,
            },
            Placement::Outline {
                restriction,
                origin_arc,
            } => self.outlines[*restriction].constrained_closest(&target, *origin_arc),
            Placement::Inner { inner } => {
                let polygon = &self.inners[*inner];
                if polygon.contains_point(&target) {
                    target
                } else {
                    polygon.closest_point(&target)
                }
            }
        };
        let moved = new_position.distance(&self.points[index].position).round() as Coord;
        self.points[index].position = new_position;
        moved
    }

    /// Current positions of all points.
    pub fn positions(&self) -> Vec<Point> {
        self.points.iter().map(|p| p.position).collect()
    }

    pub fn into_points(self) -> Vec<SupportPoint> {
        self.points
    }

    pub fn append(&mut self, mut other: SupportPoints) {
        let outline_offset = self.outlines.len();
        let inner_offset = self.inners.len();
        self.outlines.append(&mut other.outlines);
        self.inners.append(&mut other.inners);
        for mut point in other.points {
            match &mut point.placement {
                Placement::Outline { restriction, .. } => *restriction += outline_offset,
                Placement::Inner { inner } => *inner += inner_offset,
                _ => {}
            }
            self.points.push(point);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Polygon;

    fn straight_restriction() -> OutlineRestriction {
        let lines = vec![
            Line::new(Point::new(0, 0), Point::new(100, 0)),
            Line::new(Point::new(100, 0), Point::new(200, 0)),
        ];
        OutlineRestriction::new(lines, false, 50)
    }

    #[test]
    fn test_fixed_point_does_not_move() {
        let mut set = SupportPoints::new();
        set.push_fixed(Point::new(10, 10), SupportPointKind::OneCenter);
        let moved = set.move_point(0, Point::new(500, 500), None);
        assert_eq!(moved, 0);
        assert_eq!(set.points[0].position, Point::new(10, 10));
    }

    #[test]
    fn test_outline_point_slides_within_budget() {
        let mut set = SupportPoints::new();
        let r = set.add_outline_restriction(straight_restriction());
        set.push_outline(r, 0, 0.5); // at (50, 0), arc 50
        let moved = set.move_point(0, Point::new(80, 40), None);
        assert!(moved > 0);
        assert_eq!(set.points[0].position, Point::new(80, 0));
    }

    #[test]
    fn test_outline_point_clamps_to_budget() {
        let mut set = SupportPoints::new();
        let r = set.add_outline_restriction(straight_restriction());
        set.push_outline(r, 0, 0.5); // arc 50, budget 50 -> reachable arc 0..100
        set.move_point(0, Point::new(190, 10), None);
        assert_eq!(set.points[0].position, Point::new(100, 0));
    }

    #[test]
    fn test_cyclic_restriction_wraps() {
        let square = Polygon::rectangle(Point::new(0, 0), Point::new(100, 100));
        let r = OutlineRestriction::new(square.lines(), true, 150);
        // arc 0 is (0,0); wrapping backwards reaches the left edge
        let p = r.point_at_arc(-30.0);
        assert_eq!(p, Point::new(0, 30));
    }

    #[test]
    fn test_inner_point_stays_inside() {
        let mut set = SupportPoints::new();
        let polygon = ExPolygon::rectangle(Point::new(0, 0), Point::new(100, 100));
        let idx = set.add_inner_polygon(polygon);
        set.push_inner(Point::new(50, 50), idx);

        // target inside: move exactly there
        set.move_point(0, Point::new(70, 20), None);
        assert_eq!(set.points[0].position, Point::new(70, 20));

        // target outside: clamp to the boundary
        set.move_point(0, Point::new(200, 50), None);
        assert_eq!(set.points[0].position, Point::new(100, 50));
    }

    #[test]
    fn test_append_rewires_indices() {
        let mut a = SupportPoints::new();
        let ia = a.add_inner_polygon(ExPolygon::rectangle(Point::new(0, 0), Point::new(10, 10)));
        a.push_inner(Point::new(5, 5), ia);

        let mut b = SupportPoints::new();
        let ib = b.add_inner_polygon(ExPolygon::rectangle(
            Point::new(100, 100),
            Point::new(200, 200),
        ));
        b.push_inner(Point::new(150, 150), ib);

        a.append(b);
        assert_eq!(a.inners.len(), 2);
        match &a.points[1].placement {
            Placement::Inner { inner } => assert_eq!(*inner, 1),
            other => panic!("unexpected placement {other:?}"),
        }
    }
}
