//! Lloyd-style alignment of sampled support points.
//!
//! Each sweep builds the Voronoi cells of the current point set (capped to
//! a square of the largest configured spacing so border cells stay
//! bounded), clips every movable point's cell to the island and moves the
//! point toward the centroid of its clipped cell under the point's own
//! movement restriction. Sweeps repeat until the largest move drops below
//! `minimal_move` or the iteration budget runs out; non-convergence is not
//! an error, the partially relaxed set is returned.

use super::config::SampleConfig;
use super::point::SupportPoints;
use super::skeleton::SkeletonGraph;
use crate::clipper;
use crate::geometry::{Point, PointF, Polygon};
use crate::{Coord, CoordF};

/// Relax the point set in place.
pub fn align_samples(
    points: &mut SupportPoints,
    island: &crate::geometry::ExPolygon,
    config: &SampleConfig,
    graph: Option<&SkeletonGraph>,
) {
    if points.len() <= 1 {
        return;
    }
    if !points.points.iter().any(|p| p.can_move()) {
        return;
    }
    for _ in 0..config.count_iteration {
        let max_move = align_once(points, island, config, graph);
        if max_move < config.minimal_move {
            break;
        }
    }
}

/// One alignment sweep; returns the largest displacement it applied.
pub fn align_once(
    points: &mut SupportPoints,
    island: &crate::geometry::ExPolygon,
    config: &SampleConfig,
    graph: Option<&SkeletonGraph>,
) -> Coord {
    let positions = points.positions();
    let cells = voronoi_cell_polygons(&positions, config.max_distance());

    let mut max_move = 0;
    for index in 0..points.len() {
        if !points.points[index].can_move() {
            continue;
        }
        let cell = &cells[index];
        if cell.len() < 3 {
            continue;
        }
        let pieces = clipper::intersection_with_polygon(cell, island);
        let piece = if pieces.len() == 1 {
            pieces.first()
        } else {
            pieces
                .iter()
                .find(|piece| piece.contains_point(&positions[index]))
        };
        let Some(piece) = piece else {
            continue;
        };
        let target = piece.contour.centroid();
        let moved = points.move_point(index, target, graph);
        max_move = max_move.max(moved);
    }

    move_duplicate_positions(points, &positions, graph);
    max_move
}

/// Separate points that ended a sweep on identical positions by walking
/// the later one halfway back toward its pre-sweep position.
fn move_duplicate_positions(
    points: &mut SupportPoints,
    previous: &[Point],
    graph: Option<&SkeletonGraph>,
) {
    loop {
        let mut order: Vec<usize> = (0..points.len()).collect();
        order.sort_by_key(|&i| points.points[i].position);
        let duplicate = order.windows(2).find_map(|pair| {
            (points.points[pair[0]].position == points.points[pair[1]].position)
                .then_some(pair[1])
        });
        let Some(duplicate) = duplicate else {
            return;
        };
        let current = points.points[duplicate].position;
        let halfway = Point::new(
            (previous[duplicate].x + current.x) / 2,
            (previous[duplicate].y + current.y) / 2,
        );
        if points.move_point(duplicate, halfway, graph) == 0 {
            return; // both points immovable at this position
        }
    }
}

/// Bounded Voronoi cells of a point set.
///
/// Every cell starts as a square of half-size `max_distance` around its
/// point and is clipped against the perpendicular bisector toward every
/// other point in range, which is exact within the capped domain.
pub fn voronoi_cell_polygons(positions: &[Point], max_distance: Coord) -> Vec<Polygon> {
    let reach = 2.0 * std::f64::consts::SQRT_2 * max_distance as CoordF;
    let reach_sq = (reach * reach) as i128;
    positions
        .iter()
        .enumerate()
        .map(|(i, &p)| {
            let m = max_distance as CoordF;
            let center = PointF::new(p.x as CoordF, p.y as CoordF);
            let mut cell = vec![
                PointF::new(center.x - m, center.y - m),
                PointF::new(center.x + m, center.y - m),
                PointF::new(center.x + m, center.y + m),
                PointF::new(center.x - m, center.y + m),
            ];
            for (j, &q) in positions.iter().enumerate() {
                if i == j || p == q || p.distance_squared(&q) > reach_sq {
                    continue;
                }
                let qf = PointF::new(q.x as CoordF, q.y as CoordF);
                let mid = (center + qf) * 0.5;
                let normal = qf - center;
                cell = clip_half_plane(&cell, mid, normal);
                if cell.len() < 3 {
                    break;
                }
            }
            Polygon::from_points(
                cell.iter()
                    .map(|v| Point::new(v.x.round() as Coord, v.y.round() as Coord))
                    .collect(),
            )
        })
        .collect()
}

/// Keep the part of a convex polygon with `normal · (x - origin) <= 0`.
fn clip_half_plane(polygon: &[PointF], origin: PointF, normal: PointF) -> Vec<PointF> {
    let mut result = Vec::with_capacity(polygon.len() + 1);
    let side = |p: &PointF| normal.dot(&(*p - origin));
    for k in 0..polygon.len() {
        let current = polygon[k];
        let next = polygon[(k + 1) % polygon.len()];
        let side_current = side(&current);
        let side_next = side(&next);
        if side_current <= 0.0 {
            result.push(current);
        }
        if (side_current < 0.0 && side_next > 0.0) || (side_current > 0.0 && side_next < 0.0) {
            let t = side_current / (side_current - side_next);
            result.push(current + (next - current) * t);
        }
    }
    result
}
