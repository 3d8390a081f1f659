//! Skeleton construction from the island boundary.
//!
//! The medial skeleton is the Voronoi diagram of the boundary segments
//! restricted to the island interior. It is approximated here by sampling
//! the boundary densely, Delaunay-triangulating the samples and taking the
//! dual: triangle circumcenters become skeleton nodes, and the dual of a
//! Delaunay edge becomes a skeleton edge when it lies inside the island
//! and does not merely separate two consecutive boundary samples.
//!
//! Each node keeps its clearance radius (distance to the nearest boundary
//! sample). Radii below twice the sampling step are clamped to zero so
//! that branches running into convex corners regain the exact diagram's
//! `min_width == 0` contour contact the traversals key on.

use super::error::SampleError;
use super::skeleton::{NodeId, SkeletonGraph};
use crate::geometry::{ExPolygon, Line, Lines, Point};
use crate::{Coord, CoordF};
use spade::{DelaunayTriangulation, Point2, Triangulation};
use std::collections::{HashMap, HashSet};

/// One boundary sample with the segment it came from.
struct Sample {
    point: Point,
    line: usize,
}

/// Half-open sample index range of one boundary ring.
type RingSpan = (usize, usize);

fn sample_boundary(
    island: &ExPolygon,
    lines: &Lines,
    step: Coord,
) -> (Vec<Sample>, Vec<RingSpan>) {
    let mut samples = Vec::new();
    let mut spans = Vec::new();
    let mut line_index = 0;
    for ring in island.rings() {
        let ring_start = samples.len();
        for _ in 0..ring.len() {
            let line: &Line = &lines[line_index];
            let length = line.length();
            let count = ((length / step as CoordF).ceil() as usize).max(1);
            for j in 0..count {
                let t = j as CoordF / count as CoordF;
                samples.push(Sample {
                    point: line.point_at(t),
                    line: line_index,
                });
            }
            line_index += 1;
        }
        spans.push((ring_start, samples.len()));
    }
    (samples, spans)
}

/// Consecutive samples of the same ring (including the wrap pair).
fn is_boundary_adjacent(spans: &[RingSpan], a: usize, b: usize) -> bool {
    let (lo, hi) = if a < b { (a, b) } else { (b, a) };
    for &(start, end) in spans {
        if lo >= start && hi < end {
            return hi - lo == 1 || (lo == start && hi == end - 1);
        }
    }
    false
}

/// Build the skeleton graph of `island`.
///
/// `lines` must be `island.boundary_lines()`; skeleton edges carry indices
/// into it. Fails when the boundary is degenerate or when no Voronoi edge
/// survives inside the island.
pub fn build_skeleton(
    island: &ExPolygon,
    lines: &Lines,
    sample_step: Coord,
) -> Result<SkeletonGraph, SampleError> {
    if lines.len() < 3 {
        return Err(SampleError::GeometryInput(format!(
            "boundary has only {} segments",
            lines.len()
        )));
    }
    if lines.iter().any(|l| l.a == l.b) {
        return Err(SampleError::GeometryInput(
            "boundary contains a zero-length segment".into(),
        ));
    }
    let step = sample_step.max(1);
    let width_zero_tolerance = 2 * step;

    let (samples, spans) = sample_boundary(island, lines, step);
    if samples.len() < 3 {
        return Err(SampleError::GeometryInput(
            "boundary produced fewer than three samples".into(),
        ));
    }

    // triangulate; sample identity is recovered through the exact integer
    // coordinates
    let mut triangulation: DelaunayTriangulation<Point2<f64>> = DelaunayTriangulation::new();
    let mut sample_by_key: HashMap<(Coord, Coord), usize> = HashMap::new();
    for (index, sample) in samples.iter().enumerate() {
        let key = (sample.point.x, sample.point.y);
        if sample_by_key.contains_key(&key) {
            continue; // repeated vertex, first occurrence wins
        }
        sample_by_key.insert(key, index);
        triangulation
            .insert(Point2::new(sample.point.x as f64, sample.point.y as f64))
            .map_err(|_| SampleError::GeometryInput("unrepresentable boundary sample".into()))?;
    }

    // circumcenters of faces inside the island become candidate nodes;
    // coincident centers merge and keep their smallest clearance
    let mut graph = SkeletonGraph::new();
    let mut node_by_key: HashMap<(Coord, Coord), NodeId> = HashMap::new();
    let mut node_radius: Vec<CoordF> = Vec::new();
    let mut face_node: HashMap<usize, NodeId> = HashMap::new();
    for face in triangulation.inner_faces() {
        let center = face.circumcenter();
        if !center.x.is_finite() || !center.y.is_finite() {
            continue;
        }
        let point = Point::new(center.x.round() as Coord, center.y.round() as Coord);
        if !island.contains_point(&point) {
            continue;
        }
        let vertex = face.vertices()[0].position();
        let radius =
            ((center.x - vertex.x).powi(2) + (center.y - vertex.y).powi(2)).sqrt();
        let key = (point.x, point.y);
        let node = match node_by_key.get(&key) {
            Some(&node) => {
                node_radius[node] = node_radius[node].min(radius);
                node
            }
            None => {
                let node = graph.add_node(point);
                node_by_key.insert(key, node);
                node_radius.push(radius);
                node
            }
        };
        face_node.insert(face.index(), node);
    }

    // dual edges between adjacent inside faces
    struct DualEdge {
        from: NodeId,
        to: NodeId,
        line_a: usize,
        line_b: usize,
        sample_a: Point,
    }
    let mut dual_edges: Vec<DualEdge> = Vec::new();
    let mut seen_pairs: HashSet<(NodeId, NodeId)> = HashSet::new();
    for edge in triangulation.undirected_edges() {
        let [va, vb] = edge.vertices();
        let key_a = (va.position().x as Coord, va.position().y as Coord);
        let key_b = (vb.position().x as Coord, vb.position().y as Coord);
        let (Some(&sa), Some(&sb)) = (sample_by_key.get(&key_a), sample_by_key.get(&key_b))
        else {
            continue;
        };
        if is_boundary_adjacent(&spans, sa, sb) {
            continue;
        }
        let directed = edge.as_directed();
        let face_1 = directed.face();
        let face_2 = directed.rev().face();
        if face_1.is_outer() || face_2.is_outer() {
            continue;
        }
        let (Some(&n1), Some(&n2)) = (
            face_node.get(&face_1.index()),
            face_node.get(&face_2.index()),
        ) else {
            continue;
        };
        if n1 == n2 {
            continue;
        }
        let pair = (n1.min(n2), n1.max(n2));
        if !seen_pairs.insert(pair) {
            continue;
        }
        dual_edges.push(DualEdge {
            from: n1,
            to: n2,
            line_a: samples[sa].line,
            line_b: samples[sb].line,
            sample_a: samples[sa].point,
        });
    }
    if dual_edges.is_empty() {
        return Err(SampleError::VoronoiConstruction);
    }

    let width_of = |node: NodeId| -> Coord {
        let width = (2.0 * node_radius[node]).round() as Coord;
        if width <= width_zero_tolerance {
            0
        } else {
            width
        }
    };

    // connect candidates; sides of the travel direction pick the left and
    // right source segments
    for dual in &dual_edges {
        let u = graph.node(dual.from).point;
        let v = graph.node(dual.to).point;
        let a_is_left = (v - u).cross(&(dual.sample_a - u)) > 0;
        let (left, right) = if a_is_left {
            (dual.line_a, dual.line_b)
        } else {
            (dual.line_b, dual.line_a)
        };
        graph.add_edge_pair(
            dual.from,
            dual.to,
            width_of(dual.from),
            width_of(dual.to),
            left,
            right,
        );
    }

    Ok(retain_largest_component(&graph))
}

/// Keep only the connected component with the greatest total edge length;
/// numeric noise occasionally detaches a few stray cells.
fn retain_largest_component(graph: &SkeletonGraph) -> SkeletonGraph {
    let mut component = vec![usize::MAX; graph.node_count()];
    let mut component_length: Vec<CoordF> = Vec::new();
    for start in 0..graph.node_count() {
        if component[start] != usize::MAX {
            continue;
        }
        let id = component_length.len();
        let mut length = 0.0;
        let mut stack = vec![start];
        component[start] = id;
        while let Some(node) = stack.pop() {
            for &edge in &graph.node(node).edges {
                length += graph.edge(edge).length;
                let target = graph.edge(edge).to;
                if component[target] == usize::MAX {
                    component[target] = id;
                    stack.push(target);
                }
            }
        }
        component_length.push(length);
    }
    if component_length.len() <= 1 {
        return graph.clone();
    }
    let best = component_length
        .iter()
        .enumerate()
        .max_by(|a, b| a.1.partial_cmp(b.1).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(i, _)| i)
        .unwrap_or(0);

    let mut remap = vec![usize::MAX; graph.node_count()];
    let mut kept = SkeletonGraph::new();
    for node in 0..graph.node_count() {
        if component[node] == best {
            remap[node] = kept.add_node(graph.node(node).point);
        }
    }
    // forward half-edges sit at even indices; rebuilding pairs preserves
    // the twin layout
    for edge_id in (0..graph.edge_count()).step_by(2) {
        let edge = graph.edge(edge_id);
        if component[edge.from] == best {
            kept.add_edge_pair(
                remap[edge.from],
                remap[edge.to],
                edge.width_from,
                edge.width_to,
                edge.source_left,
                edge.source_right,
            );
        }
    }
    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Polygon;
    use crate::scale;

    fn build(island: &ExPolygon, step: Coord) -> SkeletonGraph {
        let lines = island.boundary_lines();
        build_skeleton(island, &lines, step).expect("skeleton")
    }

    #[test]
    fn test_rejects_degenerate_boundary() {
        let island = ExPolygon::new(Polygon::from_points(vec![
            Point::new(0, 0),
            Point::new(100, 0),
        ]));
        let lines = island.boundary_lines();
        assert!(matches!(
            build_skeleton(&island, &lines, 10),
            Err(SampleError::GeometryInput(_))
        ));
    }

    #[test]
    fn test_square_skeleton_reaches_center() {
        let island = ExPolygon::rectangle(Point::zero(), Point::new(scale(4.0), scale(4.0)));
        let graph = build(&island, scale(0.2));
        assert!(graph.edge_count() > 0);
        // some node close to the square center with clearance near 2 mm
        let center = Point::new(scale(2.0), scale(2.0));
        let best = graph
            .nodes()
            .map(|(_, n)| n.point.distance(&center))
            .fold(f64::INFINITY, f64::min);
        assert!(best < scale(0.3) as CoordF);
    }

    #[test]
    fn test_square_has_contour_nodes() {
        let island = ExPolygon::rectangle(Point::zero(), Point::new(scale(4.0), scale(4.0)));
        let graph = build(&island, scale(0.2));
        assert!(graph.first_contour_node().is_some());
    }

    #[test]
    fn test_all_nodes_inside_island() {
        let island = ExPolygon::new(Polygon::equilateral_triangle(scale(5.0)));
        let graph = build(&island, scale(0.2));
        for (_, node) in graph.nodes() {
            assert!(island.contains_point(&node.point));
        }
    }

    #[test]
    fn test_rectangle_widths_near_center() {
        // 2 mm x 10 mm bar: the spine should see width ~2 mm
        let island =
            ExPolygon::rectangle(Point::zero(), Point::new(scale(10.0), scale(2.0)));
        let graph = build(&island, scale(0.1));
        let mid = Point::new(scale(5.0), scale(1.0));
        let mut spine_width = 0;
        for e in 0..graph.edge_count() {
            let edge = graph.edge(e);
            let a = graph.node(edge.from).point;
            if a.distance(&mid) < scale(1.0) as CoordF {
                spine_width = spine_width.max(edge.max_width());
            }
        }
        assert!((spine_width - scale(2.0)).abs() < scale(0.3));
    }

    #[test]
    fn test_annulus_skeleton_is_cyclic() {
        // ring between radii 5 and 6 mm: the skeleton follows the ring,
        // so the edge count matches or exceeds the node count
        let outer = Polygon::circle(Point::zero(), scale(6.0), 48);
        let mut hole = Polygon::circle(Point::zero(), scale(5.0), 48);
        hole.make_clockwise();
        let island = ExPolygon::with_holes(outer, vec![hole]);
        let graph = build(&island, scale(0.3));
        assert!(graph.edge_count() / 2 >= graph.node_count());
    }
}
