//! Polygonal fields of thick parts.
//!
//! A thick part's field is the region of the island it occupies: the
//! island boundary segments belonging to the part, closed off by
//! "transition chords" where the skeleton crosses into a thin part. The
//! field border distinguishes real outline (needs boundary supports) from
//! chords (does not), and an inward inset of the border provides both the
//! outline sample track and the interior sampling region.

use super::config::SampleConfig;
use super::segmentation::ThickPart;
use super::skeleton::{twin, Position, SkeletonGraph};
use crate::clipper;
use crate::geometry::{ExPolygon, Lines, Point, Polygon};
use crate::{Coord, CoordF};
use std::collections::BTreeMap;

/// Field of one thick part.
#[derive(Debug, Clone, Default)]
pub struct Field {
    /// Region border; contour first, then holes, in boundary-walk order.
    pub border: ExPolygon,
    /// Per border line: true when the line comes from the island boundary.
    pub is_outline: Vec<bool>,
    /// Border inset by `minimal_distance_from_outline`.
    pub inner: ExPolygon,
    /// Border line index to inner line index, where a parallel inset line
    /// exists.
    pub field_to_inner: BTreeMap<usize, usize>,
}

/// Replacement of two boundary sections by one chord where the part ends.
#[derive(Debug, Clone)]
struct WideTinyChange {
    /// New end point of the cut line.
    new_b: Point,
    /// New start point on the continuation line.
    next_new_a: Point,
    /// Index of the continuation line.
    next_line_index: usize,
}

/// Both chord endpoints of a part end: the end position projected onto the
/// two boundary segments whose Voronoi cells meet at its edge.
fn chord_points(graph: &SkeletonGraph, position: &Position, lines: &Lines) -> (Point, Point) {
    let edge = graph.edge(position.edge);
    let point = position.point(graph);
    let left = lines[edge.source_left].project_point(&point);
    let right = lines[edge.source_right].project_point(&point);
    (left, right)
}

/// Collect the transition chords keyed by the boundary line they cut.
fn collect_changes(
    graph: &SkeletonGraph,
    ends: &[Position],
    lines: &Lines,
) -> BTreeMap<usize, Vec<WideTinyChange>> {
    let mut changes: BTreeMap<usize, Vec<WideTinyChange>> = BTreeMap::new();
    for end in ends {
        let edge = graph.edge(end.edge);
        let (p_left, p_right) = chord_points(graph, end, lines);
        let direction = graph.node(edge.to).point - graph.node(edge.from).point;
        // the line running with the outgoing edge is cut at its b side;
        // the opposite line continues the walk
        let left_line = &lines[edge.source_left];
        let (cut_index, cut_point, next_index, next_point) =
            if direction.dot(&left_line.direction()) > 0 {
                (edge.source_left, p_left, edge.source_right, p_right)
            } else {
                (edge.source_right, p_right, edge.source_left, p_left)
            };
        let change = WideTinyChange {
            new_b: cut_point,
            next_new_a: next_point,
            next_line_index: next_index,
        };
        let entry = changes.entry(cut_index).or_default();
        let line = &lines[cut_index];
        let at = entry.partition_point(|c| line.cmp_along(&c.new_b, &change.new_b).is_lt());
        entry.insert(at, change);
    }
    changes
}

/// Source line indices reachable inside the part, in walk order.
fn part_line_indices(graph: &SkeletonGraph, part: &ThickPart) -> Vec<usize> {
    let mut indices = Vec::new();
    let mut process: Vec<usize> = Vec::new();
    let mut current = Some(part.start);
    while let Some(edge_id) = current.take().or_else(|| process.pop()) {
        let edge = graph.edge(edge_id);
        indices.push(edge.source_left);
        indices.push(edge.source_right);

        if part.ends.binary_search_by_key(&edge_id, |p| p.edge).is_ok() {
            continue;
        }
        let edge_twin = twin(edge_id);
        if let Some(queued) = process.iter().position(|&e| e == edge_twin) {
            process.remove(queued);
            continue;
        }
        for &successor in &graph.node(edge.to).edges {
            if successor == edge_twin {
                continue;
            }
            if current.is_none() {
                current = Some(successor);
            } else {
                process.push(successor);
            }
        }
    }
    indices
}

/// Border walk state shared by the contour and hole walks.
struct BorderWalk<'a> {
    lines: &'a Lines,
    successors: &'a [usize],
    points: Vec<Point>,
    /// Source line of the border line starting at `points[k]`;
    /// `lines.len()` marks a chord.
    sources: Vec<usize>,
    done: Vec<bool>,
}

impl<'a> BorderWalk<'a> {
    fn chord_source(&self) -> usize {
        self.lines.len()
    }

    /// Emit the current line's `b` endpoint and advance to its successor.
    fn push_point_b(&mut self, index: &mut usize) {
        self.points.push(self.lines[*index].b);
        self.done[*index] = true;
        *index = self.successors[*index];
        self.sources.push(*index);
    }

    /// Apply the chords cutting the current line, following jumps until a
    /// plain line remains. Returns false when a chord closes the contour
    /// back into the input line.
    fn apply_changes(
        &mut self,
        index: &mut usize,
        changes: &BTreeMap<usize, Vec<WideTinyChange>>,
        input_index: usize,
    ) -> bool {
        let chord_source = self.chord_source();
        let mut pending = changes.get(index);
        while let Some(list) = pending {
            let mut change_index = 0;
            if let Some(last_point) = self.points.last().copied() {
                let line = &self.lines[*index];
                while line
                    .cmp_along(&list[change_index].new_b, &last_point)
                    .is_lt()
                {
                    change_index += 1;
                    if change_index >= list.len() {
                        break;
                    }
                }
                if change_index >= list.len() {
                    break;
                }
                if *index == input_index && change_index == 0 {
                    return false; // the walk closed into its first chord
                }
            }
            let change = &list[change_index];
            if self.points.last() != Some(&change.new_b) {
                self.points.push(change.new_b);
                self.sources.push(chord_source);
            } else if let Some(last_source) = self.sources.last_mut() {
                *last_source = chord_source;
            }
            if self.lines[change.next_line_index].b != change.next_new_a {
                self.points.push(change.next_new_a);
                self.sources.push(change.next_line_index);
            }
            self.done[*index] = true;

            // jumping into the input line before its first chord closes
            // the contour as well
            if *index != input_index && change.next_line_index == input_index {
                let before_first = match changes.get(&input_index) {
                    None => true,
                    Some(input_changes) => {
                        let line = &self.lines[input_index];
                        !input_changes
                            .iter()
                            .any(|c| line.cmp_along(&c.new_b, &change.next_new_a).is_lt())
                    }
                };
                if before_first {
                    *index = change.next_line_index;
                    return false;
                }
            }

            *index = change.next_line_index;
            pending = changes.get(index);
        }
        true
    }
}

/// Build the field of one thick part.
///
/// Returns a field with an empty `inner` when the part leaves no room for
/// supports.
pub fn create_thick_field(
    graph: &SkeletonGraph,
    part: &ThickPart,
    lines: &Lines,
    successors: &[usize],
    config: &SampleConfig,
) -> Field {
    let changes = collect_changes(graph, &part.ends, lines);
    let indices = part_line_indices(graph, part);

    let start_edge = graph.edge(part.start);
    let input_index = start_edge.source_left.min(start_edge.source_right);
    let mut walk = BorderWalk {
        lines,
        successors,
        points: Vec::new(),
        sources: Vec::new(),
        done: vec![false; lines.len()],
    };

    let mut outline_index = input_index;
    loop {
        if !walk.apply_changes(&mut outline_index, &changes, input_index) {
            break;
        }
        walk.push_point_b(&mut outline_index);
        if outline_index == input_index {
            break;
        }
    }

    if walk.points.len() < 3 {
        return Field::default();
    }

    // unvisited part lines close island holes inside the field
    let mut hole_polygons = Vec::new();
    let mut hole_sources: Vec<usize> = Vec::new();
    for &index in &indices {
        if walk.done[index] {
            continue;
        }
        let mut hole_points = Vec::new();
        let mut hole_index = index;
        loop {
            hole_points.push(lines[hole_index].b);
            walk.done[hole_index] = true;
            hole_index = successors[hole_index];
            hole_sources.push(hole_index);
            if hole_index == index {
                break;
            }
        }
        hole_polygons.push(Polygon::from_points(hole_points));
    }

    // `sources[k]` names the island line the border line starting at
    // `points[k]` comes from
    let mut sources = walk.sources;
    sources.extend(hole_sources);
    let mut border = ExPolygon::with_holes(Polygon::from_points(walk.points), hole_polygons);

    if !border.holes.is_empty() {
        set_biggest_hole_as_contour(&mut border, &mut sources);
    }

    let is_outline: Vec<bool> = sources.iter().map(|&s| s != lines.len()).collect();
    let (inner, field_to_inner) =
        outline_offset(&border, config.minimal_distance_from_outline);
    Field {
        border,
        is_outline,
        inner,
        field_to_inner,
    }
}

/// When a recovered "hole" spans a wider x-range than the contour, the
/// walk actually traced an island hole ring; swap it into the contour
/// slot and rearrange the source array to match.
fn set_biggest_hole_as_contour(border: &mut ExPolygon, sources: &mut Vec<usize>) -> bool {
    let contour_span = border.contour.bounding_box().size().x;
    let mut biggest: Option<usize> = None;
    let mut biggest_span = contour_span;
    for (i, hole) in border.holes.iter().enumerate() {
        let span = hole.bounding_box().size().x;
        if span >= biggest_span {
            biggest_span = span;
            biggest = Some(i);
        }
    }
    let Some(hole_index) = biggest else {
        return false;
    };

    // ring spans in the flat source array
    let contour_len = border.contour.len();
    let mut hole_offset = contour_len;
    for hole in border.holes.iter().take(hole_index) {
        hole_offset += hole.len();
    }
    let hole_len = border.holes[hole_index].len();

    let hole_slice: Vec<usize> = sources[hole_offset..hole_offset + hole_len].to_vec();
    let contour_slice: Vec<usize> = sources[..contour_len].to_vec();
    sources.splice(hole_offset..hole_offset + hole_len, contour_slice);
    sources.splice(..contour_len, hole_slice);

    std::mem::swap(&mut border.contour, &mut border.holes[hole_index]);
    true
}

/// Inset the border and match each border line with its parallel inset
/// line.
///
/// Returns the inset polygon (largest piece when the offset splits the
/// field) and the border-to-inner line index map.
pub fn outline_offset(border: &ExPolygon, delta: Coord) -> (ExPolygon, BTreeMap<usize, usize>) {
    let pieces = clipper::offset_expolygon_miter(border, -delta);
    let Some(inner) = pieces
        .into_iter()
        .max_by(|a, b| a.area().partial_cmp(&b.area()).unwrap_or(std::cmp::Ordering::Equal))
    else {
        return (ExPolygon::default(), BTreeMap::new());
    };

    let angle_tolerance = 1e-3;
    let distance_tolerance = 50.0;
    let border_lines = border.boundary_lines();
    let inner_lines = inner.boundary_lines();
    let mut map = BTreeMap::new();
    for (border_index, border_line) in border_lines.iter().enumerate() {
        let dir = border_line.direction_f();
        let major_x = dir.x.abs() > dir.y.abs();
        let (mut lo, mut hi) = if major_x {
            (border_line.a.x, border_line.b.x)
        } else {
            (border_line.a.y, border_line.b.y)
        };
        if lo > hi {
            std::mem::swap(&mut lo, &mut hi);
        }
        for (inner_index, inner_line) in inner_lines.iter().enumerate() {
            let (mut lo2, mut hi2) = if major_x {
                (inner_line.a.x, inner_line.b.x)
            } else {
                (inner_line.a.y, inner_line.b.y)
            };
            if lo2 > hi2 {
                std::mem::swap(&mut lo2, &mut hi2);
            }
            if lo > hi2 || lo2 > hi {
                continue;
            }
            let dir2 = inner_line.direction_f();
            let cos = dir.dot(&dir2).clamp(-1.0, 1.0);
            if cos.acos() > angle_tolerance {
                continue;
            }
            let distance = border_line.perp_distance_to(&inner_line.middle());
            if (distance - delta as CoordF).abs() > distance_tolerance {
                continue;
            }
            map.insert(border_index, inner_index);
            break;
        }
    }
    (inner, map)
}
