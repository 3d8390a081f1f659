//! Support sampling of thick-part fields.
//!
//! Outline supports ride on the inset border: every maximal run of real
//! outline segments is sampled at a fixed arc spacing, starting half a
//! spacing into the run, and each sample may later slide along its run
//! during alignment. Interior supports fill the inset polygon with an
//! equilateral-triangle grid whose orientation follows the polygon, so a
//! translated or rotated island gets the same pattern.

use super::config::SampleConfig;
use super::field::Field;
use super::point::{OutlineRestriction, SupportPoints};
use super::segmentation::ThickPart;
use super::skeleton::SkeletonGraph;
use crate::geometry::{ExPolygon, Line, Lines, Point, Points, Polygon};
use crate::{Coord, CoordF};

/// Build the field of a thick part and cover it with supports.
pub fn sample_thick_part(
    graph: &SkeletonGraph,
    part: &ThickPart,
    lines: &Lines,
    successors: &[usize],
    results: &mut SupportPoints,
    config: &SampleConfig,
) {
    let field = super::field::create_thick_field(graph, part, lines, successors, config);
    sample_field(&field, results, config);
}

/// Cover one field with outline and interior supports.
pub fn sample_field(field: &Field, results: &mut SupportPoints, config: &SampleConfig) {
    if field.inner.is_empty() || field.inner.contour.len() < 3 {
        return;
    }
    sample_outline(field, results, config);

    let inner_index = results.add_inner_polygon(field.inner.clone());
    for point in sample_expolygon_with_centering(&field.inner, config.thick_inner_max_distance) {
        results.push_inner(point, inner_index);
    }
}

/// Emit supports along one restriction, spaced `sample_distance` apart.
///
/// `last_support` carries the arc length accumulated since the previous
/// support across segment boundaries.
fn add_restriction_samples(
    results: &mut SupportPoints,
    restriction: OutlineRestriction,
    sample_distance: CoordF,
) {
    let mut last_support = restriction.total_length.min(sample_distance) / 2.0;
    let lengths: Vec<CoordF> = restriction.lines.iter().map(|l| l.length()).collect();
    let index = results.add_outline_restriction(restriction);
    for (line, &line_length) in lengths.iter().enumerate() {
        while last_support + line_length > sample_distance {
            let ratio = (sample_distance - last_support) / line_length;
            results.push_outline(index, line, ratio.clamp(0.0, 1.0));
            last_support -= sample_distance;
        }
        last_support += line_length;
    }
}

/// Sample the outline runs of the field border.
///
/// Runs of `is_outline` border lines are translated to their inset lines
/// through `field_to_inner`; a ring without any transition chord becomes
/// one cyclic run.
fn sample_outline(field: &Field, results: &mut SupportPoints, config: &SampleConfig) {
    let sample_distance = config.thick_outline_max_distance as CoordF;
    let max_align_distance = config.max_align_distance;

    if field.border.holes.len() != field.inner.holes.len() {
        // offsetting changed the hole structure; outline sliding would pair
        // wrong rings
        return;
    }

    let mut border_offset = 0;
    let mut inner_offset = 0;
    for (ring_index, ring) in field.border.rings().into_iter().enumerate() {
        let inner_ring = if ring_index == 0 {
            &field.inner.contour
        } else {
            &field.inner.holes[ring_index - 1]
        };
        sample_ring(
            field,
            ring,
            inner_ring,
            border_offset,
            inner_offset,
            results,
            sample_distance,
            max_align_distance,
        );
        border_offset += ring.len();
        inner_offset += inner_ring.len();
    }
}

#[allow(clippy::too_many_arguments)]
fn sample_ring(
    field: &Field,
    ring: &Polygon,
    inner_ring: &Polygon,
    border_offset: usize,
    inner_offset: usize,
    results: &mut SupportPoints,
    sample_distance: CoordF,
    max_align_distance: Coord,
) {
    if inner_ring.len() < 3 {
        return;
    }
    let ring_len = ring.len();
    let inner_lines = inner_ring.lines();

    let first_change =
        (0..ring_len).find(|&i| !field.is_outline[border_offset + i]);
    let Some(first_change) = first_change else {
        // pure outline ring: one cyclic run over the whole inset ring
        add_restriction_samples(
            results,
            OutlineRestriction::new(inner_lines, true, max_align_distance),
            sample_distance,
        );
        return;
    };

    let invalid = inner_lines.len();
    let mut inner_first = invalid;
    let mut inner_last = invalid;
    let stop_index = if first_change == 0 { ring_len } else { first_change };

    // first outline index after the change
    let mut index = first_change;
    loop {
        index += 1;
        if index == ring_len {
            index = 0;
            if first_change == 0 {
                return; // no outline segment on this ring at all
            }
        }
        if field.is_outline[border_offset + index] {
            break;
        }
    }

    let mut flush = |first: &mut usize, last: &mut usize, results: &mut SupportPoints| {
        if *first == invalid {
            return;
        }
        let run = collect_run(&inner_lines, *first, *last);
        add_restriction_samples(
            results,
            OutlineRestriction::new(run, false, max_align_distance),
            sample_distance,
        );
        *first = invalid;
        *last = invalid;
    };

    loop {
        if index == stop_index {
            break;
        }
        if index == ring_len {
            index = 0;
        }
        let border_index = border_offset + index;
        if !field.is_outline[border_index] {
            flush(&mut inner_first, &mut inner_last, results);
        } else if let Some(&inner_global) = field.field_to_inner.get(&border_index) {
            if inner_global >= inner_offset && inner_global - inner_offset < invalid {
                inner_last = inner_global - inner_offset;
                if inner_first == invalid {
                    inner_first = inner_last;
                }
            }
        }
        index += 1;
    }
    flush(&mut inner_first, &mut inner_last, results);
}

/// Slice `lines[first..=last]`, wrapping over the ring seam.
fn collect_run(lines: &Lines, first: usize, last: usize) -> Lines {
    let mut run = Vec::new();
    if first > last {
        run.extend_from_slice(&lines[first..]);
        run.extend_from_slice(&lines[..=last]);
    } else {
        run.extend_from_slice(&lines[first..=last]);
    }
    run
}

/// Triangular-grid samples of a polygon-with-holes.
///
/// Horizontal scanlines at the triangle height step; every other row is
/// offset by half a spacing. Points land on the grid lattice, so two
/// islands differing by a translation sample to lattice-aligned sets.
pub fn sample_expolygon_grid(expoly: &ExPolygon, triangle_side: Coord) -> Points {
    if expoly.contour.is_empty() || triangle_side <= 0 {
        return Vec::new();
    }
    let mut min_y = expoly.contour.points()[0].y;
    let mut max_y = min_y;
    for p in expoly.contour.points() {
        min_y = min_y.min(p.y);
        max_y = max_y.max(p.y);
    }
    let half_side = triangle_side / 2;
    let triangle_height = (triangle_side as CoordF * 3f64.sqrt() / 2.0).round() as Coord;

    let mut lines: Lines = expoly
        .boundary_lines()
        .into_iter()
        .filter(|l| l.a.y != l.b.y)
        .map(|l| {
            if l.a.y > l.b.y {
                Line::new(l.b, l.a)
            } else {
                l
            }
        })
        .collect();
    lines.sort_by_key(|l| l.a.y);

    let mut result = Vec::new();
    let mut start_index = 0;
    let mut is_odd = false;
    let mut y = min_y + triangle_height / 2;
    while y < max_y {
        is_odd = !is_odd;
        let mut intersections: Vec<Coord> = Vec::new();
        let mut increase_start_index = true;
        for line in &lines[start_index..] {
            if line.b.y <= y {
                if increase_start_index {
                    start_index += 1;
                }
                continue;
            }
            increase_start_index = false;
            if line.a.y >= y {
                break;
            }
            let ratio = (y - line.a.y) as CoordF / (line.b.y - line.a.y) as CoordF;
            intersections.push(line.a.x + ((line.b.x - line.a.x) as CoordF * ratio) as Coord);
        }
        intersections.sort_unstable();
        for pair in intersections.chunks_exact(2) {
            let mut start_x = pair[0];
            let end_x = pair[1];
            if is_odd {
                start_x += half_side;
            }
            let mut div = start_x / triangle_side;
            if start_x > 0 {
                div += 1;
            }
            let mut x = div * triangle_side;
            if is_odd {
                x -= half_side;
            }
            while x < end_x {
                result.push(Point::new(x, y));
                x += triangle_side;
            }
        }
        y += triangle_height;
    }
    result
}

/// Triangular-grid samples with a pose-invariant lattice.
///
/// The polygon is rotated so that its farthest vertex from the contour
/// centroid lies on the +x axis, sampled, and the samples rotated back.
/// The point pattern therefore turns with the island instead of staying
/// axis-aligned.
pub fn sample_expolygon_with_centering(expoly: &ExPolygon, triangle_side: Coord) -> Points {
    if expoly.contour.is_empty() {
        return Vec::new();
    }
    let center = expoly.contour.centroid();
    let mut extreme = expoly.contour.points()[0];
    let mut extreme_dist = -1i128;
    for &p in expoly.contour.points() {
        let dist = center.distance_squared(&p);
        if dist > extreme_dist {
            extreme_dist = dist;
            extreme = p;
        }
    }
    let angle = ((extreme.y - center.y) as CoordF).atan2((extreme.x - center.x) as CoordF);

    let mut rotated = expoly.clone();
    rotated.rotate_around(-angle, center);
    let mut samples = sample_expolygon_grid(&rotated, triangle_side);
    for point in &mut samples {
        *point = point.rotate_around(angle, center);
    }
    samples
}
