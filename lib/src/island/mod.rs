//! Island sampling engine.
//!
//! An *island* is a connected region of one slice with nothing below it;
//! every island needs support points before it can print. Given the
//! island polygon and a [`SampleConfig`], [`uniform_support_island`]
//! returns points such that no spot of the island is farther from a
//! support than the configured spacing allows:
//!
//! 1. islands smaller than the support head get one centered point;
//! 2. short skeletons get one or two stretched points;
//! 3. everything else is split into thin and thick parts along the
//!    Voronoi skeleton, each part is sampled with its own strategy, and
//!    the combined set is relaxed toward even spacing.
//!
//! [`uniform_support_peninsula`] covers *peninsulas* (newly unsupported
//! outgrowths of supported regions) with the thick-part strategy alone.

pub mod align;
pub mod config;
pub mod error;
pub mod field;
pub mod point;
pub mod segmentation;
pub mod skeleton;
pub mod thick;
pub mod thin;
pub mod voronoi;

pub use config::SampleConfig;
pub use error::SampleError;
pub use point::{SupportPoint, SupportPointKind};

use crate::geometry::ExPolygon;
use crate::Coord;
use field::Field;
use point::SupportPoints;
use skeleton::{Position, SkeletonGraph, SkeletonPath};

/// A newly unsupported region attached to supported material.
///
/// `is_outline[i]` tells whether boundary line `i` of the area is real
/// model outline (needs supports nearby) or the cut against the already
/// supported region (does not).
#[derive(Debug, Clone)]
pub struct Peninsula {
    pub unsupported_area: ExPolygon,
    pub is_outline: Vec<bool>,
}

/// Compute support points covering one island.
pub fn uniform_support_island(
    island: &ExPolygon,
    config: &SampleConfig,
) -> Result<Vec<SupportPoint>, SampleError> {
    if island.is_empty() || island.contour.len() < 3 {
        return Err(SampleError::GeometryInput(
            "island needs at least three contour vertices".into(),
        ));
    }

    let mut simplified = island.simplify_dp(config.simplification_tolerance);
    if simplified.contour.len() < 3 {
        simplified = island.clone();
    }

    // tiny island: a single head covers the whole bounding box
    let bbox = simplified.bounding_box();
    let size = bbox.size();
    if size.x <= config.head_radius && size.y <= config.head_radius {
        return Ok(vec![SupportPoint::fixed(
            bbox.center(),
            SupportPointKind::OneBbCenter,
        )]);
    }

    let lines = simplified.boundary_lines();
    let successors = simplified.boundary_successors();
    let graph = voronoi::build_skeleton(&simplified, &lines, config.skeleton_sample_distance)?;
    let start = graph
        .traversal_root()
        .ok_or_else(|| SampleError::Segmentation("no traversal root".into()))?;
    let path = graph.longest_path(start);

    // short skeleton: one support in the middle carries the island
    if (path.length as Coord) < config.max_length_for_one_support_point {
        let center = graph
            .position_on_path(&path, path.length / 2.0)
            .unwrap_or(Position::new(graph.node(path.nodes[0]).edges[0], 0.0));
        return Ok(vec![SupportPoint::fixed(
            center.point(&graph),
            SupportPointKind::OneCenter,
        )]);
    }

    // longer but still narrow: stretch the island between two points
    if graph.max_width_on_path(&path) < config.thin_max_width
        && (path.length as Coord) < config.max_length_for_two_support_points
    {
        return Ok(side_points(&graph, &path, config, SupportPointKind::TwoPoints));
    }

    let (thin_parts, thick_parts) = segmentation::separate_thin_thick(&graph, &path, config)?;
    let mut results = SupportPoints::new();
    for part in &thin_parts {
        thin::sample_thin_part(&graph, part, &mut results, config);
    }
    for part in &thick_parts {
        thick::sample_thick_part(&graph, part, &lines, &successors, &mut results, config);
    }

    // part sampling degenerated: fall back to the stretched pair
    if results.len() <= 2 {
        return Ok(side_points(
            &graph,
            &path,
            config,
            SupportPointKind::TwoPointsBackup,
        ));
    }

    align::align_samples(&mut results, island, config, Some(&graph));
    Ok(results.into_points())
}

/// Compute support points covering one peninsula.
///
/// The unsupported area is treated as a single thick-part field whose
/// outline flags arrive from the caller.
pub fn uniform_support_peninsula(
    peninsula: &Peninsula,
    config: &SampleConfig,
) -> Result<Vec<SupportPoint>, SampleError> {
    let border = &peninsula.unsupported_area;
    if border.is_empty() || border.contour.len() < 3 {
        return Err(SampleError::GeometryInput(
            "peninsula needs at least three contour vertices".into(),
        ));
    }
    if peninsula.is_outline.len() != border.point_count() {
        return Err(SampleError::GeometryInput(
            "peninsula outline flags do not match its boundary".into(),
        ));
    }
    let (inner, field_to_inner) =
        field::outline_offset(border, config.minimal_distance_from_outline);
    let field = Field {
        border: border.clone(),
        is_outline: peninsula.is_outline.clone(),
        inner,
        field_to_inner,
    };
    if field.inner.is_empty() {
        return Ok(Vec::new());
    }
    let mut results = SupportPoints::new();
    thick::sample_field(&field, &mut results, config);
    align::align_samples(&mut results, border, config, None);
    Ok(results.into_points())
}

/// Two fixed points near the ends of the longest path, pulled inward to
/// where the island is wide enough for a support head (or to the capped
/// distance when it never is).
fn side_points(
    graph: &SkeletonGraph,
    path: &SkeletonPath,
    config: &SampleConfig,
    kind: SupportPointKind,
) -> Vec<SupportPoint> {
    let ratio_cap =
        (path.length * config.max_length_ratio_for_two_support_points).round() as Coord;
    let max_distance = config.maximal_distance_from_outline.min(ratio_cap);
    let width = 2 * config.head_radius;

    let reversed = path.reversed();
    let mut budget_front = max_distance;
    let mut budget_back = max_distance;
    let front = graph.position_on_path_with_width(path, width, &mut budget_front);
    let back = graph.position_on_path_with_width(&reversed, width, &mut budget_back);

    let fallback_front = || Position::new(path.edges[0], 0.0);
    let fallback_back = || Position::new(reversed.edges[0], 0.0);
    let front = front.unwrap_or_else(fallback_front);
    let back = back.unwrap_or_else(fallback_back);
    vec![
        SupportPoint::fixed(front.point(graph), kind),
        SupportPoint::fixed(back.point(graph), kind),
    ]
}
