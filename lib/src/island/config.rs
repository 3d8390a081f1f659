//! Sampling configuration.

use crate::{scale, Coord, CoordF};
use serde::{Deserialize, Serialize};

/// Parameters of the island sampling engine.
///
/// All distances are in scaled units (nanometers). The hysteresis pair
/// `thick_min_width < thin_max_width` defines the band in which a skeleton
/// edge is neither clearly thin nor clearly thick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleConfig {
    /// Radius of the support head; islands whose bounding box fits within
    /// this radius get a single centered point.
    pub head_radius: Coord,
    /// Douglas-Peucker tolerance applied to the island before
    /// skeletonization.
    pub simplification_tolerance: Coord,
    /// Widths above this are thick regardless of history.
    pub thin_max_width: Coord,
    /// Widths below this are thin regardless of history.
    pub thick_min_width: Coord,
    /// Arc-length spacing of supports along thin-part skeletons.
    pub thin_max_distance: Coord,
    /// Arc-length spacing of supports along thick-part outlines.
    pub thick_outline_max_distance: Coord,
    /// Triangular-grid spacing of supports in thick-part interiors.
    pub thick_inner_max_distance: Coord,
    /// Inset distance of the thick-part inner polygon from the field
    /// border.
    pub minimal_distance_from_outline: Coord,
    /// Cap on the distance of a two-point placement from the path end.
    pub maximal_distance_from_outline: Coord,
    /// How far an outline support may slide along its segment sequence
    /// during alignment.
    pub max_align_distance: Coord,
    /// Segmentation merges parts whose longest internal distance is below
    /// this.
    pub min_part_length: Coord,
    /// Maximal number of alignment sweeps.
    pub count_iteration: usize,
    /// Alignment stops when no point moved farther than this in a sweep.
    pub minimal_move: Coord,
    /// Below this skeleton length one centered support suffices.
    pub max_length_for_one_support_point: Coord,
    /// Below this skeleton length (and below `thin_max_width` everywhere)
    /// two stretched supports suffice.
    pub max_length_for_two_support_points: Coord,
    /// Ratio-based cap on the two-point inset, relative to path length.
    pub max_length_ratio_for_two_support_points: CoordF,
    /// Boundary sampling step of the skeleton builder.
    pub skeleton_sample_distance: Coord,
    /// Overhang regions wider than this become peninsulas in the layer
    /// generator.
    pub peninsula_min_width: Coord,
    /// Horizontal distance a layer can safely overhang its predecessor.
    pub self_supported_width: Coord,
}

impl SampleConfig {
    /// Derive a complete config from the support-head radius in
    /// millimeters.
    ///
    /// The ratios follow the reference tuning: spacing limits are a few
    /// head diameters, the hysteresis band sits between one and two head
    /// diameters, and alignment gets a generous iteration budget with a
    /// small termination move.
    pub fn from_head_radius(head_radius_mm: CoordF) -> Self {
        let head_radius = scale(head_radius_mm);
        Self {
            head_radius,
            simplification_tolerance: head_radius / 5,
            thin_max_width: 4 * head_radius,
            thick_min_width: 2 * head_radius,
            thin_max_distance: 8 * head_radius,
            thick_outline_max_distance: 6 * head_radius,
            thick_inner_max_distance: 8 * head_radius,
            minimal_distance_from_outline: head_radius,
            maximal_distance_from_outline: 3 * head_radius,
            max_align_distance: 4 * head_radius,
            min_part_length: 2 * head_radius,
            count_iteration: 30,
            minimal_move: (head_radius / 8).max(1),
            max_length_for_one_support_point: 8 * head_radius,
            max_length_for_two_support_points: 16 * head_radius,
            max_length_ratio_for_two_support_points: 0.25,
            skeleton_sample_distance: (head_radius / 2).max(1),
            peninsula_min_width: 4 * head_radius,
            self_supported_width: head_radius,
        }
    }

    /// Largest spacing any sampling strategy may produce; bounds alignment
    /// cells.
    #[inline]
    pub fn max_distance(&self) -> Coord {
        self.thin_max_distance
            .max(self.thick_inner_max_distance)
            .max(self.thick_outline_max_distance)
    }
}

impl Default for SampleConfig {
    fn default() -> Self {
        Self::from_head_radius(0.4)
    }
}
