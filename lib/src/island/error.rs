//! Island sampling errors.

use thiserror::Error;

/// Failures surfaced by the island sampling engine.
///
/// Alignment non-convergence is not an error; the sampler returns the
/// partially converged set after its iteration budget.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SampleError {
    /// The island polygon is unusable: empty, fewer than three distinct
    /// vertices, or degenerate boundary segments.
    #[error("degenerate island geometry: {0}")]
    GeometryInput(String),

    /// The Voronoi diagram of the boundary produced no interior edges.
    /// Retrying with a larger simplification tolerance may help.
    #[error("voronoi diagram of the island boundary has no interior edges")]
    VoronoiConstruction,

    /// The skeleton graph violated a structural assumption (no contour
    /// node, disconnected skeleton).
    #[error("inconsistent skeleton graph: {0}")]
    Segmentation(String),
}
