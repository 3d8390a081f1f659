//! Support point placement for SLA (resin) 3D printing.
//!
//! Given the 2D slices of a printed object, this library decides where
//! support pillars must touch the model so that overhanging regions stay
//! attached to already-printed material during the print.
//!
//! The heart of the crate is the *island sampling engine* in [`island`]:
//! for a single unsupported polygonal region it builds a Voronoi skeleton,
//! splits the region into thin and thick parts, samples each part with its
//! own strategy and finally relaxes the samples with a Lloyd-style
//! alignment so they spread evenly.
//!
//! Surrounding that core:
//! - [`geometry`] — fixed-point points, lines, polygons with holes
//! - [`clipper`] — polygon boolean and offset operations
//! - [`generator`] — layer stack intake, island/peninsula detection and
//!   layer-to-layer support propagation
//! - [`io`] — plain-text dump formats for islands and printer geometry
//!
//! # Units
//!
//! All integer coordinates are in nanometers: 1 mm = 10⁶ units. Use
//! [`scale`]/[`unscale`] to convert from/to millimeters.

pub mod clipper;
pub mod generator;
pub mod geometry;
pub mod io;
pub mod island;

/// Scaled integer coordinate type (nanometers).
pub type Coord = i64;

/// Floating-point coordinate type (millimeters, or derived quantities).
pub type CoordF = f64;

/// Number of scaled units per millimeter.
pub const SCALING_FACTOR: CoordF = 1_000_000.0;

/// Convert millimeters to scaled integer units.
#[inline]
pub fn scale(v: CoordF) -> Coord {
    (v * SCALING_FACTOR).round() as Coord
}

/// Convert scaled integer units to millimeters.
#[inline]
pub fn unscale(v: Coord) -> CoordF {
    v as CoordF / SCALING_FACTOR
}

pub use island::{
    uniform_support_island, uniform_support_peninsula, Peninsula, SampleConfig, SampleError,
    SupportPoint, SupportPointKind,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scale_roundtrip() {
        assert_eq!(scale(1.0), 1_000_000);
        assert_eq!(scale(-0.5), -500_000);
        assert!((unscale(scale(12.345)) - 12.345).abs() < 1e-6);
    }
}
