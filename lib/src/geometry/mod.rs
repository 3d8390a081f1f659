//! 2D geometry primitives.
//!
//! Fixed-point points, directed line segments, closed polygons and
//! polygons-with-holes. Integer coordinates are scaled nanometers so that
//! exact comparisons and winding tests stay robust; transient float math
//! goes through [`PointF`].

mod bounding_box;
mod expolygon;
mod line;
mod point;
mod polygon;

pub use bounding_box::BoundingBox;
pub use expolygon::{ExPolygon, ExPolygons};
pub use line::{Line, Lines};
pub use point::{Point, PointF, Points};
pub use polygon::Polygon;
