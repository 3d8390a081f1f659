//! Polygon boolean and offset operations over geo-clipper.
//!
//! Fixed-point geometry is converted to `geo` polygons in millimeters,
//! run through the clipper bindings, and converted back. The island
//! sampler leans on three operations: intersecting Voronoi cells with the
//! island during alignment, insetting thick-part fields, and the layer
//! generator's layer-difference overhang arithmetic.

use crate::geometry::{ExPolygon, ExPolygons, Point, Polygon};
use crate::{scale, unscale, Coord, CoordF};
use geo::{Coord as GeoCoord, LineString, MultiPolygon, Polygon as GeoPolygon};
use geo_clipper::{Clipper, EndType, JoinType};

/// Clipper scaling factor for the mm-domain calls; 10⁶ keeps the clipper
/// integer grid at exactly one nanometer, so offsets round-trip without
/// drift and the field builder's inset matching stays within tolerance.
const CLIPPER_PRECISION: CoordF = 1_000_000.0;

fn ring_to_geo(points: &[Point]) -> LineString<f64> {
    let mut ring: Vec<GeoCoord<f64>> = points
        .iter()
        .map(|p| GeoCoord {
            x: unscale(p.x),
            y: unscale(p.y),
        })
        .collect();
    if let (Some(first), Some(last)) = (ring.first().copied(), ring.last().copied()) {
        if first != last {
            ring.push(first);
        }
    }
    LineString::new(ring)
}

fn polygon_to_geo(poly: &Polygon) -> GeoPolygon<f64> {
    GeoPolygon::new(ring_to_geo(poly.points()), vec![])
}

fn expolygon_to_geo(expoly: &ExPolygon) -> GeoPolygon<f64> {
    let holes = expoly.holes.iter().map(|h| ring_to_geo(h.points())).collect();
    GeoPolygon::new(ring_to_geo(expoly.contour.points()), holes)
}

fn geo_ring_to_polygon(ring: &LineString<f64>) -> Polygon {
    let mut points: Vec<Point> = ring
        .coords()
        .map(|c| Point::new(scale(c.x), scale(c.y)))
        .collect();
    if points.len() > 1 && points.first() == points.last() {
        points.pop();
    }
    Polygon::from_points(points)
}

fn geo_to_expolygon(geo_poly: &GeoPolygon<f64>) -> ExPolygon {
    let contour = geo_ring_to_polygon(geo_poly.exterior());
    let holes = geo_poly.interiors().iter().map(geo_ring_to_polygon).collect();
    ExPolygon::with_holes(contour, holes)
}

fn geo_multi_to_expolygons(multi: &MultiPolygon<f64>) -> ExPolygons {
    multi
        .0
        .iter()
        .map(geo_to_expolygon)
        .filter(|p| p.contour.len() >= 3)
        .collect()
}

fn expolygons_to_geo_multi(expolys: &[ExPolygon]) -> MultiPolygon<f64> {
    MultiPolygon::new(expolys.iter().map(expolygon_to_geo).collect())
}

/// Intersection of one polygon with one polygon-with-holes.
///
/// Used by the alignment step to clip a support point's Voronoi cell to the
/// island; the result may fall apart into several pieces.
pub fn intersection_with_polygon(cell: &Polygon, island: &ExPolygon) -> ExPolygons {
    if cell.len() < 3 || island.is_empty() {
        return vec![];
    }
    let result = polygon_to_geo(cell).intersection(&expolygon_to_geo(island), CLIPPER_PRECISION);
    geo_multi_to_expolygons(&result)
}

/// Intersection of two polygon sets.
pub fn intersection(subject: &[ExPolygon], clip: &[ExPolygon]) -> ExPolygons {
    if subject.is_empty() || clip.is_empty() {
        return vec![];
    }
    let result = expolygons_to_geo_multi(subject)
        .intersection(&expolygons_to_geo_multi(clip), CLIPPER_PRECISION);
    geo_multi_to_expolygons(&result)
}

/// Difference `subject - clip`.
pub fn difference(subject: &[ExPolygon], clip: &[ExPolygon]) -> ExPolygons {
    if subject.is_empty() {
        return vec![];
    }
    if clip.is_empty() {
        return subject.to_vec();
    }
    let result = expolygons_to_geo_multi(subject)
        .difference(&expolygons_to_geo_multi(clip), CLIPPER_PRECISION);
    geo_multi_to_expolygons(&result)
}

/// Union of a polygon set.
pub fn union(polygons: &[ExPolygon]) -> ExPolygons {
    match polygons.len() {
        0 => vec![],
        1 => polygons.to_vec(),
        _ => {
            let (first, rest) = polygons.split_at(1);
            let result = expolygons_to_geo_multi(first)
                .union(&expolygons_to_geo_multi(rest), CLIPPER_PRECISION);
            geo_multi_to_expolygons(&result)
        }
    }
}

/// Offset a polygon-with-holes by `delta` scaled units with mitre joins.
///
/// Negative `delta` shrinks. Mitre joins keep offset segments parallel to
/// their sources, which the field builder's segment matching relies on.
pub fn offset_expolygon_miter(expolygon: &ExPolygon, delta: Coord) -> ExPolygons {
    if expolygon.is_empty() {
        return vec![];
    }
    let result = expolygon_to_geo(expolygon).offset(
        unscale(delta),
        JoinType::Miter(2.0),
        EndType::ClosedPolygon,
        CLIPPER_PRECISION,
    );
    geo_multi_to_expolygons(&result)
}

/// True when the two sets overlap with nonzero area.
pub fn overlaps(a: &[ExPolygon], b: &[ExPolygon]) -> bool {
    intersection(a, b).iter().any(|p| p.area() > 0.0)
}
