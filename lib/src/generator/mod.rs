//! Layer intake and support point generation over a slice stack.
//!
//! The island engine works on one region at a time; this module walks a
//! whole stack of slices, decides which regions need fresh supports and
//! carries existing support points upward while they still help:
//!
//! 1. **Part linking** — each layer's regions are linked to the regions of
//!    the layer below they overlap.
//! 2. **Island detection** — a part with no link below floats in resin and
//!    is sampled with [`uniform_support_island`].
//! 3. **Overhang handling** — the portion of a linked part that juts out
//!    farther than `self_supported_width` is an overhang. Wide overhangs
//!    become [`Peninsula`]s; narrow rims get a point only where no carried
//!    support is near enough.
//! 4. **Propagation** — points from below stay active while they remain
//!    inside the current layer's parts; a uniform grid answers the
//!    is-anything-near queries.

use crate::clipper;
use crate::geometry::{ExPolygon, ExPolygons, Point};
use crate::island::{
    uniform_support_island, uniform_support_peninsula, Peninsula, SampleConfig, SampleError,
    SupportPoint, SupportPointKind,
};
use crate::{Coord, CoordF};

/// One region of one layer, linked to the regions below it.
#[derive(Debug, Clone)]
pub struct LayerPart {
    pub shape: ExPolygon,
    /// Indices into the previous layer's `parts`.
    pub links_below: Vec<usize>,
}

/// One slice with its parts.
#[derive(Debug, Clone)]
pub struct Layer {
    pub print_z: CoordF,
    pub parts: Vec<LayerPart>,
}

/// A support point placed on a specific layer.
#[derive(Debug, Clone)]
pub struct LayerSupportPoint {
    pub position: Point,
    pub layer: usize,
    pub print_z: CoordF,
    pub kind: SupportPointKind,
}

/// Assemble layers from a slice stack and link parts to the layer below.
pub fn prepare_layer_parts(slices: &[(CoordF, ExPolygons)]) -> Vec<Layer> {
    let mut layers: Vec<Layer> = Vec::with_capacity(slices.len());
    for (layer_index, (print_z, shapes)) in slices.iter().enumerate() {
        let mut parts = Vec::with_capacity(shapes.len());
        for shape in shapes {
            let mut links_below = Vec::new();
            if layer_index > 0 {
                let below = &layers[layer_index - 1].parts;
                let bbox = shape.bounding_box();
                for (below_index, below_part) in below.iter().enumerate() {
                    let below_bbox = below_part.shape.bounding_box();
                    if bbox.min.x > below_bbox.max.x
                        || below_bbox.min.x > bbox.max.x
                        || bbox.min.y > below_bbox.max.y
                        || below_bbox.min.y > bbox.max.y
                    {
                        continue;
                    }
                    if clipper::overlaps(
                        std::slice::from_ref(shape),
                        std::slice::from_ref(&below_part.shape),
                    ) {
                        links_below.push(below_index);
                    }
                }
            }
            parts.push(LayerPart {
                shape: shape.clone(),
                links_below,
            });
        }
        layers.push(Layer {
            print_z: *print_z,
            parts,
        });
    }
    layers
}

/// Uniform grid over point positions answering "is any point within
/// `radius` of here".
pub struct PointGrid {
    cell: Coord,
    radius_sq: i128,
    cells: std::collections::HashMap<(Coord, Coord), Vec<Point>>,
}

impl PointGrid {
    pub fn new(radius: Coord) -> Self {
        Self {
            cell: radius.max(1),
            radius_sq: (radius as i128) * (radius as i128),
            cells: std::collections::HashMap::new(),
        }
    }

    fn key(&self, p: &Point) -> (Coord, Coord) {
        (p.x.div_euclid(self.cell), p.y.div_euclid(self.cell))
    }

    pub fn insert(&mut self, p: Point) {
        let key = self.key(&p);
        self.cells.entry(key).or_default().push(p);
    }

    pub fn covers(&self, p: &Point) -> bool {
        let (kx, ky) = self.key(p);
        for dx in -1..=1 {
            for dy in -1..=1 {
                if let Some(bucket) = self.cells.get(&(kx + dx, ky + dy)) {
                    if bucket
                        .iter()
                        .any(|q| p.distance_squared(q) <= self.radius_sq)
                    {
                        return true;
                    }
                }
            }
        }
        false
    }
}

/// Generate support points for a whole slice stack.
///
/// Degenerate input geometry is reported; a layer region whose skeleton
/// cannot be built contributes no points (the caller may re-slice or
/// loosen the simplification tolerance).
pub fn generate_support_points(
    slices: &[(CoordF, ExPolygons)],
    config: &SampleConfig,
) -> Result<Vec<LayerSupportPoint>, SampleError> {
    let layers = prepare_layer_parts(slices);
    let support_radius = config.max_distance();

    let mut result: Vec<LayerSupportPoint> = Vec::new();
    let mut active: Vec<Point> = Vec::new();
    for (layer_index, layer) in layers.iter().enumerate() {
        // drop carried points that left the model
        active.retain(|p| layer.parts.iter().any(|part| part.shape.contains_point(p)));
        let mut grid = PointGrid::new(support_radius);
        for p in &active {
            grid.insert(*p);
        }

        let mut fresh: Vec<SupportPoint> = Vec::new();
        for part in &layer.parts {
            if part.links_below.is_empty() {
                match uniform_support_island(&part.shape, config) {
                    Ok(points) => fresh.extend(points),
                    Err(SampleError::GeometryInput(message)) => {
                        return Err(SampleError::GeometryInput(message))
                    }
                    Err(_) => {} // no usable skeleton, nothing to place
                }
                continue;
            }
            let below: ExPolygons = part
                .links_below
                .iter()
                .map(|&i| layers[layer_index - 1].parts[i].shape.clone())
                .collect();
            fresh.extend(sample_overhangs(part, &below, &grid, config));
        }

        for point in fresh {
            grid.insert(point.position);
            active.push(point.position);
            result.push(LayerSupportPoint {
                position: point.position,
                layer: layer_index,
                print_z: layer.print_z,
                kind: point.kind,
            });
        }
    }
    Ok(result)
}

/// Support the overhanging fringe of a linked part.
fn sample_overhangs(
    part: &LayerPart,
    below: &ExPolygons,
    covered: &PointGrid,
    config: &SampleConfig,
) -> Vec<SupportPoint> {
    let mut supported = Vec::new();
    for shape in below {
        supported.extend(clipper::offset_expolygon_miter(
            shape,
            config.self_supported_width,
        ));
    }
    let overhangs = clipper::difference(std::slice::from_ref(&part.shape), &supported);

    let mut points = Vec::new();
    for overhang in overhangs {
        if overhang.contour.len() < 3 || overhang.area() <= 0.0 {
            continue;
        }
        // wide overhangs keep their interior only after shrinking by half
        // the peninsula width
        let is_wide = !clipper::offset_expolygon_miter(&overhang, -config.peninsula_min_width / 2)
            .is_empty();
        if is_wide {
            let peninsula = Peninsula {
                is_outline: peninsula_outline_flags(&overhang, below, config),
                unsupported_area: overhang,
            };
            if let Ok(sampled) = uniform_support_peninsula(&peninsula, config) {
                points.extend(sampled);
            }
        } else {
            // narrow rim: one point at the centroid unless something
            // carried from below already covers it
            let centroid = overhang.centroid();
            if !covered.covers(&centroid) {
                points.push(SupportPoint::fixed(centroid, SupportPointKind::OneCenter));
            }
        }
    }
    points
}

/// Boundary lines of an overhang that touch the supported region are cut
/// lines, not model outline.
fn peninsula_outline_flags(
    overhang: &ExPolygon,
    below: &ExPolygons,
    config: &SampleConfig,
) -> Vec<bool> {
    let tolerance = (config.self_supported_width / 4).max(1);
    overhang
        .boundary_lines()
        .iter()
        .map(|line| {
            let middle = line.middle();
            !below
                .iter()
                .any(|shape| shape.distance_to_boundary(&middle) <= tolerance as CoordF + config.self_supported_width as CoordF)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scale;

    fn square(x: f64, y: f64, size: f64) -> ExPolygon {
        ExPolygon::rectangle(Point::new_scale(x, y), Point::new_scale(x + size, y + size))
    }

    fn test_config() -> SampleConfig {
        let mut cfg = SampleConfig::from_head_radius(0.25);
        cfg.skeleton_sample_distance = scale(0.1);
        cfg
    }

    #[test]
    fn test_prepare_links_overlapping_parts() {
        let slices = vec![
            (0.1, vec![square(0.0, 0.0, 10.0)]),
            (0.2, vec![square(2.0, 2.0, 10.0), square(50.0, 50.0, 5.0)]),
        ];
        let layers = prepare_layer_parts(&slices);
        assert_eq!(layers[1].parts[0].links_below, vec![0]);
        assert!(layers[1].parts[1].links_below.is_empty());
    }

    #[test]
    fn test_point_grid_covers() {
        let mut grid = PointGrid::new(1_000);
        grid.insert(Point::new(0, 0));
        assert!(grid.covers(&Point::new(800, 0)));
        assert!(!grid.covers(&Point::new(1_500, 0)));
    }

    #[test]
    fn test_first_layer_parts_are_islands() {
        let slices = vec![(0.1, vec![square(0.0, 0.0, 3.0)])];
        let points = generate_support_points(&slices, &test_config()).unwrap();
        assert!(!points.is_empty());
        assert!(points.iter().all(|p| p.layer == 0));
    }

    #[test]
    fn test_supported_column_needs_no_new_points() {
        // identical square repeated: layer 1 is fully supported by layer 0
        let slices = vec![
            (0.1, vec![square(0.0, 0.0, 3.0)]),
            (0.2, vec![square(0.0, 0.0, 3.0)]),
        ];
        let points = generate_support_points(&slices, &test_config()).unwrap();
        assert!(points.iter().all(|p| p.layer == 0));
    }

    #[test]
    fn test_new_island_on_upper_layer() {
        let slices = vec![
            (0.1, vec![square(0.0, 0.0, 3.0)]),
            (0.2, vec![square(0.0, 0.0, 3.0), square(20.0, 20.0, 3.0)]),
        ];
        let points = generate_support_points(&slices, &test_config()).unwrap();
        assert!(points.iter().any(|p| p.layer == 1));
    }
}
