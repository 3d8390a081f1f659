//! End-to-end island sampling scenarios.
//!
//! Shapes mirror the classic test islands: tiny squares, triangles, long
//! bars, cross-roads, rings and holed plates. Assertions check the
//! observable contract: which point kinds come out, that every point lies
//! inside its island, that spacing bounds hold and that runs are
//! reproducible.

use sla_support::geometry::{ExPolygon, Point, Polygon};
use sla_support::island::{uniform_support_island, SampleConfig, SupportPointKind};
use sla_support::{scale, Coord, CoordF};

fn base_config() -> SampleConfig {
    let mut cfg = SampleConfig::from_head_radius(0.25);
    cfg.skeleton_sample_distance = scale(0.1);
    cfg.simplification_tolerance = scale(0.02);
    cfg
}

fn assert_all_inside(island: &ExPolygon, points: &[sla_support::SupportPoint], slack: Coord) {
    for p in points {
        assert!(
            island.contains_point(&p.position)
                || island.distance_to_boundary(&p.position) <= slack as CoordF,
            "{:?} ({:?}) outside the island",
            p.position,
            p.kind
        );
    }
}

fn assert_all_distinct(points: &[sla_support::SupportPoint]) {
    for i in 0..points.len() {
        for j in (i + 1)..points.len() {
            assert_ne!(
                points[i].position, points[j].position,
                "points {i} and {j} coincide"
            );
        }
    }
}

/// Triangular raster across the island; every raster point must have a
/// support within `max_distance`.
fn assert_coverage(island: &ExPolygon, points: &[sla_support::SupportPoint], max_distance: Coord) {
    let bbox = island.bounding_box();
    let step = scale(1.0);
    let mut y = bbox.min.y;
    while y <= bbox.max.y {
        let mut x = bbox.min.x;
        while x <= bbox.max.x {
            let probe = Point::new(x, y);
            if island.contains_point(&probe) {
                let nearest = points
                    .iter()
                    .map(|p| probe.distance(&p.position))
                    .fold(f64::INFINITY, f64::min);
                assert!(
                    nearest <= max_distance as CoordF,
                    "raster point {probe:?} is {nearest:.0} from the nearest support"
                );
            }
            x += step;
        }
        y += step;
    }
}

// scenario 1: a small triangle carried by one centered point
#[test]
fn triangle_gets_single_center_point() {
    let island = ExPolygon::new(Polygon::equilateral_triangle(scale(3.0)));
    let mut cfg = base_config();
    cfg.head_radius = scale(0.75);
    cfg.max_length_for_one_support_point = scale(6.0);

    let points = uniform_support_island(&island, &cfg).unwrap();
    assert_eq!(points.len(), 1);
    assert_eq!(points[0].kind, SupportPointKind::OneCenter);
    let centroid = island.contour.centroid();
    assert!(
        points[0].position.distance(&centroid) <= scale(0.1) as CoordF,
        "center point {:?} too far from centroid {:?}",
        points[0].position,
        centroid
    );
}

// scenario 2: a long thin bar sampled along its skeleton
#[test]
fn long_bar_is_sampled_along_the_spine() {
    let island = ExPolygon::rectangle(Point::new(0, 0), Point::new_scale(30.0, 1.5));
    let mut cfg = base_config();
    cfg.thick_min_width = scale(1.8);
    cfg.thin_max_width = scale(2.0);
    cfg.thin_max_distance = scale(9.0);
    cfg.max_length_for_one_support_point = scale(6.0);
    cfg.max_length_for_two_support_points = scale(12.0);
    cfg.min_part_length = scale(2.0);

    let points = uniform_support_island(&island, &cfg).unwrap();
    let spine: Vec<_> = points
        .iter()
        .filter(|p| p.kind == SupportPointKind::ThinPartChange)
        .collect();
    assert!(spine.len() >= 3, "only {} spine points", spine.len());
    assert_all_inside(&island, &points, scale(0.05));
    assert_all_distinct(&points);

    // consecutive spine points sit roughly one spacing apart along x
    let mut xs: Vec<Coord> = spine.iter().map(|p| p.position.x).collect();
    xs.sort_unstable();
    for pair in xs.windows(2) {
        let gap = pair[1] - pair[0];
        assert!(
            gap >= scale(6.0) && gap <= scale(12.0),
            "spine gap {gap} out of range"
        );
    }
    assert_coverage(&island, &points, cfg.thin_max_distance);
}

// scenario 3: a holed plate gets outline and interior supports
#[test]
fn holed_plate_gets_outline_and_inner_points() {
    let contour = Polygon::rectangle(Point::new(0, 0), Point::new_scale(15.0, 15.0));
    let mut hole = Polygon::rectangle(Point::new_scale(5.0, 5.0), Point::new_scale(10.0, 10.0));
    hole.make_clockwise();
    let island = ExPolygon::with_holes(contour, vec![hole.clone()]);

    let mut cfg = base_config();
    cfg.thick_min_width = scale(1.0);
    cfg.thin_max_width = scale(2.0);
    cfg.thick_inner_max_distance = scale(5.0);
    cfg.thick_outline_max_distance = scale(6.0);
    cfg.min_part_length = scale(2.0);

    let points = uniform_support_island(&island, &cfg).unwrap();
    assert_all_inside(&island, &points, scale(0.05));
    assert_all_distinct(&points);

    assert!(points
        .iter()
        .any(|p| p.kind == SupportPointKind::ThickInner));

    let outline: Vec<_> = points
        .iter()
        .filter(|p| p.kind == SupportPointKind::ThickOutline)
        .collect();
    assert!(!outline.is_empty());
    // outline points both near the outer contour and near the hole
    let near_hole = outline.iter().any(|p| {
        hole.distance_to_point(&p.position) <= scale(1.5) as CoordF
    });
    let near_contour = outline.iter().any(|p| {
        island.contour.distance_to_point(&p.position) <= scale(1.5) as CoordF
    });
    assert!(near_hole, "no outline point near the hole");
    assert!(near_contour, "no outline point near the contour");

    // nothing placed inside the hole
    for p in &points {
        assert!(!hole.contains_point(&p.position));
    }
}

fn cross_roads() -> ExPolygon {
    // two 20 x 1 mm bars crossing at right angles, as one polygon
    let h = scale(0.5);
    let l = scale(10.0);
    ExPolygon::new(Polygon::from_points(vec![
        Point::new(h, h),
        Point::new(h, l),
        Point::new(-h, l),
        Point::new(-h, h),
        Point::new(-l, h),
        Point::new(-l, -h),
        Point::new(-h, -h),
        Point::new(-h, -l),
        Point::new(h, -l),
        Point::new(h, -h),
        Point::new(l, -h),
        Point::new(l, h),
    ]))
}

// scenario 4: thin cross-roads sample as a tree over the skeleton
#[test]
fn cross_roads_sample_as_tree() {
    let island = cross_roads();
    let mut cfg = base_config();
    cfg.thick_min_width = scale(1.5);
    cfg.thin_max_width = scale(2.0);
    cfg.thin_max_distance = scale(4.0);
    cfg.max_length_for_one_support_point = scale(6.0);
    cfg.max_length_for_two_support_points = scale(12.0);
    cfg.min_part_length = scale(2.0);

    let points = uniform_support_island(&island, &cfg).unwrap();
    assert!(points.len() >= 6, "only {} points", points.len());
    assert_all_inside(&island, &points, scale(0.05));
    assert_all_distinct(&points);
    // all four arms hold points
    assert!(points.iter().any(|p| p.position.x > scale(5.0)));
    assert!(points.iter().any(|p| p.position.x < -scale(5.0)));
    assert!(points.iter().any(|p| p.position.y > scale(5.0)));
    assert!(points.iter().any(|p| p.position.y < -scale(5.0)));
    // a support sits near the junction
    let nearest_to_center = points
        .iter()
        .map(|p| p.position.distance(&Point::zero()))
        .fold(f64::INFINITY, f64::min);
    assert!(
        nearest_to_center <= scale(2.5) as CoordF,
        "nearest support {nearest_to_center:.0} from the junction"
    );
}

// scenario 5: a thin ring closes into a cycle of evenly spread points
#[test]
fn ring_is_sampled_around_its_cycle() {
    let outer = Polygon::circle(Point::zero(), scale(6.0), 64);
    let mut inner = Polygon::circle(Point::zero(), scale(5.0), 64);
    inner.make_clockwise();
    let island = ExPolygon::with_holes(outer, vec![inner]);

    let mut cfg = base_config();
    cfg.thick_min_width = scale(1.5);
    cfg.thin_max_width = scale(2.0);
    cfg.thin_max_distance = scale(9.0);
    cfg.max_length_for_one_support_point = scale(6.0);
    cfg.max_length_for_two_support_points = scale(12.0);
    cfg.min_part_length = scale(2.0);

    let points = uniform_support_island(&island, &cfg).unwrap();
    assert_all_inside(&island, &points, scale(0.1));
    assert_all_distinct(&points);

    // expected count from the mid-ring circumference
    let circumference = 2.0 * std::f64::consts::PI * 5.5;
    let expected = (circumference / 9.0).floor() as i64; // 3
    let count = points.len() as i64;
    assert!(
        (count - expected).abs() <= 2,
        "{count} points, expected about {expected}"
    );
    // all points hug the ring centerline
    for p in &points {
        let radius = p.position.distance(&Point::zero());
        assert!(
            (radius - scale(5.5) as CoordF).abs() <= scale(0.7) as CoordF,
            "point at radius {radius:.0}"
        );
    }
}

// scenario 6: an island smaller than the head needs exactly one point
#[test]
fn tiny_island_gets_bounding_box_center() {
    let island = ExPolygon::rectangle(Point::new(0, 0), Point::new_scale(0.3, 0.3));
    let mut cfg = base_config();
    cfg.head_radius = scale(0.4);

    let points = uniform_support_island(&island, &cfg).unwrap();
    assert_eq!(points.len(), 1);
    assert_eq!(points[0].kind, SupportPointKind::OneBbCenter);
    assert!(points[0]
        .position
        .coincides_with(&Point::new_scale(0.15, 0.15), scale(0.01)));
}

// repeated runs on the same input are byte-identical
#[test]
fn sampling_is_deterministic() {
    let island = cross_roads();
    let mut cfg = base_config();
    cfg.thick_min_width = scale(1.5);
    cfg.thin_max_width = scale(2.0);
    cfg.thin_max_distance = scale(4.0);
    cfg.max_length_for_two_support_points = scale(12.0);

    let first = uniform_support_island(&island, &cfg).unwrap();
    let second = uniform_support_island(&island, &cfg).unwrap();
    assert_eq!(first.len(), second.len());
    for (a, b) in first.iter().zip(&second) {
        assert_eq!(a.position, b.position);
        assert_eq!(a.kind, b.kind);
    }
}

// rotating the island keeps the point count stable
#[test]
fn rotation_keeps_point_count_stable() {
    let island = ExPolygon::rectangle(Point::new(0, 0), Point::new_scale(30.0, 1.5));
    let mut rotated = island.clone();
    rotated.rotate_around(std::f64::consts::PI / 3.0, Point::zero());

    let mut cfg = base_config();
    cfg.thick_min_width = scale(1.8);
    cfg.thin_max_width = scale(2.0);
    cfg.thin_max_distance = scale(9.0);
    cfg.max_length_for_two_support_points = scale(12.0);
    cfg.min_part_length = scale(2.0);

    let upright = uniform_support_island(&island, &cfg).unwrap();
    let turned = uniform_support_island(&rotated, &cfg).unwrap();
    let diff = (upright.len() as i64 - turned.len() as i64).abs();
    assert!(
        diff <= 1,
        "{} upright vs {} rotated points",
        upright.len(),
        turned.len()
    );
}

// a narrow bar longer than the one-point limit gets the stretched pair
#[test]
fn short_narrow_bar_gets_two_points() {
    let island = ExPolygon::rectangle(Point::new(0, 0), Point::new_scale(10.0, 1.0));
    let mut cfg = base_config();
    cfg.thick_min_width = scale(1.2);
    cfg.thin_max_width = scale(2.0);
    cfg.max_length_for_one_support_point = scale(4.0);
    cfg.max_length_for_two_support_points = scale(14.0);

    let points = uniform_support_island(&island, &cfg).unwrap();
    assert_eq!(points.len(), 2);
    assert!(points
        .iter()
        .all(|p| p.kind == SupportPointKind::TwoPoints));
    assert_all_inside(&island, &points, scale(0.05));
    // the pair stretches the bar: one point on each half
    let mid_x = scale(5.0);
    assert!(points.iter().any(|p| p.position.x < mid_x));
    assert!(points.iter().any(|p| p.position.x > mid_x));
}
