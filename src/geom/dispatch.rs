//! Pairwise collision dispatch
//!
//! An exhaustive match over both shapes' geometry. Each unordered kind
//! pair has one canonical test in `collision`; the swapped order calls
//! the same test with its arguments swapped, so the answer never depends
//! on argument order.

use glam::Vec2;

use super::collision::*;
use super::shape::{Geometry, Shape};
use crate::settings::Tolerances;

/// Do two shapes intersect, with both owners at the world origin
pub fn collides(a: &Shape, b: &Shape) -> bool {
    collides_at(a, Vec2::ZERO, b, Vec2::ZERO)
}

/// Do two shapes intersect when their owners sit at `owner_a` / `owner_b`
pub fn collides_at(a: &Shape, owner_a: Vec2, b: &Shape, owner_b: Vec2) -> bool {
    collides_with(a, owner_a, b, owner_b, &Tolerances::default())
}

/// Full form of [`collides_at`] with explicit tolerances
///
/// A non-finite owner position never collides.
pub fn collides_with(
    a: &Shape,
    owner_a: Vec2,
    b: &Shape,
    owner_b: Vec2,
    tol: &Tolerances,
) -> bool {
    use Geometry::*;

    if !owner_a.is_finite() || !owner_b.is_finite() {
        log::debug!("Skipping collision test with non-finite owner {owner_a} / {owner_b}");
        return false;
    }

    let pa = a.anchor(owner_a);
    let pb = b.anchor(owner_b);
    let eps = tol.point_epsilon;
    let thick = tol.line_thickness;
    let parallel = tol.parallel_epsilon;

    match (a.geometry(), b.geometry()) {
        // Point
        (Point, Point) => point_point(pa, pb, eps),
        (Point, Line { start, end }) => point_line(pa, pb + *start, pb + *end, thick),
        (Point, Box { .. }) => point_box(pa, &b.bounds_at(owner_b)),
        (Point, Circle { radius }) => point_circle(pa, pb, *radius),
        (Point, RightTriangle(tri)) => point_triangle(pa, tri, pb),
        (Point, Polygon(poly)) => point_polygon(pa, poly, pb),
        (Point, Grid(grid)) => point_grid(pa, grid, pb),

        // Line
        (Line { start, end }, Point) => point_line(pb, pa + *start, pa + *end, thick),
        (Line { start: a0, end: a1 }, Line { start: b0, end: b1 }) => {
            line_line(pa + *a0, pa + *a1, pb + *b0, pb + *b1, thick, parallel)
        }
        (Line { start, end }, Box { .. }) => {
            line_box(pa + *start, pa + *end, &b.bounds_at(owner_b))
        }
        (Line { start, end }, Circle { radius }) => {
            line_circle(pa + *start, pa + *end, pb, *radius)
        }
        (Line { start, end }, RightTriangle(tri)) => {
            line_triangle(pa + *start, pa + *end, tri, pb)
        }
        (Line { start, end }, Polygon(poly)) => {
            line_polygon(pa + *start, pa + *end, poly, pb, thick, parallel)
        }
        (Line { start, end }, Grid(grid)) => line_grid(pa + *start, pa + *end, grid, pb),

        // Box
        (Box { .. }, Point) => point_box(pb, &a.bounds_at(owner_a)),
        (Box { .. }, Line { start, end }) => {
            line_box(pb + *start, pb + *end, &a.bounds_at(owner_a))
        }
        (Box { .. }, Box { .. }) => box_box(&a.bounds_at(owner_a), &b.bounds_at(owner_b)),
        (Box { .. }, Circle { radius }) => box_circle(&a.bounds_at(owner_a), pb, *radius),
        (Box { .. }, RightTriangle(tri)) => box_triangle(&a.bounds_at(owner_a), tri, pb),
        (Box { .. }, Polygon(poly)) => box_polygon(&a.bounds_at(owner_a), poly, pb),
        (Box { .. }, Grid(grid)) => box_grid(&a.bounds_at(owner_a), grid, pb),

        // Circle
        (Circle { radius }, Point) => point_circle(pb, pa, *radius),
        (Circle { radius }, Line { start, end }) => {
            line_circle(pb + *start, pb + *end, pa, *radius)
        }
        (Circle { radius }, Box { .. }) => box_circle(&b.bounds_at(owner_b), pa, *radius),
        (Circle { radius: ra }, Circle { radius: rb }) => circle_circle(pa, *ra, pb, *rb),
        (Circle { radius }, RightTriangle(tri)) => circle_triangle(pa, *radius, tri, pb),
        (Circle { radius }, Polygon(poly)) => circle_polygon(pa, *radius, poly, pb),
        (Circle { radius }, Grid(grid)) => circle_grid(pa, *radius, grid, pb),

        // Right triangle
        (RightTriangle(tri), Point) => point_triangle(pb, tri, pa),
        (RightTriangle(tri), Line { start, end }) => {
            line_triangle(pb + *start, pb + *end, tri, pa)
        }
        (RightTriangle(tri), Box { .. }) => box_triangle(&b.bounds_at(owner_b), tri, pa),
        (RightTriangle(tri), Circle { radius }) => circle_triangle(pb, *radius, tri, pa),
        (RightTriangle(ta), RightTriangle(tb)) => triangle_triangle(ta, pa, tb, pb),
        (RightTriangle(tri), Polygon(poly)) => triangle_polygon(tri, pa, poly, pb),
        (RightTriangle(tri), Grid(grid)) => triangle_grid(tri, pa, grid, pb),

        // Polygon
        (Polygon(poly), Point) => point_polygon(pb, poly, pa),
        (Polygon(poly), Line { start, end }) => {
            line_polygon(pb + *start, pb + *end, poly, pa, thick, parallel)
        }
        (Polygon(poly), Box { .. }) => box_polygon(&b.bounds_at(owner_b), poly, pa),
        (Polygon(poly), Circle { radius }) => circle_polygon(pb, *radius, poly, pa),
        (Polygon(poly), RightTriangle(tri)) => triangle_polygon(tri, pb, poly, pa),
        (Polygon(pa_poly), Polygon(pb_poly)) => polygon_polygon(pa_poly, pa, pb_poly, pb),
        (Polygon(poly), Grid(grid)) => polygon_grid(poly, pa, grid, pb),

        // Grid
        (Grid(grid), Point) => point_grid(pb, grid, pa),
        (Grid(grid), Line { start, end }) => line_grid(pb + *start, pb + *end, grid, pa),
        (Grid(grid), Box { .. }) => box_grid(&b.bounds_at(owner_b), grid, pa),
        (Grid(grid), Circle { radius }) => circle_grid(pb, *radius, grid, pa),
        (Grid(grid), RightTriangle(tri)) => triangle_grid(tri, pb, grid, pa),
        (Grid(grid), Polygon(poly)) => polygon_grid(poly, pb, grid, pa),
        (Grid(ga), Grid(gb)) => grid_grid(ga, pa, gb, pb),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::grid::OccupancyGrid;
    use crate::geom::shape::ShapeKind;
    use crate::geom::triangle::Corner;
    use proptest::prelude::*;

    fn one_of_each() -> Vec<Shape> {
        vec![
            Shape::point(Vec2::new(5.0, 5.0)).unwrap(),
            Shape::line(Vec2::new(0.0, 10.0), Vec2::new(10.0, 0.0)).unwrap(),
            Shape::new_box(Vec2::new(2.0, 2.0), Vec2::new(8.0, 8.0)).unwrap(),
            Shape::circle(Vec2::new(6.0, 6.0), 4.0).unwrap(),
            Shape::right_triangle(Vec2::ZERO, Vec2::new(11.0, 11.0), Corner::NorthEast).unwrap(),
            Shape::polygon(
                Vec2::new(5.0, 5.0),
                vec![
                    Vec2::new(0.0, -4.0),
                    Vec2::new(4.0, 0.0),
                    Vec2::new(0.0, 4.0),
                    Vec2::new(-4.0, 0.0),
                ],
            )
            .unwrap(),
            Shape::grid(
                Vec2::ZERO,
                OccupancyGrid::from_rows(5, 5, &["##..", "##..", "....", "...."]).unwrap(),
            )
            .unwrap(),
        ]
    }

    #[test]
    fn test_every_pair_is_dispatched() {
        let shapes = one_of_each();
        let kinds: Vec<ShapeKind> = shapes.iter().map(Shape::kind).collect();
        assert_eq!(kinds, ShapeKind::ALL);

        // All of these overlap around (5, 5)
        for a in &shapes {
            for b in &shapes {
                assert!(collides(a, b), "{} vs {} should collide", a.kind(), b.kind());
            }
        }
    }

    #[test]
    fn test_far_apart_pairs_miss() {
        let shapes = one_of_each();
        let far = Vec2::new(1000.0, -1000.0);
        for a in &shapes {
            for b in &shapes {
                assert!(
                    !collides_at(a, Vec2::ZERO, b, far),
                    "{} vs {} should miss",
                    a.kind(),
                    b.kind()
                );
            }
        }
    }

    #[test]
    fn test_circle_scenarios() {
        let a = Shape::circle(Vec2::new(0.0, 0.0), 5.0).unwrap();
        let touching = Shape::circle(Vec2::new(10.0, 0.0), 5.0).unwrap();
        let apart = Shape::circle(Vec2::new(11.0, 0.0), 5.0).unwrap();
        assert!(collides(&a, &touching));
        assert!(!collides(&a, &apart));
    }

    #[test]
    fn test_point_box_scenarios() {
        let b = Shape::new_box(Vec2::ZERO, Vec2::new(10.0, 10.0)).unwrap();
        assert!(collides(&Shape::point(Vec2::new(5.0, 5.0)).unwrap(), &b));
        assert!(collides(&Shape::point(Vec2::new(9.0, 9.0)).unwrap(), &b));
        assert!(!collides(&Shape::point(Vec2::new(10.0, 10.0)).unwrap(), &b));
    }

    #[test]
    fn test_abutting_boxes_collide() {
        let a = Shape::new_box(Vec2::new(0.0, 0.0), Vec2::new(10.0, 10.0)).unwrap();
        let b = Shape::new_box(Vec2::new(10.0, 0.0), Vec2::new(10.0, 10.0)).unwrap();
        assert!(collides(&a, &b));
        assert!(collides(&b, &a));
    }

    #[test]
    fn test_owner_position_moves_shape_without_mutation() {
        let a = Shape::new_box(Vec2::ZERO, Vec2::new(10.0, 10.0)).unwrap();
        let b = Shape::new_box(Vec2::new(50.0, 0.0), Vec2::new(10.0, 10.0)).unwrap();
        let before = a.clone();

        assert!(!collides(&a, &b));
        assert!(collides_at(&a, Vec2::new(45.0, 0.0), &b, Vec2::ZERO));
        assert_eq!(a, before);
    }

    #[test]
    fn test_origin_offsets_anchor() {
        let centered = Shape::new_box(Vec2::ZERO, Vec2::new(10.0, 10.0))
            .unwrap()
            .with_origin(Vec2::new(5.0, 5.0))
            .unwrap();
        let owner = Vec2::new(10.0, 10.0);
        let inside = Shape::point(Vec2::new(5.0, 5.0)).unwrap();
        let outside = Shape::point(Vec2::new(4.0, 4.0)).unwrap();
        assert!(collides_at(&centered, owner, &inside, Vec2::ZERO));
        assert!(!collides_at(&centered, owner, &outside, Vec2::ZERO));
    }

    #[test]
    fn test_tolerances_change_point_line() {
        let line = Shape::line(Vec2::new(0.0, 0.0), Vec2::new(10.0, 0.0)).unwrap();
        let p = Shape::point(Vec2::new(5.0, 0.4)).unwrap();
        assert!(collides(&p, &line));

        let exact = Tolerances::from_preset(crate::settings::TolerancePreset::Exact);
        assert!(!collides_with(&p, Vec2::ZERO, &line, Vec2::ZERO, &exact));
    }

    #[test]
    fn test_non_finite_owner_never_collides() {
        let grid = OccupancyGrid::from_rows(10, 10, &["##"]).unwrap();
        let level = Shape::grid(Vec2::ZERO, grid).unwrap();
        let pixel = Shape::new_box(Vec2::ZERO, Vec2::ONE).unwrap();

        assert!(collides_at(&pixel, Vec2::new(5.0, 5.0), &level, Vec2::ZERO));
        assert!(!collides_at(&pixel, Vec2::NAN, &level, Vec2::ZERO));
        assert!(!collides_at(&level, Vec2::ZERO, &pixel, Vec2::new(f32::INFINITY, 0.0)));
        for shape in one_of_each() {
            assert!(!collides_at(&shape, Vec2::NAN, &shape, Vec2::NAN));
        }
    }

    #[test]
    fn test_polygon_gap_sweep() {
        let square = vec![
            Vec2::ZERO,
            Vec2::new(10.0, 0.0),
            Vec2::new(10.0, 10.0),
            Vec2::new(0.0, 10.0),
        ];
        let a = Shape::polygon(Vec2::ZERO, square.clone()).unwrap();
        let b = Shape::polygon(Vec2::new(10.0, 0.0), square).unwrap();

        assert!(collides(&a, &b));
        for gap in [0.25, 1.0, 7.5] {
            assert!(!collides_at(&a, Vec2::ZERO, &b, Vec2::new(gap, 0.0)));
        }
    }

    fn coord() -> impl Strategy<Value = f32> {
        (-20i32..20).prop_map(|v| v as f32)
    }

    fn extent() -> impl Strategy<Value = f32> {
        (0i32..16).prop_map(|v| v as f32)
    }

    fn corner() -> impl Strategy<Value = Corner> {
        prop::sample::select(Corner::ALL.to_vec())
    }

    fn shape() -> impl Strategy<Value = Shape> {
        prop_oneof![
            (coord(), coord()).prop_map(|(x, y)| Shape::point(Vec2::new(x, y)).unwrap()),
            (coord(), coord(), coord(), coord())
                .prop_map(|(x0, y0, x1, y1)| Shape::line(Vec2::new(x0, y0), Vec2::new(x1, y1))
                    .unwrap()),
            (coord(), coord(), extent(), extent()).prop_map(|(x, y, w, h)| Shape::new_box(
                Vec2::new(x, y),
                Vec2::new(w, h)
            )
            .unwrap()),
            (coord(), coord(), extent()).prop_map(|(x, y, r)| Shape::circle(Vec2::new(x, y), r)
                .unwrap()),
            (coord(), coord(), extent(), extent(), corner()).prop_map(|(x, y, w, h, c)| {
                Shape::right_triangle(Vec2::new(x, y), Vec2::new(w, h), c).unwrap()
            }),
            (coord(), coord(), 1i32..12, 1i32..12).prop_map(|(x, y, w, h)| {
                let (w, h) = (w as f32, h as f32);
                Shape::polygon(
                    Vec2::new(x, y),
                    vec![Vec2::ZERO, Vec2::new(w, 0.0), Vec2::new(w * 0.5, h)],
                )
                .unwrap()
            }),
            (coord(), coord(), prop::collection::vec(0u16..3, 9)).prop_map(|(x, y, tiles)| {
                let grid = OccupancyGrid::from_tiles(12, 12, 4, 4, tiles).unwrap();
                Shape::grid(Vec2::new(x, y), grid).unwrap()
            }),
        ]
    }

    proptest! {
        #[test]
        fn prop_dispatch_is_symmetric(a in shape(), b in shape()) {
            prop_assert_eq!(collides(&a, &b), collides(&b, &a));
        }

        #[test]
        fn prop_shape_hits_its_copy(a in shape()) {
            if let Geometry::Grid(grid) = a.geometry() {
                prop_assume!(grid.filled_count() > 0);
            }
            let copy = a.clone();
            prop_assert!(collides(&a, &copy));
        }

        #[test]
        fn prop_box_box_gap(w in 1i32..20, h in 1i32..20, gap in 0i32..10) {
            let size = Vec2::new(w as f32, h as f32);
            let a = Shape::new_box(Vec2::ZERO, size).unwrap();
            let b = Shape::new_box(Vec2::new((w + gap) as f32, 0.0), size).unwrap();
            prop_assert_eq!(collides(&a, &b), gap == 0);
        }

        #[test]
        fn prop_polygon_gap(w in 1i32..20, h in 1i32..20, gap in 0i32..10) {
            let (wf, hf) = (w as f32, h as f32);
            let verts = vec![Vec2::ZERO, Vec2::new(wf, 0.0), Vec2::new(wf, hf), Vec2::new(0.0, hf)];
            let a = Shape::polygon(Vec2::ZERO, verts.clone()).unwrap();
            let b = Shape::polygon(Vec2::new((w + gap) as f32, 0.0), verts).unwrap();
            prop_assert_eq!(collides(&a, &b), gap == 0);
        }
    }
}
