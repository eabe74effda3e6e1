//! Tests for polygon outlines

use glam::{Vec2, Vec3};
use partysim_core::polygon::Polygon2D;
use partysim_core::tests::test_helpers::approx_eq_vec2;

#[test]
fn test_box_corners_are_counter_clockwise() {
    let red = Vec3::new(1.0, 0.0, 0.0);
    let poly = Polygon2D::build_box(red, Vec2::new(-1.0, -1.0), 2.0, 3.0, false);

    assert_eq!(
        poly.points(),
        &[
            Vec2::new(-1.0, -1.0),
            Vec2::new(1.0, -1.0),
            Vec2::new(1.0, 2.0),
            Vec2::new(-1.0, 2.0),
        ]
    );
    assert_eq!(poly.color(), red);
    assert!(!poly.is_inner());
}

#[test]
fn test_circle_is_centered() {
    let center = Vec2::new(3.0, -2.0);
    let poly = Polygon2D::build_circle(Vec3::ONE, center, 0.5, 16, true);

    assert_eq!(poly.points().len(), 16);
    assert!(approx_eq_vec2(poly.points()[0], Vec2::new(3.5, -2.0), 1e-6));
    assert!(approx_eq_vec2(poly.points()[4], Vec2::new(3.0, -1.5), 1e-5));
    for p in poly.points() {
        assert!((p.distance(center) - 0.5).abs() < 1e-5);
    }
    assert!(poly.is_inner());
}

#[test]
fn test_circle_without_segments_is_empty() {
    let poly = Polygon2D::build_circle(Vec3::ONE, Vec2::ZERO, 1.0, 0, false);
    assert!(poly.points().is_empty());
}
