use super::*;

#[test]
fn identity_space_is_a_no_op() {
    let s = CoordSpace::default();
    let p = Point::new(12.5, -3.0);
    assert_eq!(s.to_canonical(p), p);
    assert_eq!(s.to_pixel(p), p);
}

#[test]
fn half_scale_doubles_canonical_extent() {
    let s = CoordSpace::new(Vec2::new(0.5, 0.5), 1.0).unwrap();
    assert_eq!(s.to_canonical(Point::new(10.0, 4.0)), Point::new(20.0, 8.0));
    assert_eq!(s.to_pixel(Point::new(20.0, 8.0)), Point::new(10.0, 4.0));
}

#[test]
fn pixel_aspect_ratio_only_stretches_x() {
    let s = CoordSpace::new(Vec2::new(1.0, 1.0), 2.0).unwrap();
    assert_eq!(s.to_canonical(Point::new(3.0, 3.0)), Point::new(6.0, 3.0));
    assert_eq!(s.to_pixel(Point::new(6.0, 3.0)), Point::new(3.0, 3.0));
}

#[test]
fn conversions_round_trip() {
    let s = CoordSpace::new(Vec2::new(0.25, 0.75), 1.5).unwrap();
    let p = Point::new(-17.25, 41.0);
    let back = s.to_pixel(s.to_canonical(p));
    assert!((back.x - p.x).abs() < 1e-12);
    assert!((back.y - p.y).abs() < 1e-12);
}

#[test]
fn degenerate_factors_are_rejected() {
    assert!(CoordSpace::new(Vec2::new(0.0, 1.0), 1.0).is_err());
    assert!(CoordSpace::new(Vec2::new(1.0, -1.0), 1.0).is_err());
    assert!(CoordSpace::new(Vec2::new(1.0, f64::NAN), 1.0).is_err());
    assert!(CoordSpace::new(Vec2::new(1.0, 1.0), 0.0).is_err());
    assert!(CoordSpace::new(Vec2::new(1.0, 1.0), f64::INFINITY).is_err());
}
