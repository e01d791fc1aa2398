use super::*;

#[test]
fn rgba8_round_trips_through_color_vec() {
    for v in 0..=255u8 {
        let px = Rgba8::new(v, 255 - v, v / 2, v);
        assert_eq!(Rgba8::from_color(px.to_color()), px);
    }
}

#[test]
fn color_vec_pixel_is_identity() {
    let c: ColorVec = [0.1, 0.2, 0.3, 0.4];
    assert_eq!(ColorVec::from_color(c.to_color()), c);
}

#[test]
fn rect_edges_and_area() {
    let r = Rect::new(2, 3, 4, 5);
    assert_eq!(r.right(), 6);
    assert_eq!(r.bottom(), 8);
    assert_eq!(r.area(), 20);
    assert!(r.contains(2, 3));
    assert!(r.contains(5, 7));
    assert!(!r.contains(6, 7));
    assert!(!r.contains(5, 8));
    assert!(Rect::new(1, 1, 0, 4).is_empty());
}

#[test]
fn rect_validate_within_checks_bounds() {
    assert!(Rect::new(0, 0, 8, 8).validate_within(8, 8).is_ok());
    assert!(Rect::new(2, 2, 6, 6).validate_within(8, 8).is_ok());
    assert!(Rect::new(8, 8, 0, 0).validate_within(8, 8).is_ok());

    let err = Rect::new(3, 0, 6, 1).validate_within(8, 8).unwrap_err();
    assert!(matches!(err, FilterError::Validation(_)));
    assert!(Rect::new(0, 7, 1, 2).validate_within(8, 8).is_err());
    assert!(Rect::new(u32::MAX, 0, 2, 1).validate_within(8, 8).is_err());
}
