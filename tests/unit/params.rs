use super::*;

#[test]
fn rejects_zero_window() {
    let err = FilterParameters::new(0, 8, 10, 10).unwrap_err();
    assert!(err.to_string().contains("window size must be >= 1"));
}

#[test]
fn rejects_window_larger_than_either_dimension() {
    assert!(FilterParameters::new(11, 8, 10, 20).is_err());
    assert!(FilterParameters::new(11, 8, 20, 10).is_err());
    assert!(FilterParameters::new(10, 8, 10, 10).is_ok());
}

#[test]
fn rejects_zero_levels() {
    assert!(FilterParameters::new(3, 0, 10, 10).is_err());
    assert!(FilterParameters::new(3, 1, 10, 10).is_ok());
}

#[test]
fn radius_is_half_window_rounded_down() {
    let p = |w| FilterParameters::new(w, 4, 16, 16).unwrap().radius();
    assert_eq!(p(1), 0);
    assert_eq!(p(2), 1);
    assert_eq!(p(3), 1);
    assert_eq!(p(4), 2);
    assert_eq!(p(5), 2);
}

#[test]
fn for_buffer_uses_buffer_dimensions() {
    let buf = PixelBuffer::filled(6, 4, [0.0f32; 4]).unwrap();
    let p = FilterParameters::for_buffer(3, 5, &buf).unwrap();
    assert_eq!(p.image_size(), (6, 4));
    assert!(p.check_dimensions(6, 4).is_ok());
    assert!(p.check_dimensions(4, 6).is_err());
    assert!(FilterParameters::for_buffer(5, 5, &buf).is_err());
}
