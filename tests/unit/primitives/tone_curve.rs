use super::*;
use crate::foundation::core::Size;

#[test]
fn diagonal_curve_is_identity() {
    let curve = ToneCurve::uniform(&[(0.0, 0.0), (255.0, 255.0)]).unwrap();
    let mut c = Canvas::new(Size::new(2, 1));
    c.image_mut().get_pixel_mut(0, 0).0 = [0, 17, 200, 255];
    c.image_mut().get_pixel_mut(1, 0).0 = [255, 128, 3, 9];
    let before = c.clone();
    curve.render_software(&mut c).unwrap();
    assert_eq!(c, before);
}

#[test]
fn interpolates_between_points_and_clamps_ends() {
    let curve = ToneCurve::uniform(&[(50.0, 100.0), (150.0, 200.0)]).unwrap();
    assert_eq!(curve.lookup(0)[0], 100.0 / 255.0);
    assert_eq!(curve.lookup(100)[1], 150.0 / 255.0);
    assert_eq!(curve.lookup(255)[2], 200.0 / 255.0);
}

#[test]
fn channels_map_independently() {
    let flat = [(0.0, 50.0), (255.0, 50.0)];
    let diag = [(0.0, 0.0), (255.0, 255.0)];
    let inverted = [(0.0, 255.0), (255.0, 0.0)];
    let curve = ToneCurve::per_channel(&flat, &diag, &inverted).unwrap();
    let mut c = Canvas::new(Size::new(1, 1));
    c.image_mut().get_pixel_mut(0, 0).0 = [10, 20, 30, 40];
    curve.render_software(&mut c).unwrap();
    assert_eq!(c.pixel(0, 0), [50, 20, 225, 40]);
}

#[test]
fn invalid_points_are_rejected() {
    assert!(ToneCurve::uniform(&[(0.0, 0.0)]).is_err());
    assert!(ToneCurve::uniform(&[(10.0, 0.0), (10.0, 5.0)]).is_err());
    assert!(ToneCurve::uniform(&[(0.0, 0.0), (300.0, 5.0)]).is_err());
}

#[test]
fn lookup_table_fills_uniform_slots() {
    let curve = ToneCurve::uniform(&[(0.0, 0.0), (255.0, 255.0)]).unwrap();
    let u = curve.uniforms();
    assert_eq!(u.slots().len(), 256);
    assert!(u.padded().is_ok());
}
