use super::*;
use crate::render::software::SoftwareRenderer;
use image::RgbaImage;

fn gradient() -> RgbaImage {
    RgbaImage::from_fn(2, 2, |x, y| image::Rgba([x as u8, y as u8, 0, 255]))
}

fn flipped(h: bool, v: bool) -> crate::render::backend::Canvas {
    let mut op = FlipOperation::default();
    op.set_horizontal(h);
    op.set_vertical(v);
    let mut r = SoftwareRenderer::new();
    r.draw_image(&gradient()).unwrap();
    op.render(&mut r).unwrap();
    r.canvas().unwrap()
}

#[test]
fn default_is_identity() {
    assert!(FlipOperation::default().is_identity());
}

#[test]
fn horizontal_mirrors_columns() {
    let c = flipped(true, false);
    assert_eq!(c.pixel(0, 0), [1, 0, 0, 255]);
    assert_eq!(c.pixel(1, 1), [0, 1, 0, 255]);
}

#[test]
fn both_axes_rotate_half_turn() {
    let c = flipped(true, true);
    assert_eq!(c.pixel(0, 0), [1, 1, 0, 255]);
    assert_eq!(c.pixel(1, 1), [0, 0, 0, 255]);
}

#[test]
fn options_accept_booleans_only() {
    let mut op = FlipOperation::default();
    let bad = OptionMap::from([("vertical".to_string(), 1.0f64.into())]);
    assert!(op.set_options(&bad).is_err());
    let good = OptionMap::from([("vertical".to_string(), true.into())]);
    op.set_options(&good).unwrap();
    assert!(op.vertical());
    assert!(!op.horizontal());
}
