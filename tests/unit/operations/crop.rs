use super::*;
use crate::render::software::SoftwareRenderer;
use image::RgbaImage;

#[test]
fn region_validation_keeps_previous_corners() {
    let mut op = CropOperation::default();
    assert!(op.is_identity());
    op.set_region([0.1, 0.1], [0.9, 0.9]).unwrap();
    assert!(op.set_region([0.5, 0.5], [0.4, 0.9]).is_err());
    assert!(op.set_region([-0.1, 0.0], [1.0, 1.0]).is_err());
    assert_eq!(op.start(), [0.1, 0.1]);
    assert_eq!(op.end(), [0.9, 0.9]);
}

#[test]
fn pixel_region_rounds_and_is_never_empty() {
    let mut op = CropOperation::default();
    op.set_region([0.25, 0.25], [0.75, 1.0]).unwrap();
    assert_eq!(op.pixel_region(Size::new(4, 4)), (1, 1, Size::new(2, 3)));

    op.set_region([0.5, 0.5], [0.51, 0.51]).unwrap();
    let (_, _, size) = op.pixel_region(Size::new(4, 4));
    assert_eq!(size, Size::new(1, 1));
}

#[test]
fn render_keeps_selected_pixels() {
    let img = RgbaImage::from_fn(4, 4, |x, y| image::Rgba([x as u8 * 10, y as u8 * 10, 0, 255]));
    let mut r = SoftwareRenderer::new();
    r.draw_image(&img).unwrap();
    let mut op = CropOperation::default();
    op.set_region([0.5, 0.25], [1.0, 0.75]).unwrap();
    op.render(&mut r).unwrap();
    let c = r.canvas().unwrap();
    assert_eq!(c.size(), Size::new(2, 2));
    assert_eq!(c.pixel(0, 0), [20, 10, 0, 255]);
    assert_eq!(c.pixel(1, 1), [30, 20, 0, 255]);
}

#[test]
fn options_update_one_corner() {
    let mut op = CropOperation::default();
    let opts = OptionMap::from([("end".to_string(), [0.5f32, 0.5].into())]);
    op.set_options(&opts).unwrap();
    assert_eq!(op.start(), [0.0, 0.0]);
    assert_eq!(op.end(), [0.5, 0.5]);
}
