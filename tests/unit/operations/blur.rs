use super::*;
use crate::render::software::SoftwareRenderer;
use image::RgbaImage;

fn checker(n: u32) -> RgbaImage {
    RgbaImage::from_fn(n, n, |x, y| {
        if (x + y) % 2 == 0 {
            image::Rgba([255, 255, 255, 255])
        } else {
            image::Rgba([0, 0, 0, 255])
        }
    })
}

fn render(op: &dyn Operation, img: &RgbaImage) -> crate::render::backend::Canvas {
    let mut r = SoftwareRenderer::new();
    r.draw_image(img).unwrap();
    op.render(&mut r).unwrap();
    r.canvas().unwrap()
}

#[test]
fn zero_blur_radius_is_identity() {
    let mut op = RadialBlurOperation::default();
    assert!(!op.is_identity());
    op.configure([0.5, 0.5], 0.25, 0.0).unwrap();
    assert!(op.is_identity());
}

#[test]
fn invalid_configuration_is_rejected_whole() {
    let mut op = RadialBlurOperation::default();
    assert!(op.configure([0.2, 0.2], 0.25, 500.0).is_err());
    assert!(op.configure([1.2, 0.2], 0.25, 5.0).is_err());
    assert_eq!(op.position(), [0.5, 0.5]);
    assert_eq!(op.blur_radius(), 10.0);
}

#[test]
fn radial_focus_stays_sharp_and_edges_blur() {
    let img = checker(9);
    let mut op = RadialBlurOperation::default();
    op.configure([0.5, 0.5], 0.5, 4.0).unwrap();
    let out = render(&op, &img);
    assert_eq!(out.pixel(4, 4), img.get_pixel(4, 4).0);
    let corner = out.pixel(0, 0);
    assert!(corner[0] > 0 && corner[0] < 255, "{corner:?}");
    assert_eq!(corner[3], 255);
}

#[test]
fn uniform_image_is_unchanged_by_blur() {
    let img = RgbaImage::from_pixel(6, 6, image::Rgba([90, 140, 30, 255]));
    let out = render(&TiltShiftOperation::default(), &img);
    assert_eq!(out.image(), &img);
}

#[test]
fn tilt_shift_line_stays_sharp() {
    let img = checker(8);
    let mut op = TiltShiftOperation::default();
    op.configure([0.0, 0.5625], [1.0, 0.5625], 0.5, 3.0).unwrap();
    let out = render(&op, &img);
    for x in 0..8 {
        assert_eq!(out.pixel(x, 4), img.get_pixel(x, 4).0);
    }
    assert_ne!(out.pixel(3, 0), img.get_pixel(3, 0).0);
}

#[test]
fn tilt_shift_options_round_trip() {
    let mut op = TiltShiftOperation::default();
    op.configure([0.1, 0.2], [0.9, 0.8], 0.1, 12.0).unwrap();
    let mut other = TiltShiftOperation::default();
    other.set_options(&op.options()).unwrap();
    assert_eq!(other, op);
    assert_eq!(other.blur_radius(), 12.0);
}
