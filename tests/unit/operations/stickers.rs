use super::*;
use crate::render::software::SoftwareRenderer;

fn base() -> SoftwareRenderer {
    let mut r = SoftwareRenderer::new();
    r.draw_image(&RgbaImage::from_pixel(8, 8, image::Rgba([0, 0, 0, 255])))
        .unwrap();
    r
}

#[test]
fn no_sticker_is_identity() {
    let mut op = StickersOperation::default();
    assert!(op.is_identity());
    op.set_sticker(RgbaImage::new(1, 1));
    assert!(!op.is_identity());
    op.clear_sticker();
    assert!(op.is_identity());
    assert_eq!(op.content_fingerprint(), 0);
}

#[test]
fn fingerprint_tracks_pixels() {
    let mut a = StickersOperation::default();
    a.set_sticker(RgbaImage::from_pixel(2, 2, image::Rgba([1, 2, 3, 4])));
    let mut b = StickersOperation::default();
    b.set_sticker(RgbaImage::from_pixel(2, 2, image::Rgba([1, 2, 3, 5])));
    assert_ne!(a.content_fingerprint(), b.content_fingerprint());
    assert_ne!(a.content_fingerprint(), 0);
}

#[test]
fn sticker_lands_at_normalized_top_left() {
    let mut op = StickersOperation::default();
    op.set_sticker(RgbaImage::from_pixel(2, 2, image::Rgba([255, 0, 0, 255])));
    op.set_placement([0.5, 0.25], 1.0).unwrap();
    let mut r = base();
    op.render(&mut r).unwrap();
    let c = r.canvas().unwrap();
    assert_eq!(c.pixel(4, 2), [255, 0, 0, 255]);
    assert_eq!(c.pixel(5, 3), [255, 0, 0, 255]);
    assert_eq!(c.pixel(3, 2), [0, 0, 0, 255]);
    assert_eq!(c.pixel(6, 4), [0, 0, 0, 255]);
}

#[test]
fn scale_resizes_sticker() {
    let mut op = StickersOperation::default();
    op.set_sticker(RgbaImage::from_pixel(2, 2, image::Rgba([0, 255, 0, 255])));
    op.set_placement([0.0, 0.0], 2.0).unwrap();
    let mut r = base();
    op.render(&mut r).unwrap();
    let c = r.canvas().unwrap();
    assert_eq!(c.pixel(3, 3), [0, 255, 0, 255]);
    assert_eq!(c.pixel(4, 4), [0, 0, 0, 255]);
}

#[test]
fn placement_validation() {
    let mut op = StickersOperation::default();
    assert!(op.set_placement([0.5, 1.5], 1.0).is_err());
    assert!(op.set_placement([0.5, 0.5], 0.0).is_err());
    assert!(op.set_placement([0.5, 0.5], 17.0).is_err());
    assert_eq!(op.scale(), 1.0);
    assert_eq!(op.position(), [0.0, 0.0]);
}
