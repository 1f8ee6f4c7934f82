use super::*;
use crate::foundation::core::Size;

#[test]
fn falloff_is_one_at_centre_and_clamped_at_corner() {
    assert!((Glow::falloff(0.5, 0.5) - 1.0).abs() < 1e-6);
    assert_eq!(Glow::falloff(0.0, 0.0), GLOW_MIN);
    assert_eq!(Glow::falloff(1.0, 1.0), GLOW_MIN);
}

#[test]
fn white_glow_darkens_corners_only() {
    let mut c = Canvas::new(Size::new(64, 64));
    for p in c.image_mut().pixels_mut() {
        p.0 = [200, 200, 200, 255];
    }
    Glow::default().render_software(&mut c).unwrap();

    let centre = c.pixel(32, 32);
    assert!(centre[0] >= 198, "centre {centre:?}");
    let corner = c.pixel(0, 0);
    assert_eq!(corner[0], 40);
    assert_eq!(corner[3], 255);
}

#[test]
fn colour_tints_channels() {
    let mut c = Canvas::new(Size::new(1, 1));
    c.image_mut().get_pixel_mut(0, 0).0 = [255, 255, 255, 255];
    Glow::new([255.0, 0.0, 127.5])
        .unwrap()
        .render_software(&mut c)
        .unwrap();
    assert_eq!(c.pixel(0, 0), [255, 0, 128, 255]);
}

#[test]
fn colour_range_is_validated() {
    assert!(Glow::new([256.0, 0.0, 0.0]).is_err());
    assert!(Glow::new([0.0, -1.0, 0.0]).is_err());
}
