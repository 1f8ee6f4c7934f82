use super::*;

fn filled(size: Size, px: [u8; 4]) -> RgbaImage {
    RgbaImage::from_pixel(size.width, size.height, image::Rgba(px))
}

#[test]
fn draw_image_sets_size_and_pixels() {
    let mut r = SoftwareRenderer::new();
    assert_eq!(r.kind(), BackendKind::Software);
    r.draw_image(&filled(Size::new(3, 2), [1, 2, 3, 4])).unwrap();
    assert_eq!(r.size(), Size::new(3, 2));
    assert_eq!(r.canvas().unwrap().pixel(2, 1), [1, 2, 3, 4]);
}

#[test]
fn cache_round_trip_restores_exact_pixels() {
    let mut r = SoftwareRenderer::new();
    r.draw_image(&filled(Size::new(2, 2), [9, 9, 9, 255])).unwrap();
    r.cache("k").unwrap();
    r.draw_image(&filled(Size::new(2, 2), [0, 0, 0, 255])).unwrap();
    assert!(r.draw_cached("k").unwrap());
    assert_eq!(r.canvas().unwrap().pixel(0, 0), [9, 9, 9, 255]);
    assert!(!r.draw_cached("missing").unwrap());
}

#[test]
fn restoring_other_size_prunes_rest_of_cache() {
    let mut r = SoftwareRenderer::new();
    r.draw_image(&filled(Size::new(4, 4), [1, 1, 1, 255])).unwrap();
    r.cache("big").unwrap();
    r.set_canvas(Canvas::from_image(filled(Size::new(4, 4), [2, 2, 2, 255])))
        .unwrap();
    r.cache("big-2").unwrap();
    r.draw_image(&filled(Size::new(2, 2), [3, 3, 3, 255])).unwrap();
    assert!(r.cached_keys().is_empty());
}

#[test]
fn reset_keeps_size_but_clears_contents_and_cache() {
    let mut r = SoftwareRenderer::new();
    r.draw_image(&filled(Size::new(2, 3), [5, 5, 5, 255])).unwrap();
    r.cache("k").unwrap();
    r.reset();
    assert_eq!(r.size(), Size::new(2, 3));
    assert_eq!(r.canvas().unwrap().pixel(1, 2), [0, 0, 0, 0]);
    assert!(r.cached_keys().is_empty());
}

#[test]
fn set_size_blanks_canvas() {
    let mut r = SoftwareRenderer::with_canvas(Canvas::from_image(filled(
        Size::new(1, 1),
        [7, 7, 7, 7],
    )));
    r.set_size(Size::new(2, 2)).unwrap();
    assert_eq!(r.canvas().unwrap().pixel(0, 0), [0, 0, 0, 0]);
    r.render_final().unwrap();
}
