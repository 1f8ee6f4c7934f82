use super::*;
use crate::primitives::Desaturation;
use crate::render::software::SoftwareRenderer;

fn solid(size: Size, px: [u8; 4]) -> RgbaImage {
    RgbaImage::from_pixel(size.width, size.height, image::Rgba(px))
}

#[test]
fn canvas_from_raw_checks_length() {
    let err = Canvas::from_raw(Size::new(2, 2), vec![0; 15]).unwrap_err();
    assert!(matches!(err, RetouchError::RenderExecution(_)));
    let canvas = Canvas::from_raw(Size::new(2, 1), vec![1, 2, 3, 4, 5, 6, 7, 8]).unwrap();
    assert_eq!(canvas.pixel(1, 0), [5, 6, 7, 8]);
}

#[test]
fn snapshot_cache_prunes_by_size() {
    let mut cache = SnapshotCache::default();
    cache.insert("a", Size::new(4, 4), 1);
    cache.insert("b", Size::new(8, 8), 2);
    cache.insert("c", Size::new(4, 4), 3);
    cache.retain_size(Size::new(4, 4));
    assert_eq!(cache.keys(), vec!["a".to_string(), "c".to_string()]);
    assert_eq!(cache.get("c"), Some((Size::new(4, 4), &3)));
    cache.clear();
    assert!(cache.is_empty());
}

#[test]
fn backend_kind_serializes_kebab_case() {
    assert_eq!(serde_json::to_string(&BackendKind::Gpu).unwrap(), "\"gpu\"");
    assert_eq!(BackendKind::Software.to_string(), "software");
}

#[test]
fn create_canvas_defaults_missing_sides() {
    let r = SoftwareRenderer::with_canvas(Canvas::new(Size::new(6, 3)));
    assert_eq!(r.create_canvas(Some(2), None).size(), Size::new(2, 3));
    assert_eq!(r.create_canvas(None, None).size(), Size::new(6, 3));
}

#[test]
fn run_primitive_dispatches_to_software_path() {
    let mut r = SoftwareRenderer::new();
    r.draw_image(&solid(Size::new(2, 2), [200, 100, 50, 255]))
        .unwrap();
    r.run_primitive(&Desaturation::new(1.0).unwrap()).unwrap();
    let px = r.canvas().unwrap().pixel(0, 0);
    assert_eq!(px[0], px[1]);
    assert_eq!(px[1], px[2]);
    assert_eq!(px[3], 255);
}

#[test]
fn resizing_primitive_prunes_stale_snapshots() {
    let mut r = SoftwareRenderer::new();
    r.draw_image(&solid(Size::new(4, 4), [10, 20, 30, 255]))
        .unwrap();
    r.cache("before").unwrap();
    r.run_primitive(&Resample::scale_to(Size::new(4, 4), Size::new(2, 2)).unwrap())
        .unwrap();
    assert_eq!(r.size(), Size::new(2, 2));
    assert!(!r.is_cached("before"));
    assert_eq!(r.canvas().unwrap().pixel(1, 1), [10, 20, 30, 255]);
}

#[test]
fn output_resize_keeps_snapshots() {
    let mut r = SoftwareRenderer::new();
    r.draw_image(&solid(Size::new(4, 4), [10, 20, 30, 255]))
        .unwrap();
    r.cache("before").unwrap();
    r.resize_to(Size::new(2, 2)).unwrap();
    assert_eq!(r.size(), Size::new(2, 2));
    assert!(r.is_cached("before"));
    assert!(r.draw_cached("before").unwrap());
    assert_eq!(r.size(), Size::new(4, 4));
}

#[test]
fn resize_to_rejects_oversized_targets() {
    let mut r = SoftwareRenderer::with_canvas(Canvas::new(Size::new(3, 3)));
    let err = r.resize_to(Size::new(u32::MAX, u32::MAX)).unwrap_err();
    assert!(err.is_validation());
    assert_eq!(r.size(), Size::new(3, 3));
}

#[test]
fn resize_to_rejects_empty_and_skips_same_size() {
    let mut r = SoftwareRenderer::with_canvas(Canvas::new(Size::new(3, 3)));
    assert!(r.resize_to(Size::new(0, 3)).unwrap_err().is_validation());
    r.cache("k").unwrap();
    r.resize_to(Size::new(3, 3)).unwrap();
    assert!(r.is_cached("k"));
}
