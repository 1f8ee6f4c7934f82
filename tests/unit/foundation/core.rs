use super::*;

#[test]
fn size_helpers() {
    let s = Size::new(4, 3);
    assert_eq!(s.pixel_count(), 12);
    assert_eq!(s.byte_len(), 48);
    assert_eq!(s.transposed(), Size::new(3, 4));
    assert_eq!(s.min_side(), 3);
    assert_eq!(s.to_string(), "4x3");
    assert!(Size::new(0, 3).ensure_non_empty("canvas").is_err());
}

#[test]
fn renderable_sizes_are_bounded() {
    let max = Size::MAX_SIDE;
    assert!(Size::new(max, max).ensure_renderable("output").is_ok());
    for bad in [Size::new(max + 1, 1), Size::new(1, max + 1), Size::new(0, 4)] {
        let err = bad.ensure_renderable("output").unwrap_err();
        assert!(matches!(err, RetouchError::Validation(_)), "{bad}");
    }
}

#[test]
fn dimensions_resolve_rejects_huge_outputs() {
    let current = Size::new(4, 2);
    let d: Dimensions = "4294967295x4294967295".parse().unwrap();
    assert!(matches!(d.resolve(current), Err(RetouchError::Validation(_))));
    let d: Dimensions = "x20000".parse().unwrap();
    assert!(matches!(d.resolve(current), Err(RetouchError::Validation(_))));
}

#[test]
fn dimensions_parse_forms() {
    let d: Dimensions = "800x600".parse().unwrap();
    assert_eq!(d.width, Some(800));
    assert_eq!(d.height, Some(600));

    let d: Dimensions = "800x".parse().unwrap();
    assert_eq!((d.width, d.height), (Some(800), None));

    let d: Dimensions = "x600".parse().unwrap();
    assert_eq!((d.width, d.height), (None, Some(600)));

    for bad in ["", "x", "800", "0x10", "axb", "10x-3"] {
        let err = bad.parse::<Dimensions>().unwrap_err();
        assert!(matches!(err, RetouchError::Validation(_)), "{bad}");
    }
}

#[test]
fn dimensions_resolve_keeps_aspect() {
    let current = Size::new(400, 200);
    let d: Dimensions = "100x".parse().unwrap();
    assert_eq!(d.resolve(current).unwrap(), Size::new(100, 50));
    let d: Dimensions = "x50".parse().unwrap();
    assert_eq!(d.resolve(current).unwrap(), Size::new(100, 50));
    assert_eq!(
        Dimensions::exact(Size::new(7, 9)).resolve(current).unwrap(),
        Size::new(7, 9)
    );
}

#[test]
fn rgba_from_slice_validates_range() {
    let c = Rgba::from_slice(&[1.0, 0.5, 0.0]).unwrap();
    assert_eq!(c, Rgba::new(1.0, 0.5, 0.0, 1.0));
    assert!(Rgba::from_slice(&[1.0, 0.5]).is_err());
    assert!(Rgba::from_slice(&[2.0, 0.5, 0.0, 1.0]).is_err());
    assert_eq!(Rgba::from_rgba8(255, 0, 0, 255), Rgba::new(1.0, 0.0, 0.0, 1.0));
}
