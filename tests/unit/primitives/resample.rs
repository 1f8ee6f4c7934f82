use super::*;

const A: [u8; 4] = [255, 0, 0, 255];
const B: [u8; 4] = [0, 0, 255, 255];

fn pair() -> Canvas {
    let mut c = Canvas::new(Size::new(2, 1));
    c.image_mut().get_pixel_mut(0, 0).0 = A;
    c.image_mut().get_pixel_mut(1, 0).0 = B;
    c
}

fn run(r: Resample, mut c: Canvas) -> Canvas {
    r.render_software(&mut c).unwrap();
    c
}

#[test]
fn quarter_turn_clockwise() {
    let out = run(Resample::rotate(Size::new(2, 1), 1).unwrap(), pair());
    assert_eq!(out.size(), Size::new(1, 2));
    assert_eq!(out.pixel(0, 0), A);
    assert_eq!(out.pixel(0, 1), B);
}

#[test]
fn half_and_three_quarter_turns() {
    let out = run(Resample::rotate(Size::new(2, 1), 2).unwrap(), pair());
    assert_eq!((out.pixel(0, 0), out.pixel(1, 0)), (B, A));

    let out = run(Resample::rotate(Size::new(2, 1), 3).unwrap(), pair());
    assert_eq!(out.size(), Size::new(1, 2));
    assert_eq!((out.pixel(0, 0), out.pixel(0, 1)), (B, A));

    let out = run(Resample::rotate(Size::new(2, 1), 4).unwrap(), pair());
    assert_eq!(out, pair());
}

#[test]
fn flips_mirror_axes() {
    let out = run(Resample::flip(Size::new(2, 1), true, false).unwrap(), pair());
    assert_eq!((out.pixel(0, 0), out.pixel(1, 0)), (B, A));
    let out = run(Resample::flip(Size::new(2, 1), false, true).unwrap(), pair());
    assert_eq!(out, pair());
}

#[test]
fn crop_selects_region() {
    let out = run(Resample::crop(1, 0, Size::new(1, 1)).unwrap(), pair());
    assert_eq!(out.size(), Size::new(1, 1));
    assert_eq!(out.pixel(0, 0), B);
}

#[test]
fn nearest_outside_source_is_transparent() {
    let r = Resample::new(
        Size::new(2, 1),
        Affine::translate((1.0, 0.0)),
        Sampling::Nearest,
    )
    .unwrap();
    let out = run(r, pair());
    assert_eq!(out.pixel(0, 0), B);
    assert_eq!(out.pixel(1, 0), [0, 0, 0, 0]);
}

#[test]
fn bilinear_upscale_interpolates_and_clamps() {
    let mut c = Canvas::new(Size::new(2, 1));
    c.image_mut().get_pixel_mut(0, 0).0 = [0, 0, 0, 255];
    c.image_mut().get_pixel_mut(1, 0).0 = [255, 255, 255, 255];
    let out = run(Resample::scale_to(Size::new(2, 1), Size::new(4, 1)).unwrap(), c);
    let row: Vec<u8> = (0..4).map(|x| out.pixel(x, 0)[0]).collect();
    assert_eq!(row, vec![0, 64, 191, 255]);
}

#[test]
fn empty_output_is_rejected() {
    assert!(Resample::scale_to(Size::new(2, 2), Size::new(0, 2)).is_err());
    assert!(Resample::crop(0, 0, Size::new(0, 0)).is_err());
}

#[test]
fn uniforms_encode_transform_and_mode() {
    let r = Resample::flip(Size::new(5, 3), true, false).unwrap();
    assert_eq!(
        r.uniforms().slots(),
        &[[-1.0, 0.0, 0.0, 1.0], [5.0, 0.0, 0.0, 0.0]]
    );
    let s = Resample::scale_to(Size::new(4, 4), Size::new(2, 2)).unwrap();
    assert_eq!(s.uniforms().slots()[1][2], 1.0);
    assert_eq!(s.output_size(Size::new(4, 4)), Size::new(2, 2));
}
