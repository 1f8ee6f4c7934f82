use super::*;
use crate::foundation::core::Size;

const EVERYWHERE: BlurMask = BlurMask::Radial {
    center: [0.5, 0.5],
    gradient: 0.0,
};

fn row(values: &[[u8; 4]]) -> Canvas {
    let mut c = Canvas::new(Size::new(values.len() as u32, 1));
    for (x, v) in values.iter().enumerate() {
        c.image_mut().get_pixel_mut(x as u32, 0).0 = *v;
    }
    c
}

#[test]
fn zero_radius_is_identity() {
    let mut c = row(&[[0, 0, 0, 255], [255, 255, 255, 255], [9, 8, 7, 6]]);
    let before = c.clone();
    MaskedBlur::new(BlurDirection::Horizontal, 0.0, EVERYWHERE)
        .unwrap()
        .render_software(&mut c)
        .unwrap();
    assert_eq!(c, before);
}

#[test]
fn horizontal_pass_spreads_symmetrically() {
    let black = [0, 0, 0, 255];
    let mut c = row(&[black, black, [255, 255, 255, 255], black, black]);
    MaskedBlur::new(BlurDirection::Horizontal, 2.0, EVERYWHERE)
        .unwrap()
        .render_software(&mut c)
        .unwrap();
    let centre = c.pixel(2, 0)[0];
    assert!(centre < 255 && centre > 0);
    assert_eq!(c.pixel(1, 0), c.pixel(3, 0));
    assert!(c.pixel(1, 0)[0] > 0);
    assert_eq!(c.pixel(2, 0)[3], 255);
}

#[test]
fn vertical_pass_on_single_row_is_identity() {
    let mut c = row(&[[0, 0, 0, 255], [255, 255, 255, 255]]);
    let before = c.clone();
    MaskedBlur::new(BlurDirection::Vertical, 4.0, EVERYWHERE)
        .unwrap()
        .render_software(&mut c)
        .unwrap();
    assert_eq!(c, before);
}

#[test]
fn colour_is_alpha_weighted() {
    let mut c = row(&[[255, 0, 0, 255], [0, 0, 0, 0], [255, 0, 0, 255]]);
    MaskedBlur::new(BlurDirection::Horizontal, 2.0, EVERYWHERE)
        .unwrap()
        .render_software(&mut c)
        .unwrap();
    let mid = c.pixel(1, 0);
    assert_eq!(&mid[..3], &[255, 0, 0]);
    assert!(mid[3] > 0 && mid[3] < 255);
}

#[test]
fn radial_mask_keeps_centre_sharp() {
    let mask = BlurMask::Radial {
        center: [0.5, 0.5],
        gradient: 0.5,
    };
    assert_eq!(mask.strength(5.0, 5.0, 10.0, 10.0), 0.0);
    assert_eq!(mask.strength(10.0, 5.0, 10.0, 10.0), 1.0);
    let mid = mask.strength(7.5, 5.0, 10.0, 10.0);
    assert!(mid > 0.0 && mid < 1.0);
}

#[test]
fn linear_mask_measures_distance_to_line() {
    let mask = BlurMask::Linear {
        start: [0.0, 0.5],
        end: [1.0, 0.5],
        gradient: 0.2,
    };
    assert_eq!(mask.strength(3.0, 50.0, 100.0, 100.0), 0.0);
    assert_eq!(mask.strength(90.0, 80.0, 100.0, 100.0), 1.0);

    let degenerate = BlurMask::Linear {
        start: [0.5, 0.5],
        end: [0.5, 0.5],
        gradient: 0.2,
    };
    assert_eq!(degenerate.strength(50.0, 50.0, 100.0, 100.0), 0.0);
}

#[test]
fn parameters_are_validated() {
    assert!(MaskedBlur::new(BlurDirection::Horizontal, -1.0, EVERYWHERE).is_err());
    assert!(MaskedBlur::new(BlurDirection::Horizontal, MAX_BLUR_RADIUS + 1.0, EVERYWHERE).is_err());
    let bad = BlurMask::Radial {
        center: [1.5, 0.0],
        gradient: 0.1,
    };
    assert!(MaskedBlur::new(BlurDirection::Vertical, 2.0, bad).is_err());
}

#[test]
fn uniforms_encode_direction_and_mask() {
    let blur = MaskedBlur::new(
        BlurDirection::Vertical,
        3.0,
        BlurMask::Linear {
            start: [0.1, 0.2],
            end: [0.3, 0.4],
            gradient: 0.25,
        },
    )
    .unwrap();
    assert_eq!(
        blur.uniforms().slots(),
        &[
            [3.0, 0.0, 1.0, 1.0],
            [0.1, 0.2, 0.3, 0.4],
            [0.25, 0.0, 0.0, 0.0]
        ]
    );
}
