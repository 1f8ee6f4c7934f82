use super::*;

struct RecordingTarget {
    size: Size,
    calls: Vec<(&'static str, Vec<[f32; 4]>, Size, Option<(u32, u32)>)>,
}

impl ShaderTarget for RecordingTarget {
    fn target_size(&self) -> Size {
        self.size
    }

    fn run_shader(&mut self, invocation: ShaderInvocation<'_>) -> RetouchResult<()> {
        self.calls.push((
            invocation.name,
            invocation.uniforms.slots().to_vec(),
            invocation.output_size,
            invocation.layer.map(|l| l.dimensions()),
        ));
        self.size = invocation.output_size;
        Ok(())
    }
}

#[test]
fn uniforms_pad_to_slot_count() {
    let u = Uniforms::new().float(0.5).vec3([1.0, 2.0, 3.0]);
    assert_eq!(u.slots(), &[[0.5, 0.0, 0.0, 0.0], [1.0, 2.0, 3.0, 0.0]]);
    let padded = u.padded().unwrap();
    assert_eq!(padded.len(), UNIFORM_SLOTS);
    assert_eq!(padded[2], [0.0; 4]);
}

#[test]
fn uniforms_over_limit_fail() {
    let u = (0..=UNIFORM_SLOTS).fold(Uniforms::new(), |u, i| u.float(i as f32));
    let err = u.padded().unwrap_err();
    assert!(matches!(err, RetouchError::RenderExecution(_)));
}

#[test]
fn render_gpu_issues_single_invocation() {
    let mut target = RecordingTarget {
        size: Size::new(4, 2),
        calls: Vec::new(),
    };
    let d = Desaturation::new(0.25).unwrap();
    d.render_gpu(&mut target).unwrap();
    assert_eq!(target.calls.len(), 1);
    let (name, slots, size, layer) = &target.calls[0];
    assert_eq!(*name, "desaturation");
    assert_eq!(slots[0][0], 0.25);
    assert_eq!(*size, Size::new(4, 2));
    assert!(layer.is_none());
}

#[test]
fn render_gpu_uses_primitive_output_size_and_layer() {
    let mut target = RecordingTarget {
        size: Size::new(4, 2),
        calls: Vec::new(),
    };
    Resample::rotate(Size::new(4, 2), 1)
        .unwrap()
        .render_gpu(&mut target)
        .unwrap();
    assert_eq!(target.calls[0].2, Size::new(2, 4));

    LayerComposite::new(RgbaImage::new(3, 1), (1, 0))
        .render_gpu(&mut target)
        .unwrap();
    assert_eq!(target.calls[1].0, "layer-composite");
    assert_eq!(target.calls[1].3, Some((3, 1)));
}

#[test]
fn blend_over_opaque_and_transparent() {
    let dst = [0.2, 0.4, 0.6, 1.0];
    assert_eq!(blend_over(dst, [1.0, 0.0, 0.0, 1.0]), [1.0, 0.0, 0.0, 1.0]);
    assert_eq!(blend_over(dst, [1.0, 1.0, 1.0, 0.0]), dst);
    assert_eq!(blend_over([0.0; 4], [0.0; 4]), [0.0; 4]);
    let hidden = [0.8, 0.4, 0.2, 0.0];
    assert_eq!(blend_over(hidden, [0.0; 4]), hidden);

    let half = blend_over([0.0, 0.0, 0.0, 1.0], [1.0, 1.0, 1.0, 0.5]);
    assert!((half[0] - 0.5).abs() < 1e-6);
    assert_eq!(half[3], 1.0);
}

#[test]
fn shade_in_place_visits_every_pixel() {
    let mut canvas = Canvas::new(Size::new(3, 2));
    let mut seen = 0;
    shade_in_place(&mut canvas, |x, y, _| {
        seen += 1;
        [x as f32 / 2.0, y as f32, 0.0, 1.0]
    });
    assert_eq!(seen, 6);
    assert_eq!(canvas.pixel(2, 1), [255, 255, 0, 255]);
    assert_eq!(canvas.pixel(1, 0), [128, 0, 0, 255]);
}

#[test]
fn range_validation_rejects_nan_and_out_of_range() {
    assert!(validate_unit("x", 0.5).is_ok());
    assert!(validate_unit("x", f32::NAN).is_err());
    assert!(validate_range("x", -1.5, -1.0, 1.0).is_err());
    assert!(validate_rgb8("c", [0.0, 255.0, 256.0]).is_err());
}
