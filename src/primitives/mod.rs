//! Atomic numeric image transforms.
//!
//! Every primitive carries two independent implementations of the same formula:
//!
//! - a WGSL fragment body (`fn shade(p: vec2<i32>) -> vec4<f32>`) executed by the GPU renderer
//!   through [`ShaderTarget::run_shader`], and
//! - a pixel loop over the software renderer's [`Canvas`].
//!
//! Both paths read 8-bit channels as `v / 255`, compute in `f32`, and quantize back with
//! round-to-nearest plus clamping, so their results agree within one step per channel.
//!
//! Shader bodies may use the following items, which the GPU renderer prepends:
//!
//! ```text
//! u: array<vec4<f32>, UNIFORM_SLOTS>       // primitive uniforms, one vec4 slot each
//! dst_size() -> vec2<f32>                  // output size in pixels
//! src_size() -> vec2<f32>                  // input size in pixels
//! layer_size() -> vec2<f32>                // size of the optional layer texture
//! load_src(p: vec2<i32>) -> vec4<f32>      // clamped texel fetch from the input
//! load_layer(p: vec2<i32>) -> vec4<f32>    // texel fetch from the layer, transparent outside
//! center_uv(p: vec2<i32>) -> vec2<f32>     // pixel-centre coordinate normalized to dst_size()
//! ```

use std::fmt;

use image::RgbaImage;

use crate::{
    foundation::core::Size,
    foundation::error::{RetouchError, RetouchResult},
    foundation::math::{unit_to_unorm8, unorm8_to_unit},
    render::backend::Canvas,
};

pub mod adjust;
pub mod blur;
pub mod desaturation;
pub mod glow;
pub mod overlay;
pub mod resample;
pub mod tone_curve;

pub use adjust::{Brightness, Contrast, Saturation, SoftColorOverlay};
pub use blur::{BlurDirection, BlurMask, MaskedBlur};
pub use desaturation::Desaturation;
pub use glow::Glow;
pub use overlay::{FrameBorder, LayerComposite};
pub use resample::{Resample, Sampling};
pub use tone_curve::{CurvePoints, ToneCurve};

/// Number of `vec4<f32>` uniform slots available to a primitive shader.
pub const UNIFORM_SLOTS: usize = 264;

/// Uniform block of a primitive, laid out as consecutive `vec4<f32>` slots.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Uniforms {
    slots: Vec<[f32; 4]>,
}

impl Uniforms {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn float(mut self, v: f32) -> Self {
        self.slots.push([v, 0.0, 0.0, 0.0]);
        self
    }

    pub fn vec2(mut self, x: f32, y: f32) -> Self {
        self.slots.push([x, y, 0.0, 0.0]);
        self
    }

    pub fn vec3(mut self, v: [f32; 3]) -> Self {
        self.slots.push([v[0], v[1], v[2], 0.0]);
        self
    }

    pub fn vec4(mut self, v: [f32; 4]) -> Self {
        self.slots.push(v);
        self
    }

    pub fn slots(&self) -> &[[f32; 4]] {
        &self.slots
    }

    /// Slot array padded to [`UNIFORM_SLOTS`] entries.
    pub fn padded(&self) -> RetouchResult<Vec<[f32; 4]>> {
        if self.slots.len() > UNIFORM_SLOTS {
            return Err(RetouchError::render_execution(format!(
                "primitive declares {} uniform slots, limit is {UNIFORM_SLOTS}",
                self.slots.len()
            )));
        }
        let mut out = self.slots.clone();
        out.resize(UNIFORM_SLOTS, [0.0; 4]);
        Ok(out)
    }
}

/// One shader execution request issued by [`Primitive::render_gpu`].
pub struct ShaderInvocation<'a> {
    /// Stable program name; the GPU renderer caches compiled pipelines under it.
    pub name: &'static str,
    /// WGSL body defining `shade`.
    pub source: &'static str,
    pub uniforms: Uniforms,
    pub output_size: Size,
    pub layer: Option<&'a RgbaImage>,
}

impl fmt::Debug for ShaderInvocation<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShaderInvocation")
            .field("name", &self.name)
            .field("uniform_slots", &self.uniforms.slots().len())
            .field("output_size", &self.output_size)
            .field("layer", &self.layer.map(|l| l.dimensions()))
            .finish()
    }
}

/// Execution surface of shader-backed renderers.
pub trait ShaderTarget {
    fn target_size(&self) -> Size;

    fn run_shader(&mut self, invocation: ShaderInvocation<'_>) -> RetouchResult<()>;
}

pub trait Primitive: fmt::Debug + Send + Sync {
    fn name(&self) -> &'static str;

    fn output_size(&self, input: Size) -> Size {
        input
    }

    fn fragment_shader(&self) -> &'static str;

    fn uniforms(&self) -> Uniforms;

    fn layer(&self) -> Option<&RgbaImage> {
        None
    }

    /// Issues exactly one shader invocation against the target's current framebuffer.
    fn render_gpu(&self, target: &mut dyn ShaderTarget) -> RetouchResult<()> {
        let output_size = self.output_size(target.target_size());
        target.run_shader(ShaderInvocation {
            name: self.name(),
            source: self.fragment_shader(),
            uniforms: self.uniforms(),
            output_size,
            layer: self.layer(),
        })
    }

    /// Applies the transform to the canvas in place.
    fn render_software(&self, canvas: &mut Canvas) -> RetouchResult<()>;
}

/// Runs `f` over every pixel of `canvas` in unit-range RGBA and writes the result back.
///
/// `f` receives the pixel coordinate and its current value.
pub(crate) fn shade_in_place(
    canvas: &mut Canvas,
    mut f: impl FnMut(u32, u32, [f32; 4]) -> [f32; 4],
) {
    let size = canvas.size();
    let img = canvas.image_mut();
    for y in 0..size.height {
        for x in 0..size.width {
            let px = img.get_pixel_mut(x, y);
            let out = f(x, y, to_unit(px.0));
            px.0 = from_unit(out);
        }
    }
}

#[inline]
pub(crate) fn to_unit(px: [u8; 4]) -> [f32; 4] {
    [
        unorm8_to_unit(px[0]),
        unorm8_to_unit(px[1]),
        unorm8_to_unit(px[2]),
        unorm8_to_unit(px[3]),
    ]
}

#[inline]
pub(crate) fn from_unit(c: [f32; 4]) -> [u8; 4] {
    [
        unit_to_unorm8(c[0]),
        unit_to_unorm8(c[1]),
        unit_to_unorm8(c[2]),
        unit_to_unorm8(c[3]),
    ]
}

/// Straight-alpha source-over. A fully transparent `src` leaves `dst` untouched, colour included.
#[inline]
pub(crate) fn blend_over(dst: [f32; 4], src: [f32; 4]) -> [f32; 4] {
    if src[3] <= 0.0 {
        return dst;
    }
    let out_a = src[3] + dst[3] * (1.0 - src[3]);
    let ch = |i: usize| (src[i] * src[3] + dst[i] * dst[3] * (1.0 - src[3])) / out_a;
    [ch(0), ch(1), ch(2), out_a]
}

pub(crate) fn validate_unit(name: &str, v: f32) -> RetouchResult<f32> {
    validate_range(name, v, 0.0, 1.0)
}

pub(crate) fn validate_range(name: &str, v: f32, min: f32, max: f32) -> RetouchResult<f32> {
    if !v.is_finite() || v < min || v > max {
        return Err(RetouchError::validation(format!(
            "{name} must be within [{min}, {max}], got {v}"
        )));
    }
    Ok(v)
}

pub(crate) fn validate_rgb8(name: &str, color: [f32; 3]) -> RetouchResult<[f32; 3]> {
    for c in color {
        validate_range(name, c, 0.0, 255.0)?;
    }
    Ok(color)
}

#[cfg(test)]
#[path = "../../tests/unit/primitives/mod.rs"]
mod tests;
