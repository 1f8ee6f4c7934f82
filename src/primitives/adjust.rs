//! Per-pixel colour adjustments without spatial dependence.

use crate::{
    foundation::error::RetouchResult,
    foundation::math::mix,
    primitives::{Primitive, Uniforms, shade_in_place, validate_range, validate_rgb8},
    render::backend::Canvas,
};

const BRIGHTNESS_SHADER: &str = r#"
fn shade(p: vec2<i32>) -> vec4<f32> {
  let c = load_src(p);
  return vec4<f32>(c.rgb + vec3<f32>(u[0].x), c.a);
}
"#;

const CONTRAST_SHADER: &str = r#"
fn shade(p: vec2<i32>) -> vec4<f32> {
  let c = load_src(p);
  return vec4<f32>((c.rgb - vec3<f32>(0.5)) * u[0].x + vec3<f32>(0.5), c.a);
}
"#;

const SATURATION_SHADER: &str = r#"
fn shade(p: vec2<i32>) -> vec4<f32> {
  let c = load_src(p);
  let lum = dot(c.rgb, vec3<f32>(0.2125, 0.7154, 0.0721));
  return vec4<f32>(mix(vec3<f32>(lum), c.rgb, u[0].x), c.a);
}
"#;

const SOFT_COLOR_OVERLAY_SHADER: &str = r#"
fn shade(p: vec2<i32>) -> vec4<f32> {
  let c = load_src(p);
  return vec4<f32>(max(u[0].xyz, c.rgb), c.a);
}
"#;

/// Adds a constant offset to every colour channel.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Brightness {
    amount: f32,
}

impl Brightness {
    /// `amount` in [-1, 1].
    pub fn new(amount: f32) -> RetouchResult<Self> {
        Ok(Self {
            amount: validate_range("brightness", amount, -1.0, 1.0)?,
        })
    }
}

impl Primitive for Brightness {
    fn name(&self) -> &'static str {
        "brightness"
    }

    fn fragment_shader(&self) -> &'static str {
        BRIGHTNESS_SHADER
    }

    fn uniforms(&self) -> Uniforms {
        Uniforms::new().float(self.amount)
    }

    fn render_software(&self, canvas: &mut Canvas) -> RetouchResult<()> {
        let b = self.amount;
        shade_in_place(canvas, |_, _, c| [c[0] + b, c[1] + b, c[2] + b, c[3]]);
        Ok(())
    }
}

/// Scales channel distance from mid-gray.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Contrast {
    amount: f32,
}

impl Contrast {
    /// `amount` in [0, 2]; 1 is neutral.
    pub fn new(amount: f32) -> RetouchResult<Self> {
        Ok(Self {
            amount: validate_range("contrast", amount, 0.0, 2.0)?,
        })
    }
}

impl Primitive for Contrast {
    fn name(&self) -> &'static str {
        "contrast"
    }

    fn fragment_shader(&self) -> &'static str {
        CONTRAST_SHADER
    }

    fn uniforms(&self) -> Uniforms {
        Uniforms::new().float(self.amount)
    }

    fn render_software(&self, canvas: &mut Canvas) -> RetouchResult<()> {
        let k = self.amount;
        let f = |v: f32| (v - 0.5) * k + 0.5;
        shade_in_place(canvas, |_, _, c| [f(c[0]), f(c[1]), f(c[2]), c[3]]);
        Ok(())
    }
}

/// Interpolates between the Rec. 709 luminance and the original colour.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Saturation {
    amount: f32,
}

impl Saturation {
    /// `amount` in [0, 2]; 1 is neutral, 0 is gray.
    pub fn new(amount: f32) -> RetouchResult<Self> {
        Ok(Self {
            amount: validate_range("saturation", amount, 0.0, 2.0)?,
        })
    }
}

impl Primitive for Saturation {
    fn name(&self) -> &'static str {
        "saturation"
    }

    fn fragment_shader(&self) -> &'static str {
        SATURATION_SHADER
    }

    fn uniforms(&self) -> Uniforms {
        Uniforms::new().float(self.amount)
    }

    fn render_software(&self, canvas: &mut Canvas) -> RetouchResult<()> {
        let s = self.amount;
        shade_in_place(canvas, |_, _, c| {
            let lum = 0.2125 * c[0] + 0.7154 * c[1] + 0.0721 * c[2];
            [mix(lum, c[0], s), mix(lum, c[1], s), mix(lum, c[2], s), c[3]]
        });
        Ok(())
    }
}

/// Lightens every channel to at least the overlay colour.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SoftColorOverlay {
    color: [f32; 3],
}

impl SoftColorOverlay {
    /// `color` channels in [0, 255].
    pub fn new(color: [f32; 3]) -> RetouchResult<Self> {
        Ok(Self {
            color: validate_rgb8("overlay color", color)?,
        })
    }
}

impl Primitive for SoftColorOverlay {
    fn name(&self) -> &'static str {
        "soft-color-overlay"
    }

    fn fragment_shader(&self) -> &'static str {
        SOFT_COLOR_OVERLAY_SHADER
    }

    fn uniforms(&self) -> Uniforms {
        Uniforms::new().vec3(self.color.map(|c| c / 255.0))
    }

    fn render_software(&self, canvas: &mut Canvas) -> RetouchResult<()> {
        let o = self.color.map(|c| c / 255.0);
        shade_in_place(canvas, |_, _, c| {
            [c[0].max(o[0]), c[1].max(o[1]), c[2].max(o[2]), c[3]]
        });
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/primitives/adjust.rs"]
mod tests;
