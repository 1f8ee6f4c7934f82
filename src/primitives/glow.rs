use crate::{
    foundation::error::RetouchResult,
    foundation::math::pixel_center_unit,
    primitives::{Primitive, Uniforms, shade_in_place, validate_rgb8},
    render::backend::Canvas,
};

/// Lower clamp of the falloff factor; reached towards the corners.
pub const GLOW_MIN: f32 = 0.2;
const GLOW_SPREAD: f32 = 0.75;

const SHADER: &str = r#"
fn shade(p: vec2<i32>) -> vec4<f32> {
  let c = load_src(p);
  let n = (center_uv(p) - vec2<f32>(0.5, 0.5)) / 0.75;
  let d = clamp(1.0 - dot(n, n), 0.2, 1.0);
  return vec4<f32>(c.rgb * d * u[0].xyz, c.a);
}
"#;

/// Radial vignette-like falloff tinted by a colour.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Glow {
    color: [f32; 3],
}

impl Default for Glow {
    fn default() -> Self {
        Self {
            color: [255.0, 255.0, 255.0],
        }
    }
}

impl Glow {
    /// `color` channels in [0, 255].
    pub fn new(color: [f32; 3]) -> RetouchResult<Self> {
        Ok(Self {
            color: validate_rgb8("glow color", color)?,
        })
    }

    pub fn color(&self) -> [f32; 3] {
        self.color
    }

    /// Falloff factor at a normalized coordinate.
    pub fn falloff(u: f32, v: f32) -> f32 {
        let nx = (u - 0.5) / GLOW_SPREAD;
        let ny = (v - 0.5) / GLOW_SPREAD;
        (1.0 - (nx * nx + ny * ny)).clamp(GLOW_MIN, 1.0)
    }
}

impl Primitive for Glow {
    fn name(&self) -> &'static str {
        "glow"
    }

    fn fragment_shader(&self) -> &'static str {
        SHADER
    }

    fn uniforms(&self) -> Uniforms {
        Uniforms::new().vec3(self.color.map(|c| c / 255.0))
    }

    fn render_software(&self, canvas: &mut Canvas) -> RetouchResult<()> {
        let size = canvas.size();
        let tint = self.color.map(|c| c / 255.0);
        shade_in_place(canvas, |x, y, c| {
            let d = Self::falloff(
                pixel_center_unit(x, size.width),
                pixel_center_unit(y, size.height),
            );
            [c[0] * d * tint[0], c[1] * d * tint[1], c[2] * d * tint[2], c[3]]
        });
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/primitives/glow.rs"]
mod tests;
