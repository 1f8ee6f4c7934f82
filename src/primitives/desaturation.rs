use crate::{
    foundation::error::RetouchResult,
    foundation::math::mix,
    primitives::{Primitive, Uniforms, shade_in_place, validate_unit},
    render::backend::Canvas,
};

const SHADER: &str = r#"
fn shade(p: vec2<i32>) -> vec4<f32> {
  let c = load_src(p);
  let gray = vec3<f32>(dot(vec3<f32>(0.3, 0.59, 0.11), c.rgb));
  return vec4<f32>(mix(c.rgb, gray, u[0].x), c.a);
}
"#;

/// Blends each pixel towards its luminance `0.3R + 0.59G + 0.11B`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Desaturation {
    amount: f32,
}

impl Desaturation {
    /// `amount` in [0, 1]: 0 keeps the colour, 1 yields gray.
    pub fn new(amount: f32) -> RetouchResult<Self> {
        Ok(Self {
            amount: validate_unit("desaturation", amount)?,
        })
    }

    pub fn amount(&self) -> f32 {
        self.amount
    }
}

pub(crate) fn luminance(c: [f32; 4]) -> f32 {
    0.3 * c[0] + 0.59 * c[1] + 0.11 * c[2]
}

impl Primitive for Desaturation {
    fn name(&self) -> &'static str {
        "desaturation"
    }

    fn fragment_shader(&self) -> &'static str {
        SHADER
    }

    fn uniforms(&self) -> Uniforms {
        Uniforms::new().float(self.amount)
    }

    fn render_software(&self, canvas: &mut Canvas) -> RetouchResult<()> {
        let t = self.amount;
        shade_in_place(canvas, |_, _, c| {
            let lum = luminance(c);
            [mix(c[0], lum, t), mix(c[1], lum, t), mix(c[2], lum, t), c[3]]
        });
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/primitives/desaturation.rs"]
mod tests;
