use crate::{
    foundation::error::{RetouchError, RetouchResult},
    primitives::{Primitive, Uniforms, shade_in_place},
    render::backend::Canvas,
};

const SHADER: &str = r#"
fn shade(p: vec2<i32>) -> vec4<f32> {
  let c = load_src(p);
  let i = vec3<i32>(round(clamp(c.rgb, vec3<f32>(0.0), vec3<f32>(1.0)) * 255.0));
  return vec4<f32>(u[i.x].x, u[i.y].y, u[i.z].z, c.a);
}
"#;

/// Control points `(input, output)` in [0, 255], strictly increasing in `input`.
pub type CurvePoints = Vec<(f32, f32)>;

/// Per-channel tone mapping through a 256-entry lookup table.
#[derive(Clone, Debug, PartialEq)]
pub struct ToneCurve {
    lut: Vec<[f32; 3]>,
}

impl ToneCurve {
    /// One curve for all three channels.
    pub fn uniform(points: &[(f32, f32)]) -> RetouchResult<Self> {
        Self::per_channel(points, points, points)
    }

    pub fn per_channel(
        red: &[(f32, f32)],
        green: &[(f32, f32)],
        blue: &[(f32, f32)],
    ) -> RetouchResult<Self> {
        let r = build_table(red)?;
        let g = build_table(green)?;
        let b = build_table(blue)?;
        let lut = (0..256).map(|i| [r[i], g[i], b[i]]).collect();
        Ok(Self { lut })
    }

    /// Unit-range output of every channel for an 8-bit input level.
    pub fn lookup(&self, level: u8) -> [f32; 3] {
        self.lut[usize::from(level)]
    }
}

fn build_table(points: &[(f32, f32)]) -> RetouchResult<Vec<f32>> {
    if points.len() < 2 {
        return Err(RetouchError::validation(
            "tone curve needs at least two control points",
        ));
    }
    for &(x, y) in points {
        if !(0.0..=255.0).contains(&x) || !(0.0..=255.0).contains(&y) {
            return Err(RetouchError::validation(
                "tone curve points must lie within [0, 255]",
            ));
        }
    }
    if points.windows(2).any(|w| w[1].0 <= w[0].0) {
        return Err(RetouchError::validation(
            "tone curve inputs must be strictly increasing",
        ));
    }

    let mut table = Vec::with_capacity(256);
    for level in 0..256 {
        let x = level as f32;
        let y = match points.iter().position(|&(px, _)| px >= x) {
            Some(0) => points[0].1,
            Some(i) => {
                let (x0, y0) = points[i - 1];
                let (x1, y1) = points[i];
                y0 + (y1 - y0) * (x - x0) / (x1 - x0)
            }
            None => points[points.len() - 1].1,
        };
        table.push(y / 255.0);
    }
    Ok(table)
}

impl Primitive for ToneCurve {
    fn name(&self) -> &'static str {
        "tone-curve"
    }

    fn fragment_shader(&self) -> &'static str {
        SHADER
    }

    fn uniforms(&self) -> Uniforms {
        self.lut
            .iter()
            .fold(Uniforms::new(), |u, entry| u.vec3(*entry))
    }

    fn render_software(&self, canvas: &mut Canvas) -> RetouchResult<()> {
        let level = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as usize;
        shade_in_place(canvas, |_, _, c| {
            [
                self.lut[level(c[0])][0],
                self.lut[level(c[1])][1],
                self.lut[level(c[2])][2],
                c[3],
            ]
        });
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/primitives/tone_curve.rs"]
mod tests;
