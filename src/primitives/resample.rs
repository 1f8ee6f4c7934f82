//! Geometric resampling: scaling, quarter-turn rotation, mirroring and cropping.

use crate::{
    foundation::core::{Affine, Size},
    foundation::error::{RetouchError, RetouchResult},
    primitives::{Primitive, Uniforms},
    render::backend::Canvas,
};

const SHADER: &str = r#"
fn shade(p: vec2<i32>) -> vec4<f32> {
  let q = vec2<f32>(p) + vec2<f32>(0.5);
  let s = vec2<f32>(
    u[0].x * q.x + u[0].z * q.y + u[1].x,
    u[0].y * q.x + u[0].w * q.y + u[1].y,
  );
  if (u[1].z < 0.5) {
    let i = vec2<i32>(floor(s));
    let sz = vec2<i32>(src_size());
    if (i.x < 0 || i.y < 0 || i.x >= sz.x || i.y >= sz.y) {
      return vec4<f32>(0.0);
    }
    return load_src(i);
  }
  let t = s - vec2<f32>(0.5);
  let f = floor(t);
  let w = t - f;
  let i = vec2<i32>(f);
  let top = mix(load_src(i), load_src(i + vec2<i32>(1, 0)), w.x);
  let bottom = mix(load_src(i + vec2<i32>(0, 1)), load_src(i + vec2<i32>(1, 1)), w.x);
  return mix(top, bottom, w.y);
}
"#;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Sampling {
    /// Nearest source texel; transparent outside the source.
    Nearest,
    /// Bilinear interpolation, clamped to the source edges.
    Bilinear,
}

/// Maps every output pixel centre through an inverse affine into source pixel space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Resample {
    output: Size,
    inverse: [f32; 6],
    sampling: Sampling,
}

impl Resample {
    /// `inverse` maps output pixel coordinates to input pixel coordinates.
    pub fn new(output: Size, inverse: Affine, sampling: Sampling) -> RetouchResult<Self> {
        output.ensure_non_empty("resample output")?;
        let coeffs = inverse.as_coeffs();
        if coeffs.iter().any(|c| !c.is_finite()) {
            return Err(RetouchError::validation("resample transform must be finite"));
        }
        Ok(Self {
            output,
            inverse: coeffs.map(|c| c as f32),
            sampling,
        })
    }

    /// Bilinear rescale of the whole picture.
    pub fn scale_to(from: Size, to: Size) -> RetouchResult<Self> {
        from.ensure_non_empty("resample input")?;
        let sx = f64::from(from.width) / f64::from(to.width.max(1));
        let sy = f64::from(from.height) / f64::from(to.height.max(1));
        Self::new(to, Affine::scale_non_uniform(sx, sy), Sampling::Bilinear)
    }

    /// Clockwise rotation by `quarter_turns * 90` degrees.
    pub fn rotate(input: Size, quarter_turns: u32) -> RetouchResult<Self> {
        input.ensure_non_empty("resample input")?;
        let w = f64::from(input.width);
        let h = f64::from(input.height);
        let (output, inverse) = match quarter_turns % 4 {
            0 => (input, Affine::IDENTITY),
            1 => (input.transposed(), Affine::new([0.0, -1.0, 1.0, 0.0, 0.0, h])),
            2 => (input, Affine::new([-1.0, 0.0, 0.0, -1.0, w, h])),
            _ => (input.transposed(), Affine::new([0.0, 1.0, -1.0, 0.0, w, 0.0])),
        };
        Self::new(output, inverse, Sampling::Nearest)
    }

    pub fn flip(input: Size, horizontal: bool, vertical: bool) -> RetouchResult<Self> {
        input.ensure_non_empty("resample input")?;
        let (a, e) = if horizontal {
            (-1.0, f64::from(input.width))
        } else {
            (1.0, 0.0)
        };
        let (d, f) = if vertical {
            (-1.0, f64::from(input.height))
        } else {
            (1.0, 0.0)
        };
        Self::new(input, Affine::new([a, 0.0, 0.0, d, e, f]), Sampling::Nearest)
    }

    /// Cuts out the `size` region whose top-left corner sits at `(x, y)` in the input.
    pub fn crop(x: u32, y: u32, size: Size) -> RetouchResult<Self> {
        Self::new(
            size,
            Affine::translate((f64::from(x), f64::from(y))),
            Sampling::Nearest,
        )
    }

    pub fn sampling(&self) -> Sampling {
        self.sampling
    }

    fn source_point(&self, x: u32, y: u32) -> (f32, f32) {
        let [a, b, c, d, e, f] = self.inverse;
        let qx = x as f32 + 0.5;
        let qy = y as f32 + 0.5;
        (a * qx + c * qy + e, b * qx + d * qy + f)
    }
}

impl Primitive for Resample {
    fn name(&self) -> &'static str {
        "resample"
    }

    fn output_size(&self, _input: Size) -> Size {
        self.output
    }

    fn fragment_shader(&self) -> &'static str {
        SHADER
    }

    fn uniforms(&self) -> Uniforms {
        let [a, b, c, d, e, f] = self.inverse;
        let mode = match self.sampling {
            Sampling::Nearest => 0.0,
            Sampling::Bilinear => 1.0,
        };
        Uniforms::new().vec4([a, b, c, d]).vec4([e, f, mode, 0.0])
    }

    fn render_software(&self, canvas: &mut Canvas) -> RetouchResult<()> {
        let src = canvas.image().clone();
        let (sw, sh) = (src.width() as i64, src.height() as i64);
        let load = |x: i64, y: i64| -> [f32; 4] {
            let px = src.get_pixel(x.clamp(0, sw - 1) as u32, y.clamp(0, sh - 1) as u32);
            super::to_unit(px.0)
        };

        let mut out = Canvas::new(self.output);
        let img = out.image_mut();
        for y in 0..self.output.height {
            for x in 0..self.output.width {
                let (sx, sy) = self.source_point(x, y);
                let value = match self.sampling {
                    Sampling::Nearest => {
                        let (ix, iy) = (sx.floor() as i64, sy.floor() as i64);
                        if ix < 0 || iy < 0 || ix >= sw || iy >= sh {
                            [0.0; 4]
                        } else {
                            load(ix, iy)
                        }
                    }
                    Sampling::Bilinear => {
                        let (tx, ty) = (sx - 0.5, sy - 0.5);
                        let (fx, fy) = (tx.floor(), ty.floor());
                        let (wx, wy) = (tx - fx, ty - fy);
                        let (ix, iy) = (fx as i64, fy as i64);
                        let lerp = |a: [f32; 4], b: [f32; 4], t: f32| {
                            std::array::from_fn::<f32, 4, _>(|i| a[i] * (1.0 - t) + b[i] * t)
                        };
                        let top = lerp(load(ix, iy), load(ix + 1, iy), wx);
                        let bottom = lerp(load(ix, iy + 1), load(ix + 1, iy + 1), wx);
                        lerp(top, bottom, wy)
                    }
                };
                img.get_pixel_mut(x, y).0 = super::from_unit(value);
            }
        }
        *canvas = out;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/primitives/resample.rs"]
mod tests;
