use crate::{
    foundation::error::RetouchResult,
    foundation::math::smoothstep,
    primitives::{Primitive, Uniforms, from_unit, to_unit, validate_range, validate_unit},
    render::backend::Canvas,
};

/// Largest accepted blur radius in pixels.
pub const MAX_BLUR_RADIUS: f32 = 64.0;

const SHADER: &str = r#"
fn blur_mask(p: vec2<i32>) -> f32 {
  let size = dst_size();
  let q = vec2<f32>(p) + vec2<f32>(0.5);
  let g = u[2].x * min(size.x, size.y);
  var d = 0.0;
  if (u[0].w < 0.5) {
    d = distance(q, u[1].xy * size);
  } else {
    let a = u[1].xy * size;
    let ab = u[1].zw * size - a;
    let len = length(ab);
    if (len > 0.0) {
      d = abs(ab.x * (q.y - a.y) - ab.y * (q.x - a.x)) / len;
    } else {
      d = distance(q, a);
    }
  }
  if (g <= 0.0) {
    return 1.0;
  }
  return smoothstep(0.0, g, d);
}

fn shade(p: vec2<i32>) -> vec4<f32> {
  let r = u[0].x * blur_mask(p);
  if (r < 0.5) {
    return load_src(p);
  }
  let sigma = r * 0.5;
  let taps = i32(ceil(r));
  let dir = vec2<i32>(u[0].yz);
  var wsum = 0.0;
  var asum = 0.0;
  var csum = vec3<f32>(0.0);
  for (var i = -taps; i <= taps; i = i + 1) {
    let fi = f32(i);
    let w = exp(-(fi * fi) / (2.0 * sigma * sigma));
    let c = load_src(p + dir * i);
    wsum = wsum + w;
    asum = asum + w * c.a;
    csum = csum + w * c.a * c.rgb;
  }
  if (asum <= 0.0) {
    return vec4<f32>(0.0);
  }
  return vec4<f32>(csum / asum, asum / wsum);
}
"#;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlurDirection {
    Horizontal,
    Vertical,
}

impl BlurDirection {
    fn step(self) -> (i64, i64) {
        match self {
            Self::Horizontal => (1, 0),
            Self::Vertical => (0, 1),
        }
    }
}

/// Per-pixel blur strength in [0, 1]; zero keeps the pixel sharp.
///
/// Positions are normalized to the canvas; `gradient` is a fraction of the shorter side over
/// which the strength ramps from 0 to 1.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum BlurMask {
    /// Sharp at `center`, blurred with growing distance from it.
    Radial { center: [f32; 2], gradient: f32 },
    /// Sharp along the line through `start` and `end`, blurred with distance from it.
    Linear {
        start: [f32; 2],
        end: [f32; 2],
        gradient: f32,
    },
}

impl BlurMask {
    pub fn validate(self) -> RetouchResult<Self> {
        match self {
            Self::Radial { center, gradient } => {
                validate_point(center)?;
                validate_unit("blur gradient", gradient)?;
            }
            Self::Linear {
                start,
                end,
                gradient,
            } => {
                validate_point(start)?;
                validate_point(end)?;
                validate_unit("blur gradient", gradient)?;
            }
        }
        Ok(self)
    }

    /// Strength at the pixel centre `(px, py)` of a `width` x `height` canvas.
    pub fn strength(self, px: f32, py: f32, width: f32, height: f32) -> f32 {
        let (gradient, d) = match self {
            Self::Radial { center, gradient } => {
                let dx = px - center[0] * width;
                let dy = py - center[1] * height;
                (gradient, (dx * dx + dy * dy).sqrt())
            }
            Self::Linear {
                start,
                end,
                gradient,
            } => {
                let (ax, ay) = (start[0] * width, start[1] * height);
                let (abx, aby) = (end[0] * width - ax, end[1] * height - ay);
                let len = (abx * abx + aby * aby).sqrt();
                let d = if len > 0.0 {
                    (abx * (py - ay) - aby * (px - ax)).abs() / len
                } else {
                    ((px - ax).powi(2) + (py - ay).powi(2)).sqrt()
                };
                (gradient, d)
            }
        };
        let g = gradient * width.min(height);
        if g <= 0.0 {
            return 1.0;
        }
        smoothstep(0.0, g, d)
    }

    fn slots(self) -> ([f32; 4], f32, f32) {
        match self {
            Self::Radial { center, gradient } => ([center[0], center[1], 0.0, 0.0], gradient, 0.0),
            Self::Linear {
                start,
                end,
                gradient,
            } => ([start[0], start[1], end[0], end[1]], gradient, 1.0),
        }
    }
}

fn validate_point(p: [f32; 2]) -> RetouchResult<()> {
    validate_unit("blur mask position", p[0])?;
    validate_unit("blur mask position", p[1])?;
    Ok(())
}

/// One separable Gaussian pass whose radius is scaled per pixel by a [`BlurMask`].
///
/// Sigma is half the effective radius. Colour is accumulated alpha-weighted.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MaskedBlur {
    direction: BlurDirection,
    radius: f32,
    mask: BlurMask,
}

impl MaskedBlur {
    pub fn new(direction: BlurDirection, radius: f32, mask: BlurMask) -> RetouchResult<Self> {
        Ok(Self {
            direction,
            radius: validate_range("blur radius", radius, 0.0, MAX_BLUR_RADIUS)?,
            mask: mask.validate()?,
        })
    }

    pub fn direction(&self) -> BlurDirection {
        self.direction
    }
}

impl Primitive for MaskedBlur {
    fn name(&self) -> &'static str {
        "masked-blur"
    }

    fn fragment_shader(&self) -> &'static str {
        SHADER
    }

    fn uniforms(&self) -> Uniforms {
        let (dx, dy) = self.direction.step();
        let (points, gradient, kind) = self.mask.slots();
        Uniforms::new()
            .vec4([self.radius, dx as f32, dy as f32, kind])
            .vec4(points)
            .float(gradient)
    }

    fn render_software(&self, canvas: &mut Canvas) -> RetouchResult<()> {
        let size = canvas.size();
        let src = canvas.image().clone();
        let (w, h) = (size.width as i64, size.height as i64);
        let (dx, dy) = self.direction.step();
        let img = canvas.image_mut();

        for y in 0..size.height {
            for x in 0..size.width {
                let strength = self.mask.strength(
                    x as f32 + 0.5,
                    y as f32 + 0.5,
                    size.width as f32,
                    size.height as f32,
                );
                let r = self.radius * strength;
                if r < 0.5 {
                    continue;
                }
                let sigma = r * 0.5;
                let taps = r.ceil() as i64;
                let (mut wsum, mut asum) = (0.0f32, 0.0f32);
                let mut csum = [0.0f32; 3];
                for i in -taps..=taps {
                    let fi = i as f32;
                    let weight = (-(fi * fi) / (2.0 * sigma * sigma)).exp();
                    let sx = (x as i64 + dx * i).clamp(0, w - 1) as u32;
                    let sy = (y as i64 + dy * i).clamp(0, h - 1) as u32;
                    let c = to_unit(src.get_pixel(sx, sy).0);
                    wsum += weight;
                    asum += weight * c[3];
                    for (acc, v) in csum.iter_mut().zip(c) {
                        *acc += weight * c[3] * v;
                    }
                }
                let out = if asum <= 0.0 {
                    [0.0; 4]
                } else {
                    [csum[0] / asum, csum[1] / asum, csum[2] / asum, asum / wsum]
                };
                img.get_pixel_mut(x, y).0 = from_unit(out);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/primitives/blur.rs"]
mod tests;
