//! Source-over compositing primitives.

use image::RgbaImage;

use crate::{
    foundation::core::Rgba,
    foundation::error::RetouchResult,
    primitives::{Primitive, Uniforms, blend_over, shade_in_place, to_unit, validate_range},
    render::backend::Canvas,
};

const FRAME_SHADER: &str = r#"
fn over(dst: vec4<f32>, src: vec4<f32>) -> vec4<f32> {
  if (src.a <= 0.0) {
    return dst;
  }
  let a = src.a + dst.a * (1.0 - src.a);
  return vec4<f32>((src.rgb * src.a + dst.rgb * dst.a * (1.0 - src.a)) / a, a);
}

fn shade(p: vec2<i32>) -> vec4<f32> {
  let c = load_src(p);
  let size = dst_size();
  let t = u[0].x * min(size.x, size.y);
  let q = vec2<f32>(p) + vec2<f32>(0.5);
  if (q.x < t || q.y < t || q.x > size.x - t || q.y > size.y - t) {
    return over(c, u[1]);
  }
  return c;
}
"#;

const LAYER_SHADER: &str = r#"
fn over(dst: vec4<f32>, src: vec4<f32>) -> vec4<f32> {
  if (src.a <= 0.0) {
    return dst;
  }
  let a = src.a + dst.a * (1.0 - src.a);
  return vec4<f32>((src.rgb * src.a + dst.rgb * dst.a * (1.0 - src.a)) / a, a);
}

fn shade(p: vec2<i32>) -> vec4<f32> {
  let l = load_layer(p - vec2<i32>(u[0].xy));
  return over(load_src(p), l);
}
"#;

/// Solid border around the canvas edges.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameBorder {
    thickness: f32,
    color: Rgba,
}

impl FrameBorder {
    /// `thickness` is a fraction of the shorter canvas side, in [0, 0.5].
    pub fn new(thickness: f32, color: Rgba) -> RetouchResult<Self> {
        Ok(Self {
            thickness: validate_range("frame thickness", thickness, 0.0, 0.5)?,
            color: color.validate()?,
        })
    }

    pub fn thickness(&self) -> f32 {
        self.thickness
    }
}

impl Primitive for FrameBorder {
    fn name(&self) -> &'static str {
        "frame-border"
    }

    fn fragment_shader(&self) -> &'static str {
        FRAME_SHADER
    }

    fn uniforms(&self) -> Uniforms {
        Uniforms::new()
            .float(self.thickness)
            .vec4(self.color.to_array())
    }

    fn render_software(&self, canvas: &mut Canvas) -> RetouchResult<()> {
        let size = canvas.size();
        let (w, h) = (size.width as f32, size.height as f32);
        let t = self.thickness * w.min(h);
        let color = self.color.to_array();
        shade_in_place(canvas, |x, y, c| {
            let (qx, qy) = (x as f32 + 0.5, y as f32 + 0.5);
            if qx < t || qy < t || qx > w - t || qy > h - t {
                blend_over(c, color)
            } else {
                c
            }
        });
        Ok(())
    }
}

/// Composites a raster layer over the canvas, its top-left corner at `offset`.
#[derive(Clone, Debug, PartialEq)]
pub struct LayerComposite {
    layer: RgbaImage,
    offset: (i32, i32),
}

impl LayerComposite {
    pub fn new(layer: RgbaImage, offset: (i32, i32)) -> Self {
        Self { layer, offset }
    }

    pub fn offset(&self) -> (i32, i32) {
        self.offset
    }
}

impl Primitive for LayerComposite {
    fn name(&self) -> &'static str {
        "layer-composite"
    }

    fn fragment_shader(&self) -> &'static str {
        LAYER_SHADER
    }

    fn uniforms(&self) -> Uniforms {
        Uniforms::new().vec2(self.offset.0 as f32, self.offset.1 as f32)
    }

    fn layer(&self) -> Option<&RgbaImage> {
        Some(&self.layer)
    }

    fn render_software(&self, canvas: &mut Canvas) -> RetouchResult<()> {
        let (lw, lh) = (self.layer.width() as i64, self.layer.height() as i64);
        let (ox, oy) = (i64::from(self.offset.0), i64::from(self.offset.1));
        shade_in_place(canvas, |x, y, c| {
            let (lx, ly) = (x as i64 - ox, y as i64 - oy);
            if lx < 0 || ly < 0 || lx >= lw || ly >= lh {
                return c;
            }
            blend_over(c, to_unit(self.layer.get_pixel(lx as u32, ly as u32).0))
        });
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/primitives/overlay.rs"]
mod tests;
