use std::sync::Arc;

use image::RgbaImage;

use crate::{
    foundation::core::Rgba,
    foundation::error::{RetouchError, RetouchResult},
    foundation::math::{Fnv1a64, unit_to_unorm8},
    operations::{Operation, OperationCategory, OptionMap, OptionReader},
    primitives::LayerComposite,
    render::backend::Renderer,
};

const MAX_FONT_SIZE: f32 = 1024.0;

/// RGBA8 brush carried through the parley layout.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TextBrush {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl From<Rgba> for TextBrush {
    fn from(c: Rgba) -> Self {
        Self {
            r: unit_to_unorm8(c.r),
            g: unit_to_unorm8(c.g),
            b: unit_to_unorm8(c.b),
            a: unit_to_unorm8(c.a),
        }
    }
}

/// Lays out `text` with the font in `font_bytes` and rasterizes it into a straight-alpha
/// layer sized to the layout bounds.
pub fn rasterize_text(
    text: &str,
    font_bytes: &[u8],
    size_px: f32,
    brush: TextBrush,
    max_width_px: Option<f32>,
) -> RetouchResult<RgbaImage> {
    if !size_px.is_finite() || size_px <= 0.0 {
        return Err(RetouchError::validation(
            "text size must be finite and > 0",
        ));
    }

    let mut font_ctx = parley::FontContext::default();
    let mut layout_ctx: parley::LayoutContext<TextBrush> = parley::LayoutContext::new();
    let families = font_ctx
        .collection
        .register_fonts(parley::fontique::Blob::from(font_bytes.to_vec()), None);
    let family_id = families
        .first()
        .map(|(id, _)| *id)
        .ok_or_else(|| RetouchError::validation("no font families registered from font bytes"))?;
    let family_name = font_ctx
        .collection
        .family_name(family_id)
        .ok_or_else(|| RetouchError::validation("registered font family has no name"))?
        .to_string();

    let mut builder = layout_ctx.ranged_builder(&mut font_ctx, text, 1.0, true);
    builder.push_default(parley::style::StyleProperty::FontStack(
        parley::style::FontStack::Source(std::borrow::Cow::Owned(family_name)),
    ));
    builder.push_default(parley::style::StyleProperty::FontSize(size_px));
    builder.push_default(parley::style::StyleProperty::Brush(brush));
    let mut layout: parley::Layout<TextBrush> = builder.build(text);
    layout.break_all_lines(max_width_px);
    layout.align(
        max_width_px,
        parley::Alignment::Start,
        parley::AlignmentOptions::default(),
    );

    let to_u16 = |v: f32, what: &str| -> RetouchResult<u16> {
        u16::try_from(v.ceil().max(1.0) as u32).map_err(|_| {
            RetouchError::render_execution(format!("text layer {what} exceeds u16"))
        })
    };
    let width = to_u16(layout.width(), "width")?;
    let height = to_u16(layout.height(), "height")?;

    let font = vello_cpu::peniko::FontData::new(
        vello_cpu::peniko::Blob::from(font_bytes.to_vec()),
        0,
    );
    let mut ctx = vello_cpu::RenderContext::new(width, height);
    for line in layout.lines() {
        for item in line.items() {
            let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                continue;
            };
            let b = run.style().brush;
            ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(b.r, b.g, b.b, b.a));
            let glyphs = run.glyphs().map(|g| vello_cpu::Glyph {
                id: g.id,
                x: g.x,
                y: g.y,
            });
            ctx.glyph_run(&font)
                .font_size(run.run().font_size())
                .fill_glyphs(glyphs);
        }
    }
    ctx.flush();
    let mut pixmap = vello_cpu::Pixmap::new(width, height);
    ctx.render_to_pixmap(&mut pixmap);

    let mut data = pixmap.data_as_u8_slice().to_vec();
    unpremultiply_rgba8(&mut data);
    RgbaImage::from_raw(u32::from(width), u32::from(height), data)
        .ok_or_else(|| RetouchError::render_execution("text layer buffer size mismatch"))
}

fn unpremultiply_rgba8(data: &mut [u8]) {
    for px in data.chunks_exact_mut(4) {
        let a = px[3];
        if a == 0 {
            px[..3].fill(0);
            continue;
        }
        for c in &mut px[..3] {
            *c = ((u16::from(*c) * 255 + u16::from(a) / 2) / u16::from(a)).min(255) as u8;
        }
    }
}

/// A text overlay rendered with a caller-supplied font.
#[derive(Clone, Debug, PartialEq)]
pub struct TextOperation {
    text: String,
    font: Option<Arc<Vec<u8>>>,
    font_fingerprint: u64,
    font_size: f32,
    color: Rgba,
    position: [f32; 2],
    max_width: f32,
}

impl Default for TextOperation {
    fn default() -> Self {
        Self {
            text: String::new(),
            font: None,
            font_fingerprint: 0,
            font_size: 32.0,
            color: Rgba::WHITE,
            position: [0.0, 0.0],
            max_width: 0.0,
        }
    }
}

impl TextOperation {
    pub const IDENTIFIER: &'static str = "text";

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    /// Raw TrueType/OpenType bytes.
    pub fn set_font(&mut self, bytes: Vec<u8>) {
        let mut h = Fnv1a64::new_default();
        h.write_bytes(&bytes);
        self.font_fingerprint = h.finish();
        self.font = Some(Arc::new(bytes));
    }

    pub fn has_font(&self) -> bool {
        self.font.is_some()
    }

    /// Font size in pixels, colour, normalized top-left position and wrap width as a fraction
    /// of the canvas width (0 disables wrapping).
    pub fn set_style(
        &mut self,
        font_size: f32,
        color: Rgba,
        position: [f32; 2],
        max_width: f32,
    ) -> RetouchResult<()> {
        if !font_size.is_finite() || font_size <= 0.0 || font_size > MAX_FONT_SIZE {
            return Err(RetouchError::validation(format!(
                "font size must be within (0, {MAX_FONT_SIZE}], got {font_size}"
            )));
        }
        let color = color.validate()?;
        if !position.iter().all(|c| (0.0..=1.0).contains(c)) {
            return Err(RetouchError::validation(
                "text position must lie within [0, 1]",
            ));
        }
        if !(0.0..=1.0).contains(&max_width) {
            return Err(RetouchError::validation(
                "text max width must lie within [0, 1]",
            ));
        }
        self.font_size = font_size;
        self.color = color;
        self.position = position;
        self.max_width = max_width;
        Ok(())
    }
}

impl Operation for TextOperation {
    fn identifier(&self) -> &'static str {
        Self::IDENTIFIER
    }

    fn category(&self) -> OperationCategory {
        OperationCategory::PostProcessing
    }

    fn is_identity(&self) -> bool {
        self.text.trim().is_empty() || self.font.is_none() || self.color.a == 0.0
    }

    fn options(&self) -> OptionMap {
        OptionMap::from([
            ("text".to_string(), self.text.clone().into()),
            ("font_size".to_string(), self.font_size.into()),
            ("color".to_string(), self.color.into()),
            ("position".to_string(), self.position.into()),
            ("max_width".to_string(), self.max_width.into()),
        ])
    }

    fn set_options(&mut self, options: &OptionMap) -> RetouchResult<()> {
        let reader = OptionReader::new(
            Self::IDENTIFIER,
            options,
            &["text", "font_size", "color", "position", "max_width"],
        )?;
        let text = reader.text("text")?;
        let mut next = self.clone();
        next.set_style(
            reader.number("font_size")?.unwrap_or(self.font_size),
            reader.color("color")?.unwrap_or(self.color),
            reader.point("position")?.unwrap_or(self.position),
            reader.number("max_width")?.unwrap_or(self.max_width),
        )?;
        if let Some(text) = text {
            next.text = text.to_string();
        }
        *self = next;
        Ok(())
    }

    fn render(&self, renderer: &mut dyn Renderer) -> RetouchResult<()> {
        let Some(font) = self.font.as_deref() else {
            return Ok(());
        };
        let canvas = renderer.size();
        let max_width = (self.max_width > 0.0).then(|| self.max_width * canvas.width as f32);
        let layer = rasterize_text(
            &self.text,
            font,
            self.font_size,
            self.color.into(),
            max_width,
        )?;
        let offset = (
            (self.position[0] * canvas.width as f32).round() as i32,
            (self.position[1] * canvas.height as f32).round() as i32,
        );
        renderer.run_primitive(&LayerComposite::new(layer, offset))
    }

    fn clone_boxed(&self) -> Box<dyn Operation> {
        Box::new(self.clone())
    }

    fn content_fingerprint(&self) -> u64 {
        self.font_fingerprint
    }
}

#[cfg(test)]
#[path = "../../tests/unit/operations/text.rs"]
mod tests;
