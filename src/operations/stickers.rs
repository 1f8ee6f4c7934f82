use std::sync::Arc;

use image::{RgbaImage, imageops::FilterType};

use crate::{
    foundation::error::{RetouchError, RetouchResult},
    foundation::math::Fnv1a64,
    operations::{Operation, OperationCategory, OptionMap, OptionReader},
    primitives::LayerComposite,
    render::backend::Renderer,
};

const MAX_STICKER_SCALE: f32 = 16.0;

/// Places a caller-supplied raster over the picture.
#[derive(Clone, Debug, PartialEq)]
pub struct StickersOperation {
    sticker: Option<Arc<RgbaImage>>,
    fingerprint: u64,
    position: [f32; 2],
    scale: f32,
}

impl Default for StickersOperation {
    fn default() -> Self {
        Self {
            sticker: None,
            fingerprint: 0,
            position: [0.0, 0.0],
            scale: 1.0,
        }
    }
}

impl StickersOperation {
    pub const IDENTIFIER: &'static str = "stickers";

    pub fn set_sticker(&mut self, image: RgbaImage) {
        let mut h = Fnv1a64::new_default();
        h.write_u64(u64::from(image.width()));
        h.write_u64(u64::from(image.height()));
        h.write_bytes(image.as_raw());
        self.fingerprint = h.finish();
        self.sticker = Some(Arc::new(image));
    }

    pub fn clear_sticker(&mut self) {
        self.sticker = None;
        self.fingerprint = 0;
    }

    pub fn sticker(&self) -> Option<&RgbaImage> {
        self.sticker.as_deref()
    }

    /// Normalized top-left corner of the sticker.
    pub fn position(&self) -> [f32; 2] {
        self.position
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn set_placement(&mut self, position: [f32; 2], scale: f32) -> RetouchResult<()> {
        if !position.iter().all(|c| (0.0..=1.0).contains(c)) {
            return Err(RetouchError::validation(
                "sticker position must lie within [0, 1]",
            ));
        }
        if !scale.is_finite() || scale <= 0.0 || scale > MAX_STICKER_SCALE {
            return Err(RetouchError::validation(format!(
                "sticker scale must be within (0, {MAX_STICKER_SCALE}], got {scale}"
            )));
        }
        self.position = position;
        self.scale = scale;
        Ok(())
    }
}

impl Operation for StickersOperation {
    fn identifier(&self) -> &'static str {
        Self::IDENTIFIER
    }

    fn category(&self) -> OperationCategory {
        OperationCategory::PostProcessing
    }

    fn is_identity(&self) -> bool {
        self.sticker.is_none()
    }

    fn options(&self) -> OptionMap {
        OptionMap::from([
            ("position".to_string(), self.position.into()),
            ("scale".to_string(), self.scale.into()),
        ])
    }

    fn set_options(&mut self, options: &OptionMap) -> RetouchResult<()> {
        let reader = OptionReader::new(Self::IDENTIFIER, options, &["position", "scale"])?;
        self.set_placement(
            reader.point("position")?.unwrap_or(self.position),
            reader.number("scale")?.unwrap_or(self.scale),
        )
    }

    fn render(&self, renderer: &mut dyn Renderer) -> RetouchResult<()> {
        let Some(sticker) = self.sticker.as_deref() else {
            return Ok(());
        };
        let layer = if self.scale == 1.0 {
            sticker.clone()
        } else {
            let w = ((sticker.width() as f32 * self.scale).round() as u32).max(1);
            let h = ((sticker.height() as f32 * self.scale).round() as u32).max(1);
            image::imageops::resize(sticker, w, h, FilterType::Triangle)
        };
        let canvas = renderer.size();
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
        self.fingerprint
    }
}

#[cfg(test)]
#[path = "../../tests/unit/operations/stickers.rs"]
mod tests;
