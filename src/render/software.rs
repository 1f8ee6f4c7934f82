use image::RgbaImage;

use crate::{
    foundation::core::Size,
    foundation::error::RetouchResult,
    render::backend::{BackendKind, Canvas, RenderSurface, Renderer, SnapshotCache},
};

/// Pixel-loop renderer over an in-memory RGBA8 canvas. Always available.
#[derive(Debug, Default)]
pub struct SoftwareRenderer {
    canvas: Canvas,
    cache: SnapshotCache<Canvas>,
}

impl SoftwareRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_canvas(canvas: Canvas) -> Self {
        Self {
            canvas,
            cache: SnapshotCache::default(),
        }
    }

    fn replace_canvas(&mut self, canvas: Canvas) {
        let resized = canvas.size() != self.canvas.size();
        self.canvas = canvas;
        if resized {
            self.cache.retain_size(self.canvas.size());
        }
    }
}

impl Renderer for SoftwareRenderer {
    fn kind(&self) -> BackendKind {
        BackendKind::Software
    }

    fn size(&self) -> Size {
        self.canvas.size()
    }

    fn set_size(&mut self, size: Size) -> RetouchResult<()> {
        self.replace_canvas(Canvas::new(size));
        Ok(())
    }

    fn canvas(&mut self) -> RetouchResult<Canvas> {
        Ok(self.canvas.clone())
    }

    fn set_canvas(&mut self, canvas: Canvas) -> RetouchResult<()> {
        self.replace_canvas(canvas);
        Ok(())
    }

    fn draw_image(&mut self, image: &RgbaImage) -> RetouchResult<()> {
        self.replace_canvas(Canvas::from_image(image.clone()));
        Ok(())
    }

    fn surface(&mut self) -> RenderSurface<'_> {
        RenderSurface::Software(&mut self.canvas)
    }

    fn cache(&mut self, key: &str) -> RetouchResult<()> {
        self.cache
            .insert(key, self.canvas.size(), self.canvas.clone());
        Ok(())
    }

    fn draw_cached(&mut self, key: &str) -> RetouchResult<bool> {
        let Some((_, snapshot)) = self.cache.get(key) else {
            return Ok(false);
        };
        let snapshot = snapshot.clone();
        self.replace_canvas(snapshot);
        tracing::trace!(key, "restored cached canvas");
        Ok(true)
    }

    fn is_cached(&self, key: &str) -> bool {
        self.cache.contains(key)
    }

    fn cached_keys(&self) -> Vec<String> {
        self.cache.keys()
    }

    fn prune_cache(&mut self, size: Size) {
        self.cache.retain_size(size);
    }

    fn render_final(&mut self) -> RetouchResult<()> {
        Ok(())
    }

    fn reset(&mut self) {
        self.cache.clear();
        self.canvas = Canvas::new(self.canvas.size());
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/software.rs"]
mod tests;
