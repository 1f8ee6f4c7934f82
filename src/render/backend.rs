use std::collections::HashMap;

use image::RgbaImage;

use crate::{
    foundation::core::Size,
    foundation::error::{RetouchError, RetouchResult},
    primitives::{Primitive, Resample, ShaderTarget},
};

/// Backend identity. The only thing primitive dispatch may branch on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BackendKind {
    Gpu,
    Software,
}

impl BackendKind {
    pub fn identifier(self) -> &'static str {
        match self {
            Self::Gpu => "gpu",
            Self::Software => "software",
        }
    }
}

impl std::fmt::Display for BackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.identifier())
    }
}

/// Straight-alpha RGBA8 pixel store.
#[derive(Clone, PartialEq, Eq)]
pub struct Canvas {
    image: RgbaImage,
}

impl std::fmt::Debug for Canvas {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Canvas").field("size", &self.size()).finish()
    }
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new(Size::new(0, 0))
    }
}

impl Canvas {
    /// Transparent canvas.
    pub fn new(size: Size) -> Self {
        Self {
            image: RgbaImage::new(size.width, size.height),
        }
    }

    pub fn from_image(image: RgbaImage) -> Self {
        Self { image }
    }

    pub fn from_raw(size: Size, data: Vec<u8>) -> RetouchResult<Self> {
        if data.len() != size.byte_len() {
            return Err(RetouchError::render_execution(format!(
                "canvas byte length mismatch: expected {}, got {}",
                size.byte_len(),
                data.len()
            )));
        }
        RgbaImage::from_raw(size.width, size.height, data)
            .map(Self::from_image)
            .ok_or_else(|| RetouchError::render_execution("canvas buffer rejected"))
    }

    pub fn size(&self) -> Size {
        Size::new(self.image.width(), self.image.height())
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn image_mut(&mut self) -> &mut RgbaImage {
        &mut self.image
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }

    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        self.image.get_pixel(x, y).0
    }

    pub fn as_raw(&self) -> &[u8] {
        self.image.as_raw()
    }
}

/// Canvas snapshots keyed by opaque strings, tagged with the dimensions they were taken at.
#[derive(Debug)]
pub struct SnapshotCache<T> {
    entries: HashMap<String, (Size, T)>,
}

impl<T> Default for SnapshotCache<T> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<T> SnapshotCache<T> {
    pub fn insert(&mut self, key: &str, size: Size, snapshot: T) {
        self.entries.insert(key.to_string(), (size, snapshot));
    }

    pub fn get(&self, key: &str) -> Option<(Size, &T)> {
        self.entries.get(key).map(|(size, snap)| (*size, snap))
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Drops every entry whose dimensions differ from `size`.
    pub fn retain_size(&mut self, size: Size) {
        self.entries.retain(|_, (s, _)| *s == size);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.entries.keys().cloned().collect();
        keys.sort();
        keys
    }
}

/// Mutable execution surface handed to primitives, tagged by backend.
pub enum RenderSurface<'a> {
    Software(&'a mut Canvas),
    Gpu(&'a mut dyn ShaderTarget),
}

/// Capability surface shared by the GPU and software renderers.
///
/// A renderer owns exactly one canvas. Operations only ever reach it through
/// [`Renderer::run_primitive`] and the lifecycle methods below, and never keep a reference
/// past their own render call.
pub trait Renderer: Send {
    fn kind(&self) -> BackendKind;

    /// Blank canvas of the given size; missing sides default to the current canvas.
    fn create_canvas(&self, width: Option<u32>, height: Option<u32>) -> Canvas {
        let current = self.size();
        Canvas::new(Size::new(
            width.unwrap_or(current.width),
            height.unwrap_or(current.height),
        ))
    }

    fn size(&self) -> Size;

    /// Replaces the canvas with a blank one of `size`.
    fn set_size(&mut self, size: Size) -> RetouchResult<()>;

    /// Current pixels. GPU renderers read back from the framebuffer.
    fn canvas(&mut self) -> RetouchResult<Canvas>;

    /// Replaces the canvas wholesale.
    fn set_canvas(&mut self, canvas: Canvas) -> RetouchResult<()>;

    /// Seeds the canvas with a source image.
    fn draw_image(&mut self, image: &RgbaImage) -> RetouchResult<()>;

    fn surface(&mut self) -> RenderSurface<'_>;

    /// Captures the current canvas under `key`.
    fn cache(&mut self, key: &str) -> RetouchResult<()>;

    /// Restores the canvas stored under `key`. Returns `false` when nothing is cached.
    fn draw_cached(&mut self, key: &str) -> RetouchResult<bool>;

    fn is_cached(&self, key: &str) -> bool;

    fn cached_keys(&self) -> Vec<String>;

    /// Drops cache entries whose dimensions differ from `size`.
    fn prune_cache(&mut self, size: Size);

    /// Called once after the whole stack rendered.
    fn render_final(&mut self) -> RetouchResult<()>;

    /// Drops the cache and the canvas contents.
    fn reset(&mut self);

    /// Single dispatch point for primitives.
    fn run_primitive(&mut self, primitive: &dyn Primitive) -> RetouchResult<()> {
        let before = self.size();
        match self.surface() {
            RenderSurface::Software(canvas) => primitive.render_software(canvas)?,
            RenderSurface::Gpu(target) => primitive.render_gpu(target)?,
        }
        let after = self.size();
        if after != before {
            self.prune_cache(after);
        }
        Ok(())
    }

    /// Rescales the current picture to `size` with bilinear sampling.
    ///
    /// Returns once the new canvas is fully written; callers never observe a partial resize.
    /// Cached snapshots are kept, so an output resize does not invalidate the step cache.
    fn resize_to(&mut self, size: Size) -> RetouchResult<()> {
        size.ensure_renderable("resize target")?;
        if size == self.size() {
            return Ok(());
        }
        let scale = Resample::scale_to(self.size(), size)?;
        match self.surface() {
            RenderSurface::Software(canvas) => scale.render_software(canvas),
            RenderSurface::Gpu(target) => scale.render_gpu(target),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/backend.rs"]
mod tests;
