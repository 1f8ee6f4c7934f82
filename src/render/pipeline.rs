//! Render pass orchestration over an [`OperationStack`].
//!
//! A pass validates the request, picks a backend, seeds the canvas from the source image
//! (or the newest cached step), renders every non-identity operation in stack order,
//! optionally resizes, finalizes once and extracts the output.

use std::{io::Cursor, str::FromStr, sync::Arc, sync::mpsc, thread};

use anyhow::Context;
use image::RgbaImage;

use crate::{
    config::{EditorConfig, RendererPreference},
    foundation::core::{Dimensions, Size},
    foundation::error::{RetouchError, RetouchResult},
    foundation::math::Fnv1a64,
    operations::{Operation, OperationStack, create_operation, downcast_mut, downcast_ref},
    render::backend::{BackendKind, Renderer},
    render::{create_renderer, gpu_supported},
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RenderType {
    /// Decoded pixels.
    #[default]
    Image,
    /// Encoded file bytes.
    Buffer,
}

impl FromStr for RenderType {
    type Err = RetouchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "image" => Ok(Self::Image),
            "buffer" => Ok(Self::Buffer),
            other => Err(RetouchError::validation(format!(
                "unknown render type '{other}', expected 'image' or 'buffer'"
            ))),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Png,
    Jpeg,
}

impl OutputFormat {
    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
        }
    }

    /// Infers the format from a file extension.
    pub fn from_extension(ext: &str) -> RetouchResult<Self> {
        ext.parse()
    }

    fn encode(self, image: &RgbaImage) -> RetouchResult<Vec<u8>> {
        let mut out = Cursor::new(Vec::new());
        match self {
            Self::Png => image
                .write_to(&mut out, image::ImageFormat::Png)
                .context("encode PNG output")?,
            Self::Jpeg => flatten_on_white(image)
                .write_to(&mut out, image::ImageFormat::Jpeg)
                .context("encode JPEG output")?,
        }
        Ok(out.into_inner())
    }
}

/// JPEG has no alpha channel, so translucent pixels are composited onto opaque white.
fn flatten_on_white(image: &RgbaImage) -> image::RgbImage {
    image::RgbImage::from_fn(image.width(), image.height(), |x, y| {
        let [r, g, b, a] = image.get_pixel(x, y).0;
        let a = f32::from(a) / 255.0;
        let over = |c: u8| (f32::from(c) * a + 255.0 * (1.0 - a)).round() as u8;
        image::Rgb([over(r), over(g), over(b)])
    })
}

impl FromStr for OutputFormat {
    type Err = RetouchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "png" | "image/png" => Ok(Self::Png),
            "jpeg" | "jpg" | "image/jpeg" => Ok(Self::Jpeg),
            other => Err(RetouchError::validation(format!(
                "unknown output format '{other}', expected 'png' or 'jpeg'"
            ))),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RenderRequest {
    pub render_type: RenderType,
    pub format: OutputFormat,
    pub dimensions: Option<Dimensions>,
}

impl RenderRequest {
    /// Parses loosely typed arguments. Absent values take their defaults.
    pub fn parse(
        render_type: Option<&str>,
        format: Option<&str>,
        dimensions: Option<&str>,
    ) -> RetouchResult<Self> {
        Ok(Self {
            render_type: render_type.map(str::parse).transpose()?.unwrap_or_default(),
            format: format.map(str::parse).transpose()?.unwrap_or_default(),
            dimensions: dimensions.map(str::parse).transpose()?,
        })
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum RenderOutput {
    Image(RgbaImage),
    Encoded { format: OutputFormat, bytes: Vec<u8> },
}

impl RenderOutput {
    pub fn into_image(self) -> Option<RgbaImage> {
        match self {
            Self::Image(img) => Some(img),
            Self::Encoded { .. } => None,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RenderState {
    #[default]
    Idle,
    Validating,
    BackendSelect,
    Rendering {
        index: usize,
    },
    Finalizing,
    Complete,
    Failed,
}

/// Owns the source image, the operation stack and the active renderer.
pub struct Editor {
    config: EditorConfig,
    source: Option<Arc<RgbaImage>>,
    source_generation: u64,
    stack: OperationStack,
    renderer: Option<Box<dyn Renderer>>,
    needs_reset: bool,
    state: RenderState,
}

impl std::fmt::Debug for Editor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Editor")
            .field("config", &self.config)
            .field("source", &self.source.as_ref().map(|s| s.dimensions()))
            .field("stack", &self.stack.identifiers())
            .field("backend", &self.backend())
            .field("state", &self.state)
            .finish()
    }
}

impl Editor {
    pub fn new(config: EditorConfig) -> Self {
        Self {
            config,
            source: None,
            source_generation: 0,
            stack: OperationStack::new(),
            renderer: None,
            needs_reset: false,
            state: RenderState::Idle,
        }
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn state(&self) -> RenderState {
        self.state
    }

    pub fn stack(&self) -> &OperationStack {
        &self.stack
    }

    /// Backend of the renderer used by the last pass.
    pub fn backend(&self) -> Option<BackendKind> {
        self.renderer.as_ref().map(|r| r.kind())
    }

    pub fn renderer_mut(&mut self) -> Option<&mut (dyn Renderer + 'static)> {
        self.renderer.as_deref_mut()
    }

    pub fn set_source(&mut self, image: RgbaImage) {
        self.source = Some(Arc::new(image));
        self.source_generation += 1;
    }

    pub fn source(&self) -> Option<&RgbaImage> {
        self.source.as_deref()
    }

    /// Replaces the whole stack.
    pub fn set_stack(&mut self, stack: OperationStack) {
        self.stack = stack;
    }

    pub fn insert_operation(
        &mut self,
        op: Box<dyn Operation>,
        preferred_index: Option<usize>,
    ) -> Option<Box<dyn Operation>> {
        self.stack.insert(op, preferred_index)
    }

    pub fn remove_operation(&mut self, identifier: &str) -> Option<Box<dyn Operation>> {
        self.stack.remove(identifier)
    }

    /// Existing operation for `identifier`, or a default one appended to its category.
    pub fn get_or_create_operation(
        &mut self,
        identifier: &str,
    ) -> RetouchResult<&mut (dyn Operation + 'static)> {
        if !self.stack.contains(identifier) {
            self.stack.insert(create_operation(identifier)?, None);
        }
        self.stack
            .get_mut(identifier)
            .ok_or_else(|| RetouchError::unknown_identifier(format!("operation '{identifier}'")))
    }

    pub fn operation<T: Operation>(&self, identifier: &str) -> Option<&T> {
        downcast_ref::<T>(self.stack.get(identifier)?)
    }

    pub fn operation_mut<T: Operation>(&mut self, identifier: &str) -> Option<&mut T> {
        downcast_mut::<T>(self.stack.get_mut(identifier)?)
    }

    /// `render` with string arguments, as handed in by front-ends.
    pub fn render_with(
        &mut self,
        render_type: Option<&str>,
        format: Option<&str>,
        dimensions: Option<&str>,
    ) -> RetouchResult<RenderOutput> {
        self.state = RenderState::Validating;
        let request = match RenderRequest::parse(render_type, format, dimensions) {
            Ok(request) => request,
            Err(e) => {
                self.state = RenderState::Failed;
                return Err(e);
            }
        };
        self.render(request)
    }

    #[tracing::instrument(skip(self), fields(ops = self.stack.len()))]
    pub fn render(&mut self, request: RenderRequest) -> RetouchResult<RenderOutput> {
        self.state = RenderState::Validating;
        let Some(source) = self.source.clone() else {
            self.state = RenderState::Failed;
            return Err(RetouchError::validation("no source image set"));
        };
        let source_size = Size::new(source.width(), source.height());
        if let Err(e) = source_size.ensure_non_empty("source image") {
            self.state = RenderState::Failed;
            return Err(e);
        }

        self.state = RenderState::BackendSelect;
        let kind = self.select_backend();
        let mut renderer = match self.renderer.take() {
            Some(r) if r.kind() == kind => r,
            _ => match create_renderer(kind, self.config.assets_path.as_deref()) {
                Ok(r) => r,
                Err(e) if kind == BackendKind::Gpu => {
                    tracing::warn!(error = %e, "gpu renderer unavailable, using software");
                    create_renderer(BackendKind::Software, None)?
                }
                Err(e) => {
                    self.state = RenderState::Failed;
                    return Err(e);
                }
            },
        };
        if self.needs_reset {
            renderer.reset();
            self.needs_reset = false;
        }

        let result = self.run_pass(renderer.as_mut(), &source, request);
        self.renderer = Some(renderer);
        match result {
            Ok(output) => {
                self.state = RenderState::Complete;
                Ok(output)
            }
            Err(e) => {
                tracing::warn!(error = %e, "render pass failed");
                self.needs_reset = true;
                self.state = RenderState::Failed;
                Err(e)
            }
        }
    }

    fn select_backend(&self) -> BackendKind {
        match self.config.renderer {
            RendererPreference::SoftwareOnly => BackendKind::Software,
            RendererPreference::GpuPreferred if gpu_supported() => BackendKind::Gpu,
            RendererPreference::GpuPreferred => {
                tracing::warn!("gpu renderer not supported here, falling back to software");
                BackendKind::Software
            }
        }
    }

    fn step_keys(&self) -> RetouchResult<Vec<String>> {
        let mut prev = Fnv1a64::OFFSET_BASIS;
        self.stack
            .iter()
            .filter(|op| !op.is_identity())
            .map(|op| -> RetouchResult<String> {
                let options = serde_json::to_string(&op.options())
                    .with_context(|| format!("serialize '{}' options", op.identifier()))?;
                let mut h = Fnv1a64::new_default();
                h.write_u64(self.source_generation);
                h.write_u64(prev);
                h.write_str(op.identifier());
                h.write_str(&options);
                h.write_u64(op.content_fingerprint());
                prev = h.finish();
                Ok(format!("{prev:016x}"))
            })
            .collect()
    }

    fn run_pass(
        &mut self,
        renderer: &mut dyn Renderer,
        source: &RgbaImage,
        request: RenderRequest,
    ) -> RetouchResult<RenderOutput> {
        let cache = self.config.cache_intermediate;
        let keys = if cache { self.step_keys()? } else { Vec::new() };

        let restored = if cache {
            keys.iter()
                .rposition(|k| renderer.is_cached(k))
                .map(|i| renderer.draw_cached(&keys[i]).map(|hit| hit.then_some(i + 1)))
                .transpose()?
                .flatten()
        } else {
            None
        };
        let start = match restored {
            Some(start) => {
                tracing::debug!(start, "resumed from cached step");
                start
            }
            None => {
                renderer.draw_image(source)?;
                0
            }
        };

        let ops: Vec<&dyn Operation> = self.stack.iter().filter(|op| !op.is_identity()).collect();
        for (index, op) in ops.iter().enumerate().skip(start) {
            self.state = RenderState::Rendering { index };
            tracing::debug!(index, operation = op.identifier(), "rendering operation");
            op.render(renderer)?;
            if cache {
                renderer.cache(&keys[index])?;
            }
        }

        self.state = RenderState::Finalizing;
        if let Some(dimensions) = request.dimensions {
            renderer.resize_to(dimensions.resolve(renderer.size())?)?;
        }
        renderer.render_final()?;
        let image = renderer.canvas()?.into_image();

        Ok(match request.render_type {
            RenderType::Image => RenderOutput::Image(image),
            RenderType::Buffer => RenderOutput::Encoded {
                format: request.format,
                bytes: request.format.encode(&image)?,
            },
        })
    }

    /// Renders a snapshot of the current stack and source on a worker thread with its own
    /// renderer.
    pub fn spawn_render(&self, request: RenderRequest) -> RetouchResult<RenderTask> {
        let source = self
            .source
            .clone()
            .ok_or_else(|| RetouchError::validation("no source image set"))?;
        let mut worker = Editor {
            config: self.config.clone(),
            source: Some(source),
            source_generation: self.source_generation,
            stack: self.stack.clone(),
            renderer: None,
            needs_reset: false,
            state: RenderState::Idle,
        };
        let (tx, rx) = mpsc::channel();
        thread::Builder::new()
            .name("retouch-render".to_string())
            .spawn(move || {
                let _ = tx.send(worker.render(request));
            })
            .context("spawn render worker")?;
        Ok(RenderTask { rx })
    }
}

/// Completion handle of [`Editor::spawn_render`]. Dropping it discards the result.
#[derive(Debug)]
pub struct RenderTask {
    rx: mpsc::Receiver<RetouchResult<RenderOutput>>,
}

impl RenderTask {
    /// Blocks until the pass finishes.
    pub fn wait(self) -> RetouchResult<RenderOutput> {
        self.rx
            .recv()
            .map_err(|_| RetouchError::render_execution("render worker terminated"))?
    }

    /// Result if the pass already finished.
    pub fn try_result(&mut self) -> Option<RetouchResult<RenderOutput>> {
        match self.rx.try_recv() {
            Ok(result) => Some(result),
            Err(mpsc::TryRecvError::Empty) => None,
            Err(mpsc::TryRecvError::Disconnected) => Some(Err(RetouchError::render_execution(
                "render worker terminated",
            ))),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/pipeline.rs"]
mod tests;
