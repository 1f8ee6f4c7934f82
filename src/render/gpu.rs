//! `wgpu` renderer: every primitive is one full-screen fragment pass into a fresh
//! `Rgba8Unorm` texture.

use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::OnceLock,
};

use anyhow::Context;
use image::RgbaImage;

use crate::{
    foundation::core::Size,
    foundation::error::{RetouchError, RetouchResult},
    primitives::{ShaderInvocation, ShaderTarget},
    render::backend::{BackendKind, Canvas, RenderSurface, Renderer, SnapshotCache},
};

const PRELUDE: &str = r#"
struct VsOut {
  @builtin(position) pos: vec4<f32>,
};

@vertex
fn vs(@builtin(vertex_index) vi: u32) -> VsOut {
  var p = array<vec2<f32>, 3>(
    vec2<f32>(-1.0, -1.0),
    vec2<f32>( 3.0, -1.0),
    vec2<f32>(-1.0,  3.0),
  );
  var o: VsOut;
  o.pos = vec4<f32>(p[vi], 0.0, 1.0);
  return o;
}

struct Frame {
  sizes: vec4<f32>,
  layer: vec4<f32>,
};

@group(0) @binding(0) var src_tex: texture_2d<f32>;
@group(0) @binding(1) var layer_tex: texture_2d<f32>;
@group(0) @binding(2) var<uniform> frame: Frame;
@group(0) @binding(3) var<uniform> u: array<vec4<f32>, 264>;

fn dst_size() -> vec2<f32> {
  return frame.sizes.xy;
}

fn src_size() -> vec2<f32> {
  return frame.sizes.zw;
}

fn layer_size() -> vec2<f32> {
  return frame.layer.xy;
}

fn load_src(p: vec2<i32>) -> vec4<f32> {
  let m = vec2<i32>(src_size()) - vec2<i32>(1);
  return textureLoad(src_tex, clamp(p, vec2<i32>(0), m), 0);
}

fn load_layer(p: vec2<i32>) -> vec4<f32> {
  let s = vec2<i32>(layer_size());
  if (frame.layer.z < 0.5 || p.x < 0 || p.y < 0 || p.x >= s.x || p.y >= s.y) {
    return vec4<f32>(0.0);
  }
  return textureLoad(layer_tex, p, 0);
}

fn center_uv(p: vec2<i32>) -> vec2<f32> {
  return (vec2<f32>(p) + vec2<f32>(0.5)) / dst_size();
}

@fragment
fn fs(v: VsOut) -> @location(0) vec4<f32> {
  return shade(vec2<i32>(floor(v.pos.xy)));
}
"#;

const FRAME_UNIFORM_BYTES: u64 = 32;
const PRIMITIVE_UNIFORM_BYTES: u64 = (crate::primitives::UNIFORM_SLOTS * 16) as u64;

static GPU_SUPPORTED: OnceLock<bool> = OnceLock::new();

fn request_adapter() -> RetouchResult<wgpu::Adapter> {
    let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());
    pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
        power_preference: wgpu::PowerPreference::HighPerformance,
        compatible_surface: None,
        force_fallback_adapter: false,
    }))
    .map_err(|e| match e {
        wgpu::RequestAdapterError::NotFound { .. } => {
            RetouchError::unsupported_backend("no gpu adapter available")
        }
        other => RetouchError::unsupported_backend(format!(
            "wgpu request_adapter failed: {other:?}"
        )),
    })
}

fn err_render(what: &str, e: impl std::fmt::Debug) -> RetouchError {
    RetouchError::render_execution(format!("{what}: {e:?}"))
}

#[derive(Clone)]
struct GpuFrame {
    texture: wgpu::Texture,
    view: wgpu::TextureView,
    size: Size,
}

/// Shader renderer on the first available `wgpu` adapter.
pub struct GpuRenderer {
    device: wgpu::Device,
    queue: wgpu::Queue,
    bind_group_layout: wgpu::BindGroupLayout,
    pipeline_layout: wgpu::PipelineLayout,
    frame_uniforms: wgpu::Buffer,
    primitive_uniforms: wgpu::Buffer,
    pipelines: HashMap<&'static str, wgpu::RenderPipeline>,
    frame: Option<GpuFrame>,
    empty_layer: GpuFrame,
    cache: SnapshotCache<GpuFrame>,
    shader_dir: Option<PathBuf>,
}

impl std::fmt::Debug for GpuRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GpuRenderer")
            .field("size", &self.size())
            .field("pipelines", &self.pipelines.len())
            .field("cached", &self.cache.len())
            .field("shader_dir", &self.shader_dir)
            .finish()
    }
}

impl GpuRenderer {
    /// True when an adapter can be acquired. Probed once per process.
    pub fn is_supported() -> bool {
        *GPU_SUPPORTED.get_or_init(|| match request_adapter() {
            Ok(adapter) => {
                tracing::debug!(adapter = ?adapter.get_info().name, "gpu adapter available");
                true
            }
            Err(e) => {
                tracing::debug!(error = %e, "gpu adapter unavailable");
                false
            }
        })
    }

    /// Acquires a device. `shader_dir` may hold `<primitive name>.wgsl` overrides.
    pub fn new(shader_dir: Option<PathBuf>) -> RetouchResult<Self> {
        let adapter = request_adapter()?;
        let (device, queue) = pollster::block_on(adapter.request_device(&wgpu::DeviceDescriptor {
            label: Some("retouch_device"),
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::default(),
            experimental_features: wgpu::ExperimentalFeatures::default(),
            memory_hints: wgpu::MemoryHints::Performance,
            trace: wgpu::Trace::Off,
        }))
        .map_err(|e| RetouchError::unsupported_backend(format!("wgpu request_device failed: {e:?}")))?;

        let texture_entry = |binding: u32| wgpu::BindGroupLayoutEntry {
            binding,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Texture {
                multisampled: false,
                view_dimension: wgpu::TextureViewDimension::D2,
                sample_type: wgpu::TextureSampleType::Float { filterable: false },
            },
            count: None,
        };
        let uniform_entry = |binding: u32, size: u64| wgpu::BindGroupLayoutEntry {
            binding,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: wgpu::BufferSize::new(size),
            },
            count: None,
        };
        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("retouch_primitive_bgl"),
            entries: &[
                texture_entry(0),
                texture_entry(1),
                uniform_entry(2, FRAME_UNIFORM_BYTES),
                uniform_entry(3, PRIMITIVE_UNIFORM_BYTES),
            ],
        });
        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("retouch_primitive_pl"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let uniform_buffer = |label: &str, size: u64| {
            device.create_buffer(&wgpu::BufferDescriptor {
                label: Some(label),
                size,
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            })
        };
        let frame_uniforms = uniform_buffer("retouch_frame_uniforms", FRAME_UNIFORM_BYTES);
        let primitive_uniforms =
            uniform_buffer("retouch_primitive_uniforms", PRIMITIVE_UNIFORM_BYTES);

        let empty_layer = create_frame(&device, Size::new(1, 1), "retouch_empty_layer");

        Ok(Self {
            device,
            queue,
            bind_group_layout,
            pipeline_layout,
            frame_uniforms,
            primitive_uniforms,
            pipelines: HashMap::new(),
            frame: None,
            empty_layer,
            cache: SnapshotCache::default(),
            shader_dir,
        })
    }

    fn shader_source(&self, invocation: &ShaderInvocation<'_>) -> RetouchResult<String> {
        let body = match self.shader_override(invocation.name)? {
            Some(body) => body,
            None => invocation.source.to_string(),
        };
        Ok(format!("{PRELUDE}\n{body}"))
    }

    fn shader_override(&self, name: &str) -> RetouchResult<Option<String>> {
        let Some(dir) = self.shader_dir.as_deref() else {
            return Ok(None);
        };
        let path = dir.join(format!("{name}.wgsl"));
        if !path.is_file() {
            return Ok(None);
        }
        let body = std::fs::read_to_string(&path)
            .with_context(|| format!("read shader override '{}'", path.display()))?;
        tracing::debug!(shader = name, path = %path.display(), "using shader override");
        Ok(Some(body))
    }

    fn ensure_pipeline(&mut self, invocation: &ShaderInvocation<'_>) -> RetouchResult<()> {
        if self.pipelines.contains_key(invocation.name) {
            return Ok(());
        }
        let source = self.shader_source(invocation)?;

        self.device.push_error_scope(wgpu::ErrorFilter::Validation);
        let module = self
            .device
            .create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some(invocation.name),
                source: wgpu::ShaderSource::Wgsl(source.into()),
            });
        let pipeline = self
            .device
            .create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(invocation.name),
                layout: Some(&self.pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &module,
                    entry_point: Some("vs"),
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                    buffers: &[],
                },
                fragment: Some(wgpu::FragmentState {
                    module: &module,
                    entry_point: Some("fs"),
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: wgpu::TextureFormat::Rgba8Unorm,
                        blend: None,
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                }),
                primitive: wgpu::PrimitiveState::default(),
                depth_stencil: None,
                multisample: wgpu::MultisampleState::default(),
                multiview: None,
                cache: None,
            });
        if let Some(e) = pollster::block_on(self.device.pop_error_scope()) {
            return Err(RetouchError::render_execution(format!(
                "shader '{}' failed to compile: {e}",
                invocation.name
            )));
        }

        tracing::debug!(shader = invocation.name, "compiled primitive pipeline");
        self.pipelines.insert(invocation.name, pipeline);
        Ok(())
    }

    fn upload(&self, image: &RgbaImage, label: &str) -> GpuFrame {
        let size = Size::new(image.width(), image.height());
        let frame = create_frame(&self.device, size, label);
        self.queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &frame.texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            image.as_raw(),
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(size.width * 4),
                rows_per_image: Some(size.height),
            },
            extent(size),
        );
        frame
    }

    fn replace_frame(&mut self, frame: Option<GpuFrame>) {
        let before = self.size();
        self.frame = frame;
        let after = self.size();
        if before != after {
            self.cache.retain_size(after);
        }
    }

    fn readback(&self, frame: &GpuFrame) -> RetouchResult<Canvas> {
        let size = frame.size;
        let bytes_per_row_unpadded = size
            .width
            .checked_mul(4)
            .ok_or_else(|| RetouchError::render_execution("readback width overflow"))?;
        let bytes_per_row = align_to(bytes_per_row_unpadded, wgpu::COPY_BYTES_PER_ROW_ALIGNMENT);
        let buffer_size = u64::from(bytes_per_row)
            .checked_mul(u64::from(size.height))
            .ok_or_else(|| RetouchError::render_execution("readback buffer size overflow"))?;

        let readback = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("retouch_readback"),
            size: buffer_size,
            usage: wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("retouch_readback_encoder"),
            });
        encoder.copy_texture_to_buffer(
            wgpu::TexelCopyTextureInfo {
                texture: &frame.texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::TexelCopyBufferInfo {
                buffer: &readback,
                layout: wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(bytes_per_row),
                    rows_per_image: Some(size.height),
                },
            },
            extent(size),
        );
        self.queue.submit(Some(encoder.finish()));

        let buffer_slice = readback.slice(..);
        let (tx, rx) = std::sync::mpsc::channel();
        buffer_slice.map_async(wgpu::MapMode::Read, move |res| {
            let _ = tx.send(res);
        });
        self.device
            .poll(wgpu::PollType::wait_indefinitely())
            .map_err(|e| err_render("wgpu poll failed", e))?;
        rx.recv()
            .map_err(|_| RetouchError::render_execution("readback channel closed"))?
            .map_err(|e| err_render("readback map failed", e))?;

        let mapped = buffer_slice.get_mapped_range();
        let row_bytes = bytes_per_row_unpadded as usize;
        let mut out = Vec::with_capacity(size.byte_len());
        for row in 0..size.height as usize {
            let start = row * bytes_per_row as usize;
            out.extend_from_slice(&mapped[start..start + row_bytes]);
        }
        drop(mapped);
        readback.unmap();

        Canvas::from_raw(size, out)
    }
}

fn create_frame(device: &wgpu::Device, size: Size, label: &str) -> GpuFrame {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some(label),
        size: extent(size),
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Rgba8Unorm,
        usage: wgpu::TextureUsages::TEXTURE_BINDING
            | wgpu::TextureUsages::RENDER_ATTACHMENT
            | wgpu::TextureUsages::COPY_SRC
            | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });
    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    GpuFrame {
        texture,
        view,
        size,
    }
}

fn extent(size: Size) -> wgpu::Extent3d {
    wgpu::Extent3d {
        width: size.width,
        height: size.height,
        depth_or_array_layers: 1,
    }
}

fn align_to(value: u32, alignment: u32) -> u32 {
    let mask = alignment - 1;
    (value + mask) & !mask
}

impl ShaderTarget for GpuRenderer {
    fn target_size(&self) -> Size {
        self.size()
    }

    fn run_shader(&mut self, invocation: ShaderInvocation<'_>) -> RetouchResult<()> {
        let src = self
            .frame
            .clone()
            .ok_or_else(|| RetouchError::render_execution("gpu canvas is empty"))?;
        invocation.output_size.ensure_non_empty("shader output")?;
        let uniforms = invocation.uniforms.padded()?;
        self.ensure_pipeline(&invocation)?;

        let layer = invocation
            .layer
            .filter(|l| l.width() > 0 && l.height() > 0)
            .map(|l| self.upload(l, "retouch_layer"));
        let (layer_frame, layer_flag) = match &layer {
            Some(f) => (f, 1.0),
            None => (&self.empty_layer, 0.0),
        };

        let out_size = invocation.output_size;
        let frame_params: [[f32; 4]; 2] = [
            [
                out_size.width as f32,
                out_size.height as f32,
                src.size.width as f32,
                src.size.height as f32,
            ],
            [
                layer_frame.size.width as f32,
                layer_frame.size.height as f32,
                layer_flag,
                0.0,
            ],
        ];
        self.queue
            .write_buffer(&self.frame_uniforms, 0, bytemuck::cast_slice(&frame_params));
        self.queue
            .write_buffer(&self.primitive_uniforms, 0, bytemuck::cast_slice(&uniforms));

        let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("retouch_primitive_bg"),
            layout: &self.bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&src.view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&layer_frame.view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: self.frame_uniforms.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: self.primitive_uniforms.as_entire_binding(),
                },
            ],
        });

        let target = create_frame(&self.device, out_size, invocation.name);
        let pipeline = self.pipelines.get(invocation.name).ok_or_else(|| {
            RetouchError::render_execution(format!("pipeline '{}' missing", invocation.name))
        })?;

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("retouch_primitive_encoder"),
            });
        {
            let mut rp = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some(invocation.name),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &target.view,
                    resolve_target: None,
                    depth_slice: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::TRANSPARENT),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            rp.set_pipeline(pipeline);
            rp.set_bind_group(0, &bind_group, &[]);
            rp.draw(0..3, 0..1);
        }
        self.queue.submit(Some(encoder.finish()));

        tracing::trace!(shader = invocation.name, size = %out_size, "ran primitive shader");
        // Cache pruning after a size change belongs to `Renderer::run_primitive`.
        self.frame = Some(target);
        Ok(())
    }
}

impl Renderer for GpuRenderer {
    fn kind(&self) -> BackendKind {
        BackendKind::Gpu
    }

    fn size(&self) -> Size {
        self.frame
            .as_ref()
            .map_or(Size::new(0, 0), |frame| frame.size)
    }

    fn set_size(&mut self, size: Size) -> RetouchResult<()> {
        let frame = (!size.is_empty()).then(|| create_frame(&self.device, size, "retouch_canvas"));
        self.replace_frame(frame);
        Ok(())
    }

    fn canvas(&mut self) -> RetouchResult<Canvas> {
        match &self.frame {
            Some(frame) => self.readback(frame),
            None => Ok(Canvas::default()),
        }
    }

    fn set_canvas(&mut self, canvas: Canvas) -> RetouchResult<()> {
        self.draw_image(canvas.image())
    }

    fn draw_image(&mut self, image: &RgbaImage) -> RetouchResult<()> {
        let frame = (image.width() > 0 && image.height() > 0)
            .then(|| self.upload(image, "retouch_canvas"));
        self.replace_frame(frame);
        Ok(())
    }

    fn surface(&mut self) -> RenderSurface<'_> {
        RenderSurface::Gpu(self)
    }

    fn cache(&mut self, key: &str) -> RetouchResult<()> {
        let frame = self
            .frame
            .clone()
            .ok_or_else(|| RetouchError::render_execution("gpu canvas is empty"))?;
        self.cache.insert(key, frame.size, frame);
        Ok(())
    }

    fn draw_cached(&mut self, key: &str) -> RetouchResult<bool> {
        let Some((_, frame)) = self.cache.get(key) else {
            return Ok(false);
        };
        let frame = frame.clone();
        self.replace_frame(Some(frame));
        tracing::trace!(key, "restored cached texture");
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
        self.device
            .poll(wgpu::PollType::wait_indefinitely())
            .map_err(|e| err_render("wgpu poll failed", e))?;
        Ok(())
    }

    fn reset(&mut self) {
        self.cache.clear();
        let size = self.size();
        self.frame = (!size.is_empty()).then(|| create_frame(&self.device, size, "retouch_canvas"));
    }
}

/// Shader override directory under an assets root.
pub fn shader_dir(assets_path: &Path) -> PathBuf {
    assets_path.join("shaders")
}
