//! Retouch is an operation-stack image editor.
//!
//! A source image runs through an ordered [`OperationStack`] (crop, rotation, filters,
//! colour adjustments, blurs, frames, stickers, text) and comes out as pixels or as an
//! encoded PNG/JPEG buffer.
//!
//! # Rendering model
//!
//! Operations are built from [`primitives`]: atomic numeric transforms that each carry a
//! WGSL fragment body and an equivalent software pixel loop. A [`Renderer`] executes them:
//!
//! - [`SoftwareRenderer`] loops over an in-memory RGBA8 canvas and is always available.
//! - `GpuRenderer` (cargo feature `gpu`) runs each primitive as a `wgpu` render pass.
//!
//! [`Editor`] orchestrates a pass: it picks the GPU when configured and available (falling
//! back to software otherwise), reuses cached intermediate steps, and extracts the output.
//!
//! # Conventions
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Straight alpha** RGBA8 on both backends.
//! - Both backends agree within one 8-bit step per channel.
#![forbid(unsafe_code)]

mod foundation;

/// Editor configuration.
pub mod config;
/// Named filter recipes.
pub mod filters;
/// Editing operations and the operation stack.
pub mod operations;
/// Atomic image transforms shared by both backends.
pub mod primitives;
/// Renderer contract, backends and pass orchestration.
pub mod render;

pub use config::{EditorConfig, RendererPreference};
pub use filters::{FilterKind, parse_filter};
pub use foundation::core::{Affine, Dimensions, Point, Rgba, Size, Vec2};
pub use foundation::error::{RetouchError, RetouchResult};
pub use foundation::math::{mix, pixel_center_unit, smoothstep, unit_to_unorm8, unorm8_to_unit};
pub use operations::{
    BrightnessOperation, ContrastOperation, CropOperation, FiltersOperation, FlipOperation,
    FramesOperation, Operation, OperationCategory, OperationStack, OptionMap, OptionValue,
    RadialBlurOperation, RotationOperation, SaturationOperation, StackEntry, StackFile,
    StickersOperation, TextOperation, TiltShiftOperation, create_operation,
};
pub use primitives::{Primitive, ShaderInvocation, ShaderTarget, Uniforms};
#[cfg(feature = "gpu")]
pub use render::gpu::GpuRenderer;
pub use render::backend::{BackendKind, Canvas, RenderSurface, Renderer, SnapshotCache};
pub use render::pipeline::{
    Editor, OutputFormat, RenderOutput, RenderRequest, RenderState, RenderTask, RenderType,
};
pub use render::software::SoftwareRenderer;
pub use render::{create_renderer, gpu_supported};
