//! Renderer contract, the two backends and the pass orchestrator.

use std::path::Path;

use crate::{
    foundation::error::RetouchResult,
    render::backend::{BackendKind, Renderer},
    render::software::SoftwareRenderer,
};

pub mod backend;
#[cfg(feature = "gpu")]
pub mod gpu;
pub mod pipeline;
pub mod software;

/// True when this build can acquire a GPU adapter.
pub fn gpu_supported() -> bool {
    #[cfg(feature = "gpu")]
    {
        gpu::GpuRenderer::is_supported()
    }
    #[cfg(not(feature = "gpu"))]
    {
        false
    }
}

/// Constructs a renderer of `kind`. GPU renderers look for shader overrides under
/// `<assets_path>/shaders`.
pub fn create_renderer(
    kind: BackendKind,
    assets_path: Option<&Path>,
) -> RetouchResult<Box<dyn Renderer>> {
    match kind {
        BackendKind::Software => Ok(Box::new(SoftwareRenderer::new())),
        #[cfg(feature = "gpu")]
        BackendKind::Gpu => Ok(Box::new(gpu::GpuRenderer::new(
            assets_path.map(gpu::shader_dir),
        )?)),
        #[cfg(not(feature = "gpu"))]
        BackendKind::Gpu => {
            let _ = assets_path;
            Err(crate::foundation::error::RetouchError::unsupported_backend(
                "built without the `gpu` feature",
            ))
        }
    }
}
