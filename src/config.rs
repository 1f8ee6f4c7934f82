//! Editor configuration, loadable from JSON.

use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::foundation::error::RetouchResult;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RendererPreference {
    /// Use the GPU when an adapter is available, otherwise fall back to software.
    #[default]
    GpuPreferred,
    SoftwareOnly,
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EditorConfig {
    pub renderer: RendererPreference,
    /// Root for runtime assets; GPU shader overrides live in `<assets_path>/shaders`.
    pub assets_path: Option<PathBuf>,
    /// Hint for interactive front-ends; the editor itself never renders on its own.
    pub render_on_resize: bool,
    /// Snapshot the canvas after every operation and reuse unchanged prefixes.
    pub cache_intermediate: bool,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            renderer: RendererPreference::GpuPreferred,
            assets_path: None,
            render_on_resize: true,
            cache_intermediate: true,
        }
    }
}

impl EditorConfig {
    pub fn software_only() -> Self {
        Self {
            renderer: RendererPreference::SoftwareOnly,
            ..Self::default()
        }
    }

    pub fn from_json_str(s: &str) -> RetouchResult<Self> {
        let config = serde_json::from_str(s).context("parse editor config JSON")?;
        Ok(config)
    }

    pub fn from_json_file(path: &Path) -> RetouchResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read editor config '{}'", path.display()))?;
        Self::from_json_str(&text)
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
