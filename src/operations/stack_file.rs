//! JSON description of an edit stack, as read by the CLI.
//!
//! ```json
//! {
//!   "operations": [
//!     { "identifier": "rotation", "options": { "degrees": 90 } },
//!     { "identifier": "stickers", "options": { "position": [0.1, 0.1] }, "asset": "star.png" }
//!   ]
//! }
//! ```

use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::{
    foundation::error::{RetouchError, RetouchResult},
    operations::{
        OperationStack, OptionMap, StickersOperation, TextOperation, create_operation,
        downcast_mut,
    },
};

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StackFile {
    pub operations: Vec<StackEntry>,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StackEntry {
    pub identifier: String,
    #[serde(default)]
    pub options: OptionMap,
    /// Sticker image or text font, relative to the assets root.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset: Option<PathBuf>,
}

impl StackFile {
    pub fn from_json_str(s: &str) -> RetouchResult<Self> {
        let file = serde_json::from_str(s).context("parse stack JSON")?;
        Ok(file)
    }

    pub fn from_json_file(path: &Path) -> RetouchResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read stack file '{}'", path.display()))?;
        Self::from_json_str(&text)
    }

    /// Options of every operation in `stack`. Raster assets are not captured.
    pub fn snapshot(stack: &OperationStack) -> Self {
        Self {
            operations: stack
                .iter()
                .map(|op| StackEntry {
                    identifier: op.identifier().to_string(),
                    options: op.options(),
                    asset: None,
                })
                .collect(),
        }
    }

    /// Builds a stack, loading assets relative to `assets_root`.
    ///
    /// Entries are inserted in file order; category grouping still applies and a repeated
    /// identifier replaces the earlier entry.
    pub fn build(&self, assets_root: &Path) -> RetouchResult<OperationStack> {
        let mut stack = OperationStack::new();
        for entry in &self.operations {
            let mut op = create_operation(&entry.identifier)?;
            op.set_options(&entry.options)?;
            if let Some(asset) = &entry.asset {
                let path = assets_root.join(asset);
                if let Some(stickers) = downcast_mut::<StickersOperation>(op.as_mut()) {
                    let img = image::open(&path)
                        .with_context(|| format!("open sticker '{}'", path.display()))?;
                    stickers.set_sticker(img.to_rgba8());
                } else if let Some(text) = downcast_mut::<TextOperation>(op.as_mut()) {
                    let bytes = std::fs::read(&path)
                        .with_context(|| format!("read font '{}'", path.display()))?;
                    text.set_font(bytes);
                } else {
                    return Err(RetouchError::validation(format!(
                        "operation '{}' does not take an asset",
                        entry.identifier
                    )));
                }
            }
            stack.insert(op, None);
        }
        Ok(stack)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/operations/stack_file.rs"]
mod tests;
