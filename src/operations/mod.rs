//! Editing operations and the ordered stack that holds them.
//!
//! Operations never touch pixels directly; they build primitives and hand them to
//! [`Renderer::run_primitive`](crate::render::backend::Renderer::run_primitive).

use std::{any::Any, fmt};

use crate::{
    foundation::error::{RetouchError, RetouchResult},
    render::backend::Renderer,
};

pub mod adjust;
pub mod blur;
pub mod crop;
pub mod filters;
pub mod flip;
pub mod frames;
pub mod options;
pub mod rotation;
pub mod stack;
pub mod stack_file;
pub mod stickers;
pub mod text;

pub use adjust::{BrightnessOperation, ContrastOperation, SaturationOperation};
pub use blur::{RadialBlurOperation, TiltShiftOperation};
pub use crop::CropOperation;
pub use filters::FiltersOperation;
pub use flip::FlipOperation;
pub use frames::FramesOperation;
pub use options::{OptionMap, OptionReader, OptionValue};
pub use rotation::RotationOperation;
pub use stack::OperationStack;
pub use stack_file::{StackEntry, StackFile};
pub use stickers::StickersOperation;
pub use text::TextOperation;

/// Stack ordering class. Variants are declared in render order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum OperationCategory {
    Geometric,
    Color,
    PostProcessing,
}

pub trait Operation: Any + fmt::Debug + Send {
    /// Unique tag within a stack.
    fn identifier(&self) -> &'static str;

    fn category(&self) -> OperationCategory;

    /// True when the current options produce no visible change.
    fn is_identity(&self) -> bool;

    fn options(&self) -> OptionMap;

    /// Validates every entry before applying any; on error the operation is unchanged.
    fn set_options(&mut self, options: &OptionMap) -> RetouchResult<()>;

    fn render(&self, renderer: &mut dyn Renderer) -> RetouchResult<()>;

    fn clone_boxed(&self) -> Box<dyn Operation>;

    /// Hash of inputs that are not part of [`Operation::options`], such as raster assets.
    fn content_fingerprint(&self) -> u64 {
        0
    }
}

impl Clone for Box<dyn Operation> {
    fn clone(&self) -> Self {
        self.clone_boxed()
    }
}

/// Operation identifiers in preferred render order.
pub const OPERATION_IDENTIFIERS: [&str; 12] = [
    RotationOperation::IDENTIFIER,
    CropOperation::IDENTIFIER,
    FlipOperation::IDENTIFIER,
    FiltersOperation::IDENTIFIER,
    ContrastOperation::IDENTIFIER,
    BrightnessOperation::IDENTIFIER,
    SaturationOperation::IDENTIFIER,
    RadialBlurOperation::IDENTIFIER,
    TiltShiftOperation::IDENTIFIER,
    FramesOperation::IDENTIFIER,
    StickersOperation::IDENTIFIER,
    TextOperation::IDENTIFIER,
];

/// Default-configured operation for `identifier`.
pub fn create_operation(identifier: &str) -> RetouchResult<Box<dyn Operation>> {
    let op: Box<dyn Operation> = match identifier {
        RotationOperation::IDENTIFIER => Box::new(RotationOperation::default()),
        CropOperation::IDENTIFIER => Box::new(CropOperation::default()),
        FlipOperation::IDENTIFIER => Box::new(FlipOperation::default()),
        FiltersOperation::IDENTIFIER => Box::new(FiltersOperation::default()),
        ContrastOperation::IDENTIFIER => Box::new(ContrastOperation::default()),
        BrightnessOperation::IDENTIFIER => Box::new(BrightnessOperation::default()),
        SaturationOperation::IDENTIFIER => Box::new(SaturationOperation::default()),
        RadialBlurOperation::IDENTIFIER => Box::new(RadialBlurOperation::default()),
        TiltShiftOperation::IDENTIFIER => Box::new(TiltShiftOperation::default()),
        FramesOperation::IDENTIFIER => Box::new(FramesOperation::default()),
        StickersOperation::IDENTIFIER => Box::new(StickersOperation::default()),
        TextOperation::IDENTIFIER => Box::new(TextOperation::default()),
        other => {
            return Err(RetouchError::unknown_identifier(format!(
                "operation '{other}'"
            )));
        }
    };
    Ok(op)
}

/// Downcasts a stack entry to its concrete type.
pub fn downcast_mut<'a, T: Operation>(
    op: &'a mut (dyn Operation + 'static),
) -> Option<&'a mut T> {
    let any: &'a mut (dyn Any + 'static) = op;
    any.downcast_mut::<T>()
}

pub fn downcast_ref<'a, T: Operation>(op: &'a (dyn Operation + 'static)) -> Option<&'a T> {
    let any: &'a (dyn Any + 'static) = op;
    any.downcast_ref::<T>()
}

#[cfg(test)]
#[path = "../../tests/unit/operations/mod.rs"]
mod tests;
