use crate::{
    foundation::error::{RetouchError, RetouchResult},
    operations::{Operation, OperationCategory, OptionMap, OptionReader},
    primitives::Resample,
    render::backend::Renderer,
};

/// Clockwise rotation in quarter turns.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RotationOperation {
    degrees: u32,
}

impl RotationOperation {
    pub const IDENTIFIER: &'static str = "rotation";

    /// Normalized to 0, 90, 180 or 270.
    pub fn degrees(&self) -> u32 {
        self.degrees
    }

    /// Accepts any multiple of 90, including negative values.
    pub fn set_degrees(&mut self, degrees: i64) -> RetouchResult<()> {
        if degrees % 90 != 0 {
            return Err(RetouchError::validation(format!(
                "rotation must be a multiple of 90 degrees, got {degrees}"
            )));
        }
        self.degrees = degrees.rem_euclid(360) as u32;
        Ok(())
    }
}

impl Operation for RotationOperation {
    fn identifier(&self) -> &'static str {
        Self::IDENTIFIER
    }

    fn category(&self) -> OperationCategory {
        OperationCategory::Geometric
    }

    fn is_identity(&self) -> bool {
        self.degrees == 0
    }

    fn options(&self) -> OptionMap {
        OptionMap::from([("degrees".to_string(), f64::from(self.degrees).into())])
    }

    fn set_options(&mut self, options: &OptionMap) -> RetouchResult<()> {
        let reader = OptionReader::new(Self::IDENTIFIER, options, &["degrees"])?;
        let mut next = self.clone();
        if let Some(v) = reader.number("degrees")? {
            if v.fract() != 0.0 {
                return Err(RetouchError::validation(format!(
                    "rotation must be a whole number of degrees, got {v}"
                )));
            }
            next.set_degrees(v as i64)?;
        }
        *self = next;
        Ok(())
    }

    fn render(&self, renderer: &mut dyn Renderer) -> RetouchResult<()> {
        let resample = Resample::rotate(renderer.size(), self.degrees / 90)?;
        renderer.run_primitive(&resample)
    }

    fn clone_boxed(&self) -> Box<dyn Operation> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/operations/rotation.rs"]
mod tests;
