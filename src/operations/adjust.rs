//! Single-primitive colour operations.

use crate::{
    foundation::error::RetouchResult,
    operations::{Operation, OperationCategory, OptionMap, OptionReader},
    primitives::{Brightness, Contrast, Saturation},
    render::backend::Renderer,
};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct BrightnessOperation {
    brightness: f32,
}

impl BrightnessOperation {
    pub const IDENTIFIER: &'static str = "brightness";

    pub fn brightness(&self) -> f32 {
        self.brightness
    }

    /// `value` in [-1, 1]; 0 is identity.
    pub fn set_brightness(&mut self, value: f32) -> RetouchResult<()> {
        Brightness::new(value)?;
        self.brightness = value;
        Ok(())
    }
}

impl Operation for BrightnessOperation {
    fn identifier(&self) -> &'static str {
        Self::IDENTIFIER
    }

    fn category(&self) -> OperationCategory {
        OperationCategory::Color
    }

    fn is_identity(&self) -> bool {
        self.brightness == 0.0
    }

    fn options(&self) -> OptionMap {
        OptionMap::from([("brightness".to_string(), self.brightness.into())])
    }

    fn set_options(&mut self, options: &OptionMap) -> RetouchResult<()> {
        let reader = OptionReader::new(Self::IDENTIFIER, options, &["brightness"])?;
        let mut next = self.clone();
        if let Some(v) = reader.number("brightness")? {
            next.set_brightness(v)?;
        }
        *self = next;
        Ok(())
    }

    fn render(&self, renderer: &mut dyn Renderer) -> RetouchResult<()> {
        renderer.run_primitive(&Brightness::new(self.brightness)?)
    }

    fn clone_boxed(&self) -> Box<dyn Operation> {
        Box::new(self.clone())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ContrastOperation {
    contrast: f32,
}

impl Default for ContrastOperation {
    fn default() -> Self {
        Self { contrast: 1.0 }
    }
}

impl ContrastOperation {
    pub const IDENTIFIER: &'static str = "contrast";

    pub fn contrast(&self) -> f32 {
        self.contrast
    }

    /// `value` in [0, 2]; 1 is identity.
    pub fn set_contrast(&mut self, value: f32) -> RetouchResult<()> {
        Contrast::new(value)?;
        self.contrast = value;
        Ok(())
    }
}

impl Operation for ContrastOperation {
    fn identifier(&self) -> &'static str {
        Self::IDENTIFIER
    }

    fn category(&self) -> OperationCategory {
        OperationCategory::Color
    }

    fn is_identity(&self) -> bool {
        self.contrast == 1.0
    }

    fn options(&self) -> OptionMap {
        OptionMap::from([("contrast".to_string(), self.contrast.into())])
    }

    fn set_options(&mut self, options: &OptionMap) -> RetouchResult<()> {
        let reader = OptionReader::new(Self::IDENTIFIER, options, &["contrast"])?;
        let mut next = self.clone();
        if let Some(v) = reader.number("contrast")? {
            next.set_contrast(v)?;
        }
        *self = next;
        Ok(())
    }

    fn render(&self, renderer: &mut dyn Renderer) -> RetouchResult<()> {
        renderer.run_primitive(&Contrast::new(self.contrast)?)
    }

    fn clone_boxed(&self) -> Box<dyn Operation> {
        Box::new(self.clone())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SaturationOperation {
    saturation: f32,
}

impl Default for SaturationOperation {
    fn default() -> Self {
        Self { saturation: 1.0 }
    }
}

impl SaturationOperation {
    pub const IDENTIFIER: &'static str = "saturation";

    pub fn saturation(&self) -> f32 {
        self.saturation
    }

    /// `value` in [0, 2]; 1 is identity.
    pub fn set_saturation(&mut self, value: f32) -> RetouchResult<()> {
        Saturation::new(value)?;
        self.saturation = value;
        Ok(())
    }
}

impl Operation for SaturationOperation {
    fn identifier(&self) -> &'static str {
        Self::IDENTIFIER
    }

    fn category(&self) -> OperationCategory {
        OperationCategory::Color
    }

    fn is_identity(&self) -> bool {
        self.saturation == 1.0
    }

    fn options(&self) -> OptionMap {
        OptionMap::from([("saturation".to_string(), self.saturation.into())])
    }

    fn set_options(&mut self, options: &OptionMap) -> RetouchResult<()> {
        let reader = OptionReader::new(Self::IDENTIFIER, options, &["saturation"])?;
        let mut next = self.clone();
        if let Some(v) = reader.number("saturation")? {
            next.set_saturation(v)?;
        }
        *self = next;
        Ok(())
    }

    fn render(&self, renderer: &mut dyn Renderer) -> RetouchResult<()> {
        renderer.run_primitive(&Saturation::new(self.saturation)?)
    }

    fn clone_boxed(&self) -> Box<dyn Operation> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/operations/adjust.rs"]
mod tests;
