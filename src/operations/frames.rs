use crate::{
    foundation::core::Rgba,
    foundation::error::RetouchResult,
    operations::{Operation, OperationCategory, OptionMap, OptionReader},
    primitives::FrameBorder,
    render::backend::Renderer,
};

/// Solid border around the picture.
#[derive(Clone, Debug, PartialEq)]
pub struct FramesOperation {
    thickness: f32,
    color: Rgba,
}

impl Default for FramesOperation {
    fn default() -> Self {
        Self {
            thickness: 0.1,
            color: Rgba::BLACK,
        }
    }
}

impl FramesOperation {
    pub const IDENTIFIER: &'static str = "frames";

    pub fn thickness(&self) -> f32 {
        self.thickness
    }

    pub fn color(&self) -> Rgba {
        self.color
    }

    /// `thickness` is a fraction of the shorter side in [0, 0.5].
    pub fn set_frame(&mut self, thickness: f32, color: Rgba) -> RetouchResult<()> {
        FrameBorder::new(thickness, color)?;
        self.thickness = thickness;
        self.color = color;
        Ok(())
    }
}

impl Operation for FramesOperation {
    fn identifier(&self) -> &'static str {
        Self::IDENTIFIER
    }

    fn category(&self) -> OperationCategory {
        OperationCategory::PostProcessing
    }

    fn is_identity(&self) -> bool {
        self.thickness == 0.0 || self.color.a == 0.0
    }

    fn options(&self) -> OptionMap {
        OptionMap::from([
            ("thickness".to_string(), self.thickness.into()),
            ("color".to_string(), self.color.into()),
        ])
    }

    fn set_options(&mut self, options: &OptionMap) -> RetouchResult<()> {
        let reader = OptionReader::new(Self::IDENTIFIER, options, &["thickness", "color"])?;
        self.set_frame(
            reader.number("thickness")?.unwrap_or(self.thickness),
            reader.color("color")?.unwrap_or(self.color),
        )
    }

    fn render(&self, renderer: &mut dyn Renderer) -> RetouchResult<()> {
        renderer.run_primitive(&FrameBorder::new(self.thickness, self.color)?)
    }

    fn clone_boxed(&self) -> Box<dyn Operation> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/operations/frames.rs"]
mod tests;
