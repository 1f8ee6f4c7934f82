use crate::{
    foundation::error::RetouchResult,
    operations::{Operation, OperationCategory, OptionMap, OptionReader},
    primitives::Resample,
    render::backend::Renderer,
};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct FlipOperation {
    horizontal: bool,
    vertical: bool,
}

impl FlipOperation {
    pub const IDENTIFIER: &'static str = "flip";

    pub fn horizontal(&self) -> bool {
        self.horizontal
    }

    pub fn vertical(&self) -> bool {
        self.vertical
    }

    pub fn set_horizontal(&mut self, on: bool) {
        self.horizontal = on;
    }

    pub fn set_vertical(&mut self, on: bool) {
        self.vertical = on;
    }
}

impl Operation for FlipOperation {
    fn identifier(&self) -> &'static str {
        Self::IDENTIFIER
    }

    fn category(&self) -> OperationCategory {
        OperationCategory::Geometric
    }

    fn is_identity(&self) -> bool {
        !self.horizontal && !self.vertical
    }

    fn options(&self) -> OptionMap {
        OptionMap::from([
            ("horizontal".to_string(), self.horizontal.into()),
            ("vertical".to_string(), self.vertical.into()),
        ])
    }

    fn set_options(&mut self, options: &OptionMap) -> RetouchResult<()> {
        let reader = OptionReader::new(Self::IDENTIFIER, options, &["horizontal", "vertical"])?;
        let horizontal = reader.bool("horizontal")?.unwrap_or(self.horizontal);
        let vertical = reader.bool("vertical")?.unwrap_or(self.vertical);
        self.horizontal = horizontal;
        self.vertical = vertical;
        Ok(())
    }

    fn render(&self, renderer: &mut dyn Renderer) -> RetouchResult<()> {
        let resample = Resample::flip(renderer.size(), self.horizontal, self.vertical)?;
        renderer.run_primitive(&resample)
    }

    fn clone_boxed(&self) -> Box<dyn Operation> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/operations/flip.rs"]
mod tests;
