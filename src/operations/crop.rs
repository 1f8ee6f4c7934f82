use crate::{
    foundation::core::Size,
    foundation::error::{RetouchError, RetouchResult},
    operations::{Operation, OperationCategory, OptionMap, OptionReader},
    primitives::Resample,
    render::backend::Renderer,
};

/// Keeps the region between two normalized corners.
#[derive(Clone, Debug, PartialEq)]
pub struct CropOperation {
    start: [f32; 2],
    end: [f32; 2],
}

impl Default for CropOperation {
    fn default() -> Self {
        Self {
            start: [0.0, 0.0],
            end: [1.0, 1.0],
        }
    }
}

impl CropOperation {
    pub const IDENTIFIER: &'static str = "crop";

    pub fn start(&self) -> [f32; 2] {
        self.start
    }

    pub fn end(&self) -> [f32; 2] {
        self.end
    }

    /// Both corners in [0, 1], `start` strictly above and left of `end`.
    pub fn set_region(&mut self, start: [f32; 2], end: [f32; 2]) -> RetouchResult<()> {
        let in_unit = |p: [f32; 2]| p.iter().all(|c| (0.0..=1.0).contains(c));
        if !in_unit(start) || !in_unit(end) {
            return Err(RetouchError::validation(
                "crop corners must lie within [0, 1]",
            ));
        }
        if start[0] >= end[0] || start[1] >= end[1] {
            return Err(RetouchError::validation(
                "crop start must be above and left of crop end",
            ));
        }
        self.start = start;
        self.end = end;
        Ok(())
    }

    /// Pixel rectangle `(x, y, size)` for a canvas of `canvas` size. Never empty.
    pub fn pixel_region(&self, canvas: Size) -> (u32, u32, Size) {
        let edge = |v: f32, extent: u32| ((v * extent as f32).round() as u32).min(extent);
        let x0 = edge(self.start[0], canvas.width).min(canvas.width.saturating_sub(1));
        let y0 = edge(self.start[1], canvas.height).min(canvas.height.saturating_sub(1));
        let x1 = edge(self.end[0], canvas.width).max(x0 + 1);
        let y1 = edge(self.end[1], canvas.height).max(y0 + 1);
        (x0, y0, Size::new(x1 - x0, y1 - y0))
    }
}

impl Operation for CropOperation {
    fn identifier(&self) -> &'static str {
        Self::IDENTIFIER
    }

    fn category(&self) -> OperationCategory {
        OperationCategory::Geometric
    }

    fn is_identity(&self) -> bool {
        self.start == [0.0, 0.0] && self.end == [1.0, 1.0]
    }

    fn options(&self) -> OptionMap {
        OptionMap::from([
            ("start".to_string(), self.start.into()),
            ("end".to_string(), self.end.into()),
        ])
    }

    fn set_options(&mut self, options: &OptionMap) -> RetouchResult<()> {
        let reader = OptionReader::new(Self::IDENTIFIER, options, &["start", "end"])?;
        let start = reader.point("start")?.unwrap_or(self.start);
        let end = reader.point("end")?.unwrap_or(self.end);
        let mut next = self.clone();
        next.set_region(start, end)?;
        *self = next;
        Ok(())
    }

    fn render(&self, renderer: &mut dyn Renderer) -> RetouchResult<()> {
        let (x, y, size) = self.pixel_region(renderer.size());
        renderer.run_primitive(&Resample::crop(x, y, size)?)
    }

    fn clone_boxed(&self) -> Box<dyn Operation> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/operations/crop.rs"]
mod tests;
