//! Focus-style blurs: two masked Gaussian passes each.

use crate::{
    foundation::error::RetouchResult,
    operations::{Operation, OperationCategory, OptionMap, OptionReader},
    primitives::{BlurDirection, BlurMask, MaskedBlur},
    render::backend::Renderer,
};

const DEFAULT_BLUR_RADIUS: f32 = 10.0;
const DEFAULT_GRADIENT: f32 = 0.25;

fn render_masked(renderer: &mut dyn Renderer, radius: f32, mask: BlurMask) -> RetouchResult<()> {
    for direction in [BlurDirection::Horizontal, BlurDirection::Vertical] {
        renderer.run_primitive(&MaskedBlur::new(direction, radius, mask)?)?;
    }
    Ok(())
}

/// Sharp around a focus point, blurred with distance.
#[derive(Clone, Debug, PartialEq)]
pub struct RadialBlurOperation {
    position: [f32; 2],
    gradient_radius: f32,
    blur_radius: f32,
}

impl Default for RadialBlurOperation {
    fn default() -> Self {
        Self {
            position: [0.5, 0.5],
            gradient_radius: DEFAULT_GRADIENT,
            blur_radius: DEFAULT_BLUR_RADIUS,
        }
    }
}

impl RadialBlurOperation {
    pub const IDENTIFIER: &'static str = "radial-blur";

    fn mask(&self) -> BlurMask {
        BlurMask::Radial {
            center: self.position,
            gradient: self.gradient_radius,
        }
    }

    pub fn position(&self) -> [f32; 2] {
        self.position
    }

    pub fn blur_radius(&self) -> f32 {
        self.blur_radius
    }

    /// Normalized focus point, the ramp length as a fraction of the shorter side, and the
    /// maximum blur radius in pixels.
    pub fn configure(
        &mut self,
        position: [f32; 2],
        gradient_radius: f32,
        blur_radius: f32,
    ) -> RetouchResult<()> {
        let next = Self {
            position,
            gradient_radius,
            blur_radius,
        };
        MaskedBlur::new(BlurDirection::Horizontal, blur_radius, next.mask())?;
        *self = next;
        Ok(())
    }
}

impl Operation for RadialBlurOperation {
    fn identifier(&self) -> &'static str {
        Self::IDENTIFIER
    }

    fn category(&self) -> OperationCategory {
        OperationCategory::PostProcessing
    }

    fn is_identity(&self) -> bool {
        self.blur_radius < 0.5
    }

    fn options(&self) -> OptionMap {
        OptionMap::from([
            ("position".to_string(), self.position.into()),
            ("gradient_radius".to_string(), self.gradient_radius.into()),
            ("blur_radius".to_string(), self.blur_radius.into()),
        ])
    }

    fn set_options(&mut self, options: &OptionMap) -> RetouchResult<()> {
        let reader = OptionReader::new(
            Self::IDENTIFIER,
            options,
            &["position", "gradient_radius", "blur_radius"],
        )?;
        self.configure(
            reader.point("position")?.unwrap_or(self.position),
            reader
                .number("gradient_radius")?
                .unwrap_or(self.gradient_radius),
            reader.number("blur_radius")?.unwrap_or(self.blur_radius),
        )
    }

    fn render(&self, renderer: &mut dyn Renderer) -> RetouchResult<()> {
        render_masked(renderer, self.blur_radius, self.mask())
    }

    fn clone_boxed(&self) -> Box<dyn Operation> {
        Box::new(self.clone())
    }
}

/// Sharp along a line, blurred with distance from it.
#[derive(Clone, Debug, PartialEq)]
pub struct TiltShiftOperation {
    start: [f32; 2],
    end: [f32; 2],
    gradient_radius: f32,
    blur_radius: f32,
}

impl Default for TiltShiftOperation {
    fn default() -> Self {
        Self {
            start: [0.0, 0.5],
            end: [1.0, 0.5],
            gradient_radius: DEFAULT_GRADIENT,
            blur_radius: DEFAULT_BLUR_RADIUS,
        }
    }
}

impl TiltShiftOperation {
    pub const IDENTIFIER: &'static str = "tilt-shift";

    fn mask(&self) -> BlurMask {
        BlurMask::Linear {
            start: self.start,
            end: self.end,
            gradient: self.gradient_radius,
        }
    }

    pub fn blur_radius(&self) -> f32 {
        self.blur_radius
    }

    pub fn configure(
        &mut self,
        start: [f32; 2],
        end: [f32; 2],
        gradient_radius: f32,
        blur_radius: f32,
    ) -> RetouchResult<()> {
        let next = Self {
            start,
            end,
            gradient_radius,
            blur_radius,
        };
        MaskedBlur::new(BlurDirection::Horizontal, blur_radius, next.mask())?;
        *self = next;
        Ok(())
    }
}

impl Operation for TiltShiftOperation {
    fn identifier(&self) -> &'static str {
        Self::IDENTIFIER
    }

    fn category(&self) -> OperationCategory {
        OperationCategory::PostProcessing
    }

    fn is_identity(&self) -> bool {
        self.blur_radius < 0.5
    }

    fn options(&self) -> OptionMap {
        OptionMap::from([
            ("start".to_string(), self.start.into()),
            ("end".to_string(), self.end.into()),
            ("gradient_radius".to_string(), self.gradient_radius.into()),
            ("blur_radius".to_string(), self.blur_radius.into()),
        ])
    }

    fn set_options(&mut self, options: &OptionMap) -> RetouchResult<()> {
        let reader = OptionReader::new(
            Self::IDENTIFIER,
            options,
            &["start", "end", "gradient_radius", "blur_radius"],
        )?;
        self.configure(
            reader.point("start")?.unwrap_or(self.start),
            reader.point("end")?.unwrap_or(self.end),
            reader
                .number("gradient_radius")?
                .unwrap_or(self.gradient_radius),
            reader.number("blur_radius")?.unwrap_or(self.blur_radius),
        )
    }

    fn render(&self, renderer: &mut dyn Renderer) -> RetouchResult<()> {
        render_masked(renderer, self.blur_radius, self.mask())
    }

    fn clone_boxed(&self) -> Box<dyn Operation> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/operations/blur.rs"]
mod tests;
