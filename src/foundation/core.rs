use std::str::FromStr;

use crate::foundation::error::{RetouchError, RetouchResult};

pub use kurbo::{Affine, Point, Vec2};

/// Canvas dimensions in pixels. Origin is the top-left corner.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    /// Largest side accepted for a render target.
    pub const MAX_SIDE: u32 = 16_384;

    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn pixel_count(self) -> usize {
        self.width as usize * self.height as usize
    }

    pub fn byte_len(self) -> usize {
        self.pixel_count() * 4
    }

    pub fn to_vec2(self) -> Vec2 {
        Vec2::new(f64::from(self.width), f64::from(self.height))
    }

    pub fn min_side(self) -> u32 {
        self.width.min(self.height)
    }

    /// Swaps width and height (quarter-turn rotations).
    pub fn transposed(self) -> Self {
        Self::new(self.height, self.width)
    }

    pub fn ensure_non_empty(self, what: &str) -> RetouchResult<Self> {
        if self.is_empty() {
            return Err(RetouchError::validation(format!(
                "{what} must be non-empty, got {}x{}",
                self.width, self.height
            )));
        }
        Ok(self)
    }

    /// Like [`Size::ensure_non_empty`], and also bounds each side by [`Size::MAX_SIDE`].
    pub fn ensure_renderable(self, what: &str) -> RetouchResult<Self> {
        self.ensure_non_empty(what)?;
        if self.width > Self::MAX_SIDE || self.height > Self::MAX_SIDE {
            return Err(RetouchError::validation(format!(
                "{what} {}x{} exceeds the maximum side of {}",
                self.width,
                self.height,
                Self::MAX_SIDE
            )));
        }
        Ok(self)
    }
}

impl std::fmt::Display for Size {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Requested output dimensions. A missing side follows the aspect ratio of the rendered canvas.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Dimensions {
    pub width: Option<u32>,
    pub height: Option<u32>,
}

impl Dimensions {
    pub fn exact(size: Size) -> Self {
        Self {
            width: Some(size.width),
            height: Some(size.height),
        }
    }

    pub fn resolve(self, current: Size) -> RetouchResult<Size> {
        current.ensure_non_empty("canvas")?;
        let aspect = f64::from(current.width) / f64::from(current.height);
        let size = match (self.width, self.height) {
            (Some(w), Some(h)) => Size::new(w, h),
            (Some(w), None) => Size::new(w, (f64::from(w) / aspect).round().max(1.0) as u32),
            (None, Some(h)) => Size::new((f64::from(h) * aspect).round().max(1.0) as u32, h),
            (None, None) => current,
        };
        size.ensure_renderable("output dimensions")
    }
}

impl FromStr for Dimensions {
    type Err = RetouchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || {
            RetouchError::validation(format!(
                "dimensions must look like 'WxH', 'Wx' or 'xH', got '{s}'"
            ))
        };
        let (w, h) = s.trim().split_once(['x', 'X']).ok_or_else(invalid)?;
        let side = |v: &str| -> RetouchResult<Option<u32>> {
            let v = v.trim();
            if v.is_empty() {
                return Ok(None);
            }
            match v.parse::<u32>() {
                Ok(0) | Err(_) => Err(invalid()),
                Ok(n) => Ok(Some(n)),
            }
        };
        let dims = Self {
            width: side(w)?,
            height: side(h)?,
        };
        if dims.width.is_none() && dims.height.is_none() {
            return Err(invalid());
        }
        Ok(dims)
    }
}

/// Straight-alpha colour with unit-range channels.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0, 1.0);
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0, 1.0);
    pub const TRANSPARENT: Self = Self::new(0.0, 0.0, 0.0, 0.0);

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub fn from_rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        let c = |v: u8| f32::from(v) / 255.0;
        Self::new(c(r), c(g), c(b), c(a))
    }

    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }

    pub fn from_slice(values: &[f64]) -> RetouchResult<Self> {
        let c = match values {
            [r, g, b] => Self::new(*r as f32, *g as f32, *b as f32, 1.0),
            [r, g, b, a] => Self::new(*r as f32, *g as f32, *b as f32, *a as f32),
            _ => {
                return Err(RetouchError::validation(
                    "colour must have 3 or 4 components",
                ));
            }
        };
        c.validate()
    }

    pub fn validate(self) -> RetouchResult<Self> {
        let ok = self
            .to_array()
            .iter()
            .all(|c| c.is_finite() && (0.0..=1.0).contains(c));
        if !ok {
            return Err(RetouchError::validation(
                "colour channels must be finite and within [0, 1]",
            ));
        }
        Ok(self)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
