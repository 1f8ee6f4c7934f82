//! Named filter recipes built from primitives.

use crate::{
    foundation::error::{RetouchError, RetouchResult},
    primitives::{
        Brightness, Contrast, Desaturation, Glow, Primitive, Saturation, SoftColorOverlay,
        ToneCurve,
    },
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FilterKind {
    Identity,
    Bw,
    BwHard,
    Breeze,
    Food,
    Morning,
    K1,
    K2,
    A15,
    Lenin,
    Glam,
    Semired,
}

impl FilterKind {
    pub const ALL: [FilterKind; 12] = [
        Self::Identity,
        Self::Bw,
        Self::BwHard,
        Self::Breeze,
        Self::Food,
        Self::Morning,
        Self::K1,
        Self::K2,
        Self::A15,
        Self::Lenin,
        Self::Glam,
        Self::Semired,
    ];

    pub fn identifier(self) -> &'static str {
        match self {
            Self::Identity => "identity",
            Self::Bw => "bw",
            Self::BwHard => "bwhard",
            Self::Breeze => "breeze",
            Self::Food => "food",
            Self::Morning => "morning",
            Self::K1 => "k1",
            Self::K2 => "k2",
            Self::A15 => "a15",
            Self::Lenin => "lenin",
            Self::Glam => "glam",
            Self::Semired => "semired",
        }
    }

    /// Human-readable label.
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Identity => "Original",
            Self::Bw => "B&W",
            Self::BwHard => "1920",
            Self::Breeze => "Breeze",
            Self::Food => "Food",
            Self::Morning => "Morning",
            Self::K1 => "K1",
            Self::K2 => "K2",
            Self::A15 => "15",
            Self::Lenin => "Lenin",
            Self::Glam => "Glam",
            Self::Semired => "Semi Red",
        }
    }

    /// Fresh primitive chain for this recipe, in application order.
    pub fn primitives(self) -> RetouchResult<Vec<Box<dyn Primitive>>> {
        let chain: Vec<Box<dyn Primitive>> = match self {
            Self::Identity => Vec::new(),
            Self::Bw => vec![Box::new(Desaturation::new(1.0)?)],
            Self::BwHard => vec![
                Box::new(Desaturation::new(1.0)?),
                Box::new(Contrast::new(1.5)?),
            ],
            Self::Breeze => vec![
                Box::new(Desaturation::new(0.5)?),
                Box::new(ToneCurve::per_channel(
                    &[
                        (0.0, 0.0),
                        (170.0, 170.0),
                        (212.0, 219.0),
                        (234.0, 242.0),
                        (255.0, 255.0),
                    ],
                    &[(0.0, 0.0), (170.0, 168.0), (234.0, 231.0), (255.0, 255.0)],
                    &[(0.0, 0.0), (170.0, 170.0), (212.0, 208.0), (255.0, 255.0)],
                )?),
            ],
            Self::Food => vec![
                Box::new(Saturation::new(1.35)?),
                Box::new(Contrast::new(1.1)?),
            ],
            Self::Morning => vec![
                Box::new(ToneCurve::per_channel(
                    &[(0.0, 40.0), (255.0, 230.0)],
                    &[(0.0, 10.0), (255.0, 225.0)],
                    &[(0.0, 20.0), (255.0, 181.0)],
                )?),
                Box::new(Glow::default()),
            ],
            Self::K1 => vec![
                Box::new(ToneCurve::uniform(&[
                    (0.0, 0.0),
                    (53.0, 32.0),
                    (91.0, 80.0),
                    (176.0, 205.0),
                    (255.0, 255.0),
                ])?),
                Box::new(Saturation::new(0.9)?),
            ],
            Self::K2 => vec![
                Box::new(ToneCurve::uniform(&[
                    (0.0, 0.0),
                    (54.0, 33.0),
                    (77.0, 82.0),
                    (94.0, 103.0),
                    (122.0, 126.0),
                    (177.0, 193.0),
                    (229.0, 232.0),
                    (255.0, 255.0),
                ])?),
                Box::new(SoftColorOverlay::new([40.0, 40.0, 40.0])?),
            ],
            Self::A15 => vec![
                Box::new(Contrast::new(0.63)?),
                Box::new(Brightness::new(0.12)?),
                Box::new(ToneCurve::per_channel(
                    &[
                        (0.0, 38.0),
                        (94.0, 94.0),
                        (148.0, 142.0),
                        (175.0, 187.0),
                        (255.0, 255.0),
                    ],
                    &[(0.0, 0.0), (77.0, 53.0), (171.0, 190.0), (255.0, 255.0)],
                    &[(0.0, 10.0), (48.0, 85.0), (174.0, 228.0), (255.0, 255.0)],
                )?),
            ],
            Self::Lenin => vec![
                Box::new(Desaturation::new(0.4)?),
                Box::new(ToneCurve::per_channel(
                    &[
                        (0.0, 20.0),
                        (40.0, 20.0),
                        (106.0, 111.0),
                        (129.0, 168.0),
                        (190.0, 223.0),
                        (255.0, 255.0),
                    ],
                    &[
                        (0.0, 20.0),
                        (40.0, 20.0),
                        (62.0, 41.0),
                        (106.0, 108.0),
                        (132.0, 159.0),
                        (203.0, 237.0),
                        (255.0, 255.0),
                    ],
                    &[
                        (0.0, 40.0),
                        (40.0, 40.0),
                        (73.0, 60.0),
                        (133.0, 160.0),
                        (191.0, 225.0),
                        (255.0, 255.0),
                    ],
                )?),
            ],
            Self::Glam => vec![
                Box::new(Contrast::new(1.1)?),
                Box::new(ToneCurve::per_channel(
                    &[(0.0, 0.0), (94.0, 74.0), (181.0, 205.0), (255.0, 255.0)],
                    &[(0.0, 0.0), (127.0, 127.0), (255.0, 255.0)],
                    &[(0.0, 0.0), (102.0, 73.0), (227.0, 213.0), (255.0, 255.0)],
                )?),
            ],
            Self::Semired => vec![
                Box::new(ToneCurve::per_channel(
                    &[(0.0, 129.0), (75.0, 153.0), (181.0, 227.0), (255.0, 255.0)],
                    &[(0.0, 8.0), (111.0, 85.0), (212.0, 158.0), (255.0, 226.0)],
                    &[(0.0, 5.0), (75.0, 22.0), (193.0, 90.0), (255.0, 229.0)],
                )?),
                Box::new(Glow::default()),
            ],
        };
        Ok(chain)
    }
}

impl std::fmt::Display for FilterKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.identifier())
    }
}

/// Looks up a recipe by identifier (case-insensitive, surrounding whitespace ignored).
pub fn parse_filter(identifier: &str) -> RetouchResult<FilterKind> {
    let wanted = identifier.trim().to_ascii_lowercase();
    FilterKind::ALL
        .into_iter()
        .find(|k| k.identifier() == wanted)
        .ok_or_else(|| RetouchError::unknown_identifier(format!("filter '{identifier}'")))
}

#[cfg(test)]
#[path = "../tests/unit/filters.rs"]
mod tests;
