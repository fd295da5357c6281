use serde::{Deserialize, Serialize};

/// 8-bit RGB colour with a `0.0..=1.0` alpha.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Rgba {
    const fn from_rgb8(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }
}

/// Fill and border pair for one chart group.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Swatch {
    pub fill: Rgba,
    pub border: Rgba,
}

impl Swatch {
    const fn new(r: u8, g: u8, b: u8) -> Self {
        Self {
            fill: Rgba::from_rgb8(r, g, b, 0.6),
            border: Rgba::from_rgb8(r, g, b, 1.0),
        }
    }
}

pub const BLUE: Swatch = Swatch::new(54, 162, 235);
pub const GREEN: Swatch = Swatch::new(75, 192, 192);
pub const ORANGE: Swatch = Swatch::new(255, 159, 64);
pub const PURPLE: Swatch = Swatch::new(153, 102, 255);
pub const RED: Swatch = Swatch::new(255, 99, 132);

pub const PALETTE: [Swatch; 5] = [BLUE, GREEN, ORANGE, PURPLE, RED];

/// Colour for the group at `index`, cycling through the palette.
pub fn swatch(index: usize) -> Swatch {
    PALETTE[index % PALETTE.len()]
}
