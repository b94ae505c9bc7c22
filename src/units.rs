// ABOUTME: Length and color primitives used by the slide layout
// ABOUTME: All positions are English Metric Units (EMU), the native DrawingML unit

use std::fmt;

/// A length in English Metric Units.
pub type Emu = i64;

pub const EMU_PER_INCH: Emu = 914_400;
pub const EMU_PER_CM: Emu = 360_000;
pub const EMU_PER_PT: Emu = 12_700;

/// Centimeters to EMU, rounded to the nearest unit.
pub fn cm(value: f64) -> Emu {
    (value * EMU_PER_CM as f64).round() as Emu
}

pub fn inches(value: f64) -> Emu {
    (value * EMU_PER_INCH as f64).round() as Emu
}

pub fn pt(value: f64) -> Emu {
    (value * EMU_PER_PT as f64).round() as Emu
}

/// A font size in points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontSize(pub f64);

impl FontSize {
    /// DrawingML stores run sizes in hundredths of a point.
    pub fn hundredths(self) -> u32 {
        (self.0 * 100.0).round() as u32
    }

    pub fn emu(self) -> Emu {
        pt(self.0)
    }
}

/// An sRGB color, rendered as the six-digit hex DrawingML expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const BLACK: Rgb = Rgb(0, 0, 0);
    pub const WHITE: Rgb = Rgb(255, 255, 255);
    pub const CYAN: Rgb = Rgb(0, 255, 255);
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02X}{:02X}{:02X}", self.0, self.1, self.2)
    }
}

/// A placed rectangle on the slide.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub left: Emu,
    pub top: Emu,
    pub width: Emu,
    pub height: Emu,
}

impl Rect {
    pub fn new(left: Emu, top: Emu, width: Emu, height: Emu) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn bottom(&self) -> Emu {
        self.top + self.height
    }
}
