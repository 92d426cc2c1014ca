//! Color representation and fixed-point expansion
use embedded_graphics_core::pixelcolor::{Rgb888, RgbColor};

/// One unit in the raster engine's 16.16 channel representation.
pub const FIXED_ONE: i32 = 1 << 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color {
        r: 0,
        g: 0,
        b: 0,
        a: 255,
    };
    pub const WHITE: Color = Color {
        r: 255,
        g: 255,
        b: 255,
        a: 255,
    };
    pub const TRANSPARENT: Color = Color {
        r: 0,
        g: 0,
        b: 0,
        a: 0,
    };
    pub const RED: Color = Color {
        r: 255,
        g: 0,
        b: 0,
        a: 255,
    };
    pub const GREEN: Color = Color {
        r: 0,
        g: 255,
        b: 0,
        a: 255,
    };
    pub const BLUE: Color = Color {
        r: 0,
        g: 0,
        b: 255,
        a: 255,
    };

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn with_alpha(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn to_bytes(&self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    pub fn from_hex(hex: u32) -> Self {
        Self {
            r: ((hex >> 16) & 0xFF) as u8,
            g: ((hex >> 8) & 0xFF) as u8,
            b: (hex & 0xFF) as u8,
            a: 255,
        }
    }

    /// Channels in the raster engine's fixed-point form, RGBA order.
    pub fn to_fixed(&self) -> [i32; 4] {
        [
            expand_channel(self.r),
            expand_channel(self.g),
            expand_channel(self.b),
            expand_channel(self.a),
        ]
    }

    pub fn to_rgb888(self) -> Rgb888 {
        Rgb888::new(self.r, self.g, self.b)
    }

    pub fn from_rgb888(color: Rgb888) -> Self {
        Self::new(color.r(), color.g(), color.b())
    }
}

/// Maps 0..=255 onto 1..=65536 so that 255 saturates at exactly one.
pub const fn expand_channel(c: u8) -> i32 {
    let c = c as i32;
    ((c << 8) | c) + 1
}

/// Inverse of [`expand_channel`], clamped to the byte range.
pub fn narrow_channel(fixed: i32) -> u8 {
    let v = (fixed - 1).clamp(0, 0xFFFF);
    (v >> 8) as u8
}
