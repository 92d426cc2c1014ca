//! Font assets rasterized from embedded-graphics monospace fonts.

use std::borrow::Cow;

use embedded_graphics::{
    mono_font::{MonoFont, MonoTextStyle},
    pixelcolor::BinaryColor,
    prelude::*,
    text::{Baseline, Text},
};

use super::FontAsset;

/// Space through tilde, in code point order
pub const PRINTABLE_ASCII: &str = " !\"#$%&'()*+,-./0123456789:;<=>?@ABCDEFGHIJKLMNOPQRSTUVWXYZ[\\]^_`abcdefghijklmnopqrstuvwxyz{|}~";

impl FontAsset {
    /// Renders every character of `chars` into one cell of `font` and packs
    /// the result into a run-length asset. Glyph order follows `chars`.
    pub fn from_mono_font(font: &MonoFont<'_>, chars: &str) -> Self {
        let size = font.character_size;
        let style = MonoTextStyle::new(font, BinaryColor::On);
        let mut pixels = Vec::new();
        let mut unicodemap = Vec::new();

        for ch in chars.chars() {
            let mut cell = Cell::new(size);
            let mut buf = [0u8; 4];
            Text::with_baseline(ch.encode_utf8(&mut buf), Point::zero(), style, Baseline::Top)
                .draw(&mut cell)
                .ok();
            pixels.extend_from_slice(&cell.bits);
            unicodemap.push(ch as u32);
        }

        Self {
            count: unicodemap.len(),
            ewidth: size.width,
            eheight: size.height,
            cwidth: size.width,
            cheight: size.height,
            rundata: Cow::Owned(encode_runs(pixels.iter().copied())),
            unicodemap: Cow::Owned(unicodemap),
        }
    }
}

/// Run-length encodes on/off pixels into the asset format, zero-terminated.
pub fn encode_runs(pixels: impl IntoIterator<Item = bool>) -> Vec<u8> {
    let mut out = Vec::new();
    let mut current: Option<(bool, u8)> = None;
    for on in pixels {
        current = match current {
            Some((value, n)) if value == on && n < 0x7F => Some((value, n + 1)),
            Some((value, n)) => {
                out.push(run_byte(value, n));
                Some((on, 1))
            }
            None => Some((on, 1)),
        };
    }
    if let Some((value, n)) = current {
        out.push(run_byte(value, n));
    }
    out.push(0);
    out
}

fn run_byte(on: bool, len: u8) -> u8 {
    if on {
        0x80 | len
    } else {
        len
    }
}

/// One glyph cell rendered as on/off pixels
struct Cell {
    size: Size,
    bits: Vec<bool>,
}

impl Cell {
    fn new(size: Size) -> Self {
        Self {
            size,
            bits: vec![false; (size.width * size.height) as usize],
        }
    }
}

impl DrawTarget for Cell {
    type Color = BinaryColor;
    type Error = core::convert::Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(Point { x, y }, color) in pixels {
            if x < 0 || y < 0 || x >= self.size.width as i32 || y >= self.size.height as i32 {
                continue;
            }
            self.bits[y as usize * self.size.width as usize + x as usize] = color.is_on();
        }
        Ok(())
    }
}

impl OriginDimensions for Cell {
    fn size(&self) -> Size {
        self.size
    }
}
