//! # Raster Engine Seam
//!
//! The display layer draws only through [`Rasterizer`]: a fixed-function
//! immediate-mode engine that fills rectangles with the current color or
//! with a texture sampled one-to-one. [`SoftRaster`] is the software engine
//! used by default.
//!
//! Rectangles are half-open: `x2`/`y2` are one past the last pixel.

mod soft;

#[cfg(test)]
pub(crate) mod record;

pub use soft::SoftRaster;

use crate::devices::framebuffer::{Surface, Texture};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Rect {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

impl Rect {
    pub const fn new(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Coordinates saturate at the `i32` range.
    pub const fn with_size(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self::new(x, y, x.saturating_add(w), y.saturating_add(h))
    }

    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(
            self.x1.saturating_add(dx),
            self.y1.saturating_add(dy),
            self.x2.saturating_add(dx),
            self.y2.saturating_add(dy),
        )
    }

    pub fn width(&self) -> i32 {
        self.x2.saturating_sub(self.x1).max(0)
    }

    pub fn height(&self) -> i32 {
        self.y2.saturating_sub(self.y1).max(0)
    }

    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    /// Intersection with `0..w` x `0..h`.
    pub fn clip(&self, w: u32, h: u32) -> Rect {
        Rect::new(
            self.x1.max(0),
            self.y1.max(0),
            self.x2.min(w as i32),
            self.y2.min(h as i32),
        )
    }
}

/// Immediate-mode raster engine bound to a color buffer per call
pub trait Rasterizer {
    /// Current color, RGBA in 16.16 fixed point (see `Color::to_fixed`).
    fn set_color(&mut self, rgba: [i32; 4]);

    /// Source-alpha / one-minus-source-alpha blending.
    fn set_blending(&mut self, enabled: bool);

    /// Fills `rect` with the current color.
    fn fill_rect(&mut self, target: &mut Surface, rect: Rect);

    /// Fills `rect` from `texture` with a one-to-one mapping: pixel `(x, y)`
    /// samples texel `(x + origin.0, y + origin.1)`. Colour textures replace
    /// the fragment color, alpha textures replace only its alpha.
    fn texture_rect(
        &mut self,
        target: &mut Surface,
        texture: &Texture<'_>,
        origin: (i32, i32),
        rect: Rect,
    );
}
