//! Raster engine that records calls instead of drawing.

use super::{Rasterizer, Rect};
use crate::devices::framebuffer::{PixelFormat, Surface, Texture};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Color([i32; 4]),
    Blend(bool),
    Fill(Rect),
    Textured {
        format: PixelFormat,
        size: (u32, u32),
        origin: (i32, i32),
        rect: Rect,
    },
}

#[derive(Debug, Default)]
pub struct Recorder {
    pub calls: Vec<Call>,
}

impl Recorder {
    pub fn rects(&self) -> Vec<Rect> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Call::Fill(r) => Some(*r),
                Call::Textured { rect, .. } => Some(*rect),
                _ => None,
            })
            .collect()
    }
}

impl Rasterizer for Recorder {
    fn set_color(&mut self, rgba: [i32; 4]) {
        self.calls.push(Call::Color(rgba));
    }

    fn set_blending(&mut self, enabled: bool) {
        self.calls.push(Call::Blend(enabled));
    }

    fn fill_rect(&mut self, _target: &mut Surface, rect: Rect) {
        self.calls.push(Call::Fill(rect));
    }

    fn texture_rect(
        &mut self,
        _target: &mut Surface,
        texture: &Texture<'_>,
        origin: (i32, i32),
        rect: Rect,
    ) {
        self.calls.push(Call::Textured {
            format: texture.info.format,
            size: (texture.info.width, texture.info.height),
            origin,
            rect,
        });
    }
}
