//! Software raster engine.

use super::{Rasterizer, Rect};
use crate::devices::framebuffer::color::narrow_channel;
use crate::devices::framebuffer::{PixelFormat, Surface, Texture};

#[derive(Debug, Clone, Copy)]
pub struct SoftRaster {
    color: [u8; 4],
    blend: bool,
}

impl Default for SoftRaster {
    fn default() -> Self {
        Self::new()
    }
}

impl SoftRaster {
    pub const fn new() -> Self {
        Self {
            color: [0, 0, 0, 0xFF],
            blend: false,
        }
    }

    pub fn color(&self) -> [u8; 4] {
        self.color
    }

    fn plot(&self, target: &mut Surface, x: i32, y: i32, src: [u8; 4]) {
        let (x, y) = (x as u32, y as u32);
        if !self.blend || src[3] == 0xFF {
            target.set_pixel(x, y, src);
            return;
        }
        let Some(dst) = target.pixel(x, y) else {
            return;
        };
        let a = src[3] as u32;
        let mix = |s: u8, d: u8| ((s as u32 * a + d as u32 * (255 - a) + 127) / 255) as u8;
        let out = [
            mix(src[0], dst[0]),
            mix(src[1], dst[1]),
            mix(src[2], dst[2]),
            mix(0xFF, dst[3]),
        ];
        target.set_pixel(x, y, out);
    }
}

impl Rasterizer for SoftRaster {
    fn set_color(&mut self, rgba: [i32; 4]) {
        self.color = rgba.map(narrow_channel);
    }

    fn set_blending(&mut self, enabled: bool) {
        self.blend = enabled;
    }

    fn fill_rect(&mut self, target: &mut Surface, rect: Rect) {
        let r = rect.clip(target.width(), target.height());
        for y in r.y1..r.y2 {
            for x in r.x1..r.x2 {
                self.plot(target, x, y, self.color);
            }
        }
    }

    fn texture_rect(
        &mut self,
        target: &mut Surface,
        texture: &Texture<'_>,
        origin: (i32, i32),
        rect: Rect,
    ) {
        let r = rect.clip(target.width(), target.height());
        let [cr, cg, cb, ca] = self.color;
        for y in r.y1..r.y2 {
            for x in r.x1..r.x2 {
                let (s, t) = (x.saturating_add(origin.0), y.saturating_add(origin.1));
                let Some(t) = texture.texel(s, t) else {
                    continue;
                };
                let src = match texture.info.format {
                    PixelFormat::Alpha8 => [cr, cg, cb, t[3]],
                    PixelFormat::Bgra8888 => t,
                    _ => [t[0], t[1], t[2], ca],
                };
                self.plot(target, x, y, src);
            }
        }
    }
}
