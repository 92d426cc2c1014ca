//! Pixel surfaces
//!
//! A [`Surface`] owns its pixel memory; the composition surface and icons are
//! both surfaces. A [`Texture`] is a borrowed view handed to the raster engine
//! for a single draw, which is how glyph bitmaps owned by the atlas and
//! caller-owned icons reach it without copying.

use embedded_graphics_core::{
    draw_target::DrawTarget,
    geometry::{OriginDimensions, Point, Size},
    pixelcolor::Rgb888,
    Pixel,
};

use super::{Color, PixelFormat};

/// Geometry and format of a surface, without its pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceInfo {
    pub width: u32,
    pub height: u32,
    /// Pixels per row; at least `width`
    pub stride: u32,
    pub format: PixelFormat,
}

impl SurfaceInfo {
    pub fn row_bytes(&self) -> usize {
        self.stride as usize * self.format.bytes_per_pixel()
    }

    pub fn byte_len(&self) -> usize {
        self.row_bytes() * self.height as usize
    }
}

pub struct Surface {
    info: SurfaceInfo,
    data: Vec<u8>,
}

impl Surface {
    /// Zero-filled surface.
    pub fn new(width: u32, height: u32, stride: u32, format: PixelFormat) -> Self {
        let info = SurfaceInfo {
            width,
            height,
            stride: stride.max(width),
            format,
        };
        Self {
            data: vec![0u8; info.byte_len()],
            info,
        }
    }

    /// Wraps existing pixels; `None` if `data` is too short for the geometry.
    pub fn from_pixels(info: SurfaceInfo, data: Vec<u8>) -> Option<Self> {
        if info.stride < info.width || data.len() < info.byte_len() {
            return None;
        }
        Some(Self { info, data })
    }

    pub fn info(&self) -> SurfaceInfo {
        self.info
    }

    pub fn width(&self) -> u32 {
        self.info.width
    }

    pub fn height(&self) -> u32 {
        self.info.height
    }

    pub fn stride(&self) -> u32 {
        self.info.stride
    }

    pub fn format(&self) -> PixelFormat {
        self.info.format
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn as_texture(&self) -> Texture<'_> {
        Texture {
            info: self.info,
            data: &self.data,
        }
    }

    fn pixel_offset(&self, x: u32, y: u32) -> Option<usize> {
        if x >= self.info.width || y >= self.info.height {
            return None;
        }
        let bpp = self.info.format.bytes_per_pixel();
        Some((y as usize * self.info.stride as usize + x as usize) * bpp)
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        let offset = self.pixel_offset(x, y)?;
        let bpp = self.info.format.bytes_per_pixel();
        Some(self.info.format.unpack(&self.data[offset..offset + bpp]))
    }

    pub fn set_pixel(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
        if let Some(offset) = self.pixel_offset(x, y) {
            let bpp = self.info.format.bytes_per_pixel();
            self.info.format.pack(rgba, &mut self.data[offset..offset + bpp]);
        }
    }

    /// Reverses pixel order across the whole buffer, rows and padding
    /// included. Bytes inside each pixel keep their order.
    pub fn rotate_180(&mut self) {
        let bpp = self.info.format.bytes_per_pixel();
        let total = self.info.stride as usize * self.info.height as usize;
        for i in 0..total / 2 {
            let j = total - 1 - i;
            for k in 0..bpp {
                self.data.swap(i * bpp + k, j * bpp + k);
            }
        }
    }
}

/// Borrowed texture handed to the raster engine
#[derive(Debug, Clone, Copy)]
pub struct Texture<'a> {
    pub info: SurfaceInfo,
    pub data: &'a [u8],
}

impl<'a> Texture<'a> {
    /// RGBA of texel `(s, t)`, or `None` outside the texture.
    pub fn texel(&self, s: i32, t: i32) -> Option<[u8; 4]> {
        if s < 0 || t < 0 || s as u32 >= self.info.width || t as u32 >= self.info.height {
            return None;
        }
        let bpp = self.info.format.bytes_per_pixel();
        let offset = (t as usize * self.info.stride as usize + s as usize) * bpp;
        let px = self.data.get(offset..offset + bpp)?;
        Some(self.info.format.unpack(px))
    }
}

// embedded-graphics primitives draw opaque pixels straight into the surface
impl DrawTarget for Surface {
    type Color = Rgb888;
    type Error = core::convert::Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(Point { x, y }, color) in pixels {
            if x < 0 || y < 0 {
                continue;
            }
            self.set_pixel(x as u32, y as u32, Color::from_rgb888(color).to_bytes());
        }
        Ok(())
    }
}

impl OriginDimensions for Surface {
    fn size(&self) -> Size {
        Size::new(self.info.width, self.info.height)
    }
}
