//! Pixel formats understood by the composition surface and the panel.

use crate::devices::fbdev::sys::{FbBitfield, VarScreenInfo};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    Rgb565,
    Bgr565,
    Rgbx8888,
    Bgra8888,
    /// Coverage-only texture format used by glyphs
    Alpha8,
}

/// Channel placement written to the device when it is reconfigured
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelLayout {
    pub red: FbBitfield,
    pub green: FbBitfield,
    pub blue: FbBitfield,
    pub transp: FbBitfield,
}

impl PixelFormat {
    pub const fn bytes_per_pixel(self) -> usize {
        match self {
            PixelFormat::Rgb565 | PixelFormat::Bgr565 => 2,
            PixelFormat::Rgbx8888 | PixelFormat::Bgra8888 => 4,
            PixelFormat::Alpha8 => 1,
        }
    }

    pub const fn bits_per_pixel(self) -> u32 {
        self.bytes_per_pixel() as u32 * 8
    }

    pub fn name(self) -> &'static str {
        match self {
            PixelFormat::Rgb565 => "RGB_565",
            PixelFormat::Bgr565 => "BGR_565",
            PixelFormat::Rgbx8888 => "RGBX_8888",
            PixelFormat::Bgra8888 => "BGRA_8888",
            PixelFormat::Alpha8 => "A_8",
        }
    }

    /// Channel layout for formats a panel can scan out; `None` for `Alpha8`.
    pub fn channel_layout(self) -> Option<ChannelLayout> {
        let layout = match self {
            PixelFormat::Bgra8888 => ChannelLayout {
                red: FbBitfield::new(8, 8),
                green: FbBitfield::new(16, 8),
                blue: FbBitfield::new(24, 8),
                transp: FbBitfield::new(0, 8),
            },
            PixelFormat::Rgbx8888 => ChannelLayout {
                red: FbBitfield::new(24, 8),
                green: FbBitfield::new(16, 8),
                blue: FbBitfield::new(8, 8),
                transp: FbBitfield::new(0, 8),
            },
            PixelFormat::Rgb565 => ChannelLayout {
                red: FbBitfield::new(11, 5),
                green: FbBitfield::new(5, 6),
                blue: FbBitfield::new(0, 5),
                transp: FbBitfield::new(0, 0),
            },
            PixelFormat::Bgr565 => ChannelLayout {
                red: FbBitfield::new(0, 5),
                green: FbBitfield::new(5, 6),
                blue: FbBitfield::new(11, 5),
                transp: FbBitfield::new(0, 0),
            },
            PixelFormat::Alpha8 => return None,
        };
        Some(layout)
    }

    /// Writes depth and channel layout into `vi`. Returns false for `Alpha8`.
    pub fn apply_to(self, vi: &mut VarScreenInfo) -> bool {
        let Some(layout) = self.channel_layout() else {
            return false;
        };
        vi.bits_per_pixel = self.bits_per_pixel();
        vi.red = layout.red;
        vi.green = layout.green;
        vi.blue = layout.blue;
        vi.transp = layout.transp;
        true
    }

    /// Stores one RGBA pixel in this format. `out` holds exactly one pixel.
    pub fn pack(self, rgba: [u8; 4], out: &mut [u8]) {
        let [r, g, b, a] = rgba;
        match self {
            PixelFormat::Rgb565 => {
                let v = ((r as u16 >> 3) << 11) | ((g as u16 >> 2) << 5) | (b as u16 >> 3);
                out[..2].copy_from_slice(&v.to_le_bytes());
            }
            PixelFormat::Bgr565 => {
                let v = ((b as u16 >> 3) << 11) | ((g as u16 >> 2) << 5) | (r as u16 >> 3);
                out[..2].copy_from_slice(&v.to_le_bytes());
            }
            PixelFormat::Rgbx8888 => out[..4].copy_from_slice(&[r, g, b, 0xFF]),
            PixelFormat::Bgra8888 => out[..4].copy_from_slice(&[b, g, r, a]),
            PixelFormat::Alpha8 => out[0] = a,
        }
    }

    /// Reads one pixel back as RGBA.
    pub fn unpack(self, px: &[u8]) -> [u8; 4] {
        match self {
            PixelFormat::Rgb565 | PixelFormat::Bgr565 => {
                let v = u16::from_le_bytes([px[0], px[1]]);
                let hi = expand5((v >> 11) as u8);
                let mid = expand6(((v >> 5) & 0x3F) as u8);
                let lo = expand5((v & 0x1F) as u8);
                if self == PixelFormat::Rgb565 {
                    [hi, mid, lo, 0xFF]
                } else {
                    [lo, mid, hi, 0xFF]
                }
            }
            PixelFormat::Rgbx8888 => [px[0], px[1], px[2], 0xFF],
            PixelFormat::Bgra8888 => [px[2], px[1], px[0], px[3]],
            PixelFormat::Alpha8 => [0, 0, 0, px[0]],
        }
    }
}

fn expand5(v: u8) -> u8 {
    (v << 3) | (v >> 2)
}

fn expand6(v: u8) -> u8 {
    (v << 2) | (v >> 4)
}
