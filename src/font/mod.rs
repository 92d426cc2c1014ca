//! # Glyph Atlas
//!
//! Decodes a compiled font asset into per-glyph coverage bitmaps and maps
//! code points to glyph indices.
//!
//! ## Asset layout
//!
//! - The first [`NARROW_GLYPHS`] glyphs (printable ASCII) use the narrow
//!   `ewidth x eheight` cell; every later glyph uses the `cwidth x cheight`
//!   cell.
//! - `rundata` is a run-length stream terminated by a zero byte. Each byte
//!   paints `b & 0x7f` pixels, on if `b & 0x80`, filling glyph cells in
//!   index order.
//! - `unicodemap[i]` is the code point of glyph `i`.
//!
//! Lookup is a linear scan returning the first match; glyph 0 is the
//! fallback for anything the table lacks.

mod mono;

use std::borrow::Cow;

use crate::devices::framebuffer::{PixelFormat, SurfaceInfo, Texture};
use crate::utf8;

pub use mono::{encode_runs, PRINTABLE_ASCII};

/// Glyphs drawn with the narrow cell
pub const NARROW_GLYPHS: usize = 95;

/// A compiled font as shipped with the image
#[derive(Debug, Clone)]
pub struct FontAsset {
    pub count: usize,
    pub ewidth: u32,
    pub eheight: u32,
    pub cwidth: u32,
    pub cheight: u32,
    pub rundata: Cow<'static, [u8]>,
    pub unicodemap: Cow<'static, [u32]>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Glyph {
    pub code: u32,
    pub width: u32,
    pub height: u32,
    offset: usize,
}

/// Decoded glyphs; owns one arena holding every bitmap
#[derive(Debug, Clone)]
pub struct GlyphAtlas {
    glyphs: Vec<Glyph>,
    bitmaps: Vec<u8>,
    cell: (u32, u32),
    ascent: u32,
}

impl GlyphAtlas {
    pub fn from_asset(asset: &FontAsset) -> Self {
        let count = asset.count.min(asset.unicodemap.len());
        let mut glyphs = Vec::with_capacity(count);
        let mut offset = 0usize;
        for n in 0..count {
            let (width, height) = if n < NARROW_GLYPHS {
                (asset.ewidth, asset.eheight)
            } else {
                (asset.cwidth, asset.cheight)
            };
            glyphs.push(Glyph {
                code: asset.unicodemap[n],
                width,
                height,
                offset,
            });
            offset += width as usize * height as usize;
        }

        // Cells are laid out back to back, so the run stream fills the arena
        // sequentially; runs past the end are dropped.
        let mut bitmaps = vec![0u8; offset];
        let mut d = 0usize;
        for &data in asset.rundata.iter().take_while(|&&b| b != 0) {
            let value = if data & 0x80 != 0 { 0xFF } else { 0 };
            let end = (d + (data & 0x7F) as usize).min(bitmaps.len());
            if d < end {
                bitmaps[d..end].fill(value);
            }
            d += (data & 0x7F) as usize;
        }

        Self {
            glyphs,
            bitmaps,
            cell: (asset.cwidth, asset.cheight),
            ascent: asset.cheight,
        }
    }

    /// Atlas built from the bundled 10x20 bitmap font, printable ASCII only.
    pub fn builtin() -> Self {
        Self::from_asset(&FontAsset::from_mono_font(
            &embedded_graphics::mono_font::ascii::FONT_10X20,
            PRINTABLE_ASCII,
        ))
    }

    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    /// Default cell size (`cwidth`, `cheight`).
    pub fn cell_size(&self) -> (u32, u32) {
        self.cell
    }

    /// Distance from the baseline to the top of a cell.
    pub fn ascent(&self) -> u32 {
        self.ascent
    }

    /// Index of the first glyph for `code`, or 0.
    pub fn index_of(&self, code: u32) -> usize {
        self.glyphs
            .iter()
            .position(|g| g.code == code)
            .unwrap_or(0)
    }

    /// Index for the first code point of `bytes`; 0 if it does not decode.
    pub fn index_of_bytes(&self, bytes: &[u8]) -> usize {
        match utf8::decode(bytes).code() {
            Some(code) => self.index_of(code),
            None => 0,
        }
    }

    pub fn glyph(&self, index: usize) -> Option<&Glyph> {
        self.glyphs.get(index)
    }

    pub fn bitmap(&self, index: usize) -> Option<&[u8]> {
        let g = self.glyphs.get(index)?;
        self.bitmaps
            .get(g.offset..g.offset + g.width as usize * g.height as usize)
    }

    /// Coverage texture for one glyph; rows are exactly `width` wide.
    pub fn texture(&self, index: usize) -> Option<Texture<'_>> {
        let g = self.glyphs.get(index)?;
        let data = self.bitmap(index)?;
        Some(Texture {
            info: SurfaceInfo {
                width: g.width,
                height: g.height,
                stride: g.width,
                ..GLYPH_TEXTURE
            },
            data,
        })
    }
}

/// Template every glyph texture is derived from
const GLYPH_TEXTURE: SurfaceInfo = SurfaceInfo {
    width: 0,
    height: 0,
    stride: 0,
    format: PixelFormat::Alpha8,
};
