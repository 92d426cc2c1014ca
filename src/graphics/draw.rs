//! Drawing operations on the composition surface.

use super::Graphics;
use crate::devices::fbdev::FbDevice;
use crate::devices::framebuffer::{Color, Surface};
use crate::font::GlyphAtlas;
use crate::overlay::Overlay;
use crate::raster::{Rasterizer, Rect};
use crate::utf8::CodePoints;

/// Where a text run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextRun {
    /// Cursor x after the last drawn glyph, or the run width when measuring
    pub end_x: i32,
    /// Byte offset of the first sequence that failed to decode
    pub truncated_at: Option<usize>,
}

impl TextRun {
    pub fn is_complete(&self) -> bool {
        self.truncated_at.is_none()
    }
}

/// Calls `f` with the glyph index of every drawable code point in `bytes`.
/// Control characters below 0x20 are skipped; the walk stops at the first
/// sequence that fails to decode and returns its offset.
fn for_each_glyph(font: &GlyphAtlas, bytes: &[u8], mut f: impl FnMut(usize)) -> Option<usize> {
    let mut points = CodePoints::new(bytes);
    for (_, code, _) in points.by_ref() {
        if code < 0x20 {
            continue;
        }
        f(font.index_of(code));
    }
    points.stopped_at()
}

impl<D: FbDevice, O: Overlay, R: Rasterizer> Graphics<D, O, R> {
    fn overscan(&self) -> (i32, i32) {
        (self.config.overscan_x, self.config.overscan_y)
    }

    /// Sets the color used by `fill` and by text.
    pub fn set_color(&mut self, color: Color) {
        self.raster.set_color(color.to_fixed());
    }

    /// Fills `x1..x2` x `y1..y2` with the current color.
    pub fn fill(&mut self, x1: i32, y1: i32, x2: i32, y2: i32) {
        let (ox, oy) = self.overscan();
        self.raster
            .fill_rect(&mut self.surface, Rect::new(x1, y1, x2, y2).offset(ox, oy));
    }

    /// Copies the `w` x `h` region at `(sx, sy)` of `source` to `(dx, dy)`.
    pub fn blit(&mut self, source: &Surface, sx: i32, sy: i32, w: i32, h: i32, dx: i32, dy: i32) {
        let (ox, oy) = self.overscan();
        let (dx, dy) = (dx.saturating_add(ox), dy.saturating_add(oy));
        self.raster.texture_rect(
            &mut self.surface,
            &source.as_texture(),
            (sx.saturating_sub(dx), sy.saturating_sub(dy)),
            Rect::with_size(dx, dy, w, h),
        );
    }

    /// Draws all of `icon` with its top-left corner at `(x, y)`.
    pub fn draw_icon(&mut self, x: i32, y: i32, icon: &Surface) {
        let (ox, oy) = self.overscan();
        let (x, y) = (x.saturating_add(ox), y.saturating_add(oy));
        self.raster.texture_rect(
            &mut self.surface,
            &icon.as_texture(),
            (0i32.saturating_sub(x), 0i32.saturating_sub(y)),
            Rect::with_size(x, y, icon.width() as i32, icon.height() as i32),
        );
    }

    /// Draws UTF-8 `text` on the baseline at `y`, starting at `x`.
    ///
    /// `bold` is accepted for API compatibility and currently renders the
    /// same glyphs as regular text. Malformed input ends the run early; see
    /// [`TextRun::truncated_at`].
    pub fn draw_text(&mut self, x: i32, y: i32, text: impl AsRef<[u8]>, _bold: bool) -> TextRun {
        let (ox, oy) = self.overscan();
        let mut x = x.saturating_add(ox);
        let y = y
            .saturating_add(oy)
            .saturating_sub(self.font.ascent() as i32);

        let font = &self.font;
        let raster = &mut self.raster;
        let surface = &mut self.surface;
        let truncated_at = for_each_glyph(font, text.as_ref(), |index| {
            let Some(texture) = font.texture(index) else {
                return;
            };
            let (w, h) = (texture.info.width as i32, texture.info.height as i32);
            let origin = (0i32.saturating_sub(x), 0i32.saturating_sub(y));
            raster.texture_rect(surface, &texture, origin, Rect::with_size(x, y, w, h));
            x = x.saturating_add(w);
        });

        TextRun {
            end_x: x.saturating_sub(ox),
            truncated_at,
        }
    }

    /// Width `draw_text` would advance for `text`.
    pub fn measure(&self, text: impl AsRef<[u8]>) -> TextRun {
        let mut width: i32 = 0;
        let truncated_at = for_each_glyph(&self.font, text.as_ref(), |index| {
            if let Some(g) = self.font.glyph(index) {
                width = width.saturating_add(g.width as i32);
            }
        });
        TextRun {
            end_x: width,
            truncated_at,
        }
    }

    /// Default glyph cell, `(width, height)`.
    pub fn font_size(&self) -> (i32, i32) {
        let (w, h) = self.font.cell_size();
        (w as i32, h as i32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::devices::fbdev::fake::FakeFramebuffer;
    use crate::devices::framebuffer::PixelFormat;
    use crate::font::FontAsset;
    use crate::graphics::tests::{recording, session, settings};
    use crate::overlay::NoOverlay;
    use crate::raster::record::{Call, Recorder};
    use crate::raster::SoftRaster;
    use std::borrow::Cow;

    /// 10x18 cells: ' ', 'A', 'B'
    fn font_10x18() -> GlyphAtlas {
        GlyphAtlas::from_asset(&FontAsset {
            count: 3,
            ewidth: 10,
            eheight: 18,
            cwidth: 10,
            cheight: 18,
            rundata: Cow::Owned(vec![0x7F, 0x7F, 0x7F, 0x7F, 0x20, 0x00]),
            unicodemap: Cow::Borrowed(&[0x20, 0x41, 0x42]),
        })
    }

    #[test]
    fn test_draw_single_glyph_advances_cursor() {
        let mut gr = Graphics::with_parts(
            settings(),
            FakeFramebuffer::single_rgb565(540, 960),
            NoOverlay,
            SoftRaster::new(),
            font_10x18(),
        )
        .unwrap();
        let run = gr.draw_text(10, 10, "A", false);
        assert_eq!(run.end_x, 20);
        assert!(run.is_complete());
    }

    #[test]
    fn test_overscan_offsets_every_draw() {
        let mut dev = FakeFramebuffer::single_rgb565(200, 100);
        dev.line_align = 1;
        let mut gr = recording(dev, settings().with_overscan(10));
        let (ox, oy) = (20, 10);
        assert_eq!((gr.fb_width(), gr.fb_height()), (200 - 2 * ox, 100 - 2 * oy));
        gr.raster.calls.clear();

        gr.fill(1, 2, 3, 4);
        let icon = Surface::new(5, 6, 5, PixelFormat::Rgb565);
        gr.draw_icon(7, 8, &icon);
        gr.blit(&icon, 1, 1, 2, 2, 30, 40);

        assert_eq!(
            gr.raster.rects(),
            vec![
                Rect::new(1 + ox, 2 + oy, 3 + ox, 4 + oy),
                Rect::with_size(7 + ox, 8 + oy, 5, 6),
                Rect::with_size(30 + ox, 40 + oy, 2, 2),
            ]
        );
        match &gr.raster.calls[2] {
            Call::Textured { origin, .. } => assert_eq!(*origin, (1 - 30 - ox, 1 - 40 - oy)),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_fill_to_edge_with_overscan() {
        let mut gr = session(
            FakeFramebuffer::single_rgb565(100, 100),
            settings().with_overscan(5),
        );
        gr.set_color(Color::RED);
        gr.fill(0, 0, i32::MAX, i32::MAX);
        assert_eq!(gr.surface().pixel(5, 5), Some([255, 0, 0, 255]));
        assert_eq!(gr.surface().pixel(99, 99), Some([255, 0, 0, 255]));
        assert_eq!(gr.surface().pixel(4, 4), Some([0, 0, 0, 255]));
    }

    #[test]
    fn test_extreme_coordinates_do_not_overflow() {
        let mut gr = recording(
            FakeFramebuffer::single_rgb565(100, 100),
            settings().with_overscan(5),
        );
        let icon = Surface::new(4, 4, 4, PixelFormat::Rgb565);
        gr.draw_icon(i32::MAX, i32::MIN, &icon);
        gr.blit(&icon, i32::MAX, i32::MIN, i32::MAX, i32::MAX, i32::MIN, i32::MAX);
        let run = gr.draw_text(i32::MAX, i32::MIN, "AB", false);
        assert_eq!(run.end_x, i32::MAX - 5);
        assert_eq!(
            gr.raster.rects()[0],
            Rect::new(i32::MAX, i32::MIN + 5, i32::MAX, i32::MIN + 9)
        );
    }

    #[test]
    fn test_text_raised_by_ascent() {
        let mut gr = recording(FakeFramebuffer::single_rgb565(64, 64), settings());
        gr.raster.calls.clear();
        gr.draw_text(4, 20, "AB", true);
        // tiny atlas: 2x2 cells, ascent 2
        assert_eq!(
            gr.raster.calls,
            vec![
                Call::Textured {
                    format: PixelFormat::Alpha8,
                    size: (2, 2),
                    origin: (-4, -18),
                    rect: Rect::new(4, 18, 6, 20),
                },
                Call::Textured {
                    format: PixelFormat::Alpha8,
                    size: (2, 2),
                    origin: (-6, -18),
                    rect: Rect::new(6, 18, 8, 20),
                },
            ]
        );
    }

    #[test]
    fn test_control_bytes_skipped() {
        let mut gr = recording(FakeFramebuffer::single_rgb565(64, 64), settings());
        gr.raster.calls.clear();
        let run = gr.draw_text(0, 10, "A\nB\t", false);
        assert_eq!(run.end_x, 4);
        assert_eq!(gr.raster.rects().len(), 2);
    }

    #[test]
    fn test_unknown_code_point_uses_fallback() {
        let mut gr = recording(FakeFramebuffer::single_rgb565(64, 64), settings());
        let run = gr.draw_text(0, 10, "中", false);
        // fallback glyph ' ' still advances the cursor
        assert_eq!(run.end_x, 2);
    }

    #[test]
    fn test_malformed_text_truncates() {
        let mut gr = recording(FakeFramebuffer::single_rgb565(64, 64), settings());
        gr.raster.calls.clear();
        let run = gr.draw_text(0, 10, b"AB\xC3\x41A", false);
        assert_eq!(run.end_x, 4);
        assert_eq!(run.truncated_at, Some(2));
        assert_eq!(gr.raster.rects().len(), 2);

        let run = gr.draw_text(0, 10, b"A\xE4\xB8", false);
        assert_eq!(run.truncated_at, Some(1));
    }

    #[test]
    fn test_measure_matches_draw() {
        let mut gr = recording(FakeFramebuffer::single_rgb565(64, 64), settings());
        let text = "AB A";
        let measured = gr.measure(text);
        let drawn = gr.draw_text(0, 10, text, false);
        assert_eq!(measured.end_x, 8);
        assert_eq!(drawn.end_x, measured.end_x);
        assert_eq!(gr.measure(b"A\xFF").end_x, 2);
    }

    #[test]
    fn test_color_expanded_to_fixed() {
        let mut gr: Graphics<FakeFramebuffer, NoOverlay, Recorder> =
            recording(FakeFramebuffer::single_rgb565(8, 8), settings());
        gr.set_color(Color::with_alpha(0, 255, 0, 255));
        assert_eq!(
            gr.raster.calls.last(),
            Some(&Call::Color([1, 65536, 1, 65536]))
        );
    }

    #[test]
    fn test_font_size_is_default_cell() {
        let gr = session(FakeFramebuffer::single_rgb565(8, 8), settings());
        assert_eq!(gr.font_size(), (10, 20));
    }

    #[test]
    fn test_fill_reaches_pixels() {
        let mut gr = session(FakeFramebuffer::single_rgb565(16, 16), settings());
        gr.set_color(Color::RED);
        gr.fill(0, 0, 4, 4);
        assert_eq!(gr.surface().pixel(3, 3), Some([255, 0, 0, 255]));
        assert_eq!(gr.surface().pixel(4, 4), Some([0, 0, 0, 255]));
    }

    #[test]
    fn test_text_pixels_use_current_color() {
        let mut gr = session(FakeFramebuffer::single_rgb565(64, 32), settings());
        gr.set_color(Color::WHITE);
        gr.draw_text(0, 20, "H", false);
        let lit = (0..20u32)
            .flat_map(|y| (0..10u32).map(move |x| (x, y)))
            .filter(|&(x, y)| gr.surface().pixel(x, y) == Some([255, 255, 255, 255]))
            .count();
        assert!(lit > 0);
    }
}
