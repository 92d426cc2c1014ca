//! Frame publication.

use log::warn;

use super::Graphics;
use crate::devices::fbdev::FbDevice;
use crate::overlay::Overlay;
use crate::raster::Rasterizer;

impl<D: FbDevice, O: Overlay, R: Rasterizer> Graphics<D, O, R> {
    /// Publishes the composition surface to the panel.
    ///
    /// Under an overlay the whole surface is queued to the overlay pipe.
    /// Otherwise it is copied into the next physical frame, which is then
    /// made visible. Failures are logged and never abort the caller.
    pub fn flip(&mut self) {
        if self.config.has_overlay {
            self.flip_overlay();
            return;
        }

        if self.config.double_buffered {
            self.active = (self.active + 1) & 1;
        }

        if self.flipped_screen {
            self.var.xres_virtual = self.config.stride();
            self.surface.rotate_180();
        }

        let src = self.surface.data();
        if let Some(frame) = self.buffers.frame_mut(self.active) {
            let n = frame.len().min(src.len());
            frame[..n].copy_from_slice(&src[..n]);
        }

        self.set_active_framebuffer(self.active);
    }

    fn flip_overlay(&mut self) {
        let fd = self.device.raw_fd();
        let info = self.buffers.info();
        if let Err(e) = self.overlay.allocate_overlay(fd, &info) {
            warn!("overlay allocation before flip failed: {}", e);
        }

        let len = self.config.frame_len();
        let data = self.surface.data();
        let frame = data.get(..len).unwrap_or(data);
        if let Err(e) = self.overlay.display_frame(fd, frame) {
            warn!("ioctl() failed to display frame: {}", e);
            self.overlay.free_overlay(fd);
        }
    }

    /// Points the visible window at physical frame `n`.
    ///
    /// Single-buffered displays always show frame 0, so nothing is issued.
    pub(crate) fn set_active_framebuffer(&mut self, n: usize) {
        if n > 1 || !self.config.double_buffered {
            return;
        }
        self.var.yres_virtual = self.var.yres * 2;
        self.var.yoffset = n as u32 * self.var.yres;
        self.var.bits_per_pixel = self.config.format.bits_per_pixel();
        if let Err(e) = self.device.put_var_screen_info(&self.var) {
            warn!("active fb swap failed: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::devices::fbdev::fake::FakeFramebuffer;
    use crate::devices::framebuffer::{Color, PixelFormat};
    use crate::font::GlyphAtlas;
    use crate::graphics::tests::{session, settings};
    use crate::graphics::Graphics;
    use crate::overlay::fake::FakeOverlay;
    use crate::raster::SoftRaster;

    #[test]
    fn test_double_buffer_alternates() {
        let mut gr = session(FakeFramebuffer::double_rgb565(16, 8), settings());
        let mut seen = Vec::new();
        for _ in 0..4 {
            gr.flip();
            seen.push(gr.active_buffer());
            let last = gr.device.puts.last().copied().unwrap();
            assert_eq!(last.yoffset, gr.active_buffer() as u32 * 8);
            assert_eq!(last.yres_virtual, 16);
        }
        assert_eq!(seen, vec![1, 0, 1, 0]);
    }

    #[test]
    fn test_single_buffer_never_activates() {
        let mut gr = session(FakeFramebuffer::single_rgb565(16, 8), settings());
        let before = gr.device.puts.len();
        gr.flip();
        gr.flip();
        assert_eq!(gr.active_buffer(), 0);
        assert_eq!(gr.device.puts.len(), before);
    }

    #[test]
    fn test_flip_copies_whole_surface() {
        let mut gr = session(FakeFramebuffer::double_rgb565(16, 8), settings());
        gr.set_color(Color::BLUE);
        gr.fill(0, 0, 16, 8);
        gr.flip();
        assert_eq!(gr.physical_frame(1).unwrap(), gr.pixels());
        // the previous front frame is untouched
        assert!(gr.physical_frame(0).unwrap().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_single_buffer_flip_reaches_frame_zero() {
        let mut gr = session(FakeFramebuffer::single_rgb565(8, 4), settings());
        gr.set_color(Color::WHITE);
        gr.fill(0, 0, 1, 1);
        gr.flip();
        assert_eq!(&gr.physical_frame(0).unwrap()[..2], &[0xFF, 0xFF]);
    }

    #[test]
    fn test_flipped_screen_reverses_pixels() {
        let mut gr = session(
            FakeFramebuffer::single_rgb565(8, 4),
            settings().with_flipped_screen(true),
        );
        gr.set_color(Color::RED);
        gr.fill(0, 0, 1, 1);
        gr.flip();
        let frame = gr.physical_frame(0).unwrap();
        // last pixel, little-endian 0xF800
        assert_eq!(&frame[frame.len() - 2..], &[0x00, 0xF8]);
        assert_eq!(&frame[..2], &[0x00, 0x00]);
        assert_eq!(gr.var.xres_virtual, gr.config().stride());
    }

    #[test]
    fn test_flipped_screen_keeps_byte_order_in_pixel() {
        let mut gr = session(
            FakeFramebuffer::new(4, 2, 32, 4 * 2 * 4),
            settings()
                .with_pixel_format(PixelFormat::Bgra8888)
                .with_flipped_screen(true),
        );
        gr.pixels_mut()[..4].copy_from_slice(&[1, 2, 3, 4]);
        gr.flip();
        let frame = gr.physical_frame(0).unwrap();
        assert_eq!(&frame[frame.len() - 4..], &[1, 2, 3, 4]);
    }

    #[test]
    fn test_activation_failure_is_logged_only() {
        let mut gr = session(FakeFramebuffer::double_rgb565(16, 8), settings());
        gr.device.fail_put_after = Some(gr.device.puts.len());
        gr.flip();
        assert_eq!(gr.active_buffer(), 1);
        gr.flip();
        assert_eq!(gr.active_buffer(), 0);
    }

    #[test]
    fn test_overlay_flip_failure_releases_pipe() {
        let overlay = FakeOverlay {
            fail_frames: 1,
            ..FakeOverlay::capable()
        };
        let mut gr = Graphics::with_parts(
            settings().with_pixel_format(PixelFormat::Rgbx8888),
            FakeFramebuffer::new(64, 32, 32, 0),
            overlay,
            SoftRaster::new(),
            GlyphAtlas::builtin(),
        )
        .unwrap();

        gr.flip();
        assert!(!gr.overlay.allocated);
        assert_eq!(gr.overlay.releases, 1);
        assert!(gr.overlay.frames.is_empty());

        gr.flip();
        assert!(gr.overlay.allocated);
        assert_eq!(gr.overlay.allocations, 2);
        assert_eq!(gr.overlay.frames, vec![64 * 4 * 32]);
        assert_eq!(gr.active_buffer(), 0);
    }
}
