//! # Graphics Session
//!
//! [`Graphics`] owns everything a boot-time UI needs to put pixels on the
//! panel: the framebuffer device, the probed configuration, the physical
//! frames, the composition surface, the raster engine and the glyph atlas.
//!
//! ## Lifecycle
//!
//! 1. `init` opens the console (graphics mode), probes the device and
//!    acquires surfaces
//! 2. draw calls (`fill`, `blit`, `draw_icon`, `draw_text`) mutate the
//!    composition surface only
//! 3. `flip` publishes the composition surface (see `flip.rs`)
//! 4. dropping the session releases the overlay, unmaps frame memory and
//!    restores the console to text mode
//!
//! Every coordinate handed to a draw call is shifted by the overscan inset.

mod draw;
mod flip;

pub use draw::TextRun;

use log::{error, info, warn};

use crate::devices::fbdev::{
    Backlight, FbDevice, LinuxFramebuffer, VarScreenInfo, VirtualTerminal,
};
use crate::devices::framebuffer::Surface;
use crate::display::{probe, DisplayConfig, FrameBuffers};
use crate::error::GrResult;
use crate::font::GlyphAtlas;
use crate::overlay::{NoOverlay, Overlay};
use crate::raster::{Rasterizer, SoftRaster};
use crate::settings::DisplaySettings;

pub struct Graphics<D: FbDevice = LinuxFramebuffer, O: Overlay = NoOverlay, R: Rasterizer = SoftRaster>
{
    device: D,
    overlay: O,
    raster: R,
    font: GlyphAtlas,
    config: DisplayConfig,
    var: VarScreenInfo,
    buffers: FrameBuffers,
    /// Composition surface; every draw lands here
    surface: Surface,
    active: usize,
    flipped_screen: bool,
    backlight: Option<Backlight>,
    // Declared last so the console returns to text mode after everything
    // else is released.
    vt: Option<VirtualTerminal>,
}

impl Graphics {
    /// Opens the configured framebuffer with the software raster engine and
    /// the built-in font.
    pub fn init(settings: DisplaySettings) -> GrResult<Self> {
        Self::open_with_overlay(settings, NoOverlay)
    }
}

impl<O: Overlay> Graphics<LinuxFramebuffer, O, SoftRaster> {
    pub fn open_with_overlay(settings: DisplaySettings, overlay: O) -> GrResult<Self> {
        let device = LinuxFramebuffer::open(&settings.fb_path).map_err(|e| {
            error!("cannot open {}: {}", settings.fb_path.display(), e);
            e
        })?;
        Self::with_parts(settings, device, overlay, SoftRaster::new(), GlyphAtlas::builtin())
    }
}

impl<D: FbDevice, O: Overlay, R: Rasterizer> Graphics<D, O, R> {
    /// Brings up a session on an already opened device.
    pub fn with_parts(
        settings: DisplaySettings,
        mut device: D,
        overlay: O,
        raster: R,
        font: GlyphAtlas,
    ) -> GrResult<Self> {
        let vt = settings
            .tty_path
            .as_deref()
            .and_then(VirtualTerminal::open);
        if let Some(vt) = &vt {
            vt.set_graphics().map_err(|e| {
                error!("failed KDSETMODE to KD_GRAPHICS: {}", e);
                e
            })?;
        }

        let probe = probe(&mut device, &overlay, &settings)?;
        let config = probe.config;
        let buffers = FrameBuffers::new(
            probe.memory,
            config.surface_info(),
            config.frame_len(),
            config.double_buffered,
        );
        let surface = Surface::new(config.xres, config.yres, config.stride(), config.format);

        info!(
            "framebuffer: fd {} ({} x {})",
            device.raw_fd(),
            config.xres,
            config.yres
        );

        let mut gr = Self {
            device,
            overlay,
            raster,
            font,
            var: probe.var,
            buffers,
            surface,
            active: 0,
            flipped_screen: settings.flipped_screen,
            backlight: settings.backlight_path.map(Backlight::new),
            vt,
            config,
        };

        // start with 0 as front (displayed) and 1 as back (drawing)
        if !gr.config.has_overlay {
            gr.set_active_framebuffer(0);
        }
        gr.raster.set_blending(true);

        gr.blank(true);
        gr.blank(false);

        if gr.config.has_overlay {
            let fd = gr.device.raw_fd();
            let info = gr.buffers.info();
            let acquired = gr
                .overlay
                .alloc_ion_mem(gr.config.frame_len())
                .and_then(|_| gr.overlay.allocate_overlay(fd, &info));
            if let Err(e) = acquired {
                warn!("overlay bring-up failed: {}", e);
                gr.overlay.free_ion_mem();
            }
        }

        Ok(gr)
    }

    pub fn config(&self) -> &DisplayConfig {
        &self.config
    }

    pub fn font(&self) -> &GlyphAtlas {
        &self.font
    }

    pub fn raster(&self) -> &R {
        &self.raster
    }

    /// Usable width: resolution minus the overscan inset on both sides.
    pub fn fb_width(&self) -> i32 {
        self.config.drawable_width()
    }

    pub fn fb_height(&self) -> i32 {
        self.config.drawable_height()
    }

    pub fn fb_xres(&self) -> u32 {
        self.config.xres
    }

    pub fn fb_yres(&self) -> u32 {
        self.config.yres
    }

    pub fn left_split(&self) -> i32 {
        self.config.left_split()
    }

    pub fn right_split(&self) -> i32 {
        self.config.right_split()
    }

    pub fn is_display_split(&self) -> bool {
        self.config.is_display_split()
    }

    pub fn has_overlay(&self) -> bool {
        self.config.has_overlay
    }

    pub fn is_double_buffered(&self) -> bool {
        self.config.double_buffered
    }

    /// Index of the physical frame currently on screen.
    pub fn active_buffer(&self) -> usize {
        self.active
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    /// Raw composition pixels, for callers that render on their own.
    pub fn pixels(&self) -> &[u8] {
        self.surface.data()
    }

    pub fn pixels_mut(&mut self) -> &mut [u8] {
        self.surface.data_mut()
    }

    /// Contents of physical frame `index`; `None` under an overlay.
    pub fn physical_frame(&self, index: usize) -> Option<&[u8]> {
        self.buffers.frame(index)
    }

    /// Powers the panel down or back up. Failures are logged only.
    pub fn blank(&mut self, blank: bool) {
        if let Some(backlight) = &self.backlight {
            if let Err(e) = backlight.set_power(!blank) {
                warn!("cannot drive LCD backlight {}: {}", backlight.path().display(), e);
            }
            return;
        }

        let fd = self.device.raw_fd();
        if self.config.has_overlay && blank {
            self.overlay.free_overlay(fd);
        }
        if let Err(e) = self.device.blank(blank) {
            warn!("ioctl(): blank: {}", e);
        }
        if self.config.has_overlay && !blank {
            let info = self.buffers.info();
            if let Err(e) = self.overlay.allocate_overlay(fd, &info) {
                warn!("overlay allocation after unblank failed: {}", e);
            }
        }
    }
}

impl<D: FbDevice, O: Overlay, R: Rasterizer> Drop for Graphics<D, O, R> {
    fn drop(&mut self) {
        if self.config.has_overlay {
            let fd = self.device.raw_fd();
            self.overlay.free_overlay(fd);
            self.overlay.free_ion_mem();
        }
    }
}
