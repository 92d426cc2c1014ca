//! Session settings
//!
//! Everything the display layer would otherwise take from build flags:
//! device paths, the target pixel format, overscan and panel orientation.

use std::path::PathBuf;

use crate::devices::framebuffer::PixelFormat;

/// Default framebuffer node
pub const DEFAULT_FB_PATH: &str = "/dev/graphics/fb0";
/// Default console used to switch into graphics mode
pub const DEFAULT_TTY_PATH: &str = "/dev/tty0";
/// Sysfs attribute publishing the left/right split of dual-pipe panels
pub const DEFAULT_SPLIT_PATH: &str = "/sys/class/graphics/fb0/msm_fb_split";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplaySettings {
    pub fb_path: PathBuf,
    /// `None` skips the console mode switch entirely
    pub tty_path: Option<PathBuf>,
    pub split_path: PathBuf,
    /// When set, blanking writes a power level here instead of `FBIOBLANK`
    pub backlight_path: Option<PathBuf>,
    pub pixel_format: PixelFormat,
    /// Border inset, percent of each axis
    pub overscan_percent: u32,
    /// Panel is mounted upside down
    pub flipped_screen: bool,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            fb_path: PathBuf::from(DEFAULT_FB_PATH),
            tty_path: Some(PathBuf::from(DEFAULT_TTY_PATH)),
            split_path: PathBuf::from(DEFAULT_SPLIT_PATH),
            backlight_path: None,
            pixel_format: PixelFormat::Rgb565,
            overscan_percent: 0,
            flipped_screen: false,
        }
    }
}

impl DisplaySettings {
    pub fn with_fb_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.fb_path = path.into();
        self
    }

    pub fn with_pixel_format(mut self, format: PixelFormat) -> Self {
        self.pixel_format = format;
        self
    }

    pub fn with_overscan(mut self, percent: u32) -> Self {
        self.overscan_percent = percent;
        self
    }

    pub fn with_flipped_screen(mut self, flipped: bool) -> Self {
        self.flipped_screen = flipped;
        self
    }

    pub fn with_tty(mut self, path: Option<PathBuf>) -> Self {
        self.tty_path = path;
        self
    }

    pub fn with_split_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.split_path = path.into();
        self
    }

    pub fn with_backlight(mut self, path: Option<PathBuf>) -> Self {
        self.backlight_path = path;
        self
    }
}
