//! Display configuration probe
//!
//! Reads the device geometry once per session, decides between overlay and
//! direct scan-out, reprograms the channel layout for direct scan-out and
//! maps frame memory.

use std::path::Path;

use log::{error, info, warn};

use crate::devices::fbdev::sys::{Activate, VarScreenInfo, FB_VMODE_NONINTERLACED};
use crate::devices::fbdev::{FbDevice, FrameMemory};
use crate::devices::framebuffer::{PixelFormat, SurfaceInfo};
use crate::error::{GrError, GrResult};
use crate::overlay::Overlay;
use crate::settings::DisplaySettings;

/// Widest resolution a single display pipe drives
pub const MAX_DISPLAY_DIM: u32 = 2048;

/// Overlay scan-out rows are padded to this many pixels
const OVERLAY_ROW_ALIGN: u32 = 32;

/// Session display configuration; fixed once probed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayConfig {
    pub id: String,
    pub xres: u32,
    pub yres: u32,
    /// Bytes per row
    pub line_length: u32,
    pub bits_per_pixel: u32,
    pub format: PixelFormat,
    pub smem_len: u32,
    pub overscan_x: i32,
    pub overscan_y: i32,
    pub has_overlay: bool,
    pub double_buffered: bool,
    left_split: i32,
    right_split: i32,
}

impl DisplayConfig {
    /// Pixel column where the left half ends. Defaults to an even split.
    pub fn left_split(&self) -> i32 {
        if self.left_split != 0 {
            self.left_split
        } else {
            (self.xres / 2) as i32
        }
    }

    pub fn right_split(&self) -> i32 {
        self.right_split
    }

    pub fn is_display_split(&self) -> bool {
        self.xres > MAX_DISPLAY_DIM || self.right_split != 0
    }

    /// Row pitch in pixels.
    pub fn stride(&self) -> u32 {
        self.line_length / self.format.bytes_per_pixel() as u32
    }

    /// Bytes in one full frame, padding included.
    pub fn frame_len(&self) -> usize {
        self.line_length as usize * self.yres as usize
    }

    pub fn surface_info(&self) -> SurfaceInfo {
        SurfaceInfo {
            width: self.xres,
            height: self.yres,
            stride: self.stride(),
            format: self.format,
        }
    }

    pub fn drawable_width(&self) -> i32 {
        self.xres as i32 - 2 * self.overscan_x
    }

    pub fn drawable_height(&self) -> i32 {
        self.yres as i32 - 2 * self.overscan_y
    }
}

/// Everything the probe acquired
pub struct Probe {
    pub config: DisplayConfig,
    /// Variable screen info as last written; reused for buffer activation
    pub var: VarScreenInfo,
    /// Frame memory for direct scan-out; `None` with an overlay
    pub memory: Option<FrameMemory>,
}

pub fn probe<D: FbDevice, O: Overlay>(
    dev: &mut D,
    overlay: &O,
    settings: &DisplaySettings,
) -> GrResult<Probe> {
    let mut vi = dev.var_screen_info().map_err(|e| {
        error!("failed to get fb0 info: {}", e);
        e
    })?;
    let mut fi = dev.fix_screen_info().map_err(|e| {
        error!("failed to get fb0 info: {}", e);
        e
    })?;

    info!(
        "fb0 reports (possibly inaccurate): bpp={} red={}/{} green={}/{} blue={}/{} line_length={} smem_len={}",
        vi.bits_per_pixel,
        vi.red.offset,
        vi.red.length,
        vi.green.offset,
        vi.green.length,
        vi.blue.offset,
        vi.blue.length,
        fi.line_length,
        fi.smem_len
    );

    let id = fi.id_str();
    let has_overlay = overlay.target_has_overlay(&id);
    let (left_split, right_split) = if overlay.is_target_mdp5() {
        read_split(&settings.split_path)
    } else {
        (0, 0)
    };

    let format = settings.pixel_format;
    let memory = if !has_overlay {
        if !format.apply_to(&mut vi) {
            error!("{} cannot be scanned out", format.name());
            return Err(GrError::Unsupported);
        }
        info!("Pixel format: {}", format.name());
        vi.vmode = FB_VMODE_NONINTERLACED;
        vi.activate = (Activate::NOW | Activate::FORCE).bits();
        dev.put_var_screen_info(&vi).map_err(|e| {
            error!("failed to put fb0 info: {}", e);
            e
        })?;
        fi = dev.fix_screen_info().map_err(|e| {
            error!("failed to get fb0 info: {}", e);
            e
        })?;
        let memory = dev.map(fi.smem_len as usize).map_err(|e| {
            error!("failed to mmap framebuffer: {}", e);
            e
        })?;
        Some(memory)
    } else {
        fi.line_length = align(vi.xres, OVERLAY_ROW_ALIGN) * format.bytes_per_pixel() as u32;
        None
    };

    let percent = settings.overscan_percent as i64;
    let frame_len = fi.line_length as u64 * vi.yres as u64;
    let config = DisplayConfig {
        id,
        xres: vi.xres,
        yres: vi.yres,
        line_length: fi.line_length,
        bits_per_pixel: format.bits_per_pixel(),
        format,
        smem_len: fi.smem_len,
        overscan_x: (vi.xres as i64 * percent / 100) as i32,
        overscan_y: (vi.yres as i64 * percent / 100) as i32,
        has_overlay,
        double_buffered: frame_len * 2 <= fi.smem_len as u64,
        left_split,
        right_split,
    };

    if memory.is_some() && frame_len > fi.smem_len as u64 {
        error!(
            "framebuffer memory ({} bytes) cannot hold one {} byte frame",
            fi.smem_len, frame_len
        );
        return Err(GrError::Map(libc::EINVAL));
    }

    Ok(Probe {
        config,
        var: vi,
        memory,
    })
}

/// Reads `"<left> <right>"` from the split attribute; zeros if unreadable.
pub fn read_split(path: &Path) -> (i32, i32) {
    match std::fs::read(path) {
        Ok(bytes) if !bytes.is_empty() => {
            let text = String::from_utf8_lossy(&bytes[..bytes.len().min(64)]);
            let (left, right) = parse_split(&text);
            info!("Left Split={}", left);
            info!("Right Split={}", right);
            (left, right)
        }
        Ok(_) => (0, 0),
        Err(e) => {
            warn!("Failed to open {}: {}", path.display(), e);
            (0, 0)
        }
    }
}

/// Left value from the start of the text, right value after the first space.
pub fn parse_split(text: &str) -> (i32, i32) {
    let left = atoi(text);
    let right = text.find(' ').map(|i| atoi(&text[i + 1..])).unwrap_or(0);
    (left, right)
}

/// Leading-integer parse: optional whitespace and sign, then digits.
fn atoi(text: &str) -> i32 {
    let s = text.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let mut value: i64 = 0;
    for b in digits.bytes().take_while(u8::is_ascii_digit) {
        value = (value * 10 + (b - b'0') as i64).min(i32::MAX as i64 + 1);
    }
    let value = if negative { -value } else { value };
    value.clamp(i32::MIN as i64, i32::MAX as i64) as i32
}

const fn align(x: u32, to: u32) -> u32 {
    (x + to - 1) & !(to - 1)
}
