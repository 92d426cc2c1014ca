//! Console mode switching and backlight power control.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::os::unix::fs::OpenOptionsExt;
use std::os::unix::io::AsRawFd;
use std::path::{Path, PathBuf};

use super::sys::{KDSETMODE, KD_GRAPHICS, KD_TEXT};
use crate::error::{GrError, GrResult};

/// A virtual terminal held in graphics mode; text mode is restored on drop
pub struct VirtualTerminal {
    file: File,
}

impl VirtualTerminal {
    /// Opens the console. `None` when the node does not exist or cannot
    /// be opened; many kernels ship without `tty0`.
    pub fn open(path: &Path) -> Option<Self> {
        match OpenOptions::new()
            .read(true)
            .write(true)
            .custom_flags(libc::O_SYNC)
            .open(path)
        {
            Ok(file) => Some(Self { file }),
            Err(e) => {
                log::warn!("can't open {}: {}", path.display(), e);
                None
            }
        }
    }

    pub fn set_graphics(&self) -> GrResult<()> {
        self.set_mode(KD_GRAPHICS)
    }

    pub fn set_text(&self) -> GrResult<()> {
        self.set_mode(KD_TEXT)
    }

    fn set_mode(&self, mode: u32) -> GrResult<()> {
        // SAFETY: KDSETMODE takes its argument by value
        let ret = unsafe {
            libc::ioctl(
                self.file.as_raw_fd(),
                KDSETMODE as _,
                mode as usize as *mut libc::c_void,
            )
        };
        if ret < 0 {
            return Err(GrError::last_os(GrError::Terminal));
        }
        Ok(())
    }
}

impl Drop for VirtualTerminal {
    fn drop(&mut self) {
        if let Err(e) = self.set_text() {
            log::warn!("failed to restore text mode: {}", e);
        }
    }
}

/// Sysfs-style brightness node driven with three-character power levels
#[derive(Debug, Clone)]
pub struct Backlight {
    path: PathBuf,
}

impl Backlight {
    pub const OFF: &'static [u8; 3] = b"000";
    pub const ON: &'static [u8; 3] = b"250";

    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn set_power(&self, on: bool) -> GrResult<()> {
        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(&self.path)
            .map_err(|e| GrError::from_io(GrError::Backlight, &e))?;
        let level = if on { Self::ON } else { Self::OFF };
        file.write_all(level)
            .map_err(|e| GrError::from_io(GrError::Backlight, &e))
    }
}
