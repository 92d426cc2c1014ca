//! In-memory framebuffer device for tests.

use std::os::unix::io::RawFd;

use super::device::{FbDevice, FrameMemory};
use super::sys::{FixScreenInfo, VarScreenInfo};
use crate::error::{GrError, GrResult};

pub struct FakeFramebuffer {
    pub var: VarScreenInfo,
    pub fix: FixScreenInfo,
    /// Every accepted or rejected FBIOPUT_VSCREENINFO, in order
    pub puts: Vec<VarScreenInfo>,
    pub blanks: Vec<bool>,
    /// Reject FBIOPUT_VSCREENINFO once this many requests have been seen
    pub fail_put_after: Option<usize>,
    pub fail_fix: bool,
    /// Row alignment, in pixels, applied when the depth changes
    pub line_align: u32,
    /// Byte the mapped memory starts out filled with
    pub fill: u8,
}

impl FakeFramebuffer {
    pub fn new(xres: u32, yres: u32, bits_per_pixel: u32, smem_len: u32) -> Self {
        let mut var = VarScreenInfo::default();
        var.xres = xres;
        var.yres = yres;
        var.xres_virtual = xres;
        var.yres_virtual = yres;
        var.bits_per_pixel = bits_per_pixel;
        let mut fix = FixScreenInfo::default();
        fix.set_id("fakefb");
        fix.smem_len = smem_len;
        fix.line_length = xres * bits_per_pixel / 8;
        Self {
            var,
            fix,
            puts: Vec::new(),
            blanks: Vec::new(),
            fail_put_after: None,
            fail_fix: false,
            line_align: 1,
            fill: 0xAA,
        }
    }

    /// Single-buffer RGB565 panel: memory for exactly one frame.
    pub fn single_rgb565(xres: u32, yres: u32) -> Self {
        Self::new(xres, yres, 16, xres * yres * 2)
    }

    /// RGB565 panel with room for two frames.
    pub fn double_rgb565(xres: u32, yres: u32) -> Self {
        Self::new(xres, yres, 16, xres * yres * 4)
    }

    pub fn with_id(mut self, id: &str) -> Self {
        self.fix.set_id(id);
        self
    }
}

impl FbDevice for FakeFramebuffer {
    fn var_screen_info(&mut self) -> GrResult<VarScreenInfo> {
        Ok(self.var)
    }

    fn put_var_screen_info(&mut self, vi: &VarScreenInfo) -> GrResult<()> {
        self.puts.push(*vi);
        if let Some(limit) = self.fail_put_after {
            if self.puts.len() > limit {
                return Err(GrError::PutScreenInfo(libc::EINVAL));
            }
        }
        self.var = *vi;
        let align = self.line_align.max(1);
        let padded = (vi.xres + align - 1) / align * align;
        self.fix.line_length = padded * vi.bits_per_pixel / 8;
        Ok(())
    }

    fn fix_screen_info(&mut self) -> GrResult<FixScreenInfo> {
        if self.fail_fix {
            return Err(GrError::ScreenInfo(libc::EIO));
        }
        Ok(self.fix)
    }

    fn blank(&mut self, blank: bool) -> GrResult<()> {
        self.blanks.push(blank);
        Ok(())
    }

    fn map(&mut self, len: usize) -> GrResult<FrameMemory> {
        Ok(FrameMemory::Heap(vec![self.fill; len]))
    }

    fn raw_fd(&self) -> RawFd {
        -1
    }
}
