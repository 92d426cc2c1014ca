//! Kernel framebuffer ABI
//!
//! Layouts mirror `<linux/fb.h>` and `<linux/kd.h>`; the request numbers are
//! the fixed `_IO`-less values the fbdev and console drivers have always used.

use bitflags::bitflags;

pub const FBIOGET_VSCREENINFO: u32 = 0x4600;
pub const FBIOPUT_VSCREENINFO: u32 = 0x4601;
pub const FBIOGET_FSCREENINFO: u32 = 0x4602;
pub const FBIOBLANK: u32 = 0x4611;

pub const FB_BLANK_UNBLANK: u32 = 0;
pub const FB_BLANK_POWERDOWN: u32 = 4;

pub const FB_VMODE_NONINTERLACED: u32 = 0;

pub const KDSETMODE: u32 = 0x4B3A;
pub const KD_TEXT: u32 = 0x00;
pub const KD_GRAPHICS: u32 = 0x01;

bitflags! {
    /// `activate` field of the variable screen info
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Activate: u32 {
        const NXTOPEN = 1;
        const TEST = 2;
        const VBL = 16;
        const ALL = 64;
        const FORCE = 128;
        const INV_MODE = 256;
    }
}

impl Activate {
    /// `FB_ACTIVATE_NOW` is the absence of every other bit.
    pub const NOW: Activate = Activate::empty();
}

/// Position and width of one color channel inside a pixel
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[repr(C)]
pub struct FbBitfield {
    pub offset: u32,
    pub length: u32,
    pub msb_right: u32,
}

impl FbBitfield {
    pub const fn new(offset: u32, length: u32) -> Self {
        Self {
            offset,
            length,
            msb_right: 0,
        }
    }
}

/// `struct fb_var_screeninfo`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[repr(C)]
pub struct VarScreenInfo {
    pub xres: u32,
    pub yres: u32,
    pub xres_virtual: u32,
    pub yres_virtual: u32,
    pub xoffset: u32,
    pub yoffset: u32,
    pub bits_per_pixel: u32,
    pub grayscale: u32,
    pub red: FbBitfield,
    pub green: FbBitfield,
    pub blue: FbBitfield,
    pub transp: FbBitfield,
    pub nonstd: u32,
    pub activate: u32,
    pub height: u32,
    pub width: u32,
    pub accel_flags: u32,
    pub pixclock: u32,
    pub left_margin: u32,
    pub right_margin: u32,
    pub upper_margin: u32,
    pub lower_margin: u32,
    pub hsync_len: u32,
    pub vsync_len: u32,
    pub sync: u32,
    pub vmode: u32,
    pub rotate: u32,
    pub colorspace: u32,
    pub reserved: [u32; 4],
}

/// `struct fb_fix_screeninfo`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[repr(C)]
pub struct FixScreenInfo {
    pub id: [u8; 16],
    pub smem_start: libc::c_ulong,
    pub smem_len: u32,
    pub fb_type: u32,
    pub type_aux: u32,
    pub visual: u32,
    pub xpanstep: u16,
    pub ypanstep: u16,
    pub ywrapstep: u16,
    pub line_length: u32,
    pub mmio_start: libc::c_ulong,
    pub mmio_len: u32,
    pub accel: u32,
    pub capabilities: u16,
    pub reserved: [u16; 2],
}

impl FixScreenInfo {
    /// Driver identification string, up to the first NUL.
    pub fn id_str(&self) -> String {
        let end = self.id.iter().position(|&b| b == 0).unwrap_or(self.id.len());
        String::from_utf8_lossy(&self.id[..end]).into_owned()
    }

    pub fn set_id(&mut self, id: &str) {
        self.id = [0; 16];
        let bytes = id.as_bytes();
        let n = bytes.len().min(self.id.len() - 1);
        self.id[..n].copy_from_slice(&bytes[..n]);
    }
}
