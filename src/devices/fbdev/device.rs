//! Framebuffer device access
//!
//! [`FbDevice`] is the seam between the probe/publisher and the kernel; the
//! Linux implementation issues the fbdev ioctls and maps frame memory.

use std::fs::{File, OpenOptions};
use std::ops::{Deref, DerefMut};
use std::os::unix::io::{AsRawFd, RawFd};
use std::path::Path;
use std::ptr::NonNull;

use super::sys::{
    FixScreenInfo, VarScreenInfo, FBIOBLANK, FBIOGET_FSCREENINFO, FBIOGET_VSCREENINFO,
    FBIOPUT_VSCREENINFO, FB_BLANK_POWERDOWN, FB_BLANK_UNBLANK,
};
use crate::error::{GrError, GrResult};

/// Operations the display layer needs from a framebuffer device
pub trait FbDevice {
    fn var_screen_info(&mut self) -> GrResult<VarScreenInfo>;
    fn put_var_screen_info(&mut self, vi: &VarScreenInfo) -> GrResult<()>;
    fn fix_screen_info(&mut self) -> GrResult<FixScreenInfo>;
    fn blank(&mut self, blank: bool) -> GrResult<()>;
    /// Maps `len` bytes of frame memory, shared with the display.
    fn map(&mut self, len: usize) -> GrResult<FrameMemory>;
    /// Descriptor handed to the overlay backend; `-1` when there is none.
    fn raw_fd(&self) -> RawFd;
}

/// Frame memory shared with the display hardware
pub enum FrameMemory {
    Device(DeviceMapping),
    /// Plain memory, for devices that are not backed by a kernel mapping
    Heap(Vec<u8>),
}

impl Deref for FrameMemory {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        match self {
            FrameMemory::Device(m) => m.as_slice(),
            FrameMemory::Heap(v) => v,
        }
    }
}

impl DerefMut for FrameMemory {
    fn deref_mut(&mut self) -> &mut [u8] {
        match self {
            FrameMemory::Device(m) => m.as_mut_slice(),
            FrameMemory::Heap(v) => v,
        }
    }
}

/// A `MAP_SHARED` mapping, unmapped on drop
pub struct DeviceMapping {
    ptr: NonNull<u8>,
    len: usize,
}

// The mapping is plain memory owned by this value; no thread affinity.
unsafe impl Send for DeviceMapping {}

impl DeviceMapping {
    fn map(fd: RawFd, len: usize) -> GrResult<Self> {
        // SAFETY: a fresh shared mapping of `len` bytes at offset 0 of `fd`;
        // the kernel validates the length against the device memory.
        let bits = unsafe {
            libc::mmap(
                core::ptr::null_mut(),
                len,
                libc::PROT_READ | libc::PROT_WRITE,
                libc::MAP_SHARED,
                fd,
                0,
            )
        };
        if bits == libc::MAP_FAILED {
            return Err(GrError::last_os(GrError::Map));
        }
        let ptr = NonNull::new(bits as *mut u8).ok_or(GrError::Map(0))?;
        Ok(Self { ptr, len })
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn as_slice(&self) -> &[u8] {
        // SAFETY: ptr/len describe a live mapping for as long as self exists
        unsafe { core::slice::from_raw_parts(self.ptr.as_ptr(), self.len) }
    }

    fn as_mut_slice(&mut self) -> &mut [u8] {
        // SAFETY: as above, and &mut self guarantees exclusive access
        unsafe { core::slice::from_raw_parts_mut(self.ptr.as_ptr(), self.len) }
    }
}

impl Drop for DeviceMapping {
    fn drop(&mut self) {
        // SAFETY: unmapping exactly the region returned by mmap
        unsafe {
            libc::munmap(self.ptr.as_ptr() as *mut libc::c_void, self.len);
        }
    }
}

/// `/dev/graphics/fb0` and friends
pub struct LinuxFramebuffer {
    file: File,
}

impl LinuxFramebuffer {
    pub fn open(path: &Path) -> GrResult<Self> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(path)
            .map_err(|e| GrError::from_io(GrError::OpenDevice, &e))?;
        Ok(Self { file })
    }

    fn ioctl(&self, request: u32, arg: *mut libc::c_void, err: fn(i32) -> GrError) -> GrResult<()> {
        // SAFETY: every request used here takes a pointer to the matching
        // repr(C) struct, or an integer passed through the pointer slot.
        let ret = unsafe { libc::ioctl(self.file.as_raw_fd(), request as _, arg) };
        if ret < 0 {
            return Err(GrError::last_os(err));
        }
        Ok(())
    }
}

impl FbDevice for LinuxFramebuffer {
    fn var_screen_info(&mut self) -> GrResult<VarScreenInfo> {
        let mut vi = VarScreenInfo::default();
        self.ioctl(FBIOGET_VSCREENINFO, (&mut vi as *mut VarScreenInfo).cast(), GrError::ScreenInfo)?;
        Ok(vi)
    }

    fn put_var_screen_info(&mut self, vi: &VarScreenInfo) -> GrResult<()> {
        let mut vi = *vi;
        self.ioctl(
            FBIOPUT_VSCREENINFO,
            (&mut vi as *mut VarScreenInfo).cast(),
            GrError::PutScreenInfo,
        )
    }

    fn fix_screen_info(&mut self) -> GrResult<FixScreenInfo> {
        let mut fi = FixScreenInfo::default();
        self.ioctl(FBIOGET_FSCREENINFO, (&mut fi as *mut FixScreenInfo).cast(), GrError::ScreenInfo)?;
        Ok(fi)
    }

    fn blank(&mut self, blank: bool) -> GrResult<()> {
        let level = if blank { FB_BLANK_POWERDOWN } else { FB_BLANK_UNBLANK };
        self.ioctl(FBIOBLANK, level as usize as *mut libc::c_void, GrError::Blank)
    }

    fn map(&mut self, len: usize) -> GrResult<FrameMemory> {
        DeviceMapping::map(self.file.as_raw_fd(), len).map(FrameMemory::Device)
    }

    fn raw_fd(&self) -> RawFd {
        self.file.as_raw_fd()
    }
}
