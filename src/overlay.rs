//! Hardware overlay backend seam
//!
//! Overlay-capable display controllers scan out of contiguous (ION) memory
//! through an overlay pipe instead of the framebuffer mapping. The backend
//! is chip specific and lives outside this crate; [`NoOverlay`] stands in on
//! plain fbdev hardware.

use std::os::unix::io::RawFd;

use crate::devices::framebuffer::SurfaceInfo;
use crate::error::{GrError, GrResult};

pub trait Overlay {
    /// Whether the controller identified by `fb_id` scans out via overlay.
    fn target_has_overlay(&self, fb_id: &str) -> bool;

    /// Whether the controller may drive a split (dual-pipe) panel.
    fn is_target_mdp5(&self) -> bool;

    /// Reserves contiguous memory for one frame of `size` bytes.
    fn alloc_ion_mem(&mut self, size: usize) -> GrResult<()>;

    fn free_ion_mem(&mut self);

    /// Claims an overlay pipe for `frame`. A no-op when one is already held.
    fn allocate_overlay(&mut self, fb_fd: RawFd, frame: &SurfaceInfo) -> GrResult<()>;

    fn free_overlay(&mut self, fb_fd: RawFd);

    /// Queues one full frame for scan-out.
    fn display_frame(&mut self, fb_fd: RawFd, data: &[u8]) -> GrResult<()>;
}

/// Backend for controllers without overlay support
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOverlay;

impl Overlay for NoOverlay {
    fn target_has_overlay(&self, _fb_id: &str) -> bool {
        false
    }

    fn is_target_mdp5(&self) -> bool {
        false
    }

    fn alloc_ion_mem(&mut self, _size: usize) -> GrResult<()> {
        Err(GrError::Unsupported)
    }

    fn free_ion_mem(&mut self) {}

    fn allocate_overlay(&mut self, _fb_fd: RawFd, _frame: &SurfaceInfo) -> GrResult<()> {
        Err(GrError::Unsupported)
    }

    fn free_overlay(&mut self, _fb_fd: RawFd) {}

    fn display_frame(&mut self, _fb_fd: RawFd, _data: &[u8]) -> GrResult<()> {
        Err(GrError::Unsupported)
    }
}
