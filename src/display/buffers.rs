//! Physical frame buffers
//!
//! One or two frames carved out of the device mapping. They are publication
//! targets only: the publisher copies whole frames in, nothing draws here.

use crate::devices::fbdev::FrameMemory;
use crate::devices::framebuffer::SurfaceInfo;

pub const NUM_BUFFERS: usize = 2;

pub struct FrameBuffers {
    /// `None` when an overlay backend owns scan-out memory
    memory: Option<FrameMemory>,
    info: SurfaceInfo,
    frame_len: usize,
    count: usize,
}

impl FrameBuffers {
    /// Splits `memory` into frames of `frame_len` bytes and clears them.
    pub fn new(
        memory: Option<FrameMemory>,
        info: SurfaceInfo,
        frame_len: usize,
        double_buffered: bool,
    ) -> Self {
        let count = if double_buffered { NUM_BUFFERS } else { 1 };
        let mut buffers = Self {
            memory,
            info,
            frame_len,
            count,
        };
        for i in 0..count {
            if let Some(frame) = buffers.frame_mut(i) {
                frame.fill(0);
            }
        }
        buffers
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn info(&self) -> SurfaceInfo {
        self.info
    }

    pub fn is_mapped(&self) -> bool {
        self.memory.is_some()
    }

    pub fn frame(&self, index: usize) -> Option<&[u8]> {
        if index >= self.count {
            return None;
        }
        let start = index * self.frame_len;
        self.memory.as_ref()?.get(start..start + self.frame_len)
    }

    pub fn frame_mut(&mut self, index: usize) -> Option<&mut [u8]> {
        if index >= self.count {
            return None;
        }
        let start = index * self.frame_len;
        self.memory.as_mut()?.get_mut(start..start + self.frame_len)
    }
}
