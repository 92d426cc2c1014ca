//! # Linux Framebuffer Device Layer
//!
//! - `sys`: `fb_var_screeninfo`/`fb_fix_screeninfo` layouts and request numbers
//! - `device`: `FbDevice` trait, the Linux implementation and frame mappings
//! - `console`: virtual terminal mode switch and backlight control

pub mod console;
pub mod device;
pub mod sys;

#[cfg(test)]
pub(crate) mod fake;

pub use console::{Backlight, VirtualTerminal};
pub use device::{DeviceMapping, FbDevice, FrameMemory, LinuxFramebuffer};
pub use sys::{FbBitfield, FixScreenInfo, VarScreenInfo};
