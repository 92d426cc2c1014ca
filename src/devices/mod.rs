pub mod fbdev;
pub mod framebuffer;
