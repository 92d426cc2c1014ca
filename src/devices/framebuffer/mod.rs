//! # Framebuffer Pixel Model
//!
//! Pixel-level building blocks shared by the display probe, the raster
//! engine and the frame publisher.
//!
//! ## Modules
//!
//! - `color`: `Color` type and the fixed-point channel expansion
//! - `format`: `PixelFormat` with device channel layouts and pixel packing
//! - `surface`: owned `Surface` and borrowed `Texture` views
//!
//! ## Ownership
//!
//! Surfaces own heap memory. Physical frames live in the device mapping
//! (see `devices::fbdev`) and are never drawn into directly: drawing always
//! targets the composition surface, which the publisher copies out.

pub mod color;
pub mod format;
pub mod surface;

pub use color::Color;
pub use format::{ChannelLayout, PixelFormat};
pub use surface::{Surface, SurfaceInfo, Texture};
