//! # bootgfx
//!
//! Display output layer for boot-time and recovery UIs on the Linux
//! framebuffer. A [`Graphics`] session probes `/dev/graphics/fb0` (or any
//! fbdev node), negotiates the pixel format, maps one or two physical
//! frames and publishes an off-screen composition surface on `flip`.
//!
//! Drawing goes through the [`Rasterizer`] seam; text is rendered from a
//! run-length encoded [`FontAsset`] with full UTF-8 decoding.

pub mod devices;
pub mod display;
pub mod error;
pub mod font;
pub mod global;
pub mod graphics;
pub mod overlay;
pub mod raster;
pub mod settings;
pub mod utf8;

pub use devices::fbdev::{FbDevice, LinuxFramebuffer};
pub use devices::framebuffer::{Color, PixelFormat, Surface, SurfaceInfo, Texture};
pub use display::{DisplayConfig, MAX_DISPLAY_DIM};
pub use error::{GrError, GrResult};
pub use font::{FontAsset, GlyphAtlas};
pub use global::{exit_graphics, init_graphics, with_graphics};
pub use graphics::{Graphics, TextRun};
pub use overlay::{NoOverlay, Overlay};
pub use raster::{Rasterizer, Rect, SoftRaster};
pub use settings::DisplaySettings;
