//! # Display Configuration and Physical Buffers
//!
//! - `probe`: one-shot detection of geometry, overlay capability, split
//!   panels and overscan, plus channel reconfiguration for direct scan-out
//! - `buffers`: the one or two physical frames the publisher writes to

pub mod buffers;
pub mod probe;

pub use buffers::{FrameBuffers, NUM_BUFFERS};
pub use probe::{parse_split, probe, DisplayConfig, Probe, MAX_DISPLAY_DIM};
