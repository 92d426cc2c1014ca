//! Error type shared by the probe, the surface manager and the publisher.

use core::fmt;

/// Result type for this crate
pub type GrResult<T> = Result<T, GrError>;

/// Display layer errors
///
/// Device errors carry the `errno` observed when the request failed.
/// Overlay errors carry the negative code returned by the overlay backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrError {
    OpenDevice(i32),
    ScreenInfo(i32),
    PutScreenInfo(i32),
    Map(i32),
    Terminal(i32),
    Blank(i32),
    Backlight(i32),
    Overlay(i32),
    Unsupported,
}

impl GrError {
    /// Negative status code for callers that speak the C-style contract.
    pub fn as_errno(self) -> i32 {
        let code = match self {
            Self::OpenDevice(e)
            | Self::ScreenInfo(e)
            | Self::PutScreenInfo(e)
            | Self::Map(e)
            | Self::Terminal(e)
            | Self::Blank(e)
            | Self::Backlight(e) => e,
            Self::Overlay(code) => code,
            Self::Unsupported => libc::EOPNOTSUPP,
        };
        match code {
            0 => -1,
            c if c < 0 => c,
            c => -c,
        }
    }

    pub(crate) fn last_os(make: fn(i32) -> GrError) -> GrError {
        make(std::io::Error::last_os_error().raw_os_error().unwrap_or(0))
    }

    pub(crate) fn from_io(make: fn(i32) -> GrError, err: &std::io::Error) -> GrError {
        make(err.raw_os_error().unwrap_or(0))
    }
}

impl fmt::Display for GrError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GrError::OpenDevice(e) => write!(f, "cannot open framebuffer device (errno {})", e),
            GrError::ScreenInfo(e) => write!(f, "failed to get screen info (errno {})", e),
            GrError::PutScreenInfo(e) => write!(f, "failed to put screen info (errno {})", e),
            GrError::Map(e) => write!(f, "failed to mmap framebuffer (errno {})", e),
            GrError::Terminal(e) => write!(f, "failed to switch terminal mode (errno {})", e),
            GrError::Blank(e) => write!(f, "blank request rejected (errno {})", e),
            GrError::Backlight(e) => write!(f, "cannot drive LCD backlight (errno {})", e),
            GrError::Overlay(code) => write!(f, "overlay backend failed ({})", code),
            GrError::Unsupported => write!(f, "operation not supported by this device"),
        }
    }
}

impl std::error::Error for GrError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_errno_is_negative() {
        assert_eq!(GrError::OpenDevice(2).as_errno(), -2);
        assert_eq!(GrError::Overlay(-5).as_errno(), -5);
        assert_eq!(GrError::Map(0).as_errno(), -1);
        assert_eq!(GrError::Unsupported.as_errno(), -libc::EOPNOTSUPP);
    }

    #[test]
    fn test_display_mentions_errno() {
        let msg = GrError::ScreenInfo(25).to_string();
        assert!(msg.contains("25"));
    }
}
