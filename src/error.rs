//! Error types
//!
//! Nothing here is fatal: every caller degrades to "skip this effect".

use std::fmt;

/// Drawing surface could not be acquired for this frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceError {
    /// Canvas element is gone (unmounted or never present)
    MissingCanvas,
    /// Canvas exists but refused a 2D context
    MissingContext,
}

impl fmt::Display for SurfaceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SurfaceError::MissingCanvas => write!(f, "drawing surface unavailable"),
            SurfaceError::MissingContext => write!(f, "2d drawing context unavailable"),
        }
    }
}

impl std::error::Error for SurfaceError {}

/// Pointer capture failed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureError {
    /// Platform has no pointer capture
    Unsupported,
    /// Platform refused (e.g. pointer already released)
    Rejected(String),
}

impl fmt::Display for CaptureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaptureError::Unsupported => write!(f, "pointer capture unsupported"),
            CaptureError::Rejected(reason) => write!(f, "pointer capture rejected: {reason}"),
        }
    }
}

impl std::error::Error for CaptureError {}

/// Engine configuration could not be read
#[derive(Debug)]
pub enum ConfigError {
    Parse(serde_json::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Parse(e) => write!(f, "invalid engine config: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Parse(e) => Some(e),
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Parse(e)
    }
}
