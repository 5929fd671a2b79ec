//! Error types for motionkit-core.
//!
//! The matrix, origin and packing primitives are total and never return
//! these; errors come from the playback controller, checked constructors
//! for untrusted input, and config loading.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum MotionError {
    /// A playback operation ran with no engine handle attached, e.g. after
    /// teardown.
    #[error("animation engine is not attached (operation: {operation})")]
    EngineDetached { operation: &'static str },

    #[error("invalid interval: start={start} end={end}")]
    InvalidInterval { start: f64, end: f64 },

    #[error("config error: {0}")]
    Config(String),
}

impl MotionError {
    /// Short tag for log lines.
    #[inline]
    pub fn category(&self) -> &'static str {
        match self {
            Self::EngineDetached { .. } => "playback",
            Self::InvalidInterval { .. } => "validation",
            Self::Config(_) => "config",
        }
    }
}

impl From<serde_json::Error> for MotionError {
    fn from(err: serde_json::Error) -> Self {
        Self::Config(err.to_string())
    }
}
