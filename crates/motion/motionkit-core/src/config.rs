//! Core configuration for motionkit-core.

use serde::{Deserialize, Serialize};

use crate::error::MotionError;
use crate::timeline::default_palette;

/// Top-level configuration. Every field has a default so adapters can pass
/// partial JSON.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub playback: PlaybackConfig,
    /// Bar colours for the visual timeline.
    pub palette: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Scrub bar width in pixels. Zero until the host measures the bar;
    /// pointer positions map to time 0 while it is unset.
    pub scrub_width: f64,
    /// Start the per-frame progress loop as soon as the controller is built.
    pub auto_poll: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            playback: PlaybackConfig::default(),
            palette: default_palette(),
        }
    }
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            scrub_width: 0.0,
            auto_poll: true,
        }
    }
}

impl Config {
    pub fn from_json(s: &str) -> Result<Self, MotionError> {
        Ok(serde_json::from_str(s)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg = Config::from_json(r#"{ "playback": { "scrub_width": 640 } }"#).unwrap();
        assert_eq!(cfg.playback.scrub_width, 640.0);
        assert!(cfg.playback.auto_poll);
        assert_eq!(cfg.palette.len(), 8);
    }

    #[test]
    fn malformed_json_is_a_config_error() {
        let err = Config::from_json("{ playback: ").unwrap_err();
        assert_eq!(err.category(), "config");
    }
}
