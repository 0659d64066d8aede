//! Session configuration.
//!
//! Every field has a per-backend default ([`SessionConfig::chip`],
//! [`SessionConfig::module`]). JSON documents only need to name the fields
//! they override.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    CHIP_BUFFER_FRAMES, DEFAULT_CHIP_SAMPLE_RATE, DEFAULT_MODULE_SAMPLE_RATE, DEFAULT_REFRESH_HZ,
    MODULE_BUFFER_FRAMES, sample_rate_or,
};

/// Largest accepted block size in frames.
const MAX_BUFFER_FRAMES: usize = 65_536;

/// Errors raised while reading a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The document is not valid JSON for this schema.
    #[error("invalid configuration JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// A field is outside its accepted range.
    #[error("invalid value for '{field}': {reason}")]
    OutOfRange {
        /// Offending field name.
        field: &'static str,
        /// Accepted range.
        reason: &'static str,
    },
}

/// Tunable parameters of a playback session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Output sample rate in Hz.
    pub sample_rate: u32,
    /// Frames rendered per `compute` call.
    pub buffer_frames: usize,
    /// Tick rate used when a player reports none (chip session).
    pub default_refresh_hz: f32,
    /// Repeat count applied at load: `-1` infinite, `0` none, `n` extra plays
    /// (module session).
    pub repeat_count: i32,
    /// Initial loop flag handed to players (chip session).
    pub loop_enabled: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigOverrides {
    sample_rate: Option<u32>,
    buffer_frames: Option<usize>,
    default_refresh_hz: Option<f32>,
    repeat_count: Option<i32>,
    loop_enabled: Option<bool>,
}

impl SessionConfig {
    /// Defaults for the tick-driven chip session.
    pub fn chip() -> Self {
        Self {
            sample_rate: DEFAULT_CHIP_SAMPLE_RATE,
            buffer_frames: CHIP_BUFFER_FRAMES,
            default_refresh_hz: DEFAULT_REFRESH_HZ,
            repeat_count: 0,
            loop_enabled: false,
        }
    }

    /// Defaults for the frame-pull module session.
    pub fn module() -> Self {
        Self {
            sample_rate: DEFAULT_MODULE_SAMPLE_RATE,
            buffer_frames: MODULE_BUFFER_FRAMES,
            ..Self::chip()
        }
    }

    /// Parse a JSON document, filling absent fields from `base`.
    pub fn from_json(json: &str, base: SessionConfig) -> Result<Self, ConfigError> {
        let overrides: ConfigOverrides = serde_json::from_str(json)?;
        let config = Self {
            sample_rate: overrides.sample_rate.unwrap_or(base.sample_rate),
            buffer_frames: overrides.buffer_frames.unwrap_or(base.buffer_frames),
            default_refresh_hz: overrides
                .default_refresh_hz
                .unwrap_or(base.default_refresh_hz),
            repeat_count: overrides.repeat_count.unwrap_or(base.repeat_count),
            loop_enabled: overrides.loop_enabled.unwrap_or(base.loop_enabled),
        };
        config.validate()?;
        Ok(config)
    }

    /// Serialize to JSON.
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Copy with a host-requested rate; non-positive requests select
    /// `fallback`.
    pub fn with_sample_rate(&self, requested: i32, fallback: u32) -> Self {
        Self {
            sample_rate: sample_rate_or(requested, fallback),
            ..self.clone()
        }
    }

    /// Check every field range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sample_rate == 0 {
            return Err(ConfigError::OutOfRange {
                field: "sample_rate",
                reason: "must be > 0",
            });
        }
        if self.buffer_frames == 0 || self.buffer_frames > MAX_BUFFER_FRAMES {
            return Err(ConfigError::OutOfRange {
                field: "buffer_frames",
                reason: "must be in 1..=65536",
            });
        }
        if !(self.default_refresh_hz.is_finite() && self.default_refresh_hz > 0.0) {
            return Err(ConfigError::OutOfRange {
                field: "default_refresh_hz",
                reason: "must be a positive number",
            });
        }
        Ok(())
    }
}
