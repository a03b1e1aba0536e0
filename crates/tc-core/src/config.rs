//! Engine configuration types.
//!
//! The top-level [`Config`] struct carries the scratch directory, tool
//! overrides, transcoding policy and event settings. Every section defaults
//! sensibly so a completely empty `{}` (or empty TOML file) is valid.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::error::Result;
use crate::pipeline::EncodePreset;
use crate::Error;

// ---------------------------------------------------------------------------
// Top-level Config
// ---------------------------------------------------------------------------

/// Root engine configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub scratch: ScratchConfig,
    pub tools: ToolsConfig,
    pub transcode: TranscodeConfig,
    pub events: EventsConfig,
}

impl Config {
    /// Deserialize a `Config` from a JSON string.
    pub fn from_json(json_str: &str) -> Result<Self> {
        serde_json::from_str(json_str)
            .map_err(|e| Error::Validation(format!("config parse error: {e}")))
    }

    /// Return a list of validation warnings (non-fatal issues).
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        if self.scratch.dir.is_relative() {
            warnings.push(format!(
                "scratch.dir '{}' is relative; it will move with the working directory",
                self.scratch.dir.display()
            ));
        }

        if let Some(ref p) = self.tools.ffmpeg_path {
            if !p.exists() {
                warnings.push(format!(
                    "tools.ffmpeg_path '{}' does not exist; falling back to PATH",
                    p.display()
                ));
            }
        }

        if self.transcode.audio_channels == 0 {
            warnings.push("transcode.audio_channels is 0; re-encoded audio will be dropped by the encoder".into());
        }

        if !is_bitrate(&self.transcode.audio_bitrate) {
            warnings.push(format!(
                "transcode.audio_bitrate '{}' is not of the form <number>[k|M]",
                self.transcode.audio_bitrate
            ));
        }

        if self.transcode.shutdown_grace_secs == 0 {
            warnings.push("transcode.shutdown_grace_secs is 0; running jobs are killed without a graceful stop".into());
        }

        if self.events.capacity == 0 {
            warnings.push("events.capacity is 0; using 1".into());
        }

        warnings
    }
}

fn is_bitrate(s: &str) -> bool {
    let digits = s.trim_end_matches(&['k', 'K', 'M'][..]);
    !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit())
}

// ---------------------------------------------------------------------------
// Sub-configs
// ---------------------------------------------------------------------------

/// Process-lifetime scratch directory for transcode outputs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScratchConfig {
    pub dir: PathBuf,
}

impl Default for ScratchConfig {
    fn default() -> Self {
        Self {
            dir: std::env::temp_dir().join("transcast"),
        }
    }
}

/// Paths to external tools; `None` means search `PATH`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolsConfig {
    pub ffmpeg_path: Option<PathBuf>,
    pub ffprobe_path: Option<PathBuf>,
}

/// Transcoding policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranscodeConfig {
    /// Quality preset for video re-encodes.
    pub preset: EncodePreset,
    /// Bitrate for re-encoded audio.
    pub audio_bitrate: String,
    /// Channel ceiling for re-encoded audio.
    pub audio_channels: u32,
    /// Produce fragmented MP4 on re-encode paths.
    pub fragmented_mp4: bool,
    /// How long a stopped process may take to exit before it is killed.
    pub shutdown_grace_secs: u64,
}

impl Default for TranscodeConfig {
    fn default() -> Self {
        Self {
            preset: EncodePreset::Fast,
            audio_bitrate: "192k".into(),
            audio_channels: 2,
            fragmented_mp4: true,
            shutdown_grace_secs: 10,
        }
    }
}

impl TranscodeConfig {
    pub fn shutdown_grace(&self) -> Duration {
        Duration::from_secs(self.shutdown_grace_secs)
    }
}

/// Event bus settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EventsConfig {
    /// Broadcast channel capacity.
    pub capacity: usize,
}

impl Default for EventsConfig {
    fn default() -> Self {
        Self { capacity: 256 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_json_is_default() {
        let config = Config::from_json("{}").unwrap();
        assert_eq!(config.transcode.preset, EncodePreset::Fast);
        assert_eq!(config.transcode.audio_channels, 2);
        assert!(config.scratch.dir.ends_with("transcast"));
        assert!(config.validate().is_empty());
    }

    #[test]
    fn partial_override() {
        let config = Config::from_json(r#"{"transcode": {"preset": "slow"}}"#).unwrap();
        assert_eq!(config.transcode.preset, EncodePreset::Slow);
        assert_eq!(config.transcode.audio_bitrate, "192k");
    }

    #[test]
    fn parse_error_is_validation() {
        let err = Config::from_json("{not json").unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn validate_flags_bad_values() {
        let mut config = Config::default();
        config.transcode.audio_bitrate = "loud".into();
        config.transcode.audio_channels = 0;
        config.transcode.shutdown_grace_secs = 0;
        config.events.capacity = 0;
        config.tools.ffmpeg_path = Some(PathBuf::from("/nonexistent/ffmpeg_xyz"));
        let warnings = config.validate();
        assert_eq!(warnings.len(), 5, "{warnings:?}");
    }

    #[test]
    fn bitrate_forms() {
        assert!(is_bitrate("192k"));
        assert!(is_bitrate("1M"));
        assert!(is_bitrate("128000"));
        assert!(!is_bitrate("k"));
        assert!(!is_bitrate("12.5k"));
    }
}
