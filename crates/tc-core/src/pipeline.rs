//! Transcoding pipeline specification.
//!
//! A [`PipelineSpec`] is produced once by the planner and consumed by the
//! process supervisor. It is never mutated after creation; a new request
//! gets a new spec with a new [`PipelineId`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::ids::PipelineId;
use crate::media::{AudioCodec, Container, VideoCodec};
use crate::profile::DeliveryProfile;
use crate::Error;

// ---------------------------------------------------------------------------
// SourceLocation
// ---------------------------------------------------------------------------

/// One input of a pipeline: a local path or an already-resolved transport
/// address, plus options the tool must apply when opening it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceLocation {
    pub address: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub input_options: Vec<String>,
}

impl SourceLocation {
    /// A local file path with no input options.
    pub fn local(path: impl Into<String>) -> Self {
        Self {
            address: path.into(),
            input_options: Vec::new(),
        }
    }

    /// A remote address with per-address input options (headers, protocol
    /// flags) supplied by the remote-source resolver.
    pub fn remote(address: impl Into<String>, input_options: Vec<String>) -> Self {
        Self {
            address: address.into(),
            input_options,
        }
    }

    /// Whether the address is a URL rather than a filesystem path.
    pub fn is_remote(&self) -> bool {
        self.address.contains("://")
    }
}

// ---------------------------------------------------------------------------
// OutputContainer
// ---------------------------------------------------------------------------

/// Containers the planner can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputContainer {
    Avi,
    Mp4,
    /// MP4 with fragmented moov so playback can begin before the encode ends.
    FragmentedMp4,
}

impl OutputContainer {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Avi => "avi",
            Self::Mp4 | Self::FragmentedMp4 => "mp4",
        }
    }

    pub fn container(&self) -> Container {
        match self {
            Self::Avi => Container::Avi,
            Self::Mp4 | Self::FragmentedMp4 => Container::Mp4,
        }
    }

    pub fn mime_type(&self) -> &'static str {
        self.container().mime_type()
    }
}

impl fmt::Display for OutputContainer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Avi => write!(f, "avi"),
            Self::Mp4 => write!(f, "mp4"),
            Self::FragmentedMp4 => write!(f, "fragmented_mp4"),
        }
    }
}

// ---------------------------------------------------------------------------
// EncodePreset
// ---------------------------------------------------------------------------

/// Named encoder quality preset. Slower presets spend more time per frame
/// for better compression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EncodePreset {
    #[default]
    Fast,
    Medium,
    Slow,
}

impl fmt::Display for EncodePreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fast => write!(f, "fast"),
            Self::Medium => write!(f, "medium"),
            Self::Slow => write!(f, "slow"),
        }
    }
}

impl FromStr for EncodePreset {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "fast" => Ok(Self::Fast),
            "medium" => Ok(Self::Medium),
            "slow" => Ok(Self::Slow),
            other => Err(Error::Validation(format!("unknown encode preset '{other}'"))),
        }
    }
}

// ---------------------------------------------------------------------------
// Stream modes
// ---------------------------------------------------------------------------

/// How the video stream is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum VideoMode {
    Copy,
    Encode { codec: VideoCodec, preset: EncodePreset },
}

/// How the audio stream is handled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum AudioMode {
    Copy,
    Encode {
        codec: AudioCodec,
        /// Forced channel ceiling (downmix).
        channels: u32,
        /// Target bitrate in ffmpeg notation, e.g. `"192k"`.
        bitrate: String,
    },
}

// ---------------------------------------------------------------------------
// PipelineSpec
// ---------------------------------------------------------------------------

/// Everything the supervisor needs to run one transcode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineSpec {
    pub id: PipelineId,
    /// Inputs in playback order.
    pub inputs: Vec<SourceLocation>,
    pub output: PathBuf,
    /// Concat list written before launch when there is more than one input.
    pub concat_list: Option<PathBuf>,
    pub container: OutputContainer,
    pub video: VideoMode,
    pub audio: AudioMode,
    /// Codec of the produced video stream.
    pub video_codec: VideoCodec,
    /// Delivery profile announced for the produced output.
    pub profile: DeliveryProfile,
}

impl PipelineSpec {
    pub fn mime_type(&self) -> &'static str {
        self.container.mime_type()
    }

    /// True when neither stream is re-encoded.
    pub fn is_stream_copy(&self) -> bool {
        matches!(self.video, VideoMode::Copy) && matches!(self.audio, AudioMode::Copy)
    }
}
