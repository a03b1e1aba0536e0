//! Source media description as reported by an external metadata provider.
//!
//! [`MediaDescriptor`] holds raw MediaInfo-style strings plus numeric stream
//! attributes. It is read-only to the engine; typed views are derived on
//! demand through the `*_codec()` accessors.

use serde::{Deserialize, Serialize};

use crate::media::{AudioCodec, CodecProfile, Container, VideoCodec};

/// Video stream attributes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoStream {
    pub format: String,
    pub profile: Option<String>,
    pub version: Option<u32>,
    pub codec_id: Option<String>,
    pub bit_rate: Option<u64>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub frame_rate: Option<f64>,
}

impl VideoStream {
    pub fn new(format: impl Into<String>) -> Self {
        Self {
            format: format.into(),
            ..Self::default()
        }
    }

    pub fn profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = Some(profile.into());
        self
    }

    pub fn version(mut self, version: u32) -> Self {
        self.version = Some(version);
        self
    }

    pub fn codec_id(mut self, codec_id: impl Into<String>) -> Self {
        self.codec_id = Some(codec_id.into());
        self
    }

    pub fn bit_rate(mut self, bit_rate: u64) -> Self {
        self.bit_rate = Some(bit_rate);
        self
    }

    pub fn resolution(mut self, width: u32, height: u32) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    pub fn frame_rate(mut self, fps: f64) -> Self {
        self.frame_rate = Some(fps);
        self
    }
}

/// Audio stream attributes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioStream {
    pub format: String,
    pub profile: Option<String>,
    pub version: Option<u32>,
    pub codec_id: Option<String>,
    pub bit_rate: Option<u64>,
    pub channels: Option<u32>,
    pub sample_rate: Option<u32>,
}

impl AudioStream {
    pub fn new(format: impl Into<String>) -> Self {
        Self {
            format: format.into(),
            ..Self::default()
        }
    }

    pub fn profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = Some(profile.into());
        self
    }

    pub fn version(mut self, version: u32) -> Self {
        self.version = Some(version);
        self
    }

    pub fn bit_rate(mut self, bit_rate: u64) -> Self {
        self.bit_rate = Some(bit_rate);
        self
    }

    pub fn channels(mut self, channels: u32) -> Self {
        self.channels = Some(channels);
        self
    }

    pub fn sample_rate(mut self, hz: u32) -> Self {
        self.sample_rate = Some(hz);
        self
    }
}

/// Immutable description of one source media item.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MediaDescriptor {
    /// Container format string, e.g. `"AVI"` or `"MPEG-4"`.
    pub container: String,
    pub video: Option<VideoStream>,
    pub audio: Option<AudioStream>,
}

impl MediaDescriptor {
    pub fn new(container: impl Into<String>) -> Self {
        Self {
            container: container.into(),
            video: None,
            audio: None,
        }
    }

    pub fn with_video(mut self, video: VideoStream) -> Self {
        self.video = Some(video);
        self
    }

    pub fn with_audio(mut self, audio: AudioStream) -> Self {
        self.audio = Some(audio);
        self
    }

    pub fn container_format(&self) -> Option<Container> {
        Container::classify(&self.container)
    }

    pub fn video_codec(&self) -> Option<VideoCodec> {
        let v = self.video.as_ref()?;
        VideoCodec::classify(&v.format, v.version, v.codec_id.as_deref())
    }

    pub fn video_profile(&self) -> Option<CodecProfile> {
        self.video
            .as_ref()
            .and_then(|v| v.profile.as_deref())
            .and_then(CodecProfile::classify)
    }

    pub fn audio_codec(&self) -> Option<AudioCodec> {
        let a = self.audio.as_ref()?;
        AudioCodec::classify(&a.format, a.profile.as_deref(), a.version)
    }

    pub fn video_bit_rate(&self) -> Option<u64> {
        self.video.as_ref().and_then(|v| v.bit_rate)
    }

    pub fn width(&self) -> Option<u32> {
        self.video.as_ref().and_then(|v| v.width)
    }

    pub fn height(&self) -> Option<u32> {
        self.video.as_ref().and_then(|v| v.height)
    }

    pub fn frame_rate(&self) -> Option<f64> {
        self.video.as_ref().and_then(|v| v.frame_rate)
    }

    pub fn audio_bit_rate(&self) -> Option<u64> {
        self.audio.as_ref().and_then(|a| a.bit_rate)
    }

    pub fn channels(&self) -> Option<u32> {
        self.audio.as_ref().and_then(|a| a.channels)
    }

    pub fn sample_rate(&self) -> Option<u32> {
        self.audio.as_ref().and_then(|a| a.sample_rate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typed_views() {
        let d = MediaDescriptor::new("AVI")
            .with_video(
                VideoStream::new("MPEG-4 Visual")
                    .profile("Advanced Simple@L5")
                    .bit_rate(3_000_000)
                    .resolution(1280, 720)
                    .frame_rate(25.0),
            )
            .with_audio(AudioStream::new("AC-3").channels(6));

        assert_eq!(d.container_format(), Some(Container::Avi));
        assert_eq!(d.video_codec(), Some(VideoCodec::Mpeg4Part2));
        assert_eq!(d.video_profile(), Some(CodecProfile::AdvancedSimple));
        assert_eq!(d.audio_codec(), Some(AudioCodec::Ac3));
        assert_eq!(d.channels(), Some(6));
        assert_eq!(d.width(), Some(1280));
    }

    #[test]
    fn audio_only_has_no_video_view() {
        let d = MediaDescriptor::new("MPEG Audio")
            .with_audio(AudioStream::new("MPEG Audio").profile("Layer 3").version(1));
        assert_eq!(d.video_codec(), None);
        assert_eq!(d.frame_rate(), None);
        assert_eq!(d.audio_codec(), Some(AudioCodec::Mp3));
    }

    #[test]
    fn deserializes_sparse_json() {
        let json = r#"{
            "container": "MPEG-4",
            "video": { "format": "AVC", "profile": "High@L4.1", "width": 1920, "height": 1080 },
            "audio": { "format": "AAC", "profile": "LC", "channels": 2 }
        }"#;
        let d: MediaDescriptor = serde_json::from_str(json).unwrap();
        assert_eq!(d.video_codec(), Some(VideoCodec::H264));
        assert_eq!(d.video_bit_rate(), None);
        assert_eq!(d.audio_codec(), Some(AudioCodec::AacLc));
    }
}
