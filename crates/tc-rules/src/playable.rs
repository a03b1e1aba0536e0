//! Direct-play tables.
//!
//! A [`PlayableRow`] is a declarative conjunction of container, codec, audio
//! and ceiling checks. A source is playable on a tier when any of the tier's
//! rows matches, so rows are an ordered disjunction.

use tc_catalog::within;
use tc_core::{AudioCodec, Container, MediaDescriptor, VideoCodec};

use crate::tier::ClientTier;

/// Video ceilings. `None` or an unknown descriptor value always passes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StreamLimits {
    pub max_bit_rate: Option<u64>,
    pub max_width: Option<u32>,
    pub max_height: Option<u32>,
    pub max_frame_rate: Option<f64>,
}

impl StreamLimits {
    pub const fn new(max_bit_rate: u64, max_width: u32, max_height: u32, max_frame_rate: f64) -> Self {
        Self {
            max_bit_rate: Some(max_bit_rate),
            max_width: Some(max_width),
            max_height: Some(max_height),
            max_frame_rate: Some(max_frame_rate),
        }
    }

    pub fn admits(&self, d: &MediaDescriptor) -> bool {
        within(d.video_bit_rate(), self.max_bit_rate)
            && within(d.width(), self.max_width)
            && within(d.height(), self.max_height)
            && within(d.frame_rate(), self.max_frame_rate)
    }
}

/// An audio codec set with an optional channel ceiling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AudioAccept {
    pub codecs: &'static [AudioCodec],
    pub max_channels: Option<u32>,
}

impl AudioAccept {
    pub const fn any_channels(codecs: &'static [AudioCodec]) -> Self {
        Self { codecs, max_channels: None }
    }

    pub const fn up_to(codecs: &'static [AudioCodec], max_channels: u32) -> Self {
        Self {
            codecs,
            max_channels: Some(max_channels),
        }
    }

    /// Whether the descriptor's audio stream fits. An unclassified codec
    /// never fits.
    pub fn accepts(&self, d: &MediaDescriptor) -> bool {
        d.audio_codec().is_some_and(|c| self.codecs.contains(&c)) && within(d.channels(), self.max_channels)
    }
}

/// One way a source can be played as-is.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayableRow {
    pub containers: &'static [Container],
    pub video_codecs: &'static [VideoCodec],
    /// Alternatives; any one must accept the audio stream.
    pub audio: &'static [AudioAccept],
    pub limits: StreamLimits,
}

impl PlayableRow {
    pub fn matches(&self, d: &MediaDescriptor) -> bool {
        d.container_format().is_some_and(|c| self.containers.contains(&c))
            && d.video_codec().is_some_and(|c| self.video_codecs.contains(&c))
            && self.audio.iter().any(|a| a.accepts(d))
            && self.limits.admits(d)
    }
}

pub(crate) const CONSOLE_ROWS: &[PlayableRow] = &[
    PlayableRow {
        containers: &[Container::Avi],
        video_codecs: &[VideoCodec::Mpeg4Part2],
        audio: &[
            AudioAccept::up_to(&[AudioCodec::Ac3], 6),
            AudioAccept::any_channels(&[AudioCodec::Mp3, AudioCodec::Mp3X]),
        ],
        limits: StreamLimits::new(5_000_000, 1280, 720, 30.0),
    },
    PlayableRow {
        containers: &[Container::Mp4, Container::QuickTime],
        video_codecs: &[VideoCodec::Mpeg4Part2],
        audio: &[AudioAccept::up_to(&[AudioCodec::AacLc], 2)],
        limits: StreamLimits::new(5_000_000, 1280, 720, 30.0),
    },
    PlayableRow {
        containers: &[Container::Mp4, Container::QuickTime],
        video_codecs: &[VideoCodec::H264],
        audio: &[AudioAccept::up_to(&[AudioCodec::AacLc], 2)],
        limits: StreamLimits::new(10_000_000, 1920, 1080, 30.0),
    },
    PlayableRow {
        containers: &[Container::Asf],
        video_codecs: &[VideoCodec::Wmv],
        audio: &[AudioAccept::up_to(&[AudioCodec::Wma, AudioCodec::WmaPro], 6)],
        limits: StreamLimits::new(15_000_000, 1920, 1080, 30.0),
    },
];

/// Whether the tier can play the source without transcoding.
pub fn is_directly_playable(tier: ClientTier, d: &MediaDescriptor) -> bool {
    tier.playable_rows().iter().any(|row| row.matches(d))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tc_core::descriptor::{AudioStream, VideoStream};

    fn xvid_avi(bit_rate: u64, audio: AudioStream) -> MediaDescriptor {
        MediaDescriptor::new("AVI")
            .with_video(
                VideoStream::new("MPEG-4 Visual")
                    .codec_id("XVID")
                    .bit_rate(bit_rate)
                    .resolution(1280, 720)
                    .frame_rate(25.0),
            )
            .with_audio(audio)
    }

    #[test]
    fn xvid_ac3_avi_on_console() {
        let d = xvid_avi(3_000_000, AudioStream::new("AC-3").channels(6));
        assert!(is_directly_playable(ClientTier::Console, &d));
    }

    #[test]
    fn common_tier_never_plays() {
        let d = xvid_avi(3_000_000, AudioStream::new("AC-3").channels(6));
        assert!(!is_directly_playable(ClientTier::Common, &d));
    }

    #[test]
    fn bit_rate_ceiling_inclusive() {
        let at = xvid_avi(5_000_000, AudioStream::new("AC-3").channels(2));
        let over = xvid_avi(5_000_001, AudioStream::new("AC-3").channels(2));
        assert!(is_directly_playable(ClientTier::Console, &at));
        assert!(!is_directly_playable(ClientTier::Console, &over));
    }

    #[test]
    fn mp3_any_channels_but_ac3_capped() {
        let mp3 = xvid_avi(1_000_000, AudioStream::new("MPEG Audio").profile("Layer 3").channels(8));
        assert!(is_directly_playable(ClientTier::Console, &mp3));
        let ac3 = xvid_avi(1_000_000, AudioStream::new("AC-3").channels(8));
        assert!(!is_directly_playable(ClientTier::Console, &ac3));
    }

    #[test]
    fn avc_mp4_stereo_aac() {
        let d = MediaDescriptor::new("MPEG-4")
            .with_video(VideoStream::new("AVC").bit_rate(8_000_000).resolution(1920, 1080).frame_rate(23.976))
            .with_audio(AudioStream::new("AAC").profile("LC").channels(2));
        assert!(is_directly_playable(ClientTier::Console, &d));

        let surround = MediaDescriptor {
            audio: Some(AudioStream::new("AAC").profile("LC").channels(6)),
            ..d
        };
        assert!(!is_directly_playable(ClientTier::Console, &surround));
    }

    #[test]
    fn wmv_in_asf() {
        let d = MediaDescriptor::new("Windows Media")
            .with_video(VideoStream::new("WMV2").resolution(720, 480))
            .with_audio(AudioStream::new("WMA").channels(2));
        assert!(is_directly_playable(ClientTier::Console, &d));
    }

    #[test]
    fn missing_audio_is_not_playable() {
        let d = MediaDescriptor::new("AVI").with_video(VideoStream::new("MPEG-4 Visual").resolution(640, 480));
        assert!(!is_directly_playable(ClientTier::Console, &d));
    }

    #[test]
    fn unknown_numbers_pass_ceilings() {
        let d = MediaDescriptor::new("AVI")
            .with_video(VideoStream::new("MPEG-4 Visual"))
            .with_audio(AudioStream::new("AC-3"));
        assert!(is_directly_playable(ClientTier::Console, &d));
    }
}
