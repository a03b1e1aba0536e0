//! Video delivery profile families.
//!
//! Many video profiles differ only in the audio they are paired with, so
//! every rule carries an [`AudioPairing`] evaluated against the audio
//! profile resolved beforehand.

use serde::{Deserialize, Serialize};
use tc_core::{AudioCodec, CodecProfile, Container, DeliveryProfile, MediaDescriptor, VideoCodec};

use crate::rule::{one_of, one_of_if_known, within};

/// Audio requirement of a video profile.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AudioPairing {
    Any,
    /// The resolved audio profile must be one of these.
    Profiles(&'static [DeliveryProfile]),
    /// The audio codec must be one of these (for pairings without an
    /// audio-only DLNA profile, such as MPEG-1 Layer 2).
    Codecs(&'static [AudioCodec]),
}

impl AudioPairing {
    /// A descriptor without an audio stream satisfies any pairing.
    fn matches(&self, d: &MediaDescriptor, audio_profile: DeliveryProfile) -> bool {
        if d.audio.is_none() {
            return true;
        }
        match self {
            Self::Any => true,
            Self::Profiles(set) => set.contains(&audio_profile),
            Self::Codecs(set) => one_of(d.audio_codec(), set),
        }
    }
}

/// One video delivery profile and the stream attributes it admits.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VideoRule {
    pub profile: DeliveryProfile,
    pub containers: &'static [Container],
    pub codecs: &'static [VideoCodec],
    pub codec_profiles: &'static [CodecProfile],
    pub max_bit_rate: Option<u64>,
    pub max_width: Option<u32>,
    pub max_height: Option<u32>,
    pub max_frame_rate: Option<f64>,
    pub audio: AudioPairing,
}

impl VideoRule {
    const fn new(
        profile: DeliveryProfile,
        containers: &'static [Container],
        codecs: &'static [VideoCodec],
        codec_profiles: &'static [CodecProfile],
    ) -> Self {
        Self {
            profile,
            containers,
            codecs,
            codec_profiles,
            max_bit_rate: None,
            max_width: None,
            max_height: None,
            max_frame_rate: None,
            audio: AudioPairing::Any,
        }
    }

    const fn limits(self, max_bit_rate: u64, width: u32, height: u32, fps: f64) -> Self {
        Self {
            max_bit_rate: Some(max_bit_rate),
            max_width: Some(width),
            max_height: Some(height),
            max_frame_rate: Some(fps),
            ..self
        }
    }

    const fn audio(self, audio: AudioPairing) -> Self {
        Self { audio, ..self }
    }

    /// Whether the descriptor's video stream, paired with `audio_profile`,
    /// satisfies every field.
    pub fn matches(&self, d: &MediaDescriptor, audio_profile: DeliveryProfile) -> bool {
        d.video.is_some()
            && one_of(d.container_format(), self.containers)
            && one_of(d.video_codec(), self.codecs)
            && one_of_if_known(d.video_profile(), self.codec_profiles)
            && within(d.video_bit_rate(), self.max_bit_rate)
            && within(d.width(), self.max_width)
            && within(d.height(), self.max_height)
            && within(d.frame_rate(), self.max_frame_rate)
            && self.audio.matches(d, audio_profile)
    }
}

// ---------------------------------------------------------------------------
// Rule tables
// ---------------------------------------------------------------------------

use AudioPairing::{Codecs, Profiles};
use CodecProfile::{AdvancedSimple, Baseline, High, Main, Simple};
use DeliveryProfile as P;

const MP4: &[Container] = &[Container::Mp4, Container::QuickTime];
const TS: &[Container] = &[Container::MpegTs];
const MKV: &[Container] = &[Container::Matroska];
const ASF: &[Container] = &[Container::Asf];

const AAC_ISO_STEREO: &[DeliveryProfile] = &[P::AacIso320, P::AacIso];
const AAC_ISO_ALL: &[DeliveryProfile] = &[P::AacIso320, P::AacIso, P::AacMult5Iso];
const HEAAC_ISO: &[DeliveryProfile] = &[P::HeaacL2Iso, P::HeaacMult5Iso];
const AAC_ADTS_ALL: &[DeliveryProfile] = &[P::AacAdts320, P::AacAdts, P::AacMult5Adts];
const MP3_ANY: &[DeliveryProfile] = &[P::Mp3, P::Mp3X];
const AC3: &[DeliveryProfile] = &[P::Ac3];

const ASP: &[CodecProfile] = &[Simple, AdvancedSimple];
const AVC_MP: &[CodecProfile] = &[Baseline, Main];
const AVC_HP: &[CodecProfile] = &[Baseline, Main, High];
const WMV_MP: &[CodecProfile] = &[Simple, Main];

const MPEG1_RULES: &[VideoRule] = &[VideoRule::new(P::Mpeg1, &[Container::MpegPs], &[VideoCodec::Mpeg1], &[])
    .limits(1_150_000, 352, 288, 30.0)
    .audio(Codecs(&[AudioCodec::Mp2]))];

const MPEG2_RULES: &[VideoRule] = &[
    VideoRule::new(P::MpegPsNtsc, &[Container::MpegPs], &[VideoCodec::Mpeg2], &[])
        .limits(9_800_000, 720, 480, 30.0)
        .audio(Codecs(&[AudioCodec::Ac3, AudioCodec::Lpcm, AudioCodec::Mp2])),
    VideoRule::new(P::MpegPsPal, &[Container::MpegPs], &[VideoCodec::Mpeg2], &[])
        .limits(9_800_000, 720, 576, 25.0)
        .audio(Codecs(&[AudioCodec::Ac3, AudioCodec::Lpcm, AudioCodec::Mp2])),
    VideoRule::new(P::MpegTsSdNaIso, TS, &[VideoCodec::Mpeg2], &[])
        .limits(19_392_700, 720, 480, 30.0)
        .audio(Profiles(AC3)),
    VideoRule::new(P::MpegTsSdEuIso, TS, &[VideoCodec::Mpeg2], &[])
        .limits(15_000_000, 720, 576, 25.0)
        .audio(Codecs(&[AudioCodec::Ac3, AudioCodec::Mp2])),
    VideoRule::new(P::MpegTsHdNaIso, TS, &[VideoCodec::Mpeg2], &[])
        .limits(19_392_700, 1920, 1080, 30.0)
        .audio(Profiles(AC3)),
];

const MPEG4_PART2_RULES: &[VideoRule] = &[
    VideoRule::new(P::Mpeg4P2Mp4SpAac, MP4, &[VideoCodec::Mpeg4Part2], &[Simple])
        .limits(384_000, 352, 288, 30.0)
        .audio(Profiles(AAC_ISO_STEREO)),
    VideoRule::new(P::Mpeg4P2Mp4AspAac, MP4, &[VideoCodec::Mpeg4Part2], ASP)
        .limits(8_000_000, 720, 576, 30.0)
        .audio(Profiles(AAC_ISO_ALL)),
    VideoRule::new(P::Mpeg4P2Mp4AspHeaac, MP4, &[VideoCodec::Mpeg4Part2], ASP)
        .limits(8_000_000, 720, 576, 30.0)
        .audio(Profiles(HEAAC_ISO)),
    VideoRule::new(P::Mpeg4P2TsAspAacIso, TS, &[VideoCodec::Mpeg4Part2], ASP)
        .limits(8_000_000, 720, 576, 30.0)
        .audio(Profiles(AAC_ADTS_ALL)),
    VideoRule::new(P::Mpeg4P2TsAspMpeg1L3Iso, TS, &[VideoCodec::Mpeg4Part2], ASP)
        .limits(8_000_000, 720, 576, 30.0)
        .audio(Profiles(MP3_ANY)),
    VideoRule::new(P::Mpeg4P2TsAspAc3Iso, TS, &[VideoCodec::Mpeg4Part2], ASP)
        .limits(8_000_000, 720, 576, 30.0)
        .audio(Profiles(AC3)),
];

const AVC_RULES: &[VideoRule] = &[
    VideoRule::new(P::AvcMp4BlCif15Aac520, &[Container::Mp4], &[VideoCodec::H264], &[Baseline])
        .limits(520_000, 352, 288, 15.0)
        .audio(Profiles(AAC_ISO_STEREO)),
    VideoRule::new(P::AvcMp4MpSdAacMult5, MP4, &[VideoCodec::H264], AVC_MP)
        .limits(10_000_000, 720, 576, 30.0)
        .audio(Profiles(AAC_ISO_ALL)),
    VideoRule::new(P::AvcMp4MpSdMpeg1L3, MP4, &[VideoCodec::H264], AVC_MP)
        .limits(10_000_000, 720, 576, 30.0)
        .audio(Profiles(MP3_ANY)),
    VideoRule::new(P::AvcMp4MpSdAc3, MP4, &[VideoCodec::H264], AVC_MP)
        .limits(10_000_000, 720, 576, 30.0)
        .audio(Profiles(AC3)),
    VideoRule::new(P::AvcMp4MpHd720pAac, MP4, &[VideoCodec::H264], AVC_MP)
        .limits(20_000_000, 1280, 720, 60.0)
        .audio(Profiles(AAC_ISO_ALL)),
    VideoRule::new(P::AvcMp4MpHd1080iAac, MP4, &[VideoCodec::H264], AVC_MP)
        .limits(20_000_000, 1920, 1080, 30.0)
        .audio(Profiles(AAC_ISO_ALL)),
    VideoRule::new(P::AvcMp4HpHdAac, MP4, &[VideoCodec::H264], AVC_HP)
        .limits(20_000_000, 1920, 1080, 30.0)
        .audio(Profiles(AAC_ISO_ALL)),
    VideoRule::new(P::AvcTsMpSdAacMult5Iso, TS, &[VideoCodec::H264], AVC_MP)
        .limits(10_000_000, 720, 576, 30.0)
        .audio(Profiles(AAC_ADTS_ALL)),
    VideoRule::new(P::AvcTsMpHdAacMult5Iso, TS, &[VideoCodec::H264], AVC_MP)
        .limits(20_000_000, 1920, 1080, 30.0)
        .audio(Profiles(AAC_ADTS_ALL)),
    VideoRule::new(P::AvcTsMpHdAc3Iso, TS, &[VideoCodec::H264], AVC_MP)
        .limits(20_000_000, 1920, 1080, 30.0)
        .audio(Profiles(AC3)),
    VideoRule::new(P::AvcTsHpHdAc3Iso, TS, &[VideoCodec::H264], AVC_HP)
        .limits(20_000_000, 1920, 1080, 30.0)
        .audio(Profiles(AC3)),
    VideoRule::new(P::AvcMkvMpHdAacMult5, MKV, &[VideoCodec::H264], AVC_MP)
        .limits(20_000_000, 1920, 1080, 30.0)
        .audio(Profiles(AAC_ISO_ALL)),
    VideoRule::new(P::AvcMkvMpHdAc3, MKV, &[VideoCodec::H264], AVC_MP)
        .limits(20_000_000, 1920, 1080, 30.0)
        .audio(Profiles(AC3)),
    VideoRule::new(P::AvcMkvHpHdAacMult5, MKV, &[VideoCodec::H264], AVC_HP)
        .limits(20_000_000, 1920, 1080, 30.0)
        .audio(Profiles(AAC_ISO_ALL)),
    VideoRule::new(P::AvcMkvHpHdAc3, MKV, &[VideoCodec::H264], AVC_HP)
        .limits(20_000_000, 1920, 1080, 30.0)
        .audio(Profiles(AC3)),
];

const WMV_RULES: &[VideoRule] = &[
    VideoRule::new(P::WmvSpllBase, ASF, &[VideoCodec::Wmv], &[Simple])
        .limits(384_000, 176, 144, 15.0)
        .audio(Profiles(&[P::WmaBase])),
    VideoRule::new(P::WmvSpmlBase, ASF, &[VideoCodec::Wmv], &[Simple])
        .limits(384_000, 352, 288, 30.0)
        .audio(Profiles(&[P::WmaBase])),
    VideoRule::new(P::WmvSpmlMp3, ASF, &[VideoCodec::Wmv], &[Simple])
        .limits(384_000, 352, 288, 30.0)
        .audio(Profiles(MP3_ANY)),
    VideoRule::new(P::WmvMedBase, ASF, &[VideoCodec::Wmv], WMV_MP)
        .limits(10_000_000, 720, 576, 30.0)
        .audio(Profiles(&[P::WmaBase])),
    VideoRule::new(P::WmvMedFull, ASF, &[VideoCodec::Wmv], WMV_MP)
        .limits(10_000_000, 720, 576, 30.0)
        .audio(Profiles(&[P::WmaFull])),
    VideoRule::new(P::WmvMedPro, ASF, &[VideoCodec::Wmv], WMV_MP)
        .limits(10_000_000, 720, 576, 30.0)
        .audio(Profiles(&[P::WmaPro])),
    VideoRule::new(P::WmvHighFull, ASF, &[VideoCodec::Wmv], WMV_MP)
        .limits(20_000_000, 1920, 1080, 30.0)
        .audio(Profiles(&[P::WmaBase, P::WmaFull])),
    VideoRule::new(P::WmvHighPro, ASF, &[VideoCodec::Wmv], WMV_MP)
        .limits(20_000_000, 1920, 1080, 30.0)
        .audio(Profiles(&[P::WmaPro])),
    VideoRule::new(P::Vc1AsfApL1Wma, ASF, &[VideoCodec::Vc1], &[CodecProfile::Advanced])
        .limits(2_000_000, 720, 576, 30.0)
        .audio(Profiles(&[P::WmaBase, P::WmaFull, P::WmaPro])),
];

// ---------------------------------------------------------------------------
// VideoFamily
// ---------------------------------------------------------------------------

/// A group of video profiles sharing one codec family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VideoFamily {
    Mpeg1,
    Mpeg2,
    Mpeg4Part2,
    Mpeg4Part10,
    Wmv,
}

impl VideoFamily {
    /// Families in catalog precedence order.
    pub const STANDARD_ORDER: [VideoFamily; 5] = [
        Self::Mpeg1,
        Self::Mpeg2,
        Self::Mpeg4Part2,
        Self::Mpeg4Part10,
        Self::Wmv,
    ];

    pub fn rules(self) -> &'static [VideoRule] {
        match self {
            Self::Mpeg1 => MPEG1_RULES,
            Self::Mpeg2 => MPEG2_RULES,
            Self::Mpeg4Part2 => MPEG4_PART2_RULES,
            Self::Mpeg4Part10 => AVC_RULES,
            Self::Wmv => WMV_RULES,
        }
    }

    /// First matching profile in this family.
    pub fn resolve(self, d: &MediaDescriptor, audio_profile: DeliveryProfile) -> Option<DeliveryProfile> {
        self.rules()
            .iter()
            .find(|r| r.matches(d, audio_profile))
            .map(|r| r.profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tc_core::descriptor::{AudioStream, VideoStream};

    fn avc_mp4(profile: &str, w: u32, h: u32) -> MediaDescriptor {
        MediaDescriptor::new("MPEG-4")
            .with_video(
                VideoStream::new("AVC")
                    .profile(profile)
                    .bit_rate(4_000_000)
                    .resolution(w, h)
                    .frame_rate(23.976),
            )
            .with_audio(AudioStream::new("AAC").profile("LC").channels(2))
    }

    #[test]
    fn avc_main_sd_with_aac() {
        let d = avc_mp4("Main@L3.1", 720, 480);
        assert_eq!(
            VideoFamily::Mpeg4Part10.resolve(&d, P::AacIso320),
            Some(P::AvcMp4MpSdAacMult5)
        );
    }

    #[test]
    fn avc_high_hd_needs_high_profile_rule() {
        let d = avc_mp4("High@L4.1", 1920, 1080);
        assert_eq!(VideoFamily::Mpeg4Part10.resolve(&d, P::AacIso), Some(P::AvcMp4HpHdAac));
    }

    #[test]
    fn audio_pairing_selects_distinct_profile() {
        let d = MediaDescriptor::new("MPEG-4")
            .with_video(VideoStream::new("AVC").profile("Main@L3").resolution(720, 576))
            .with_audio(AudioStream::new("AC-3").channels(6));
        assert_eq!(VideoFamily::Mpeg4Part10.resolve(&d, P::Ac3), Some(P::AvcMp4MpSdAc3));

        let d = MediaDescriptor::new("MPEG-4")
            .with_video(VideoStream::new("AVC").profile("Main@L3").resolution(720, 576))
            .with_audio(AudioStream::new("MPEG Audio").profile("Layer 3").version(1));
        assert_eq!(VideoFamily::Mpeg4Part10.resolve(&d, P::Mp3), Some(P::AvcMp4MpSdMpeg1L3));
    }

    #[test]
    fn unpaired_audio_profile_fails() {
        let d = avc_mp4("Main@L3.1", 720, 480);
        assert_eq!(VideoFamily::Mpeg4Part10.resolve(&d, P::None), None);
    }

    #[test]
    fn video_only_ignores_pairing() {
        let d = MediaDescriptor::new("MPEG-TS")
            .with_video(VideoStream::new("MPEG Video").version(2).resolution(1920, 1080).frame_rate(29.97));
        assert_eq!(VideoFamily::Mpeg2.resolve(&d, P::None), Some(P::MpegTsHdNaIso));
    }

    #[test]
    fn mpeg1_pairs_with_layer2_codec() {
        let d = MediaDescriptor::new("MPEG-PS")
            .with_video(VideoStream::new("MPEG Video").version(1).resolution(352, 240).bit_rate(1_150_000))
            .with_audio(AudioStream::new("MPEG Audio").profile("Layer 2").version(1));
        assert_eq!(VideoFamily::Mpeg1.resolve(&d, P::None), Some(P::Mpeg1));
    }

    #[test]
    fn wmv_pairs_by_wma_tier() {
        let d = MediaDescriptor::new("Windows Media")
            .with_video(VideoStream::new("VC-1").codec_id("WMV3").profile("MP@HL").resolution(1280, 720))
            .with_audio(AudioStream::new("WMA").channels(2));
        assert_eq!(VideoFamily::Wmv.resolve(&d, P::WmaFull), Some(P::WmvHighFull));
        assert_eq!(VideoFamily::Wmv.resolve(&d, P::WmaPro), Some(P::WmvHighPro));
    }

    #[test]
    fn avi_has_no_dlna_profile() {
        let d = MediaDescriptor::new("AVI")
            .with_video(VideoStream::new("MPEG-4 Visual").resolution(640, 480))
            .with_audio(AudioStream::new("AC-3").channels(6));
        for family in VideoFamily::STANDARD_ORDER {
            assert_eq!(family.resolve(&d, P::Ac3), None);
        }
    }
}
