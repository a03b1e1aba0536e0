//! Audio delivery profile families.

use serde::{Deserialize, Serialize};
use tc_core::{AudioCodec, Container, DeliveryProfile, MediaDescriptor};

use crate::rule::{in_range, one_of, within};

/// One audio delivery profile and the stream attributes it admits.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AudioRule {
    pub profile: DeliveryProfile,
    pub containers: &'static [Container],
    pub codecs: &'static [AudioCodec],
    pub max_bit_rate: Option<u64>,
    pub sample_rate: Option<(u32, u32)>,
    pub max_channels: Option<u32>,
}

impl AudioRule {
    const fn new(profile: DeliveryProfile, containers: &'static [Container], codecs: &'static [AudioCodec]) -> Self {
        Self {
            profile,
            containers,
            codecs,
            max_bit_rate: None,
            sample_rate: None,
            max_channels: None,
        }
    }

    const fn bit_rate(self, max: u64) -> Self {
        Self { max_bit_rate: Some(max), ..self }
    }

    const fn sample_rate(self, lo: u32, hi: u32) -> Self {
        Self { sample_rate: Some((lo, hi)), ..self }
    }

    const fn channels(self, max: u32) -> Self {
        Self { max_channels: Some(max), ..self }
    }

    /// Whether the descriptor's audio stream satisfies every field.
    pub fn matches(&self, d: &MediaDescriptor) -> bool {
        d.audio.is_some()
            && one_of(d.container_format(), self.containers)
            && one_of(d.audio_codec(), self.codecs)
            && within(d.audio_bit_rate(), self.max_bit_rate)
            && in_range(d.sample_rate(), self.sample_rate)
            && within(d.channels(), self.max_channels)
    }
}

// ---------------------------------------------------------------------------
// Rule tables
// ---------------------------------------------------------------------------

const ISO: &[Container] = &[Container::Mp4, Container::QuickTime, Container::ThreeGpp, Container::Matroska];
const ADTS: &[Container] = &[Container::Adts, Container::MpegTs];
const ANY: &[Container] = &[];

const AC3_RULES: &[AudioRule] = &[
    AudioRule::new(DeliveryProfile::Ac3, ANY, &[AudioCodec::Ac3])
        .sample_rate(32_000, 48_000)
        .channels(6)
        .bit_rate(640_000),
];

const AMR_RULES: &[AudioRule] = &[
    AudioRule::new(
        DeliveryProfile::Amr3gpp,
        &[Container::ThreeGpp, Container::Mp4, Container::Amr],
        &[AudioCodec::Amr],
    )
    .sample_rate(8_000, 8_000)
    .channels(1),
    AudioRule::new(
        DeliveryProfile::AmrWbPlus,
        &[Container::ThreeGpp, Container::Mp4, Container::Amr],
        &[AudioCodec::AmrWb],
    )
    .sample_rate(8_000, 48_000)
    .channels(2),
];

const ATRAC3_RULES: &[AudioRule] = &[AudioRule::new(
    DeliveryProfile::Atrac3Plus,
    &[Container::Oma],
    &[AudioCodec::Atrac3],
)];

const LPCM_RULES: &[AudioRule] = &[AudioRule::new(DeliveryProfile::Lpcm, ANY, &[AudioCodec::Lpcm])
    .sample_rate(44_100, 48_000)
    .channels(2)];

const MP3_RULES: &[AudioRule] = &[
    AudioRule::new(DeliveryProfile::Mp3, ANY, &[AudioCodec::Mp3])
        .sample_rate(32_000, 48_000)
        .channels(2)
        .bit_rate(320_000),
    AudioRule::new(DeliveryProfile::Mp3X, ANY, &[AudioCodec::Mp3, AudioCodec::Mp3X])
        .sample_rate(16_000, 48_000)
        .channels(2)
        .bit_rate(320_000),
];

const WMA_RULES: &[AudioRule] = &[
    AudioRule::new(DeliveryProfile::WmaBase, &[Container::Asf], &[AudioCodec::Wma])
        .sample_rate(8_000, 48_000)
        .channels(2)
        .bit_rate(192_999),
    AudioRule::new(DeliveryProfile::WmaFull, &[Container::Asf], &[AudioCodec::Wma])
        .sample_rate(8_000, 48_000)
        .channels(2)
        .bit_rate(385_000),
    AudioRule::new(DeliveryProfile::WmaPro, &[Container::Asf], &[AudioCodec::WmaPro])
        .sample_rate(8_000, 96_000)
        .channels(8)
        .bit_rate(1_500_000),
];

const AAC_RULES: &[AudioRule] = &[
    AudioRule::new(DeliveryProfile::AacAdts320, ADTS, &[AudioCodec::AacLc])
        .channels(2)
        .bit_rate(320_000),
    AudioRule::new(DeliveryProfile::AacAdts, ADTS, &[AudioCodec::AacLc])
        .channels(2)
        .bit_rate(576_000),
    AudioRule::new(DeliveryProfile::AacMult5Adts, ADTS, &[AudioCodec::AacLc])
        .channels(6)
        .bit_rate(1_440_000),
    AudioRule::new(DeliveryProfile::HeaacL2Adts, ADTS, &[AudioCodec::HeAac])
        .channels(2)
        .bit_rate(320_000),
    AudioRule::new(DeliveryProfile::AacIso320, ISO, &[AudioCodec::AacLc])
        .channels(2)
        .bit_rate(320_000),
    AudioRule::new(DeliveryProfile::AacIso, ISO, &[AudioCodec::AacLc])
        .channels(2)
        .bit_rate(576_000),
    AudioRule::new(DeliveryProfile::AacMult5Iso, ISO, &[AudioCodec::AacLc])
        .channels(6)
        .bit_rate(1_440_000),
    AudioRule::new(DeliveryProfile::HeaacL2Iso, ISO, &[AudioCodec::HeAac])
        .channels(2)
        .bit_rate(320_000),
    AudioRule::new(DeliveryProfile::HeaacMult5Iso, ISO, &[AudioCodec::HeAac])
        .channels(6)
        .bit_rate(1_440_000),
];

// ---------------------------------------------------------------------------
// AudioFamily
// ---------------------------------------------------------------------------

/// A group of audio profiles sharing one codec family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioFamily {
    Ac3,
    Amr,
    Atrac3,
    Lpcm,
    Mp3,
    Wma,
    Aac,
}

impl AudioFamily {
    /// Families in catalog precedence order.
    pub const STANDARD_ORDER: [AudioFamily; 7] = [
        Self::Ac3,
        Self::Amr,
        Self::Atrac3,
        Self::Lpcm,
        Self::Mp3,
        Self::Wma,
        Self::Aac,
    ];

    /// This family's rules, most specific first.
    pub fn rules(self) -> &'static [AudioRule] {
        match self {
            Self::Ac3 => AC3_RULES,
            Self::Amr => AMR_RULES,
            Self::Atrac3 => ATRAC3_RULES,
            Self::Lpcm => LPCM_RULES,
            Self::Mp3 => MP3_RULES,
            Self::Wma => WMA_RULES,
            Self::Aac => AAC_RULES,
        }
    }

    /// First matching profile in this family.
    pub fn resolve(self, d: &MediaDescriptor) -> Option<DeliveryProfile> {
        self.rules().iter().find(|r| r.matches(d)).map(|r| r.profile)
    }
}
