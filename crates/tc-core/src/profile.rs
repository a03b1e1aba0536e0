//! DLNA delivery profiles.
//!
//! A [`DeliveryProfile`] names a codec/container combination that downstream
//! delivery recognises. It is an opaque label: the engine never derives
//! behaviour from the name, only from the catalog rule that produced it.
//! [`DeliveryProfile::None`] is the "no applicable profile" sentinel.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::Error;

/// Generate the profile enum together with its name and MIME tables.
macro_rules! delivery_profiles {
    ($($variant:ident => $name:literal, $mime:literal;)+) => {
        /// A named target codec/container combination.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum DeliveryProfile {
            /// No applicable profile.
            None,
            $($variant,)+
        }

        impl DeliveryProfile {
            /// Every real profile, in declaration order.
            pub const ALL: &'static [DeliveryProfile] = &[$(DeliveryProfile::$variant,)+];

            /// The DLNA profile name (`"NONE"` for the sentinel).
            pub fn as_str(&self) -> &'static str {
                match self {
                    Self::None => "NONE",
                    $(Self::$variant => $name,)+
                }
            }

            /// MIME type announced for content in this profile.
            pub fn mime_type(&self) -> Option<&'static str> {
                match self {
                    Self::None => None,
                    $(Self::$variant => Some($mime),)+
                }
            }
        }

        impl FromStr for DeliveryProfile {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    "NONE" => Ok(Self::None),
                    $($name => Ok(Self::$variant),)+
                    other => Err(Error::Validation(format!("unknown delivery profile '{other}'"))),
                }
            }
        }
    };
}

delivery_profiles! {
    // -- Audio ---------------------------------------------------------------
    Ac3 => "AC3", "audio/vnd.dolby.dd-raw";
    Amr3gpp => "AMR_3GPP", "audio/3gpp";
    AmrWbPlus => "AMR_WBplus", "audio/3gpp";
    Atrac3Plus => "ATRAC3plus", "audio/x-sony-oma";
    Lpcm => "LPCM", "audio/L16";
    Mp3 => "MP3", "audio/mpeg";
    Mp3X => "MP3X", "audio/mpeg";
    WmaBase => "WMABASE", "audio/x-ms-wma";
    WmaFull => "WMAFULL", "audio/x-ms-wma";
    WmaPro => "WMAPRO", "audio/x-ms-wma";
    AacAdts320 => "AAC_ADTS_320", "audio/vnd.dlna.adts";
    AacAdts => "AAC_ADTS", "audio/vnd.dlna.adts";
    AacMult5Adts => "AAC_MULT5_ADTS", "audio/vnd.dlna.adts";
    AacIso320 => "AAC_ISO_320", "audio/mp4";
    AacIso => "AAC_ISO", "audio/mp4";
    AacMult5Iso => "AAC_MULT5_ISO", "audio/mp4";
    HeaacL2Adts => "HEAAC_L2_ADTS", "audio/vnd.dlna.adts";
    HeaacL2Iso => "HEAAC_L2_ISO", "audio/mp4";
    HeaacMult5Iso => "HEAAC_MULT5_ISO", "audio/mp4";

    // -- Video ---------------------------------------------------------------
    Mpeg1 => "MPEG1", "video/mpeg";
    MpegPsNtsc => "MPEG_PS_NTSC", "video/mpeg";
    MpegPsPal => "MPEG_PS_PAL", "video/mpeg";
    MpegTsSdNaIso => "MPEG_TS_SD_NA_ISO", "video/mpeg";
    MpegTsSdEuIso => "MPEG_TS_SD_EU_ISO", "video/mpeg";
    MpegTsHdNaIso => "MPEG_TS_HD_NA_ISO", "video/mpeg";
    Mpeg4P2Mp4SpAac => "MPEG4_P2_MP4_SP_AAC", "video/mp4";
    Mpeg4P2Mp4AspAac => "MPEG4_P2_MP4_ASP_AAC", "video/mp4";
    Mpeg4P2Mp4AspHeaac => "MPEG4_P2_MP4_ASP_HEAAC", "video/mp4";
    Mpeg4P2TsAspAacIso => "MPEG4_P2_TS_ASP_AAC_ISO", "video/mpeg";
    Mpeg4P2TsAspMpeg1L3Iso => "MPEG4_P2_TS_ASP_MPEG1_L3_ISO", "video/mpeg";
    Mpeg4P2TsAspAc3Iso => "MPEG4_P2_TS_ASP_AC3_ISO", "video/mpeg";
    AvcMp4BlCif15Aac520 => "AVC_MP4_BL_CIF15_AAC_520", "video/mp4";
    AvcMp4MpSdAacMult5 => "AVC_MP4_MP_SD_AAC_MULT5", "video/mp4";
    AvcMp4MpSdMpeg1L3 => "AVC_MP4_MP_SD_MPEG1_L3", "video/mp4";
    AvcMp4MpSdAc3 => "AVC_MP4_MP_SD_AC3", "video/mp4";
    AvcMp4MpHd720pAac => "AVC_MP4_MP_HD_720p_AAC", "video/mp4";
    AvcMp4MpHd1080iAac => "AVC_MP4_MP_HD_1080i_AAC", "video/mp4";
    AvcMp4HpHdAac => "AVC_MP4_HP_HD_AAC", "video/mp4";
    AvcTsMpSdAacMult5Iso => "AVC_TS_MP_SD_AAC_MULT5_ISO", "video/mpeg";
    AvcTsMpHdAacMult5Iso => "AVC_TS_MP_HD_AAC_MULT5_ISO", "video/mpeg";
    AvcTsMpHdAc3Iso => "AVC_TS_MP_HD_AC3_ISO", "video/mpeg";
    AvcTsHpHdAc3Iso => "AVC_TS_HP_HD_AC3_ISO", "video/mpeg";
    AvcMkvMpHdAacMult5 => "AVC_MKV_MP_HD_AAC_MULT5", "video/x-matroska";
    AvcMkvMpHdAc3 => "AVC_MKV_MP_HD_AC3", "video/x-matroska";
    AvcMkvHpHdAacMult5 => "AVC_MKV_HP_HD_AAC_MULT5", "video/x-matroska";
    AvcMkvHpHdAc3 => "AVC_MKV_HP_HD_AC3", "video/x-matroska";
    WmvSpllBase => "WMVSPLL_BASE", "video/x-ms-wmv";
    WmvSpmlBase => "WMVSPML_BASE", "video/x-ms-wmv";
    WmvSpmlMp3 => "WMVSPML_MP3", "video/x-ms-wmv";
    WmvMedBase => "WMVMED_BASE", "video/x-ms-wmv";
    WmvMedFull => "WMVMED_FULL", "video/x-ms-wmv";
    WmvMedPro => "WMVMED_PRO", "video/x-ms-wmv";
    WmvHighFull => "WMVHIGH_FULL", "video/x-ms-wmv";
    WmvHighPro => "WMVHIGH_PRO", "video/x-ms-wmv";
    Vc1AsfApL1Wma => "VC1_ASF_AP_L1_WMA", "video/x-ms-asf";

    // -- Image ---------------------------------------------------------------
    JpegTn => "JPEG_TN", "image/jpeg";
    JpegSm => "JPEG_SM", "image/jpeg";
    JpegMed => "JPEG_MED", "image/jpeg";
    JpegLrg => "JPEG_LRG", "image/jpeg";
    PngTn => "PNG_TN", "image/png";
    PngLrg => "PNG_LRG", "image/png";
    GifLrg => "GIF_LRG", "image/gif";
}

impl DeliveryProfile {
    /// Whether this is the `NONE` sentinel.
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }
}

impl Default for DeliveryProfile {
    fn default() -> Self {
        Self::None
    }
}

impl fmt::Display for DeliveryProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for DeliveryProfile {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for DeliveryProfile {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
