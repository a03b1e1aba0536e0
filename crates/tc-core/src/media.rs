//! Media-domain enums for containers, codecs, codec profiles, and images.
//!
//! Metadata providers report formats as free-form MediaInfo-style strings
//! ("MPEG-4 Visual", "AC-3", "Windows Media"). Each enum here offers a
//! `classify` constructor that maps those strings onto a closed set; anything
//! unrecognised classifies as `None` and can never match a catalog rule.
//!
//! All enums serialize in lowercase and implement `Display` through
//! `as_str()`.

use serde::{Deserialize, Serialize};
use std::fmt;

fn normalize(raw: &str) -> String {
    raw.trim().to_ascii_lowercase()
}

// ---------------------------------------------------------------------------
// Container
// ---------------------------------------------------------------------------

/// Container formats the engine can reason about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Container {
    Avi,
    Mp4,
    QuickTime,
    /// Advanced Systems Format (Windows Media).
    Asf,
    Matroska,
    MpegPs,
    MpegTs,
    ThreeGpp,
    Adts,
    /// Raw AC-3 elementary stream.
    Ac3,
    MpegAudio,
    Wave,
    Flac,
    Ogg,
    Flv,
    /// Sony OpenMG audio (ATRAC).
    Oma,
    /// Raw AMR file.
    Amr,
}

impl Container {
    /// Map a metadata format string onto a container.
    pub fn classify(raw: &str) -> Option<Self> {
        let c = match normalize(raw).as_str() {
            "avi" => Self::Avi,
            "mpeg-4" | "mp4" | "m4v" | "m4a" => Self::Mp4,
            "quicktime" | "mov" => Self::QuickTime,
            "windows media" | "asf" | "wmv" | "wma" => Self::Asf,
            "matroska" | "mkv" | "mka" => Self::Matroska,
            "mpeg-ps" | "mpg" | "mpeg" | "vob" => Self::MpegPs,
            "mpeg-ts" | "bdav" | "ts" | "m2ts" => Self::MpegTs,
            "3gpp" | "3gp" => Self::ThreeGpp,
            "adts" | "aac" => Self::Adts,
            "ac-3" | "ac3" => Self::Ac3,
            "mpeg audio" | "mp3" => Self::MpegAudio,
            "wave" | "wav" => Self::Wave,
            "flac" => Self::Flac,
            "ogg" => Self::Ogg,
            "flash video" | "flv" => Self::Flv,
            "openmg" | "oma" => Self::Oma,
            "amr" => Self::Amr,
            _ => return None,
        };
        Some(c)
    }

    /// Short lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Avi => "avi",
            Self::Mp4 => "mp4",
            Self::QuickTime => "quicktime",
            Self::Asf => "asf",
            Self::Matroska => "matroska",
            Self::MpegPs => "mpegps",
            Self::MpegTs => "mpegts",
            Self::ThreeGpp => "threegpp",
            Self::Adts => "adts",
            Self::Ac3 => "ac3",
            Self::MpegAudio => "mpegaudio",
            Self::Wave => "wave",
            Self::Flac => "flac",
            Self::Ogg => "ogg",
            Self::Flv => "flv",
            Self::Oma => "oma",
            Self::Amr => "amr",
        }
    }

    /// MIME type used when the container is served as-is.
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Avi => "video/avi",
            Self::Mp4 => "video/mp4",
            Self::QuickTime => "video/quicktime",
            Self::Asf => "video/x-ms-wmv",
            Self::Matroska => "video/x-matroska",
            Self::MpegPs => "video/mpeg",
            Self::MpegTs => "video/vnd.dlna.mpeg-tts",
            Self::ThreeGpp => "video/3gpp",
            Self::Adts => "audio/vnd.dlna.adts",
            Self::Ac3 => "audio/vnd.dolby.dd-raw",
            Self::MpegAudio => "audio/mpeg",
            Self::Wave => "audio/wav",
            Self::Flac => "audio/flac",
            Self::Ogg => "audio/ogg",
            Self::Flv => "video/x-flv",
            Self::Oma => "audio/x-sony-oma",
            Self::Amr => "audio/amr",
        }
    }
}

impl fmt::Display for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// VideoCodec
// ---------------------------------------------------------------------------

/// Video codecs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VideoCodec {
    Mpeg1,
    Mpeg2,
    /// MPEG-4 Part 2 (DivX, Xvid).
    Mpeg4Part2,
    /// MPEG-4 Part 10 (AVC).
    H264,
    H265,
    /// Windows Media Video 7/8/9.
    Wmv,
    Vc1,
    Vp8,
    Vp9,
    Av1,
}

/// FourCCs that identify MPEG-4 Part 2 regardless of the reported format.
const MPEG4_PART2_FOURCCS: &[&str] = &["xvid", "divx", "dx50", "fmp4", "mp4v", "20"];

impl VideoCodec {
    /// Map metadata fields onto a video codec.
    ///
    /// `version` disambiguates "MPEG Video" (1 or 2) and `codec_id` carries
    /// the FourCC, which wins for MPEG-4 Part 2 variants and separates WMV9
    /// from VC-1 Advanced Profile.
    pub fn classify(format: &str, version: Option<u32>, codec_id: Option<&str>) -> Option<Self> {
        let codec_id = codec_id.map(normalize);
        if let Some(id) = codec_id.as_deref() {
            if MPEG4_PART2_FOURCCS.contains(&id) {
                return Some(Self::Mpeg4Part2);
            }
        }

        let format = normalize(format);
        let codec = match format.as_str() {
            "mpeg video" => match version {
                Some(1) => Self::Mpeg1,
                _ => Self::Mpeg2,
            },
            "mpeg-1 video" | "mpeg1" => Self::Mpeg1,
            "mpeg-2 video" | "mpeg2" => Self::Mpeg2,
            "mpeg-4 visual" | "mpeg4" | "xvid" | "divx" => Self::Mpeg4Part2,
            "avc" | "h.264" | "h264" => Self::H264,
            "hevc" | "h.265" | "h265" => Self::H265,
            "vc-1" => match codec_id.as_deref() {
                Some("wmv3") => Self::Wmv,
                _ => Self::Vc1,
            },
            "vp8" => Self::Vp8,
            "vp9" => Self::Vp9,
            "av1" => Self::Av1,
            f if f.starts_with("wmv") => Self::Wmv,
            _ => return None,
        };
        Some(codec)
    }

    /// Short lowercase name, also used as the output codec label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mpeg1 => "mpeg1",
            Self::Mpeg2 => "mpeg2",
            Self::Mpeg4Part2 => "mpeg4part2",
            Self::H264 => "h264",
            Self::H265 => "h265",
            Self::Wmv => "wmv",
            Self::Vc1 => "vc1",
            Self::Vp8 => "vp8",
            Self::Vp9 => "vp9",
            Self::Av1 => "av1",
        }
    }
}

impl fmt::Display for VideoCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// CodecProfile
// ---------------------------------------------------------------------------

/// Video codec profile (the part of "Main@L4.1" before the level).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CodecProfile {
    Simple,
    AdvancedSimple,
    Baseline,
    Main,
    High,
    High10,
    Advanced,
}

impl CodecProfile {
    /// Parse a MediaInfo profile string such as `"Advanced Simple@L5"` or
    /// the VC-1 short form `"MP@HL"`.
    pub fn classify(raw: &str) -> Option<Self> {
        let name = raw.split('@').next().unwrap_or(raw);
        let p = match normalize(name).as_str() {
            "simple" | "sp" => Self::Simple,
            "advanced simple" | "asp" => Self::AdvancedSimple,
            "baseline" | "constrained baseline" => Self::Baseline,
            "main" | "mp" => Self::Main,
            "high" => Self::High,
            "high 10" => Self::High10,
            "advanced" | "ap" => Self::Advanced,
            _ => return None,
        };
        Some(p)
    }
}

// ---------------------------------------------------------------------------
// AudioCodec
// ---------------------------------------------------------------------------

/// Audio codecs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioCodec {
    Ac3,
    Eac3,
    /// AAC Low Complexity.
    AacLc,
    /// High-Efficiency AAC (SBR and/or PS).
    HeAac,
    /// Any other AAC object type (Main, LTP).
    Aac,
    /// MPEG-1/2 Layer 1 or 2.
    Mp2,
    /// MPEG-1 Layer 3.
    Mp3,
    /// MPEG-2 (and 2.5) Layer 3 with extended sample rates.
    Mp3X,
    Lpcm,
    Wma,
    WmaPro,
    WmaLossless,
    /// AMR narrow band.
    Amr,
    /// AMR wide band.
    AmrWb,
    Atrac3,
    Dts,
    Flac,
    Vorbis,
    Opus,
}

impl AudioCodec {
    /// Map metadata fields onto an audio codec.
    ///
    /// `profile` distinguishes AAC object types, MPEG audio layers, WMA
    /// flavours and AMR bands; `version` separates MP3 from MP3X.
    pub fn classify(format: &str, profile: Option<&str>, version: Option<u32>) -> Option<Self> {
        let profile = profile.map(normalize).unwrap_or_default();
        let codec = match normalize(format).as_str() {
            "ac-3" | "ac3" => Self::Ac3,
            "e-ac-3" | "eac3" => Self::Eac3,
            "aac" => {
                if profile.contains("he-aac") || profile.contains("sbr") || profile == "ps" {
                    Self::HeAac
                } else if profile.is_empty() || profile.contains("lc") {
                    Self::AacLc
                } else {
                    Self::Aac
                }
            }
            "aac lc" => Self::AacLc,
            "he-aac" => Self::HeAac,
            "mpeg audio" => {
                if profile.contains("layer 3") || profile.is_empty() {
                    match version {
                        Some(v) if v >= 2 => Self::Mp3X,
                        _ => Self::Mp3,
                    }
                } else {
                    Self::Mp2
                }
            }
            "mp3" => Self::Mp3,
            "mp2" => Self::Mp2,
            "pcm" | "lpcm" => Self::Lpcm,
            "wma" => match profile.as_str() {
                "pro" => Self::WmaPro,
                "lossless" => Self::WmaLossless,
                _ => Self::Wma,
            },
            "amr" => {
                if profile.contains("wide") {
                    Self::AmrWb
                } else {
                    Self::Amr
                }
            }
            "amr-wb" => Self::AmrWb,
            "atrac3" | "atrac3plus" => Self::Atrac3,
            "dts" => Self::Dts,
            "flac" => Self::Flac,
            "vorbis" => Self::Vorbis,
            "opus" => Self::Opus,
            _ => return None,
        };
        Some(codec)
    }

    /// Short lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ac3 => "ac3",
            Self::Eac3 => "eac3",
            Self::AacLc => "aaclc",
            Self::HeAac => "heaac",
            Self::Aac => "aac",
            Self::Mp2 => "mp2",
            Self::Mp3 => "mp3",
            Self::Mp3X => "mp3x",
            Self::Lpcm => "lpcm",
            Self::Wma => "wma",
            Self::WmaPro => "wmapro",
            Self::WmaLossless => "wmalossless",
            Self::Amr => "amr",
            Self::AmrWb => "amrwb",
            Self::Atrac3 => "atrac3",
            Self::Dts => "dts",
            Self::Flac => "flac",
            Self::Vorbis => "vorbis",
            Self::Opus => "opus",
        }
    }
}

impl fmt::Display for AudioCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// ImageFormat
// ---------------------------------------------------------------------------

/// Still-image formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    Jpeg,
    Png,
    Gif,
}

impl ImageFormat {
    /// Map an image type string (including QuickTime-style `"PNGf"`).
    pub fn classify(raw: &str) -> Option<Self> {
        let f = match normalize(raw).as_str() {
            "jpeg" | "jpg" => Self::Jpeg,
            "png" | "pngf" => Self::Png,
            "gif" | "giff" => Self::Gif,
            _ => return None,
        };
        Some(f)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Jpeg => "jpeg",
            Self::Png => "png",
            Self::Gif => "gif",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::Gif => "image/gif",
        }
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
