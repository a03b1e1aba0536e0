//! Still-image delivery profile families.

use serde::{Deserialize, Serialize};
use tc_core::{DeliveryProfile, ImageFormat};

use crate::rule::{one_of, within};

/// One image delivery profile: format plus a resolution ceiling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageRule {
    pub profile: DeliveryProfile,
    pub formats: &'static [ImageFormat],
    pub max_width: Option<u32>,
    pub max_height: Option<u32>,
}

impl ImageRule {
    const fn new(profile: DeliveryProfile, format: &'static [ImageFormat], w: u32, h: u32) -> Self {
        Self {
            profile,
            formats: format,
            max_width: Some(w),
            max_height: Some(h),
        }
    }

    pub fn matches(&self, format: Option<ImageFormat>, width: Option<u32>, height: Option<u32>) -> bool {
        one_of(format, self.formats)
            && within(width, self.max_width)
            && within(height, self.max_height)
    }
}

const JPEG: &[ImageFormat] = &[ImageFormat::Jpeg];
const PNG: &[ImageFormat] = &[ImageFormat::Png];
const GIF: &[ImageFormat] = &[ImageFormat::Gif];

// Smallest first so a thumbnail resolves to the thumbnail profile.
const JPEG_RULES: &[ImageRule] = &[
    ImageRule::new(DeliveryProfile::JpegTn, JPEG, 160, 160),
    ImageRule::new(DeliveryProfile::JpegSm, JPEG, 640, 480),
    ImageRule::new(DeliveryProfile::JpegMed, JPEG, 1024, 768),
    ImageRule::new(DeliveryProfile::JpegLrg, JPEG, 4096, 4096),
];

const PNG_RULES: &[ImageRule] = &[
    ImageRule::new(DeliveryProfile::PngTn, PNG, 160, 160),
    ImageRule::new(DeliveryProfile::PngLrg, PNG, 4096, 4096),
];

const GIF_RULES: &[ImageRule] = &[ImageRule::new(DeliveryProfile::GifLrg, GIF, 1600, 1200)];

/// A group of image profiles sharing one format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFamily {
    Jpeg,
    Png,
    Gif,
}

impl ImageFamily {
    pub const STANDARD_ORDER: [ImageFamily; 3] = [Self::Jpeg, Self::Png, Self::Gif];

    pub fn rules(self) -> &'static [ImageRule] {
        match self {
            Self::Jpeg => JPEG_RULES,
            Self::Png => PNG_RULES,
            Self::Gif => GIF_RULES,
        }
    }

    pub fn resolve(self, format: Option<ImageFormat>, width: Option<u32>, height: Option<u32>) -> Option<DeliveryProfile> {
        self.rules()
            .iter()
            .find(|r| r.matches(format, width, height))
            .map(|r| r.profile)
    }
}
