//! tc-catalog: the ordered capability catalog of DLNA delivery profiles.
//!
//! Rules are const data rows grouped into closed families per media kind.
//! A [`Catalog`] holds one family order per kind and walks it first-match:
//! the first family whose first matching rule is found decides the profile.
//! The catalog is immutable once constructed.
//!
//! ```
//! use tc_catalog::Catalog;
//! use tc_core::descriptor::{AudioStream, VideoStream};
//! use tc_core::{DeliveryProfile, MediaDescriptor};
//!
//! let d = MediaDescriptor::new("MPEG-4")
//!     .with_video(VideoStream::new("AVC").profile("High@L4.1").resolution(1920, 1080))
//!     .with_audio(AudioStream::new("AAC").profile("LC").channels(2));
//!
//! let catalog = Catalog::standard();
//! let audio = catalog.resolve_audio(&d);
//! assert_eq!(audio, DeliveryProfile::AacIso320);
//! assert_eq!(catalog.resolve_video(&d, audio), DeliveryProfile::AvcMp4HpHdAac);
//! ```

pub mod audio;
pub mod image;
mod rule;
pub mod video;

pub use audio::{AudioFamily, AudioRule};
pub use image::{ImageFamily, ImageRule};
pub use rule::within;
pub use video::{AudioPairing, VideoFamily, VideoRule};

use tc_core::{DeliveryProfile, ImageFormat, MediaDescriptor};

/// Ordered families for every media kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    audio: Vec<AudioFamily>,
    video: Vec<VideoFamily>,
    image: Vec<ImageFamily>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::standard()
    }
}

impl Catalog {
    /// The standard precedence for every kind.
    pub fn standard() -> Self {
        Self {
            audio: AudioFamily::STANDARD_ORDER.to_vec(),
            video: VideoFamily::STANDARD_ORDER.to_vec(),
            image: ImageFamily::STANDARD_ORDER.to_vec(),
        }
    }

    /// Replace the audio family order.
    pub fn with_audio_families(mut self, families: impl IntoIterator<Item = AudioFamily>) -> Self {
        self.audio = families.into_iter().collect();
        self
    }

    /// Replace the video family order.
    pub fn with_video_families(mut self, families: impl IntoIterator<Item = VideoFamily>) -> Self {
        self.video = families.into_iter().collect();
        self
    }

    /// Replace the image family order.
    pub fn with_image_families(mut self, families: impl IntoIterator<Item = ImageFamily>) -> Self {
        self.image = families.into_iter().collect();
        self
    }

    pub fn audio_families(&self) -> &[AudioFamily] {
        &self.audio
    }

    pub fn video_families(&self) -> &[VideoFamily] {
        &self.video
    }

    pub fn image_families(&self) -> &[ImageFamily] {
        &self.image
    }

    /// Audio profile of the descriptor's audio stream, or `None`.
    pub fn resolve_audio(&self, d: &MediaDescriptor) -> DeliveryProfile {
        let profile = self
            .audio
            .iter()
            .find_map(|family| family.resolve(d))
            .unwrap_or_default();
        tracing::trace!(container = %d.container, %profile, "resolved audio profile");
        profile
    }

    /// Video profile of the descriptor, paired with an already resolved
    /// audio profile.
    pub fn resolve_video(&self, d: &MediaDescriptor, audio_profile: DeliveryProfile) -> DeliveryProfile {
        let profile = self
            .video
            .iter()
            .find_map(|family| family.resolve(d, audio_profile))
            .unwrap_or_default();
        tracing::trace!(container = %d.container, %audio_profile, %profile, "resolved video profile");
        profile
    }

    /// Image profile for an image type string such as `"JPEG"` or `"PNGf"`.
    pub fn resolve_image(&self, image_type: &str, width: Option<u32>, height: Option<u32>) -> DeliveryProfile {
        let format = ImageFormat::classify(image_type);
        self.image
            .iter()
            .find_map(|family| family.resolve(format, width, height))
            .unwrap_or_default()
    }
}
