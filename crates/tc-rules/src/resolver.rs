//! Profile resolution facade over the catalog and the tier tables.

use tc_catalog::Catalog;
use tc_core::{DeliveryProfile, ImageFormat, MediaDescriptor};

use crate::playable;
use crate::tier::{self, ClientTier};

/// Answers "what is this source" and "can this client play it".
#[derive(Debug, Clone, Default)]
pub struct ProfileResolver {
    catalog: Catalog,
}

impl ProfileResolver {
    pub fn new(catalog: Catalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn resolve_client_tier<S: AsRef<str>>(&self, strings: &[S]) -> ClientTier {
        tier::resolve_client_tier(strings)
    }

    pub fn is_directly_playable(&self, tier: ClientTier, d: &MediaDescriptor) -> bool {
        playable::is_directly_playable(tier, d)
    }

    pub fn resolve_audio_profile(&self, d: &MediaDescriptor) -> DeliveryProfile {
        self.catalog.resolve_audio(d)
    }

    /// Resolves the audio profile first and pairs the video rules with it.
    pub fn resolve_video_profile(&self, d: &MediaDescriptor) -> DeliveryProfile {
        let audio = self.catalog.resolve_audio(d);
        self.catalog.resolve_video(d, audio)
    }

    pub fn resolve_image_profile(&self, image_type: &str, width: Option<u32>, height: Option<u32>) -> DeliveryProfile {
        self.catalog.resolve_image(image_type, width, height)
    }

    /// MIME type of the source served as-is, from its container.
    pub fn source_mime(&self, d: &MediaDescriptor) -> Option<&'static str> {
        d.container_format().map(|c| c.mime_type())
    }
}

/// Format an image is converted to when the client needs a transcode.
/// Unknown types become JPEG.
pub fn image_transcode_target(image_type: &str) -> ImageFormat {
    ImageFormat::classify(image_type).unwrap_or(ImageFormat::Jpeg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tc_core::descriptor::{AudioStream, VideoStream};

    #[test]
    fn video_profile_uses_audio_pairing() {
        let d = MediaDescriptor::new("MPEG-TS")
            .with_video(VideoStream::new("AVC").profile("High@L4.0").resolution(1920, 1080).frame_rate(25.0))
            .with_audio(AudioStream::new("AC-3").channels(6).sample_rate(48_000));
        let r = ProfileResolver::default();
        assert_eq!(r.resolve_audio_profile(&d), DeliveryProfile::Ac3);
        assert_eq!(r.resolve_video_profile(&d), DeliveryProfile::AvcTsHpHdAc3Iso);
        assert_eq!(r.source_mime(&d), Some("video/vnd.dlna.mpeg-tts"));
    }

    #[test]
    fn avi_resolves_none_but_plays_on_console() {
        let d = MediaDescriptor::new("AVI")
            .with_video(VideoStream::new("MPEG-4 Visual").resolution(640, 480))
            .with_audio(AudioStream::new("MPEG Audio").profile("Layer 3"));
        let r = ProfileResolver::default();
        assert_eq!(r.resolve_video_profile(&d), DeliveryProfile::None);
        assert!(r.is_directly_playable(ClientTier::Console, &d));
    }

    #[test]
    fn image_targets() {
        assert_eq!(image_transcode_target("GIFf"), ImageFormat::Gif);
        assert_eq!(image_transcode_target("JPG"), ImageFormat::Jpeg);
        assert_eq!(image_transcode_target("PNGf"), ImageFormat::Png);
        assert_eq!(image_transcode_target("TIFF"), ImageFormat::Jpeg);
        assert_eq!(image_transcode_target("TIFF").mime_type(), "image/jpeg");
    }
}
