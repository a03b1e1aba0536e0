//! Pipeline planning.
//!
//! The planner turns a source that a tier cannot play into a
//! [`PipelineSpec`]. It is pure: it allocates a fresh pipeline id and
//! derives output paths from it, but never touches the filesystem.

use std::path::PathBuf;

use tc_core::config::Config;
use tc_core::{
    AudioCodec, AudioMode, DeliveryProfile, EncodePreset, Error, MediaDescriptor, OutputContainer, PipelineId,
    PipelineSpec, Result, SourceLocation, VideoCodec, VideoMode,
};

use crate::playable::{AudioAccept, StreamLimits};
use crate::tier::ClientTier;

// ---------------------------------------------------------------------------
// Policy tables
// ---------------------------------------------------------------------------

/// An output container and the audio it carries without re-encoding.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContainerTarget {
    pub container: OutputContainer,
    pub audio: &'static [AudioAccept],
}

impl ContainerTarget {
    fn accepts_audio(&self, d: &MediaDescriptor) -> bool {
        self.audio.iter().any(|a| a.accepts(d))
    }
}

/// Video that may be stream-copied, and where it may be copied to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CopyRule {
    pub codec: VideoCodec,
    pub limits: StreamLimits,
    /// Candidates in preference order; never empty.
    pub targets: &'static [ContainerTarget],
}

impl CopyRule {
    pub fn matches(&self, d: &MediaDescriptor) -> bool {
        d.video_codec() == Some(self.codec) && self.limits.admits(d)
    }
}

/// A tier's transcode behaviour.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TranscodePolicy {
    pub copy_rules: &'static [CopyRule],
    /// Candidates when the video is re-encoded; never empty.
    pub encode_targets: &'static [ContainerTarget],
}

const AC3_SURROUND: AudioAccept = AudioAccept::up_to(&[AudioCodec::Ac3], 6);
const MP3_ANY: AudioAccept = AudioAccept::any_channels(&[AudioCodec::Mp3, AudioCodec::Mp3X]);
const AAC_STEREO: AudioAccept = AudioAccept::up_to(&[AudioCodec::AacLc], 2);

pub(crate) static CONSOLE_POLICY: TranscodePolicy = TranscodePolicy {
    copy_rules: &[
        CopyRule {
            codec: VideoCodec::Mpeg4Part2,
            limits: StreamLimits::new(5_000_000, 1280, 720, 30.0),
            targets: &[
                ContainerTarget {
                    container: OutputContainer::Avi,
                    audio: &[AC3_SURROUND, MP3_ANY],
                },
                ContainerTarget {
                    container: OutputContainer::Mp4,
                    audio: &[AAC_STEREO],
                },
            ],
        },
        CopyRule {
            codec: VideoCodec::H264,
            limits: StreamLimits::new(10_000_000, 1920, 1080, 30.0),
            targets: &[ContainerTarget {
                container: OutputContainer::Mp4,
                audio: &[AAC_STEREO],
            }],
        },
    ],
    encode_targets: &[ContainerTarget {
        container: OutputContainer::FragmentedMp4,
        audio: &[AAC_STEREO, AC3_SURROUND, MP3_ANY],
    }],
};

// ---------------------------------------------------------------------------
// Planner
// ---------------------------------------------------------------------------

/// Knobs the planner takes from configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannerOptions {
    /// Directory receiving outputs and concat lists.
    pub scratch_dir: PathBuf,
    pub preset: EncodePreset,
    pub audio_channels: u32,
    pub audio_bitrate: String,
    /// When false the encode path writes a plain MP4.
    pub fragmented_mp4: bool,
}

impl PlannerOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            scratch_dir: config.scratch.dir.clone(),
            preset: config.transcode.preset,
            audio_channels: config.transcode.audio_channels,
            audio_bitrate: config.transcode.audio_bitrate.clone(),
            fragmented_mp4: config.transcode.fragmented_mp4,
        }
    }
}

impl Default for PlannerOptions {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// Derives pipeline specifications for sources a tier cannot play.
#[derive(Debug, Clone, Default)]
pub struct Planner {
    options: PlannerOptions,
}

impl Planner {
    pub fn new(options: PlannerOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &PlannerOptions {
        &self.options
    }

    /// Plan a transcode of `sources` (described by `d`) for `tier`.
    ///
    /// Fails with [`Error::Validation`] on an empty source list or when a
    /// multi-input source carries input options, and with
    /// [`Error::Unsupported`] when the tier has no transcode policy.
    pub fn plan_pipeline(&self, tier: ClientTier, d: &MediaDescriptor, sources: &[SourceLocation]) -> Result<PipelineSpec> {
        if sources.is_empty() {
            return Err(Error::Validation("no source locations to transcode".into()));
        }
        if sources.len() > 1 && sources.iter().any(|s| !s.input_options.is_empty()) {
            return Err(Error::Validation(
                "input options are not supported for multi-part sources".into(),
            ));
        }
        let policy = tier
            .transcode_policy()
            .ok_or_else(|| Error::Unsupported(format!("client tier '{tier}' has no transcode policy")))?;

        let (video, video_codec, targets) = match policy.copy_rules.iter().find(|r| r.matches(d)) {
            Some(rule) => (VideoMode::Copy, rule.codec, rule.targets),
            None => (
                VideoMode::Encode {
                    codec: VideoCodec::H264,
                    preset: self.options.preset,
                },
                VideoCodec::H264,
                policy.encode_targets,
            ),
        };

        let (target, audio) = self.choose_target(d, targets)?;
        let container = match target.container {
            OutputContainer::FragmentedMp4 if !self.options.fragmented_mp4 => OutputContainer::Mp4,
            other => other,
        };

        let output_audio = match &audio {
            AudioMode::Copy => d.audio_codec(),
            AudioMode::Encode { codec, .. } => Some(*codec),
        };
        let profile = output_profile(video_codec, output_audio);

        let id = PipelineId::new();
        let output = self.options.scratch_dir.join(format!("{id}.{}", container.extension()));
        let concat_list = (sources.len() > 1).then(|| self.options.scratch_dir.join(format!("{id}.concat")));

        tracing::debug!(
            pipeline_id = %id,
            %tier,
            %container,
            video_copy = matches!(video, VideoMode::Copy),
            audio_copy = matches!(audio, AudioMode::Copy),
            inputs = sources.len(),
            "planned pipeline"
        );

        Ok(PipelineSpec {
            id,
            inputs: sources.to_vec(),
            output,
            concat_list,
            container,
            video,
            audio,
            video_codec,
            profile,
        })
    }

    /// First target carrying the audio untouched, else the last target with
    /// the audio re-encoded.
    fn choose_target(
        &self,
        d: &MediaDescriptor,
        targets: &'static [ContainerTarget],
    ) -> Result<(&'static ContainerTarget, AudioMode)> {
        if d.audio.is_none() {
            let first = targets
                .first()
                .ok_or_else(|| Error::Internal("transcode policy has no targets".into()))?;
            return Ok((first, AudioMode::Copy));
        }
        if let Some(target) = targets.iter().find(|t| t.accepts_audio(d)) {
            return Ok((target, AudioMode::Copy));
        }
        let last = targets
            .last()
            .ok_or_else(|| Error::Internal("transcode policy has no targets".into()))?;
        Ok((
            last,
            AudioMode::Encode {
                codec: AudioCodec::AacLc,
                channels: self.options.audio_channels,
                bitrate: self.options.audio_bitrate.clone(),
            },
        ))
    }
}

/// Delivery profile announced for a produced output.
pub fn output_profile(video: VideoCodec, audio: Option<AudioCodec>) -> DeliveryProfile {
    match (video, audio) {
        (VideoCodec::Mpeg4Part2, Some(AudioCodec::Ac3)) => DeliveryProfile::Mpeg4P2TsAspAc3Iso,
        (VideoCodec::Mpeg4Part2, Some(AudioCodec::Mp3 | AudioCodec::Mp3X)) => DeliveryProfile::Mpeg4P2TsAspMpeg1L3Iso,
        (VideoCodec::Mpeg4Part2, _) => DeliveryProfile::Mpeg4P2Mp4AspAac,
        _ => DeliveryProfile::AvcMp4HpHdAac,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tc_core::descriptor::{AudioStream, VideoStream};

    fn planner() -> Planner {
        Planner::new(PlannerOptions {
            scratch_dir: PathBuf::from("/scratch"),
            ..PlannerOptions::default()
        })
    }

    fn xvid(container: &str, bit_rate: u64, audio: AudioStream) -> MediaDescriptor {
        MediaDescriptor::new(container)
            .with_video(
                VideoStream::new("MPEG-4 Visual")
                    .bit_rate(bit_rate)
                    .resolution(1280, 720)
                    .frame_rate(25.0),
            )
            .with_audio(audio)
    }

    fn one_source() -> Vec<SourceLocation> {
        vec![SourceLocation::local("/movies/a.avi")]
    }

    #[test]
    fn over_bitrate_encodes_video_and_copies_ac3() {
        let d = xvid("AVI", 8_000_000, AudioStream::new("AC-3").channels(6));
        let spec = planner().plan_pipeline(ClientTier::Console, &d, &one_source()).unwrap();

        assert_eq!(
            spec.video,
            VideoMode::Encode {
                codec: VideoCodec::H264,
                preset: EncodePreset::Fast
            }
        );
        assert_eq!(spec.audio, AudioMode::Copy);
        assert_eq!(spec.container, OutputContainer::FragmentedMp4);
        assert_eq!(spec.profile, DeliveryProfile::AvcMp4HpHdAac);
        assert_eq!(spec.mime_type(), "video/mp4");
        assert!(spec.output.starts_with("/scratch"));
        assert_eq!(spec.output.extension().unwrap(), "mp4");
        assert!(spec.concat_list.is_none());
    }

    #[test]
    fn xvid_in_mkv_remuxes_to_avi() {
        let d = xvid("Matroska", 2_000_000, AudioStream::new("AC-3").channels(6));
        let spec = planner().plan_pipeline(ClientTier::Console, &d, &one_source()).unwrap();
        assert_eq!(spec.video, VideoMode::Copy);
        assert_eq!(spec.audio, AudioMode::Copy);
        assert_eq!(spec.container, OutputContainer::Avi);
        assert_eq!(spec.profile, DeliveryProfile::Mpeg4P2TsAspAc3Iso);
        assert_eq!(spec.mime_type(), "video/avi");
        assert!(spec.is_stream_copy());
    }

    #[test]
    fn xvid_with_aac_goes_to_mp4() {
        let d = xvid("Matroska", 2_000_000, AudioStream::new("AAC").profile("LC").channels(2));
        let spec = planner().plan_pipeline(ClientTier::Console, &d, &one_source()).unwrap();
        assert_eq!(spec.container, OutputContainer::Mp4);
        assert_eq!(spec.audio, AudioMode::Copy);
        assert_eq!(spec.profile, DeliveryProfile::Mpeg4P2Mp4AspAac);
    }

    #[test]
    fn unaccepted_audio_reencodes_into_last_target() {
        let d = xvid("Matroska", 2_000_000, AudioStream::new("DTS").channels(6));
        let spec = planner().plan_pipeline(ClientTier::Console, &d, &one_source()).unwrap();
        assert_eq!(spec.video, VideoMode::Copy);
        assert_eq!(spec.container, OutputContainer::Mp4);
        assert_eq!(
            spec.audio,
            AudioMode::Encode {
                codec: AudioCodec::AacLc,
                channels: 2,
                bitrate: "192k".into()
            }
        );
        assert_eq!(spec.profile, DeliveryProfile::Mpeg4P2Mp4AspAac);
    }

    #[test]
    fn avc_in_mkv_copies_to_mp4() {
        let d = MediaDescriptor::new("Matroska")
            .with_video(VideoStream::new("AVC").bit_rate(6_000_000).resolution(1920, 1080).frame_rate(24.0))
            .with_audio(AudioStream::new("AAC").profile("LC").channels(2));
        let spec = planner().plan_pipeline(ClientTier::Console, &d, &one_source()).unwrap();
        assert_eq!(spec.video, VideoMode::Copy);
        assert_eq!(spec.container, OutputContainer::Mp4);
        assert_eq!(spec.profile, DeliveryProfile::AvcMp4HpHdAac);
    }

    #[test]
    fn plain_mp4_when_fragmentation_disabled() {
        let planner = Planner::new(PlannerOptions {
            fragmented_mp4: false,
            preset: EncodePreset::Slow,
            ..PlannerOptions::default()
        });
        let d = MediaDescriptor::new("Matroska").with_video(VideoStream::new("HEVC"));
        let spec = planner.plan_pipeline(ClientTier::Console, &d, &one_source()).unwrap();
        assert_eq!(spec.container, OutputContainer::Mp4);
        assert_eq!(
            spec.video,
            VideoMode::Encode {
                codec: VideoCodec::H264,
                preset: EncodePreset::Slow
            }
        );
        assert_eq!(spec.audio, AudioMode::Copy);
    }

    #[test]
    fn multi_input_gets_concat_list() {
        let d = xvid("AVI", 8_000_000, AudioStream::new("AC-3"));
        let sources = vec![SourceLocation::local("/m/cd1.avi"), SourceLocation::local("/m/cd2.avi")];
        let spec = planner().plan_pipeline(ClientTier::Console, &d, &sources).unwrap();
        let list = spec.concat_list.expect("concat list");
        assert_eq!(list.extension().unwrap(), "concat");
        assert_eq!(list.file_stem(), spec.output.file_stem());
        assert_eq!(spec.inputs.len(), 2);
    }

    #[test]
    fn fresh_id_per_plan() {
        let d = xvid("AVI", 8_000_000, AudioStream::new("AC-3"));
        let a = planner().plan_pipeline(ClientTier::Console, &d, &one_source()).unwrap();
        let b = planner().plan_pipeline(ClientTier::Console, &d, &one_source()).unwrap();
        assert_ne!(a.id, b.id);
        assert_ne!(a.output, b.output);
    }

    #[test]
    fn errors() {
        let d = xvid("AVI", 8_000_000, AudioStream::new("AC-3"));
        let p = planner();

        assert!(matches!(
            p.plan_pipeline(ClientTier::Console, &d, &[]),
            Err(Error::Validation(_))
        ));
        assert!(matches!(
            p.plan_pipeline(ClientTier::Common, &d, &one_source()),
            Err(Error::Unsupported(_))
        ));

        let sources = vec![
            SourceLocation::remote("http://h/1.avi", vec!["-headers".into(), "X: y".into()]),
            SourceLocation::local("/m/2.avi"),
        ];
        assert!(matches!(
            p.plan_pipeline(ClientTier::Console, &d, &sources),
            Err(Error::Validation(_))
        ));
    }

    #[test]
    fn single_remote_source_keeps_options() {
        let d = xvid("AVI", 8_000_000, AudioStream::new("AC-3"));
        let sources = vec![SourceLocation::remote("http://h/1.avi", vec!["-seekable".into(), "0".into()])];
        let spec = planner().plan_pipeline(ClientTier::Console, &d, &sources).unwrap();
        assert_eq!(spec.inputs[0].input_options, vec!["-seekable", "0"]);
    }

    #[test]
    fn output_profile_mapping() {
        assert_eq!(
            output_profile(VideoCodec::Mpeg4Part2, Some(AudioCodec::Mp3X)),
            DeliveryProfile::Mpeg4P2TsAspMpeg1L3Iso
        );
        assert_eq!(output_profile(VideoCodec::Mpeg4Part2, None), DeliveryProfile::Mpeg4P2Mp4AspAac);
        assert_eq!(output_profile(VideoCodec::H264, Some(AudioCodec::Ac3)), DeliveryProfile::AvcMp4HpHdAac);
    }
}
