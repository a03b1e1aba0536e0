//! ffmpeg argument construction for a [`PipelineSpec`].

use std::path::Path;

use tc_core::{AudioMode, OutputContainer, PipelineSpec, SourceLocation, VideoMode};

use crate::x264::X264Tuning;

/// Build the complete ffmpeg argument list (without the program name).
pub fn ffmpeg_args(spec: &PipelineSpec) -> Vec<String> {
    let mut args: Vec<String> = vec!["-hide_banner".into(), "-y".into()];

    match (&spec.concat_list, spec.inputs.as_slice()) {
        (Some(list), _) => {
            args.extend(["-f", "concat", "-safe", "0", "-i"].map(String::from));
            args.push(path_arg(list));
        }
        (None, inputs) => {
            for input in inputs {
                args.extend(input.input_options.iter().cloned());
                args.push("-i".into());
                args.push(input.address.clone());
            }
        }
    }

    args.extend(["-map", "0:v:0?", "-map", "0:a:0?"].map(String::from));

    match spec.video {
        VideoMode::Copy => args.extend(["-c:v", "copy"].map(String::from)),
        VideoMode::Encode { preset, .. } => {
            args.extend(["-c:v", "libx264", "-preset"].map(String::from));
            args.push(preset.to_string());
            args.push("-x264-params".into());
            args.push(X264Tuning::for_preset(preset).to_params());
        }
    }

    match &spec.audio {
        AudioMode::Copy => args.extend(["-c:a", "copy"].map(String::from)),
        AudioMode::Encode { channels, bitrate, .. } => {
            args.extend(["-c:a", "aac", "-ac"].map(String::from));
            args.push(channels.to_string());
            args.push("-b:a".into());
            args.push(bitrate.clone());
        }
    }

    let format = match spec.container {
        OutputContainer::Avi => "avi",
        OutputContainer::Mp4 => "mp4",
        OutputContainer::FragmentedMp4 => {
            args.extend(["-movflags", "+frag_keyframe+empty_moov"].map(String::from));
            "mp4"
        }
    };
    args.extend(["-f", format].map(String::from));
    args.push(path_arg(&spec.output));

    args
}

/// Contents of an ffmpeg concat-demuxer list for `inputs`, in order.
pub fn concat_list_contents(inputs: &[SourceLocation]) -> String {
    inputs
        .iter()
        .map(|input| format!("file '{}'\n", input.address.replace('\'', r"'\''")))
        .collect()
}

fn path_arg(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tc_core::{AudioCodec, DeliveryProfile, EncodePreset, PipelineId, VideoCodec};

    fn spec(video: VideoMode, audio: AudioMode, container: OutputContainer) -> PipelineSpec {
        PipelineSpec {
            id: PipelineId::new(),
            inputs: vec![SourceLocation::local("/movies/a.mkv")],
            output: PathBuf::from("/scratch/out.mp4"),
            concat_list: None,
            container,
            video,
            audio,
            video_codec: VideoCodec::H264,
            profile: DeliveryProfile::AvcMp4HpHdAac,
        }
    }

    fn window<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
        args.iter().position(|a| a == flag).map(|i| args[i + 1].as_str())
    }

    #[test]
    fn encode_args() {
        let args = ffmpeg_args(&spec(
            VideoMode::Encode {
                codec: VideoCodec::H264,
                preset: EncodePreset::Fast,
            },
            AudioMode::Encode {
                codec: AudioCodec::AacLc,
                channels: 2,
                bitrate: "192k".into(),
            },
            OutputContainer::FragmentedMp4,
        ));

        assert_eq!(&args[..2], ["-hide_banner", "-y"]);
        assert_eq!(window(&args, "-i"), Some("/movies/a.mkv"));
        assert_eq!(window(&args, "-c:v"), Some("libx264"));
        assert_eq!(window(&args, "-preset"), Some("fast"));
        assert!(window(&args, "-x264-params").unwrap().starts_with("mbtree=0:me=dia"));
        assert_eq!(window(&args, "-c:a"), Some("aac"));
        assert_eq!(window(&args, "-ac"), Some("2"));
        assert_eq!(window(&args, "-b:a"), Some("192k"));
        assert_eq!(window(&args, "-movflags"), Some("+frag_keyframe+empty_moov"));
        assert_eq!(window(&args, "-f"), Some("mp4"));
        assert_eq!(args.last().unwrap(), "/scratch/out.mp4");
    }

    #[test]
    fn copy_to_avi() {
        let args = ffmpeg_args(&spec(VideoMode::Copy, AudioMode::Copy, OutputContainer::Avi));
        assert_eq!(window(&args, "-c:v"), Some("copy"));
        assert_eq!(window(&args, "-c:a"), Some("copy"));
        assert_eq!(window(&args, "-f"), Some("avi"));
        assert!(!args.iter().any(|a| a == "-movflags"));
        assert_eq!(args.iter().filter(|a| *a == "-map").count(), 2);
    }

    #[test]
    fn input_options_precede_input() {
        let mut s = spec(VideoMode::Copy, AudioMode::Copy, OutputContainer::Mp4);
        s.inputs = vec![SourceLocation::remote(
            "http://host/a.mkv",
            vec!["-headers".into(), "Cookie: x".into()],
        )];
        let args = ffmpeg_args(&s);
        let headers = args.iter().position(|a| a == "-headers").unwrap();
        let input = args.iter().position(|a| a == "-i").unwrap();
        assert!(headers < input);
        assert_eq!(window(&args, "-i"), Some("http://host/a.mkv"));
    }

    #[test]
    fn concat_list_replaces_inputs() {
        let mut s = spec(VideoMode::Copy, AudioMode::Copy, OutputContainer::Avi);
        s.inputs = vec![SourceLocation::local("/m/cd1.avi"), SourceLocation::local("/m/cd2.avi")];
        s.concat_list = Some(PathBuf::from("/scratch/x.concat"));
        let args = ffmpeg_args(&s);
        assert_eq!(window(&args, "-f"), Some("concat"));
        assert_eq!(window(&args, "-safe"), Some("0"));
        assert_eq!(window(&args, "-i"), Some("/scratch/x.concat"));
        assert_eq!(args.iter().filter(|a| *a == "-i").count(), 1);
    }

    #[test]
    fn concat_list_quotes() {
        let list = concat_list_contents(&[SourceLocation::local("/m/it's.avi"), SourceLocation::local("/m/b.avi")]);
        assert_eq!(list, "file '/m/it'\\''s.avi'\nfile '/m/b.avi'\n");
    }
}
