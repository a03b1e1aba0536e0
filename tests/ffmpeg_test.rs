//! Engine driving a real child process through [`FfmpegTranscoder`], with a
//! shell script standing in for ffmpeg.

#![cfg(unix)]

mod common;

use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use common::{avi_asp, CONSOLE_AGENTS};
use serial_test::serial;
use tc_av::FfmpegTranscoder;
use tc_core::config::Config;
use tc_core::SourceLocation;
use transcast::{Engine, JobState, Outcome};

/// Fake ffmpeg that records its arguments next to itself and writes the
/// output file (its last argument).
fn fake_ffmpeg(dir: &Path) -> PathBuf {
    let path = dir.join("ffmpeg");
    let script = format!(
        "#!/bin/sh\necho \"$@\" > {}/args.txt\nfor last; do :; done\necho data > \"$last\"\n",
        dir.display()
    );
    std::fs::write(&path, script).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path
}

async fn engine(dir: &Path, program: PathBuf) -> Engine {
    let mut config = Config::default();
    config.scratch.dir = dir.join("scratch");
    config.transcode.shutdown_grace_secs = 1;
    let transcoder = FfmpegTranscoder::new(program, config.transcode.shutdown_grace());
    Engine::init(config, Arc::new(transcoder)).await
}

#[tokio::test]
#[serial]
async fn multi_part_transcode_uses_concat_list() {
    let dir = tempfile::tempdir().unwrap();
    let engine = engine(dir.path(), fake_ffmpeg(dir.path())).await;
    let parts = vec![SourceLocation::local("/m/cd1.avi"), SourceLocation::local("/m/it's cd2.avi")];

    let handle = match engine.request(&avi_asp(8_000_000), &CONSOLE_AGENTS, &parts).unwrap() {
        Outcome::Transcoding { handle, .. } => handle,
        other => panic!("expected a transcode, got {other:?}"),
    };
    let list = handle.pipeline().unwrap().concat_list.clone().unwrap();

    let status = handle.wait().await;
    assert_eq!(status.state, JobState::Completed);
    assert!(status.output.unwrap().exists());
    // The concat list is only needed while the process runs.
    assert!(!list.exists());

    let args = std::fs::read_to_string(dir.path().join("args.txt")).unwrap();
    assert!(args.contains("-f concat -safe 0 -i"), "{args}");
    assert!(args.contains("-c:v libx264 -preset fast"), "{args}");
    assert!(args.contains("-c:a copy"), "{args}");
    assert!(args.contains("-movflags +frag_keyframe+empty_moov"), "{args}");

    engine.shutdown().await;
}

#[tokio::test]
#[serial]
async fn tool_failure_marks_job_failed() {
    let dir = tempfile::tempdir().unwrap();
    let program = dir.path().join("ffmpeg");
    std::fs::write(&program, "#!/bin/sh\necho 'Conversion failed!' >&2\nexit 1\n").unwrap();
    std::fs::set_permissions(&program, std::fs::Permissions::from_mode(0o755)).unwrap();
    let engine = engine(dir.path(), program).await;

    let outcome = engine
        .request(&avi_asp(8_000_000), &CONSOLE_AGENTS, &[SourceLocation::local("/m/a.avi")])
        .unwrap();
    let handle = match outcome {
        Outcome::Transcoding { handle, .. } => handle,
        other => panic!("expected a transcode, got {other:?}"),
    };

    let status = handle.wait().await;
    assert_eq!(status.state, JobState::Failed);
    assert!(status.error.unwrap().contains("Conversion failed!"));
    assert!(!handle.output_path().exists());

    engine.shutdown().await;
}
