//! Shared test harness for integration tests.
//!
//! Provides [`FakeTranscoder`], an in-process stand-in for ffmpeg, and
//! [`TestHarness`], which builds an [`Engine`] over a temporary scratch
//! directory.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tc_av::Transcoder;
use tc_core::config::Config;
use tc_core::descriptor::{AudioStream, VideoStream};
use tc_core::{Error, MediaDescriptor, PipelineSpec, Result};
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;
use transcast::Engine;

/// Transcoder that sleeps, then writes a small output file or fails.
pub struct FakeTranscoder {
    delay: Duration,
    fail: bool,
    calls: AtomicUsize,
}

impl FakeTranscoder {
    pub fn new(delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            delay,
            fail: false,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            delay: Duration::from_millis(10),
            fail: true,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Transcoder for FakeTranscoder {
    async fn run(&self, spec: &PipelineSpec, cancel: CancellationToken) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::select! {
            _ = tokio::time::sleep(self.delay) => {}
            _ = cancel.cancelled() => return Err(Error::Cancelled(format!("pipeline {}", spec.id))),
        }
        if self.fail {
            return Err(Error::tool("ffmpeg", "exited with status 1: Invalid data found"));
        }
        tokio::fs::write(&spec.output, b"transcoded").await?;
        Ok(())
    }
}

/// Transcoder that keeps running for `linger` after being cancelled, like a
/// process slow to honor a quit request. Tracks how many runs are alive.
pub struct LingeringTranscoder {
    linger: Duration,
    active: AtomicUsize,
}

struct ActiveRun<'a>(&'a AtomicUsize);

impl Drop for ActiveRun<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl LingeringTranscoder {
    pub fn new(linger: Duration) -> Arc<Self> {
        Arc::new(Self {
            linger,
            active: AtomicUsize::new(0),
        })
    }

    pub fn active(&self) -> usize {
        self.active.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Transcoder for LingeringTranscoder {
    async fn run(&self, spec: &PipelineSpec, cancel: CancellationToken) -> Result<()> {
        self.active.fetch_add(1, Ordering::SeqCst);
        let _run = ActiveRun(&self.active);
        cancel.cancelled().await;
        tokio::time::sleep(self.linger).await;
        Err(Error::Cancelled(format!("pipeline {}", spec.id)))
    }
}

/// Engine over a private scratch directory.
pub struct TestHarness {
    pub engine: Engine,
    // Held so the directory outlives the engine.
    pub dir: TempDir,
}

impl TestHarness {
    pub async fn new(transcoder: Arc<dyn Transcoder>) -> Self {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let mut config = Config::default();
        config.scratch.dir = dir.path().join("scratch");
        config.transcode.shutdown_grace_secs = 1;
        let engine = Engine::init(config, transcoder).await;
        Self { engine, dir }
    }
}

/// Client strings identifying the console tier.
pub const CONSOLE_AGENTS: [&str; 2] = ["Mozilla/5.0", "XboxLive/3.0"];

/// AVI, MPEG-4 Visual ASP, 1280x720 at 25 fps with 6-channel AC-3.
pub fn avi_asp(bit_rate: u64) -> MediaDescriptor {
    MediaDescriptor::new("AVI")
        .with_video(
            VideoStream::new("MPEG-4 Visual")
                .profile("Advanced Simple@L5")
                .codec_id("XVID")
                .bit_rate(bit_rate)
                .resolution(1280, 720)
                .frame_rate(25.0),
        )
        .with_audio(AudioStream::new("AC-3").channels(6).sample_rate(48000))
}

/// Matroska with H.264 at 1080p and DTS audio; never playable on the console.
pub fn mkv_avc_dts() -> MediaDescriptor {
    MediaDescriptor::new("Matroska")
        .with_video(
            VideoStream::new("AVC")
                .profile("High@L4.1")
                .bit_rate(8_000_000)
                .resolution(1920, 1080)
                .frame_rate(23.976),
        )
        .with_audio(AudioStream::new("DTS").channels(6))
}
