//! The transcoding process boundary.
//!
//! A [`Transcoder`] runs one [`PipelineSpec`] to completion or until its
//! cancellation token fires. The job supervisor only sees this trait, so
//! tests substitute an in-process fake.

use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tc_core::{Error, PipelineSpec, Result};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::process::{Child, ChildStdin, Command};
use tokio_util::sync::CancellationToken;

use crate::command::{program_name, tail};
use crate::ffmpeg::ffmpeg_args;
use crate::tools::ToolRegistry;

/// Runs a pipeline.
///
/// `Ok(())` means the tool exited successfully; the caller still checks
/// that the output exists. A fired `cancel` token yields
/// [`Error::Cancelled`].
#[async_trait]
pub trait Transcoder: Send + Sync {
    async fn run(&self, spec: &PipelineSpec, cancel: CancellationToken) -> Result<()>;
}

/// Production transcoder invoking ffmpeg once per pipeline.
#[derive(Debug, Clone)]
pub struct FfmpegTranscoder {
    program: PathBuf,
    grace: Duration,
}

impl FfmpegTranscoder {
    /// `grace` bounds how long a stopped ffmpeg may take to exit.
    pub fn new(program: impl Into<PathBuf>, grace: Duration) -> Self {
        Self {
            program: program.into(),
            grace,
        }
    }

    pub fn from_registry(registry: &ToolRegistry, grace: Duration) -> Result<Self> {
        let ffmpeg = registry.require("ffmpeg")?;
        Ok(Self::new(ffmpeg.path.clone(), grace))
    }

    pub fn program(&self) -> &std::path::Path {
        &self.program
    }

    /// Ask ffmpeg to quit, then kill it once the grace period elapses.
    async fn stop_child(&self, child: &mut Child, stdin: Option<ChildStdin>) {
        if let Some(mut stdin) = stdin {
            // The pipe closes when `stdin` drops at the end of this block.
            if let Err(e) = stdin.write_all(b"q").await {
                tracing::debug!(error = %e, "could not send quit to ffmpeg");
            }
        }

        match tokio::time::timeout(self.grace, child.wait()).await {
            Ok(Ok(status)) => tracing::debug!(%status, "ffmpeg exited after quit"),
            Ok(Err(e)) => tracing::warn!(error = %e, "waiting for stopped ffmpeg failed"),
            Err(_) => {
                tracing::warn!(grace = ?self.grace, "ffmpeg ignored quit, killing");
                if let Err(e) = child.kill().await {
                    tracing::warn!(error = %e, "failed to kill ffmpeg");
                }
            }
        }
    }
}

#[async_trait]
impl Transcoder for FfmpegTranscoder {
    async fn run(&self, spec: &PipelineSpec, cancel: CancellationToken) -> Result<()> {
        let tool = program_name(&self.program);
        let args = ffmpeg_args(spec);
        tracing::debug!(pipeline_id = %spec.id, args = ?args, "spawning ffmpeg");

        let mut child = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| Error::tool(&tool, format!("failed to spawn: {e}")))?;

        let mut stdin = child.stdin.take();
        let stderr = child.stderr.take();
        let stderr_task = tokio::spawn(async move {
            let mut buf = Vec::new();
            if let Some(mut stderr) = stderr {
                let _ = stderr.read_to_end(&mut buf).await;
            }
            String::from_utf8_lossy(&buf).into_owned()
        });

        let finished = tokio::select! {
            status = child.wait() => Some(status),
            _ = cancel.cancelled() => None,
        };

        let status = match finished {
            Some(status) => status.map_err(|e| Error::tool(&tool, format!("I/O error waiting for process: {e}")))?,
            None => {
                tracing::info!(pipeline_id = %spec.id, "stopping ffmpeg");
                self.stop_child(&mut child, stdin.take()).await;
                stderr_task.abort();
                return Err(Error::Cancelled(format!("pipeline {} stopped", spec.id)));
            }
        };
        drop(stdin);

        let stderr = stderr_task.await.unwrap_or_default();
        if !status.success() {
            return Err(Error::tool(
                tool,
                format!("exited with status {status}: {}", tail(&stderr, 5)),
            ));
        }

        tracing::debug!(pipeline_id = %spec.id, "ffmpeg finished");
        Ok(())
    }
}
