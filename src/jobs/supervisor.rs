//! Drives one job record through its lifecycle.
//!
//! The supervisor task owns the process side of a job: it writes the
//! concat list, runs the transcoder, verifies the output and resolves the
//! record to `Completed`, `Failed` or `Stopped`. Every exit path resolves
//! the record, including a panicking transcoder; a stopped record is never
//! overwritten.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::path::Path;
use std::sync::Arc;

use futures::FutureExt;
use tc_av::{concat_list_contents, Transcoder};
use tc_core::events::{EventBus, EventPayload};
use tc_core::{Error, PipelineSpec, Result};
use tokio_util::sync::CancellationToken;

use super::record::JobRecord;

pub(crate) async fn supervise(record: Arc<JobRecord>, transcoder: Arc<dyn Transcoder>, events: Arc<EventBus>) {
    let key = record.key().clone();
    let job_id = record.id();
    let spec = record.spec();

    if !record.mark_running() {
        tracing::debug!(job_key = %key, "job stopped before launch");
        events.broadcast(EventPayload::TranscodeStopped { job_id, key });
        return;
    }
    tracing::info!(job_key = %key, pipeline_id = %spec.id, "transcode started");
    events.broadcast(EventPayload::TranscodeStarted {
        job_id,
        key: key.clone(),
    });

    let result = AssertUnwindSafe(run_pipeline(transcoder.as_ref(), spec, record.cancel_token()))
        .catch_unwind()
        .await
        .unwrap_or_else(|panic| {
            let message = format!("transcoder panicked: {}", panic_message(&*panic));
            Err(Error::pipeline("transcode", message))
        });
    if let Some(list) = &spec.concat_list {
        remove_quietly(list).await;
    }

    match result {
        Ok(()) if record.mark_completed(spec.output.clone()) => {
            tracing::info!(job_key = %key, output = %spec.output.display(), "transcode completed");
            events.broadcast(EventPayload::TranscodeCompleted {
                job_id,
                key,
                output: spec.output.clone(),
            });
        }
        Ok(()) | Err(Error::Cancelled(_)) => {
            // Stop won the race with completion, or the process was cancelled.
            remove_quietly(&spec.output).await;
            record.request_stop();
            tracing::info!(job_key = %key, "transcode stopped");
            events.broadcast(EventPayload::TranscodeStopped { job_id, key });
        }
        Err(e) => {
            remove_quietly(&spec.output).await;
            if record.mark_failed(e.to_string()) {
                tracing::warn!(job_key = %key, error = %e, "transcode failed");
                events.broadcast(EventPayload::TranscodeFailed {
                    job_id,
                    key,
                    error: e.to_string(),
                });
            } else {
                tracing::info!(job_key = %key, "transcode stopped");
                events.broadcast(EventPayload::TranscodeStopped { job_id, key });
            }
        }
    }
}

async fn run_pipeline(transcoder: &dyn Transcoder, spec: &PipelineSpec, cancel: CancellationToken) -> Result<()> {
    if let Some(parent) = spec.output.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    if let Some(list) = &spec.concat_list {
        tokio::fs::write(list, concat_list_contents(&spec.inputs))
            .await
            .map_err(|e| Error::pipeline("concat", format!("writing {}: {e}", list.display())))?;
    }
    if cancel.is_cancelled() {
        return Err(Error::Cancelled(format!("pipeline {} stopped before launch", spec.id)));
    }

    transcoder.run(spec, cancel).await?;

    match tokio::fs::try_exists(&spec.output).await {
        Ok(true) => Ok(()),
        _ => Err(Error::pipeline(
            "verify",
            format!("tool exited cleanly but {} is missing", spec.output.display()),
        )),
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> &str {
    panic
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| panic.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("unknown panic")
}

async fn remove_quietly(path: &Path) {
    match tokio::fs::remove_file(path).await {
        Ok(()) => tracing::debug!(path = %path.display(), "removed partial output"),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => tracing::warn!(path = %path.display(), error = %e, "failed to remove file"),
    }
}
