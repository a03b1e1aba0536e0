//! Caller-facing view of a job.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tc_core::{JobId, JobKey, PipelineSpec};

use super::record::{JobRecord, JobState, JobStatus};

#[derive(Debug, Clone)]
enum Inner {
    Live(Arc<JobRecord>),
    /// A cache hit on an output that already exists.
    Finished(PathBuf),
}

/// Handle to a transcode job. Cheap to clone; every clone observes the
/// same record.
#[derive(Debug, Clone)]
pub struct JobHandle {
    inner: Inner,
}

impl JobHandle {
    pub(crate) fn live(record: Arc<JobRecord>) -> Self {
        Self {
            inner: Inner::Live(record),
        }
    }

    /// A handle for an output that needs no job. All three flags are set.
    pub fn pre_finished(output: impl Into<PathBuf>) -> Self {
        Self {
            inner: Inner::Finished(output.into()),
        }
    }

    pub fn is_pre_finished(&self) -> bool {
        matches!(self.inner, Inner::Finished(_))
    }

    pub fn id(&self) -> Option<JobId> {
        match &self.inner {
            Inner::Live(record) => Some(record.id()),
            Inner::Finished(_) => None,
        }
    }

    pub fn key(&self) -> Option<&JobKey> {
        match &self.inner {
            Inner::Live(record) => Some(record.key()),
            Inner::Finished(_) => None,
        }
    }

    /// The pipeline this job runs.
    pub fn pipeline(&self) -> Option<&PipelineSpec> {
        match &self.inner {
            Inner::Live(record) => Some(record.spec()),
            Inner::Finished(_) => None,
        }
    }

    /// Current status without blocking.
    pub fn status(&self) -> JobStatus {
        match &self.inner {
            Inner::Live(record) => record.status(),
            Inner::Finished(output) => JobStatus {
                state: JobState::Completed,
                reached_running: true,
                output: Some(output.clone()),
                error: None,
            },
        }
    }

    pub fn started(&self) -> bool {
        self.is_pre_finished() || self.status().started()
    }

    pub fn finished(&self) -> bool {
        self.is_pre_finished() || self.status().finished()
    }

    pub fn stopped(&self) -> bool {
        self.is_pre_finished() || self.status().stopped()
    }

    /// Output path once the job completed.
    pub fn output(&self) -> Option<PathBuf> {
        match &self.inner {
            Inner::Live(record) => record.status().output,
            Inner::Finished(output) => Some(output.clone()),
        }
    }

    /// Expected output location, known before the job completes.
    pub fn output_path(&self) -> &Path {
        match &self.inner {
            Inner::Live(record) => &record.spec().output,
            Inner::Finished(output) => output,
        }
    }

    /// Wait until the job reaches a terminal state.
    pub async fn wait(&self) -> JobStatus {
        let record = match &self.inner {
            Inner::Live(record) => record,
            Inner::Finished(_) => return self.status(),
        };
        let mut rx = record.subscribe();
        // The sender lives in the record we hold, so this only errors if the
        // record is being torn down.
        let status = match rx.wait_for(|s| s.state.is_terminal()).await {
            Ok(status) => status.clone(),
            Err(_) => record.status(),
        };
        status
    }

    /// Request a stop. Returns false when the job already finished.
    pub fn stop(&self) -> bool {
        match &self.inner {
            Inner::Live(record) => record.request_stop(),
            Inner::Finished(_) => false,
        }
    }
}
