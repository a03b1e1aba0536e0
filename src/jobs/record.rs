//! Job records and their lifecycle state.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tc_core::{JobId, JobKey, PipelineSpec};
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

/// Lifecycle state of a job.
///
/// `Pending -> Running -> (Completed | Failed)`, with `Stopped` reachable
/// from `Pending` or `Running`. Terminal states never change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum JobState {
    Pending,
    Running,
    Completed,
    Failed,
    Stopped,
}

impl JobState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed | Self::Stopped)
    }

    fn can_become(&self, next: JobState) -> bool {
        use JobState::*;
        matches!(
            (self, next),
            (Pending, Running) | (Pending, Failed) | (Pending, Stopped) | (Running, Completed) | (Running, Failed) | (Running, Stopped)
        )
    }
}

/// Snapshot of a job, as published on its watch channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobStatus {
    pub state: JobState,
    /// Whether the job ever reached `Running`.
    pub reached_running: bool,
    /// Set once `Completed`.
    pub output: Option<PathBuf>,
    /// Set once `Failed`.
    pub error: Option<String>,
}

impl JobStatus {
    fn pending() -> Self {
        Self {
            state: JobState::Pending,
            reached_running: false,
            output: None,
            error: None,
        }
    }

    pub fn started(&self) -> bool {
        match self.state {
            JobState::Pending => false,
            JobState::Running | JobState::Completed | JobState::Failed => true,
            JobState::Stopped => self.reached_running,
        }
    }

    pub fn finished(&self) -> bool {
        self.state == JobState::Completed
    }

    /// True for both requested stops and failures.
    pub fn stopped(&self) -> bool {
        matches!(self.state, JobState::Stopped | JobState::Failed)
    }
}

/// One transcode job, shared between the cache, its supervisor task and
/// any number of handles.
pub struct JobRecord {
    id: JobId,
    key: JobKey,
    spec: PipelineSpec,
    created_at: DateTime<Utc>,
    cancel: CancellationToken,
    status: watch::Sender<JobStatus>,
}

impl JobRecord {
    pub(crate) fn new(key: JobKey, spec: PipelineSpec) -> Arc<Self> {
        let (status, _) = watch::channel(JobStatus::pending());
        Arc::new(Self {
            id: JobId::new(),
            key,
            spec,
            created_at: Utc::now(),
            cancel: CancellationToken::new(),
            status,
        })
    }

    pub fn id(&self) -> JobId {
        self.id
    }

    pub fn key(&self) -> &JobKey {
        &self.key
    }

    pub fn spec(&self) -> &PipelineSpec {
        &self.spec
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn status(&self) -> JobStatus {
        self.status.borrow().clone()
    }

    pub fn state(&self) -> JobState {
        self.status.borrow().state
    }

    pub(crate) fn subscribe(&self) -> watch::Receiver<JobStatus> {
        self.status.subscribe()
    }

    pub(crate) fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Output path if the job completed and the file is still on disk.
    pub fn completed_output(&self) -> Option<PathBuf> {
        let status = self.status.borrow();
        match (&status.state, &status.output) {
            (JobState::Completed, Some(output)) if output.exists() => Some(output.clone()),
            _ => None,
        }
    }

    /// Whether a request for this key should attach to this record.
    pub(crate) fn is_reusable(&self) -> bool {
        match self.state() {
            JobState::Pending | JobState::Running => true,
            JobState::Completed => self.completed_output().is_some(),
            JobState::Failed | JobState::Stopped => false,
        }
    }

    /// Apply `next` if the current state allows it. Returns whether the
    /// state changed.
    fn transition(&self, next: JobState, apply: impl FnOnce(&mut JobStatus)) -> bool {
        self.status.send_if_modified(|status| {
            if !status.state.can_become(next) {
                return false;
            }
            status.state = next;
            if next == JobState::Running {
                status.reached_running = true;
            }
            apply(status);
            true
        })
    }

    pub(crate) fn mark_running(&self) -> bool {
        self.transition(JobState::Running, |_| {})
    }

    pub(crate) fn mark_completed(&self, output: PathBuf) -> bool {
        self.transition(JobState::Completed, |s| s.output = Some(output))
    }

    pub(crate) fn mark_failed(&self, error: String) -> bool {
        self.transition(JobState::Failed, |s| s.error = Some(error))
    }

    /// Mark the job stopped and cancel its process. Returns false when the
    /// job had already reached a terminal state.
    pub(crate) fn request_stop(&self) -> bool {
        let stopped = self.transition(JobState::Stopped, |_| {});
        if stopped {
            self.cancel.cancel();
        }
        stopped
    }
}

impl std::fmt::Debug for JobRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JobRecord")
            .field("id", &self.id)
            .field("key", &self.key)
            .field("pipeline_id", &self.spec.id)
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}
