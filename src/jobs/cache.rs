//! Keyed job cache with request coalescing.
//!
//! At most one non-terminal [`JobRecord`] exists per [`JobKey`]. The DashMap
//! shard lock held through `entry()` makes "look up, plan, insert" atomic
//! per key; the supervisor task is spawned only after that lock is released.
//!
//! Supervisor tasks are owned by the cache rather than by their records, so
//! a record replaced while its process is still winding down stays tracked
//! until shutdown.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use parking_lot::Mutex;
use tc_av::Transcoder;
use tc_core::events::{EventBus, EventPayload};
use tc_core::{Error, JobKey, PipelineSpec, Result};
use tokio::runtime::Handle;
use tokio::task::JoinSet;

use super::handle::JobHandle;
use super::record::JobRecord;
use super::supervisor::supervise;

/// Extra time granted to supervisor tasks on top of the process grace
/// period during shutdown.
const SHUTDOWN_MARGIN: Duration = Duration::from_secs(2);

pub struct JobCache {
    jobs: DashMap<JobKey, Arc<JobRecord>>,
    transcoder: Arc<dyn Transcoder>,
    events: Arc<EventBus>,
    shutting_down: AtomicBool,
    tasks: Mutex<JoinSet<()>>,
    runtime: Handle,
}

impl JobCache {
    /// Supervisor tasks are spawned on `runtime`.
    pub fn new(transcoder: Arc<dyn Transcoder>, events: Arc<EventBus>, runtime: Handle) -> Self {
        Self {
            jobs: DashMap::new(),
            transcoder,
            events,
            shutting_down: AtomicBool::new(false),
            tasks: Mutex::new(JoinSet::new()),
            runtime,
        }
    }

    /// Return the job for `key`, creating it from `factory` when no
    /// reusable record exists.
    ///
    /// A pending, running or completed record (with its output still on
    /// disk) is returned without calling `factory`. Failed and stopped
    /// records are replaced. When `factory` fails its error is returned and
    /// no record is left behind for `key`.
    pub fn get_or_create<F>(&self, key: &JobKey, factory: F) -> Result<JobHandle>
    where
        F: FnOnce() -> Result<PipelineSpec>,
    {
        if self.is_shutting_down() {
            return Err(Error::ShuttingDown);
        }

        let record = match self.jobs.entry(key.clone()) {
            Entry::Occupied(mut entry) => {
                if entry.get().is_reusable() {
                    let record = entry.get().clone();
                    drop(entry);
                    tracing::debug!(job_key = %key, job_id = %record.id(), "joined existing job");
                    self.events.broadcast(EventPayload::CacheHit {
                        job_id: record.id(),
                        key: key.clone(),
                    });
                    return Ok(JobHandle::live(record));
                }
                match factory() {
                    Ok(spec) => {
                        let record = JobRecord::new(key.clone(), spec);
                        let stale = entry.insert(record.clone());
                        tracing::debug!(job_key = %key, previous = ?stale.state(), "replacing finished job");
                        record
                    }
                    Err(e) => {
                        entry.remove();
                        return Err(e);
                    }
                }
            }
            Entry::Vacant(entry) => {
                let record = JobRecord::new(key.clone(), factory()?);
                entry.insert(record.clone());
                record
            }
        };

        self.launch(&record)?;
        Ok(JobHandle::live(record))
    }

    fn launch(&self, record: &Arc<JobRecord>) -> Result<()> {
        let mut tasks = self.tasks.lock();
        // Checked under the task lock: once shutdown has drained the set,
        // nothing may be spawned into it.
        if self.is_shutting_down() {
            record.request_stop();
            return Err(Error::ShuttingDown);
        }
        while tasks.try_join_next().is_some() {}

        tracing::info!(job_key = %record.key(), pipeline_id = %record.spec().id, "transcode queued");
        self.events.broadcast(EventPayload::TranscodeQueued {
            job_id: record.id(),
            key: record.key().clone(),
            pipeline_id: record.spec().id,
        });
        tasks.spawn_on(
            supervise(record.clone(), self.transcoder.clone(), self.events.clone()),
            &self.runtime,
        );
        Ok(())
    }

    /// Whether a request for `key` would attach to an existing record.
    pub fn contains_job(&self, key: &JobKey) -> bool {
        self.jobs.get(key).is_some_and(|r| r.is_reusable())
    }

    pub fn contains_completed(&self, key: &JobKey) -> bool {
        self.retrieve_completed(key).is_some()
    }

    /// Output of the completed job for `key`, if its file still exists.
    pub fn retrieve_completed(&self, key: &JobKey) -> Option<std::path::PathBuf> {
        self.jobs.get(key).and_then(|r| r.completed_output())
    }

    /// Handle to the current record for `key`, in whatever state it is.
    pub fn retrieve_job(&self, key: &JobKey) -> Option<JobHandle> {
        self.jobs.get(key).map(|r| JobHandle::live(r.value().clone()))
    }

    /// Request a stop of the job for `key`. Returns false when there is no
    /// such job or it already finished.
    pub fn stop(&self, key: &JobKey) -> bool {
        let record = match self.jobs.get(key) {
            Some(r) => r.value().clone(),
            None => return false,
        };
        let stopped = record.request_stop();
        if stopped {
            tracing::info!(job_key = %key, "stop requested");
        }
        stopped
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    pub fn is_shutting_down(&self) -> bool {
        self.shutting_down.load(Ordering::Acquire)
    }

    /// Stop every job and release all records.
    ///
    /// Running processes get `grace` to exit after being asked to quit.
    /// Supervisor tasks still alive after that (plus a small margin) are
    /// aborted, which kills their child process on drop. This includes
    /// tasks of records that were already replaced.
    pub async fn shutdown(&self, grace: Duration) {
        if self.shutting_down.swap(true, Ordering::AcqRel) {
            return;
        }

        let mut stopping = 0;
        for entry in self.jobs.iter() {
            if entry.value().request_stop() {
                tracing::debug!(job_key = %entry.key(), "stopping job for shutdown");
                stopping += 1;
            }
        }
        let mut tasks = std::mem::take(&mut *self.tasks.lock());
        tracing::info!(jobs = self.jobs.len(), stopping, tasks = tasks.len(), "shutting down job cache");

        let drain = async {
            while let Some(result) = tasks.join_next().await {
                if let Err(e) = result {
                    if e.is_panic() {
                        tracing::warn!(error = %e, "job supervisor panicked");
                    }
                }
            }
        };
        if tokio::time::timeout(grace.saturating_add(SHUTDOWN_MARGIN), drain).await.is_err() {
            tracing::warn!(remaining = tasks.len(), "job supervisors did not exit in time, aborting");
            tasks.shutdown().await;
        }

        self.jobs.clear();
    }
}

impl std::fmt::Debug for JobCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JobCache")
            .field("jobs", &self.jobs.len())
            .field("shutting_down", &self.is_shutting_down())
            .finish_non_exhaustive()
    }
}
