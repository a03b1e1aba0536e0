//! Transcode job orchestration.
//!
//! [`JobCache`] deduplicates requests by [`tc_core::JobKey`] and spawns one
//! supervisor task per job. Callers observe jobs through [`JobHandle`].

pub mod cache;
pub mod handle;
pub mod record;
mod supervisor;

pub use cache::JobCache;
pub use handle::JobHandle;
pub use record::{JobRecord, JobState, JobStatus};
