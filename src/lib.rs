//! transcast: transcoding decisions and job orchestration for home media
//! servers.
//!
//! The [`engine::Engine`] answers one question per request: can this client
//! play the source as-is, and if not, which transcode serves it. Transcodes
//! are deduplicated per source and client tier by the [`jobs::JobCache`].

pub mod config;
pub mod engine;
pub mod jobs;
pub mod scratch;

pub use engine::{Decider, Decision, Engine, Outcome};
pub use jobs::{JobCache, JobHandle, JobState, JobStatus};
