//! Composition root tying resolution, planning and job orchestration
//! together.

use std::sync::Arc;

use serde::Serialize;
use tc_av::{FfmpegTranscoder, ToolRegistry, Transcoder};
use tc_core::config::Config;
use tc_core::events::EventBus;
use tc_core::{DeliveryProfile, Error, JobKey, MediaDescriptor, PipelineSpec, Result, SourceLocation};
use tc_rules::{ClientTier, Planner, PlannerOptions, ProfileResolver};
use tokio::runtime::Handle;

use crate::jobs::{JobCache, JobHandle};
use crate::scratch::ScratchDir;

const FALLBACK_MIME: &str = "application/octet-stream";

/// What would happen for a request, without starting anything.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum Decision {
    /// Serve the source untouched.
    DirectPlay { profile: DeliveryProfile, mime: &'static str },
    /// Run this pipeline first.
    Transcode(PipelineSpec),
    Unsupported,
}

/// Result of [`Engine::request`].
#[derive(Debug, Clone)]
pub enum Outcome {
    DirectPlay {
        profile: DeliveryProfile,
        mime: &'static str,
    },
    Transcoding {
        handle: JobHandle,
        profile: DeliveryProfile,
        mime: &'static str,
    },
    Unsupported,
}

/// Where a request lands before any job is involved.
enum Route {
    Direct(DeliveryProfile, &'static str),
    Transcode(ClientTier),
    Unsupported,
}

/// Resolution and planning without any job state. Cheap to build and
/// free of side effects.
#[derive(Debug, Clone, Default)]
pub struct Decider {
    resolver: ProfileResolver,
    planner: Planner,
}

impl Decider {
    pub fn new(resolver: ProfileResolver, planner: Planner) -> Self {
        Self { resolver, planner }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(ProfileResolver::default(), Planner::new(PlannerOptions::from_config(config)))
    }

    pub fn resolver(&self) -> &ProfileResolver {
        &self.resolver
    }

    pub fn planner(&self) -> &Planner {
        &self.planner
    }

    fn route<S: AsRef<str>>(&self, d: &MediaDescriptor, agents: &[S]) -> (ClientTier, Route) {
        let tier = self.resolver.resolve_client_tier(agents);
        let route = if self.resolver.is_directly_playable(tier, d) {
            let (profile, mime) = self.source_delivery(d);
            Route::Direct(profile, mime)
        } else if tier.transcode_policy().is_some() {
            Route::Transcode(tier)
        } else {
            // A tier that cannot transcode gets the source as-is when it
            // is at least a known format.
            let (profile, mime) = self.source_delivery(d);
            if profile.is_none() {
                Route::Unsupported
            } else {
                Route::Direct(profile, mime)
            }
        };
        (tier, route)
    }

    /// Catalog profile and MIME type of the untouched source.
    fn source_delivery(&self, d: &MediaDescriptor) -> (DeliveryProfile, &'static str) {
        let profile = if d.video.is_some() {
            self.resolver.resolve_video_profile(d)
        } else {
            self.resolver.resolve_audio_profile(d)
        };
        let mime = self
            .resolver
            .source_mime(d)
            .or_else(|| profile.mime_type())
            .unwrap_or(FALLBACK_MIME);
        (profile, mime)
    }

    /// Decide how a request would be served. Direct play and a planned
    /// transcode are mutually exclusive.
    pub fn decide<S: AsRef<str>>(&self, d: &MediaDescriptor, agents: &[S], sources: &[SourceLocation]) -> Result<Decision> {
        let (tier, route) = self.route(d, agents);
        let decision = match route {
            Route::Direct(profile, mime) => Decision::DirectPlay { profile, mime },
            Route::Unsupported => Decision::Unsupported,
            Route::Transcode(tier) => Decision::Transcode(self.planner.plan_pipeline(tier, d, sources)?),
        };
        tracing::debug!(%tier, decision = decision.label(), "decided");
        Ok(decision)
    }
}

pub struct Engine {
    config: Config,
    decider: Decider,
    jobs: JobCache,
    events: Arc<EventBus>,
    scratch: ScratchDir,
}

impl Engine {
    /// Build an engine around `transcoder`. Wipes and recreates the scratch
    /// directory. Must be called within a tokio runtime.
    pub async fn init(config: Config, transcoder: Arc<dyn Transcoder>) -> Self {
        for warning in config.validate() {
            tracing::warn!("config: {warning}");
        }
        let scratch = ScratchDir::init(config.scratch.dir.clone()).await;
        let events = Arc::new(EventBus::new(config.events.capacity));
        let jobs = JobCache::new(transcoder, events.clone(), Handle::current());
        tracing::info!(scratch = %scratch.path().display(), preset = %config.transcode.preset, "engine ready");

        Self {
            decider: Decider::from_config(&config),
            jobs,
            events,
            scratch,
            config,
        }
    }

    /// Build an engine running ffmpeg found through the configured tools.
    pub async fn with_ffmpeg(config: Config) -> Result<Self> {
        let registry = ToolRegistry::discover(&config.tools);
        let transcoder = FfmpegTranscoder::from_registry(&registry, config.transcode.shutdown_grace())?;
        Ok(Self::init(config, Arc::new(transcoder)).await)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn resolver(&self) -> &ProfileResolver {
        self.decider.resolver()
    }

    pub fn decider(&self) -> &Decider {
        &self.decider
    }

    pub fn jobs(&self) -> &JobCache {
        &self.jobs
    }

    pub fn events(&self) -> &Arc<EventBus> {
        &self.events
    }

    pub fn scratch(&self) -> &ScratchDir {
        &self.scratch
    }

    /// Same as [`Decider::decide`]; never touches the job cache.
    pub fn decide<S: AsRef<str>>(&self, d: &MediaDescriptor, agents: &[S], sources: &[SourceLocation]) -> Result<Decision> {
        self.decider.decide(d, agents, sources)
    }

    /// Serve a request: direct play, or a handle to the (possibly shared)
    /// transcode job producing a deliverable.
    pub fn request<S: AsRef<str>>(&self, d: &MediaDescriptor, agents: &[S], sources: &[SourceLocation]) -> Result<Outcome> {
        let tier = match self.decider.route(d, agents) {
            (_, Route::Direct(profile, mime)) => return Ok(Outcome::DirectPlay { profile, mime }),
            (_, Route::Unsupported) => return Ok(Outcome::Unsupported),
            (_, Route::Transcode(tier)) => tier,
        };
        if sources.is_empty() {
            return Err(Error::Validation("no source locations to transcode".into()));
        }

        let key = JobKey::for_sources(tier.as_str(), sources.iter().map(|s| s.address.as_str()));
        if let Some(output) = self.jobs.retrieve_completed(&key) {
            let spec = self
                .jobs
                .retrieve_job(&key)
                .and_then(|h| h.pipeline().map(|p| (p.profile, p.mime_type())));
            if let Some((profile, mime)) = spec {
                tracing::debug!(job_key = %key, "serving completed transcode");
                return Ok(Outcome::Transcoding {
                    handle: JobHandle::pre_finished(output),
                    profile,
                    mime,
                });
            }
        }

        let handle = self
            .jobs
            .get_or_create(&key, || self.decider.planner.plan_pipeline(tier, d, sources))?;
        let pipeline = handle
            .pipeline()
            .ok_or_else(|| Error::Internal(format!("job {key} has no pipeline")))?;
        let (profile, mime) = (pipeline.profile, pipeline.mime_type());
        Ok(Outcome::Transcoding { handle, profile, mime })
    }

    /// Stop all jobs, then remove the scratch directory.
    pub async fn shutdown(&self) {
        self.jobs.shutdown(self.config.transcode.shutdown_grace()).await;
        self.scratch.cleanup().await;
        tracing::info!("engine stopped");
    }
}

impl Decision {
    fn label(&self) -> &'static str {
        match self {
            Self::DirectPlay { .. } => "direct_play",
            Self::Transcode(_) => "transcode",
            Self::Unsupported => "unsupported",
        }
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("scratch", &self.scratch.path())
            .field("jobs", &self.jobs)
            .finish_non_exhaustive()
    }
}
