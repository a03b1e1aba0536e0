//! # tc-rules
//!
//! Client-facing decisions on top of the capability catalog.
//!
//! ## Overview
//!
//! - [`ClientTier`] -- closed set of client capability tiers, chosen from
//!   identifying strings by [`resolve_client_tier`].
//! - [`PlayableRow`] -- declarative direct-play rows per tier, evaluated by
//!   [`is_directly_playable`].
//! - [`Planner`] -- derives a [`tc_core::PipelineSpec`] for sources a tier
//!   cannot play.
//! - [`ProfileResolver`] -- catalog lookups for audio, video and image
//!   delivery profiles.

pub mod planner;
pub mod playable;
pub mod resolver;
pub mod tier;

pub use planner::{output_profile, ContainerTarget, CopyRule, Planner, PlannerOptions, TranscodePolicy};
pub use playable::{is_directly_playable, AudioAccept, PlayableRow, StreamLimits};
pub use resolver::{image_transcode_target, ProfileResolver};
pub use tier::{resolve_client_tier, ClientTier};
