//! tc-core: shared types, IDs, errors, configuration, and event system.
//!
//! This crate is the foundational dependency for all other tc-* crates,
//! providing type-safe identifiers, a unified error type, media-domain
//! enums, the source descriptor model, pipeline specifications, application
//! configuration, and a broadcast event bus.

pub mod config;
pub mod descriptor;
pub mod error;
pub mod events;
pub mod ids;
pub mod media;
pub mod pipeline;
pub mod profile;

// Re-export the most commonly used items at the crate root.
pub use descriptor::MediaDescriptor;
pub use error::{Error, Result};
pub use ids::*;
pub use media::*;
pub use pipeline::*;
pub use profile::DeliveryProfile;
