//! Unified error type for the transcast engine.
//!
//! All library crates funnel their failures into [`Error`]. An unresolvable
//! delivery profile is deliberately *not* an error: resolvers return
//! [`crate::DeliveryProfile::None`] instead, and only the planner reports
//! [`Error::Unsupported`] when asked to plan for a tier that cannot transcode.

use std::fmt;

/// Unified error type covering all failure modes in transcast.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The requested entity could not be found.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// The kind of entity (e.g. "job", "tool").
        entity: String,
        /// The identifier that was looked up.
        id: String,
    },

    /// Caller-supplied data failed validation.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The client tier has no transcoding target for this source.
    #[error("Unsupported: {0}")]
    Unsupported(String),

    /// An I/O operation failed.
    #[error("IO error: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// An external tool (ffmpeg, ffprobe) returned an error.
    #[error("Tool error [{tool}]: {message}")]
    Tool {
        /// Name of the tool that failed.
        tool: String,
        /// Human-readable error description.
        message: String,
    },

    /// A transcoding pipeline step failed.
    #[error("Pipeline error [{step}]: {message}")]
    Pipeline {
        /// The pipeline step that failed.
        step: String,
        /// Human-readable error description.
        message: String,
    },

    /// The job was stopped before it could finish.
    #[error("Cancelled: {0}")]
    Cancelled(String),

    /// The engine is shutting down and no longer accepts work.
    #[error("Engine is shutting down")]
    ShuttingDown,

    /// Catch-all for unexpected internal errors.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Convenience constructor for [`Error::NotFound`].
    pub fn not_found(entity: impl Into<String>, id: impl fmt::Display) -> Self {
        Error::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }

    /// Convenience constructor for [`Error::Tool`].
    pub fn tool(tool: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Tool {
            tool: tool.into(),
            message: message.into(),
        }
    }

    /// Convenience constructor for [`Error::Pipeline`].
    pub fn pipeline(step: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Pipeline {
            step: step.into(),
            message: message.into(),
        }
    }

    /// Whether the failure came from the caller's input rather than the
    /// engine or an external tool.
    pub fn is_caller_error(&self) -> bool {
        matches!(self, Error::Validation(_) | Error::Unsupported(_))
    }
}

/// Result alias using the crate-level [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
