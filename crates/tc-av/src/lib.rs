//! # tc-av
//!
//! External tool management and the ffmpeg process boundary.
//!
//! This crate provides:
//!
//! - **Tool discovery** ([`ToolRegistry`]) -- find and cache paths to ffmpeg
//!   and ffprobe.
//! - **Command execution** ([`ToolCommand`]) -- short captured invocations
//!   with a timeout.
//! - **Argument construction** ([`ffmpeg_args`], [`X264Tuning`]) -- turn a
//!   [`tc_core::PipelineSpec`] into an ffmpeg command line.
//! - **Transcoding** ([`Transcoder`], [`FfmpegTranscoder`]) -- run a pipeline
//!   with graceful cancellation.

pub mod command;
pub mod ffmpeg;
pub mod tools;
pub mod transcoder;
pub mod x264;

pub use command::{ToolCommand, ToolOutput};
pub use ffmpeg::{concat_list_contents, ffmpeg_args};
pub use tools::{ToolConfig, ToolInfo, ToolRegistry};
pub use transcoder::{FfmpegTranscoder, Transcoder};
pub use x264::X264Tuning;
