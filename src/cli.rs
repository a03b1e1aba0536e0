use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "transcast")]
#[command(author, version, about = "Transcoding decisions and job orchestration for media servers")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Decide how a client would be served, without transcoding
    Decide {
        /// JSON media descriptor file
        #[arg(short, long)]
        descriptor: PathBuf,

        /// Client identifying string (user agent, device name); repeatable
        #[arg(short, long = "agent")]
        agents: Vec<String>,

        /// Source address, in playback order; repeatable
        #[arg(short, long = "input")]
        inputs: Vec<String>,
    },

    /// Print the delivery profiles a descriptor resolves to
    Profile {
        /// JSON media descriptor file
        #[arg(short, long)]
        descriptor: PathBuf,
    },

    /// Run a transcode for a client and copy the result
    Transcode {
        /// JSON media descriptor file
        #[arg(short, long)]
        descriptor: PathBuf,

        /// Source address, in playback order; repeatable
        #[arg(short, long = "input", required = true)]
        inputs: Vec<String>,

        /// Client identifying string; repeatable
        #[arg(short, long = "agent")]
        agents: Vec<String>,

        /// Where to copy the transcoded file
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Check that required external tools are available
    CheckTools,

    /// Validate configuration file
    Validate {
        /// Config file to validate (uses default if not specified)
        config: Option<PathBuf>,
    },

    /// Display version information
    Version,
}
