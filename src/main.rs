mod cli;

use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use tc_av::ToolRegistry;
use tc_core::{MediaDescriptor, SourceLocation};
use transcast::engine::{Decider, Engine, Outcome};
use transcast::{config, jobs::JobState};

fn read_descriptor(path: &Path) -> Result<MediaDescriptor> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read descriptor: {:?}", path))?;
    serde_json::from_str(&content).with_context(|| format!("Failed to parse descriptor: {:?}", path))
}

fn sources(inputs: &[String]) -> Vec<SourceLocation> {
    inputs.iter().map(|s| SourceLocation::local(s.as_str())).collect()
}

fn decide(config_path: Option<&Path>, descriptor: &Path, agents: &[String], inputs: &[String]) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;
    let d = read_descriptor(descriptor)?;
    let decider = Decider::from_config(&config);

    let tier = decider.resolver().resolve_client_tier(agents);
    let decision = decider.decide(&d, agents, &sources(inputs))?;

    println!("Client tier: {tier}");
    println!("{}", serde_json::to_string_pretty(&decision)?);
    Ok(())
}

fn profile(descriptor: &Path) -> Result<()> {
    let d = read_descriptor(descriptor)?;
    let resolver = tc_rules::ProfileResolver::default();

    println!("Container: {}", d.container);
    println!("Audio profile: {}", resolver.resolve_audio_profile(&d));
    if d.video.is_some() {
        println!("Video profile: {}", resolver.resolve_video_profile(&d));
    }
    if let Some(mime) = resolver.source_mime(&d) {
        println!("MIME type: {mime}");
    }
    Ok(())
}

async fn transcode(
    config_path: Option<&Path>,
    descriptor: &Path,
    inputs: &[String],
    agents: &[String],
    output: &Path,
) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;
    let d = read_descriptor(descriptor)?;
    let engine = Engine::with_ffmpeg(config).await?;

    let result = run_transcode(&engine, &d, inputs, agents, output).await;
    engine.shutdown().await;
    result
}

async fn run_transcode(
    engine: &Engine,
    d: &MediaDescriptor,
    inputs: &[String],
    agents: &[String],
    output: &Path,
) -> Result<()> {
    let (handle, profile, mime) = match engine.request(d, agents, &sources(inputs))? {
        Outcome::DirectPlay { profile, mime } => {
            println!("Source is directly playable ({profile}, {mime}); nothing to do.");
            return Ok(());
        }
        Outcome::Unsupported => anyhow::bail!("No delivery is possible for this client"),
        Outcome::Transcoding { handle, profile, mime } => (handle, profile, mime),
    };
    println!("Transcoding to {profile} ({mime})...");

    let status = tokio::select! {
        status = handle.wait() => status,
        _ = tokio::signal::ctrl_c() => {
            println!("Interrupted, stopping transcode");
            handle.stop();
            handle.wait().await
        }
    };

    match status.state {
        JobState::Completed => {
            let produced = status
                .output
                .context("completed job reported no output")?;
            tokio::fs::copy(&produced, output)
                .await
                .with_context(|| format!("Failed to copy {:?} to {:?}", produced, output))?;
            println!("Output: {:?}", output);
            Ok(())
        }
        JobState::Failed => anyhow::bail!(
            "Transcode failed: {}",
            status.error.as_deref().unwrap_or("unknown error")
        ),
        state => anyhow::bail!("Transcode ended in state {state:?}"),
    }
}

async fn check_tools(config_path: Option<&Path>) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;
    println!("Checking external tools...\n");

    let registry = ToolRegistry::discover(&config.tools);
    let tools = registry.check_all().await;
    let mut all_ok = true;

    for tool in &tools {
        let status = if tool.available {
            "✓"
        } else {
            all_ok = false;
            "✗"
        };

        print!("{} {}", status, tool.name);

        if let Some(ref version) = tool.version {
            print!(" ({})", version.lines().next().unwrap_or(""));
        }

        if let Some(ref path) = tool.path {
            print!(" - {}", path.display());
        }

        println!();
    }

    println!();
    if all_ok {
        println!("All required tools are available!");
    } else {
        println!("Some tools are missing. Install ffmpeg to enable transcoding.");
    }

    Ok(())
}

fn validate_config(path: Option<&Path>) -> Result<()> {
    let config = match path {
        Some(p) => {
            println!("Validating config: {:?}", p);
            config::load_config(p)?
        }
        None => {
            println!("No config file specified, using defaults");
            tc_core::config::Config::default()
        }
    };

    let warnings = config.validate();
    if warnings.is_empty() {
        println!("✓ Configuration is valid");
    } else {
        println!("Configuration has {} warning(s):", warnings.len());
        for warning in &warnings {
            println!("  - {warning}");
        }
    }
    println!("  Scratch dir: {}", config.scratch.dir.display());
    println!("  Preset: {}", config.transcode.preset);
    println!(
        "  Audio re-encode: {} channels at {}",
        config.transcode.audio_channels, config.transcode.audio_bitrate
    );
    println!("  Fragmented MP4: {}", config.transcode.fragmented_mp4);
    println!("  Shutdown grace: {}s", config.transcode.shutdown_grace_secs);

    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "transcast=trace,tc_core=debug,tc_catalog=trace,tc_rules=trace,tc_av=debug".to_string()
        } else {
            "transcast=info,tc_core=info,tc_catalog=warn,tc_rules=info,tc_av=info".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .init();

    let config_path = cli.config.as_deref();
    match cli.command {
        Commands::Decide {
            descriptor,
            agents,
            inputs,
        } => decide(config_path, &descriptor, &agents, &inputs),
        Commands::Profile { descriptor } => profile(&descriptor),
        Commands::Transcode {
            descriptor,
            inputs,
            agents,
            output,
        } => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(transcode(config_path, &descriptor, &inputs, &agents, &output))
        }
        Commands::CheckTools => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(check_tools(config_path))
        }
        Commands::Validate { config } => validate_config(config.as_deref().or(config_path)),
        Commands::Version => {
            println!("transcast {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}
