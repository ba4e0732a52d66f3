//! Playback negotiator CLI
//!
//! Reads a playback request (device profile, media sources, options) as
//! JSON and prints the negotiated stream plan.

use std::io::Read;
use std::path::{Path, PathBuf};

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use playback_negotiator::config_file::{generate_default_config, ConfigFile};
use playback_negotiator::{MediaOptions, NegotiatorConfig, Result, StreamBuilder};

/// Application version
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
const APP_NAME: &str = "playback-negotiator";

#[derive(Parser, Debug, Clone)]
#[command(name = "playback-negotiator")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Request JSON file, or "-" for stdin
    #[arg(default_value = "-")]
    request: String,

    /// Configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Negotiate an audio-only item
    #[arg(short, long)]
    audio: bool,

    /// Write a default configuration file to --config and exit
    #[arg(long)]
    generate_config: bool,

    /// Log level, overrides the configuration file
    #[arg(short, long)]
    log_level: Option<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    if args.generate_config {
        generate_default_config(&args.config)?;
        println!("Wrote {}", args.config.display());
        return Ok(());
    }

    let mut config = load_config(&args.config);
    if let Some(level) = &args.log_level {
        config.logging.level = level.clone();
    }
    init_logging(&config);

    tracing::info!("{} v{} starting", APP_NAME, VERSION);
    if !args.config.exists() {
        tracing::debug!("No config file at {}, using defaults", args.config.display());
    }

    let mut options = read_request(&args.request)?;
    config.apply_defaults(&mut options);

    let builder = StreamBuilder::new(config.transcoder.build_support()?);
    let plan = if args.audio {
        builder.optimal_audio_plan(&options)?
    } else {
        builder.optimal_video_plan(&options)?
    };

    match plan {
        Some(plan) => println!("{}", serde_json::to_string_pretty(&plan)?),
        None => {
            tracing::warn!("No stream plan for item {}", options.item_id);
            println!("null");
        }
    }
    Ok(())
}

/// Load the configuration file, falling back to defaults.
fn load_config(path: &Path) -> NegotiatorConfig {
    if !path.exists() {
        return NegotiatorConfig::default();
    }
    match ConfigFile::from_file(path) {
        Ok(cf) => cf.into_negotiator_config(),
        Err(e) => {
            // Logging is not up yet.
            eprintln!(
                "Failed to load config file {}: {}. Using defaults.",
                path.display(),
                e
            );
            NegotiatorConfig::default()
        }
    }
}

fn read_request(source: &str) -> Result<MediaOptions> {
    let content = if source == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        std::fs::read_to_string(source)?
    };
    Ok(serde_json::from_str(&content)?)
}

/// Initialize logging with tracing
fn init_logging(config: &NegotiatorConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| config.log_filter().into());
    let registry = tracing_subscriber::registry().with(filter);
    if config.logging.json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_args() {
        let args = Args::parse_from(["playback-negotiator", "request.json", "--audio"]);
        assert_eq!(args.request, "request.json");
        assert!(args.audio);
        assert_eq!(args.config, PathBuf::from("config.toml"));

        let args = Args::parse_from(["playback-negotiator"]);
        assert_eq!(args.request, "-");
        assert!(args.log_level.is_none());
    }
}
