//! Configuration file support
//!
//! Loads negotiator configuration from TOML files.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::config::{EngineConfig, LoggingConfig, NegotiatorConfig, TranscoderConfig};
use crate::error::Result;

/// Configuration file format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigFile {
    /// Engine defaults
    pub engine: EngineSettings,
    /// Transcoder capabilities
    pub transcoder: Option<TranscoderSettings>,
    /// Logging settings
    pub logging: Option<LoggingSettings>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineSettings {
    /// Streaming budget in bps when nothing else sets one
    pub max_streaming_bitrate: Option<u64>,
    /// Channel limit when the request has none
    pub max_audio_channels: Option<u32>,
    pub allow_video_stream_copy: Option<bool>,
    pub allow_audio_stream_copy: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscoderSettings {
    /// Probe FFmpeg for capabilities (needs the ffmpeg feature)
    pub use_ffmpeg: Option<bool>,
    pub audio_encoders: Option<Vec<String>>,
    pub subtitle_encoders: Option<Vec<String>>,
    pub subtitle_extractors: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Output format (json, pretty)
    pub format: Option<String>,
}

impl ConfigFile {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: ConfigFile = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), content)?;
        Ok(())
    }

    /// Generate default configuration file
    pub fn default_config() -> Self {
        Self {
            engine: EngineSettings {
                max_streaming_bitrate: Some(120_000_000),
                max_audio_channels: None,
                allow_video_stream_copy: Some(true),
                allow_audio_stream_copy: Some(true),
            },
            transcoder: Some(TranscoderSettings {
                use_ffmpeg: Some(false),
                audio_encoders: None,
                subtitle_encoders: None,
                subtitle_extractors: None,
            }),
            logging: Some(LoggingSettings {
                level: "info".to_string(),
                format: Some("pretty".to_string()),
            }),
        }
    }

    /// Convert to NegotiatorConfig
    pub fn into_negotiator_config(self) -> NegotiatorConfig {
        let transcoder = self
            .transcoder
            .map(|t| TranscoderConfig {
                use_ffmpeg: t.use_ffmpeg.unwrap_or(false),
                audio_encoders: t.audio_encoders,
                subtitle_encoders: t.subtitle_encoders,
                subtitle_extractors: t.subtitle_extractors,
            })
            .unwrap_or_default();
        let logging = self
            .logging
            .map(|l| LoggingConfig {
                json: l
                    .format
                    .as_deref()
                    .is_some_and(|f| f.eq_ignore_ascii_case("json")),
                level: l.level,
            })
            .unwrap_or_default();

        NegotiatorConfig {
            engine: EngineConfig {
                max_streaming_bitrate: self.engine.max_streaming_bitrate,
                max_audio_channels: self.engine.max_audio_channels,
                allow_video_stream_copy: self.engine.allow_video_stream_copy.unwrap_or(true),
                allow_audio_stream_copy: self.engine.allow_audio_stream_copy.unwrap_or(true),
            },
            transcoder,
            logging,
        }
    }
}

/// Generate default configuration file at the specified path
pub fn generate_default_config<P: AsRef<Path>>(path: P) -> Result<()> {
    let config = ConfigFile::default_config();
    config.to_file(path)?;
    Ok(())
}
