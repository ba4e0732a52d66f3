//! Negotiator configuration

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{NegotiationError, Result};
use crate::profile::EncodingContext;
use crate::request::MediaOptions;
use crate::support::{FullTranscoderSupport, StaticTranscoderSupport, TranscoderSupport};

/// Engine defaults for requests that leave them unset
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Streaming budget in bps when neither the request nor the profile has one
    pub max_streaming_bitrate: Option<u64>,

    /// Channel limit when the request has none
    pub max_audio_channels: Option<u32>,

    /// Permit copying the source video into a transcode
    pub allow_video_stream_copy: bool,

    /// Permit copying the source audio into a transcode
    pub allow_audio_stream_copy: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_streaming_bitrate: None,
            max_audio_channels: None,
            allow_video_stream_copy: true,
            allow_audio_stream_copy: true,
        }
    }
}

/// Transcoder capability configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TranscoderConfig {
    /// Probe the linked FFmpeg libraries instead of using the lists below
    pub use_ffmpeg: bool,

    /// Audio codecs the transcoder can encode (unset = all)
    pub audio_encoders: Option<Vec<String>>,

    /// Subtitle formats the transcoder can write (unset = all)
    pub subtitle_encoders: Option<Vec<String>>,

    /// Embedded subtitle codecs that can be extracted (unset = all)
    pub subtitle_extractors: Option<Vec<String>>,
}

impl TranscoderConfig {
    /// Build the capability oracle this configuration describes.
    pub fn build_support(&self) -> Result<Arc<dyn TranscoderSupport>> {
        if self.use_ffmpeg {
            return ffmpeg_support();
        }
        if self.audio_encoders.is_none()
            && self.subtitle_encoders.is_none()
            && self.subtitle_extractors.is_none()
        {
            return Ok(Arc::new(FullTranscoderSupport));
        }
        Ok(Arc::new(StaticTranscoderSupport {
            audio_encoders: self.audio_encoders.clone(),
            subtitle_encoders: self.subtitle_encoders.clone(),
            subtitle_extractors: self.subtitle_extractors.clone(),
        }))
    }
}

#[cfg(feature = "ffmpeg")]
fn ffmpeg_support() -> Result<Arc<dyn TranscoderSupport>> {
    let support = crate::support::FfmpegTranscoderSupport::new()?;
    Ok(Arc::new(support))
}

#[cfg(not(feature = "ffmpeg"))]
fn ffmpeg_support() -> Result<Arc<dyn TranscoderSupport>> {
    Err(NegotiationError::Config(
        "use_ffmpeg is set but this build has no ffmpeg feature".to_string(),
    ))
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Emit JSON lines instead of human readable output
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

/// Negotiator configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NegotiatorConfig {
    pub engine: EngineConfig,
    pub transcoder: TranscoderConfig,
    pub logging: LoggingConfig,
}

impl NegotiatorConfig {
    /// Fill request fields the caller left open.
    ///
    /// Stream copy flags are combined with the request, so configuration can
    /// forbid copying but never force it.
    pub fn apply_defaults(&self, options: &mut MediaOptions) {
        let engine = &self.engine;
        if options.context == EncodingContext::Streaming && options.max_bitrate(false).is_none() {
            options.max_bitrate = engine.max_streaming_bitrate;
        }
        if options.max_audio_channels.is_none() {
            options.max_audio_channels = engine.max_audio_channels;
        }
        options.allow_video_stream_copy &= engine.allow_video_stream_copy;
        options.allow_audio_stream_copy &= engine.allow_audio_stream_copy;
    }

    /// Filter directive for the subscriber.
    pub fn log_filter(&self) -> String {
        format!("playback_negotiator={}", self.logging.level)
    }
}
