//! Transcoder capability queries
//!
//! The negotiator never runs a transcoder, but it has to know what the
//! transcoder could do: which audio codecs it encodes, which subtitle
//! formats it writes, and which embedded subtitle codecs it can extract.

use crate::container;

/// Capabilities of the execution environment.
pub trait TranscoderSupport: Send + Sync {
    fn can_encode_to_audio_codec(&self, codec: &str) -> bool;

    fn can_encode_to_subtitle_codec(&self, codec: &str) -> bool;

    /// Whether an embedded subtitle track of `codec` can be pulled out of
    /// its container.
    fn can_extract_subtitles(&self, codec: &str) -> bool;
}

/// A transcoder that can do everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct FullTranscoderSupport;

impl TranscoderSupport for FullTranscoderSupport {
    fn can_encode_to_audio_codec(&self, _codec: &str) -> bool {
        true
    }

    fn can_encode_to_subtitle_codec(&self, _codec: &str) -> bool {
        true
    }

    fn can_extract_subtitles(&self, _codec: &str) -> bool {
        true
    }
}

/// Capabilities from fixed lists. `None` allows everything.
#[derive(Debug, Clone, Default)]
pub struct StaticTranscoderSupport {
    pub audio_encoders: Option<Vec<String>>,
    pub subtitle_encoders: Option<Vec<String>>,
    pub subtitle_extractors: Option<Vec<String>>,
}

fn allowed(list: &Option<Vec<String>>, codec: &str) -> bool {
    match list {
        Some(list) => container::list_contains(list, codec),
        None => true,
    }
}

impl TranscoderSupport for StaticTranscoderSupport {
    fn can_encode_to_audio_codec(&self, codec: &str) -> bool {
        allowed(&self.audio_encoders, codec)
    }

    fn can_encode_to_subtitle_codec(&self, codec: &str) -> bool {
        allowed(&self.subtitle_encoders, codec)
    }

    fn can_extract_subtitles(&self, codec: &str) -> bool {
        allowed(&self.subtitle_extractors, codec)
    }
}

#[cfg(feature = "ffmpeg")]
pub use self::ffmpeg_support::FfmpegTranscoderSupport;

#[cfg(feature = "ffmpeg")]
mod ffmpeg_support {
    use ffmpeg_next as ffmpeg;
    use tracing::debug;

    use super::TranscoderSupport;
    use crate::error::{NegotiationError, Result};

    /// Capabilities of the linked FFmpeg libraries.
    #[derive(Debug, Clone, Copy)]
    pub struct FfmpegTranscoderSupport;

    impl FfmpegTranscoderSupport {
        pub fn new() -> Result<Self> {
            ffmpeg::init()
                .map_err(|e| NegotiationError::Config(format!("FFmpeg init failed: {}", e)))?;
            Ok(Self)
        }
    }

    /// Encoder names to try for a codec name used in profiles.
    fn encoder_names(codec: &str) -> Vec<String> {
        let codec = codec.to_ascii_lowercase();
        let mut names = match codec.as_str() {
            "mp3" => vec!["libmp3lame".to_string()],
            "opus" => vec!["libopus".to_string()],
            "vorbis" => vec!["libvorbis".to_string()],
            "srt" => vec!["subrip".to_string()],
            "vtt" => vec!["webvtt".to_string()],
            _ => Vec::new(),
        };
        names.push(codec);
        names
    }

    impl TranscoderSupport for FfmpegTranscoderSupport {
        fn can_encode_to_audio_codec(&self, codec: &str) -> bool {
            let found = encoder_names(codec)
                .iter()
                .any(|n| ffmpeg::encoder::find_by_name(n).is_some());
            debug!("FFmpeg audio encoder for {}: {}", codec, found);
            found
        }

        fn can_encode_to_subtitle_codec(&self, codec: &str) -> bool {
            encoder_names(codec)
                .iter()
                .any(|n| ffmpeg::encoder::find_by_name(n).is_some())
        }

        fn can_extract_subtitles(&self, codec: &str) -> bool {
            encoder_names(codec)
                .iter()
                .any(|n| ffmpeg::decoder::find_by_name(n).is_some())
        }
    }
}
