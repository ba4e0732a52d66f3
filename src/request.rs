//! Negotiation requests
//!
//! [`MediaOptions`] carries everything a caller supplies for one
//! negotiation: who is asking, what for, the device profile and the
//! candidate media sources.

use serde::{Deserialize, Serialize};

use crate::error::{NegotiationError, Result};
use crate::media::MediaSource;
use crate::profile::{DeviceProfile, EncodingContext};

/// Request descriptor for a single negotiation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct MediaOptions {
    pub item_id: String,
    pub device_id: String,
    pub context: EncodingContext,
    pub enable_direct_play: bool,
    pub enable_direct_stream: bool,
    pub enable_transcoding: bool,
    /// Direct play even when the bitrate budget is exceeded.
    pub force_direct_play: bool,
    /// Direct stream even when the bitrate budget is exceeded.
    pub force_direct_stream: bool,
    pub allow_video_stream_copy: bool,
    pub allow_audio_stream_copy: bool,
    /// Restrict the negotiation to one source.
    pub media_source_id: Option<String>,
    pub audio_stream_index: Option<i32>,
    /// Subtitle track to deliver; `-1` disables subtitles.
    pub subtitle_stream_index: Option<i32>,
    /// Overall bitrate budget in bits per second.
    pub max_bitrate: Option<u64>,
    pub max_audio_channels: Option<u32>,
    /// Target bitrate for audio-only transcodes.
    pub audio_transcoding_bitrate: Option<u64>,
    pub profile: Option<DeviceProfile>,
    pub media_sources: Option<Vec<MediaSource>>,
}

impl Default for MediaOptions {
    fn default() -> Self {
        Self {
            item_id: String::new(),
            device_id: String::new(),
            context: EncodingContext::Streaming,
            enable_direct_play: true,
            enable_direct_stream: true,
            enable_transcoding: true,
            force_direct_play: false,
            force_direct_stream: false,
            allow_video_stream_copy: true,
            allow_audio_stream_copy: true,
            media_source_id: None,
            audio_stream_index: None,
            subtitle_stream_index: None,
            max_bitrate: None,
            max_audio_channels: None,
            audio_transcoding_bitrate: None,
            profile: None,
            media_sources: None,
        }
    }
}

impl MediaOptions {
    /// The effective bitrate budget.
    ///
    /// An explicit request value wins; otherwise the profile's budget for the
    /// request context applies.
    pub fn max_bitrate(&self, is_audio: bool) -> Option<u64> {
        if self.max_bitrate.is_some() {
            return self.max_bitrate;
        }
        let profile = self.profile.as_ref()?;
        match self.context {
            EncodingContext::Static => {
                if is_audio && profile.max_static_music_bitrate.is_some() {
                    profile.max_static_music_bitrate
                } else {
                    profile.max_static_bitrate
                }
            }
            EncodingContext::Streaming => profile.max_streaming_bitrate,
        }
    }

    /// Check the caller contract and hand out the profile and sources.
    ///
    /// `pins_tracks` is true for video negotiations, where a specific audio
    /// or subtitle track only makes sense within one pinned source.
    pub fn validate(&self, pins_tracks: bool) -> Result<(&DeviceProfile, &[MediaSource])> {
        if self.item_id.is_empty() {
            return Err(NegotiationError::InvalidArgument(
                "ItemId is required".to_string(),
            ));
        }
        if self.device_id.is_empty() {
            return Err(NegotiationError::InvalidArgument(
                "DeviceId is required".to_string(),
            ));
        }
        let profile = self.profile.as_ref().ok_or_else(|| {
            NegotiationError::InvalidArgument("Profile is required".to_string())
        })?;
        let sources = self.media_sources.as_deref().ok_or_else(|| {
            NegotiationError::InvalidArgument("MediaSources is required".to_string())
        })?;

        if pins_tracks && self.media_source_id.is_none() {
            if self.audio_stream_index.is_some() {
                return Err(NegotiationError::InvalidArgument(
                    "MediaSourceId is required when a specific audio stream is requested"
                        .to_string(),
                ));
            }
            // -1 turns subtitles off and pins nothing.
            if self.subtitle_stream_index.is_some_and(|i| i >= 0) {
                return Err(NegotiationError::InvalidArgument(
                    "MediaSourceId is required when a specific subtitle stream is requested"
                        .to_string(),
                ));
            }
        }

        Ok((profile, sources))
    }
}
