//! Stream plans
//!
//! A [`StreamPlan`] is the negotiated outcome for one media source: the play
//! method plus the constraints a downstream transcoder has to honour. Plans
//! are built per source and never shared between candidates.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::media::MediaProtocol;
use crate::profile::{
    EncodingContext, MediaStreamProtocol, ProfileMediaType, SubtitleDeliveryMethod,
};
use crate::reason::TranscodeReasons;

/// How the media reaches the device.
///
/// Ordered from least to most preferred.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PlayMethod {
    Transcode,
    DirectStream,
    DirectPlay,
}

/// The negotiated plan for one media source.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StreamPlan {
    pub item_id: String,
    pub media_type: ProfileMediaType,
    pub media_source_id: String,
    /// Protocol of the source, used for ranking.
    pub media_source_protocol: MediaProtocol,
    /// Declared bitrate of the source, used for ranking.
    pub media_source_bitrate: Option<u64>,
    pub context: EncodingContext,
    /// `None` when the source cannot be delivered at all.
    pub play_method: Option<PlayMethod>,
    pub container: Option<String>,
    pub sub_protocol: MediaStreamProtocol,
    pub video_codecs: Vec<String>,
    pub audio_codecs: Vec<String>,
    pub subtitle_codecs: Vec<String>,
    pub audio_stream_index: Option<i32>,
    pub subtitle_stream_index: Option<i32>,
    pub max_width: Option<u32>,
    pub max_height: Option<u32>,
    pub video_bitrate: Option<u64>,
    pub max_framerate: Option<f64>,
    pub audio_bitrate: Option<u64>,
    pub audio_sample_rate: Option<u32>,
    /// Channel limit of the selected transcoding profile.
    pub transcoding_max_audio_channels: Option<u32>,
    /// Channel limit requested by the caller.
    pub global_max_audio_channels: Option<u32>,
    pub max_ref_frames: Option<u32>,
    pub require_avc: bool,
    pub require_non_anamorphic: bool,
    /// The transcoding profile can carry the source video without re-encoding.
    pub video_stream_copy_viable: bool,
    /// Per-codec options keyed `codec-name`, or `name` when unqualified.
    pub stream_options: BTreeMap<String, String>,
    pub subtitle_delivery_method: Option<SubtitleDeliveryMethod>,
    pub subtitle_format: Option<String>,
    pub transcode_reasons: TranscodeReasons,
    pub copy_timestamps: bool,
    pub break_on_non_key_frames: bool,
    pub estimate_content_length: bool,
    pub enable_subtitles_in_manifest: bool,
    pub min_segments: Option<u32>,
    pub segment_length: Option<u32>,
    pub device_id: String,
    pub play_session_id: Option<String>,
}

impl StreamPlan {
    pub fn is_direct(&self) -> bool {
        matches!(
            self.play_method,
            Some(PlayMethod::DirectPlay) | Some(PlayMethod::DirectStream)
        )
    }

    pub fn target_video_codec(&self) -> Option<&str> {
        self.video_codecs.first().map(String::as_str)
    }

    pub fn target_audio_codec(&self) -> Option<&str> {
        self.audio_codecs.first().map(String::as_str)
    }

    /// Store an option, scoped to `qualifier` when given.
    pub fn set_option(&mut self, qualifier: Option<&str>, name: &str, value: impl Into<String>) {
        self.stream_options.insert(option_key(qualifier, name), value.into());
    }

    /// Look up an option for `qualifier`, falling back to the unqualified one.
    pub fn option(&self, qualifier: Option<&str>, name: &str) -> Option<&str> {
        if let Some(q) = qualifier.filter(|q| !q.is_empty()) {
            if let Some(v) = self.stream_options.get(&format!("{}-{}", q, name)) {
                if !v.is_empty() {
                    return Some(v);
                }
            }
        }
        self.stream_options
            .get(name)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    fn parsed_option<T: std::str::FromStr>(&self, qualifier: Option<&str>, name: &str) -> Option<T> {
        self.option(qualifier, name).and_then(|v| v.parse().ok())
    }

    /// Effective output channel count for `codec`.
    ///
    /// The caller limit wins over the transcoding profile limit, and a
    /// per-codec `audiochannels` option can only lower it.
    pub fn target_audio_channels(&self, codec: Option<&str>) -> Option<u32> {
        let default = self
            .global_max_audio_channels
            .or(self.transcoding_max_audio_channels);
        match self.parsed_option::<u32>(codec, "audiochannels") {
            Some(value) => Some(default.map_or(value, |d| value.min(d))),
            None => default,
        }
    }

    pub fn target_video_level(&self, codec: Option<&str>) -> Option<f64> {
        self.parsed_option(codec, "level")
    }

    pub fn target_video_bit_depth(&self, codec: Option<&str>) -> Option<u32> {
        self.parsed_option(codec, "videobitdepth")
    }

    pub fn target_audio_bit_depth(&self, codec: Option<&str>) -> Option<u32> {
        self.parsed_option(codec, "audiobitdepth")
    }

    /// Allowed video profiles for `codec`, lowercased.
    pub fn target_video_profiles(&self, codec: Option<&str>) -> Vec<String> {
        self.list_option(codec, "profile")
    }

    pub fn target_video_range_types(&self, codec: Option<&str>) -> Vec<String> {
        self.list_option(codec, "rangetype")
    }

    pub fn target_codec_tags(&self, codec: Option<&str>) -> Vec<String> {
        self.list_option(codec, "codectag")
    }

    pub fn requires_deinterlace(&self, codec: Option<&str>) -> bool {
        self.option(codec, "deinterlace")
            .is_some_and(|v| v.eq_ignore_ascii_case("true"))
    }

    fn list_option(&self, codec: Option<&str>, name: &str) -> Vec<String> {
        crate::container::split(self.option(codec, name))
            .into_iter()
            .map(|v| v.to_ascii_lowercase())
            .collect()
    }
}

pub(crate) fn option_key(qualifier: Option<&str>, name: &str) -> String {
    match qualifier.filter(|q| !q.is_empty()) {
        Some(q) => format!("{}-{}", q, name),
        None => name.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_play_method_order() {
        assert!(PlayMethod::DirectPlay > PlayMethod::DirectStream);
        assert!(PlayMethod::DirectStream > PlayMethod::Transcode);
        assert!(Some(PlayMethod::Transcode) > None);
    }

    #[test]
    fn test_qualified_option_fallback() {
        let mut plan = StreamPlan::default();
        plan.set_option(None, "level", "51");
        plan.set_option(Some("h264"), "level", "41");
        assert_eq!(plan.option(Some("h264"), "level"), Some("41"));
        assert_eq!(plan.option(Some("hevc"), "level"), Some("51"));
        assert_eq!(plan.option(None, "level"), Some("51"));
        assert_eq!(plan.target_video_level(Some("h264")), Some(41.0));
    }

    #[test]
    fn test_target_audio_channels() {
        let mut plan = StreamPlan::default();
        assert_eq!(plan.target_audio_channels(Some("aac")), None);

        plan.transcoding_max_audio_channels = Some(6);
        assert_eq!(plan.target_audio_channels(Some("aac")), Some(6));

        plan.global_max_audio_channels = Some(2);
        assert_eq!(plan.target_audio_channels(Some("aac")), Some(2));

        plan.set_option(Some("aac"), "audiochannels", "8");
        assert_eq!(plan.target_audio_channels(Some("aac")), Some(2));
        plan.set_option(Some("aac"), "audiochannels", "1");
        assert_eq!(plan.target_audio_channels(Some("aac")), Some(1));
    }

    #[test]
    fn test_list_options() {
        let mut plan = StreamPlan::default();
        plan.set_option(Some("h264"), "profile", "High,Main");
        assert_eq!(plan.target_video_profiles(Some("h264")), vec!["high", "main"]);
        assert!(plan.target_video_profiles(Some("hevc")).is_empty());
    }
}
