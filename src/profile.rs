//! Device capability profiles
//!
//! A [`DeviceProfile`] declares what a playback target can consume: which
//! containers and codecs it plays directly, which transcoding targets it
//! accepts, per-codec and per-container constraints, and how it wants
//! subtitles delivered. Profiles are immutable input to the negotiator.

use serde::{Deserialize, Serialize};

use crate::container;

/// Media type a rule applies to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProfileMediaType {
    Audio,
    #[default]
    Video,
    Photo,
    Subtitle,
}

/// Why the media is being requested.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EncodingContext {
    /// Played while it is being delivered.
    #[default]
    Streaming,
    /// Downloaded or synced as a whole file.
    Static,
}

/// Which track kind a codec profile constrains.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CodecType {
    #[default]
    Video,
    /// Audio tracks of a video item.
    VideoAudio,
    /// Audio-only items.
    Audio,
}

/// Transport used for transcoded output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaStreamProtocol {
    #[default]
    Http,
    Hls,
}

/// How a subtitle track reaches the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SubtitleDeliveryMethod {
    /// Burned into the video by the transcoder.
    Encode,
    /// Muxed into the output container.
    Embed,
    /// Served as a sidecar file.
    External,
    /// Served as a segmented subtitle playlist.
    Hls,
    /// Not delivered.
    Drop,
}

/// Comparison operator of a [`ProfileCondition`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProfileConditionType {
    Equals,
    NotEquals,
    LessThanEqual,
    GreaterThanEqual,
    EqualsAny,
}

/// Attribute tested by a [`ProfileCondition`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProfileConditionValue {
    AudioChannels,
    AudioBitrate,
    AudioProfile,
    Width,
    Height,
    Has64BitOffsets,
    PacketLength,
    VideoBitDepth,
    VideoProfile,
    VideoLevel,
    VideoFramerate,
    VideoBitrate,
    VideoTimestamp,
    IsAnamorphic,
    RefFrames,
    NumAudioStreams,
    NumVideoStreams,
    IsSecondaryAudio,
    VideoCodecTag,
    IsAvc,
    IsInterlaced,
    AudioSampleRate,
    AudioBitDepth,
    VideoRangeType,
}

/// A declarative `(attribute, operator, value)` test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ProfileCondition {
    pub condition: ProfileConditionType,
    pub property: ProfileConditionValue,
    /// Literal operand. Lists use `|` as separator.
    #[serde(default)]
    pub value: String,
    /// When the attribute is unknown, a required condition fails.
    #[serde(default)]
    pub is_required: bool,
}

impl ProfileCondition {
    pub fn new(
        condition: ProfileConditionType,
        property: ProfileConditionValue,
        value: impl Into<String>,
        is_required: bool,
    ) -> Self {
        Self {
            condition,
            property,
            value: value.into(),
            is_required,
        }
    }
}

/// A container/codec combination the device plays without help.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DirectPlayProfile {
    pub container: Option<String>,
    pub audio_codec: Option<String>,
    pub video_codec: Option<String>,
    #[serde(rename = "Type")]
    pub profile_type: ProfileMediaType,
}

impl DirectPlayProfile {
    pub fn supports_container(&self, container: Option<&str>) -> bool {
        container::contains_container(self.container.as_deref(), container)
    }

    pub fn supports_video_codec(&self, codec: Option<&str>) -> bool {
        self.profile_type == ProfileMediaType::Video
            && container::contains_container(self.video_codec.as_deref(), codec)
    }

    pub fn supports_audio_codec(&self, codec: Option<&str>) -> bool {
        matches!(
            self.profile_type,
            ProfileMediaType::Audio | ProfileMediaType::Video
        ) && container::contains_container(self.audio_codec.as_deref(), codec)
    }
}

/// A transcoding target the device accepts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct TranscodingProfile {
    pub container: String,
    #[serde(rename = "Type")]
    pub profile_type: ProfileMediaType,
    pub video_codec: Option<String>,
    pub audio_codec: Option<String>,
    pub protocol: MediaStreamProtocol,
    pub context: EncodingContext,
    /// Upper bound on output channels, as a decimal string.
    pub max_audio_channels: Option<String>,
    pub min_segments: u32,
    pub segment_length: u32,
    pub copy_timestamps: bool,
    pub break_on_non_key_frames: bool,
    pub estimate_content_length: bool,
    pub enable_subtitles_in_manifest: bool,
    pub conditions: Vec<ProfileCondition>,
}

/// Constraints applied to one codec, optionally limited to some containers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct CodecProfile {
    #[serde(rename = "Type")]
    pub codec_type: CodecType,
    pub codec: Option<String>,
    pub container: Option<String>,
    /// The profile only applies when all of these hold.
    pub apply_conditions: Vec<ProfileCondition>,
    /// Conditions the stream must satisfy for direct delivery.
    pub conditions: Vec<ProfileCondition>,
}

impl CodecProfile {
    pub fn contains_any_codec(&self, codec: Option<&str>, container: Option<&str>) -> bool {
        container::contains_container(self.container.as_deref(), container)
            && container::contains_container(self.codec.as_deref(), codec)
    }

    pub fn contains_any_codec_of(&self, codecs: &[String], container: Option<&str>) -> bool {
        container::contains_container(self.container.as_deref(), container)
            && container::contains_any(self.codec.as_deref(), codecs)
    }
}

/// Constraints applied to a container regardless of codecs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ContainerProfile {
    #[serde(rename = "Type")]
    pub profile_type: ProfileMediaType,
    pub container: Option<String>,
    pub conditions: Vec<ProfileCondition>,
}

impl ContainerProfile {
    pub fn contains_container(&self, container: Option<&str>) -> bool {
        container::contains_container(self.container.as_deref(), container)
    }
}

/// A subtitle format the device accepts, and how.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SubtitleProfile {
    pub format: String,
    pub method: SubtitleDeliveryMethod,
    /// Comma separated language codes; empty means every language.
    #[serde(default)]
    pub language: Option<String>,
    /// Containers this profile is restricted to.
    #[serde(default)]
    pub container: Option<String>,
}

impl SubtitleProfile {
    pub fn new(format: impl Into<String>, method: SubtitleDeliveryMethod) -> Self {
        Self {
            format: format.into(),
            method,
            language: None,
            container: None,
        }
    }

    /// Check the profile against a track language (`und` when unknown).
    pub fn supports_language(&self, language: Option<&str>) -> bool {
        let languages = container::split(self.language.as_deref());
        if languages.is_empty() {
            return true;
        }
        let language = language.filter(|l| !l.is_empty()).unwrap_or("und");
        container::list_contains(&languages, language)
    }
}

/// Everything a playback target declares about itself.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct DeviceProfile {
    pub name: Option<String>,
    pub id: Option<String>,
    /// Bitrate budget for streaming, in bits per second.
    pub max_streaming_bitrate: Option<u64>,
    /// Bitrate budget for static (download) delivery.
    pub max_static_bitrate: Option<u64>,
    /// Static bitrate budget for audio-only items.
    pub max_static_music_bitrate: Option<u64>,
    /// Target bitrate when streaming audio-only items through the transcoder.
    pub music_streaming_transcoding_bitrate: Option<u64>,
    pub direct_play_profiles: Vec<DirectPlayProfile>,
    pub transcoding_profiles: Vec<TranscodingProfile>,
    pub container_profiles: Vec<ContainerProfile>,
    pub codec_profiles: Vec<CodecProfile>,
    pub subtitle_profiles: Vec<SubtitleProfile>,
}
