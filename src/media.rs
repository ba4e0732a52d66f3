//! Media sources and their streams.
//!
//! A [`MediaSource`] is one physical or remote representation of the
//! requested item. Stream attributes are optional throughout: a probe that
//! could not determine a value leaves it unset, and every consumer decides
//! explicitly what an unknown value means.

use serde::{Deserialize, Serialize};

/// How the source is reached.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MediaProtocol {
    #[default]
    File,
    Http,
    Rtmp,
    Rtsp,
    Udp,
    Ftp,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MediaStreamType {
    Audio,
    #[default]
    Video,
    Subtitle,
    EmbeddedImage,
    Data,
}

/// A single track of a media source.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct MediaStream {
    #[serde(rename = "Type")]
    pub stream_type: MediaStreamType,
    /// The absolute index of this stream in the source.
    pub index: i32,
    /// The codec name (e.g., "h264", "aac", "subrip").
    pub codec: Option<String>,
    /// 3-letter ISO language code (e.g., "eng", "fra").
    pub language: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub bit_depth: Option<u32>,
    /// Bitrate of this track in bits per second.
    pub bit_rate: Option<u64>,
    pub channels: Option<u32>,
    pub sample_rate: Option<u32>,
    /// The codec profile (e.g., "High", "Main 10").
    pub profile: Option<String>,
    /// Codec level (e.g., 41 for H.264 4.1).
    pub level: Option<f64>,
    /// The internal codec tag (e.g., "avc1", "hvc1").
    pub codec_tag: Option<String>,
    pub reference_frame_rate: Option<f64>,
    pub ref_frames: Option<u32>,
    pub packet_length: Option<u32>,
    pub is_interlaced: Option<bool>,
    pub is_anamorphic: Option<bool>,
    #[serde(rename = "IsAVC")]
    pub is_avc: Option<bool>,
    /// Dynamic range type (e.g., "SDR", "HDR10", "DOVI").
    pub video_range_type: Option<String>,
    /// Whether this track lives outside the source file (e.g., a .srt).
    pub is_external: bool,
    pub is_default: bool,
    /// Whether this track can be served as a separate file.
    pub supports_external_stream: bool,
}

impl MediaStream {
    /// True if the subtitle is text based (SRT/ASS) rather than bitmap (PGS).
    pub fn is_text_subtitle_stream(&self) -> bool {
        self.stream_type == MediaStreamType::Subtitle
            && is_text_format(self.codec.as_deref().unwrap_or_default())
    }

    /// Whether this subtitle can be converted to `format`.
    pub fn supports_subtitle_conversion_to(&self, format: &str) -> bool {
        if !self.is_text_subtitle_stream() {
            return false;
        }
        // ASS/SSA styling survives neither direction
        let from = self.codec.as_deref().unwrap_or_default();
        !["ass", "ssa"]
            .iter()
            .any(|c| from.eq_ignore_ascii_case(c) || format.eq_ignore_ascii_case(c))
    }

    pub fn codec_is(&self, codec: &str) -> bool {
        self.codec
            .as_deref()
            .is_some_and(|c| c.eq_ignore_ascii_case(codec))
    }
}

/// Whether a subtitle format is text based.
pub fn is_text_format(format: &str) -> bool {
    let f = format.to_ascii_lowercase();
    !f.contains("pgs")
        && !f.contains("dvd")
        && !f.contains("dvbsub")
        && f != "sub"
        && f != "dvb_subtitle"
}

fn default_true() -> bool {
    true
}

/// One representation of the requested item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MediaSource {
    /// A unique identifier for this specific media source.
    pub id: String,
    /// The container format (e.g., "mkv", "mov,mp4,m4a").
    #[serde(default)]
    pub container: Option<String>,
    /// Total combined bitrate in bits per second.
    #[serde(default)]
    pub bitrate: Option<u64>,
    #[serde(default)]
    pub protocol: MediaProtocol,
    /// Whether the file is located on a remote network/cloud.
    #[serde(default)]
    pub is_remote: bool,
    /// Used for live streams that do not have a defined end.
    #[serde(default)]
    pub is_infinite_stream: bool,
    #[serde(default = "default_true")]
    pub supports_direct_play: bool,
    #[serde(default = "default_true")]
    pub supports_direct_stream: bool,
    #[serde(default = "default_true")]
    pub supports_transcoding: bool,
    /// Restrict transcoding to the most compatible (MPEG-TS) targets.
    #[serde(default)]
    pub use_most_compatible_transcoding_profile: bool,
    #[serde(default)]
    pub default_audio_stream_index: Option<i32>,
    #[serde(default)]
    pub default_subtitle_stream_index: Option<i32>,
    #[serde(default)]
    pub media_streams: Vec<MediaStream>,
}

impl Default for MediaSource {
    fn default() -> Self {
        Self {
            id: String::new(),
            container: None,
            bitrate: None,
            protocol: MediaProtocol::File,
            is_remote: false,
            is_infinite_stream: false,
            supports_direct_play: true,
            supports_direct_stream: true,
            supports_transcoding: true,
            use_most_compatible_transcoding_profile: false,
            default_audio_stream_index: None,
            default_subtitle_stream_index: None,
            media_streams: Vec::new(),
        }
    }
}

impl MediaSource {
    /// The first video stream.
    pub fn video_stream(&self) -> Option<&MediaStream> {
        self.streams_of(MediaStreamType::Video).next()
    }

    pub fn streams_of(&self, kind: MediaStreamType) -> impl Iterator<Item = &MediaStream> + '_ {
        self.media_streams
            .iter()
            .filter(move |s| s.stream_type == kind)
    }

    pub fn media_stream(&self, kind: MediaStreamType, index: i32) -> Option<&MediaStream> {
        self.streams_of(kind).find(|s| s.index == index)
    }

    /// The requested audio stream, else the one flagged default, else the first.
    pub fn default_audio_stream(&self, index: Option<i32>) -> Option<&MediaStream> {
        if let Some(stream) = index.and_then(|i| self.media_stream(MediaStreamType::Audio, i)) {
            return Some(stream);
        }
        self.streams_of(MediaStreamType::Audio)
            .find(|s| s.is_default)
            .or_else(|| self.streams_of(MediaStreamType::Audio).next())
    }

    pub fn stream_count(&self, kind: MediaStreamType) -> u32 {
        self.streams_of(kind).count() as u32
    }

    /// Whether `stream` is an audio track other than the primary one.
    ///
    /// The primary track is the first embedded audio track.
    pub fn is_secondary_audio(&self, stream: &MediaStream) -> bool {
        self.streams_of(MediaStreamType::Audio)
            .find(|s| !s.is_external)
            .is_some_and(|primary| primary.index != stream.index)
    }
}
