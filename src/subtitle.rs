//! Subtitle delivery resolution
//!
//! Picks how a subtitle track reaches the device, trying in order:
//!
//! 1. embedded in the output container, same format
//! 2. embedded after conversion
//! 3. external sidecar, same format
//! 4. HLS subtitle playlist, same format (transcodes only)
//! 5. external sidecar after conversion
//! 6. HLS subtitle playlist after conversion
//! 7. burned into the video in its original format
//!
//! Embedding is limited to containers that can carry subtitle tracks and is
//! never used when the output is segmented for HLS.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::container;
use crate::media::{is_text_format, MediaSource, MediaStream};
use crate::plan::PlayMethod;
use crate::profile::{MediaStreamProtocol, SubtitleDeliveryMethod, SubtitleProfile};
use crate::support::TranscoderSupport;

/// Containers that can never carry an embedded subtitle track.
const EMBED_DENIED: &str = "ts,mpegts,mp4";

/// Containers known to carry embedded subtitle tracks.
const EMBED_ALLOWED: &str = "mkv,matroska";

/// The resolved delivery of a subtitle track.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SubtitleDelivery {
    pub method: SubtitleDeliveryMethod,
    pub format: String,
}

/// Where the media is going, as far as subtitles care.
#[derive(Debug, Clone, Copy)]
pub struct SubtitleTarget<'a> {
    pub play_method: PlayMethod,
    pub container: Option<&'a str>,
    pub protocol: MediaStreamProtocol,
}

impl SubtitleTarget<'_> {
    fn is_hls_transcode(&self) -> bool {
        self.play_method == PlayMethod::Transcode && self.protocol == MediaStreamProtocol::Hls
    }
}

/// Whether `container` can carry an embedded subtitle track.
///
/// Unknown containers are refused.
pub fn is_subtitle_embed_supported(container: Option<&str>) -> bool {
    let Some(container) = container.filter(|c| !c.trim().is_empty()) else {
        return false;
    };
    if container::contains_container(Some(EMBED_DENIED), Some(container)) {
        return false;
    }
    container::contains_container(Some(EMBED_ALLOWED), Some(container))
}

/// Choose the delivery for `stream`.
pub fn resolve_subtitle_delivery(
    source: &MediaSource,
    stream: &MediaStream,
    profiles: &[SubtitleProfile],
    target: SubtitleTarget<'_>,
    support: &dyn TranscoderSupport,
) -> SubtitleDelivery {
    let codec = stream.codec.clone().unwrap_or_default();

    if !stream.is_external && !target.is_hls_transcode() {
        if let Some(p) = find_embedded(stream, profiles, target, support, false) {
            return delivery(p);
        }
        if let Some(p) = find_embedded(stream, profiles, target, support, true) {
            return delivery(p);
        }
    }

    let passes = [
        (SubtitleDeliveryMethod::External, false),
        (SubtitleDeliveryMethod::Hls, false),
        (SubtitleDeliveryMethod::External, true),
        (SubtitleDeliveryMethod::Hls, true),
    ];
    for (method, allow_conversion) in passes {
        if let Some(p) =
            find_sidecar(source, stream, profiles, target, support, method, allow_conversion)
        {
            return delivery(p);
        }
    }

    debug!(
        "No deliverable subtitle profile for stream {} ({}), burning in",
        stream.index, codec
    );
    SubtitleDelivery {
        method: SubtitleDeliveryMethod::Encode,
        format: codec,
    }
}

fn delivery(profile: &SubtitleProfile) -> SubtitleDelivery {
    SubtitleDelivery {
        method: profile.method,
        format: profile.format.clone(),
    }
}

fn find_embedded<'p>(
    stream: &MediaStream,
    profiles: &'p [SubtitleProfile],
    target: SubtitleTarget<'_>,
    support: &dyn TranscoderSupport,
    allow_conversion: bool,
) -> Option<&'p SubtitleProfile> {
    profiles.iter().find(|p| {
        if p.method != SubtitleDeliveryMethod::Embed
            || !p.supports_language(stream.language.as_deref())
            || !container::contains_container(p.container.as_deref(), target.container)
            || !is_subtitle_embed_supported(target.container)
        {
            return false;
        }
        if allow_conversion {
            stream.is_text_subtitle_stream()
                && stream.supports_subtitle_conversion_to(&p.format)
                && support.can_encode_to_subtitle_codec(&p.format)
        } else {
            stream.is_text_subtitle_stream() == is_text_format(&p.format)
                && stream.codec_is(&p.format)
        }
    })
}

fn find_sidecar<'p>(
    source: &MediaSource,
    stream: &MediaStream,
    profiles: &'p [SubtitleProfile],
    target: SubtitleTarget<'_>,
    support: &dyn TranscoderSupport,
    method: SubtitleDeliveryMethod,
    allow_conversion: bool,
) -> Option<&'p SubtitleProfile> {
    if method == SubtitleDeliveryMethod::Hls && target.play_method != PlayMethod::Transcode {
        return None;
    }
    let codec = stream.codec.as_deref().unwrap_or_default();

    profiles.iter().find(|p| {
        if p.method != method || !p.supports_language(stream.language.as_deref()) {
            return false;
        }
        if !stream.is_external && !support.can_extract_subtitles(codec) {
            return false;
        }
        let kind_matches = match method {
            SubtitleDeliveryMethod::External => {
                stream.is_text_subtitle_stream() == is_text_format(&p.format)
            }
            _ => stream.is_text_subtitle_stream(),
        };
        if !kind_matches {
            return false;
        }

        let needs_conversion = !stream.codec_is(&p.format);
        if !needs_conversion {
            return !allow_conversion;
        }
        allow_conversion
            && !source.is_infinite_stream
            && stream.is_text_subtitle_stream()
            && stream.supports_external_stream
            && stream.supports_subtitle_conversion_to(&p.format)
            && support.can_encode_to_subtitle_codec(&p.format)
    })
}
