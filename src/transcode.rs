//! Transcoding profile selection
//!
//! When direct delivery fails the device's transcoding profiles are ranked
//! so that a profile able to carry the source video untouched wins over one
//! that forces a re-encode.

use tracing::debug;

use crate::condition::{self, VideoAttributes};
use crate::container;
use crate::direct_play::applicable_codec_profiles;
use crate::media::{MediaSource, MediaStream};
use crate::profile::{CodecType, DeviceProfile, ProfileMediaType, TranscodingProfile};
use crate::request::MediaOptions;
use crate::support::TranscoderSupport;

/// Container used when a source asks for the most compatible output.
const MOST_COMPATIBLE_CONTAINER: &str = "ts";

/// The chosen transcoding profile.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TranscodeSelection<'p> {
    pub profile: &'p TranscodingProfile,
    /// The source video can be copied into this profile as is.
    pub stream_copy_viable: bool,
}

/// How well a profile fits the source video. Lower is better.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Bucket {
    /// Codec matches and its codec profile conditions hold.
    CopyViable,
    /// Codec matches but a codec profile condition fails.
    CodecMatch,
    Other,
}

fn candidates<'p>(
    profile: &'p DeviceProfile,
    source: &MediaSource,
    options: &MediaOptions,
    media_type: ProfileMediaType,
) -> impl Iterator<Item = &'p TranscodingProfile> + 'p {
    let context = options.context;
    let most_compatible = source.use_most_compatible_transcoding_profile;
    profile.transcoding_profiles.iter().filter(move |tp| {
        tp.profile_type == media_type
            && tp.context == context
            && (!most_compatible || tp.container.eq_ignore_ascii_case(MOST_COMPATIBLE_CONTAINER))
    })
}

fn bucket(
    profile: &DeviceProfile,
    source: &MediaSource,
    options: &MediaOptions,
    video: Option<&MediaStream>,
    candidate: &TranscodingProfile,
) -> Bucket {
    let Some(stream) = video else {
        return Bucket::Other;
    };
    let codec = stream.codec.as_deref();
    if !options.allow_video_stream_copy
        || !container::contains_container(candidate.video_codec.as_deref(), codec)
    {
        return Bucket::Other;
    }

    let attrs = VideoAttributes::of(source, Some(stream));
    let satisfied = applicable_codec_profiles(
        profile,
        CodecType::Video,
        codec,
        Some(candidate.container.as_str()),
        &attrs,
    )
    .all(|cp| condition::all_satisfied(&cp.conditions, &attrs));

    if satisfied {
        Bucket::CopyViable
    } else {
        Bucket::CodecMatch
    }
}

/// Choose the transcoding profile for a video source.
///
/// Returns `None` when the source can be neither transcoded nor direct
/// streamed, or no profile fits the request context.
pub fn select_video_transcoding_profile<'p>(
    profile: &'p DeviceProfile,
    source: &MediaSource,
    options: &MediaOptions,
    video: Option<&MediaStream>,
) -> Option<TranscodeSelection<'p>> {
    if !(source.supports_transcoding || source.supports_direct_stream) {
        debug!("Source {} supports neither transcoding nor direct stream", source.id);
        return None;
    }

    let mut ranked: Vec<(Bucket, &'p TranscodingProfile)> =
        candidates(profile, source, options, ProfileMediaType::Video)
            .map(|tp| (bucket(profile, source, options, video, tp), tp))
            .collect();
    ranked.sort_by_key(|(b, _)| *b);

    let (best, tp) = ranked.first().copied()?;
    debug!(
        "Selected transcoding profile {} ({:?}/{:?}) for source {}, bucket {:?}",
        tp.container, tp.video_codec, tp.audio_codec, source.id, best
    );
    Some(TranscodeSelection {
        profile: tp,
        stream_copy_viable: best == Bucket::CopyViable,
    })
}

/// Choose the transcoding profile for an audio-only source.
///
/// The first profile whose output codec the transcoder can encode wins.
pub fn select_audio_transcoding_profile<'p>(
    profile: &'p DeviceProfile,
    source: &MediaSource,
    options: &MediaOptions,
    support: &dyn TranscoderSupport,
) -> Option<&'p TranscodingProfile> {
    candidates(profile, source, options, ProfileMediaType::Audio).find(|tp| {
        let codecs = container::split(tp.audio_codec.as_deref());
        let target = codecs.first().map_or(tp.container.as_str(), String::as_str);
        support.can_encode_to_audio_codec(target)
    })
}
