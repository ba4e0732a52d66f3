//! Bitrate estimation
//!
//! Target audio bitrates for transcodes and the bitrate budget check used to
//! gate direct delivery.

use crate::container;
use crate::media::{MediaSource, MediaStream};
use crate::profile::{DeviceProfile, EncodingContext};
use crate::request::MediaOptions;

/// Audio bitrate when nothing better is known.
pub const FALLBACK_AUDIO_BITRATE: u64 = 192_000;

/// Audio-only transcode bitrate when neither request nor profile sets one.
pub const DEFAULT_MUSIC_TRANSCODING_BITRATE: u64 = 128_000;

/// Ceiling for mono sources with a very low native bitrate.
const MONO_LOW_BITRATE_LIMIT: u64 = 64_000;

/// Audio caps by total budget: `(budget upper bound, audio cap)`.
const BUDGET_AUDIO_CAPS: [(u64, u64); 8] = [
    (640_000, 128_000),
    (2_000_000, 384_000),
    (3_000_000, 448_000),
    (4_000_000, 640_000),
    (5_000_000, 768_000),
    (10_000_000, 1_536_000),
    (15_000_000, 2_304_000),
    (20_000_000, 3_584_000),
];

const UNBOUNDED_AUDIO_CAP: u64 = 7_168_000;

/// Whether the source overruns the budget.
///
/// Remote sources, an unset budget and an unknown source bitrate never
/// count as an overrun.
pub fn is_bitrate_limit_exceeded(source: &MediaSource, max_bitrate: Option<u64>) -> bool {
    if source.is_remote {
        return false;
    }
    let budget = match max_bitrate {
        Some(b) if b > 0 => b,
        _ => return false,
    };
    match source.bitrate {
        Some(bitrate) if bitrate > 0 => bitrate > budget,
        _ => false,
    }
}

/// Default bitrate for encoding `codec` with `channels` channels.
pub fn default_audio_bitrate(codec: Option<&str>, channels: Option<u32>) -> u64 {
    let channels = channels.unwrap_or(0);
    let codec = codec.unwrap_or_default().to_ascii_lowercase();
    let (mono, surround, stereo) = match codec.as_str() {
        "aac" | "mp3" | "ac3" | "eac3" => (128_000, 640_000, 384_000),
        "flac" | "alac" => (768_000, 3_840_000, 1_536_000),
        _ => return FALLBACK_AUDIO_BITRATE,
    };
    if channels < 2 {
        mono
    } else if channels >= 6 {
        surround
    } else {
        stereo
    }
}

/// The largest audio bitrate allowed under a total budget.
pub fn max_audio_bitrate_for_budget(total: u64) -> u64 {
    BUDGET_AUDIO_CAPS
        .iter()
        .find(|(limit, _)| total <= *limit)
        .map(|(_, cap)| *cap)
        .unwrap_or(UNBOUNDED_AUDIO_CAP)
}

/// Target audio bitrate for a video transcode or direct stream.
///
/// `target_codecs` are the candidate output codecs, the first one is used.
/// `target_channels` is the effective channel limit for that codec.
pub fn audio_bitrate(
    max_bitrate: Option<u64>,
    target_codecs: &[String],
    stream: Option<&MediaStream>,
    target_channels: Option<u32>,
) -> u64 {
    let target_codec = target_codecs.first().map(String::as_str);
    let mut limit = u64::MAX;

    let mut bitrate = match stream {
        None => FALLBACK_AUDIO_BITRATE,
        Some(stream) => {
            let source_channels = stream.channels;
            let switches_codec = !target_codecs.is_empty()
                && stream
                    .codec
                    .as_deref()
                    .filter(|c| !c.is_empty())
                    .is_some_and(|c| !container::list_contains(target_codecs, c));

            let bitrate = match (target_channels, source_channels) {
                (Some(target), Some(source)) if source > target => {
                    default_audio_bitrate(target_codec, Some(target))
                }
                (Some(_), Some(source)) if switches_codec => {
                    default_audio_bitrate(target_codec, Some(source))
                }
                _ => stream
                    .bit_rate
                    .unwrap_or_else(|| default_audio_bitrate(target_codec, target_channels)),
            };

            if source_channels == Some(1) && stream.bit_rate.unwrap_or(0) < MONO_LOW_BITRATE_LIMIT {
                limit = MONO_LOW_BITRATE_LIMIT;
            }
            bitrate
        }
    };

    if let Some(budget) = max_bitrate.filter(|b| *b > 0) {
        bitrate = bitrate.min(max_audio_bitrate_for_budget(budget));
    }
    bitrate.min(limit)
}

/// Target bitrate for an audio-only transcode.
///
/// The request wins, then the profile's streaming music bitrate, then the
/// budget. The result never exceeds the budget or `current`.
pub fn audio_transcode_bitrate(
    options: &MediaOptions,
    profile: &DeviceProfile,
    max_bitrate: Option<u64>,
    current: Option<u64>,
) -> u64 {
    let budget = max_bitrate.filter(|b| *b > 0);
    let profile_bitrate = match options.context {
        EncodingContext::Streaming => profile.music_streaming_transcoding_bitrate,
        EncodingContext::Static => None,
    };
    let mut bitrate = options
        .audio_transcoding_bitrate
        .or(profile_bitrate)
        .or(budget)
        .unwrap_or(DEFAULT_MUSIC_TRANSCODING_BITRATE);

    if let Some(budget) = budget {
        bitrate = bitrate.min(budget);
    }
    if let Some(current) = current {
        bitrate = bitrate.min(current);
    }
    bitrate
}
