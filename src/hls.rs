//! HLS codec restrictions
//!
//! Segmented output can only carry a subset of codecs, and which audio
//! codecs fit depends on the segment container.

/// Video codecs HLS players accept.
pub const VIDEO_CODECS: &[&str] = &["h264", "hevc", "av1"];

/// Audio codecs that fit in MPEG-TS segments.
pub const TS_AUDIO_CODECS: &[&str] = &["aac", "mp3", "ac3", "eac3"];

/// Audio codecs that fit in fMP4 segments.
pub const FMP4_AUDIO_CODECS: &[&str] = &["aac", "mp3", "ac3", "eac3", "opus", "flac", "alac"];

/// Whether segments are fragmented MP4 rather than MPEG-TS.
pub fn is_fmp4(container: Option<&str>) -> bool {
    container.is_some_and(|c| c.eq_ignore_ascii_case("mp4") || c.eq_ignore_ascii_case("fmp4"))
}

fn retain(codecs: Vec<String>, allowed: &[&str]) -> Vec<String> {
    codecs
        .into_iter()
        .filter(|c| allowed.iter().any(|a| a.eq_ignore_ascii_case(c)))
        .collect()
}

/// Drop video codecs HLS cannot carry.
pub fn filter_video_codecs(codecs: Vec<String>) -> Vec<String> {
    retain(codecs, VIDEO_CODECS)
}

/// Drop audio codecs the segment container cannot carry.
pub fn filter_audio_codecs(container: Option<&str>, codecs: Vec<String>) -> Vec<String> {
    if is_fmp4(container) {
        retain(codecs, FMP4_AUDIO_CODECS)
    } else {
        retain(codecs, TS_AUDIO_CODECS)
    }
}
