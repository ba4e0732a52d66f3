//! Transcode reasons
//!
//! Every rule that rejects direct delivery records a [`TranscodeReason`].
//! Reasons accumulate in a [`TranscodeReasons`] set which only ever grows:
//! there is no way to remove a reason once it has been recorded.

use std::fmt;
use std::ops::BitOr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Why direct delivery was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TranscodeReason {
    ContainerNotSupported,
    VideoCodecNotSupported,
    AudioCodecNotSupported,
    SubtitleCodecNotSupported,
    AudioIsExternal,
    SecondaryAudioNotSupported,

    // Video constraints
    VideoProfileNotSupported,
    VideoRangeTypeNotSupported,
    VideoCodecTagNotSupported,
    VideoLevelNotSupported,
    VideoResolutionNotSupported,
    VideoBitDepthNotSupported,
    VideoFramerateNotSupported,
    RefFramesNotSupported,
    AnamorphicVideoNotSupported,
    InterlacedVideoNotSupported,

    // Audio constraints
    AudioChannelsNotSupported,
    AudioProfileNotSupported,
    AudioSampleRateNotSupported,
    AudioBitDepthNotSupported,

    // Bitrate constraints
    ContainerBitrateExceedsLimit,
    VideoBitrateNotSupported,
    AudioBitrateNotSupported,

    // Errors
    UnknownVideoStreamInfo,
    UnknownAudioStreamInfo,
    DirectPlayError,
}

impl TranscodeReason {
    /// Every reason, in declaration order.
    pub const ALL: [TranscodeReason; 26] = [
        TranscodeReason::ContainerNotSupported,
        TranscodeReason::VideoCodecNotSupported,
        TranscodeReason::AudioCodecNotSupported,
        TranscodeReason::SubtitleCodecNotSupported,
        TranscodeReason::AudioIsExternal,
        TranscodeReason::SecondaryAudioNotSupported,
        TranscodeReason::VideoProfileNotSupported,
        TranscodeReason::VideoRangeTypeNotSupported,
        TranscodeReason::VideoCodecTagNotSupported,
        TranscodeReason::VideoLevelNotSupported,
        TranscodeReason::VideoResolutionNotSupported,
        TranscodeReason::VideoBitDepthNotSupported,
        TranscodeReason::VideoFramerateNotSupported,
        TranscodeReason::RefFramesNotSupported,
        TranscodeReason::AnamorphicVideoNotSupported,
        TranscodeReason::InterlacedVideoNotSupported,
        TranscodeReason::AudioChannelsNotSupported,
        TranscodeReason::AudioProfileNotSupported,
        TranscodeReason::AudioSampleRateNotSupported,
        TranscodeReason::AudioBitDepthNotSupported,
        TranscodeReason::ContainerBitrateExceedsLimit,
        TranscodeReason::VideoBitrateNotSupported,
        TranscodeReason::AudioBitrateNotSupported,
        TranscodeReason::UnknownVideoStreamInfo,
        TranscodeReason::UnknownAudioStreamInfo,
        TranscodeReason::DirectPlayError,
    ];

    const fn bit(self) -> u32 {
        1 << (self as u32)
    }
}

/// A set of [`TranscodeReason`]s.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct TranscodeReasons(u32);

impl TranscodeReasons {
    /// Reasons attributable to the container.
    pub const CONTAINER: TranscodeReasons = TranscodeReasons::of(&[
        TranscodeReason::ContainerNotSupported,
        TranscodeReason::ContainerBitrateExceedsLimit,
    ]);

    /// Reasons attributable to the audio track.
    pub const AUDIO: TranscodeReasons = TranscodeReasons::of(&[
        TranscodeReason::AudioCodecNotSupported,
        TranscodeReason::AudioBitrateNotSupported,
        TranscodeReason::AudioChannelsNotSupported,
        TranscodeReason::AudioProfileNotSupported,
        TranscodeReason::AudioSampleRateNotSupported,
        TranscodeReason::SecondaryAudioNotSupported,
        TranscodeReason::AudioBitDepthNotSupported,
        TranscodeReason::AudioIsExternal,
    ]);

    /// Reasons attributable to the video track.
    pub const VIDEO: TranscodeReasons = TranscodeReasons::of(&[
        TranscodeReason::VideoCodecNotSupported,
        TranscodeReason::VideoResolutionNotSupported,
        TranscodeReason::AnamorphicVideoNotSupported,
        TranscodeReason::InterlacedVideoNotSupported,
        TranscodeReason::VideoBitDepthNotSupported,
        TranscodeReason::VideoBitrateNotSupported,
        TranscodeReason::VideoFramerateNotSupported,
        TranscodeReason::VideoLevelNotSupported,
        TranscodeReason::RefFramesNotSupported,
        TranscodeReason::VideoRangeTypeNotSupported,
        TranscodeReason::VideoProfileNotSupported,
        TranscodeReason::VideoCodecTagNotSupported,
    ]);

    /// Reasons a direct stream can absorb: the audio is re-encoded and the
    /// container is rewritten, the video is left alone.
    pub const DIRECT_STREAM_TOLERATED: TranscodeReasons =
        TranscodeReasons(Self::AUDIO.0 | TranscodeReason::ContainerNotSupported.bit());

    /// Build a set from a list of reasons.
    pub const fn of(reasons: &[TranscodeReason]) -> Self {
        let mut bits = 0;
        let mut i = 0;
        while i < reasons.len() {
            bits |= reasons[i].bit();
            i += 1;
        }
        TranscodeReasons(bits)
    }

    /// Create an empty set.
    pub const fn new() -> Self {
        TranscodeReasons(0)
    }

    /// Record a reason.
    pub fn insert(&mut self, reason: TranscodeReason) {
        self.0 |= reason.bit();
    }

    /// Record every reason of `other`.
    pub fn extend(&mut self, other: TranscodeReasons) {
        self.0 |= other.0;
    }

    pub fn contains(&self, reason: TranscodeReason) -> bool {
        self.0 & reason.bit() != 0
    }

    /// Whether the two sets share at least one reason.
    pub fn intersects(&self, other: TranscodeReasons) -> bool {
        self.0 & other.0 != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    /// The reasons of this set that are not in `mask`.
    pub fn without(&self, mask: TranscodeReasons) -> TranscodeReasons {
        TranscodeReasons(self.0 & !mask.0)
    }

    /// Iterate the reasons in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = TranscodeReason> + '_ {
        TranscodeReason::ALL
            .iter()
            .copied()
            .filter(move |r| self.contains(*r))
    }
}

impl From<TranscodeReason> for TranscodeReasons {
    fn from(reason: TranscodeReason) -> Self {
        TranscodeReasons(reason.bit())
    }
}

impl FromIterator<TranscodeReason> for TranscodeReasons {
    fn from_iter<I: IntoIterator<Item = TranscodeReason>>(iter: I) -> Self {
        let mut set = TranscodeReasons::new();
        for reason in iter {
            set.insert(reason);
        }
        set
    }
}

impl BitOr for TranscodeReasons {
    type Output = TranscodeReasons;

    fn bitor(self, rhs: TranscodeReasons) -> TranscodeReasons {
        TranscodeReasons(self.0 | rhs.0)
    }
}

impl fmt::Debug for TranscodeReasons {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl fmt::Display for TranscodeReasons {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<String> = self.iter().map(|r| format!("{:?}", r)).collect();
        write!(f, "{}", names.join(","))
    }
}

impl Serialize for TranscodeReasons {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

impl<'de> Deserialize<'de> for TranscodeReasons {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let reasons = Vec::<TranscodeReason>::deserialize(deserializer)?;
        Ok(reasons.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_groups_are_disjoint() {
        assert!(!TranscodeReasons::AUDIO.intersects(TranscodeReasons::VIDEO));
        assert!(!TranscodeReasons::AUDIO.intersects(TranscodeReasons::CONTAINER));
        assert!(!TranscodeReasons::VIDEO.intersects(TranscodeReasons::CONTAINER));
    }

    #[test]
    fn test_insert_is_union() {
        let mut reasons = TranscodeReasons::new();
        assert!(reasons.is_empty());
        reasons.insert(TranscodeReason::AudioCodecNotSupported);
        reasons.insert(TranscodeReason::AudioCodecNotSupported);
        reasons.extend(TranscodeReason::VideoLevelNotSupported.into());
        assert_eq!(reasons.len(), 2);
        assert!(reasons.contains(TranscodeReason::AudioCodecNotSupported));
        assert!(reasons.contains(TranscodeReason::VideoLevelNotSupported));
    }

    #[test]
    fn test_direct_stream_mask() {
        let reasons: TranscodeReasons = [
            TranscodeReason::ContainerNotSupported,
            TranscodeReason::AudioChannelsNotSupported,
        ]
        .into_iter()
        .collect();
        assert!(reasons
            .without(TranscodeReasons::DIRECT_STREAM_TOLERATED)
            .is_empty());

        let bitrate: TranscodeReasons = TranscodeReason::ContainerBitrateExceedsLimit.into();
        assert!(!bitrate
            .without(TranscodeReasons::DIRECT_STREAM_TOLERATED)
            .is_empty());
    }

    #[test]
    fn test_serde_as_names() {
        let reasons = TranscodeReasons::of(&[
            TranscodeReason::VideoCodecNotSupported,
            TranscodeReason::ContainerNotSupported,
        ]);
        let json = serde_json::to_string(&reasons).unwrap();
        assert_eq!(json, r#"["ContainerNotSupported","VideoCodecNotSupported"]"#);
        let back: TranscodeReasons = serde_json::from_str(&json).unwrap();
        assert_eq!(back, reasons);
    }
}
