//! Condition evaluation
//!
//! A [`ProfileCondition`] is tested against an attribute snapshot of one
//! stream. Snapshots implement [`ConditionAttributes`], which maps each
//! [`ProfileConditionValue`] to a typed [`AttributeValue`].
//!
//! Absent values never default to zero. Every attribute carries an
//! [`AbsencePolicy`] that decides the outcome when the probe left it unset.

use tracing::{debug, warn};

use crate::container;
use crate::error::ConditionError;
use crate::media::{MediaSource, MediaStream, MediaStreamType};
use crate::profile::{ProfileCondition, ProfileConditionType, ProfileConditionValue};
use crate::reason::{TranscodeReason, TranscodeReasons};

/// The value of one attribute in a snapshot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AttributeValue<'a> {
    Integer(Option<i64>),
    Decimal(Option<f64>),
    Flag(Option<bool>),
    Text(Option<&'a str>),
    /// Stream counts are always known.
    Count(u32),
    /// The attribute does not describe this kind of stream.
    NotApplicable,
}

/// What an unknown attribute value means for a condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbsencePolicy {
    /// Satisfied unless the condition is marked required.
    SatisfiedUnlessRequired,
    /// The value can never be absent.
    NeverAbsent,
}

pub fn absence_policy(property: ProfileConditionValue) -> AbsencePolicy {
    match property {
        ProfileConditionValue::NumAudioStreams | ProfileConditionValue::NumVideoStreams => {
            AbsencePolicy::NeverAbsent
        }
        _ => AbsencePolicy::SatisfiedUnlessRequired,
    }
}

/// An attribute snapshot conditions can be evaluated against.
pub trait ConditionAttributes {
    fn attribute(&self, property: ProfileConditionValue) -> AttributeValue<'_>;
}

/// Attributes of a video stream within its source.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VideoAttributes {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub bit_depth: Option<u32>,
    pub bitrate: Option<u64>,
    pub profile: Option<String>,
    pub range_type: Option<String>,
    pub level: Option<f64>,
    pub framerate: Option<f64>,
    pub packet_length: Option<u32>,
    pub is_anamorphic: Option<bool>,
    pub is_interlaced: Option<bool>,
    pub ref_frames: Option<u32>,
    pub num_video_streams: u32,
    pub num_audio_streams: u32,
    pub codec_tag: Option<String>,
    pub is_avc: Option<bool>,
}

impl VideoAttributes {
    pub fn of(source: &MediaSource, stream: Option<&MediaStream>) -> Self {
        let mut attrs = VideoAttributes {
            num_video_streams: source.stream_count(MediaStreamType::Video),
            num_audio_streams: source.stream_count(MediaStreamType::Audio),
            ..Default::default()
        };
        if let Some(s) = stream {
            attrs.width = s.width;
            attrs.height = s.height;
            attrs.bit_depth = s.bit_depth;
            attrs.bitrate = s.bit_rate;
            attrs.profile = s.profile.clone();
            attrs.range_type = s.video_range_type.clone();
            attrs.level = s.level;
            attrs.framerate = s.reference_frame_rate;
            attrs.packet_length = s.packet_length;
            attrs.is_anamorphic = s.is_anamorphic;
            attrs.is_interlaced = s.is_interlaced;
            attrs.ref_frames = s.ref_frames;
            attrs.codec_tag = s.codec_tag.clone();
            attrs.is_avc = s.is_avc;
        }
        attrs
    }
}

impl ConditionAttributes for VideoAttributes {
    fn attribute(&self, property: ProfileConditionValue) -> AttributeValue<'_> {
        use ProfileConditionValue::*;
        match property {
            Width => integer(self.width),
            Height => integer(self.height),
            VideoBitDepth => integer(self.bit_depth),
            VideoBitrate => AttributeValue::Integer(self.bitrate.map(saturate)),
            VideoProfile => AttributeValue::Text(self.profile.as_deref()),
            VideoRangeType => AttributeValue::Text(self.range_type.as_deref()),
            VideoLevel => AttributeValue::Decimal(self.level),
            VideoFramerate => AttributeValue::Decimal(self.framerate),
            PacketLength => integer(self.packet_length),
            IsAnamorphic => AttributeValue::Flag(self.is_anamorphic),
            IsInterlaced => AttributeValue::Flag(self.is_interlaced),
            RefFrames => integer(self.ref_frames),
            NumVideoStreams => AttributeValue::Count(self.num_video_streams),
            NumAudioStreams => AttributeValue::Count(self.num_audio_streams),
            VideoCodecTag => AttributeValue::Text(self.codec_tag.as_deref()),
            IsAvc => AttributeValue::Flag(self.is_avc),
            _ => AttributeValue::NotApplicable,
        }
    }
}

/// Attributes of an audio stream within its source.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AudioAttributes {
    pub channels: Option<u32>,
    pub bitrate: Option<u64>,
    pub sample_rate: Option<u32>,
    pub bit_depth: Option<u32>,
    pub profile: Option<String>,
    pub is_secondary: Option<bool>,
}

impl AudioAttributes {
    pub fn of(source: &MediaSource, stream: Option<&MediaStream>) -> Self {
        match stream {
            Some(s) => AudioAttributes {
                channels: s.channels,
                bitrate: s.bit_rate,
                sample_rate: s.sample_rate,
                bit_depth: s.bit_depth,
                profile: s.profile.clone(),
                is_secondary: Some(source.is_secondary_audio(s)),
            },
            None => AudioAttributes::default(),
        }
    }
}

impl ConditionAttributes for AudioAttributes {
    fn attribute(&self, property: ProfileConditionValue) -> AttributeValue<'_> {
        use ProfileConditionValue::*;
        match property {
            AudioChannels => integer(self.channels),
            AudioBitrate => AttributeValue::Integer(self.bitrate.map(saturate)),
            AudioSampleRate => integer(self.sample_rate),
            AudioBitDepth => integer(self.bit_depth),
            AudioProfile => AttributeValue::Text(self.profile.as_deref()),
            IsSecondaryAudio => AttributeValue::Flag(self.is_secondary),
            _ => AttributeValue::NotApplicable,
        }
    }
}

fn integer(value: Option<u32>) -> AttributeValue<'static> {
    AttributeValue::Integer(value.map(i64::from))
}

fn saturate(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

/// Evaluate one condition.
///
/// Fails when the literal cannot be parsed for the attribute's type or the
/// operator makes no sense for it.
pub fn evaluate<A: ConditionAttributes + ?Sized>(
    condition: &ProfileCondition,
    attributes: &A,
) -> Result<bool, ConditionError> {
    let value = attributes.attribute(condition.property);
    let absent = match value {
        AttributeValue::NotApplicable => return Ok(true),
        AttributeValue::Integer(v) => v.is_none(),
        AttributeValue::Decimal(v) => v.is_none(),
        AttributeValue::Flag(v) => v.is_none(),
        AttributeValue::Text(v) => v.map_or(true, str::is_empty),
        AttributeValue::Count(_) => false,
    };
    if absent {
        return match absence_policy(condition.property) {
            AbsencePolicy::SatisfiedUnlessRequired => Ok(!condition.is_required),
            AbsencePolicy::NeverAbsent => Ok(false),
        };
    }

    match value {
        AttributeValue::Integer(Some(current)) => compare_integer(condition, current),
        AttributeValue::Count(current) => compare_integer(condition, i64::from(current)),
        AttributeValue::Decimal(Some(current)) => compare_decimal(condition, current),
        AttributeValue::Flag(Some(current)) => compare_flag(condition, current),
        AttributeValue::Text(Some(current)) => compare_text(condition, current),
        _ => Ok(true),
    }
}

/// Evaluate one condition, treating evaluation errors as unsatisfied.
pub fn is_satisfied<A: ConditionAttributes + ?Sized>(
    condition: &ProfileCondition,
    attributes: &A,
) -> bool {
    match evaluate(condition, attributes) {
        Ok(satisfied) => satisfied,
        Err(e) => {
            warn!("Skipping condition: {}", e);
            false
        }
    }
}

/// Whether every condition holds.
pub fn all_satisfied<A: ConditionAttributes + ?Sized>(
    conditions: &[ProfileCondition],
    attributes: &A,
) -> bool {
    conditions.iter().all(|c| is_satisfied(c, attributes))
}

fn invalid_literal(condition: &ProfileCondition) -> ConditionError {
    ConditionError::InvalidLiteral {
        property: condition.property,
        value: condition.value.clone(),
    }
}

fn unsupported(condition: &ProfileCondition) -> ConditionError {
    ConditionError::UnsupportedOperator {
        property: condition.property,
        condition: condition.condition,
    }
}

fn compare_integer(condition: &ProfileCondition, current: i64) -> Result<bool, ConditionError> {
    let expected: i64 = condition
        .value
        .trim()
        .parse()
        .map_err(|_| invalid_literal(condition))?;
    match condition.condition {
        ProfileConditionType::Equals => Ok(current == expected),
        ProfileConditionType::NotEquals => Ok(current != expected),
        ProfileConditionType::LessThanEqual => Ok(current <= expected),
        ProfileConditionType::GreaterThanEqual => Ok(current >= expected),
        ProfileConditionType::EqualsAny => Err(unsupported(condition)),
    }
}

fn compare_decimal(condition: &ProfileCondition, current: f64) -> Result<bool, ConditionError> {
    let expected: f64 = condition
        .value
        .trim()
        .parse()
        .map_err(|_| invalid_literal(condition))?;
    match condition.condition {
        ProfileConditionType::Equals => Ok(current == expected),
        ProfileConditionType::NotEquals => Ok(current != expected),
        ProfileConditionType::LessThanEqual => Ok(current <= expected),
        ProfileConditionType::GreaterThanEqual => Ok(current >= expected),
        ProfileConditionType::EqualsAny => Err(unsupported(condition)),
    }
}

fn compare_flag(condition: &ProfileCondition, current: bool) -> Result<bool, ConditionError> {
    let expected = parse_flag(&condition.value).ok_or_else(|| invalid_literal(condition))?;
    match condition.condition {
        ProfileConditionType::Equals => Ok(current == expected),
        ProfileConditionType::NotEquals => Ok(current != expected),
        _ => Err(unsupported(condition)),
    }
}

fn compare_text(condition: &ProfileCondition, current: &str) -> Result<bool, ConditionError> {
    match condition.condition {
        ProfileConditionType::EqualsAny => Ok(container::split_pipe(&condition.value)
            .iter()
            .any(|v| v.eq_ignore_ascii_case(current))),
        ProfileConditionType::Equals => Ok(condition.value.eq_ignore_ascii_case(current)),
        ProfileConditionType::NotEquals => Ok(!condition.value.eq_ignore_ascii_case(current)),
        _ => Err(unsupported(condition)),
    }
}

/// Parse a boolean literal, case-insensitively.
pub fn parse_flag(value: &str) -> Option<bool> {
    let value = value.trim();
    if value.eq_ignore_ascii_case("true") {
        Some(true)
    } else if value.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

/// The failure reason recorded when a condition on `property` fails.
pub fn reason_for_failed_condition(property: ProfileConditionValue) -> Option<TranscodeReason> {
    use ProfileConditionValue::*;
    match property {
        AudioBitDepth => Some(TranscodeReason::AudioBitDepthNotSupported),
        AudioBitrate => Some(TranscodeReason::AudioBitrateNotSupported),
        AudioChannels => Some(TranscodeReason::AudioChannelsNotSupported),
        AudioProfile => Some(TranscodeReason::AudioProfileNotSupported),
        AudioSampleRate => Some(TranscodeReason::AudioSampleRateNotSupported),
        Height | Width => Some(TranscodeReason::VideoResolutionNotSupported),
        IsAnamorphic => Some(TranscodeReason::AnamorphicVideoNotSupported),
        IsInterlaced => Some(TranscodeReason::InterlacedVideoNotSupported),
        IsSecondaryAudio => Some(TranscodeReason::SecondaryAudioNotSupported),
        RefFrames => Some(TranscodeReason::RefFramesNotSupported),
        VideoBitDepth => Some(TranscodeReason::VideoBitDepthNotSupported),
        VideoBitrate => Some(TranscodeReason::VideoBitrateNotSupported),
        VideoCodecTag => Some(TranscodeReason::VideoCodecTagNotSupported),
        VideoFramerate => Some(TranscodeReason::VideoFramerateNotSupported),
        VideoLevel => Some(TranscodeReason::VideoLevelNotSupported),
        VideoProfile => Some(TranscodeReason::VideoProfileNotSupported),
        VideoRangeType => Some(TranscodeReason::VideoRangeTypeNotSupported),
        Has64BitOffsets | IsAvc | NumAudioStreams | NumVideoStreams | PacketLength
        | VideoTimestamp => None,
    }
}

/// Collect the reasons of every failing condition.
///
/// `kind` names the rule family in log output.
pub fn aggregate_failures<'c, A, I>(
    source: &MediaSource,
    kind: &str,
    conditions: I,
    attributes: &A,
) -> TranscodeReasons
where
    A: ConditionAttributes + ?Sized,
    I: IntoIterator<Item = &'c ProfileCondition>,
{
    let mut reasons = TranscodeReasons::new();
    for condition in conditions {
        if is_satisfied(condition, attributes) {
            continue;
        }
        debug!(
            "{} rejected by {:?} {:?} {:?} for source {}",
            kind, condition.property, condition.condition, condition.value, source.id
        );
        if let Some(reason) = reason_for_failed_condition(condition.property) {
            reasons.insert(reason);
        }
    }
    reasons
}
