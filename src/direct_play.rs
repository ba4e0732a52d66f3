//! Direct play evaluation
//!
//! Decides whether a source can reach the device unchanged (direct play) or
//! with only its container rewritten (direct stream), and records why not
//! when it cannot.
//!
//! Video sources are checked against every video direct-play rule. Each rule
//! gets its own failure set, the rules are ranked, and the best rule with a
//! play method wins. When none has one, the failure set of the best rule
//! that at least accepted the container is reported.

use tracing::debug;

use crate::condition::{self, AudioAttributes, VideoAttributes};
use crate::container;
use crate::media::{MediaSource, MediaStream};
use crate::plan::PlayMethod;
use crate::profile::{
    CodecProfile, CodecType, DeviceProfile, DirectPlayProfile, MediaStreamProtocol,
    ProfileMediaType, SubtitleDeliveryMethod,
};
use crate::reason::{TranscodeReason, TranscodeReasons};
use crate::subtitle::{self, SubtitleTarget};
use crate::support::TranscoderSupport;

/// Which direct methods the request allows for this source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Eligibility {
    pub direct_play: bool,
    pub direct_stream: bool,
}

impl Eligibility {
    pub fn any(&self) -> bool {
        self.direct_play || self.direct_stream
    }
}

/// Outcome of a direct play evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct DirectPlayDecision<'p> {
    /// The rule that matched, if any.
    pub profile: Option<&'p DirectPlayProfile>,
    pub play_method: Option<PlayMethod>,
    /// The audio track the winning rule accepted.
    pub audio_stream_index: Option<i32>,
    pub reasons: TranscodeReasons,
}

impl<'p> DirectPlayDecision<'p> {
    fn rejected(reasons: TranscodeReasons) -> Self {
        DirectPlayDecision {
            profile: None,
            play_method: None,
            audio_stream_index: None,
            reasons,
        }
    }
}

/// Reasons from the conditions of every applicable video codec profile.
pub fn video_codec_profile_failures(
    profile: &DeviceProfile,
    source: &MediaSource,
    video: Option<&MediaStream>,
    container: Option<&str>,
) -> TranscodeReasons {
    let Some(stream) = video else {
        return TranscodeReasons::new();
    };
    let attrs = VideoAttributes::of(source, Some(stream));
    let codec = stream.codec.as_deref();
    let mut reasons = TranscodeReasons::new();
    for cp in applicable_codec_profiles(profile, CodecType::Video, codec, container, &attrs) {
        reasons.extend(condition::aggregate_failures(source, "VideoCodecProfile", &cp.conditions, &attrs));
    }
    reasons
}

/// Reasons from the conditions of every applicable audio codec profile.
///
/// `codec_type` is [`CodecType::Audio`] for audio items and
/// [`CodecType::VideoAudio`] for audio tracks of video items.
pub fn audio_codec_failures(
    profile: &DeviceProfile,
    source: &MediaSource,
    stream: Option<&MediaStream>,
    container: Option<&str>,
    codec_type: CodecType,
) -> TranscodeReasons {
    let attrs = AudioAttributes::of(source, stream);
    let codec = stream.and_then(|s| s.codec.as_deref());
    let kind = match codec_type {
        CodecType::Audio => "AudioCodecProfile",
        _ => "VideoAudioCodecProfile",
    };
    let mut reasons = TranscodeReasons::new();
    for cp in applicable_codec_profiles(profile, codec_type, codec, container, &attrs) {
        reasons.extend(condition::aggregate_failures(source, kind, &cp.conditions, &attrs));
    }
    reasons
}

/// Codec profiles of `codec_type` covering `codec` in `container` whose
/// apply conditions hold.
pub fn applicable_codec_profiles<'p, 'a, A>(
    profile: &'p DeviceProfile,
    codec_type: CodecType,
    codec: Option<&'a str>,
    container: Option<&'a str>,
    attrs: &'a A,
) -> impl Iterator<Item = &'p CodecProfile> + 'a
where
    'p: 'a,
    A: condition::ConditionAttributes,
{
    profile.codec_profiles.iter().filter(move |cp| {
        cp.codec_type == codec_type
            && cp.contains_any_codec(codec, container)
            && condition::all_satisfied(&cp.apply_conditions, attrs)
    })
}

/// Reasons from container profiles covering the source container.
pub fn container_profile_failures(
    profile: &DeviceProfile,
    source: &MediaSource,
    attrs: &VideoAttributes,
) -> TranscodeReasons {
    let container = source.container.as_deref();
    let conditions = profile
        .container_profiles
        .iter()
        .filter(|cp| cp.profile_type == ProfileMediaType::Video && cp.contains_container(container))
        .flat_map(|cp| cp.conditions.iter());
    condition::aggregate_failures(source, "ContainerProfile", conditions, attrs)
}

/// Severity of a failure set for ranking. Higher sorts first.
///
/// An empty set ranks 0. Otherwise video failures rank 1, audio failures 2,
/// container failures 3 and anything else 4, checked in that order.
pub fn severity_rank(reasons: TranscodeReasons) -> u8 {
    if reasons.is_empty() {
        return 0;
    }
    let tiers = [
        TranscodeReasons::VIDEO,
        TranscodeReasons::AUDIO,
        TranscodeReasons::CONTAINER,
    ];
    tiers
        .iter()
        .position(|tier| reasons.intersects(*tier))
        .map_or(tiers.len() as u8 + 1, |i| i as u8 + 1)
}

/// Pick a single container name out of a multi-name source container.
///
/// Prefers the first name a direct-play rule of `media_type` accepts.
pub fn normalize_container(
    container: Option<&str>,
    profile: &DeviceProfile,
    media_type: ProfileMediaType,
    rule: Option<&DirectPlayProfile>,
) -> Option<String> {
    let names = container::split(container);
    let rules: Vec<&DirectPlayProfile> = match rule {
        Some(r) => vec![r],
        None => profile.direct_play_profiles.iter().collect(),
    };
    names
        .iter()
        .find(|name| {
            rules
                .iter()
                .any(|r| r.profile_type == media_type && r.supports_container(Some(name.as_str())))
        })
        .or_else(|| names.first())
        .cloned()
}

/// Evaluate an audio-only source.
pub fn evaluate_audio_direct_play<'p>(
    profile: &'p DeviceProfile,
    source: &MediaSource,
    audio: Option<&MediaStream>,
    eligibility: Eligibility,
) -> DirectPlayDecision<'p> {
    let container = source.container.as_deref();
    let codec = audio.and_then(|s| s.codec.as_deref());
    let rules = profile
        .direct_play_profiles
        .iter()
        .filter(|r| r.profile_type == ProfileMediaType::Audio);

    let Some(rule) = rules
        .clone()
        .find(|r| r.supports_container(container) && r.supports_audio_codec(codec))
    else {
        let mut reasons = TranscodeReasons::new();
        for r in rules {
            if !r.supports_container(container) {
                reasons.insert(TranscodeReason::ContainerNotSupported);
            }
            if !r.supports_audio_codec(codec) {
                reasons.insert(TranscodeReason::AudioCodecNotSupported);
            }
        }
        if reasons.is_empty() {
            reasons.insert(TranscodeReason::DirectPlayError);
        }
        debug!(
            "No audio direct play rule for container {:?} codec {:?}: {}",
            container, codec, reasons
        );
        return DirectPlayDecision::rejected(reasons);
    };

    let reasons = audio_codec_failures(profile, source, audio, container, CodecType::Audio);
    let play_method = if !reasons.is_empty() {
        None
    } else if eligibility.direct_play && source.supports_direct_play {
        Some(PlayMethod::DirectPlay)
    } else if eligibility.direct_stream && source.supports_direct_stream {
        Some(PlayMethod::DirectStream)
    } else {
        None
    };

    DirectPlayDecision {
        profile: Some(rule),
        play_method,
        audio_stream_index: audio.map(|s| s.index),
        reasons,
    }
}

struct RuleOutcome<'p> {
    order: usize,
    rank: u8,
    decision: DirectPlayDecision<'p>,
}

/// Evaluate a video source with its candidate audio tracks and subtitle.
pub fn evaluate_video_direct_play<'p>(
    profile: &'p DeviceProfile,
    source: &MediaSource,
    video: Option<&MediaStream>,
    candidate_audio: &[&MediaStream],
    subtitle: Option<&MediaStream>,
    eligibility: Eligibility,
    support: &dyn TranscoderSupport,
) -> DirectPlayDecision<'p> {
    let container = source.container.as_deref();
    let video_attrs = VideoAttributes::of(source, video);

    let container_reasons = container_profile_failures(profile, source, &video_attrs);
    let video_codec_reasons = video_codec_profile_failures(profile, source, video, container);
    let audio_track_reasons: Vec<TranscodeReasons> = candidate_audio
        .iter()
        .map(|s| {
            let mut reasons =
                audio_codec_failures(profile, source, Some(s), container, CodecType::VideoAudio);
            if s.is_external {
                reasons.insert(TranscodeReason::AudioIsExternal);
            }
            reasons
        })
        .collect();

    let mut subtitle_reasons = TranscodeReasons::new();
    if let Some(sub) = subtitle {
        let target = SubtitleTarget {
            play_method: PlayMethod::DirectPlay,
            container,
            protocol: MediaStreamProtocol::Http,
        };
        let delivery =
            subtitle::resolve_subtitle_delivery(source, sub, &profile.subtitle_profiles, target, support);
        if !matches!(
            delivery.method,
            SubtitleDeliveryMethod::Embed | SubtitleDeliveryMethod::External
        ) {
            subtitle_reasons.insert(TranscodeReason::SubtitleCodecNotSupported);
        }
    }

    let video_codec = video.and_then(|s| s.codec.as_deref());
    let mut outcomes: Vec<RuleOutcome<'p>> = profile
        .direct_play_profiles
        .iter()
        .filter(|r| r.profile_type == ProfileMediaType::Video)
        .enumerate()
        .map(|(order, rule)| {
            let mut rule_reasons = TranscodeReasons::new();
            if !rule.supports_container(container) {
                rule_reasons.insert(TranscodeReason::ContainerNotSupported);
            }
            if !rule.supports_video_codec(video_codec) {
                rule_reasons.insert(TranscodeReason::VideoCodecNotSupported);
            }

            let mut selected_audio = None;
            let mut audio_reasons = TranscodeReasons::new();
            if !candidate_audio.is_empty() {
                match candidate_audio
                    .iter()
                    .position(|s| rule.supports_audio_codec(s.codec.as_deref()))
                {
                    Some(i) => {
                        selected_audio = Some(candidate_audio[i].index);
                        audio_reasons = audio_track_reasons[i];
                    }
                    None => rule_reasons.insert(TranscodeReason::AudioCodecNotSupported),
                }
            }

            let mut reasons = rule_reasons | container_reasons | subtitle_reasons;
            if !reasons.contains(TranscodeReason::VideoCodecNotSupported) {
                reasons.extend(video_codec_reasons);
            }
            if !reasons.contains(TranscodeReason::AudioCodecNotSupported) {
                reasons.extend(audio_reasons);
            }

            let play_method = if reasons.is_empty()
                && eligibility.direct_play
                && source.supports_direct_play
            {
                Some(PlayMethod::DirectPlay)
            } else if reasons
                .without(TranscodeReasons::DIRECT_STREAM_TOLERATED)
                .is_empty()
                && eligibility.direct_stream
                && source.supports_direct_stream
            {
                Some(PlayMethod::DirectStream)
            } else {
                None
            };

            debug!(
                "Direct play rule {} ({:?}) for source {}: {:?} [{}]",
                order, rule.container, source.id, play_method, reasons
            );

            RuleOutcome {
                order,
                rank: severity_rank(reasons),
                decision: DirectPlayDecision {
                    profile: Some(rule),
                    play_method,
                    audio_stream_index: selected_audio,
                    reasons,
                },
            }
        })
        .collect();

    outcomes.sort_by(|a, b| {
        b.decision
            .play_method
            .cmp(&a.decision.play_method)
            .then(b.rank.cmp(&a.rank))
            .then(a.order.cmp(&b.order))
    });

    if let Some(first) = outcomes.first() {
        if first.decision.play_method.is_some() {
            return first.decision.clone();
        }
    }

    let container_supported = profile
        .direct_play_profiles
        .iter()
        .any(|r| r.profile_type == ProfileMediaType::Video && r.supports_container(container));
    let mut reasons = outcomes
        .iter()
        .find(|o| {
            !container_supported
                || !o.decision.reasons.contains(TranscodeReason::ContainerNotSupported)
        })
        .map(|o| o.decision.reasons)
        .unwrap_or_default();
    if reasons.is_empty() {
        reasons.insert(TranscodeReason::DirectPlayError);
    }
    DirectPlayDecision::rejected(reasons)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::MediaStreamType;
    use crate::profile::{
        ContainerProfile, ProfileCondition, ProfileConditionType, ProfileConditionValue,
        SubtitleProfile,
    };
    use crate::support::FullTranscoderSupport;

    const BOTH: Eligibility = Eligibility {
        direct_play: true,
        direct_stream: true,
    };

    fn rule(container: &str, video: &str, audio: &str) -> DirectPlayProfile {
        DirectPlayProfile {
            container: Some(container.to_string()),
            video_codec: Some(video.to_string()),
            audio_codec: Some(audio.to_string()),
            profile_type: ProfileMediaType::Video,
        }
    }

    fn stream(kind: MediaStreamType, index: i32, codec: &str) -> MediaStream {
        MediaStream {
            stream_type: kind,
            index,
            codec: Some(codec.to_string()),
            ..Default::default()
        }
    }

    fn source(container: &str) -> MediaSource {
        MediaSource {
            id: "src".to_string(),
            container: Some(container.to_string()),
            media_streams: vec![
                MediaStream {
                    width: Some(1920),
                    height: Some(1080),
                    level: Some(41.0),
                    ..stream(MediaStreamType::Video, 0, "h264")
                },
                MediaStream {
                    channels: Some(6),
                    ..stream(MediaStreamType::Audio, 1, "ac3")
                },
            ],
            ..Default::default()
        }
    }

    fn evaluate<'p>(profile: &'p DeviceProfile, source: &MediaSource) -> DirectPlayDecision<'p> {
        let video = source.video_stream();
        let audio: Vec<&MediaStream> = source.default_audio_stream(None).into_iter().collect();
        evaluate_video_direct_play(
            profile,
            source,
            video,
            &audio,
            None,
            BOTH,
            &FullTranscoderSupport,
        )
    }

    #[test]
    fn test_severity_rank_order() {
        let none = TranscodeReasons::new();
        let level: TranscodeReasons = TranscodeReason::VideoLevelNotSupported.into();
        let audio: TranscodeReasons = TranscodeReason::AudioChannelsNotSupported.into();
        let container: TranscodeReasons = TranscodeReason::ContainerNotSupported.into();
        let subtitle: TranscodeReasons = TranscodeReason::SubtitleCodecNotSupported.into();
        assert_eq!(severity_rank(none), 0);
        assert_eq!(severity_rank(level), 1);
        assert_eq!(severity_rank(audio), 2);
        assert_eq!(severity_rank(container), 3);
        assert_eq!(severity_rank(subtitle), 4);
        assert_eq!(severity_rank(level | container), 1);
    }

    #[test]
    fn test_direct_play_exact_match() {
        let profile = DeviceProfile {
            direct_play_profiles: vec![rule("mkv", "h264", "ac3,aac")],
            ..Default::default()
        };
        let decision = evaluate(&profile, &source("mkv"));
        assert_eq!(decision.play_method, Some(PlayMethod::DirectPlay));
        assert!(decision.reasons.is_empty());
        assert_eq!(decision.audio_stream_index, Some(1));
    }

    #[test]
    fn test_direct_stream_tolerates_container_and_audio() {
        let profile = DeviceProfile {
            direct_play_profiles: vec![rule("mp4", "h264", "aac")],
            ..Default::default()
        };
        let decision = evaluate(&profile, &source("mkv"));
        assert_eq!(decision.play_method, Some(PlayMethod::DirectStream));
        assert!(decision.reasons.contains(TranscodeReason::ContainerNotSupported));
        assert!(decision.reasons.contains(TranscodeReason::AudioCodecNotSupported));
    }

    #[test]
    fn test_video_failure_blocks_everything() {
        let profile = DeviceProfile {
            direct_play_profiles: vec![rule("mkv", "hevc", "ac3")],
            ..Default::default()
        };
        let decision = evaluate(&profile, &source("mkv"));
        assert_eq!(decision.play_method, None);
        assert_eq!(
            decision.reasons,
            TranscodeReason::VideoCodecNotSupported.into()
        );
    }

    #[test]
    fn test_codec_profile_failure_folded_when_codec_matches() {
        let profile = DeviceProfile {
            direct_play_profiles: vec![rule("mkv", "h264", "ac3")],
            codec_profiles: vec![CodecProfile {
                codec_type: CodecType::Video,
                codec: Some("h264".to_string()),
                conditions: vec![ProfileCondition::new(
                    ProfileConditionType::LessThanEqual,
                    ProfileConditionValue::VideoLevel,
                    "40",
                    false,
                )],
                ..Default::default()
            }],
            ..Default::default()
        };
        let decision = evaluate(&profile, &source("mkv"));
        assert_eq!(decision.play_method, None);
        assert!(decision.reasons.contains(TranscodeReason::VideoLevelNotSupported));
    }

    #[test]
    fn test_every_applicable_codec_profile_is_checked() {
        let width_limit = |max: &str| CodecProfile {
            codec_type: CodecType::Video,
            codec: Some("h264".to_string()),
            conditions: vec![ProfileCondition::new(
                ProfileConditionType::LessThanEqual,
                ProfileConditionValue::Width,
                max,
                false,
            )],
            ..Default::default()
        };
        let profile = DeviceProfile {
            direct_play_profiles: vec![rule("mkv", "h264", "ac3")],
            codec_profiles: vec![width_limit("3840"), width_limit("640")],
            ..Default::default()
        };
        let src = source("mkv");
        assert_eq!(
            video_codec_profile_failures(&profile, &src, src.video_stream(), Some("mkv")),
            TranscodeReason::VideoResolutionNotSupported.into()
        );

        let decision = evaluate(&profile, &src);
        assert_eq!(decision.play_method, None);
        assert!(decision
            .reasons
            .contains(TranscodeReason::VideoResolutionNotSupported));
    }

    #[test]
    fn test_apply_conditions_gate_codec_profile() {
        let profile = DeviceProfile {
            direct_play_profiles: vec![rule("mkv", "h264", "ac3")],
            codec_profiles: vec![CodecProfile {
                codec_type: CodecType::Video,
                codec: Some("h264".to_string()),
                apply_conditions: vec![ProfileCondition::new(
                    ProfileConditionType::GreaterThanEqual,
                    ProfileConditionValue::Width,
                    "3840",
                    false,
                )],
                conditions: vec![ProfileCondition::new(
                    ProfileConditionType::LessThanEqual,
                    ProfileConditionValue::VideoLevel,
                    "40",
                    false,
                )],
                ..Default::default()
            }],
            ..Default::default()
        };
        let decision = evaluate(&profile, &source("mkv"));
        assert_eq!(decision.play_method, Some(PlayMethod::DirectPlay));
    }

    #[test]
    fn test_reasons_prefer_matching_container() {
        let profile = DeviceProfile {
            direct_play_profiles: vec![
                rule("mp4", "h264", "ac3"),
                rule("mkv", "hevc", "ac3"),
            ],
            ..Default::default()
        };
        let eligibility = Eligibility {
            direct_play: true,
            direct_stream: false,
        };
        let src = source("mkv");
        let audio: Vec<&MediaStream> = src.default_audio_stream(None).into_iter().collect();
        let decision = evaluate_video_direct_play(
            &profile,
            &src,
            src.video_stream(),
            &audio,
            None,
            eligibility,
            &FullTranscoderSupport,
        );
        assert_eq!(decision.play_method, None);
        assert_eq!(
            decision.reasons,
            TranscodeReason::VideoCodecNotSupported.into()
        );
    }

    #[test]
    fn test_no_rules_reports_direct_play_error() {
        let profile = DeviceProfile::default();
        let decision = evaluate(&profile, &source("mkv"));
        assert_eq!(decision.reasons, TranscodeReason::DirectPlayError.into());
    }

    #[test]
    fn test_container_profile_conditions() {
        let profile = DeviceProfile {
            direct_play_profiles: vec![rule("mkv", "h264", "ac3")],
            container_profiles: vec![ContainerProfile {
                profile_type: ProfileMediaType::Video,
                container: Some("mkv".to_string()),
                conditions: vec![ProfileCondition::new(
                    ProfileConditionType::LessThanEqual,
                    ProfileConditionValue::Height,
                    "720",
                    false,
                )],
            }],
            ..Default::default()
        };
        let decision = evaluate(&profile, &source("mkv"));
        assert_eq!(decision.play_method, None);
        assert!(decision
            .reasons
            .contains(TranscodeReason::VideoResolutionNotSupported));
    }

    #[test]
    fn test_subtitle_burn_in_blocks_direct_play() {
        let profile = DeviceProfile {
            direct_play_profiles: vec![rule("mkv", "h264", "ac3")],
            subtitle_profiles: vec![SubtitleProfile::new("vtt", SubtitleDeliveryMethod::Hls)],
            ..Default::default()
        };
        let src = source("mkv");
        let sub = stream(MediaStreamType::Subtitle, 2, "pgssub");
        let audio: Vec<&MediaStream> = src.default_audio_stream(None).into_iter().collect();
        let decision = evaluate_video_direct_play(
            &profile,
            &src,
            src.video_stream(),
            &audio,
            Some(&sub),
            BOTH,
            &FullTranscoderSupport,
        );
        assert_eq!(decision.play_method, None);
        assert!(decision
            .reasons
            .contains(TranscodeReason::SubtitleCodecNotSupported));
    }

    #[test]
    fn test_audio_direct_play() {
        let profile = DeviceProfile {
            direct_play_profiles: vec![DirectPlayProfile {
                container: Some("flac".to_string()),
                audio_codec: Some("flac".to_string()),
                profile_type: ProfileMediaType::Audio,
                ..Default::default()
            }],
            ..Default::default()
        };
        let src = MediaSource {
            container: Some("flac".to_string()),
            media_streams: vec![stream(MediaStreamType::Audio, 0, "flac")],
            ..Default::default()
        };
        let decision =
            evaluate_audio_direct_play(&profile, &src, src.default_audio_stream(None), BOTH);
        assert_eq!(decision.play_method, Some(PlayMethod::DirectPlay));

        let stream_only = Eligibility {
            direct_play: false,
            direct_stream: true,
        };
        let decision =
            evaluate_audio_direct_play(&profile, &src, src.default_audio_stream(None), stream_only);
        assert_eq!(decision.play_method, Some(PlayMethod::DirectStream));
    }

    #[test]
    fn test_audio_no_rule_unions_reasons() {
        let profile = DeviceProfile {
            direct_play_profiles: vec![
                DirectPlayProfile {
                    container: Some("mp3".to_string()),
                    audio_codec: Some("mp3".to_string()),
                    profile_type: ProfileMediaType::Audio,
                    ..Default::default()
                },
                DirectPlayProfile {
                    container: Some("flac".to_string()),
                    audio_codec: Some("mp3".to_string()),
                    profile_type: ProfileMediaType::Audio,
                    ..Default::default()
                },
            ],
            ..Default::default()
        };
        let src = MediaSource {
            container: Some("flac".to_string()),
            media_streams: vec![stream(MediaStreamType::Audio, 0, "flac")],
            ..Default::default()
        };
        let decision =
            evaluate_audio_direct_play(&profile, &src, src.default_audio_stream(None), BOTH);
        assert_eq!(decision.play_method, None);
        assert!(decision.reasons.contains(TranscodeReason::ContainerNotSupported));
        assert!(decision.reasons.contains(TranscodeReason::AudioCodecNotSupported));
    }

    #[test]
    fn test_audio_codec_profile_vetoes() {
        let profile = DeviceProfile {
            direct_play_profiles: vec![DirectPlayProfile {
                container: Some("flac".to_string()),
                profile_type: ProfileMediaType::Audio,
                ..Default::default()
            }],
            codec_profiles: vec![CodecProfile {
                codec_type: CodecType::Audio,
                conditions: vec![ProfileCondition::new(
                    ProfileConditionType::LessThanEqual,
                    ProfileConditionValue::AudioSampleRate,
                    "48000",
                    false,
                )],
                ..Default::default()
            }],
            ..Default::default()
        };
        let src = MediaSource {
            container: Some("flac".to_string()),
            media_streams: vec![MediaStream {
                sample_rate: Some(96_000),
                ..stream(MediaStreamType::Audio, 0, "flac")
            }],
            ..Default::default()
        };
        let decision =
            evaluate_audio_direct_play(&profile, &src, src.default_audio_stream(None), BOTH);
        assert_eq!(decision.play_method, None);
        assert!(decision
            .reasons
            .contains(TranscodeReason::AudioSampleRateNotSupported));
    }

    #[test]
    fn test_normalize_container() {
        let profile = DeviceProfile {
            direct_play_profiles: vec![rule("mp4", "h264", "aac")],
            ..Default::default()
        };
        assert_eq!(
            normalize_container(Some("mov,mp4,m4a"), &profile, ProfileMediaType::Video, None),
            Some("mp4".to_string())
        );
        assert_eq!(
            normalize_container(Some("mov,m4a"), &profile, ProfileMediaType::Video, None),
            Some("mov".to_string())
        );
        assert_eq!(
            normalize_container(None, &profile, ProfileMediaType::Video, None),
            None
        );
    }
}
