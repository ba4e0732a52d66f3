//! Constraint application
//!
//! Turns profile conditions into concrete bounds on a [`StreamPlan`].
//! Each condition becomes at most one [`ConstraintUpdate`]. Bounds only ever
//! tighten: `LessThanEqual` keeps the smaller value, `GreaterThanEqual` the
//! larger one, `Equals` sets it outright.

use std::cmp::Ordering;

use tracing::warn;

use crate::condition::parse_flag;
use crate::container;
use crate::plan::StreamPlan;
use crate::profile::{ProfileCondition, ProfileConditionType, ProfileConditionValue};

/// Which conditions may apply in one pass.
///
/// Conditions on per-codec attributes are written under `qualifier`; a pass
/// without a qualifier writes the shared unqualified values.
#[derive(Debug, Clone, Copy)]
pub struct ConditionScope<'a> {
    pub qualifier: Option<&'a str>,
    pub enable_qualified: bool,
    pub enable_non_qualified: bool,
}

impl ConditionScope<'static> {
    /// Apply everything, unqualified.
    pub const ALL: Self = ConditionScope {
        qualifier: None,
        enable_qualified: true,
        enable_non_qualified: true,
    };
}

impl<'a> ConditionScope<'a> {
    /// Apply everything, scoped to `codec`.
    pub fn codec(codec: &'a str) -> Self {
        ConditionScope {
            qualifier: Some(codec),
            enable_qualified: true,
            enable_non_qualified: true,
        }
    }

    fn allows_qualifiable(&self) -> bool {
        match self.qualifier.filter(|q| !q.is_empty()) {
            Some(_) => self.enable_qualified,
            None => self.enable_non_qualified,
        }
    }
}

/// A single change to a plan.
#[derive(Debug, Clone, PartialEq)]
pub enum ConstraintUpdate {
    AudioBitrate(u64),
    AudioSampleRate(u32),
    MaxWidth(u32),
    MaxHeight(u32),
    VideoBitrate(u64),
    MaxFramerate(f64),
    MaxRefFrames(u32),
    RequireAvc,
    RequireNonAnamorphic,
    /// A per-codec option, written under the scope's qualifier.
    CodecOption { name: &'static str, value: String },
}

/// Combine `new` with `current` the way `op` narrows bounds.
///
/// Returns `None` for operators that cannot express a bound.
pub fn narrow<T: PartialOrd + Copy>(op: ProfileConditionType, new: T, current: Option<T>) -> Option<T> {
    let current = current.unwrap_or(new);
    match op {
        ProfileConditionType::Equals => Some(new),
        ProfileConditionType::LessThanEqual => Some(match new.partial_cmp(&current) {
            Some(Ordering::Greater) => current,
            _ => new,
        }),
        ProfileConditionType::GreaterThanEqual => Some(match new.partial_cmp(&current) {
            Some(Ordering::Less) => current,
            _ => new,
        }),
        ProfileConditionType::NotEquals | ProfileConditionType::EqualsAny => None,
    }
}

fn parse<T: std::str::FromStr>(condition: &ProfileCondition) -> Option<T> {
    let parsed = condition.value.trim().parse().ok();
    if parsed.is_none() {
        warn!(
            "Ignoring {:?} condition with unparseable value {:?}",
            condition.property, condition.value
        );
    }
    parsed
}

/// The update `condition` makes to `plan`, if any.
pub fn constraint_update(
    condition: &ProfileCondition,
    scope: ConditionScope<'_>,
    plan: &StreamPlan,
) -> Option<ConstraintUpdate> {
    use ProfileConditionValue::*;

    if condition.value.trim().is_empty() {
        return None;
    }
    let op = condition.condition;
    let qualifier = scope.qualifier;

    match condition.property {
        AudioBitrate if scope.enable_non_qualified => {
            narrow(op, parse(condition)?, plan.audio_bitrate).map(ConstraintUpdate::AudioBitrate)
        }
        AudioSampleRate if scope.enable_non_qualified => {
            narrow(op, parse(condition)?, plan.audio_sample_rate)
                .map(ConstraintUpdate::AudioSampleRate)
        }
        Width if scope.enable_non_qualified => {
            narrow(op, parse(condition)?, plan.max_width).map(ConstraintUpdate::MaxWidth)
        }
        Height if scope.enable_non_qualified => {
            narrow(op, parse(condition)?, plan.max_height).map(ConstraintUpdate::MaxHeight)
        }
        VideoBitrate if scope.enable_non_qualified => {
            narrow(op, parse(condition)?, plan.video_bitrate).map(ConstraintUpdate::VideoBitrate)
        }
        VideoFramerate if scope.enable_non_qualified => {
            narrow(op, parse(condition)?, plan.max_framerate).map(ConstraintUpdate::MaxFramerate)
        }
        IsAvc if scope.enable_non_qualified => {
            let value = parse_flag(&condition.value)?;
            let required = (value && op == ProfileConditionType::Equals)
                || (!value && op == ProfileConditionType::NotEquals);
            required.then_some(ConstraintUpdate::RequireAvc)
        }
        IsAnamorphic if scope.enable_non_qualified => {
            let value = parse_flag(&condition.value)?;
            let required = (!value && op == ProfileConditionType::Equals)
                || (value && op == ProfileConditionType::NotEquals);
            required.then_some(ConstraintUpdate::RequireNonAnamorphic)
        }

        AudioChannels if scope.allows_qualifiable() => {
            narrow(op, parse(condition)?, plan.target_audio_channels(qualifier))
                .map(|v: u32| option("audiochannels", v.to_string()))
        }
        IsInterlaced if scope.allows_qualifiable() => {
            let value = parse_flag(&condition.value)?;
            let deinterlace = (!value && op == ProfileConditionType::Equals)
                || (value && op == ProfileConditionType::NotEquals);
            deinterlace.then(|| option("deinterlace", "true".to_string()))
        }
        VideoBitDepth if scope.allows_qualifiable() => {
            narrow(op, parse(condition)?, plan.target_video_bit_depth(qualifier))
                .map(|v: u32| option("videobitdepth", v.to_string()))
        }
        AudioBitDepth if scope.allows_qualifiable() => {
            narrow(op, parse(condition)?, plan.target_audio_bit_depth(qualifier))
                .map(|v: u32| option("audiobitdepth", v.to_string()))
        }
        VideoLevel if scope.allows_qualifiable() => {
            narrow(op, parse(condition)?, plan.target_video_level(qualifier))
                .map(|v: f64| option("level", v.to_string()))
        }
        RefFrames if scope.allows_qualifiable() => {
            narrow(op, parse(condition)?, plan.max_ref_frames).map(ConstraintUpdate::MaxRefFrames)
        }
        VideoProfile if scope.allows_qualifiable() => list_update(condition, plan, qualifier, "profile"),
        VideoRangeType if scope.allows_qualifiable() => {
            list_update(condition, plan, qualifier, "rangetype")
        }
        VideoCodecTag if scope.allows_qualifiable() => {
            list_update(condition, plan, qualifier, "codectag")
        }

        _ => None,
    }
}

fn option(name: &'static str, value: String) -> ConstraintUpdate {
    ConstraintUpdate::CodecOption { name, value }
}

fn list_update(
    condition: &ProfileCondition,
    plan: &StreamPlan,
    qualifier: Option<&str>,
    name: &'static str,
) -> Option<ConstraintUpdate> {
    let values = container::split_pipe(&condition.value);
    let joined = values.join(",");
    match condition.condition {
        ProfileConditionType::Equals => Some(option(name, joined)),
        ProfileConditionType::EqualsAny => {
            let current = plan
                .option(qualifier, name)
                .filter(|c| values.iter().any(|v| v.eq_ignore_ascii_case(c)));
            Some(option(name, current.map_or(joined, str::to_string)))
        }
        _ => None,
    }
}

/// Write `update` into `plan`.
pub fn apply_update(plan: &mut StreamPlan, update: ConstraintUpdate, qualifier: Option<&str>) {
    match update {
        ConstraintUpdate::AudioBitrate(v) => plan.audio_bitrate = Some(v),
        ConstraintUpdate::AudioSampleRate(v) => plan.audio_sample_rate = Some(v),
        ConstraintUpdate::MaxWidth(v) => plan.max_width = Some(v),
        ConstraintUpdate::MaxHeight(v) => plan.max_height = Some(v),
        ConstraintUpdate::VideoBitrate(v) => plan.video_bitrate = Some(v),
        ConstraintUpdate::MaxFramerate(v) => plan.max_framerate = Some(v),
        ConstraintUpdate::MaxRefFrames(v) => plan.max_ref_frames = Some(v),
        ConstraintUpdate::RequireAvc => plan.require_avc = true,
        ConstraintUpdate::RequireNonAnamorphic => plan.require_non_anamorphic = true,
        ConstraintUpdate::CodecOption { name, value } => plan.set_option(qualifier, name, value),
    }
}

/// Apply every condition in order and hand the plan back.
pub fn apply_conditions(
    mut plan: StreamPlan,
    conditions: &[ProfileCondition],
    scope: ConditionScope<'_>,
) -> StreamPlan {
    for condition in conditions {
        if let Some(update) = constraint_update(condition, scope, &plan) {
            apply_update(&mut plan, update, scope.qualifier);
        }
    }
    plan
}

#[cfg(test)]
mod tests {
    use super::*;
    use ProfileConditionType::*;
    use ProfileConditionValue::*;

    fn cond(op: ProfileConditionType, prop: ProfileConditionValue, value: &str) -> ProfileCondition {
        ProfileCondition::new(op, prop, value, false)
    }

    #[test]
    fn test_narrow() {
        assert_eq!(narrow(Equals, 5, Some(3)), Some(5));
        assert_eq!(narrow(LessThanEqual, 5, Some(3)), Some(3));
        assert_eq!(narrow(LessThanEqual, 2, Some(3)), Some(2));
        assert_eq!(narrow(LessThanEqual, 2, None), Some(2));
        assert_eq!(narrow(GreaterThanEqual, 2, Some(3)), Some(3));
        assert_eq!(narrow(GreaterThanEqual, 4, Some(3)), Some(4));
        assert_eq!(narrow(NotEquals, 4, Some(3)), None);
    }

    #[test]
    fn test_less_than_equal_never_increases() {
        for first in [480u32, 720, 1080, 2160] {
            for second in [480u32, 720, 1080, 2160] {
                let plan = apply_conditions(
                    StreamPlan::default(),
                    &[cond(LessThanEqual, Height, &first.to_string())],
                    ConditionScope::ALL,
                );
                let bound = plan.max_height;
                let plan = apply_conditions(
                    plan,
                    &[cond(LessThanEqual, Height, &second.to_string())],
                    ConditionScope::ALL,
                );
                assert!(plan.max_height <= bound);
            }
        }
    }

    #[test]
    fn test_greater_than_equal_never_decreases() {
        for first in [1u32, 2, 6, 8] {
            for second in [1u32, 2, 6, 8] {
                let plan = apply_conditions(
                    StreamPlan::default(),
                    &[cond(GreaterThanEqual, AudioSampleRate, &first.to_string())],
                    ConditionScope::ALL,
                );
                let bound = plan.audio_sample_rate;
                let plan = apply_conditions(
                    plan,
                    &[cond(GreaterThanEqual, AudioSampleRate, &second.to_string())],
                    ConditionScope::ALL,
                );
                assert!(plan.audio_sample_rate >= bound);
            }
        }
    }

    #[test]
    fn test_empty_and_unparseable_literals_are_skipped() {
        let mut plan = StreamPlan::default();
        plan.max_width = Some(1920);
        let plan = apply_conditions(
            plan,
            &[cond(Equals, Width, ""), cond(LessThanEqual, Width, "wide")],
            ConditionScope::ALL,
        );
        assert_eq!(plan.max_width, Some(1920));
    }

    #[test]
    fn test_qualified_level() {
        let mut plan = StreamPlan::default();
        plan.set_option(Some("h264"), "level", "51");
        let plan = apply_conditions(
            plan,
            &[cond(LessThanEqual, VideoLevel, "41")],
            ConditionScope::codec("h264"),
        );
        assert_eq!(plan.option(Some("h264"), "level"), Some("41"));
        assert_eq!(plan.option(None, "level"), None);
    }

    #[test]
    fn test_codec_option_update() {
        let update = constraint_update(
            &cond(LessThanEqual, VideoBitDepth, "10"),
            ConditionScope::codec("hevc"),
            &StreamPlan::default(),
        );
        assert_eq!(
            update,
            Some(ConstraintUpdate::CodecOption {
                name: "videobitdepth",
                value: "10".to_string(),
            })
        );
        assert_eq!(
            constraint_update(&cond(LessThanEqual, Width, "1280"), ConditionScope::ALL, &StreamPlan::default()),
            Some(ConstraintUpdate::MaxWidth(1280))
        );
    }

    #[test]
    fn test_scope_gates() {
        let scope = ConditionScope {
            qualifier: Some("aac"),
            enable_qualified: false,
            enable_non_qualified: false,
        };
        let plan = apply_conditions(
            StreamPlan::default(),
            &[
                cond(LessThanEqual, AudioChannels, "2"),
                cond(LessThanEqual, AudioBitrate, "128000"),
            ],
            scope,
        );
        assert_eq!(plan.option(Some("aac"), "audiochannels"), None);
        assert_eq!(plan.audio_bitrate, None);

        let scope = ConditionScope {
            qualifier: Some("aac"),
            enable_qualified: true,
            enable_non_qualified: false,
        };
        let plan = apply_conditions(
            plan,
            &[
                cond(LessThanEqual, AudioChannels, "2"),
                cond(LessThanEqual, AudioBitrate, "128000"),
            ],
            scope,
        );
        assert_eq!(plan.option(Some("aac"), "audiochannels"), Some("2"));
        assert_eq!(plan.audio_bitrate, None);
    }

    #[test]
    fn test_profile_lists() {
        let mut plan = StreamPlan::default();
        plan.set_option(Some("h264"), "profile", "main");
        let plan = apply_conditions(
            plan,
            &[cond(EqualsAny, VideoProfile, "high|main|baseline")],
            ConditionScope::codec("h264"),
        );
        assert_eq!(plan.option(Some("h264"), "profile"), Some("main"));

        let plan = apply_conditions(
            plan,
            &[cond(EqualsAny, VideoProfile, "high|constrained baseline")],
            ConditionScope::codec("h264"),
        );
        assert_eq!(
            plan.option(Some("h264"), "profile"),
            Some("high,constrained baseline")
        );

        let plan = apply_conditions(
            plan,
            &[cond(Equals, VideoRangeType, "SDR|HDR10")],
            ConditionScope::codec("hevc"),
        );
        assert_eq!(plan.option(Some("hevc"), "rangetype"), Some("SDR,HDR10"));
    }

    #[test]
    fn test_interlace_and_flags() {
        let plan = apply_conditions(
            StreamPlan::default(),
            &[
                cond(Equals, IsInterlaced, "false"),
                cond(Equals, IsAvc, "true"),
                cond(NotEquals, IsAnamorphic, "true"),
            ],
            ConditionScope::codec("h264"),
        );
        assert!(plan.requires_deinterlace(Some("h264")));
        assert!(plan.require_avc);
        assert!(plan.require_non_anamorphic);
    }

    #[test]
    fn test_unsupported_attributes_leave_plan_alone() {
        let plan = apply_conditions(
            StreamPlan::default(),
            &[
                cond(LessThanEqual, NumAudioStreams, "1"),
                cond(Equals, AudioProfile, "lc"),
                cond(Equals, PacketLength, "188"),
            ],
            ConditionScope::ALL,
        );
        assert_eq!(plan, StreamPlan::default());
    }
}
