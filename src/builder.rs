//! Stream plan builder
//!
//! [`StreamBuilder`] runs the negotiation for every candidate media source of
//! a request and returns the best plan:
//!
//! 1. direct play / direct stream evaluation against the direct-play rules
//! 2. transcoding profile selection when neither is possible
//! 3. subtitle delivery for the selected track
//! 4. constraint and bitrate application on the chosen output
//!
//! Each source gets its own [`StreamPlan`], threaded by value through the
//! stages. The candidates are ranked once all of them are built.

use std::sync::Arc;

use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::bitrate;
use crate::condition::{self, AudioAttributes, VideoAttributes};
use crate::constraints::{self, ConditionScope};
use crate::container;
use crate::direct_play::{self, Eligibility};
use crate::error::Result;
use crate::hls;
use crate::media::{MediaSource, MediaStream, MediaStreamType};
use crate::plan::{PlayMethod, StreamPlan};
use crate::profile::{
    CodecProfile, CodecType, DeviceProfile, MediaStreamProtocol, ProfileCondition,
    ProfileMediaType, TranscodingProfile,
};
use crate::ranking;
use crate::reason::{TranscodeReason, TranscodeReasons};
use crate::request::MediaOptions;
use crate::subtitle::{self, SubtitleTarget};
use crate::support::TranscoderSupport;
use crate::transcode;

/// Lowest video bitrate handed to a transcoder.
const MIN_VIDEO_BITRATE: u64 = 64_000;

/// Everything a video build reads.
struct VideoInputs<'a> {
    profile: &'a DeviceProfile,
    options: &'a MediaOptions,
    source: &'a MediaSource,
    video: Option<&'a MediaStream>,
    audio: Option<&'a MediaStream>,
    candidate_audio: Vec<&'a MediaStream>,
    max_bitrate: Option<u64>,
}

/// The output a stream item is assembled for.
#[derive(Debug, Clone, Copy)]
struct OutputTarget<'a> {
    container: Option<&'a str>,
    video_codec: Option<&'a str>,
    audio_codec: Option<&'a str>,
}

/// Negotiates stream plans.
#[derive(Clone)]
pub struct StreamBuilder {
    support: Arc<dyn TranscoderSupport>,
}

impl StreamBuilder {
    pub fn new(support: Arc<dyn TranscoderSupport>) -> Self {
        Self { support }
    }

    pub fn support(&self) -> &dyn TranscoderSupport {
        self.support.as_ref()
    }

    /// Best plan for a video item across its sources.
    ///
    /// Fails only when the request itself is malformed. `Ok(None)` means no
    /// source produced a plan.
    pub fn optimal_video_plan(&self, options: &MediaOptions) -> Result<Option<StreamPlan>> {
        let (profile, sources) = options.validate(true)?;
        let plans: Vec<StreamPlan> = candidate_sources(options, sources)
            .map(|source| self.build_video_plan(profile, source, options))
            .collect();
        Ok(finish(plans, options, options.max_bitrate(false)))
    }

    /// Best plan for an audio item across its sources.
    pub fn optimal_audio_plan(&self, options: &MediaOptions) -> Result<Option<StreamPlan>> {
        let (profile, sources) = options.validate(false)?;
        let plans: Vec<StreamPlan> = candidate_sources(options, sources)
            .filter_map(|source| self.build_audio_plan(profile, source, options))
            .collect();
        Ok(finish(plans, options, options.max_bitrate(true)))
    }

    /// Build the plan for one video source.
    ///
    /// Always yields a plan; one without a play method carries the reasons.
    pub fn build_video_plan(
        &self,
        profile: &DeviceProfile,
        source: &MediaSource,
        options: &MediaOptions,
    ) -> StreamPlan {
        let mut plan = base_plan(source, options, ProfileMediaType::Video);

        plan.subtitle_stream_index = options
            .subtitle_stream_index
            .or(source.default_subtitle_stream_index);
        let subtitle = plan
            .subtitle_stream_index
            .filter(|i| *i >= 0)
            .and_then(|i| source.media_stream(MediaStreamType::Subtitle, i));

        let audio = source.default_audio_stream(
            options
                .audio_stream_index
                .or(source.default_audio_stream_index),
        );
        plan.audio_stream_index = audio.map(|s| s.index);

        let max_bitrate = options.max_bitrate(false);
        let inputs = VideoInputs {
            profile,
            options,
            source,
            video: source.video_stream(),
            audio,
            candidate_audio: candidate_audio_streams(source, audio, options.audio_stream_index.is_some()),
            max_bitrate,
        };

        let eligibility = eligibility(source, options, max_bitrate, &mut plan.transcode_reasons);

        if eligibility.any() {
            let decision = direct_play::evaluate_video_direct_play(
                profile,
                source,
                inputs.video,
                &inputs.candidate_audio,
                subtitle,
                eligibility,
                self.support(),
            );
            plan.transcode_reasons.extend(decision.reasons);

            if let Some(method) = decision.play_method {
                plan.play_method = Some(method);
                plan.sub_protocol = MediaStreamProtocol::Http;
                plan.video_codecs = inputs
                    .video
                    .and_then(|v| v.codec.clone())
                    .into_iter()
                    .collect();

                let normalized = direct_play::normalize_container(
                    source.container.as_deref(),
                    profile,
                    ProfileMediaType::Video,
                    decision.profile,
                );

                if method == PlayMethod::DirectPlay {
                    plan.container = normalized;
                    if let Some(index) = decision.audio_stream_index.or(plan.audio_stream_index) {
                        plan.audio_stream_index = Some(index);
                        plan.audio_codecs = source
                            .media_stream(MediaStreamType::Audio, index)
                            .and_then(|s| s.codec.clone())
                            .into_iter()
                            .collect();
                    }
                } else {
                    let rule = decision.profile;
                    plan.container = direct_stream_container(normalized, rule.and_then(|r| r.container.as_deref()));
                    let rule_container = rule.and_then(|r| r.container.as_deref());
                    let target = OutputTarget {
                        container: rule_container,
                        video_codec: rule.and_then(|r| r.video_codec.as_deref()),
                        audio_codec: rule.and_then(|r| r.audio_codec.as_deref()),
                    };
                    plan = self.build_stream_video_item(plan, &inputs, target);
                }

                if let Some(sub) = subtitle {
                    let target = SubtitleTarget {
                        play_method: method,
                        container: plan.container.as_deref(),
                        protocol: MediaStreamProtocol::Http,
                    };
                    let delivery = subtitle::resolve_subtitle_delivery(
                        source,
                        sub,
                        &profile.subtitle_profiles,
                        target,
                        self.support(),
                    );
                    plan.subtitle_delivery_method = Some(delivery.method);
                    plan.subtitle_format = Some(delivery.format);
                }
            }
        }

        if !plan.is_direct() && options.enable_transcoding {
            if let Some(selection) =
                transcode::select_video_transcoding_profile(profile, source, options, inputs.video)
            {
                let tp = selection.profile;
                plan = apply_transcoding_profile(plan, tp);
                plan.video_stream_copy_viable = selection.stream_copy_viable;
                let target = OutputTarget {
                    container: Some(tp.container.as_str()),
                    video_codec: tp.video_codec.as_deref(),
                    audio_codec: tp.audio_codec.as_deref(),
                };
                plan = self.build_stream_video_item(plan, &inputs, target);
                plan.play_method = Some(PlayMethod::Transcode);

                if let Some(sub) = subtitle {
                    let target = SubtitleTarget {
                        play_method: PlayMethod::Transcode,
                        container: Some(tp.container.as_str()),
                        protocol: tp.protocol,
                    };
                    let delivery = subtitle::resolve_subtitle_delivery(
                        source,
                        sub,
                        &profile.subtitle_profiles,
                        target,
                        self.support(),
                    );
                    plan.subtitle_delivery_method = Some(delivery.method);
                    plan.subtitle_codecs = vec![delivery.format.clone()];
                    plan.subtitle_format = Some(delivery.format);
                }

                let restricting = TranscodeReasons::VIDEO
                    | TranscodeReasons::from(TranscodeReason::ContainerBitrateExceedsLimit);
                if plan.transcode_reasons.intersects(restricting) {
                    plan = constraints::apply_conditions(plan, &tp.conditions, ConditionScope::ALL);
                }
            } else {
                debug!("No transcoding profile for source {}", source.id);
            }
        }

        mark_undeliverable(&mut plan);
        debug!(
            "Video plan for source {}: {:?} [{}]",
            source.id, plan.play_method, plan.transcode_reasons
        );
        plan
    }

    /// Shape the video and audio output of a direct stream or transcode.
    fn build_stream_video_item(
        &self,
        mut plan: StreamPlan,
        inputs: &VideoInputs<'_>,
        target: OutputTarget<'_>,
    ) -> StreamPlan {
        let VideoInputs {
            profile,
            options,
            source,
            video,
            ..
        } = *inputs;
        let container = target.container;
        let is_hls = plan.sub_protocol == MediaStreamProtocol::Hls;

        let mut video_codecs = container::split(target.video_codec);
        if video_codecs.is_empty() {
            video_codecs.extend(video.and_then(|v| v.codec.clone()));
        }
        if is_hls {
            video_codecs = hls::filter_video_codecs(video_codecs);
        }
        plan.video_codecs = video_codecs;

        // Start from the source stream and let codec profiles narrow it.
        plan.max_framerate = video.and_then(|v| v.reference_frame_rate);
        if let Some(v) = video {
            let qualifier = v.codec.as_deref();
            if let Some(level) = v.level {
                plan.set_option(qualifier, "level", level.to_string());
            }
            if let Some(depth) = v.bit_depth {
                plan.set_option(qualifier, "videobitdepth", depth.to_string());
            }
            if let Some(p) = v.profile.as_deref().filter(|p| !p.is_empty()) {
                plan.set_option(qualifier, "profile", p.to_ascii_lowercase());
            }
            if let Some(range) = v.video_range_type.as_deref().filter(|r| !r.is_empty()) {
                plan.set_option(qualifier, "rangetype", range);
            }
        }

        let mut audio_codecs = container::split(target.audio_codec);
        if audio_codecs.is_empty() {
            audio_codecs.extend(inputs.audio.and_then(|a| a.codec.clone()));
        }
        if is_hls {
            audio_codecs = hls::filter_audio_codecs(plan.container.as_deref(), audio_codecs);
        }

        let copy_candidate = inputs.candidate_audio.iter().copied().find(|s| {
            s.codec
                .as_deref()
                .is_some_and(|c| container::list_contains(&audio_codecs, c))
        });
        let channels_exceed = copy_candidate.is_some_and(|s| {
            matches!(
                (s.channels, plan.transcoding_max_audio_channels),
                (Some(channels), Some(max)) if channels > max
            )
        });
        let copy_failures = copy_candidate
            .map(|s| {
                direct_play::audio_codec_failures(profile, source, Some(s), container, CodecType::VideoAudio)
            })
            .unwrap_or_default();
        let copy_audio = copy_candidate.filter(|_| {
            options.allow_audio_stream_copy
                && !channels_exceed
                && copy_failures.is_empty()
                && !plan
                    .transcode_reasons
                    .contains(TranscodeReason::ContainerBitrateExceedsLimit)
        });

        if channels_exceed {
            plan.transcode_reasons
                .insert(TranscodeReason::AudioChannelsNotSupported);
        }

        plan.audio_codecs = audio_codecs;
        let mut audio = inputs.audio;
        if let Some(s) = copy_audio {
            audio = Some(s);
            plan.audio_stream_index = Some(s.index);
            plan.audio_codecs = s.codec.clone().into_iter().collect();
            plan.audio_sample_rate = s.sample_rate;
            let qualifier = s.codec.as_deref();
            if let Some(channels) = s.channels {
                plan.set_option(qualifier, "audiochannels", channels.to_string());
            }
            if let Some(p) = s.profile.as_deref().filter(|p| !p.is_empty()) {
                plan.set_option(qualifier, "profile", p.to_ascii_lowercase());
            }
            if let Some(depth) = s.bit_depth {
                plan.set_option(qualifier, "audiobitdepth", depth.to_string());
            }
        }

        let video_attrs = VideoAttributes::of(source, video);
        let video_profiles: Vec<&CodecProfile> = profile
            .codec_profiles
            .iter()
            .filter(|cp| {
                cp.codec_type == CodecType::Video
                    && cp.contains_any_codec_of(&plan.video_codecs, container)
                    && condition::all_satisfied(&cp.apply_conditions, &video_attrs)
            })
            .collect();
        let video_codecs = plan.video_codecs.clone();
        for cp in video_profiles.into_iter().rev() {
            for codec in &video_codecs {
                if cp.contains_any_codec(Some(codec), container) {
                    plan = constraints::apply_conditions(plan, &cp.conditions, ConditionScope::codec(codec));
                }
            }
        }

        plan.global_max_audio_channels = options.max_audio_channels;
        let target_channels = plan.target_audio_channels(plan.target_audio_codec());
        let audio_bitrate =
            bitrate::audio_bitrate(inputs.max_bitrate, &plan.audio_codecs, audio, target_channels);
        plan.audio_bitrate = Some(plan.audio_bitrate.map_or(audio_bitrate, |b| b.min(audio_bitrate)));

        let audio_attrs = AudioAttributes::of(source, audio);
        let audio_profiles: Vec<&CodecProfile> = profile
            .codec_profiles
            .iter()
            .filter(|cp| {
                cp.codec_type == CodecType::VideoAudio
                    && cp.contains_any_codec_of(&plan.audio_codecs, container)
                    && condition::all_satisfied(&cp.apply_conditions, &audio_attrs)
            })
            .collect();
        let audio_codecs = plan.audio_codecs.clone();
        for cp in audio_profiles.into_iter().rev() {
            if let Some(codec) = audio_codecs
                .iter()
                .find(|c| cp.contains_any_codec(Some(c.as_str()), container))
            {
                plan = constraints::apply_conditions(plan, &cp.conditions, ConditionScope::codec(codec));
            }
        }

        if let Some(budget) = inputs.max_bitrate.filter(|b| *b > 0) {
            let available = budget.saturating_sub(plan.audio_bitrate.unwrap_or(0));
            let current = plan.video_bitrate.unwrap_or(available);
            plan.video_bitrate = Some(available.min(current).max(MIN_VIDEO_BITRATE));
        }

        plan
    }

    /// Build the plan for one audio-only source.
    ///
    /// Returns `None` when a transcode is needed but the source cannot be
    /// transcoded.
    pub fn build_audio_plan(
        &self,
        profile: &DeviceProfile,
        source: &MediaSource,
        options: &MediaOptions,
    ) -> Option<StreamPlan> {
        let mut plan = base_plan(source, options, ProfileMediaType::Audio);
        let audio = source.default_audio_stream(options.audio_stream_index);
        plan.audio_stream_index = audio.map(|s| s.index);

        let max_bitrate = options.max_bitrate(true);
        let eligibility = eligibility(source, options, max_bitrate, &mut plan.transcode_reasons);

        let decision = direct_play::evaluate_audio_direct_play(profile, source, audio, eligibility);
        plan.transcode_reasons.extend(decision.reasons);
        if let Some(method) = decision.play_method {
            plan.play_method = Some(method);
            plan.sub_protocol = MediaStreamProtocol::Http;
            plan.container = direct_play::normalize_container(
                source.container.as_deref(),
                profile,
                ProfileMediaType::Audio,
                decision.profile,
            );
            plan.audio_codecs = audio.and_then(|s| s.codec.clone()).into_iter().collect();
            return Some(plan);
        }

        if !options.enable_transcoding {
            mark_undeliverable(&mut plan);
            return Some(plan);
        }
        let Some(tp) =
            transcode::select_audio_transcoding_profile(profile, source, options, self.support())
        else {
            debug!("No audio transcoding profile for source {}", source.id);
            mark_undeliverable(&mut plan);
            return Some(plan);
        };
        if !source.supports_transcoding {
            debug!("Source {} cannot be transcoded", source.id);
            return None;
        }

        plan = apply_transcoding_profile(plan, tp);
        plan.audio_codecs = container::split(tp.audio_codec.as_deref());

        let attrs = AudioAttributes::of(source, audio);
        let conditions: Vec<ProfileCondition> = direct_play::applicable_codec_profiles(
            profile,
            CodecType::Audio,
            tp.audio_codec.as_deref(),
            Some(tp.container.as_str()),
            &attrs,
        )
        .flat_map(|cp| cp.conditions.iter().cloned())
        .collect();
        plan = constraints::apply_conditions(plan, &conditions, ConditionScope::ALL);

        plan.global_max_audio_channels = options.max_audio_channels;
        plan.audio_bitrate = Some(bitrate::audio_transcode_bitrate(
            options,
            profile,
            max_bitrate,
            plan.audio_bitrate,
        ));
        plan.play_method = Some(PlayMethod::Transcode);
        Some(plan)
    }
}

fn base_plan(source: &MediaSource, options: &MediaOptions, media_type: ProfileMediaType) -> StreamPlan {
    StreamPlan {
        item_id: options.item_id.clone(),
        media_type,
        media_source_id: source.id.clone(),
        media_source_protocol: source.protocol,
        media_source_bitrate: source.bitrate,
        context: options.context,
        device_id: options.device_id.clone(),
        ..Default::default()
    }
}

/// A plan left without a method always says why.
fn mark_undeliverable(plan: &mut StreamPlan) {
    if plan.play_method.is_none() && plan.transcode_reasons.is_empty() {
        plan.transcode_reasons.insert(TranscodeReason::DirectPlayError);
    }
}

/// Work out which direct methods the budget leaves open.
///
/// Records the bitrate overrun unless the request forces a direct method.
fn eligibility(
    source: &MediaSource,
    options: &MediaOptions,
    max_bitrate: Option<u64>,
    reasons: &mut TranscodeReasons,
) -> Eligibility {
    let exceeded = bitrate::is_bitrate_limit_exceeded(source, max_bitrate);
    if exceeded && !options.force_direct_play && !options.force_direct_stream {
        debug!(
            "Source {} bitrate {:?} exceeds budget {:?}",
            source.id, source.bitrate, max_bitrate
        );
        reasons.insert(TranscodeReason::ContainerBitrateExceedsLimit);
    }
    Eligibility {
        direct_play: options.enable_direct_play && (options.force_direct_play || !exceeded),
        direct_stream: options.enable_direct_stream && (options.force_direct_stream || !exceeded),
    }
}

/// Sources the request asks for, in discovery order.
fn candidate_sources<'a>(
    options: &'a MediaOptions,
    sources: &'a [MediaSource],
) -> impl Iterator<Item = &'a MediaSource> + 'a {
    sources.iter().filter(move |s| {
        options
            .media_source_id
            .as_deref()
            .map_or(true, |id| s.id.eq_ignore_ascii_case(id))
    })
}

/// The audio tracks a direct-play rule may pick from.
///
/// A pinned track stands alone. Otherwise the default track comes first,
/// followed by the other tracks in its language.
fn candidate_audio_streams<'a>(
    source: &'a MediaSource,
    audio: Option<&'a MediaStream>,
    pinned: bool,
) -> Vec<&'a MediaStream> {
    let Some(primary) = audio else {
        return Vec::new();
    };
    let mut streams = vec![primary];
    if !pinned {
        let language = primary.language.as_deref().unwrap_or_default();
        streams.extend(source.streams_of(MediaStreamType::Audio).filter(|s| {
            s.index != primary.index
                && s.language
                    .as_deref()
                    .unwrap_or_default()
                    .eq_ignore_ascii_case(language)
        }));
    }
    streams
}

/// Output container of a direct stream: the source container when the rule
/// takes it, else the rule's first container.
fn direct_stream_container(normalized: Option<String>, rule_containers: Option<&str>) -> Option<String> {
    let accepted = normalized
        .as_deref()
        .map_or(false, |c| container::contains_container(rule_containers, Some(c)));
    if accepted {
        return normalized;
    }
    container::split(rule_containers).into_iter().next().or(normalized)
}

/// Copy the delivery settings of a transcoding profile onto the plan.
fn apply_transcoding_profile(mut plan: StreamPlan, tp: &TranscodingProfile) -> StreamPlan {
    plan.container = Some(tp.container.clone());
    plan.sub_protocol = tp.protocol;
    plan.copy_timestamps = tp.copy_timestamps;
    plan.break_on_non_key_frames = tp.break_on_non_key_frames;
    plan.estimate_content_length = tp.estimate_content_length;
    plan.enable_subtitles_in_manifest = tp.enable_subtitles_in_manifest;
    if tp.min_segments > 0 {
        plan.min_segments = Some(tp.min_segments);
    }
    if tp.segment_length > 0 {
        plan.segment_length = Some(tp.segment_length);
    }
    if let Some(value) = tp.max_audio_channels.as_deref().filter(|v| !v.trim().is_empty()) {
        match value.trim().parse() {
            Ok(channels) => plan.transcoding_max_audio_channels = Some(channels),
            Err(_) => warn!("Ignoring invalid MaxAudioChannels {:?} on {} profile", value, tp.container),
        }
    }
    plan
}

/// Rank the candidates and stamp the winner with session identifiers.
fn finish(plans: Vec<StreamPlan>, options: &MediaOptions, max_bitrate: Option<u64>) -> Option<StreamPlan> {
    let candidates = plans.len();
    let Some(mut best) = ranking::select_optimal(plans, max_bitrate) else {
        info!("No playable source for item {}", options.item_id);
        return None;
    };
    best.device_id = options.device_id.clone();
    best.play_session_id = Some(Uuid::new_v4().simple().to_string());
    info!(
        "Item {} on device {}: {:?} from source {} ({} candidates, reasons: [{}])",
        options.item_id,
        options.device_id,
        best.play_method,
        best.media_source_id,
        candidates,
        best.transcode_reasons
    );
    Some(best)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::support::FullTranscoderSupport;

    fn audio(index: i32, codec: &str, language: &str) -> MediaStream {
        MediaStream {
            stream_type: MediaStreamType::Audio,
            index,
            codec: Some(codec.to_string()),
            language: Some(language.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_candidate_audio_streams() {
        let source = MediaSource {
            media_streams: vec![
                audio(1, "ac3", "eng"),
                audio(2, "aac", "fre"),
                audio(3, "aac", "ENG"),
            ],
            ..Default::default()
        };
        let primary = source.default_audio_stream(None);
        let streams = candidate_audio_streams(&source, primary, false);
        let indexes: Vec<i32> = streams.iter().map(|s| s.index).collect();
        assert_eq!(indexes, vec![1, 3]);

        let pinned = candidate_audio_streams(&source, primary, true);
        assert_eq!(pinned.len(), 1);
        assert!(candidate_audio_streams(&source, None, false).is_empty());
    }

    #[test]
    fn test_direct_stream_container() {
        assert_eq!(
            direct_stream_container(Some("mkv".to_string()), Some("mp4,m4v")),
            Some("mp4".to_string())
        );
        assert_eq!(
            direct_stream_container(Some("mp4".to_string()), Some("mp4,m4v")),
            Some("mp4".to_string())
        );
        assert_eq!(
            direct_stream_container(Some("mkv".to_string()), None),
            Some("mkv".to_string())
        );
    }

    #[test]
    fn test_apply_transcoding_profile() {
        let tp = TranscodingProfile {
            container: "ts".to_string(),
            protocol: MediaStreamProtocol::Hls,
            max_audio_channels: Some("6".to_string()),
            min_segments: 2,
            break_on_non_key_frames: true,
            ..Default::default()
        };
        let plan = apply_transcoding_profile(StreamPlan::default(), &tp);
        assert_eq!(plan.container.as_deref(), Some("ts"));
        assert_eq!(plan.sub_protocol, MediaStreamProtocol::Hls);
        assert_eq!(plan.transcoding_max_audio_channels, Some(6));
        assert_eq!(plan.min_segments, Some(2));
        assert_eq!(plan.segment_length, None);
        assert!(plan.break_on_non_key_frames);

        let bad = TranscodingProfile {
            max_audio_channels: Some("six".to_string()),
            ..tp
        };
        let plan = apply_transcoding_profile(StreamPlan::default(), &bad);
        assert_eq!(plan.transcoding_max_audio_channels, None);
    }

    #[test]
    fn test_eligibility_and_force() {
        let source = MediaSource {
            bitrate: Some(30_000_000),
            ..Default::default()
        };
        let options = MediaOptions::default();
        let mut reasons = TranscodeReasons::new();
        let e = eligibility(&source, &options, Some(8_000_000), &mut reasons);
        assert!(!e.any());
        assert!(reasons.contains(TranscodeReason::ContainerBitrateExceedsLimit));

        let forced = MediaOptions {
            force_direct_stream: true,
            ..Default::default()
        };
        let mut reasons = TranscodeReasons::new();
        let e = eligibility(&source, &forced, Some(8_000_000), &mut reasons);
        assert!(!e.direct_play);
        assert!(e.direct_stream);
        assert!(reasons.is_empty());
    }

    #[test]
    fn test_invalid_request_is_an_error() {
        let builder = StreamBuilder::new(Arc::new(FullTranscoderSupport));
        let options = MediaOptions {
            item_id: "item".to_string(),
            device_id: "device".to_string(),
            ..Default::default()
        };
        assert!(builder.optimal_video_plan(&options).is_err());
        assert!(builder.optimal_audio_plan(&options).is_err());
    }
}
