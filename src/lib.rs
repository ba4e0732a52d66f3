//! Playback negotiation
//!
//! Decides how a media item reaches a client device: played as is, remuxed
//! into a container the device accepts, or transcoded, given the device's
//! capability profile and a network budget.

pub mod bitrate;
pub mod builder;
pub mod condition;
pub mod config;
pub mod config_file;
pub mod constraints;
pub mod container;
pub mod direct_play;
pub mod error;
pub mod hls;
pub mod media;
pub mod plan;
pub mod profile;
pub mod ranking;
pub mod reason;
pub mod request;
pub mod subtitle;
pub mod support;
pub mod transcode;

#[cfg(test)]
pub(crate) mod tests;

pub use builder::StreamBuilder;
pub use config::NegotiatorConfig;
pub use error::{ConditionError, NegotiationError, Result};
pub use media::{MediaProtocol, MediaSource, MediaStream, MediaStreamType};
pub use plan::{PlayMethod, StreamPlan};
pub use profile::DeviceProfile;
pub use reason::{TranscodeReason, TranscodeReasons};
pub use request::MediaOptions;
pub use support::{FullTranscoderSupport, StaticTranscoderSupport, TranscoderSupport};
