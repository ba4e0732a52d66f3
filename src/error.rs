use thiserror::Error;

use crate::profile::{ProfileConditionType, ProfileConditionValue};

/// Main error type for the negotiator
#[derive(Error, Debug)]
pub enum NegotiationError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlDe(#[from] toml::de::Error),

    #[error("TOML write error: {0}")]
    TomlSer(#[from] toml::ser::Error),
}

/// Condition evaluation errors.
///
/// These never abort a negotiation: the offending condition is treated as
/// unsatisfied and evaluation moves on.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConditionError {
    #[error("unparseable literal {value:?} for {property:?}")]
    InvalidLiteral {
        property: ProfileConditionValue,
        value: String,
    },

    #[error("operator {condition:?} cannot be applied to {property:?}")]
    UnsupportedOperator {
        property: ProfileConditionValue,
        condition: ProfileConditionType,
    },
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, NegotiationError>;
