//! Negotiation testing module
//!
//! End-to-end tests that run whole requests through the builder:
//! - direct play, direct stream and transcode decisions
//! - bitrate budgets
//! - subtitle delivery
//! - ranking across media sources
