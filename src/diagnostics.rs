//! Decode diagnostics and the reliability verdict.
//!
//! | Tier | Condition |
//! |------|-----------|
//! | unrecoverable | the command stream could not be located |
//! | low | locator fallback, or decoding stopped early |
//! | high | >= 90% of opcode decisions recognised and >= 30 actions per game minute |
//! | medium | >= 50% recognised and at least one action |
//! | low | anything else |

use std::fmt;

use serde::Serialize;

use crate::actions::{DecodeStats, StreamLocation, TerminationReason};
use crate::timing::game_minutes;

/// Recognition ratio required for `high`.
pub const HIGH_RECOGNITION_RATIO: f64 = 0.9;

/// Actions per game minute required for `high`.
pub const HIGH_ACTION_DENSITY: f64 = 30.0;

/// Recognition ratio required for `medium`.
pub const MEDIUM_RECOGNITION_RATIO: f64 = 0.5;

/// How far the decoded result can be trusted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Reliability {
    /// No command stream was decoded.
    Unrecoverable,
    /// Fallback heuristics were used or decoding stopped early.
    Low,
    /// Marginal recognition.
    Medium,
    /// Strong recognition and action density.
    High,
}

impl Reliability {
    /// Returns the display name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Reliability::Unrecoverable => "unrecoverable",
            Reliability::Low => "low",
            Reliability::Medium => "medium",
            Reliability::High => "high",
        }
    }
}

impl fmt::Display for Reliability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Counters and verdict for one decode.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DecodeDiagnostics {
    /// Chosen command stream offset, if any.
    pub stream_offset: Option<usize>,
    /// Locator window confidence.
    pub locator_confidence: f64,
    /// Whether the locator fell back to its default offset.
    pub used_fallback: bool,
    /// Decoder counters; empty when no stream was decoded.
    #[serde(flatten)]
    pub stats: DecodeStats,
    /// Verdict.
    pub reliability: Reliability,
}

impl DecodeDiagnostics {
    /// Builds diagnostics for a completed decode.
    #[must_use]
    pub fn from_decode(location: &StreamLocation, stats: &DecodeStats, frame_count: u32) -> Self {
        Self {
            stream_offset: Some(location.offset),
            locator_confidence: location.confidence,
            used_fallback: location.fallback,
            stats: *stats,
            reliability: assess(location, stats, frame_count),
        }
    }

    /// Builds diagnostics for a decode whose command stream was not found.
    #[must_use]
    pub fn unrecoverable() -> Self {
        Self {
            stream_offset: None,
            locator_confidence: 0.0,
            used_fallback: false,
            stats: DecodeStats::default(),
            reliability: Reliability::Unrecoverable,
        }
    }

    /// Returns the early termination reason, if decoding stopped early.
    #[must_use]
    pub fn early_termination(&self) -> Option<TerminationReason> {
        self.stats.termination.filter(TerminationReason::is_early)
    }

    /// Returns the share of opcode decisions that produced an action.
    #[must_use]
    pub fn recognized_ratio(&self) -> f64 {
        self.stats.recognized_ratio()
    }

    /// Returns the share of consumed bytes that were frame markers.
    #[must_use]
    pub fn marker_ratio(&self) -> f64 {
        self.stats.marker_ratio()
    }
}

/// Decides the reliability tier of a completed decode.
#[allow(clippy::cast_precision_loss)]
fn assess(location: &StreamLocation, stats: &DecodeStats, frame_count: u32) -> Reliability {
    if location.fallback || stats.termination.is_some_and(|t| t.is_early()) {
        return Reliability::Low;
    }

    let ratio = stats.recognized_ratio();
    let actions = stats.recognized_opcodes;
    let minutes = game_minutes(frame_count);
    let density = if minutes > 0.0 {
        actions as f64 / minutes
    } else {
        0.0
    };

    if ratio >= HIGH_RECOGNITION_RATIO && density >= HIGH_ACTION_DENSITY {
        Reliability::High
    } else if ratio >= MEDIUM_RECOGNITION_RATIO && actions > 0 {
        Reliability::Medium
    } else {
        Reliability::Low
    }
}
