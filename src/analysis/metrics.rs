//! APM and EAPM per player.
//!
//! `apm = round(actions / game minutes)` and
//! `eapm = round(effective actions / game minutes)`, where an effective action
//! is a build, train or micro command. Game minutes come from the header's
//! frame count at 1440 frames per minute; a zero frame count yields zero for
//! both rates.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::actions::ActionStream;
use crate::header::PlayerSlot;
use crate::timing::game_minutes;

/// Activity rates for one player.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerMetrics {
    /// All actions per game minute, rounded.
    pub apm: u32,
    /// Build, train and micro actions per game minute, rounded.
    pub eapm: u32,
    /// Total actions.
    pub actions: usize,
    /// Build, train and micro actions.
    pub effective_actions: usize,
}

/// Computes metrics for every active player, keyed by player id.
///
/// Players without actions get zero rates. The stream is only read.
///
/// # Example
///
/// ```
/// use bwrep_parser::actions::ActionStream;
/// use bwrep_parser::analysis::compute_metrics;
///
/// let metrics = compute_metrics(&ActionStream::default(), &[], 1440);
/// assert!(metrics.is_empty());
/// ```
#[must_use]
pub fn compute_metrics(
    stream: &ActionStream,
    players: &[PlayerSlot],
    frame_count: u32,
) -> BTreeMap<u8, PlayerMetrics> {
    let mut counts: BTreeMap<u8, (usize, usize)> =
        players.iter().map(|player| (player.id, (0, 0))).collect();

    for action in stream {
        if let Some((all, effective)) = counts.get_mut(&action.player_id) {
            *all += 1;
            if action.flags.is_effective() {
                *effective += 1;
            }
        }
    }

    let minutes = game_minutes(frame_count);
    counts
        .into_iter()
        .map(|(id, (actions, effective_actions))| {
            let metrics = PlayerMetrics {
                apm: per_minute(actions, minutes),
                eapm: per_minute(effective_actions, minutes),
                actions,
                effective_actions,
            };
            (id, metrics)
        })
        .collect()
}

#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
fn per_minute(count: usize, minutes: f64) -> u32 {
    if minutes <= 0.0 {
        return 0;
    }
    (count as f64 / minutes).round() as u32
}
