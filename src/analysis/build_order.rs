//! Build order extraction.
//!
//! A build order is a player's build and train commands in frame order.
//! `estimated_supply` is a placeholder: it starts at 4 and grows by one per
//! entry. It does not track supply providers or unit costs.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::actions::{Action, ActionStream};
use crate::header::PlayerSlot;

/// Supply assumed for a player's first entry.
pub const SUPPLY_BASE: u32 = 4;

/// Supply added per earlier entry.
pub const SUPPLY_STEP: u32 = 1;

/// One production step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildOrderEntry {
    /// Frame the command was issued on.
    pub frame: u32,
    /// Game time as `mm:ss`.
    pub timestamp: String,
    /// Unit or building name, or the command name if no unit was decoded.
    pub action_label: String,
    /// Placeholder supply estimate.
    pub estimated_supply: u32,
}

impl BuildOrderEntry {
    fn from_action(action: &Action, index: usize) -> Self {
        let index = u32::try_from(index).unwrap_or(u32::MAX);
        Self {
            frame: action.frame,
            timestamp: action.timestamp(),
            action_label: action.label().to_string(),
            estimated_supply: SUPPLY_BASE.saturating_add(index.saturating_mul(SUPPLY_STEP)),
        }
    }
}

/// Extracts one build order per active player, keyed by player id.
///
/// Entries are sorted by frame; ties keep stream order.
#[must_use]
pub fn extract_build_orders(
    stream: &ActionStream,
    players: &[PlayerSlot],
) -> BTreeMap<u8, Vec<BuildOrderEntry>> {
    players
        .iter()
        .map(|player| (player.id, build_order_for(stream, player.id)))
        .collect()
}

/// Extracts the build order of one player.
#[must_use]
pub fn build_order_for(stream: &ActionStream, player_id: u8) -> Vec<BuildOrderEntry> {
    let mut production: Vec<&Action> = stream
        .for_player(player_id)
        .filter(|action| action.flags.is_production())
        .collect();
    production.sort_by_key(|action| action.frame);

    production
        .into_iter()
        .enumerate()
        .map(|(index, action)| BuildOrderEntry::from_action(action, index))
        .collect()
}
