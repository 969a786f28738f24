//! Core action types.
//!
//! This module defines the decoded `Action` record and the frame-ordered
//! `ActionStream` that every derived view is computed from.

use std::fmt;

use serde::Serialize;

use super::classify::{classify, ActionFlags};
use super::opcodes::{ActionCategory, OpcodeInfo};
use crate::timing::frame_timestamp;

/// One decoded player command.
///
/// Created once by the command decoder and never modified afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Action {
    /// Frame the command was issued on.
    pub frame: u32,

    /// Issuing player's slot id.
    pub player_id: u8,

    /// Raw opcode byte.
    pub opcode: u8,

    /// Command name from the opcode table.
    pub action_name: &'static str,

    /// Semantic group from the opcode table.
    pub category: ActionCategory,

    /// Classification flags derived from `category`.
    #[serde(flatten)]
    pub flags: ActionFlags,

    /// Unit id for build, train and morph commands.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_id: Option<u16>,

    /// Resolved unit name for `unit_id`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_name: Option<String>,

    /// Target x coordinate in pixels.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<u16>,

    /// Target y coordinate in pixels.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<u16>,
}

impl Action {
    /// Creates an action for an opcode table entry with no typed fields.
    #[must_use]
    pub fn new(frame: u32, player_id: u8, info: &'static OpcodeInfo) -> Self {
        Self {
            frame,
            player_id,
            opcode: info.opcode,
            action_name: info.name,
            category: info.category,
            flags: classify(info.category),
            unit_id: None,
            unit_name: None,
            x: None,
            y: None,
        }
    }

    /// Returns the game time of this action as `mm:ss`.
    #[must_use]
    pub fn timestamp(&self) -> String {
        frame_timestamp(self.frame)
    }

    /// Returns the unit name if present, otherwise the command name.
    #[must_use]
    pub fn label(&self) -> &str {
        self.unit_name.as_deref().unwrap_or(self.action_name)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[P{} @{} f{}] {}",
            self.player_id,
            self.timestamp(),
            self.frame,
            self.action_name
        )?;
        if let Some(name) = &self.unit_name {
            write!(f, " {name}")?;
        }
        if let (Some(x), Some(y)) = (self.x, self.y) {
            write!(f, " ({x}, {y})")?;
        }
        Ok(())
    }
}

/// Decoded actions in stream order.
///
/// Frames never decrease along the stream, since the decoder only moves its
/// frame counter forward.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ActionStream {
    actions: Vec<Action>,
}

impl ActionStream {
    /// Wraps decoded actions.
    #[must_use]
    pub fn new(actions: Vec<Action>) -> Self {
        Self { actions }
    }

    /// Returns the number of actions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// Returns whether the stream is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Returns the actions as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[Action] {
        &self.actions
    }

    /// Iterates over the actions in stream order.
    pub fn iter(&self) -> std::slice::Iter<'_, Action> {
        self.actions.iter()
    }

    /// Iterates over one player's actions.
    pub fn for_player(&self, player_id: u8) -> impl Iterator<Item = &Action> + '_ {
        self.actions
            .iter()
            .filter(move |action| action.player_id == player_id)
    }

    /// Returns whether every adjacent pair has non-decreasing frames.
    #[must_use]
    pub fn is_frame_monotonic(&self) -> bool {
        self.actions.windows(2).all(|w| w[0].frame <= w[1].frame)
    }

    /// Returns the frame of the last action.
    #[must_use]
    pub fn last_frame(&self) -> Option<u32> {
        self.actions.last().map(|action| action.frame)
    }
}

impl<'a> IntoIterator for &'a ActionStream {
    type Item = &'a Action;
    type IntoIter = std::slice::Iter<'a, Action>;

    fn into_iter(self) -> Self::IntoIter {
        self.actions.iter()
    }
}

impl FromIterator<Action> for ActionStream {
    fn from_iter<I: IntoIterator<Item = Action>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
