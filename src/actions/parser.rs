//! Command stream decoder.
//!
//! This module provides `CommandDecoder`, a byte-driven state machine that
//! walks the command stream from its located start and yields one `Action`
//! per recognised command.
//!
//! # Stream Structure
//!
//! The stream is a flat byte sequence:
//! - `0x00`: frame marker, advances the frame counter by one
//! - known opcode: `[opcode] [player id] [payload ...]`, `payload_len` bytes
//!   after the opcode
//! - anything else: skipped one byte at a time
//!
//! # States
//!
//! ```text
//!                 0x00 / frame += 1
//!               +-------------------+
//!               v                   |
//!   +----> AdvancingFrame ----------+
//!   |        |          |
//!   |  opcode + player  | other byte
//!   |        v          v
//!   +-- DecodingAction  SkippingUnknown --+
//!   |                                     |
//!   +-------------------------------------+
//!
//!   AdvancingFrame -> Done     (end of buffer, frame limit)
//!   AdvancingFrame -> Aborted  (action ceiling, empty frame run, truncated)
//! ```
//!
//! # Example
//!
//! ```
//! use bwrep_parser::actions::{CommandDecoder, DecodeLimits, OpcodeTable};
//! use bwrep_parser::format::ReplayFormat;
//!
//! // Two frames, then player 0 trains an SCV
//! let stream = [0x00, 0x00, 0x1F, 0x00, 0x07, 0x00];
//! let table = OpcodeTable::for_format(ReplayFormat::Remastered);
//!
//! let decoder = CommandDecoder::new(&stream, 0, table, &[0], DecodeLimits::default());
//! let (actions, stats) = decoder.decode_all();
//!
//! assert_eq!(actions.len(), 1);
//! assert_eq!(actions.as_slice()[0].frame, 2);
//! assert_eq!(actions.as_slice()[0].unit_name.as_deref(), Some("SCV"));
//! assert_eq!(stats.frame_markers, 2);
//! ```

use std::fmt;

use serde::Serialize;
use tracing::{debug, trace, warn};

use super::opcodes::{OpcodeInfo, OpcodeTable, PayloadShape};
use super::types::{Action, ActionStream};
use crate::binary::ByteCursor;
use crate::config::DecoderConfig;
use crate::units::unit_label;

/// The frame marker byte.
pub const FRAME_MARKER: u8 = 0x00;

/// Why decoding stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TerminationReason {
    /// The cursor reached the end of the buffer.
    EndOfBuffer,
    /// The frame counter reached the header's frame count.
    FrameLimit,
    /// The action ceiling was reached.
    ActionCeiling,
    /// Too many consecutive frames passed without an action.
    EmptyFrameRun,
    /// A command's payload ran past the end of the buffer.
    Truncated,
}

impl TerminationReason {
    /// Returns whether decoding stopped before the stream's natural end.
    #[must_use]
    pub const fn is_early(&self) -> bool {
        matches!(
            self,
            TerminationReason::ActionCeiling
                | TerminationReason::EmptyFrameRun
                | TerminationReason::Truncated
        )
    }

    /// Returns the display name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            TerminationReason::EndOfBuffer => "end of buffer",
            TerminationReason::FrameLimit => "frame limit",
            TerminationReason::ActionCeiling => "action ceiling",
            TerminationReason::EmptyFrameRun => "empty frame run",
            TerminationReason::Truncated => "truncated command",
        }
    }
}

impl fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Decoder state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecoderState {
    /// Reading the next byte.
    AdvancingFrame,
    /// Decoding the command at the cursor.
    DecodingAction(&'static OpcodeInfo),
    /// Skipping one unrecognised byte.
    SkippingUnknown,
    /// Stream ended normally.
    Done(TerminationReason),
    /// A safety valve or a truncated command stopped decoding.
    Aborted(TerminationReason),
}

/// Stopping rules for one decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeLimits {
    /// Stop once the frame counter reaches this value; `None` disables the rule.
    pub frame_limit: Option<u32>,
    /// Stop once this many actions were emitted.
    pub max_actions: usize,
    /// Stop after more than this many consecutive frames without an action.
    pub max_empty_frames: u32,
}

impl Default for DecodeLimits {
    fn default() -> Self {
        Self::from_config(&DecoderConfig::default(), 0)
    }
}

impl DecodeLimits {
    /// Builds limits from a configuration and the header's frame count.
    ///
    /// A frame count of zero disables the frame limit.
    #[must_use]
    pub fn from_config(config: &DecoderConfig, frame_count: u32) -> Self {
        Self {
            frame_limit: (frame_count > 0).then_some(frame_count),
            max_actions: config.max_actions,
            max_empty_frames: config.max_empty_frames,
        }
    }
}

/// Counters accumulated while decoding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DecodeStats {
    /// Opcodes decoded into actions.
    pub recognized_opcodes: usize,
    /// Bytes skipped as unrecognised.
    pub unknown_bytes: usize,
    /// Frame markers consumed.
    pub frame_markers: usize,
    /// Bytes consumed from the stream start.
    pub bytes_consumed: usize,
    /// Frame counter when decoding stopped.
    pub final_frame: u32,
    /// Why decoding stopped, once it has.
    pub termination: Option<TerminationReason>,
}

impl DecodeStats {
    /// Returns the share of opcode decisions that produced an action.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn recognized_ratio(&self) -> f64 {
        let total = self.recognized_opcodes + self.unknown_bytes;
        if total == 0 {
            return 0.0;
        }
        self.recognized_opcodes as f64 / total as f64
    }

    /// Returns the share of consumed bytes that were frame markers.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn marker_ratio(&self) -> f64 {
        if self.bytes_consumed == 0 {
            return 0.0;
        }
        self.frame_markers as f64 / self.bytes_consumed as f64
    }
}

/// Walks a command stream and yields decoded actions.
///
/// Unknown bytes never fail the decode; they are skipped. Decoding ends on
/// the first stopping rule that fires, and the reason is kept in
/// [`DecodeStats::termination`].
pub struct CommandDecoder<'a> {
    cursor: ByteCursor<'a>,
    start: usize,
    table: &'static OpcodeTable,
    active_players: [bool; 256],
    limits: DecodeLimits,
    state: DecoderState,
    frame: u32,
    empty_frames: u32,
    emitted: usize,
    stats: DecodeStats,
}

impl<'a> CommandDecoder<'a> {
    /// Creates a decoder positioned at `start`.
    ///
    /// # Arguments
    ///
    /// * `data` - The whole replay buffer
    /// * `start` - Offset of the first command stream byte
    /// * `table` - Opcode table for the replay's format
    /// * `player_ids` - Ids of the active player slots
    /// * `limits` - Stopping rules
    #[must_use]
    pub fn new(
        data: &'a [u8],
        start: usize,
        table: &'static OpcodeTable,
        player_ids: &[u8],
        limits: DecodeLimits,
    ) -> Self {
        let mut active_players = [false; 256];
        for &id in player_ids {
            active_players[usize::from(id)] = true;
        }
        let cursor = ByteCursor::at(data, start);
        Self {
            start: cursor.position(),
            cursor,
            table,
            active_players,
            limits,
            state: DecoderState::AdvancingFrame,
            frame: 0,
            empty_frames: 0,
            emitted: 0,
            stats: DecodeStats::default(),
        }
    }

    /// Returns the current state.
    #[must_use]
    pub fn state(&self) -> DecoderState {
        self.state
    }

    /// Returns the current frame counter.
    #[must_use]
    pub fn frame(&self) -> u32 {
        self.frame
    }

    /// Returns the counters accumulated so far.
    #[must_use]
    pub fn stats(&self) -> DecodeStats {
        DecodeStats {
            bytes_consumed: self.cursor.position() - self.start,
            final_frame: self.frame,
            ..self.stats
        }
    }

    /// Decodes the remaining stream.
    #[must_use]
    pub fn decode_all(mut self) -> (ActionStream, DecodeStats) {
        let actions: ActionStream = self.by_ref().collect();
        (actions, self.stats())
    }

    fn stop(&mut self, reason: TerminationReason) {
        self.stats.termination = Some(reason);
        if reason.is_early() {
            warn!(
                %reason,
                frame = self.frame,
                offset = self.cursor.position(),
                actions = self.emitted,
                "command decoding stopped early"
            );
            self.state = DecoderState::Aborted(reason);
        } else {
            debug!(
                %reason,
                frame = self.frame,
                actions = self.emitted,
                "command decoding finished"
            );
            self.state = DecoderState::Done(reason);
        }
    }

    /// Reads the byte at the cursor and picks the next state.
    fn advance(&mut self) {
        let Some(byte) = self.cursor.peek_u8() else {
            self.stop(TerminationReason::EndOfBuffer);
            return;
        };
        if self.emitted >= self.limits.max_actions {
            self.stop(TerminationReason::ActionCeiling);
            return;
        }

        if byte == FRAME_MARKER {
            self.cursor.skip(1);
            self.frame = self.frame.saturating_add(1);
            self.empty_frames += 1;
            self.stats.frame_markers += 1;

            if self.limits.frame_limit.is_some_and(|limit| self.frame >= limit) {
                self.stop(TerminationReason::FrameLimit);
            } else if self.empty_frames > self.limits.max_empty_frames {
                self.stop(TerminationReason::EmptyFrameRun);
            }
            return;
        }

        match self.table.lookup(byte) {
            Some(info) => match self.cursor.peek_ahead(1) {
                None => self.stop(TerminationReason::Truncated),
                Some(player) if self.active_players[usize::from(player)] => {
                    self.state = DecoderState::DecodingAction(info);
                }
                Some(_) => self.state = DecoderState::SkippingUnknown,
            },
            None => self.state = DecoderState::SkippingUnknown,
        }
    }

    /// Decodes the command at the cursor.
    fn decode_action(&mut self, info: &'static OpcodeInfo) -> Option<Action> {
        let mut cursor = self.cursor.clone();
        cursor.skip(1);
        let Ok(payload) = cursor.read_bytes(info.payload_len) else {
            self.stop(TerminationReason::Truncated);
            return None;
        };

        let Some((&player_id, rest)) = payload.split_first() else {
            self.stop(TerminationReason::Truncated);
            return None;
        };
        let mut fields = ByteCursor::new(rest);
        let mut action = Action::new(self.frame, player_id, info);

        // Payload length was checked above, so the typed reads cannot fail
        match info.shape {
            PayloadShape::Opaque => {}
            PayloadShape::Unit => {
                action.unit_id = fields.read_u16_le().ok();
            }
            PayloadShape::Position => {
                action.x = fields.read_u16_le().ok();
                action.y = fields.read_u16_le().ok();
            }
            PayloadShape::UnitAtPosition => {
                action.unit_id = fields.read_u16_le().ok();
                action.x = fields.read_u16_le().ok();
                action.y = fields.read_u16_le().ok();
            }
        }
        action.unit_name = action.unit_id.map(unit_label);

        self.cursor = cursor;
        self.emitted += 1;
        self.empty_frames = 0;
        self.stats.recognized_opcodes += 1;
        self.state = DecoderState::AdvancingFrame;
        Some(action)
    }

    fn skip_unknown(&mut self) {
        trace!(
            offset = self.cursor.position(),
            byte = ?self.cursor.peek_u8(),
            "skipping unknown byte"
        );
        self.cursor.skip(1);
        self.stats.unknown_bytes += 1;
        self.state = DecoderState::AdvancingFrame;
    }
}

impl Iterator for CommandDecoder<'_> {
    type Item = Action;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.state {
                DecoderState::Done(_) | DecoderState::Aborted(_) => return None,
                DecoderState::AdvancingFrame => self.advance(),
                DecoderState::SkippingUnknown => self.skip_unknown(),
                DecoderState::DecodingAction(info) => {
                    if let Some(action) = self.decode_action(info) {
                        return Some(action);
                    }
                }
            }
        }
    }
}
