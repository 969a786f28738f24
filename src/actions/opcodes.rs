//! The command opcode table.
//!
//! Each command in the stream starts with a one-byte opcode, followed by the
//! issuing player's id and a fixed-length payload. `payload_len` counts every
//! byte after the opcode, player byte included.
//!
//! | Opcode | Command | Payload | Category |
//! |--------|---------|---------|----------|
//! | 0x09 | Select | 3 | Selection |
//! | 0x0A | Shift Select | 3 | Selection |
//! | 0x0B | Shift Deselect | 3 | Selection |
//! | 0x0C | Build | 7 | Build |
//! | 0x14 | Right Click | 5 | Micro |
//! | 0x15 | Targeted Order | 6 | Micro |
//! | 0x1A | Stop | 2 | Micro |
//! | 0x1F | Train | 3 | Train |
//! | 0x2B | Hold Position | 2 | Micro |
//! | 0x5C | Chat | 81 | Other |
//!
//! (abridged; see [`CLASSIC_OPCODES`] and [`REMASTERED_OPCODES`])
//!
//! The Remastered table is the Classic table plus the Remastered-only
//! selection and order commands in the 0x60 range.

use std::fmt;

use serde::Serialize;

use crate::format::ReplayFormat;

/// Semantic group of a command. Each opcode belongs to exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionCategory {
    /// Places a building.
    Build,
    /// Queues a unit.
    Train,
    /// Moves, attacks, stops or holds units.
    Micro,
    /// Changes the current selection only.
    Selection,
    /// Anything else.
    Other,
}

impl ActionCategory {
    /// Returns the display name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            ActionCategory::Build => "build",
            ActionCategory::Train => "train",
            ActionCategory::Micro => "micro",
            ActionCategory::Selection => "selection",
            ActionCategory::Other => "other",
        }
    }
}

impl fmt::Display for ActionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Which typed fields follow the player byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadShape {
    /// No decoded fields.
    Opaque,
    /// A u16 unit id.
    Unit,
    /// u16 x and y map coordinates.
    Position,
    /// A u16 unit id followed by u16 x and y.
    UnitAtPosition,
}

/// One row of the opcode table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpcodeInfo {
    /// The opcode byte.
    pub opcode: u8,
    /// Command name.
    pub name: &'static str,
    /// Bytes after the opcode, player byte included.
    pub payload_len: usize,
    /// Semantic group.
    pub category: ActionCategory,
    /// Typed fields in the payload.
    pub shape: PayloadShape,
}

const fn op(
    opcode: u8,
    name: &'static str,
    payload_len: usize,
    category: ActionCategory,
    shape: PayloadShape,
) -> OpcodeInfo {
    OpcodeInfo {
        opcode,
        name,
        payload_len,
        category,
        shape,
    }
}

use ActionCategory::{Build, Micro, Other, Selection, Train};
use PayloadShape::{Opaque, Position, Unit, UnitAtPosition};

/// Commands understood by every engine version.
pub const CLASSIC_OPCODES: &[OpcodeInfo] = &[
    op(0x09, "Select", 3, Selection, Opaque),
    op(0x0A, "Shift Select", 3, Selection, Opaque),
    op(0x0B, "Shift Deselect", 3, Selection, Opaque),
    op(0x0C, "Build", 7, Build, UnitAtPosition),
    op(0x13, "Hotkey", 3, Other, Opaque),
    op(0x14, "Right Click", 5, Micro, Position),
    op(0x15, "Targeted Order", 6, Micro, Position),
    op(0x1A, "Stop", 2, Micro, Opaque),
    op(0x1E, "Return Cargo", 2, Other, Opaque),
    op(0x1F, "Train", 3, Train, Unit),
    op(0x20, "Cancel Train", 3, Other, Opaque),
    op(0x21, "Cloak", 2, Other, Opaque),
    op(0x22, "Decloak", 2, Other, Opaque),
    op(0x23, "Unit Morph", 3, Other, Unit),
    op(0x25, "Unsiege", 2, Other, Opaque),
    op(0x26, "Siege", 2, Other, Opaque),
    op(0x2B, "Hold Position", 2, Micro, Opaque),
    op(0x2C, "Burrow", 2, Other, Opaque),
    op(0x2D, "Unburrow", 2, Other, Opaque),
    op(0x2F, "Lift Off", 5, Other, Position),
    op(0x30, "Tech", 2, Other, Opaque),
    op(0x32, "Upgrade", 2, Other, Opaque),
    op(0x35, "Building Morph", 3, Other, Unit),
    op(0x57, "Leave Game", 2, Other, Opaque),
    op(0x58, "Minimap Ping", 5, Other, Position),
    op(0x5C, "Chat", 81, Other, Opaque),
];

/// Commands added by Remastered.
pub const REMASTERED_OPCODES: &[OpcodeInfo] = &[
    op(0x60, "Right Click", 5, Micro, Position),
    op(0x61, "Targeted Order", 6, Micro, Position),
    op(0x63, "Select", 3, Selection, Opaque),
    op(0x64, "Select Add", 3, Selection, Opaque),
    op(0x65, "Select Remove", 3, Selection, Opaque),
];

/// The opcode set for one replay format.
///
/// # Example
///
/// ```
/// use bwrep_parser::actions::{ActionCategory, OpcodeTable};
/// use bwrep_parser::format::ReplayFormat;
///
/// let table = OpcodeTable::for_format(ReplayFormat::Remastered);
/// let build = table.lookup(0x0C).unwrap();
/// assert_eq!(build.name, "Build");
/// assert_eq!(build.category, ActionCategory::Build);
///
/// let classic = OpcodeTable::for_format(ReplayFormat::Classic);
/// assert!(classic.lookup(0x63).is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpcodeTable {
    format: ReplayFormat,
    extensions: &'static [OpcodeInfo],
}

/// Table for Classic replays.
pub const CLASSIC_TABLE: OpcodeTable = OpcodeTable {
    format: ReplayFormat::Classic,
    extensions: &[],
};

/// Table for Remastered replays.
pub const REMASTERED_TABLE: OpcodeTable = OpcodeTable {
    format: ReplayFormat::Remastered,
    extensions: REMASTERED_OPCODES,
};

impl OpcodeTable {
    /// Returns the static table for a format.
    #[must_use]
    pub const fn for_format(format: ReplayFormat) -> &'static OpcodeTable {
        match format {
            ReplayFormat::Classic => &CLASSIC_TABLE,
            ReplayFormat::Remastered => &REMASTERED_TABLE,
        }
    }

    /// Returns the format this table belongs to.
    #[must_use]
    pub const fn format(&self) -> ReplayFormat {
        self.format
    }

    /// Looks up an opcode.
    #[must_use]
    pub fn lookup(&self, opcode: u8) -> Option<&'static OpcodeInfo> {
        CLASSIC_OPCODES
            .iter()
            .chain(self.extensions)
            .find(|info| info.opcode == opcode)
    }

    /// Returns whether `byte` is an opcode in this table.
    #[must_use]
    pub fn is_known(&self, byte: u8) -> bool {
        self.lookup(byte).is_some()
    }

    /// Iterates over every entry, Classic entries first.
    pub fn entries(&self) -> impl Iterator<Item = &'static OpcodeInfo> {
        CLASSIC_OPCODES.iter().chain(self.extensions)
    }
}
