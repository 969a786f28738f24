//! Format detection and header layouts for replay buffers.
//!
//! Replays come in two layout families, distinguished by the engine version
//! stored at offset 0x04:
//!
//! - **Remastered**: engine version >= 74
//! - **Classic**: engine version < 74
//!
//! Both families share the 8-byte preamble (signature + engine version). The
//! remaining field offsets differ and are described by a static
//! [`HeaderLayout`] per family, so the header decoder is a single code path
//! keyed by the detected format.
//!
//! # Example
//!
//! ```
//! use bwrep_parser::format::{ReplayFormat, HeaderLayout};
//!
//! let format = ReplayFormat::from_engine_version(74);
//! assert_eq!(format, ReplayFormat::Remastered);
//!
//! let layout = HeaderLayout::for_format(format);
//! assert_eq!(layout.map_name.offset, 0x45);
//! assert_eq!(layout.slot_table_offset, 0x161);
//! ```

use serde::Serialize;

use crate::binary::read_u32_le;
use crate::error::Result;

/// Engine version at which the Remastered layout starts.
pub const REMASTERED_ENGINE_VERSION: u32 = 74;

/// Highest engine version accepted by the sanity check.
pub const MAX_ENGINE_VERSION: u32 = 255;

/// Offset of the signature word.
pub const SIGNATURE_OFFSET: usize = 0x00;

/// Offset of the engine version.
pub const ENGINE_VERSION_OFFSET: usize = 0x04;

/// Buffers shorter than this are rejected before any field is read.
pub const MIN_REPLAY_SIZE: usize = 100;

/// Maximum number of player slots in the slot table.
pub const MAX_PLAYER_SLOTS: usize = 8;

/// Size of one player slot record in bytes.
pub const PLAYER_SLOT_SIZE: usize = 36;

/// The layout family of a replay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ReplayFormat {
    /// Original Brood War layout (engine version < 74).
    Classic,
    /// Remastered layout (engine version >= 74).
    Remastered,
}

impl ReplayFormat {
    /// Determines the layout family from an engine version.
    #[must_use]
    pub const fn from_engine_version(engine_version: u32) -> Self {
        if engine_version >= REMASTERED_ENGINE_VERSION {
            ReplayFormat::Remastered
        } else {
            ReplayFormat::Classic
        }
    }

    /// Returns a display name for this format.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            ReplayFormat::Classic => "Classic",
            ReplayFormat::Remastered => "Remastered",
        }
    }
}

impl std::fmt::Display for ReplayFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Position and width of a fixed header field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    /// Absolute byte offset.
    pub offset: usize,
    /// Width in bytes.
    pub width: usize,
}

impl Field {
    const fn new(offset: usize, width: usize) -> Self {
        Self { offset, width }
    }

    /// Returns the offset one past the field's last byte.
    #[must_use]
    pub const fn end(&self) -> usize {
        self.offset + self.width
    }
}

/// Field offsets within one 36-byte player slot record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotLayout {
    /// Player name (null padded).
    pub name: Field,
    /// Slot type byte (inactive/computer/human).
    pub slot_type: usize,
    /// Race byte.
    pub race: usize,
    /// Team byte.
    pub team: usize,
    /// Color byte.
    pub color: usize,
}

/// Fixed header offsets for one layout family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderLayout {
    /// Total simulated frames (u32).
    pub frame_count: Field,
    /// Save timestamp, Unix seconds (u32).
    pub save_time: Field,
    /// Map name text field.
    pub map_name: Field,
    /// Game creator text field.
    pub game_creator: Field,
    /// Map width in tiles (u16).
    pub map_width: Field,
    /// Map height in tiles (u16).
    pub map_height: Field,
    /// Start of the player slot table.
    pub slot_table_offset: usize,
    /// Layout of each slot record.
    pub slot: SlotLayout,
}

/// Remastered layout (engine version >= 74).
///
/// | field | offset | width |
/// |---|---|---|
/// | frameCount | 0x0C | 4 |
/// | saveTime | 0x14 | 4 |
/// | mapName | 0x45 | 32 |
/// | gameCreator | 0x65 | 25 |
/// | mapWidth | 0x7E | 2 |
/// | mapHeight | 0x80 | 2 |
/// | slot table | 0x161 | 36 x 8 |
pub const REMASTERED_LAYOUT: HeaderLayout = HeaderLayout {
    frame_count: Field::new(0x0C, 4),
    save_time: Field::new(0x14, 4),
    map_name: Field::new(0x45, 32),
    game_creator: Field::new(0x65, 25),
    map_width: Field::new(0x7E, 2),
    map_height: Field::new(0x80, 2),
    slot_table_offset: 0x161,
    slot: SlotLayout {
        name: Field::new(0x00, 25),
        slot_type: 0x1B,
        race: 0x1C,
        team: 0x1D,
        color: 0x1F,
    },
};

/// Classic layout (engine version < 74).
///
/// The legacy game section follows the 8-byte preamble, so its fields sit
/// at their legacy offsets plus 8.
///
/// These offsets are less well verified than [`REMASTERED_LAYOUT`]. Classic
/// replays decode on a best-effort basis and their header fields should be
/// treated as less reliable.
pub const CLASSIC_LAYOUT: HeaderLayout = HeaderLayout {
    frame_count: Field::new(0x09, 4),
    save_time: Field::new(0x10, 4),
    map_name: Field::new(0x69, 32),
    game_creator: Field::new(0x20, 25),
    map_width: Field::new(0x3C, 2),
    map_height: Field::new(0x3E, 2),
    slot_table_offset: 0xA9,
    slot: SlotLayout {
        name: Field::new(0x09, 25),
        slot_type: 0x06,
        race: 0x07,
        team: 0x08,
        color: 0x22,
    },
};

impl HeaderLayout {
    /// Returns the static layout for a format.
    #[must_use]
    pub const fn for_format(format: ReplayFormat) -> &'static HeaderLayout {
        match format {
            ReplayFormat::Classic => &CLASSIC_LAYOUT,
            ReplayFormat::Remastered => &REMASTERED_LAYOUT,
        }
    }

    /// Returns the offset one past the last fixed scalar field.
    #[must_use]
    pub fn fixed_fields_end(&self) -> usize {
        [
            self.frame_count,
            self.save_time,
            self.map_name,
            self.game_creator,
            self.map_width,
            self.map_height,
        ]
        .iter()
        .map(Field::end)
        .max()
        .unwrap_or(0)
    }

    /// Returns the smallest buffer that holds every fixed field and one slot.
    #[must_use]
    pub fn minimum_size(&self) -> usize {
        self.fixed_fields_end()
            .max(self.slot_table_offset + PLAYER_SLOT_SIZE)
    }

    /// Returns the absolute offset of slot `index`.
    #[must_use]
    pub const fn slot_offset(&self, index: usize) -> usize {
        self.slot_table_offset + index * PLAYER_SLOT_SIZE
    }
}

/// Detects the layout family of a replay buffer from its engine version.
///
/// # Errors
///
/// Returns `ParserError::UnexpectedEof` if the buffer is too short to hold
/// the engine version field.
///
/// # Example
///
/// ```
/// use bwrep_parser::format::{detect_format, ReplayFormat};
///
/// let data = b"seRS\x4A\x00\x00\x00";
/// assert_eq!(detect_format(data).unwrap(), ReplayFormat::Remastered);
/// ```
pub fn detect_format(data: &[u8]) -> Result<ReplayFormat> {
    let engine_version = read_u32_le(data, ENGINE_VERSION_OFFSET)?;
    Ok(ReplayFormat::from_engine_version(engine_version))
}
