//! Replay header decoding.
//!
//! The header is a set of fixed-offset scalar fields followed by the player
//! slot table. Offsets depend on the layout family, which is detected from
//! the engine version at 0x04 (see [`crate::format`]).
//!
//! # Usage
//!
//! ```no_run
//! use bwrep_parser::header::decode_header;
//!
//! let data = std::fs::read("game.rep").unwrap();
//! let (header, players) = decode_header(&data).unwrap();
//!
//! println!("Map: {}", header.map_name);
//! println!("Duration: {}", header.duration());
//! for player in &players {
//!     println!("  {} ({})", player.name, player.race);
//! }
//! ```
//!
//! # Sanity checks
//!
//! Decoding fails before any field is returned when:
//! - the buffer is shorter than 100 bytes (`TooShort`)
//! - the signature word is all zero or all 0xFF (`InvalidSignature`)
//! - the engine version is 0 or above 255 (`UnsupportedEngineVersion`)
//! - the buffer ends inside the fixed fields (`UnexpectedEof`)

pub mod player;

pub use player::{PlayerSlot, Race, SlotType};

use chrono::DateTime;

use crate::binary::{decode_text, read_bytes, ByteCursor, DecodedText};
use crate::error::{ParserError, Result};
use crate::format::{
    HeaderLayout, ReplayFormat, ENGINE_VERSION_OFFSET, MAX_ENGINE_VERSION, MIN_REPLAY_SIZE,
    SIGNATURE_OFFSET,
};
use crate::timing::duration_string;

/// Decoded fixed header fields.
///
/// Created once per decode and never modified afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplayHeader {
    /// Magic word at 0x00.
    pub signature: [u8; 4],

    /// Engine version at 0x04; >= 74 means Remastered.
    pub engine_version: u32,

    /// Layout family derived from `engine_version`.
    pub format: ReplayFormat,

    /// Total simulated frames.
    pub frame_count: u32,

    /// Save timestamp in Unix seconds.
    pub save_time: u32,

    /// Map name.
    pub map_name: String,

    /// Name of the player who created the game lobby.
    pub game_creator: String,

    /// Map width in tiles.
    pub map_width: u16,

    /// Map height in tiles.
    pub map_height: u16,
}

impl ReplayHeader {
    /// Parses the fixed header fields.
    ///
    /// # Errors
    ///
    /// - `ParserError::TooShort` if the buffer is under 100 bytes
    /// - `ParserError::InvalidSignature` / `UnsupportedEngineVersion` if the
    ///   preamble fails its sanity checks
    /// - `ParserError::UnexpectedEof` if the fixed fields are truncated
    /// - `ParserError::EncodingError` if a non-empty map name decodes to nothing
    pub fn parse(data: &[u8]) -> Result<Self> {
        if data.len() < MIN_REPLAY_SIZE {
            return Err(ParserError::TooShort {
                length: data.len(),
                minimum: MIN_REPLAY_SIZE,
            });
        }

        let mut cursor = ByteCursor::at(data, SIGNATURE_OFFSET);
        let signature_slice = cursor.read_bytes(4)?;
        if signature_slice.iter().all(|&b| b == 0x00) || signature_slice.iter().all(|&b| b == 0xFF)
        {
            return Err(ParserError::invalid_signature(signature_slice));
        }
        let mut signature = [0u8; 4];
        signature.copy_from_slice(signature_slice);

        cursor.set_position(ENGINE_VERSION_OFFSET);
        let engine_version = cursor.read_u32_le()?;
        if engine_version == 0 || engine_version > MAX_ENGINE_VERSION {
            return Err(ParserError::UnsupportedEngineVersion {
                version: engine_version,
            });
        }

        let format = ReplayFormat::from_engine_version(engine_version);
        let layout = HeaderLayout::for_format(format);

        // Check the whole fixed region up front so no partial header escapes
        read_bytes(data, 0, layout.fixed_fields_end())?;

        cursor.set_position(layout.frame_count.offset);
        let frame_count = cursor.read_u32_le()?;

        cursor.set_position(layout.save_time.offset);
        let save_time = cursor.read_u32_le()?;

        cursor.set_position(layout.map_name.offset);
        let raw_map_name = cursor.read_bytes(layout.map_name.width)?;
        let map_name = required_text(decode_text(raw_map_name), "map name", raw_map_name)?;

        cursor.set_position(layout.game_creator.offset);
        let game_creator = cursor.read_fixed_string(layout.game_creator.width)?;

        cursor.set_position(layout.map_width.offset);
        let map_width = cursor.read_u16_le()?;

        cursor.set_position(layout.map_height.offset);
        let map_height = cursor.read_u16_le()?;

        Ok(ReplayHeader {
            signature,
            engine_version,
            format,
            frame_count,
            save_time,
            map_name,
            game_creator: game_creator.trim().to_string(),
            map_width,
            map_height,
        })
    }

    /// Returns the layout this header was decoded with.
    #[must_use]
    pub fn layout(&self) -> &'static HeaderLayout {
        HeaderLayout::for_format(self.format)
    }

    /// Returns whether this is a Remastered replay.
    #[must_use]
    pub fn is_remastered(&self) -> bool {
        self.format == ReplayFormat::Remastered
    }

    /// Returns the game length formatted as `mm:ss` (or `h:mm:ss`).
    #[must_use]
    pub fn duration(&self) -> String {
        duration_string(self.frame_count)
    }

    /// Returns the save time as an RFC 3339 UTC timestamp.
    #[must_use]
    pub fn save_time_utc(&self) -> Option<String> {
        DateTime::from_timestamp(i64::from(self.save_time), 0).map(|t| t.to_rfc3339())
    }

    /// Returns the signature as printable text, hex-escaping other bytes.
    #[must_use]
    pub fn signature_string(&self) -> String {
        self.signature
            .iter()
            .map(|&b| {
                if b.is_ascii_graphic() {
                    char::from(b).to_string()
                } else {
                    format!("\\x{b:02X}")
                }
            })
            .collect()
    }
}

/// Rejects a required text field that held bytes but decoded to nothing.
fn required_text(decoded: DecodedText, field: &'static str, raw: &[u8]) -> Result<String> {
    let text = decoded.text.trim().to_string();
    let had_content = raw.first().is_some_and(|&b| b != 0);
    if text.is_empty() && had_content {
        return Err(ParserError::EncodingError {
            field,
            reason: format!(
                "no printable characters after {:?} decoding",
                decoded.encoding
            ),
        });
    }
    Ok(text)
}

/// Decodes the header and the active player slots.
///
/// Errors propagate immediately; a partially decoded header is never
/// returned.
///
/// # Errors
///
/// See [`ReplayHeader::parse`] and [`PlayerSlot::parse_table`].
pub fn decode_header(data: &[u8]) -> Result<(ReplayHeader, Vec<PlayerSlot>)> {
    let header = ReplayHeader::parse(data)?;
    let players = PlayerSlot::parse_table(data, header.layout())?;
    Ok((header, players))
}
