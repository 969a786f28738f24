//! Player slot table decoding.
//!
//! The slot table holds up to 8 records of 36 bytes each. Within a record
//! (offsets per [`SlotLayout`]):
//!
//! | Field | Remastered offset | Size |
//! |-------|-------------------|------|
//! | name | +0x00 | 25 (text) |
//! | slot type | +0x1B | 1 |
//! | race | +0x1C | 1 |
//! | team | +0x1D | 1 |
//! | color | +0x1F | 1 |
//!
//! A slot is active iff its type is computer or human and its decoded name
//! is non-empty. Only active slots are returned; each keeps its table index
//! as the player id used by the command stream. An occupied slot whose name
//! bytes decode to nothing printable is an `EncodingError`.

use std::fmt;

use serde::Serialize;

use super::required_text;
use crate::binary::{decode_text, read_bytes, read_u8, ByteCursor};
use crate::error::Result;
use crate::format::{HeaderLayout, SlotLayout, MAX_PLAYER_SLOTS, PLAYER_SLOT_SIZE};

/// Player race.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Race {
    /// Encoded as 0.
    Zerg,
    /// Encoded as 1.
    Terran,
    /// Encoded as 2.
    Protoss,
    /// Encoded as 6.
    Random,
    /// Any other byte, preserved as read.
    Unknown(u8),
}

impl Race {
    /// Decodes a race byte.
    #[must_use]
    pub const fn from_byte(byte: u8) -> Self {
        match byte {
            0 => Race::Zerg,
            1 => Race::Terran,
            2 => Race::Protoss,
            6 => Race::Random,
            n => Race::Unknown(n),
        }
    }

    /// Returns the display name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Race::Zerg => "Zerg",
            Race::Terran => "Terran",
            Race::Protoss => "Protoss",
            Race::Random => "Random",
            Race::Unknown(_) => "Unknown",
        }
    }
}

impl fmt::Display for Race {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Who occupies a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SlotType {
    /// Empty or closed slot.
    Inactive,
    /// AI player.
    Computer,
    /// Human player.
    Human,
}

impl SlotType {
    /// Decodes a slot type byte; anything unrecognised is inactive.
    #[must_use]
    pub const fn from_byte(byte: u8) -> Self {
        match byte {
            1 => SlotType::Computer,
            2 => SlotType::Human,
            _ => SlotType::Inactive,
        }
    }

    /// Returns whether a player can occupy this slot.
    #[must_use]
    pub const fn is_occupied(&self) -> bool {
        matches!(self, SlotType::Computer | SlotType::Human)
    }
}

/// An active player slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayerSlot {
    /// Slot index in the table; the player id used by commands.
    pub id: u8,
    /// Player name.
    pub name: String,
    /// Race.
    pub race: Race,
    /// Team number.
    pub team: u8,
    /// Color index.
    pub color: u8,
    /// Slot occupant type.
    pub slot_type: SlotType,
}

impl PlayerSlot {
    /// Decodes one 36-byte slot record.
    ///
    /// Returns `Ok(None)` for inactive or nameless slots.
    ///
    /// # Errors
    ///
    /// - `ParserError::UnexpectedEof` if the record is truncated
    /// - `ParserError::EncodingError` if an occupied slot's name holds bytes
    ///   but decodes to nothing
    pub fn parse(record: &[u8], id: u8, layout: &SlotLayout) -> Result<Option<Self>> {
        read_bytes(record, 0, PLAYER_SLOT_SIZE)?;

        let slot_type = SlotType::from_byte(read_u8(record, layout.slot_type)?);
        if !slot_type.is_occupied() {
            return Ok(None);
        }

        let mut cursor = ByteCursor::at(record, layout.name.offset);
        let raw_name = cursor.read_bytes(layout.name.width)?;
        let name = required_text(decode_text(raw_name), "player name", raw_name)?;
        if name.is_empty() {
            return Ok(None);
        }

        Ok(Some(PlayerSlot {
            id,
            name,
            race: Race::from_byte(read_u8(record, layout.race)?),
            team: read_u8(record, layout.team)?,
            color: read_u8(record, layout.color)?,
            slot_type,
        }))
    }

    /// Decodes the slot table, returning the active slots in table order.
    ///
    /// Slots that would run past the end of the buffer are not read.
    ///
    /// # Errors
    ///
    /// Returns `ParserError::UnexpectedEof` if not even the first slot fits.
    pub fn parse_table(data: &[u8], layout: &HeaderLayout) -> Result<Vec<Self>> {
        read_bytes(data, layout.slot_offset(0), PLAYER_SLOT_SIZE)?;

        let mut players = Vec::new();
        for (index, id) in (0..MAX_PLAYER_SLOTS).zip(0u8..) {
            let Ok(record) = read_bytes(data, layout.slot_offset(index), PLAYER_SLOT_SIZE) else {
                break;
            };
            if let Some(player) = Self::parse(record, id, &layout.slot)? {
                players.push(player);
            }
        }
        Ok(players)
    }

    /// Returns whether this slot is played by a human.
    #[must_use]
    pub fn is_human(&self) -> bool {
        self.slot_type == SlotType::Human
    }

    /// Returns the race display name.
    #[must_use]
    pub fn race_name(&self) -> &'static str {
        self.race.name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::{CLASSIC_LAYOUT, REMASTERED_LAYOUT};
    use crate::error::ParserError;

    fn record(name: &[u8], slot_type: u8, race: u8, team: u8, color: u8) -> Vec<u8> {
        let layout = REMASTERED_LAYOUT.slot;
        let mut rec = vec![0u8; PLAYER_SLOT_SIZE];
        rec[..name.len()].copy_from_slice(name);
        rec[layout.slot_type] = slot_type;
        rec[layout.race] = race;
        rec[layout.team] = team;
        rec[layout.color] = color;
        rec
    }

    #[test]
    fn test_parse_human_slot() {
        let rec = record(b"Flash", 2, 1, 1, 3);
        let player = PlayerSlot::parse(&rec, 0, &REMASTERED_LAYOUT.slot)
            .unwrap()
            .unwrap();

        assert_eq!(player.id, 0);
        assert_eq!(player.name, "Flash");
        assert_eq!(player.race, Race::Terran);
        assert_eq!(player.race_name(), "Terran");
        assert_eq!(player.team, 1);
        assert_eq!(player.color, 3);
        assert!(player.is_human());
    }

    #[test]
    fn test_parse_computer_slot() {
        let rec = record(b"Computer", 1, 2, 2, 0);
        let player = PlayerSlot::parse(&rec, 4, &REMASTERED_LAYOUT.slot)
            .unwrap()
            .unwrap();
        assert_eq!(player.slot_type, SlotType::Computer);
        assert_eq!(player.race, Race::Protoss);
        assert!(!player.is_human());
    }

    #[test]
    fn test_inactive_slot_skipped() {
        let rec = record(b"Ghost", 0, 0, 0, 0);
        assert!(PlayerSlot::parse(&rec, 0, &REMASTERED_LAYOUT.slot)
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_nameless_slot_skipped() {
        let rec = record(b"", 2, 0, 0, 0);
        assert!(PlayerSlot::parse(&rec, 0, &REMASTERED_LAYOUT.slot)
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_unprintable_name_on_occupied_slot() {
        let rec = record(&[0x01, 0x02, 0x03, 0x04], 2, 0, 0, 0);
        assert!(matches!(
            PlayerSlot::parse(&rec, 0, &REMASTERED_LAYOUT.slot),
            Err(ParserError::EncodingError {
                field: "player name",
                ..
            })
        ));

        // Inactive slots are not decoded at all
        let rec = record(&[0x01, 0x02, 0x03, 0x04], 0, 0, 0, 0);
        assert!(PlayerSlot::parse(&rec, 0, &REMASTERED_LAYOUT.slot)
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_truncated_record() {
        let rec = vec![0u8; 20];
        assert!(matches!(
            PlayerSlot::parse(&rec, 0, &REMASTERED_LAYOUT.slot),
            Err(ParserError::UnexpectedEof { .. })
        ));
    }

    #[test]
    fn test_race_bytes() {
        assert_eq!(Race::from_byte(0), Race::Zerg);
        assert_eq!(Race::from_byte(1), Race::Terran);
        assert_eq!(Race::from_byte(2), Race::Protoss);
        assert_eq!(Race::from_byte(6), Race::Random);
        assert_eq!(Race::from_byte(9), Race::Unknown(9));
        assert_eq!(Race::Unknown(9).to_string(), "Unknown");
    }

    #[test]
    fn test_slot_type_bytes() {
        assert_eq!(SlotType::from_byte(0), SlotType::Inactive);
        assert_eq!(SlotType::from_byte(1), SlotType::Computer);
        assert_eq!(SlotType::from_byte(2), SlotType::Human);
        assert_eq!(SlotType::from_byte(7), SlotType::Inactive);
    }

    #[test]
    fn test_parse_table_keeps_slot_index() {
        let layout = &REMASTERED_LAYOUT;
        let mut data = vec![0u8; layout.slot_offset(MAX_PLAYER_SLOTS)];
        let first = record(b"Bisu", 2, 2, 0, 0);
        let third = record(b"Jaedong", 2, 0, 1, 1);
        data[layout.slot_offset(0)..layout.slot_offset(1)].copy_from_slice(&first);
        data[layout.slot_offset(2)..layout.slot_offset(3)].copy_from_slice(&third);

        let players = PlayerSlot::parse_table(&data, layout).unwrap();
        assert_eq!(players.len(), 2);
        assert_eq!(players[0].id, 0);
        assert_eq!(players[0].name, "Bisu");
        assert_eq!(players[1].id, 2);
        assert_eq!(players[1].name, "Jaedong");
    }

    #[test]
    fn test_parse_table_partial() {
        let layout = &REMASTERED_LAYOUT;
        // Room for exactly two slots
        let mut data = vec![0u8; layout.slot_offset(2)];
        let second = record(b"Stork", 2, 2, 1, 2);
        data[layout.slot_offset(1)..layout.slot_offset(2)].copy_from_slice(&second);

        let players = PlayerSlot::parse_table(&data, layout).unwrap();
        assert_eq!(players.len(), 1);
        assert_eq!(players[0].id, 1);
    }

    #[test]
    fn test_classic_slot_layout() {
        let layout = CLASSIC_LAYOUT.slot;
        let mut rec = vec![0u8; PLAYER_SLOT_SIZE];
        rec[layout.name.offset..layout.name.offset + 4].copy_from_slice(b"Boxx");
        rec[layout.slot_type] = 2;
        rec[layout.race] = 1;

        let player = PlayerSlot::parse(&rec, 1, &layout).unwrap().unwrap();
        assert_eq!(player.name, "Boxx");
        assert_eq!(player.race, Race::Terran);
    }
}
