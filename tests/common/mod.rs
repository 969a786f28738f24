//! Synthetic replay construction shared by the integration tests.

#![allow(dead_code)]

use bwrep_parser::format::{HeaderLayout, CLASSIC_LAYOUT, REMASTERED_LAYOUT};

/// Offset the command stream is written at.
pub const STREAM_OFFSET: usize = 633;

/// One minute of game time.
pub const ONE_MINUTE: u32 = 1440;

/// Builds a replay buffer byte by byte.
pub struct ReplayBuilder {
    engine_version: u32,
    frame_count: u32,
    map_name: Vec<u8>,
    players: Vec<(usize, &'static str, u8)>,
    stream: Vec<u8>,
    padding: usize,
}

impl ReplayBuilder {
    /// A Remastered replay with Alice (Terran) and Bob (Zerg) in slots 0 and 1.
    pub fn remastered() -> Self {
        Self {
            engine_version: 74,
            frame_count: ONE_MINUTE,
            map_name: b"Fighting Spirit".to_vec(),
            players: vec![(0, "Alice", 1), (1, "Bob", 0)],
            stream: Vec::new(),
            padding: 200,
        }
    }

    /// Same players on the Classic layout.
    pub fn classic() -> Self {
        Self {
            engine_version: 59,
            ..Self::remastered()
        }
    }

    pub fn engine_version(mut self, version: u32) -> Self {
        self.engine_version = version;
        self
    }

    pub fn frame_count(mut self, frames: u32) -> Self {
        self.frame_count = frames;
        self
    }

    pub fn map_name(mut self, name: &[u8]) -> Self {
        self.map_name = name.to_vec();
        self
    }

    /// Raw command stream bytes.
    pub fn stream(mut self, bytes: &[u8]) -> Self {
        self.stream.extend_from_slice(bytes);
        self
    }

    /// Zero bytes appended after the stream.
    pub fn padding(mut self, len: usize) -> Self {
        self.padding = len;
        self
    }

    fn layout(&self) -> &'static HeaderLayout {
        if self.engine_version >= 74 {
            &REMASTERED_LAYOUT
        } else {
            &CLASSIC_LAYOUT
        }
    }

    pub fn build(&self) -> Vec<u8> {
        let layout = self.layout();
        let mut data = vec![0u8; STREAM_OFFSET];

        data[0..4].copy_from_slice(b"seRS");
        data[4..8].copy_from_slice(&self.engine_version.to_le_bytes());
        put(&mut data, layout.frame_count.offset, &self.frame_count.to_le_bytes());
        put(&mut data, layout.save_time.offset, &1_700_000_000u32.to_le_bytes());
        put(&mut data, layout.map_name.offset, &self.map_name);
        put(&mut data, layout.game_creator.offset, b"Host");
        put(&mut data, layout.map_width.offset, &128u16.to_le_bytes());
        put(&mut data, layout.map_height.offset, &128u16.to_le_bytes());

        for &(slot, name, race) in &self.players {
            let base = layout.slot_offset(slot);
            put(&mut data, base + layout.slot.name.offset, name.as_bytes());
            data[base + layout.slot.slot_type] = 2;
            data[base + layout.slot.race] = race;
            data[base + layout.slot.team] = u8::try_from(slot).unwrap();
            data[base + layout.slot.color] = u8::try_from(slot).unwrap();
        }

        data.extend_from_slice(&self.stream);
        data.resize(data.len() + self.padding, 0);
        data
    }
}

fn put(data: &mut [u8], offset: usize, bytes: &[u8]) {
    data[offset..offset + bytes.len()].copy_from_slice(bytes);
}

/// `count` Stop commands for `player`, one per frame.
pub fn stops(player: u8, count: usize) -> Vec<u8> {
    let mut stream = Vec::new();
    for _ in 0..count {
        stream.extend_from_slice(&[0x1A, player, 0x00, 0x00]);
    }
    stream
}

/// A Build command.
pub fn build(player: u8, unit: u16, x: u16, y: u16) -> Vec<u8> {
    let mut bytes = vec![0x0C, player];
    bytes.extend_from_slice(&unit.to_le_bytes());
    bytes.extend_from_slice(&x.to_le_bytes());
    bytes.extend_from_slice(&y.to_le_bytes());
    bytes
}

/// A Train command.
pub fn train(player: u8, unit: u16) -> Vec<u8> {
    let mut bytes = vec![0x1F, player];
    bytes.extend_from_slice(&unit.to_le_bytes());
    bytes
}

/// `count` frame markers.
pub fn frames(count: usize) -> Vec<u8> {
    vec![0x00; count]
}
