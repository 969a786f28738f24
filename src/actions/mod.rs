//! Command stream decoding.
//!
//! This module turns the raw command stream into classified player actions:
//! locating where the stream starts, decoding it opcode by opcode, and
//! deriving classification flags.
//!
//! # Overview
//!
//! Each decoded action has:
//! - The frame it was issued on (the stream's frame markers are counted)
//! - The issuing player's slot id
//! - The opcode, its name and its category from the [`OpcodeTable`]
//! - Typed payload fields: unit id and name, target coordinates
//!
//! # Categories
//!
//! | Category | Opcodes | Counts toward EAPM |
//! |----------|---------|--------------------|
//! | Build | 0x0C | yes |
//! | Train | 0x1F | yes |
//! | Micro | 0x14, 0x15, 0x1A, 0x2B, 0x60, 0x61 | yes |
//! | Selection | 0x09-0x0B, 0x63-0x65 | no |
//! | Other | everything else | no |
//!
//! # Example
//!
//! ```no_run
//! use bwrep_parser::actions::{locate_command_stream, CommandDecoder, DecodeLimits, OpcodeTable};
//! use bwrep_parser::config::DecoderConfig;
//! use bwrep_parser::header::decode_header;
//!
//! let data = std::fs::read("game.rep").unwrap();
//! let (header, players) = decode_header(&data).unwrap();
//! let config = DecoderConfig::default();
//!
//! let table = OpcodeTable::for_format(header.format);
//! let location = locate_command_stream(&data, table, &config.locator).unwrap();
//! let ids: Vec<u8> = players.iter().map(|p| p.id).collect();
//! let limits = DecodeLimits::from_config(&config, header.frame_count);
//!
//! for action in CommandDecoder::new(&data, location.offset, table, &ids, limits) {
//!     println!("{action}");
//! }
//! ```

mod classify;
mod locator;
mod opcodes;
mod parser;
mod types;

pub use classify::{classify, ActionFlags};
pub use locator::{locate_command_stream, score_candidate, CandidateScore, StreamLocation};
pub use opcodes::{
    ActionCategory, OpcodeInfo, OpcodeTable, PayloadShape, CLASSIC_OPCODES, CLASSIC_TABLE,
    REMASTERED_OPCODES, REMASTERED_TABLE,
};
pub use parser::{
    CommandDecoder, DecodeLimits, DecodeStats, DecoderState, TerminationReason, FRAME_MARKER,
};
pub use types::{Action, ActionStream};
