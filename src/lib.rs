//! # bwrep-parser
//!
//! A StarCraft: Brood War / Remastered replay (.rep) decoder.
//!
//! This library decodes the fixed-offset replay header and player slots,
//! locates and decodes the per-frame command stream, and derives per-player
//! activity metrics (APM/EAPM) and build orders. Both header layout families
//! are supported:
//! - **Remastered** (engine version >= 74)
//! - **Classic** (engine version < 74)
//!
//! ## Quick Start
//!
//! ```no_run
//! use bwrep_parser::{Replay, Result};
//!
//! fn summarize(data: &[u8]) -> Result<()> {
//!     let replay = Replay::decode(data)?;
//!
//!     println!("Map: {}", replay.header.map_name);
//!     println!("Duration: {}", replay.header.duration());
//!     for player in &replay.players {
//!         let metrics = &replay.metrics[&player.id];
//!         println!("{} ({}): {} APM, {} EAPM",
//!             player.name, player.race, metrics.apm, metrics.eapm);
//!     }
//!     println!("Reliability: {}", replay.reliability());
//!     Ok(())
//! }
//! ```
//!
//! ## Module Overview
//!
//! - [`error`] - Error types, the failure taxonomy and result alias
//! - [`binary`] - Bounds-checked little-endian reading and text decoding
//! - [`format`] - Format detection and header layouts
//! - [`header`] - Header and player slot decoding
//! - [`decompress`] - Unwrapping of zlib-packed input
//! - [`actions`] - Command stream location, decoding and classification
//! - [`analysis`] - APM/EAPM and build orders
//! - [`diagnostics`] - Decode counters and the reliability verdict
//! - [`config`] - Decoder configuration
//! - [`replay`] - The end-to-end pipeline and its serializable report
//!
//! ## Format Reference
//!
//! All multi-byte integers are little-endian. The command stream is a flat
//! byte sequence in which `0x00` advances the frame counter and every other
//! recognised byte starts a fixed-length command. The engine runs at 24
//! frames per game second.

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod actions;
pub mod analysis;
pub mod binary;
pub mod config;
pub mod decompress;
pub mod diagnostics;
pub mod error;
pub mod format;
pub mod header;
pub mod replay;
pub mod timing;
pub mod units;

// Re-export commonly used types at the crate root
pub use actions::{
    Action, ActionCategory, ActionFlags, ActionStream, CommandDecoder, OpcodeTable,
    TerminationReason,
};
pub use analysis::{BuildOrderEntry, PlayerMetrics};
pub use config::DecoderConfig;
pub use diagnostics::{DecodeDiagnostics, Reliability};
pub use error::{ErrorKind, ErrorReport, ParserError, Result};
pub use format::{detect_format, ReplayFormat};
pub use header::{decode_header, PlayerSlot, Race, ReplayHeader};
pub use replay::{Replay, ReplayReport};
