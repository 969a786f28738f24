//! High-level decode pipeline and the serializable report.
//!
//! [`Replay::decode`] runs every stage:
//!
//! 1. unwrap zlib-packed input (falling back to the raw bytes if they hold a
//!    valid header)
//! 2. decode the header and player slots
//! 3. locate the command stream
//! 4. decode and classify actions
//! 5. derive metrics and build orders
//!
//! Header failures abort the decode. A command stream that cannot be located
//! yields an `unrecoverable` result with no actions, unless
//! [`DecoderConfig::strict`] is set.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::path::Path;

use serde::Serialize;
use tracing::{debug, warn};

use crate::actions::{locate_command_stream, ActionStream, CommandDecoder, DecodeLimits, OpcodeTable};
use crate::analysis::{compute_metrics, extract_build_orders, BuildOrderEntry, PlayerMetrics};
use crate::config::DecoderConfig;
use crate::decompress::unwrap_input;
use crate::diagnostics::{DecodeDiagnostics, Reliability};
use crate::error::{ParserError, Result};
use crate::format::ReplayFormat;
use crate::header::{decode_header, PlayerSlot, ReplayHeader};

/// Decoder identifier reported in `dataQuality.source`.
pub const SOURCE: &str = concat!("bwrep-parser/", env!("CARGO_PKG_VERSION"));

/// A fully decoded replay.
#[derive(Debug, Clone)]
pub struct Replay {
    /// Fixed header fields.
    pub header: ReplayHeader,
    /// Active player slots in table order.
    pub players: Vec<PlayerSlot>,
    /// Decoded actions in stream order.
    pub actions: ActionStream,
    /// APM and EAPM by player id.
    pub metrics: BTreeMap<u8, PlayerMetrics>,
    /// Build orders by player id.
    pub build_orders: BTreeMap<u8, Vec<BuildOrderEntry>>,
    /// Decode counters and reliability verdict.
    pub diagnostics: DecodeDiagnostics,
}

impl Replay {
    /// Decodes a replay buffer with the default configuration.
    ///
    /// # Errors
    ///
    /// Returns the header, decompression or configuration error that stopped
    /// the decode. See [`ParserError::kind`] for the taxonomy.
    pub fn decode(data: &[u8]) -> Result<Self> {
        Self::decode_with(data, &DecoderConfig::default())
    }

    /// Decodes a replay buffer.
    ///
    /// # Errors
    ///
    /// As [`Replay::decode`]; additionally `ParserError::InvalidConfig` for
    /// a bad configuration and `ParserError::CommandStreamNotFound` in
    /// strict mode.
    pub fn decode_with(data: &[u8], config: &DecoderConfig) -> Result<Self> {
        config.validate()?;
        let (data, (header, players)) = open_input(data)?;
        debug!(
            format = %header.format,
            engine_version = header.engine_version,
            frame_count = header.frame_count,
            players = players.len(),
            "decoded replay header"
        );

        let table = OpcodeTable::for_format(header.format);
        let location = match locate_command_stream(&data, table, &config.locator) {
            Ok(location) => location,
            Err(err @ ParserError::CommandStreamNotFound { .. }) if !config.strict => {
                warn!(error = %err, "command stream not found, returning header only");
                return Ok(Self::without_commands(header, players));
            }
            Err(err) => return Err(err),
        };

        let player_ids: Vec<u8> = players.iter().map(|player| player.id).collect();
        let limits = DecodeLimits::from_config(config, header.frame_count);
        let (actions, stats) =
            CommandDecoder::new(&data, location.offset, table, &player_ids, limits).decode_all();

        let diagnostics = DecodeDiagnostics::from_decode(&location, &stats, header.frame_count);
        let metrics = compute_metrics(&actions, &players, header.frame_count);
        let build_orders = extract_build_orders(&actions, &players);

        Ok(Self {
            header,
            players,
            actions,
            metrics,
            build_orders,
            diagnostics,
        })
    }

    /// Reads and decodes a replay file with the default configuration.
    ///
    /// # Errors
    ///
    /// Returns `ParserError::IoError` if the file cannot be read, otherwise
    /// as [`Replay::decode`].
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_file_with(path, &DecoderConfig::default())
    }

    /// Reads and decodes a replay file.
    ///
    /// # Errors
    ///
    /// As [`Replay::from_file`] and [`Replay::decode_with`].
    pub fn from_file_with(path: impl AsRef<Path>, config: &DecoderConfig) -> Result<Self> {
        let data = std::fs::read(path)?;
        Self::decode_with(&data, config)
    }

    fn without_commands(header: ReplayHeader, players: Vec<PlayerSlot>) -> Self {
        let actions = ActionStream::default();
        let metrics = compute_metrics(&actions, &players, header.frame_count);
        let build_orders = extract_build_orders(&actions, &players);
        Self {
            header,
            players,
            actions,
            metrics,
            build_orders,
            diagnostics: DecodeDiagnostics::unrecoverable(),
        }
    }

    /// Returns the reliability verdict.
    #[must_use]
    pub fn reliability(&self) -> Reliability {
        self.diagnostics.reliability
    }

    /// Returns the player in slot `id`.
    #[must_use]
    pub fn player(&self, id: u8) -> Option<&PlayerSlot> {
        self.players.iter().find(|player| player.id == id)
    }

    /// Builds the serializable report without the action list.
    #[must_use]
    pub fn report(&self) -> ReplayReport {
        ReplayReport {
            header: HeaderReport::from(&self.header),
            players: self.players.iter().map(PlayerReport::from).collect(),
            metrics: self.metrics.clone(),
            build_orders: self.build_orders.clone(),
            data_quality: DataQuality {
                reliability: self.diagnostics.reliability,
                commands_found: self.actions.len(),
                source: SOURCE.to_string(),
            },
            diagnostics: self.diagnostics.clone(),
            actions: None,
        }
    }

    /// Builds the serializable report including every decoded action.
    #[must_use]
    pub fn report_with_actions(&self) -> ReplayReport {
        ReplayReport {
            actions: Some(self.actions.clone()),
            ..self.report()
        }
    }
}

/// Unwraps zlib-packed input and decodes the header.
///
/// A plain replay whose signature happens to start like a zlib header is
/// decoded as-is when inflating it, or decoding the inflated header, fails.
/// The inflation error is reported only if the raw buffer fails as well.
fn open_input(data: &[u8]) -> Result<(Cow<'_, [u8]>, (ReplayHeader, Vec<PlayerSlot>))> {
    let unpacked = match unwrap_input(data) {
        Ok(Cow::Borrowed(raw)) => return Ok((Cow::Borrowed(raw), decode_header(raw)?)),
        unpacked => unpacked,
    };

    let inflated = unpacked.and_then(|inflated| {
        let decoded = decode_header(&inflated)?;
        Ok((inflated, decoded))
    });
    match inflated {
        Ok(found) => Ok(found),
        Err(err) => match decode_header(data) {
            Ok(decoded) => {
                debug!(error = %err, "zlib-like signature, decoding input as plain replay");
                Ok((Cow::Borrowed(data), decoded))
            }
            Err(_) => Err(err),
        },
    }
}

/// Serializable decode result.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplayReport {
    /// Header fields.
    pub header: HeaderReport,
    /// Active players.
    pub players: Vec<PlayerReport>,
    /// APM and EAPM by player id.
    pub metrics: BTreeMap<u8, PlayerMetrics>,
    /// Build orders by player id.
    pub build_orders: BTreeMap<u8, Vec<BuildOrderEntry>>,
    /// Reliability summary.
    pub data_quality: DataQuality,
    /// Full decode counters.
    pub diagnostics: DecodeDiagnostics,
    /// Every decoded action, when requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actions: Option<ActionStream>,
}

/// Header fields plus formatted duration and save time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeaderReport {
    /// Signature, non-printable bytes hex-escaped.
    pub signature: String,
    /// Engine version.
    pub engine_version: u32,
    /// Layout family.
    pub format: ReplayFormat,
    /// Total frames.
    pub frame_count: u32,
    /// Game length as `mm:ss` or `h:mm:ss`.
    pub duration: String,
    /// Map name.
    pub map_name: String,
    /// Lobby creator.
    pub game_creator: String,
    /// Map width in tiles.
    pub map_width: u16,
    /// Map height in tiles.
    pub map_height: u16,
    /// Save time, Unix seconds.
    pub save_time: u32,
    /// Save time as RFC 3339.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub save_time_utc: Option<String>,
}

impl From<&ReplayHeader> for HeaderReport {
    fn from(header: &ReplayHeader) -> Self {
        Self {
            signature: header.signature_string(),
            engine_version: header.engine_version,
            format: header.format,
            frame_count: header.frame_count,
            duration: header.duration(),
            map_name: header.map_name.clone(),
            game_creator: header.game_creator.clone(),
            map_width: header.map_width,
            map_height: header.map_height,
            save_time: header.save_time,
            save_time_utc: header.save_time_utc(),
        }
    }
}

/// Player slot with the race resolved to a display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerReport {
    /// Slot id.
    pub id: u8,
    /// Player name.
    pub name: String,
    /// Race display name.
    pub race: &'static str,
    /// Team number.
    pub team: u8,
    /// Color index.
    pub color: u8,
    /// Whether a human played this slot.
    pub is_human: bool,
}

impl From<&PlayerSlot> for PlayerReport {
    fn from(player: &PlayerSlot) -> Self {
        Self {
            id: player.id,
            name: player.name.clone(),
            race: player.race_name(),
            team: player.team,
            color: player.color,
            is_human: player.is_human(),
        }
    }
}

/// Reliability summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DataQuality {
    /// Verdict.
    pub reliability: Reliability,
    /// Number of decoded actions.
    pub commands_found: usize,
    /// Decoder identifier.
    pub source: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::header::{Race, SlotType};

    #[test]
    fn test_source_identifier() {
        assert!(SOURCE.starts_with("bwrep-parser/"));
        assert!(SOURCE.len() > "bwrep-parser/".len());
    }

    #[test]
    fn test_player_report() {
        let slot = PlayerSlot {
            id: 3,
            name: "Bisu".to_string(),
            race: Race::Protoss,
            team: 2,
            color: 5,
            slot_type: SlotType::Human,
        };
        let report = PlayerReport::from(&slot);
        assert_eq!(report.race, "Protoss");
        assert!(report.is_human);

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["id"], 3);
        assert_eq!(json["isHuman"], true);
    }
}
