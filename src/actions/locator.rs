//! Command stream search.
//!
//! The command stream starts at a small set of typical offsets. Each
//! candidate is scored by looking at the bytes that follow it: a real stream
//! is dense in frame markers (0x00) and known opcodes. The first candidate
//! that clears both thresholds wins. If none does, the configured fallback
//! offset is used and the result is flagged, so the fallback always shows up
//! in diagnostics.

use tracing::{debug, warn};

use super::opcodes::OpcodeTable;
use crate::config::LocatorConfig;
use crate::error::{ParserError, Result};

/// Byte counts for the window following one candidate offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CandidateScore {
    /// Candidate offset.
    pub offset: usize,
    /// Bytes that match a known opcode.
    pub opcodes: usize,
    /// Zero bytes.
    pub markers: usize,
    /// Bytes inspected, less than the window near the buffer end.
    pub inspected: usize,
}

impl CandidateScore {
    /// Share of inspected bytes that are markers or known opcodes.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn confidence(&self) -> f64 {
        if self.inspected == 0 {
            return 0.0;
        }
        (self.opcodes + self.markers) as f64 / self.inspected as f64
    }

    fn passes(&self, config: &LocatorConfig) -> bool {
        self.opcodes >= config.min_opcodes && self.markers >= config.min_markers
    }
}

/// Returns whether enough bytes follow `offset` to hold a passing window.
fn has_room(offset: usize, len: usize, config: &LocatorConfig) -> bool {
    offset
        .saturating_add(config.min_opcodes)
        .saturating_add(config.min_markers)
        <= len
}

/// Where the command stream was judged to start.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StreamLocation {
    /// Offset of the first command stream byte.
    pub offset: usize,
    /// Window confidence in `[0, 1]`.
    pub confidence: f64,
    /// Whether no candidate passed and the fallback was used.
    pub fallback: bool,
    /// Number of candidates scored.
    pub candidates_tried: usize,
}

/// Scores the window of `window` bytes starting at `offset`.
#[must_use]
pub fn score_candidate(
    data: &[u8],
    offset: usize,
    window: usize,
    table: &OpcodeTable,
) -> CandidateScore {
    let end = offset.saturating_add(window).min(data.len());
    let bytes = data.get(offset..end).unwrap_or(&[]);

    let mut score = CandidateScore {
        offset,
        opcodes: 0,
        markers: 0,
        inspected: bytes.len(),
    };
    for &byte in bytes {
        if byte == 0x00 {
            score.markers += 1;
        } else if table.is_known(byte) {
            score.opcodes += 1;
        }
    }
    score
}

/// Finds the start of the command stream.
///
/// A candidate is usable only if at least `min_opcodes + min_markers` bytes
/// follow it; other candidates are skipped. The fallback offset is used when
/// no candidate passes; if it is not usable either, the first usable
/// candidate is used instead.
///
/// # Errors
///
/// Returns `ParserError::CommandStreamNotFound` if neither any candidate nor
/// the fallback offset is usable.
///
/// # Example
///
/// ```
/// use bwrep_parser::actions::{locate_command_stream, OpcodeTable};
/// use bwrep_parser::config::LocatorConfig;
/// use bwrep_parser::format::ReplayFormat;
///
/// let mut data = vec![0u8; 900];
/// for i in 0..10 {
///     data[633 + i * 3] = 0x1A;
/// }
///
/// let table = OpcodeTable::for_format(ReplayFormat::Remastered);
/// let location = locate_command_stream(&data, table, &LocatorConfig::default()).unwrap();
/// assert_eq!(location.offset, 633);
/// assert!(!location.fallback);
/// ```
pub fn locate_command_stream(
    data: &[u8],
    table: &OpcodeTable,
    config: &LocatorConfig,
) -> Result<StreamLocation> {
    let mut tried = 0;
    let mut first_usable = None;

    for &offset in &config.candidate_offsets {
        if !has_room(offset, data.len(), config) {
            debug!(offset, len = data.len(), "no room for a stream after candidate");
            continue;
        }
        tried += 1;
        first_usable.get_or_insert(offset);

        let score = score_candidate(data, offset, config.window, table);
        debug!(
            offset,
            opcodes = score.opcodes,
            markers = score.markers,
            inspected = score.inspected,
            "scored command stream candidate"
        );
        if score.passes(config) {
            return Ok(StreamLocation {
                offset,
                confidence: score.confidence(),
                fallback: false,
                candidates_tried: tried,
            });
        }
    }

    let offset = if has_room(config.fallback_offset, data.len(), config) {
        config.fallback_offset
    } else {
        first_usable.ok_or(ParserError::CommandStreamNotFound {
            length: data.len(),
            candidates: config.candidate_offsets.len(),
        })?
    };

    let score = score_candidate(data, offset, config.window, table);
    warn!(
        offset,
        confidence = score.confidence(),
        "no command stream candidate passed, using fallback offset"
    );
    Ok(StreamLocation {
        offset,
        confidence: score.confidence(),
        fallback: true,
        candidates_tried: tried,
    })
}
