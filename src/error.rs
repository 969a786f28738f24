//! Error types for the replay decoder.
//!
//! This module defines the error hierarchy for every failure a decode can
//! report, and maps each error onto the user-facing taxonomy used by
//! callers:
//!
//! | Kind | Typical cause | Recoverable |
//! |------|---------------|-------------|
//! | `FormatError` | Bad signature or engine version | no |
//! | `CommandStreamNotFound` | No candidate offset fits the buffer | no |
//! | `CorruptionError` | Truncated buffer or bad compression | yes |
//! | `EncodingError` | Unreadable map/player name | yes |
//! | `Unknown` | Anything else | yes |

use serde::Serialize;
use thiserror::Error;

/// The main error type for replay decoding operations.
///
/// # Example
///
/// ```
/// use bwrep_parser::error::{ErrorKind, ParserError, Result};
///
/// fn example_operation() -> Result<()> {
///     Err(ParserError::TooShort {
///         length: 12,
///         minimum: 100,
///     })
/// }
///
/// let err = example_operation().unwrap_err();
/// assert_eq!(err.kind(), ErrorKind::CorruptionError);
/// assert!(err.is_recoverable());
/// ```
#[derive(Error, Debug)]
pub enum ParserError {
    /// An I/O error occurred while reading the replay file.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// The signature word at offset 0x00 failed its sanity check.
    #[error("Invalid replay signature: found {found}")]
    InvalidSignature {
        /// The signature bytes found (as hex string for display).
        found: String,
    },

    /// The engine version is outside the range any known replay uses.
    #[error("Unsupported engine version {version}")]
    UnsupportedEngineVersion {
        /// The engine version read from the header.
        version: u32,
    },

    /// The buffer is too short to be a replay at all.
    #[error("Replay too short: {length} bytes, at least {minimum} required")]
    TooShort {
        /// The buffer length.
        length: usize,
        /// The minimum accepted length.
        minimum: usize,
    },

    /// A read ran past the end of the buffer.
    ///
    /// This typically indicates a truncated replay file.
    #[error("Unexpected end of data: expected {expected} bytes, but only {available} available")]
    UnexpectedEof {
        /// The number of bytes that were expected to be available.
        expected: usize,
        /// The actual number of bytes available.
        available: usize,
    },

    /// Inflating a zlib-packed replay buffer failed.
    #[error("Decompression failed: {reason}")]
    DecompressionError {
        /// A description of the decompression failure.
        reason: String,
    },

    /// No candidate offset could host the command stream.
    #[error("Command stream not found in {length} byte buffer ({candidates} candidates tried)")]
    CommandStreamNotFound {
        /// The buffer length.
        length: usize,
        /// The number of candidate offsets evaluated.
        candidates: usize,
    },

    /// A required text field could not be decoded to printable text.
    #[error("Could not decode {field}: {reason}")]
    EncodingError {
        /// The field being decoded (e.g. "map name").
        field: &'static str,
        /// Why every decoding attempt failed.
        reason: String,
    },

    /// A decoder configuration value is invalid.
    #[error("Invalid configuration: {reason}")]
    InvalidConfig {
        /// What makes the configuration invalid.
        reason: String,
    },

    /// Any other failure.
    #[error("{0}")]
    Other(String),
}

/// The user-facing failure taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ErrorKind {
    /// Signature or engine version sanity check failed.
    FormatError,
    /// The command stream could not be located.
    CommandStreamNotFound,
    /// The buffer is truncated or otherwise damaged.
    CorruptionError,
    /// A required string field could not be decoded.
    EncodingError,
    /// Any other failure.
    Unknown,
}

impl ErrorKind {
    /// Returns the stable display name of this kind.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::FormatError => "FormatError",
            ErrorKind::CommandStreamNotFound => "CommandStreamNotFound",
            ErrorKind::CorruptionError => "CorruptionError",
            ErrorKind::EncodingError => "EncodingError",
            ErrorKind::Unknown => "Unknown",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ParserError {
    /// Creates an `UnexpectedEof` error with the given sizes.
    ///
    /// # Arguments
    ///
    /// * `expected` - The number of bytes that were needed
    /// * `available` - The number of bytes actually available
    #[must_use]
    pub fn unexpected_eof(expected: usize, available: usize) -> Self {
        ParserError::UnexpectedEof { expected, available }
    }

    /// Creates an `InvalidSignature` error from the raw signature bytes.
    #[must_use]
    pub fn invalid_signature(found: &[u8]) -> Self {
        ParserError::InvalidSignature {
            found: bytes_to_hex(found),
        }
    }

    /// Maps this error onto the user-facing taxonomy.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            ParserError::InvalidSignature { .. } | ParserError::UnsupportedEngineVersion { .. } => {
                ErrorKind::FormatError
            }
            ParserError::CommandStreamNotFound { .. } => ErrorKind::CommandStreamNotFound,
            ParserError::TooShort { .. }
            | ParserError::UnexpectedEof { .. }
            | ParserError::DecompressionError { .. } => ErrorKind::CorruptionError,
            ParserError::EncodingError { .. } => ErrorKind::EncodingError,
            ParserError::IoError(_) | ParserError::InvalidConfig { .. } | ParserError::Other(_) => {
                ErrorKind::Unknown
            }
        }
    }

    /// Returns whether retrying (with a re-acquired file or different
    /// settings) can plausibly succeed.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        !matches!(
            self.kind(),
            ErrorKind::FormatError | ErrorKind::CommandStreamNotFound
        )
    }

    /// Returns suggested remediation steps for the end user.
    #[must_use]
    pub fn remediation(&self) -> &'static [&'static str] {
        match self.kind() {
            ErrorKind::FormatError => &[
                "Check that the file is a StarCraft: Brood War or Remastered replay (.rep)",
                "Replays from other games or mods are not supported",
            ],
            ErrorKind::CommandStreamNotFound => &[
                "Try a different replay file",
                "Melee replays from the current game patch decode most reliably",
            ],
            ErrorKind::CorruptionError => &[
                "Re-download or re-copy the replay file",
                "Make sure the game finished writing the replay before uploading it",
            ],
            ErrorKind::EncodingError => &[
                "Retry the upload",
                "Map or player names using non-Latin character sets may not decode",
            ],
            ErrorKind::Unknown => &["Retry the operation"],
        }
    }

    /// Builds the serializable report for this error.
    #[must_use]
    pub fn report(&self) -> ErrorReport {
        ErrorReport {
            kind: self.kind(),
            message: self.to_string(),
            recoverable: self.is_recoverable(),
            remediation: self.remediation().iter().map(|s| (*s).to_string()).collect(),
        }
    }
}

/// Serializable description of a failed decode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorReport {
    /// Taxonomy kind.
    pub kind: ErrorKind,
    /// Human-readable message.
    pub message: String,
    /// Whether a retry can plausibly succeed.
    pub recoverable: bool,
    /// Suggested user actions.
    pub remediation: Vec<String>,
}

/// Converts a byte slice to a hexadecimal string representation.
///
/// If the slice is 8 bytes or less, formats as space-separated hex values.
/// If longer, shows the first 8 bytes followed by "...".
fn bytes_to_hex(bytes: &[u8]) -> String {
    let shown = &bytes[..bytes.len().min(8)];
    let prefix = shown
        .iter()
        .map(|b| format!("{b:02X}"))
        .collect::<Vec<_>>()
        .join(" ");
    if bytes.len() <= 8 {
        prefix
    } else {
        format!("{prefix}... ({} bytes total)", bytes.len())
    }
}

/// A specialized Result type for replay decoding operations.
pub type Result<T> = std::result::Result<T, ParserError>;
