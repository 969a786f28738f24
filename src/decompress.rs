//! Input unwrapping for zlib-packed replay buffers.
//!
//! Some tools hand out replays wrapped in a single zlib stream. A buffer whose
//! first two bytes form a valid zlib header (RFC 1950: deflate method, window
//! size <= 32K, no preset dictionary, `(CMF << 8 | FLG) % 31 == 0`) is inflated
//! before decoding; anything else passes through borrowed.
//!
//! # Example
//!
//! ```
//! use bwrep_parser::decompress::unwrap_input;
//!
//! let plain = b"seRS\x4A\x00\x00\x00";
//! let data = unwrap_input(plain).unwrap();
//! assert_eq!(&*data, plain);
//! ```

use std::borrow::Cow;
use std::io::Read;

use flate2::read::ZlibDecoder;
use tracing::debug;

use crate::error::{ParserError, Result};

/// Returns whether `data` starts with a zlib stream header.
#[must_use]
pub fn is_zlib_header(data: &[u8]) -> bool {
    let [cmf, flg, ..] = *data else {
        return false;
    };
    let method = cmf & 0x0F;
    let window = cmf >> 4;
    let preset_dictionary = flg & 0x20 != 0;
    let check = (u16::from(cmf) << 8) | u16::from(flg);
    method == 8 && window <= 7 && !preset_dictionary && check % 31 == 0
}

/// Inflates a zlib stream.
///
/// # Errors
///
/// Returns `ParserError::DecompressionError` if the stream is invalid.
pub fn inflate(data: &[u8]) -> Result<Vec<u8>> {
    let mut result = Vec::with_capacity(data.len().saturating_mul(4));
    let mut decoder = ZlibDecoder::new(data);
    decoder
        .read_to_end(&mut result)
        .map_err(|e| ParserError::DecompressionError {
            reason: format!("zlib stream of {} bytes failed to inflate: {e}", data.len()),
        })?;
    Ok(result)
}

/// Inflates `data` if it is zlib-packed, otherwise borrows it unchanged.
///
/// # Errors
///
/// Returns `ParserError::DecompressionError` if a zlib header is present but
/// the stream behind it is invalid.
pub fn unwrap_input(data: &[u8]) -> Result<Cow<'_, [u8]>> {
    if !is_zlib_header(data) {
        return Ok(Cow::Borrowed(data));
    }
    let inflated = inflate(data)?;
    debug!(
        packed = data.len(),
        inflated = inflated.len(),
        "inflated zlib-packed replay"
    );
    Ok(Cow::Owned(inflated))
}
