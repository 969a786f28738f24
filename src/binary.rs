//! Binary reading utilities for decoding replay buffers.
//!
//! This module provides bounds-checked little-endian readers in two shapes:
//! free functions that read at an explicit offset, and [`ByteCursor`], an
//! owned read position threaded by `&mut` through the decode call chain.
//! All reads fail with `ParserError::UnexpectedEof` instead of returning
//! garbage when the buffer is too short.
//!
//! # Strings
//!
//! Fixed-width text fields are null-padded and carry no encoding marker.
//! [`decode_text`] tries, in order:
//!
//! 1. Latin-1, accepted if at least 80% of the characters are printable
//! 2. UTF-8, accepted if valid and at least 80% printable
//! 3. Filtering bytes to the printable ranges 0x20-0x7E and 0xA0-0xFF
//!
//! # Example
//!
//! ```
//! use bwrep_parser::binary::ByteCursor;
//!
//! let data = [0x4A, 0x00, 0x40, 0x05, 0x00, 0x00, b'H', b'i', 0x00, 0x00];
//! let mut cursor = ByteCursor::new(&data);
//!
//! assert_eq!(cursor.read_u16_le().unwrap(), 0x004A);
//! assert_eq!(cursor.read_u32_le().unwrap(), 1344);
//! assert_eq!(cursor.read_fixed_string(4).unwrap(), "Hi");
//! assert!(cursor.is_exhausted());
//! ```

use crate::error::{ParserError, Result};

/// Minimum share of printable characters for a decoding to be accepted.
pub const PRINTABLE_THRESHOLD: f64 = 0.8;

/// Reads a byte at the given offset.
///
/// # Errors
///
/// Returns `ParserError::UnexpectedEof` if `offset` is past the buffer end.
pub fn read_u8(bytes: &[u8], offset: usize) -> Result<u8> {
    bytes
        .get(offset)
        .copied()
        .ok_or_else(|| ParserError::unexpected_eof(offset + 1, bytes.len()))
}

/// Reads a little-endian u16 value from the byte buffer at the given offset.
///
/// # Errors
///
/// Returns `ParserError::UnexpectedEof` if the buffer doesn't contain
/// at least 2 bytes starting from the given offset.
///
/// # Example
///
/// ```
/// use bwrep_parser::binary::read_u16_le;
///
/// let data = [0x34, 0x12, 0xFF, 0xFF];
/// assert_eq!(read_u16_le(&data, 0).unwrap(), 0x1234);
/// assert_eq!(read_u16_le(&data, 2).unwrap(), 0xFFFF);
/// ```
pub fn read_u16_le(bytes: &[u8], offset: usize) -> Result<u16> {
    let slice = read_bytes(bytes, offset, 2)?;
    Ok(u16::from_le_bytes([slice[0], slice[1]]))
}

/// Reads a little-endian u32 value from the byte buffer at the given offset.
///
/// # Errors
///
/// Returns `ParserError::UnexpectedEof` if the buffer doesn't contain
/// at least 4 bytes starting from the given offset.
pub fn read_u32_le(bytes: &[u8], offset: usize) -> Result<u32> {
    let slice = read_bytes(bytes, offset, 4)?;
    Ok(u32::from_le_bytes([slice[0], slice[1], slice[2], slice[3]]))
}

/// Reads a slice of bytes from the buffer at the given offset.
///
/// # Errors
///
/// Returns `ParserError::UnexpectedEof` if the buffer doesn't contain
/// at least `len` bytes starting from the given offset.
pub fn read_bytes(bytes: &[u8], offset: usize, len: usize) -> Result<&[u8]> {
    let end = offset
        .checked_add(len)
        .ok_or_else(|| ParserError::unexpected_eof(usize::MAX, bytes.len()))?;
    bytes
        .get(offset..end)
        .ok_or_else(|| ParserError::unexpected_eof(end, bytes.len()))
}

/// The decoding step that produced a string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    /// Bytes mapped one-to-one onto Latin-1 code points.
    Latin1,
    /// Valid UTF-8.
    Utf8,
    /// Non-printable bytes were dropped.
    FilteredAscii,
}

/// A decoded text field together with the step of the chain that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedText {
    /// The decoded string.
    pub text: String,
    /// Which decoding produced `text`.
    pub encoding: TextEncoding,
}

/// Decodes a raw text field through the Latin-1 / UTF-8 / filter chain.
///
/// The input is truncated at its first null byte before decoding.
///
/// # Example
///
/// ```
/// use bwrep_parser::binary::{decode_text, TextEncoding};
///
/// let decoded = decode_text(b"Fighting Spirit\x00\x00");
/// assert_eq!(decoded.text, "Fighting Spirit");
/// assert_eq!(decoded.encoding, TextEncoding::Latin1);
/// ```
#[must_use]
pub fn decode_text(raw: &[u8]) -> DecodedText {
    let end = raw.iter().position(|&b| b == 0).unwrap_or(raw.len());
    let bytes = &raw[..end];

    let latin1: String = bytes.iter().map(|&b| char::from(b)).collect();
    if printable_ratio(&latin1) >= PRINTABLE_THRESHOLD {
        return DecodedText {
            text: latin1,
            encoding: TextEncoding::Latin1,
        };
    }

    if let Ok(utf8) = std::str::from_utf8(bytes) {
        if printable_ratio(utf8) >= PRINTABLE_THRESHOLD {
            return DecodedText {
                text: utf8.to_string(),
                encoding: TextEncoding::Utf8,
            };
        }
    }

    let filtered = bytes
        .iter()
        .filter(|&&b| (0x20..=0x7E).contains(&b) || b >= 0xA0)
        .map(|&b| char::from(b))
        .collect();
    DecodedText {
        text: filtered,
        encoding: TextEncoding::FilteredAscii,
    }
}

/// Share of non-control characters; an empty string counts as fully printable.
#[allow(clippy::cast_precision_loss)]
fn printable_ratio(text: &str) -> f64 {
    let total = text.chars().count();
    if total == 0 {
        return 1.0;
    }
    let printable = text.chars().filter(|c| !c.is_control()).count();
    printable as f64 / total as f64
}

/// A bounds-checked little-endian reader over an immutable byte buffer.
///
/// The cursor owns its read position. Every read advances the position by
/// the width of the value read; a failed read leaves the position unchanged.
#[derive(Debug, Clone)]
pub struct ByteCursor<'a> {
    data: &'a [u8],
    position: usize,
}

impl<'a> ByteCursor<'a> {
    /// Creates a cursor at position 0.
    #[must_use]
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, position: 0 }
    }

    /// Creates a cursor at the given position, clamped to the buffer length.
    #[must_use]
    pub fn at(data: &'a [u8], position: usize) -> Self {
        Self {
            data,
            position: position.min(data.len()),
        }
    }

    /// Returns the current read position.
    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }

    /// Returns the total buffer length.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns whether the underlying buffer is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns the number of unread bytes.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.data.len() - self.position
    }

    /// Returns whether every byte has been consumed.
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.position >= self.data.len()
    }

    /// Returns whether `n` more bytes can be read. Has no side effect.
    #[must_use]
    pub fn can_read(&self, n: usize) -> bool {
        self.remaining() >= n
    }

    /// Moves the position forward by `n`, clamped to the buffer end.
    pub fn skip(&mut self, n: usize) {
        self.position = self.position.saturating_add(n).min(self.data.len());
    }

    /// Moves to an absolute position, clamped to `[0, len]`.
    pub fn set_position(&mut self, position: usize) {
        self.position = position.min(self.data.len());
    }

    /// Returns the byte at the current position without advancing.
    #[must_use]
    pub fn peek_u8(&self) -> Option<u8> {
        self.data.get(self.position).copied()
    }

    /// Returns the byte `n` positions past the current one without advancing.
    #[must_use]
    pub fn peek_ahead(&self, n: usize) -> Option<u8> {
        self.data.get(self.position.checked_add(n)?).copied()
    }

    /// Reads one byte.
    ///
    /// # Errors
    ///
    /// Returns `ParserError::UnexpectedEof` at the end of the buffer.
    pub fn read_u8(&mut self) -> Result<u8> {
        let value = read_u8(self.data, self.position)?;
        self.position += 1;
        Ok(value)
    }

    /// Reads a little-endian u16.
    ///
    /// # Errors
    ///
    /// Returns `ParserError::UnexpectedEof` if fewer than 2 bytes remain.
    pub fn read_u16_le(&mut self) -> Result<u16> {
        let value = read_u16_le(self.data, self.position)?;
        self.position += 2;
        Ok(value)
    }

    /// Reads a little-endian u32.
    ///
    /// # Errors
    ///
    /// Returns `ParserError::UnexpectedEof` if fewer than 4 bytes remain.
    pub fn read_u32_le(&mut self) -> Result<u32> {
        let value = read_u32_le(self.data, self.position)?;
        self.position += 4;
        Ok(value)
    }

    /// Reads `n` raw bytes.
    ///
    /// # Errors
    ///
    /// Returns `ParserError::UnexpectedEof` if fewer than `n` bytes remain.
    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8]> {
        let slice = read_bytes(self.data, self.position, n)?;
        self.position += n;
        Ok(slice)
    }

    /// Reads an `n` byte text field and reports which decoding was used.
    ///
    /// # Errors
    ///
    /// Returns `ParserError::UnexpectedEof` if fewer than `n` bytes remain.
    pub fn read_fixed_text(&mut self, n: usize) -> Result<DecodedText> {
        self.read_bytes(n).map(decode_text)
    }

    /// Reads an `n` byte null-padded text field.
    ///
    /// # Errors
    ///
    /// Returns `ParserError::UnexpectedEof` if fewer than `n` bytes remain.
    pub fn read_fixed_string(&mut self, n: usize) -> Result<String> {
        self.read_fixed_text(n).map(|decoded| decoded.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ========================
    // Free function tests
    // ========================

    #[test]
    fn test_read_u16_le_basic() {
        let data = [0x34, 0x12];
        assert_eq!(read_u16_le(&data, 0).unwrap(), 0x1234);
    }

    #[test]
    fn test_read_u16_le_overflow() {
        let data = [0x34, 0x12];
        let result = read_u16_le(&data, 1);
        assert!(matches!(
            result,
            Err(ParserError::UnexpectedEof {
                expected: 3,
                available: 2
            })
        ));
    }

    #[test]
    fn test_read_u32_le_frame_count() {
        // 1440 frames = one game minute
        let data = [0xA0, 0x05, 0x00, 0x00];
        assert_eq!(read_u32_le(&data, 0).unwrap(), 1440);
    }

    #[test]
    fn test_read_bytes_offset_overflow() {
        let data = [0u8; 4];
        assert!(read_bytes(&data, usize::MAX, 2).is_err());
    }

    #[test]
    fn test_read_u8_past_end() {
        assert!(matches!(
            read_u8(&[], 0),
            Err(ParserError::UnexpectedEof { .. })
        ));
    }

    // ========================
    // ByteCursor tests
    // ========================

    #[test]
    fn test_cursor_advances_by_width() {
        let data = [0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07];
        let mut cursor = ByteCursor::new(&data);

        assert_eq!(cursor.read_u8().unwrap(), 0x01);
        assert_eq!(cursor.position(), 1);
        assert_eq!(cursor.read_u16_le().unwrap(), 0x0302);
        assert_eq!(cursor.position(), 3);
        assert_eq!(cursor.read_u32_le().unwrap(), 0x0706_0504);
        assert_eq!(cursor.position(), 7);
        assert!(cursor.is_exhausted());
    }

    #[test]
    fn test_cursor_failed_read_keeps_position() {
        let data = [0x01, 0x02, 0x03];
        let mut cursor = ByteCursor::at(&data, 1);

        assert!(cursor.read_u32_le().is_err());
        assert_eq!(cursor.position(), 1);
        assert_eq!(cursor.read_u16_le().unwrap(), 0x0302);
    }

    #[test]
    fn test_cursor_can_read_is_pure() {
        let data = [0u8; 4];
        let cursor = ByteCursor::new(&data);

        assert!(cursor.can_read(4));
        assert!(!cursor.can_read(5));
        assert_eq!(cursor.position(), 0);
    }

    #[test]
    fn test_cursor_skip_and_set_position_clamp() {
        let data = [0u8; 10];
        let mut cursor = ByteCursor::new(&data);

        cursor.skip(4);
        assert_eq!(cursor.position(), 4);
        cursor.skip(100);
        assert_eq!(cursor.position(), 10);
        cursor.set_position(3);
        assert_eq!(cursor.position(), 3);
        cursor.set_position(usize::MAX);
        assert_eq!(cursor.position(), 10);
        assert_eq!(cursor.remaining(), 0);
    }

    #[test]
    fn test_cursor_peek_does_not_advance() {
        let data = [0x0C, 0x01, 0x6A];
        let cursor = ByteCursor::new(&data);

        assert_eq!(cursor.peek_u8(), Some(0x0C));
        assert_eq!(cursor.peek_ahead(1), Some(0x01));
        assert_eq!(cursor.peek_ahead(3), None);
        assert_eq!(cursor.peek_ahead(usize::MAX), None);
        assert_eq!(cursor.position(), 0);
    }

    #[test]
    fn test_cursor_read_bytes() {
        let data = b"seRS\x4A\x00";
        let mut cursor = ByteCursor::new(data);

        assert_eq!(cursor.read_bytes(4).unwrap(), b"seRS");
        assert!(cursor.read_bytes(4).is_err());
        assert_eq!(cursor.read_bytes(2).unwrap(), &[0x4A, 0x00]);
    }

    #[test]
    fn test_cursor_fixed_string_stops_at_null() {
        let data = b"Lost Temple\x00garbage";
        let mut cursor = ByteCursor::new(data);

        assert_eq!(cursor.read_fixed_string(data.len()).unwrap(), "Lost Temple");
        assert!(cursor.is_exhausted());
    }

    // ========================
    // Text decoding tests
    // ========================

    #[test]
    fn test_decode_text_latin1_accents() {
        let decoded = decode_text(&[b'J', 0xE9, b'r', 0xF4, b'm', b'e']);
        assert_eq!(decoded.text, "Jérôme");
        assert_eq!(decoded.encoding, TextEncoding::Latin1);
    }

    #[test]
    fn test_decode_text_utf8_fallback() {
        // UTF-8 "가나" is E0-range lead bytes plus 0x80-0x9F continuation
        // bytes, which Latin-1 maps onto C1 control characters.
        let decoded = decode_text("가나".as_bytes());
        assert_eq!(decoded.text, "가나");
        assert_eq!(decoded.encoding, TextEncoding::Utf8);
    }

    #[test]
    fn test_decode_text_filtered_fallback() {
        let raw = [0x01, 0x02, 0x03, b'A', 0x04, 0x05, b'B', 0x81];
        let decoded = decode_text(&raw);
        assert_eq!(decoded.text, "AB");
        assert_eq!(decoded.encoding, TextEncoding::FilteredAscii);
    }

    #[test]
    fn test_decode_text_empty() {
        let decoded = decode_text(b"\x00\x00\x00");
        assert_eq!(decoded.text, "");
    }

    #[test]
    fn test_printable_ratio() {
        assert!((printable_ratio("abcd") - 1.0).abs() < f64::EPSILON);
        assert!((printable_ratio("ab\u{1}\u{2}") - 0.5).abs() < f64::EPSILON);
        assert!((printable_ratio("") - 1.0).abs() < f64::EPSILON);
    }
}
