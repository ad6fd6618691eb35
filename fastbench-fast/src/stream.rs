/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Forward-only FAST input stream.
//!
//! [`FastStream`] is the read cursor the decoder consumes. It never moves
//! backwards; skipping past the end leaves it parked at end-of-buffer.

use crate::error::FastError;
use crate::pmap::PresenceMap;

/// Forward-only cursor over an immutable byte buffer.
#[derive(Debug, Clone)]
pub struct FastStream<'a> {
    data: &'a [u8],
    position: usize,
}

impl<'a> FastStream<'a> {
    /// Creates a stream positioned at the start of `data`.
    #[must_use]
    pub const fn new(data: &'a [u8]) -> Self {
        Self { data, position: 0 }
    }

    /// Returns the current byte offset.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.position
    }

    /// Returns the number of unread bytes.
    #[must_use]
    pub const fn remaining(&self) -> usize {
        self.data.len() - self.position
    }

    /// Returns true once every byte has been consumed.
    #[inline]
    #[must_use]
    pub const fn is_eof(&self) -> bool {
        self.position >= self.data.len()
    }

    /// Discards `count` bytes, stopping at end-of-buffer.
    #[inline]
    pub fn skip(&mut self, count: usize) {
        self.position = self.position.saturating_add(count).min(self.data.len());
    }

    /// Reads a single raw byte.
    ///
    /// # Errors
    /// Returns `FastError::UnexpectedEof` at end-of-buffer.
    #[inline]
    pub fn read_byte(&mut self) -> Result<u8, FastError> {
        let byte = *self
            .data
            .get(self.position)
            .ok_or(FastError::UnexpectedEof)?;
        self.position += 1;
        Ok(byte)
    }

    /// Reads `len` raw bytes without copying.
    ///
    /// # Errors
    /// Returns `FastError::UnexpectedEof` if fewer than `len` bytes remain.
    pub fn read_slice(&mut self, len: usize) -> Result<&'a [u8], FastError> {
        if len > self.remaining() {
            return Err(FastError::UnexpectedEof);
        }
        let slice = &self.data[self.position..self.position + len];
        self.position += len;
        Ok(slice)
    }

    /// Decodes an unsigned integer using stop-bit encoding.
    ///
    /// # Errors
    /// Returns `FastError::UnexpectedEof` if data is incomplete, or
    /// `FastError::IntegerOverflow` if the value does not fit in 64 bits.
    pub fn read_uint(&mut self) -> Result<u64, FastError> {
        let mut result: u64 = 0;

        loop {
            let byte = self.read_byte()?;

            if result > (u64::MAX >> 7) {
                return Err(FastError::IntegerOverflow);
            }

            result = (result << 7) | u64::from(byte & 0x7F);

            if byte & 0x80 != 0 {
                return Ok(result);
            }
        }
    }

    /// Decodes a signed integer using stop-bit encoding.
    ///
    /// Bit 6 of the first byte carries the sign.
    ///
    /// # Errors
    /// Returns `FastError::UnexpectedEof` if data is incomplete, or
    /// `FastError::IntegerOverflow` if the value does not fit in 64 bits.
    pub fn read_int(&mut self) -> Result<i64, FastError> {
        let first = *self
            .data
            .get(self.position)
            .ok_or(FastError::UnexpectedEof)?;
        let mut result: i64 = if first & 0x40 != 0 { -1 } else { 0 };

        loop {
            let byte = self.read_byte()?;

            if result > (i64::MAX >> 7) || result < (i64::MIN >> 7) {
                return Err(FastError::IntegerOverflow);
            }

            result = (result << 7) | i64::from(byte & 0x7F);

            if byte & 0x80 != 0 {
                return Ok(result);
            }
        }
    }

    /// Decodes a nullable unsigned integer. Zero encodes null.
    ///
    /// # Errors
    /// Same as [`FastStream::read_uint`].
    pub fn read_nullable_uint(&mut self) -> Result<Option<u64>, FastError> {
        Ok(self.read_uint()?.checked_sub(1))
    }

    /// Decodes a nullable signed integer. Zero encodes null and
    /// non-negative values are shifted up by one.
    ///
    /// # Errors
    /// Same as [`FastStream::read_int`].
    pub fn read_nullable_int(&mut self) -> Result<Option<i64>, FastError> {
        Ok(match self.read_int()? {
            0 => None,
            v if v > 0 => Some(v - 1),
            v => Some(v),
        })
    }

    /// Decodes an ASCII string using stop-bit encoding.
    ///
    /// A lone `0x80` is the empty string.
    ///
    /// # Errors
    /// Returns `FastError::UnexpectedEof` if data is incomplete.
    pub fn read_ascii(&mut self) -> Result<String, FastError> {
        let raw = self.read_stop_bit_bytes()?;
        let raw = if raw == [0] { Vec::new() } else { raw };
        String::from_utf8(raw).map_err(|_| FastError::InvalidString)
    }

    /// Decodes a nullable ASCII string.
    ///
    /// A lone `0x80` is null and `0x00 0x80` is the empty string.
    ///
    /// # Errors
    /// Returns `FastError::UnexpectedEof` if data is incomplete.
    pub fn read_nullable_ascii(&mut self) -> Result<Option<String>, FastError> {
        let raw = self.read_stop_bit_bytes()?;
        match raw.as_slice() {
            [0] => Ok(None),
            [0, 0] => Ok(Some(String::new())),
            _ => String::from_utf8(raw)
                .map(Some)
                .map_err(|_| FastError::InvalidString),
        }
    }

    /// Decodes a length-prefixed byte vector.
    ///
    /// # Errors
    /// Returns `FastError::UnexpectedEof` if data is incomplete.
    pub fn read_bytes(&mut self) -> Result<&'a [u8], FastError> {
        let length = usize::try_from(self.read_uint()?).map_err(|_| FastError::IntegerOverflow)?;
        self.read_slice(length)
    }

    /// Decodes a nullable length-prefixed byte vector.
    ///
    /// # Errors
    /// Returns `FastError::UnexpectedEof` if data is incomplete.
    pub fn read_nullable_bytes(&mut self) -> Result<Option<&'a [u8]>, FastError> {
        match self.read_nullable_uint()? {
            None => Ok(None),
            Some(length) => {
                let length = usize::try_from(length).map_err(|_| FastError::IntegerOverflow)?;
                self.read_slice(length).map(Some)
            }
        }
    }

    /// Decodes a presence map.
    ///
    /// # Errors
    /// Returns `FastError::UnexpectedEof` if data is incomplete.
    pub fn read_pmap(&mut self) -> Result<PresenceMap, FastError> {
        PresenceMap::decode(self)
    }

    fn read_stop_bit_bytes(&mut self) -> Result<Vec<u8>, FastError> {
        let mut result = Vec::new();

        loop {
            let byte = self.read_byte()?;
            result.push(byte & 0x7F);

            if byte & 0x80 != 0 {
                return Ok(result);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_uint_single_byte() {
        let data = [0x81];
        let mut stream = FastStream::new(&data);
        assert_eq!(stream.read_uint().unwrap(), 1);
        assert_eq!(stream.position(), 1);
        assert!(stream.is_eof());
    }

    #[test]
    fn test_read_uint_multi_byte() {
        // 942 = 7 * 128 + 46
        let data = [0x07, 0xAE];
        let mut stream = FastStream::new(&data);
        assert_eq!(stream.read_uint().unwrap(), 942);
        assert_eq!(stream.position(), 2);
    }

    #[test]
    fn test_read_uint_truncated() {
        let data = [0x07];
        let mut stream = FastStream::new(&data);
        assert_eq!(stream.read_uint(), Err(FastError::UnexpectedEof));
    }

    #[test]
    fn test_read_uint_overflow() {
        let data = [0x7F; 11];
        let mut stream = FastStream::new(&data);
        assert_eq!(stream.read_uint(), Err(FastError::IntegerOverflow));
    }

    #[test]
    fn test_read_int_signs() {
        let data = [0x81, 0xFF, 0x7F, 0x3F, 0xFF];
        let mut stream = FastStream::new(&data);
        assert_eq!(stream.read_int().unwrap(), 1);
        assert_eq!(stream.read_int().unwrap(), -1);
        assert_eq!(stream.read_int().unwrap(), -8193);
    }

    #[test]
    fn test_read_nullable_values() {
        let data = [0x80, 0x81, 0x80, 0x82, 0xFF];
        let mut stream = FastStream::new(&data);
        assert_eq!(stream.read_nullable_uint().unwrap(), None);
        assert_eq!(stream.read_nullable_uint().unwrap(), Some(0));
        assert_eq!(stream.read_nullable_int().unwrap(), None);
        assert_eq!(stream.read_nullable_int().unwrap(), Some(1));
        assert_eq!(stream.read_nullable_int().unwrap(), Some(-1));
    }

    #[test]
    fn test_read_ascii() {
        let data = [b'H', b'i', b'!' | 0x80, 0x80];
        let mut stream = FastStream::new(&data);
        assert_eq!(stream.read_ascii().unwrap(), "Hi!");
        assert_eq!(stream.read_ascii().unwrap(), "");
    }

    #[test]
    fn test_read_nullable_ascii() {
        let data = [0x80, 0x00, 0x80, b'A' | 0x80];
        let mut stream = FastStream::new(&data);
        assert_eq!(stream.read_nullable_ascii().unwrap(), None);
        assert_eq!(stream.read_nullable_ascii().unwrap(), Some(String::new()));
        assert_eq!(stream.read_nullable_ascii().unwrap(), Some("A".to_string()));
    }

    #[test]
    fn test_read_bytes() {
        let data = [0x83, 1, 2, 3, 0x85, 1];
        let mut stream = FastStream::new(&data);
        assert_eq!(stream.read_bytes().unwrap(), &[1, 2, 3]);
        assert_eq!(stream.read_bytes(), Err(FastError::UnexpectedEof));
    }

    #[test]
    fn test_skip_clamps_at_end() {
        let data = [0x81, 0x82, 0x83];
        let mut stream = FastStream::new(&data);
        stream.skip(2);
        assert_eq!(stream.position(), 2);
        assert_eq!(stream.remaining(), 1);
        stream.skip(10);
        assert!(stream.is_eof());
        assert_eq!(stream.position(), 3);
    }
}
