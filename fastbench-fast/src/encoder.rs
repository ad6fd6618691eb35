/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! FAST protocol encoder.
//!
//! Writes the stop-bit primitives the decoder reads. Field operators are not
//! applied here; callers lay out the presence map and the transmitted fields
//! themselves, which is all fixture and benchmark data needs.

use crate::pmap::PresenceMap;

/// FAST stop-bit writer.
#[derive(Debug, Default)]
pub struct FastEncoder {
    /// Output buffer.
    buffer: Vec<u8>,
}

impl FastEncoder {
    /// Creates a new FAST encoder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new encoder with pre-allocated capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: Vec::with_capacity(capacity),
        }
    }

    /// Encodes an unsigned integer using stop-bit encoding.
    pub fn encode_uint(&mut self, value: u64) {
        let mut groups = [0u8; 10];
        let mut count = 0;
        let mut v = value;

        loop {
            groups[count] = (v & 0x7F) as u8;
            count += 1;
            v >>= 7;
            if v == 0 {
                break;
            }
        }

        self.push_groups(&mut groups[..count]);
    }

    /// Encodes a signed integer using stop-bit encoding.
    ///
    /// Emits the fewest groups whose bit 6 in the leading group still
    /// carries the sign.
    pub fn encode_int(&mut self, value: i64) {
        let mut groups = [0u8; 10];
        let mut count = 0;
        let mut v = value;

        loop {
            let group = (v & 0x7F) as u8;
            groups[count] = group;
            count += 1;
            v >>= 7;

            let sign_bit = group & 0x40 != 0;
            if (v == 0 && !sign_bit) || (v == -1 && sign_bit) {
                break;
            }
        }

        self.push_groups(&mut groups[..count]);
    }

    /// Encodes a nullable unsigned integer.
    pub fn encode_nullable_uint(&mut self, value: Option<u64>) {
        match value {
            Some(v) => self.encode_uint(v + 1),
            None => self.buffer.push(0x80),
        }
    }

    /// Encodes a nullable signed integer.
    pub fn encode_nullable_int(&mut self, value: Option<i64>) {
        match value {
            Some(v) if v >= 0 => self.encode_int(v + 1),
            Some(v) => self.encode_int(v),
            None => self.buffer.push(0x80),
        }
    }

    /// Encodes an ASCII string using stop-bit encoding.
    pub fn encode_ascii(&mut self, value: &str) {
        let bytes = value.as_bytes();

        match bytes.split_last() {
            None => self.buffer.push(0x80),
            Some((last, head)) => {
                self.buffer.extend(head.iter().map(|b| b & 0x7F));
                self.buffer.push(last | 0x80);
            }
        }
    }

    /// Encodes a nullable ASCII string.
    pub fn encode_nullable_ascii(&mut self, value: Option<&str>) {
        match value {
            None => self.buffer.push(0x80),
            Some("") => self.buffer.extend_from_slice(&[0x00, 0x80]),
            Some(s) => self.encode_ascii(s),
        }
    }

    /// Encodes a byte vector with length prefix.
    pub fn encode_bytes(&mut self, value: &[u8]) {
        self.encode_uint(value.len() as u64);
        self.buffer.extend_from_slice(value);
    }

    /// Encodes a presence map.
    pub fn encode_pmap(&mut self, pmap: &PresenceMap) {
        self.buffer.extend_from_slice(&pmap.encode());
    }

    /// Appends raw bytes, e.g. a non-FAST header.
    pub fn encode_raw(&mut self, bytes: &[u8]) {
        self.buffer.extend_from_slice(bytes);
    }

    /// Returns the encoded bytes.
    #[must_use]
    pub fn finish(self) -> Vec<u8> {
        self.buffer
    }

    /// Returns a reference to the current buffer.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer
    }

    /// Returns the current buffer length.
    #[must_use]
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Returns true if nothing has been encoded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Clears the buffer.
    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    fn push_groups(&mut self, groups: &mut [u8]) {
        groups.reverse();
        if let Some(last) = groups.last_mut() {
            *last |= 0x80;
        }
        self.buffer.extend_from_slice(groups);
    }
}
