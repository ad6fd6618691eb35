/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! FAST presence map handling.
//!
//! The presence map (PMAP) opens every message and says which
//! operator-controlled fields, and the template id, are carried in the
//! stream. It uses stop-bit encoding: each byte holds seven bits, most
//! significant first, and the high bit marks the last byte.

use crate::error::FastError;
use crate::stream::FastStream;
use smallvec::SmallVec;

/// FAST presence map.
///
/// Bits are consumed in order as fields are decoded. Reading past the
/// transmitted bits yields `false`, which is how trailing zero bytes are
/// elided on the wire.
#[derive(Debug, Clone, Default)]
pub struct PresenceMap {
    /// Seven significant bits per entry, stop bit stripped.
    groups: SmallVec<[u8; 4]>,
    /// Index of the next bit to consume.
    cursor: usize,
}

impl PresenceMap {
    /// Creates an empty presence map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a presence map from individual bits.
    #[must_use]
    pub fn from_bits(bits: &[bool]) -> Self {
        let mut groups = SmallVec::new();
        for chunk in bits.chunks(7) {
            let group = chunk
                .iter()
                .enumerate()
                .fold(0u8, |acc, (i, &bit)| acc | (u8::from(bit) << (6 - i)));
            groups.push(group);
        }
        Self { groups, cursor: 0 }
    }

    /// Decodes a presence map from the stream.
    ///
    /// # Errors
    /// Returns `FastError::UnexpectedEof` if the data is incomplete.
    pub fn decode(stream: &mut FastStream<'_>) -> Result<Self, FastError> {
        let mut groups = SmallVec::new();

        loop {
            let byte = stream.read_byte()?;
            groups.push(byte & 0x7F);

            if byte & 0x80 != 0 {
                return Ok(Self { groups, cursor: 0 });
            }
        }
    }

    /// Returns the next bit and advances.
    #[inline]
    pub fn next_bit(&mut self) -> bool {
        let bit = self.bit(self.cursor);
        self.cursor += 1;
        bit
    }

    /// Returns the bit at `index` without consuming it.
    #[must_use]
    pub fn bit(&self, index: usize) -> bool {
        self.groups
            .get(index / 7)
            .is_some_and(|group| (group >> (6 - index % 7)) & 1 == 1)
    }

    /// Returns the number of transmitted bits.
    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.len() * 7
    }

    /// Returns true if no bits were transmitted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Encodes the presence map, setting the stop bit on the last byte.
    #[must_use]
    pub fn encode(&self) -> SmallVec<[u8; 4]> {
        if self.groups.is_empty() {
            return SmallVec::from_slice(&[0x80]);
        }

        let mut out = self.groups.clone();
        if let Some(last) = out.last_mut() {
            *last |= 0x80;
        }
        out
    }
}
