/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Decoder capability used by the replay loop.
//!
//! The harness only needs to hand the decoder a cursor and a reset flag.
//! Template binding happens once, when the decoder is constructed.

use fastbench_fast::{DecodedMessage, FastDecoder, FastError, FastStream};

/// A stateful message decoder driven by the replay loop.
pub trait MessageDecoder {
    /// Decoded message type. The harness discards it.
    type Message;

    /// Decoder error type.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Decodes one message from `stream`, advancing it past the message.
    ///
    /// # Arguments
    /// * `stream` - The replay cursor
    /// * `reset` - Discard carried inter-message state first
    ///
    /// # Errors
    /// Returns the decoder's error for malformed or truncated input.
    fn decode(
        &mut self,
        stream: &mut FastStream<'_>,
        reset: bool,
    ) -> Result<Self::Message, Self::Error>;
}

impl MessageDecoder for FastDecoder {
    type Message = DecodedMessage;
    type Error = FastError;

    #[inline]
    fn decode(
        &mut self,
        stream: &mut FastStream<'_>,
        reset: bool,
    ) -> Result<Self::Message, Self::Error> {
        FastDecoder::decode(self, stream, reset)
    }
}
