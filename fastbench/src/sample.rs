/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Synthetic message streams encoded against [`crate::templates`].
//!
//! Used to produce replay files and benchmark input without a live feed.

use crate::templates::{HEARTBEAT_ID, MARKET_DATA_ID};
use fastbench_fast::{FastEncoder, PresenceMap};

const SYMBOLS: [&str; 5] = ["AAPL", "GOOGL", "MSFT", "AMZN", "META"];
const SENDING_TIME: &str = "20260127-14:30:00.000";
const FIRST_SEQ_NUM: u64 = 1000;
const HEARTBEAT_EVERY: usize = 50;

/// Builder for a stream of concatenated market data and heartbeat messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleStream {
    messages: usize,
    header_bytes: usize,
    self_contained: bool,
}

impl SampleStream {
    /// Creates a stream of `messages` messages with no headers.
    #[must_use]
    pub const fn new(messages: usize) -> Self {
        Self {
            messages,
            header_bytes: 0,
            self_contained: false,
        }
    }

    /// Prefixes every message with `bytes` filler bytes.
    #[must_use]
    pub const fn with_header_bytes(mut self, bytes: usize) -> Self {
        self.header_bytes = bytes;
        self
    }

    /// Transmits every field of every message, so each one decodes after a
    /// reset. Without this, later messages lean on copy and increment state.
    #[must_use]
    pub const fn self_contained(mut self) -> Self {
        self.self_contained = true;
        self
    }

    /// Encodes the stream.
    #[must_use]
    pub fn encode(&self) -> Vec<u8> {
        let mut encoder = FastEncoder::with_capacity(self.messages * (32 + self.header_bytes));
        let header = vec![0u8; self.header_bytes];
        let mut last_template = None;
        let mut market_data_sent: u64 = 0;

        for i in 0..self.messages {
            encoder.encode_raw(&header);

            let template = if i % HEARTBEAT_EVERY == HEARTBEAT_EVERY - 1 {
                HEARTBEAT_ID
            } else {
                MARKET_DATA_ID
            };
            let send_template_id = self.self_contained || last_template != Some(template);

            if template == HEARTBEAT_ID {
                let send_time = self.self_contained || market_data_sent == 0;
                encoder.encode_pmap(&PresenceMap::from_bits(&[send_template_id, send_time]));
                if send_template_id {
                    encoder.encode_uint(u64::from(template));
                }
                if send_time {
                    encoder.encode_ascii(SENDING_TIME);
                }
            } else {
                let full = self.self_contained || market_data_sent == 0;
                let send_size = i % 3 != 0;
                encoder.encode_pmap(&PresenceMap::from_bits(&[
                    send_template_id,
                    full,
                    full,
                    true,
                    true,
                    send_size,
                ]));
                if send_template_id {
                    encoder.encode_uint(u64::from(template));
                }
                if full {
                    encoder.encode_uint(FIRST_SEQ_NUM + market_data_sent);
                    encoder.encode_ascii(SENDING_TIME);
                }
                encoder.encode_ascii(SYMBOLS[i % SYMBOLS.len()]);
                encoder.encode_int(-2);
                encoder.encode_int(15_000 + (i % 100) as i64);
                if send_size {
                    encoder.encode_uint(100 + (i % 900) as u64);
                }
                encoder.encode_nullable_ascii((i % 7 == 0).then_some("R"));
                market_data_sent += 1;
            }

            last_template = Some(template);
        }

        encoder.finish()
    }
}
