/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Replay loop and timer.
//!
//! One timing window brackets every pass. Each pass walks a fresh cursor
//! over the whole buffer; the first message of a pass is always decoded
//! with a reset.

use crate::config::RunConfig;
use crate::decoder::MessageDecoder;
use crate::error::{BenchError, Result};
use crate::loader::MessageBuffer;
use fastbench_fast::FastStream;
use std::fmt;
use std::hint::black_box;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Outcome of a completed run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BenchReport {
    /// Wall-clock time across all passes.
    pub elapsed: Duration,
    /// Number of passes completed.
    pub passes: usize,
    /// Decode invocations across all passes.
    pub messages: usize,
    /// Bytes consumed by the decoder across all passes, headers excluded.
    pub bytes: usize,
}

impl BenchReport {
    /// Returns the elapsed time in whole milliseconds.
    #[must_use]
    pub const fn elapsed_millis(&self) -> u128 {
        self.elapsed.as_millis()
    }

    /// Returns decoded messages per second, or zero for an instant run.
    #[must_use]
    pub fn messages_per_second(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.messages as f64 / secs
        } else {
            0.0
        }
    }
}

impl fmt::Display for BenchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "time spent {} msec", self.elapsed_millis())
    }
}

/// Replays `buffer` through `decoder` as configured and times it.
///
/// # Errors
/// Returns `BenchError::Decode` on the first decoder failure and
/// `BenchError::Stalled` if the decoder succeeds without consuming input.
/// No report is produced for a failed run.
pub fn run<D: MessageDecoder>(
    config: &RunConfig,
    buffer: &MessageBuffer,
    decoder: &mut D,
) -> Result<BenchReport> {
    let mut messages = 0;
    let mut bytes = 0;

    let start = Instant::now();
    for pass in 0..config.repeat_count.get() {
        let mut stream = FastStream::new(buffer.as_bytes());
        let mut index = 0;

        while config.within_cap(index) && !stream.is_eof() {
            stream.skip(config.header_skip_bytes);

            if !stream.is_eof() {
                let position = stream.position();
                let message = decoder
                    .decode(&mut stream, config.reset_for(index))
                    .map_err(|source| BenchError::Decode {
                        pass,
                        position,
                        source: Box::new(source),
                    })?;
                black_box(message);

                let consumed = stream.position() - position;
                if consumed == 0 {
                    return Err(BenchError::Stalled { pass, position });
                }
                bytes += consumed;
                messages += 1;
            }

            index += 1;
        }

        debug!("Pass {} complete after {} iterations", pass, index);
    }
    let elapsed = start.elapsed();

    let report = BenchReport {
        elapsed,
        passes: config.repeat_count.get(),
        messages,
        bytes,
    };
    info!(
        "Decoded {} messages ({} bytes) in {} passes, {:.0} msg/s",
        report.messages,
        report.bytes,
        report.passes,
        report.messages_per_second()
    );
    Ok(report)
}
