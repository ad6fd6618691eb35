/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Error types for the replay harness.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using [`BenchError`] as the error type.
pub type Result<T> = std::result::Result<T, BenchError>;

/// Errors that abort a benchmark run.
#[derive(Debug, Error)]
pub enum BenchError {
    /// Malformed, missing or unknown command-line arguments.
    #[error("{0}")]
    Usage(#[from] clap::Error),

    /// The message file could not be read.
    #[error("file read error: {}", path.display())]
    Io {
        /// Path that failed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The message file holds no bytes.
    #[error("message file is empty: {}", path.display())]
    EmptyBuffer {
        /// Path of the empty file.
        path: PathBuf,
    },

    /// The decoder rejected a message.
    #[error("decode failed in pass {pass} at byte {position}")]
    Decode {
        /// Zero-based pass index.
        pass: usize,
        /// Cursor offset where the message started.
        position: usize,
        /// Decoder error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The decoder returned a message without consuming any input.
    #[error("decoder made no progress in pass {pass} at byte {position}")]
    Stalled {
        /// Zero-based pass index.
        pass: usize,
        /// Cursor offset where the decoder stalled.
        position: usize,
    },
}

impl BenchError {
    /// Returns true for errors detected before decoding starts.
    ///
    /// These are reported with the usage text.
    #[must_use]
    pub const fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::Usage(_) | Self::Io { .. } | Self::EmptyBuffer { .. }
        )
    }
}
