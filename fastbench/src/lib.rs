/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! # FastBench
//!
//! Replay harness that measures FAST decoding throughput.
//!
//! A file of concatenated, optionally header-prefixed FAST messages is loaded
//! into memory once and replayed through a stateful decoder for a number of
//! passes. The whole run is timed as a single window.
//!
//! ## Crate Organization
//!
//! - [`args`]: Command-line interpretation
//! - [`cli`]: Binary driver, output and exit status
//! - [`config`]: Immutable run configuration
//! - [`loader`]: Message file loading
//! - [`decoder`]: The decoder capability the replay loop drives
//! - [`runner`]: Replay loop and timer
//! - [`templates`]: Templates bound by the `fastbench` binary
//! - [`sample`]: Synthetic streams for those templates

pub mod args;
pub mod cli;
pub mod config;
pub mod decoder;
pub mod error;
pub mod loader;
pub mod runner;
pub mod sample;
pub mod templates;

pub use config::RunConfig;
pub use decoder::MessageDecoder;
pub use error::{BenchError, Result};
pub use loader::MessageBuffer;
pub use runner::{BenchReport, run};
