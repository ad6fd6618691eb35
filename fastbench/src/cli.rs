/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Command-line driver behind the `fastbench` binary.
//!
//! Configuration failures print one diagnostic line on stderr and the usage
//! block on stdout. Decode failures print the error chain on stderr. Both
//! end with [`FAILURE_STATUS`].

use crate::args;
use crate::error::BenchError;
use crate::loader::MessageBuffer;
use crate::{RunConfig, runner, templates};
use anyhow::Context;
use fastbench_fast::FastDecoder;
use std::ffi::OsString;
use std::io::Write;

/// Exit status of a completed run.
pub const SUCCESS_STATUS: i32 = 0;

/// Exit status of any failed run.
pub const FAILURE_STATUS: i32 = -1;

/// Parses `argv`, runs the benchmark and returns the process exit status.
///
/// The timing report goes to `out`, diagnostics to `err`.
pub fn execute<I, T>(argv: I, out: &mut impl Write, err: &mut impl Write) -> i32
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let (config, buffer) = match args::parse_from(argv) {
        Ok(parsed) => parsed,
        Err(BenchError::Usage(clap_err)) if !clap_err.use_stderr() => {
            // --help and --version
            let _ = write!(out, "{}", args::help_text(&clap_err.render().to_string()));
            return SUCCESS_STATUS;
        }
        Err(failure) => {
            report_configuration_error(&failure, err);
            let _ = writeln!(out, "\n{}", args::usage());
            return FAILURE_STATUS;
        }
    };

    match benchmark(&config, &buffer) {
        Ok(report) => {
            let _ = writeln!(out, "{report}");
            SUCCESS_STATUS
        }
        Err(failure) => {
            let _ = writeln!(err, "{failure:?}");
            FAILURE_STATUS
        }
    }
}

/// Writes a single diagnostic line for a configuration failure.
fn report_configuration_error(failure: &BenchError, err: &mut impl Write) {
    match failure {
        // Already logged by the loader.
        BenchError::Io { .. } => {}
        BenchError::Usage(clap_err) => {
            let rendered = clap_err.render().to_string();
            let line = rendered.lines().next().unwrap_or_default();
            let _ = writeln!(err, "{}", args::single_dash(line));
        }
        other => {
            let _ = writeln!(err, "error: {other}");
        }
    }
}

fn benchmark(config: &RunConfig, buffer: &MessageBuffer) -> anyhow::Result<runner::BenchReport> {
    let mut decoder = FastDecoder::new();
    decoder
        .include(templates::all())
        .context("failed to bind templates")?;

    Ok(runner::run(config, buffer, &mut decoder)?)
}
