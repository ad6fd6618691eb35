/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! `fastbench` command-line entry point.

use fastbench::cli;
use std::io::{self, Write};
use std::process;

fn main() {
    init_logging();

    let mut out = io::stdout().lock();
    let status = cli::execute(std::env::args_os(), &mut out, &mut io::stderr().lock());
    let _ = out.flush();
    process::exit(status);
}

/// Initializes logging on stderr so stdout carries only the report.
fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .try_init();
}
