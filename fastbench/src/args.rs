/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Command-line interpretation.
//!
//! The harness keeps the classic single-dash spellings `-head` and `-hfix`.
//! They are rewritten to `--head` and `--hfix` before `clap` sees them.

use crate::config::RunConfig;
use crate::error::Result;
use crate::loader::MessageBuffer;
use clap::{ArgAction, CommandFactory, Parser};
use std::ffi::OsString;
use std::num::NonZeroUsize;
use std::path::PathBuf;

/// Parsed command-line arguments.
#[derive(Parser, Debug)]
#[command(
    name = "fastbench",
    version,
    about = "Replays a file of FAST messages through the decoder and reports elapsed time",
    long_about = None,
    override_usage = "fastbench -f <FILE> [-head <N>] [-c <COUNT>] [-r] [-hfix <N>]",
    args_override_self = true
)]
pub struct Args {
    #[arg(short = 'f', value_name = "FILE", help = "FAST message file (required)")]
    pub file: PathBuf,

    #[arg(
        long = "head",
        value_name = "N",
        help = "Process only the first N messages of each pass"
    )]
    pub head: Option<NonZeroUsize>,

    #[arg(
        short = 'c',
        value_name = "COUNT",
        default_value = "1",
        help = "Repeat the test COUNT times"
    )]
    pub count: NonZeroUsize,

    #[arg(
        short = 'r',
        action = ArgAction::SetTrue,
        help = "Reset the decoder on every message"
    )]
    pub force_reset: bool,

    #[arg(
        long = "hfix",
        value_name = "N",
        default_value_t = 0,
        help = "Skip an N byte header before each message"
    )]
    pub header_skip: usize,
}

impl Args {
    /// Builds the run configuration.
    #[must_use]
    pub fn run_config(&self) -> RunConfig {
        let config = RunConfig::new()
            .with_repeat_count(self.count)
            .with_force_reset(self.force_reset)
            .with_header_skip_bytes(self.header_skip);
        match self.head {
            Some(head) => config.with_message_count(head),
            None => config,
        }
    }
}

/// Rewrites the single-dash long flags into the form `clap` accepts.
fn normalize<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    args.into_iter()
        .map(|arg| {
            let arg = arg.into();
            match arg.to_str() {
                Some("-head") => OsString::from("--head"),
                Some("-hfix") => OsString::from("--hfix"),
                _ => arg,
            }
        })
        .collect()
}

/// Parses `args` (program name first) and loads the message file.
///
/// # Errors
/// Returns `BenchError::Usage` for malformed or unknown arguments, and the
/// loader's errors if the file is missing, unreadable or empty.
pub fn parse_from<I, T>(args: I) -> Result<(RunConfig, MessageBuffer)>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let args = Args::try_parse_from(normalize(args))?;
    let buffer = MessageBuffer::load(&args.file)?;
    Ok((args.run_config(), buffer))
}

/// Returns the usage block printed on configuration errors.
#[must_use]
pub fn usage() -> String {
    help_text(&Args::command().render_help().to_string())
}

/// Restores the single-dash spellings in rendered help, keeping columns.
pub(crate) fn help_text(text: &str) -> String {
    text.replace("--head", " -head").replace("--hfix", " -hfix")
}

/// Restores the single-dash spellings in a diagnostic line.
pub(crate) fn single_dash(text: &str) -> String {
    text.replace("--head", "-head").replace("--hfix", "-hfix")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BenchError;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn message_file() -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(&[0xC0, 0x81]).unwrap();
        file
    }

    fn parse(extra: &[&str], file: &NamedTempFile) -> Result<(RunConfig, MessageBuffer)> {
        let path = file.path().to_str().unwrap().to_string();
        let mut argv = vec!["fastbench".to_string(), "-f".to_string(), path];
        argv.extend(extra.iter().map(|s| s.to_string()));
        parse_from(argv)
    }

    #[test]
    fn test_parse_defaults() {
        let file = message_file();
        let (config, buffer) = parse(&[], &file).unwrap();

        assert_eq!(config, RunConfig::default());
        assert_eq!(buffer.len(), 2);
    }

    #[test]
    fn test_parse_all_flags() {
        let file = message_file();
        let (config, _) = parse(&["-head", "10", "-c", "3", "-r", "-hfix", "4"], &file).unwrap();

        assert_eq!(config.message_count.map(NonZeroUsize::get), Some(10));
        assert_eq!(config.repeat_count.get(), 3);
        assert!(config.force_reset);
        assert_eq!(config.header_skip_bytes, 4);
    }

    #[test]
    fn test_parse_flags_before_file() {
        let file = message_file();
        let path = file.path().to_str().unwrap();
        let (config, _) = parse_from(["fastbench", "-r", "-c", "2", "-f", path]).unwrap();

        assert!(config.force_reset);
        assert_eq!(config.repeat_count.get(), 2);
    }

    #[test]
    fn test_head_zero_rejected() {
        let file = message_file();
        let err = parse(&["-head", "0"], &file).unwrap_err();
        assert!(matches!(err, BenchError::Usage(_)));
    }

    #[test]
    fn test_count_rejects_zero_and_non_numeric() {
        let file = message_file();
        assert!(matches!(
            parse(&["-c", "0"], &file).unwrap_err(),
            BenchError::Usage(_)
        ));
        assert!(matches!(
            parse(&["-c", "many"], &file).unwrap_err(),
            BenchError::Usage(_)
        ));
    }

    #[test]
    fn test_hfix_must_be_non_negative_integer() {
        let file = message_file();
        assert!(parse(&["-hfix", "abc"], &file).is_err());
        assert!(parse(&["-hfix", "-2"], &file).is_err());
    }

    #[test]
    fn test_unknown_flag_rejected() {
        let file = message_file();
        let err = parse(&["-x"], &file).unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_missing_file_flag() {
        let err = parse_from(["fastbench", "-c", "2"]).unwrap_err();
        assert!(matches!(err, BenchError::Usage(_)));
    }

    #[test]
    fn test_missing_file_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.bin");
        let err = parse_from([
            OsString::from("fastbench"),
            OsString::from("-f"),
            path.into_os_string(),
        ])
        .unwrap_err();
        assert!(matches!(err, BenchError::Io { .. }));
    }

    #[test]
    fn test_repeated_flag_last_value_wins() {
        let file = message_file();
        let (config, _) = parse(&["-head", "3", "-head", "5", "-c", "2", "-c", "4"], &file).unwrap();

        assert_eq!(config.message_count.map(NonZeroUsize::get), Some(5));
        assert_eq!(config.repeat_count.get(), 4);
    }

    #[test]
    fn test_usage_lists_flags() {
        let text = usage();
        for flag in ["-f <FILE>", "-head <N>", "-c <COUNT>", "-r", "-hfix <N>"] {
            assert!(text.contains(flag), "usage is missing {flag}");
        }
        assert!(!text.contains("--head"));
        assert!(!text.contains("--hfix"));
    }

    #[test]
    fn test_single_dash_diagnostic() {
        assert_eq!(
            single_dash("error: invalid value '0' for '--head <N>'"),
            "error: invalid value '0' for '-head <N>'"
        );
    }
}
