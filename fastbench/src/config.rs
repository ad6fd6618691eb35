/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Run configuration.
//!
//! Built once from the command line and threaded by reference into the
//! replay loop; nothing mutates it afterwards.

use std::num::NonZeroUsize;

/// Configuration for one benchmark run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunConfig {
    /// Cap on messages decoded per pass; unbounded when `None`.
    pub message_count: Option<NonZeroUsize>,
    /// Number of passes over the buffer.
    pub repeat_count: NonZeroUsize,
    /// Reset the decoder before every message, not only the first of a pass.
    pub force_reset: bool,
    /// Bytes discarded before each message.
    pub header_skip_bytes: usize,
}

impl RunConfig {
    /// Creates a configuration with one unbounded pass and no header.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            message_count: None,
            repeat_count: NonZeroUsize::MIN,
            force_reset: false,
            header_skip_bytes: 0,
        }
    }

    /// Sets the per-pass message cap.
    #[must_use]
    pub const fn with_message_count(mut self, count: NonZeroUsize) -> Self {
        self.message_count = Some(count);
        self
    }

    /// Sets the number of passes.
    #[must_use]
    pub const fn with_repeat_count(mut self, count: NonZeroUsize) -> Self {
        self.repeat_count = count;
        self
    }

    /// Sets whether every message is decoded with a reset.
    #[must_use]
    pub const fn with_force_reset(mut self, reset: bool) -> Self {
        self.force_reset = reset;
        self
    }

    /// Sets the header length skipped before each message.
    #[must_use]
    pub const fn with_header_skip_bytes(mut self, bytes: usize) -> Self {
        self.header_skip_bytes = bytes;
        self
    }

    /// Returns true if the `index`-th message of a pass is decoded with reset.
    #[inline]
    #[must_use]
    pub const fn reset_for(&self, index: usize) -> bool {
        self.force_reset || index == 0
    }

    /// Returns true while `index` is below the per-pass cap.
    #[inline]
    #[must_use]
    pub fn within_cap(&self, index: usize) -> bool {
        self.message_count.is_none_or(|cap| index < cap.get())
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_config_defaults() {
        let config = RunConfig::default();

        assert_eq!(config.message_count, None);
        assert_eq!(config.repeat_count.get(), 1);
        assert!(!config.force_reset);
        assert_eq!(config.header_skip_bytes, 0);
        assert!(config.within_cap(usize::MAX - 1));
    }

    #[test]
    fn test_run_config_builder() {
        let config = RunConfig::new()
            .with_message_count(NonZeroUsize::new(5).unwrap())
            .with_repeat_count(NonZeroUsize::new(3).unwrap())
            .with_header_skip_bytes(4);

        assert!(config.within_cap(4));
        assert!(!config.within_cap(5));
        assert_eq!(config.repeat_count.get(), 3);
        assert_eq!(config.header_skip_bytes, 4);
    }

    #[test]
    fn test_reset_cadence() {
        let once = RunConfig::new();
        assert!(once.reset_for(0));
        assert!(!once.reset_for(1));

        let always = RunConfig::new().with_force_reset(true);
        assert!(always.reset_for(0));
        assert!(always.reset_for(7));
    }
}
