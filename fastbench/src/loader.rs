/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Message file loading.

use crate::error::{BenchError, Result};
use bytes::Bytes;
use std::path::Path;
use tracing::{debug, error};

/// Immutable, non-empty buffer of concatenated encoded messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageBuffer {
    bytes: Bytes,
}

impl MessageBuffer {
    /// Reads the whole file at `path` into memory.
    ///
    /// # Errors
    /// Returns `BenchError::Io` if the file cannot be read and
    /// `BenchError::EmptyBuffer` if it has no content.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read(path).map_err(|source| {
            error!("File read error: {}: {}", path.display(), source);
            BenchError::Io {
                path: path.to_path_buf(),
                source,
            }
        })?;

        if contents.is_empty() {
            return Err(BenchError::EmptyBuffer {
                path: path.to_path_buf(),
            });
        }

        debug!("Loaded {} bytes from {}", contents.len(), path.display());
        Ok(Self {
            bytes: Bytes::from(contents),
        })
    }

    /// Wraps bytes already in memory. Returns `None` if `bytes` is empty.
    #[must_use]
    pub fn from_bytes(bytes: impl Into<Bytes>) -> Option<Self> {
        let bytes = bytes.into();
        (!bytes.is_empty()).then_some(Self { bytes })
    }

    /// Returns the buffer contents.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Returns the buffer length in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Always false; an empty buffer cannot be constructed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_reads_whole_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&[0x81, 0x82, 0x83]).unwrap();

        let buffer = MessageBuffer::load(file.path()).unwrap();
        assert_eq!(buffer.as_bytes(), &[0x81, 0x82, 0x83]);
        assert_eq!(buffer.len(), 3);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.bin");

        let err = MessageBuffer::load(&path).unwrap_err();
        assert!(matches!(err, BenchError::Io { .. }));
        assert!(err.is_configuration());
    }

    #[test]
    fn test_load_empty_file() {
        let file = tempfile::NamedTempFile::new().unwrap();

        let err = MessageBuffer::load(file.path()).unwrap_err();
        assert!(matches!(err, BenchError::EmptyBuffer { .. }));
    }

    #[test]
    fn test_from_bytes_rejects_empty() {
        assert!(MessageBuffer::from_bytes(Vec::new()).is_none());
        assert_eq!(
            MessageBuffer::from_bytes(vec![1u8]).map(|b| b.len()),
            Some(1)
        );
    }
}
