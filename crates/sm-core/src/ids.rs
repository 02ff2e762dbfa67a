//! Document identifiers parsed from blob file names.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Integer identifier of a source document.
///
/// Every artifact staged for a blob is named after this id, so `007.png` and
/// `7.png` both produce `7.jpg`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DocumentId(u64);

impl DocumentId {
    /// Wrap a raw id.
    #[must_use]
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Return the inner value.
    #[must_use]
    pub fn get(self) -> u64 {
        self.0
    }

    /// Parse the id from the stem of a blob path (`../blobs/42.png` -> 42).
    pub fn from_path(path: &Path) -> Result<Self> {
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        stem.trim()
            .parse()
            .map_err(|_| Error::InvalidDocumentId {
                path: path.to_path_buf(),
                stem,
            })
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for DocumentId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        s.parse().map(Self)
    }
}

impl From<u64> for DocumentId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}
