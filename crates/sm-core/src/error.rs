//! Unified error type for sync-media.
//!
//! Every failure in the staging and sync phases funnels into [`Error`]. None of
//! them is recoverable: the binary logs the error and exits non-zero.

use std::path::PathBuf;

/// Unified error type covering all failure modes in sync-media.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A blob file name whose stem is not an integer document id.
    #[error("Invalid document id in {}: {stem:?}", path.display())]
    InvalidDocumentId {
        /// The offending blob path.
        path: PathBuf,
        /// The file stem that failed to parse.
        stem: String,
    },

    /// Credential material is missing or could not be loaded.
    #[error("Credential error: {0}")]
    Credential(String),

    /// An external tool (ssh-agent, ssh-add, rsync) failed.
    #[error("Tool error [{tool}]: {message}")]
    Tool {
        /// Name of the tool that failed.
        tool: String,
        /// Human-readable error description.
        message: String,
    },

    /// Decoding, resizing, or encoding an image failed.
    #[error("Image error: {source}")]
    Image {
        /// The underlying image library error.
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The settings file is unreadable or invalid.
    #[error("Config error: {0}")]
    Config(String),

    /// An I/O operation failed.
    #[error("IO error: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },
}

impl Error {
    /// Convenience constructor for [`Error::Tool`].
    pub fn tool(tool: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Tool {
            tool: tool.into(),
            message: message.into(),
        }
    }

    /// Convenience constructor for [`Error::Image`].
    pub fn image(source: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Error::Image {
            source: source.into(),
        }
    }

    /// Convenience constructor for [`Error::Credential`].
    pub fn credential(message: impl Into<String>) -> Self {
        Error::Credential(message.into())
    }
}

/// Result alias using the crate-level [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
