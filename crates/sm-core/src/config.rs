//! Settings types.
//!
//! The top-level [`Settings`] struct is deserialized from TOML and carries the
//! paths, image variants, remote target, credential names and tool overrides
//! used by a run. Every section defaults to the values the job has always
//! used, so an empty file (or no file at all) is valid.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{Error, Result};

// ---------------------------------------------------------------------------
// Top-level Settings
// ---------------------------------------------------------------------------

/// Root settings tree.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub paths: PathsConfig,
    pub images: ImagesConfig,
    pub audio: AudioConfig,
    pub remote: RemoteConfig,
    pub credentials: CredentialsConfig,
    pub tools: ToolsConfig,
}

impl Settings {
    /// Deserialize `Settings` from a TOML string and validate them.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        let settings: Self =
            toml::from_str(toml_str).map_err(|e| Error::Config(format!("parse error: {e}")))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reject settings that would make a run meaningless.
    pub fn validate(&self) -> Result<()> {
        if !(1..=100).contains(&self.images.quality) {
            return Err(Error::Config(format!(
                "images.quality must be between 1 and 100, got {}",
                self.images.quality
            )));
        }

        if self.images.widths.contains(&0) {
            return Err(Error::Config("images.widths must not contain 0".into()));
        }

        if self.remote.user.is_empty() {
            return Err(Error::Config("remote.user is empty".into()));
        }

        if self.remote.directory.is_empty() {
            return Err(Error::Config("remote.directory is empty".into()));
        }

        if self.credentials.env_var.is_empty() {
            return Err(Error::Config("credentials.env_var is empty".into()));
        }

        if self.audio.extensions.iter().any(|e| e.is_empty() || e.starts_with('.')) {
            return Err(Error::Config(
                "audio.extensions entries must be bare extensions like \"mp3\"".into(),
            ));
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Sub-configs
// ---------------------------------------------------------------------------

/// Filesystem locations, relative to the working directory unless absolute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Flat directory holding the source blobs.
    pub blobs: PathBuf,
    /// Staging root mirrored to the remote host.
    pub staging: PathBuf,
    /// Append-mode log file.
    pub log_file: PathBuf,
    /// Fallback JSON file holding the private key.
    pub secrets_file: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            blobs: PathBuf::from("../blobs"),
            staging: PathBuf::from("../akamai"),
            log_file: PathBuf::from("sync-media.log"),
            secrets_file: PathBuf::from(".secrets.json"),
        }
    }
}

/// Image derivative settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImagesConfig {
    /// Target widths of the downscaled variants.
    pub widths: Vec<u32>,
    /// JPEG quality for every encoded artifact.
    pub quality: u8,
}

impl Default for ImagesConfig {
    fn default() -> Self {
        Self {
            widths: vec![571, 750],
            quality: 80,
        }
    }
}

/// Audio recognition settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    /// Extensions (without the dot) treated as audio blobs.
    pub extensions: Vec<String>,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            extensions: vec!["mp3".into()],
        }
    }
}

impl AudioConfig {
    /// True when `ext` names an audio blob. Comparison ignores ASCII case.
    pub fn is_audio_extension(&self, ext: &str) -> bool {
        self.extensions.iter().any(|e| e.eq_ignore_ascii_case(ext))
    }
}

/// Remote side of the mirroring transfer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    pub user: String,
    pub directory: String,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            user: "sshacs".into(),
            directory: "media".into(),
        }
    }
}

/// Where the private key comes from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CredentialsConfig {
    /// Environment variable consulted first.
    pub env_var: String,
    /// Field of the secrets JSON object consulted second.
    pub secrets_field: String,
}

impl Default for CredentialsConfig {
    fn default() -> Self {
        Self {
            env_var: "AKAMAI_KEY".into(),
            secrets_field: "AKAMAI_KEY".into(),
        }
    }
}

/// Paths to external CLI tools.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolsConfig {
    pub ssh_agent_path: Option<PathBuf>,
    pub ssh_add_path: Option<PathBuf>,
    pub rsync_path: Option<PathBuf>,
}
