//! Private key lookup.

use std::fmt;
use std::path::Path;

use sm_core::config::CredentialsConfig;
use sm_core::{Error, Result};

/// The SSH private key. Only ever piped to `ssh-add`; never logged or written.
#[derive(Clone, PartialEq, Eq)]
pub struct KeyMaterial(String);

impl KeyMaterial {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("KeyMaterial(<redacted>)")
    }
}

/// Resolve the private key.
///
/// The environment variable named by `credentials.env_var` wins when it is set
/// and non-empty. Otherwise the string field `credentials.secrets_field` of the
/// JSON object in `secrets_file` is used, if that file exists. `env` is the
/// variable lookup, normally `|name| std::env::var(name).ok()`.
///
/// # Errors
///
/// [`Error::Credential`] when neither source yields a key, or the secrets file
/// exists but cannot be read or parsed.
pub fn resolve_key<F>(credentials: &CredentialsConfig, secrets_file: &Path, env: F) -> Result<KeyMaterial>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(key) = env(&credentials.env_var).filter(|k| !k.is_empty()) {
        tracing::debug!("Using SSH key from ${}", credentials.env_var);
        return Ok(KeyMaterial(key));
    }

    if secrets_file.exists() {
        if let Some(key) = read_secrets_field(secrets_file, &credentials.secrets_field)? {
            tracing::debug!("Using SSH key from {}", secrets_file.display());
            return Ok(KeyMaterial(key));
        }
    }

    Err(Error::credential(format!(
        "missing SSH key: set {} or add {} to {}",
        credentials.env_var,
        credentials.secrets_field,
        secrets_file.display()
    )))
}

fn read_secrets_field(path: &Path, field: &str) -> Result<Option<String>> {
    let text = std::fs::read_to_string(path).map_err(|e| {
        Error::credential(format!("failed to read {}: {e}", path.display()))
    })?;

    let secrets: serde_json::Value = serde_json::from_str(&text).map_err(|e| {
        Error::credential(format!("failed to parse {}: {e}", path.display()))
    })?;

    let Some(object) = secrets.as_object() else {
        return Err(Error::credential(format!(
            "{} does not hold a JSON object",
            path.display()
        )));
    };

    match object.get(field) {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::String(key)) if key.is_empty() => Ok(None),
        Some(serde_json::Value::String(key)) => Ok(Some(key.clone())),
        Some(_) => Err(Error::credential(format!(
            "{field} in {} is not a string",
            path.display()
        ))),
    }
}
