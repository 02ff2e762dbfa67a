pub use sm_core::config::*;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Settings file looked up in the working directory when none is given.
pub const DEFAULT_SETTINGS_FILE: &str = "sync-media.toml";

/// Load settings from a TOML file
pub fn load_settings(path: &Path) -> Result<Settings> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read settings file: {:?}", path))?;

    let settings = Settings::from_toml(&content)
        .with_context(|| format!("Failed to parse settings file: {:?}", path))?;

    Ok(settings)
}

/// Load settings from an explicit path, the default location in `workdir`, or
/// fall back to built-in defaults. Paths in the result are resolved against
/// `workdir`.
pub fn load_settings_or_default(custom_path: Option<&Path>, workdir: &Path) -> Result<Settings> {
    let mut settings = match custom_path {
        Some(path) => load_settings(&expand(path, workdir))?,
        None => {
            let default_path = workdir.join(DEFAULT_SETTINGS_FILE);
            if default_path.exists() {
                load_settings(&default_path)?
            } else {
                Settings::default()
            }
        }
    };

    resolve_paths(&mut settings, workdir);
    Ok(settings)
}

/// Determine the working directory: the explicit one, otherwise the directory
/// holding the running executable.
pub fn resolve_workdir(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(dir) = explicit {
        let dir = PathBuf::from(shellexpand::tilde(&dir.to_string_lossy()).into_owned());
        if !dir.is_dir() {
            anyhow::bail!("Working directory does not exist: {:?}", dir);
        }
        return Ok(dir);
    }

    let exe = std::env::current_exe().context("Failed to locate the running executable")?;
    exe.parent()
        .map(Path::to_path_buf)
        .with_context(|| format!("Executable has no parent directory: {:?}", exe))
}

/// Rewrite every configured path so it is usable regardless of the process's
/// current directory.
pub fn resolve_paths(settings: &mut Settings, workdir: &Path) {
    let paths = &mut settings.paths;
    paths.blobs = expand(&paths.blobs, workdir);
    paths.staging = expand(&paths.staging, workdir);
    paths.log_file = expand(&paths.log_file, workdir);
    paths.secrets_file = expand(&paths.secrets_file, workdir);

    let tools = &mut settings.tools;
    for tool in [
        &mut tools.ssh_agent_path,
        &mut tools.ssh_add_path,
        &mut tools.rsync_path,
    ] {
        if let Some(path) = tool.as_mut() {
            *path = expand(path, workdir);
        }
    }
}

fn expand(path: &Path, workdir: &Path) -> PathBuf {
    let expanded = PathBuf::from(shellexpand::tilde(&path.to_string_lossy()).into_owned());
    if expanded.is_absolute() {
        expanded
    } else {
        workdir.join(expanded)
    }
}
