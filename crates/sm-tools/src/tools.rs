//! External tool detection and management.
//!
//! The [`ToolRegistry`] discovers and caches the locations of the external CLI
//! tools the sync phase drives (ssh-agent, ssh-add, rsync) and provides lookup
//! methods for the rest of the workspace.

use std::collections::HashMap;
use std::path::PathBuf;

use sm_core::config::ToolsConfig;

/// Known tool names that the registry manages.
pub const KNOWN_TOOLS: &[&str] = &["ssh-agent", "ssh-add", "rsync"];

/// Availability information for a tool, returned by [`ToolRegistry::check_all`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolInfo {
    /// Tool name.
    pub name: String,
    /// Whether the tool was found.
    pub available: bool,
    /// Resolved path to the executable.
    pub path: Option<PathBuf>,
}

/// Registry holding discovered tool paths.
#[derive(Debug, Clone, Default)]
pub struct ToolRegistry {
    tools: HashMap<String, PathBuf>,
}

impl ToolRegistry {
    /// Discover tools by searching `PATH` (or using overrides from settings).
    ///
    /// For each known tool, if the [`ToolsConfig`] supplies a custom path
    /// **and** that path exists, it is used directly. Otherwise [`which::which`]
    /// locates the tool in `PATH`. Tools that are not found are omitted from the
    /// registry and reported by [`require`](Self::require).
    pub fn discover(tools_config: &ToolsConfig) -> Self {
        let mut tools = HashMap::new();

        for &name in KNOWN_TOOLS {
            let custom_path = match name {
                "ssh-agent" => tools_config.ssh_agent_path.as_deref(),
                "ssh-add" => tools_config.ssh_add_path.as_deref(),
                "rsync" => tools_config.rsync_path.as_deref(),
                _ => None,
            };

            let resolved = match custom_path {
                Some(p) if p.exists() => Some(p.to_path_buf()),
                Some(p) => {
                    tracing::warn!(
                        "Configured path for {name} does not exist: {}; searching PATH",
                        p.display()
                    );
                    which::which(name).ok()
                }
                None => which::which(name).ok(),
            };

            if let Some(path) = resolved {
                tracing::debug!("Found {name} at {}", path.display());
                tools.insert(name.to_string(), path);
            }
        }

        Self { tools }
    }

    /// Build a registry from explicit `(name, path)` pairs without touching
    /// `PATH`.
    pub fn from_paths<N, P>(entries: impl IntoIterator<Item = (N, P)>) -> Self
    where
        N: Into<String>,
        P: Into<PathBuf>,
    {
        Self {
            tools: entries
                .into_iter()
                .map(|(n, p)| (n.into(), p.into()))
                .collect(),
        }
    }

    /// Return the path for the given tool, or an [`sm_core::Error::Tool`] if
    /// the tool was not found during discovery.
    pub fn require(&self, name: &str) -> sm_core::Result<&PathBuf> {
        self.tools.get(name).ok_or_else(|| {
            sm_core::Error::tool(name, format!("{name} not found; is it installed and in PATH?"))
        })
    }

    /// Check all known tools and return availability information.
    pub fn check_all(&self) -> Vec<ToolInfo> {
        KNOWN_TOOLS
            .iter()
            .map(|&name| ToolInfo {
                name: name.to_string(),
                available: self.tools.contains_key(name),
                path: self.tools.get(name).cloned(),
            })
            .collect()
    }
}
