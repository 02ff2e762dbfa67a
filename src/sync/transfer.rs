//! rsync invocation for the one-way mirror.

use std::path::Path;

use sm_core::config::RemoteConfig;
use sm_tools::ToolCommand;

use super::agent::AgentSession;

/// `user@host:directory` destination.
pub fn remote_target(remote: &RemoteConfig, host: &str) -> String {
    format!("{}@{}:{}", remote.user, host, remote.directory)
}

/// Build the mirroring command.
///
/// The source keeps a trailing slash so rsync copies the contents of the
/// staging root rather than the directory itself. `--delete` removes remote
/// files that are gone locally. Comparison is `--checksum` when `checksums` is
/// set and `--size-only` otherwise.
pub fn build_transfer(
    rsync: &Path,
    staging_root: &Path,
    remote: &RemoteConfig,
    host: &str,
    checksums: bool,
    session: &AgentSession,
) -> ToolCommand {
    let source = format!("{}/", staging_root.to_string_lossy().trim_end_matches('/'));
    let compare = if checksums { "--checksum" } else { "--size-only" };

    let mut cmd = ToolCommand::new(rsync.to_path_buf());
    cmd.args(["--delete", compare, "-aze", "ssh"])
        .arg(source)
        .arg(remote_target(remote, host));
    session.apply(&mut cmd);
    cmd
}
