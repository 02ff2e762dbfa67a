//! SSH agent bridge.
//!
//! `ssh-agent -s` prints Bourne-shell assignments such as
//!
//! ```text
//! SSH_AUTH_SOCK=/tmp/ssh-XXXXXXa1b2c3/agent.4242; export SSH_AUTH_SOCK;
//! SSH_AGENT_PID=4243; export SSH_AGENT_PID;
//! echo Agent pid 4243;
//! ```
//!
//! Those values are captured into an [`AgentSession`] and applied to the
//! environment of each child that talks to the agent.

use std::path::PathBuf;

use sm_core::{Error, Result};
use sm_tools::{CommandRunner, ToolCommand, ToolRegistry};

use super::credentials::KeyMaterial;

/// Socket path variable reported by the agent.
pub const AUTH_SOCK_VAR: &str = "SSH_AUTH_SOCK";
/// Process id variable reported by the agent.
pub const AGENT_PID_VAR: &str = "SSH_AGENT_PID";

/// Connection details of a running agent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AgentSession {
    auth_sock: Option<String>,
    agent_pid: Option<String>,
}

impl AgentSession {
    /// Extract the agent variables from `ssh-agent -s` output. Unrecognised
    /// lines are ignored; output without either variable yields an empty
    /// session.
    pub fn parse(stdout: &str) -> Self {
        let mut session = Self::default();

        for line in stdout.lines() {
            for (name, slot) in [
                (AUTH_SOCK_VAR, &mut session.auth_sock),
                (AGENT_PID_VAR, &mut session.agent_pid),
            ] {
                let Some(rest) = line.strip_prefix(name) else {
                    continue;
                };
                let Some(value) = rest.strip_prefix('=') else {
                    continue;
                };
                let value = value.split(';').next().unwrap_or_default();
                *slot = Some(value.to_string());
            }
        }

        session
    }

    /// True when the agent reported neither variable.
    pub fn is_empty(&self) -> bool {
        self.auth_sock.is_none() && self.agent_pid.is_none()
    }

    pub fn auth_sock(&self) -> Option<&str> {
        self.auth_sock.as_deref()
    }

    pub fn agent_pid(&self) -> Option<&str> {
        self.agent_pid.as_deref()
    }

    /// Set the captured variables on `cmd`'s child environment.
    pub fn apply(&self, cmd: &mut ToolCommand) {
        if let Some(ref sock) = self.auth_sock {
            cmd.env(AUTH_SOCK_VAR, sock);
        }
        if let Some(ref pid) = self.agent_pid {
            cmd.env(AGENT_PID_VAR, pid);
        }
    }
}

/// Drives `ssh-agent` and `ssh-add` through a [`CommandRunner`].
pub struct AgentBridge<'a, R: CommandRunner> {
    runner: &'a R,
    ssh_agent: PathBuf,
    ssh_add: PathBuf,
}

impl<'a, R: CommandRunner> AgentBridge<'a, R> {
    /// Resolve both agent tools up front so a missing one fails before any
    /// process is started.
    pub fn new(runner: &'a R, tools: &ToolRegistry) -> Result<Self> {
        Ok(Self {
            runner,
            ssh_agent: tools.require("ssh-agent")?.clone(),
            ssh_add: tools.require("ssh-add")?.clone(),
        })
    }

    /// Launch the agent and capture its connection details.
    ///
    /// Unexpected output or a non-zero exit only logs a warning; the resulting
    /// empty session makes the key load fail instead.
    pub fn start(&self) -> Result<AgentSession> {
        let mut cmd = ToolCommand::new(self.ssh_agent.clone());
        cmd.arg("-s");

        let output = self.runner.output(&cmd)?;
        if !output.success() {
            tracing::warn!(
                "ssh-agent exited with {}: {}",
                output.status_text(),
                output.combined()
            );
        }

        let session = AgentSession::parse(&output.stdout);
        if session.is_empty() {
            tracing::warn!("ssh-agent reported no {AUTH_SOCK_VAR} or {AGENT_PID_VAR}");
        } else {
            tracing::debug!("ssh-agent started (pid {})", session.agent_pid().unwrap_or("?"));
        }

        Ok(session)
    }

    /// Load `key` into the agent by piping it to `ssh-add -`.
    ///
    /// # Errors
    ///
    /// [`Error::Credential`] when `ssh-add` exits unsuccessfully; its combined
    /// output is logged at error level.
    pub fn add_key(&self, session: &AgentSession, key: &KeyMaterial) -> Result<()> {
        let mut cmd = ToolCommand::new(self.ssh_add.clone());
        cmd.arg("-").stdin(key.as_bytes().to_vec());
        session.apply(&mut cmd);

        let output = self.runner.output(&cmd)?;
        let combined = output.combined();

        if !output.success() {
            tracing::error!("failure adding SSH key to agent: {combined}");
            return Err(Error::credential(format!(
                "failure adding SSH key to agent ({})",
                output.status_text()
            )));
        }

        if !combined.is_empty() {
            tracing::info!("ssh-add output: {combined}");
        }

        Ok(())
    }

    /// Stop the agent with `ssh-agent -k`. Failures are logged, never returned.
    pub fn shutdown(&self, session: &AgentSession) {
        if session.agent_pid().is_none() {
            return;
        }

        let mut cmd = ToolCommand::new(self.ssh_agent.clone());
        cmd.arg("-k");
        session.apply(&mut cmd);

        match self.runner.output(&cmd) {
            Ok(output) if output.success() => tracing::debug!("ssh-agent stopped"),
            Ok(output) => tracing::warn!(
                "ssh-agent -k exited with {}: {}",
                output.status_text(),
                output.combined()
            ),
            Err(e) => tracing::warn!("Failed to stop ssh-agent: {e}"),
        }
    }
}
