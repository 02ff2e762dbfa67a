//! The seam between the sync phase and real processes.

use crate::command::{ToolCommand, ToolOutput};

/// Executes [`ToolCommand`]s on behalf of the sync phase.
///
/// [`SystemRunner`] spawns real processes. Tests substitute an implementation
/// that records the commands it receives and replies with canned output.
pub trait CommandRunner {
    /// Run `cmd` capturing its output. A non-zero exit is returned in
    /// [`ToolOutput::code`], not as an error.
    fn output(&self, cmd: &ToolCommand) -> sm_core::Result<ToolOutput>;

    /// Run `cmd` with inherited stdio, failing on a non-zero exit.
    fn run(&self, cmd: &ToolCommand) -> sm_core::Result<()>;
}

/// Runs commands as child processes of the current process.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn output(&self, cmd: &ToolCommand) -> sm_core::Result<ToolOutput> {
        tracing::debug!("exec: {cmd}");
        cmd.output()
    }

    fn run(&self, cmd: &ToolCommand) -> sm_core::Result<()> {
        tracing::debug!("exec: {cmd}");
        cmd.run()
    }
}

impl<R: CommandRunner + ?Sized> CommandRunner for &R {
    fn output(&self, cmd: &ToolCommand) -> sm_core::Result<ToolOutput> {
        (**self).output(cmd)
    }

    fn run(&self, cmd: &ToolCommand) -> sm_core::Result<()> {
        (**self).run(cmd)
    }
}
