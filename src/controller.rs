//! Top-level sequencing: stage (unless skipped), then sync.

use std::io::Write;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use sm_core::config::Settings;
use sm_tools::{CommandRunner, ToolRegistry};

use crate::stage::{list_blobs, StagingArea, Transcoder};
use crate::sync::{build_transfer, resolve_key, AgentBridge};

/// Per-run options taken from the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOptions {
    /// Remote host to mirror to.
    pub host: String,
    /// Compare by checksum instead of size.
    pub checksums: bool,
    /// Staging area is already populated; skip the stage phase.
    pub staged: bool,
    /// Echo progress to stderr.
    pub verbose: bool,
}

/// Outcome of the stage phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageReport {
    pub count: usize,
    pub elapsed: Duration,
}

/// Outcome of a whole run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// `None` when staging was skipped.
    pub staged: Option<StageReport>,
    pub elapsed: Duration,
}

type EnvLookup<'a> = Box<dyn Fn(&str) -> Option<String> + 'a>;

/// Runs the stage and sync phases in order.
pub struct Controller<'a, R: CommandRunner> {
    options: &'a RunOptions,
    settings: &'a Settings,
    runner: R,
    tools: Option<ToolRegistry>,
    env: EnvLookup<'a>,
    count: usize,
}

impl<'a, R: CommandRunner> Controller<'a, R> {
    pub fn new(options: &'a RunOptions, settings: &'a Settings, runner: R) -> Self {
        Self {
            options,
            settings,
            runner,
            tools: None,
            env: Box::new(|name| std::env::var(name).ok()),
            count: 0,
        }
    }

    /// Use `tools` instead of discovering them on `PATH`.
    pub fn with_tools(mut self, tools: ToolRegistry) -> Self {
        self.tools = Some(tools);
        self
    }

    /// Replace the environment lookup used for the key variable.
    pub fn with_env(mut self, env: impl Fn(&str) -> Option<String> + 'a) -> Self {
        self.env = Box::new(env);
        self
    }

    /// Number of source items processed so far.
    pub fn count(&self) -> usize {
        self.count
    }

    pub fn run(&mut self) -> Result<RunSummary> {
        let start = Instant::now();

        let staged = if self.options.staged {
            tracing::info!(
                "using existing staging area {}",
                self.settings.paths.staging.display()
            );
            None
        } else {
            Some(self.stage()?)
        };

        self.sync()?;

        let elapsed = start.elapsed();
        if staged.is_some() {
            tracing::info!(
                "processed {} files in {}",
                self.count,
                format_elapsed(elapsed)
            );
            if self.options.verbose {
                eprintln!("total processing time: {}", format_elapsed(elapsed));
            }
        }

        Ok(RunSummary { staged, elapsed })
    }

    /// Rebuild the staging area from the blob directory.
    pub fn stage(&mut self) -> Result<StageReport> {
        let start = Instant::now();
        let paths = &self.settings.paths;

        let area = StagingArea::ensure_clean(&paths.staging)?;
        let transcoder = Transcoder::new(&area, &self.settings.images, &self.settings.audio);

        for path in list_blobs(&paths.blobs)? {
            let item = transcoder.stage(&path)?;
            tracing::debug!(
                "staged {} as {} artifact(s)",
                path.display(),
                item.artifacts.len()
            );

            self.count += 1;
            if self.options.verbose {
                eprint!("\rstaged {} files ... ", self.count);
            }
        }

        let elapsed = start.elapsed();
        tracing::info!("staged {} files in {}", self.count, format_elapsed(elapsed));
        if self.options.verbose {
            eprintln!("done in {}", format_elapsed(elapsed));
        }

        Ok(StageReport {
            count: self.count,
            elapsed,
        })
    }

    /// Authenticate through a fresh agent and mirror the staging area.
    ///
    /// The key is resolved before any process is launched, so missing
    /// credentials never reach the agent or the transfer.
    pub fn sync(&mut self) -> Result<()> {
        let host = &self.options.host;
        tracing::info!("syncing with {host}");
        if self.options.verbose {
            eprint!("syncing with {host} ... ");
            let _ = std::io::stderr().flush();
        }
        let start = Instant::now();

        let key = resolve_key(
            &self.settings.credentials,
            &self.settings.paths.secrets_file,
            &self.env,
        )?;

        let tools = match self.tools.take() {
            Some(tools) => tools,
            None => ToolRegistry::discover(&self.settings.tools),
        };
        for info in tools.check_all().iter().filter(|info| !info.available) {
            tracing::debug!("{} not available", info.name);
        }
        let rsync = tools.require("rsync")?.clone();
        let bridge = AgentBridge::new(&self.runner, &tools)?;

        let session = bridge.start().context("Failed to start ssh-agent")?;
        let result = bridge.add_key(&session, &key).and_then(|()| {
            let cmd = build_transfer(
                &rsync,
                &self.settings.paths.staging,
                &self.settings.remote,
                host,
                self.options.checksums,
                &session,
            );
            tracing::debug!("transfer: {cmd}");
            self.runner.run(&cmd)
        });
        bridge.shutdown(&session);
        result?;

        let elapsed = start.elapsed();
        tracing::info!("synced {} files in {}", self.count, format_elapsed(elapsed));
        if self.options.verbose {
            eprintln!("done in {}", format_elapsed(elapsed));
        }

        Ok(())
    }
}

/// Render a duration as `H:MM:SS.ffffff`.
pub fn format_elapsed(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    format!(
        "{}:{:02}:{:02}.{:06}",
        secs / 3600,
        (secs / 60) % 60,
        secs % 60,
        elapsed.subsec_micros()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_elapsed_matches_clock_layout() {
        assert_eq!(format_elapsed(Duration::ZERO), "0:00:00.000000");
        assert_eq!(
            format_elapsed(Duration::from_micros(1_234_567)),
            "0:00:01.234567"
        );
        assert_eq!(
            format_elapsed(Duration::from_secs(3 * 3600 + 25 * 60 + 7)),
            "3:25:07.000000"
        );
        assert_eq!(format_elapsed(Duration::from_secs(30 * 3600)), "30:00:00.000000");
    }
}
