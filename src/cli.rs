use clap::Parser;
use std::path::PathBuf;

use sync_media::controller::RunOptions;

#[derive(Debug, Parser)]
#[command(name = "sync-media")]
#[command(author, version, about = "Stage media and store it on the content-distribution host")]
pub struct Cli {
    /// Name of the remote host to sync with
    #[arg(long, required = true)]
    pub host: String,

    /// Use checksums to determine which files need to be sent
    #[arg(long)]
    pub checksums: bool,

    /// The staging area is already populated; skip straight to the sync
    #[arg(long)]
    pub staged: bool,

    /// Show progress and errors on the console
    #[arg(long)]
    pub verbose: bool,

    /// Path to settings file (defaults to sync-media.toml in the working directory)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Base directory for relative paths (defaults to the executable's directory)
    #[arg(long)]
    pub workdir: Option<PathBuf>,
}

impl Cli {
    /// Split out the per-run options the controller consumes.
    pub fn run_options(&self) -> RunOptions {
        RunOptions {
            host: self.host.clone(),
            checksums: self.checksums,
            staged: self.staged,
            verbose: self.verbose,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn host_is_required() {
        let err = Cli::try_parse_from(["sync-media"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn flags_default_off() {
        let cli = Cli::try_parse_from(["sync-media", "--host", "cdn.example.net"]).unwrap();
        let opts = cli.run_options();
        assert_eq!(opts.host, "cdn.example.net");
        assert!(!opts.checksums);
        assert!(!opts.staged);
        assert!(!opts.verbose);
        assert!(cli.config.is_none());
        assert!(cli.workdir.is_none());
    }

    #[test]
    fn all_flags() {
        let cli = Cli::try_parse_from([
            "sync-media",
            "--host",
            "cdn.example.net",
            "--checksums",
            "--staged",
            "--verbose",
            "--workdir",
            "/srv/media/bin",
        ])
        .unwrap();
        let opts = cli.run_options();
        assert!(opts.checksums);
        assert!(opts.staged);
        assert!(opts.verbose);
        assert_eq!(cli.workdir, Some(PathBuf::from("/srv/media/bin")));
    }
}
