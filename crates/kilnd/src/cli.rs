//! Command line interface of the host daemon.

use camino::Utf8PathBuf;
use clap::Parser;

/// Command line arguments accepted by `kilnd`.
#[derive(Debug, Clone, Default, Parser)]
#[command(name = "kilnd", version, about = "Kiln modular application host")]
pub struct Cli {
    /// Base directory for configuration, plugins, and data.
    #[arg(short, long, value_name = "DIR")]
    pub basedir: Option<Utf8PathBuf>,

    /// Configuration file to use instead of `config.yaml` in the base
    /// directory.
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<Utf8PathBuf>,

    /// Enable debug logging.
    #[arg(short, long)]
    pub debug: bool,

    /// Increase logging verbosity (repeatable).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Start with only bundled plugins enabled.
    #[arg(long)]
    pub safe_mode: bool,
}
