//! Command-line interface.

use std::path::PathBuf;

use clap::Parser;

use docklambda::sensors::dock::DockOrientation;

/// Dock edge argument for CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum DockArg {
    Left,
    Bottom,
    Right,
}

impl From<DockArg> for DockOrientation {
    fn from(arg: DockArg) -> Self {
        match arg {
            DockArg::Left => DockOrientation::Left,
            DockArg::Bottom => DockOrientation::Bottom,
            DockArg::Right => DockOrientation::Right,
        }
    }
}

/// docklambda - a dock-side pet that naps when your CPU does
#[derive(Debug, Parser)]
#[command(name = "docklambda")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Preference directory (default: <config dir>/DockLambda)
    #[arg(long, value_name = "DIR")]
    pub prefs_dir: Option<PathBuf>,

    /// Keep settings in memory only
    #[arg(long, conflicts_with = "prefs_dir")]
    pub ephemeral: bool,

    /// Sprite directory (overrides config)
    #[arg(long, value_name = "DIR")]
    pub sprites: Option<PathBuf>,

    /// Pretend the dock preference says this edge
    #[arg(long, value_enum, value_name = "EDGE")]
    pub dock: Option<DockArg>,

    /// Exit after the specified number of seconds
    #[arg(long, value_name = "SECONDS")]
    pub exit_after: Option<u64>,
}
