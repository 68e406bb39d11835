use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author = "The molshape Developers",
    version,
    about = "molshape CLI - Relax molecules into the shapes predicted by electron-pair repulsion (VSEPR) and inspect real molecular geometries.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE, -vvvv adds per-tick traces)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    #[command(flatten)]
    pub run: RunOptions,
}

/// Options shared by every command that relaxes a molecule.
#[derive(Args, Debug, Clone, Default)]
pub struct RunOptions {
    /// Path to a TOML file with `[physics]` and `[relaxation]` settings.
    #[arg(short, long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S physics.damping-factor=0.2
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", global = true)]
    pub set_values: Vec<String>,

    /// Write the relaxed geometry as a TOML report to this path.
    #[arg(short, long, global = true, value_name = "PATH")]
    pub output: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build a molecule from counts of bonds and lone pairs and relax it.
    Build(BuildArgs),
    /// Load a molecule with experimental geometry and relax its lone pairs.
    Real(RealArgs),
    /// List the molecules available to the `real` command.
    List,
}

/// Overrides for the relaxation time limit.
#[derive(Args, Debug, Clone, Copy, Default)]
pub struct TimingArgs {
    /// Simulated seconds to relax for, overriding `relaxation.max-time`.
    #[arg(short, long, value_name = "SECONDS")]
    pub time: Option<f64>,

    /// Simulated seconds per tick, overriding `relaxation.time-step`.
    #[arg(long, value_name = "SECONDS")]
    pub dt: Option<f64>,
}

/// Arguments for the `build` subcommand.
#[derive(Args, Debug)]
pub struct BuildArgs {
    /// Number of single bonds to the central atom.
    #[arg(short, long, default_value_t = 0, value_name = "INT")]
    pub bonds: usize,

    /// Number of double bonds to the central atom.
    #[arg(long, default_value_t = 0, value_name = "INT")]
    pub double: usize,

    /// Number of triple bonds to the central atom.
    #[arg(long, default_value_t = 0, value_name = "INT")]
    pub triple: usize,

    /// Number of lone pairs on the central atom.
    #[arg(short, long, default_value_t = 0, value_name = "INT")]
    pub lone_pairs: usize,

    /// Lone pairs to add to every bonded atom.
    #[arg(long, default_value_t = 0, value_name = "INT")]
    pub terminal_lone_pairs: usize,

    #[command(flatten)]
    pub timing: TimingArgs,
}

/// Arguments for the `real` subcommand.
#[derive(Args, Debug)]
pub struct RealArgs {
    /// Molecular formula, e.g. 'H2O' or 'XeF4' (see `molshape list`).
    #[arg(required = true, value_name = "FORMULA")]
    pub formula: String,

    #[command(flatten)]
    pub timing: TimingArgs,
}
