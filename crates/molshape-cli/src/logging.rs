use crate::error::{CliError, Result};
use std::fs::File;
use std::path::PathBuf;
use tracing::Subscriber;
use tracing_subscriber::{
    filter::{LevelFilter, Targets},
    fmt::{self, format::FmtSpan},
    prelude::*,
    registry::LookupSpan,
    Layer,
};

/// Target of the diagnostics emitted on every simulation tick.
const TICK_TARGET: &str = "molshape::engine::dynamics";

/// Verbosity at which the terminal also shows the per-tick stream.
const TICK_VERBOSITY: u8 = 4;

pub fn level_filter(verbosity: u8, quiet: bool) -> LevelFilter {
    if quiet {
        LevelFilter::ERROR
    } else {
        match verbosity {
            0 => LevelFilter::WARN,
            1 => LevelFilter::INFO,
            2 => LevelFilter::DEBUG,
            _ => LevelFilter::TRACE,
        }
    }
}

/// Terminal filter. A relaxation traces every group on every tick, so that stream stays at
/// DEBUG until `-vvvv` asks for it.
pub fn stderr_targets(verbosity: u8, quiet: bool) -> Targets {
    let level = level_filter(verbosity, quiet);
    let ticks = if verbosity >= TICK_VERBOSITY {
        level
    } else {
        level.min(LevelFilter::DEBUG)
    };
    Targets::new()
        .with_default(level)
        .with_target(TICK_TARGET, ticks)
}

/// Log file filter. The file records at least INFO whatever the terminal shows, and takes the
/// per-tick stream from `-vvv` on.
pub fn file_targets(verbosity: u8) -> Targets {
    let level = level_filter(verbosity, false).max(LevelFilter::INFO);
    let ticks = if verbosity >= 3 {
        LevelFilter::TRACE
    } else {
        level.min(LevelFilter::DEBUG)
    };
    Targets::new()
        .with_default(level)
        .with_target(TICK_TARGET, ticks)
}

fn file_layer<S>(file: File, verbosity: u8) -> impl Layer<S>
where
    S: Subscriber + for<'span> LookupSpan<'span>,
{
    fmt::layer()
        .with_writer(file)
        .with_ansi(false)
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_filter(file_targets(verbosity))
}

pub fn setup_logging(verbosity: u8, quiet: bool, log_file: Option<PathBuf>) -> Result<()> {
    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(true)
        .with_target(false)
        .compact()
        .with_filter(stderr_targets(verbosity, quiet));

    let file_output = log_file
        .map(|path| File::create(&path).map(|file| file_layer(file, verbosity)))
        .transpose()
        .map_err(CliError::Io)?;

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(file_output)
        .init();
    Ok(())
}
