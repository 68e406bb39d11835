pub mod build;
pub mod list;
pub mod real;

use crate::cli::RunOptions;
use crate::config::RunConfig;
use crate::error::Result;
use crate::utils::progress::CliProgressHandler;
use crate::utils::report::GeometryReport;
use molshape::engine::molecule::Molecule;
use molshape::engine::progress::ProgressReporter;
use molshape::workflows;
use tracing::info;

/// Relaxes `molecule`, prints a summary and writes the report requested by `--output`.
fn relax_and_report(
    mut molecule: Molecule,
    config: &RunConfig,
    options: &RunOptions,
) -> Result<()> {
    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    println!("Relaxing {}...", molecule.vsepr_configuration());
    info!("Invoking the relaxation workflow...");
    let result = workflows::relax::run(&mut molecule, &config.relax, &reporter)?;

    let report = GeometryReport::from_molecule(&molecule, &result);
    for line in report.summary_lines() {
        println!("{}", line);
    }

    if let Some(path) = &options.output {
        info!("Writing geometry report to {:?}", path);
        report.write_to(path)?;
        println!("✓ Geometry report written to: {}", path.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::TimingArgs;
    use crate::config::PartialRunConfig;
    use crate::error::CliError;
    use molshape::core::shapes::real::WATER;

    fn water_run(options: &RunOptions) -> Result<()> {
        let timing = TimingArgs {
            time: Some(1.0),
            dt: None,
        };
        let config = PartialRunConfig::default().merge_with_cli(options, &timing)?;
        let molecule = Molecule::from_real_shape(&WATER, config.physics)?;
        relax_and_report(molecule, &config, options)
    }

    #[test]
    fn relaxing_without_output_writes_nothing() {
        assert!(water_run(&RunOptions::default()).is_ok());
    }

    #[test]
    fn unwritable_report_path_fails_the_run() {
        let dir = tempfile::tempdir().unwrap();
        let options = RunOptions {
            output: Some(dir.path().join("missing").join("water.toml")),
            ..RunOptions::default()
        };
        assert!(matches!(water_run(&options), Err(CliError::Io(_))));
    }
}
