use crate::cli::{RealArgs, RunOptions};
use crate::config::PartialRunConfig;
use crate::error::Result;
use crate::utils::parser;
use molshape::engine::molecule::Molecule;
use tracing::info;

pub fn run(args: &RealArgs, options: &RunOptions) -> Result<()> {
    let shape = parser::parse_formula(&args.formula)?;
    let config = PartialRunConfig::load(options.config.as_deref())?
        .merge_with_cli(options, &args.timing)?;

    info!("Loading {} ({}).", shape.name, shape.formula);
    let molecule = Molecule::from_real_shape(shape, config.physics)?;
    super::relax_and_report(molecule, &config, options)
}
