use crate::cli::{BuildArgs, RunOptions};
use crate::config::PartialRunConfig;
use crate::error::{CliError, Result};
use molshape::core::geometry::configuration::MAX_STERIC_NUMBER;
use molshape::core::models::topology::BondOrder;
use molshape::core::physics::params::PhysicsConfig;
use molshape::engine::molecule::Molecule;
use tracing::info;

pub fn run(args: &BuildArgs, options: &RunOptions) -> Result<()> {
    let config = PartialRunConfig::load(options.config.as_deref())?
        .merge_with_cli(options, &args.timing)?;
    let molecule = build_molecule(args, config.physics)?;
    super::relax_and_report(molecule, &config, options)
}

/// Places the requested groups around a fresh central atom, one suggested direction at a time.
pub fn build_molecule(args: &BuildArgs, physics: PhysicsConfig) -> Result<Molecule> {
    let steric_number = args.bonds + args.double + args.triple + args.lone_pairs;
    if steric_number == 0 {
        return Err(CliError::Argument(
            "At least one bond or lone pair is required.".to_string(),
        ));
    }
    if steric_number > MAX_STERIC_NUMBER {
        return Err(CliError::Argument(format!(
            "A central atom holds at most {} groups (requested {}).",
            MAX_STERIC_NUMBER, steric_number
        )));
    }

    let mut molecule = Molecule::try_new(physics)?;
    info!(
        bonds = args.bonds,
        double = args.double,
        triple = args.triple,
        lone_pairs = args.lone_pairs,
        "Building molecule."
    );

    let bonds = [
        (BondOrder::Triple, args.triple),
        (BondOrder::Double, args.double),
        (BondOrder::Single, args.bonds),
    ];
    for (order, count) in bonds {
        for _ in 0..count {
            let atom = molecule.add_radial_group(false, order)?;
            molecule.add_terminal_lone_pairs(atom, args.terminal_lone_pairs)?;
        }
    }
    for _ in 0..args.lone_pairs {
        molecule.add_radial_group(true, BondOrder::LonePair)?;
    }
    Ok(molecule)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::TimingArgs;
    use molshape::core::geometry::vsepr::VseprConfiguration;

    fn args(bonds: usize, lone_pairs: usize) -> BuildArgs {
        BuildArgs {
            bonds,
            double: 0,
            triple: 0,
            lone_pairs,
            terminal_lone_pairs: 0,
            timing: TimingArgs {
                time: Some(1.0),
                dt: None,
            },
        }
    }

    #[test]
    fn builds_the_requested_configuration() {
        let mut request = args(2, 2);
        request.double = 1;
        request.lone_pairs = 1;
        let molecule = build_molecule(&request, PhysicsConfig::default()).unwrap();
        assert_eq!(molecule.vsepr_configuration(), VseprConfiguration::new(3, 1));
        let doubles = molecule
            .bonds()
            .iter()
            .filter(|b| b.order == BondOrder::Double)
            .count();
        assert_eq!(doubles, 1);
    }

    #[test]
    fn terminal_lone_pairs_are_added_to_each_atom() {
        let mut request = args(2, 0);
        request.terminal_lone_pairs = 3;
        let molecule = build_molecule(&request, PhysicsConfig::default()).unwrap();
        assert_eq!(molecule.distant_lone_pairs().len(), 6);
        assert_eq!(molecule.group_count(), 9);
    }

    #[test]
    fn rejects_empty_and_overfull_requests() {
        assert!(matches!(
            build_molecule(&args(0, 0), PhysicsConfig::default()),
            Err(CliError::Argument(_))
        ));
        assert!(matches!(
            build_molecule(&args(5, 2), PhysicsConfig::default()),
            Err(CliError::Argument(_))
        ));
    }

    #[test]
    fn run_writes_a_report() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("ax3e.toml");
        let options = RunOptions {
            output: Some(output.clone()),
            ..RunOptions::default()
        };
        run(&args(3, 1), &options).unwrap();
        let content = std::fs::read_to_string(output).unwrap();
        assert!(content.contains("axe = \"AX3E\""));
        assert!(content.contains("molecular-shape = \"Trigonal Pyramidal\""));
    }
}
