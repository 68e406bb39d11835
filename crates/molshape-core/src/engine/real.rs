use super::attractor::find_closest_matching_configuration;
use super::error::{EngineError, MoleculeError};
use super::molecule::{Molecule, MoleculeKind};
use super::permutation::Permutation;
use crate::core::geometry::configuration::GeometryConfiguration;
use crate::core::models::group::PairGroup;
use crate::core::models::topology::BondOrder;
use crate::core::physics::params::PhysicsConfig;
use crate::core::shapes::real::RealMoleculeShape;
use nalgebra::Vector3;
use tracing::debug;

impl Molecule {
    /// Builds a locked molecule from experimental coordinates.
    ///
    /// Bonded atoms are placed exactly where the data puts them and never move. Lone pairs are
    /// added at the molecule's lone-pair distance: those on radial atoms complete each atom's
    /// ideal geometry, and those on the central atom fill the slots of the ideal geometry left
    /// free after fitting it to the bonded atoms. The resulting central arrangement becomes the
    /// target the lone pairs are held to.
    pub fn from_real_shape(
        shape: &'static RealMoleculeShape,
        config: PhysicsConfig,
    ) -> Result<Self, EngineError> {
        config.validate()?;
        let mut molecule = Self::with_central_element(config, Some(shape.central));
        let center = molecule.central_atom();
        let lone_pair_distance = shape.lone_pair_distance(&config);

        for atom in shape.radial {
            let id = molecule.insert_group_and_bond(
                PairGroup::atom(atom.position(), Some(atom.element)),
                center,
                atom.bond_order,
                atom.bond_length(),
            )?;
            molecule.place_terminal_lone_pairs(id, atom.lone_pairs, lone_pair_distance)?;
        }
        molecule.place_central_lone_pairs(shape.central_lone_pairs, lone_pair_distance)?;

        let central_shape = molecule.real_central_shape()?;
        molecule.kind = MoleculeKind::Real {
            shape,
            central_shape,
        };
        debug!(
            formula = shape.formula,
            groups = molecule.group_count(),
            "Built real molecule."
        );
        Ok(molecule)
    }

    fn place_central_lone_pairs(&mut self, count: usize, distance: f64) -> Result<(), EngineError> {
        if count == 0 {
            return Ok(());
        }
        let center = self.central_atom();
        let center_position = self
            .group(center)
            .map(|g| g.position)
            .ok_or(MoleculeError::GroupNotFound(center))?;
        let atoms = self.radial_atoms();
        let steric_number = atoms.len() + count;
        let geometry = GeometryConfiguration::get(steric_number)
            .ok_or(EngineError::UnsupportedStericNumber { steric_number })?;
        let ideal = geometry.unit_vectors();

        let actual: Vec<Vector3<f64>> = atoms
            .iter()
            .filter_map(|&id| self.group(id))
            .map(|g| g.orientation_from(&center_position))
            .collect();
        let fit = find_closest_matching_configuration(
            &actual,
            &ideal[count..],
            &Permutation::all(atoms.len()),
        )?;

        for slot in &ideal[..count] {
            let position = center_position + fit.to_actual_frame(slot) * distance;
            self.insert_group_and_bond(
                PairGroup::lone_pair(position),
                center,
                BondOrder::LonePair,
                distance,
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::element::Element;
    use crate::core::shapes::real::{self, BORON_TRIFLUORIDE, WATER};

    fn water() -> Molecule {
        Molecule::from_real_shape(&WATER, PhysicsConfig::default()).unwrap()
    }

    #[test]
    fn water_keeps_experimental_atom_positions() {
        let molecule = water();
        assert!(molecule.is_real());
        assert_eq!(molecule.real_shape().map(|s| s.formula), Some("H2O"));
        assert_eq!(molecule.group(molecule.central_atom()).unwrap().element, Some(Element::O));

        let atoms = molecule.radial_atoms();
        assert_eq!(atoms.len(), 2);
        for (id, atom) in atoms.iter().zip(WATER.radial) {
            assert_eq!(molecule.group(*id).unwrap().position, atom.position());
            assert_eq!(molecule.ideal_distance(*id), Some(atom.bond_length()));
        }
        assert_eq!(molecule.vsepr_configuration(), WATER.vsepr_configuration());
        assert_eq!(molecule.maximum_bond_length(), None);
    }

    #[test]
    fn water_lone_pairs_fill_the_remaining_tetrahedral_slots() {
        let molecule = water();
        let lone_pairs = molecule.radial_lone_pairs();
        assert_eq!(lone_pairs.len(), 2);

        let lp_angle = molecule.bond_angle(lone_pairs[0], lone_pairs[1]).unwrap();
        assert!((lp_angle - 109.471_220_634).abs() < 1e-6);
        for &lp in &lone_pairs {
            for h in molecule.radial_atoms() {
                assert!(molecule.bond_angle(lp, h).unwrap() > 100.0);
            }
            let distance = molecule.group(lp).unwrap().position.norm();
            assert!((distance - WATER.lone_pair_distance(molecule.config())).abs() < 1e-9);
        }
    }

    #[test]
    fn terminal_lone_pairs_are_added_to_radial_atoms() {
        let molecule = Molecule::from_real_shape(&BORON_TRIFLUORIDE, PhysicsConfig::default())
            .unwrap();
        assert_eq!(molecule.group_count(), 13);
        assert_eq!(molecule.distant_lone_pairs().len(), 9);
        for id in molecule.radial_atoms() {
            assert_eq!(molecule.neighbor_count(id), 4);
        }
    }

    #[test]
    fn every_catalog_molecule_builds() {
        for shape in real::ALL {
            let molecule = Molecule::from_real_shape(shape, PhysicsConfig::default()).unwrap();
            assert_eq!(
                molecule.vsepr_configuration(),
                shape.vsepr_configuration(),
                "{}",
                shape.formula
            );
        }
    }

    #[test]
    fn structure_is_locked() {
        let mut molecule = water();
        let center = molecule.central_atom();
        let h = molecule.radial_atoms()[0];
        let lp = molecule.radial_lone_pairs()[0];

        assert_eq!(
            molecule.add_group_and_bond(
                PairGroup::atom(Vector3::new(1.0, 1.0, 1.0), Some(Element::H)),
                center,
                BondOrder::Single,
                1.0
            ),
            Err(MoleculeError::StructureLocked)
        );
        assert_eq!(molecule.remove_group(h), Err(MoleculeError::StructureLocked));
        assert_eq!(molecule.remove_all_groups(), Err(MoleculeError::StructureLocked));
        assert!(matches!(
            molecule.add_radial_group(true, BondOrder::LonePair),
            Err(EngineError::Molecule {
                source: MoleculeError::StructureLocked
            })
        ));
        assert_eq!(
            molecule.drag_group(h, Vector3::new(0.0, 2.0, 0.0)),
            Err(MoleculeError::ImmovableGroup(h))
        );
        assert!(molecule.drag_group(lp, Vector3::new(0.0, 0.5, 0.5)).is_ok());
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = PhysicsConfig {
            lone_pair_distance: -1.0,
            ..PhysicsConfig::default()
        };
        assert!(matches!(
            Molecule::from_real_shape(&WATER, config),
            Err(EngineError::Params { .. })
        ));
    }
}
