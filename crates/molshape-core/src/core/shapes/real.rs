use crate::core::geometry::vsepr::VseprConfiguration;
use crate::core::models::element::Element;
use crate::core::models::topology::BondOrder;
use crate::core::physics::params::PhysicsConfig;
use nalgebra::Vector3;
use phf::{Map, phf_map};

/// An atom bonded to the central atom of a real molecule.
#[derive(Debug, PartialEq)]
pub struct RealAtom {
    pub element: Element,
    pub position: [f64; 3],
    pub bond_order: BondOrder,
    /// Lone pairs carried by this atom itself.
    pub lone_pairs: usize,
}

impl RealAtom {
    const fn new(
        element: Element,
        position: [f64; 3],
        bond_order: BondOrder,
        lone_pairs: usize,
    ) -> Self {
        Self {
            element,
            position,
            bond_order,
            lone_pairs,
        }
    }

    pub fn position(&self) -> Vector3<f64> {
        Vector3::new(self.position[0], self.position[1], self.position[2])
    }

    pub fn bond_length(&self) -> f64 {
        self.position().norm()
    }
}

/// The experimental structure of a molecule with a single central atom.
#[derive(Debug, PartialEq)]
pub struct RealMoleculeShape {
    pub formula: &'static str,
    pub name: &'static str,
    pub central: Element,
    pub central_lone_pairs: usize,
    pub radial: &'static [RealAtom],
}

impl RealMoleculeShape {
    pub fn steric_number(&self) -> usize {
        self.radial.len() + self.central_lone_pairs
    }

    pub fn vsepr_configuration(&self) -> VseprConfiguration {
        VseprConfiguration::new(self.radial.len(), self.central_lone_pairs)
    }

    pub fn mean_bond_length(&self) -> f64 {
        if self.radial.is_empty() {
            return 0.0;
        }
        self.radial.iter().map(RealAtom::bond_length).sum::<f64>() / self.radial.len() as f64
    }

    /// Distance at which lone pairs are placed: the lone-pair to bonded-pair ratio of the
    /// model, applied to the mean bond length of this molecule.
    pub fn lone_pair_distance(&self, config: &PhysicsConfig) -> f64 {
        config.lone_pair_distance / config.bonded_pair_distance * self.mean_bond_length()
    }
}

use BondOrder::{Double, Single, Triple};
use Element::{B, Be, Br, C, Cl, F, H, N, O, P, S, Xe};

pub static BERYLLIUM_CHLORIDE: RealMoleculeShape = RealMoleculeShape {
    formula: "BeCl2",
    name: "Beryllium Chloride",
    central: Be,
    central_lone_pairs: 0,
    radial: &[
        RealAtom::new(Cl, [1.8, 0.0, 0.0], Single, 3),
        RealAtom::new(Cl, [-1.8, 0.0, 0.0], Single, 3),
    ],
};

pub static BORON_TRIFLUORIDE: RealMoleculeShape = RealMoleculeShape {
    formula: "BF3",
    name: "Boron Trifluoride",
    central: B,
    central_lone_pairs: 0,
    radial: &[
        RealAtom::new(F, [0.0, 1.313, 0.0], Single, 3),
        RealAtom::new(F, [-1.1371, -0.6565, 0.0], Single, 3),
        RealAtom::new(F, [1.1371, -0.6565, 0.0], Single, 3),
    ],
};

pub static BROMINE_PENTAFLUORIDE: RealMoleculeShape = RealMoleculeShape {
    formula: "BrF5",
    name: "Bromine Pentafluoride",
    central: Br,
    central_lone_pairs: 1,
    radial: &[
        RealAtom::new(F, [0.0, 1.689, 0.0], Single, 3),
        RealAtom::new(F, [1.7667, 0.1608, 0.0], Single, 3),
        RealAtom::new(F, [0.0, 0.1608, 1.7667], Single, 3),
        RealAtom::new(F, [-1.7667, 0.1608, 0.0], Single, 3),
        RealAtom::new(F, [0.0, 0.1608, -1.7667], Single, 3),
    ],
};

pub static METHANE: RealMoleculeShape = RealMoleculeShape {
    formula: "CH4",
    name: "Methane",
    central: C,
    central_lone_pairs: 0,
    radial: &[
        RealAtom::new(H, [0.6276, 0.6276, 0.6276], Single, 0),
        RealAtom::new(H, [0.6276, -0.6276, -0.6276], Single, 0),
        RealAtom::new(H, [-0.6276, 0.6276, -0.6276], Single, 0),
        RealAtom::new(H, [-0.6276, -0.6276, 0.6276], Single, 0),
    ],
};

pub static CHLORINE_TRIFLUORIDE: RealMoleculeShape = RealMoleculeShape {
    formula: "ClF3",
    name: "Chlorine Trifluoride",
    central: Cl,
    central_lone_pairs: 2,
    radial: &[
        RealAtom::new(F, [1.598, 0.0, 0.0], Single, 3),
        RealAtom::new(F, [0.0741, 1.6964, 0.0], Single, 3),
        RealAtom::new(F, [0.0741, -1.6964, 0.0], Single, 3),
    ],
};

pub static CARBON_DIOXIDE: RealMoleculeShape = RealMoleculeShape {
    formula: "CO2",
    name: "Carbon Dioxide",
    central: C,
    central_lone_pairs: 0,
    radial: &[
        RealAtom::new(O, [1.16, 0.0, 0.0], Double, 2),
        RealAtom::new(O, [-1.16, 0.0, 0.0], Double, 2),
    ],
};

pub static WATER: RealMoleculeShape = RealMoleculeShape {
    formula: "H2O",
    name: "Water",
    central: O,
    central_lone_pairs: 2,
    radial: &[
        RealAtom::new(H, [0.757, -0.5859, 0.0], Single, 0),
        RealAtom::new(H, [-0.757, -0.5859, 0.0], Single, 0),
    ],
};

pub static AMMONIA: RealMoleculeShape = RealMoleculeShape {
    formula: "NH3",
    name: "Ammonia",
    central: N,
    central_lone_pairs: 1,
    radial: &[
        RealAtom::new(H, [0.9375, -0.381, 0.0], Single, 0),
        RealAtom::new(H, [-0.4688, -0.381, 0.8119], Single, 0),
        RealAtom::new(H, [-0.4688, -0.381, -0.8119], Single, 0),
    ],
};

pub static PHOSPHORUS_PENTACHLORIDE: RealMoleculeShape = RealMoleculeShape {
    formula: "PCl5",
    name: "Phosphorus Pentachloride",
    central: P,
    central_lone_pairs: 0,
    radial: &[
        RealAtom::new(Cl, [0.0, 2.14, 0.0], Single, 3),
        RealAtom::new(Cl, [0.0, -2.14, 0.0], Single, 3),
        RealAtom::new(Cl, [2.02, 0.0, 0.0], Single, 3),
        RealAtom::new(Cl, [-1.01, 0.0, 1.7494], Single, 3),
        RealAtom::new(Cl, [-1.01, 0.0, -1.7494], Single, 3),
    ],
};

pub static SULFUR_TETRAFLUORIDE: RealMoleculeShape = RealMoleculeShape {
    formula: "SF4",
    name: "Sulfur Tetrafluoride",
    central: S,
    central_lone_pairs: 1,
    radial: &[
        RealAtom::new(F, [-0.0991, 1.643, 0.0], Single, 3),
        RealAtom::new(F, [-0.0991, -1.643, 0.0], Single, 3),
        RealAtom::new(F, [-0.9765, 0.0, 1.1973], Single, 3),
        RealAtom::new(F, [-0.9765, 0.0, -1.1973], Single, 3),
    ],
};

pub static SULFUR_HEXAFLUORIDE: RealMoleculeShape = RealMoleculeShape {
    formula: "SF6",
    name: "Sulfur Hexafluoride",
    central: S,
    central_lone_pairs: 0,
    radial: &[
        RealAtom::new(F, [1.564, 0.0, 0.0], Single, 3),
        RealAtom::new(F, [-1.564, 0.0, 0.0], Single, 3),
        RealAtom::new(F, [0.0, 1.564, 0.0], Single, 3),
        RealAtom::new(F, [0.0, -1.564, 0.0], Single, 3),
        RealAtom::new(F, [0.0, 0.0, 1.564], Single, 3),
        RealAtom::new(F, [0.0, 0.0, -1.564], Single, 3),
    ],
};

pub static XENON_DIFLUORIDE: RealMoleculeShape = RealMoleculeShape {
    formula: "XeF2",
    name: "Xenon Difluoride",
    central: Xe,
    central_lone_pairs: 3,
    radial: &[
        RealAtom::new(F, [0.0, 1.977, 0.0], Single, 3),
        RealAtom::new(F, [0.0, -1.977, 0.0], Single, 3),
    ],
};

pub static XENON_TETRAFLUORIDE: RealMoleculeShape = RealMoleculeShape {
    formula: "XeF4",
    name: "Xenon Tetrafluoride",
    central: Xe,
    central_lone_pairs: 2,
    radial: &[
        RealAtom::new(F, [1.94, 0.0, 0.0], Single, 3),
        RealAtom::new(F, [0.0, 0.0, 1.94], Single, 3),
        RealAtom::new(F, [-1.94, 0.0, 0.0], Single, 3),
        RealAtom::new(F, [0.0, 0.0, -1.94], Single, 3),
    ],
};

pub static SULFUR_DIOXIDE: RealMoleculeShape = RealMoleculeShape {
    formula: "SO2",
    name: "Sulfur Dioxide",
    central: S,
    central_lone_pairs: 1,
    radial: &[
        RealAtom::new(O, [1.237, -0.7214, 0.0], Double, 2),
        RealAtom::new(O, [-1.237, -0.7214, 0.0], Double, 2),
    ],
};

pub static FORMALDEHYDE: RealMoleculeShape = RealMoleculeShape {
    formula: "CH2O",
    name: "Formaldehyde",
    central: C,
    central_lone_pairs: 0,
    radial: &[
        RealAtom::new(O, [0.0, 1.205, 0.0], Double, 2),
        RealAtom::new(H, [0.9447, -0.5846, 0.0], Single, 0),
        RealAtom::new(H, [-0.9447, -0.5846, 0.0], Single, 0),
    ],
};

pub static HYDROGEN_CYANIDE: RealMoleculeShape = RealMoleculeShape {
    formula: "HCN",
    name: "Hydrogen Cyanide",
    central: C,
    central_lone_pairs: 0,
    radial: &[
        RealAtom::new(H, [-1.064, 0.0, 0.0], Single, 0),
        RealAtom::new(N, [1.156, 0.0, 0.0], Triple, 1),
    ],
};

/// Every catalogued molecule, in listing order.
pub static ALL: [&RealMoleculeShape; 16] = [
    &BERYLLIUM_CHLORIDE,
    &BORON_TRIFLUORIDE,
    &BROMINE_PENTAFLUORIDE,
    &METHANE,
    &FORMALDEHYDE,
    &CHLORINE_TRIFLUORIDE,
    &CARBON_DIOXIDE,
    &WATER,
    &HYDROGEN_CYANIDE,
    &AMMONIA,
    &PHOSPHORUS_PENTACHLORIDE,
    &SULFUR_TETRAFLUORIDE,
    &SULFUR_HEXAFLUORIDE,
    &SULFUR_DIOXIDE,
    &XENON_DIFLUORIDE,
    &XENON_TETRAFLUORIDE,
];

static BY_FORMULA: Map<&'static str, &'static RealMoleculeShape> = phf_map! {
    "BeCl2" => &BERYLLIUM_CHLORIDE,
    "BF3" => &BORON_TRIFLUORIDE,
    "BrF5" => &BROMINE_PENTAFLUORIDE,
    "CH4" => &METHANE,
    "CH2O" => &FORMALDEHYDE,
    "ClF3" => &CHLORINE_TRIFLUORIDE,
    "CO2" => &CARBON_DIOXIDE,
    "H2O" => &WATER,
    "HCN" => &HYDROGEN_CYANIDE,
    "NH3" => &AMMONIA,
    "PCl5" => &PHOSPHORUS_PENTACHLORIDE,
    "SF4" => &SULFUR_TETRAFLUORIDE,
    "SF6" => &SULFUR_HEXAFLUORIDE,
    "SO2" => &SULFUR_DIOXIDE,
    "XeF2" => &XENON_DIFLUORIDE,
    "XeF4" => &XENON_TETRAFLUORIDE,
};

/// Finds a molecule by formula, falling back to a case-insensitive match.
pub fn find(formula: &str) -> Option<&'static RealMoleculeShape> {
    let formula = formula.trim();
    BY_FORMULA.get(formula).copied().or_else(|| {
        ALL.iter()
            .copied()
            .find(|shape| shape.formula.eq_ignore_ascii_case(formula))
    })
}
