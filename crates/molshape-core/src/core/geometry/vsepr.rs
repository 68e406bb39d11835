use super::configuration::MAX_STERIC_NUMBER;
use serde::Serialize;
use std::fmt;

/// Arrangement of every electron domain (atoms and lone pairs alike) around an atom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ElectronGeometry {
    Empty,
    Diatomic,
    Linear,
    TrigonalPlanar,
    Tetrahedral,
    TrigonalBipyramidal,
    Octahedral,
}

impl ElectronGeometry {
    pub fn from_steric_number(steric_number: usize) -> Option<Self> {
        match steric_number {
            0 => Some(Self::Empty),
            1 => Some(Self::Diatomic),
            2 => Some(Self::Linear),
            3 => Some(Self::TrigonalPlanar),
            4 => Some(Self::Tetrahedral),
            5 => Some(Self::TrigonalBipyramidal),
            6 => Some(Self::Octahedral),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Empty => "Empty",
            Self::Diatomic => "Diatomic",
            Self::Linear => "Linear",
            Self::TrigonalPlanar => "Trigonal Planar",
            Self::Tetrahedral => "Tetrahedral",
            Self::TrigonalBipyramidal => "Trigonal Bipyramidal",
            Self::Octahedral => "Octahedral",
        }
    }
}

/// Arrangement of the bonded atoms only, once lone pairs are hidden.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum MolecularShape {
    /// No bonded atoms at all.
    Empty,
    /// A single bonded atom.
    Diatomic,
    /// 180° (e.g., CO₂, XeF₂)
    Linear,
    /// e.g., SO₂ (AX₂E) or H₂O (AX₂E₂)
    Bent,
    /// 120° in a plane (e.g., BF₃)
    TrigonalPlanar,
    /// e.g., NH₃
    TrigonalPyramidal,
    /// e.g., CH₄
    Tetrahedral,
    /// e.g., SF₄
    Seesaw,
    /// e.g., ClF₃
    TShaped,
    /// e.g., PCl₅
    TrigonalBipyramidal,
    /// e.g., XeF₄
    SquarePlanar,
    /// e.g., BrF₅
    SquarePyramidal,
    /// e.g., SF₆
    Octahedral,
}

impl MolecularShape {
    pub fn name(self) -> &'static str {
        match self {
            Self::Empty => "Empty",
            Self::Diatomic => "Diatomic",
            Self::Linear => "Linear",
            Self::Bent => "Bent",
            Self::TrigonalPlanar => "Trigonal Planar",
            Self::TrigonalPyramidal => "Trigonal Pyramidal",
            Self::Tetrahedral => "Tetrahedral",
            Self::Seesaw => "Seesaw",
            Self::TShaped => "T-Shaped",
            Self::TrigonalBipyramidal => "Trigonal Bipyramidal",
            Self::SquarePlanar => "Square Planar",
            Self::SquarePyramidal => "Square Pyramidal",
            Self::Octahedral => "Octahedral",
        }
    }
}

/// AXE classification of an atom: `bonded` atoms (X) and `lone_pairs` (E) around it (A).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct VseprConfiguration {
    pub bonded: usize,
    pub lone_pairs: usize,
}

impl VseprConfiguration {
    pub fn new(bonded: usize, lone_pairs: usize) -> Self {
        Self { bonded, lone_pairs }
    }

    pub fn steric_number(&self) -> usize {
        self.bonded + self.lone_pairs
    }

    pub fn is_supported(&self) -> bool {
        self.steric_number() <= MAX_STERIC_NUMBER
    }

    /// Formats the configuration in AXE notation, e.g. `AX2E2` for water.
    pub fn axe_notation(&self) -> String {
        let mut notation = String::from("A");
        match self.bonded {
            0 => {}
            1 => notation.push('X'),
            n => notation.push_str(&format!("X{n}")),
        }
        match self.lone_pairs {
            0 => {}
            1 => notation.push('E'),
            n => notation.push_str(&format!("E{n}")),
        }
        notation
    }

    pub fn electron_geometry(&self) -> Option<ElectronGeometry> {
        ElectronGeometry::from_steric_number(self.steric_number())
    }

    pub fn molecular_shape(&self) -> Option<MolecularShape> {
        if !self.is_supported() {
            return None;
        }
        let shape = match (self.bonded, self.lone_pairs) {
            (0, _) => MolecularShape::Empty,
            (1, _) => MolecularShape::Diatomic,
            (2, 0) | (2, 3) | (2, 4) => MolecularShape::Linear,
            (2, _) => MolecularShape::Bent,
            (3, 0) => MolecularShape::TrigonalPlanar,
            (3, 1) => MolecularShape::TrigonalPyramidal,
            (3, _) => MolecularShape::TShaped,
            (4, 0) => MolecularShape::Tetrahedral,
            (4, 1) => MolecularShape::Seesaw,
            (4, _) => MolecularShape::SquarePlanar,
            (5, 0) => MolecularShape::TrigonalBipyramidal,
            (5, _) => MolecularShape::SquarePyramidal,
            _ => MolecularShape::Octahedral,
        };
        Some(shape)
    }
}

impl fmt::Display for VseprConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.molecular_shape() {
            Some(shape) => write!(f, "{} ({})", self.axe_notation(), shape.name()),
            None => write!(f, "{} (unsupported)", self.axe_notation()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shape(bonded: usize, lone_pairs: usize) -> Option<MolecularShape> {
        VseprConfiguration::new(bonded, lone_pairs).molecular_shape()
    }

    #[test]
    fn axe_notation_omits_unit_counts() {
        assert_eq!(VseprConfiguration::new(2, 2).axe_notation(), "AX2E2");
        assert_eq!(VseprConfiguration::new(3, 1).axe_notation(), "AX3E");
        assert_eq!(VseprConfiguration::new(1, 0).axe_notation(), "AX");
        assert_eq!(VseprConfiguration::new(0, 0).axe_notation(), "A");
    }

    #[test]
    fn molecular_shapes_follow_vsepr_table() {
        assert_eq!(shape(2, 0), Some(MolecularShape::Linear));
        assert_eq!(shape(2, 1), Some(MolecularShape::Bent));
        assert_eq!(shape(2, 2), Some(MolecularShape::Bent));
        assert_eq!(shape(2, 3), Some(MolecularShape::Linear));
        assert_eq!(shape(3, 0), Some(MolecularShape::TrigonalPlanar));
        assert_eq!(shape(3, 1), Some(MolecularShape::TrigonalPyramidal));
        assert_eq!(shape(3, 2), Some(MolecularShape::TShaped));
        assert_eq!(shape(4, 0), Some(MolecularShape::Tetrahedral));
        assert_eq!(shape(4, 1), Some(MolecularShape::Seesaw));
        assert_eq!(shape(4, 2), Some(MolecularShape::SquarePlanar));
        assert_eq!(shape(5, 0), Some(MolecularShape::TrigonalBipyramidal));
        assert_eq!(shape(5, 1), Some(MolecularShape::SquarePyramidal));
        assert_eq!(shape(6, 0), Some(MolecularShape::Octahedral));
    }

    #[test]
    fn degenerate_configurations_have_trivial_shapes() {
        assert_eq!(shape(0, 3), Some(MolecularShape::Empty));
        assert_eq!(shape(1, 3), Some(MolecularShape::Diatomic));
    }

    #[test]
    fn oversized_configurations_are_unsupported() {
        let config = VseprConfiguration::new(5, 2);
        assert!(!config.is_supported());
        assert_eq!(config.molecular_shape(), None);
        assert_eq!(config.electron_geometry(), None);
        assert_eq!(config.to_string(), "AX5E2 (unsupported)");
    }

    #[test]
    fn electron_geometry_depends_only_on_steric_number() {
        assert_eq!(
            VseprConfiguration::new(2, 2).electron_geometry(),
            Some(ElectronGeometry::Tetrahedral)
        );
        assert_eq!(
            VseprConfiguration::new(4, 0).electron_geometry(),
            Some(ElectronGeometry::Tetrahedral)
        );
        assert_eq!(ElectronGeometry::Octahedral.name(), "Octahedral");
    }

    #[test]
    fn display_combines_notation_and_shape_name() {
        assert_eq!(VseprConfiguration::new(2, 2).to_string(), "AX2E2 (Bent)");
        assert_eq!(VseprConfiguration::new(4, 1).to_string(), "AX4E (Seesaw)");
    }
}
