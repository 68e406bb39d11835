use thiserror::Error;

use super::config::ConfigError;
use crate::core::models::ids::GroupId;
use crate::core::models::topology::BondOrder;
use crate::core::physics::params::ParamError;

/// Rejected structural edits. A failed edit leaves the molecule untouched.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MoleculeError {
    #[error("Group {0:?} is not part of this molecule")]
    GroupNotFound(GroupId),

    #[error("Lone pair {0:?} cannot carry dependent groups")]
    LonePairParent(GroupId),

    #[error(
        "Group {parent:?} cannot carry this group: only the central atom takes atoms, and only radial atoms take lone pairs"
    )]
    DepthExceeded { parent: GroupId },

    #[error("Group {parent:?} already has the maximum of {max} neighbors")]
    TooManyNeighbors { parent: GroupId, max: usize },

    #[error("Bond order '{order}' does not match a group with is_lone_pair = {is_lone_pair}")]
    BondOrderMismatch {
        order: BondOrder,
        is_lone_pair: bool,
    },

    #[error("Bond length must be finite and positive (got {0})")]
    InvalidBondLength(f64),

    #[error("The central atom cannot be removed")]
    CentralAtomRemoval,

    #[error("Group {0:?} is held in place and cannot be dragged")]
    ImmovableGroup(GroupId),

    #[error("Position must be finite")]
    NonFinitePosition,

    #[error("The structure of a real molecule cannot be modified")]
    StructureLocked,
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Molecule edit rejected: {source}")]
    Molecule {
        #[from]
        source: MoleculeError,
    },

    #[error("Invalid physics parameters: {source}")]
    Params {
        #[from]
        source: ParamError,
    },

    #[error("Invalid configuration: {source}")]
    Config {
        #[from]
        source: ConfigError,
    },

    #[error("No ideal geometry exists for steric number {steric_number}")]
    UnsupportedStericNumber { steric_number: usize },

    #[error("Internal logic error: {0}")]
    Internal(String),
}
