//! # Core Models Module
//!
//! Data structures describing the pieces of a molecule as seen by the solver.
//!
//! ## Key Components
//!
//! - [`group`] - A pair group: the point mass standing in for a bonded atom or a lone pair
//! - [`topology`] - Bonds between pair groups and their orders
//! - [`element`] - Chemical elements carried by atoms of real molecules
//! - [`events`] - Structural change notifications and the queue that buffers them
//! - [`ids`] - Arena keys for pair groups
//!
//! ## Usage
//!
//! Pair groups are normally created through [`crate::engine::molecule::Molecule`], which owns
//! them and keeps the bond tree consistent.
//!
//! ```ignore
//! use molshape::core::models::{group::PairGroup, topology::BondOrder};
//! use molshape::engine::molecule::Molecule;
//! use nalgebra::Vector3;
//!
//! let mut molecule = Molecule::default();
//! let center = molecule.central_atom();
//! let group = PairGroup::atom(Vector3::new(10.0, 0.0, 0.0), None);
//! let id = molecule.add_group_and_bond(group, center, BondOrder::Single, 10.0)?;
//! ```

pub mod element;
pub mod events;
pub mod group;
pub mod ids;
pub mod topology;
