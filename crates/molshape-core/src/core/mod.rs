//! # Core Module
//!
//! Stateless building blocks of the solver.
//!
//! ## Architecture
//!
//! - **Molecular Representation** ([`models`]) - Pair groups, bonds, elements, identifiers and
//!   the change events emitted when a molecule's structure changes
//! - **Ideal Geometry** ([`geometry`]) - Unit-vector tables for steric numbers 0 to 6 and the
//!   AXE classification of a central atom
//! - **Physics** ([`physics`]) - Tunable constants and the pure force laws used each tick
//! - **Reference Structures** ([`shapes`]) - Experimental geometries of real compounds
//! - **Utilities** ([`utils`]) - Small vector helpers with well-defined degenerate cases

pub mod geometry;
pub mod models;
pub mod physics;
pub mod shapes;
pub mod utils;
