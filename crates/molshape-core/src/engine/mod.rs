//! # Engine Module
//!
//! The stateful half of the solver: the [`molecule::Molecule`] aggregate and everything that
//! moves its pair groups.
//!
//! ## Architecture
//!
//! - **Structure** ([`molecule`], [`real`]) - Owns pair groups and bonds, enforces the bond tree
//!   invariants, emits change events, and builds locked real molecules from reference shapes
//! - **Matching** ([`permutation`], [`attractor`]) - Finds the rotation and group-to-slot
//!   assignment that best superimposes actual orientations onto an ideal geometry
//! - **Forces** ([`local_shape`]) - Per-atom attraction toward the matched geometry and angular
//!   springs between neighbors
//! - **Time Stepping** ([`dynamics`]) - The per-tick update with its VSEPR and real-molecule
//!   policies
//! - **Configuration** ([`config`]) - Settings of the relaxation workflow
//! - **Progress Monitoring** ([`progress`]) - Callback-based progress reporting
//! - **Error Handling** ([`error`]) - Engine error types
//!
//! ## Tick Structure
//!
//! Each call to `Molecule::update(dt)` clamps `dt`, lets every atom with more than one
//! neighbor apply its shape forces, then integrates every mobile group about its parent. All
//! state lives in the molecule, so ticks are deterministic for a given sequence of inputs.

pub mod attractor;
pub mod config;
pub mod dynamics;
pub mod error;
pub mod local_shape;
pub mod molecule;
pub mod permutation;
pub mod progress;
pub mod real;
