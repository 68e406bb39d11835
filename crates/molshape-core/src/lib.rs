//! # molshape Core Library
//!
//! An electron-pair repulsion solver for interactive molecular geometry. Pair groups (bonded
//! atoms and lone pairs) are arranged around a central atom and relaxed, tick by tick, toward
//! the arrangement predicted by VSEPR theory.
//!
//! ## Architectural Philosophy
//!
//! The library follows a three-layer architecture so that the static chemistry, the stateful
//! solver and the user-facing procedures can be tested in isolation.
//!
//! - **[`core`]: The Foundation.** Stateless data: pair groups and bonds, chemical elements,
//!   the table of ideal geometries, AXE classification, the real-molecule catalog, and the
//!   pure force laws with their tunable constants.
//!
//! - **[`engine`]: The Logic Core.** The stateful layer. It owns the `Molecule` aggregate and
//!   its change-event queue, solves the rotation and permutation matching problem
//!   (`attractor`), applies per-atom shape forces (`local_shape`), and advances the simulation
//!   one tick at a time under either the VSEPR or the real-molecule policy (`dynamics`).
//!
//! - **[`workflows`]: The Public API.** Complete procedures built on the engine, such as
//!   relaxing a molecule until it settles while reporting progress.

pub mod core;
pub mod engine;
pub mod workflows;
