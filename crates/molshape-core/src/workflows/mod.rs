//! # Workflows Module
//!
//! High-level procedures built on the engine. A workflow takes a prepared [`Molecule`]
//! together with its settings, drives the simulation to completion, reports progress through a
//! [`ProgressReporter`], and returns a summary of what happened.
//!
//! ## Architecture
//!
//! - **Relaxation Workflow** ([`relax`]) - Ticks a molecule at a fixed time step until every
//!   group has come to rest for a number of consecutive ticks, or until the simulated time
//!   limit is reached.
//!
//! [`Molecule`]: crate::engine::molecule::Molecule
//! [`ProgressReporter`]: crate::engine::progress::ProgressReporter

pub mod relax;
