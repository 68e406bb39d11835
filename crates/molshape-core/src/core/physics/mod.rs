//! # Physics Module
//!
//! The tunable constants of the solver ([`params`]) and the pure force laws that turn them
//! into impulses and position updates ([`potentials`]). Nothing here holds state; the engine
//! passes a [`params::PhysicsConfig`] explicitly into every operation that needs one.

pub mod params;
pub mod potentials;
