//! # Ideal Geometry Module
//!
//! Static knowledge about how electron pairs arrange themselves around an atom.
//!
//! - [`configuration`] - Ideal unit-vector arrangements for steric numbers 0 to 6, the targets
//!   the solver pulls real positions toward.
//! - [`vsepr`] - AXE classification of an atom (bonded count plus lone pair count) with the
//!   electron-domain and molecular geometry names used for display.

pub mod configuration;
pub mod vsepr;
