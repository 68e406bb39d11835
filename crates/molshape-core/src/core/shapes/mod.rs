//! # Reference Structures
//!
//! Experimental geometries of small molecules, used by the real-molecule comparison mode.
//! Coordinates are in Ångström with the central atom at the origin.

pub mod real;
