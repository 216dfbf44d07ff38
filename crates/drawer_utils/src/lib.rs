//! Shared utilities for the drawer crates.
//!
//! - [`hash`]: hash containers with a fixed-seed hasher, re-exports *hashbrown* and *foldhash*.
#![no_std]

// -----------------------------------------------------------------------------
// Modules

pub mod hash;
