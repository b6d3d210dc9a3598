//! # Arkiv — service wiring for the directory reconciliation tool
//!
//! Arkiv compares a source directory tree against its mirror and proposes
//! the copies and deletes that bring them back in line. This crate holds the
//! glue the rest of the application stands on: the service container core
//! (re-exported from `arkiv-container`), the collaborator interfaces the
//! container constructs, and the [`bootstrap`] that wires them together once
//! at startup.

pub use arkiv_container::*;
pub use arkiv_support::*;

pub mod bootstrap;
pub mod services;
