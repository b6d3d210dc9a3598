//! # Arkiv Support
//!
//! Shared helpers for the Arkiv workspace crates.
//!
//! Currently this is the text rendering used by container error messages.

pub mod rendering;
