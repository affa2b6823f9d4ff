//! Shell integration.
//!
//! Generates completion scripts for the supported shells.

pub mod completions;

pub use completions::{completion_install_instructions, generate_completions};
