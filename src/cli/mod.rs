//! CLI-specific utilities for hexroute
//!
//! This module contains code specific to the terminal surface,
//! separate from the core library functionality.

pub mod commands;
pub mod progress;
pub mod report;

pub use commands::{parse_command, Command, HELP};
pub use progress::Spinner;
