//! # Rhythm Explorer
//!
//! Command-line front-end and REPL for `rhythm_core`. Everything here is
//! presentation and session state; parsing and analysis live in the core.
//!
//! ## Modules
//!
//! - `cli`: clap arguments, the front-end configuration and log setup.
//! - `session`: the parser, engine configuration and named-pattern library
//!   shared by every mode.
//! - `report`: colored rendering of parse results and analyses.
//! - `commands`: the REPL command registry.
//! - `repl`: the interactive loop and pattern-file watching.

pub mod cli;
pub mod commands;
pub mod repl;
pub mod report;
pub mod session;

pub use crate::cli::{Cli, CliConfig};
pub use crate::session::Session;
