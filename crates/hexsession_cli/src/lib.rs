//! Command-line host for the `hexsession` editing engine.
//!
//! The engine reports typed errors; this crate owns turning results into
//! terminal text or a JSON envelope.

pub mod commands;
pub mod hexdump;
pub mod output;
pub mod parse;
pub mod script;

pub use commands::{execute, Cli, Command};
pub use output::{error_kind, render, Envelope, Outcome};
