//! shiproute CLI library.
//!
//! Argument types, subcommand handlers and output rendering for the
//! `shiproute` binary. `main.rs` only parses arguments and dispatches here.

pub mod args;
pub mod commands;
pub mod output;
