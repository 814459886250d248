//! Subcommand handlers.
//!
//! Each module owns the `clap` arguments of one subcommand and its handler.
//! `main.rs` dispatches to these handlers, keeping the entry point focused on
//! parsing and coordination.

pub mod benchmark;
pub mod filter;
pub mod info;
pub mod intersect;
pub mod route;
pub mod store;

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use anyhow::{Context, Result};

use shiproute_lib::{load_graph, Graph};

pub(crate) fn open_graph(path: &Path) -> Result<Graph> {
    load_graph(path).with_context(|| format!("failed to load graph from {}", path.display()))
}

pub(crate) fn create_file(path: &Path) -> Result<BufWriter<File>> {
    let file =
        File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    Ok(BufWriter::new(file))
}
