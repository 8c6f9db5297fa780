//! Utilities for interfacing with `callsim`: reading topology and workload files, and rendering
//! result reports.

#![warn(unreachable_pub, missing_debug_implementations, missing_docs)]

pub mod records;
pub mod report;

use std::path::{Path, PathBuf};

use callsim_core::{NodeMap, Scenario};

pub use records::{CallRecord, LinkRecord};

/// A scenario read from files, together with the mapping from node letters to IDs.
#[derive(Debug)]
pub struct LoadedScenario {
    /// The scenario, ready to be validated and run.
    pub scenario: Scenario,
    /// Node letter interning used to build `scenario`.
    pub node_map: NodeMap,
}

/// Reads a topology file and a workload file into a [`Scenario`].
///
/// Files ending in `.json` are read as JSON arrays of records; anything else is read as
/// whitespace-separated records, one per line.
pub fn read_scenario(
    topology: impl AsRef<Path>,
    workload: impl AsRef<Path>,
) -> Result<LoadedScenario, Error> {
    let links = read_topology(topology)?;
    let calls = read_workload(workload)?;
    Ok(records::build_scenario(&links, &calls))
}

/// Reads [`LinkRecord`]s from a file.
pub fn read_topology(path: impl AsRef<Path>) -> Result<Vec<LinkRecord>, Error> {
    let path = path.as_ref();
    let contents = read(path)?;
    match extension(path) {
        Some("json") => Ok(serde_json::from_str(&contents)?),
        _ => records::parse_topology(&contents),
    }
}

/// Reads [`CallRecord`]s from a file, preserving file order as arrival order.
pub fn read_workload(path: impl AsRef<Path>) -> Result<Vec<CallRecord>, Error> {
    let path = path.as_ref();
    let contents = read(path)?;
    match extension(path) {
        Some("json") => Ok(serde_json::from_str(&contents)?),
        _ => records::parse_workload(&contents),
    }
}

fn read(path: &Path) -> Result<String, Error> {
    std::fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.into(),
        source,
    })
}

fn extension(path: &Path) -> Option<&str> {
    path.extension().and_then(|ext| ext.to_str())
}

/// Error kinds for input files and reports.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// I/O error.
    #[error("failed to read {path}")]
    Io {
        /// The file being read.
        path: PathBuf,
        /// The underlying error.
        source: std::io::Error,
    },

    /// Error serializing/deserializing JSON.
    #[error("JSON error")]
    Json(#[from] serde_json::Error),

    /// A record names a node outside the supported alphabet.
    #[error("line {line}: invalid node name")]
    NodeName {
        /// The 1-based line number.
        line: usize,
        /// The underlying error.
        source: callsim_core::network::NodeNameError,
    },
}
