//! The static network: nodes, links, and least-cost routing over them.

mod routing;
pub(crate) mod topology;
pub mod types;

pub use petgraph::graph::EdgeIndex;
pub use routing::shortest_path;
pub use topology::{Topology, TopologyError, MAX_NODES};
pub use types::*;
