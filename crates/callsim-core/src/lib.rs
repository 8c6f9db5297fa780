#![warn(unreachable_pub, missing_debug_implementations)]

//! The core call-admission library. This crate defines [the routine](run::run) that replays a
//! [scenario](Scenario) of circuit-switched calls over a fixed topology once per
//! [routing policy](Policy), and reports how many calls each policy admits or blocks.

#[macro_use]
mod ident;

pub mod admission;
pub mod call;
pub mod ledger;
pub mod mapping;
pub mod network;
pub mod opts;
pub mod policy;
pub mod run;
pub mod scenario;
pub mod state;
pub mod stats;
pub mod units;

#[cfg(test)]
pub(crate) mod testing;

pub use admission::{AdmissionEngine, BlockReason, Outcome};
pub use call::{Call, CallId};
pub use ledger::ReservationLedger;
pub use mapping::NodeMap;
pub use network::{Link, Node, NodeId, NodeName, Route, Topology, TopologyError};
pub use opts::SimOpts;
pub use policy::Policy;
pub use run::{run, Error, RunError, Simulation};
pub use scenario::{Scenario, ScenarioError, ValidScenario};
pub use state::LinkState;
pub use stats::{PolicyReport, Statistics, Summary};
