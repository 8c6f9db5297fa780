//! This module defines simulation scenarios ([`Scenario`]), which consist of nodes, links, and
//! calls. A scenario is validated before any policy is run against it.

use std::collections::HashSet;

use itertools::Itertools;
use log::warn;

use crate::call::{Call, CallId};
use crate::network::{Link, Node, NodeId, Topology, TopologyError};

/// A simulation scenario.
#[derive(Debug, Clone, typed_builder::TypedBuilder)]
pub struct Scenario {
    /// Topology nodes.
    pub nodes: Vec<Node>,
    /// Topology links.
    pub links: Vec<Link>,
    /// Workload calls, in arrival order.
    pub calls: Vec<Call>,
}

impl Scenario {
    /// Validate a scenario, producing a `ValidScenario`.
    ///
    /// Correctness properties:
    ///
    /// - Every call must have a unique ID.
    /// - Every call must have a declared source and destination.
    /// - Every call must have a finite arrival time and a finite, non-negative duration.
    ///
    /// Calls are expected in non-decreasing arrival order. This is not enforced; an out-of-order
    /// workload is only reported with a warning, since reordering would change which calls each
    /// decision sees.
    pub fn validate(self) -> Result<ValidScenario, ScenarioError> {
        let declared = self.nodes.iter().map(|n| n.id).collect::<HashSet<_>>();
        let mut seen = HashSet::with_capacity(self.calls.len());
        for call in &self.calls {
            // CORRECTNESS: Every call must have a unique ID.
            if !seen.insert(call.id) {
                return Err(ScenarioError::DuplicateCallId(call.id));
            }
            // CORRECTNESS: Every call must have a declared source and destination.
            if !declared.contains(&call.src) {
                return Err(ScenarioError::InvalidCallSrc {
                    call: call.id,
                    src: call.src,
                });
            }
            if !declared.contains(&call.dst) {
                return Err(ScenarioError::InvalidCallDst {
                    call: call.id,
                    dst: call.dst,
                });
            }
            // CORRECTNESS: Every call must have sane times.
            let duration = call.duration.into_f64();
            if !call.arrival.is_finite() || !duration.is_finite() || duration < 0.0 {
                return Err(ScenarioError::InvalidCallTime(call.id));
            }
        }
        if let Some((prev, next)) = self
            .calls
            .iter()
            .tuple_windows()
            .find(|(a, b)| b.arrival < a.arrival)
        {
            warn!(
                "call {} arrives at {}, before call {} at {}; completed calls may hold circuits \
                 past their end time",
                next.id, next.arrival, prev.id, prev.arrival
            );
        }
        let topology = Topology::new(&self.nodes, &self.links)?;
        Ok(ValidScenario {
            topology,
            calls: self.calls,
        })
    }
}

/// A `ValidScenario` is a `Scenario` that has been validated. The topology and the calls are
/// guaranteed to satisfy the properties listed in `Topology::new()` and `Scenario::validate()`.
#[derive(Debug, Clone)]
pub struct ValidScenario {
    pub(crate) topology: Topology,
    pub(crate) calls: Vec<Call>,
}

impl ValidScenario {
    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    pub fn calls(&self) -> &[Call] {
        &self.calls
    }
}

/// Scenario error.
#[derive(Debug, thiserror::Error)]
pub enum ScenarioError {
    /// Two calls share an ID.
    #[error("duplicate call ID {0}")]
    DuplicateCallId(CallId),

    /// A call has an undeclared source.
    #[error("call {call} has an invalid source ({src})")]
    InvalidCallSrc { call: CallId, src: NodeId },

    /// A call has an undeclared destination.
    #[error("call {call} has an invalid destination ({dst})")]
    InvalidCallDst { call: CallId, dst: NodeId },

    /// A call has a non-finite arrival time or a negative or non-finite duration.
    #[error("call {0} has an invalid arrival time or duration")]
    InvalidCallTime(CallId),

    /// The topology is invalid.
    #[error("invalid topology")]
    InvalidTopology(#[from] TopologyError),
}
