//! Link-cost policies.

use std::fmt;
use std::str::FromStr;

use petgraph::graph::EdgeIndex;

use crate::network::Topology;
use crate::state::LinkState;

/// Per-link path-selection weights. These are distinct from physical propagation delay.
#[derive(Debug, Clone, PartialEq)]
pub struct CostMap {
    inner: Vec<f64>,
}

impl CostMap {
    pub fn zeroed(nr_links: usize) -> Self {
        Self {
            inner: vec![0.0; nr_links],
        }
    }

    pub fn get(&self, eidx: EdgeIndex) -> f64 {
        self.inner[eidx.index()]
    }

    pub fn clear(&mut self) {
        self.inner.fill(0.0);
    }
}

/// A routing policy: a way of costing links, plus an admission rule.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum Policy {
    /// Shortest hop path: every usable link costs 1.
    Shpf,
    /// Shortest delay path: links cost their propagation delay.
    Sdpf,
    /// Least loaded path: links cost the fraction of their capacity in use.
    Llp,
    /// Most fractional capacity: links cost the fraction of their capacity still free.
    Mfc,
    /// Shortest hop path with look-ahead: admits a call only if its hop count under the current
    /// load is no worse than on an idle network.
    Shpo,
}

/// How a policy turns path searches into an admission decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// Admit whenever a path exists.
    Direct,
    /// Admit only if the loaded-network hop count does not exceed the idle-network hop count.
    LookAhead,
}

impl Policy {
    /// Every policy, in report order.
    pub const ALL: [Policy; 5] = [
        Policy::Shpf,
        Policy::Sdpf,
        Policy::Llp,
        Policy::Mfc,
        Policy::Shpo,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Policy::Shpf => "SHPF",
            Policy::Sdpf => "SDPF",
            Policy::Llp => "LLP",
            Policy::Mfc => "MFC",
            Policy::Shpo => "SHPO",
        }
    }

    pub fn admission(self) -> Admission {
        match self {
            Policy::Shpo => Admission::LookAhead,
            _ => Admission::Direct,
        }
    }

    /// Recomputes `costs` from the current link state.
    pub fn fill_costs(self, topology: &Topology, state: &LinkState, costs: &mut CostMap) {
        costs.inner.resize(topology.nr_links(), 0.0);
        for (eidx, link) in topology.indexed_links() {
            costs.inner[eidx.index()] = match self {
                Policy::Shpf | Policy::Shpo => {
                    if state.is_usable(eidx) {
                        1.0
                    } else {
                        0.0
                    }
                }
                Policy::Sdpf => link.delay.into_f64(),
                Policy::Llp => 1.0 - state.available_fraction(eidx),
                Policy::Mfc => state.available_fraction(eidx),
            };
        }
    }

    /// Computes a fresh cost map from the current link state.
    pub fn costs(self, topology: &Topology, state: &LinkState) -> CostMap {
        let mut costs = CostMap::zeroed(topology.nr_links());
        self.fill_costs(topology, state, &mut costs);
        costs
    }
}

impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Policy {
    type Err = ParsePolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Policy::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParsePolicyError(s.to_owned()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown policy {0:?} (expected one of SHPF, SDPF, LLP, MFC, SHPO)")]
pub struct ParsePolicyError(String);
