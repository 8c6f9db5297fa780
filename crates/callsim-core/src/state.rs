//! Time-dependent link availability.

use std::fmt;

use petgraph::graph::EdgeIndex;

use crate::network::Topology;
use crate::units::Circuits;

/// Available capacity per link. Both directions of a link share one entry, so availability is
/// symmetric by construction.
///
/// INVARIANT: `0 <= available(e) <= capacity(e)` for every link `e`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkState {
    available: Vec<Circuits>,
    capacity: Vec<Circuits>,
}

impl LinkState {
    /// Creates a state where every link is idle.
    pub fn new(topology: &Topology) -> Self {
        let capacity = topology.capacities();
        Self {
            available: capacity.clone(),
            capacity,
        }
    }

    /// Returns every link to full capacity.
    pub fn reset(&mut self) {
        self.available.copy_from_slice(&self.capacity);
    }

    pub fn available(&self, eidx: EdgeIndex) -> Circuits {
        self.available[eidx.index()]
    }

    pub fn capacity(&self, eidx: EdgeIndex) -> Circuits {
        self.capacity[eidx.index()]
    }

    /// Returns true if the link can carry one more call.
    pub fn is_usable(&self, eidx: EdgeIndex) -> bool {
        self.available(eidx) > Circuits::ZERO
    }

    /// The fraction of the link's capacity still available. Zero-capacity links report zero.
    pub fn available_fraction(&self, eidx: EdgeIndex) -> f64 {
        let capacity = self.capacity(eidx);
        if capacity == Circuits::ZERO {
            return 0.0;
        }
        self.available(eidx).into_f64() / capacity.into_f64()
    }

    /// Takes one circuit from the link.
    pub fn reserve(&mut self, eidx: EdgeIndex) -> Result<(), CapacityError> {
        let avail = &mut self.available[eidx.index()];
        if *avail == Circuits::ZERO {
            return Err(CapacityError::Exhausted(eidx));
        }
        *avail -= Circuits::ONE;
        Ok(())
    }

    /// Gives `amount` circuits back to the link.
    pub fn release(&mut self, eidx: EdgeIndex, amount: Circuits) -> Result<(), CapacityError> {
        let i = eidx.index();
        let released = self.available[i] + amount;
        if released > self.capacity[i] {
            return Err(CapacityError::Overflow {
                eidx,
                released,
                capacity: self.capacity[i],
            });
        }
        self.available[i] = released;
        Ok(())
    }

    /// Circuits currently held by calls on the link.
    pub fn in_use(&self, eidx: EdgeIndex) -> Circuits {
        self.capacity(eidx) - self.available(eidx)
    }

    pub fn nr_links(&self) -> usize {
        self.available.len()
    }

    /// Renders every link as `A-B available/capacity`.
    pub fn display<'a>(&'a self, topology: &'a Topology) -> impl fmt::Display + 'a {
        StateDisplay {
            state: self,
            topology,
        }
    }
}

struct StateDisplay<'a> {
    state: &'a LinkState,
    topology: &'a Topology,
}

impl fmt::Display for StateDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let g = &self.topology.graph;
        for eidx in g.edge_indices() {
            let Some((i, j)) = g.edge_endpoints(eidx) else {
                continue;
            };
            writeln!(
                f,
                "{}-{} {}/{}",
                g[i].name,
                g[j].name,
                self.state.available(eidx),
                self.state.capacity(eidx)
            )?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CapacityError {
    #[error("link {0:?} has no capacity left")]
    Exhausted(EdgeIndex),

    #[error("releasing on link {eidx:?} would raise availability to {released} (capacity {capacity})")]
    Overflow {
        eidx: EdgeIndex,
        released: Circuits,
        capacity: Circuits,
    },
}
