//! Per-call admission: reclaim, cost, route, commit.

use log::trace;

use crate::call::Call;
use crate::ledger::ReservationLedger;
use crate::network::{shortest_path, Route, Topology};
use crate::policy::{Admission, CostMap, Policy};
use crate::state::{CapacityError, LinkState};
use crate::stats::Statistics;

/// The decision taken for one call.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Admitted(Route),
    Blocked(BlockReason),
}

impl Outcome {
    pub fn is_admitted(&self) -> bool {
        matches!(self, Outcome::Admitted(..))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockReason {
    /// No route with spare capacity exists.
    Unreachable,
    /// A route exists, but it is longer than the route on an idle network.
    LookAheadDegraded { actual: usize, ideal: usize },
}

/// Processes calls one at a time against a mutable link state.
#[derive(Debug)]
pub struct AdmissionEngine<'a> {
    topology: &'a Topology,
    policy: Policy,
    state: LinkState,
    // Full capacity, for look-ahead comparisons
    idle: LinkState,
    ledger: ReservationLedger,
    costs: CostMap,
    stats: Statistics,
}

impl<'a> AdmissionEngine<'a> {
    pub fn new(topology: &'a Topology, policy: Policy) -> Self {
        let state = LinkState::new(topology);
        Self {
            topology,
            policy,
            idle: state.clone(),
            state,
            ledger: ReservationLedger::new(),
            costs: CostMap::zeroed(topology.nr_links()),
            stats: Statistics::new(),
        }
    }

    /// Processes one call.
    ///
    /// PRECONDITION: calls are presented in non-decreasing order of arrival. Calls that arrive
    /// out of order only see reservations expire once a later arrival passes their end time.
    pub fn process(&mut self, call: &Call) -> Result<Outcome, CapacityError> {
        let ended = self.ledger.reclaim(call.arrival, &mut self.state)?;
        if !ended.is_empty() {
            trace!("{} call(s) ended by {}: {:?}", ended.len(), call.arrival, ended);
        }

        self.policy
            .fill_costs(self.topology, &self.state, &mut self.costs);
        let route = shortest_path(self.topology, call.src, call.dst, &self.costs, &self.state);
        let outcome = match (self.policy.admission(), route) {
            (_, None) => Outcome::Blocked(BlockReason::Unreachable),
            (Admission::Direct, Some(route)) => Outcome::Admitted(route),
            (Admission::LookAhead, Some(route)) => {
                // Same costs, but every link at full capacity
                let ideal =
                    shortest_path(self.topology, call.src, call.dst, &self.costs, &self.idle);
                match ideal {
                    Some(ideal) if route.nr_hops() > ideal.nr_hops() => {
                        Outcome::Blocked(BlockReason::LookAheadDegraded {
                            actual: route.nr_hops(),
                            ideal: ideal.nr_hops(),
                        })
                    }
                    _ => Outcome::Admitted(route),
                }
            }
        };

        match &outcome {
            Outcome::Admitted(route) => {
                self.ledger.reserve(call, route, &mut self.state)?;
                self.stats.record_admitted(route);
                trace!(
                    "{} call {} admitted: {} hop(s), {}ms",
                    self.policy,
                    call.id,
                    route.nr_hops(),
                    route.delay()
                );
            }
            Outcome::Blocked(reason) => {
                self.stats.record_blocked();
                trace!("{} call {} blocked: {:?}", self.policy, call.id, reason);
            }
        }
        Ok(outcome)
    }

    /// Returns the engine to an idle network with zeroed statistics, switching to `policy`.
    pub fn reset(&mut self, policy: Policy) {
        self.policy = policy;
        self.state.reset();
        self.ledger.clear();
        self.costs.clear();
        self.stats.reset();
    }

    /// Checks that link state and ledger agree: on every link, the circuits in use equal the sum of
    /// what active calls hold, and never exceed capacity.
    pub fn verify(&self) -> Result<(), InvariantError> {
        for (eidx, _) in self.topology.indexed_links() {
            let available = self.state.available(eidx);
            let capacity = self.state.capacity(eidx);
            if available > capacity {
                return Err(InvariantError::OverCapacity {
                    link: eidx.index(),
                    available: available.into_u64(),
                    capacity: capacity.into_u64(),
                });
            }
            let held = self.ledger.held_on(eidx);
            if held != self.state.in_use(eidx) {
                return Err(InvariantError::LedgerMismatch {
                    link: eidx.index(),
                    held: held.into_u64(),
                    in_use: self.state.in_use(eidx).into_u64(),
                });
            }
        }
        Ok(())
    }

    pub fn policy(&self) -> Policy {
        self.policy
    }

    pub fn stats(&self) -> &Statistics {
        &self.stats
    }

    pub fn state(&self) -> &LinkState {
        &self.state
    }

    pub fn ledger(&self) -> &ReservationLedger {
        &self.ledger
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvariantError {
    #[error("link {link} has {available} circuits available but only {capacity} in total")]
    OverCapacity {
        link: usize,
        available: u64,
        capacity: u64,
    },

    #[error("link {link} has {in_use} circuits in use but active calls hold {held}")]
    LedgerMismatch { link: usize, held: u64, in_use: u64 },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    use crate::call::CallId;
    use crate::network::NodeId;
    use crate::testing;
    use crate::units::Circuits;
    use anyhow::Context;

    fn nodes_of(outcome: &Outcome) -> Vec<usize> {
        match outcome {
            Outcome::Admitted(r) => r.nodes().iter().map(|n| n.inner()).collect(),
            Outcome::Blocked(..) => Vec::new(),
        }
    }

    #[test]
    fn overlapping_call_is_blocked() -> anyhow::Result<()> {
        let (nodes, links) = testing::line_config(1);
        let topo = Topology::new(&nodes, &links)?;
        for policy in Policy::ALL {
            let mut engine = AdmissionEngine::new(&topo, policy);
            assert!(engine.process(&testing::call(0, 0, 2, 0.0, 10.0))?.is_admitted());
            let second = engine.process(&testing::call(1, 0, 2, 5.0, 10.0))?;
            assert_eq!(second, Outcome::Blocked(BlockReason::Unreachable));
            engine.verify()?;
        }
        Ok(())
    }

    #[test]
    fn call_after_end_time_is_admitted() -> anyhow::Result<()> {
        let (nodes, links) = testing::line_config(1);
        let topo = Topology::new(&nodes, &links)?;
        for policy in Policy::ALL {
            let mut engine = AdmissionEngine::new(&topo, policy);
            assert!(engine.process(&testing::call(0, 0, 2, 0.0, 10.0))?.is_admitted());
            assert!(engine.process(&testing::call(1, 0, 2, 10.0, 10.0))?.is_admitted());
            assert!(!engine.ledger().is_active(CallId::new(0)));
            assert!(engine.ledger().is_active(CallId::new(1)));
            engine.verify()?;
        }
        Ok(())
    }

    #[test]
    fn blocked_call_holds_nothing() -> anyhow::Result<()> {
        let (nodes, links) = testing::isolated_config();
        let topo = Topology::new(&nodes, &links)?;
        let mut engine = AdmissionEngine::new(&topo, Policy::Llp);
        let call = testing::call(0, 0, 3, 0.0, 10.0);
        assert!(!engine.process(&call)?.is_admitted());
        assert!(!engine.ledger().is_active(call.id));
        assert_eq!(engine.state(), &LinkState::new(&topo));
        assert_eq!(engine.stats().blocked_calls(), 1);
        Ok(())
    }

    #[test]
    fn second_call_routes_per_policy() -> anyhow::Result<()> {
        let (nodes, links) = testing::diamond_config(2);
        let topo = Topology::new(&nodes, &links)?;
        let load = testing::call(0, 1, 3, 0.0, 100.0);
        let next = testing::call(1, 0, 3, 1.0, 100.0);
        let mut routes = BTreeMap::new();
        for policy in Policy::ALL {
            let mut engine = AdmissionEngine::new(&topo, policy);
            engine.process(&load)?;
            routes.insert(policy.name(), nodes_of(&engine.process(&next)?));
        }
        insta::assert_yaml_snapshot!(routes, @r###"
        ---
        LLP:
          - 0
          - 2
          - 3
        MFC:
          - 0
          - 1
          - 3
        SDPF:
          - 0
          - 1
          - 3
        SHPF:
          - 0
          - 1
          - 3
        SHPO:
          - 0
          - 1
          - 3
        "###);
        Ok(())
    }

    #[test]
    fn out_of_order_call_is_held_until_a_later_arrival_passes_its_end() -> anyhow::Result<()> {
        let (nodes, links) = testing::line_config(1);
        let topo = Topology::new(&nodes, &links)?;
        let bc = topo
            .find_link(NodeId::new(1), NodeId::new(2))
            .context("no B-C link")?;
        let mut engine = AdmissionEngine::new(&topo, Policy::Shpf);
        assert!(engine.process(&testing::call(0, 0, 1, 10.0, 5.0))?.is_admitted());
        // Arrives before call 0 and ends at 1.0.
        assert!(engine.process(&testing::call(1, 1, 2, 0.0, 1.0))?.is_admitted());
        // Not yet past call 1's end, so B-C is still taken.
        let early = engine.process(&testing::call(2, 1, 2, 0.5, 1.0))?;
        assert_eq!(early, Outcome::Blocked(BlockReason::Unreachable));
        assert!(engine.ledger().is_active(CallId::new(1)));
        assert_eq!(engine.state().available(bc), Circuits::ZERO);
        // Call 0 still runs until 15.0; call 1 is released first.
        assert!(engine.process(&testing::call(3, 1, 2, 12.0, 1.0))?.is_admitted());
        assert!(!engine.ledger().is_active(CallId::new(1)));
        assert!(engine.ledger().is_active(CallId::new(0)));
        assert!(engine.ledger().is_active(CallId::new(3)));
        engine.verify()?;
        Ok(())
    }

    #[test]
    fn llp_and_mfc_choose_opposite_paths() -> anyhow::Result<()> {
        let (nodes, links) = testing::diamond_config(2);
        let topo = Topology::new(&nodes, &links)?;
        let load = testing::call(0, 1, 3, 0.0, 100.0);
        let next = testing::call(1, 0, 3, 1.0, 100.0);

        let mut llp = AdmissionEngine::new(&topo, Policy::Llp);
        assert_eq!(nodes_of(&llp.process(&load)?), vec![1, 3]);
        assert_eq!(nodes_of(&llp.process(&next)?), vec![0, 2, 3]);

        let mut mfc = AdmissionEngine::new(&topo, Policy::Mfc);
        assert_eq!(nodes_of(&mfc.process(&load)?), vec![1, 3]);
        assert_eq!(nodes_of(&mfc.process(&next)?), vec![0, 1, 3]);
        Ok(())
    }

    #[test]
    fn look_ahead_blocks_detours() -> anyhow::Result<()> {
        let (nodes, links) = testing::triangle_config();
        let topo = Topology::new(&nodes, &links)?;
        let first = testing::call(0, 0, 2, 0.0, 10.0);
        let second = testing::call(1, 0, 2, 1.0, 10.0);

        let mut shpf = AdmissionEngine::new(&topo, Policy::Shpf);
        assert_eq!(nodes_of(&shpf.process(&first)?), vec![0, 2]);
        assert_eq!(nodes_of(&shpf.process(&second)?), vec![0, 1, 2]);

        let mut shpo = AdmissionEngine::new(&topo, Policy::Shpo);
        assert_eq!(nodes_of(&shpo.process(&first)?), vec![0, 2]);
        assert_eq!(
            shpo.process(&second)?,
            Outcome::Blocked(BlockReason::LookAheadDegraded {
                actual: 2,
                ideal: 1
            })
        );
        // A call that needs no detour is still admitted.
        let third = testing::call(2, 0, 1, 2.0, 10.0);
        assert!(shpo.process(&third)?.is_admitted());
        shpo.verify()?;
        Ok(())
    }

    #[test]
    fn reset_restores_idle_network() -> anyhow::Result<()> {
        let (nodes, links) = testing::diamond_config(1);
        let topo = Topology::new(&nodes, &links)?;
        let mut engine = AdmissionEngine::new(&topo, Policy::Shpf);
        engine.process(&testing::call(0, 0, 3, 0.0, 10.0))?;
        engine.process(&testing::call(1, 1, 2, 0.5, 10.0))?;
        engine.reset(Policy::Sdpf);
        assert_eq!(engine.policy(), Policy::Sdpf);
        assert_eq!(engine.state(), &LinkState::new(&topo));
        assert_eq!(engine.ledger().nr_active(), 0);
        assert_eq!(engine.stats(), &Statistics::new());
        Ok(())
    }

    #[test]
    fn totals_add_up() -> anyhow::Result<()> {
        let (nodes, links) = testing::line_config(2);
        let topo = Topology::new(&nodes, &links)?;
        let mut engine = AdmissionEngine::new(&topo, Policy::Shpf);
        for i in 0..6 {
            engine.process(&testing::call(i, 0, 2, i as f64, 3.5))?;
            engine.verify()?;
        }
        let stats = engine.stats();
        assert_eq!(stats.total_calls(), 6);
        assert_eq!(
            stats.total_calls(),
            stats.successful_calls() + stats.blocked_calls()
        );
        let ab = topo.find_link(NodeId::new(0), NodeId::new(1)).unwrap();
        assert_eq!(engine.ledger().held_on(ab), engine.state().in_use(ab));
        Ok(())
    }
}
