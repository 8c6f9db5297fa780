//! Bookkeeping of the circuits each active call holds.

use std::collections::BTreeMap;

use petgraph::graph::EdgeIndex;
use rustc_hash::FxHashMap;

use crate::call::{Call, CallId};
use crate::network::Route;
use crate::state::{CapacityError, LinkState};
use crate::units::{Circuits, Secs};

/// The circuits held by one admitted call.
#[derive(Debug, Clone, PartialEq)]
pub struct Reservation {
    end: Secs,
    links: FxHashMap<EdgeIndex, Circuits>,
}

impl Reservation {
    /// The time at which the call completes.
    pub fn end(&self) -> Secs {
        self.end
    }

    /// Circuits held on `eidx`.
    pub fn held_on(&self, eidx: EdgeIndex) -> Circuits {
        self.links.get(&eidx).copied().unwrap_or_default()
    }

    /// Total circuits held across all links.
    pub fn total(&self) -> Circuits {
        self.links.values().copied().sum()
    }
}

/// Records exactly which circuits every active call holds, so that they can be returned when the
/// call completes.
#[derive(Debug, Default, Clone)]
pub struct ReservationLedger {
    active: BTreeMap<CallId, Reservation>,
}

impl ReservationLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes one circuit on every link of `route` for `call`.
    ///
    /// If a link turns out to be exhausted, the circuits taken so far are returned and the call is
    /// left inactive.
    pub fn reserve(
        &mut self,
        call: &Call,
        route: &Route,
        state: &mut LinkState,
    ) -> Result<(), CapacityError> {
        let mut links = FxHashMap::default();
        for &eidx in route.links() {
            if let Err(e) = state.reserve(eidx) {
                for (&taken, &amount) in &links {
                    state.release(taken, amount)?;
                }
                return Err(e);
            }
            *links.entry(eidx).or_insert(Circuits::ZERO) += Circuits::ONE;
        }
        self.active.insert(
            call.id,
            Reservation {
                end: call.end(),
                links,
            },
        );
        Ok(())
    }

    /// Ends every active call whose end time is at or before `now`, returning its circuits to
    /// `state`. Returns the IDs of the calls that ended, in ascending order.
    pub fn reclaim(
        &mut self,
        now: Secs,
        state: &mut LinkState,
    ) -> Result<Vec<CallId>, CapacityError> {
        let expired = self
            .active
            .iter()
            .filter(|(_, r)| r.end <= now)
            .map(|(&id, _)| id)
            .collect::<Vec<_>>();
        for id in &expired {
            if let Some(reservation) = self.active.remove(id) {
                for (&eidx, &amount) in &reservation.links {
                    state.release(eidx, amount)?;
                }
            }
        }
        Ok(expired)
    }

    pub fn is_active(&self, id: CallId) -> bool {
        self.active.contains_key(&id)
    }

    pub fn reservation(&self, id: CallId) -> Option<&Reservation> {
        self.active.get(&id)
    }

    /// Circuits held on `eidx` summed over all active calls.
    pub fn held_on(&self, eidx: EdgeIndex) -> Circuits {
        self.active.values().map(|r| r.held_on(eidx)).sum()
    }

    /// Forgets every reservation without touching any link state.
    pub fn clear(&mut self) {
        self.active.clear();
    }

    delegate::delegate! {
        to self.active {
            #[call(len)]
            pub fn nr_active(&self) -> usize;
        }
    }
}
