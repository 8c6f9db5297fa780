//! This module defines the [`SimOpts`] configuration which describes which policies to run and
//! how closely to check each run.

use crate::policy::Policy;

/// Simulation options.
#[derive(Debug, Clone, typed_builder::TypedBuilder)]
pub struct SimOpts {
    /// Policies to run, in order.
    #[builder(default = Policy::ALL.to_vec())]
    pub policies: Vec<Policy>,
    /// Re-check link state against the reservation ledger after every call.
    #[builder(default)]
    pub verify_invariants: bool,
}

impl Default for SimOpts {
    fn default() -> Self {
        Self::builder().build()
    }
}
