use log::{debug, trace};

use crate::admission::{AdmissionEngine, InvariantError};
use crate::call::CallId;
use crate::opts::SimOpts;
use crate::policy::Policy;
use crate::scenario::{Scenario, ScenarioError, ValidScenario};
use crate::state::CapacityError;
use crate::stats::PolicyReport;

/// The core routine. This validates a scenario and replays its calls once per configured policy,
/// returning one report per policy in the configured order.
pub fn run(scenario: Scenario, opts: SimOpts) -> Result<Vec<PolicyReport>, Error> {
    let scenario = scenario.validate()?;
    let sim = Simulation::new(scenario, opts);
    Ok(sim.run_all()?)
}

/// Replays one validated scenario under any number of policies. Runs are independent: each starts
/// from an idle network with no active calls and zeroed statistics.
#[derive(Debug)]
pub struct Simulation {
    scenario: ValidScenario,
    opts: SimOpts,
}

impl Simulation {
    pub fn new(scenario: ValidScenario, opts: SimOpts) -> Self {
        Self { scenario, opts }
    }

    /// Runs every configured policy in order.
    pub fn run_all(&self) -> Result<Vec<PolicyReport>, RunError> {
        let Some(&first) = self.opts.policies.first() else {
            return Ok(Vec::new());
        };
        let mut engine = AdmissionEngine::new(&self.scenario.topology, first);
        self.opts
            .policies
            .iter()
            .map(|&policy| {
                engine.reset(policy);
                self.replay(&mut engine)
            })
            .collect()
    }

    /// Runs a single policy.
    pub fn run_policy(&self, policy: Policy) -> Result<PolicyReport, RunError> {
        let mut engine = AdmissionEngine::new(&self.scenario.topology, policy);
        self.replay(&mut engine)
    }

    fn replay(&self, engine: &mut AdmissionEngine<'_>) -> Result<PolicyReport, RunError> {
        let policy = engine.policy();
        let topology = &self.scenario.topology;
        debug!(
            "{policy}: replaying {} calls over {} nodes and {} links",
            self.scenario.calls.len(),
            topology.nr_nodes(),
            topology.nr_links()
        );
        for call in &self.scenario.calls {
            engine
                .process(call)
                .map_err(|source| RunError::Capacity {
                    policy,
                    call: call.id,
                    source,
                })?;
            if self.opts.verify_invariants {
                engine
                    .verify()
                    .map_err(|source| RunError::InvariantViolated {
                        policy,
                        call: call.id,
                        source,
                    })?;
            }
            trace!("link state after call {}:\n{}", call.id, engine.state().display(topology));
        }
        let summary = engine.stats().summary();
        debug!(
            "{policy}: {} admitted, {} blocked",
            summary.successful_calls, summary.blocked_calls
        );
        Ok(PolicyReport { policy, summary })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    InvalidScenario(#[from] ScenarioError),

    #[error(transparent)]
    Run(#[from] RunError),
}

#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error("{policy}: capacity accounting failed at call {call}")]
    Capacity {
        policy: Policy,
        call: CallId,
        #[source]
        source: CapacityError,
    },

    #[error("{policy}: invariant violated after call {call}")]
    InvariantViolated {
        policy: Policy,
        call: CallId,
        #[source]
        source: InvariantError,
    },
}
