//! Per-run accumulators and their derived summary.

use crate::network::Route;
use crate::policy::Policy;

/// Running totals for one policy run.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Statistics {
    total_calls: u64,
    successful_calls: u64,
    blocked_calls: u64,
    total_hops: u64,
    total_delay: f64,
}

impl Statistics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_admitted(&mut self, route: &Route) {
        self.total_calls += 1;
        self.successful_calls += 1;
        self.total_hops += route.nr_hops() as u64;
        self.total_delay += route.delay();
    }

    pub fn record_blocked(&mut self) {
        self.total_calls += 1;
        self.blocked_calls += 1;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn total_calls(&self) -> u64 {
        self.total_calls
    }

    pub fn successful_calls(&self) -> u64 {
        self.successful_calls
    }

    pub fn blocked_calls(&self) -> u64 {
        self.blocked_calls
    }

    pub fn total_hops(&self) -> u64 {
        self.total_hops
    }

    /// Summed route delay of admitted calls, in milliseconds.
    pub fn total_delay(&self) -> f64 {
        self.total_delay
    }

    /// Derives rates and averages. With no calls, or no successful calls, the affected figures are
    /// not finite.
    pub fn summary(&self) -> Summary {
        let total = self.total_calls as f64;
        let successful = self.successful_calls as f64;
        Summary {
            total_calls: self.total_calls,
            successful_calls: self.successful_calls,
            blocked_calls: self.blocked_calls,
            success_pct: successful / total * 100.0,
            blocked_pct: self.blocked_calls as f64 / total * 100.0,
            avg_hops: self.total_hops as f64 / successful,
            avg_delay: self.total_delay / successful,
        }
    }
}

/// The figures reported for one policy run.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct Summary {
    pub total_calls: u64,
    pub successful_calls: u64,
    pub blocked_calls: u64,
    pub success_pct: f64,
    pub blocked_pct: f64,
    pub avg_hops: f64,
    pub avg_delay: f64,
}

/// The outcome of running every call under one policy.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct PolicyReport {
    pub policy: Policy,
    #[serde(flatten)]
    pub summary: Summary,
}
