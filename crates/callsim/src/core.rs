//! Core `callsim` data structures and routines. The most common entry point is
//! [run::run()], which replays a [scenario](Scenario) under every configured [policy](Policy).

pub use callsim_core::*;
