//! `callsim` evaluates routing policies for circuit-switched calls. Given a topology of links with
//! fixed capacity and propagation delay, and a time-ordered sequence of calls, it replays the
//! calls once per policy and reports how many each policy admits or blocks, along with the
//! average hop count and propagation delay of the admitted calls.

#![warn(unreachable_pub, missing_docs)]

pub mod core;
pub mod utils;
