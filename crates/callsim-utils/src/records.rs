//! Line-oriented topology and workload records.
//!
//! A topology record is `<node> <node> <delay> <capacity>`; a workload record is
//! `<arrival> <src> <dst> <duration>`. Nodes are single uppercase letters.

use std::str::FromStr;

use callsim_core::{
    units::{Circuits, Millisecs, Secs},
    Call, CallId, Link, NodeMap, NodeName, Scenario,
};
use log::warn;

use crate::{Error, LoadedScenario};

/// One undirected link declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct LinkRecord {
    /// One endpoint.
    pub a: NodeName,
    /// The other endpoint.
    pub b: NodeName,
    /// Propagation delay.
    pub delay: Millisecs,
    /// Number of circuits.
    pub capacity: Circuits,
}

/// One call request.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CallRecord {
    /// Arrival time.
    pub arrival: Secs,
    /// Calling node.
    pub src: NodeName,
    /// Called node.
    pub dst: NodeName,
    /// Holding time.
    pub duration: Secs,
}

/// Parses topology records. Malformed lines are skipped with a warning; a well-formed line naming
/// an invalid node is an error.
pub fn parse_topology(s: &str) -> Result<Vec<LinkRecord>, Error> {
    parse_lines(s, |line, [a, b, delay, capacity]| {
        let (Ok(delay), Ok(capacity)) = (delay.parse::<u64>(), capacity.parse::<u64>()) else {
            return Ok(None);
        };
        Ok(Some(LinkRecord {
            a: node_name(line, a)?,
            b: node_name(line, b)?,
            delay: Millisecs::new(delay),
            capacity: Circuits::new(capacity),
        }))
    })
}

/// Parses workload records, preserving their order. Malformed lines, including non-finite times
/// and negative durations, are skipped with a warning; a well-formed line naming an invalid node is
/// an error.
pub fn parse_workload(s: &str) -> Result<Vec<CallRecord>, Error> {
    parse_lines(s, |line, [arrival, src, dst, duration]| {
        let (Ok(arrival), Ok(duration)) = (Secs::from_str(arrival), Secs::from_str(duration))
        else {
            return Ok(None);
        };
        if !arrival.is_finite() || !duration.is_finite() || duration.into_f64() < 0.0 {
            return Ok(None);
        }
        Ok(Some(CallRecord {
            arrival,
            src: node_name(line, src)?,
            dst: node_name(line, dst)?,
            duration,
        }))
    })
}

fn parse_lines<T, F>(s: &str, mut parse: F) -> Result<Vec<T>, Error>
where
    F: FnMut(usize, [&str; 4]) -> Result<Option<T>, Error>,
{
    let mut records = Vec::new();
    for (i, text) in s.lines().enumerate() {
        let line = i + 1;
        let fields = text.split_whitespace().collect::<Vec<_>>();
        if fields.is_empty() {
            continue;
        }
        let parsed = match <[&str; 4]>::try_from(fields.as_slice()) {
            Ok(fields) => parse(line, fields)?,
            Err(_) => None,
        };
        match parsed {
            Some(record) => records.push(record),
            None => warn!("skipping malformed record on line {line}: {text:?}"),
        }
    }
    Ok(records)
}

fn node_name(line: usize, s: &str) -> Result<NodeName, Error> {
    s.parse()
        .map_err(|source| Error::NodeName { line, source })
}

/// Interns every node letter in `links` and `calls` and builds the corresponding [`Scenario`].
/// Calls are numbered in record order.
pub fn build_scenario(links: &[LinkRecord], calls: &[CallRecord]) -> LoadedScenario {
    let names = links
        .iter()
        .flat_map(|l| [l.a, l.b])
        .chain(calls.iter().flat_map(|c| [c.src, c.dst]));
    let node_map = NodeMap::new(names);
    // Every name was interned above
    let id = |name| node_map.id_of(name).unwrap();
    let links = links
        .iter()
        .map(|l| Link::new(id(l.a), id(l.b), l.delay, l.capacity))
        .collect::<Vec<_>>();
    let calls = calls
        .iter()
        .enumerate()
        .map(|(i, c)| Call::new(CallId::new(i), id(c.src), id(c.dst), c.arrival, c.duration))
        .collect::<Vec<_>>();
    let scenario = Scenario::builder()
        .nodes(node_map.nodes())
        .links(links)
        .calls(calls)
        .build();
    LoadedScenario { scenario, node_map }
}
