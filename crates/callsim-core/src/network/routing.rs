//! Least-cost path search over the links that still have capacity.

use petgraph::graph::{EdgeIndex, NodeIndex};
use petgraph::visit::EdgeRef;

use crate::network::{topology::Topology, types::Route, NodeId};
use crate::policy::CostMap;
use crate::state::LinkState;

/// Finds the least-cost route from `src` to `dst` using only links usable in `state`.
///
/// This is Dijkstra's algorithm with a linear scan for the closest unvisited node. Among nodes
/// at equal distance the lowest index wins, and a node's predecessor only changes on a strict
/// improvement, so equal-cost routes are always resolved the same way. Only nodes touching at
/// least one usable link take part in the search; in particular a call from a node with no usable
/// links is never routed, even to itself.
///
/// Returns `None` if `dst` cannot be reached or either endpoint is unknown.
pub fn shortest_path(
    topology: &Topology,
    src: NodeId,
    dst: NodeId,
    costs: &CostMap,
    state: &LinkState,
) -> Option<Route> {
    let g = &topology.graph;
    let (s, d) = (topology.idx_of(src)?, topology.idx_of(dst)?);
    let n = g.node_count();

    let mut unvisited = g
        .node_indices()
        .map(|v| g.edges(v).any(|e| state.is_usable(e.id())))
        .collect::<Vec<_>>();
    let mut dist = vec![f64::INFINITY; n];
    let mut prev: Vec<Option<(NodeIndex, EdgeIndex)>> = vec![None; n];
    dist[s.index()] = 0.0;

    loop {
        let mut next = None;
        let mut best = f64::INFINITY;
        for v in 0..n {
            if unvisited[v] && dist[v] < best {
                best = dist[v];
                next = Some(v);
            }
        }
        // Frontier exhausted without reaching `dst`
        let u = next?;
        unvisited[u] = false;
        if u == d.index() {
            break;
        }
        let u = NodeIndex::new(u);
        for e in g.edges(u) {
            let v = if e.source() == u { e.target() } else { e.source() };
            if !unvisited[v.index()] || !state.is_usable(e.id()) {
                continue;
            }
            let alt = dist[u.index()] + costs.get(e.id());
            if alt < dist[v.index()] {
                dist[v.index()] = alt;
                prev[v.index()] = Some((u, e.id()));
            }
        }
    }

    let mut nodes = vec![g[d].id];
    let mut links = Vec::new();
    let mut cur = d;
    while let Some((p, eidx)) = prev[cur.index()] {
        links.push(eidx);
        nodes.push(g[p].id);
        cur = p;
    }
    nodes.reverse();
    links.reverse();
    let delay = links.iter().map(|&e| g[e].delay.into_f64()).sum::<f64>();
    Some(Route {
        nodes,
        links,
        delay,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::Policy;
    use crate::testing;
    use crate::units::Circuits;
    use anyhow::Context;

    fn ids(route: &Route) -> Vec<usize> {
        route.nodes().iter().map(|n| n.inner()).collect()
    }

    fn route(
        topo: &Topology,
        policy: Policy,
        state: &LinkState,
        src: usize,
        dst: usize,
    ) -> Option<Route> {
        let costs = policy.costs(topo, state);
        shortest_path(topo, NodeId::new(src), NodeId::new(dst), &costs, state)
    }

    #[test]
    fn line_route_counts_hops_and_delay() -> anyhow::Result<()> {
        let (nodes, links) = testing::line_config(1);
        let topo = Topology::new(&nodes, &links).context("failed to create topology")?;
        let state = LinkState::new(&topo);
        let r = route(&topo, Policy::Shpf, &state, 0, 2).context("no route")?;
        assert_eq!(ids(&r), vec![0, 1, 2]);
        assert_eq!(r.nr_hops(), 2);
        assert_eq!(r.delay(), 30.0);
        Ok(())
    }

    #[test]
    fn exhausted_link_is_not_traversed() -> anyhow::Result<()> {
        let (nodes, links) = testing::line_config(1);
        let topo = Topology::new(&nodes, &links)?;
        let mut state = LinkState::new(&topo);
        let bc = topo.find_link(NodeId::new(1), NodeId::new(2)).unwrap();
        state.reserve(bc)?;
        assert!(route(&topo, Policy::Shpf, &state, 0, 2).is_none());
        assert!(route(&topo, Policy::Shpf, &state, 0, 1).is_some());
        Ok(())
    }

    #[test]
    fn equal_cost_tie_prefers_lowest_index() -> anyhow::Result<()> {
        let (nodes, links) = testing::diamond_config(1);
        let topo = Topology::new(&nodes, &links)?;
        let state = LinkState::new(&topo);
        // A-B-D and A-C-D both take two hops; B has the lower index.
        let r = route(&topo, Policy::Shpf, &state, 0, 3).context("no route")?;
        assert_eq!(ids(&r), vec![0, 1, 3]);
        // Reversed, D reaches B first as well.
        let r = route(&topo, Policy::Shpf, &state, 3, 0).context("no route")?;
        assert_eq!(ids(&r), vec![3, 1, 0]);
        Ok(())
    }

    #[test]
    fn delay_policy_takes_longer_but_faster_route() -> anyhow::Result<()> {
        let (nodes, links) = testing::triangle_config();
        let topo = Topology::new(&nodes, &links)?;
        let state = LinkState::new(&topo);
        let shpf = route(&topo, Policy::Shpf, &state, 0, 2).context("no route")?;
        assert_eq!(ids(&shpf), vec![0, 2]);
        let sdpf = route(&topo, Policy::Sdpf, &state, 0, 2).context("no route")?;
        assert_eq!(ids(&sdpf), vec![0, 1, 2]);
        assert_eq!(sdpf.delay(), 10.0);
        Ok(())
    }

    #[test]
    fn isolated_node_is_unreachable() -> anyhow::Result<()> {
        let (nodes, links) = testing::isolated_config();
        let topo = Topology::new(&nodes, &links)?;
        let state = LinkState::new(&topo);
        for p in Policy::ALL {
            assert!(route(&topo, p, &state, 0, 3).is_none());
            assert!(route(&topo, p, &state, 3, 0).is_none());
            assert!(route(&topo, p, &state, 3, 3).is_none());
        }
        Ok(())
    }

    #[test]
    fn self_route_has_no_hops() -> anyhow::Result<()> {
        let (nodes, links) = testing::line_config(1);
        let topo = Topology::new(&nodes, &links)?;
        let state = LinkState::new(&topo);
        let r = route(&topo, Policy::Shpf, &state, 1, 1).context("no route")?;
        assert_eq!(r.nr_hops(), 0);
        assert_eq!(r.delay(), 0.0);
        Ok(())
    }

    #[test]
    fn unknown_node_has_no_route() -> anyhow::Result<()> {
        let (nodes, links) = testing::line_config(1);
        let topo = Topology::new(&nodes, &links)?;
        let state = LinkState::new(&topo);
        assert!(route(&topo, Policy::Shpf, &state, 0, 9).is_none());
        Ok(())
    }

    #[test]
    fn zero_capacity_link_is_never_used() -> anyhow::Result<()> {
        let nodes = testing::nodes(2);
        let topo = Topology::new(&nodes, &[testing::link(0, 1, 1, 0)])?;
        let state = LinkState::new(&topo);
        assert_eq!(state.capacity(EdgeIndex::new(0)), Circuits::ZERO);
        assert!(route(&topo, Policy::Shpf, &state, 0, 1).is_none());
        Ok(())
    }
}
