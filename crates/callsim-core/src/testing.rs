use crate::call::{Call, CallId};
use crate::network::types::{Link, Node, NodeId, NodeName};
use crate::units::{Circuits, Millisecs, Secs};

pub(crate) fn nodes(n: usize) -> Vec<Node> {
    (0..n)
        .map(|i| {
            let name = NodeName::new((b'A' + i as u8) as char).unwrap();
            Node::new(NodeId::new(i), name)
        })
        .collect()
}

pub(crate) fn link(a: usize, b: usize, delay: u64, capacity: u64) -> Link {
    Link::new(
        NodeId::new(a),
        NodeId::new(b),
        Millisecs::new(delay),
        Circuits::new(capacity),
    )
}

pub(crate) fn call(id: usize, src: usize, dst: usize, arrival: f64, duration: f64) -> Call {
    Call::new(
        CallId::new(id),
        NodeId::new(src),
        NodeId::new(dst),
        Secs::new(arrival),
        Secs::new(duration),
    )
}

/// A-B-C in a line, every link with the given capacity.
pub(crate) fn line_config(capacity: u64) -> (Vec<Node>, Vec<Link>) {
    (
        nodes(3),
        vec![link(0, 1, 10, capacity), link(1, 2, 20, capacity)],
    )
}

/// A triangle with a thin direct link A-C and a fat detour through B.
pub(crate) fn triangle_config() -> (Vec<Node>, Vec<Link>) {
    (
        nodes(3),
        vec![link(0, 1, 5, 5), link(1, 2, 5, 5), link(0, 2, 30, 1)],
    )
}

/// Two parallel two-hop paths between A and D: A-B-D and A-C-D.
pub(crate) fn diamond_config(capacity: u64) -> (Vec<Node>, Vec<Link>) {
    (
        nodes(4),
        vec![
            link(0, 1, 10, capacity),
            link(1, 3, 10, capacity),
            link(0, 2, 15, capacity),
            link(2, 3, 15, capacity),
        ],
    )
}

/// The line A-B-C plus an isolated node D.
pub(crate) fn isolated_config() -> (Vec<Node>, Vec<Link>) {
    let (_, links) = line_config(5);
    (nodes(4), links)
}
