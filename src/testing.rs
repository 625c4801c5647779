//! Small topologies shared by the unit tests.

use crate::graph::medium::Medium;
use crate::graph::node::NodeId;
use crate::graph::topology::Topology;

/// 0 -copper/10- 1 -copper/5- 2 -optical/8- 3
pub fn chain() -> Topology {
    let mut topology = Topology::new(4);
    topology
        .connect(NodeId(0), NodeId(1), Medium::Copper, 10, 230)
        .unwrap();
    topology
        .connect(NodeId(1), NodeId(2), Medium::Copper, 5, 460)
        .unwrap();
    topology
        .connect(NodeId(2), NodeId(3), Medium::Optical, 8, 200)
        .unwrap();
    topology
}

pub fn from_pairs(node_count: usize, pairs: &[(usize, usize)]) -> Topology {
    let mut topology = Topology::new(node_count);
    for &(from, to) in pairs {
        topology
            .connect(NodeId(from), NodeId(to), Medium::Copper, 1, 100)
            .unwrap();
    }
    topology
}

pub fn path(n: usize) -> Topology {
    let pairs: Vec<(usize, usize)> = (1..n).map(|v| (v - 1, v)).collect();
    from_pairs(n, &pairs)
}

pub fn cycle(n: usize) -> Topology {
    let pairs: Vec<(usize, usize)> = (0..n).map(|v| (v, (v + 1) % n)).collect();
    from_pairs(n, &pairs)
}

/// Two triangles sharing node 2.
pub fn bowtie() -> Topology {
    from_pairs(5, &[(0, 1), (1, 2), (2, 0), (2, 3), (3, 4), (4, 2)])
}

/// Sorted `(from, to, medium, bandwidth, length)` of every stored link.
pub fn link_tuples(topology: &Topology) -> Vec<(usize, usize, Medium, u64, u64)> {
    let mut tuples: Vec<_> = (0..topology.node_count())
        .flat_map(|v| topology.links(NodeId(v)))
        .map(|l| {
            (
                l.from().index(),
                l.to().index(),
                l.medium(),
                l.bandwidth(),
                l.length(),
            )
        })
        .collect();
    tuples.sort_by_key(|&(from, to, medium, bandwidth, length)| {
        (from, to, medium.name(), bandwidth, length)
    });
    tuples
}
