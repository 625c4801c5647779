use crate::error::TopologyResult;
use crate::graph::link::Link;
use crate::graph::node::NodeId;
use crate::graph::topology::Topology;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// Min-heap entry ordered by latency, then by link position for stable ties.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Candidate {
    pub latency: f64,
    pub node: NodeId,
    pub slot: usize,
}

impl PartialEq for Candidate {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Candidate {}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .latency
            .total_cmp(&self.latency)
            .then_with(|| other.node.cmp(&self.node))
            .then_with(|| other.slot.cmp(&self.slot))
    }
}

/// Lowest-latency paths from one source (Dijkstra over link weights).
pub struct LatencyPaths {
    source: NodeId,
    latency: Vec<f64>,
    /// (node, slot) of the last link on the best path
    edge_to: Vec<Option<(NodeId, usize)>>,
}

impl LatencyPaths {
    pub fn compute(topology: &Topology, source: NodeId) -> TopologyResult<Self> {
        topology.check_node(source)?;
        let n = topology.node_count();
        let mut paths = Self {
            source,
            latency: vec![f64::INFINITY; n],
            edge_to: vec![None; n],
        };
        paths.latency[source.index()] = 0.0;

        let mut heap = BinaryHeap::from([Candidate {
            latency: 0.0,
            node: source,
            slot: 0,
        }]);
        while let Some(Candidate { latency, node, .. }) = heap.pop() {
            if latency > paths.latency[node.index()] {
                continue;
            }
            for (slot, link) in topology.links(node).iter().enumerate() {
                if link.is_detached() {
                    continue;
                }
                let to = link.to().index();
                let through = latency + link.weight();
                if through < paths.latency[to] {
                    paths.latency[to] = through;
                    paths.edge_to[to] = Some((node, slot));
                    heap.push(Candidate {
                        latency: through,
                        node: link.to(),
                        slot: 0,
                    });
                }
            }
        }
        Ok(paths)
    }

    pub fn source(&self) -> NodeId {
        self.source
    }

    pub fn latency_to(&self, node: NodeId) -> Option<f64> {
        let latency = self.latency[node.index()];
        latency.is_finite().then_some(latency)
    }

    /// Links from the source to `node` in travel order, `None` if unreachable.
    pub fn path_to<'t>(&self, topology: &'t Topology, node: NodeId) -> Option<Vec<&'t Link>> {
        self.latency_to(node)?;
        let mut path = Vec::new();
        let mut v = node;
        while let Some((from, slot)) = self.edge_to[v.index()] {
            path.push(topology.link(from, slot));
            v = from;
        }
        path.reverse();
        Some(path)
    }
}

/// The narrowest bandwidth along a path.
pub fn min_bandwidth(path: &[&Link]) -> Option<u64> {
    path.iter().map(|l| l.bandwidth()).min()
}
