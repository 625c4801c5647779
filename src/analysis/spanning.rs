use crate::analysis::paths::Candidate;
use crate::graph::link::Link;
use crate::graph::node::NodeId;
use crate::graph::topology::Topology;
use std::collections::BinaryHeap;
use tracing::debug;

/// Marks `node` and queues its links toward unmarked nodes.
fn grow(topology: &Topology, node: NodeId, marked: &mut [bool], heap: &mut BinaryHeap<Candidate>) {
    marked[node.index()] = true;
    for (slot, link) in topology.links(node).iter().enumerate() {
        if !link.is_detached() && !marked[link.to().index()] {
            heap.push(Candidate {
                latency: link.weight(),
                node,
                slot,
            });
        }
    }
}

/// Minimum-latency spanning tree of the component holding node 0, grown
/// with the lazy variant of Prim's algorithm.
pub struct SpanningTree {
    /// (node, slot) of each tree link, in the order it joined the tree
    links: Vec<(NodeId, usize)>,
    total_latency: f64,
}

impl SpanningTree {
    pub fn compute(topology: &Topology) -> Self {
        let mut tree = Self {
            links: Vec::new(),
            total_latency: 0.0,
        };
        if topology.node_count() == 0 {
            return tree;
        }

        let mut marked = vec![false; topology.node_count()];
        let mut heap = BinaryHeap::new();
        grow(topology, NodeId(0), &mut marked, &mut heap);
        while let Some(Candidate { latency, node, slot }) = heap.pop() {
            let to = topology.link(node, slot).to();
            if marked[to.index()] {
                continue;
            }
            tree.links.push((node, slot));
            tree.total_latency += latency;
            grow(topology, to, &mut marked, &mut heap);
        }

        debug!(
            links = tree.links.len(),
            total_latency = tree.total_latency,
            "spanning tree grown"
        );
        tree
    }

    pub fn links<'t>(&self, topology: &'t Topology) -> Vec<&'t Link> {
        self.links
            .iter()
            .map(|&(node, slot)| topology.link(node, slot))
            .collect()
    }

    /// Node 0 followed by each node in the order it joined the tree, empty
    /// for a topology without nodes.
    pub fn node_sequence(&self, topology: &Topology) -> Vec<NodeId> {
        if topology.node_count() == 0 {
            return Vec::new();
        }
        std::iter::once(NodeId(0))
            .chain(self.links(topology).iter().map(|l| l.to()))
            .collect()
    }

    pub fn total_latency(&self) -> f64 {
        self.total_latency
    }

    pub fn average_latency(&self) -> Option<f64> {
        (!self.links.is_empty()).then(|| self.total_latency / self.links.len() as f64)
    }

    pub fn spans(&self, topology: &Topology) -> bool {
        self.links.len() + 1 >= topology.node_count()
    }
}
