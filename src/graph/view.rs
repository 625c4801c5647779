use crate::graph::medium::Medium;
use crate::graph::node::NodeId;
use crate::graph::topology::Topology;

/// Read access to "who is next to whom", addressed by adjacency slot so that
/// traversals can resume a node's neighbor scan from a saved position.
pub trait Adjacency {
    fn node_count(&self) -> usize;

    /// Number of adjacency slots of `node`, including slots that yield no
    /// neighbor.
    fn degree(&self, node: NodeId) -> usize;

    /// The neighbor behind `slot`, `None` if the slot is hidden in this view.
    fn neighbor(&self, node: NodeId, slot: usize) -> Option<NodeId>;

    fn neighbors(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.degree(node)).filter_map(move |slot| self.neighbor(node, slot))
    }
}

impl Adjacency for Topology {
    fn node_count(&self) -> usize {
        Topology::node_count(self)
    }

    fn degree(&self, node: NodeId) -> usize {
        Topology::degree(self, node)
    }

    fn neighbor(&self, node: NodeId, slot: usize) -> Option<NodeId> {
        let link = self.link(node, slot);
        (!link.is_detached()).then(|| link.to())
    }
}

/// The topology as if `excluded` did not exist, with every node above it
/// shifted down by one. Nothing is mutated.
pub struct Excluding<'a> {
    topology: &'a Topology,
    excluded: NodeId,
}

impl<'a> Excluding<'a> {
    pub fn new(topology: &'a Topology, excluded: NodeId) -> Self {
        Self { topology, excluded }
    }

    /// Maps a node of this view back to the full topology.
    pub fn original(&self, node: NodeId) -> NodeId {
        if node < self.excluded {
            node
        } else {
            NodeId(node.index() + 1)
        }
    }

    fn reduced(&self, node: NodeId) -> Option<NodeId> {
        if node < self.excluded {
            Some(node)
        } else if node == self.excluded {
            None
        } else {
            Some(NodeId(node.index() - 1))
        }
    }
}

impl Adjacency for Excluding<'_> {
    fn node_count(&self) -> usize {
        self.topology.node_count().saturating_sub(1)
    }

    fn degree(&self, node: NodeId) -> usize {
        self.topology.degree(self.original(node))
    }

    fn neighbor(&self, node: NodeId, slot: usize) -> Option<NodeId> {
        Adjacency::neighbor(self.topology, self.original(node), slot)
            .and_then(|n| self.reduced(n))
    }
}

/// Only the links of one medium.
pub struct MediumOnly<'a> {
    topology: &'a Topology,
    medium: Medium,
}

impl<'a> MediumOnly<'a> {
    pub fn new(topology: &'a Topology, medium: Medium) -> Self {
        Self { topology, medium }
    }
}

impl Adjacency for MediumOnly<'_> {
    fn node_count(&self) -> usize {
        self.topology.node_count()
    }

    fn degree(&self, node: NodeId) -> usize {
        self.topology.degree(node)
    }

    fn neighbor(&self, node: NodeId, slot: usize) -> Option<NodeId> {
        let link = self.topology.link(node, slot);
        if link.medium() == self.medium {
            Adjacency::neighbor(self.topology, node, slot)
        } else {
            None
        }
    }
}
