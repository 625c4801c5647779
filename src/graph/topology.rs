use crate::error::{TopologyError, TopologyResult};
use crate::graph::link::Link;
use crate::graph::medium::Medium;
use crate::graph::node::NodeId;
use std::collections::TryReserveError;
use std::fmt;
use tracing::debug;

#[derive(Clone, Debug)]
struct Removal {
    node: NodeId,
    links: Vec<Link>,
}

/// Adjacency-list multigraph of physical links.
///
/// Nodes are dense ids `0..node_count()`. A node can be taken out with
/// [`Topology::remove`], which renumbers every node above it and detaches
/// links pointing at it, and put back with [`Topology::restore`]. Only one
/// removal may be pending at a time.
#[derive(Clone, Debug)]
pub struct Topology {
    adj: Vec<Vec<Link>>,
    link_count: usize,
    removal: Option<Removal>,
}

impl Topology {
    pub fn new(node_count: usize) -> Self {
        Self {
            adj: vec![Vec::new(); node_count],
            link_count: 0,
            removal: None,
        }
    }

    /// Like [`Topology::new`], but reports an allocation failure instead of
    /// aborting.
    pub fn try_new(node_count: usize) -> Result<Self, TryReserveError> {
        let mut adj = Vec::new();
        adj.try_reserve_exact(node_count)?;
        adj.resize_with(node_count, Vec::new);
        Ok(Self {
            adj,
            link_count: 0,
            removal: None,
        })
    }

    pub fn node_count(&self) -> usize {
        self.adj.len()
    }

    /// Number of physical links; each is stored as two `Link`s.
    pub fn link_count(&self) -> usize {
        self.link_count
    }

    pub fn check_node(&self, node: NodeId) -> TopologyResult<()> {
        if node.index() < self.node_count() {
            Ok(())
        } else {
            Err(TopologyError::VertexOutOfRange {
                vertex: node.index(),
                count: self.node_count(),
            })
        }
    }

    /// Inserts an anti-parallel pair: `forward` goes to the list of its
    /// source, `backward` to the list of its destination.
    pub fn add_link_pair(&mut self, mut forward: Link, mut backward: Link) -> TopologyResult<()> {
        self.check_node(forward.from())?;
        self.check_node(forward.to())?;
        if backward.from() != forward.to() {
            return Err(TopologyError::InvalidEndpoint {
                node: backward.from(),
                from: forward.from(),
                to: forward.to(),
            });
        }
        if backward.to() != forward.from() {
            return Err(TopologyError::InvalidEndpoint {
                node: backward.to(),
                from: forward.from(),
                to: forward.to(),
            });
        }

        let from = forward.from().index();
        let to = forward.to().index();
        let slot = self.adj[from].len();
        if from == to {
            forward.set_twin(slot + 1);
            backward.set_twin(slot);
        } else {
            forward.set_twin(self.adj[to].len());
            backward.set_twin(slot);
        }

        self.adj[from].push(forward);
        self.adj[to].push(backward);
        self.link_count += 1;
        Ok(())
    }

    pub fn connect(
        &mut self,
        from: NodeId,
        to: NodeId,
        medium: Medium,
        bandwidth: u64,
        length: u64,
    ) -> TopologyResult<()> {
        self.add_link_pair(
            Link::new(from, to, medium, bandwidth, length),
            Link::new(to, from, medium, bandwidth, length),
        )
    }

    pub fn links(&self, node: NodeId) -> &[Link] {
        &self.adj[node.index()]
    }

    pub fn degree(&self, node: NodeId) -> usize {
        self.adj[node.index()].len()
    }

    pub fn link(&self, node: NodeId, slot: usize) -> &Link {
        &self.adj[node.index()][slot]
    }

    pub(crate) fn link_mut(&mut self, node: NodeId, slot: usize) -> &mut Link {
        &mut self.adj[node.index()][slot]
    }

    /// The anti-parallel partner of a link, `None` while the link is detached.
    pub fn twin(&self, node: NodeId, slot: usize) -> Option<&Link> {
        let link = self.link(node, slot);
        if link.is_detached() {
            None
        } else {
            Some(&self.adj[link.to().index()][link.twin()])
        }
    }

    /// Every attached physical link once, in the direction it was inserted.
    pub fn physical_links(&self) -> impl Iterator<Item = &Link> + '_ {
        self.adj.iter().enumerate().flat_map(|(v, links)| {
            links.iter().enumerate().filter_map(move |(slot, link)| {
                let primary = !link.is_detached() && (v, slot) < (link.to().index(), link.twin());
                primary.then_some(link)
            })
        })
    }

    pub fn removed_node(&self) -> Option<NodeId> {
        self.removal.as_ref().map(|r| r.node)
    }

    /// Takes `node` out of the topology. Nodes above it shift down by one,
    /// links pointing at it stay in place but become detached.
    pub fn remove(&mut self, node: NodeId) -> TopologyResult<()> {
        if let Some(pending) = self.removed_node() {
            return Err(TopologyError::RemovalPending { node: pending });
        }
        self.check_node(node)?;

        let links = self.adj.remove(node.index());
        let mut detached = 0;
        for (v, list) in self.adj.iter_mut().enumerate() {
            for link in list.iter_mut() {
                link.set_from(NodeId(v));
                let to = link.to();
                if to == node {
                    link.set_to(NodeId::DETACHED);
                    detached += 1;
                } else if to > node {
                    link.set_to(NodeId(to.index() - 1));
                }
            }
        }

        debug!(node = node.index(), detached, "removed node");
        self.removal = Some(Removal { node, links });
        Ok(())
    }

    /// Undoes [`Topology::remove`] for the same node.
    pub fn restore(&mut self, node: NodeId) -> TopologyResult<()> {
        let removal = match self.removal.take() {
            Some(removal) if removal.node == node => removal,
            other => {
                let pending = other.as_ref().map(|r| r.node);
                self.removal = other;
                return Err(TopologyError::RestoreMismatch {
                    requested: node,
                    pending,
                });
            }
        };

        for link in self.adj.iter_mut().flatten() {
            let to = link.to();
            if to.is_detached() {
                link.set_to(node);
            } else if to >= node {
                link.set_to(NodeId(to.index() + 1));
            }
        }
        self.adj.insert(node.index(), removal.links);
        for (v, list) in self.adj.iter_mut().enumerate() {
            list.iter_mut().for_each(|link| link.set_from(NodeId(v)));
        }

        debug!(node = node.index(), "restored node");
        Ok(())
    }

    /// Zeroes the flow on every link, including links of a removed node.
    pub fn reset_flows(&mut self) {
        self.adj
            .iter_mut()
            .flatten()
            .chain(self.removal.iter_mut().flat_map(|r| r.links.iter_mut()))
            .for_each(|link| link.reset_flow());
    }
}

impl fmt::Display for Topology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.node_count())?;
        for link in self.physical_links() {
            writeln!(
                f,
                "{} {} {} {} {}",
                link.from(),
                link.to(),
                link.medium(),
                link.bandwidth(),
                link.length()
            )?;
        }
        Ok(())
    }
}
