use crate::graph::medium::Medium;
use crate::graph::node::NodeId;
use crate::graph::topology::Topology;
use crate::graph::view::{Adjacency, MediumOnly};
use std::collections::VecDeque;

/// Nodes reachable from a source by breadth-first search.
pub struct Reachability {
    visited: Vec<bool>,
}

impl Reachability {
    pub fn bfs<G: Adjacency>(graph: &G, source: NodeId) -> Self {
        let mut visited = vec![false; graph.node_count()];
        Self::fill(graph, source, &mut visited);
        Self { visited }
    }

    fn fill<G: Adjacency>(graph: &G, source: NodeId, visited: &mut [bool]) {
        let mut queue = VecDeque::from([source]);
        visited[source.index()] = true;
        while let Some(v) = queue.pop_front() {
            for w in graph.neighbors(v) {
                if !visited[w.index()] {
                    visited[w.index()] = true;
                    queue.push_back(w);
                }
            }
        }
    }

    pub fn is_visited(&self, node: NodeId) -> bool {
        self.visited[node.index()]
    }

    pub fn reached(&self) -> usize {
        self.visited.iter().filter(|&&v| v).count()
    }

    pub fn all_visited(&self) -> bool {
        self.visited.iter().all(|&v| v)
    }

    /// Number of connected components.
    #[cfg(test)]
    pub fn components<G: Adjacency>(graph: &G) -> usize {
        let mut visited = vec![false; graph.node_count()];
        let mut count = 0;
        for v in 0..graph.node_count() {
            if !visited[v] {
                Self::fill(graph, NodeId(v), &mut visited);
                count += 1;
            }
        }
        count
    }
}

/// Whether every node can be reached from node 0 over copper links alone.
pub fn copper_connected(topology: &Topology) -> bool {
    if topology.node_count() == 0 {
        return true;
    }
    Reachability::bfs(&MediumOnly::new(topology, Medium::Copper), NodeId(0)).all_visited()
}
