use crate::graph::node::NodeId;
use crate::graph::view::Adjacency;
use tracing::trace;

/// Saved state of one pending "recursive call" of the depth-first search.
#[derive(Clone, Copy, Debug)]
struct Frame {
    node: NodeId,
    parent: NodeId,
    next_slot: usize,
    children: usize,
}

/// Articulation points of an undirected graph (given as both directions of
/// every link) from a single depth-first pass with discovery times and
/// low-links.
///
/// The search keeps its own stack of frames so that deep graphs, such as a
/// long path, do not overflow the thread stack.
pub struct ArticulationPoints {
    /// discovery time, `None` until visited
    pre: Vec<Option<usize>>,
    low: Vec<usize>,
    articulation: Vec<bool>,
    component: Vec<usize>,
    component_sizes: Vec<usize>,
}

impl ArticulationPoints {
    pub fn new<G: Adjacency>(graph: &G) -> Self {
        let n = graph.node_count();
        let mut points = Self {
            pre: vec![None; n],
            low: vec![0; n],
            articulation: vec![false; n],
            component: vec![0; n],
            component_sizes: Vec::new(),
        };

        let mut counter = 0;
        let mut stack = Vec::with_capacity(32);
        for root in (0..n).map(NodeId) {
            if points.pre[root.index()].is_none() {
                points.component_sizes.push(0);
                points.search(graph, root, &mut counter, &mut stack);
            }
        }

        trace!(
            nodes = n,
            components = points.component_count(),
            articulation_points = points.articulation.iter().filter(|&&a| a).count(),
            "articulation search done"
        );
        points
    }

    fn visit(&mut self, node: NodeId, counter: &mut usize) {
        let v = node.index();
        self.pre[v] = Some(*counter);
        self.low[v] = *counter;
        *counter += 1;

        let component = self.component_sizes.len() - 1;
        self.component[v] = component;
        self.component_sizes[component] += 1;
    }

    fn search<G: Adjacency>(
        &mut self,
        graph: &G,
        root: NodeId,
        counter: &mut usize,
        stack: &mut Vec<Frame>,
    ) {
        self.visit(root, counter);
        stack.push(Frame {
            node: root,
            parent: root,
            next_slot: 0,
            children: 0,
        });

        'recurse: while let Some(frame) = stack.last_mut() {
            let v = frame.node;

            while frame.next_slot < graph.degree(v) {
                let slot = frame.next_slot;
                frame.next_slot += 1;
                let Some(w) = graph.neighbor(v, slot) else {
                    continue;
                };

                match self.pre[w.index()] {
                    None => {
                        frame.children += 1;
                        self.visit(w, counter);
                        stack.push(Frame {
                            node: w,
                            parent: v,
                            next_slot: 0,
                            children: 0,
                        });
                        continue 'recurse;
                    }
                    // ignore the link back to the parent
                    Some(pre_w) if w != frame.parent => {
                        self.low[v.index()] = self.low[v.index()].min(pre_w);
                    }
                    Some(_) => {}
                }
            }

            let Some(frame) = stack.pop() else {
                break;
            };
            if frame.node == root {
                if frame.children > 1 {
                    self.articulation[root.index()] = true;
                }
                continue;
            }

            let (p, c) = (frame.parent.index(), frame.node.index());
            self.low[p] = self.low[p].min(self.low[c]);
            if frame.parent != root && Some(self.low[c]) >= self.pre[p] {
                self.articulation[p] = true;
            }
        }
    }

    pub fn is_articulation(&self, node: NodeId) -> bool {
        self.articulation[node.index()]
    }

    pub fn is_visited(&self, node: NodeId) -> bool {
        self.pre[node.index()].is_some()
    }

    pub fn articulation_points(&self) -> Vec<NodeId> {
        self.articulation
            .iter()
            .enumerate()
            .filter(|(_, a)| **a)
            .map(|(v, _)| NodeId(v))
            .collect()
    }

    pub fn component_count(&self) -> usize {
        self.component_sizes.len()
    }

    pub fn component_of(&self, node: NodeId) -> usize {
        self.component[node.index()]
    }

    pub fn component_size(&self, component: usize) -> usize {
        self.component_sizes[component]
    }
}
