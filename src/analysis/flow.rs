//! Maximum flow and minimum cut with shortest augmenting paths
//! (Edmonds–Karp).
//!
//! The engine works directly on the `flow` counters of the topology's links.
//! A topology that already carries flow is accepted as long as that flow is
//! feasible for the requested source and sink; call
//! [`Topology::reset_flows`] before an unrelated query.

use crate::error::{TopologyError, TopologyResult};
use crate::graph::link::Link;
use crate::graph::node::NodeId;
use crate::graph::topology::Topology;
use std::collections::VecDeque;
use tracing::{debug, trace};

/// How the two stored directions of a physical link share capacity.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum FlowMode {
    /// Each direction has the full bandwidth on its own.
    #[default]
    Independent,
    /// Both directions draw from one bandwidth; opposing flow cancels.
    Shared,
}

#[derive(Clone, Copy, Debug)]
enum ArcKind {
    /// along the link stored at (tail, slot)
    Forward,
    /// against the flow of the twin of (tail, slot)
    Backward,
    /// along the physical link, cancelling the twin's flow first
    Shared,
}

#[derive(Clone, Copy, Debug)]
struct Arc {
    tail: NodeId,
    slot: usize,
    kind: ArcKind,
}

impl Arc {
    fn head(self, topology: &Topology) -> NodeId {
        topology.link(self.tail, self.slot).to()
    }

    fn twin_slot(self, topology: &Topology) -> usize {
        topology.link(self.tail, self.slot).twin()
    }

    fn residual(self, topology: &Topology) -> TopologyResult<u64> {
        let head = self.head(topology);
        let link = topology.link(self.tail, self.slot);
        let twin = topology.link(head, self.twin_slot(topology));
        match self.kind {
            ArcKind::Forward => link.residual_capacity_to(head),
            ArcKind::Backward => twin.residual_capacity_to(head),
            ArcKind::Shared => {
                Ok(link.residual_capacity_to(head)? + twin.residual_capacity_to(head)?)
            }
        }
    }

    fn augment(self, topology: &mut Topology, delta: u64) -> TopologyResult<()> {
        let head = self.head(topology);
        let twin_slot = self.twin_slot(topology);
        match self.kind {
            ArcKind::Forward => topology.link_mut(self.tail, self.slot).push_flow(head, delta),
            ArcKind::Backward => topology.link_mut(head, twin_slot).push_flow(head, delta),
            ArcKind::Shared => {
                let cancel = delta.min(topology.link(head, twin_slot).flow());
                topology.link_mut(head, twin_slot).push_flow(head, cancel)?;
                topology
                    .link_mut(self.tail, self.slot)
                    .push_flow(head, delta - cancel)
            }
        }
    }
}

impl FlowMode {
    fn arc_kinds(self) -> &'static [ArcKind] {
        match self {
            FlowMode::Independent => &[ArcKind::Forward, ArcKind::Backward],
            FlowMode::Shared => &[ArcKind::Shared],
        }
    }
}

/// Net flow into `node`: inflow on the twins minus outflow on its own links.
fn excess(topology: &Topology, node: NodeId) -> i128 {
    (0..topology.degree(node))
        .filter_map(|slot| {
            let outflow = topology.link(node, slot).flow() as i128;
            topology
                .twin(node, slot)
                .map(|twin| twin.flow() as i128 - outflow)
        })
        .sum()
}

fn check_feasible(topology: &Topology, source: NodeId, sink: NodeId) -> Result<(), String> {
    for v in 0..topology.node_count() {
        if let Some(link) = topology
            .links(NodeId(v))
            .iter()
            .find(|l| l.flow() > l.bandwidth())
        {
            return Err(format!(
                "link {} -> {} carries {} over bandwidth {}",
                link.from(),
                link.to(),
                link.flow(),
                link.bandwidth()
            ));
        }
    }

    let at_source = excess(topology, source);
    let at_sink = excess(topology, sink);
    if at_source != -at_sink {
        return Err(format!(
            "excess at source {source} is {at_source}, excess at sink {sink} is {at_sink}"
        ));
    }

    (0..topology.node_count())
        .map(NodeId)
        .filter(|&v| v != source && v != sink)
        .find(|&v| excess(topology, v) != 0)
        .map_or(Ok(()), |v| Err(format!("net flow at node {v} is not zero")))
}

pub struct MaxFlow {
    source: NodeId,
    sink: NodeId,
    mode: FlowMode,
    value: u64,
    /// marked[v] iff v is reachable from the source in the residual graph
    marked: Vec<bool>,
    edge_to: Vec<Option<Arc>>,
}

impl MaxFlow {
    /// Pushes a maximum flow from `source` to `sink` through `topology`.
    pub fn compute(
        topology: &mut Topology,
        source: NodeId,
        sink: NodeId,
        mode: FlowMode,
    ) -> TopologyResult<Self> {
        topology.check_node(source)?;
        topology.check_node(sink)?;
        if source == sink {
            return Err(TopologyError::SourceIsSink(source));
        }
        check_feasible(topology, source, sink).map_err(TopologyError::InfeasibleFlow)?;

        let n = topology.node_count();
        let mut flow = Self {
            source,
            sink,
            mode,
            value: 0,
            marked: vec![false; n],
            edge_to: vec![None; n],
        };

        let mut value = excess(topology, sink);
        let mut augmentations = 0usize;
        while flow.has_augmenting_path(topology)? {
            let arcs = flow.path_arcs();
            let mut bottleneck = u64::MAX;
            for arc in &arcs {
                bottleneck = bottleneck.min(arc.residual(topology)?);
            }
            for arc in &arcs {
                arc.augment(topology, bottleneck)?;
            }

            trace!(bottleneck, "augmented");
            value += bottleneck as i128;
            augmentations += 1;
        }
        flow.value = value.max(0) as u64;

        debug!(
            source = source.index(),
            sink = sink.index(),
            ?mode,
            value = flow.value,
            augmentations,
            "max flow computed"
        );
        debug_assert!(
            flow.verify(topology).is_ok(),
            "max flow violates its optimality conditions"
        );
        Ok(flow)
    }

    /// Arcs of the last augmenting path, from the sink back to the source.
    fn path_arcs(&self) -> Vec<Arc> {
        let mut arcs = Vec::new();
        let mut v = self.sink;
        while let Some(arc) = self.edge_to[v.index()] {
            arcs.push(arc);
            v = arc.tail;
        }
        arcs
    }

    fn has_augmenting_path(&mut self, topology: &Topology) -> TopologyResult<bool> {
        self.marked.fill(false);
        self.edge_to.fill(None);

        let mut queue = VecDeque::from([self.source]);
        self.marked[self.source.index()] = true;

        while let Some(v) = queue.pop_front() {
            if self.marked[self.sink.index()] {
                break;
            }
            for slot in 0..topology.degree(v) {
                let link = topology.link(v, slot);
                if link.is_detached() || self.marked[link.to().index()] {
                    continue;
                }
                let w = link.to();
                for &kind in self.mode.arc_kinds() {
                    let arc = Arc { tail: v, slot, kind };
                    if arc.residual(topology)? > 0 {
                        self.edge_to[w.index()] = Some(arc);
                        self.marked[w.index()] = true;
                        queue.push_back(w);
                        break;
                    }
                }
            }
        }

        Ok(self.marked[self.sink.index()])
    }

    pub fn value(&self) -> u64 {
        self.value
    }

    pub fn source(&self) -> NodeId {
        self.source
    }

    pub fn sink(&self) -> NodeId {
        self.sink
    }

    /// Whether `node` is on the source side of the minimum cut.
    pub fn in_cut(&self, node: NodeId) -> TopologyResult<bool> {
        self.marked
            .get(node.index())
            .copied()
            .ok_or(TopologyError::VertexOutOfRange {
                vertex: node.index(),
                count: self.marked.len(),
            })
    }

    /// Links leading from the source side to the sink side of the cut.
    pub fn cut_links<'t>(&self, topology: &'t Topology) -> Vec<&'t Link> {
        (0..topology.node_count())
            .filter(|&v| self.marked[v])
            .flat_map(|v| topology.links(NodeId(v)))
            .filter(|l| !l.is_detached() && !self.marked[l.to().index()])
            .collect()
    }

    /// Checks feasibility, the side of source and sink, and that the cut
    /// capacity equals the flow value.
    pub fn verify(&self, topology: &Topology) -> TopologyResult<()> {
        check_feasible(topology, self.source, self.sink).map_err(TopologyError::InfeasibleFlow)?;

        if !self.in_cut(self.source)? {
            return Err(TopologyError::InfeasibleFlow(format!(
                "source {} is not on the source side of the cut",
                self.source
            )));
        }
        if self.in_cut(self.sink)? {
            return Err(TopologyError::InfeasibleFlow(format!(
                "sink {} is on the source side of the cut",
                self.sink
            )));
        }

        let cut = self.cut_links(topology).iter().map(|l| l.bandwidth()).sum();
        if cut != self.value {
            return Err(TopologyError::InconsistentCut {
                flow: self.value,
                cut,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::medium::Medium;
    use crate::scenario::random::RandomTopology;
    use crate::testing::{chain, cycle, from_pairs};

    fn assert_conserved(topology: &Topology, source: NodeId, sink: NodeId) {
        for v in (0..topology.node_count()).map(NodeId) {
            if v != source && v != sink {
                assert_eq!(0, excess(topology, v), "net flow at node {v}");
            }
        }
        assert_eq!(excess(topology, sink), -excess(topology, source));
    }

    /// Smallest cut capacity over every node subset containing the source
    /// and not the sink.
    fn brute_force_min_cut(topology: &Topology, source: usize, sink: usize) -> u64 {
        let n = topology.node_count();
        (0u32..1 << n)
            .filter(|set| set & (1 << source) != 0 && set & (1 << sink) == 0)
            .map(|set| {
                (0..n)
                    .filter(|v| set & (1 << v) != 0)
                    .flat_map(|v| topology.links(NodeId(v)))
                    .filter(|l| set & (1 << l.to().index()) == 0)
                    .map(|l| l.bandwidth())
                    .sum()
            })
            .min()
            .unwrap()
    }

    #[test]
    fn test_chain_bottleneck() {
        for mode in [FlowMode::Independent, FlowMode::Shared] {
            let mut topology = chain();
            let flow = MaxFlow::compute(&mut topology, NodeId(0), NodeId(3), mode).unwrap();

            assert_eq!(5, flow.value());
            assert!(flow.in_cut(NodeId(0)).unwrap());
            assert!(flow.in_cut(NodeId(1)).unwrap());
            assert!(!flow.in_cut(NodeId(2)).unwrap());
            assert!(!flow.in_cut(NodeId(3)).unwrap());

            let cut = flow.cut_links(&topology);
            assert_eq!(1, cut.len());
            assert_eq!((NodeId(1), NodeId(2)), (cut[0].from(), cut[0].to()));
            flow.verify(&topology).unwrap();
        }
    }

    #[test]
    fn test_parallel_links_add_up() {
        let mut topology = Topology::new(2);
        topology
            .connect(NodeId(0), NodeId(1), Medium::Copper, 3, 10)
            .unwrap();
        topology
            .connect(NodeId(1), NodeId(0), Medium::Optical, 4, 10)
            .unwrap();

        let flow =
            MaxFlow::compute(&mut topology, NodeId(1), NodeId(0), FlowMode::Independent).unwrap();
        assert_eq!(7, flow.value());
    }

    #[test]
    fn test_cycle_uses_both_ways_around() {
        let mut topology = cycle(6);
        let flow = MaxFlow::compute(&mut topology, NodeId(0), NodeId(3), FlowMode::Shared).unwrap();

        assert_eq!(2, flow.value());
        assert_conserved(&topology, NodeId(0), NodeId(3));
    }

    #[test]
    fn test_needs_residual_backward_arcs() {
        // the first shortest path 0-1-4-5 blocks 0-2-4-5, the second path
        // has to detour from 4 back through 1
        let mut topology = from_pairs(6, &[(0, 1), (0, 2), (1, 4), (2, 4), (1, 3), (3, 5), (4, 5)]);
        let flow =
            MaxFlow::compute(&mut topology, NodeId(0), NodeId(5), FlowMode::Independent).unwrap();

        assert_eq!(brute_force_min_cut(&topology, 0, 5), flow.value());
        assert_eq!(2, flow.value());
    }

    #[test]
    fn test_random_topologies_match_brute_force_cut() {
        for seed in 0..20 {
            let base = RandomTopology::new(8).extra_links(6).build(seed).unwrap();
            let expected = brute_force_min_cut(&base, 0, 7);

            for mode in [FlowMode::Independent, FlowMode::Shared] {
                let mut topology = base.clone();
                let flow = MaxFlow::compute(&mut topology, NodeId(0), NodeId(7), mode).unwrap();

                assert_eq!(expected, flow.value(), "seed {seed}, {mode:?}");
                assert_conserved(&topology, NodeId(0), NodeId(7));
                flow.verify(&topology).unwrap();
                for v in 0..topology.node_count() {
                    assert!(
                        topology
                            .links(NodeId(v))
                            .iter()
                            .all(|l| l.flow() <= l.bandwidth())
                    );
                }
            }
        }
    }

    #[test]
    fn test_shared_mode_never_carries_both_directions() {
        let mut topology = RandomTopology::new(12).extra_links(20).build(3).unwrap();
        MaxFlow::compute(&mut topology, NodeId(0), NodeId(11), FlowMode::Shared).unwrap();

        for v in (0..topology.node_count()).map(NodeId) {
            for slot in 0..topology.degree(v) {
                let link = topology.link(v, slot);
                let twin = topology.twin(v, slot).unwrap();
                if link.from() != link.to() {
                    assert!(link.flow() == 0 || twin.flow() == 0);
                }
            }
        }
    }

    #[test]
    fn test_rejects_bad_endpoints() {
        let mut topology = chain();

        assert!(matches!(
            MaxFlow::compute(&mut topology, NodeId(2), NodeId(2), FlowMode::Independent),
            Err(TopologyError::SourceIsSink(NodeId(2)))
        ));
        assert!(matches!(
            MaxFlow::compute(&mut topology, NodeId(0), NodeId(9), FlowMode::Independent),
            Err(TopologyError::VertexOutOfRange { vertex: 9, count: 4 })
        ));

        let flow =
            MaxFlow::compute(&mut topology, NodeId(0), NodeId(3), FlowMode::Independent).unwrap();
        assert!(matches!(
            flow.in_cut(NodeId(4)),
            Err(TopologyError::VertexOutOfRange { .. })
        ));
    }

    #[test]
    fn test_existing_flow_must_be_feasible() {
        let mut topology = chain();
        MaxFlow::compute(&mut topology, NodeId(0), NodeId(3), FlowMode::Independent).unwrap();

        // same query again starts from the existing flow and finds nothing new
        let again =
            MaxFlow::compute(&mut topology, NodeId(0), NodeId(3), FlowMode::Independent).unwrap();
        assert_eq!(5, again.value());

        // node 3 still holds the excess of the previous query
        assert!(matches!(
            MaxFlow::compute(&mut topology, NodeId(0), NodeId(2), FlowMode::Independent),
            Err(TopologyError::InfeasibleFlow(_))
        ));

        topology.reset_flows();
        let flow =
            MaxFlow::compute(&mut topology, NodeId(0), NodeId(2), FlowMode::Independent).unwrap();
        assert_eq!(5, flow.value());
    }

    #[test]
    fn test_detached_links_carry_nothing() {
        let mut topology = chain();
        topology.remove(NodeId(2)).unwrap();

        // old node 3 is now 2 and only reachable through the removed node
        let flow =
            MaxFlow::compute(&mut topology, NodeId(0), NodeId(2), FlowMode::Independent).unwrap();
        assert_eq!(0, flow.value());

        topology.restore(NodeId(2)).unwrap();
    }
}
