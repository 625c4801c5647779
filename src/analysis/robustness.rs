//! Which pairs of simultaneous node failures split the network.

use crate::analysis::articulation::ArticulationPoints;
use crate::error::{TopologyError, TopologyResult};
use crate::graph::node::NodeId;
use crate::graph::topology::Topology;
use crate::graph::view::{Adjacency, Excluding};
use tracing::{debug, info};

/// How the graph without a candidate node is obtained.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum Strategy {
    /// Remove and restore the node inside the topology itself.
    InPlace,
    /// Read the topology through an index-translating view.
    #[default]
    Translated,
}

/// Two nodes whose joint failure disconnects the remaining nodes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CriticalPair(pub NodeId, pub NodeId);

pub struct RobustnessReport {
    pairs: Vec<CriticalPair>,
    single_points: Vec<NodeId>,
}

impl RobustnessReport {
    /// Every critical pair in both orders, by first then second node.
    pub fn pairs(&self) -> &[CriticalPair] {
        &self.pairs
    }

    /// Every critical pair once, smaller node first.
    pub fn unordered_pairs(&self) -> Vec<CriticalPair> {
        let mut pairs: Vec<CriticalPair> = self
            .pairs
            .iter()
            .map(|&CriticalPair(a, b)| CriticalPair(a.min(b), a.max(b)))
            .collect();
        pairs.sort();
        pairs.dedup();
        pairs
    }

    /// Articulation points of the full topology.
    pub fn single_points(&self) -> &[NodeId] {
        &self.single_points
    }
}

/// Nodes of `reduced` whose removal leaves it disconnected, mapped back to
/// full-topology ids by `original`. With `articulation_only`, just the
/// articulation points of `reduced`, even when it is already disconnected.
fn critical_partners<G, F>(reduced: &G, articulation_only: bool, original: F) -> Vec<NodeId>
where
    G: Adjacency,
    F: Fn(NodeId) -> NodeId,
{
    let points = ArticulationPoints::new(reduced);
    (0..reduced.node_count())
        .map(NodeId)
        .filter(|&v| match points.component_count() {
            _ if articulation_only => points.is_articulation(v),
            0 | 1 => points.is_articulation(v),
            // unless v is a component on its own, the other one stays apart
            2 => points.component_size(points.component_of(v)) > 1,
            _ => true,
        })
        .map(original)
        .collect()
}

pub struct Robustness {
    strategy: Strategy,
    articulation_only: bool,
}

impl Robustness {
    pub fn new(strategy: Strategy) -> Self {
        Self {
            strategy,
            articulation_only: false,
        }
    }

    /// Pair `i` only with articulation points of the graph without `i`. This
    /// misses pairs where removing `i` alone already splits the graph.
    pub fn articulation_only(mut self, articulation_only: bool) -> Self {
        self.articulation_only = articulation_only;
        self
    }

    pub fn run(&self, topology: &mut Topology) -> TopologyResult<RobustnessReport> {
        if let Some(node) = topology.removed_node() {
            return Err(TopologyError::RemovalPending { node });
        }

        let n = topology.node_count();
        let mut pairs = Vec::new();
        for i in (0..n).map(NodeId) {
            let partners = match self.strategy {
                Strategy::Translated => {
                    let view = Excluding::new(topology, i);
                    critical_partners(&view, self.articulation_only, |v| view.original(v))
                }
                Strategy::InPlace => {
                    topology.remove(i)?;
                    let partners = critical_partners(&*topology, self.articulation_only, |v| {
                        if v < i { v } else { NodeId(v.index() + 1) }
                    });
                    topology.restore(i)?;
                    partners
                }
            };

            debug!(candidate = i.index(), partners = partners.len(), "candidate analysed");
            pairs.extend(partners.into_iter().map(|j| CriticalPair(i, j)));
        }

        let single_points = ArticulationPoints::new(&*topology).articulation_points();
        info!(
            nodes = n,
            strategy = ?self.strategy,
            articulation_only = self.articulation_only,
            pairs = pairs.len(),
            single_points = single_points.len(),
            "robustness analysis done"
        );
        Ok(RobustnessReport {
            pairs,
            single_points,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::reach::Reachability;
    use crate::scenario::random::RandomTopology;
    use crate::testing::{bowtie, chain, cycle, link_tuples};

    fn unordered(topology: &mut Topology, strategy: Strategy) -> Vec<(usize, usize)> {
        Robustness::new(strategy)
            .run(topology)
            .unwrap()
            .unordered_pairs()
            .into_iter()
            .map(|CriticalPair(a, b)| (a.index(), b.index()))
            .collect()
    }

    /// Pairs whose removal leaves at least two components, checked one by one.
    fn brute_force(topology: &mut Topology) -> Vec<CriticalPair> {
        let mut pairs = Vec::new();
        for i in (0..topology.node_count()).map(NodeId) {
            topology.remove(i).unwrap();
            for j in (0..topology.node_count()).map(NodeId) {
                if Reachability::components(&Excluding::new(topology, j)) > 1 {
                    let j = if j < i { j } else { NodeId(j.index() + 1) };
                    pairs.push(CriticalPair(i, j));
                }
            }
            topology.restore(i).unwrap();
        }
        pairs
    }

    #[test]
    fn test_chain_scenario() {
        let mut topology = chain();
        let report = Robustness::new(Strategy::InPlace).run(&mut topology).unwrap();

        assert!(report.pairs().contains(&CriticalPair(NodeId(1), NodeId(2))));
        assert!(report.pairs().contains(&CriticalPair(NodeId(2), NodeId(1))));
        assert_eq!(
            vec![
                CriticalPair(NodeId(0), NodeId(2)),
                CriticalPair(NodeId(1), NodeId(2)),
                CriticalPair(NodeId(1), NodeId(3)),
                CriticalPair(NodeId(2), NodeId(0)),
                CriticalPair(NodeId(2), NodeId(1)),
                CriticalPair(NodeId(3), NodeId(1)),
            ],
            report.pairs()
        );
        assert_eq!(vec![NodeId(1), NodeId(2)], report.single_points());
    }

    #[test]
    fn test_articulation_only_chain() {
        for strategy in [Strategy::InPlace, Strategy::Translated] {
            let mut topology = chain();
            let report = Robustness::new(strategy)
                .articulation_only(true)
                .run(&mut topology)
                .unwrap();

            // without 1 or 2 the rest is already split, so neither pairs up
            assert_eq!(
                vec![
                    CriticalPair(NodeId(0), NodeId(2)),
                    CriticalPair(NodeId(3), NodeId(1)),
                ],
                report.pairs()
            );
            assert_eq!(vec![NodeId(1), NodeId(2)], report.single_points());
            assert_eq!(
                vec![
                    CriticalPair(NodeId(0), NodeId(2)),
                    CriticalPair(NodeId(1), NodeId(3)),
                ],
                report.unordered_pairs()
            );
        }
    }

    #[test]
    fn test_articulation_only_is_a_subset() {
        for seed in 0..5 {
            let mut topology = RandomTopology::new(15).extra_links(5).build(seed).unwrap();
            let all = Robustness::new(Strategy::Translated).run(&mut topology).unwrap();
            let strict = Robustness::new(Strategy::Translated)
                .articulation_only(true)
                .run(&mut topology)
                .unwrap();
            assert!(strict.pairs().iter().all(|p| all.pairs().contains(p)), "seed {seed}");
        }
    }

    #[test]
    fn test_cycle_pairs_are_non_adjacent() {
        let mut topology = cycle(5);
        assert_eq!(
            vec![(0, 2), (0, 3), (1, 3), (1, 4), (2, 4)],
            unordered(&mut topology, Strategy::Translated)
        );
    }

    #[test]
    fn test_bowtie_pairs_all_contain_center() {
        let mut topology = bowtie();
        assert_eq!(
            vec![(0, 2), (1, 2), (2, 3), (2, 4)],
            unordered(&mut topology, Strategy::InPlace)
        );
    }

    #[test]
    fn test_tiny_topologies() {
        assert!(unordered(&mut Topology::new(0), Strategy::InPlace).is_empty());
        assert!(unordered(&mut Topology::new(1), Strategy::InPlace).is_empty());
        assert!(unordered(&mut cycle(3), Strategy::Translated).is_empty());
    }

    #[test]
    fn test_strategies_agree_with_brute_force() {
        for seed in 0..8 {
            let mut topology = RandomTopology::new(18).extra_links(8).build(seed).unwrap();
            let before = link_tuples(&topology);
            let expected = brute_force(&mut topology);

            for strategy in [Strategy::InPlace, Strategy::Translated] {
                let report = Robustness::new(strategy).run(&mut topology).unwrap();
                assert_eq!(expected, report.pairs(), "seed {seed}, {strategy:?}");
            }
            assert_eq!(before, link_tuples(&topology));
        }
    }

    #[test]
    fn test_refuses_pending_removal() {
        let mut topology = chain();
        topology.remove(NodeId(0)).unwrap();
        assert!(matches!(
            Robustness::new(Strategy::Translated).run(&mut topology),
            Err(TopologyError::RemovalPending { node: NodeId(0) })
        ));
    }
}
