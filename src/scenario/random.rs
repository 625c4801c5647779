use crate::error::TopologyResult;
use crate::graph::medium::Medium;
use crate::graph::node::NodeId;
use crate::graph::topology::Topology;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng, rngs::StdRng};
use tracing::debug;

const BANDWIDTHS: [u64; 7] = [1, 2, 5, 10, 20, 50, 100];

/// Seeded generator of connected random topologies: a random spanning tree
/// grown from node 0, plus extra links between random node pairs.
#[derive(Clone, Debug)]
pub struct RandomTopology {
    nodes: usize,
    extra_links: usize,
    /// probability in [0.0, 1.0] that a link is copper
    copper_share: f64,
    max_length: u64,
}

impl RandomTopology {
    pub fn new(nodes: usize) -> Self {
        Self {
            nodes,
            extra_links: nodes,
            copper_share: 0.5,
            max_length: 5_000,
        }
    }

    pub fn extra_links(mut self, extra_links: usize) -> Self {
        self.extra_links = extra_links;
        self
    }

    pub fn copper_share(mut self, copper_share: f64) -> Self {
        self.copper_share = copper_share.clamp(0.0, 1.0);
        self
    }

    pub fn max_length(mut self, max_length: u64) -> Self {
        self.max_length = max_length.max(1);
        self
    }

    pub fn build(&self, seed: u64) -> TopologyResult<Topology> {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut topology = Topology::new(self.nodes);
        if self.nodes == 0 {
            return Ok(topology);
        }

        let mut unreached: Vec<usize> = (1..self.nodes).collect();
        unreached.shuffle(&mut rng);
        let mut frontier = vec![0];
        for to in unreached {
            let from = frontier[rng.gen_range(0..frontier.len())];
            self.add_link(&mut topology, &mut rng, from, to)?;
            frontier.push(to);
        }

        for _ in 0..self.extra_links {
            let from = rng.gen_range(0..self.nodes);
            let to = rng.gen_range(0..self.nodes);
            if from != to {
                self.add_link(&mut topology, &mut rng, from, to)?;
            }
        }

        debug!(
            seed,
            nodes = topology.node_count(),
            links = topology.link_count(),
            "generated random topology"
        );
        Ok(topology)
    }

    fn add_link(
        &self,
        topology: &mut Topology,
        rng: &mut StdRng,
        from: usize,
        to: usize,
    ) -> TopologyResult<()> {
        let medium = if rng.gen_bool(self.copper_share) {
            Medium::Copper
        } else {
            Medium::Optical
        };
        let bandwidth = BANDWIDTHS[rng.gen_range(0..BANDWIDTHS.len())];
        let length = rng.gen_range(1..=self.max_length);
        topology.connect(NodeId(from), NodeId(to), medium, bandwidth, length)
    }
}
