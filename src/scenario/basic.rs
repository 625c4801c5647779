use crate::error::TopologyResult;
use crate::graph::topology::Topology;

/// A small campus network: two optical cores (0, 1), three copper
/// distribution switches (2, 3, 4) and three access switches (5, 6, 7), one of
/// which hangs off a long optical uplink.
const CAMPUS: &str = "\
8
# core
0 1 optical 100 150
0 2 copper 40 90
1 2 copper 40 120
1 3 optical 100 400
# distribution
3 4 copper 20 60
2 4 copper 10 300
# access
4 5 copper 10 50
3 6 optical 25 800
6 7 copper 5 40
";

pub struct BasicScenario;

impl BasicScenario {
    pub fn build() -> TopologyResult<Topology> {
        CAMPUS.parse()
    }
}
