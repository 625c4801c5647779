//! Text output of the analyses, shared by the batch commands and the TUI.

use crate::analysis::flow::{FlowMode, MaxFlow};
use crate::analysis::paths::{LatencyPaths, min_bandwidth};
use crate::analysis::reach::{Reachability, copper_connected};
use crate::analysis::robustness::{CriticalPair, Robustness, Strategy};
use crate::analysis::spanning::SpanningTree;
use crate::error::TopologyResult;
use crate::graph::medium::Medium;
use crate::graph::node::NodeId;
use crate::graph::topology::Topology;
use crate::graph::view::MediumOnly;

pub fn latency_path(topology: &Topology, from: NodeId, to: NodeId) -> TopologyResult<Vec<String>> {
    topology.check_node(to)?;
    let paths = LatencyPaths::compute(topology, from)?;

    let (Some(latency), Some(path)) = (paths.latency_to(to), paths.path_to(topology, to)) else {
        return Ok(vec![format!("No path from {} to {to}", paths.source())]);
    };
    if path.is_empty() {
        return Ok(vec![format!("{from} and {to} are the same node")]);
    }

    let mut lines = vec!["Path:".to_owned()];
    lines.extend(
        path.iter()
            .map(|l| format!("Edge from {} to {}", l.from(), l.to())),
    );
    if let Some(min) = min_bandwidth(&path) {
        lines.push(format!("Minimum of maximum bandwidths along path = {min} bit/s"));
    }
    lines.push(format!("Total latency = {latency:.3e} s"));
    Ok(lines)
}

pub fn copper(topology: &Topology) -> Vec<String> {
    if copper_connected(topology) {
        return vec!["Connected through copper only connections".to_owned()];
    }

    let reach = Reachability::bfs(&MediumOnly::new(topology, Medium::Copper), NodeId(0));
    let unreached: Vec<String> = (0..topology.node_count())
        .map(NodeId)
        .filter(|&v| !reach.is_visited(v))
        .map(|v| v.to_string())
        .collect();
    vec![
        "Not connected through copper only".to_owned(),
        format!(
            "{} of {} nodes reachable from 0, missing: {}",
            reach.reached(),
            topology.node_count(),
            unreached.join(" ")
        ),
    ]
}

/// Runs a max-flow query on clean flow counters and clears them again.
pub fn max_bandwidth(
    topology: &mut Topology,
    from: NodeId,
    to: NodeId,
    mode: FlowMode,
) -> TopologyResult<Vec<String>> {
    topology.reset_flows();
    let result = MaxFlow::compute(topology, from, to, mode);
    let lines = result.map(|flow| {
        let cut: Vec<String> = (0..topology.node_count())
            .map(NodeId)
            .filter(|&v| flow.in_cut(v).unwrap_or(false))
            .map(|v| v.to_string())
            .collect();
        let saturated: Vec<String> = flow
            .cut_links(topology)
            .iter()
            .map(|l| format!("{}-{}", l.from(), l.to()))
            .collect();
        vec![
            format!("Maximum Bandwidth {} bit/s", flow.value()),
            format!("Min cut: {}", cut.join(" ")),
            format!(
                "Links separating {} from {}: {}",
                flow.source(),
                flow.sink(),
                saturated.join(" ")
            ),
        ]
    });
    topology.reset_flows();
    lines
}

pub fn spanning_tree(topology: &Topology) -> Vec<String> {
    let tree = SpanningTree::compute(topology);
    let mut lines: Vec<String> = tree
        .node_sequence(topology)
        .into_iter()
        .map(|v| v.to_string())
        .collect();
    if lines.is_empty() {
        return vec!["Topology has no nodes".to_owned()];
    }
    lines.push(format!("Total latency = {:.3e} s", tree.total_latency()));
    if let Some(average) = tree.average_latency() {
        lines.push(format!("Average latency = {average:.3e} s"));
    }
    if !tree.spans(topology) {
        lines.push("Some nodes cannot be reached from 0".to_owned());
    }
    lines
}

pub fn critical_pairs(
    topology: &mut Topology,
    strategy: Strategy,
    strict: bool,
) -> TopologyResult<Vec<String>> {
    let report = Robustness::new(strategy)
        .articulation_only(strict)
        .run(topology)?;

    let mut lines =
        vec!["Pairs of vertices that could be eliminated to cause the network to fail:".to_owned()];
    if strict {
        lines.push("(articulation points of the network without the first vertex only)".to_owned());
    }
    if report.pairs().is_empty() {
        lines.push("none".to_owned());
    }
    lines.extend(
        report
            .pairs()
            .iter()
            .map(|CriticalPair(i, j)| format!("vertices {i} {j}")),
    );
    lines.push(format!("{} distinct pairs", report.unordered_pairs().len()));

    let singles: Vec<String> = report.single_points().iter().map(|v| v.to_string()).collect();
    lines.push(if singles.is_empty() {
        "No single point of failure".to_owned()
    } else {
        format!("Single points of failure: {}", singles.join(" "))
    });
    Ok(lines)
}
