use crate::graph::node::NodeId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TopologyError {
    #[error("node {node} is not an endpoint of link {from} -> {to}")]
    InvalidEndpoint {
        node: NodeId,
        from: NodeId,
        to: NodeId,
    },

    #[error("flow {flow} on link {from} -> {to} is outside [0, {bandwidth}]")]
    CapacityViolation {
        from: NodeId,
        to: NodeId,
        flow: i128,
        bandwidth: u64,
    },

    #[error("infeasible flow: {0}")]
    InfeasibleFlow(String),

    #[error("vertex {vertex} is not between 0 and {count} (exclusive)")]
    VertexOutOfRange { vertex: usize, count: usize },

    #[error("malformed topology at line {line}: {reason}")]
    MalformedInput { line: usize, reason: String },

    #[error("source and sink are both node {0}")]
    SourceIsSink(NodeId),

    #[error("node {node} is already removed; restore it first")]
    RemovalPending { node: NodeId },

    #[error("cannot restore node {requested}: pending removal is {pending:?}")]
    RestoreMismatch {
        requested: NodeId,
        pending: Option<NodeId>,
    },

    #[error("max flow {flow} does not match min cut capacity {cut}")]
    InconsistentCut { flow: u64, cut: u64 },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type TopologyResult<T> = Result<T, TopologyError>;
