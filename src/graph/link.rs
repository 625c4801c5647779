use crate::error::{TopologyError, TopologyResult};
use crate::graph::medium::Medium;
use crate::graph::node::NodeId;

/// One direction of a physical link. Every physical link is stored as two
/// anti-parallel `Link`s, one in the adjacency list of each endpoint.
#[derive(Clone, Debug)]
pub struct Link {
    from: NodeId,
    to: NodeId,
    medium: Medium,
    bandwidth: u64,
    length: u64,
    /// latency, length / propagation speed
    weight: f64,
    /// flow in [0, bandwidth]
    flow: u64,
    /// slot of the anti-parallel link in the adjacency list of `to`
    twin: usize,
}

impl Link {
    pub fn new(from: NodeId, to: NodeId, medium: Medium, bandwidth: u64, length: u64) -> Self {
        let weight = length as f64 / medium.propagation_speed() as f64;
        Self {
            from,
            to,
            medium,
            bandwidth,
            length,
            weight,
            flow: 0,
            twin: 0,
        }
    }

    pub fn from(&self) -> NodeId {
        self.from
    }

    pub fn to(&self) -> NodeId {
        self.to
    }

    pub fn medium(&self) -> Medium {
        self.medium
    }

    pub fn bandwidth(&self) -> u64 {
        self.bandwidth
    }

    pub fn length(&self) -> u64 {
        self.length
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    pub fn flow(&self) -> u64 {
        self.flow
    }

    pub fn twin(&self) -> usize {
        self.twin
    }

    /// True while the remote endpoint of this link is removed.
    pub fn is_detached(&self) -> bool {
        self.to.is_detached()
    }

    /// Residual capacity toward `endpoint`: the current flow when walking
    /// the link backwards, the unused bandwidth when walking it forwards.
    pub fn residual_capacity_to(&self, endpoint: NodeId) -> TopologyResult<u64> {
        if endpoint == self.from {
            Ok(self.flow)
        } else if endpoint == self.to {
            Ok(self.bandwidth - self.flow)
        } else {
            Err(self.invalid_endpoint(endpoint))
        }
    }

    /// Moves `delta` units of flow toward `endpoint`. The link is left
    /// untouched when the result would leave `[0, bandwidth]`.
    pub fn push_flow(&mut self, endpoint: NodeId, delta: u64) -> TopologyResult<()> {
        let flow = if endpoint == self.from {
            self.flow as i128 - delta as i128
        } else if endpoint == self.to {
            self.flow as i128 + delta as i128
        } else {
            return Err(self.invalid_endpoint(endpoint));
        };

        if flow < 0 || flow > self.bandwidth as i128 {
            return Err(TopologyError::CapacityViolation {
                from: self.from,
                to: self.to,
                flow,
                bandwidth: self.bandwidth,
            });
        }
        self.flow = flow as u64;
        Ok(())
    }

    pub(crate) fn set_from(&mut self, from: NodeId) {
        self.from = from;
    }

    pub(crate) fn set_to(&mut self, to: NodeId) {
        self.to = to;
    }

    pub(crate) fn set_twin(&mut self, twin: usize) {
        self.twin = twin;
    }

    pub(crate) fn reset_flow(&mut self) {
        self.flow = 0;
    }

    fn invalid_endpoint(&self, node: NodeId) -> TopologyError {
        TopologyError::InvalidEndpoint {
            node,
            from: self.from,
            to: self.to,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_latency_weight() {
        let copper = Link::new(NodeId(0), NodeId(1), Medium::Copper, 10, 230);
        let optical = Link::new(NodeId(0), NodeId(1), Medium::Optical, 10, 230);

        assert_relative_eq!(1e-6, copper.weight());
        assert_relative_eq!(230.0 / 200_000_000.0, optical.weight());
        assert!(optical.weight() > copper.weight());
    }

    #[test]
    fn test_residual_capacity() {
        let mut link = Link::new(NodeId(2), NodeId(5), Medium::Copper, 10, 100);
        link.push_flow(NodeId(5), 4).unwrap();

        assert_eq!(6, link.residual_capacity_to(NodeId(5)).unwrap());
        assert_eq!(4, link.residual_capacity_to(NodeId(2)).unwrap());
        assert!(matches!(
            link.residual_capacity_to(NodeId(3)),
            Err(TopologyError::InvalidEndpoint { .. })
        ));
    }

    #[test]
    fn test_push_flow_both_directions() {
        let mut link = Link::new(NodeId(0), NodeId(1), Medium::Optical, 8, 200);
        link.push_flow(NodeId(1), 8).unwrap();
        assert_eq!(8, link.flow());

        link.push_flow(NodeId(0), 3).unwrap();
        assert_eq!(5, link.flow());
    }

    #[test]
    fn test_capacity_violation_leaves_flow_untouched() {
        let mut link = Link::new(NodeId(0), NodeId(1), Medium::Copper, 5, 10);
        link.push_flow(NodeId(1), 2).unwrap();

        assert!(matches!(
            link.push_flow(NodeId(1), 4),
            Err(TopologyError::CapacityViolation { flow: 6, .. })
        ));
        assert!(matches!(
            link.push_flow(NodeId(0), 3),
            Err(TopologyError::CapacityViolation { flow: -1, .. })
        ));
        assert_eq!(2, link.flow());
    }

    #[test]
    fn test_push_flow_invalid_endpoint() {
        let mut link = Link::new(NodeId(0), NodeId(1), Medium::Copper, 5, 10);
        assert!(matches!(
            link.push_flow(NodeId(7), 1),
            Err(TopologyError::InvalidEndpoint { .. })
        ));
    }
}
