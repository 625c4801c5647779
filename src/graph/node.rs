use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub usize);

impl NodeId {
    /// Remote endpoint of a link whose node is currently removed.
    pub const DETACHED: NodeId = NodeId(usize::MAX);

    pub fn index(self) -> usize {
        self.0
    }

    pub fn is_detached(self) -> bool {
        self == Self::DETACHED
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_detached() {
            write!(f, "-")
        } else {
            write!(f, "{}", self.0)
        }
    }
}
