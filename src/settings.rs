use crate::analysis::flow::FlowMode;
use crate::analysis::robustness::Strategy;

/// Analysis options chosen on the command line.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Settings {
    pub flow_mode: FlowMode,
    pub strategy: Strategy,
    /// critical pairs from articulation points of G - i only
    pub strict: bool,
}
