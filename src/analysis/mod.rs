pub mod articulation;
pub mod flow;
pub mod paths;
pub mod reach;
pub mod robustness;
pub mod spanning;
