pub mod link;
pub mod medium;
pub mod node;
pub mod parse;
pub mod topology;
pub mod view;
