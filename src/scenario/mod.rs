pub mod basic;
pub mod random;
