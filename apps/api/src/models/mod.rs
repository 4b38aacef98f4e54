pub mod comparison;
pub mod generation;
