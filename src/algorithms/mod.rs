pub mod convergence;
pub mod dijkstra;

pub use convergence::*;
