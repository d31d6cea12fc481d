//! Synchronous simulation of the Distributed Bellman-Ford (distance-vector) routing
//! protocol.
//!
//! A [`network::Topology`] holds routers and weighted links. The
//! [`algorithms::ConvergenceEngine`] keeps one [`protocol::RouterAgent`] per router and
//! runs rounds of vector exchange and recomputation until nothing changes, reporting each
//! round to a [`algorithms::RoundObserver`] such as the text
//! [`presenter::TextPresenter`]. [`session`] wires this to the line-oriented input format.

pub mod algorithms;
pub mod config;
pub mod error;
pub mod network;
pub mod presenter;
pub mod protocol;
pub mod session;
pub mod types;

pub type RouterId = String;

pub use algorithms::{ConvergenceEngine, EngineState, RoundObserver, RunOutcome};
pub use config::{OutputFormat, SimulationConfig};
pub use error::{Error, Result};
pub use network::Topology;
pub use types::{Cost, LinkCost, LinkUpdate};
