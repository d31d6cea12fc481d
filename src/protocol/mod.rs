pub mod distance_vector;
pub mod messages;
pub mod router_agent;
pub mod routing_table;

pub use distance_vector::*;
pub use messages::*;
pub use router_agent::*;
pub use routing_table::*;
