use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::RouterId;
use super::distance_vector::DistanceVector;

/// One distance-vector advertisement from `from` to its neighbor `to`.
///
/// The vector is a frozen snapshot of the sender's state when the message was built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorUpdate {
    pub from: RouterId,
    pub to: RouterId,
    pub vector: Arc<DistanceVector>,
}
