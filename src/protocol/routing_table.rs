use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::RouterId;
use super::distance_vector::DistanceVector;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutingTable {
    entries: BTreeMap<RouterId, RoutingEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutingEntry {
    pub destination: RouterId,
    pub next_hop: RouterId,
    pub cost: u32,
}

impl RoutingTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Picks the cheapest next hop per destination; ties go to the smaller name.
    /// Destinations without a finite entry get no route.
    pub fn from_vector(vector: &DistanceVector) -> Self {
        let entries = vector
            .destinations()
            .filter_map(|destination| {
                vector.best(destination).map(|(next_hop, cost)| {
                    let entry = RoutingEntry {
                        destination: destination.clone(),
                        next_hop: next_hop.clone(),
                        cost,
                    };
                    (destination.clone(), entry)
                })
            })
            .collect();

        Self { entries }
    }

    pub fn get_route(&self, destination: &str) -> Option<&RoutingEntry> {
        self.entries.get(destination)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&RouterId, &RoutingEntry)> {
        self.entries.iter()
    }
}
