use std::collections::BTreeMap;
use serde::{Deserialize, Serialize};

use crate::RouterId;
use crate::types::Cost;

/// Destination -> next hop -> best known cost. Missing entries are infinite.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistanceVector {
    rows: BTreeMap<RouterId, BTreeMap<RouterId, u32>>,
}

impl DistanceVector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, destination: &str, next_hop: &str) -> Cost {
        self.rows
            .get(destination)
            .and_then(|row| row.get(next_hop))
            .copied()
            .into()
    }

    pub fn set(&mut self, destination: &str, next_hop: &str, cost: u32) {
        self.rows
            .entry(destination.to_string())
            .or_default()
            .insert(next_hop.to_string(), cost);
    }

    /// Keeps the smaller of the current entry and `cost`. Returns `true` if the entry was
    /// written.
    pub fn offer(&mut self, destination: &str, next_hop: &str, cost: u32) -> bool {
        let row = self.rows.entry(destination.to_string()).or_default();
        match row.get_mut(next_hop) {
            Some(existing) if *existing <= cost => false,
            Some(existing) => {
                *existing = cost;
                true
            }
            None => {
                row.insert(next_hop.to_string(), cost);
                true
            }
        }
    }

    pub fn row(&self, destination: &str) -> Option<&BTreeMap<RouterId, u32>> {
        self.rows.get(destination)
    }

    /// Cheapest entry for `destination`; equal costs resolve to the smallest next-hop name.
    pub fn best(&self, destination: &str) -> Option<(&RouterId, u32)> {
        let row = self.rows.get(destination)?;
        // strict `<` over ascending keys keeps the first (smallest) name on ties
        let mut best: Option<(&RouterId, u32)> = None;
        for (next_hop, &cost) in row {
            match best {
                Some((_, c)) if c <= cost => {}
                _ => best = Some((next_hop, cost)),
            }
        }
        best
    }

    pub fn destinations(&self) -> impl Iterator<Item = &RouterId> {
        self.rows.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&RouterId, &BTreeMap<RouterId, u32>)> {
        self.rows.iter()
    }

    /// Number of finite entries.
    pub fn len(&self) -> usize {
        self.rows.values().map(|row| row.len()).sum()
    }
}
