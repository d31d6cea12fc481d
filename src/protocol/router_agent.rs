use log::{debug, trace};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use crate::RouterId;
use crate::error::{Error, Result};
use super::distance_vector::DistanceVector;
use super::messages::VectorUpdate;
use super::routing_table::RoutingTable;

/// Distance-vector state of a single router.
///
/// An agent never looks at another agent. Everything it learns arrives as a
/// [`VectorUpdate`] buffered by [`receive_vector`](Self::receive_vector) and folded in by
/// [`recompute`](Self::recompute).
#[derive(Debug, Clone)]
pub struct RouterAgent {
    name: RouterId,
    links: BTreeMap<RouterId, u32>,
    vector: DistanceVector,
    routing_table: RoutingTable,
    inbox: Vec<VectorUpdate>,
    // last vector each current neighbor advertised
    heard: BTreeMap<RouterId, Arc<DistanceVector>>,
}

impl RouterAgent {
    pub fn new(name: impl Into<RouterId>) -> Self {
        Self {
            name: name.into(),
            links: BTreeMap::new(),
            vector: DistanceVector::new(),
            routing_table: RoutingTable::new(),
            inbox: Vec::new(),
            heard: BTreeMap::new(),
        }
    }

    pub fn name(&self) -> &RouterId {
        &self.name
    }

    /// Replaces the neighbor-cost map and re-seeds the direct entries.
    ///
    /// Entries learned through a former neighbor stay in the vector until the next
    /// [`recompute`](Self::recompute).
    pub fn set_links(&mut self, links: BTreeMap<RouterId, u32>) {
        for former in self.links.keys().filter(|n| !links.contains_key(*n)) {
            debug!("{}: link to {} is gone", self.name, former);
        }
        for (neighbor, &cost) in &links {
            self.vector.set(neighbor, neighbor, cost);
        }
        self.links = links;
    }

    pub fn neighbors(&self) -> impl Iterator<Item = &RouterId> {
        self.links.keys()
    }

    pub fn is_neighbor(&self, router: &str) -> bool {
        self.links.contains_key(router)
    }

    pub fn link_cost(&self, neighbor: &str) -> Option<u32> {
        self.links.get(neighbor).copied()
    }

    pub fn distance_vector(&self) -> &DistanceVector {
        &self.vector
    }

    pub fn routing_table(&self) -> &RoutingTable {
        &self.routing_table
    }

    /// Number of buffered updates waiting for the next recompute.
    pub fn pending(&self) -> usize {
        self.inbox.len()
    }

    pub fn snapshot(&self) -> Arc<DistanceVector> {
        Arc::new(self.vector.clone())
    }

    pub fn send_vector_to(&self, neighbor: &str) -> Result<VectorUpdate> {
        if !self.is_neighbor(neighbor) {
            return Err(Error::NotNeighbor {
                router: self.name.clone(),
                peer: neighbor.to_string(),
            });
        }

        Ok(VectorUpdate {
            from: self.name.clone(),
            to: neighbor.to_string(),
            vector: self.snapshot(),
        })
    }

    /// One [`send_vector_to`](Self::send_vector_to) per current neighbor, ascending by name.
    pub fn advertise(&self) -> Result<Vec<VectorUpdate>> {
        self.neighbors().map(|neighbor| self.send_vector_to(neighbor)).collect()
    }

    pub fn receive_vector(&mut self, update: VectorUpdate) -> Result<()> {
        if update.to != self.name || !self.is_neighbor(&update.from) {
            return Err(Error::ProtocolViolation {
                receiver: self.name.clone(),
                sender: update.from,
            });
        }

        trace!("{}: buffered vector from {} ({} entries)", self.name, update.from, update.vector.len());
        self.inbox.push(update);
        Ok(())
    }

    /// Rebuilds the distance vector from the direct links and the neighbors' vectors,
    /// draining the inbox. Returns `true` if the vector changed.
    pub fn recompute(&mut self) -> bool {
        let mut next = DistanceVector::new();
        for (neighbor, &cost) in &self.links {
            next.set(neighbor, neighbor, cost);
        }

        let inbox = std::mem::take(&mut self.inbox);
        let mut fresh = BTreeSet::new();
        for update in &inbox {
            match self.link_cost(&update.from) {
                Some(link) => {
                    relax(&self.name, &mut next, &update.from, link, &update.vector);
                    fresh.insert(update.from.as_str());
                }
                None => debug!("{}: dropping vector from former neighbor {}", self.name, update.from),
            }
        }

        // neighbors that sent nothing this time still count with what they said last
        for (neighbor, vector) in &self.heard {
            if fresh.contains(neighbor.as_str()) {
                continue;
            }
            if let Some(link) = self.link_cost(neighbor) {
                relax(&self.name, &mut next, neighbor, link, vector);
            }
        }

        for update in inbox {
            if self.links.contains_key(&update.from) {
                self.heard.insert(update.from, update.vector);
            }
        }
        self.heard.retain(|neighbor, _| self.links.contains_key(neighbor));

        let changed = next != self.vector;
        if changed {
            debug!("{}: distance vector changed ({} entries)", self.name, next.len());
        }
        self.vector = next;
        changed
    }

    pub fn update_routing_table(&mut self) -> &RoutingTable {
        self.routing_table = RoutingTable::from_vector(&self.vector);
        &self.routing_table
    }
}

/// Bellman-Ford step for one neighbor's vector. Only entries with `sender` as next hop
/// are written.
///
/// A sum past `u32::MAX` is infinite and is not offered.
fn relax(own: &str, next: &mut DistanceVector, sender: &str, link: u32, vector: &DistanceVector) {
    for (destination, row) in vector.iter() {
        if destination == own {
            continue;
        }
        for &cost in row.values() {
            match link.checked_add(cost) {
                Some(total) => {
                    next.offer(destination, sender, total);
                }
                None => trace!("{}: {} via {} overflows, treated as unreachable", own, destination, sender),
            }
        }
    }
}
