use std::collections::{BTreeMap, BTreeSet};
use log::debug;

use crate::RouterId;
use crate::error::{Error, Result};
use crate::types::{Cost, LinkCost};

/// Routers and the undirected weighted links between them.
///
/// Links are stored once under a normalized `(low, high)` key, so a cost is always
/// symmetric.
#[derive(Debug, Clone, Default)]
pub struct Topology {
    routers: BTreeSet<RouterId>,
    links: BTreeMap<(RouterId, RouterId), u32>,
}

fn link_key(a: &str, b: &str) -> (RouterId, RouterId) {
    if a <= b {
        (a.to_string(), b.to_string())
    } else {
        (b.to_string(), a.to_string())
    }
}

impl Topology {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if the router was not known before.
    pub fn add_router(&mut self, name: impl Into<RouterId>) -> bool {
        self.routers.insert(name.into())
    }

    pub fn contains_router(&self, name: &str) -> bool {
        self.routers.contains(name)
    }

    /// Inserts, overwrites or removes the `a <-> b` link and returns the previous cost.
    ///
    /// Setting a cost creates unseen routers. Removing an absent link is a no-op and
    /// creates nothing.
    pub fn upsert_link(&mut self, a: &str, b: &str, cost: LinkCost) -> Result<Option<u32>> {
        if a == b {
            return Err(Error::SelfLoop(a.to_string()));
        }

        let key = link_key(a, b);
        let previous = match cost {
            LinkCost::Remove => {
                let previous = self.links.remove(&key);
                if previous.is_some() {
                    debug!("Removed link {} <-> {}", a, b);
                }
                previous
            }
            LinkCost::Set(c) => {
                self.add_router(a);
                self.add_router(b);
                let previous = self.links.insert(key, c);
                debug!("Link {} <-> {} cost {:?} -> {}", a, b, previous, c);
                previous
            }
        };

        Ok(previous)
    }

    /// Current neighbors of `router` with their link costs, ascending by name.
    pub fn neighbors_of(&self, router: &str) -> BTreeMap<RouterId, u32> {
        self.links
            .iter()
            .filter_map(|((low, high), &cost)| {
                if low == router {
                    Some((high.clone(), cost))
                } else if high == router {
                    Some((low.clone(), cost))
                } else {
                    None
                }
            })
            .collect()
    }

    pub fn link_cost(&self, a: &str, b: &str) -> Cost {
        self.links.get(&link_key(a, b)).copied().into()
    }

    /// All routers, ascending by name.
    pub fn routers(&self) -> impl Iterator<Item = &RouterId> {
        self.routers.iter()
    }

    pub fn router_count(&self) -> usize {
        self.routers.len()
    }

    pub fn link_count(&self) -> usize {
        self.links.len()
    }
}
