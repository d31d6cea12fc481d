use std::collections::{BTreeMap, BinaryHeap};
use std::cmp::Ordering;

use crate::RouterId;
use crate::network::Topology;

#[derive(Debug, PartialEq, Eq)]
struct State {
    cost: u32,
    router: RouterId,
}

impl Ord for State {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering for min-heap
        other
            .cost
            .cmp(&self.cost)
            .then_with(|| other.router.cmp(&self.router))
    }
}

impl PartialOrd for State {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Shortest-path cost from `source` to every reachable router, `source` excluded.
pub fn shortest_costs(topology: &Topology, source: &str) -> BTreeMap<RouterId, u32> {
    let mut distances: BTreeMap<RouterId, u32> = BTreeMap::new();
    let mut heap = BinaryHeap::new();

    distances.insert(source.to_string(), 0);
    heap.push(State {
        cost: 0,
        router: source.to_string(),
    });

    while let Some(State { cost, router }) = heap.pop() {
        // Skip if we've already found a better path
        if cost > *distances.get(&router).unwrap_or(&u32::MAX) {
            continue;
        }

        for (neighbor, link_cost) in topology.neighbors_of(&router) {
            let Some(new_cost) = cost.checked_add(link_cost) else {
                continue;
            };
            if new_cost < *distances.get(&neighbor).unwrap_or(&u32::MAX) {
                distances.insert(neighbor.clone(), new_cost);
                heap.push(State {
                    cost: new_cost,
                    router: neighbor,
                });
            }
        }
    }

    distances.remove(source);
    distances
}
