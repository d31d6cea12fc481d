use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

use crate::error::{Error, Result};

/// Path cost. `Infinite` marks an unknown or unreachable route and orders after every
/// finite cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cost {
    Finite(u32),
    Infinite,
}

impl From<Option<u32>> for Cost {
    fn from(value: Option<u32>) -> Self {
        value.map_or(Cost::Infinite, Cost::Finite)
    }
}

impl Ord for Cost {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Cost::Finite(a), Cost::Finite(b)) => a.cmp(b),
            (Cost::Finite(_), Cost::Infinite) => Ordering::Less,
            (Cost::Infinite, Cost::Finite(_)) => Ordering::Greater,
            (Cost::Infinite, Cost::Infinite) => Ordering::Equal,
        }
    }
}

impl PartialOrd for Cost {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Cost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cost::Finite(c) => fmt::Display::fmt(c, f),
            Cost::Infinite => fmt::Display::fmt("INF", f),
        }
    }
}

/// Requested state of a link: a new weight, or removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LinkCost {
    Set(u32),
    Remove,
}

impl LinkCost {
    /// Wire sentinel for removal in the command stream.
    pub const REMOVE_SENTINEL: i64 = -1;

    pub fn from_wire(raw: i64) -> Result<Self> {
        match raw {
            Self::REMOVE_SENTINEL => Ok(LinkCost::Remove),
            c if c >= 0 => u32::try_from(c)
                .map(LinkCost::Set)
                .map_err(|_| Error::InvalidCost(raw)),
            _ => Err(Error::InvalidCost(raw)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkUpdate {
    pub a: String,
    pub b: String,
    pub cost: LinkCost,
}
