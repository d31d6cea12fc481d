//! Text and JSON rendering of distance and routing tables.
//!
//! The text layout is consumed by external graders and must stay byte-exact:
//!
//! ```text
//! Distance Table of router A at t=0:
//!      B       C
//! B    1    INF
//! C    INF  1
//!
//! Routing Table of router A:
//! B,B,1
//! C,C,1
//!
//! ```
//!
//! (every cell, including the last one of a row, is padded to four characters and
//! followed by a space)

use serde::Serialize;
use std::collections::BTreeMap;
use std::io::{self, Write};

use crate::RouterId;
use crate::algorithms::{RoundObserver, RunOutcome};
use crate::error::Result;
use crate::protocol::{DistanceVector, RouterAgent};

const CELL_WIDTH: usize = 4;

pub fn write_distance_table<W: Write>(
    out: &mut W,
    agent: &RouterAgent,
    routers: &[&RouterId],
    round: usize,
) -> io::Result<()> {
    let own = agent.name();
    let others: Vec<&RouterId> = routers.iter().copied().filter(|r| *r != own).collect();

    writeln!(out, "Distance Table of router {} at t={}:", own, round)?;
    if others.is_empty() {
        return writeln!(out);
    }

    let header: Vec<String> = others
        .iter()
        .map(|dest| format!("{:<width$}", dest, width = CELL_WIDTH))
        .collect();
    writeln!(out, "     {}", header.join("    "))?;

    let vector = agent.distance_vector();
    for via in &others {
        let mut line = format!("{:<width$} ", via, width = CELL_WIDTH);
        for dest in &others {
            let cost = vector.get(dest, via);
            line.push_str(&format!("{:<width$} ", cost, width = CELL_WIDTH));
        }
        writeln!(out, "{}", line)?;
    }
    writeln!(out)
}

pub fn write_routing_table<W: Write>(out: &mut W, agent: &RouterAgent, routers: &[&RouterId]) -> io::Result<()> {
    let own = agent.name();
    writeln!(out, "Routing Table of router {}:", own)?;
    for dest in routers.iter().filter(|r| **r != own) {
        match agent.routing_table().get_route(dest) {
            Some(entry) => writeln!(out, "{},{},{}", dest, entry.next_hop, entry.cost)?,
            None => writeln!(out, "{},INF,INF", dest)?,
        }
    }
    writeln!(out)
}

/// Prints every round's distance tables and the final routing tables.
pub struct TextPresenter<W: Write> {
    out: W,
}

impl<W: Write> TextPresenter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> RoundObserver for TextPresenter<W> {
    fn on_round(&mut self, round: usize, agents: &BTreeMap<RouterId, RouterAgent>) -> Result<()> {
        let routers: Vec<&RouterId> = agents.keys().collect();
        for agent in agents.values() {
            write_distance_table(&mut self.out, agent, &routers, round)?;
        }
        Ok(())
    }

    fn on_finish(&mut self, _outcome: RunOutcome, agents: &BTreeMap<RouterId, RouterAgent>) -> Result<()> {
        let routers: Vec<&RouterId> = agents.keys().collect();
        for agent in agents.values() {
            write_routing_table(&mut self.out, agent, &routers)?;
        }
        self.out.flush()?;
        Ok(())
    }
}

#[derive(Serialize)]
struct RouteLine<'a> {
    destination: &'a str,
    next_hop: Option<&'a str>,
    cost: Option<u32>,
}

#[derive(Serialize)]
struct RunReport<'a> {
    outcome: RunOutcome,
    rounds: usize,
    routing_tables: BTreeMap<&'a str, Vec<RouteLine<'a>>>,
    distance_vectors: BTreeMap<&'a str, &'a DistanceVector>,
}

/// Writes one JSON line per run with the outcome and the final tables.
pub struct JsonPresenter<W: Write> {
    out: W,
}

impl<W: Write> JsonPresenter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> RoundObserver for JsonPresenter<W> {
    fn on_round(&mut self, _round: usize, _agents: &BTreeMap<RouterId, RouterAgent>) -> Result<()> {
        Ok(())
    }

    fn on_finish(&mut self, outcome: RunOutcome, agents: &BTreeMap<RouterId, RouterAgent>) -> Result<()> {
        let mut routing_tables = BTreeMap::new();
        let mut distance_vectors = BTreeMap::new();

        for (router, agent) in agents {
            let lines: Vec<RouteLine> = agents
                .keys()
                .filter(|dest| *dest != router)
                .map(|dest| {
                    let route = agent.routing_table().get_route(dest);
                    RouteLine {
                        destination: dest.as_str(),
                        next_hop: route.map(|r| r.next_hop.as_str()),
                        cost: route.map(|r| r.cost),
                    }
                })
                .collect();
            routing_tables.insert(router.as_str(), lines);
            distance_vectors.insert(router.as_str(), agent.distance_vector());
        }

        let report = RunReport {
            outcome,
            rounds: outcome.rounds(),
            routing_tables,
            distance_vectors,
        };
        serde_json::to_writer(&mut self.out, &report)?;
        writeln!(self.out)?;
        self.out.flush()?;
        Ok(())
    }
}
