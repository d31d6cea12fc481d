use log::{debug, info, warn};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::RouterId;
use crate::config::SimulationConfig;
use crate::error::{Error, Result};
use crate::network::Topology;
use crate::protocol::{RouterAgent, RoutingTable};
use crate::types::Cost;
use super::dijkstra::shortest_costs;

pub const DEFAULT_MAX_ROUNDS: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RunOutcome {
    Converged { rounds: usize },
    NonConvergent { rounds: usize },
}

impl RunOutcome {
    pub fn rounds(&self) -> usize {
        match self {
            RunOutcome::Converged { rounds } | RunOutcome::NonConvergent { rounds } => *rounds,
        }
    }

    pub fn is_converged(&self) -> bool {
        matches!(self, RunOutcome::Converged { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    Idle,
    Running,
    Converged,
    NonConvergent,
}

/// Receives the engine's state as a run progresses.
pub trait RoundObserver {
    /// Called with the entry state (`round == 0`) and after every round that changed
    /// something.
    fn on_round(&mut self, round: usize, agents: &BTreeMap<RouterId, RouterAgent>) -> Result<()>;

    /// Called once per run after the routing tables were derived.
    fn on_finish(&mut self, outcome: RunOutcome, agents: &BTreeMap<RouterId, RouterAgent>) -> Result<()>;
}

impl RoundObserver for () {
    fn on_round(&mut self, _round: usize, _agents: &BTreeMap<RouterId, RouterAgent>) -> Result<()> {
        Ok(())
    }

    fn on_finish(&mut self, _outcome: RunOutcome, _agents: &BTreeMap<RouterId, RouterAgent>) -> Result<()> {
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteMismatch {
    pub router: RouterId,
    pub destination: RouterId,
    pub expected: Cost,
    pub actual: Cost,
}

/// Drives synchronous distance-vector rounds over one agent per router.
///
/// Agents persist across runs, so a run after a topology change starts from the state
/// the previous run ended in.
#[derive(Debug, Clone)]
pub struct ConvergenceEngine {
    agents: BTreeMap<RouterId, RouterAgent>,
    max_rounds: usize,
    parallel: bool,
    round: usize,
    state: EngineState,
}

impl Default for ConvergenceEngine {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ROUNDS)
    }
}

impl ConvergenceEngine {
    /// `max_rounds` below 1 is raised to 1.
    pub fn new(max_rounds: usize) -> Self {
        Self {
            agents: BTreeMap::new(),
            max_rounds: max_rounds.max(1),
            parallel: false,
            round: 0,
            state: EngineState::Idle,
        }
    }

    pub fn from_config(config: &SimulationConfig) -> Self {
        Self::new(config.max_rounds).with_parallel(config.parallel)
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn round(&self) -> usize {
        self.round
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn max_rounds(&self) -> usize {
        self.max_rounds
    }

    pub fn agents(&self) -> &BTreeMap<RouterId, RouterAgent> {
        &self.agents
    }

    pub fn agent(&self, router: &str) -> Option<&RouterAgent> {
        self.agents.get(router)
    }

    pub fn routing_table(&self, router: &str) -> Option<&RoutingTable> {
        self.agents.get(router).map(|agent| agent.routing_table())
    }

    /// Creates agents for new routers and hands every agent its current links.
    pub fn sync(&mut self, topology: &Topology) {
        for router in topology.routers() {
            let agent = self
                .agents
                .entry(router.clone())
                .or_insert_with(|| RouterAgent::new(router.clone()));
            agent.set_links(topology.neighbors_of(router));
        }
    }

    /// Runs rounds until nothing changes or the round cap is hit.
    ///
    /// A protocol violation aborts the run with an error. Hitting the cap does not.
    pub fn run<O: RoundObserver + ?Sized>(&mut self, topology: &Topology, observer: &mut O) -> Result<RunOutcome> {
        self.sync(topology);
        self.round = 0;
        self.state = EngineState::Running;
        info!(
            "Starting run over {} routers and {} links",
            topology.router_count(),
            topology.link_count()
        );

        observer.on_round(self.round, &self.agents)?;

        let outcome = loop {
            if !self.run_round()? {
                self.state = EngineState::Converged;
                info!("Converged after {} rounds", self.round);
                break RunOutcome::Converged { rounds: self.round };
            }

            self.round += 1;
            observer.on_round(self.round, &self.agents)?;

            if self.round >= self.max_rounds {
                self.state = EngineState::NonConvergent;
                warn!("No convergence after {} rounds, stopping", self.round);
                break RunOutcome::NonConvergent { rounds: self.round };
            }
        };

        for agent in self.agents.values_mut() {
            agent.update_routing_table();
        }
        observer.on_finish(outcome, &self.agents)?;

        Ok(outcome)
    }

    /// One exchange plus recompute across all agents. Returns `true` if any vector
    /// changed. Does not touch the round counter.
    pub fn run_round(&mut self) -> Result<bool> {
        self.exchange()?;
        Ok(self.recompute_all())
    }

    fn exchange(&mut self) -> Result<()> {
        // every message is built before any is delivered
        let mut outgoing = Vec::new();
        for agent in self.agents.values() {
            outgoing.extend(agent.advertise()?);
        }
        debug!("Round {}: delivering {} vectors", self.round + 1, outgoing.len());

        for update in outgoing {
            let receiver = self
                .agents
                .get_mut(&update.to)
                .ok_or_else(|| Error::UnknownRouter(update.to.clone()))?;
            receiver.receive_vector(update)?;
        }
        Ok(())
    }

    fn recompute_all(&mut self) -> bool {
        if self.parallel {
            self.agents
                .par_iter_mut()
                .map(|(_, agent)| agent.recompute())
                .reduce(|| false, |a, b| a || b)
        } else {
            self.agents.values_mut().fold(false, |any, agent| {
                let changed = agent.recompute();
                any || changed
            })
        }
    }

    /// Compares every routing table with the true shortest-path costs.
    pub fn verify(&self, topology: &Topology) -> Vec<RouteMismatch> {
        let mut mismatches = Vec::new();
        for (router, agent) in &self.agents {
            let expected = shortest_costs(topology, router);
            for destination in topology.routers().filter(|d| *d != router) {
                let expected_cost: Cost = expected.get(destination).copied().into();
                let actual_cost: Cost = agent
                    .routing_table()
                    .get_route(destination)
                    .map(|entry| entry.cost)
                    .into();
                if expected_cost != actual_cost {
                    mismatches.push(RouteMismatch {
                        router: router.clone(),
                        destination: destination.clone(),
                        expected: expected_cost,
                        actual: actual_cost,
                    });
                }
            }
        }
        mismatches
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::LinkCost;

    struct Recorder {
        rounds: Vec<usize>,
        finished: Option<RunOutcome>,
    }

    impl RoundObserver for Recorder {
        fn on_round(&mut self, round: usize, _agents: &BTreeMap<RouterId, RouterAgent>) -> Result<()> {
            self.rounds.push(round);
            Ok(())
        }

        fn on_finish(&mut self, outcome: RunOutcome, _agents: &BTreeMap<RouterId, RouterAgent>) -> Result<()> {
            self.finished = Some(outcome);
            Ok(())
        }
    }

    fn pair() -> Topology {
        let mut topo = Topology::new();
        topo.upsert_link("X", "Y", LinkCost::Set(1)).unwrap();
        topo
    }

    #[test]
    fn test_single_link_converges_immediately() {
        let topo = pair();
        let mut engine = ConvergenceEngine::default();
        let mut recorder = Recorder { rounds: vec![], finished: None };

        let outcome = engine.run(&topo, &mut recorder).unwrap();
        assert_eq!(outcome, RunOutcome::Converged { rounds: 0 });
        assert_eq!(recorder.rounds, vec![0]);
        assert_eq!(recorder.finished, Some(outcome));
        assert_eq!(engine.state(), EngineState::Converged);
        assert_eq!(engine.routing_table("X").unwrap().get_route("Y").unwrap().cost, 1);
    }

    #[test]
    fn test_rounds_reported_in_order() {
        let mut topo = Topology::new();
        topo.upsert_link("A", "B", LinkCost::Set(1)).unwrap();
        topo.upsert_link("B", "C", LinkCost::Set(1)).unwrap();

        let mut engine = ConvergenceEngine::default();
        let mut recorder = Recorder { rounds: vec![], finished: None };
        let outcome = engine.run(&topo, &mut recorder).unwrap();

        assert!(outcome.is_converged());
        let expected: Vec<usize> = (0..=outcome.rounds()).collect();
        assert_eq!(recorder.rounds, expected);
    }

    #[test]
    fn test_cap_of_zero_is_raised() {
        assert_eq!(ConvergenceEngine::new(0).max_rounds(), 1);
    }

    #[test]
    fn test_isolated_router_has_no_routes() {
        let mut topo = pair();
        topo.add_router("Z");
        let mut engine = ConvergenceEngine::default();
        engine.run(&topo, &mut ()).unwrap();
        assert!(engine.routing_table("Z").unwrap().is_empty());
        assert!(engine.routing_table("X").unwrap().get_route("Z").is_none());
        assert!(engine.verify(&topo).is_empty());
    }

    #[test]
    fn test_outcome_serializes_with_status_tag() {
        let json = serde_json::to_string(&RunOutcome::NonConvergent { rounds: 50 }).unwrap();
        assert_eq!(json, r#"{"status":"non_convergent","rounds":50}"#);
    }
}
