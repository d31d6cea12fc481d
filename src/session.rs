//! Line-oriented command stream driving the simulation.
//!
//! ```text
//! <router>            one per line
//! START
//! <a> <b> <cost>      initial links, -1 removes
//! UPDATE              converge and print
//! <a> <b> <cost>      incremental changes
//! END                 converge again if anything changed
//! ```

use log::{debug, info, warn};
use std::io::{BufRead, Write};

use crate::algorithms::{ConvergenceEngine, RoundObserver, RunOutcome};
use crate::config::{OutputFormat, SimulationConfig};
use crate::error::{Error, Result};
use crate::network::Topology;
use crate::presenter::{JsonPresenter, TextPresenter};
use crate::types::{LinkCost, LinkUpdate};

const START: &str = "START";
const UPDATE: &str = "UPDATE";
const END: &str = "END";

/// Parses `"<a> <b> <cost>"`.
pub fn parse_link_line(line: &str, line_no: usize) -> Result<LinkUpdate> {
    let malformed = |reason: String| Error::Malformed { line: line_no, reason };

    let tokens: Vec<&str> = line.split_whitespace().collect();
    let [a, b, cost] = tokens.as_slice() else {
        return Err(malformed(format!(
            "expected `<router> <router> <cost>`, got {} tokens",
            tokens.len()
        )));
    };

    let raw: i64 = cost
        .parse()
        .map_err(|_| malformed(format!("cost `{}` is not an integer", cost)))?;
    let cost = LinkCost::from_wire(raw).map_err(|e| malformed(e.to_string()))?;

    Ok(LinkUpdate {
        a: a.to_string(),
        b: b.to_string(),
        cost,
    })
}

/// Topology plus engine for one command stream. Each convergence resumes from the
/// previous one.
pub struct Session {
    topology: Topology,
    engine: ConvergenceEngine,
    config: SimulationConfig,
    outcomes: Vec<RunOutcome>,
}

impl Session {
    pub fn new(config: SimulationConfig) -> Self {
        Self {
            topology: Topology::new(),
            engine: ConvergenceEngine::from_config(&config),
            config,
            outcomes: Vec::new(),
        }
    }

    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    pub fn outcomes(&self) -> &[RunOutcome] {
        &self.outcomes
    }

    pub fn declare_router(&mut self, name: &str, line_no: usize) -> Result<()> {
        if name.split_whitespace().count() != 1 {
            return Err(Error::Malformed {
                line: line_no,
                reason: format!("router name `{}` contains whitespace", name),
            });
        }
        if !self.topology.add_router(name) {
            debug!("Router {} declared twice", name);
        }
        Ok(())
    }

    pub fn apply(&mut self, update: &LinkUpdate, line_no: usize) -> Result<()> {
        if update.cost != LinkCost::Remove {
            for router in [&update.a, &update.b] {
                if self.topology.contains_router(router) {
                    continue;
                }
                if self.config.strict_routers {
                    return Err(Error::Malformed {
                        line: line_no,
                        reason: format!("undeclared router {}", router),
                    });
                }
                warn!("Line {}: router {} was not declared, adding it", line_no, router);
            }
        }

        self.topology
            .upsert_link(&update.a, &update.b, update.cost)
            .map_err(|e| Error::Malformed {
                line: line_no,
                reason: e.to_string(),
            })?;
        Ok(())
    }

    /// Runs the engine to convergence or the round cap.
    pub fn converge<O: RoundObserver + ?Sized>(&mut self, observer: &mut O) -> Result<RunOutcome> {
        let outcome = self.engine.run(&self.topology, observer)?;

        if self.config.verify && outcome.is_converged() {
            let mismatches = self.engine.verify(&self.topology);
            if mismatches.is_empty() {
                info!("All routing tables match shortest-path costs");
            }
            for m in mismatches {
                warn!(
                    "Router {} -> {}: shortest path costs {}, routing table says {}",
                    m.router, m.destination, m.expected, m.actual
                );
            }
        }

        self.outcomes.push(outcome);
        Ok(outcome)
    }

    /// Consumes the whole command stream, converging on `UPDATE` and, if any update line
    /// followed, on `END`.
    pub fn run<R: BufRead, O: RoundObserver + ?Sized>(&mut self, input: R, observer: &mut O) -> Result<()> {
        let mut lines = input.lines().enumerate();

        loop {
            let Some((line_no, line)) = next_command(&mut lines)? else {
                return Err(Error::UnexpectedEof(START));
            };
            if line == START {
                break;
            }
            self.declare_router(&line, line_no)?;
        }
        info!("{} routers declared", self.topology.router_count());

        loop {
            let Some((line_no, line)) = next_command(&mut lines)? else {
                return Err(Error::UnexpectedEof(UPDATE));
            };
            if line == UPDATE {
                break;
            }
            let update = parse_link_line(&line, line_no)?;
            self.apply(&update, line_no)?;
        }

        self.converge(observer)?;

        let mut updates = 0usize;
        loop {
            let Some((line_no, line)) = next_command(&mut lines)? else {
                warn!("Input ended without {}", END);
                break;
            };
            if line == END {
                break;
            }
            let update = parse_link_line(&line, line_no)?;
            self.apply(&update, line_no)?;
            updates += 1;
        }

        if updates > 0 {
            info!("Applying {} link updates", updates);
            self.converge(observer)?;
        }
        Ok(())
    }
}

/// Next non-blank trimmed line with its 1-based number.
fn next_command<I>(lines: &mut I) -> Result<Option<(usize, String)>>
where
    I: Iterator<Item = (usize, std::io::Result<String>)>,
{
    for (idx, line) in lines {
        let line = line?;
        let trimmed = line.trim();
        if !trimmed.is_empty() {
            return Ok(Some((idx + 1, trimmed.to_string())));
        }
    }
    Ok(None)
}

/// Runs a full command stream, writing tables to `output` in the configured format.
pub fn run_session<R: BufRead, W: Write>(
    input: R,
    output: W,
    config: &SimulationConfig,
) -> Result<Vec<RunOutcome>> {
    let mut session = Session::new(config.clone());
    match config.format {
        OutputFormat::Text => session.run(input, &mut TextPresenter::new(output))?,
        OutputFormat::Json => session.run(input, &mut JsonPresenter::new(output))?,
    }
    Ok(session.outcomes().to_vec())
}
