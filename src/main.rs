use anyhow::{Context, Result};
use clap::Parser;
use env_logger::Env;
use log::info;
use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;

use dv_routing::config::{OutputFormat, SimulationConfig};
use dv_routing::session::run_session;

#[derive(Parser)]
#[command(name = "dv_sim", about = "Distance-vector routing convergence simulator")]
struct Cli {
    /// Read the command stream from this file instead of stdin
    #[arg(long)]
    input: Option<PathBuf>,

    /// JSON configuration file; command-line flags override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Rounds before a run is declared non-convergent
    #[arg(long)]
    max_rounds: Option<usize>,

    /// Recompute routers in parallel within a round
    #[arg(long)]
    parallel: bool,

    /// Check converged routing tables against shortest-path costs
    #[arg(long)]
    verify: bool,

    /// Reject links that name undeclared routers
    #[arg(long)]
    strict: bool,

    #[arg(long, value_enum)]
    format: Option<OutputFormat>,

    /// Write the effective configuration to this file
    #[arg(long)]
    write_config: Option<PathBuf>,
}

impl Cli {
    fn simulation_config(&self) -> Result<SimulationConfig> {
        let mut config = match &self.config {
            Some(path) => SimulationConfig::load(path)?,
            None => SimulationConfig::default(),
        };

        if let Some(max_rounds) = self.max_rounds {
            config.max_rounds = max_rounds;
        }
        if let Some(format) = self.format {
            config.format = format;
        }
        config.parallel |= self.parallel;
        config.verify |= self.verify;
        config.strict_routers |= self.strict;

        Ok(config)
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let config = cli.simulation_config()?;
    info!("Effective configuration: {:?}", config);

    if let Some(path) = &cli.write_config {
        config
            .save(path)
            .with_context(|| format!("writing config {}", path.display()))?;
    }

    let stdout = io::stdout().lock();
    let outcomes = match &cli.input {
        Some(path) => {
            let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
            run_session(BufReader::new(file), stdout, &config)?
        }
        None => run_session(io::stdin().lock(), stdout, &config)?,
    };

    let stalled = outcomes.iter().filter(|o| !o.is_converged()).count();
    info!("{} runs completed, {} hit the round cap", outcomes.len(), stalled);

    Ok(())
}
