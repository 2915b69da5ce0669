/*
 * Copyright (C) 2023 Asim Ihsan
 * SPDX-License-Identifier: AGPL-3.0-only
 *
 * This program is free software: you can redistribute it and/or modify it under
 * the terms of the GNU Affero General Public License as published by the Free
 * Software Foundation, version 3.
 *
 * This program is distributed in the hope that it will be useful, but WITHOUT ANY
 * WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A
 * PARTICULAR PURPOSE. See the GNU Affero General Public License for more details.
 *
 * You should have received a copy of the GNU Affero General Public License along
 * with this program. If not, see <https://www.gnu.org/licenses/>
 */

//! Chapter 2, Exercise 11, run one vacuum agent in one environment and report its score.

// Exercise 11:
//
// Implement a performance-measuring environment simulator for the vacuum-cleaner world depicted in
// Figure 2.8 and specified on page . Your implementation should be modular so that the sensors,
// actuators, and environment characteristics (size, shape, dirt placement, etc.) can be changed
// easily. (Note: for some choices of programming language and operating system there are already
// implementations in the online code repository.)

use std::path::PathBuf;

use agents_environments::programs;
use agents_environments::trace::trace_agent;
use agents_environments::trivial_vacuum::TrivialVacuumEnvironment;
use agents_environments::vacuum_world::VacuumEnvironment;
use agents_environments::{Environment, EntityOf, Int, VacuumConfig};
use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum WorldKind {
    /// The two-square world of figure 2.2.
    Trivial,
    /// A walled grid with dirt scattered inside.
    Grid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ProgramKind {
    Reflex,
    ModelBased,
    TableDriven,
    Random,
}

#[derive(Parser, Debug)]
#[command(
    name = "ch02-ex11-run-reflex-agent-once",
    version,
    about = "Run one traced vacuum agent and print its performance measure"
)]
struct Cli {
    #[arg(long, value_enum, default_value_t = WorldKind::Trivial)]
    world: WorldKind,

    #[arg(long, value_enum, default_value_t = ProgramKind::Reflex)]
    program: ProgramKind,

    /// Maximum number of time steps.
    #[arg(long, default_value_t = 1000)]
    steps: usize,

    /// Seed for the environment and any randomized program. Random if omitted.
    #[arg(long)]
    seed: Option<u64>,

    /// JSON grid vacuum settings, e.g. {"grid": {"width": 6, "height": 4}, "dirt_probability": 0.5}.
    #[arg(long)]
    config: Option<PathBuf>,
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .try_init();
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let seed = cli.seed.unwrap_or_else(rand::random);
    info!(world = ?cli.world, program = ?cli.program, steps = cli.steps, seed, "starting");

    let score = match cli.world {
        WorldKind::Trivial => {
            if cli.config.is_some() {
                bail!("--config only applies to the grid world");
            }
            run_trivial(cli.program, cli.steps, seed)?
        }
        WorldKind::Grid => {
            let config = match &cli.config {
                Some(path) => {
                    let json = std::fs::read_to_string(path)
                        .with_context(|| format!("failed to read {}", path.display()))?;
                    VacuumConfig::from_json(&json)
                        .with_context(|| format!("invalid config in {}", path.display()))?
                }
                None => VacuumConfig::default(),
            };
            run_grid(cli.program, &config, cli.steps, seed)?
        }
    };

    println!("score: {}", score);
    Ok(())
}

fn run_trivial(program: ProgramKind, steps: usize, seed: u64) -> Result<Int> {
    let agent = match program {
        ProgramKind::Reflex => programs::reflex_vacuum_agent(),
        ProgramKind::ModelBased => programs::model_based_vacuum_agent(),
        ProgramKind::TableDriven => programs::table_driven_vacuum_agent(),
        ProgramKind::Random => programs::random_vacuum_agent_seeded(seed),
    };
    run_once(TrivialVacuumEnvironment::new(seed), agent, steps)
}

fn run_grid(program: ProgramKind, config: &VacuumConfig, steps: usize, seed: u64) -> Result<Int> {
    let agent = match program {
        ProgramKind::Reflex => programs::grid_reflex_vacuum_agent_seeded(seed),
        ProgramKind::Random => programs::random_grid_vacuum_agent_seeded(seed),
        other => bail!("{:?} needs to perceive its location, which the grid world doesn't offer", other),
    };
    let env = VacuumEnvironment::new(config, seed)?;
    info!(dirt = env.dirt_remaining(), "grid ready");
    run_once(env, agent, steps)
}

fn run_once<_Environment>(
    mut env: _Environment,
    agent: EntityOf<_Environment>,
    steps: usize,
) -> Result<Int>
where
    _Environment: Environment,
    _Environment::Percept: std::fmt::Debug + 'static,
    _Environment::Action: 'static,
{
    let name = format!("{}-{}", agent.kind(), env.world().len());
    let key = env.add_object(trace_agent(agent.with_name(name)), None);
    let ticks = env.run(steps);
    info!(ticks, "finished");
    env.world()
        .performance(key)
        .context("the agent is no longer registered")
}
