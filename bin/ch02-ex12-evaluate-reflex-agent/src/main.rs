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

#![warn(missing_docs)]

//! Chapter 2, Exercise 12, Evaluate Reflex Agent.

// Exercise 12:
//
// Implement a simple reflex agent for the vacuum environment in Exercise 2.10. Run the environment
// with this agent for all possible initial dirt configurations and agent locations. Record the
// performance score for each configuration and the overall average score.

use std::path::PathBuf;

use agents_environments::harness::{compare_agents, seeded, vacuum_agent_factories, AgentScore};
use agents_environments::trivial_vacuum::{Square, TrivialVacuumEnvironment};
use agents_environments::vacuum_world::SquareState;
use agents_environments::{Environment, HarnessConfig, Int};
use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    name = "ch02-ex12-evaluate-reflex-agent",
    version,
    about = "Compare the vacuum agents over many randomized two-square worlds"
)]
struct Cli {
    /// JSON harness settings, e.g. {"trials": 1000, "steps": 4, "seed": 7}. Flags override it.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of environment instances each agent runs in.
    #[arg(long)]
    trials: Option<usize>,

    /// Step budget per run.
    #[arg(long)]
    steps: Option<usize>,

    /// Seed for the environment instances and the random agent.
    #[arg(long)]
    seed: Option<u64>,

    /// Score every agent on every initial dirt configuration and agent location instead.
    #[arg(long)]
    exhaustive: bool,

    /// Print JSON instead of a table.
    #[arg(long)]
    json: bool,
}

/// The score of one agent started in one fully specified world.
#[derive(Debug, Serialize)]
struct ConfigurationScore {
    agent: String,
    a: SquareState,
    b: SquareState,
    location: Square,
    score: Int,
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let config = load_config(&cli)?;
    info!(?config, exhaustive = cli.exhaustive, "evaluating");

    if cli.exhaustive {
        let scores = score_every_configuration(&config);
        if cli.json {
            println!("{}", serde_json::to_string_pretty(&scores)?);
        } else {
            print_configurations(&scores);
        }
        return Ok(());
    }

    let mut factories = vacuum_agent_factories(config.seed);
    let scores = compare_agents(
        seeded(config.seed, TrivialVacuumEnvironment::new),
        &mut factories,
        config.trials,
        config.steps,
    )?;
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&scores)?);
    } else {
        print_averages(&scores);
    }
    Ok(())
}

fn load_config(cli: &Cli) -> Result<HarnessConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            HarnessConfig::from_json(&json)
                .with_context(|| format!("invalid config in {}", path.display()))?
        }
        None => HarnessConfig::default(),
    };
    if let Some(trials) = cli.trials {
        config.trials = trials;
    }
    if let Some(steps) = cli.steps {
        config.steps = steps;
    }
    if let Some(seed) = cli.seed {
        config.seed = seed;
    }
    config.validate()?;
    Ok(config)
}

fn score_every_configuration(config: &HarnessConfig) -> Vec<ConfigurationScore> {
    let states = [SquareState::Clean, SquareState::Dirty];
    let mut scores = Vec::new();
    for factory in vacuum_agent_factories(config.seed).iter_mut() {
        for a in states {
            for b in states {
                for location in Square::ALL {
                    let mut env = TrivialVacuumEnvironment::with_squares(a, b, config.seed);
                    let agent = env.add_object(factory.make(), Some(location));
                    env.run(config.steps);
                    scores.push(ConfigurationScore {
                        agent: factory.name().to_string(),
                        a,
                        b,
                        location,
                        score: env.world().performance(agent).unwrap_or_default(),
                    });
                }
            }
        }
    }
    scores
}

fn print_averages(scores: &[AgentScore]) {
    println!("{:<24} {:>10}", "agent", "average");
    for score in scores {
        println!("{:<24} {:>10.3}", score.agent, score.average);
    }
}

fn print_configurations(scores: &[ConfigurationScore]) {
    println!("{:<24} {:>6} {:>6} {:>9} {:>6}", "agent", "A", "B", "location", "score");
    for score in scores {
        println!(
            "{:<24} {:>6} {:>6} {:>9} {:>6}",
            score.agent,
            format!("{:?}", score.a),
            format!("{:?}", score.b),
            format!("{:?}", score.location),
            score.score
        );
    }
    for chunk in scores.chunks(8) {
        if let Some(first) = chunk.first() {
            let total: Int = chunk.iter().map(|score| score.score).sum();
            println!(
                "{} overall average: {:.3}",
                first.agent,
                total as f64 / chunk.len() as f64
            );
        }
    }
}
