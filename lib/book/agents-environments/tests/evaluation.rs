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

use agents_environments::harness::{compare_agents, seeded, vacuum_agent_factories, AgentFactory};
use agents_environments::programs;
use agents_environments::trivial_vacuum::TrivialVacuumEnvironment;
use agents_environments::vacuum_world::VacuumEnvironment;
use agents_environments::{Environment, GridConfig, HarnessConfig, VacuumConfig};

#[test]
fn test_vacuum_agents_rank_by_capability() {
    let config = HarnessConfig::from_json(r#"{"trials": 1000, "steps": 4, "seed": 2023}"#).unwrap();
    let mut factories = vacuum_agent_factories(config.seed);
    let scores = compare_agents(
        seeded(config.seed, TrivialVacuumEnvironment::new),
        &mut factories,
        config.trials,
        config.steps,
    )
    .unwrap();

    let averages: Vec<_> = scores.iter().map(|score| score.average).collect();
    assert!(
        averages.windows(2).all(|pair| pair[0] > pair[1]),
        "expected model-based > reflex > table-driven > random, got {:?}",
        scores
    );
}

#[test]
fn test_same_seed_gives_same_averages() {
    let evaluate = || {
        let mut factories = vacuum_agent_factories(5);
        compare_agents(seeded(9, TrivialVacuumEnvironment::new), &mut factories, 100, 10).unwrap()
    };
    assert_eq!(evaluate(), evaluate());
}

#[test]
fn test_grid_reflex_vacuum_beats_random_walk() {
    let config = VacuumConfig::new(GridConfig::new(8, 8, 1), 0.5);
    let mut factories = vec![
        AgentFactory::new("GridReflexVacuumAgent", programs::grid_reflex_vacuum_agent),
        AgentFactory::new("RandomGridVacuumAgent", programs::random_grid_vacuum_agent),
    ];
    let scores = compare_agents(
        seeded(11, |seed| VacuumEnvironment::new(&config, seed).unwrap()),
        &mut factories,
        50,
        200,
    )
    .unwrap();
    assert!(scores[0].average > scores[1].average, "{:?}", scores);
}

#[test]
fn test_dead_agents_do_not_run() {
    let mut env = TrivialVacuumEnvironment::new(0);
    let mut agent = programs::reflex_vacuum_agent();
    agent.set_alive(false);
    let key = env.add_object(agent, None);
    assert_eq!(env.run(100), 0);
    assert_eq!(env.world().performance(key), Some(0));
}
