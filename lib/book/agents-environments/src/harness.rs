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

//! See how well each of several agents do in the same instances of an environment.

use rand::{Rng as _, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{AgentsError, Result};
use crate::programs;
use crate::trivial_vacuum::TrivialVacuumEnvironment;
use crate::{Environment, EntityOf, Float, Rng};

/// Makes fresh agents for an evaluation.
pub struct AgentFactory<'a, _Environment: Environment> {
    name: String,
    make: Box<dyn FnMut() -> EntityOf<_Environment> + 'a>,
}

impl<'a, _Environment: Environment> AgentFactory<'a, _Environment> {
    pub fn new(
        name: impl Into<String>,
        make: impl FnMut() -> EntityOf<_Environment> + 'a,
    ) -> Self {
        Self {
            name: name.into(),
            make: Box::new(make),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn make(&mut self) -> EntityOf<_Environment> {
        (self.make)()
    }
}

/// Average final performance of one agent factory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentScore {
    pub agent: String,
    pub average: Float,
}

/// Create `n` instances of the environment, and run each agent in copies of each one for
/// `steps`. Returns the average score of each agent, in the order the factories were given.
///
/// Every agent sees exactly the same environment instances, since all randomness in an
/// environment's initial state is resolved when the factory builds it.
pub fn compare_agents<_Environment, _EnvFactory>(
    mut env_factory: _EnvFactory,
    agent_factories: &mut [AgentFactory<'_, _Environment>],
    n: usize,
    steps: usize,
) -> Result<Vec<AgentScore>>
where
    _Environment: Environment + Clone,
    _EnvFactory: FnMut() -> _Environment,
{
    if n == 0 {
        return Err(AgentsError::NoEnvironments);
    }
    let envs: Vec<_Environment> = (0..n).map(|_| env_factory()).collect();
    compare_agents_on(&envs, agent_factories, steps)
}

/// Like [compare_agents] for environments that have already been built. `envs` is left as it
/// was; each agent runs in its own copies.
pub fn compare_agents_on<_Environment>(
    envs: &[_Environment],
    agent_factories: &mut [AgentFactory<'_, _Environment>],
    steps: usize,
) -> Result<Vec<AgentScore>>
where
    _Environment: Environment + Clone,
{
    agent_factories
        .iter_mut()
        .map(|factory| {
            let average = test_agent(factory, steps, envs.to_vec())?;
            info!(agent = factory.name(), average, "evaluated agent");
            Ok(AgentScore {
                agent: factory.name().to_string(),
                average,
            })
        })
        .collect()
}

/// Return the mean score of running a fresh agent in each of the envs, for `steps`.
pub fn test_agent<_Environment>(
    factory: &mut AgentFactory<'_, _Environment>,
    steps: usize,
    envs: Vec<_Environment>,
) -> Result<Float>
where
    _Environment: Environment,
{
    if envs.is_empty() {
        return Err(AgentsError::NoEnvironments);
    }
    let count = envs.len();
    let mut total: i64 = 0;
    for mut env in envs {
        let agent = env.add_object(factory.make(), None);
        env.run(steps);
        total += i64::from(env.world().performance(agent).unwrap_or_default());
    }
    Ok(total as Float / count as Float)
}

/// An environment factory that seeds each instance from one generator seeded with `seed`.
pub fn seeded<_Environment>(
    seed: u64,
    mut make: impl FnMut(u64) -> _Environment,
) -> impl FnMut() -> _Environment {
    let mut rng = Rng::seed_from_u64(seed);
    move || make(rng.gen())
}

/// The four agents of the two-square vacuum world, most capable first.
pub fn vacuum_agent_factories(seed: u64) -> Vec<AgentFactory<'static, TrivialVacuumEnvironment>> {
    let mut rng = Rng::seed_from_u64(seed);
    vec![
        AgentFactory::new("ModelBasedVacuumAgent", programs::model_based_vacuum_agent),
        AgentFactory::new("ReflexVacuumAgent", programs::reflex_vacuum_agent),
        AgentFactory::new("TableDrivenVacuumAgent", programs::table_driven_vacuum_agent),
        AgentFactory::new("RandomVacuumAgent", move || {
            programs::random_vacuum_agent_seeded(rng.gen())
        }),
    ]
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use approx::assert_relative_eq;

    use super::*;
    use crate::entity::Entity;
    use crate::trivial_vacuum::{Square, TrivialPercept};
    use crate::vacuum_world::SquareState;
    use crate::{Action, ProgramFn};

    fn logging_factory(
        name: &'static str,
        action: Action,
        log: &Rc<RefCell<Vec<TrivialPercept>>>,
    ) -> AgentFactory<'static, TrivialVacuumEnvironment> {
        let log = Rc::clone(log);
        AgentFactory::new(name, move || {
            let log = Rc::clone(&log);
            Entity::agent(
                name,
                ProgramFn::new(move |percept: &TrivialPercept| {
                    log.borrow_mut().push(*percept);
                    action
                }),
            )
        })
    }

    #[test]
    fn test_every_agent_sees_the_same_environments() {
        let sucker_log = Rc::new(RefCell::new(Vec::new()));
        let mover_log = Rc::new(RefCell::new(Vec::new()));
        let mut factories = vec![
            logging_factory("Sucker", Action::Suck, &sucker_log),
            logging_factory("Mover", Action::Right, &mover_log),
        ];
        let scores = compare_agents(
            seeded(7, TrivialVacuumEnvironment::new),
            &mut factories,
            50,
            1,
        )
        .unwrap();

        assert_eq!(sucker_log.borrow().len(), 50);
        assert_eq!(*sucker_log.borrow(), *mover_log.borrow());
        assert_relative_eq!(scores[1].average, -1.0);
        assert!(scores[0].average >= 0.0);
        assert_ne!(scores[0].average, scores[1].average);
    }

    fn touring_factory(
        name: &'static str,
        log: &Rc<RefCell<Vec<TrivialPercept>>>,
    ) -> AgentFactory<'static, TrivialVacuumEnvironment> {
        let log = Rc::clone(log);
        AgentFactory::new(name, move || {
            let log = Rc::clone(&log);
            Entity::agent(
                name,
                ProgramFn::new(move |percept: &TrivialPercept| {
                    log.borrow_mut().push(*percept);
                    match percept.location {
                        Square::A => Action::Right,
                        Square::B => Action::Left,
                    }
                }),
            )
        })
    }

    #[test]
    fn test_every_agent_starts_from_the_same_square_states() {
        let first_log = Rc::new(RefCell::new(Vec::new()));
        let second_log = Rc::new(RefCell::new(Vec::new()));
        let mut factories = vec![
            touring_factory("First", &first_log),
            touring_factory("Second", &second_log),
        ];
        compare_agents(
            seeded(7, TrivialVacuumEnvironment::new),
            &mut factories,
            30,
            2,
        )
        .unwrap();

        let mut expected = seeded(7, TrivialVacuumEnvironment::new);
        let first_log = first_log.borrow();
        assert_eq!(first_log.len(), 60);
        assert_eq!(*first_log, *second_log.borrow());
        // Touring sees both squares before changing either, so each run reports the initial state.
        for run in first_log.chunks(2) {
            let env = expected();
            assert_ne!(run[0].location, run[1].location);
            for percept in run {
                assert_eq!(percept.square_state, env.square_state(percept.location));
            }
        }
    }

    #[test]
    fn test_compare_agents_leaves_environments_untouched() {
        let envs: Vec<_> = (0..5).map(TrivialVacuumEnvironment::new).collect();
        let mut factories = vacuum_agent_factories(0);
        compare_agents_on(&envs, &mut factories, 10).unwrap();
        for env in &envs {
            assert!(env.world().is_empty());
        }
    }

    #[test]
    fn test_averages_are_in_factory_order() {
        let mut factories = vacuum_agent_factories(1);
        let scores = compare_agents(seeded(3, TrivialVacuumEnvironment::new), &mut factories, 4, 4)
            .unwrap();
        let names: Vec<_> = scores.iter().map(|score| score.agent.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "ModelBasedVacuumAgent",
                "ReflexVacuumAgent",
                "TableDrivenVacuumAgent",
                "RandomVacuumAgent"
            ]
        );
    }

    #[test]
    fn test_test_agent_averages_final_performance() {
        let envs = vec![
            TrivialVacuumEnvironment::with_squares(SquareState::Dirty, SquareState::Dirty, 0),
            TrivialVacuumEnvironment::with_squares(SquareState::Clean, SquareState::Clean, 0),
        ];
        let mut factory = AgentFactory::new("Sucker", || {
            Entity::agent("Sucker", ProgramFn::new(|_: &TrivialPercept| Action::Suck))
        });
        // One dirty square sucked in the first world, nothing in the second.
        let average = test_agent(&mut factory, 3, envs).unwrap();
        assert_relative_eq!(average, 5.0);
    }

    #[test]
    fn test_no_environments_is_an_error() {
        let mut factories = vacuum_agent_factories(0);
        assert!(matches!(
            compare_agents(seeded(0, TrivialVacuumEnvironment::new), &mut factories, 0, 10),
            Err(AgentsError::NoEnvironments)
        ));
    }
}
