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

//! The two-square vacuum world of figure 2.2.

use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::entity::{EntityClass, EntityKey};
use crate::programs;
use crate::vacuum_world::SquareState;
use crate::{Action, Environment, EntityOf, HashMap, Int, Rng, World};

pub const DIRT_REWARD: Int = 10;
pub const MOVE_COST: Int = 1;

/// The two locations of the world. A is on the left, B on the right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Square {
    A,
    B,
}

impl Square {
    pub const ALL: [Square; 2] = [Square::A, Square::B];
}

/// The agent perceives its location and whether that location is dirty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TrivialPercept {
    pub location: Square,
    pub square_state: SquareState,
}

/// Two squares, each clean or dirty. Score 10 for each dirt cleaned, -1 for each move.
#[derive(Debug, Clone)]
pub struct TrivialVacuumEnvironment {
    world: World<Square, TrivialPercept, Action>,
    squares: HashMap<Square, SquareState>,
    rng: Rng,
}

impl TrivialVacuumEnvironment {
    /// Each square is independently clean or dirty, chosen uniformly at random.
    pub fn new(seed: u64) -> Self {
        let mut rng = Rng::seed_from_u64(seed);
        let states = [SquareState::Clean, SquareState::Dirty];
        let mut squares = HashMap::default();
        for square in Square::ALL {
            let state = *states.choose(&mut rng).unwrap_or(&SquareState::Clean);
            squares.insert(square, state);
        }
        Self {
            world: World::new(),
            squares,
            rng,
        }
    }

    /// Fixed square states, with `seed` only used for placing agents.
    pub fn with_squares(a: SquareState, b: SquareState, seed: u64) -> Self {
        let mut env = Self::new(seed);
        env.squares.insert(Square::A, a);
        env.squares.insert(Square::B, b);
        env
    }

    pub fn square_state(&self, square: Square) -> SquareState {
        self.squares
            .get(&square)
            .copied()
            .unwrap_or(SquareState::Clean)
    }

    /// Registration always assigns a square, so agents without one are treated as being in A.
    fn agent_square(&self, agent: EntityKey) -> Square {
        self.world.location(agent).copied().unwrap_or(Square::A)
    }
}

impl Environment for TrivialVacuumEnvironment {
    type Location = Square;
    type Percept = TrivialPercept;
    type Action = Action;

    fn world(&self) -> &World<Square, TrivialPercept, Action> {
        &self.world
    }

    fn world_mut(&mut self) -> &mut World<Square, TrivialPercept, Action> {
        &mut self.world
    }

    fn object_classes(&self) -> Vec<EntityClass<Square, TrivialPercept, Action>> {
        vec![
            EntityClass::new("ReflexVacuumAgent", programs::reflex_vacuum_agent),
            EntityClass::new("RandomVacuumAgent", programs::random_vacuum_agent),
            EntityClass::new("TableDrivenVacuumAgent", programs::table_driven_vacuum_agent),
            EntityClass::new("ModelBasedVacuumAgent", programs::model_based_vacuum_agent),
        ]
    }

    fn percept(&self, agent: EntityKey) -> TrivialPercept {
        let location = self.agent_square(agent);
        TrivialPercept {
            location,
            square_state: self.square_state(location),
        }
    }

    fn execute_action(&mut self, agent: EntityKey, action: Action) {
        let destination = match action {
            Action::Right => Some(Square::B),
            Action::Left => Some(Square::A),
            Action::Suck => {
                let location = self.agent_square(agent);
                if self.square_state(location) == SquareState::Dirty {
                    self.world.score(agent, DIRT_REWARD);
                }
                self.squares.insert(location, SquareState::Clean);
                None
            }
            Action::NoOp => None,
            other => {
                debug!(?agent, action = ?other, "ignoring action the two-square world doesn't know");
                None
            }
        };
        if let Some(destination) = destination {
            if let Some(entity) = self.world.entity_mut(agent) {
                entity.location = Some(destination);
            }
            self.world.score(agent, -MOVE_COST);
        }
    }

    /// Agents start in either location at random.
    fn default_location(&mut self, _entity: &EntityOf<Self>) -> Option<Square> {
        Square::ALL.choose(&mut self.rng).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::Entity;
    use crate::ProgramFn;

    fn scripted(actions: Vec<Action>) -> EntityOf<TrivialVacuumEnvironment> {
        let mut actions = actions.into_iter();
        Entity::agent(
            "Scripted",
            ProgramFn::new(move |_: &TrivialPercept| actions.next().unwrap_or(Action::NoOp)),
        )
    }

    #[test]
    fn test_suck_right_suck_scores_nineteen() {
        let mut env =
            TrivialVacuumEnvironment::with_squares(SquareState::Dirty, SquareState::Dirty, 0);
        let agent = env.add_object(
            scripted(vec![Action::Suck, Action::Right, Action::Suck]),
            Some(Square::A),
        );
        env.run(3);
        assert_eq!(env.world().performance(agent), Some(10 - 1 + 10));
        assert_eq!(env.square_state(Square::A), SquareState::Clean);
        assert_eq!(env.square_state(Square::B), SquareState::Clean);
    }

    #[test]
    fn test_percept_reports_location_and_status() {
        let mut env =
            TrivialVacuumEnvironment::with_squares(SquareState::Clean, SquareState::Dirty, 0);
        let agent = env.add_object(scripted(vec![]), Some(Square::A));
        assert_eq!(
            env.percept(agent),
            TrivialPercept {
                location: Square::A,
                square_state: SquareState::Clean,
            }
        );
        env.execute_action(agent, Action::Right);
        assert_eq!(
            env.percept(agent),
            TrivialPercept {
                location: Square::B,
                square_state: SquareState::Dirty,
            }
        );
    }

    #[test]
    fn test_moves_cost_even_when_already_there() {
        let mut env =
            TrivialVacuumEnvironment::with_squares(SquareState::Clean, SquareState::Clean, 0);
        let agent = env.add_object(scripted(vec![]), Some(Square::A));
        env.execute_action(agent, Action::Left);
        env.execute_action(agent, Action::Left);
        assert_eq!(env.world().performance(agent), Some(-2));
        assert_eq!(env.world().location(agent), Some(&Square::A));
    }

    #[test]
    fn test_sucking_clean_square_is_free_and_noop_is_free() {
        let mut env =
            TrivialVacuumEnvironment::with_squares(SquareState::Clean, SquareState::Clean, 0);
        let agent = env.add_object(scripted(vec![]), Some(Square::B));
        env.execute_action(agent, Action::Suck);
        env.execute_action(agent, Action::NoOp);
        env.execute_action(agent, Action::Forward);
        assert_eq!(env.world().performance(agent), Some(0));
        assert_eq!(env.world().location(agent), Some(&Square::B));
    }

    #[test]
    fn test_default_location_is_a_or_b() {
        let mut env = TrivialVacuumEnvironment::new(5);
        let mut seen = Vec::new();
        for _ in 0..50 {
            let agent = env.add_object(scripted(vec![]), None);
            seen.push(*env.world().location(agent).unwrap());
        }
        assert!(seen.contains(&Square::A));
        assert!(seen.contains(&Square::B));
    }

    #[test]
    fn test_same_seed_same_squares() {
        for seed in 0..20 {
            let first = TrivialVacuumEnvironment::new(seed);
            let second = TrivialVacuumEnvironment::new(seed);
            for square in Square::ALL {
                assert_eq!(first.square_state(square), second.square_state(square));
            }
        }
    }
}
