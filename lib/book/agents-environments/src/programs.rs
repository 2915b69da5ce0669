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

//! Agent programs for the vacuum worlds, and factories for agents that run them.
//!
//! See figures 2.3, 2.8 and 2.12.

use std::hash::Hash;
use std::rc::Rc;

use rand::{Rng as _, SeedableRng};

use crate::entity::Entity;
use crate::error::{AgentsError, Result};
use crate::spatial::Point;
use crate::trivial_vacuum::{Square, TrivialPercept};
use crate::vacuum_world::{BumpStatus, SquareState, VacuumPercept};
use crate::{Action, AgentProgram, BoxedProgram, Float, HashMap, Rng};

/// An agent for the two-square world.
pub type TrivialAgent = Entity<Square, TrivialPercept, Action>;
/// An agent for the grid vacuum world.
pub type GridAgent = Entity<Point, VacuumPercept, Action>;

const VACUUM_IMAGE: &str = "images/vacuum.png";

/// A reflex agent for the two-state vacuum environment. [Fig. 2.8]
#[derive(Debug, Clone, Default)]
pub struct ReflexVacuumProgram {}

impl ReflexVacuumProgram {
    pub fn new() -> Self {
        Self {}
    }
}

impl AgentProgram for ReflexVacuumProgram {
    type Percept = TrivialPercept;
    type Action = Action;

    fn act(&mut self, percept: &Self::Percept) -> Self::Action {
        if percept.square_state == SquareState::Dirty {
            Action::Suck
        } else if percept.location == Square::A {
            Action::Right
        } else {
            Action::Left
        }
    }

    fn clone_box(&self) -> BoxedProgram<Self::Percept, Self::Action> {
        Box::new(self.clone())
    }
}

/// Keeps track of which locations are clean or dirty. Same as [ReflexVacuumProgram], except
/// that once everything is known to be clean it does nothing.
#[derive(Debug, Clone, Default)]
pub struct ModelBasedVacuumProgram {
    model: HashMap<Square, SquareState>,
}

impl ModelBasedVacuumProgram {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AgentProgram for ModelBasedVacuumProgram {
    type Percept = TrivialPercept;
    type Action = Action;

    fn act(&mut self, percept: &Self::Percept) -> Self::Action {
        self.model.insert(percept.location, percept.square_state);
        let all_clean = Square::ALL
            .iter()
            .all(|square| self.model.get(square) == Some(&SquareState::Clean));
        if all_clean {
            Action::NoOp
        } else if percept.square_state == SquareState::Dirty {
            Action::Suck
        } else if percept.location == Square::A {
            Action::Right
        } else {
            Action::Left
        }
    }

    fn clone_box(&self) -> BoxedProgram<Self::Percept, Self::Action> {
        Box::new(self.clone())
    }
}

/// Selects an action based on the whole percept sequence so far. [Fig. 2.7]
///
/// It is practical only for tiny domains. Sequences missing from the table map to `fallback`.
#[derive(Debug, Clone)]
pub struct TableDrivenProgram<_Percept, _Action> {
    table: Rc<HashMap<Vec<_Percept>, _Action>>,
    percepts: Vec<_Percept>,
    fallback: _Action,
}

impl<_Percept, _Action> TableDrivenProgram<_Percept, _Action>
where
    _Percept: Clone + Eq + Hash,
    _Action: Clone,
{
    pub fn new(table: HashMap<Vec<_Percept>, _Action>, fallback: _Action) -> Self {
        Self {
            table: Rc::new(table),
            percepts: Vec::new(),
            fallback,
        }
    }
}

impl<_Percept, _Action> AgentProgram for TableDrivenProgram<_Percept, _Action>
where
    _Percept: Clone + Eq + Hash + 'static,
    _Action: Clone + 'static,
{
    type Percept = _Percept;
    type Action = _Action;

    fn act(&mut self, percept: &Self::Percept) -> Self::Action {
        self.percepts.push(percept.clone());
        self.table
            .get(&self.percepts)
            .cloned()
            .unwrap_or_else(|| self.fallback.clone())
    }

    fn clone_box(&self) -> BoxedProgram<Self::Percept, Self::Action> {
        Box::new(self.clone())
    }
}

/// The partial table of figure 2.3.
pub fn table_driven_vacuum_program() -> TableDrivenProgram<TrivialPercept, Action> {
    let percept = |location, square_state| TrivialPercept {
        location,
        square_state,
    };
    let a_clean = percept(Square::A, SquareState::Clean);
    let a_dirty = percept(Square::A, SquareState::Dirty);
    let b_clean = percept(Square::B, SquareState::Clean);
    let b_dirty = percept(Square::B, SquareState::Dirty);

    let mut table = HashMap::default();
    table.insert(vec![a_clean], Action::Right);
    table.insert(vec![a_dirty], Action::Suck);
    table.insert(vec![b_clean], Action::Left);
    table.insert(vec![b_dirty], Action::Suck);
    table.insert(vec![a_clean, a_clean], Action::Right);
    table.insert(vec![a_clean, a_dirty], Action::Suck);
    table.insert(vec![a_clean, a_clean, a_clean], Action::Right);
    table.insert(vec![a_clean, a_clean, a_dirty], Action::Suck);
    TableDrivenProgram::new(table, Action::NoOp)
}

/// Chooses an action at random, ignoring all percepts.
#[derive(Debug)]
pub struct RandomProgram<_Percept, _Action> {
    actions: Rc<[_Action]>,
    rng: Rng,
    phantom_percept: std::marker::PhantomData<fn(&_Percept)>,
}

impl<_Percept, _Action> RandomProgram<_Percept, _Action> {
    /// Fails with [AgentsError::NoActions] if `actions` is empty.
    pub fn new(actions: Vec<_Action>, rng: Rng) -> Result<Self> {
        let mut actions = actions.into_iter();
        let first = actions.next().ok_or(AgentsError::NoActions)?;
        Ok(Self::with_actions(first, actions, rng))
    }

    /// At least `first` is always available to choose.
    fn with_actions(first: _Action, rest: impl IntoIterator<Item = _Action>, rng: Rng) -> Self {
        Self {
            actions: std::iter::once(first).chain(rest).collect(),
            rng,
            phantom_percept: std::marker::PhantomData,
        }
    }
}

impl<_Percept, _Action> Clone for RandomProgram<_Percept, _Action> {
    fn clone(&self) -> Self {
        Self {
            actions: Rc::clone(&self.actions),
            rng: self.rng.clone(),
            phantom_percept: std::marker::PhantomData,
        }
    }
}

impl<_Percept, _Action> AgentProgram for RandomProgram<_Percept, _Action>
where
    _Percept: 'static,
    _Action: Clone + 'static,
{
    type Percept = _Percept;
    type Action = _Action;

    fn act(&mut self, _percept: &Self::Percept) -> Self::Action {
        let index = self.rng.gen_range(0..self.actions.len());
        self.actions[index].clone()
    }

    fn clone_box(&self) -> BoxedProgram<Self::Percept, Self::Action> {
        Box::new(self.clone())
    }
}

/// Randomly choose one of the actions from the two-square vacuum environment.
pub fn random_vacuum_program(rng: Rng) -> RandomProgram<TrivialPercept, Action> {
    RandomProgram::with_actions(Action::Right, [Action::Left, Action::Suck, Action::NoOp], rng)
}

/// A reflex agent for the grid vacuum world, where the location isn't perceived.
///
/// Sucks when dirty and turns when it bumps into something. Otherwise it mostly goes forward,
/// turning now and then so it doesn't just pace one row.
#[derive(Debug, Clone)]
pub struct GridReflexVacuumProgram {
    rng: Rng,
    turn_probability: Float,
}

impl GridReflexVacuumProgram {
    pub fn new(rng: Rng) -> Self {
        Self {
            rng,
            turn_probability: 0.2,
        }
    }

    fn random_turn(&mut self) -> Action {
        if self.rng.gen_bool(0.5) {
            Action::TurnLeft
        } else {
            Action::TurnRight
        }
    }
}

impl AgentProgram for GridReflexVacuumProgram {
    type Percept = VacuumPercept;
    type Action = Action;

    fn act(&mut self, percept: &Self::Percept) -> Self::Action {
        if percept.square_state == SquareState::Dirty {
            Action::Suck
        } else if percept.bump == BumpStatus::Bump || self.rng.gen_bool(self.turn_probability) {
            self.random_turn()
        } else {
            Action::Forward
        }
    }

    fn clone_box(&self) -> BoxedProgram<Self::Percept, Self::Action> {
        Box::new(self.clone())
    }
}

pub fn reflex_vacuum_agent() -> TrivialAgent {
    Entity::agent("ReflexVacuumAgent", ReflexVacuumProgram::new()).with_image(VACUUM_IMAGE)
}

pub fn model_based_vacuum_agent() -> TrivialAgent {
    Entity::agent("ModelBasedVacuumAgent", ModelBasedVacuumProgram::new())
        .with_image(VACUUM_IMAGE)
}

pub fn table_driven_vacuum_agent() -> TrivialAgent {
    Entity::agent("TableDrivenVacuumAgent", table_driven_vacuum_program())
        .with_image(VACUUM_IMAGE)
}

pub fn random_vacuum_agent() -> TrivialAgent {
    random_vacuum_agent_seeded(rand::random())
}

pub fn random_vacuum_agent_seeded(seed: u64) -> TrivialAgent {
    Entity::agent(
        "RandomVacuumAgent",
        random_vacuum_program(Rng::seed_from_u64(seed)),
    )
    .with_image(VACUUM_IMAGE)
}

pub fn grid_reflex_vacuum_agent() -> GridAgent {
    grid_reflex_vacuum_agent_seeded(rand::random())
}

pub fn grid_reflex_vacuum_agent_seeded(seed: u64) -> GridAgent {
    Entity::agent(
        "GridReflexVacuumAgent",
        GridReflexVacuumProgram::new(Rng::seed_from_u64(seed)),
    )
    .with_image(VACUUM_IMAGE)
}

pub fn random_grid_vacuum_agent() -> GridAgent {
    random_grid_vacuum_agent_seeded(rand::random())
}

pub fn random_grid_vacuum_agent_seeded(seed: u64) -> GridAgent {
    let program = RandomProgram::with_actions(
        Action::TurnRight,
        [Action::TurnLeft, Action::Forward, Action::Suck, Action::NoOp],
        Rng::seed_from_u64(seed),
    );
    Entity::agent("RandomVacuumAgent", program).with_image(VACUUM_IMAGE)
}
