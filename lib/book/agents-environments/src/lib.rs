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

//! Agents and environments.
//!
//! PEAS - Performance, Environment, Action, Sensing
//!
//! See:
//! -  Chapter 2: Intelligent Agents, page 40
//!
//! An environment holds entities, some of which are agents. Every tick each agent receives a
//! percept, its program turns the percept into an action, and the environment applies the action
//! and keeps the agent's performance measure up to date.

use std::fmt::Debug;

use tracing::{debug, trace};

pub mod config;
pub mod entity;
pub mod error;
pub mod harness;
pub mod programs;
pub mod spatial;
pub mod trace;
pub mod trivial_vacuum;
pub mod vacuum_world;
pub mod world;

pub use config::{GridConfig, HarnessConfig, VacuumConfig};
pub use entity::{AgentBody, Capability, Entity, EntityClass, EntityKey};
pub use error::{AgentsError, Result};
pub use world::World;

/// Integer type for coordinates and performance measures.
pub type Int = i32;
/// Floating point type for averages and probabilities.
pub type Float = f64;
/// Random number generator owned by environments and randomized programs.
pub type Rng = rand_pcg::Pcg64;
/// Hash map used throughout the crate.
pub type HashMap<K, V> = rustc_hash::FxHashMap<K, V>;
/// Hash set used throughout the crate.
pub type HashSet<T> = rustc_hash::FxHashSet<T>;

/// The action vocabulary shared by the environments in this crate.
///
/// Each environment only understands a subset of these. Anything outside an environment's
/// vocabulary is ignored by that environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Action {
    /// Rotate the heading clockwise.
    TurnRight,
    /// Rotate the heading counter-clockwise.
    TurnLeft,
    /// Move one cell along the heading.
    Forward,
    /// Pick up something at the current location.
    Grab,
    /// Put down the most recently grabbed thing.
    Release,
    /// Remove dirt from the current location.
    Suck,
    /// Move to the right-hand square of the two-square world.
    Right,
    /// Move to the left-hand square of the two-square world.
    Left,
    /// Do nothing.
    NoOp,
}

/// An AgentProgram maps a percept to an action.
///
/// If the program wants to implement e.g. a table-driven agent, implementations can store all
/// previous percepts. A reflex program does not need to store any state.
///
/// Notice that the program is not aware of its agent nor of the Environment; its only interface
/// is the percept coming in then the action going out. Programs live inside environments, and
/// environments must be cloneable for fair evaluation, so programs must be cloneable too.
pub trait AgentProgram {
    /// What the program senses.
    type Percept;
    /// What the program asks the environment to do.
    type Action;

    /// Decide on an action given the current percept.
    fn act(&mut self, percept: &Self::Percept) -> Self::Action;

    /// Clone into a new box, including any private state.
    fn clone_box(&self) -> BoxedProgram<Self::Percept, Self::Action>;
}

/// A type-erased agent program.
pub type BoxedProgram<_Percept, _Action> =
    Box<dyn AgentProgram<Percept = _Percept, Action = _Action>>;

impl<_Percept, _Action> Clone for BoxedProgram<_Percept, _Action> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

/// Adapts a closure into an [AgentProgram]. Any state lives in the closure's captures.
pub struct ProgramFn<_Percept, _Action, _Fn>
where
    _Fn: FnMut(&_Percept) -> _Action,
{
    f: _Fn,
    phantom: std::marker::PhantomData<fn(&_Percept) -> _Action>,
}

impl<_Percept, _Action, _Fn> ProgramFn<_Percept, _Action, _Fn>
where
    _Fn: FnMut(&_Percept) -> _Action,
{
    /// Wrap a closure.
    pub fn new(f: _Fn) -> Self {
        Self {
            f,
            phantom: std::marker::PhantomData,
        }
    }
}

impl<_Percept, _Action, _Fn> Clone for ProgramFn<_Percept, _Action, _Fn>
where
    _Fn: FnMut(&_Percept) -> _Action + Clone,
{
    fn clone(&self) -> Self {
        Self::new(self.f.clone())
    }
}

impl<_Percept, _Action, _Fn> AgentProgram for ProgramFn<_Percept, _Action, _Fn>
where
    _Percept: 'static,
    _Action: 'static,
    _Fn: FnMut(&_Percept) -> _Action + Clone + 'static,
{
    type Percept = _Percept;
    type Action = _Action;

    fn act(&mut self, percept: &Self::Percept) -> Self::Action {
        (self.f)(percept)
    }

    fn clone_box(&self) -> BoxedProgram<Self::Percept, Self::Action> {
        Box::new(self.clone())
    }
}

/// Shorthand for the entity type an environment holds.
pub type EntityOf<_Environment> = Entity<
    <_Environment as Environment>::Location,
    <_Environment as Environment>::Percept,
    <_Environment as Environment>::Action,
>;

/// An Environment runs its agents in a Performance, Environment, Action, Sensing (PEAS) cycle.
///
/// Implementations must say what an agent perceives ([Environment::percept]) and what an action
/// does to the world ([Environment::execute_action]); the latter is also where the agent's
/// performance measure is updated. Everything else has a default.
///
/// The environment keeps every registered entity in its [World], in registration order. Agents
/// are the entities that carry a program; they are a subsequence of the objects.
pub trait Environment {
    /// Where an entity can be. Non-spatial environments can use any small type.
    type Location: Clone + PartialEq + Debug;
    /// What an agent senses at the start of a tick.
    type Percept;
    /// What an agent's program hands back.
    type Action: Debug;

    /// The registry of everything in the environment.
    fn world(&self) -> &World<Self::Location, Self::Percept, Self::Action>;
    /// Mutable access to the registry.
    fn world_mut(&mut self) -> &mut World<Self::Location, Self::Percept, Self::Action>;

    /// The kinds of entity that can be placed into this environment, e.g. by an interactive
    /// front end.
    fn object_classes(&self) -> Vec<EntityClass<Self::Location, Self::Percept, Self::Action>> {
        Vec::new()
    }

    /// Return the percept that the agent sees at this point.
    fn percept(&self, agent: EntityKey) -> Self::Percept;

    /// Change the world to reflect this action, and update the agent's performance.
    fn execute_action(&mut self, agent: EntityKey, action: Self::Action);

    /// Location for a new entity when none is given to [Environment::add_object].
    fn default_location(&mut self, _entity: &EntityOf<Self>) -> Option<Self::Location> {
        None
    }

    /// Spontaneous change in the world, applied once per tick after all actions.
    fn exogenous_change(&mut self) {}

    /// We're done when no registered agent is alive.
    fn is_done(&self) -> bool {
        !self.world().any_agent_alive()
    }

    /// Run the environment for one time step.
    ///
    /// Every agent perceives the world as it was at the start of the tick. Only then are the
    /// actions applied, one agent at a time in registration order, followed by the exogenous
    /// change.
    fn step(&mut self) {
        if self.is_done() {
            return;
        }
        let agents = self.world().agents().to_vec();
        let percepts: Vec<Self::Percept> =
            agents.iter().map(|&agent| self.percept(agent)).collect();

        let mut decisions = Vec::with_capacity(agents.len());
        for (agent, percept) in agents.into_iter().zip(percepts.iter()) {
            if let Some(action) = self.world_mut().decide(agent, percept) {
                decisions.push((agent, action));
            }
        }

        trace!(agents = decisions.len(), "applying actions");
        for (agent, action) in decisions {
            self.execute_action(agent, action);
        }
        self.exogenous_change();
    }

    /// Run the environment for at most `steps` time steps. Returns how many steps were taken.
    fn run(&mut self, steps: usize) -> usize {
        for step in 0..steps {
            if self.is_done() {
                debug!(step, "no agent is alive, stopping early");
                return step;
            }
            self.step();
        }
        steps
    }

    /// Add an entity to the environment, setting its location. Agents get their performance
    /// measure reset to zero.
    fn add_object(
        &mut self,
        entity: EntityOf<Self>,
        location: Option<Self::Location>,
    ) -> EntityKey {
        let location = match location {
            Some(location) => Some(location),
            None => self.default_location(&entity),
        };
        self.world_mut().insert(entity, location)
    }

    /// Like [Environment::add_object] but hands the environment back, for chaining.
    fn with_object(mut self, entity: EntityOf<Self>, location: Option<Self::Location>) -> Self
    where
        Self: Sized,
    {
        self.add_object(entity, location);
        self
    }
}
