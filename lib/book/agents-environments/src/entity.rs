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

//! Physical things that can appear in an environment, and the agent state some of them carry.

use std::fmt::Debug;

use serde::{Deserialize, Serialize};
use slotmap::new_key_type;

use crate::spatial::Heading;
use crate::{AgentProgram, BoxedProgram, HashSet, Int};

new_key_type! {
    /// Identifies an entity within one environment. Keys stay valid in clones of the
    /// environment, so the same key names the corresponding entity in every copy.
    pub struct EntityKey;
}

/// Something an entity can do or be, checked by environments instead of asking what concrete
/// kind of entity it is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Capability {
    /// Blocks movement into the cell it occupies.
    Obstacle,
    /// Can be sucked up by a vacuum.
    Dirt,
    /// Can be picked up by an agent.
    Grabable,
}

/// Any physical object that can appear in an Environment.
///
/// `kind` is what other agents perceive when they sense this entity, `name` is only for display.
/// Entities without a liveness flag are inanimate and never count as alive.
#[derive(Debug, Clone)]
pub struct Entity<_Location, _Percept, _Action> {
    name: String,
    kind: &'static str,
    capabilities: HashSet<Capability>,
    image: Option<&'static str>,
    alive: Option<bool>,
    /// Where the entity is. `None` means it has no location, e.g. it is being carried.
    pub location: Option<_Location>,
    agent: Option<AgentBody<_Percept, _Action>>,
}

impl<_Location, _Percept, _Action> Entity<_Location, _Percept, _Action> {
    /// An inanimate thing of the given kind.
    pub fn thing(kind: &'static str) -> Self {
        Self {
            name: kind.to_string(),
            kind,
            capabilities: HashSet::default(),
            image: None,
            alive: None,
            location: None,
            agent: None,
        }
    }

    /// Something that causes a bump, preventing an agent from moving into its square.
    pub fn wall() -> Self {
        Self::thing("Wall").with_capability(Capability::Obstacle)
    }

    /// Dirt for vacuum worlds.
    pub fn dirt() -> Self {
        Self::thing("Dirt")
            .with_capability(Capability::Dirt)
            .with_image("images/dirt.png")
    }

    /// An agent of the given kind, driven by `program`. Agents start alive, not bumped, facing
    /// East and holding nothing.
    pub fn agent<_Program>(kind: &'static str, program: _Program) -> Self
    where
        _Program: AgentProgram<Percept = _Percept, Action = _Action> + 'static,
    {
        Self::agent_boxed(kind, Box::new(program))
    }

    /// Like [Entity::agent] for an already boxed program.
    pub fn agent_boxed(kind: &'static str, program: BoxedProgram<_Percept, _Action>) -> Self {
        let mut entity = Self::thing(kind);
        entity.alive = Some(true);
        entity.agent = Some(AgentBody::new(program));
        entity
    }

    pub fn with_capability(mut self, capability: Capability) -> Self {
        self.capabilities.insert(capability);
        self
    }

    pub fn with_image(mut self, image: &'static str) -> Self {
        self.image = Some(image);
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &'static str {
        self.kind
    }

    /// Image resource identifier for display, if any.
    pub fn image(&self) -> Option<&'static str> {
        self.image
    }

    pub fn has(&self, capability: Capability) -> bool {
        self.capabilities.contains(&capability)
    }

    /// Entities that are 'alive' return true. Inanimate entities are never alive.
    pub fn is_alive(&self) -> bool {
        self.alive == Some(true)
    }

    /// Mark the entity alive or not. This is how an agent is marked finished.
    pub fn set_alive(&mut self, alive: bool) {
        self.alive = Some(alive);
    }

    pub fn is_agent(&self) -> bool {
        self.agent.is_some()
    }

    pub fn body(&self) -> Option<&AgentBody<_Percept, _Action>> {
        self.agent.as_ref()
    }

    pub fn body_mut(&mut self) -> Option<&mut AgentBody<_Percept, _Action>> {
        self.agent.as_mut()
    }

    /// Take the program out of an agent, e.g. to wrap it. Returns the entity unchanged when it
    /// is not an agent.
    pub fn map_program<_Fn>(mut self, f: _Fn) -> Self
    where
        _Fn: FnOnce(&str, BoxedProgram<_Percept, _Action>) -> BoxedProgram<_Percept, _Action>,
    {
        if let Some(body) = self.agent.take() {
            let AgentBody {
                program,
                bump,
                performance,
                heading,
                holding,
            } = body;
            self.agent = Some(AgentBody {
                program: f(&self.name, program),
                bump,
                performance,
                heading,
                holding,
            });
        }
        self
    }
}

/// The parts of an agent the environment keeps track of, alongside the program itself.
///
/// The program is private. The environment asks it for decisions through
/// [crate::World::decide] and can't look inside it; the program only ever sees percepts.
#[derive(Clone)]
pub struct AgentBody<_Percept, _Action> {
    program: BoxedProgram<_Percept, _Action>,
    /// Set by the environment after a movement attempt: true iff the last move was blocked.
    pub bump: bool,
    /// Cumulative performance measure. Zeroed when the agent is registered.
    pub performance: Int,
    /// Facing direction in spatial environments.
    pub heading: Heading,
    /// Entities carried, oldest first.
    pub holding: Vec<EntityKey>,
}

impl<_Percept, _Action> AgentBody<_Percept, _Action> {
    fn new(program: BoxedProgram<_Percept, _Action>) -> Self {
        Self {
            program,
            bump: false,
            performance: 0,
            heading: Heading::East,
            holding: Vec::new(),
        }
    }

    pub(crate) fn act(&mut self, percept: &_Percept) -> _Action {
        self.program.act(percept)
    }
}

impl<_Percept, _Action> Debug for AgentBody<_Percept, _Action> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AgentBody")
            .field("bump", &self.bump)
            .field("performance", &self.performance)
            .field("heading", &self.heading)
            .field("holding", &self.holding)
            .finish_non_exhaustive()
    }
}

/// A kind of entity an interactive front end can create with no arguments.
pub struct EntityClass<_Location, _Percept, _Action> {
    pub name: &'static str,
    pub image: Option<&'static str>,
    pub make: fn() -> Entity<_Location, _Percept, _Action>,
}

impl<_Location, _Percept, _Action> EntityClass<_Location, _Percept, _Action> {
    pub fn new(name: &'static str, make: fn() -> Entity<_Location, _Percept, _Action>) -> Self {
        Self {
            name,
            image: make().image(),
            make,
        }
    }
}
