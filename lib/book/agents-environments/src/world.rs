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

use slotmap::SlotMap;

use crate::entity::{AgentBody, Entity, EntityKey};
use crate::Int;

/// The registry of everything in an environment.
///
/// Entities are stored in an arena and keyed by [EntityKey]. The registry also remembers the
/// order entities were added in, and which of them are agents. That order matters: agents act in
/// it, and location queries report in it.
#[derive(Debug, Clone)]
pub struct World<_Location, _Percept, _Action> {
    entities: SlotMap<EntityKey, Entity<_Location, _Percept, _Action>>,
    objects: Vec<EntityKey>,
    agents: Vec<EntityKey>,
}

impl<_Location, _Percept, _Action> Default for World<_Location, _Percept, _Action> {
    fn default() -> Self {
        Self {
            entities: SlotMap::with_key(),
            objects: Vec::new(),
            agents: Vec::new(),
        }
    }
}

impl<_Location, _Percept, _Action> World<_Location, _Percept, _Action> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an entity at `location`. Agents have their performance measure set to zero.
    pub fn insert(
        &mut self,
        mut entity: Entity<_Location, _Percept, _Action>,
        location: Option<_Location>,
    ) -> EntityKey {
        entity.location = location;
        let is_agent = match entity.body_mut() {
            Some(body) => {
                body.performance = 0;
                true
            }
            None => false,
        };
        let key = self.entities.insert(entity);
        self.objects.push(key);
        if is_agent {
            self.agents.push(key);
        }
        key
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// All entity keys in registration order.
    pub fn objects(&self) -> impl Iterator<Item = EntityKey> + '_ {
        self.objects.iter().copied()
    }

    /// All entities in registration order.
    pub fn entities(
        &self,
    ) -> impl Iterator<Item = (EntityKey, &Entity<_Location, _Percept, _Action>)> + '_ {
        self.objects.iter().map(|&key| (key, &self.entities[key]))
    }

    /// Agent keys in registration order.
    pub fn agents(&self) -> &[EntityKey] {
        &self.agents
    }

    pub fn entity(&self, key: EntityKey) -> Option<&Entity<_Location, _Percept, _Action>> {
        self.entities.get(key)
    }

    pub fn entity_mut(
        &mut self,
        key: EntityKey,
    ) -> Option<&mut Entity<_Location, _Percept, _Action>> {
        self.entities.get_mut(key)
    }

    pub fn agent(&self, key: EntityKey) -> Option<&AgentBody<_Percept, _Action>> {
        self.entities.get(key)?.body()
    }

    pub fn agent_mut(&mut self, key: EntityKey) -> Option<&mut AgentBody<_Percept, _Action>> {
        self.entities.get_mut(key)?.body_mut()
    }

    pub fn location(&self, key: EntityKey) -> Option<&_Location> {
        self.entities.get(key)?.location.as_ref()
    }

    pub fn performance(&self, key: EntityKey) -> Option<Int> {
        self.agent(key).map(|body| body.performance)
    }

    /// Add `delta` to an agent's performance measure. Does nothing for non-agents.
    pub fn score(&mut self, key: EntityKey, delta: Int) {
        if let Some(body) = self.agent_mut(key) {
            body.performance += delta;
        }
    }

    pub fn any_agent_alive(&self) -> bool {
        self.agents
            .iter()
            .any(|&key| self.entities.get(key).map_or(false, Entity::is_alive))
    }

    /// Ask an agent's program what to do about `percept`. `None` if `key` is not an agent.
    pub fn decide(&mut self, key: EntityKey, percept: &_Percept) -> Option<_Action> {
        self.agent_mut(key).map(|body| body.act(percept))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Action, ProgramFn};

    type TestWorld = World<(Int, Int), (), Action>;

    #[test]
    fn test_agents_are_an_ordered_subsequence_of_objects() {
        let mut world = TestWorld::new();
        let a = world.insert(
            Entity::agent("A", ProgramFn::new(|_: &()| Action::NoOp)),
            Some((0, 0)),
        );
        let wall = world.insert(Entity::wall(), Some((1, 0)));
        let b = world.insert(
            Entity::agent("B", ProgramFn::new(|_: &()| Action::Suck)),
            None,
        );
        assert_eq!(world.objects().collect::<Vec<_>>(), vec![a, wall, b]);
        assert_eq!(world.agents(), &[a, b]);
        assert_eq!(world.location(wall), Some(&(1, 0)));
        assert_eq!(world.location(b), None);
        assert_eq!(world.decide(b, &()), Some(Action::Suck));
        assert_eq!(world.decide(wall, &()), None);
    }

    #[test]
    fn test_score_only_touches_agents() {
        let mut world = TestWorld::new();
        let agent = world.insert(
            Entity::agent("A", ProgramFn::new(|_: &()| Action::NoOp)),
            None,
        );
        let rock = world.insert(Entity::thing("Rock"), None);
        world.score(agent, 10);
        world.score(agent, -1);
        world.score(rock, 5);
        assert_eq!(world.performance(agent), Some(9));
        assert_eq!(world.performance(rock), None);
    }

    #[test]
    fn test_clone_is_independent() {
        let mut world = TestWorld::new();
        let agent = world.insert(
            Entity::agent("A", ProgramFn::new(|_: &()| Action::NoOp)),
            Some((0, 0)),
        );
        let mut copy = world.clone();
        copy.score(agent, 3);
        copy.entity_mut(agent).unwrap().location = Some((5, 5));
        assert_eq!(world.performance(agent), Some(0));
        assert_eq!(world.location(agent), Some(&(0, 0)));
        assert_eq!(copy.location(agent), Some(&(5, 5)));
    }
}
