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

//! The vacuum world of exercise 2.12, on a walled grid.
//!
//! The agent perceives dirty or clean, and bump (into an obstacle) or not, but not its location.
//! The performance measure is 100 for each dirt cleaned, and -1 for each action taken.

use rand::{Rng as _, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::VacuumConfig;
use crate::entity::{Capability, Entity, EntityClass, EntityKey};
use crate::error::Result;
use crate::programs;
use crate::spatial::{Point, Spatial};
use crate::{Action, Environment, EntityOf, Int, Rng, World};

pub const DIRT_REWARD: Int = 100;
pub const ACTION_COST: Int = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SquareState {
    Clean,
    Dirty,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BumpStatus {
    Bump,
    None,
}

/// VacuumPercept is what the agent senses each tick: a dirt sensor looking right down, and
/// whether its last move was blocked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VacuumPercept {
    pub square_state: SquareState,
    pub bump: BumpStatus,
}

#[derive(Debug, Clone)]
pub struct VacuumEnvironment {
    grid: Spatial<VacuumPercept>,
}

impl VacuumEnvironment {
    /// A walled grid. Each square inside the walls independently gets dirt with
    /// `config.dirt_probability`.
    pub fn new(config: &VacuumConfig, seed: u64) -> Result<Self> {
        config.validate()?;
        let mut grid = Spatial::new(&config.grid, Rng::seed_from_u64(seed))?;
        grid.add_walls();
        for y in 1..grid.height() - 1 {
            for x in 1..grid.width() - 1 {
                if grid.rng_mut().gen_bool(config.dirt_probability) {
                    grid.world_mut().insert(Entity::dirt(), Some(Point::new(x, y)));
                }
            }
        }
        Ok(Self { grid })
    }

    pub fn grid(&self) -> &Spatial<VacuumPercept> {
        &self.grid
    }

    pub fn grid_mut(&mut self) -> &mut Spatial<VacuumPercept> {
        &mut self.grid
    }

    /// How many pieces of dirt are still on the grid.
    pub fn dirt_remaining(&self) -> usize {
        self.grid
            .world()
            .entities()
            .filter(|(_, entity)| entity.has(Capability::Dirt) && entity.location.is_some())
            .count()
    }

    fn dirt_at(&self, location: Point) -> Option<EntityKey> {
        self.grid.objects_at(location).into_iter().find(|&key| {
            self.grid
                .world()
                .entity(key)
                .map_or(false, |entity| entity.has(Capability::Dirt))
        })
    }
}

impl Environment for VacuumEnvironment {
    type Location = Point;
    type Percept = VacuumPercept;
    type Action = Action;

    fn world(&self) -> &World<Point, VacuumPercept, Action> {
        self.grid.world()
    }

    fn world_mut(&mut self) -> &mut World<Point, VacuumPercept, Action> {
        self.grid.world_mut()
    }

    fn object_classes(&self) -> Vec<EntityClass<Point, VacuumPercept, Action>> {
        vec![
            EntityClass::new("Wall", Entity::wall),
            EntityClass::new("Dirt", Entity::dirt),
            EntityClass::new("GridReflexVacuumAgent", programs::grid_reflex_vacuum_agent),
            EntityClass::new("RandomVacuumAgent", programs::random_grid_vacuum_agent),
        ]
    }

    fn percept(&self, agent: EntityKey) -> VacuumPercept {
        let dirty = self
            .world()
            .location(agent)
            .map_or(false, |&location| self.grid.find_at(Capability::Dirt, location));
        let bumped = self.world().agent(agent).map_or(false, |body| body.bump);
        VacuumPercept {
            square_state: if dirty {
                SquareState::Dirty
            } else {
                SquareState::Clean
            },
            bump: if bumped {
                BumpStatus::Bump
            } else {
                BumpStatus::None
            },
        }
    }

    fn execute_action(&mut self, agent: EntityKey, action: Action) {
        if action == Action::Suck {
            let dirt = self
                .world()
                .location(agent)
                .copied()
                .and_then(|location| self.dirt_at(location));
            if let Some(dirt) = dirt {
                self.world_mut().score(agent, DIRT_REWARD);
                // Sucked-up dirt stays registered but is no longer anywhere.
                if let Some(entity) = self.world_mut().entity_mut(dirt) {
                    entity.location = None;
                }
                debug!(?agent, ?dirt, "sucked up dirt");
            }
        }
        self.world_mut().score(agent, -ACTION_COST);
        match action {
            Action::Suck => self.grid.set_bump(agent, false),
            other => self.grid.execute_action(agent, other),
        }
    }

    fn default_location(&mut self, _entity: &EntityOf<Self>) -> Option<Point> {
        self.grid.random_free_location()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GridConfig;
    use crate::spatial::Heading;
    use crate::ProgramFn;

    fn clean_world(width: Int, height: Int) -> VacuumEnvironment {
        VacuumEnvironment::new(
            &VacuumConfig::new(GridConfig::new(width, height, 1), 0.0),
            0,
        )
        .unwrap()
    }

    fn idle_agent() -> EntityOf<VacuumEnvironment> {
        Entity::agent("Idle", ProgramFn::new(|_: &VacuumPercept| Action::NoOp))
    }

    #[test]
    fn test_vacuum_environment_is_walled() {
        let env = clean_world(4, 4);
        assert_eq!(env.world().len(), 12);
        assert_eq!(env.dirt_remaining(), 0);
        assert!(env.grid().find_at(Capability::Obstacle, Point::new(0, 2)));
    }

    #[test]
    fn test_vacuum_environment_scatters_dirt_inside_walls() {
        let env = VacuumEnvironment::new(
            &VacuumConfig::new(GridConfig::new(5, 4, 1), 1.0),
            3,
        )
        .unwrap();
        assert_eq!(env.dirt_remaining(), 6);
        for (_, entity) in env.world().entities() {
            if entity.has(Capability::Dirt) {
                let location = entity.location.unwrap();
                assert!((1..4).contains(&location.x));
                assert!((1..3).contains(&location.y));
            }
        }
    }

    #[test]
    fn test_vacuum_environment_rejects_bad_config() {
        let config = VacuumConfig::new(GridConfig::new(0, 4, 1), 0.5);
        assert!(VacuumEnvironment::new(&config, 0).is_err());
        let config = VacuumConfig::new(GridConfig::new(4, 4, 1), -0.5);
        assert!(VacuumEnvironment::new(&config, 0).is_err());
    }

    #[test]
    fn test_vacuum_environment_returns_dirty_percept() {
        let mut env = clean_world(4, 4);
        let agent = env.add_object(idle_agent(), Some(Point::new(1, 1)));
        env.add_object(Entity::dirt(), Some(Point::new(1, 1)));
        assert_eq!(
            env.percept(agent),
            VacuumPercept {
                square_state: SquareState::Dirty,
                bump: BumpStatus::None,
            }
        );
    }

    #[test]
    fn test_vacuum_environment_allows_cleaning() {
        let mut env = clean_world(4, 4);
        let agent = env.add_object(idle_agent(), Some(Point::new(1, 1)));
        env.add_object(Entity::dirt(), Some(Point::new(1, 1)));
        env.execute_action(agent, Action::Suck);
        assert_eq!(env.world().performance(agent), Some(DIRT_REWARD - ACTION_COST));
        assert_eq!(env.percept(agent).square_state, SquareState::Clean);
        assert_eq!(env.dirt_remaining(), 0);

        env.execute_action(agent, Action::Suck);
        assert_eq!(
            env.world().performance(agent),
            Some(DIRT_REWARD - 2 * ACTION_COST)
        );
    }

    #[test]
    fn test_vacuum_environment_charges_every_action() {
        let mut env = clean_world(5, 5);
        let agent = env.add_object(idle_agent(), Some(Point::new(2, 2)));
        for action in [
            Action::TurnLeft,
            Action::Forward,
            Action::NoOp,
            Action::Right,
            Action::Grab,
        ] {
            env.execute_action(agent, action);
        }
        assert_eq!(env.world().performance(agent), Some(-5));
        assert_eq!(env.world().location(agent), Some(&Point::new(2, 3)));
        assert_eq!(env.world().agent(agent).unwrap().heading, Heading::North);
    }

    #[test]
    fn test_vacuum_environment_reports_bump() {
        let mut env = clean_world(3, 3);
        let agent = env.add_object(idle_agent(), Some(Point::new(1, 1)));
        env.execute_action(agent, Action::Forward);
        assert_eq!(env.percept(agent).bump, BumpStatus::Bump);
        env.execute_action(agent, Action::Suck);
        assert_eq!(env.percept(agent).bump, BumpStatus::None);
    }

    #[test]
    fn test_vacuum_environment_offers_object_classes() {
        let env = clean_world(3, 3);
        let names: Vec<_> = env.object_classes().iter().map(|class| class.name).collect();
        assert_eq!(
            names,
            vec!["Wall", "Dirt", "GridReflexVacuumAgent", "RandomVacuumAgent"]
        );
    }
}
