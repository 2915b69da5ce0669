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

//! Environments on a 2D grid.
//!
//! Locations are `(x, y)` points. Agents face one of four headings, move forward along it, bump
//! into obstacles, grab and release things, and perceive whatever is within a radius of them.

use rand::{Rng as _, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::GridConfig;
use crate::entity::{Capability, Entity, EntityClass, EntityKey};
use crate::error::Result;
use crate::{Action, Environment, EntityOf, Int, Rng, World};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: Int,
    pub y: Int,
}

impl Point {
    pub fn new(x: Int, y: Int) -> Self {
        Self { x, y }
    }

    /// The neighbouring point in the direction of `heading`.
    pub fn offset(self, heading: Heading) -> Self {
        let (dx, dy) = heading.vector();
        Self::new(self.x + dx, self.y + dy)
    }

    /// Widened to `i64` so that points anywhere in a valid grid never overflow.
    pub fn distance_squared(self, other: Point) -> i64 {
        let dx = i64::from(self.x) - i64::from(other.x);
        let dy = i64::from(self.y) - i64::from(other.y);
        dx * dx + dy * dy
    }
}

/// One of the four canonical grid directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Heading {
    East,
    North,
    West,
    South,
}

impl Heading {
    /// Counter-clockwise order, starting East. Turning left is a step forward in this cycle.
    pub const ALL: [Heading; 4] = [Heading::East, Heading::North, Heading::West, Heading::South];

    pub fn vector(self) -> (Int, Int) {
        match self {
            Heading::East => (1, 0),
            Heading::North => (0, 1),
            Heading::West => (-1, 0),
            Heading::South => (0, -1),
        }
    }

    pub fn turn_left(self) -> Self {
        self.turn(1)
    }

    pub fn turn_right(self) -> Self {
        self.turn(-1)
    }

    fn turn(self, increment: isize) -> Self {
        let len = Self::ALL.len() as isize;
        let index = Self::ALL
            .iter()
            .position(|&heading| heading == self)
            .unwrap_or_default() as isize;
        Self::ALL[(index + increment).rem_euclid(len) as usize]
    }
}

/// The spatial engine shared by every grid environment.
///
/// It owns the registry, the grid bounds and the random number generator used for default
/// placement, and implements the default perception and action semantics. Concrete
/// environments wrap it and override what they need.
#[derive(Debug, Clone)]
pub struct Spatial<_Percept> {
    world: World<Point, _Percept, Action>,
    width: Int,
    height: Int,
    perception_radius: Int,
    rng: Rng,
}

impl<_Percept> Spatial<_Percept> {
    pub fn new(config: &GridConfig, rng: Rng) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            world: World::new(),
            width: config.width,
            height: config.height,
            perception_radius: config.perception_radius,
            rng,
        })
    }

    pub fn world(&self) -> &World<Point, _Percept, Action> {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World<Point, _Percept, Action> {
        &mut self.world
    }

    pub fn width(&self) -> Int {
        self.width
    }

    pub fn height(&self) -> Int {
        self.height
    }

    pub fn perception_radius(&self) -> Int {
        self.perception_radius
    }

    pub fn rng_mut(&mut self) -> &mut Rng {
        &mut self.rng
    }

    /// A uniformly random point inside the grid.
    pub fn random_location(&mut self) -> Point {
        let x = self.rng.gen_range(0..self.width);
        let y = self.rng.gen_range(0..self.height);
        Point::new(x, y)
    }

    /// Whether `location` is inside the grid.
    pub fn contains(&self, location: Point) -> bool {
        (0..self.width).contains(&location.x) && (0..self.height).contains(&location.y)
    }

    /// A random cell with no obstacle in it, if a few tries find one.
    pub fn random_free_location(&mut self) -> Option<Point> {
        let tries = usize::try_from(self.width)
            .unwrap_or_default()
            .saturating_mul(usize::try_from(self.height).unwrap_or_default())
            .saturating_mul(4);
        for _ in 0..tries {
            let location = self.random_location();
            if !self.find_at(Capability::Obstacle, location) {
                return Some(location);
            }
        }
        None
    }

    /// All entities exactly at `location`, in registration order.
    pub fn objects_at(&self, location: Point) -> Vec<EntityKey> {
        self.world
            .entities()
            .filter(|(_, entity)| entity.location == Some(location))
            .map(|(key, _)| key)
            .collect()
    }

    /// Whether anything at `location` has `capability`.
    pub fn find_at(&self, capability: Capability, location: Point) -> bool {
        self.world
            .entities()
            .any(|(_, entity)| entity.location == Some(location) && entity.has(capability))
    }

    /// All entities within `radius` of `location`, boundary included, in registration order.
    pub fn objects_near(&self, location: Point, radius: Int) -> Vec<EntityKey> {
        let radius_squared = i64::from(radius).pow(2);
        self.world
            .entities()
            .filter(|(_, entity)| {
                entity
                    .location
                    .map_or(false, |other| location.distance_squared(other) <= radius_squared)
            })
            .map(|(key, _)| key)
            .collect()
    }

    /// The default percept: the kind of every entity within the perception radius of the agent.
    pub fn kinds_near(&self, agent: EntityKey) -> Vec<&'static str> {
        let Some(&location) = self.world.location(agent) else {
            return Vec::new();
        };
        self.objects_near(location, self.perception_radius)
            .into_iter()
            .filter_map(|key| self.world.entity(key).map(|entity| entity.kind()))
            .collect()
    }

    /// The default action semantics: turning, moving forward, grabbing and releasing.
    ///
    /// Afterwards the agent's bump flag is set iff the action was a blocked `Forward`.
    pub fn execute_action(&mut self, agent: EntityKey, action: Action) {
        let mut bumped = false;
        match action {
            Action::TurnRight => self.turn(agent, Heading::turn_right),
            Action::TurnLeft => self.turn(agent, Heading::turn_left),
            Action::Forward => bumped = self.forward(agent),
            Action::Grab => self.grab(agent),
            Action::Release => self.release(agent),
            Action::NoOp => {}
            Action::Suck | Action::Right | Action::Left => {
                debug!(?agent, ?action, "ignoring action a grid world doesn't know");
            }
        }
        self.set_bump(agent, bumped);
    }

    pub fn set_bump(&mut self, agent: EntityKey, bump: bool) {
        if let Some(body) = self.world.agent_mut(agent) {
            body.bump = bump;
        }
    }

    /// Move an entity to `destination` unless an obstacle is there or it is off the grid.
    /// Returns whether it bumped.
    pub fn move_to(&mut self, key: EntityKey, destination: Point) -> bool {
        let bumped =
            !self.contains(destination) || self.find_at(Capability::Obstacle, destination);
        if bumped {
            debug!(?key, ?destination, "bumped");
        } else {
            debug!(?key, ?destination, "moving");
            if let Some(entity) = self.world.entity_mut(key) {
                entity.location = Some(destination);
            }
        }
        self.set_bump(key, bumped);
        bumped
    }

    /// Put walls around the entire perimeter of the grid.
    pub fn add_walls(&mut self) {
        for y in 0..self.height {
            for x in 0..self.width {
                if x == 0 || y == 0 || x == self.width - 1 || y == self.height - 1 {
                    self.world.insert(Entity::wall(), Some(Point::new(x, y)));
                }
            }
        }
    }

    fn turn(&mut self, agent: EntityKey, turn: fn(Heading) -> Heading) {
        if let Some(body) = self.world.agent_mut(agent) {
            body.heading = turn(body.heading);
        }
    }

    fn forward(&mut self, agent: EntityKey) -> bool {
        let Some(entity) = self.world.entity(agent) else {
            return false;
        };
        let (Some(location), Some(body)) = (entity.location, entity.body()) else {
            return false;
        };
        let destination = location.offset(body.heading);
        self.move_to(agent, destination)
    }

    /// Pick up the first grabable thing at the agent's location. It leaves the grid while held.
    fn grab(&mut self, agent: EntityKey) {
        let Some(&location) = self.world.location(agent) else {
            return;
        };
        let target = self.objects_at(location).into_iter().find(|&key| {
            key != agent
                && self
                    .world
                    .entity(key)
                    .map_or(false, |entity| entity.has(Capability::Grabable))
        });
        let Some(target) = target else {
            return;
        };
        if let Some(entity) = self.world.entity_mut(target) {
            entity.location = None;
        }
        if let Some(body) = self.world.agent_mut(agent) {
            body.holding.push(target);
        }
        debug!(?agent, ?target, "grabbed");
    }

    /// Put down the most recently grabbed thing at the agent's location.
    fn release(&mut self, agent: EntityKey) {
        let location = self.world.location(agent).copied();
        let Some(target) = self.world.agent_mut(agent).and_then(|body| body.holding.pop()) else {
            return;
        };
        if let Some(entity) = self.world.entity_mut(target) {
            entity.location = location;
        }
        debug!(?agent, ?target, ?location, "released");
    }
}

/// What an agent perceives in a plain [XyEnvironment]: the kinds of the nearby entities.
pub type XyPercept = Vec<&'static str>;

/// A grid environment with the default spatial semantics and no scoring of its own.
#[derive(Debug, Clone)]
pub struct XyEnvironment {
    grid: Spatial<XyPercept>,
}

impl XyEnvironment {
    pub fn new(config: &GridConfig, seed: u64) -> Result<Self> {
        Ok(Self {
            grid: Spatial::new(config, Rng::seed_from_u64(seed))?,
        })
    }

    pub fn grid(&self) -> &Spatial<XyPercept> {
        &self.grid
    }

    pub fn grid_mut(&mut self) -> &mut Spatial<XyPercept> {
        &mut self.grid
    }
}

impl Environment for XyEnvironment {
    type Location = Point;
    type Percept = XyPercept;
    type Action = Action;

    fn world(&self) -> &World<Point, XyPercept, Action> {
        self.grid.world()
    }

    fn world_mut(&mut self) -> &mut World<Point, XyPercept, Action> {
        self.grid.world_mut()
    }

    fn object_classes(&self) -> Vec<EntityClass<Point, XyPercept, Action>> {
        vec![
            EntityClass::new("Wall", Entity::wall),
            EntityClass::new("Dirt", Entity::dirt),
        ]
    }

    fn percept(&self, agent: EntityKey) -> XyPercept {
        self.grid.kinds_near(agent)
    }

    fn execute_action(&mut self, agent: EntityKey, action: Action) {
        self.grid.execute_action(agent, action);
    }

    fn default_location(&mut self, _entity: &EntityOf<Self>) -> Option<Point> {
        Some(self.grid.random_location())
    }
}
