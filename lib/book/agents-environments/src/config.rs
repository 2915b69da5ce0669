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

use serde::{Deserialize, Serialize};

use crate::error::{AgentsError, Result};
use crate::{Float, Int};

/// Size and perception settings for a spatial environment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub width: Int,
    pub height: Int,
    /// Agents perceive entities within this Euclidean distance, boundary included.
    pub perception_radius: Int,
}

impl GridConfig {
    pub fn new(width: Int, height: Int, perception_radius: Int) -> Self {
        Self {
            width,
            height,
            perception_radius,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.width <= 0 || self.height <= 0 {
            return Err(AgentsError::InvalidGrid {
                width: self.width,
                height: self.height,
            });
        }
        if self.perception_radius < 0 {
            return Err(AgentsError::InvalidRadius(self.perception_radius));
        }
        Ok(())
    }
}

impl Default for GridConfig {
    fn default() -> Self {
        Self::new(10, 10, 1)
    }
}

/// Settings for the grid vacuum world.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VacuumConfig {
    pub grid: GridConfig,
    /// Chance that each square inside the walls starts with dirt on it.
    pub dirt_probability: Float,
}

impl VacuumConfig {
    pub fn new(grid: GridConfig, dirt_probability: Float) -> Self {
        Self {
            grid,
            dirt_probability,
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.grid.validate()?;
        if !(0.0..=1.0).contains(&self.dirt_probability) {
            return Err(AgentsError::InvalidProbability(self.dirt_probability));
        }
        Ok(())
    }
}

impl Default for VacuumConfig {
    fn default() -> Self {
        Self::new(GridConfig::default(), 0.25)
    }
}

/// How an evaluation with [crate::harness::compare_agents] is run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarnessConfig {
    /// Number of environment instances each agent is run in.
    pub trials: usize,
    /// Step budget per run.
    pub steps: usize,
    /// Seeds the generator that seeds each environment instance.
    pub seed: u64,
}

impl HarnessConfig {
    pub fn new(trials: usize, steps: usize, seed: u64) -> Self {
        Self {
            trials,
            steps,
            seed,
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.trials == 0 {
            return Err(AgentsError::NoEnvironments);
        }
        Ok(())
    }
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self::new(10, 1000, 42)
    }
}
