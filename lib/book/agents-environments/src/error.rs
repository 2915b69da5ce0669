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

use crate::{Float, Int};

/// Errors from building environments or running evaluations.
#[derive(Debug, thiserror::Error)]
pub enum AgentsError {
    /// Grid dimensions must both be positive.
    #[error("grid must be at least 1x1, got {width}x{height}")]
    InvalidGrid { width: Int, height: Int },

    /// Perception radius can't be negative.
    #[error("perception radius must not be negative: {0}")]
    InvalidRadius(Int),

    /// Probability outside of [0, 1].
    #[error("probability must be within [0, 1]: {0}")]
    InvalidProbability(Float),

    /// A random program has nothing to choose from.
    #[error("a random program needs at least one action")]
    NoActions,

    /// An evaluation needs at least one environment to average over.
    #[error("at least one environment instance is required")]
    NoEnvironments,

    /// Configuration could not be parsed.
    #[error("malformed configuration: {0}")]
    Config(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, AgentsError>;
