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

use std::fmt::Debug;

use tracing::info;

use crate::entity::Entity;
use crate::{AgentProgram, BoxedProgram};

/// Wraps an agent's program to log its input and output. This lets you see what the agent is
/// doing in the environment.
pub struct TraceProgram<_Percept, _Action> {
    agent: String,
    inner: BoxedProgram<_Percept, _Action>,
}

impl<_Percept, _Action> TraceProgram<_Percept, _Action> {
    pub fn new(agent: impl Into<String>, inner: BoxedProgram<_Percept, _Action>) -> Self {
        Self {
            agent: agent.into(),
            inner,
        }
    }
}

impl<_Percept, _Action> Clone for TraceProgram<_Percept, _Action> {
    fn clone(&self) -> Self {
        Self {
            agent: self.agent.clone(),
            inner: self.inner.clone(),
        }
    }
}

impl<_Percept, _Action> AgentProgram for TraceProgram<_Percept, _Action>
where
    _Percept: Debug + 'static,
    _Action: Debug + 'static,
{
    type Percept = _Percept;
    type Action = _Action;

    fn act(&mut self, percept: &Self::Percept) -> Self::Action {
        let action = self.inner.act(percept);
        info!(agent = %self.agent, ?percept, ?action, "perceives and does");
        action
    }

    fn clone_box(&self) -> BoxedProgram<Self::Percept, Self::Action> {
        Box::new(self.clone())
    }
}

/// Wrap the agent's program in a [TraceProgram]. Non-agents are returned unchanged.
pub fn trace_agent<_Location, _Percept, _Action>(
    entity: Entity<_Location, _Percept, _Action>,
) -> Entity<_Location, _Percept, _Action>
where
    _Percept: Debug + 'static,
    _Action: Debug + 'static,
{
    entity.map_program(|name, program| Box::new(TraceProgram::new(name, program)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::programs::{reflex_vacuum_agent, ReflexVacuumProgram};
    use crate::trivial_vacuum::{Square, TrivialPercept, TrivialVacuumEnvironment};
    use crate::vacuum_world::SquareState;
    use crate::{Action, Environment};

    #[test]
    fn test_traced_program_acts_like_inner() {
        let mut traced: TraceProgram<TrivialPercept, Action> =
            TraceProgram::new("reflex", Box::new(ReflexVacuumProgram::new()));
        let percept = TrivialPercept {
            location: Square::B,
            square_state: SquareState::Clean,
        };
        assert_eq!(traced.act(&percept), Action::Left);
    }

    #[test]
    fn test_trace_agent_keeps_behaviour() {
        let mut env =
            TrivialVacuumEnvironment::with_squares(SquareState::Dirty, SquareState::Dirty, 0);
        let agent = env.add_object(trace_agent(reflex_vacuum_agent()), Some(Square::A));
        env.run(4);
        assert_eq!(env.world().performance(agent), Some(18));
        assert_eq!(
            env.world().entity(agent).unwrap().kind(),
            "ReflexVacuumAgent"
        );
    }
}
