//! The agent's view of the simulation during its turn.
//!
//! A decision function never holds the simulation: it receives an
//! [`AgentContext`] scoped to one agent and one turn, and every query or
//! move request goes through it.

use crate::agent::{Agent, AgentId};
use crate::error::SimError;
use crate::simulation::SimState;

use mas_graph::Port;
use rand_chacha::ChaCha8Rng;
use tracing::error;

/// Handle given to the decision function for one agent turn.
pub struct AgentContext<'a> {
    agent: AgentId,
    state: &'a mut SimState,
}

impl<'a> AgentContext<'a> {
    pub(crate) fn new(agent: AgentId, state: &'a mut SimState) -> Self {
        Self { agent, state }
    }

    /// Handle of the agent whose turn it is.
    pub fn handle(&self) -> AgentId {
        self.agent
    }

    /// The agent's own record (preferences, status, move count).
    pub fn agent(&self) -> &Agent {
        &self.state.agents[self.agent.index()]
    }

    /// Ports leaving the current vertex, ascending.
    pub fn available_ports(&self) -> Vec<Port> {
        settle(self.state.available_ports(self.agent))
    }

    /// Unique identifier, or `None` when agents are anonymous.
    pub fn id(&self) -> Option<u64> {
        settle(self.state.id(self.agent))
    }

    /// Port at the current vertex leading back to the previous one.
    pub fn port_back(&self) -> Option<Port> {
        settle(self.state.registry.port_back(self.agent))
    }

    /// Dense identifier of the current vertex, or `None` when the topology
    /// is anonymous.
    pub fn position_id(&self) -> Option<usize> {
        settle(self.state.position_id(self.agent))
    }

    /// Current round, or `None` when the simulation is asynchronous.
    pub fn sim_step(&self) -> Option<u64> {
        settle(self.state.sim_step(self.agent))
    }

    /// Whether another agent shares the current vertex.
    ///
    /// In a synchronous round this reflects the state at the start of the
    /// round.
    pub fn position_contains_mate(&self) -> bool {
        settle(self.state.registry.contains_mate(self.agent))
    }

    pub fn moves_nb(&self) -> u64 {
        self.agent().moves_nb()
    }

    pub fn status(&self) -> &str {
        self.agent().status()
    }

    /// Replaces the agent's status.
    pub fn set_status(&mut self, status: impl Into<String>) {
        self.state.agents[self.agent.index()].set_status(status);
    }

    /// Requests a move through `port`. Returns whether the move was legal.
    ///
    /// A legal move is applied at once in an asynchronous round and at the
    /// end of the round otherwise.
    pub fn move_along(&mut self, port: Port) -> bool {
        settle(self.state.ask_for_moving(self.agent, port))
    }

    /// Ends the turn without moving.
    pub fn wait(&mut self) {}

    /// The simulation's random source, for randomized decisions that stay
    /// reproducible from the run seed.
    pub fn rng(&mut self) -> &mut ChaCha8Rng {
        &mut self.state.rng
    }
}

/// Contexts only exist for registered agents, so failures here mean the
/// simulation state itself is corrupt.
fn settle<T: Default>(result: Result<T, SimError>) -> T {
    result.unwrap_or_else(|e| {
        error!(error = %e, "agent query failed");
        T::default()
    })
}

#[cfg(test)]
mod tests {
    use crate::agent::Agent;
    use crate::context::AgentContext;
    use crate::simulation::{SimConfig, Simulation};
    use mas_graph::generators;
    use rand::Rng;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_status_changes_persist() {
        let mut sim = Simulation::new(generators::path(2), SimConfig::default(), |agent: &mut AgentContext<'_>| {
            let next = format!("{}x", agent.status());
            agent.set_status(next);
        })
        .unwrap();

        sim.run(3).unwrap();
        assert_eq!(sim.agents()[0].status(), "xxx");
    }

    #[test]
    fn test_context_queries() {
        let g = generators::path(3);
        let middle = g.keys()[1];
        let seen = Rc::new(RefCell::new(Vec::new()));
        let log = Rc::clone(&seen);

        let agents = vec![Agent::new().with_id(4).with_position(middle)];
        let mut sim = Simulation::with_agents(g, agents, SimConfig::default(), move |agent: &mut AgentContext<'_>| {
            log.borrow_mut().push((
                agent.handle().index(),
                agent.id(),
                agent.position_id(),
                agent.sim_step(),
                agent.available_ports(),
                agent.moves_nb(),
            ));
            agent.wait();
        })
        .unwrap();

        sim.run(2).unwrap();
        assert_eq!(
            *seen.borrow(),
            vec![
                (0, Some(4), Some(1), Some(1), vec![0, 1], 0),
                (0, Some(4), Some(1), Some(2), vec![0, 1], 0),
            ]
        );
    }

    #[test]
    fn test_rng_is_seeded_by_run() {
        let draws = |seed: u64| {
            let out = Rc::new(RefCell::new(Vec::new()));
            let log = Rc::clone(&out);
            let config = SimConfig {
                seed,
                ..Default::default()
            };
            let mut sim = Simulation::new(generators::path(2), config, move |agent: &mut AgentContext<'_>| {
                log.borrow_mut().push(agent.rng().gen_range(0..1000u32));
            })
            .unwrap();
            sim.run(5).unwrap();
            let values = out.borrow().clone();
            values
        };

        assert_eq!(draws(3), draws(3));
        assert_ne!(draws(3), draws(4));
    }
}
