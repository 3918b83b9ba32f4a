//! Built-in decision functions.

use crate::context::AgentContext;

use rand::seq::SliceRandom;

/// Never moves.
pub fn nothing(agent: &mut AgentContext<'_>) {
    agent.wait();
}

/// Leaves through a uniformly chosen port.
pub fn random_walk(agent: &mut AgentContext<'_>) {
    let ports = agent.available_ports();
    if let Some(&port) = ports.choose(agent.rng()) {
        agent.move_along(port);
    }
}

/// Rotor-router walk: leaves through the port following the one it
/// entered by, cyclically. Starts with the lowest port.
///
/// On a tree this performs a depth-first traversal.
pub fn rotor_walk(agent: &mut AgentContext<'_>) {
    let ports = agent.available_ports();
    let Some(&lowest) = ports.first() else {
        return;
    };

    let next = agent
        .port_back()
        .and_then(|back| ports.iter().position(|&p| p == back))
        .map(|index| ports[(index + 1) % ports.len()])
        .unwrap_or(lowest);

    agent.move_along(next);
}
