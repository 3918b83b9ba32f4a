//! Mobile agents and their handles.
//!
//! An [`Agent`] only carries what the agent itself knows before it joins a
//! simulation: preferences for its identifier, start vertex and latency,
//! plus a free-text status used by its own decision logic. Everything the
//! simulation tracks about it (position, last move, port back, ...) lives
//! in the [`AgentRegistry`](crate::AgentRegistry).

use mas_graph::VertexKey;
use std::fmt;

/// Handle to an agent inside one simulation.
///
/// Handles are issued by the simulation in registration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AgentId(usize);

impl AgentId {
    pub(crate) fn new(index: usize) -> Self {
        Self(index)
    }

    /// Registration index of the agent.
    pub fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "agent#{}", self.0)
    }
}

/// A mobile agent's preferences and self-owned state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Agent {
    desired_id: Option<u64>,
    desired_position: Option<VertexKey>,
    desired_latency: Option<u32>,
    status: String,

    /// Moves confirmed legal by the simulation
    moves: u64,
}

impl Agent {
    /// Creates an agent with no preference: identifier, start vertex and
    /// latency are drawn when it joins a simulation.
    pub fn new() -> Self {
        Self::default()
    }

    /// Prefers the given identifier (replaced if already taken).
    pub fn with_id(mut self, id: u64) -> Self {
        self.desired_id = Some(id);
        self
    }

    /// Prefers starting on the given vertex.
    pub fn with_position(mut self, vertex: VertexKey) -> Self {
        self.desired_position = Some(vertex);
        self
    }

    /// Prefers the given latency. Ignored by asynchronous simulations.
    pub fn with_latency(mut self, latency: u32) -> Self {
        self.desired_latency = Some(latency);
        self
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = status.into();
        self
    }

    pub fn desired_id(&self) -> Option<u64> {
        self.desired_id
    }

    pub fn desired_position(&self) -> Option<VertexKey> {
        self.desired_position
    }

    pub fn desired_latency(&self) -> Option<u32> {
        self.desired_latency
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    /// Total number of legal moves performed.
    pub fn moves_nb(&self) -> u64 {
        self.moves
    }

    pub(crate) fn set_status(&mut self, status: impl Into<String>) {
        self.status = status.into();
    }

    pub(crate) fn record_move(&mut self) {
        self.moves += 1;
    }
}
