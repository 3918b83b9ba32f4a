//! Error types for the agent simulation.
//!
//! Only caller-side contract breaches are errors. Illegal moves and
//! queries forbidden by the model degrade to `false` / `None` instead.

use mas_graph::{GraphError, Port, VertexKey};
use thiserror::Error;

/// Errors that can occur while building or driving a simulation.
#[derive(Debug, Error)]
pub enum SimError {
    /// Agent handle does not belong to this simulation
    #[error("Unknown agent: {0}")]
    UnknownAgent(usize),

    /// Vertex key is not part of the topology
    #[error("Unknown vertex: {0}")]
    UnknownVertex(VertexKey),

    /// A start position must be drawn but the topology has no vertex
    #[error("Topology has no vertex to place agents on")]
    EmptyTopology,

    /// Latencies gate moves to multiples of themselves and must be positive
    #[error("Invalid latency: {0}")]
    InvalidLatency(u32),

    /// No candidate latency to draw from
    #[error("No possible latency configured")]
    NoLatencies,

    /// More agents than distinct identifiers can be drawn
    #[error("Cannot assign unique identifiers to {0} agents")]
    TooManyAgents(usize),

    /// Port does not exist at the agent's position
    #[error("No port {port} at vertex {vertex}")]
    NoSuchPort { vertex: VertexKey, port: Port },

    /// Topology import failed
    #[error("Topology error: {0}")]
    Graph(#[from] GraphError),
}

impl SimError {
    /// Creates a missing-port error.
    pub fn no_such_port(vertex: VertexKey, port: Port) -> Self {
        Self::NoSuchPort { vertex, port }
    }
}
