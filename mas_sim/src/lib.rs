//! Mobile agent simulation over port-labeled graphs.
//!
//! Agents walk a [`PortGraph`](mas_graph::PortGraph) in discrete rounds.
//! Each round, every agent runs a user-supplied decision function that may
//! request one move through a local port of its current vertex.
//!
//! # Models
//!
//! - **Synchronous**: agents play in registration order, a move is only
//!   allowed on rounds that are multiples of the agent's latency, and all
//!   legal moves of a round are committed together at its end.
//! - **Asynchronous**: agents play in a fresh random order, each one misses
//!   its turn with probability [`ASYNC_SKIP_PROBABILITY`], and legal moves
//!   take effect immediately.
//!
//! Agents may additionally be *anonymous* (no identifier) and the topology
//! may be *anonymous* (no vertex identifier).
//!
//! # Usage
//!
//! ```
//! use mas_graph::generators;
//! use mas_sim::{algorithms, SimConfig, Simulation};
//!
//! let config = SimConfig {
//!     seed: 7,
//!     agents_number: 3,
//!     ..Default::default()
//! };
//!
//! let mut sim = Simulation::new(generators::cycle(8), config, algorithms::random_walk).unwrap();
//! sim.run(10).unwrap();
//! assert_eq!(sim.step(), 11);
//! ```

mod agent;
mod context;
mod error;
mod exporter;
mod registry;
mod simulation;
pub mod algorithms;
pub mod scenarios;

pub use agent::{Agent, AgentId};
pub use context::AgentContext;
pub use error::SimError;
pub use exporter::{AgentFrame, RoundFrame, SimExport};
pub use registry::{AgentRecord, AgentRegistry, ID_NAMESPACE};
pub use simulation::{Algorithm, SimConfig, SimModel, Simulation, ASYNC_SKIP_PROBABILITY};
