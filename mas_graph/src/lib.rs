//! Port-labeled graphs for mobile agent simulation.
//!
//! Vertices carry no global address visible to agents: each one numbers its
//! incident edges with local *ports*, independently of the numbering at the
//! other endpoint. This is the classical anonymous port-numbering model used
//! to study exploration, rendezvous and mapping.
//!
//! # Example
//!
//! ```
//! use mas_graph::PortGraph;
//!
//! let mut graph = PortGraph::new();
//! let u = graph.add_vertex("u");
//! let v = graph.add_vertex("v");
//! assert!(graph.add_edge(u, v));
//!
//! let through = graph.vertex(u).and_then(|x| x.neighbor_by_port(0));
//! assert_eq!(through, Some(v));
//! assert_eq!(graph.diameter(), 1);
//! ```

mod cache;
mod error;
mod graph;
mod io;
mod planarity;
mod vertex;
pub mod generators;

pub use cache::CacheState;
pub use error::GraphError;
pub use graph::{AdjacencyMatrix, CacheStates, DistanceMatrix, PortGraph, DISTANCE_INFINITY};
pub use io::VertexNaming;
pub use planarity::is_planar;
pub use vertex::{Port, Vertex, VertexKey};
