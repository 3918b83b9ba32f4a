//! Adjacency text import and export.
//!
//! Format:
//! - line 1: space-separated vertex names;
//! - following lines: `<vertex> <neighbor> <neighbor> ...`, one per vertex.
//!
//! Import treats adjacency as undirected: a neighbor listed on either side
//! links both vertices.

use crate::error::GraphError;
use crate::graph::PortGraph;
use crate::vertex::VertexKey;

use std::fs;
use std::path::Path;
use tracing::debug;

/// How vertices are labelled in exported adjacency text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VertexNaming {
    /// Dense graph identifiers
    #[default]
    GraphId,
    /// Display names
    Name,
}

impl PortGraph {
    /// Parses adjacency text into a new graph.
    pub fn parse_adjacency(text: &str) -> Result<Self, GraphError> {
        let mut lines = text.lines().enumerate().filter(|(_, l)| !l.trim().is_empty());
        let (_, header) = lines.next().ok_or(GraphError::Empty)?;

        let mut graph = PortGraph::new();
        for name in header.split_whitespace() {
            graph.add_vertex(name);
        }

        for (index, line) in lines {
            let mut names = line.split_whitespace();
            let Some(first) = names.next() else {
                continue;
            };
            let vertex = lookup(&graph, index + 1, first)?;
            for name in names {
                let neighbor = lookup(&graph, index + 1, name)?;
                graph.add_edge(vertex, neighbor);
            }
        }

        debug!(order = graph.order(), size = graph.size(), "parsed adjacency text");
        Ok(graph)
    }

    /// Loads a graph from an adjacency text file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, GraphError> {
        let text = fs::read_to_string(path)?;
        Self::parse_adjacency(&text)
    }

    /// Renders the graph as adjacency text.
    pub fn to_adjacency_text(&self, naming: VertexNaming) -> String {
        let label = |key: VertexKey| -> String {
            match naming {
                VertexNaming::GraphId => self
                    .vertex_id(key)
                    .map(|id| id.to_string())
                    .unwrap_or_default(),
                VertexNaming::Name => self
                    .vertex(key)
                    .map(|v| v.name().to_string())
                    .unwrap_or_default(),
            }
        };

        let header: Vec<String> = self.keys().iter().map(|&k| label(k)).collect();
        let mut out = header.join(" ");
        out.push('\n');

        for vertex in self.vertices() {
            out.push_str(&label(vertex.key()));
            for &neighbor in vertex.neighbors() {
                out.push(' ');
                out.push_str(&label(neighbor));
            }
            out.push('\n');
        }

        out
    }

    /// Writes the graph as adjacency text.
    pub fn save(&self, path: impl AsRef<Path>, naming: VertexNaming) -> Result<(), GraphError> {
        fs::write(path, self.to_adjacency_text(naming))?;
        Ok(())
    }
}

fn lookup(graph: &PortGraph, line: usize, name: &str) -> Result<VertexKey, GraphError> {
    graph
        .vertex_by_name(name)
        .map(|v| v.key())
        .ok_or_else(|| GraphError::unknown_name(line, name))
}
