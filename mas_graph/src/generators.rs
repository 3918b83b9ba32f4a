//! Generators for classical topologies.
//!
//! Vertices are named after their dense identifier unless stated
//! otherwise, so `vertex_by_name("3")` and `vertex_by_id(3)` agree on a
//! freshly generated graph.

use crate::graph::PortGraph;
use crate::vertex::VertexKey;

use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::BTreeMap;

/// Path on `length` vertices.
pub fn path(length: usize) -> PortGraph {
    let mut graph = PortGraph::new();
    let mut previous: Option<VertexKey> = None;

    for i in 0..length {
        let key = graph.add_vertex(i.to_string());
        if let Some(pred) = previous {
            graph.add_edge(pred, key);
        }
        previous = Some(key);
    }

    graph
}

/// Cycle on `length` vertices.
///
/// Ports are arranged so that following port 0 from any vertex walks the
/// cycle in one consistent direction (`i` to `i - 1`). Lengths below 3
/// yield a path.
pub fn cycle(length: usize) -> PortGraph {
    let mut graph = path(length);
    if length < 3 {
        return graph;
    }

    let first = graph.keys()[0];
    let last = graph.keys()[length - 1];
    graph.add_edge(first, last);

    // Vertex 0 received its successor first; swap so port 0 goes backward
    if let Some(vertex) = graph.vertex_mut(first) {
        let successor = vertex.neighbor_by_port(0);
        let predecessor = vertex.neighbor_by_port(1);
        if let (Some(successor), Some(predecessor)) = (successor, predecessor) {
            vertex.reset_port_associations(BTreeMap::from([(0, predecessor), (1, successor)]));
        }
    }

    graph
}

/// Random tree: each new vertex attaches to a uniformly chosen earlier one.
pub fn tree<R: Rng + ?Sized>(order: usize, rng: &mut R) -> PortGraph {
    let mut graph = PortGraph::new();
    let mut placed: Vec<VertexKey> = Vec::with_capacity(order);

    for i in 0..order {
        let key = graph.add_vertex(i.to_string());
        if let Some(&parent) = placed.choose(rng) {
            graph.add_edge(key, parent);
        }
        placed.push(key);
    }

    graph
}

/// Complete binary tree of the given height (`2^height - 1` vertices).
///
/// Heights whose order does not fit in `usize` yield an empty graph.
pub fn binary_tree(height: u32) -> PortGraph {
    let mut graph = PortGraph::new();
    let Some(order) = 1usize.checked_shl(height).map(|n| n - 1) else {
        return graph;
    };
    let keys: Vec<VertexKey> = (0..order).map(|i| graph.add_vertex(i.to_string())).collect();

    for i in 0..order {
        for child in [2 * i + 1, 2 * i + 2] {
            if child < order {
                graph.add_edge(keys[i], keys[child]);
            }
        }
    }

    graph
}

/// Path whose first vertex only exposes port 1.
///
/// Agents at the end of the line see a port numbering that does not start
/// at 0, which exercises algorithms assuming contiguous ports.
pub fn line(length: usize) -> PortGraph {
    let mut graph = path(length);
    if length < 2 {
        return graph;
    }

    let first = graph.keys()[0];
    let second = graph.keys()[1];
    if let Some(vertex) = graph.vertex_mut(first) {
        vertex.reset_port_associations(BTreeMap::from([(1, second)]));
    }

    graph
}

/// Complete graph on `size` vertices.
pub fn clique(size: usize) -> PortGraph {
    let mut graph = PortGraph::new();

    for i in 0..size {
        let key = graph.add_vertex(i.to_string());
        for j in 0..i {
            let other = graph.keys()[j];
            graph.add_edge(other, key);
        }
    }

    graph
}

/// `width` x `height` grid with vertices named `(i,j)`.
pub fn grid(width: usize, height: usize) -> PortGraph {
    let mut graph = PortGraph::new();
    let name = |i: usize, j: usize| format!("({},{})", i, j);

    for i in 0..width {
        for j in 0..height {
            let key = graph.add_vertex(name(i, j));
            if j > 0 {
                if let Some(below) = graph.vertex_by_name(&name(i, j - 1)).map(|v| v.key()) {
                    graph.add_edge(key, below);
                }
            }
            if i > 0 {
                if let Some(left) = graph.vertex_by_name(&name(i - 1, j)).map(|v| v.key()) {
                    graph.add_edge(key, left);
                }
            }
        }
    }

    graph
}

/// Erdős–Rényi graph: each edge is present with probability
/// `link_probability` (clamped to `[0, 1]`, non-finite values count as 0).
pub fn random_graph<R: Rng + ?Sized>(order: usize, link_probability: f64, rng: &mut R) -> PortGraph {
    let p = if link_probability.is_finite() {
        link_probability.clamp(0.0, 1.0)
    } else {
        0.0
    };
    let mut graph = PortGraph::new();

    for i in 0..order {
        let key = graph.add_vertex(i.to_string());
        for j in 0..i {
            if rng.gen_bool(p) {
                let other = graph.keys()[j];
                graph.add_edge(other, key);
            }
        }
    }

    graph
}
