//! PortGraph - undirected graph over port-numbered vertices.
//!
//! The graph owns its vertices, keyed by a stable [`VertexKey`], and keeps a
//! second, dense numbering `0..order` used by matrices and by agents that
//! are allowed to see vertex identifiers. Dense identifiers are compacted on
//! removal: the vertex holding the highest identifier takes over the freed
//! slot, so identifiers are not stable across removals.
//!
//! Derived quantities (adjacency matrix, distance matrix and diameter,
//! planarity) are computed on first read and dropped by every structural
//! mutation.

use crate::cache::{CacheState, Cached};
use crate::planarity;
use crate::vertex::{Vertex, VertexKey};

use std::collections::{BTreeSet, HashMap};
use std::fmt;

/// Distance between vertices that are not connected.
pub const DISTANCE_INFINITY: u32 = u32::MAX / 2;

/// Square 0/1 matrix indexed by dense vertex identifiers.
pub type AdjacencyMatrix = Vec<Vec<u8>>;

/// All-pairs shortest distances, [`DISTANCE_INFINITY`] when disconnected.
pub type DistanceMatrix = Vec<Vec<u32>>;

#[derive(Debug, Clone)]
struct Distances {
    matrix: DistanceMatrix,
    diameter: u32,
}

/// Validity of each derived quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStates {
    pub adjacency: CacheState,
    pub distances: CacheState,
    pub planarity: CacheState,
}

/// An undirected graph whose vertices expose local ports.
#[derive(Debug, Clone, Default)]
pub struct PortGraph {
    vertices: HashMap<VertexKey, Vertex>,

    /// Dense identifier of each vertex
    ids: HashMap<VertexKey, usize>,

    /// Vertex holding each dense identifier
    by_id: Vec<VertexKey>,

    /// Last inserted vertex for each name
    by_name: HashMap<String, VertexKey>,

    /// Edges added through `add_edge`, stored as (smaller key, larger key)
    edges: BTreeSet<(VertexKey, VertexKey)>,

    next_key: u64,

    adjacency: Cached<AdjacencyMatrix>,
    distances: Cached<Distances>,
    planar: Cached<bool>,
}

impl PortGraph {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a graph from a symmetric 0/1 matrix.
    ///
    /// Vertex `i` is named after its index and receives dense identifier `i`.
    pub fn from_adjacency_matrix(matrix: &[Vec<u8>]) -> Self {
        let mut graph = Self::new();
        let keys: Vec<VertexKey> = (0..matrix.len())
            .map(|i| graph.add_vertex(i.to_string()))
            .collect();

        for (i, row) in matrix.iter().enumerate() {
            for (k, &cell) in row.iter().enumerate().skip(i) {
                if cell == 1 && k < keys.len() {
                    graph.add_edge(keys[i], keys[k]);
                }
            }
        }

        graph
    }

    /// Builds a structural copy of `other` with fresh vertices.
    ///
    /// Names, dense identifiers and edges are preserved. Ports are
    /// renumbered in edge order.
    pub fn from_graph(other: &PortGraph) -> Self {
        let mut graph = Self::new();
        let mut mapping = HashMap::with_capacity(other.order());

        for vertex in other.vertices() {
            mapping.insert(vertex.key(), graph.add_vertex(vertex.name()));
        }
        for (u, v) in other.edges() {
            if let (Some(&u), Some(&v)) = (mapping.get(&u), mapping.get(&v)) {
                graph.add_edge(u, v);
            }
        }

        graph
    }

    /// Adds a new isolated vertex and returns its key.
    pub fn add_vertex(&mut self, name: impl Into<String>) -> VertexKey {
        let key = VertexKey::from_raw(self.next_key);
        self.insert_vertex(Vertex::new(key, name));
        key
    }

    /// Inserts a vertex built elsewhere.
    ///
    /// Returns `false` if a vertex with the same key is already present.
    pub fn insert_vertex(&mut self, vertex: Vertex) -> bool {
        let key = vertex.key();
        if self.vertices.contains_key(&key) {
            return false;
        }

        self.next_key = self.next_key.max(key.as_u64().saturating_add(1));
        self.ids.insert(key, self.by_id.len());
        self.by_id.push(key);
        self.by_name.insert(vertex.name().to_string(), key);
        self.vertices.insert(key, vertex);

        self.invalidate();
        true
    }

    /// Removes a vertex and every adjacency pointing to it.
    ///
    /// The vertex with the highest dense identifier moves into the freed
    /// identifier. Returns `false` if the vertex is not in the graph.
    pub fn remove_vertex(&mut self, key: VertexKey) -> bool {
        let Some(id) = self.ids.remove(&key) else {
            return false;
        };
        let Some(vertex) = self.vertices.remove(&key) else {
            return false;
        };

        self.by_id.swap_remove(id);
        if let Some(&moved) = self.by_id.get(id) {
            self.ids.insert(moved, id);
        }

        self.unindex_name(vertex.name(), key);

        for other in self.vertices.values_mut() {
            other.remove_neighbor(key);
        }
        self.edges.retain(|&(a, b)| a != key && b != key);

        self.invalidate();
        true
    }

    /// Adds the undirected edge `{u, v}`.
    ///
    /// Succeeds only if both endpoints are in the graph and neither side
    /// already lists the other as a neighbor. On failure nothing changes.
    pub fn add_edge(&mut self, u: VertexKey, v: VertexKey) -> bool {
        if u == v {
            return false;
        }
        let fresh = match (self.vertices.get(&u), self.vertices.get(&v)) {
            (Some(a), Some(b)) => !a.has_neighbor(v) && !b.has_neighbor(u),
            _ => false,
        };
        if !fresh {
            return false;
        }

        if let Some(a) = self.vertices.get_mut(&u) {
            a.add_neighbor(v);
        }
        if let Some(b) = self.vertices.get_mut(&v) {
            b.add_neighbor(u);
        }
        self.edges.insert(edge_key(u, v));

        self.invalidate();
        true
    }

    /// Removes the undirected edge `{u, v}`.
    ///
    /// Succeeds only if both endpoints list each other as neighbors. On
    /// failure nothing changes.
    pub fn remove_edge(&mut self, u: VertexKey, v: VertexKey) -> bool {
        let linked = match (self.vertices.get(&u), self.vertices.get(&v)) {
            (Some(a), Some(b)) => a.has_neighbor(v) && b.has_neighbor(u),
            _ => false,
        };
        if !linked {
            return false;
        }

        if let Some(a) = self.vertices.get_mut(&u) {
            a.remove_neighbor(v);
        }
        if let Some(b) = self.vertices.get_mut(&v) {
            b.remove_neighbor(u);
        }
        self.edges.remove(&edge_key(u, v));

        self.invalidate();
        true
    }

    /// Renames a vertex, keeping the name lookup coherent.
    pub fn set_vertex_name(&mut self, key: VertexKey, name: impl Into<String>) -> bool {
        let name = name.into();
        let Some(vertex) = self.vertices.get_mut(&key) else {
            return false;
        };
        let old = vertex.name().to_string();
        vertex.set_name(name.clone());

        self.unindex_name(&old, key);
        self.by_name.insert(name, key);
        true
    }

    pub fn vertex(&self, key: VertexKey) -> Option<&Vertex> {
        self.vertices.get(&key)
    }

    /// Mutable access to a vertex's local port bookkeeping.
    ///
    /// Derived caches are invalidated since neighbors may change.
    pub fn vertex_mut(&mut self, key: VertexKey) -> Option<&mut Vertex> {
        self.invalidate();
        self.vertices.get_mut(&key)
    }

    pub fn contains_vertex(&self, key: VertexKey) -> bool {
        self.vertices.contains_key(&key)
    }

    pub fn vertex_by_id(&self, id: usize) -> Option<&Vertex> {
        self.by_id.get(id).and_then(|key| self.vertices.get(key))
    }

    /// Returns the last inserted vertex carrying `name`.
    pub fn vertex_by_name(&self, name: &str) -> Option<&Vertex> {
        self.by_name.get(name).and_then(|key| self.vertices.get(key))
    }

    /// Dense identifier of a vertex, in `0..order`.
    pub fn vertex_id(&self, key: VertexKey) -> Option<usize> {
        self.ids.get(&key).copied()
    }

    /// Vertex keys ordered by dense identifier.
    pub fn keys(&self) -> &[VertexKey] {
        &self.by_id
    }

    /// Vertices ordered by dense identifier.
    pub fn vertices(&self) -> impl Iterator<Item = &Vertex> + '_ {
        self.by_id.iter().filter_map(|key| self.vertices.get(key))
    }

    pub fn edges(&self) -> impl Iterator<Item = (VertexKey, VertexKey)> + '_ {
        self.edges.iter().copied()
    }

    /// Number of vertices.
    pub fn order(&self) -> usize {
        self.by_id.len()
    }

    /// Number of edges.
    pub fn size(&self) -> usize {
        self.edges.len()
    }

    pub fn adjacency_matrix(&self) -> &AdjacencyMatrix {
        self.adjacency.get_or_compute(|| self.compute_adjacency_matrix())
    }

    pub fn distance_matrix(&self) -> &DistanceMatrix {
        &self.distances().matrix
    }

    /// Shortest-path distance between two vertices of the graph.
    pub fn distance(&self, u: VertexKey, v: VertexKey) -> Option<u32> {
        let i = self.vertex_id(u)?;
        let k = self.vertex_id(v)?;
        Some(self.distance_matrix()[i][k])
    }

    /// Largest entry of the distance matrix.
    ///
    /// Equals [`DISTANCE_INFINITY`] when the graph is disconnected.
    pub fn diameter(&self) -> u32 {
        self.distances().diameter
    }

    pub fn is_planar(&self) -> bool {
        *self
            .planar
            .get_or_compute(|| planarity::is_planar(self.adjacency_matrix()))
    }

    pub fn cache_states(&self) -> CacheStates {
        CacheStates {
            adjacency: self.adjacency.state(),
            distances: self.distances.state(),
            planarity: self.planar.state(),
        }
    }

    fn distances(&self) -> &Distances {
        self.distances
            .get_or_compute(|| floyd_warshall(self.adjacency_matrix()))
    }

    fn compute_adjacency_matrix(&self) -> AdjacencyMatrix {
        let order = self.order();
        let mut matrix = vec![vec![0u8; order]; order];

        for (i, key) in self.by_id.iter().enumerate() {
            let Some(vertex) = self.vertices.get(key) else {
                continue;
            };
            for neighbor in vertex.neighbors() {
                if let Some(&k) = self.ids.get(neighbor) {
                    matrix[i][k] = 1;
                }
            }
        }

        matrix
    }

    /// Drops `key` from the name index, falling back to the most recent
    /// other vertex with the same name.
    fn unindex_name(&mut self, name: &str, key: VertexKey) {
        if self.by_name.get(name) != Some(&key) {
            return;
        }
        let fallback = self
            .vertices
            .values()
            .filter(|v| v.key() != key && v.name() == name)
            .map(|v| v.key())
            .max();
        match fallback {
            Some(other) => {
                self.by_name.insert(name.to_string(), other);
            }
            None => {
                self.by_name.remove(name);
            }
        }
    }

    fn invalidate(&mut self) {
        self.adjacency.invalidate();
        self.distances.invalidate();
        self.planar.invalidate();
    }
}

fn edge_key(u: VertexKey, v: VertexKey) -> (VertexKey, VertexKey) {
    if u <= v {
        (u, v)
    } else {
        (v, u)
    }
}

/// All-pairs shortest paths over an unweighted adjacency matrix.
///
/// An edge seen from either endpoint counts as undirected.
fn floyd_warshall(adjacency: &AdjacencyMatrix) -> Distances {
    let size = adjacency.len();
    let mut dist = vec![vec![DISTANCE_INFINITY; size]; size];

    for i in 0..size {
        dist[i][i] = 0;
        for j in (i + 1)..size {
            if adjacency[i][j] == 1 || adjacency[j][i] == 1 {
                dist[i][j] = 1;
                dist[j][i] = 1;
            }
        }
    }

    for k in 0..size {
        for i in 0..size {
            for j in 0..size {
                let through_k = dist[i][k] + dist[k][j];
                if through_k < dist[i][j] {
                    dist[i][j] = through_k;
                }
            }
        }
    }

    let diameter = dist
        .iter()
        .flat_map(|row| row.iter().copied())
        .max()
        .unwrap_or(0);

    Distances {
        matrix: dist,
        diameter,
    }
}

impl fmt::Display for PortGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Graph{{")?;
        for (id, vertex) in self.vertices().enumerate() {
            if id > 0 {
                writeln!(f, ",")?;
            }
            write!(f, "\t({}){} : {{", id, vertex.name())?;
            for (i, neighbor) in vertex.neighbors().iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                match self.vertex(*neighbor) {
                    Some(n) => write!(f, "{}", n.name())?,
                    None => write!(f, "{}", neighbor)?,
                }
            }
            write!(f, "}}")?;
        }
        if self.order() > 0 {
            writeln!(f)?;
        }
        writeln!(f, "}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::BTreeMap;

    fn path3() -> (PortGraph, VertexKey, VertexKey, VertexKey) {
        let mut g = PortGraph::new();
        let a = g.add_vertex("a");
        let b = g.add_vertex("b");
        let c = g.add_vertex("c");
        g.add_edge(a, b);
        g.add_edge(b, c);
        (g, a, b, c)
    }

    #[test]
    fn test_add_and_get_vertex() {
        let mut g = PortGraph::new();
        let u = g.add_vertex("1");
        let v = g.add_vertex("3");

        assert_eq!(g.order(), 2);
        assert_eq!(g.vertex_by_id(0).map(|x| x.key()), Some(u));
        assert_eq!(g.vertex_by_id(1).map(|x| x.key()), Some(v));
        assert!(g.vertex_by_id(2).is_none());

        let duplicate = Vertex::new(v, "again");
        assert!(!g.insert_vertex(duplicate));
        assert_eq!(g.order(), 2);
    }

    #[test]
    fn test_insert_vertex_with_largest_key() {
        let mut g = PortGraph::new();
        let top = VertexKey::from_raw(u64::MAX);
        assert!(g.insert_vertex(Vertex::new(top, "top")));
        assert_eq!(g.vertex_id(top), Some(0));
        assert_eq!(g.vertex_by_name("top").map(|x| x.key()), Some(top));
    }

    #[test]
    fn test_vertex_by_name_last_inserted_wins() {
        let mut g = PortGraph::new();
        let u = g.add_vertex("1");
        let v = g.add_vertex("3");
        assert_eq!(g.vertex_by_name("1").map(|x| x.key()), Some(u));
        assert_eq!(g.vertex_by_name("3").map(|x| x.key()), Some(v));
        assert!(g.vertex_by_name("5").is_none());

        let w = g.add_vertex("3");
        assert_eq!(g.vertex_by_name("3").map(|x| x.key()), Some(w));

        // Removing the newest falls back to the older homonym
        g.remove_vertex(w);
        assert_eq!(g.vertex_by_name("3").map(|x| x.key()), Some(v));
        g.remove_vertex(v);
        assert!(g.vertex_by_name("3").is_none());
    }

    #[test]
    fn test_remove_vertex_compacts_ids() {
        let mut g = PortGraph::new();
        let keys: Vec<_> = ["1", "3", "5", "9"].iter().map(|n| g.add_vertex(*n)).collect();

        assert!(g.remove_vertex(keys[1]));
        assert!(!g.remove_vertex(keys[1]));

        // Highest identifier moved into the freed slot
        assert_eq!(g.vertex_id(keys[3]), Some(1));
        assert_eq!(g.vertex_id(keys[0]), Some(0));
        assert_eq!(g.vertex_id(keys[2]), Some(2));
        assert_eq!(g.vertex_id(keys[1]), None);
        assert_eq!(g.vertex_by_id(1).map(|v| v.name()), Some("9"));

        let x = g.add_vertex("x");
        assert_eq!(g.vertex_id(x), Some(3));
    }

    #[test]
    fn test_remove_vertex_strips_neighbors() {
        let (mut g, a, b, c) = path3();
        assert!(g.remove_vertex(b));

        assert!(g.vertex(a).map_or(false, |v| v.neighbors().is_empty()));
        assert!(g.vertex(c).map_or(false, |v| v.ports().is_empty()));
        assert_eq!(g.size(), 0);
    }

    #[test]
    fn test_add_edge() {
        let mut g = PortGraph::new();
        let u = g.add_vertex("1");
        let v = g.add_vertex("2");
        let w = g.add_vertex("3");
        let outsider = VertexKey::from_raw(99);

        assert!(g.add_edge(u, v));
        assert!(!g.add_edge(u, outsider));
        assert!(!g.add_edge(v, u));
        assert!(!g.add_edge(u, u));
        assert!(g.add_edge(w, u));

        assert_eq!(g.size(), 2);
        let edges: Vec<_> = g.edges().collect();
        assert_eq!(edges, vec![(u, v), (u, w)]);
    }

    #[test]
    fn test_remove_edge() {
        let (mut g, a, b, c) = path3();

        assert!(g.remove_edge(a, b));
        assert!(!g.remove_edge(a, b));
        assert_eq!(g.edges().collect::<Vec<_>>(), vec![(b, c)]);

        assert!(g.remove_edge(c, b));
        assert_eq!(g.size(), 0);
    }

    #[test]
    fn test_edges_with_directed_neighbor() {
        let mut g = PortGraph::new();
        let u = g.add_vertex("1");
        let v = g.add_vertex("2");
        let w = g.add_vertex("3");

        // u sees v but not the other way around
        if let Some(x) = g.vertex_mut(u) {
            x.add_neighbor(v);
        }
        if let Some(x) = g.vertex_mut(w) {
            x.add_neighbor(u);
        }
        let before_u = g.vertex(u).cloned();
        let before_w = g.vertex(w).cloned();

        assert!(!g.add_edge(u, v));
        assert!(!g.add_edge(u, w));
        assert!(!g.remove_edge(u, v));
        assert!(!g.remove_edge(u, w));

        assert_eq!(g.vertex(u).cloned(), before_u);
        assert_eq!(g.vertex(w).cloned(), before_w);
        assert!(g.vertex(v).map_or(false, |x| x.neighbors().is_empty()));
    }

    #[test]
    fn test_from_graph() {
        let (g, ..) = path3();
        let copy = PortGraph::from_graph(&g);

        assert_eq!(copy.order(), 3);
        assert_eq!(copy.size(), 2);
        let names: Vec<_> = copy.vertices().map(|v| v.name().to_string()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
        assert_eq!(copy.adjacency_matrix(), g.adjacency_matrix());
    }

    #[test]
    fn test_from_adjacency_matrix() {
        let m = vec![vec![0, 1, 0], vec![1, 0, 1], vec![0, 1, 0]];
        let g = PortGraph::from_adjacency_matrix(&m);

        let names = |id: usize| -> Vec<String> {
            let vertex = g.vertex_by_id(id).unwrap();
            vertex
                .neighbors()
                .iter()
                .map(|k| g.vertex(*k).unwrap().name().to_string())
                .collect()
        };
        assert_eq!(names(0), vec!["1"]);
        assert_eq!(names(1), vec!["0", "2"]);
        assert_eq!(names(2), vec!["1"]);
        assert_eq!(g.adjacency_matrix(), &m);
    }

    #[test]
    fn test_adjacency_matrix_after_remove_and_add() {
        let (mut g, a, b, c) = path3();
        assert_eq!(g.cache_states().adjacency, CacheState::Invalid);
        assert_eq!(g.adjacency_matrix(), &vec![vec![0, 1, 0], vec![1, 0, 1], vec![0, 1, 0]]);
        assert_eq!(g.cache_states().adjacency, CacheState::Valid);

        g.remove_vertex(a);
        assert_eq!(g.cache_states().adjacency, CacheState::Invalid);
        // c took over identifier 0
        assert_eq!(g.vertex_id(c), Some(0));
        assert_eq!(g.adjacency_matrix(), &vec![vec![0, 1], vec![1, 0]]);

        let d = g.add_vertex("d");
        g.add_edge(d, b);
        assert_eq!(
            g.adjacency_matrix(),
            &vec![vec![0, 1, 0], vec![1, 0, 1], vec![0, 1, 0]]
        );
    }

    #[test]
    fn test_distance_matrix_and_diameter() {
        let (mut g, a, b, c) = path3();

        assert_eq!(
            g.distance_matrix(),
            &vec![vec![0, 1, 2], vec![1, 0, 1], vec![2, 1, 0]]
        );
        assert_eq!(g.distance(a, c), Some(2));
        assert_eq!(g.distance(b, c), Some(1));
        assert_eq!(g.diameter(), 2);
        assert_eq!(g.cache_states().distances, CacheState::Valid);

        g.remove_edge(b, c);
        assert_eq!(g.cache_states().distances, CacheState::Invalid);
        assert_eq!(g.distance(a, c), Some(DISTANCE_INFINITY));
        assert_eq!(g.diameter(), DISTANCE_INFINITY);
    }

    #[test]
    fn test_empty_graph_queries() {
        let g = PortGraph::new();
        assert_eq!(g.order(), 0);
        assert_eq!(g.diameter(), 0);
        assert!(g.adjacency_matrix().is_empty());
        assert!(g.is_planar());
    }

    #[test]
    fn test_planarity_cached_and_invalidated() {
        let m: Vec<Vec<u8>> = (0..5)
            .map(|i| (0..5).map(|j| u8::from(i != j)).collect())
            .collect();
        let mut g = PortGraph::from_adjacency_matrix(&m);

        assert!(!g.is_planar());
        assert_eq!(g.cache_states().planarity, CacheState::Valid);

        let (u, v) = (g.keys()[0], g.keys()[1]);
        g.remove_edge(u, v);
        assert_eq!(g.cache_states().planarity, CacheState::Invalid);
        assert!(g.is_planar());
    }

    #[test]
    fn test_moving_along_ports() {
        let mut g = PortGraph::new();
        let u = g.add_vertex("u");
        let v = g.add_vertex("v");
        g.add_edge(u, v);
        let reset = g
            .vertex_mut(u)
            .map_or(false, |x| x.reset_port_associations(BTreeMap::from([(4, v)])));
        assert!(reset);

        let there = g.vertex(u).and_then(|x| x.neighbor_by_port(4));
        assert_eq!(there, Some(v));
        let back = g.vertex(v).and_then(|x| x.neighbor_by_port(0));
        assert_eq!(back, Some(u));
    }

    #[test]
    fn test_set_vertex_name() {
        let (mut g, a, ..) = path3();
        assert!(g.set_vertex_name(a, "z"));
        assert!(g.vertex_by_name("a").is_none());
        assert_eq!(g.vertex_by_name("z").map(|v| v.key()), Some(a));
        assert!(!g.set_vertex_name(VertexKey::from_raw(77), "q"));
    }

    #[test]
    fn test_graph_display() {
        let (g, ..) = path3();
        assert_eq!(
            g.to_string(),
            "Graph{\n\t(0)a : {b},\n\t(1)b : {a, c},\n\t(2)c : {b}\n}\n"
        );
        assert_eq!(PortGraph::new().to_string(), "Graph{\n}\n");
    }

    #[derive(Debug, Clone)]
    enum Op {
        AddVertex,
        RemoveVertex(usize),
        AddEdge(usize, usize),
        RemoveEdge(usize, usize),
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            Just(Op::AddVertex),
            (0usize..16).prop_map(Op::RemoveVertex),
            (0usize..16, 0usize..16).prop_map(|(a, b)| Op::AddEdge(a, b)),
            (0usize..16, 0usize..16).prop_map(|(a, b)| Op::RemoveEdge(a, b)),
        ]
    }

    fn pick(g: &PortGraph, i: usize) -> Option<VertexKey> {
        g.keys().get(i % g.order().max(1)).copied()
    }

    fn apply(g: &mut PortGraph, op: &Op) {
        match *op {
            Op::AddVertex => {
                g.add_vertex("x");
            }
            Op::RemoveVertex(i) => {
                if let Some(k) = pick(g, i) {
                    g.remove_vertex(k);
                }
            }
            Op::AddEdge(i, j) => {
                if let (Some(a), Some(b)) = (pick(g, i), pick(g, j)) {
                    g.add_edge(a, b);
                }
            }
            Op::RemoveEdge(i, j) => {
                if let (Some(a), Some(b)) = (pick(g, i), pick(g, j)) {
                    g.remove_edge(a, b);
                }
            }
        }
    }

    proptest! {
        #[test]
        fn prop_dense_identifiers(ops in prop::collection::vec(op(), 0..80)) {
            let mut g = PortGraph::new();
            for op in &ops {
                apply(&mut g, op);

                let mut ids: Vec<usize> = g.keys().iter().filter_map(|k| g.vertex_id(*k)).collect();
                ids.sort_unstable();
                prop_assert_eq!(ids, (0..g.order()).collect::<Vec<_>>());
            }
        }

        #[test]
        fn prop_add_remove_edge_is_inverse(ops in prop::collection::vec(op(), 0..60), i in 0usize..16, j in 0usize..16) {
            let mut g = PortGraph::new();
            for op in &ops {
                apply(&mut g, op);
            }
            prop_assume!(g.order() >= 2);
            let u = g.keys()[i % g.order()];
            let v = g.keys()[j % g.order()];

            let before_u = g.vertex(u).cloned();
            let before_v = g.vertex(v).cloned();
            if g.add_edge(u, v) {
                prop_assert!(g.remove_edge(u, v));
                prop_assert_eq!(g.vertex(u).cloned(), before_u);
                prop_assert_eq!(g.vertex(v).cloned(), before_v);
            }
        }

        #[test]
        fn prop_distance_symmetric_and_triangle(ops in prop::collection::vec(op(), 0..60)) {
            let mut g = PortGraph::new();
            for op in &ops {
                apply(&mut g, op);
            }
            let d = g.distance_matrix();
            let n = g.order();
            for i in 0..n {
                prop_assert_eq!(d[i][i], 0);
                for j in 0..n {
                    prop_assert_eq!(d[i][j], d[j][i]);
                    for k in 0..n {
                        prop_assert!(d[i][j] <= d[i][k] + d[k][j]);
                    }
                }
            }
        }
    }
}
