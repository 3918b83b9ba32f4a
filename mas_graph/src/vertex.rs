//! Vertices with a local, anonymous port space.
//!
//! Every vertex numbers its incident edges on its own. The edge `{u, v}`
//! may be port 0 at `u` and port 3 at `v`: nothing ties the two numberings
//! together, which is exactly what agents in the port-numbering model see.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Local edge label at a vertex.
pub type Port = usize;

/// Stable identity of a vertex inside one [`PortGraph`](crate::PortGraph).
///
/// Unlike the dense graph identifier (`0..order`), a key never changes and
/// is never reused after its vertex is removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VertexKey(u64);

impl VertexKey {
    /// Creates a key from its raw value.
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw key value.
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for VertexKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

/// A graph vertex and its port bookkeeping.
///
/// The port map is always a bijection onto `neighbors`. A new neighbor is
/// given the smallest port not currently in use, so ports freed by a
/// removal are handed out again before a new one is minted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vertex {
    key: VertexKey,
    name: String,
    /// Neighbors in insertion order
    neighbors: Vec<VertexKey>,
    port_to_neighbor: BTreeMap<Port, VertexKey>,
    /// One past the highest port in use
    next_port: Port,
    /// Unused ports below `next_port`
    free_ports: BTreeSet<Port>,
}

impl Vertex {
    /// Creates an isolated vertex.
    pub fn new(key: VertexKey, name: impl Into<String>) -> Self {
        Self {
            key,
            name: name.into(),
            neighbors: Vec::new(),
            port_to_neighbor: BTreeMap::new(),
            next_port: 0,
            free_ports: BTreeSet::new(),
        }
    }

    /// Returns a vertex with the same name and neighbor list under a new key.
    ///
    /// Ports are renumbered in neighbor insertion order.
    pub fn copy(&self, key: VertexKey) -> Self {
        let mut copy = Vertex::new(key, self.name.clone());
        for &neighbor in &self.neighbors {
            copy.add_neighbor(neighbor);
        }
        copy
    }

    pub fn key(&self) -> VertexKey {
        self.key
    }

    /// Display name (not necessarily unique).
    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Neighbors in the order they were added.
    pub fn neighbors(&self) -> &[VertexKey] {
        &self.neighbors
    }

    pub fn degree(&self) -> usize {
        self.neighbors.len()
    }

    pub fn has_neighbor(&self, vertex: VertexKey) -> bool {
        self.neighbors.contains(&vertex)
    }

    /// Adds a neighbor on the smallest free port.
    ///
    /// Returns `false` if `vertex` already was a neighbor.
    pub fn add_neighbor(&mut self, vertex: VertexKey) -> bool {
        if self.has_neighbor(vertex) {
            return false;
        }

        let port = match self.free_ports.pop_first() {
            Some(port) => port,
            None => {
                let port = self.next_port;
                self.next_port += 1;
                port
            }
        };

        self.neighbors.push(vertex);
        self.port_to_neighbor.insert(port, vertex);
        true
    }

    /// Removes a neighbor and frees its port.
    ///
    /// Returns `false` if `vertex` was not a neighbor.
    pub fn remove_neighbor(&mut self, vertex: VertexKey) -> bool {
        let Some(port) = self.port_by_neighbor(vertex) else {
            return false;
        };

        self.neighbors.retain(|&n| n != vertex);
        self.port_to_neighbor.remove(&port);
        self.release_port(port);
        true
    }

    /// Returns the neighbor reached through `port`, if the port exists.
    pub fn neighbor_by_port(&self, port: Port) -> Option<VertexKey> {
        self.port_to_neighbor.get(&port).copied()
    }

    /// Returns the port leading to `neighbor`, if it is a neighbor.
    pub fn port_by_neighbor(&self, neighbor: VertexKey) -> Option<Port> {
        self.port_to_neighbor
            .iter()
            .find(|(_, &n)| n == neighbor)
            .map(|(&port, _)| port)
    }

    /// All ports available from this vertex, ascending.
    pub fn ports(&self) -> Vec<Port> {
        self.port_to_neighbor.keys().copied().collect()
    }

    pub fn port_associations(&self) -> &BTreeMap<Port, VertexKey> {
        &self.port_to_neighbor
    }

    /// Replaces the port numbering of the current neighbors.
    ///
    /// Fails, leaving the vertex untouched, unless the values of `mapping`
    /// are exactly the current neighbor set.
    pub fn reset_port_associations(&mut self, mapping: BTreeMap<Port, VertexKey>) -> bool {
        if mapping.len() != self.port_to_neighbor.len() {
            return false;
        }
        let values: BTreeSet<VertexKey> = mapping.values().copied().collect();
        if values.len() != mapping.len() || self.neighbors.iter().any(|n| !values.contains(n)) {
            return false;
        }

        self.next_port = mapping.keys().next_back().map_or(0, |&last| last + 1);
        self.free_ports = (0..self.next_port)
            .filter(|port| !mapping.contains_key(port))
            .collect();
        self.port_to_neighbor = mapping;
        true
    }

    fn release_port(&mut self, port: Port) {
        if port + 1 != self.next_port {
            self.free_ports.insert(port);
            return;
        }

        // Shrink the port range past any trailing gaps
        self.next_port = port;
        while let Some(&last) = self.free_ports.last() {
            if last + 1 != self.next_port {
                break;
            }
            self.free_ports.remove(&last);
            self.next_port = last;
        }
    }
}

impl fmt::Display for Vertex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} : {{", self.name)?;
        for (i, neighbor) in self.neighbors.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", neighbor)?;
        }
        write!(f, "}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn key(raw: u64) -> VertexKey {
        VertexKey::from_raw(raw)
    }

    #[test]
    fn test_add_and_remove_neighbor() {
        let mut u = Vertex::new(key(1), "1");

        assert!(u.add_neighbor(key(2)));
        assert!(!u.add_neighbor(key(2)));
        assert_eq!(u.neighbors(), &[key(2)]);

        assert!(u.remove_neighbor(key(2)));
        assert!(!u.remove_neighbor(key(2)));
        assert!(u.neighbors().is_empty());
        assert!(u.ports().is_empty());
    }

    #[test]
    fn test_freed_ports_reused_first() {
        let mut u = Vertex::new(key(1), "1");

        u.add_neighbor(key(2));
        u.add_neighbor(key(3));

        u.remove_neighbor(key(2));
        assert_eq!(u.ports(), vec![1]);

        u.add_neighbor(key(4));
        assert_eq!(u.ports(), vec![0, 1]);
        assert_eq!(u.neighbor_by_port(0), Some(key(4)));

        u.add_neighbor(key(2));
        assert_eq!(u.ports(), vec![0, 1, 2]);
    }

    #[test]
    fn test_neighbor_by_port_and_back() {
        let mut u = Vertex::new(key(1), "1");
        u.add_neighbor(key(2));
        u.add_neighbor(key(3));

        assert_eq!(u.neighbor_by_port(0), Some(key(2)));
        assert_eq!(u.neighbor_by_port(1), Some(key(3)));
        assert_eq!(u.neighbor_by_port(2), None);

        assert_eq!(u.port_by_neighbor(key(3)), Some(1));
        assert_eq!(u.port_by_neighbor(key(9)), None);
    }

    #[test]
    fn test_reset_port_associations() {
        let mut u = Vertex::new(key(1), "1");
        u.add_neighbor(key(2));
        u.add_neighbor(key(3));

        let mapping = BTreeMap::from([(5, key(3)), (0, key(2))]);
        assert!(u.reset_port_associations(mapping));
        assert_eq!(u.ports(), vec![0, 5]);
        assert_eq!(u.neighbor_by_port(5), Some(key(3)));

        // Gaps left by the renumbering are handed out first
        u.add_neighbor(key(4));
        assert_eq!(u.port_by_neighbor(key(4)), Some(1));
    }

    #[test]
    fn test_wrong_reset_port_associations() {
        let mut u = Vertex::new(key(1), "1");
        u.add_neighbor(key(2));
        u.add_neighbor(key(3));
        let before = u.clone();

        assert!(!u.reset_port_associations(BTreeMap::from([(0, key(2))])));
        assert!(!u.reset_port_associations(BTreeMap::from([(0, key(2)), (1, key(4))])));
        assert!(!u.reset_port_associations(BTreeMap::from([(0, key(2)), (1, key(2))])));
        assert_eq!(u, before);
    }

    #[test]
    fn test_copy_keeps_name_and_neighbors() {
        let mut u = Vertex::new(key(1), "hub");
        u.add_neighbor(key(2));
        u.add_neighbor(key(3));
        u.remove_neighbor(key(2));

        let copy = u.copy(key(7));
        assert_eq!(copy.key(), key(7));
        assert_eq!(copy.name(), "hub");
        assert_eq!(copy.neighbors(), &[key(3)]);
        assert_eq!(copy.port_by_neighbor(key(3)), Some(0));
    }

    #[test]
    fn test_vertex_display() {
        let mut u = Vertex::new(key(1), "a");
        assert_eq!(u.to_string(), "a : {}");
        u.add_neighbor(key(2));
        u.add_neighbor(key(3));
        assert_eq!(u.to_string(), "a : {v2, v3}");
    }

    proptest! {
        #[test]
        fn prop_port_map_is_bijection(ops in prop::collection::vec((any::<bool>(), 0u64..12), 0..64)) {
            let mut u = Vertex::new(key(100), "u");
            for (add, raw) in ops {
                if add {
                    let used = u.ports();
                    let smallest_free = (0..).find(|p| !used.contains(p)).unwrap();
                    if u.add_neighbor(key(raw)) {
                        prop_assert_eq!(u.port_by_neighbor(key(raw)), Some(smallest_free));
                    }
                } else {
                    u.remove_neighbor(key(raw));
                }

                let mapped: BTreeSet<VertexKey> = u.port_associations().values().copied().collect();
                let neighbors: BTreeSet<VertexKey> = u.neighbors().iter().copied().collect();
                prop_assert_eq!(mapped.len(), u.port_associations().len());
                prop_assert_eq!(&mapped, &neighbors);
                prop_assert_eq!(neighbors.len(), u.degree());
            }
        }
    }
}
