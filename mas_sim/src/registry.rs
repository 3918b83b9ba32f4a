//! Per-agent simulation state.
//!
//! The registry is the only place where agent positions change. It keeps an
//! occupancy index (vertex to agents standing on it) next to the per-agent
//! records, and derives the co-location flags from that index.

use crate::agent::{Agent, AgentId};
use crate::error::SimError;

use mas_graph::{Port, PortGraph, VertexKey};
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::debug;

/// Identifiers drawn for agents without a usable preference lie in
/// `0..ID_NAMESPACE`.
pub const ID_NAMESPACE: u64 = 50_000;

/// State the simulation tracks for one agent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentRecord {
    /// Unique identifier
    pub id: u64,

    /// Vertex the agent stands on
    pub position: VertexKey,

    /// Synchronous activation period
    pub latency: u32,

    /// Round of the last legal move (0 = never moved)
    pub last_move: u64,

    /// Port at the current vertex leading back to the previous one
    pub port_back: Option<Port>,

    /// Whether another agent shares the current vertex
    pub contains_mate: bool,
}

/// Registry of every agent's position, latency and co-location state.
#[derive(Debug, Clone, Default)]
pub struct AgentRegistry {
    records: Vec<AgentRecord>,
    occupants: BTreeMap<VertexKey, Vec<AgentId>>,
}

impl AgentRegistry {
    /// Resolves every agent's starting state.
    ///
    /// Positions are resolved first, then identifiers, then latencies.
    /// Unset or unusable preferences are drawn from `rng`.
    pub fn new<R: Rng + ?Sized>(
        agents: &[Agent],
        topology: &PortGraph,
        possible_latencies: &[u32],
        rng: &mut R,
    ) -> Result<Self, SimError> {
        if agents.len() as u64 > ID_NAMESPACE {
            return Err(SimError::TooManyAgents(agents.len()));
        }
        if let Some(&zero) = possible_latencies.iter().find(|&&l| l == 0) {
            return Err(SimError::InvalidLatency(zero));
        }

        let mut positions = Vec::with_capacity(agents.len());
        for agent in agents {
            let position = match agent.desired_position() {
                Some(vertex) if topology.contains_vertex(vertex) => vertex,
                Some(vertex) => return Err(SimError::UnknownVertex(vertex)),
                None => *topology.keys().choose(rng).ok_or(SimError::EmptyTopology)?,
            };
            positions.push(position);
        }

        let mut taken = HashSet::with_capacity(agents.len());
        let mut ids = Vec::with_capacity(agents.len());
        for agent in agents {
            let id = match agent.desired_id() {
                Some(id) if !taken.contains(&id) => id,
                _ => loop {
                    let candidate = rng.gen_range(0..ID_NAMESPACE);
                    if !taken.contains(&candidate) {
                        break candidate;
                    }
                },
            };
            taken.insert(id);
            ids.push(id);
        }

        let mut latencies = Vec::with_capacity(agents.len());
        for agent in agents {
            let latency = match agent.desired_latency() {
                Some(0) => return Err(SimError::InvalidLatency(0)),
                Some(latency) => latency,
                None => *possible_latencies.choose(rng).ok_or(SimError::NoLatencies)?,
            };
            latencies.push(latency);
        }

        let mut registry = Self::default();
        for (index, ((id, position), latency)) in ids.into_iter().zip(positions).zip(latencies).enumerate() {
            registry.records.push(AgentRecord {
                id,
                position,
                latency,
                last_move: 0,
                port_back: None,
                contains_mate: false,
            });
            registry.occupants.entry(position).or_default().push(AgentId::new(index));
        }
        registry.refresh_all();

        debug!(
            agents = registry.len(),
            occupied = registry.occupants.len(),
            "agent registry initialized"
        );
        Ok(registry)
    }

    /// Moves one agent through `port` and refreshes co-location at both
    /// ends of the edge.
    pub fn move_agent(&mut self, agent: AgentId, port: Port, topology: &PortGraph) -> Result<(), SimError> {
        let (from, to) = self.relocate(agent, port, topology)?;
        self.refresh(from);
        self.refresh(to);
        Ok(())
    }

    /// Applies every move in order, then refreshes co-location for every
    /// occupied vertex.
    ///
    /// Moves are validated up front so a bad entry leaves the registry
    /// untouched.
    pub fn move_multiple_agents(&mut self, moves: &[(AgentId, Port)], topology: &PortGraph) -> Result<(), SimError> {
        // An agent may appear more than once; later moves start where the
        // earlier ones ended.
        let mut tentative: HashMap<AgentId, VertexKey> = HashMap::new();
        for &(agent, port) in moves {
            let from = match tentative.get(&agent) {
                Some(&vertex) => vertex,
                None => self.position(agent)?,
            };
            tentative.insert(agent, neighbor_through(topology, from, port)?);
        }
        for &(agent, port) in moves {
            self.relocate(agent, port, topology)?;
        }
        self.refresh_all();
        Ok(())
    }

    /// Number of registered agents.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Handles of every agent, in registration order.
    pub fn handles(&self) -> impl Iterator<Item = AgentId> {
        (0..self.records.len()).map(AgentId::new)
    }

    pub fn record(&self, agent: AgentId) -> Result<&AgentRecord, SimError> {
        self.records.get(agent.index()).ok_or(SimError::UnknownAgent(agent.index()))
    }

    pub fn id(&self, agent: AgentId) -> Result<u64, SimError> {
        self.record(agent).map(|r| r.id)
    }

    pub fn position(&self, agent: AgentId) -> Result<VertexKey, SimError> {
        self.record(agent).map(|r| r.position)
    }

    pub fn latency(&self, agent: AgentId) -> Result<u32, SimError> {
        self.record(agent).map(|r| r.latency)
    }

    pub fn last_move(&self, agent: AgentId) -> Result<u64, SimError> {
        self.record(agent).map(|r| r.last_move)
    }

    pub fn port_back(&self, agent: AgentId) -> Result<Option<Port>, SimError> {
        self.record(agent).map(|r| r.port_back)
    }

    pub fn contains_mate(&self, agent: AgentId) -> Result<bool, SimError> {
        self.record(agent).map(|r| r.contains_mate)
    }

    /// Records that the agent moved during `round`.
    pub fn set_last_move(&mut self, agent: AgentId, round: u64) -> Result<(), SimError> {
        let record = self
            .records
            .get_mut(agent.index())
            .ok_or(SimError::UnknownAgent(agent.index()))?;
        record.last_move = round;
        Ok(())
    }

    /// Agents standing on `vertex`, in arrival order.
    pub fn occupants(&self, vertex: VertexKey) -> &[AgentId] {
        self.occupants.get(&vertex).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Vertices holding at least one agent.
    pub fn occupied_positions(&self) -> impl Iterator<Item = VertexKey> + '_ {
        self.occupants.keys().copied()
    }

    fn destination(&self, agent: AgentId, port: Port, topology: &PortGraph) -> Result<(VertexKey, VertexKey), SimError> {
        let from = self.position(agent)?;
        Ok((from, neighbor_through(topology, from, port)?))
    }

    /// Moves the agent without touching co-location flags.
    fn relocate(&mut self, agent: AgentId, port: Port, topology: &PortGraph) -> Result<(VertexKey, VertexKey), SimError> {
        let (from, to) = self.destination(agent, port, topology)?;
        let port_back = topology.vertex(to).and_then(|v| v.port_by_neighbor(from));

        if let Some(bucket) = self.occupants.get_mut(&from) {
            bucket.retain(|&a| a != agent);
            if bucket.is_empty() {
                self.occupants.remove(&from);
            }
        }
        self.occupants.entry(to).or_default().push(agent);

        let record = &mut self.records[agent.index()];
        record.position = to;
        record.port_back = port_back;

        Ok((from, to))
    }

    fn refresh(&mut self, vertex: VertexKey) {
        let Some(bucket) = self.occupants.get(&vertex) else {
            return;
        };
        let crowded = bucket.len() > 1;
        for agent in bucket {
            self.records[agent.index()].contains_mate = crowded;
        }
    }

    fn refresh_all(&mut self) {
        for (_, bucket) in self.occupants.iter() {
            let crowded = bucket.len() > 1;
            for agent in bucket {
                self.records[agent.index()].contains_mate = crowded;
            }
        }
    }
}

fn neighbor_through(topology: &PortGraph, from: VertexKey, port: Port) -> Result<VertexKey, SimError> {
    topology
        .vertex(from)
        .ok_or(SimError::UnknownVertex(from))?
        .neighbor_by_port(port)
        .ok_or_else(|| SimError::no_such_port(from, port))
}
