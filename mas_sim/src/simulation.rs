//! Round scheduler.
//!
//! A [`Simulation`] owns the topology, the agents and their registry, and
//! drives discrete rounds. Each round every agent is offered one turn of the
//! decision function; requested moves are checked for legality and either
//! applied at once (asynchronous model) or buffered and committed together
//! at the end of the round (synchronous model).

use crate::agent::{Agent, AgentId};
use crate::context::AgentContext;
use crate::error::SimError;
use crate::registry::AgentRegistry;

use mas_graph::{Port, PortGraph};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Probability that an agent misses its turn in an asynchronous round.
pub const ASYNC_SKIP_PROBABILITY: f64 = 0.30;

/// Salt deriving the registry seed from the simulation seed.
const REGISTRY_SALT: u64 = 0x9e3779b97f4a7c15;

/// Decision function run once per agent turn.
pub type Algorithm = Box<dyn FnMut(&mut AgentContext<'_>)>;

/// Configuration for a simulation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimConfig {
    /// Seed for every random draw of the run
    pub seed: u64,

    /// Number of agents created by [`Simulation::new`]
    pub agents_number: usize,

    /// Latencies drawn for agents without a preference
    pub possible_latencies: Vec<u32>,

    /// Hide agent identifiers from decision functions
    pub anonymous: bool,

    /// Commit moves together at the end of each round
    pub synchronous: bool,

    /// Hide vertex identifiers from decision functions
    pub anonymous_topology: bool,

    /// Emit diagnostics for illegal moves and hidden queries
    pub verbose: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            agents_number: 1,
            possible_latencies: vec![1],
            anonymous: false,
            synchronous: true,
            anonymous_topology: false,
            verbose: false,
        }
    }
}

/// Read-only view of the model a simulation runs under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimModel {
    pub anonymous: bool,
    pub synchronous: bool,
    pub anonymous_topology: bool,
    pub agents_number: usize,
    pub possible_latencies: Vec<u32>,
}

/// Everything a decision function may observe or change, split from the
/// decision function itself so both can be borrowed during a turn.
pub(crate) struct SimState {
    pub(crate) topology: PortGraph,
    pub(crate) registry: AgentRegistry,
    pub(crate) agents: Vec<Agent>,
    pub(crate) config: SimConfig,
    pub(crate) step: u64,
    pub(crate) pending_moves: Vec<(AgentId, Port)>,
    pub(crate) rng: ChaCha8Rng,
}

impl SimState {
    pub(crate) fn check(&self, agent: AgentId) -> Result<(), SimError> {
        self.registry.record(agent).map(|_| ())
    }

    pub(crate) fn available_ports(&self, agent: AgentId) -> Result<Vec<Port>, SimError> {
        let position = self.registry.position(agent)?;
        let vertex = self
            .topology
            .vertex(position)
            .ok_or(SimError::UnknownVertex(position))?;
        Ok(vertex.ports())
    }

    pub(crate) fn id(&self, agent: AgentId) -> Result<Option<u64>, SimError> {
        let id = self.registry.id(agent)?;
        if self.config.anonymous {
            self.diagnostic(agent, "agents are anonymous");
            return Ok(None);
        }
        Ok(Some(id))
    }

    pub(crate) fn position_id(&self, agent: AgentId) -> Result<Option<usize>, SimError> {
        let position = self.registry.position(agent)?;
        if self.config.anonymous_topology {
            self.diagnostic(agent, "graph is anonymous");
            return Ok(None);
        }
        Ok(self.topology.vertex_id(position))
    }

    pub(crate) fn sim_step(&self, agent: AgentId) -> Result<Option<u64>, SimError> {
        self.check(agent)?;
        if !self.config.synchronous {
            self.diagnostic(agent, "simulation is asynchronous");
            return Ok(None);
        }
        Ok(Some(self.step))
    }

    /// Checks a move request without applying it.
    pub(crate) fn is_moving_legal(&self, agent: AgentId, port: Port) -> Result<bool, SimError> {
        let record = self.registry.record(agent)?;

        if !self.available_ports(agent)?.contains(&port) {
            self.diagnostic(agent, "move through non-existing port");
            return Ok(false);
        }
        if record.last_move == self.step {
            self.diagnostic(agent, "already moved this round");
            return Ok(false);
        }
        if self.config.synchronous && self.step % u64::from(record.latency) != 0 {
            self.diagnostic(agent, "latency does not allow a move this round");
            return Ok(false);
        }
        Ok(true)
    }

    /// Applies (asynchronous) or buffers (synchronous) a legal move.
    pub(crate) fn ask_for_moving(&mut self, agent: AgentId, port: Port) -> Result<bool, SimError> {
        if !self.is_moving_legal(agent, port)? {
            return Ok(false);
        }

        self.registry.set_last_move(agent, self.step)?;
        if self.config.synchronous {
            self.pending_moves.push((agent, port));
        } else {
            self.registry.move_agent(agent, port, &self.topology)?;
        }
        self.agents[agent.index()].record_move();
        Ok(true)
    }

    fn diagnostic(&self, agent: AgentId, message: &str) {
        if self.config.verbose {
            let id = self.registry.id(agent).unwrap_or_default();
            warn!(agent = id, step = self.step, "{}", message);
        }
    }
}

/// Discrete-round simulation of mobile agents on a port graph.
pub struct Simulation {
    state: SimState,
    algorithm: Algorithm,
}

impl Simulation {
    /// Creates `config.agents_number` agents without preferences.
    pub fn new<F>(topology: PortGraph, config: SimConfig, algorithm: F) -> Result<Self, SimError>
    where
        F: FnMut(&mut AgentContext<'_>) + 'static,
    {
        let agents = vec![Agent::new(); config.agents_number];
        Self::with_agents(topology, agents, config, algorithm)
    }

    /// Joins the given agents to a new simulation, resolving their
    /// preferences against `topology`.
    ///
    /// `config.agents_number` is overwritten with the number of agents.
    pub fn with_agents<F>(
        topology: PortGraph,
        agents: Vec<Agent>,
        mut config: SimConfig,
        algorithm: F,
    ) -> Result<Self, SimError>
    where
        F: FnMut(&mut AgentContext<'_>) + 'static,
    {
        config.agents_number = agents.len();

        let mut registry_rng = ChaCha8Rng::seed_from_u64(config.seed.wrapping_mul(REGISTRY_SALT));
        let registry = AgentRegistry::new(&agents, &topology, &config.possible_latencies, &mut registry_rng)?;
        let rng = ChaCha8Rng::seed_from_u64(config.seed);

        debug!(
            agents = agents.len(),
            order = topology.order(),
            synchronous = config.synchronous,
            "simulation created"
        );

        Ok(Self {
            state: SimState {
                topology,
                registry,
                agents,
                config,
                step: 1,
                pending_moves: Vec::new(),
                rng,
            },
            algorithm: Box::new(algorithm),
        })
    }

    /// Runs one round: every agent is offered a turn, then the round
    /// counter advances.
    pub fn advance_round(&mut self) -> Result<(), SimError> {
        let synchronous = self.state.config.synchronous;
        if synchronous {
            self.state.pending_moves.clear();
        }

        let mut order: Vec<AgentId> = self.state.registry.handles().collect();
        if !synchronous {
            order.shuffle(&mut self.state.rng);
        }

        for agent in order {
            if !synchronous && self.state.rng.gen_bool(ASYNC_SKIP_PROBABILITY) {
                if self.state.config.verbose {
                    let id = self.state.registry.id(agent)?;
                    debug!(agent = id, step = self.state.step, "asynchrony skipped this turn");
                }
                continue;
            }

            let mut context = AgentContext::new(agent, &mut self.state);
            (self.algorithm)(&mut context);
        }

        if synchronous {
            let moves = std::mem::take(&mut self.state.pending_moves);
            self.state.registry.move_multiple_agents(&moves, &self.state.topology)?;
        }

        self.state.step += 1;
        Ok(())
    }

    /// Runs `rounds` rounds back to back.
    pub fn run(&mut self, rounds: u64) -> Result<(), SimError> {
        for _ in 0..rounds {
            self.advance_round()?;
        }
        Ok(())
    }

    /// Number of the next round to run (starts at 1).
    pub fn step(&self) -> u64 {
        self.state.step
    }

    pub fn topology(&self) -> &PortGraph {
        &self.state.topology
    }

    pub fn registry(&self) -> &AgentRegistry {
        &self.state.registry
    }

    pub fn config(&self) -> &SimConfig {
        &self.state.config
    }

    pub fn model(&self) -> SimModel {
        let config = &self.state.config;
        SimModel {
            anonymous: config.anonymous,
            synchronous: config.synchronous,
            anonymous_topology: config.anonymous_topology,
            agents_number: config.agents_number,
            possible_latencies: config.possible_latencies.clone(),
        }
    }

    /// Handle of the agent registered at `index`.
    pub fn get_agent(&self, index: usize) -> Option<AgentId> {
        (index < self.state.agents.len()).then(|| AgentId::new(index))
    }

    /// Agents in registration order.
    pub fn agents(&self) -> &[Agent] {
        &self.state.agents
    }

    pub fn agent(&self, agent: AgentId) -> Result<&Agent, SimError> {
        self.state
            .agents
            .get(agent.index())
            .ok_or(SimError::UnknownAgent(agent.index()))
    }

    pub fn ask_for_available_ports(&self, agent: AgentId) -> Result<Vec<Port>, SimError> {
        self.state.available_ports(agent)
    }

    pub fn ask_for_id(&self, agent: AgentId) -> Result<Option<u64>, SimError> {
        self.state.id(agent)
    }

    pub fn ask_for_port_back(&self, agent: AgentId) -> Result<Option<Port>, SimError> {
        self.state.registry.port_back(agent)
    }

    pub fn ask_for_position_id(&self, agent: AgentId) -> Result<Option<usize>, SimError> {
        self.state.position_id(agent)
    }

    pub fn ask_for_sim_step(&self, agent: AgentId) -> Result<Option<u64>, SimError> {
        self.state.sim_step(agent)
    }

    pub fn ask_for_position_contains_mate(&self, agent: AgentId) -> Result<bool, SimError> {
        self.state.registry.contains_mate(agent)
    }

    pub fn ask_for_moves_nb(&self, agent: AgentId) -> Result<u64, SimError> {
        self.agent(agent).map(Agent::moves_nb)
    }

    /// Whether `agent` could move through `port` right now.
    pub fn is_moving_legal(&self, agent: AgentId, port: Port) -> Result<bool, SimError> {
        self.state.is_moving_legal(agent, port)
    }
}
