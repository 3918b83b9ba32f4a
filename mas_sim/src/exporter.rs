//! JSON round trace.
//!
//! Captures where every agent stands after each round so runs can be
//! replayed or plotted outside the simulator.

use crate::error::SimError;
use crate::simulation::{SimModel, Simulation};

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;

/// State of one agent after a round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentFrame {
    /// Registration index
    pub agent: usize,

    /// Unique identifier, omitted for anonymous agents
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,

    /// Dense identifier of the vertex the agent stands on
    pub position: usize,

    pub colocated: bool,

    pub moves: u64,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub status: String,
}

/// Snapshot of all agents after one round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundFrame {
    /// Number of rounds completed (0 = initial placement)
    pub round: u64,

    pub agents: Vec<AgentFrame>,
}

impl RoundFrame {
    /// Captures the current state of `sim`.
    pub fn capture(sim: &Simulation) -> Result<Self, SimError> {
        let registry = sim.registry();
        let anonymous = sim.config().anonymous;
        let mut agents = Vec::with_capacity(registry.len());

        for handle in registry.handles() {
            let record = registry.record(handle)?;
            let agent = sim.agent(handle)?;
            let position = sim
                .topology()
                .vertex_id(record.position)
                .ok_or(SimError::UnknownVertex(record.position))?;

            agents.push(AgentFrame {
                agent: handle.index(),
                id: (!anonymous).then_some(record.id),
                position,
                colocated: record.contains_mate,
                moves: agent.moves_nb(),
                status: agent.status().to_string(),
            });
        }

        Ok(Self {
            round: sim.step() - 1,
            agents,
        })
    }
}

/// Complete simulation export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimExport {
    /// Seed used
    pub seed: u64,

    /// Model the run used
    pub model: SimModel,

    /// Topology order
    pub order: usize,

    /// All frames
    pub frames: Vec<RoundFrame>,
}

impl SimExport {
    /// Creates an empty export for `sim`.
    pub fn new(sim: &Simulation) -> Self {
        Self {
            seed: sim.config().seed,
            model: sim.model(),
            order: sim.topology().order(),
            frames: Vec::new(),
        }
    }

    /// Adds a frame.
    pub fn add_frame(&mut self, frame: RoundFrame) {
        self.frames.push(frame);
    }

    /// Captures `sim` and appends the frame.
    pub fn record(&mut self, sim: &Simulation) -> Result<(), SimError> {
        self.add_frame(RoundFrame::capture(sim)?);
        Ok(())
    }

    /// Writes to a JSON file.
    pub fn write_to_file(&self, path: &str) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        let mut file = File::create(path)?;
        file.write_all(json.as_bytes())?;
        Ok(())
    }
}
