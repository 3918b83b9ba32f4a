//! Named topologies and decision functions for command-line runs.

use crate::algorithms;
use crate::context::AgentContext;

use mas_graph::{generators, PortGraph};
use rand::Rng;

/// Built-in topology families.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TopologyKind {
    Path,
    Cycle,
    Tree,
    BinaryTree,
    Line,
    Clique,
    Grid,
    Random,
}

/// Size parameters shared by the topology families.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TopologyParams {
    /// Vertex count (height for binary trees)
    pub size: usize,
    pub width: usize,
    pub height: usize,
    /// Edge probability for random graphs
    pub probability: f64,
}

impl Default for TopologyParams {
    fn default() -> Self {
        Self {
            size: 10,
            width: 4,
            height: 4,
            probability: 0.4,
        }
    }
}

impl TopologyKind {
    pub fn all() -> Vec<Self> {
        vec![
            Self::Path,
            Self::Cycle,
            Self::Tree,
            Self::BinaryTree,
            Self::Line,
            Self::Clique,
            Self::Grid,
            Self::Random,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Path => "path",
            Self::Cycle => "cycle",
            Self::Tree => "tree",
            Self::BinaryTree => "binary_tree",
            Self::Line => "line",
            Self::Clique => "clique",
            Self::Grid => "grid",
            Self::Random => "random",
        }
    }

    /// Generates a graph of this family.
    pub fn build<R: Rng + ?Sized>(&self, params: &TopologyParams, rng: &mut R) -> PortGraph {
        match self {
            Self::Path => generators::path(params.size),
            Self::Cycle => generators::cycle(params.size),
            Self::Tree => generators::tree(params.size, rng),
            Self::BinaryTree => generators::binary_tree(params.size.min(20) as u32),
            Self::Line => generators::line(params.size),
            Self::Clique => generators::clique(params.size),
            Self::Grid => generators::grid(params.width, params.height),
            Self::Random => generators::random_graph(params.size, params.probability, rng),
        }
    }
}

impl std::str::FromStr for TopologyKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "path" => Ok(Self::Path),
            "cycle" | "ring" => Ok(Self::Cycle),
            "tree" => Ok(Self::Tree),
            "binary_tree" | "binarytree" => Ok(Self::BinaryTree),
            "line" => Ok(Self::Line),
            "clique" | "complete" => Ok(Self::Clique),
            "grid" => Ok(Self::Grid),
            "random" | "erdos_renyi" => Ok(Self::Random),
            _ => Err(format!("Unknown topology: {}", s)),
        }
    }
}

/// Built-in decision functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlgorithmKind {
    Nothing,
    RandomWalk,
    RotorWalk,
}

impl AlgorithmKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Nothing => "nothing",
            Self::RandomWalk => "random_walk",
            Self::RotorWalk => "rotor_walk",
        }
    }

    pub fn decision(&self) -> fn(&mut AgentContext<'_>) {
        match self {
            Self::Nothing => algorithms::nothing,
            Self::RandomWalk => algorithms::random_walk,
            Self::RotorWalk => algorithms::rotor_walk,
        }
    }
}

impl std::str::FromStr for AlgorithmKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "nothing" | "idle" => Ok(Self::Nothing),
            "random_walk" | "randomwalk" | "random" => Ok(Self::RandomWalk),
            "rotor_walk" | "rotorwalk" | "rotor" => Ok(Self::RotorWalk),
            _ => Err(format!("Unknown algorithm: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::{SimConfig, Simulation};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_topology_names_parse_back() {
        for kind in TopologyKind::all() {
            assert_eq!(kind.name().parse::<TopologyKind>(), Ok(kind));
        }
        assert_eq!("RING".parse::<TopologyKind>(), Ok(TopologyKind::Cycle));
        assert!("torus".parse::<TopologyKind>().is_err());
    }

    #[test]
    fn test_build_sizes() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let params = TopologyParams {
            size: 6,
            width: 2,
            height: 3,
            probability: 1.0,
        };

        assert_eq!(TopologyKind::Path.build(&params, &mut rng).order(), 6);
        assert_eq!(TopologyKind::Tree.build(&params, &mut rng).size(), 5);
        assert_eq!(TopologyKind::BinaryTree.build(&params, &mut rng).order(), 63);
        assert_eq!(TopologyKind::Grid.build(&params, &mut rng).order(), 6);
        assert_eq!(TopologyKind::Random.build(&params, &mut rng).size(), 15);
    }

    #[test]
    fn test_algorithm_lookup() {
        assert_eq!("rotor".parse::<AlgorithmKind>(), Ok(AlgorithmKind::RotorWalk));
        assert!("dfs".parse::<AlgorithmKind>().is_err());

        let mut sim = Simulation::new(
            generators::cycle(4),
            SimConfig::default(),
            AlgorithmKind::Nothing.decision(),
        )
        .unwrap();
        sim.run(3).unwrap();
        assert_eq!(sim.agents()[0].moves_nb(), 0);
    }
}
