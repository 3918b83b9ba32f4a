//! Mobile agent simulator CLI
//!
//! Builds or loads a topology, runs agents for a number of rounds and
//! reports where they ended up.

use clap::Parser;
use mas_graph::{PortGraph, VertexNaming};
use mas_sim::scenarios::{AlgorithmKind, TopologyKind, TopologyParams};
use mas_sim::{SimConfig, SimError, SimExport, Simulation};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::path::PathBuf;
use tracing::{debug, error, info, Level};
use tracing_subscriber::FmtSubscriber;

/// Salt deriving the topology seed from the run seed.
const TOPOLOGY_SALT: u64 = 0x517cc1b727220a95;

/// Mobile agent simulator over port-labeled graphs
#[derive(Parser, Debug)]
#[command(name = "mas-sim")]
#[command(about = "Run mobile agents on port-labeled graphs", long_about = None)]
struct Args {
    /// Master seed for determinism
    #[arg(short, long, default_value = "42")]
    seed: u64,

    /// Topology (path, cycle, tree, binary_tree, line, clique, grid, random)
    #[arg(short, long, default_value = "random")]
    topology: String,

    /// Vertex count (height for binary_tree)
    #[arg(long, default_value = "10")]
    size: usize,

    /// Grid width
    #[arg(long, default_value = "4")]
    width: usize,

    /// Grid height
    #[arg(long, default_value = "4")]
    height: usize,

    /// Edge probability for random graphs
    #[arg(long, default_value = "0.4")]
    probability: f64,

    /// Load the topology from an adjacency file instead
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Number of agents
    #[arg(short, long, default_value = "1")]
    agents: usize,

    /// Candidate latencies, comma separated
    #[arg(short, long, value_delimiter = ',', default_value = "1")]
    latencies: Vec<u32>,

    /// Number of rounds to run
    #[arg(short, long, default_value = "10")]
    rounds: u64,

    /// Decision function (nothing, random_walk, rotor_walk)
    #[arg(long, default_value = "random_walk")]
    algorithm: String,

    /// Hide agent identifiers
    #[arg(long)]
    anonymous: bool,

    /// Run the asynchronous model
    #[arg(long)]
    asynchronous: bool,

    /// Hide vertex identifiers
    #[arg(long)]
    anonymous_topology: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// JSON output for scripting
    #[arg(long)]
    json: bool,

    /// Export a per-round trace to a JSON file
    #[arg(long)]
    export: Option<String>,

    /// Save the topology as adjacency text
    #[arg(long)]
    save: Option<PathBuf>,
}

fn load_topology(args: &Args) -> Result<PortGraph, SimError> {
    if let Some(path) = &args.file {
        info!("Loading topology from {}", path.display());
        return Ok(PortGraph::load(path)?);
    }

    let kind: TopologyKind = args.topology.parse().unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        eprintln!("Available topologies: path, cycle, tree, binary_tree, line, clique, grid, random");
        std::process::exit(1);
    });
    let params = TopologyParams {
        size: args.size,
        width: args.width,
        height: args.height,
        probability: args.probability,
    };
    let mut rng = ChaCha8Rng::seed_from_u64(args.seed.wrapping_mul(TOPOLOGY_SALT));

    debug!("Generating {} topology", kind.name());
    Ok(kind.build(&params, &mut rng))
}

fn run(args: &Args) -> Result<(), SimError> {
    let algorithm: AlgorithmKind = args.algorithm.parse().unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        eprintln!("Available algorithms: nothing, random_walk, rotor_walk");
        std::process::exit(1);
    });

    let topology = load_topology(args)?;
    if let Some(path) = &args.save {
        topology.save(path, VertexNaming::Name)?;
        info!("Saved topology to {}", path.display());
    }

    let config = SimConfig {
        seed: args.seed,
        agents_number: args.agents,
        possible_latencies: args.latencies.clone(),
        anonymous: args.anonymous,
        synchronous: !args.asynchronous,
        anonymous_topology: args.anonymous_topology,
        verbose: args.verbose,
    };
    let mut sim = Simulation::new(topology, config, algorithm.decision())?;

    let mut export = args.export.as_ref().map(|_| SimExport::new(&sim));
    if let Some(export) = export.as_mut() {
        export.record(&sim)?;
    }

    for _ in 0..args.rounds {
        sim.advance_round()?;
        if let Some(export) = export.as_mut() {
            export.record(&sim)?;
        }
        debug!("round {} done", sim.step() - 1);
    }

    if let (Some(export), Some(path)) = (&export, &args.export) {
        if let Err(e) = export.write_to_file(path) {
            error!("Failed to write export: {:?}", e);
        } else {
            info!("Exported {} frames to {}", export.frames.len(), path);
        }
    }

    let registry = sim.registry();
    let topology = sim.topology();
    let positions: Vec<Option<usize>> = registry
        .handles()
        .map(|a| registry.position(a).map(|p| topology.vertex_id(p)))
        .collect::<Result<_, _>>()?;
    let moves: Vec<u64> = sim.agents().iter().map(|a| a.moves_nb()).collect();

    if args.json {
        let summary = serde_json::json!({
            "seed": args.seed,
            "model": sim.model(),
            "algorithm": algorithm.name(),
            "rounds": args.rounds,
            "order": topology.order(),
            "size": topology.size(),
            "diameter": topology.diameter(),
            "planar": topology.is_planar(),
            "positions": positions,
            "moves": moves,
        });
        match serde_json::to_string_pretty(&summary) {
            Ok(text) => println!("{}", text),
            Err(e) => error!("Failed to render summary: {}", e),
        }
    } else {
        let model = sim.model();
        info!(
            "Model: synchronous={} anonymous={} anonymous_topology={} latencies={:?}",
            model.synchronous, model.anonymous, model.anonymous_topology, model.possible_latencies
        );
        info!(
            "Topology: order={} size={} diameter={} planar={}",
            topology.order(),
            topology.size(),
            topology.diameter(),
            topology.is_planar()
        );
        info!("Ran {} rounds of {}", args.rounds, algorithm.name());
        for (index, (position, moves)) in positions.iter().zip(&moves).enumerate() {
            match position {
                Some(id) => info!("  agent {} at vertex {} after {} moves", index, id, moves),
                None => info!("  agent {} off the topology after {} moves", index, moves),
            }
        }
    }

    Ok(())
}

fn main() {
    let args = Args::parse();

    // Initialize logging
    let level = if args.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }

    if !args.json {
        info!("Mobile agent simulator v{}", env!("CARGO_PKG_VERSION"));
    }

    if let Err(e) = run(&args) {
        error!("Simulation failed: {}", e);
        std::process::exit(1);
    }
}
