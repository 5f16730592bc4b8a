use crate::reports;
use clap::Args;
use strum::IntoEnumIterator;
use swarmforge::config::Config;
use swarmforge::error::SwarmResult;
use swarmforge::functions::KnownFunction;
use swarmforge::optimizer::{Optimizer, Topology};
use tracing::info;

#[derive(Args, Debug, Clone)]
pub struct CompareArgs {
    #[command(flatten)]
    pub config: Config,

    #[arg(short = 'S', long)]
    pub seed: Option<u64>,

    /// Compare on every built-in function instead of the configured one
    #[arg(long, default_value_t = false)]
    pub all: bool,
}

pub fn run(args: CompareArgs, config: Config) -> SwarmResult<()> {
    let functions: Vec<KnownFunction> = if args.all {
        KnownFunction::iter().collect()
    } else {
        vec![config.problem.function]
    };

    // `--topology` is ignored here; both are always run
    let topologies = [
        Topology::Global,
        Topology::Ring {
            neighbors: config.swarm.neighbors,
        },
    ];

    // every optimizer is validated before the first run
    let mut planned = Vec::new();
    for function in functions {
        let mut cfg = config.clone();
        cfg.problem.function = function;
        let base = cfg.to_options()?;

        for topology in topologies {
            let options = base.clone().with_topology(topology);
            planned.push((function, topology, Optimizer::new(function, options)?));
        }
    }

    println!("\n🔎 === TOPOLOGY COMPARISON === 🔎");
    let mut results = Vec::new();
    for (function, topology, optimizer) in planned {
        info!("Running {} with {} topology", function, topology);
        let result = optimizer.run(args.seed)?;
        results.push((format!("{} / {}", function, topology), result));
    }

    reports::print_comparison_report(&results);
    Ok(())
}
