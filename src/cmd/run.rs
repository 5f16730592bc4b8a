use crate::reports;
use clap::Args;
use std::fs::File;
use std::io::BufWriter;
use swarmforge::config::Config;
use swarmforge::error::SwarmResult;
use swarmforge::optimizer::{OptimizationResult, Optimizer};
use swarmforge::sink::{CsvSink, IterationSink, NullSink};
use tracing::info;

#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    #[command(flatten)]
    pub config: Config,

    #[arg(short = 'S', long)]
    pub seed: Option<u64>,

    /// Independent restarts; the best result is kept
    #[arg(short = 'a', long, default_value_t = 1)]
    pub attempts: usize,

    /// Append the global best of every iteration to this CSV file
    #[arg(long)]
    pub csv: Option<String>,

    /// Parameters per CSV row (0 = whole vector on one row)
    #[arg(long, default_value_t = 0)]
    pub csv_group: usize,

    /// Write the diagnostics log of the best attempt as JSON
    #[arg(long)]
    pub log_json: Option<String>,
}

pub fn run(args: RunArgs, config: Config) -> SwarmResult<()> {
    let options = config.to_options()?;
    let function = config.problem.function;
    info!(
        "🎯 Minimizing {} over {} dims in [{}]",
        function,
        options.dimensions(),
        options.bounds
    );

    let mut sink: Box<dyn IterationSink> = match &args.csv {
        Some(path) => {
            let group = if args.csv_group == 0 {
                options.dimensions()
            } else {
                args.csv_group
            };
            info!("📝 Logging iterations to {}", path);
            Box::new(CsvSink::create(path, group)?)
        }
        None => Box::new(NullSink),
    };

    let report_every = options.report_interval.max(1);
    let optimizer = Optimizer::new(function, options)?;
    let attempts = args.attempts.max(1);

    let mut best: Option<OptimizationResult> = None;
    for i in 1..=attempts {
        if attempts > 1 {
            info!("➡️  Attempt #{} of {}", i, attempts);
        }
        let seed = args
            .seed
            .map(|s| s.wrapping_add((i as u64 - 1).wrapping_mul(100)));
        let result = optimizer.run_with_sink(seed, sink.as_mut())?;

        if best.as_ref().map_or(true, |b| result.best_fitness < b.best_fitness) {
            best = Some(result);
        }
    }

    let Some(best) = best else {
        return Ok(());
    };

    if let Some(path) = &args.log_json {
        let writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(writer, &best.log)?;
        info!("💾 Run log written to {}", path);
    }

    reports::print_best_position("OPTIMIZED", &best.best_position);
    reports::print_convergence_table(&best.log, report_every);

    println!("\n=== 🏆 FINAL RESULT ===");
    println!("Best fitness: {:.10e}", best.best_fitness);
    println!("Diversifications: {}", best.log.diversification_count);
    Ok(())
}
