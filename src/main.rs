use clap::{CommandFactory, FromArgMatches, Parser, Subcommand};
use std::process;
use swarmforge::config::Config;
use tracing::{error, info, Level};

mod cmd;
mod reports;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// JSON file with base settings; explicit flags override it
    #[arg(global = true, long)]
    config: Option<String>,

    #[arg(global = true, long, default_value_t = false)]
    debug: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    Run(cmd::run::RunArgs),
    Compare(cmd::compare::CompareArgs),
}

fn main() {
    let matches = Cli::command().get_matches();
    let cli = Cli::from_arg_matches(&matches).unwrap_or_else(|e| e.exit());

    let level = if cli.debug { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt().with_max_level(level).init();

    info!("🚀 Initializing SwarmForge...");

    let (cli_config, sub_matches) = match &cli.command {
        Commands::Run(args) => (&args.config, matches.subcommand_matches("run")),
        Commands::Compare(args) => (&args.config, matches.subcommand_matches("compare")),
    };

    // Resolve config: JSON file as base, explicit CLI flags on top
    let config = match (&cli.config, sub_matches) {
        (Some(path), Some(sub)) => {
            info!("📂 Loading Config from: {}", path);
            let mut base = Config::load_from_file(path).unwrap_or_else(|e| {
                error!("{}", e);
                process::exit(1);
            });
            base.merge_from_cli(cli_config, sub);
            base
        }
        _ => cli_config.clone(),
    };

    let outcome = match cli.command {
        Commands::Run(args) => cmd::run::run(args, config),
        Commands::Compare(args) => cmd::compare::run(args, config),
    };

    if let Err(e) = outcome {
        error!("❌ {}", e);
        process::exit(1);
    }
}
