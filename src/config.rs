use crate::bounds::BoundsModel;
use crate::error::{SwarmError, SwarmResult};
use crate::functions::KnownFunction;
use crate::optimizer::{OptimizationOptions, Topology};
use clap::{parser::ValueSource, ArgMatches, Args};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use strum_macros::{Display, EnumString};

#[derive(Args, Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    #[command(flatten)]
    pub swarm: SwarmParams,
    #[command(flatten)]
    pub problem: ProblemParams,
}

#[derive(Debug, Clone, Copy, EnumString, Display, PartialEq, Eq, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[serde(rename_all = "snake_case")]
pub enum TopologyKind {
    #[strum(to_string = "global", serialize = "gbest")]
    Global,
    #[strum(to_string = "ring", serialize = "lbest")]
    Ring,
}

#[derive(Args, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SwarmParams {
    #[arg(long, default_value_t = 50)]
    pub particles: usize,
    #[arg(long, default_value_t = 100)]
    pub iterations: usize,
    #[arg(long, default_value_t = TopologyKind::Global)]
    pub topology: TopologyKind,
    /// Ring neighbourhood size (odd, smaller than the swarm)
    #[arg(long, default_value_t = 3)]
    pub neighbors: usize,
    #[arg(long, default_value_t = 0.9)]
    pub inertia_start: f64,
    #[arg(long, default_value_t = 0.4)]
    pub inertia_end: f64,
    #[arg(long, default_value_t = 2.05)]
    pub cognitive: f64,
    #[arg(long, default_value_t = 2.05)]
    pub social: f64,
    #[arg(long, default_value_t = 15)]
    pub stagnation_patience: usize,
    #[arg(long, default_value_t = 10)]
    pub report_interval: usize,
}

impl Default for SwarmParams {
    fn default() -> Self {
        Self {
            particles: 50,
            iterations: 100,
            topology: TopologyKind::Global,
            neighbors: 3,
            inertia_start: 0.9,
            inertia_end: 0.4,
            cognitive: 2.05,
            social: 2.05,
            stagnation_patience: 15,
            report_interval: 10,
        }
    }
}

#[derive(Args, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProblemParams {
    #[arg(short, long, default_value_t = KnownFunction::Sphere)]
    pub function: KnownFunction,
    #[arg(short, long, default_value_t = 5)]
    pub dimensions: usize,
    /// "min:max,min:max,..." (overrides the function domain and --dimensions)
    #[arg(long, allow_hyphen_values = true)]
    pub bounds: Option<String>,
}

impl Default for ProblemParams {
    fn default() -> Self {
        Self {
            function: KnownFunction::Sphere,
            dimensions: 5,
            bounds: None,
        }
    }
}

impl ProblemParams {
    pub fn resolve_bounds(&self) -> SwarmResult<BoundsModel> {
        match &self.bounds {
            Some(text) => BoundsModel::parse(text),
            None => self.function.default_bounds(self.dimensions),
        }
    }
}

impl SwarmParams {
    pub fn topology(&self) -> Topology {
        match self.topology {
            TopologyKind::Global => Topology::Global,
            TopologyKind::Ring => Topology::Ring {
                neighbors: self.neighbors,
            },
        }
    }
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> SwarmResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            SwarmError::Config(format!("failed to read config '{}': {}", path.display(), e))
        })?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Validated engine options. Every configuration error surfaces here.
    pub fn to_options(&self) -> SwarmResult<OptimizationOptions> {
        let s = &self.swarm;
        let options = OptimizationOptions::new(self.problem.resolve_bounds()?)
            .with_particles(s.particles)
            .with_iterations(s.iterations)
            .with_topology(s.topology())
            .with_inertia(s.inertia_start, s.inertia_end)
            .with_coefficients(s.cognitive, s.social)
            .with_patience(s.stagnation_patience)
            .with_report_interval(s.report_interval);
        options.validate()?;
        Ok(options)
    }

    /// Copies onto `self` only the values the user typed on the command line,
    /// so a config file stays the base and explicit flags win.
    pub fn merge_from_cli(&mut self, cli: &Config, matches: &ArgMatches) {
        macro_rules! update_if_present {
            ($section:ident . $field:ident) => {
                if matches.value_source(stringify!($field)) == Some(ValueSource::CommandLine) {
                    self.$section.$field = cli.$section.$field.clone();
                }
            };
        }

        update_if_present!(swarm.particles);
        update_if_present!(swarm.iterations);
        update_if_present!(swarm.topology);
        update_if_present!(swarm.neighbors);
        update_if_present!(swarm.inertia_start);
        update_if_present!(swarm.inertia_end);
        update_if_present!(swarm.cognitive);
        update_if_present!(swarm.social);
        update_if_present!(swarm.stagnation_patience);
        update_if_present!(swarm.report_interval);

        update_if_present!(problem.function);
        update_if_present!(problem.dimensions);
        update_if_present!(problem.bounds);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_topology_aliases() {
        assert_eq!("lbest".parse::<TopologyKind>().unwrap(), TopologyKind::Ring);
        assert_eq!("GBEST".parse::<TopologyKind>().unwrap(), TopologyKind::Global);
        assert_eq!(TopologyKind::Ring.to_string(), "ring");
    }

    #[test]
    fn test_defaults_produce_valid_options() {
        let opts = Config::default().to_options().unwrap();
        assert_eq!(opts.dimensions(), 5);
        assert_eq!(opts.topology, Topology::Global);
        assert_eq!(opts.bounds.min()[0], -10.0);
    }
}
