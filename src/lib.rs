pub mod bounds;
pub mod config;
pub mod error;
pub mod functions;
pub mod objective;
pub mod optimizer;
pub mod sink;
// cmd and reports belong to the binary crate (main.rs).

pub use bounds::BoundsModel;
pub use error::{SwarmError, SwarmResult};
pub use objective::{ObjectiveFunction, PerCandidate};
pub use optimizer::{
    OptimizationOptions, OptimizationResult, Optimizer, RunLog, SwarmMatrix, SwarmState, Topology,
};
pub use sink::{CsvSink, HistorySink, IterationSink, NullSink};
