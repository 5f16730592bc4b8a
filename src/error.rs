use thiserror::Error;

#[derive(Error, Debug)]
pub enum SwarmError {
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV Error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON Parsing Error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration Error: {0}")]
    Config(String),

    #[error("Objective Error: {0}")]
    Objective(String),

    #[error("Objective returned {actual} fitness values for a swarm of {expected}")]
    FitnessShape { expected: usize, actual: usize },

    #[error("Objective returned non-finite fitness {value} for candidate {index}")]
    NonFiniteFitness { index: usize, value: f64 },

    #[error("Sink Error: {0}")]
    Sink(String),
}

pub type SwarmResult<T> = Result<T, SwarmError>;

impl SwarmError {
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
