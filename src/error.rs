use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenevoError {
    #[error("No valid mutation position found after {attempts} attempts")]
    SamplingExhausted { attempts: usize },

    #[error("Degenerate expression: {0}")]
    DegenerateExpression(String),

    #[error("Malformed simulator output: {0}")]
    MalformedSimulatorOutput(String),

    #[error("Precondition violated: {0}")]
    PreconditionViolation(String),

    #[error("Simulator error: {0}")]
    Simulator(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Input file error: {0}")]
    InputFile(String),

    #[error("Report error: {0}")]
    Report(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("Serde error: {0}")]
    Serde(#[from] serde_json::Error),
}

impl GenevoError {
    /// Whether re-running the expression simulation may clear the failure.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            GenevoError::MalformedSimulatorOutput(_)
                | GenevoError::DegenerateExpression(_)
                | GenevoError::Io(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, GenevoError>;
