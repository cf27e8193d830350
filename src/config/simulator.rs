use super::traits::{section_error, ConfigSection};
use crate::engines::evaluation::simulator::RetryPolicy;
use crate::error::GenevoError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// How to invoke the transcription simulator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulatorConfig {
    pub interpreter: String,
    pub script: PathBuf,
    /// Parameter file pointing at the proposal genome files
    pub params_file: PathBuf,
    /// Copy of the simulator's standard output
    pub output_file: PathBuf,
    pub max_attempts: usize,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            interpreter: "python3".to_string(),
            script: PathBuf::from("TwisTranscripT/start_simulation.py"),
            params_file: PathBuf::from("TwisTranscripT/params_nextGen.ini"),
            output_file: PathBuf::from("out.txt"),
            max_attempts: 20,
        }
    }
}

impl SimulatorConfig {
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_attempts)
    }
}

impl ConfigSection for SimulatorConfig {
    fn section_name() -> &'static str {
        "simulator"
    }

    fn validate(&self) -> Result<(), GenevoError> {
        if self.interpreter.trim().is_empty() {
            return Err(section_error::<Self>("Interpreter must not be empty"));
        }
        if self.max_attempts == 0 {
            return Err(section_error::<Self>("At least one simulation attempt is required"));
        }
        Ok(())
    }
}
