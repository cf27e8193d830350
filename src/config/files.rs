use super::traits::{section_error, ConfigSection};
use crate::data::connectors::genome_files::GenomeFileSet;
use crate::error::GenevoError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Locations of the genome description, target profile and reports
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilesConfig {
    /// Parameter file describing the initial genome
    pub initial_parameters: PathBuf,
    /// Folder the genome file names in the parameter file are relative to
    pub parameter_folder: PathBuf,
    pub environment: PathBuf,
    pub next_generation: GenomeFileSet,
    pub last_accepted: GenomeFileSet,
    pub report_csv: Option<PathBuf>,
    pub summary_json: Option<PathBuf>,
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            initial_parameters: PathBuf::from("TwisTranscripT/params.ini"),
            parameter_folder: PathBuf::from("TwisTranscripT"),
            environment: PathBuf::from("environment.dat"),
            next_generation: GenomeFileSet::in_folder("TwisTranscripT/nextGen", "nextGen"),
            last_accepted: GenomeFileSet::in_folder("TwisTranscripT/nextGen", "last"),
            report_csv: None,
            summary_json: None,
        }
    }
}

impl ConfigSection for FilesConfig {
    fn section_name() -> &'static str {
        "files"
    }

    fn validate(&self) -> Result<(), GenevoError> {
        let proposal = self.next_generation.paths();
        if self.last_accepted.paths().iter().any(|p| proposal.contains(p)) {
            return Err(section_error::<Self>(
                "Last accepted genome files must differ from the next generation files",
            ));
        }
        Ok(())
    }
}
