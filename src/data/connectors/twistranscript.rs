use super::genome_files::GenomeFileSet;
use crate::config::SimulatorConfig;
use crate::engines::evaluation::simulator::ExpressionSimulator;
use crate::error::{GenevoError, Result};
use crate::types::{ExpressionVector, GenomeLayout, Position};
use regex::Regex;
use std::path::PathBuf;
use std::process::Command;
use std::sync::LazyLock;

static TRANSCRIPT_COUNT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Transcript ID [0-9]+ : ([0-9]+)").expect("transcript count pattern"));

/// Fifth column of the transcript table is the transcript start
static TRANSCRIPT_START: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^[0-9]+ +[0-9]+ +[0-9]+ +-?[0-9]+ +([0-9]+)").expect("transcript start pattern")
});

/// Runs the TwisTranscripT `start_simulation.py` script on a genome layout.
///
/// Each call rewrites the proposal genome files the parameter file points
/// to, runs the script synchronously and scrapes the transcript counts
/// from its standard output.
pub struct TwisTranscriptSimulator {
    interpreter: String,
    script: PathBuf,
    params_file: PathBuf,
    output_file: PathBuf,
    genome_files: GenomeFileSet,
}

impl TwisTranscriptSimulator {
    pub fn new(config: &SimulatorConfig, genome_files: GenomeFileSet) -> Self {
        Self {
            interpreter: config.interpreter.clone(),
            script: config.script.clone(),
            params_file: config.params_file.clone(),
            output_file: config.output_file.clone(),
            genome_files,
        }
    }

    fn run_script(&self) -> Result<String> {
        let output = Command::new(&self.interpreter)
            .arg(&self.script)
            .arg(&self.params_file)
            .output()
            .map_err(|e| {
                GenevoError::Simulator(format!(
                    "cannot run {} {}: {}",
                    self.interpreter,
                    self.script.display(),
                    e
                ))
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        std::fs::write(&self.output_file, &stdout)?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(GenevoError::MalformedSimulatorOutput(format!(
                "simulator exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }
        Ok(stdout)
    }
}

impl ExpressionSimulator for TwisTranscriptSimulator {
    fn simulate(&mut self, layout: &GenomeLayout) -> Result<ExpressionVector> {
        self.genome_files.write_layout(layout)?;
        let stdout = self.run_script()?;
        parse_transcript_counts(&stdout, &layout.gene_starts)
    }
}

/// Map the transcript counts printed by the simulator back onto genes.
///
/// Transcripts may be renumbered by the simulator, so counts are matched
/// to genes through the start position listed in the transcript table.
/// Output without that table is accepted when it lists exactly one count
/// per gene.
pub fn parse_transcript_counts(output: &str, gene_starts: &[Position]) -> Result<ExpressionVector> {
    let counts: Vec<u64> = TRANSCRIPT_COUNT
        .captures_iter(output)
        .filter_map(|caps| caps[1].parse().ok())
        .collect();
    let starts: Vec<Position> = TRANSCRIPT_START
        .captures_iter(output)
        .filter_map(|caps| caps[1].parse().ok())
        .collect();

    if counts.is_empty() {
        return Err(GenevoError::MalformedSimulatorOutput(
            "no transcript count in simulator output".to_string(),
        ));
    }

    if starts.is_empty() {
        if counts.len() == gene_starts.len() {
            return Ok(counts);
        }
        return Err(GenevoError::MalformedSimulatorOutput(format!(
            "{} transcript counts for {} genes and no transcript table",
            counts.len(),
            gene_starts.len()
        )));
    }

    if starts.len() != counts.len() {
        return Err(GenevoError::MalformedSimulatorOutput(format!(
            "{} transcript starts but {} transcript counts",
            starts.len(),
            counts.len()
        )));
    }

    gene_starts
        .iter()
        .map(|gene_start| {
            starts
                .iter()
                .position(|s| s == gene_start)
                .map(|transcript| counts[transcript])
                .ok_or_else(|| {
                    GenevoError::MalformedSimulatorOutput(format!(
                        "no transcript starts at {}",
                        gene_start
                    ))
                })
        })
        .collect()
}
