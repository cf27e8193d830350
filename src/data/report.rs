use crate::engines::generation::history::{EvolutionHistory, EvolutionOutcome, Termination};
use crate::error::{GenevoError, Result};
use crate::types::ExpressionVector;
use chrono::{DateTime, Utc};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One row per generation: `generation`, `system_fitness`,
/// `proposed_fitness`, `status`, `event_type`. A `proposed_fitness` of
/// `0.0` stands for a proposal without a fitness (degenerate expression).
pub fn history_frame(history: &EvolutionHistory) -> Result<DataFrame> {
    let records = history.records();
    let df = df! {
        "generation" => records.iter().map(|r| r.generation as u64).collect::<Vec<_>>(),
        "system_fitness" => records.iter().map(|r| r.accepted_fitness).collect::<Vec<_>>(),
        "proposed_fitness" => records.iter().map(|r| r.proposed_fitness).collect::<Vec<_>>(),
        "status" => records.iter().map(|r| r.status.as_str()).collect::<Vec<_>>(),
        "event_type" => records.iter().map(|r| r.event_type.as_str()).collect::<Vec<_>>(),
    }?;
    Ok(df)
}

pub fn write_history_csv<P: AsRef<Path>>(path: P, history: &EvolutionHistory) -> Result<()> {
    let path = path.as_ref();
    let mut df = history_frame(history)?;
    let mut file = std::fs::File::create(path)
        .map_err(|e| GenevoError::Report(format!("cannot create {}: {}", path.display(), e)))?;
    CsvWriter::new(&mut file).include_header(true).finish(&mut df)?;
    log::info!("Wrote {} generations to {}", df.height(), path.display());
    Ok(())
}

/// Condensed description of a finished run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub started_at: String,
    pub finished_at: String,
    pub seed: Option<u64>,
    pub generations_completed: usize,
    pub accepted_mutations: usize,
    pub initial_fitness: f64,
    pub final_fitness: f64,
    pub initial_expression: ExpressionVector,
    pub final_expression: ExpressionVector,
    pub final_genome_size: i64,
    pub termination: Termination,
}

impl RunSummary {
    pub fn from_outcome(outcome: &EvolutionOutcome, seed: Option<u64>, started_at: DateTime<Utc>) -> Self {
        let history = &outcome.history;
        Self {
            started_at: started_at.to_rfc3339(),
            finished_at: Utc::now().to_rfc3339(),
            seed,
            generations_completed: history.generations_completed(),
            accepted_mutations: history.acceptance_count(),
            initial_fitness: history.initial_fitness().unwrap_or(0.0),
            final_fitness: history.final_fitness().unwrap_or(0.0),
            initial_expression: outcome.initial_expression.clone(),
            final_expression: outcome.final_expression.clone(),
            final_genome_size: outcome.final_layout.genome_size,
            termination: outcome.termination.clone(),
        }
    }

    pub fn write_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)
            .map_err(|e| GenevoError::Report(format!("cannot write {}: {}", path.display(), e)))?;
        Ok(())
    }
}
