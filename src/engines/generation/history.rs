use crate::types::{EventType, ExpressionVector, GenomeLayout};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MutationStatus {
    Accepted,
    Rejected,
}

impl MutationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MutationStatus::Accepted => "accepted",
            MutationStatus::Rejected => "rejected",
        }
    }
}

/// What happened during one generation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRecord {
    pub generation: usize,
    /// Fitness of the retained genome after the decision
    pub accepted_fitness: f64,
    /// Fitness of the proposed genome, whether kept or not. `0.0` marks a
    /// proposal rejected for degenerate expression, which has no score.
    pub proposed_fitness: f64,
    pub status: MutationStatus,
    pub event_type: EventType,
}

/// Per-generation trace of a run, generation 0 being the initial genome
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EvolutionHistory {
    records: Vec<GenerationRecord>,
}

impl EvolutionHistory {
    pub fn new(initial_fitness: f64) -> Self {
        Self {
            records: vec![GenerationRecord {
                generation: 0,
                accepted_fitness: initial_fitness,
                proposed_fitness: initial_fitness,
                status: MutationStatus::Accepted,
                event_type: EventType::Initial,
            }],
        }
    }

    pub fn push(&mut self, record: GenerationRecord) {
        self.records.push(record);
    }

    pub fn records(&self) -> &[GenerationRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Generations run after the initial one.
    pub fn generations_completed(&self) -> usize {
        self.records.len().saturating_sub(1)
    }

    pub fn accepted_fitnesses(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.accepted_fitness).collect()
    }

    pub fn proposed_fitnesses(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.proposed_fitness).collect()
    }

    /// Accepted mutations, the initial genome excluded.
    pub fn acceptance_count(&self) -> usize {
        self.records
            .iter()
            .skip(1)
            .filter(|r| r.status == MutationStatus::Accepted)
            .count()
    }

    pub fn count_by_event(&self, event_type: EventType) -> usize {
        self.records.iter().filter(|r| r.event_type == event_type).count()
    }

    pub fn initial_fitness(&self) -> Option<f64> {
        self.records.first().map(|r| r.accepted_fitness)
    }

    pub fn final_fitness(&self) -> Option<f64> {
        self.records.last().map(|r| r.accepted_fitness)
    }
}

/// Why a run stopped
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "reason", rename_all = "snake_case")]
pub enum Termination {
    Completed,
    Cancelled,
    /// No mutation position could be drawn any more
    NoMutableSpace(String),
    InvalidProposal(String),
    SimulatorFailure(String),
    SnapshotFailure(String),
}

impl Termination {
    pub fn is_completed(&self) -> bool {
        matches!(self, Termination::Completed)
    }
}

/// Result of a full run, possibly cut short
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvolutionOutcome {
    pub history: EvolutionHistory,
    pub initial_expression: ExpressionVector,
    pub final_expression: ExpressionVector,
    pub final_layout: GenomeLayout,
    pub termination: Termination,
}
