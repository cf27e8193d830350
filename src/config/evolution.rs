use super::traits::{section_error, ConfigSection};
use crate::engines::generation::acceptance::MetropolisCriterion;
use crate::engines::generation::operators::MutationParams;
use crate::engines::generation::sampler::DEFAULT_MAX_ATTEMPTS;
use crate::error::GenevoError;
use crate::types::Position;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvolutionConfig {
    /// Base pairs inserted or deleted by an indel
    pub indel_unit: Position,
    pub inversion_proba: f64,
    pub p_insertion: f64,
    pub nb_generations: usize,
    /// Metropolis scale for fitness losses
    pub q: f64,
    pub seed: Option<u64>,
    /// Fresh proposals drawn before a generation gives up on sampling
    pub max_proposal_attempts: usize,
    pub max_sampling_attempts: usize,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            indel_unit: 60,
            inversion_proba: 0.5,
            p_insertion: 0.5,
            nb_generations: 30,
            q: 0.00002,
            seed: None,
            max_proposal_attempts: 10,
            max_sampling_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

impl EvolutionConfig {
    pub fn mutation_params(&self) -> MutationParams {
        MutationParams {
            unit: self.indel_unit,
            inversion_proba: self.inversion_proba,
            p_insertion: self.p_insertion,
            max_sampling_attempts: self.max_sampling_attempts,
        }
    }

    pub fn criterion(&self) -> MetropolisCriterion {
        MetropolisCriterion::new(self.q)
    }
}

impl ConfigSection for EvolutionConfig {
    fn section_name() -> &'static str {
        "evolution"
    }

    fn validate(&self) -> Result<(), GenevoError> {
        if self.indel_unit < 1 {
            return Err(section_error::<Self>("Indel unit must be at least 1 bp"));
        }
        if !(0.0..=1.0).contains(&self.inversion_proba) {
            return Err(section_error::<Self>("Inversion probability must be between 0 and 1"));
        }
        if !(0.0..=1.0).contains(&self.p_insertion) {
            return Err(section_error::<Self>("Insertion probability must be between 0 and 1"));
        }
        if !(self.q > 0.0 && self.q.is_finite()) {
            return Err(section_error::<Self>("q must be a positive number"));
        }
        if self.max_proposal_attempts == 0 || self.max_sampling_attempts == 0 {
            return Err(section_error::<Self>("Attempt budgets must be at least 1"));
        }
        Ok(())
    }
}
