use crate::config::EvolutionConfig;
use crate::engines::evaluation::simulator::{
    Evaluation, ExpressionSimulator, RetryPolicy, SnapshotWriter,
};
use crate::engines::generation::{
    acceptance::MetropolisCriterion,
    history::{EvolutionHistory, EvolutionOutcome, GenerationRecord, MutationStatus, Termination},
    intervals::free_intervals_of,
    operators::{evolutive_event, MutationParams, ProposedMutation},
};
use crate::error::{GenevoError, Result};
use crate::types::{ExpressionVector, FreeInterval, GenomeLayout};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

pub trait ProgressCallback: Send {
    fn on_generation_start(&mut self, generation: usize);
    fn on_generation_complete(&mut self, record: &GenerationRecord);
}

/// Accepted state of the genome after a generation
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationState {
    pub layout: GenomeLayout,
    pub free_intervals: Vec<FreeInterval>,
    pub fitness: f64,
    pub expression: ExpressionVector,
}

impl GenerationState {
    pub fn new(layout: GenomeLayout, evaluation: Evaluation) -> Self {
        let free_intervals = free_intervals_of(&layout);
        Self {
            layout,
            free_intervals,
            fitness: evaluation.fitness,
            expression: evaluation.expression,
        }
    }
}

/// How a single generation ended
enum Step {
    Done(GenerationRecord),
    Stop(Termination),
}

/// Single-lineage Monte Carlo Metropolis evolution of a genome layout
pub struct EvolutionEngine {
    config: EvolutionConfig,
    params: MutationParams,
    criterion: MetropolisCriterion,
    retry: RetryPolicy,
    rng: StdRng,
    cancel_flag: Option<Arc<AtomicBool>>,
}

impl EvolutionEngine {
    pub fn new(config: EvolutionConfig, retry: RetryPolicy) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Self {
            params: config.mutation_params(),
            criterion: config.criterion(),
            config,
            retry,
            rng,
            cancel_flag: None,
        }
    }

    /// Stop before the next generation once `flag` is set.
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel_flag = Some(flag);
        self
    }

    fn is_cancelled(&self) -> bool {
        self.cancel_flag
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
    }

    /// Simulate and score the starting genome.
    pub fn initial_state<S: ExpressionSimulator + ?Sized>(
        &self,
        layout: GenomeLayout,
        target: &[f64],
        simulator: &mut S,
    ) -> Result<GenerationState> {
        if layout.gene_count() != target.len() {
            return Err(GenevoError::PreconditionViolation(format!(
                "{} genes but {} target levels",
                layout.gene_count(),
                target.len()
            )));
        }
        let evaluation = self.retry.evaluate(simulator, &layout, target, 0)?;
        Ok(GenerationState::new(layout, evaluation))
    }

    /// Run the evolution process from `initial_layout`.
    ///
    /// Only a failure to evaluate the initial genome is returned as an
    /// error. Later failures end the run early and are reported through
    /// [`EvolutionOutcome::termination`] with the history gathered so far.
    pub fn run<S, W, C>(
        &mut self,
        initial_layout: GenomeLayout,
        target: &[f64],
        simulator: &mut S,
        snapshot: &mut W,
        callback: &mut C,
    ) -> Result<EvolutionOutcome>
    where
        S: ExpressionSimulator + ?Sized,
        W: SnapshotWriter + ?Sized,
        C: ProgressCallback + ?Sized,
    {
        let mut state = self.initial_state(initial_layout, target, simulator)?;
        let initial_expression = state.expression.clone();
        let mut history = EvolutionHistory::new(state.fitness);
        let mut termination = Termination::Completed;

        log::info!(
            "Initial fitness {:.6}, expression {:?}",
            state.fitness,
            state.expression
        );

        for generation in 1..=self.config.nb_generations {
            if self.is_cancelled() {
                log::warn!("Run cancelled before generation {}", generation);
                termination = Termination::Cancelled;
                break;
            }
            callback.on_generation_start(generation);

            match self.step(generation, &mut state, target, simulator, snapshot) {
                Step::Done(record) => {
                    callback.on_generation_complete(&record);
                    history.push(record);
                }
                Step::Stop(reason) => {
                    log::error!("Run stopped at generation {}: {:?}", generation, reason);
                    termination = reason;
                    break;
                }
            }
        }

        Ok(EvolutionOutcome {
            history,
            initial_expression,
            final_expression: state.expression,
            final_layout: state.layout,
            termination,
        })
    }

    /// Propose, evaluate, and accept or reject one mutation.
    fn step<S, W>(
        &mut self,
        generation: usize,
        state: &mut GenerationState,
        target: &[f64],
        simulator: &mut S,
        snapshot: &mut W,
    ) -> Step
    where
        S: ExpressionSimulator + ?Sized,
        W: SnapshotWriter + ?Sized,
    {
        let proposal = match self.propose(generation, state) {
            Ok(proposal) => proposal,
            Err(GenevoError::SamplingExhausted { attempts }) => {
                return Step::Stop(Termination::NoMutableSpace(format!(
                    "{} proposals failed, last after {} sampling attempts",
                    self.config.max_proposal_attempts, attempts
                )))
            }
            Err(e) => return Step::Stop(Termination::InvalidProposal(e.to_string())),
        };
        let event_type = proposal.event_type;
        log::debug!(
            "Generation {}: {} {}, genome size {}",
            generation,
            event_type,
            proposal.site,
            proposal.layout.genome_size
        );

        let evaluation = match self.retry.evaluate(simulator, &proposal.layout, target, generation) {
            Ok(evaluation) => Some(evaluation),
            Err(GenevoError::DegenerateExpression(reason)) => {
                log::warn!(
                    "Generation {}: {} proposal rejected, degenerate expression: {}",
                    generation,
                    event_type,
                    reason
                );
                None
            }
            Err(e) => {
                log::error!("Generation {}: {} proposal could not be evaluated: {}", generation, event_type, e);
                return Step::Stop(Termination::SimulatorFailure(e.to_string()));
            }
        };

        // A degenerate profile scores the limit value of the fitness formula
        let proposed_fitness = evaluation.as_ref().map_or(0.0, |e| e.fitness);

        let status = match evaluation {
            Some(evaluation) if self.criterion.accepts(&mut self.rng, state.fitness, evaluation.fitness) => {
                if let Err(e) = snapshot.persist(&proposal.layout) {
                    log::error!("Generation {}: cannot persist accepted genome: {}", generation, e);
                    return Step::Stop(Termination::SnapshotFailure(e.to_string()));
                }
                *state = GenerationState::new(proposal.layout, evaluation);
                MutationStatus::Accepted
            }
            _ => MutationStatus::Rejected,
        };

        Step::Done(GenerationRecord {
            generation,
            accepted_fitness: state.fitness,
            proposed_fitness,
            status,
            event_type,
        })
    }

    /// Draw a mutation of the current genome, redrawing when no position
    /// with enough clearance was found.
    fn propose(&mut self, generation: usize, state: &GenerationState) -> Result<ProposedMutation> {
        let mut last_error = GenevoError::SamplingExhausted { attempts: 0 };
        for attempt in 1..=self.config.max_proposal_attempts {
            match evolutive_event(&mut self.rng, &self.params, &state.layout, &state.free_intervals) {
                Ok(proposal) => return Ok(proposal),
                Err(e @ GenevoError::SamplingExhausted { .. }) => {
                    log::warn!(
                        "Generation {}: proposal {}/{} abandoned: {}",
                        generation,
                        attempt,
                        self.config.max_proposal_attempts,
                        e
                    );
                    last_error = e;
                }
                Err(e) => return Err(e),
            }
        }
        Err(last_error)
    }
}
