pub mod intervals;
pub mod sampler;
pub mod operators;
pub mod acceptance;
pub mod history;
pub mod evolution_engine;
pub mod progress;
pub mod replicates;

pub use acceptance::{accept_mutation, MetropolisCriterion};
pub use evolution_engine::{EvolutionEngine, GenerationState, ProgressCallback};
pub use history::{EvolutionHistory, EvolutionOutcome, GenerationRecord, MutationStatus, Termination};
pub use intervals::{free_intervals, free_intervals_of};
pub use operators::{deletion, evolutive_event, indel, insertion, invert, MutationParams, ProposedMutation};
pub use progress::{ChannelProgressCallback, ConsoleProgressCallback, ProgressMessage};
pub use replicates::{run_replicates, ReplicateOutcome};
pub use sampler::sample_position;
