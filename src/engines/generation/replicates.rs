use crate::config::EvolutionConfig;
use crate::engines::evaluation::simulator::{ExpressionSimulator, RetryPolicy, SnapshotWriter};
use crate::engines::generation::evolution_engine::EvolutionEngine;
use crate::engines::generation::history::EvolutionOutcome;
use crate::engines::generation::progress::ConsoleProgressCallback;
use crate::error::Result;
use crate::types::GenomeLayout;
use rayon::prelude::*;

/// Outcome of one independent lineage
#[derive(Debug)]
pub struct ReplicateOutcome {
    pub seed: u64,
    pub outcome: Result<EvolutionOutcome>,
}

/// Evolve one lineage per seed in parallel from the same starting genome.
///
/// `factory` builds the simulator and snapshot writer of each lineage, so
/// lineages never share working files. Results come back in seed order.
pub fn run_replicates<S, W, F>(
    config: &EvolutionConfig,
    retry: RetryPolicy,
    seeds: &[u64],
    initial_layout: &GenomeLayout,
    target: &[f64],
    factory: F,
) -> Vec<ReplicateOutcome>
where
    S: ExpressionSimulator,
    W: SnapshotWriter,
    F: Fn(u64) -> Result<(S, W)> + Sync,
{
    log::info!("Running {} replicate lineages", seeds.len());

    seeds
        .par_iter()
        .map(|&seed| {
            let outcome = factory(seed).and_then(|(mut simulator, mut snapshot)| {
                let config = EvolutionConfig {
                    seed: Some(seed),
                    ..config.clone()
                };
                let mut callback = ConsoleProgressCallback::with_prefix(format!("[seed {}] ", seed));
                EvolutionEngine::new(config, retry).run(
                    initial_layout.clone(),
                    target,
                    &mut simulator,
                    &mut snapshot,
                    &mut callback,
                )
            });
            if let Err(e) = &outcome {
                log::error!("Replicate with seed {} failed: {}", seed, e);
            }
            ReplicateOutcome { seed, outcome }
        })
        .collect()
}
