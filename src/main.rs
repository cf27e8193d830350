use anyhow::Context;
use chrono::Utc;
use clap::Parser;
use genevo::config::ConfigManager;
use genevo::data::connectors::{load_genome, load_target_expression};
use genevo::data::{write_history_csv, FileSnapshotWriter, RunSummary, TwisTranscriptSimulator};
use genevo::engines::generation::{ConsoleProgressCallback, EvolutionEngine};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "Monte Carlo evolution of a bacterial genome layout", long_about = None)]
struct Args {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[arg(short, long)]
    generations: Option<usize>,

    #[arg(short, long)]
    seed: Option<u64>,

    /// Per-generation CSV report
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// JSON run summary
    #[arg(long)]
    summary: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let mut manager = ConfigManager::new();
    match &args.config {
        Some(path) => manager
            .load_from_file(path)
            .with_context(|| format!("loading configuration from {}", path.display()))?,
        None => manager.load_from_env().context("loading configuration")?,
    }
    manager.update(|config| {
        if let Some(generations) = args.generations {
            config.evolution.nb_generations = generations;
        }
        if args.seed.is_some() {
            config.evolution.seed = args.seed;
        }
        if args.output.is_some() {
            config.files.report_csv = args.output.clone();
        }
        if args.summary.is_some() {
            config.files.summary_json = args.summary.clone();
        }
    })?;
    let config = manager.into_inner();

    let layout = load_genome(&config.files.initial_parameters, &config.files.parameter_folder)
        .context("loading initial genome")?;
    let target = load_target_expression(&config.files.environment).context("loading target expression")?;

    let mut simulator = TwisTranscriptSimulator::new(&config.simulator, config.files.next_generation.clone());
    let mut snapshot = FileSnapshotWriter::new(config.files.last_accepted.clone());
    let mut callback = ConsoleProgressCallback::new();

    let started_at = Utc::now();
    let mut engine = EvolutionEngine::new(config.evolution.clone(), config.simulator.retry_policy());
    let outcome = engine
        .run(layout, &target, &mut simulator, &mut snapshot, &mut callback)
        .context("evaluating initial genome")?;

    log::info!("Initial expression: {:?}", outcome.initial_expression);
    log::info!("Final expression: {:?}", outcome.final_expression);
    log::info!(
        "{} of {} generations accepted, fitness {:.6} -> {:.6}",
        outcome.history.acceptance_count(),
        outcome.history.generations_completed(),
        outcome.history.initial_fitness().unwrap_or(0.0),
        outcome.history.final_fitness().unwrap_or(0.0)
    );
    log::debug!("Fitness trajectory: {:?}", outcome.history.accepted_fitnesses());
    if !outcome.termination.is_completed() {
        log::warn!("Run ended early: {:?}", outcome.termination);
    }

    if let Some(path) = &config.files.report_csv {
        write_history_csv(path, &outcome.history)
            .with_context(|| format!("writing report to {}", path.display()))?;
    }
    if let Some(path) = &config.files.summary_json {
        RunSummary::from_outcome(&outcome, config.evolution.seed, started_at)
            .write_json(path)
            .with_context(|| format!("writing summary to {}", path.display()))?;
        log::info!("Wrote run summary to {}", path.display());
    }

    Ok(())
}
