use crate::engines::evaluation::fitness::compute_fitness;
use crate::error::{GenevoError, Result};
use crate::types::{ExpressionVector, GenomeLayout};

/// Black-box transcription simulation of a genome layout.
///
/// Implementations report unreadable output as
/// [`GenevoError::MalformedSimulatorOutput`] so the caller may retry, and
/// failures that a retry cannot fix (e.g. the simulator cannot be started)
/// as [`GenevoError::Simulator`].
pub trait ExpressionSimulator {
    fn simulate(&mut self, layout: &GenomeLayout) -> Result<ExpressionVector>;
}

/// Sink for every newly accepted genome
pub trait SnapshotWriter {
    fn persist(&mut self, layout: &GenomeLayout) -> Result<()>;
}

/// Snapshot writer that keeps nothing
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSnapshotWriter;

impl SnapshotWriter for NullSnapshotWriter {
    fn persist(&mut self, _layout: &GenomeLayout) -> Result<()> {
        Ok(())
    }
}

/// Expression and fitness of one layout
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub expression: ExpressionVector,
    pub fitness: f64,
    pub attempts: usize,
}

/// Bounded retry around simulation + fitness scoring
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: usize,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self { max_attempts: 20 }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: usize) -> Self {
        Self { max_attempts }
    }

    /// Simulate `layout` and score it against `target`.
    ///
    /// Retryable failures are logged and retried until the budget is spent,
    /// then the last one is returned. Other failures return immediately.
    pub fn evaluate<S: ExpressionSimulator + ?Sized>(
        &self,
        simulator: &mut S,
        layout: &GenomeLayout,
        target: &[f64],
        generation: usize,
    ) -> Result<Evaluation> {
        let max_attempts = self.max_attempts.max(1);
        let mut last_error = None;

        for attempt in 1..=max_attempts {
            let outcome = simulator.simulate(layout).and_then(|expression| {
                let fitness = compute_fitness(&expression, target)?;
                Ok((expression, fitness))
            });

            match outcome {
                Ok((expression, fitness)) => {
                    return Ok(Evaluation {
                        expression,
                        fitness,
                        attempts: attempt,
                    })
                }
                Err(e) if e.is_retryable() => {
                    log::warn!(
                        "Generation {}: evaluation attempt {}/{} failed: {}",
                        generation,
                        attempt,
                        max_attempts,
                        e
                    );
                    last_error = Some(e);
                }
                Err(e) => return Err(e),
            }
        }

        Err(last_error.unwrap_or_else(|| {
            GenevoError::Simulator("expression simulation was never attempted".to_string())
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    struct Scripted(VecDeque<Result<ExpressionVector>>);

    impl ExpressionSimulator for Scripted {
        fn simulate(&mut self, _layout: &GenomeLayout) -> Result<ExpressionVector> {
            self.0
                .pop_front()
                .unwrap_or_else(|| Err(GenevoError::Simulator("script exhausted".into())))
        }
    }

    fn layout() -> GenomeLayout {
        GenomeLayout::new(1000, vec![100, 400], vec![200, 500], vec![700]).unwrap()
    }

    #[test]
    fn test_retries_malformed_output_then_succeeds() {
        let mut simulator = Scripted(VecDeque::from(vec![
            Err(GenevoError::MalformedSimulatorOutput("garbled".into())),
            Ok(vec![0, 3]),
            Ok(vec![1, 1]),
        ]));
        let evaluation = RetryPolicy::new(5)
            .evaluate(&mut simulator, &layout(), &[0.5, 0.5], 1)
            .unwrap();
        assert_eq!(evaluation.attempts, 3);
        assert_eq!(evaluation.expression, vec![1, 1]);
        assert!((evaluation.fitness - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_budget_is_bounded() {
        let mut simulator = Scripted(
            (0..10)
                .map(|_| Err(GenevoError::MalformedSimulatorOutput("garbled".into())))
                .collect(),
        );
        let result = RetryPolicy::new(3).evaluate(&mut simulator, &layout(), &[0.5, 0.5], 1);
        assert!(matches!(result, Err(GenevoError::MalformedSimulatorOutput(_))));
        assert_eq!(simulator.0.len(), 7);
    }

    #[test]
    fn test_degenerate_expression_surfaces_after_budget() {
        let mut simulator = Scripted((0..4).map(|_| Ok(vec![0, 5])).collect());
        let result = RetryPolicy::new(4).evaluate(&mut simulator, &layout(), &[0.5, 0.5], 2);
        assert!(matches!(result, Err(GenevoError::DegenerateExpression(_))));
    }

    #[test]
    fn test_permanent_failure_is_not_retried() {
        let mut simulator = Scripted(VecDeque::from(vec![
            Err(GenevoError::Simulator("python3 not found".into())),
            Ok(vec![1, 1]),
        ]));
        let result = RetryPolicy::new(5).evaluate(&mut simulator, &layout(), &[0.5, 0.5], 1);
        assert!(matches!(result, Err(GenevoError::Simulator(_))));
        assert_eq!(simulator.0.len(), 1);
    }
}
