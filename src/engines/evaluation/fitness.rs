use crate::error::{GenevoError, Result};

/// Fitness of an expression profile against target relative levels:
/// `exp(-sum_i |ln(observed_freq_i / target_i)|)`.
///
/// Observed counts are turned into frequencies first. The score lies in
/// `(0, 1]` and reaches 1 only when the frequencies match the targets.
/// A zero count (or an all-zero profile) has no finite log-ratio and is
/// reported as [`GenevoError::DegenerateExpression`].
pub fn compute_fitness(observed: &[u64], target: &[f64]) -> Result<f64> {
    if observed.len() != target.len() {
        return Err(GenevoError::PreconditionViolation(format!(
            "{} observed genes but {} target levels",
            observed.len(),
            target.len()
        )));
    }
    if let Some(k) = target.iter().position(|&t| !(t > 0.0 && t.is_finite())) {
        return Err(GenevoError::PreconditionViolation(format!(
            "target level of gene {} must be positive, got {}",
            k, target[k]
        )));
    }

    let total: u64 = observed.iter().sum();
    if total == 0 {
        return Err(GenevoError::DegenerateExpression(
            "no transcript produced for any gene".to_string(),
        ));
    }
    if let Some(k) = observed.iter().position(|&count| count == 0) {
        return Err(GenevoError::DegenerateExpression(format!(
            "gene {} produced no transcript",
            k
        )));
    }

    let total = total as f64;
    let distance: f64 = observed
        .iter()
        .zip(target)
        .map(|(&count, &level)| (count as f64 / total / level).ln().abs())
        .sum();

    Ok((-distance).exp())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_perfect_match_scores_one() {
        let fitness = compute_fitness(&[10, 30, 60], &[0.1, 0.3, 0.6]).unwrap();
        assert!((fitness - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_scale_of_counts_does_not_matter() {
        let small = compute_fitness(&[1, 3, 6], &[0.2, 0.2, 0.6]).unwrap();
        let large = compute_fitness(&[100, 300, 600], &[0.2, 0.2, 0.6]).unwrap();
        assert!((small - large).abs() < 1e-12);
    }

    #[test]
    fn test_known_value() {
        // freqs 0.5/0.5 against 0.25/0.75: |ln 2| + |ln(2/3)|
        let fitness = compute_fitness(&[5, 5], &[0.25, 0.75]).unwrap();
        let expected = (-(2f64.ln() + (1.5f64).ln())).exp();
        assert!((fitness - expected).abs() < 1e-12);
        assert!(fitness > 0.0 && fitness < 1.0);
    }

    #[test]
    fn test_mismatch_lowers_fitness() {
        let close = compute_fitness(&[11, 29, 60], &[0.1, 0.3, 0.6]).unwrap();
        let far = compute_fitness(&[50, 30, 20], &[0.1, 0.3, 0.6]).unwrap();
        assert!(close > far);
    }

    #[test]
    fn test_zero_count_is_degenerate() {
        assert!(matches!(
            compute_fitness(&[0, 4], &[0.5, 0.5]),
            Err(GenevoError::DegenerateExpression(_))
        ));
        assert!(matches!(
            compute_fitness(&[0, 0], &[0.5, 0.5]),
            Err(GenevoError::DegenerateExpression(_))
        ));
    }

    #[test]
    fn test_length_mismatch_is_rejected() {
        assert!(matches!(
            compute_fitness(&[1, 2, 3], &[0.5, 0.5]),
            Err(GenevoError::PreconditionViolation(_))
        ));
        assert!(matches!(
            compute_fitness(&[1, 2], &[0.5, 0.0]),
            Err(GenevoError::PreconditionViolation(_))
        ));
    }
}
