use crate::error::{GenevoError, Result};
use crate::types::{FreeInterval, Position};
use rand::Rng;

/// Retry budget for the clearance rejection loop.
pub const DEFAULT_MAX_ATTEMPTS: usize = 100;

/// Draw a mutation position from `intervals`, weighted by interval length,
/// at least `clearance` base pairs away from both bounds of its interval.
pub fn sample_position<R: Rng + ?Sized>(
    rng: &mut R,
    intervals: &[FreeInterval],
    genome_size: Position,
    clearance: Position,
) -> Result<Position> {
    sample_position_with_attempts(rng, intervals, genome_size, clearance, DEFAULT_MAX_ATTEMPTS)
}

/// Same as [`sample_position`] with an explicit retry budget.
///
/// The interval is drawn once; only the position inside it is redrawn
/// when the clearance test fails. Positions in the origin-crossing
/// interval are drawn and tested in unwrapped space (`start+1 ..
/// genome_size+end`) and folded back into `[0, genome_size)` afterwards.
pub fn sample_position_with_attempts<R: Rng + ?Sized>(
    rng: &mut R,
    intervals: &[FreeInterval],
    genome_size: Position,
    clearance: Position,
    max_attempts: usize,
) -> Result<Position> {
    let cumulative: Vec<Position> = intervals
        .iter()
        .scan(0, |acc, interval| {
            *acc += interval.length(genome_size);
            Some(*acc)
        })
        .collect();
    let total = cumulative.last().copied().unwrap_or(0);
    if total <= 0 {
        return Err(GenevoError::SamplingExhausted { attempts: 0 });
    }

    let draw = rng.gen::<f64>() * total as f64;
    let index = cumulative
        .iter()
        .position(|&c| draw < c as f64)
        .or_else(|| intervals.iter().rposition(|i| i.length(genome_size) > 0))
        .ok_or(GenevoError::SamplingExhausted { attempts: 0 })?;
    let interval = intervals[index];

    let upper = if interval.wraps() {
        genome_size + interval.end
    } else {
        interval.end
    };
    let low = interval.start + clearance;
    let high = upper - clearance;

    for _ in 0..max_attempts {
        let candidate = rng.gen_range(interval.start + 1..upper);
        if candidate >= low && candidate <= high {
            return Ok(candidate.rem_euclid(genome_size));
        }
    }

    Err(GenevoError::SamplingExhausted {
        attempts: max_attempts,
    })
}
