use crate::engines::generation::sampler::sample_position_with_attempts;
use crate::error::{GenevoError, Result};
use crate::types::{EventType, FreeInterval, GenomeLayout, Position};
use rand::Rng;
use std::fmt;

/// Knobs of the mutation operators
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MutationParams {
    /// Length of an inserted or deleted unit, also the clearance kept
    /// between a mutation site and any gene or barrier
    pub unit: Position,
    pub inversion_proba: f64,
    pub p_insertion: f64,
    pub max_sampling_attempts: usize,
}

/// Where an event hit the genome
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationSite {
    Indel { position: Position },
    Inversion { start: Position, end: Position },
}

impl fmt::Display for MutationSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MutationSite::Indel { position } => write!(f, "at {}", position),
            MutationSite::Inversion { start, end } => write!(f, "over ({}, {})", start, end),
        }
    }
}

/// A mutated copy of the genome, not yet evaluated
#[derive(Debug, Clone, PartialEq)]
pub struct ProposedMutation {
    pub event_type: EventType,
    pub site: MutationSite,
    pub layout: GenomeLayout,
}

/// Shift every coordinate at or after `position` by `delta` and resize the genome.
fn shift_downstream(layout: &GenomeLayout, position: Position, delta: Position) -> GenomeLayout {
    let shift = |coords: &[Position]| -> Vec<Position> {
        coords
            .iter()
            .map(|&c| if c >= position { c + delta } else { c })
            .collect()
    };

    GenomeLayout {
        genome_size: layout.genome_size + delta,
        gene_starts: shift(&layout.gene_starts),
        gene_ends: shift(&layout.gene_ends),
        barriers: shift(&layout.barriers),
    }
}

pub fn insertion(layout: &GenomeLayout, position: Position, unit: Position) -> GenomeLayout {
    shift_downstream(layout, position, unit)
}

pub fn deletion(layout: &GenomeLayout, position: Position, unit: Position) -> Result<GenomeLayout> {
    if layout.genome_size <= unit {
        return Err(GenevoError::PreconditionViolation(format!(
            "cannot delete {} bp from a genome of {} bp",
            unit, layout.genome_size
        )));
    }
    Ok(shift_downstream(layout, position, -unit))
}

/// Insertion or deletion of `unit` base pairs at an already sampled position.
pub fn indel_at<R: Rng + ?Sized>(
    rng: &mut R,
    layout: &GenomeLayout,
    position: Position,
    unit: Position,
    p_insertion: f64,
) -> Result<ProposedMutation> {
    let (event_type, new_layout) = if rng.gen::<f64>() < p_insertion {
        (EventType::Insertion, insertion(layout, position, unit))
    } else {
        (EventType::Deletion, deletion(layout, position, unit)?)
    };

    Ok(ProposedMutation {
        event_type,
        site: MutationSite::Indel { position },
        layout: new_layout,
    })
}

/// Sample a position in the free intervals and apply an indel there.
pub fn indel<R: Rng + ?Sized>(
    rng: &mut R,
    params: &MutationParams,
    layout: &GenomeLayout,
    intervals: &[FreeInterval],
) -> Result<ProposedMutation> {
    let position = sample_position_with_attempts(
        rng,
        intervals,
        layout.genome_size,
        params.unit,
        params.max_sampling_attempts,
    )?;
    indel_at(rng, layout, position, params.unit, params.p_insertion)
}

/// Reflect every coordinate strictly inside `(start, end)`.
///
/// Coordinates on the bounds or outside the span are left alone and the
/// genome size does not change. Equal bounds leave the genome untouched.
pub fn invert(layout: &GenomeLayout, start: Position, end: Position) -> Result<GenomeLayout> {
    if start > end {
        return Err(GenevoError::PreconditionViolation(format!(
            "inversion start {} is after its end {}",
            start, end
        )));
    }
    for bound in [start, end] {
        if let Some(gene) = layout.gene_containing(bound) {
            return Err(GenevoError::PreconditionViolation(format!(
                "inversion bound {} falls inside gene {}",
                bound, gene
            )));
        }
    }

    let reflect = |coords: &[Position]| -> Vec<Position> {
        coords
            .iter()
            .map(|&c| if c > start && c < end { start + (end - c) } else { c })
            .collect()
    };

    Ok(GenomeLayout {
        genome_size: layout.genome_size,
        gene_starts: reflect(&layout.gene_starts),
        gene_ends: reflect(&layout.gene_ends),
        barriers: reflect(&layout.barriers),
    })
}

/// Draw one evolutive event: an inversion with probability
/// `inversion_proba`, an indel otherwise.
///
/// Both inversion bounds are independent draws from the free intervals.
/// The indel reuses the first draw as its site.
pub fn evolutive_event<R: Rng + ?Sized>(
    rng: &mut R,
    params: &MutationParams,
    layout: &GenomeLayout,
    intervals: &[FreeInterval],
) -> Result<ProposedMutation> {
    let sample = |rng: &mut R| {
        sample_position_with_attempts(
            rng,
            intervals,
            layout.genome_size,
            params.unit,
            params.max_sampling_attempts,
        )
    };

    let first = sample(&mut *rng)?;
    if rng.gen::<f64>() < params.inversion_proba {
        let second = sample(&mut *rng)?;
        let (start, end) = (first.min(second), first.max(second));
        Ok(ProposedMutation {
            event_type: EventType::Inversion,
            site: MutationSite::Inversion { start, end },
            layout: invert(layout, start, end)?,
        })
    } else {
        indel_at(rng, layout, first, params.unit, params.p_insertion)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engines::generation::intervals::free_intervals_of;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn layout() -> GenomeLayout {
        GenomeLayout::new(2000, vec![100, 500, 1300], vec![200, 600, 1200], vec![350, 900]).unwrap()
    }

    fn params(inversion_proba: f64, p_insertion: f64) -> MutationParams {
        MutationParams {
            unit: 60,
            inversion_proba,
            p_insertion,
            max_sampling_attempts: 100,
        }
    }

    #[test]
    fn test_insertion_shifts_downstream_gene() {
        let genome = GenomeLayout::new(1000, vec![400], vec![450], vec![]).unwrap();
        let inserted = insertion(&genome, 300, 60);
        assert_eq!(inserted.gene_starts, vec![460]);
        assert_eq!(inserted.gene_ends, vec![510]);
        assert_eq!(inserted.genome_size, 1060);
    }

    #[test]
    fn test_coordinates_before_site_are_unchanged() {
        let genome = layout();
        let deleted = deletion(&genome, 700, 60).unwrap();
        assert_eq!(deleted.gene_starts, vec![100, 500, 1240]);
        assert_eq!(deleted.gene_ends, vec![200, 600, 1140]);
        assert_eq!(deleted.barriers, vec![350, 840]);
        assert_eq!(deleted.genome_size, 1940);
    }

    #[test]
    fn test_coordinate_on_site_moves() {
        let genome = GenomeLayout::new(1000, vec![300], vec![350], vec![]).unwrap();
        let inserted = insertion(&genome, 300, 10);
        assert_eq!(inserted.gene_starts, vec![310]);
    }

    #[test]
    fn test_deletion_refuses_to_empty_genome() {
        let genome = GenomeLayout::new(50, vec![10], vec![20], vec![]).unwrap();
        assert!(matches!(
            deletion(&genome, 30, 60),
            Err(GenevoError::PreconditionViolation(_))
        ));
    }

    #[test]
    fn test_inversion_reflects_inner_coordinates() {
        let genome = layout();
        let inverted = invert(&genome, 250, 750).unwrap();
        assert_eq!(inverted.gene_starts, vec![100, 500, 1300]);
        assert_eq!(inverted.gene_ends, vec![200, 400, 1200]);
        assert_eq!(inverted.barriers, vec![650, 900]);
        assert_eq!(inverted.genome_size, genome.genome_size);
    }

    #[test]
    fn test_inversion_leaves_bounds_in_place() {
        let genome = layout();
        let inverted = invert(&genome, 350, 900).unwrap();
        assert_eq!(inverted.barriers, vec![350, 900]);
        assert_eq!(inverted.gene_starts[1], 750);
        assert_eq!(inverted.gene_ends[1], 650);
    }

    #[test]
    fn test_inversion_with_equal_bounds_is_identity() {
        let genome = layout();
        assert_eq!(invert(&genome, 250, 250).unwrap(), genome);
    }

    #[test]
    fn test_inversion_rejects_bad_bounds() {
        let genome = layout();
        assert!(matches!(
            invert(&genome, 750, 250),
            Err(GenevoError::PreconditionViolation(_))
        ));
        assert!(matches!(
            invert(&genome, 150, 750),
            Err(GenevoError::PreconditionViolation(_))
        ));
    }

    #[test]
    fn test_operators_do_not_touch_inputs() {
        let genome = layout();
        let snapshot = genome.clone();
        let _ = insertion(&genome, 250, 60);
        let _ = deletion(&genome, 250, 60).unwrap();
        let _ = invert(&genome, 250, 750).unwrap();
        assert_eq!(genome, snapshot);
    }

    #[test]
    fn test_event_selection_respects_probabilities() {
        let genome = layout();
        let intervals = free_intervals_of(&genome);
        let mut rng = StdRng::seed_from_u64(21);

        for _ in 0..200 {
            let event = evolutive_event(&mut rng, &params(1.0, 0.5), &genome, &intervals).unwrap();
            assert_eq!(event.event_type, EventType::Inversion);
            assert_eq!(event.layout.genome_size, 2000);
        }
        for _ in 0..200 {
            let event = evolutive_event(&mut rng, &params(0.0, 1.0), &genome, &intervals).unwrap();
            assert_eq!(event.event_type, EventType::Insertion);
            assert_eq!(event.layout.genome_size, 2060);
        }
        for _ in 0..200 {
            let event = evolutive_event(&mut rng, &params(0.0, 0.0), &genome, &intervals).unwrap();
            assert_eq!(event.event_type, EventType::Deletion);
            assert_eq!(event.layout.genome_size, 1940);
        }
    }

    #[test]
    fn test_sampled_inversion_bounds_are_ordered() {
        let genome = layout();
        let intervals = free_intervals_of(&genome);
        let mut rng = StdRng::seed_from_u64(4);

        for _ in 0..200 {
            let event = evolutive_event(&mut rng, &params(1.0, 0.5), &genome, &intervals).unwrap();
            match event.site {
                MutationSite::Inversion { start, end } => assert!(start <= end),
                other => panic!("unexpected site {:?}", other),
            }
        }
    }

    #[test]
    fn test_indel_keeps_gene_lengths() {
        let genome = layout();
        let intervals = free_intervals_of(&genome);
        let mut rng = StdRng::seed_from_u64(8);

        for _ in 0..200 {
            let event = indel(&mut rng, &params(0.0, 0.5), &genome, &intervals).unwrap();
            for k in 0..genome.gene_count() {
                assert_eq!(
                    event.layout.gene_ends[k] - event.layout.gene_starts[k],
                    genome.gene_ends[k] - genome.gene_starts[k]
                );
            }
        }
    }

    proptest! {
        #[test]
        fn prop_insertion_then_deletion_round_trips(position in 0i64..2000, unit in 1i64..200) {
            let genome = layout();
            let restored = deletion(&insertion(&genome, position, unit), position, unit).unwrap();
            prop_assert_eq!(restored, genome);
        }

        #[test]
        fn prop_inversion_is_an_involution(a in 21i64..1000, b in 21i64..1000) {
            prop_assume!(a != b);
            let genome = GenomeLayout::new(1000, vec![10], vec![20], vec![a, b]).unwrap();
            let (start, end) = (30, 990);
            let twice = invert(&invert(&genome, start, end).unwrap(), start, end).unwrap();
            prop_assert_eq!(twice, genome);
        }
    }
}
