use crate::types::{FreeInterval, GenomeLayout, Position};

/// Build the free intervals of a genome from its gene and barrier coordinates.
///
/// Every barrier is counted twice so it behaves as a zero-width occupied
/// segment. After sorting, the first interval runs from the largest
/// coordinate across the origin to the smallest one; the others pair up
/// `(sorted[k], sorted[k + 1])` for odd `k`.
///
/// Expects at least one gene and no gene spanning the origin, as
/// [`GenomeLayout::new`] enforces.
pub fn free_intervals(
    gene_starts: &[Position],
    gene_ends: &[Position],
    barriers: &[Position],
) -> Vec<FreeInterval> {
    let mut limits: Vec<Position> = gene_starts
        .iter()
        .chain(gene_ends)
        .chain(barriers)
        .chain(barriers)
        .copied()
        .collect();
    limits.sort_unstable();

    let (Some(&first), Some(&last)) = (limits.first(), limits.last()) else {
        return Vec::new();
    };

    let mut intervals = Vec::with_capacity(limits.len() / 2);
    intervals.push(FreeInterval::new(last, first));
    intervals.extend(
        limits[1..]
            .chunks_exact(2)
            .map(|pair| FreeInterval::new(pair[0], pair[1])),
    );
    intervals
}

pub fn free_intervals_of(layout: &GenomeLayout) -> Vec<FreeInterval> {
    free_intervals(&layout.gene_starts, &layout.gene_ends, &layout.barriers)
}

/// Total number of mutable coordinates across `intervals`.
pub fn total_free_length(intervals: &[FreeInterval], genome_size: Position) -> Position {
    intervals.iter().map(|i| i.length(genome_size)).sum()
}
