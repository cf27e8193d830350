use crate::error::{GenevoError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Genome coordinate in base pairs.
///
/// Signed so that deletions can shift coordinates without underflow checks.
pub type Position = i64;

/// Transcript count per gene, ordered by gene index.
pub type ExpressionVector = Vec<u64>;

/// Transcription direction of a gene on the circular genome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Orientation {
    Forward,
    Reverse,
}

impl Orientation {
    pub fn symbol(&self) -> &'static str {
        match self {
            Orientation::Forward => "+",
            Orientation::Reverse => "-",
        }
    }
}

/// Orientation of a gene and whether its span crosses the origin.
///
/// A span longer than half the genome is read as the short way round
/// through position 0.
pub fn gene_orientation(start: Position, end: Position, genome_size: Position) -> (Orientation, bool) {
    let size = end - start;
    if 2 * size > genome_size {
        (Orientation::Reverse, true)
    } else if size > 0 {
        (Orientation::Forward, false)
    } else if 2 * size > -genome_size {
        (Orientation::Reverse, false)
    } else {
        (Orientation::Forward, true)
    }
}

/// Open coordinate interval holding no gene boundary and no barrier.
///
/// When `start > end` the interval wraps across the origin and covers
/// `start+1 .. genome_size-1` then `0 .. end-1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FreeInterval {
    pub start: Position,
    pub end: Position,
}

impl FreeInterval {
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    pub fn wraps(&self) -> bool {
        self.start > self.end
    }

    /// Number of coordinates strictly inside the interval, never negative.
    pub fn length(&self, genome_size: Position) -> Position {
        let len = if self.wraps() {
            genome_size - self.start + self.end - 1
        } else {
            self.end - self.start - 1
        };
        len.max(0)
    }
}

/// Kind of evolutive event applied during a generation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventType {
    Initial,
    Insertion,
    Deletion,
    Inversion,
}

impl EventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::Initial => "initial",
            EventType::Insertion => "insertion",
            EventType::Deletion => "deletion",
            EventType::Inversion => "inversion",
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Gene, barrier and size description of a circular genome at one point in time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenomeLayout {
    pub genome_size: Position,
    pub gene_starts: Vec<Position>,
    pub gene_ends: Vec<Position>,
    pub barriers: Vec<Position>,
}

impl GenomeLayout {
    /// Validated layout. Fails with [`GenevoError::PreconditionViolation`]
    /// when a coordinate is out of range, a gene crosses the origin, or
    /// genes and barriers share or overlap coordinates.
    pub fn new(
        genome_size: Position,
        gene_starts: Vec<Position>,
        gene_ends: Vec<Position>,
        barriers: Vec<Position>,
    ) -> Result<Self> {
        if genome_size <= 0 {
            return Err(GenevoError::PreconditionViolation(format!(
                "genome size must be positive, got {}",
                genome_size
            )));
        }
        if gene_starts.is_empty() {
            return Err(GenevoError::PreconditionViolation(
                "a genome needs at least one gene".to_string(),
            ));
        }
        if gene_starts.len() != gene_ends.len() {
            return Err(GenevoError::PreconditionViolation(format!(
                "{} gene starts but {} gene ends",
                gene_starts.len(),
                gene_ends.len()
            )));
        }
        let out_of_range = gene_starts
            .iter()
            .chain(&gene_ends)
            .chain(&barriers)
            .find(|&&p| p < 0 || p >= genome_size);
        if let Some(p) = out_of_range {
            return Err(GenevoError::PreconditionViolation(format!(
                "coordinate {} outside genome of size {}",
                p, genome_size
            )));
        }

        let layout = Self {
            genome_size,
            gene_starts,
            gene_ends,
            barriers,
        };
        layout.check_disjoint()?;
        Ok(layout)
    }

    /// Genes must not cross the origin, and no gene boundary or barrier may
    /// repeat another coordinate or sit inside a gene.
    fn check_disjoint(&self) -> Result<()> {
        for (k, (&start, &end)) in self.gene_starts.iter().zip(&self.gene_ends).enumerate() {
            if gene_orientation(start, end, self.genome_size).1 {
                return Err(GenevoError::PreconditionViolation(format!(
                    "gene {} ({}, {}) crosses the origin of a genome of size {}",
                    k, start, end, self.genome_size
                )));
            }
        }

        let mut coordinates: Vec<Position> = self
            .gene_starts
            .iter()
            .chain(&self.gene_ends)
            .chain(&self.barriers)
            .copied()
            .collect();
        coordinates.sort_unstable();
        if let Some(pair) = coordinates.windows(2).find(|pair| pair[0] == pair[1]) {
            return Err(GenevoError::PreconditionViolation(format!(
                "coordinate {} is used twice",
                pair[0]
            )));
        }

        if let Some((&c, gene)) = coordinates
            .iter()
            .find_map(|c| self.gene_containing(*c).map(|gene| (c, gene)))
        {
            return Err(GenevoError::PreconditionViolation(format!(
                "coordinate {} falls inside gene {}",
                c, gene
            )));
        }
        Ok(())
    }

    pub fn gene_count(&self) -> usize {
        self.gene_starts.len()
    }

    pub fn orientation(&self, gene: usize) -> Orientation {
        gene_orientation(self.gene_starts[gene], self.gene_ends[gene], self.genome_size).0
    }

    /// Index of the gene whose span strictly contains `pos`, if any.
    pub fn gene_containing(&self, pos: Position) -> Option<usize> {
        self.gene_starts
            .iter()
            .zip(&self.gene_ends)
            .position(|(&start, &end)| start.min(end) < pos && pos < start.max(end))
    }

    /// Base pairs covered by genes (boundaries included) and barriers.
    pub fn occupied_length(&self) -> Position {
        let genes: Position = self
            .gene_starts
            .iter()
            .zip(&self.gene_ends)
            .map(|(&start, &end)| (end - start).abs() + 1)
            .sum();
        genes + self.barriers.len() as Position
    }
}
