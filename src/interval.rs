// Genomic intervals and strands
use std::fmt;

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Strand {
    Forward,
    Reverse,
    Unknown,
}

impl Strand {
    /// Parses the BED strand column.
    pub fn from_symbol(symbol: &str) -> Option<Strand> {
        match symbol {
            "+" => Some(Strand::Forward),
            "-" => Some(Strand::Reverse),
            "." => Some(Strand::Unknown),
            _ => None,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Strand::Forward => "+",
            Strand::Reverse => "-",
            Strand::Unknown => ".",
        }
    }

    pub fn compatible(&self, other: Strand, mode: StrandMatch) -> bool {
        match mode {
            StrandMatch::Exact => *self == other,
            StrandMatch::Unstranded => {
                *self == other || *self == Strand::Unknown || other == Strand::Unknown
            }
        }
    }
}

impl fmt::Display for Strand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// How strands are compared. `Unstranded` lets `Unknown` match anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StrandMatch {
    #[default]
    Exact,
    Unstranded,
}

/// Half-open, 0-based genomic interval.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Interval {
    chrom: String,
    start: u64,
    end: u64,
    strand: Strand,
}

impl Interval {
    pub fn new(chrom: impl Into<String>, start: u64, end: u64, strand: Strand) -> Result<Self> {
        let chrom = chrom.into();
        if start >= end {
            return Err(Error::Interval { chrom, start, end });
        }
        Ok(Interval {
            chrom,
            start,
            end,
            strand,
        })
    }

    pub fn chrom(&self) -> &str {
        &self.chrom
    }

    pub fn start(&self) -> u64 {
        self.start
    }

    pub fn end(&self) -> u64 {
        self.end
    }

    pub fn strand(&self) -> Strand {
        self.strand
    }

    pub fn len(&self) -> u64 {
        self.end - self.start
    }

    /// Same coordinates on another strand.
    pub fn with_strand(&self, strand: Strand) -> Interval {
        Interval {
            strand,
            ..self.clone()
        }
    }

    /// Same chromosome and compatible strands.
    pub fn comparable(&self, other: &Interval, mode: StrandMatch) -> bool {
        self.chrom == other.chrom && self.strand.compatible(other.strand, mode)
    }

    pub fn overlaps(&self, other: &Interval, mode: StrandMatch) -> bool {
        self.overlap_len(other, mode) > 0
    }

    /// Number of shared bases; 0 across chromosomes or incompatible strands.
    pub fn overlap_len(&self, other: &Interval, mode: StrandMatch) -> u64 {
        if !self.comparable(other, mode) {
            return 0;
        }
        let start = self.start.max(other.start);
        let end = self.end.min(other.end);
        end.saturating_sub(start)
    }

    pub fn contains(&self, other: &Interval, mode: StrandMatch) -> bool {
        self.comparable(other, mode) && self.start <= other.start && other.end <= self.end
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}-{}", self.chrom, self.start, self.end)
    }
}
