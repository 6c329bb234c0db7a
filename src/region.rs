// Analysis units: one candidate terminal exon and its support counters
use std::collections::BTreeSet;

use crate::interval::{Interval, Strand};
use crate::junction::GapSide;
use crate::label_map::LabelMap;

pub const EXON_LABEL: &str = "exon";

/// Boundary positions of a region that a splice junction may land on.
///
/// `start` is the 0-based first base of the region and `end` its exclusive end,
/// so a read spliced into a forward exon has its downstream block starting at
/// `start`, and a read spliced into a reverse exon has its upstream block ending
/// at `end`. Only the boundaries facing the transcriptional upstream are set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundaryPositions {
    pub start: Option<u64>,
    pub end: Option<u64>,
}

/// Interval-to-label index seeded with the region itself.
#[derive(Debug, Clone)]
pub struct RegionIndex {
    interval: Interval,
    labels: LabelMap,
}

impl RegionIndex {
    pub fn new(interval: Interval) -> Self {
        let mut labels = LabelMap::new();
        labels.insert(&interval, EXON_LABEL);
        labels.index();
        RegionIndex { interval, labels }
    }

    pub fn labels_at(&self, pos: u64) -> BTreeSet<String> {
        self.labels
            .labels_at(self.interval.chrom(), self.interval.strand(), pos)
    }

    /// Splice-in border(s) following the exon's orientation: the start for `+`,
    /// the end for `-`, both when the strand is unknown.
    pub fn boundary_positions(&self) -> BoundaryPositions {
        let (start, end) = (self.interval.start(), self.interval.end());
        match self.interval.strand() {
            Strand::Forward => BoundaryPositions {
                start: Some(start),
                end: None,
            },
            Strand::Reverse => BoundaryPositions {
                start: None,
                end: Some(end),
            },
            Strand::Unknown => BoundaryPositions {
                start: Some(start),
                end: Some(end),
            },
        }
    }

    /// Each set boundary paired with the junction flank that must land on it:
    /// the block after the gap for the start, the block before it for the end.
    pub fn splice_in_borders(&self) -> Vec<(GapSide, u64)> {
        let borders = self.boundary_positions();
        borders
            .start
            .map(|b| (GapSide::After, b))
            .into_iter()
            .chain(borders.end.map(|b| (GapSide::Before, b)))
            .collect()
    }

    /// Bases of `iv` that fall on the exon, strand-exact.
    pub fn exon_overlap(&self, iv: &Interval) -> u64 {
        self.labels.covered_len(iv, EXON_LABEL)
    }
}

#[derive(Debug, Clone)]
pub struct AnalysisUnit {
    pub unit_id: String,
    pub gene_id: String,
    interval: Interval,
    index: RegionIndex,
    pub(crate) annotated_splice_in_borders: u64,
    pub(crate) novel_splice_in_borders: u64,
}

impl AnalysisUnit {
    pub fn new(interval: Interval, gene_id: impl Into<String>) -> Self {
        let unit_id = format!(
            "{}:{}-{}",
            interval.chrom(),
            interval.start(),
            interval.end()
        );
        AnalysisUnit {
            unit_id,
            gene_id: gene_id.into(),
            index: RegionIndex::new(interval.clone()),
            interval,
            annotated_splice_in_borders: 0,
            novel_splice_in_borders: 0,
        }
    }

    pub fn interval(&self) -> &Interval {
        &self.interval
    }

    pub fn index(&self) -> &RegionIndex {
        &self.index
    }

    pub fn annotated_splice_in_borders(&self) -> u64 {
        self.annotated_splice_in_borders
    }

    pub fn novel_splice_in_borders(&self) -> u64 {
        self.novel_splice_in_borders
    }

    /// Total number of alignments found to support the splice-in border.
    pub fn support_count(&self) -> u64 {
        self.annotated_splice_in_borders + self.novel_splice_in_borders
    }
}
