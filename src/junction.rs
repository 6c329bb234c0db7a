// Modules for handling splice junctions
use itertools::Itertools;

use crate::alignment::Segment;
use crate::interval::Strand;

/// Side of a reference skip a coordinate is taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GapSide {
    /// Exclusive end of the block before the gap, i.e. the first skipped base.
    Before,
    /// First base of the block after the gap.
    After,
}

/// One reference skip between two aligned blocks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpliceJunction {
    pub chrom: String,
    pub intron_start: u64,
    pub intron_end: u64,
    pub strand: Strand,
}

impl SpliceJunction {
    pub fn flank(&self, side: GapSide) -> u64 {
        match side {
            GapSide::Before => self.intron_start,
            GapSide::After => self.intron_end,
        }
    }
}

/// Junctions of a split alignment, in reference order. Empty for unsplit reads.
pub fn extract_junctions(segments: &[Segment]) -> Vec<SpliceJunction> {
    segments
        .iter()
        .tuple_windows()
        .filter(|(upstream, _)| upstream.gap_after.is_some())
        .map(|(upstream, downstream)| SpliceJunction {
            chrom: upstream.block.chrom().to_string(),
            intron_start: upstream.block.end(),
            intron_end: downstream.block.start(),
            strand: upstream.block.strand(),
        })
        .collect()
}

/// The `side` flank of every junction, in reference order.
pub fn junction_positions(segments: &[Segment], side: GapSide) -> Vec<u64> {
    extract_junctions(segments)
        .iter()
        .map(|junction| junction.flank(side))
        .collect()
}
