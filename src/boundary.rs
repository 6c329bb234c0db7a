// Modules for counting split reads at the splice-in border of terminal exons
use crate::alignment::AlignmentView;
use crate::interval::StrandMatch;
use crate::junction::junction_positions;
use crate::region::AnalysisUnit;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequencingDirection {
    Unstranded,
    Stranded,
}

impl SequencingDirection {
    /// Any value mentioning "unstranded" is unstranded; everything else keeps strand.
    pub fn from_arg(value: &str) -> Self {
        if value.contains("unstranded") {
            SequencingDirection::Unstranded
        } else {
            SequencingDirection::Stranded
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountOptions {
    pub sequencing_direction: SequencingDirection,
    pub min_region_overlap: u64,
    pub splice_fuzziness: u64,
    pub count_unique_mapping_reads_only: bool,
    pub annotated: bool,
}

impl Default for CountOptions {
    fn default() -> Self {
        CountOptions {
            sequencing_direction: SequencingDirection::Unstranded,
            min_region_overlap: 0,
            splice_fuzziness: 0,
            count_unique_mapping_reads_only: true,
            annotated: true,
        }
    }
}

impl AnalysisUnit {
    /// Adds one to the splice-in border count if `aln` is a split read whose
    /// junction lands on the exon's boundary within `splice_fuzziness` bases.
    ///
    /// Multimappers are ignored when only unique reads count. So are reads on
    /// another chromosome or strand, reads sharing fewer than
    /// `min_region_overlap` bases with the exon, and unsplit reads. A read
    /// counts at most once per call, however many of its junctions match.
    /// Returns whether the read was counted.
    pub fn count<A: AlignmentView + ?Sized>(&mut self, aln: &A, options: &CountOptions) -> bool {
        if options.count_unique_mapping_reads_only && !aln.is_unique() {
            return false;
        }

        if !self.interval().comparable(aln.mapped_interval(), StrandMatch::Exact) {
            return false;
        }
        // a read spliced across the exon start may share no base with it
        if self.index().exon_overlap(aln.mapped_interval()) < options.min_region_overlap {
            return false;
        }

        let fuzziness = options.splice_fuzziness;
        let supported = self.index().splice_in_borders().into_iter().any(|(side, border)| {
            junction_positions(aln.segments(), side)
                .into_iter()
                .any(|pos| pos.abs_diff(border) <= fuzziness)
        });
        if !supported {
            return false;
        }

        if options.annotated {
            self.annotated_splice_in_borders += 1;
        } else {
            self.novel_splice_in_borders += 1;
        }
        true
    }
}
