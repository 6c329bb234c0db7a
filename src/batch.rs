// Region batch processing: fetch, normalize and classify alignments per unit
use log::{debug, info};

use crate::alignment::Alignment;
use crate::bam_source::AlignmentSource;
use crate::boundary::{CountOptions, SequencingDirection};
use crate::error::Result;
use crate::interval::Strand;
use crate::region::AnalysisUnit;

pub const PROGRESS_INTERVAL: usize = 100;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub units: usize,
    pub alignments_seen: u64,
    pub alignments_supporting: u64,
}

/// Rewrites the alignment strand to the region's when the library is unstranded.
pub fn normalize_strand(aln: Alignment, region_strand: Strand, direction: SequencingDirection) -> Alignment {
    match direction {
        SequencingDirection::Unstranded if aln.strand() != region_strand => aln.with_strand(region_strand),
        _ => aln,
    }
}

/// Counts splice-in support for every unit, in order, against `source`.
pub fn process_units<S: AlignmentSource + ?Sized>(
    units: &mut [AnalysisUnit],
    source: &mut S,
    options: &CountOptions,
) -> Result<BatchSummary> {
    let mut summary = BatchSummary::default();
    for (i, unit) in units.iter_mut().enumerate() {
        let unit_nr = i + 1;
        if unit_nr % PROGRESS_INTERVAL == 0 {
            info!("Regions processed:\t{}", unit_nr);
        }

        let region = unit.interval().clone();
        for aln in source.fetch(&region)? {
            let aln = normalize_strand(aln?, region.strand(), options.sequencing_direction);
            summary.alignments_seen += 1;
            if unit.count(&aln, options) {
                summary.alignments_supporting += 1;
            }
        }
        summary.units = unit_nr;
    }
    debug!(
        "{} regions, {} alignments inspected, {} supporting",
        summary.units, summary.alignments_seen, summary.alignments_supporting
    );
    Ok(summary)
}
