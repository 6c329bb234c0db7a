// Alignment sources queried region by region
use std::collections::HashMap;
use std::path::Path;

use log::warn;
use rust_htslib::bam::{self, Read};

use crate::alignment::{Alignment, AlignmentView};
use crate::error::Result;
use crate::interval::{Interval, StrandMatch};

pub type AlignmentIter<'a> = Box<dyn Iterator<Item = Result<Alignment>> + 'a>;

/// Anything that can hand out the alignments overlapping a region, any number of times.
pub trait AlignmentSource {
    fn fetch<'a>(&'a mut self, region: &Interval) -> Result<AlignmentIter<'a>>;
}

/// Coordinate-sorted, indexed BAM file.
pub struct IndexedBam {
    reader: bam::IndexedReader,
    refname_to_tid: HashMap<String, u32>,
}

impl IndexedBam {
    pub fn open(path: &Path) -> Result<Self> {
        let reader = bam::IndexedReader::from_path(path)?;
        let refname_to_tid = reader
            .header()
            .target_names()
            .iter()
            .enumerate()
            .map(|(i, name)| (String::from_utf8_lossy(name).to_string(), i as u32))
            .collect();
        Ok(IndexedBam {
            reader,
            refname_to_tid,
        })
    }
}

impl AlignmentSource for IndexedBam {
    /// Mapped records overlapping `region`, on either strand.
    fn fetch<'a>(&'a mut self, region: &Interval) -> Result<AlignmentIter<'a>> {
        let tid = match self.refname_to_tid.get(region.chrom()) {
            Some(tid) => *tid,
            None => {
                warn!("Reference {} not found in BAM header, skipping {}", region.chrom(), region);
                return Ok(Box::new(std::iter::empty()));
            }
        };
        self.reader.fetch((tid, region.start(), region.end()))?;
        let chrom = region.chrom().to_string();
        let records = self.reader.records().filter_map(move |result| match result {
            Ok(record) => Alignment::from_record(&record, &chrom).transpose(),
            Err(e) => Some(Err(e.into())),
        });
        Ok(Box::new(records))
    }
}

/// In-memory source, mostly for tests and small inputs.
#[derive(Debug, Clone, Default)]
pub struct VecSource {
    alignments: Vec<Alignment>,
}

impl VecSource {
    pub fn new(alignments: Vec<Alignment>) -> Self {
        VecSource { alignments }
    }
}

impl AlignmentSource for VecSource {
    /// Every alignment sharing bases with `region`, whatever its strand.
    fn fetch<'a>(&'a mut self, region: &Interval) -> Result<AlignmentIter<'a>> {
        let region = region.clone();
        Ok(Box::new(
            self.alignments
                .iter()
                .filter(move |aln| {
                    let iv = aln.mapped_interval();
                    iv.overlaps(&region.with_strand(iv.strand()), StrandMatch::Exact)
                })
                .cloned()
                .map(Ok),
        ))
    }
}
