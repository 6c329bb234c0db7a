// Read-only views of spliced alignments
use rust_htslib::bam::record::{Aux, Cigar};
use rust_htslib::bam::Record;

use crate::error::{Error, Result};
use crate::interval::{Interval, Strand};

/// A contiguous aligned block and the reference skip that follows it, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub block: Interval,
    pub gap_after: Option<u64>,
}

/// What the support classifier needs to know about an alignment.
pub trait AlignmentView {
    fn mapped_interval(&self) -> &Interval;
    fn is_unique(&self) -> bool;
    fn segments(&self) -> &[Segment];
}

/// Owned alignment. Sources hand these out so each region works on its own copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alignment {
    pub read_name: String,
    mapped_interval: Interval,
    unique: bool,
    segments: Vec<Segment>,
}

impl Alignment {
    pub fn new(read_name: impl Into<String>, segments: Vec<Segment>, unique: bool) -> Result<Self> {
        let (chrom, strand, start, end) = match (segments.first(), segments.last()) {
            (Some(first), Some(last)) => (
                first.block.chrom().to_string(),
                first.block.strand(),
                first.block.start(),
                last.block.end(),
            ),
            _ => {
                return Err(Error::Alignment(
                    "alignment needs at least one aligned block".to_string(),
                ))
            }
        };
        Ok(Alignment {
            read_name: read_name.into(),
            mapped_interval: Interval::new(chrom, start, end, strand)?,
            unique,
            segments,
        })
    }

    /// Decodes a mapped BAM record. Returns `None` for unmapped records and
    /// records without reference-consuming CIGAR operations.
    pub fn from_record(record: &Record, chrom: &str) -> Result<Option<Alignment>> {
        if record.is_unmapped() || record.pos() < 0 {
            return Ok(None);
        }
        let strand = if record.is_reverse() {
            Strand::Reverse
        } else {
            Strand::Forward
        };
        let cigar = record.cigar();
        let segments = segments_from_cigar(chrom, record.pos() as u64, strand, cigar.iter())?;
        if segments.is_empty() {
            return Ok(None);
        }
        let read_name = String::from_utf8_lossy(record.qname()).to_string();
        Alignment::new(read_name, segments, is_unique_record(record)).map(Some)
    }

    pub fn strand(&self) -> Strand {
        self.mapped_interval.strand()
    }

    /// Copy of this alignment with the strand of the alignment and of every
    /// block overwritten.
    pub fn with_strand(&self, strand: Strand) -> Alignment {
        Alignment {
            read_name: self.read_name.clone(),
            mapped_interval: self.mapped_interval.with_strand(strand),
            unique: self.unique,
            segments: self
                .segments
                .iter()
                .map(|s| Segment {
                    block: s.block.with_strand(strand),
                    gap_after: s.gap_after,
                })
                .collect(),
        }
    }
}

impl AlignmentView for Alignment {
    fn mapped_interval(&self) -> &Interval {
        &self.mapped_interval
    }

    fn is_unique(&self) -> bool {
        self.unique
    }

    fn segments(&self) -> &[Segment] {
        &self.segments
    }
}

/// A single best placement: `NH == 1`, or primary when the aligner wrote no NH tag.
fn is_unique_record(record: &Record) -> bool {
    let hits = match record.aux(b"NH") {
        Ok(Aux::U8(n)) => Some(n as i64),
        Ok(Aux::U16(n)) => Some(n as i64),
        Ok(Aux::U32(n)) => Some(n as i64),
        Ok(Aux::I8(n)) => Some(n as i64),
        Ok(Aux::I16(n)) => Some(n as i64),
        Ok(Aux::I32(n)) => Some(n as i64),
        _ => None,
    };
    match hits {
        Some(n) => n == 1,
        None => !record.is_secondary() && !record.is_supplementary(),
    }
}

/// Splits a CIGAR into aligned blocks separated by reference skips (`N`).
/// Deletions stay inside their block; insertions and clips consume no reference.
pub fn segments_from_cigar<'a, I>(chrom: &str, pos: u64, strand: Strand, cigar: I) -> Result<Vec<Segment>>
where
    I: IntoIterator<Item = &'a Cigar>,
{
    let mut segments = Vec::new();
    let mut block_start = pos;
    let mut current = pos;
    for op in cigar {
        match op {
            Cigar::Match(l) | Cigar::Equal(l) | Cigar::Diff(l) | Cigar::Del(l) => {
                current += *l as u64;
            }
            Cigar::RefSkip(l) => {
                if current > block_start {
                    segments.push(Segment {
                        block: Interval::new(chrom, block_start, current, strand)?,
                        gap_after: Some(*l as u64),
                    });
                } else if let Some(last) = segments.last_mut() {
                    // N directly after N: merge into one skip
                    last.gap_after = last.gap_after.map(|g| g + *l as u64);
                }
                current += *l as u64;
                block_start = current;
            }
            Cigar::Ins(_) | Cigar::SoftClip(_) | Cigar::HardClip(_) | Cigar::Pad(_) => {}
        }
    }
    if current > block_start {
        segments.push(Segment {
            block: Interval::new(chrom, block_start, current, strand)?,
            gap_after: None,
        });
    } else if let Some(last) = segments.last_mut() {
        // trailing skip with no block after it is not a junction
        last.gap_after = None;
    }
    Ok(segments)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_htslib::bam::record::CigarString;

    fn segments(pos: u64, ops: Vec<Cigar>) -> Vec<Segment> {
        let cigar = CigarString(ops);
        segments_from_cigar("chr1", pos, Strand::Forward, cigar.iter()).unwrap()
    }

    fn bounds(segments: &[Segment]) -> Vec<(u64, u64, Option<u64>)> {
        segments
            .iter()
            .map(|s| (s.block.start(), s.block.end(), s.gap_after))
            .collect()
    }

    #[test]
    fn unspliced_read_is_one_block() {
        let s = segments(100, vec![Cigar::SoftClip(5), Cigar::Match(50), Cigar::SoftClip(3)]);
        assert_eq!(bounds(&s), vec![(100, 150, None)]);
    }

    #[test]
    fn ref_skip_splits_blocks() {
        let s = segments(100, vec![Cigar::Match(30), Cigar::RefSkip(500), Cigar::Match(20)]);
        assert_eq!(bounds(&s), vec![(100, 130, Some(500)), (630, 650, None)]);
    }

    #[test]
    fn deletions_and_insertions_stay_inside_block() {
        let s = segments(
            100,
            vec![Cigar::Match(10), Cigar::Del(4), Cigar::Match(10), Cigar::Ins(3), Cigar::Match(6)],
        );
        assert_eq!(bounds(&s), vec![(100, 130, None)]);
    }

    #[test]
    fn multiple_junctions() {
        let s = segments(
            0,
            vec![
                Cigar::Match(10),
                Cigar::RefSkip(90),
                Cigar::Equal(10),
                Cigar::Diff(1),
                Cigar::RefSkip(100),
                Cigar::Match(5),
            ],
        );
        assert_eq!(
            bounds(&s),
            vec![(0, 10, Some(90)), (100, 111, Some(100)), (211, 216, None)]
        );
    }

    #[test]
    fn dangling_skips_are_not_junctions() {
        let s = segments(100, vec![Cigar::RefSkip(50), Cigar::Match(20), Cigar::RefSkip(10)]);
        assert_eq!(bounds(&s), vec![(150, 170, None)]);
    }

    #[test]
    fn with_strand_rewrites_every_block() {
        let s = segments(100, vec![Cigar::Match(30), Cigar::RefSkip(500), Cigar::Match(20)]);
        let aln = Alignment::new("r1", s, true).unwrap();
        let flipped = aln.with_strand(Strand::Reverse);
        assert_eq!(flipped.strand(), Strand::Reverse);
        assert!(flipped.segments().iter().all(|s| s.block.strand() == Strand::Reverse));
        assert_eq!(aln.strand(), Strand::Forward);
        assert_eq!(flipped.mapped_interval().start(), 100);
        assert_eq!(flipped.mapped_interval().end(), 650);
    }

    #[test]
    fn record_decoding() {
        let mut record = Record::new();
        let cigar = CigarString(vec![Cigar::Match(4), Cigar::RefSkip(10), Cigar::Match(4)]);
        record.set(b"read1", Some(&cigar), b"ACGTACGT", &[30; 8]);
        record.set_pos(99);
        record.set_tid(0);
        record.set_flags(16);
        record.push_aux(b"NH", Aux::U8(1)).unwrap();
        let aln = Alignment::from_record(&record, "chr1").unwrap().unwrap();
        assert_eq!(aln.read_name, "read1");
        assert_eq!(aln.strand(), Strand::Reverse);
        assert!(aln.is_unique());
        assert_eq!(bounds(aln.segments()), vec![(99, 103, Some(10)), (113, 117, None)]);
    }

    #[test]
    fn multimapper_is_not_unique() {
        let mut record = Record::new();
        let cigar = CigarString(vec![Cigar::Match(8)]);
        record.set(b"read2", Some(&cigar), b"ACGTACGT", &[30; 8]);
        record.set_pos(10);
        record.set_flags(0);
        record.push_aux(b"NH", Aux::U8(3)).unwrap();
        let aln = Alignment::from_record(&record, "chr1").unwrap().unwrap();
        assert!(!aln.is_unique());
    }

    #[test]
    fn unmapped_record_is_skipped() {
        let mut record = Record::new();
        record.set(b"read3", None, b"ACGT", &[30; 4]);
        record.set_flags(4);
        assert!(Alignment::from_record(&record, "chr1").unwrap().is_none());
    }
}
