// Tab-separated support reports
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use itertools::Itertools;

use crate::error::{Error, Result};
use crate::region::AnalysisUnit;

pub const ANNOTATED_REPORT: &str = "counts_annotated.tsv";
pub const NOVEL_REPORT: &str = "counts_novel.tsv";
pub const COMBINED_REPORT: &str = "counts_annotated_and_novel.tsv";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Annotated,
    Novel,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Annotated => "annotated",
            Category::Novel => "novel",
        }
    }

    pub fn report_name(&self) -> &'static str {
        match self {
            Category::Annotated => ANNOTATED_REPORT,
            Category::Novel => NOVEL_REPORT,
        }
    }
}

/// `chrom:start+1:end:gene_id:strand:category`, with a 1-based start.
pub fn region_key(unit: &AnalysisUnit, category: Category) -> String {
    let iv = unit.interval();
    [
        iv.chrom().to_string(),
        (iv.start() + 1).to_string(),
        iv.end().to_string(),
        unit.gene_id.clone(),
        iv.strand().to_string(),
        category.as_str().to_string(),
    ]
    .iter()
    .join(":")
}

pub fn report_row(unit: &AnalysisUnit, category: Category) -> String {
    format!("{}\t{}\n", region_key(unit, category), unit.support_count())
}

// Writes to a sibling temp file and renames it into place.
fn write_atomically<F>(path: &Path, fill: F) -> Result<()>
where
    F: FnOnce(&mut BufWriter<File>) -> std::io::Result<()>,
{
    let tmp = tmp_path(path);
    let file = File::create(&tmp).map_err(|e| Error::io(e, &tmp))?;
    let mut writer = BufWriter::new(file);
    fill(&mut writer)
        .and_then(|_| writer.flush())
        .map_err(|e| Error::io(e, &tmp))?;
    drop(writer);
    fs::rename(&tmp, path).map_err(|e| Error::io(e, path))
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Writes one row per unit, in unit order.
pub fn write_report(path: &Path, units: &[AnalysisUnit], category: Category) -> Result<()> {
    write_atomically(path, |w| {
        for unit in units {
            w.write_all(report_row(unit, category).as_bytes())?;
        }
        Ok(())
    })
}

/// Byte-concatenates `first` then `second` into `out`.
pub fn concatenate_reports(first: &Path, second: &Path, out: &Path) -> Result<()> {
    let mut parts = Vec::with_capacity(2);
    for path in [first, second] {
        parts.push(fs::read(path).map_err(|e| Error::io(e, path))?);
    }
    write_atomically(out, |w| parts.iter().try_for_each(|bytes| w.write_all(bytes)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interval::{Interval, Strand};

    fn unit(chrom: &str, start: u64, end: u64, strand: Strand, gene: &str, count: u64) -> AnalysisUnit {
        let mut au = AnalysisUnit::new(Interval::new(chrom, start, end, strand).unwrap(), gene);
        au.annotated_splice_in_borders = count;
        au
    }

    #[test]
    fn row_uses_one_based_start() {
        let au = unit("chrN", 100, 200, Strand::Forward, "G1", 3);
        assert_eq!(report_row(&au, Category::Novel), "chrN:101:200:G1:+:novel\t3\n");
        assert_eq!(au.interval().start(), 100);
    }

    #[test]
    fn reverse_and_unknown_strands() {
        let au = unit("chr2", 0, 10, Strand::Reverse, "G2", 0);
        assert_eq!(report_row(&au, Category::Annotated), "chr2:1:10:G2:-:annotated\t0\n");
        let au = unit("chr2", 0, 10, Strand::Unknown, "G3", 7);
        assert_eq!(region_key(&au, Category::Annotated), "chr2:1:10:G3:.:annotated");
    }

    #[test]
    fn concatenation_keeps_order_and_duplicates() {
        let dir = tempfile::tempdir().unwrap();
        let annotated = dir.path().join(ANNOTATED_REPORT);
        let novel = dir.path().join(NOVEL_REPORT);
        let combined = dir.path().join(COMBINED_REPORT);
        let au = unit("chr1", 100, 200, Strand::Forward, "G1", 2);
        write_report(&annotated, &[au.clone(), au.clone()], Category::Annotated).unwrap();
        write_report(&novel, &[unit("chr1", 500, 600, Strand::Reverse, "G1", 5)], Category::Novel).unwrap();
        concatenate_reports(&annotated, &novel, &combined).unwrap();

        let text = fs::read_to_string(&combined).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "chr1:101:200:G1:+:annotated\t2",
                "chr1:101:200:G1:+:annotated\t2",
                "chr1:501:600:G1:-:novel\t5",
            ]
        );
        assert!(!tmp_path(&combined).exists());
    }

    #[test]
    fn empty_unit_list_gives_empty_report() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(NOVEL_REPORT);
        write_report(&path, &[], Category::Novel).unwrap();
        assert_eq!(fs::read(&path).unwrap().len(), 0);
    }
}
