// Modules for data loading
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use flate2::read::MultiGzDecoder;

use crate::error::{Error, Result};
use crate::interval::{Interval, Strand};
use crate::region::AnalysisUnit;

/// One BED entry: chrom, start, end, name, score (ignored), strand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BedEntry {
    pub interval: Interval,
    pub name: String,
}

fn open_maybe_gz(path: &Path) -> Result<Box<dyn BufRead>> {
    let file = File::open(path).map_err(|e| Error::io(e, path))?;
    let inner: Box<dyn Read> = if path.extension().map_or(false, |ext| ext == "gz") {
        Box::new(MultiGzDecoder::new(file))
    } else {
        Box::new(file)
    };
    Ok(Box::new(BufReader::new(inner)))
}

fn parse_bed_line(line: &str) -> std::result::Result<BedEntry, String> {
    let fields: Vec<&str> = line.split('\t').collect();
    if fields.len() < 3 {
        return Err(format!("expected at least 3 tab-separated fields, found {}", fields.len()));
    }
    let start = fields[1]
        .trim()
        .parse::<u64>()
        .map_err(|e| format!("bad start '{}': {}", fields[1], e))?;
    let end = fields[2]
        .trim()
        .parse::<u64>()
        .map_err(|e| format!("bad end '{}': {}", fields[2], e))?;
    let name = fields.get(3).map_or("unnamed", |n| n.trim()).to_string();
    let strand = match fields.get(5) {
        Some(symbol) => Strand::from_symbol(symbol.trim())
            .ok_or_else(|| format!("bad strand '{}'", symbol))?,
        None => Strand::Unknown,
    };
    let interval = Interval::new(fields[0], start, end, strand).map_err(|e| e.to_string())?;
    Ok(BedEntry { interval, name })
}

/// Reads every entry of a BED file, plain or gzip-compressed.
pub fn load_bed(path: &Path) -> Result<Vec<BedEntry>> {
    let reader = open_maybe_gz(path)?;
    let mut entries = Vec::new();
    for (i, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| Error::io(e, path))?;
        let trimmed = line.trim_end_matches(['\r', '\n']);
        if trimmed.trim().is_empty()
            || trimmed.starts_with('#')
            || trimmed.starts_with("track")
            || trimmed.starts_with("browser")
        {
            continue;
        }
        let entry = parse_bed_line(trimmed).map_err(|reason| Error::Region {
            path: path.to_path_buf(),
            line: i + 1,
            reason,
        })?;
        entries.push(entry);
    }
    Ok(entries)
}

/// One analysis unit per BED entry, in file order. The BED name becomes the gene id.
pub fn load_analysis_units(path: &Path) -> Result<Vec<AnalysisUnit>> {
    Ok(load_bed(path)?
        .into_iter()
        .map(|entry| AnalysisUnit::new(entry.interval, entry.name))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;

    const BED: &str = "track name=terminal_exons\n\
                       chr1\t100\t200\tG1\t0\t+\n\
                       # comment\n\
                       \n\
                       chr2\t5\t50\tG2\t.\t-\n\
                       chr3\t7\t9\n";

    #[test]
    fn parses_entries_and_skips_headers() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("regions.bed");
        std::fs::write(&path, BED).unwrap();
        let entries = load_bed(&path).unwrap();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].name, "G1");
        assert_eq!(entries[0].interval.strand(), Strand::Forward);
        assert_eq!(entries[1].interval.strand(), Strand::Reverse);
        assert_eq!(entries[2].name, "unnamed");
        assert_eq!(entries[2].interval.strand(), Strand::Unknown);
    }

    #[test]
    fn reads_gzip_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("regions.bed.gz");
        let mut gz = GzEncoder::new(File::create(&path).unwrap(), Compression::default());
        gz.write_all(BED.as_bytes()).unwrap();
        gz.finish().unwrap();
        let units = load_analysis_units(&path).unwrap();
        assert_eq!(units.len(), 3);
        assert_eq!(units[0].unit_id, "chr1:100-200");
        assert_eq!(units[1].gene_id, "G2");
    }

    #[test]
    fn malformed_lines_are_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.bed");
        std::fs::write(&path, "chr1\t100\t200\tG1\t0\t+\nchr1\t300\t250\tG2\t0\t+\n").unwrap();
        match load_bed(&path) {
            Err(Error::Region { line, .. }) => assert_eq!(line, 2),
            other => panic!("unexpected result: {:?}", other),
        }

        std::fs::write(&path, "chr1\t100\n").unwrap();
        assert!(matches!(load_bed(&path), Err(Error::Region { line: 1, .. })));

        std::fs::write(&path, "chr1\t100\t200\tG1\t0\t*\n").unwrap();
        assert!(matches!(load_bed(&path), Err(Error::Region { line: 1, .. })));
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(load_bed(&dir.path().join("nope.bed")), Err(Error::Io { .. })));
    }
}
