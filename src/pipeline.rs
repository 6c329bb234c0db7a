// End-to-end run: load regions, count both categories, write reports
use std::fs;
use std::path::Path;

use log::debug;

use crate::bam_source::{AlignmentSource, IndexedBam};
use crate::batch::{process_units, BatchSummary};
use crate::boundary::CountOptions;
use crate::cli::Config;
use crate::data_loader::load_analysis_units;
use crate::error::{Error, Result};
use crate::region::AnalysisUnit;
use crate::report::{concatenate_reports, write_report, Category, COMBINED_REPORT};

/// Counts one category against `source` and writes its report into `out_dir`.
pub fn count_category<S: AlignmentSource + ?Sized>(
    units: &mut [AnalysisUnit],
    source: &mut S,
    category: Category,
    options: &CountOptions,
    out_dir: &Path,
) -> Result<BatchSummary> {
    debug!("Working on {} terminal exons...", category.as_str());
    let summary = process_units(units, source, options)?;
    write_report(&out_dir.join(category.report_name()), units, category)?;
    Ok(summary)
}

/// Joins the two category reports, annotated rows first.
pub fn finalize_reports(out_dir: &Path) -> Result<()> {
    debug!("Concatenating annotated and novel terminal exons...");
    concatenate_reports(
        &out_dir.join(Category::Annotated.report_name()),
        &out_dir.join(Category::Novel.report_name()),
        &out_dir.join(COMBINED_REPORT),
    )
}

pub fn run(config: &Config) -> Result<()> {
    config.validate()?;
    fs::create_dir_all(&config.out).map_err(|e| Error::io(e, &config.out))?;

    let options = config.count_options();
    let mut novel = load_analysis_units(&config.bed_novel)?;
    let mut annotated = load_analysis_units(&config.bed_annotated)?;
    debug!(
        "Loaded {} novel and {} annotated terminal exons",
        novel.len(),
        annotated.len()
    );

    if config.parallel {
        // one BAM handle per worker
        let (novel_result, annotated_result) = rayon::join(
            || -> Result<BatchSummary> {
                let mut bam = IndexedBam::open(&config.bam)?;
                count_category(&mut novel, &mut bam, Category::Novel, &options, &config.out)
            },
            || -> Result<BatchSummary> {
                let mut bam = IndexedBam::open(&config.bam)?;
                count_category(&mut annotated, &mut bam, Category::Annotated, &options, &config.out)
            },
        );
        novel_result?;
        annotated_result?;
    } else {
        let mut bam = IndexedBam::open(&config.bam)?;
        count_category(&mut novel, &mut bam, Category::Novel, &options, &config.out)?;
        count_category(&mut annotated, &mut bam, Category::Annotated, &options, &config.out)?;
    }

    finalize_reports(&config.out)
}
