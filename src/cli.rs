// Command-line definition and run configuration
use std::path::PathBuf;

use clap::{Arg, ArgAction, ArgMatches, Command};

use crate::boundary::{CountOptions, SequencingDirection};
use crate::error::{Error, Result};

pub fn command() -> Command {
    Command::new("tecount")
        .version("0.1.0")
        .author("NaotoKubota")
        .about("Counts split reads supporting the splice-in border of annotated and novel terminal exons")
        .arg_required_else_help(true)
        .arg(Arg::new("bed_annotated")
            .long("bed-annotated")
            .required(true)
            .value_name("FILE")
            .value_parser(clap::value_parser!(PathBuf))
            .help("BED file with the genomic coordinates of annotated terminal exons"))
        .arg(Arg::new("bed_novel")
            .long("bed-novel")
            .required(true)
            .value_name("FILE")
            .value_parser(clap::value_parser!(PathBuf))
            .help("BED file with the genomic coordinates of novel terminal exons"))
        .arg(Arg::new("bam")
            .long("bam")
            .required(true)
            .value_name("FILE")
            .value_parser(clap::value_parser!(PathBuf))
            .help("Coordinate-sorted and indexed alignment file"))
        .arg(Arg::new("sequencing_direction")
            .long("sequencing-direction")
            .required(true)
            .help("Sequencing direction: 'unstranded' or 'forward'"))
        .arg(Arg::new("out")
            .long("out")
            .required(true)
            .value_name("DIR")
            .value_parser(clap::value_parser!(PathBuf))
            .help("Output directory"))
        .arg(Arg::new("min_region_overlap")
            .long("min-region-overlap")
            .default_value("0")
            .value_parser(clap::value_parser!(u64))
            .help("Minimum number of bases a read must share with the exon"))
        .arg(Arg::new("splice_fuzziness")
            .long("splice-fuzziness")
            .default_value("0")
            .value_parser(clap::value_parser!(u64))
            .help("Allowed distance in bases between a junction and the exon border"))
        .arg(Arg::new("count_multimappers")
            .long("count-multimappers")
            .action(ArgAction::SetTrue)
            .help("Also count reads with more than one reported alignment"))
        .arg(Arg::new("parallel")
            .long("parallel")
            .action(ArgAction::SetTrue)
            .help("Process annotated and novel exons concurrently"))
        .arg(Arg::new("verbose")
            .short('v')
            .long("verbose")
            .action(ArgAction::SetTrue)
            .help("Enable verbose output"))
}

#[derive(Debug, Clone)]
pub struct Config {
    pub bed_annotated: PathBuf,
    pub bed_novel: PathBuf,
    pub bam: PathBuf,
    pub sequencing_direction: String,
    pub out: PathBuf,
    pub min_region_overlap: u64,
    pub splice_fuzziness: u64,
    pub count_multimappers: bool,
    pub parallel: bool,
    pub verbose: bool,
}

impl Config {
    pub fn from_matches(matches: &ArgMatches) -> Self {
        let path = |id: &str| matches.get_one::<PathBuf>(id).cloned().unwrap_or_default();
        Config {
            bed_annotated: path("bed_annotated"),
            bed_novel: path("bed_novel"),
            bam: path("bam"),
            sequencing_direction: matches
                .get_one::<String>("sequencing_direction")
                .cloned()
                .unwrap_or_default(),
            out: path("out"),
            min_region_overlap: matches.get_one::<u64>("min_region_overlap").copied().unwrap_or(0),
            splice_fuzziness: matches.get_one::<u64>("splice_fuzziness").copied().unwrap_or(0),
            count_multimappers: matches.get_flag("count_multimappers"),
            parallel: matches.get_flag("parallel"),
            verbose: matches.get_flag("verbose"),
        }
    }

    /// Fails if any input file is missing or the output path is not a directory.
    pub fn validate(&self) -> Result<()> {
        for (what, path) in [
            ("annotated BED file", &self.bed_annotated),
            ("novel BED file", &self.bed_novel),
            ("BAM file", &self.bam),
        ] {
            if !path.is_file() {
                return Err(Error::Config(format!("{} not found: {}", what, path.display())));
            }
        }
        if self.out.exists() && !self.out.is_dir() {
            return Err(Error::Config(format!(
                "output path is not a directory: {}",
                self.out.display()
            )));
        }
        Ok(())
    }

    pub fn count_options(&self) -> CountOptions {
        CountOptions {
            sequencing_direction: SequencingDirection::from_arg(&self.sequencing_direction),
            min_region_overlap: self.min_region_overlap,
            splice_fuzziness: self.splice_fuzziness,
            count_unique_mapping_reads_only: !self.count_multimappers,
            annotated: true,
        }
    }
}
