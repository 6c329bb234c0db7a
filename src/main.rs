use log::{debug, LevelFilter};

use tecount::cli::{self, Config};
use tecount::pipeline;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Ctrl-C is a clean exit, not a failure
    ctrlc::set_handler(|| {
        eprintln!("User interrupt!");
        std::process::exit(0);
    })?;

    let matches = cli::command().get_matches();
    let config = Config::from_matches(&matches);

    // Initialize the logger with the appropriate level
    let level = if config.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    env_logger::Builder::from_default_env()
        .filter(None, level)
        .target(env_logger::Target::Stdout)
        .init();

    // Log all arguments if verbose is enabled
    debug!("Script started...");
    debug!("Annotated BED file: {}", config.bed_annotated.display());
    debug!("Novel BED file: {}", config.bed_novel.display());
    debug!("BAM file: {}", config.bam.display());
    debug!("Sequencing direction: {}", config.sequencing_direction);
    debug!("Output directory: {}", config.out.display());
    debug!("Minimum region overlap: {}", config.min_region_overlap);
    debug!("Splice fuzziness: {}", config.splice_fuzziness);
    debug!("Count multimappers: {}", config.count_multimappers);

    pipeline::run(&config)?;

    debug!("Script done...");
    Ok(())
}
