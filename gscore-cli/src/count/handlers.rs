use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::ArgMatches;
use log::info;

use gscore_engine::{CountInput, count_alignments};

use crate::config::count_options;

pub fn run_count(matches: &ArgMatches) -> Result<()> {
    let source = matches
        .get_one::<String>("source")
        .context("A path to a BAM file is required.")?;
    let options = count_options(matches)?;

    info!(
        "Counting {} (paired: {}, min quality: {}, workers: {})",
        source, options.paired, options.min_quality, options.workers
    );

    let total = count_alignments(CountInput::Path(PathBuf::from(source)), &options)
        .with_context(|| format!("Failed to count alignments in {}", source))?;

    println!("{}\t{}", source, total);
    Ok(())
}
