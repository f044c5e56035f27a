use std::io::{self, BufWriter, Write};

use anyhow::{Context, Result};
use clap::ArgMatches;

use gscore_core::utils::parse_region;
use gscore_engine::ScoreContext;

use crate::config::collection_params;

pub fn run_score(matches: &ArgMatches) -> Result<()> {
    let sources: Vec<String> = matches
        .get_many::<String>("sources")
        .context("At least one source is required.")?
        .cloned()
        .collect();
    let regions = matches
        .get_many::<String>("region")
        .context("At least one --region is required.")?
        .map(|raw| parse_region(raw).with_context(|| format!("Bad region: {}", raw)))
        .collect::<Result<Vec<_>>>()?;
    let params = collection_params(matches)?;
    let method = params.summary_method();

    let mut ctx = ScoreContext::new();
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    writeln!(out, "region\t{}_{}", params.value_type, method)?;

    for region in &regions {
        let score = ctx
            .segment_score(&sources, region, &params)
            .with_context(|| format!("Failed to score {}", region))?;
        match score {
            Some(score) => writeln!(out, "{}\t{}", region, score)?,
            None => writeln!(out, "{}\t.", region)?,
        }
    }

    out.flush()?;
    ctx.close();
    Ok(())
}
