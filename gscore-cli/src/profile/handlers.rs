use std::io::{self, BufWriter, Write};

use anyhow::{Context, Result};
use clap::ArgMatches;
use log::info;

use gscore_core::utils::{parse_region, parse_region_list};
use gscore_engine::{ProfileRequest, ScoreContext};

use crate::config::collection_params;

pub fn run_profile(matches: &ArgMatches) -> Result<()> {
    let sources: Vec<String> = matches
        .get_many::<String>("sources")
        .context("At least one source is required.")?
        .cloned()
        .collect();
    let raw_region = matches
        .get_one::<String>("region")
        .context("A --region is required.")?;
    let region = parse_region(raw_region).with_context(|| format!("Bad region: {}", raw_region))?;

    let mut request = ProfileRequest::new(region.clone());
    if let Some(raw) = matches.get_one::<String>("subfeatures") {
        let subfeatures = parse_region_list(raw, region.strand)
            .with_context(|| format!("Bad sub-feature list: {}", raw))?;
        info!("Stitching {} sub-features of {}", subfeatures.len(), region);
        request = request.with_subfeatures(subfeatures);
    }
    let params = collection_params(matches)?;

    let mut ctx = ScoreContext::new();
    let profile = ctx
        .position_scores(&sources, &request, &params)
        .with_context(|| format!("Failed to profile {}", region))?;
    ctx.close();

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    writeln!(
        out,
        "# {} practical_start={} practical_stop={} relative={}",
        region, profile.practical_start, profile.practical_stop, profile.relative
    )?;
    writeln!(out, "position\t{}", params.value_type)?;
    for (position, value) in &profile.scores {
        writeln!(out, "{}\t{}", position, value)?;
    }
    out.flush()?;

    Ok(())
}
