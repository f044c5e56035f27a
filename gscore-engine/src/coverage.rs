use log::debug;

use gscore_core::models::GenomicInterval;
use gscore_sources::ScoreSource;

use crate::errors::Result;
use crate::series::{FlatSeries, PositionMap};

///
/// Per-base depth over `region`, index 0 being the (clamped) region start.
///
/// An empty region, or one on a sequence the source does not know, has no
/// data and yields an empty vector rather than an error.
///
pub fn coverage(source: &mut dyn ScoreSource, region: &GenomicInterval) -> Result<Vec<u32>> {
    let region = region.clamped();
    if region.is_empty() {
        return Ok(Vec::new());
    }
    if !source.has_sequence(&region.seq_id) {
        debug!("{} has no sequence {}", source.path(), region.seq_id);
        return Ok(Vec::new());
    }

    let (start, end) = region.to_zero_based();
    Ok(source.coverage(&region.seq_id, start, end)?)
}

/// Append the depth of every base in `region` to `series`.
pub fn coverage_into_series(
    source: &mut dyn ScoreSource,
    region: &GenomicInterval,
    series: &mut FlatSeries,
) -> Result<()> {
    let depth = coverage(source, region)?;
    series.extend(depth.into_iter().map(f64::from));
    Ok(())
}

/// Add the depth of every base in `region` to `map`, keyed by genomic position.
pub fn coverage_into_map(
    source: &mut dyn ScoreSource,
    region: &GenomicInterval,
    map: &mut PositionMap,
) -> Result<()> {
    let origin = region.start.max(1);
    let depth = coverage(source, region)?;
    for (offset, value) in depth.into_iter().enumerate() {
        map.add(origin + offset as i64, f64::from(value));
    }
    Ok(())
}
