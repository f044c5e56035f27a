use crate::errors::{CoreError, Result};
use crate::models::{GenomicInterval, Strand};

///
/// Parse a region string of the form `seq:start-stop` or `seq:start-stop:strand`.
///
/// Thousands separators in the coordinates are ignored, so `chr1:1,000-2,000`
/// is accepted. Sequence names may themselves contain `:`.
///
pub fn parse_region(raw: &str) -> Result<GenomicInterval> {
    let raw = raw.trim();

    // a trailing strand is only recognized when a `seq:range` part remains in front of it
    let (rest, strand) = match raw.rsplit_once(':') {
        Some((head, tail)) if head.contains(':') && tail.parse::<Strand>().is_ok() => {
            (head, tail.parse::<Strand>()?)
        }
        _ => (raw, Strand::Unstranded),
    };

    let (seq_id, range) = rest
        .rsplit_once(':')
        .ok_or_else(|| CoreError::RegionParseError(raw.to_string()))?;
    let (start, stop) = range
        .split_once('-')
        .ok_or_else(|| CoreError::RegionParseError(raw.to_string()))?;

    if seq_id.is_empty() {
        return Err(CoreError::RegionParseError(raw.to_string()));
    }

    let start = parse_coordinate(start, raw)?;
    let stop = parse_coordinate(stop, raw)?;
    if start > stop {
        return Err(CoreError::RegionParseError(format!(
            "start is after stop in {}",
            raw
        )));
    }

    Ok(GenomicInterval::new(seq_id, start, stop, strand))
}

///
/// Parse a list of regions separated by `;` or whitespace. The strand of
/// every region is overwritten with `strand`.
///
pub fn parse_region_list(raw: &str, strand: Strand) -> Result<Vec<GenomicInterval>> {
    raw.split(|c: char| c == ';' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .map(|s| {
            parse_region(s).map(|mut region| {
                region.strand = strand;
                region
            })
        })
        .collect()
}

fn parse_coordinate(raw: &str, context: &str) -> Result<i64> {
    raw.replace(',', "")
        .parse::<i64>()
        .map_err(|_| CoreError::RegionParseError(context.to_string()))
}
