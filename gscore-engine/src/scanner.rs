//!
//! One scanning loop for every combination of strandedness, value type and
//! output shape. The loop itself only walks alignments; which ones are kept
//! is decided by a [`ScanFilter`] and what is recorded by an [`Accumulator`].
//!
use log::debug;

use gscore_core::models::{Alignment, GenomicInterval};
use gscore_sources::ScoreSource;

use crate::accumulate::{Accumulator, FlatAccumulator, IndexedAccumulator, NameSet, Tally};
use crate::coverage::{coverage_into_map, coverage_into_series};
use crate::errors::Result;
use crate::params::{StrandednessMode, ValueType};
use crate::position::{representative_position, within_region};
use crate::series::{FlatSeries, PositionMap};
use crate::strand::StrandPredicate;

///
/// Inclusion rule for alignments met during a scan.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanFilter {
    strand: StrandPredicate,
    whole_footprint: bool,
}

impl ScanFilter {
    pub fn new(predicate: StrandPredicate) -> Self {
        ScanFilter {
            strand: predicate,
            whole_footprint: false,
        }
    }

    /// Only keep alignments lying entirely inside the scanned region
    pub fn whole_footprint(mut self) -> Self {
        self.whole_footprint = true;
        self
    }

    /// The rule a value type implies for a feature on `region.strand`.
    pub fn for_value_type(
        strandedness: StrandednessMode,
        value_type: ValueType,
        region: &GenomicInterval,
    ) -> Self {
        let filter = ScanFilter::new(StrandPredicate::new(strandedness, region.strand));
        if value_type == ValueType::PreciseCount {
            filter.whole_footprint()
        } else {
            filter
        }
    }

    #[inline]
    fn admits(&self, alignment: &Alignment, region: &GenomicInterval) -> bool {
        !alignment.is_unmapped
            && self.strand.includes(alignment.is_reverse)
            && (!self.whole_footprint || within_region(alignment, region))
    }
}

///
/// Walk the alignments overlapping `region` and hand every admitted one,
/// with its midpoint, to `accumulator`. Alignments whose midpoint falls
/// outside the region are skipped.
///
pub fn scan<A: Accumulator>(
    source: &mut dyn ScoreSource,
    region: &GenomicInterval,
    filter: &ScanFilter,
    accumulator: &mut A,
) -> Result<()> {
    let region = region.clamped();
    if region.is_empty() {
        return Ok(());
    }
    if !source.has_sequence(&region.seq_id) {
        debug!("{} has no sequence {}", source.path(), region.seq_id);
        return Ok(());
    }

    let (start, end) = region.to_zero_based();
    for alignment in source.fetch_alignments(&region.seq_id, start, end)? {
        let alignment = alignment?;
        if !filter.admits(&alignment, &region) {
            continue;
        }

        let position = representative_position(&alignment);
        if region.contains(position) {
            accumulator.accumulate(position, &alignment);
        }
    }

    Ok(())
}

///
/// Collect `value_type` over `region` into a flat series.
///
/// `names` carries the read names already counted by this query; it is only
/// consulted for [`ValueType::NameCount`].
///
pub fn scan_flat(
    source: &mut dyn ScoreSource,
    region: &GenomicInterval,
    strandedness: StrandednessMode,
    value_type: ValueType,
    names: &mut NameSet,
    series: &mut FlatSeries,
) -> Result<()> {
    if value_type == ValueType::Coverage {
        return coverage_into_series(source, region, series);
    }

    let filter = ScanFilter::for_value_type(strandedness, value_type, region);
    let mut accumulator = FlatAccumulator::new(Tally::from(value_type), series);
    if value_type == ValueType::NameCount {
        accumulator = accumulator.dedup_names(names);
    }
    scan(source, region, &filter, &mut accumulator)
}

///
/// Collect `value_type` over `region` into a position-indexed map, adding to
/// whatever `map` already holds.
///
/// ```
/// use gscore_core::models::{Alignment, GenomicInterval, Strand};
/// use gscore_engine::accumulate::NameSet;
/// use gscore_engine::params::{NameDedup, StrandednessMode, ValueType};
/// use gscore_engine::scanner::scan_indexed;
/// use gscore_engine::PositionMap;
/// use gscore_sources::MemorySource;
///
/// let mut source = MemorySource::new("mem://doc")
///     .with_alignments(
///         "chr1",
///         vec![Alignment::new(100, 200), Alignment::new(120, 140).reverse()],
///     );
/// let region = GenomicInterval::new("chr1", 101, 200, Strand::Forward);
///
/// let mut names = NameSet::new(NameDedup::Query);
/// let mut map = PositionMap::new();
/// let sense = StrandednessMode::Sense;
/// scan_indexed(&mut source, &region, sense, ValueType::Count, &mut names, &mut map).unwrap();
/// assert_eq!(map.value(150), Some(1.0));
/// assert_eq!(map.len(), 1);
/// ```
pub fn scan_indexed(
    source: &mut dyn ScoreSource,
    region: &GenomicInterval,
    strandedness: StrandednessMode,
    value_type: ValueType,
    names: &mut NameSet,
    map: &mut PositionMap,
) -> Result<()> {
    if value_type == ValueType::Coverage {
        return coverage_into_map(source, region, map);
    }

    let filter = ScanFilter::for_value_type(strandedness, value_type, region);
    let mut accumulator = IndexedAccumulator::new(Tally::from(value_type), map);
    if value_type == ValueType::NameCount {
        accumulator = accumulator.dedup_names(names);
    }
    scan(source, region, &filter, &mut accumulator)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::NameDedup;
    use gscore_core::models::Strand;
    use gscore_sources::MemorySource;
    use pretty_assertions::assert_eq;
    use rstest::*;

    #[fixture]
    fn source() -> MemorySource {
        MemorySource::new("mem://scan")
            .with_sequence("chr1", 10_000)
            .with_alignments(
                "chr1",
                vec![
                    // midpoints 150, 150, 160, 95, 205
                    Alignment::new(100, 200).named("a"),
                    Alignment::new(120, 180).reverse().named("b"),
                    Alignment::new(150, 170).named("a"),
                    Alignment::new(80, 110).reverse().named("c"),
                    Alignment::new(190, 220).named("d"),
                    Alignment::new(140, 160).unmapped(),
                ],
            )
    }

    fn region(strand: Strand) -> GenomicInterval {
        GenomicInterval::new("chr1", 101, 200, strand)
    }

    fn flat(
        source: &mut dyn ScoreSource,
        region: &GenomicInterval,
        strandedness: StrandednessMode,
        value_type: ValueType,
    ) -> FlatSeries {
        let mut names = NameSet::new(NameDedup::Query);
        let mut series = FlatSeries::new();
        scan_flat(source, region, strandedness, value_type, &mut names, &mut series).unwrap();
        series
    }

    fn indexed(
        source: &mut dyn ScoreSource,
        region: &GenomicInterval,
        strandedness: StrandednessMode,
        value_type: ValueType,
    ) -> PositionMap {
        let mut names = NameSet::new(NameDedup::Query);
        let mut map = PositionMap::new();
        scan_indexed(source, region, strandedness, value_type, &mut names, &mut map).unwrap();
        map
    }

    fn flat_count(
        source: &mut MemorySource,
        strandedness: StrandednessMode,
        value_type: ValueType,
        strand: Strand,
    ) -> usize {
        flat(source, &region(strand), strandedness, value_type).len()
    }

    #[rstest]
    fn test_count_uses_midpoints(source: MemorySource) {
        let mut source = source;
        let map = indexed(
            &mut source,
            &region(Strand::Forward),
            StrandednessMode::All,
            ValueType::Count,
        );

        assert_eq!(
            map.reduce().into_iter().collect::<Vec<_>>(),
            vec![(150, 2.0), (160, 1.0)]
        );
    }

    #[rstest]
    #[case(Strand::Forward)]
    #[case(Strand::Reverse)]
    #[case(Strand::Unstranded)]
    fn test_sense_antisense_partition_all(source: MemorySource, #[case] strand: Strand) {
        let mut source = source;
        let all = flat_count(&mut source, StrandednessMode::All, ValueType::Count, strand);
        let sense = flat_count(&mut source, StrandednessMode::Sense, ValueType::Count, strand);
        let antisense =
            flat_count(&mut source, StrandednessMode::Antisense, ValueType::Count, strand);
        assert_eq!(all, 3);
        assert_eq!(sense + antisense, all);
    }

    #[rstest]
    fn test_sense_on_reverse_feature(source: MemorySource) {
        let mut source = source;
        let sense = flat_count(
            &mut source,
            StrandednessMode::Sense,
            ValueType::Count,
            Strand::Reverse,
        );
        assert_eq!(sense, 1);
    }

    #[rstest]
    fn test_lengths(source: MemorySource) {
        let mut source = source;
        let series = flat(
            &mut source,
            &region(Strand::Forward),
            StrandednessMode::All,
            ValueType::Length,
        );
        let mut values = series.values().to_vec();
        values.sort_by(f64::total_cmp);
        assert_eq!(values, vec![20.0, 60.0, 100.0]);

        let map = indexed(
            &mut source,
            &region(Strand::Forward),
            StrandednessMode::All,
            ValueType::Length,
        );
        assert_eq!(map.value(150), Some(80.0));
    }

    #[rstest]
    fn test_name_count(source: MemorySource) {
        let mut source = source;
        let ncount = flat_count(
            &mut source,
            StrandednessMode::All,
            ValueType::NameCount,
            Strand::Forward,
        );
        assert_eq!(ncount, 2);
    }

    #[rstest]
    fn test_precise_count(source: MemorySource) {
        let mut source = source;
        let region = GenomicInterval::new("chr1", 121, 200, Strand::Forward);
        let map = indexed(
            &mut source,
            &region,
            StrandednessMode::All,
            ValueType::PreciseCount,
        );
        // [100, 200) starts before the region
        assert_eq!(
            map.reduce().into_iter().collect::<Vec<_>>(),
            vec![(150, 1.0), (160, 1.0)]
        );
    }

    #[rstest]
    fn test_unknown_sequence_is_empty(source: MemorySource) {
        let mut source = source;
        let region = GenomicInterval::new("chrM", 1, 500, Strand::Forward);
        let map = indexed(&mut source, &region, StrandednessMode::All, ValueType::Count);
        assert!(map.is_empty());
    }

    #[rstest]
    fn test_scans_add_into_one_map(source: MemorySource) {
        let mut source = source;
        let mut other = MemorySource::new("mem://other")
            .with_alignments("chr1", vec![Alignment::new(100, 200).reverse().named("z")]);
        let region = region(Strand::Forward);

        let mut names = NameSet::new(NameDedup::Query);
        let mut map = PositionMap::new();
        for scanned in [&mut source as &mut dyn ScoreSource, &mut other] {
            scan_indexed(
                scanned,
                &region,
                StrandednessMode::All,
                ValueType::Count,
                &mut names,
                &mut map,
            )
            .unwrap();
        }
        assert_eq!(map.value(150), Some(3.0));
    }

    #[rstest]
    fn test_coverage_ignores_strand(source: MemorySource) {
        let mut source = source;
        let sense = flat(
            &mut source,
            &region(Strand::Forward),
            StrandednessMode::Sense,
            ValueType::Coverage,
        );
        let all = flat(
            &mut source,
            &region(Strand::Forward),
            StrandednessMode::All,
            ValueType::Coverage,
        );
        assert_eq!(sense, all);
        assert_eq!(all.len(), 100);
    }
}
