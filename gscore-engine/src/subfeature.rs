//!
//! Stitching of discontiguous sub-intervals (exons, say) into one contiguous
//! virtual coordinate axis.
//!
//! Sub-intervals are laid end to end in increasing genomic order whatever the
//! feature strand. A genomic position inside a sub-interval maps to virtual
//! position `position - adjustment`, where the adjustment of each
//! sub-interval is the total gap skipped before it.
//!
use gscore_core::models::{GenomicInterval, Strand};
use gscore_sources::ScoreSource;

use crate::accumulate::NameSet;
use crate::avoid::Avoidance;
use crate::errors::{Result, config_error};
use crate::params::{StrandednessMode, ValueType};
use crate::scanner::scan_indexed;
use crate::series::PositionMap;

/// One scanned stretch and the shift applied to its positions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub interval: GenomicInterval,
    pub adjustment: i64,
}

///
/// Where each sub-interval lands on the virtual axis.
///
/// ```
/// use gscore_core::models::{GenomicInterval, Strand};
/// use gscore_engine::subfeature::StitchLayout;
///
/// let exons = vec![
///     GenomicInterval::new("chr1", 100, 150, Strand::Forward),
///     GenomicInterval::new("chr1", 300, 350, Strand::Forward),
/// ];
/// let layout = StitchLayout::new(&exons, Strand::Forward, None).unwrap();
///
/// assert_eq!(layout.virtual_position(320), Some(171));
/// assert_eq!((layout.practical_start(), layout.practical_stop()), (100, 201));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StitchLayout {
    segments: Vec<Segment>,
    flanks: Vec<Segment>,
    practical_start: i64,
    practical_stop: i64,
    strand: Strand,
}

impl StitchLayout {
    ///
    /// Lay out `subintervals` (any order, one sequence) for a feature on
    /// `strand`, optionally with `extend` bases of flank on both sides.
    ///
    pub fn new(
        subintervals: &[GenomicInterval],
        strand: Strand,
        extend: Option<i64>,
    ) -> Result<Self> {
        let Some(first) = subintervals.first() else {
            return Err(config_error("A stitched feature needs at least one sub-interval"));
        };
        if let Some(stray) = subintervals.iter().find(|s| s.seq_id != first.seq_id) {
            return Err(config_error(format!(
                "Sub-intervals span {} and {}, they must share one sequence",
                first.seq_id, stray.seq_id
            )));
        }
        let extend = extend.unwrap_or(0);
        if extend < 0 {
            return Err(config_error(format!(
                "Extension length must not be negative, got {}",
                extend
            )));
        }

        let mut sorted: Vec<GenomicInterval> = subintervals.to_vec();
        sorted.sort_by_key(|s| (s.start, s.stop));

        let practical_start = sorted[0].start;
        let mut running_end = practical_start;
        let mut segments = Vec::with_capacity(sorted.len());
        for mut interval in sorted {
            interval.strand = strand;
            let adjustment = interval.start - running_end;
            running_end += interval.len();
            segments.push(Segment { interval, adjustment });
        }
        let practical_stop = running_end - 1;

        let mut flanks = Vec::new();
        if extend > 0 {
            let seq_id = &first.seq_id;
            let head = &segments[0];
            let tail = &segments[segments.len() - 1];
            flanks.push(Segment {
                interval: GenomicInterval::new(
                    seq_id.clone(),
                    head.interval.start - extend,
                    head.interval.start - 1,
                    strand,
                ),
                adjustment: 0,
            });
            flanks.push(Segment {
                interval: GenomicInterval::new(
                    seq_id.clone(),
                    tail.interval.stop + 1,
                    tail.interval.stop + extend,
                    strand,
                ),
                adjustment: tail.adjustment,
            });
        }

        Ok(StitchLayout {
            segments,
            flanks,
            practical_start,
            practical_stop,
            strand,
        })
    }

    /// First base of the virtual axis, the start of the first sub-interval
    pub fn practical_start(&self) -> i64 {
        self.practical_start
    }

    /// Last base of the virtual axis
    pub fn practical_stop(&self) -> i64 {
        self.practical_stop
    }

    pub fn strand(&self) -> Strand {
        self.strand
    }

    /// Sub-intervals in stitching order
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Left then right flank, empty without an extension
    pub fn flanks(&self) -> &[Segment] {
        &self.flanks
    }

    /// Every stretch that gets scanned: sub-intervals, then flanks
    pub fn scanned(&self) -> impl Iterator<Item = &Segment> {
        self.segments.iter().chain(self.flanks.iter())
    }

    ///
    /// The virtual position of a genomic `position`, if some scanned stretch
    /// holds it.
    ///
    pub fn virtual_position(&self, position: i64) -> Option<i64> {
        self.scanned()
            .find(|segment| segment.interval.contains(position))
            .map(|segment| position - segment.adjustment)
    }
}

///
/// Scan every stretch of `layout` and add the results, shifted onto the
/// virtual axis, into `into`.
///
/// `names` is shared by every stretch, so with [`ValueType::NameCount`] a read
/// counted in one sub-interval is not counted again in a later one. When an
/// avoidance is given it is applied to each stretch on genomic positions,
/// before shifting.
///
pub fn map_subfeatures(
    source: &mut dyn ScoreSource,
    layout: &StitchLayout,
    strandedness: StrandednessMode,
    value_type: ValueType,
    names: &mut NameSet,
    avoidance: Option<&Avoidance<'_>>,
    into: &mut PositionMap,
) -> Result<()> {
    for segment in layout.scanned() {
        let interval = &segment.interval;
        let mut raw = PositionMap::new();
        scan_indexed(source, interval, strandedness, value_type, names, &mut raw)?;

        if let Some(avoidance) = avoidance {
            avoidance.apply(&mut raw, &interval.seq_id, interval.start, interval.stop)?;
        }

        into.merge(raw.shifted(-segment.adjustment));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::EngineError;
    use crate::params::NameDedup;
    use gscore_core::models::{Alignment, Feature};
    use gscore_overlaprs::FeatureIndex;
    use gscore_sources::MemorySource;
    use pretty_assertions::assert_eq;
    use rstest::*;

    fn exons() -> Vec<GenomicInterval> {
        vec![
            GenomicInterval::new("chr1", 300, 350, Strand::Unstranded),
            GenomicInterval::new("chr1", 100, 150, Strand::Unstranded),
        ]
    }

    #[fixture]
    fn source() -> MemorySource {
        MemorySource::new("mem://spliced")
            .with_sequence("chr1", 1_000)
            .with_alignments(
                "chr1",
                vec![
                    // midpoint 320 in the second exon
                    Alignment::new(314, 326).named("r1"),
                    // midpoint 120 in the first exon, same read name
                    Alignment::new(114, 126).named("r1"),
                    // midpoint 200 in the intron
                    Alignment::new(190, 210).named("r2"),
                    // midpoint 360, only in the right flank
                    Alignment::new(354, 366).named("r3"),
                    // midpoint 95, only in the left flank
                    Alignment::new(89, 101).named("r4"),
                ],
            )
    }

    #[rstest]
    fn test_layout_adjustments() {
        let layout = StitchLayout::new(&exons(), Strand::Reverse, None).unwrap();
        let adjustments: Vec<i64> = layout.segments().iter().map(|s| s.adjustment).collect();
        assert_eq!(adjustments, vec![0, 149]);
        assert_eq!(layout.practical_stop(), 201);
        assert!(layout.segments().iter().all(|s| s.interval.strand == Strand::Reverse));
        assert_eq!(layout.virtual_position(320), Some(171));
        assert_eq!(layout.virtual_position(200), None);
    }

    #[rstest]
    fn test_flanks_reuse_boundary_adjustments() {
        let layout = StitchLayout::new(&exons(), Strand::Forward, Some(10)).unwrap();
        let flanks: Vec<(i64, i64, i64)> = layout
            .flanks()
            .iter()
            .map(|s| (s.interval.start, s.interval.stop, s.adjustment))
            .collect();
        assert_eq!(flanks, vec![(90, 99, 0), (351, 360, 149)]);
        // flanks do not move the practical bounds
        assert_eq!((layout.practical_start(), layout.practical_stop()), (100, 201));
    }

    #[rstest]
    fn test_layout_errors() {
        assert!(matches!(
            StitchLayout::new(&[], Strand::Forward, None),
            Err(EngineError::ConfigurationError(_))
        ));

        let mixed = vec![
            GenomicInterval::new("chr1", 1, 10, Strand::Forward),
            GenomicInterval::new("chr2", 20, 30, Strand::Forward),
        ];
        assert!(StitchLayout::new(&mixed, Strand::Forward, None).is_err());
        assert!(StitchLayout::new(&exons(), Strand::Forward, Some(-1)).is_err());
    }

    #[rstest]
    fn test_map_counts_onto_virtual_axis(source: MemorySource) {
        let mut source = source;
        let layout = StitchLayout::new(&exons(), Strand::Forward, Some(10)).unwrap();
        let mut names = NameSet::new(NameDedup::Query);
        let mut map = PositionMap::new();
        map_subfeatures(
            &mut source,
            &layout,
            StrandednessMode::All,
            ValueType::Count,
            &mut names,
            None,
            &mut map,
        )
        .unwrap();

        assert_eq!(
            map.reduce().into_iter().collect::<Vec<_>>(),
            vec![(95, 1.0), (120, 1.0), (171, 1.0), (211, 1.0)]
        );
    }

    #[rstest]
    fn test_name_count_is_global_across_subintervals(source: MemorySource) {
        let mut source = source;
        let layout = StitchLayout::new(&exons(), Strand::Forward, None).unwrap();
        let mut names = NameSet::new(NameDedup::Query);
        let mut map = PositionMap::new();
        map_subfeatures(
            &mut source,
            &layout,
            StrandednessMode::All,
            ValueType::NameCount,
            &mut names,
            None,
            &mut map,
        )
        .unwrap();

        // r1 was counted in the first exon and is not counted again at 171
        assert_eq!(map.reduce().into_iter().collect::<Vec<_>>(), vec![(120, 1.0)]);
    }

    #[rstest]
    fn test_avoidance_uses_genomic_positions(source: MemorySource) {
        let mut source = source;
        let index = FeatureIndex::build(vec![
            Feature::new("tx1", "gene", "chr1", 100, 350, Strand::Forward),
            Feature::new("other", "gene", "chr1", 310, 330, Strand::Reverse),
        ]);
        let types = vec!["gene".to_string()];
        let avoidance = Avoidance::new("tx1", &types, &index);

        let layout = StitchLayout::new(&exons(), Strand::Forward, None).unwrap();
        let mut names = NameSet::new(NameDedup::Query);
        let mut map = PositionMap::new();
        map_subfeatures(
            &mut source,
            &layout,
            StrandednessMode::All,
            ValueType::Count,
            &mut names,
            Some(&avoidance),
            &mut map,
        )
        .unwrap();

        assert_eq!(map.reduce().into_iter().collect::<Vec<_>>(), vec![(120, 1.0)]);
    }
}
