use std::collections::BTreeMap;

use log::debug;

use gscore_core::models::GenomicInterval;
use gscore_overlaprs::FeatureLookup;
use gscore_sources::{SourceHandle, SourceRegistry};

use crate::accumulate::NameSet;
use crate::avoid::Avoidance;
use crate::counter::{CountInput, count_alignments};
use crate::errors::{Result, config_error};
use crate::params::{CollectionParams, CountOptions, NameDedup};
use crate::refpoint::to_relative;
use crate::scanner::{scan_flat, scan_indexed};
use crate::series::{FlatSeries, PositionMap};
use crate::subfeature::{StitchLayout, map_subfeatures};

///
/// Positions to give up to competing annotation.
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvoidRequest {
    pub feature_id: String,
    pub competing_types: Vec<String>,
}

///
/// A position-indexed collection request for one feature.
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileRequest {
    /// The feature's span and strand
    pub region: GenomicInterval,
    /// Sub-intervals to stitch; empty for a contiguous feature
    pub subfeatures: Vec<GenomicInterval>,
    pub avoid: Option<AvoidRequest>,
}

impl ProfileRequest {
    pub fn new(region: GenomicInterval) -> Self {
        ProfileRequest {
            region,
            subfeatures: Vec::new(),
            avoid: None,
        }
    }

    pub fn with_subfeatures(mut self, subfeatures: Vec<GenomicInterval>) -> Self {
        self.subfeatures = subfeatures;
        self
    }

    pub fn avoiding(mut self, feature_id: impl Into<String>, competing_types: Vec<String>) -> Self {
        self.avoid = Some(AvoidRequest {
            feature_id: feature_id.into(),
            competing_types,
        });
        self
    }
}

///
/// A reduced position profile.
///
/// `practical_start` and `practical_stop` are the genomic bounds (or, for a
/// stitched feature, the virtual bounds) the positions were collected over.
/// When `relative` is set, the keys of `scores` are offsets from the
/// reference point instead.
///
#[derive(Debug, Clone, PartialEq)]
pub struct Profile {
    pub scores: BTreeMap<i64, f64>,
    pub practical_start: i64,
    pub practical_stop: i64,
    pub relative: bool,
}

///
/// Owns the open score sources and the optional annotation lookup, and runs
/// every kind of collection against them.
///
/// Sources are opened on first use and reused until [`ScoreContext::close`]
/// or drop.
///
#[derive(Default)]
pub struct ScoreContext {
    registry: SourceRegistry,
    features: Option<Box<dyn FeatureLookup>>,
}

impl ScoreContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_feature_lookup(mut self, lookup: Box<dyn FeatureLookup>) -> Self {
        self.features = Some(lookup);
        self
    }

    /// Make an already open source available under its own path.
    pub fn add_source(&mut self, handle: SourceHandle) {
        self.registry.insert(handle);
    }

    pub fn registry(&self) -> &SourceRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut SourceRegistry {
        &mut self.registry
    }

    /// Close every cached source.
    pub fn close(&mut self) {
        self.registry.close_all();
    }

    ///
    /// Every value of `params.value_type` over `region`, pooled across
    /// `sources`, positions dropped.
    ///
    pub fn segment_values<S: AsRef<str>>(
        &mut self,
        sources: &[S],
        region: &GenomicInterval,
        params: &CollectionParams,
    ) -> Result<FlatSeries> {
        params.validate()?;

        // a flat series has no positions, so names are always remembered query-wide
        let mut names = NameSet::new(NameDedup::Query);
        let mut series = FlatSeries::new();
        for path in sources {
            let handle = self.registry.open(path.as_ref())?;
            scan_flat(
                handle.as_mut(),
                region,
                params.strandedness,
                params.value_type,
                &mut names,
                &mut series,
            )?;
        }
        Ok(series)
    }

    ///
    /// One summary score for `region`, `None` when there is no data.
    ///
    pub fn segment_score<S: AsRef<str>>(
        &mut self,
        sources: &[S],
        region: &GenomicInterval,
        params: &CollectionParams,
    ) -> Result<Option<f64>> {
        let series = self.segment_values(sources, region, params)?;
        Ok(params.summary_method().summarize(series.values()))
    }

    ///
    /// Position-indexed values for one feature, unreduced.
    ///
    /// Stitches sub-features when the request has them, widens the feature
    /// by `params.extend` on both sides, drops positions claimed by competing
    /// features, and finally re-keys relative to `params.reference_point`.
    ///
    pub fn position_map<S: AsRef<str>>(
        &mut self,
        sources: &[S],
        request: &ProfileRequest,
        params: &CollectionParams,
    ) -> Result<(PositionMap, i64, i64)> {
        params.validate()?;

        let avoidance = match (&request.avoid, self.features.as_deref()) {
            (None, _) => None,
            (Some(_), None) => {
                return Err(config_error(
                    "Overlap avoidance was requested but no feature lookup is available",
                ));
            }
            (Some(avoid), Some(lookup)) => Some(Avoidance::new(
                &avoid.feature_id,
                &avoid.competing_types,
                lookup,
            )),
        };

        let strand = request.region.strand;
        let mut names = NameSet::new(params.name_dedup);
        let mut map = PositionMap::new();

        let (practical_start, practical_stop) = if request.subfeatures.is_empty() {
            let flank = params.flank();
            let region = &request.region;
            let scanned = GenomicInterval::new(
                region.seq_id.clone(),
                region.start - flank,
                region.stop + flank,
                strand,
            );
            for path in sources {
                let handle = self.registry.open(path.as_ref())?;
                scan_indexed(
                    handle.as_mut(),
                    &scanned,
                    params.strandedness,
                    params.value_type,
                    &mut names,
                    &mut map,
                )?;
            }
            if let Some(avoidance) = &avoidance {
                avoidance.apply(&mut map, &scanned.seq_id, scanned.start, scanned.stop)?;
            }
            (region.start, region.stop)
        } else {
            let layout = StitchLayout::new(&request.subfeatures, strand, params.extend)?;
            for path in sources {
                let handle = self.registry.open(path.as_ref())?;
                map_subfeatures(
                    handle.as_mut(),
                    &layout,
                    params.strandedness,
                    params.value_type,
                    &mut names,
                    avoidance.as_ref(),
                    &mut map,
                )?;
            }
            (layout.practical_start(), layout.practical_stop())
        };

        if let Some(point) = params.reference_point {
            let reference = point.coordinate(practical_start, practical_stop, strand);
            debug!(
                "Re-keying {} positions relative to {} (reference point {}, strand {})",
                map.len(),
                reference,
                point,
                strand
            );
            map = to_relative(map, reference, strand);
        }

        Ok((map, practical_start, practical_stop))
    }

    ///
    /// Position-indexed scores for one feature, one value per position.
    ///
    pub fn position_scores<S: AsRef<str>>(
        &mut self,
        sources: &[S],
        request: &ProfileRequest,
        params: &CollectionParams,
    ) -> Result<Profile> {
        let (map, practical_start, practical_stop) = self.position_map(sources, request, params)?;
        Ok(Profile {
            scores: map.reduce(),
            practical_start,
            practical_stop,
            relative: params.reference_point.is_some(),
        })
    }

    /// Count every alignment of the source at `path`, reusing its cached handle.
    pub fn count_alignments(&mut self, path: &str, options: &CountOptions) -> Result<u64> {
        let handle = self.registry.open(path)?;
        count_alignments(CountInput::Handle(handle.as_mut()), options)
    }
}
