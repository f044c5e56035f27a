use log::debug;

use gscore_overlaprs::FeatureLookup;

use crate::errors::Result;
use crate::series::PositionMap;

///
/// Which positions to give up because another annotated feature claims them.
///
#[derive(Clone, Copy)]
pub struct Avoidance<'a> {
    /// The feature being profiled, never avoided
    pub feature_id: &'a str,
    /// Feature types that compete for positions; empty means every type
    pub competing_types: &'a [String],
    pub lookup: &'a dyn FeatureLookup,
}

impl<'a> Avoidance<'a> {
    pub fn new(
        feature_id: &'a str,
        competing_types: &'a [String],
        lookup: &'a dyn FeatureLookup,
    ) -> Self {
        Avoidance {
            feature_id,
            competing_types,
            lookup,
        }
    }

    /// Apply this avoidance to the positions of `map` collected over `[start, stop]`.
    pub fn apply(
        &self,
        map: &mut PositionMap,
        seq_id: &str,
        start: i64,
        stop: i64,
    ) -> Result<usize> {
        avoid(
            map,
            seq_id,
            start,
            stop,
            self.feature_id,
            self.competing_types,
            self.lookup,
        )
    }
}

///
/// Delete every position of `map` that lies inside a feature of
/// `competing_types` overlapping `[start, stop]`, other than the feature
/// `excluded_feature_id` itself. Returns how many positions were removed.
///
/// Positions are compared with genomic feature coordinates, so `map` must
/// still be keyed genomically.
///
pub fn avoid(
    map: &mut PositionMap,
    seq_id: &str,
    start: i64,
    stop: i64,
    excluded_feature_id: &str,
    competing_types: &[String],
    lookup: &dyn FeatureLookup,
) -> Result<usize> {
    if map.is_empty() {
        return Ok(0);
    }

    let competitors = lookup.features_overlapping(seq_id, start, stop, competing_types)?;
    let before = map.len();
    for feature in competitors.iter().filter(|f| f.id != excluded_feature_id) {
        map.retain(|position| !feature.contains(position));
    }

    let removed = before - map.len();
    if removed > 0 {
        debug!(
            "Avoided {} positions of {}:{}-{} claimed by other features",
            removed, seq_id, start, stop
        );
    }
    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use gscore_core::models::{Feature, Strand};
    use gscore_overlaprs::FeatureIndex;
    use pretty_assertions::assert_eq;
    use rstest::*;

    #[fixture]
    fn index() -> FeatureIndex {
        FeatureIndex::build(vec![
            Feature::new("self", "gene", "chr1", 100, 300, Strand::Forward),
            Feature::new("neighbour", "gene", "chr1", 250, 400, Strand::Reverse),
            Feature::new("repeat", "repeat", "chr1", 120, 130, Strand::Unstranded),
        ])
    }

    fn map() -> PositionMap {
        (100..=300).step_by(10).map(|p| (p, 1.0)).collect()
    }

    #[rstest]
    fn test_avoid_competing_gene(index: FeatureIndex) {
        let mut map = map();
        let competing = vec!["gene".to_string()];
        let removed = avoid(&mut map, "chr1", 100, 300, "self", &competing, &index).unwrap();

        assert_eq!(removed, 6);
        assert_eq!(map.positions().max(), Some(240));
        assert!(map.contains(120));
    }

    #[rstest]
    fn test_any_type(index: FeatureIndex) {
        let mut map = map();
        let removed = Avoidance::new("self", &[], &index)
            .apply(&mut map, "chr1", 100, 300)
            .unwrap();
        assert_eq!(removed, 8);
        assert!(!map.contains(120));
        assert!(!map.contains(130));
    }

    #[rstest]
    fn test_own_feature_is_kept(index: FeatureIndex) {
        let mut map = map();
        let competing = vec!["repeat".to_string()];
        let removed = avoid(&mut map, "chr1", 100, 300, "self", &competing, &index).unwrap();
        assert_eq!(removed, 2);
        assert_eq!(map.len(), 19);
    }
}
