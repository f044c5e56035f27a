use fxhash::FxHashMap;

use gscore_core::models::Feature;

use crate::traits::{FeatureLookup, LookupError};

///
/// Sorted features of one reference sequence.
///
/// From the journal article: <https://academic.oup.com/bioinformatics/article/29/1/1/273289>
///
/// Features are kept sorted by `(start, end)` together with the length of the
/// longest one. Any feature overlapping a query must start no earlier than
/// `query.start - max_len`, which gives a binary-searchable lower bound.
///
#[derive(Debug, Clone, Default)]
struct SequenceBits {
    features: Vec<Feature>,
    max_len: i64,
}

impl SequenceBits {
    fn build(mut features: Vec<Feature>) -> Self {
        features.sort_by(|a, b| a.start.cmp(&b.start).then(a.end.cmp(&b.end)));
        let max_len = features
            .iter()
            .map(|f| f.end - f.start)
            .max()
            .unwrap_or(0);

        SequenceBits { features, max_len }
    }

    /// Determine the first index that we should start checking for overlaps for
    #[inline]
    fn lower_bound(&self, start: i64) -> usize {
        let floor = start - self.max_len;
        self.features.partition_point(|f| f.start < floor)
    }

    fn find_iter(&self, start: i64, stop: i64) -> impl Iterator<Item = &Feature> {
        self.features[self.lower_bound(start)..]
            .iter()
            .take_while(move |f| f.start <= stop)
            .filter(move |f| f.end >= start)
    }
}

///
/// An in-memory genome-wide feature index.
///
/// Keeps one sorted feature list per reference sequence and answers
/// [`FeatureLookup`] queries with a binary search followed by a short scan.
///
/// # Examples
///
/// ```
/// use gscore_core::models::{Feature, Strand};
/// use gscore_overlaprs::FeatureIndex;
///
/// let index = FeatureIndex::build(vec![
///     Feature::new("g1", "gene", "chr2", 10, 20, Strand::Forward),
/// ]);
///
/// assert_eq!(index.len(), 1);
/// assert_eq!(index.find("chr2", 20, 30).len(), 1);
/// assert!(index.find("chr2", 21, 30).is_empty());
/// ```
#[derive(Debug, Clone, Default)]
pub struct FeatureIndex {
    index_maps: FxHashMap<String, SequenceBits>,
}

impl FeatureIndex {
    pub fn build(features: Vec<Feature>) -> Self {
        let mut grouped: FxHashMap<String, Vec<Feature>> = FxHashMap::default();
        for feature in features.into_iter() {
            grouped
                .entry(feature.seq_id.clone())
                .or_default()
                .push(feature);
        }

        let index_maps = grouped
            .into_iter()
            .map(|(seq_id, features)| (seq_id, SequenceBits::build(features)))
            .collect();

        FeatureIndex { index_maps }
    }

    /// Total number of indexed features
    pub fn len(&self) -> usize {
        self.index_maps.values().map(|b| b.features.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    ///
    /// All features of any type overlapping `start..=stop` on `seq_id`
    ///
    pub fn find(&self, seq_id: &str, start: i64, stop: i64) -> Vec<&Feature> {
        match self.index_maps.get(seq_id) {
            Some(bits) => bits.find_iter(start, stop).collect(),
            None => Vec::new(),
        }
    }
}

impl FeatureLookup for FeatureIndex {
    fn features_overlapping(
        &self,
        seq_id: &str,
        start: i64,
        end: i64,
        types: &[String],
    ) -> Result<Vec<Feature>, LookupError> {
        let hits = self
            .find(seq_id, start, end)
            .into_iter()
            .filter(|f| types.is_empty() || types.iter().any(|t| *t == f.feature_type))
            .cloned()
            .collect();

        Ok(hits)
    }
}
