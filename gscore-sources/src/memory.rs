use fxhash::{FxHashMap, FxHashSet};

use gscore_core::models::Alignment;

use crate::error::Result;
use crate::traits::{AlignmentIter, ScoreSource, SourceHandle, add_depth};

///
/// A score source whose alignments live in memory.
///
/// Alignments are kept sorted by position per sequence. Coverage is derived
/// from each mapped alignment's full footprint, there is no CIGAR to consult.
///
/// ```
/// use gscore_core::models::Alignment;
/// use gscore_sources::{MemorySource, ScoreSource};
///
/// let mut source = MemorySource::new("mem://sample")
///     .with_sequence("chr1", 1_000)
///     .with_alignments("chr1", vec![Alignment::new(10, 20), Alignment::new(15, 25)]);
///
/// assert_eq!(source.fetch_alignments("chr1", 0, 12).unwrap().count(), 1);
/// assert_eq!(source.coverage("chr1", 14, 17).unwrap(), vec![1, 2, 2]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    path: String,
    names: FxHashSet<String>,
    lengths: FxHashMap<String, u64>,
    alignments: FxHashMap<String, Vec<Alignment>>,
}

impl MemorySource {
    pub fn new(path: impl Into<String>) -> Self {
        MemorySource {
            path: path.into(),
            ..Default::default()
        }
    }

    /// Declare a reference sequence and its length
    pub fn with_sequence(mut self, seq_id: impl Into<String>, length: u64) -> Self {
        let seq_id = seq_id.into();
        self.lengths.insert(seq_id.clone(), length);
        self.names.insert(seq_id);
        self
    }

    pub fn with_alignments(
        mut self,
        seq_id: &str,
        alignments: impl IntoIterator<Item = Alignment>,
    ) -> Self {
        for alignment in alignments {
            self.add_alignment(seq_id, alignment);
        }
        self
    }

    ///
    /// Add one alignment. An undeclared sequence is added to the catalog with a
    /// length just long enough to hold the alignment.
    ///
    pub fn add_alignment(&mut self, seq_id: &str, alignment: Alignment) {
        if !self.names.contains(seq_id) {
            self.names.insert(seq_id.to_string());
        }
        let length = self.lengths.entry(seq_id.to_string()).or_insert(0);
        *length = (*length).max(alignment.end.max(0) as u64);

        let records = self.alignments.entry(seq_id.to_string()).or_default();
        let at = records.partition_point(|a| a.position <= alignment.position);
        records.insert(at, alignment);
    }

    fn overlapping<'a>(
        &'a self,
        seq_id: &str,
        start: u64,
        end: u64,
    ) -> impl Iterator<Item = &'a Alignment> + use<'a> {
        let start = start as i64;
        let end = end as i64;
        self.alignments
            .get(seq_id)
            .map(|records| records.as_slice())
            .unwrap_or_default()
            .iter()
            .take_while(move |a| a.position < end)
            .filter(move |a| a.end > start)
    }
}

impl ScoreSource for MemorySource {
    fn path(&self) -> &str {
        &self.path
    }

    fn chromosome_names(&self) -> &FxHashSet<String> {
        &self.names
    }

    fn target_length(&self, seq_id: &str) -> Option<u64> {
        self.lengths.get(seq_id).copied()
    }

    fn fetch_alignments(
        &mut self,
        seq_id: &str,
        start: u64,
        end: u64,
    ) -> Result<AlignmentIter<'_>> {
        if start >= end {
            return Ok(Box::new(std::iter::empty()));
        }
        Ok(Box::new(self.overlapping(seq_id, start, end).cloned().map(Ok)))
    }

    fn coverage(&mut self, seq_id: &str, start: u64, end: u64) -> Result<Vec<u32>> {
        if start >= end || !self.has_sequence(seq_id) {
            return Ok(Vec::new());
        }

        let mut depth = vec![0u32; (end - start) as usize];
        for alignment in self.overlapping(seq_id, start, end) {
            if alignment.is_unmapped {
                continue;
            }
            add_depth(
                &mut depth,
                start,
                alignment.position.max(0) as u64,
                alignment.end.max(0) as u64,
            );
        }
        Ok(depth)
    }

    fn try_clone(&self) -> Result<SourceHandle> {
        Ok(Box::new(self.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::*;

    #[fixture]
    fn source() -> MemorySource {
        MemorySource::new("mem://test")
            .with_sequence("chr1", 500)
            .with_alignments(
                "chr1",
                vec![
                    Alignment::new(100, 150),
                    Alignment::new(10, 30),
                    Alignment::new(120, 130).unmapped(),
                ],
            )
    }

    #[rstest]
    fn test_alignments_are_sorted(source: MemorySource) {
        let mut source = source;
        let positions: Vec<i64> = source
            .fetch_alignments("chr1", 0, 500)
            .unwrap()
            .map(|a| a.unwrap().position)
            .collect();
        assert_eq!(positions, vec![10, 100, 120]);
    }

    #[rstest]
    fn test_fetch_is_half_open(source: MemorySource) {
        let mut source = source;
        assert_eq!(source.fetch_alignments("chr1", 30, 100).unwrap().count(), 0);
        assert_eq!(source.fetch_alignments("chr1", 29, 101).unwrap().count(), 2);
    }

    #[rstest]
    fn test_coverage_skips_unmapped(source: MemorySource) {
        let mut source = source;
        let depth = source.coverage("chr1", 118, 122).unwrap();
        assert_eq!(depth, vec![1, 1, 1, 1]);
    }

    #[rstest]
    fn test_unknown_sequence_is_empty(source: MemorySource) {
        let mut source = source;
        assert_eq!(source.fetch_alignments("chr9", 0, 100).unwrap().count(), 0);
        assert!(source.coverage("chr9", 0, 100).unwrap().is_empty());
        assert_eq!(source.target_length("chr9"), None);
    }

    #[rstest]
    fn test_clone_is_independent(source: MemorySource) {
        let mut clone = source.try_clone().unwrap();
        assert_eq!(clone.path(), "mem://test");
        assert_eq!(clone.target_length("chr1"), Some(500));
        assert_eq!(clone.fetch_alignments("chr1", 0, 500).unwrap().count(), 3);
    }
}
