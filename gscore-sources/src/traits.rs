use fxhash::FxHashSet;

use gscore_core::models::Alignment;

use crate::error::Result;

/// Lazily produced alignments of one query. Restartable by querying again.
pub type AlignmentIter<'a> = Box<dyn Iterator<Item = Result<Alignment>> + 'a>;

/// An open, owned score source.
pub type SourceHandle = Box<dyn ScoreSource>;

///
/// The capability every scoring operation is built on.
///
/// A handle is not shared between threads. Parallel work calls
/// [`ScoreSource::try_clone`] once per worker and moves the clone over.
///
/// Queries for a sequence that is not in [`ScoreSource::chromosome_names`]
/// return empty results, never errors.
///
pub trait ScoreSource: Send {
    /// The path or URI this handle was opened from; used as its cache key.
    fn path(&self) -> &str;

    /// Names of every reference sequence known to the source.
    fn chromosome_names(&self) -> &FxHashSet<String>;

    /// Length of a reference sequence, `None` if the source does not know it.
    fn target_length(&self, seq_id: &str) -> Option<u64>;

    /// Alignments overlapping the 0-based half-open window `[start, end)`.
    fn fetch_alignments(&mut self, seq_id: &str, start: u64, end: u64)
    -> Result<AlignmentIter<'_>>;

    /// Per-base depth over `[start, end)`; index 0 is position `start`.
    fn coverage(&mut self, seq_id: &str, start: u64, end: u64) -> Result<Vec<u32>>;

    /// An independent handle on the same data, safe to move to another worker.
    fn try_clone(&self) -> Result<SourceHandle>;

    fn has_sequence(&self, seq_id: &str) -> bool {
        self.chromosome_names().contains(seq_id)
    }
}

///
/// Add one to every slot of `depth` covered by the half-open span
/// `[span_start, span_end)`. `depth[0]` corresponds to `window_start`.
///
pub(crate) fn add_depth(depth: &mut [u32], window_start: u64, span_start: u64, span_end: u64) {
    let window_end = window_start + depth.len() as u64;
    let from = span_start.max(window_start);
    let to = span_end.min(window_end);
    if from >= to {
        return;
    }

    for slot in &mut depth[(from - window_start) as usize..(to - window_start) as usize] {
        *slot += 1;
    }
}
