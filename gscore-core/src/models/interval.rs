use std::fmt::{self, Display};

use super::strand::Strand;

///
/// A 1-based, inclusive region on a named reference sequence.
///
/// `start <= stop` for any interval built from an annotation. Intervals that
/// are derived by arithmetic (flanks, clamping) may end up empty, which every
/// consumer treats as "no data".
///
#[derive(Eq, PartialEq, Hash, Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GenomicInterval {
    pub seq_id: String,
    pub start: i64,
    pub stop: i64,
    pub strand: Strand,
}

impl GenomicInterval {
    pub fn new(seq_id: impl Into<String>, start: i64, stop: i64, strand: Strand) -> Self {
        GenomicInterval {
            seq_id: seq_id.into(),
            start,
            stop,
            strand,
        }
    }

    ///
    /// Number of bases covered, zero for an empty interval
    ///
    pub fn len(&self) -> i64 {
        (self.stop - self.start + 1).max(0)
    }

    pub fn is_empty(&self) -> bool {
        self.stop < self.start
    }

    ///
    /// Copy of this interval with `start` raised to 1. `stop` is left alone,
    /// so an interval lying entirely before the sequence becomes empty.
    ///
    pub fn clamped(&self) -> GenomicInterval {
        GenomicInterval {
            seq_id: self.seq_id.clone(),
            start: self.start.max(1),
            stop: self.stop,
            strand: self.strand,
        }
    }

    #[inline]
    pub fn contains(&self, position: i64) -> bool {
        position >= self.start && position <= self.stop
    }

    ///
    /// The same bases as a 0-based, half-open `(start, end)` pair, which is
    /// how score sources are queried.
    ///
    pub fn to_zero_based(&self) -> (u64, u64) {
        let start = (self.start - 1).max(0) as u64;
        let end = self.stop.max(0) as u64;
        (start, end)
    }
}

impl Display for GenomicInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}-{}", self.seq_id, self.start, self.stop)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::*;

    #[rstest]
    fn test_len_and_empty() {
        let region = GenomicInterval::new("chr1", 100, 150, Strand::Forward);
        assert_eq!(region.len(), 51);
        assert!(!region.is_empty());

        let empty = GenomicInterval::new("chr1", 10, 9, Strand::Forward);
        assert_eq!(empty.len(), 0);
        assert!(empty.is_empty());
    }

    #[rstest]
    #[case(-20, 50, 1, 50)]
    #[case(0, 0, 1, 0)]
    #[case(5, 10, 5, 10)]
    fn test_clamped(#[case] start: i64, #[case] stop: i64, #[case] cs: i64, #[case] ce: i64) {
        let clamped = GenomicInterval::new("chr1", start, stop, Strand::Unstranded).clamped();
        assert_eq!((clamped.start, clamped.stop), (cs, ce));
    }

    #[rstest]
    fn test_zero_based() {
        let region = GenomicInterval::new("chr1", 101, 200, Strand::Forward);
        assert_eq!(region.to_zero_based(), (100, 200));
    }
}
