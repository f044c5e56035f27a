use gscore_core::models::Strand;

use crate::params::StrandednessMode;

///
/// Decides whether an alignment's orientation is collected for a feature.
///
/// Unstranded features are treated as forward, so the `Sense` and
/// `Antisense` selections of any feature partition its `All` selection.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StrandPredicate {
    mode: StrandednessMode,
    feature_reverse: bool,
}

impl StrandPredicate {
    pub fn new(mode: StrandednessMode, feature_strand: Strand) -> Self {
        StrandPredicate {
            mode,
            feature_reverse: feature_strand.is_reverse(),
        }
    }

    /// A predicate that lets every orientation through
    pub fn all() -> Self {
        StrandPredicate::new(StrandednessMode::All, Strand::Unstranded)
    }

    #[inline]
    pub fn includes(&self, alignment_reverse: bool) -> bool {
        let same = alignment_reverse == self.feature_reverse;
        match self.mode {
            StrandednessMode::All => true,
            StrandednessMode::Sense => same,
            StrandednessMode::Antisense => !same,
        }
    }
}
