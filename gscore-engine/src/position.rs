use gscore_core::models::{Alignment, GenomicInterval};

///
/// The single position an alignment is indexed at: the midpoint of its
/// 1-based start and exclusive end, rounded down.
///
/// ```
/// use gscore_core::models::Alignment;
/// use gscore_engine::position::representative_position;
///
/// assert_eq!(representative_position(&Alignment::new(100, 200)), 150);
/// ```
#[inline]
pub fn representative_position(alignment: &Alignment) -> i64 {
    (alignment.position + 1 + alignment.end).div_euclid(2)
}

/// Whether the whole footprint of `alignment` lies inside `region`.
#[inline]
pub fn within_region(alignment: &Alignment, region: &GenomicInterval) -> bool {
    alignment.position + 1 >= region.start && alignment.end <= region.stop
}

#[cfg(test)]
mod tests {
    use super::*;
    use gscore_core::models::Strand;
    use rstest::*;

    #[rstest]
    #[case(100, 200, 150)]
    #[case(0, 1, 1)]
    #[case(9, 10, 10)]
    #[case(10, 20, 15)]
    #[case(10, 21, 16)]
    fn test_midpoint(#[case] position: i64, #[case] end: i64, #[case] expected: i64) {
        assert_eq!(representative_position(&Alignment::new(position, end)), expected);
    }

    #[rstest]
    fn test_within_region() {
        let region = GenomicInterval::new("chr1", 101, 200, Strand::Forward);
        assert!(within_region(&Alignment::new(100, 200), &region));
        assert!(!within_region(&Alignment::new(99, 150), &region));
        assert!(!within_region(&Alignment::new(150, 201), &region));
    }
}
