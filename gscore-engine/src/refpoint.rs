use std::fmt::{self, Display};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use gscore_core::models::Strand;

use crate::errors::{EngineError, Result, config_error};
use crate::series::PositionMap;

///
/// The coordinate relative positions are measured from, by its numeric code:
/// 5 for the 5' end, 3 for the 3' end and 4 for the midpoint.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum ReferencePoint {
    FivePrime,
    ThreePrime,
    Midpoint,
}

impl ReferencePoint {
    ///
    /// The genomic (or virtual) coordinate of this point on the span
    /// `[start, stop]`. For stitched features pass the practical start and
    /// stop the virtual positions were computed against.
    ///
    /// ```
    /// use gscore_core::models::Strand;
    /// use gscore_engine::refpoint::ReferencePoint;
    ///
    /// assert_eq!(ReferencePoint::FivePrime.coordinate(100, 200, Strand::Reverse), 200);
    /// assert_eq!(ReferencePoint::Midpoint.coordinate(100, 200, Strand::Reverse), 150);
    /// ```
    pub fn coordinate(self, start: i64, stop: i64, strand: Strand) -> i64 {
        match (self, strand.is_reverse()) {
            (ReferencePoint::FivePrime, false) | (ReferencePoint::ThreePrime, true) => start,
            (ReferencePoint::FivePrime, true) | (ReferencePoint::ThreePrime, false) => stop,
            // half lengths round up
            (ReferencePoint::Midpoint, _) => start + (stop - start + 1) / 2,
        }
    }
}

impl TryFrom<u8> for ReferencePoint {
    type Error = EngineError;

    fn try_from(code: u8) -> Result<Self> {
        match code {
            5 => Ok(ReferencePoint::FivePrime),
            3 => Ok(ReferencePoint::ThreePrime),
            4 => Ok(ReferencePoint::Midpoint),
            _ => Err(config_error(format!(
                "Invalid reference point {}, expected 5, 3 or 4",
                code
            ))),
        }
    }
}

impl From<ReferencePoint> for u8 {
    fn from(point: ReferencePoint) -> u8 {
        match point {
            ReferencePoint::FivePrime => 5,
            ReferencePoint::ThreePrime => 3,
            ReferencePoint::Midpoint => 4,
        }
    }
}

impl FromStr for ReferencePoint {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        let code: u8 = s
            .trim()
            .parse()
            .map_err(|_| config_error(format!("Invalid reference point {}", s)))?;
        ReferencePoint::try_from(code)
    }
}

impl Display for ReferencePoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", u8::from(*self))
    }
}

///
/// Re-key `map` as offsets from `reference`, counted downstream along
/// `strand`. Reverse-strand offsets grow towards lower genomic coordinates.
///
pub fn to_relative(map: PositionMap, reference: i64, strand: Strand) -> PositionMap {
    if strand.is_reverse() {
        map.remap(|position| reference - position)
    } else {
        map.remap(|position| position - reference)
    }
}

/// Inverse of [`to_relative`] for the same reference and strand.
pub fn to_absolute(map: PositionMap, reference: i64, strand: Strand) -> PositionMap {
    if strand.is_reverse() {
        map.remap(|offset| reference - offset)
    } else {
        map.remap(|offset| reference + offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::*;

    #[rstest]
    #[case(ReferencePoint::FivePrime, Strand::Forward, 100)]
    #[case(ReferencePoint::FivePrime, Strand::Unstranded, 100)]
    #[case(ReferencePoint::FivePrime, Strand::Reverse, 200)]
    #[case(ReferencePoint::ThreePrime, Strand::Forward, 200)]
    #[case(ReferencePoint::ThreePrime, Strand::Reverse, 100)]
    #[case(ReferencePoint::Midpoint, Strand::Forward, 150)]
    #[case(ReferencePoint::Midpoint, Strand::Reverse, 150)]
    fn test_coordinate(
        #[case] point: ReferencePoint,
        #[case] strand: Strand,
        #[case] expected: i64,
    ) {
        assert_eq!(point.coordinate(100, 200, strand), expected);
    }

    #[rstest]
    fn test_midpoint_rounds_half_up() {
        assert_eq!(ReferencePoint::Midpoint.coordinate(1, 4, Strand::Forward), 3);
        assert_eq!(ReferencePoint::Midpoint.coordinate(7, 7, Strand::Forward), 7);
    }

    #[rstest]
    #[case(0)]
    #[case(1)]
    #[case(6)]
    fn test_bad_codes(#[case] code: u8) {
        assert!(matches!(
            ReferencePoint::try_from(code),
            Err(EngineError::ConfigurationError(_))
        ));
    }

    #[rstest]
    fn test_from_str() {
        assert_eq!("3".parse::<ReferencePoint>().unwrap(), ReferencePoint::ThreePrime);
        assert!("five".parse::<ReferencePoint>().is_err());
    }

    #[rstest]
    fn test_relative_offsets() {
        let map: PositionMap = vec![(1010, 1.0)].into_iter().collect();
        let relative = to_relative(map, 1000, Strand::Forward);
        assert_eq!(relative.positions().collect::<Vec<_>>(), vec![10]);

        let map: PositionMap = vec![(990, 1.0)].into_iter().collect();
        let relative = to_relative(map, 1000, Strand::Reverse);
        assert_eq!(relative.positions().collect::<Vec<_>>(), vec![10]);
    }

    #[rstest]
    #[case(Strand::Forward)]
    #[case(Strand::Reverse)]
    fn test_round_trip(#[case] strand: Strand) {
        let map: PositionMap = vec![(950, 2.0), (1000, 1.0), (1042, 5.0)].into_iter().collect();
        let back = to_absolute(to_relative(map.clone(), 1000, strand), 1000, strand);
        assert_eq!(back, map);
    }
}
