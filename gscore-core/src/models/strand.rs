use std::fmt::{self, Display};
use std::str::FromStr;

use crate::errors::CoreError;

///
/// Orientation of a feature on its reference sequence: -1, 0 or 1.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Strand {
    Reverse,
    #[default]
    Unstranded,
    Forward,
}

impl Strand {
    pub fn as_i8(self) -> i8 {
        match self {
            Strand::Reverse => -1,
            Strand::Unstranded => 0,
            Strand::Forward => 1,
        }
    }

    /// True only for the minus strand. Unstranded features are laid out like
    /// forward ones everywhere in the engine.
    pub fn is_reverse(self) -> bool {
        matches!(self, Strand::Reverse)
    }
}

impl TryFrom<i8> for Strand {
    type Error = CoreError;

    fn try_from(value: i8) -> Result<Self, Self::Error> {
        match value {
            -1 => Ok(Strand::Reverse),
            0 => Ok(Strand::Unstranded),
            1 => Ok(Strand::Forward),
            other => Err(CoreError::InvalidStrand(other.to_string())),
        }
    }
}

impl FromStr for Strand {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "+" | "1" | "+1" => Ok(Strand::Forward),
            "-" | "-1" => Ok(Strand::Reverse),
            "." | "0" => Ok(Strand::Unstranded),
            other => Err(CoreError::InvalidStrand(other.to_string())),
        }
    }
}

impl Display for Strand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            Strand::Reverse => "-",
            Strand::Unstranded => ".",
            Strand::Forward => "+",
        };
        write!(f, "{}", symbol)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::*;

    #[rstest]
    #[case("+", Strand::Forward)]
    #[case("1", Strand::Forward)]
    #[case("-", Strand::Reverse)]
    #[case("-1", Strand::Reverse)]
    #[case(".", Strand::Unstranded)]
    #[case("0", Strand::Unstranded)]
    fn test_parse_strand(#[case] raw: &str, #[case] expected: Strand) {
        assert_eq!(raw.parse::<Strand>().unwrap(), expected);
    }

    #[rstest]
    fn test_strand_rejects_garbage() {
        assert!("x".parse::<Strand>().is_err());
        assert!(Strand::try_from(2).is_err());
    }

    #[rstest]
    fn test_strand_roundtrips_through_i8() {
        for strand in [Strand::Reverse, Strand::Unstranded, Strand::Forward] {
            assert_eq!(Strand::try_from(strand.as_i8()).unwrap(), strand);
        }
    }
}
