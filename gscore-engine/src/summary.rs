use std::fmt::{self, Display};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::{EngineError, Result, config_error};

///
/// Statistic used to collapse a flat series into one score.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SummaryMethod {
    Mean,
    Median,
    Sum,
    Min,
    Max,
    Range,
    Stddev,
    Count,
}

impl SummaryMethod {
    ///
    /// Apply the statistic. An empty series has no score.
    ///
    /// ```
    /// use gscore_engine::summary::SummaryMethod;
    ///
    /// assert_eq!(SummaryMethod::Median.summarize(&[4.0, 1.0, 3.0, 2.0]), Some(2.5));
    /// assert_eq!(SummaryMethod::Mean.summarize(&[]), None);
    /// ```
    pub fn summarize(self, values: &[f64]) -> Option<f64> {
        if values.is_empty() {
            return None;
        }
        let n = values.len() as f64;

        let score = match self {
            SummaryMethod::Mean => values.iter().sum::<f64>() / n,
            SummaryMethod::Median => {
                let mut sorted = values.to_vec();
                sorted.sort_by(f64::total_cmp);
                let mid = sorted.len() / 2;
                if sorted.len() % 2 == 0 {
                    (sorted[mid - 1] + sorted[mid]) / 2.0
                } else {
                    sorted[mid]
                }
            }
            SummaryMethod::Sum => values.iter().sum(),
            SummaryMethod::Min => values.iter().copied().fold(f64::INFINITY, f64::min),
            SummaryMethod::Max => values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            SummaryMethod::Range => {
                let min = values.iter().copied().fold(f64::INFINITY, f64::min);
                let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
                max - min
            }
            // sample standard deviation; a single value has none to speak of
            SummaryMethod::Stddev => {
                if values.len() < 2 {
                    0.0
                } else {
                    let mean = values.iter().sum::<f64>() / n;
                    let squares: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
                    (squares / (n - 1.0)).sqrt()
                }
            }
            SummaryMethod::Count => n,
        };

        Some(score)
    }
}

impl FromStr for SummaryMethod {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "mean" => Ok(SummaryMethod::Mean),
            "median" => Ok(SummaryMethod::Median),
            "sum" => Ok(SummaryMethod::Sum),
            "min" => Ok(SummaryMethod::Min),
            "max" => Ok(SummaryMethod::Max),
            "range" => Ok(SummaryMethod::Range),
            "stddev" => Ok(SummaryMethod::Stddev),
            "count" => Ok(SummaryMethod::Count),
            _ => Err(config_error(format!("Invalid summary method: {}", s))),
        }
    }
}

impl Display for SummaryMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SummaryMethod::Mean => "mean",
            SummaryMethod::Median => "median",
            SummaryMethod::Sum => "sum",
            SummaryMethod::Min => "min",
            SummaryMethod::Max => "max",
            SummaryMethod::Range => "range",
            SummaryMethod::Stddev => "stddev",
            SummaryMethod::Count => "count",
        };
        write!(f, "{}", name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::*;

    #[fixture]
    fn values() -> Vec<f64> {
        vec![2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]
    }

    #[rstest]
    #[case(SummaryMethod::Mean, 5.0)]
    #[case(SummaryMethod::Median, 4.5)]
    #[case(SummaryMethod::Sum, 40.0)]
    #[case(SummaryMethod::Min, 2.0)]
    #[case(SummaryMethod::Max, 9.0)]
    #[case(SummaryMethod::Range, 7.0)]
    #[case(SummaryMethod::Count, 8.0)]
    fn test_summaries(values: Vec<f64>, #[case] method: SummaryMethod, #[case] expected: f64) {
        assert_eq!(method.summarize(&values), Some(expected));
    }

    #[rstest]
    fn test_stddev(values: Vec<f64>) {
        let sd = SummaryMethod::Stddev.summarize(&values).unwrap();
        assert!((sd - (32.0f64 / 7.0).sqrt()).abs() < 1e-12);
        assert_eq!(SummaryMethod::Stddev.summarize(&[3.0]), Some(0.0));
    }

    #[rstest]
    #[case(SummaryMethod::Mean)]
    #[case(SummaryMethod::Sum)]
    #[case(SummaryMethod::Count)]
    fn test_empty_has_no_score(#[case] method: SummaryMethod) {
        assert_eq!(method.summarize(&[]), None);
    }

    #[rstest]
    fn test_parse() {
        assert_eq!("Median".parse::<SummaryMethod>().unwrap(), SummaryMethod::Median);
        assert!("mode".parse::<SummaryMethod>().is_err());
    }
}
