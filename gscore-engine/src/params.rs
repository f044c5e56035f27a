use std::fmt::{self, Display};
use std::str::FromStr;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::errors::{EngineError, Result, config_error};
use crate::refpoint::ReferencePoint;
use crate::summary::SummaryMethod;

///
/// What gets recorded for each alignment (or base) that survives filtering.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ValueType {
    /// Per-base depth straight from the source. Strand is ignored.
    #[serde(rename = "coverage", alias = "score")]
    Coverage,
    #[default]
    #[serde(rename = "count")]
    Count,
    /// Alignments with distinct read names
    #[serde(rename = "ncount")]
    NameCount,
    /// Alignments lying entirely inside the region
    #[serde(rename = "pcount")]
    PreciseCount,
    /// Reference footprint of each alignment
    #[serde(rename = "length")]
    Length,
}

impl ValueType {
    /// Whether this value type is a tally of alignments.
    pub fn is_count(self) -> bool {
        matches!(
            self,
            ValueType::Count | ValueType::NameCount | ValueType::PreciseCount
        )
    }
}

impl FromStr for ValueType {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "coverage" | "score" => Ok(ValueType::Coverage),
            "count" => Ok(ValueType::Count),
            "ncount" => Ok(ValueType::NameCount),
            "pcount" => Ok(ValueType::PreciseCount),
            "length" => Ok(ValueType::Length),
            _ => Err(config_error(format!("Invalid value type: {}", s))),
        }
    }
}

impl Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueType::Coverage => "coverage",
            ValueType::Count => "count",
            ValueType::NameCount => "ncount",
            ValueType::PreciseCount => "pcount",
            ValueType::Length => "length",
        };
        write!(f, "{}", name)
    }
}

///
/// Which alignment orientations are collected, relative to the feature strand.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrandednessMode {
    #[default]
    All,
    Sense,
    Antisense,
}

impl FromStr for StrandednessMode {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "all" => Ok(StrandednessMode::All),
            "sense" => Ok(StrandednessMode::Sense),
            "antisense" => Ok(StrandednessMode::Antisense),
            _ => Err(config_error(format!("Invalid strandedness: {}", s))),
        }
    }
}

///
/// How far a read name is remembered when counting distinct names.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NameDedup {
    /// Once per query, across every sub-interval and source
    #[default]
    Query,
    /// Once per indexed position
    Position,
}

impl FromStr for NameDedup {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "query" => Ok(NameDedup::Query),
            "position" => Ok(NameDedup::Position),
            _ => Err(config_error(format!("Invalid name dedup scope: {}", s))),
        }
    }
}

///
/// Every knob of a collection request.
///
/// Missing fields take their defaults, so a partial TOML table is fine:
///
/// ```
/// use gscore_engine::params::{CollectionParams, ValueType};
///
/// let params: CollectionParams = toml::from_str(r#"
///     value_type = "length"
///     extend = 200
/// "#).unwrap();
///
/// assert_eq!(params.value_type, ValueType::Length);
/// assert_eq!(params.extend, Some(200));
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectionParams {
    pub value_type: ValueType,
    pub strandedness: StrandednessMode,
    pub method: Option<SummaryMethod>,
    pub reference_point: Option<ReferencePoint>,
    pub extend: Option<i64>,
    pub name_dedup: NameDedup,
}

impl CollectionParams {
    pub fn new(value_type: ValueType) -> Self {
        CollectionParams {
            value_type,
            ..Default::default()
        }
    }

    pub fn with_strandedness(mut self, strandedness: StrandednessMode) -> Self {
        self.strandedness = strandedness;
        self
    }

    pub fn with_method(mut self, method: SummaryMethod) -> Self {
        self.method = Some(method);
        self
    }

    pub fn with_reference_point(mut self, reference_point: ReferencePoint) -> Self {
        self.reference_point = Some(reference_point);
        self
    }

    pub fn with_extend(mut self, extend: i64) -> Self {
        self.extend = Some(extend);
        self
    }

    pub fn with_name_dedup(mut self, name_dedup: NameDedup) -> Self {
        self.name_dedup = name_dedup;
        self
    }

    ///
    /// The summary statistic to apply: the explicit one, else `sum` for
    /// count-like values and `mean` for everything else.
    ///
    pub fn summary_method(&self) -> SummaryMethod {
        match self.method {
            Some(method) => method,
            None if self.value_type.is_count() => SummaryMethod::Sum,
            None => SummaryMethod::Mean,
        }
    }

    /// The flank length to add on each side, zero when none was asked for.
    pub fn flank(&self) -> i64 {
        self.extend.unwrap_or(0)
    }

    ///
    /// Reject parameter combinations that cannot be collected. Called before
    /// any source is touched.
    ///
    pub fn validate(&self) -> Result<()> {
        if let Some(extend) = self.extend {
            if extend < 0 {
                return Err(config_error(format!(
                    "Extension length must not be negative, got {}",
                    extend
                )));
            }
        }

        if self.value_type == ValueType::Coverage && self.strandedness != StrandednessMode::All {
            warn!(
                "Coverage ignores strand, {:?} strandedness has no effect",
                self.strandedness
            );
        }

        Ok(())
    }
}

///
/// Options for counting every alignment in a source.
///
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CountOptions {
    pub min_quality: u8,
    /// Count proper pairs once, through their forward mate
    pub paired: bool,
    pub workers: usize,
    pub show_progress: bool,
}

impl Default for CountOptions {
    fn default() -> Self {
        CountOptions {
            min_quality: 0,
            paired: false,
            workers: 1,
            show_progress: false,
        }
    }
}
