//! # Scoring and coordinate engine
//!
//! Turns alignment data into numbers over genomic features. Given a region
//! (or a spliced feature's sub-intervals) and a [`params::CollectionParams`],
//! the engine scans one or more [`gscore_sources::ScoreSource`]s and returns
//! either a flat series for a summary statistic or a position-indexed
//! profile, optionally stitched across introns, trimmed of positions claimed
//! by neighbouring features, and re-keyed relative to a reference point.
//!
//! Whole-source alignment counting is parallelised over chromosomes with a
//! rayon pool; every other operation is single-threaded.
//!
//! ## Quick start
//!
//! ```rust
//! use gscore_core::models::{Alignment, GenomicInterval, Strand};
//! use gscore_engine::context::{ProfileRequest, ScoreContext};
//! use gscore_engine::params::{CollectionParams, ValueType};
//! use gscore_engine::refpoint::ReferencePoint;
//! use gscore_sources::MemorySource;
//!
//! let source = MemorySource::new("mem://reads").with_alignments(
//!     "chr1",
//!     vec![Alignment::new(1009, 1011), Alignment::new(1019, 1021)],
//! );
//!
//! let mut ctx = ScoreContext::new();
//! ctx.add_source(Box::new(source));
//!
//! let region = GenomicInterval::new("chr1", 1001, 1100, Strand::Forward);
//! let params = CollectionParams::new(ValueType::Count);
//! assert_eq!(ctx.segment_score(&["mem://reads"], &region, &params).unwrap(), Some(2.0));
//!
//! let params = params.with_reference_point(ReferencePoint::FivePrime);
//! let profile = ctx
//!     .position_scores(&["mem://reads"], &ProfileRequest::new(region), &params)
//!     .unwrap();
//! assert_eq!(profile.scores.keys().copied().collect::<Vec<_>>(), vec![9, 19]);
//! ```
pub mod accumulate;
pub mod avoid;
pub mod context;
pub mod counter;
pub mod coverage;
pub mod errors;
pub mod params;
pub mod position;
pub mod refpoint;
pub mod scanner;
pub mod series;
pub mod strand;
pub mod subfeature;
pub mod summary;

// re-expose the everyday types
pub use context::{Profile, ProfileRequest, ScoreContext};
pub use counter::{CountInput, count_alignments};
pub use errors::{EngineError, Result};
pub use params::{CollectionParams, CountOptions, NameDedup, StrandednessMode, ValueType};
pub use refpoint::ReferencePoint;
pub use series::{FlatSeries, PositionMap};
pub use summary::SummaryMethod;
