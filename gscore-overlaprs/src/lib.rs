//! Annotated feature lookup for gscore.
//!
//! The scoring engine never parses annotation files. Whenever it needs to know
//! which features sit on a stretch of genome (for example to drop positions that
//! fall inside a neighbouring gene) it goes through the [`FeatureLookup`] trait.
//! This crate defines that seam and ships [`FeatureIndex`], an in-memory,
//! per-chromosome Binary Interval Search implementation of it.
//!
//! ## Quick Start
//!
//! ```rust
//! use gscore_core::models::{Feature, Strand};
//! use gscore_overlaprs::{FeatureIndex, FeatureLookup};
//!
//! let index = FeatureIndex::build(vec![
//!     Feature::new("geneA", "gene", "chr1", 1000, 2000, Strand::Forward),
//!     Feature::new("geneB", "gene", "chr1", 1800, 2600, Strand::Reverse),
//!     Feature::new("ex1", "exon", "chr1", 1000, 1100, Strand::Forward),
//! ]);
//!
//! let genes = index
//!     .features_overlapping("chr1", 1900, 1950, &["gene".to_string()])
//!     .unwrap();
//! assert_eq!(genes.len(), 2);
//! ```

/// Binary Interval Search over annotated features.
///
/// See [`FeatureIndex`] for details.
pub mod bits;

/// The lookup seam consumed by the scoring engine.
///
/// See [`FeatureLookup`] for the main trait.
pub mod traits;

// re-exports
pub use self::bits::FeatureIndex;
pub use self::traits::{FeatureLookup, LookupError};
