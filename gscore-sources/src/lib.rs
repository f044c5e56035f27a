//! # Score sources
//!
//! A score source is anything that can answer interval-overlap queries with
//! alignments and per-base coverage. The engine only ever talks to the
//! [`ScoreSource`] trait; this crate provides:
//!
//! - [`BamSource`]: an indexed BAM file read with noodles (a `.bai` must sit next to it)
//! - [`MemorySource`]: alignments held in memory, handy for tests and for callers
//!   that already have records in hand
//! - [`SourceRegistry`]: an owned, path-keyed cache of open handles with explicit teardown
//!
//! All query coordinates at this layer are 0-based and half-open.
pub mod bam;
pub mod error;
pub mod memory;
pub mod registry;
pub mod traits;

// re-expose core types
pub use bam::BamSource;
pub use error::*;
pub use memory::MemorySource;
pub use registry::{SourceRegistry, open_source};
pub use traits::{AlignmentIter, ScoreSource, SourceHandle};
