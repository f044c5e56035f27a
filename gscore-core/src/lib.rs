//! # Core models for gscore
//!
//! Plain data types shared by every gscore crate: the 1-based inclusive
//! [`GenomicInterval`](models::GenomicInterval) that callers ask about, the
//! read-only [`Alignment`](models::Alignment) records a score source hands back,
//! and annotated [`Feature`](models::Feature)s returned by a feature lookup.
//!
//! ```rust
//! use gscore_core::models::{GenomicInterval, Strand};
//! use gscore_core::utils::parse_region;
//!
//! let region = parse_region("chr1:100-200:-1").unwrap();
//! assert_eq!(region, GenomicInterval::new("chr1", 100, 200, Strand::Reverse));
//! assert_eq!(region.len(), 101);
//! ```
pub mod errors;
pub mod models;
pub mod utils;

// re-exports
pub use errors::CoreError;
