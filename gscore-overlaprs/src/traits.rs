use gscore_core::models::Feature;
use thiserror::Error;

/// Errors surfaced by a [`FeatureLookup`] backend.
#[derive(Debug, Error)]
pub enum LookupError {
    /// The annotation backend could not answer the query.
    #[error("Feature lookup failed: {0}")]
    Backend(String),
}

///
/// Anything that can answer "which annotated features overlap this range".
///
/// Coordinates are 1-based and inclusive on both ends. An empty `types`
/// slice means every feature type is wanted. Unknown sequence names yield an
/// empty result rather than an error.
///
pub trait FeatureLookup: Send + Sync {
    fn features_overlapping(
        &self,
        seq_id: &str,
        start: i64,
        end: i64,
        types: &[String],
    ) -> Result<Vec<Feature>, LookupError>;
}
