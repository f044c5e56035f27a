use super::strand::Strand;

///
/// An annotated feature (gene, transcript, exon, ...) as returned by a
/// feature lookup. Coordinates are 1-based and inclusive.
///
#[derive(Eq, PartialEq, Hash, Debug, Clone)]
pub struct Feature {
    pub id: String,
    pub name: String,
    pub feature_type: String,
    pub seq_id: String,
    pub start: i64,
    pub end: i64,
    pub strand: Strand,
}

impl Feature {
    pub fn new(
        id: impl Into<String>,
        feature_type: impl Into<String>,
        seq_id: impl Into<String>,
        start: i64,
        end: i64,
        strand: Strand,
    ) -> Self {
        let id = id.into();
        Feature {
            name: id.clone(),
            id,
            feature_type: feature_type.into(),
            seq_id: seq_id.into(),
            start,
            end,
            strand,
        }
    }

    #[inline]
    pub fn contains(&self, position: i64) -> bool {
        position >= self.start && position <= self.end
    }
}
