///
/// A read-only alignment record as handed back by a score source.
///
/// `position` is the 0-based leftmost reference base and `end` is exclusive,
/// so `end - position` is the reference footprint.
///
#[derive(Eq, PartialEq, Hash, Debug, Clone)]
pub struct Alignment {
    pub position: i64,
    pub end: i64,
    pub is_reverse: bool,
    pub is_unmapped: bool,
    pub is_proper_pair: bool,
    pub mapping_quality: u8,
    pub name: Option<String>,
}

impl Alignment {
    /// A mapped, forward, single-end alignment with mapping quality 60.
    pub fn new(position: i64, end: i64) -> Self {
        Alignment {
            position,
            end,
            is_reverse: false,
            is_unmapped: false,
            is_proper_pair: false,
            mapping_quality: 60,
            name: None,
        }
    }

    pub fn reverse(mut self) -> Self {
        self.is_reverse = true;
        self
    }

    pub fn unmapped(mut self) -> Self {
        self.is_unmapped = true;
        self
    }

    pub fn proper_pair(mut self) -> Self {
        self.is_proper_pair = true;
        self
    }

    pub fn with_mapping_quality(mut self, mapping_quality: u8) -> Self {
        self.mapping_quality = mapping_quality;
        self
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    ///
    /// Length of the reference span covered by the alignment
    ///
    pub fn footprint(&self) -> i64 {
        self.end - self.position
    }
}
