use fxhash::FxHashSet;

use gscore_core::models::Alignment;

use crate::params::{NameDedup, ValueType};
use crate::series::{FlatSeries, PositionMap};

///
/// The number recorded for one alignment.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tally {
    /// One per alignment
    Count,
    /// The reference footprint
    Length,
}

impl Tally {
    #[inline]
    pub fn sample(self, alignment: &Alignment) -> f64 {
        match self {
            Tally::Count => 1.0,
            Tally::Length => alignment.footprint() as f64,
        }
    }
}

impl From<ValueType> for Tally {
    fn from(value_type: ValueType) -> Self {
        match value_type {
            ValueType::Length => Tally::Length,
            _ => Tally::Count,
        }
    }
}

///
/// Read names already counted in one query.
///
/// A single set is threaded through every sub-interval and every source of
/// a query, so a name seen early is not counted again later.
///
#[derive(Debug, Clone, Default)]
pub struct NameSet {
    scope: NameDedup,
    seen: FxHashSet<(Option<i64>, String)>,
}

impl NameSet {
    pub fn new(scope: NameDedup) -> Self {
        NameSet {
            scope,
            seen: FxHashSet::default(),
        }
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }

    ///
    /// True the first time `alignment`'s name shows up in this scope.
    /// Unnamed alignments cannot be deduplicated and always count.
    ///
    pub fn first_sighting(&mut self, position: i64, alignment: &Alignment) -> bool {
        let Some(name) = alignment.name.as_deref() else {
            return true;
        };
        let key = match self.scope {
            NameDedup::Query => None,
            NameDedup::Position => Some(position),
        };
        self.seen.insert((key, name.to_string()))
    }
}

///
/// Where a scan puts the alignments that survive filtering.
///
pub trait Accumulator {
    fn accumulate(&mut self, position: i64, alignment: &Alignment);
}

/// Appends one sample per alignment, dropping positions.
pub struct FlatAccumulator<'a> {
    tally: Tally,
    series: &'a mut FlatSeries,
    names: Option<&'a mut NameSet>,
}

impl<'a> FlatAccumulator<'a> {
    pub fn new(tally: Tally, series: &'a mut FlatSeries) -> Self {
        FlatAccumulator {
            tally,
            series,
            names: None,
        }
    }

    pub fn dedup_names(mut self, names: &'a mut NameSet) -> Self {
        self.names = Some(names);
        self
    }
}

impl Accumulator for FlatAccumulator<'_> {
    fn accumulate(&mut self, position: i64, alignment: &Alignment) {
        if let Some(names) = self.names.as_deref_mut() {
            if !names.first_sighting(position, alignment) {
                return;
            }
        }
        self.series.push(self.tally.sample(alignment));
    }
}

/// Adds counts to, or collects lengths at, each alignment's position.
pub struct IndexedAccumulator<'a> {
    tally: Tally,
    map: &'a mut PositionMap,
    names: Option<&'a mut NameSet>,
}

impl<'a> IndexedAccumulator<'a> {
    pub fn new(tally: Tally, map: &'a mut PositionMap) -> Self {
        IndexedAccumulator {
            tally,
            map,
            names: None,
        }
    }

    pub fn dedup_names(mut self, names: &'a mut NameSet) -> Self {
        self.names = Some(names);
        self
    }
}

impl Accumulator for IndexedAccumulator<'_> {
    fn accumulate(&mut self, position: i64, alignment: &Alignment) {
        if let Some(names) = self.names.as_deref_mut() {
            if !names.first_sighting(position, alignment) {
                return;
            }
        }
        match self.tally {
            Tally::Count => self.map.add(position, 1.0),
            Tally::Length => self.map.push_sample(position, alignment.footprint() as f64),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::series::Slot;
    use pretty_assertions::assert_eq;
    use rstest::*;

    #[rstest]
    fn test_flat_lengths() {
        let mut series = FlatSeries::new();
        let mut acc = FlatAccumulator::new(Tally::Length, &mut series);
        acc.accumulate(5, &Alignment::new(0, 10));
        acc.accumulate(9, &Alignment::new(4, 14).reverse());
        assert_eq!(series.values(), &[10.0, 10.0]);
    }

    #[rstest]
    fn test_indexed_counts_and_lengths() {
        let mut counts = PositionMap::new();
        let mut acc = IndexedAccumulator::new(Tally::Count, &mut counts);
        acc.accumulate(5, &Alignment::new(0, 10));
        acc.accumulate(5, &Alignment::new(1, 9));
        assert_eq!(counts.get(5), Some(&Slot::Sum(2.0)));

        let mut lengths = PositionMap::new();
        let mut acc = IndexedAccumulator::new(Tally::Length, &mut lengths);
        acc.accumulate(5, &Alignment::new(0, 10));
        acc.accumulate(5, &Alignment::new(1, 9));
        assert_eq!(lengths.get(5), Some(&Slot::Samples(vec![10.0, 8.0])));
    }

    #[rstest]
    fn test_query_scope_counts_a_name_once() {
        let mut names = NameSet::new(NameDedup::Query);
        let mut series = FlatSeries::new();
        let mut acc = FlatAccumulator::new(Tally::Count, &mut series).dedup_names(&mut names);
        acc.accumulate(5, &Alignment::new(0, 10).named("r1"));
        acc.accumulate(50, &Alignment::new(45, 55).named("r1"));
        acc.accumulate(50, &Alignment::new(45, 55).named("r2"));
        acc.accumulate(50, &Alignment::new(45, 55));
        acc.accumulate(50, &Alignment::new(45, 55));
        assert_eq!(series.len(), 4);
    }

    #[rstest]
    fn test_position_scope_counts_a_name_per_position() {
        let mut names = NameSet::new(NameDedup::Position);
        let mut map = PositionMap::new();
        let mut acc = IndexedAccumulator::new(Tally::Count, &mut map).dedup_names(&mut names);
        acc.accumulate(5, &Alignment::new(0, 10).named("r1"));
        acc.accumulate(5, &Alignment::new(0, 10).named("r1"));
        acc.accumulate(50, &Alignment::new(45, 55).named("r1"));
        assert_eq!(map.value(5), Some(1.0));
        assert_eq!(map.value(50), Some(1.0));
        assert_eq!(names.len(), 2);
    }
}
