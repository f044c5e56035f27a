use std::collections::BTreeMap;
use std::collections::btree_map;

///
/// Values collected at one position of a [`PositionMap`].
///
#[derive(Debug, Clone, PartialEq)]
pub enum Slot {
    /// Running total, used by counts and coverage
    Sum(f64),
    /// Every sample seen, reduced by arithmetic mean (alignment lengths)
    Samples(Vec<f64>),
}

impl Slot {
    /// The reported value of this slot. An empty sample list has none.
    pub fn value(&self) -> Option<f64> {
        match self {
            Slot::Sum(total) => Some(*total),
            Slot::Samples(samples) if samples.is_empty() => None,
            Slot::Samples(samples) => Some(samples.iter().sum::<f64>() / samples.len() as f64),
        }
    }

    fn absorb(&mut self, other: Slot) {
        if let Slot::Sum(total) = *self {
            if let Slot::Samples(_) = other {
                *self = Slot::Samples(vec![total]);
            }
        }

        match (self, other) {
            (Slot::Sum(total), Slot::Sum(more)) => *total += more,
            (Slot::Samples(samples), Slot::Samples(more)) => samples.extend(more),
            (Slot::Samples(samples), Slot::Sum(more)) => samples.push(more),
            // promoted to samples above
            (Slot::Sum(_), Slot::Samples(_)) => {}
        }
    }
}

///
/// Values keyed by genomic, virtual or relative position.
///
/// Keys are kept ordered, but nothing downstream relies on the order
/// values were added in.
///
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PositionMap {
    slots: BTreeMap<i64, Slot>,
}

impl PositionMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Add `amount` to the running total at `position`
    pub fn add(&mut self, position: i64, amount: f64) {
        self.slots
            .entry(position)
            .or_insert(Slot::Sum(0.0))
            .absorb(Slot::Sum(amount));
    }

    /// Record one more sample at `position`
    pub fn push_sample(&mut self, position: i64, sample: f64) {
        self.slots
            .entry(position)
            .or_insert_with(|| Slot::Samples(Vec::new()))
            .absorb(Slot::Samples(vec![sample]));
    }

    pub fn get(&self, position: i64) -> Option<&Slot> {
        self.slots.get(&position)
    }

    pub fn value(&self, position: i64) -> Option<f64> {
        self.get(position).and_then(Slot::value)
    }

    pub fn contains(&self, position: i64) -> bool {
        self.slots.contains_key(&position)
    }

    pub fn positions(&self) -> impl Iterator<Item = i64> + '_ {
        self.slots.keys().copied()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, i64, Slot> {
        self.slots.iter()
    }

    /// Keep only the positions for which `keep` returns true
    pub fn retain(&mut self, mut keep: impl FnMut(i64) -> bool) {
        self.slots.retain(|position, _| keep(*position));
    }

    ///
    /// Fold another map into this one. Totals are summed and sample lists are
    /// concatenated, which is how several sources merge into one result.
    ///
    pub fn merge(&mut self, other: PositionMap) {
        for (position, slot) in other.slots {
            match self.slots.entry(position) {
                btree_map::Entry::Vacant(entry) => {
                    entry.insert(slot);
                }
                btree_map::Entry::Occupied(mut entry) => entry.get_mut().absorb(slot),
            }
        }
    }

    ///
    /// Move every key through `remap`. Slots that land on the same key are
    /// merged.
    ///
    pub fn remap(self, remap: impl Fn(i64) -> i64) -> PositionMap {
        let mut out = PositionMap::new();
        for (position, slot) in self.slots {
            let mut single = PositionMap::new();
            single.slots.insert(remap(position), slot);
            out.merge(single);
        }
        out
    }

    /// Shift every key by `offset`
    pub fn shifted(self, offset: i64) -> PositionMap {
        if offset == 0 {
            return self;
        }
        self.remap(|position| position + offset)
    }

    ///
    /// One value per position: sums as is, sample lists by their mean.
    ///
    pub fn reduce(&self) -> BTreeMap<i64, f64> {
        self.slots
            .iter()
            .filter_map(|(position, slot)| slot.value().map(|value| (*position, value)))
            .collect()
    }
}

impl IntoIterator for PositionMap {
    type Item = (i64, Slot);
    type IntoIter = btree_map::IntoIter<i64, Slot>;

    fn into_iter(self) -> Self::IntoIter {
        self.slots.into_iter()
    }
}

impl FromIterator<(i64, f64)> for PositionMap {
    fn from_iter<T: IntoIterator<Item = (i64, f64)>>(iter: T) -> Self {
        let mut map = PositionMap::new();
        for (position, amount) in iter {
            map.add(position, amount);
        }
        map
    }
}

///
/// Values with their positions discarded, the input to summary statistics.
///
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FlatSeries {
    values: Vec<f64>,
}

impl FlatSeries {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, value: f64) {
        self.values.push(value);
    }

    pub fn append(&mut self, other: FlatSeries) {
        self.values.extend(other.values);
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn into_vec(self) -> Vec<f64> {
        self.values
    }
}

impl Extend<f64> for FlatSeries {
    fn extend<T: IntoIterator<Item = f64>>(&mut self, iter: T) {
        self.values.extend(iter);
    }
}

impl From<Vec<f64>> for FlatSeries {
    fn from(values: Vec<f64>) -> Self {
        FlatSeries { values }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::*;

    #[rstest]
    fn test_sum_and_samples() {
        let mut map = PositionMap::new();
        map.add(10, 1.0);
        map.add(10, 1.0);
        map.push_sample(20, 30.0);
        map.push_sample(20, 50.0);

        assert_eq!(map.get(10), Some(&Slot::Sum(2.0)));
        assert_eq!(map.value(20), Some(40.0));
        assert_eq!(map.reduce(), BTreeMap::from([(10, 2.0), (20, 40.0)]));
    }

    #[rstest]
    fn test_merge_sums_totals() {
        let mut left: PositionMap = vec![(1, 1.0), (2, 3.0)].into_iter().collect();
        let right: PositionMap = vec![(2, 2.0), (5, 1.0)].into_iter().collect();
        left.merge(right);
        assert_eq!(left.reduce(), BTreeMap::from([(1, 1.0), (2, 5.0), (5, 1.0)]));
    }

    #[rstest]
    fn test_merge_concatenates_samples() {
        let mut left = PositionMap::new();
        left.push_sample(7, 10.0);
        let mut right = PositionMap::new();
        right.push_sample(7, 20.0);
        left.merge(right);
        assert_eq!(left.get(7), Some(&Slot::Samples(vec![10.0, 20.0])));
    }

    #[rstest]
    fn test_shift_and_remap_collisions() {
        let map: PositionMap = vec![(100, 1.0), (101, 2.0)].into_iter().collect();
        let shifted = map.clone().shifted(-50);
        assert_eq!(shifted.positions().collect::<Vec<_>>(), vec![50, 51]);

        let collapsed = map.remap(|_| 0);
        assert_eq!(collapsed.reduce(), BTreeMap::from([(0, 3.0)]));
    }

    #[rstest]
    fn test_flat_series() {
        let mut series = FlatSeries::new();
        series.push(1.0);
        series.extend([2.0, 3.0]);
        series.append(FlatSeries::from(vec![4.0]));
        assert_eq!(series.values(), &[1.0, 2.0, 3.0, 4.0]);
        assert_eq!(series.len(), 4);
    }
}
