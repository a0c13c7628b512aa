//! Time series keyed explicitly by ID and snapshot.
//!
//! Loads, prices and dispatch are all stored as a [`Series`]. Values are always looked up by
//! `(id, snapshot)` rather than by position, and two series which are combined must contain
//! exactly the same keys.
use crate::error::{CostError, CostResult};
use crate::id::IDLike;
use indexmap::IndexMap;
use itertools::Itertools;
use std::iter::Sum;

/// A point in time at which the optimiser reports values
pub type Snapshot = chrono::NaiveDateTime;

/// Values indexed by an ID (e.g. a node or asset) and a snapshot
#[derive(PartialEq, Debug, Clone)]
pub struct Series<K: IDLike, V> {
    values: IndexMap<K, IndexMap<Snapshot, V>>,
}

impl<K: IDLike, V> Default for Series<K, V> {
    fn default() -> Self {
        Self {
            values: IndexMap::new(),
        }
    }
}

impl<K: IDLike, V: Copy> Series<K, V> {
    /// Create a new, empty series
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a series from `(id, snapshot, value)` entries.
    ///
    /// # Errors
    ///
    /// Returns [`CostError::InvalidParameter`] if the same key occurs twice.
    pub fn from_entries<I>(entries: I) -> CostResult<Self>
    where
        I: IntoIterator<Item = (K, Snapshot, V)>,
    {
        let mut series = Self::new();
        for (id, snapshot, value) in entries {
            series.insert(id, snapshot, value)?;
        }

        Ok(series)
    }

    /// Add a value, failing if one is already present for this key
    pub fn insert(&mut self, id: K, snapshot: Snapshot, value: V) -> CostResult<()> {
        let values = self.values.entry(id.clone()).or_default();
        if values.contains_key(&snapshot) {
            return Err(CostError::InvalidParameter(format!(
                "Duplicate entry for {id} at {snapshot}"
            )));
        }
        values.insert(snapshot, value);

        Ok(())
    }

    /// Get the value for the given key, if present
    pub fn get(&self, id: &K, snapshot: &Snapshot) -> Option<V> {
        self.values.get(id)?.get(snapshot).copied()
    }

    /// The total number of values
    pub fn len(&self) -> usize {
        self.values.values().map(IndexMap::len).sum()
    }

    /// Whether the series has no values
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterate over the distinct IDs, in order of first appearance
    pub fn ids(&self) -> impl Iterator<Item = &K> {
        self.values.keys()
    }

    /// The distinct snapshots across all IDs, in chronological order
    pub fn snapshots(&self) -> Vec<Snapshot> {
        self.values
            .values()
            .flat_map(IndexMap::keys)
            .copied()
            .sorted()
            .dedup()
            .collect()
    }

    /// Iterate over all `(id, snapshot, value)` entries
    pub fn iter(&self) -> impl Iterator<Item = (&K, Snapshot, V)> {
        self.values.iter().flat_map(|(id, values)| {
            values
                .iter()
                .map(move |(snapshot, value)| (id, *snapshot, *value))
        })
    }

    /// Iterate over the values of a single ID
    pub fn iter_id<'a>(&'a self, id: &K) -> impl Iterator<Item = (Snapshot, V)> + 'a {
        self.values
            .get(id)
            .into_iter()
            .flat_map(|values| values.iter().map(|(snapshot, value)| (*snapshot, *value)))
    }

    /// Sum the values of a single ID over all snapshots (zero if the ID is absent)
    pub fn total_for(&self, id: &K) -> V
    where
        V: Sum,
    {
        self.iter_id(id).map(|(_, value)| value).sum()
    }

    /// Sum all values
    pub fn total(&self) -> V
    where
        V: Sum,
    {
        self.iter().map(|(_, _, value)| value).sum()
    }

    /// Find the first key of `self` which is absent from `other`
    fn first_missing_key<W: Copy>(&self, other: &Series<K, W>) -> Option<String> {
        for (id, values) in &self.values {
            let Some(other_values) = other.values.get(id) else {
                return Some(format!("ID {id}"));
            };
            if let Some(snapshot) = values.keys().find(|s| !other_values.contains_key(*s)) {
                return Some(format!("{id} at {snapshot}"));
            }
        }

        None
    }

    /// Check that `self` and `other` contain exactly the same keys.
    ///
    /// `name` and `other_name` are used in the error message.
    ///
    /// # Errors
    ///
    /// Returns [`CostError::InvalidParameter`] naming the first key found in one series but not
    /// the other.
    pub fn check_aligned<W: Copy>(
        &self,
        name: &str,
        other: &Series<K, W>,
        other_name: &str,
    ) -> CostResult<()> {
        if let Some(key) = self.first_missing_key(other) {
            return Err(CostError::InvalidParameter(format!(
                "{name} and {other_name} are misaligned: {key} is in {name} but not {other_name}"
            )));
        }
        if let Some(key) = other.first_missing_key(self) {
            return Err(CostError::InvalidParameter(format!(
                "{name} and {other_name} are misaligned: {key} is in {other_name} but not {name}"
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::{loads, prices, snapshot};
    use crate::id::NodeID;
    use crate::units::{MoneyPerEnergy, Power};
    use rstest::rstest;

    #[rstest]
    fn test_insert_duplicate(mut loads: Series<NodeID, Power>) {
        let result = loads.insert("DK".into(), snapshot(0), Power(1.0));
        assert!(matches!(result, Err(CostError::InvalidParameter(_))));
    }

    #[rstest]
    fn test_lookup(loads: Series<NodeID, Power>) {
        assert_eq!(loads.len(), 6);
        assert_eq!(loads.get(&"DE".into(), &snapshot(1)), Some(Power(500.0)));
        assert_eq!(loads.get(&"SE".into(), &snapshot(1)), None);
        assert_eq!(loads.total_for(&"DK".into()), Power(300.0));
        assert_eq!(loads.total_for(&"SE".into()), Power(0.0));
        assert_eq!(loads.total(), Power(1800.0));
        assert_eq!(loads.snapshots(), vec![snapshot(0), snapshot(1), snapshot(2)]);
    }

    #[rstest]
    fn test_check_aligned(loads: Series<NodeID, Power>, prices: Series<NodeID, MoneyPerEnergy>) {
        loads.check_aligned("loads", &prices, "prices").unwrap();
    }

    #[rstest]
    fn test_check_aligned_missing_node(
        loads: Series<NodeID, Power>,
        mut prices: Series<NodeID, MoneyPerEnergy>,
    ) {
        prices
            .insert("SE".into(), snapshot(0), MoneyPerEnergy(10.0))
            .unwrap();
        assert_eq!(
            loads.check_aligned("loads", &prices, "prices").unwrap_err(),
            CostError::InvalidParameter(
                "loads and prices are misaligned: ID SE is in prices but not loads".into()
            )
        );
    }

    #[rstest]
    fn test_check_aligned_missing_snapshot(
        mut loads: Series<NodeID, Power>,
        prices: Series<NodeID, MoneyPerEnergy>,
    ) {
        loads.insert("DE".into(), snapshot(3), Power(10.0)).unwrap();
        assert_eq!(
            loads.check_aligned("loads", &prices, "prices").unwrap_err(),
            CostError::InvalidParameter(
                "loads and prices are misaligned: DE at 2015-01-01 03:00:00 is in loads but not \
                 prices"
                    .into()
            )
        );
    }
}
