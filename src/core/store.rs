//! Per-model registry of sample path sets.

use crate::core::SamplePathSet;
use crate::error::{ForecastError, Result};
use std::collections::BTreeMap;

/// Sample path sets keyed by model name.
///
/// All sets in a store share one horizon so they can be scored against the
/// same observations. Iteration is in model-name order.
#[derive(Debug, Clone, Default)]
pub struct SamplePathStore {
    sets: BTreeMap<String, SamplePathSet>,
}

impl SamplePathStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from several sets.
    pub fn from_sets(sets: impl IntoIterator<Item = SamplePathSet>) -> Result<Self> {
        let mut store = Self::new();
        for set in sets {
            store.insert(set)?;
        }
        Ok(store)
    }

    /// Insert a set under its own name, returning any set it replaced.
    pub fn insert(&mut self, set: SamplePathSet) -> Result<Option<SamplePathSet>> {
        if let Some(other) = self.sets.values().find(|s| s.name() != set.name()) {
            if other.horizon() != set.horizon() {
                return Err(ForecastError::IncompatibleHorizon {
                    expected: other.horizon(),
                    got: set.horizon(),
                });
            }
        }
        Ok(self.sets.insert(set.name().to_string(), set))
    }

    pub fn get(&self, model: &str) -> Result<&SamplePathSet> {
        self.sets
            .get(model)
            .ok_or_else(|| ForecastError::UnknownModel(model.to_string()))
    }

    pub fn remove(&mut self, model: &str) -> Option<SamplePathSet> {
        self.sets.remove(model)
    }

    pub fn contains(&self, model: &str) -> bool {
        self.sets.contains_key(model)
    }

    /// Model names in sorted order.
    pub fn models(&self) -> impl Iterator<Item = &str> {
        self.sets.keys().map(|k| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &SamplePathSet> {
        self.sets.values()
    }

    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    /// Shared horizon of the stored sets, `None` when empty.
    pub fn horizon(&self) -> Option<usize> {
        self.sets.values().next().map(|s| s.horizon())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(name: &str, horizon: usize, n: usize) -> SamplePathSet {
        let paths = (0..n)
            .map(|i| (0..horizon).map(|h| (i + h) as f64).collect())
            .collect();
        SamplePathSet::new(name, paths).unwrap()
    }

    #[test]
    fn insert_and_lookup() {
        let mut store = SamplePathStore::new();
        assert!(store.is_empty());
        assert_eq!(store.horizon(), None);

        store.insert(set("ETS", 12, 5)).unwrap();
        store.insert(set("ARIMA", 12, 3)).unwrap();

        assert_eq!(store.len(), 2);
        assert_eq!(store.horizon(), Some(12));
        assert_eq!(store.models().collect::<Vec<_>>(), vec!["ARIMA", "ETS"]);
        assert_eq!(store.get("ETS").unwrap().len(), 5);
        assert!(store.contains("ARIMA"));
    }

    #[test]
    fn insert_replaces_same_name() {
        let mut store = SamplePathStore::from_sets([set("ETS", 12, 5)]).unwrap();
        let old = store.insert(set("ETS", 12, 7)).unwrap();
        assert_eq!(old.map(|s| s.len()), Some(5));
        assert_eq!(store.get("ETS").unwrap().len(), 7);

        // A lone set may be replaced with a different horizon.
        store.insert(set("ETS", 6, 2)).unwrap();
        assert_eq!(store.horizon(), Some(6));
    }

    #[test]
    fn insert_rejects_mismatched_horizon() {
        let mut store = SamplePathStore::from_sets([set("ETS", 12, 5)]).unwrap();
        let result = store.insert(set("ARIMA", 6, 5));
        assert!(matches!(
            result,
            Err(ForecastError::IncompatibleHorizon {
                expected: 12,
                got: 6
            })
        ));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn path_types_are_thread_safe() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SamplePathSet>();
        assert_send_sync::<SamplePathStore>();
    }

    #[test]
    fn unknown_model_is_reported() {
        let mut store = SamplePathStore::new();
        assert_eq!(
            store.get("TSLM").unwrap_err(),
            ForecastError::UnknownModel("TSLM".to_string())
        );
        assert!(store.remove("TSLM").is_none());
    }
}
