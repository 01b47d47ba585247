use std::collections::BTreeMap;

use anyhow::{bail, Result};
use rustc_hash::{FxHashMap, FxHashSet};
use ulid::Ulid;

use crate::{index::IndexedRecord, tile::TileKey};

use super::{Store, TileCount};

/// An implementation of the [`Store`] trait that keeps all records in memory.
/// Aggregation scans all records and groups them itself.
#[derive(Default)]
pub struct MemoryStore {
    records: BTreeMap<Ulid, IndexedRecord>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Store for MemoryStore {
    fn insert_many(&mut self, records: Vec<IndexedRecord>) -> Result<usize> {
        let mut ids = FxHashSet::default();
        for r in &records {
            if self.records.contains_key(&r.id()) || !ids.insert(r.id()) {
                bail!("A record with ID `{}' already exists", r.id());
            }
        }

        let n = records.len();
        self.records.extend(records.into_iter().map(|r| (r.id(), r)));
        Ok(n)
    }

    fn commit(&mut self) -> Result<()> {
        // nothing to do here
        Ok(())
    }

    fn get(&self, id: Ulid) -> Result<Option<IndexedRecord>> {
        Ok(self.records.get(&id).cloned())
    }

    fn delete(&mut self, id: Ulid) -> Result<bool> {
        Ok(self.records.remove(&id).is_some())
    }

    fn len(&self) -> Result<usize> {
        Ok(self.records.len())
    }

    fn aggregate_by_tile_key(&self, zoom: u32) -> Result<Vec<TileCount>> {
        let mut counts: FxHashMap<TileKey, u64> = FxHashMap::default();
        for m in self.records.values().filter_map(|r| r.tile_at(zoom)) {
            *counts.entry(m.key).or_default() += 1;
        }

        let mut result = counts
            .into_iter()
            .map(|(key, count)| TileCount::new(key, count))
            .collect::<Vec<_>>();
        result.sort_unstable_by_key(|c| c.key);

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use assertor::{assert_that, BooleanAssertion, OptionAssertion, VecAssertion};
    use geo::Point;

    use crate::{
        index::{IndexedRecord, ZoomRange},
        storage::{Store, TileCount},
    };

    use super::MemoryStore;

    fn record(lon: f64, lat: f64) -> IndexedRecord {
        IndexedRecord::new(Point::new(lon, lat), ZoomRange::default()).unwrap()
    }

    #[test]
    fn insert_and_get() {
        let mut store = MemoryStore::new();
        assert_that!(store.is_empty().unwrap()).is_true();

        let r = record(-73.99, 40.73);
        assert_eq!(store.insert_many(vec![r.clone()]).unwrap(), 1);
        store.commit().unwrap();

        assert_eq!(store.len().unwrap(), 1);
        assert_eq!(store.get(r.id()).unwrap(), Some(r));
    }

    #[test]
    fn delete() {
        let mut store = MemoryStore::new();
        let r = record(-73.99, 40.73);
        store.insert_many(vec![r.clone()]).unwrap();

        assert_that!(store.delete(r.id()).unwrap()).is_true();
        assert_that!(store.get(r.id()).unwrap()).is_none();
        assert_that!(store.delete(r.id()).unwrap()).is_false();
        assert_that!(store.aggregate_by_tile_key(12).unwrap()).is_empty();
    }

    /// Inserting a batch that contains a known ID must not add anything
    #[test]
    fn duplicate_ids() {
        let mut store = MemoryStore::new();
        let a = record(1.0, 2.0);
        store.insert_many(vec![a.clone()]).unwrap();

        let b = record(3.0, 4.0);
        assert_that!(store.insert_many(vec![b.clone(), a.clone()]).is_err()).is_true();
        assert_that!(store.get(b.id()).unwrap()).is_none();

        assert_that!(store.insert_many(vec![b.clone(), b.clone()]).is_err()).is_true();
        assert_eq!(store.len().unwrap(), 1);
    }

    #[test]
    fn aggregate() {
        let mut store = MemoryStore::new();
        store
            .insert_many(vec![
                record(-73.99, 40.73),
                record(-73.99, 40.73),
                record(-73.99, 40.73),
                record(8.6722, 50.1125),
            ])
            .unwrap();

        let counts = store.aggregate_by_tile_key(12).unwrap();
        assert_that!(counts).contains_exactly(vec![
            TileCount::new("1206-1539-12".parse().unwrap(), 3),
            TileCount::new("2146-1387-12".parse().unwrap(), 1),
        ]);

        // one tile covers the whole world at zoom level 0
        let counts = store.aggregate_by_tile_key(0).unwrap();
        assert_eq!(counts, vec![TileCount::new("0-0-0".parse().unwrap(), 4)]);
    }

    #[test]
    fn aggregate_outside_range() {
        let mut store = MemoryStore::new();
        store.insert_many(vec![record(-73.99, 40.73)]).unwrap();
        assert_that!(store.aggregate_by_tile_key(14).unwrap()).is_empty();
        assert_that!(store.aggregate_by_tile_key(u32::MAX).unwrap()).is_empty();
    }
}
