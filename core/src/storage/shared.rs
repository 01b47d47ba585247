use std::sync::Arc;

use anyhow::Result;
use parking_lot::{RwLock, RwLockReadGuard};
use ulid::Ulid;

use crate::index::IndexedRecord;

use super::{Store, TileCount};

/// A cloneable handle to a store that can be used from multiple threads at
/// the same time. Writes take an exclusive lock, reads a shared one. An
/// aggregation running while records are inserted sees either all or none of
/// the records of a concurrent [`insert_many`](Store::insert_many) call.
pub struct SharedStore<S> {
    inner: Arc<RwLock<S>>,
}

impl<S> SharedStore<S> {
    pub fn new(store: S) -> Self {
        Self {
            inner: Arc::new(RwLock::new(store)),
        }
    }

    /// Locks the underlying store for reading
    pub fn read(&self) -> RwLockReadGuard<'_, S> {
        self.inner.read()
    }
}

impl<S> Clone for SharedStore<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: Store> Store for SharedStore<S> {
    fn insert_many(&mut self, records: Vec<IndexedRecord>) -> Result<usize> {
        self.inner.write().insert_many(records)
    }

    fn commit(&mut self) -> Result<()> {
        self.inner.write().commit()
    }

    fn get(&self, id: Ulid) -> Result<Option<IndexedRecord>> {
        self.inner.read().get(id)
    }

    fn delete(&mut self, id: Ulid) -> Result<bool> {
        self.inner.write().delete(id)
    }

    fn len(&self) -> Result<usize> {
        self.inner.read().len()
    }

    fn aggregate_by_tile_key(&self, zoom: u32) -> Result<Vec<TileCount>> {
        self.inner.read().aggregate_by_tile_key(zoom)
    }
}

#[cfg(test)]
mod tests {
    use std::thread::spawn;

    use assertor::{assert_that, ComparableAssertion};
    use geo::Point;

    use crate::{
        index::{IndexedRecord, ZoomRange},
        storage::{memory::MemoryStore, Store},
    };

    use super::SharedStore;

    /// Aggregate while another thread inserts records. Every aggregation must
    /// see a consistent state, i.e. a multiple of the batch size.
    #[test]
    fn aggregate_while_inserting() {
        let store = SharedStore::new(MemoryStore::new());
        let batches = 50;
        let batch_size = 20;

        let mut writer = store.clone();
        let writer_thread = spawn(move || {
            for _ in 0..batches {
                let records = (0..batch_size)
                    .map(|_| {
                        IndexedRecord::new(Point::new(-73.99, 40.73), ZoomRange::default())
                            .unwrap()
                    })
                    .collect();
                writer.insert_many(records).unwrap();
            }
            writer.commit().unwrap();
        });

        let mut last = 0;
        for _ in 0..100 {
            let total = store
                .aggregate_by_tile_key(12)
                .unwrap()
                .iter()
                .map(|c| c.count)
                .sum::<u64>();
            assert_eq!(total % batch_size, 0);
            assert_that!(total).is_at_least(last);
            last = total;
        }

        writer_thread.join().unwrap();
        assert_eq!(store.len().unwrap() as u64, batches * batch_size);
        assert_eq!(store.read().len().unwrap() as u64, batches * batch_size);
    }
}
