pub mod memory;
pub mod rocksdb;
pub mod shared;
pub mod tile_count;

use anyhow::Result;
use ulid::Ulid;

use crate::index::IndexedRecord;

pub use self::tile_count::TileCount;

/// A store for indexed records that can count records per tile
pub trait Store {
    /// Adds all given records to the store. Either all records are added or,
    /// in case of an error, none of them. Returns the number of records added.
    /// Call [`commit`](Self::commit) to persist them.
    fn insert_many(&mut self, records: Vec<IndexedRecord>) -> Result<usize>;

    /// Call this method after adding records via
    /// [`insert_many`](Self::insert_many)
    fn commit(&mut self) -> Result<()>;

    /// Retrieves a record by ID
    fn get(&self, id: Ulid) -> Result<Option<IndexedRecord>>;

    /// Removes the record with the given ID including all its tile
    /// memberships. Returns `false` if there was no such record.
    fn delete(&mut self, id: Ulid) -> Result<bool>;

    /// The number of records in the store
    fn len(&self) -> Result<usize>;

    fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Counts the records per tile at the given zoom level. Each record
    /// contributes to at most one tile. Zoom levels nobody was indexed at
    /// produce an empty result. The result is sorted by tile key.
    fn aggregate_by_tile_key(&self, zoom: u32) -> Result<Vec<TileCount>>;
}
