use anyhow::{bail, Context, Result};
use bincode::{Decode, Encode};
use geo::Point;
use itertools::{process_results, Itertools};
use log::debug;
use rocksdb::{
    ColumnFamily, ColumnFamilyDescriptor, DBCompressionType, Direction, IteratorMode, Options,
    WriteBatch, DB,
};
use rustc_hash::FxHashSet;
use ulid::Ulid;

use crate::{
    error::Error,
    index::{IndexedRecord, TileMembership},
    tile::{TileCoordinate, TileKey, MAX_ZOOM},
};

use super::{Store, TileCount};

/// Column family mapping record IDs to encoded records
const RECORDS_CF: &str = "records";

/// Column family with one empty entry per tile membership. Keys consist of
/// the tile's zoom level, row, and column, followed by the record ID, so all
/// records in the same tile are stored next to each other.
const TILES_CF: &str = "tiles";

/// Length of a key in [`TILES_CF`]: zoom (1) + y (4) + x (4) + ULID (16)
const TILE_KEY_LEN: usize = 25;

/// Length of the prefix of a key in [`TILES_CF`] that identifies the tile
const TILE_PREFIX_LEN: usize = 9;

/// A record as it is persisted in [`RECORDS_CF`]
#[derive(Encode, Decode)]
struct StoredRecord {
    longitude: f64,
    latitude: f64,
    tiles: Vec<(u32, u32, u32)>,
}

/// An implementation of the [`Store`] trait backed by RocksDB. Records are
/// grouped by tile directly in the database by scanning the key range of the
/// requested zoom level.
pub struct RocksDBStore {
    db: DB,
}

impl RocksDBStore {
    /// Creates a new RocksDB store at the given location or opens an
    /// existing one
    pub fn new(path: &str) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);
        opts.set_compression_type(DBCompressionType::Lz4);

        let cfs = [RECORDS_CF, TILES_CF]
            .into_iter()
            .map(|name| ColumnFamilyDescriptor::new(name, Options::default()));

        Ok(Self {
            db: DB::open_cf_descriptors(&opts, path, cfs)
                .with_context(|| format!("Unable to open store at `{path}'"))?,
        })
    }

    fn cf(&self, name: &str) -> Result<&ColumnFamily> {
        self.db
            .cf_handle(name)
            .with_context(|| format!("Column family `{name}' is missing"))
    }

    /// Iterates over the tiles of all memberships at zoom level `zoom`. Tiles
    /// are returned in key order, i.e. equal tiles follow each other.
    fn scan_zoom(&self, zoom: u8) -> Result<impl Iterator<Item = Result<TileCoordinate>> + '_> {
        let iter = self
            .db
            .iterator_cf(self.cf(TILES_CF)?, IteratorMode::From(&[zoom], Direction::Forward));
        Ok(iter
            .take_while(move |item| match item {
                Ok((key, _)) => key.first() == Some(&zoom),
                Err(_) => true,
            })
            .map(|item| {
                let (key, _) = item?;
                decode_tile_key(&key)
            }))
    }
}

/// Encodes a key for [`TILES_CF`]. Uses big endian so keys sort by zoom
/// level, row, column, and ID.
fn encode_tile_key(tile: TileCoordinate, id: Ulid) -> [u8; TILE_KEY_LEN] {
    let mut key = [0u8; TILE_KEY_LEN];
    // zoom levels never exceed MAX_ZOOM, so they fit into one byte
    key[0] = tile.z() as u8;
    key[1..5].copy_from_slice(&tile.y().to_be_bytes());
    key[5..9].copy_from_slice(&tile.x().to_be_bytes());
    key[9..].copy_from_slice(&id.0.to_be_bytes());
    key
}

fn malformed(key: &[u8]) -> Error {
    Error::MalformedKey(key.iter().map(|b| format!("{b:02x}")).collect())
}

/// Decodes the tile from a key in [`TILES_CF`]
fn decode_tile_key(key: &[u8]) -> Result<TileCoordinate> {
    if key.len() != TILE_KEY_LEN {
        return Err(malformed(key).into());
    }
    let mut y = [0u8; 4];
    y.copy_from_slice(&key[1..5]);
    let mut x = [0u8; 4];
    x.copy_from_slice(&key[5..TILE_PREFIX_LEN]);
    let tile = TileCoordinate::new(u32::from_be_bytes(x), u32::from_be_bytes(y), key[0].into())
        .ok_or_else(|| malformed(key))?;
    Ok(tile)
}

fn encode_record(record: &IndexedRecord) -> Result<Vec<u8>> {
    let stored = StoredRecord {
        longitude: record.location().x(),
        latitude: record.location().y(),
        tiles: record
            .tiles()
            .iter()
            .map(|m| (m.tile.x(), m.tile.y(), m.tile.z()))
            .collect(),
    };
    Ok(bincode::encode_to_vec(stored, bincode::config::standard())?)
}

fn decode_record(id: Ulid, bytes: &[u8]) -> Result<IndexedRecord> {
    let (stored, _): (StoredRecord, usize) =
        bincode::decode_from_slice(bytes, bincode::config::standard())?;
    let tiles = stored
        .tiles
        .into_iter()
        .map(|(x, y, z)| {
            TileCoordinate::new(x, y, z)
                .map(TileMembership::from)
                .ok_or_else(|| Error::MalformedKey(format!("{x}-{y}-{z}")))
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(IndexedRecord::from_parts(
        id,
        Point::new(stored.longitude, stored.latitude),
        tiles,
    ))
}

impl Store for RocksDBStore {
    fn insert_many(&mut self, records: Vec<IndexedRecord>) -> Result<usize> {
        let records_cf = self.cf(RECORDS_CF)?;
        let tiles_cf = self.cf(TILES_CF)?;

        let mut ids = FxHashSet::default();
        let mut batch = WriteBatch::default();
        for r in &records {
            // important! use `to_be_bytes()` to maintain sort order!
            let id_bytes = r.id().0.to_be_bytes();
            if !ids.insert(r.id()) || self.db.get_pinned_cf(records_cf, id_bytes)?.is_some() {
                bail!("A record with ID `{}' already exists", r.id());
            }

            batch.put_cf(records_cf, id_bytes, encode_record(r)?);
            for m in r.tiles() {
                batch.put_cf(tiles_cf, encode_tile_key(m.tile, r.id()), b"");
            }
        }

        // a write batch is applied atomically
        self.db.write(batch)?;

        debug!("Inserted {} records into RocksDB store", records.len());

        Ok(records.len())
    }

    fn commit(&mut self) -> Result<()> {
        self.db.flush_cf(self.cf(RECORDS_CF)?)?;
        self.db.flush_cf(self.cf(TILES_CF)?)?;
        Ok(())
    }

    fn get(&self, id: Ulid) -> Result<Option<IndexedRecord>> {
        self.db
            .get_pinned_cf(self.cf(RECORDS_CF)?, id.0.to_be_bytes())?
            .map(|bytes| decode_record(id, &bytes))
            .transpose()
    }

    fn delete(&mut self, id: Ulid) -> Result<bool> {
        let Some(record) = self.get(id)? else {
            return Ok(false);
        };

        let mut batch = WriteBatch::default();
        batch.delete_cf(self.cf(RECORDS_CF)?, id.0.to_be_bytes());
        let tiles_cf = self.cf(TILES_CF)?;
        for m in record.tiles() {
            batch.delete_cf(tiles_cf, encode_tile_key(m.tile, id));
        }
        self.db.write(batch)?;

        Ok(true)
    }

    fn len(&self) -> Result<usize> {
        let mut n = 0;
        for item in self.db.iterator_cf(self.cf(RECORDS_CF)?, IteratorMode::Start) {
            item?;
            n += 1;
        }
        Ok(n)
    }

    fn aggregate_by_tile_key(&self, zoom: u32) -> Result<Vec<TileCount>> {
        if zoom > MAX_ZOOM {
            return Ok(Vec::new());
        }

        process_results(self.scan_zoom(zoom as u8)?, |tiles| {
            let mut result = Vec::new();
            for (tile, group) in &tiles.chunk_by(|tile| *tile) {
                result.push(TileCount::new(TileKey::from(tile), group.count() as u64));
            }
            result
        })
    }
}
