//! Counts records per tile at one zoom level and projects the tiles back to
//! geographic points for display.
use std::time::Instant;

use geo::Point;
use log::debug;

use crate::{
    error::{Error, Result},
    storage::{Store, TileCount},
    tile::{tile_to_center, TileKey, MAX_ZOOM},
};

/// A tile with the number of records it contains, located at the tile's
/// geographic center
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileFeature {
    center: Point,
    count: u64,
    key: TileKey,
}

impl TileFeature {
    pub fn new(key: TileKey, count: u64) -> Self {
        Self {
            center: tile_to_center(key.tile()),
            count,
            key,
        }
    }

    /// The center of the tile (not the location of any record)
    pub fn center(&self) -> Point {
        self.center
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn key(&self) -> TileKey {
        self.key
    }
}

/// Checks a count returned by a store. Stores must only return non-empty
/// tiles at the requested zoom level.
fn check_count(c: &TileCount, zoom: u32) -> Result<()> {
    if c.key.tile().z() != zoom || c.count == 0 {
        return Err(Error::MalformedKey(c.key.to_string()));
    }
    Ok(())
}

/// Asks `store` to count records per tile at zoom level `zoom`. Zoom levels
/// no record was indexed at produce an empty result.
pub fn count_tiles<S>(store: &S, zoom: u32) -> Result<Vec<TileCount>>
where
    S: Store + ?Sized,
{
    if zoom > MAX_ZOOM {
        return Err(Error::InvalidZoom(zoom));
    }

    let counts = store
        .aggregate_by_tile_key(zoom)
        .map_err(Error::from_store)?;
    for c in &counts {
        check_count(c, zoom)?;
    }
    Ok(counts)
}

/// Counts records per tile at zoom level `zoom` and converts every non-empty
/// tile to a [`TileFeature`]. The result is sorted by tile key, so two
/// aggregations of the same data always yield the same order.
///
/// The sum of all counts equals the number of records in the store that
/// have been indexed at `zoom`.
pub fn aggregate<S>(store: &S, zoom: u32) -> Result<Vec<TileFeature>>
where
    S: Store + ?Sized,
{
    let start = Instant::now();

    let mut features = count_tiles(store, zoom)?
        .into_iter()
        .map(|c| TileFeature::new(c.key, c.count))
        .collect::<Vec<_>>();
    features.sort_unstable_by_key(|f| f.key);

    debug!(
        "Aggregated {} records into {} tiles at zoom level {zoom} in {:?}",
        features.iter().map(|f| f.count).sum::<u64>(),
        features.len(),
        start.elapsed()
    );

    Ok(features)
}
