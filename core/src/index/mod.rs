//! Builds the tile pyramid of a point: one tile per zoom level within a fixed
//! [`ZoomRange`]. The stack is what gets stored next to each point and what
//! stores later group by.
use std::ops::RangeInclusive;

use geo::Point;

use crate::{
    error::{Error, Result},
    tile::{point_to_tile, validate_point, TileCoordinate, TileKey, MAX_ZOOM},
};

pub use self::record::IndexedRecord;

mod record;

/// Lowest zoom level indexed by default
pub const DEFAULT_MIN_ZOOM: u32 = 0;

/// Highest zoom level indexed by default
pub const DEFAULT_MAX_ZOOM: u32 = 13;

/// An inclusive range of zoom levels. Must be the same for all records in a
/// store, as aggregating at a zoom level only counts records that were indexed
/// at this level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZoomRange {
    min: u32,
    max: u32,
}

impl ZoomRange {
    /// Creates a range from `min` to `max` (inclusive)
    pub fn new(min: u32, max: u32) -> Result<Self> {
        if min > max || max > MAX_ZOOM {
            return Err(Error::InvalidZoomRange { min, max });
        }
        Ok(Self { min, max })
    }

    pub fn min(&self) -> u32 {
        self.min
    }

    pub fn max(&self) -> u32 {
        self.max
    }

    /// Number of zoom levels in this range (never 0)
    pub fn len(&self) -> usize {
        (self.max - self.min) as usize + 1
    }

    pub fn contains(&self, z: u32) -> bool {
        (self.min..=self.max).contains(&z)
    }

    /// Iterates over all zoom levels in ascending order
    pub fn iter(&self) -> RangeInclusive<u32> {
        self.min..=self.max
    }
}

impl Default for ZoomRange {
    fn default() -> Self {
        Self {
            min: DEFAULT_MIN_ZOOM,
            max: DEFAULT_MAX_ZOOM,
        }
    }
}

/// The tile a point belongs to at one zoom level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileMembership {
    pub tile: TileCoordinate,
    pub key: TileKey,
}

impl From<TileCoordinate> for TileMembership {
    fn from(tile: TileCoordinate) -> Self {
        Self {
            tile,
            key: TileKey::from(tile),
        }
    }
}

/// Calculates the tiles `point` belongs to at every zoom level in `range`,
/// ordered by ascending zoom level. Either returns the full stack or an error,
/// never a partial stack.
///
/// ```rust
/// use geo::Point;
/// use tilestack_core::index::{build_stack, ZoomRange};
///
/// let stack = build_stack(Point::new(-73.99, 40.73), ZoomRange::new(10, 12).unwrap()).unwrap();
/// let keys = stack.iter().map(|m| m.key.to_string()).collect::<Vec<_>>();
/// assert_eq!(keys, vec!["301-384-10", "603-769-11", "1206-1539-12"]);
/// ```
pub fn build_stack(point: Point, range: ZoomRange) -> Result<Vec<TileMembership>> {
    validate_point(point)?;
    range
        .iter()
        .map(|z| point_to_tile(point, z).map(TileMembership::from))
        .collect()
}

/// Indexes points with a fixed zoom range
#[derive(Debug, Clone, Copy, Default)]
pub struct TilePyramidIndexer {
    range: ZoomRange,
}

impl TilePyramidIndexer {
    pub fn new(range: ZoomRange) -> Self {
        Self { range }
    }

    pub fn range(&self) -> ZoomRange {
        self.range
    }

    /// See [`build_stack`]
    pub fn build_stack(&self, point: Point) -> Result<Vec<TileMembership>> {
        build_stack(point, self.range)
    }

    /// Creates a new record with a fresh ID for `point`
    pub fn index(&self, point: Point) -> Result<IndexedRecord> {
        IndexedRecord::new(point, self.range)
    }
}
