use geo::Point;
use ulid::Ulid;

use crate::error::Result;

use super::{build_stack, TileMembership, ZoomRange};

/// A point together with its tile stack. The stack is calculated when the
/// record is created and cannot be changed afterwards. A point that moves
/// becomes a new record.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexedRecord {
    id: Ulid,
    location: Point,
    tiles: Vec<TileMembership>,
}

impl IndexedRecord {
    /// Indexes `location` and assigns a new unique ID
    pub fn new(location: Point, range: ZoomRange) -> Result<Self> {
        Self::with_id(Ulid::new(), location, range)
    }

    /// Indexes `location` under the given ID
    pub fn with_id(id: Ulid, location: Point, range: ZoomRange) -> Result<Self> {
        Ok(Self {
            id,
            location,
            tiles: build_stack(location, range)?,
        })
    }

    /// Reassembles a record read from a store. `tiles` must have been created
    /// by [`build_stack`] for `location`.
    pub(crate) fn from_parts(id: Ulid, location: Point, tiles: Vec<TileMembership>) -> Self {
        Self {
            id,
            location,
            tiles,
        }
    }

    pub fn id(&self) -> Ulid {
        self.id
    }

    pub fn location(&self) -> Point {
        self.location
    }

    /// The tile stack in ascending zoom order
    pub fn tiles(&self) -> &[TileMembership] {
        &self.tiles
    }

    /// The record's tile at zoom level `z` or `None` if the record has not
    /// been indexed at this level
    pub fn tile_at(&self, z: u32) -> Option<&TileMembership> {
        let min = self.tiles.first()?.tile.z();
        let i = z.checked_sub(min)? as usize;
        self.tiles.get(i)
    }
}
