use std::fmt::{Display, Formatter};

use super::MAX_ZOOM;

/// A tile in the Web Mercator (slippy map) tile pyramid. `x` grows from west
/// to east and `y` from north to south. At zoom level `z`, both lie in
/// `0..2^z`.
///
/// Fields are ordered so that tiles sort by zoom level first, then row by row
/// from north to south, then from west to east.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TileCoordinate {
    z: u32,
    y: u32,
    x: u32,
}

impl TileCoordinate {
    /// Creates a tile coordinate. Returns `None` if `z` is larger than
    /// [`MAX_ZOOM`] or if `x` or `y` do not exist at zoom level `z`.
    pub fn new(x: u32, y: u32, z: u32) -> Option<Self> {
        if z > MAX_ZOOM {
            return None;
        }
        let n = tiles_per_axis(z);
        if u64::from(x) >= n || u64::from(y) >= n {
            return None;
        }
        Some(Self { z, y, x })
    }

    /// Only for callers that have already established the invariant
    pub(crate) fn new_unchecked(x: u32, y: u32, z: u32) -> Self {
        debug_assert!(Self::new(x, y, z).is_some(), "invalid tile {x}/{y}/{z}");
        Self { z, y, x }
    }

    pub fn x(&self) -> u32 {
        self.x
    }

    pub fn y(&self) -> u32 {
        self.y
    }

    pub fn z(&self) -> u32 {
        self.z
    }

    /// Returns the tile containing this one at zoom level `z`, or `None` if
    /// `z` is greater than this tile's zoom level
    ///
    /// ```rust
    /// use tilestack_core::tile::TileCoordinate;
    ///
    /// let tile = TileCoordinate::new(1206, 1539, 12).unwrap();
    /// assert_eq!(tile.ancestor(10), TileCoordinate::new(301, 384, 10));
    /// assert_eq!(tile.ancestor(12), Some(tile));
    /// assert_eq!(tile.ancestor(13), None);
    /// ```
    pub fn ancestor(&self, z: u32) -> Option<Self> {
        let d = self.z.checked_sub(z)?;
        Some(Self {
            z,
            y: self.y >> d,
            x: self.x >> d,
        })
    }

    /// Returns the tile containing this one at the next lower zoom level
    pub fn parent(&self) -> Option<Self> {
        self.ancestor(self.z.checked_sub(1)?)
    }
}

impl Display for TileCoordinate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}/{}", self.z, self.x, self.y)
    }
}

/// Number of tiles along one axis at zoom level `z`
pub(super) fn tiles_per_axis(z: u32) -> u64 {
    1u64 << z
}
