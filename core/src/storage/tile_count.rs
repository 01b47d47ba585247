use crate::tile::TileKey;

/// The number of records belonging to a tile
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileCount {
    pub key: TileKey,
    pub count: u64,
}

impl TileCount {
    pub fn new(key: TileKey, count: u64) -> Self {
        Self { key, count }
    }
}
