use std::{
    fmt::{Display, Formatter},
    str::FromStr,
};

use crate::error::Error;

use super::TileCoordinate;

/// The grouping key of a tile. Its canonical string form is `x-y-z` in
/// decimal digits. Keys can only be created from a valid [`TileCoordinate`]
/// or by parsing a canonical string, so formatting and parsing always round
/// trip.
///
/// ```rust
/// use tilestack_core::tile::{TileCoordinate, TileKey};
///
/// let key = TileKey::from(TileCoordinate::new(1206, 1539, 12).unwrap());
/// assert_eq!(key.to_string(), "1206-1539-12");
/// assert_eq!("1206-1539-12".parse::<TileKey>().unwrap(), key);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TileKey(TileCoordinate);

impl TileKey {
    /// The tile this key refers to
    pub fn tile(&self) -> TileCoordinate {
        self.0
    }
}

impl From<TileCoordinate> for TileKey {
    fn from(tile: TileCoordinate) -> Self {
        Self(tile)
    }
}

impl Display for TileKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}-{}", self.0.x(), self.0.y(), self.0.z())
    }
}

impl FromStr for TileKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || Error::MalformedKey(s.to_string());

        let mut parts = s.split('-');
        let (Some(x), Some(y), Some(z), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(malformed());
        };

        let x = x.parse::<u32>().map_err(|_| malformed())?;
        let y = y.parse::<u32>().map_err(|_| malformed())?;
        let z = z.parse::<u32>().map_err(|_| malformed())?;
        let key = TileCoordinate::new(x, y, z)
            .map(TileKey)
            .ok_or_else(malformed)?;

        // reject non-canonical spellings such as `+1-0-1` or `01-0-1`
        if key.to_string() != s {
            return Err(malformed());
        }

        Ok(key)
    }
}
