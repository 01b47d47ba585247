use anyhow::Result;

use crate::aggregate::TileFeature;

pub mod geojson;

/// Collects aggregated tiles and writes them to an output
pub trait FeatureWriter {
    /// Add a tile to the output
    fn write(&mut self, feature: &TileFeature) -> Result<()>;

    /// Finish writing. Must be called exactly once after the last tile.
    fn finish(&mut self) -> Result<()>;
}
