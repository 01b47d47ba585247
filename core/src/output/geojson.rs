use std::io::Write;

use anyhow::{bail, Context, Result};
use geojson::{Feature, FeatureCollection, Geometry, JsonObject, JsonValue, Value};

use crate::{aggregate::TileFeature, output::FeatureWriter};

/// Converts a tile to a GeoJSON point feature located at the tile's center
pub fn to_feature(feature: &TileFeature) -> Feature {
    let center = feature.center();

    let mut properties = JsonObject::new();
    properties.insert("count".to_string(), JsonValue::from(feature.count()));
    properties.insert(
        "tileKey".to_string(),
        JsonValue::from(feature.key().to_string()),
    );

    Feature {
        bbox: None,
        geometry: Some(Geometry::new(Value::Point(vec![center.x(), center.y()]))),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }
}

/// Converts aggregated tiles to a feature collection, keeping their order
pub fn to_feature_collection(features: &[TileFeature]) -> FeatureCollection {
    FeatureCollection {
        bbox: None,
        features: features.iter().map(to_feature).collect(),
        foreign_members: None,
    }
}

/// Writes aggregated tiles as a pretty-printed GeoJSON `FeatureCollection`
pub fn write_feature_collection<W>(writer: W, features: &[TileFeature]) -> Result<()>
where
    W: Write,
{
    let mut w = GeoJsonWriter::new(writer);
    for f in features {
        w.write(f)?;
    }
    w.finish()
}

/// A [`FeatureWriter`] that writes a GeoJSON `FeatureCollection`. The
/// collection is a single JSON document, so features are buffered until
/// [`finish()`](FeatureWriter::finish) is called.
pub struct GeoJsonWriter<W>
where
    W: Write,
{
    writer: W,
    collection: FeatureCollection,
    finished: bool,
}

impl<W> GeoJsonWriter<W>
where
    W: Write,
{
    /// Create a new writer that writes into the given writer
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            collection: to_feature_collection(&[]),
            finished: false,
        }
    }
}

impl<W> FeatureWriter for GeoJsonWriter<W>
where
    W: Write,
{
    fn write(&mut self, feature: &TileFeature) -> Result<()> {
        if self.finished {
            bail!("Unable to write tile {}. Output already finished.", feature.key());
        }
        self.collection.features.push(to_feature(feature));
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        if self.finished {
            bail!("Output already finished");
        }
        self.finished = true;

        serde_json::to_writer_pretty(&mut self.writer, &self.collection)
            .context("Unable to serialize feature collection")?;
        writeln!(self.writer)?;
        self.writer.flush()?;
        Ok(())
    }
}
