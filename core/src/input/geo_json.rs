use std::io::Read;

use geo::Point;
use geojson::{GeoJson, Geometry, Value};

use super::InputError;

/// Reads all points from a GeoJSON document. The document can be a
/// `FeatureCollection`, a single `Feature`, or a geometry. `MultiPoint`s
/// contribute all their points. Other geometry types are skipped.
pub fn read_points<R>(reader: R) -> Result<Vec<Point>, InputError>
where
    R: Read,
{
    let geojson = GeoJson::from_reader(reader)?;

    let mut result = Vec::new();
    match geojson {
        GeoJson::FeatureCollection(fc) => {
            for f in fc.features.iter().filter_map(|f| f.geometry.as_ref()) {
                collect_points(f, &mut result);
            }
        }
        GeoJson::Feature(f) => {
            if let Some(g) = &f.geometry {
                collect_points(g, &mut result);
            }
        }
        GeoJson::Geometry(g) => collect_points(&g, &mut result),
    }

    Ok(result)
}

/// Positions with less than two coordinates are skipped. Altitudes are
/// ignored.
fn to_point(position: &[f64]) -> Option<Point> {
    match position {
        [x, y, ..] => Some(Point::new(*x, *y)),
        _ => None,
    }
}

fn collect_points(geometry: &Geometry, result: &mut Vec<Point>) {
    match &geometry.value {
        Value::Point(p) => result.extend(to_point(p)),
        Value::MultiPoint(ps) => result.extend(ps.iter().filter_map(|p| to_point(p))),
        Value::GeometryCollection(gs) => {
            for g in gs {
                collect_points(g, result);
            }
        }
        _ => {}
    }
}
