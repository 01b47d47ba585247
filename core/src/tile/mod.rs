//! Conversions between geographic points and tiles of the Web Mercator tile
//! pyramid (as used by slippy maps). All functions in this module are pure.
use std::f64::consts::PI;

use geo::{coord, Point, Rect};

use crate::error::{Error, Result};

pub use self::coordinate::TileCoordinate;
pub use self::key::TileKey;

use self::coordinate::tiles_per_axis;

mod coordinate;
mod key;

/// Northernmost latitude a point may have. Slightly below the limit of Web
/// Mercator (85.05112878), so the topmost sliver of row 0 is never indexed.
pub const MAX_LAT: f64 = 85.05;

/// Southernmost latitude Web Mercator can project
pub const MIN_LAT: f64 = -MAX_LAT;

pub const MAX_LON: f64 = 180.0;
pub const MIN_LON: f64 = -180.0;

/// The highest supported zoom level. Tile coordinates at this level still
/// fit into a `u32`.
pub const MAX_ZOOM: u32 = 31;

/// Makes sure `point` (`x` = longitude, `y` = latitude) can be projected
pub fn validate_point(point: Point) -> Result<()> {
    // `contains` is false for NaN, so NaN coordinates are rejected as well
    if !(MIN_LON..=MAX_LON).contains(&point.x()) || !(MIN_LAT..=MAX_LAT).contains(&point.y()) {
        return Err(Error::InvalidCoordinate {
            longitude: point.x(),
            latitude: point.y(),
        });
    }
    Ok(())
}

/// Calculates the tile containing `point` at zoom level `z`.
///
/// Points on the antimeridian (longitude 180) lie exactly on the outer edge
/// of the pyramid. Tile coordinates are clamped to the last row or column
/// instead of pointing outside.
///
/// ```rust
/// use geo::Point;
/// use tilestack_core::tile::point_to_tile;
///
/// let tile = point_to_tile(Point::new(-73.99, 40.73), 12).unwrap();
/// assert_eq!((tile.x(), tile.y(), tile.z()), (1206, 1539, 12));
/// ```
pub fn point_to_tile(point: Point, z: u32) -> Result<TileCoordinate> {
    validate_point(point)?;
    if z > MAX_ZOOM {
        return Err(Error::InvalidZoom(z));
    }

    let n = tiles_per_axis(z) as f64;
    let lat_rad = point.y().to_radians();

    let x = ((point.x() + 180.0) / 360.0 * n).floor();
    let y = ((1.0 - (lat_rad.tan() + 1.0 / lat_rad.cos()).ln() / PI) / 2.0 * n).floor();

    let last = n - 1.0;
    Ok(TileCoordinate::new_unchecked(
        x.clamp(0.0, last) as u32,
        y.clamp(0.0, last) as u32,
        z,
    ))
}

/// Projects the north-west corner of the tile at `x`/`y` back to longitude
/// and latitude. `x` and `y` may be fractional.
fn unproject(x: f64, y: f64, z: u32) -> (f64, f64) {
    let n = tiles_per_axis(z) as f64;
    let lon = x / n * 360.0 - 180.0;
    let lat = (PI * (1.0 - 2.0 * y / n)).sinh().atan().to_degrees();
    (lon, lat)
}

/// Returns the geographic center of `tile`. The result is meant for display
/// only. It is not the point the tile was calculated from and must not be used
/// to derive tiles again.
pub fn tile_to_center(tile: TileCoordinate) -> Point {
    let (lon, lat) = unproject(
        f64::from(tile.x()) + 0.5,
        f64::from(tile.y()) + 0.5,
        tile.z(),
    );
    Point::new(lon, lat)
}

/// Returns the geographic extent of `tile`
pub fn tile_bounds(tile: TileCoordinate) -> Rect {
    let (west, north) = unproject(f64::from(tile.x()), f64::from(tile.y()), tile.z());
    let (east, south) = unproject(
        f64::from(tile.x()) + 1.0,
        f64::from(tile.y()) + 1.0,
        tile.z(),
    );
    Rect::new(coord! { x: west, y: south }, coord! { x: east, y: north })
}

#[cfg(test)]
mod tests {
    use assertor::{assert_that, BooleanAssertion, ComparableAssertion};
    use geo::{Contains, Point};
    use rand::{rngs::ThreadRng, Rng};

    use crate::error::Error;

    use super::{
        point_to_tile, tile_bounds, tile_to_center, validate_point, TileCoordinate, MAX_LAT,
        MAX_LON, MAX_ZOOM, MIN_LAT, MIN_LON,
    };

    /// Create a random point that can be projected
    fn random_point(rng: &mut ThreadRng) -> Point {
        Point::new(
            rng.gen_range(MIN_LON..=MAX_LON),
            rng.gen_range(MIN_LAT..=MAX_LAT),
        )
    }

    #[test]
    fn new_york() {
        let tile = point_to_tile(Point::new(-73.99, 40.73), 12).unwrap();
        assert_eq!(tile, TileCoordinate::new(1206, 1539, 12).unwrap());

        // same input, same output
        for _ in 0..10 {
            assert_eq!(point_to_tile(Point::new(-73.99, 40.73), 12).unwrap(), tile);
        }
    }

    #[test]
    fn known_tiles() {
        let tile = point_to_tile(Point::new(-74.0060, 40.7128), 16).unwrap();
        assert_eq!(tile, TileCoordinate::new(19295, 24640, 16).unwrap());

        let tile = point_to_tile(Point::new(-0.1278, 51.5074), 10).unwrap();
        assert_eq!(tile, TileCoordinate::new(511, 340, 10).unwrap());

        let tile = point_to_tile(Point::new(0.0, 0.0), 1).unwrap();
        assert_eq!(tile, TileCoordinate::new(1, 1, 1).unwrap());
    }

    #[test]
    fn zoom_zero_is_one_tile() {
        let mut rng = rand::thread_rng();
        for _ in 0..100 {
            let tile = point_to_tile(random_point(&mut rng), 0).unwrap();
            assert_eq!(tile, TileCoordinate::new(0, 0, 0).unwrap());
        }
    }

    #[test]
    fn clamp_at_edges() {
        for z in [0, 1, 3, 12] {
            let last = (1u32 << z) - 1;

            let ne = point_to_tile(Point::new(180.0, 85.05), z).unwrap();
            assert_eq!((ne.x(), ne.y()), (last, 0));

            let sw = point_to_tile(Point::new(-180.0, -85.05), z).unwrap();
            assert_eq!((sw.x(), sw.y()), (0, last));
        }
    }

    #[test]
    fn clamp_at_latitude_limits() {
        for z in [0, 1, 12, 24, MAX_ZOOM] {
            let last = ((1u64 << z) - 1) as u32;

            let north = point_to_tile(Point::new(MAX_LON, MAX_LAT), z).unwrap();
            let south = point_to_tile(Point::new(MIN_LON, MIN_LAT), z).unwrap();
            assert_eq!(north.x(), last);
            assert_eq!(south.x(), 0);

            assert_that!(north.y()).is_at_most(south.y());
            assert_that!(south.y()).is_at_most(last);
        }
    }

    #[test]
    fn just_beyond_latitude_limits() {
        for lat in [85.051, -85.051, 85.05112878, -85.05112878] {
            for z in [0, 5, 12] {
                let result = point_to_tile(Point::new(0.0, lat), z);
                assert_that!(matches!(
                    result,
                    Err(Error::InvalidCoordinate { latitude, .. }) if latitude == lat
                ))
                .is_true();
            }
        }
    }

    #[test]
    fn invalid_coordinates() {
        for (lon, lat) in [
            (180.1, 0.0),
            (-180.1, 0.0),
            (0.0, 85.1),
            (0.0, -85.1),
            (0.0, 90.0),
            (f64::NAN, 0.0),
            (0.0, f64::NAN),
            (f64::INFINITY, 0.0),
        ] {
            let result = point_to_tile(Point::new(lon, lat), 5);
            assert_that!(matches!(result, Err(Error::InvalidCoordinate { .. }))).is_true();
        }
    }

    #[test]
    fn invalid_zoom() {
        let result = point_to_tile(Point::new(0.0, 0.0), MAX_ZOOM + 1);
        assert_that!(matches!(result, Err(Error::InvalidZoom(z)) if z == MAX_ZOOM + 1)).is_true();
    }

    /// Tile coordinates always stay within `0..2^z`
    #[test]
    fn random_points_in_range() {
        let mut rng = rand::thread_rng();
        for _ in 0..1000 {
            let point = random_point(&mut rng);
            let z = rng.gen_range(0..=MAX_ZOOM);
            let tile = point_to_tile(point, z).unwrap();
            assert_that!(u64::from(tile.x())).is_less_than(1u64 << z);
            assert_that!(u64::from(tile.y())).is_less_than(1u64 << z);
        }
    }

    /// A point's tile at a higher zoom level always lies within its tile at a
    /// lower zoom level
    #[test]
    fn random_points_nested() {
        let mut rng = rand::thread_rng();
        for _ in 0..500 {
            let point = random_point(&mut rng);
            let z1 = rng.gen_range(0..20);
            let z2 = rng.gen_range(z1 + 1..=20);
            let t1 = point_to_tile(point, z1).unwrap();
            let t2 = point_to_tile(point, z2).unwrap();
            assert_eq!(t2.ancestor(z1), Some(t1));
            assert_that!(tile_bounds(t1).contains(&tile_to_center(t2))).is_true();
        }
    }

    #[test]
    fn center_of_root_tile() {
        let center = tile_to_center(TileCoordinate::new(0, 0, 0).unwrap());
        assert_that!(center.x().abs()).is_less_than(1e-9);
        assert_that!(center.y().abs()).is_less_than(1e-9);
    }

    #[test]
    fn center_lies_in_tile() {
        let mut rng = rand::thread_rng();
        for _ in 0..500 {
            let point = random_point(&mut rng);
            let tile = point_to_tile(point, rng.gen_range(0..=18)).unwrap();
            let center = tile_to_center(tile);
            assert_that!(tile_bounds(tile).contains(&center)).is_true();

            // centers of tiles at the edge may lie beyond the latitude limit
            if validate_point(center).is_ok() {
                assert_eq!(point_to_tile(center, tile.z()).unwrap(), tile);
            }
        }
    }

    #[test]
    fn bounds_of_new_york_tile() {
        let tile = TileCoordinate::new(1206, 1539, 12).unwrap();
        let bounds = tile_bounds(tile);
        assert_that!(bounds.min().x).is_less_than(-73.99);
        assert_that!(bounds.max().x).is_greater_than(-73.99);
        assert_that!(bounds.min().y).is_less_than(40.73);
        assert_that!(bounds.max().y).is_greater_than(40.73);

        let center = tile_to_center(tile);
        assert_that!((center.x() - -73.95996).abs()).is_less_than(1e-4);
        assert_that!((center.y() - 40.74726).abs()).is_less_than(1e-4);
    }
}
