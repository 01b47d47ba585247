use geo::Point;

use super::{delimited, InputError};

/// A small sample (66 rows) of the noise complaints reported to New York
/// City's 311 service, one `lat,long` pair per row. Import the full data set
/// from a file if more than a handful of tiles are needed.
pub const DEMO_CSV: &str = include_str!("../../data/nyc311_noise.csv");

/// Parses the embedded demo data set
pub fn demo_points() -> Result<Vec<Point>, InputError> {
    delimited::read_points(DEMO_CSV.as_bytes())
}
