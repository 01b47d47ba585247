use std::io::Read;

use csv::{ReaderBuilder, StringRecord, Trim};
use geo::Point;
use itertools::Itertools;
use log::debug;

use super::InputError;

/// Reads points from CSV data with a header row and the columns `lat` and
/// `long` (in this order). Rows that do not have exactly two fields are
/// skipped. A field that cannot be parsed aborts reading.
pub fn read_points<R>(reader: R) -> Result<Vec<Point>, InputError>
where
    R: Read,
{
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let mut result = Vec::new();
    let mut skipped = 0;
    for record in reader.records() {
        let record = record?;
        if record.len() != 2 {
            skipped += 1;
            continue;
        }

        let lat = parse_field(&record, 0)?;
        let lon = parse_field(&record, 1)?;
        result.push(Point::new(lon, lat));
    }

    if skipped > 0 {
        debug!("Skipped {skipped} rows without exactly two fields");
    }

    Ok(result)
}

fn parse_field(record: &StringRecord, i: usize) -> Result<f64, InputError> {
    let value = &record[i];
    value.parse::<f64>().map_err(|_| InputError::InvalidNumber {
        line: record.position().map(|p| p.line()).unwrap_or_default(),
        column: i + 1,
        value: value.to_string(),
        record: record.iter().join(","),
    })
}

#[cfg(test)]
mod tests {
    use assertor::{assert_that, BooleanAssertion, VecAssertion};
    use geo::Point;
    use pretty_assertions::assert_eq;

    use crate::input::InputError;

    use super::read_points;

    #[test]
    fn simple() {
        let csv = "lat,long\n40.73,-73.99\n 50.1125 , 8.6722\n";
        assert_eq!(
            read_points(csv.as_bytes()).unwrap(),
            vec![Point::new(-73.99, 40.73), Point::new(8.6722, 50.1125)]
        );
    }

    #[test]
    fn header_only() {
        assert_that!(read_points("lat,long\n".as_bytes()).unwrap()).is_empty();
        assert_that!(read_points("".as_bytes()).unwrap()).is_empty();
    }

    #[test]
    fn skip_incomplete_rows() {
        let csv = "lat,long\n40.73,-73.99\n40.74\n\n1,2,3\n52.5,13.4";
        assert_eq!(
            read_points(csv.as_bytes()).unwrap(),
            vec![Point::new(-73.99, 40.73), Point::new(13.4, 52.5)]
        );
    }

    #[test]
    fn invalid_number() {
        let csv = "lat,long\n40.73,-73.99\n40.74,abc\n52.5,13.4\n";
        let err = read_points(csv.as_bytes()).unwrap_err();
        match err {
            InputError::InvalidNumber {
                line,
                column,
                value,
                record,
            } => {
                assert_eq!(line, 3);
                assert_eq!(column, 2);
                assert_eq!(value, "abc");
                assert_eq!(record, "40.74,abc");
            }
            e => panic!("Unexpected error: {e}"),
        }
    }

    #[test]
    fn empty_field() {
        let err = read_points("lat,long\n,-73.99\n".as_bytes()).unwrap_err();
        assert_that!(matches!(
            err,
            InputError::InvalidNumber { line: 2, column: 1, .. }
        ))
        .is_true();
    }
}
