//! Readers that turn input files into points that can be imported
use std::{fs::File, io::BufReader, path::Path};

use geo::Point;
use thiserror::Error;

pub mod delimited;
pub mod demo;
pub mod geo_json;

/// Errors that can occur while reading points
#[derive(Error, Debug)]
pub enum InputError {
    /// A field that should contain a coordinate could not be parsed
    #[error("Invalid number `{value}' in line {line}, column {column}")]
    InvalidNumber {
        /// 1-based line number
        line: u64,
        /// 1-based column number
        column: usize,
        value: String,
        /// The whole offending row, fields joined by commas
        record: String,
    },

    #[error("Unable to detect file type: `{0}'")]
    UnknownFileType(String),

    #[error("Unsupported file type: `{path}' -> `{mime}'")]
    UnsupportedFileType { path: String, mime: String },

    #[error("Unable to read CSV")]
    Csv(#[from] csv::Error),

    #[error("Unable to parse GeoJSON")]
    GeoJson(#[from] geojson::Error),

    #[error("Invalid JSON")]
    Json(#[from] serde_json::Error),

    #[error("I/O error")]
    Io(#[from] std::io::Error),
}

/// The type of a file to read points from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    Csv,
    GeoJson,
}

impl FileType {
    /// Detects the type of a file from its extension
    pub fn detect(path: &str) -> Result<Self, InputError> {
        let mime = mime_guess::from_path(path);
        match mime.first() {
            Some(t) => match t.essence_str() {
                "text/csv" => Ok(FileType::Csv),
                "application/json" | "application/geo+json" => Ok(FileType::GeoJson),
                _ => Err(InputError::UnsupportedFileType {
                    path: path.to_string(),
                    mime: t.to_string(),
                }),
            },
            None => Err(InputError::UnknownFileType(path.to_string())),
        }
    }
}

/// Reads all points from a CSV or GeoJSON file
pub fn read_points_from_file<P>(path: P) -> Result<Vec<Point>, InputError>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let file_type = FileType::detect(&path.to_string_lossy())?;
    let reader = BufReader::new(File::open(path)?);
    match file_type {
        FileType::Csv => delimited::read_points(reader),
        FileType::GeoJson => geo_json::read_points(reader),
    }
}
