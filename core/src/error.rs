use thiserror::Error;

use crate::tile::MAX_ZOOM;

/// Errors produced by tile math, indexing, and aggregation
#[derive(Error, Debug)]
pub enum Error {
    /// A point lies outside the range Web Mercator can project
    #[error(
        "Invalid coordinate: longitude {longitude} must be within [-180, 180] \
         and latitude {latitude} within [-85.05, 85.05]"
    )]
    InvalidCoordinate { longitude: f64, latitude: f64 },

    /// A zoom level larger than [`MAX_ZOOM`]
    #[error("Invalid zoom level {0} (must not be greater than {max})", max = MAX_ZOOM)]
    InvalidZoom(u32),

    /// A zoom range whose bounds are swapped or too large
    #[error("Invalid zoom range {min}..={max}")]
    InvalidZoomRange { min: u32, max: u32 },

    /// A tile key that does not decode to a valid tile. Keys are generated
    /// internally, so this always indicates a bug or a corrupt store.
    #[error("Malformed tile key `{0}'")]
    MalformedKey(String),

    /// The store could not be reached or failed to execute an operation
    #[error("Store operation failed: {0:#}")]
    CollaboratorFailure(anyhow::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl Error {
    /// Wraps an error returned by a store. Errors that originally came from
    /// this crate (e.g. a [`MalformedKey`](Self::MalformedKey) detected while
    /// decoding stored data) are passed through unchanged.
    pub fn from_store(err: anyhow::Error) -> Self {
        match err.downcast::<Error>() {
            Ok(err) => err,
            Err(err) => Error::CollaboratorFailure(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use anyhow::anyhow;
    use assertor::{assert_that, BooleanAssertion};

    use super::Error;

    #[test]
    fn from_store_keeps_own_errors() {
        let err = Error::from_store(Error::MalformedKey("1-2".to_string()).into());
        assert_that!(matches!(err, Error::MalformedKey(ref k) if k == "1-2")).is_true();
    }

    #[test]
    fn from_store_wraps_foreign_errors() {
        let err = Error::from_store(anyhow!("connection refused"));
        assert_that!(matches!(err, Error::CollaboratorFailure(_))).is_true();
        assert_eq!(
            err.to_string(),
            "Store operation failed: connection refused"
        );
    }
}
