//! Counts geographic points per map tile over a fixed range of zoom levels.
//!
//! Every point is indexed once into a stack of Web Mercator tiles (one per
//! zoom level, see [`index::build_stack`]). A [`storage::Store`] keeps the
//! points together with their stacks and groups them by tile on request.
//! [`aggregate::aggregate`] turns these groups back into geographic features
//! that can be written as GeoJSON with [`output::geojson`].

pub mod aggregate;
pub mod error;
pub mod import;
pub mod index;
pub mod input;
pub mod output;
pub mod storage;
pub mod tile;

pub use error::{Error, Result};
