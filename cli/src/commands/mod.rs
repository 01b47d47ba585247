use std::time::{Duration, Instant};

use anyhow::Result;
use clap::Args;
use humantime::{format_duration, FormattedDuration};
use tilestack_core::index::{ZoomRange, DEFAULT_MAX_ZOOM, DEFAULT_MIN_ZOOM};

pub mod aggregate;
pub mod demo;
pub mod import;
mod input_error;

/// Location of the store
#[derive(Args, Debug)]
pub struct StoreArgs {
    /// The directory of the store (created if it does not exist)
    #[arg(long, short, default_value = "store")]
    pub store: String,
}

/// The zoom levels points are indexed at
#[derive(Args, Debug)]
pub struct ZoomArgs {
    /// The lowest zoom level to index
    #[arg(long, default_value_t = DEFAULT_MIN_ZOOM)]
    pub min_zoom: u32,

    /// The highest zoom level to index
    #[arg(long, default_value_t = DEFAULT_MAX_ZOOM)]
    pub max_zoom: u32,
}

impl ZoomArgs {
    pub fn range(&self) -> Result<ZoomRange> {
        Ok(ZoomRange::new(self.min_zoom, self.max_zoom)?)
    }
}

/// Formats the time elapsed since `start` with millisecond precision
fn elapsed(start: Instant) -> FormattedDuration {
    format_duration(Duration::from_millis(start.elapsed().as_millis() as u64))
}
