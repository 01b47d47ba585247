use std::{
    io::{self, BufWriter},
    time::Instant,
};

use anyhow::Result;
use clap::Args;
use log::warn;
use tilestack_core::{
    aggregate::aggregate,
    output::{geojson::GeoJsonWriter, FeatureWriter},
    storage::{rocksdb::RocksDBStore, Store},
};

use super::{elapsed, StoreArgs};

/// Count the points per tile at one zoom level and print the tiles as
/// a GeoJSON FeatureCollection
#[derive(Args, Debug)]
pub struct AggregateArgs {
    /// The zoom level to aggregate at
    #[arg(long, short, default_value_t = 12)]
    pub(super) level: u32,

    #[command(flatten)]
    pub(super) store: StoreArgs,
}

/// Run the `aggregate` command
pub fn run_aggregate(args: AggregateArgs) -> Result<()> {
    let store = RocksDBStore::new(&args.store.store)?;
    print_aggregation(&store, args.level)
}

/// Aggregates the records in `store` and writes the result to stdout
pub(super) fn print_aggregation<S>(store: &S, level: u32) -> Result<()>
where
    S: Store + ?Sized,
{
    let start = Instant::now();

    let features = aggregate(store, level)?;
    if features.is_empty() && !store.is_empty()? {
        warn!("No records have been indexed at zoom level {level}");
    }

    let stdout = io::stdout().lock();
    let mut writer = GeoJsonWriter::new(BufWriter::new(stdout));
    for f in &features {
        writer.write(f)?;
    }
    writer.finish()?;

    eprintln!(
        "Aggregated {} records into {} tiles in {}",
        features.iter().map(|f| f.count()).sum::<u64>(),
        features.len(),
        elapsed(start)
    );

    Ok(())
}
