use std::time::Instant;

use anyhow::{Context, Result};
use clap::Args;
use tilestack_core::{
    import::import_points,
    index::ZoomRange,
    input::demo::demo_points,
    storage::{memory::MemoryStore, rocksdb::RocksDBStore, Store},
};

use super::{aggregate::print_aggregation, elapsed, input_error::IntoImportError, StoreArgs};

/// Aggregate the embedded NYC noise complaint data set
#[derive(Args, Debug)]
pub struct DemoArgs {
    /// Import the demo data into the store before aggregating
    #[arg(long)]
    pub(super) insert: bool,

    /// The zoom level to aggregate at
    #[arg(long, short, default_value_t = 12)]
    pub(super) level: u32,

    /// Keep the demo data in memory instead of using a store (implies
    /// `--insert`)
    #[arg(long, conflicts_with = "store")]
    pub(super) in_memory: bool,

    #[command(flatten)]
    pub(super) store: StoreArgs,
}

/// Run the `demo` command
pub fn run_demo(args: DemoArgs) -> Result<()> {
    if args.in_memory {
        run(&mut MemoryStore::new(), true, args.level)
    } else {
        let mut store = RocksDBStore::new(&args.store.store)?;
        run(&mut store, args.insert, args.level)
    }
}

fn run<S>(store: &mut S, insert: bool, level: u32) -> Result<()>
where
    S: Store,
{
    if insert {
        let start = Instant::now();
        let points = demo_points().map_err(|e| e.into_import_error("demo data"))?;
        let n = import_points(store, &points, ZoomRange::default())
            .context("Unable to import demo data")?;
        eprintln!("Imported {} demo records in {}", n, elapsed(start));
    }

    print_aggregation(&*store, level)
}
