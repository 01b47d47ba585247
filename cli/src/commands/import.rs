use std::time::Instant;

use anyhow::{Context, Result};
use clap::Args;
use log::info;
use tilestack_core::{
    import::import_points,
    input::{demo::demo_points, read_points_from_file, FileType},
    storage::rocksdb::RocksDBStore,
};

use super::{elapsed, input_error::IntoImportError, StoreArgs, ZoomArgs};

/// Import points into a store
#[derive(Args, Debug)]
pub struct ImportArgs {
    /// CSV files with `lat,long` columns or GeoJSON files. Imports the
    /// embedded demo data if no file is given.
    #[arg(name = "FILE")]
    pub(super) files: Vec<String>,

    #[command(flatten)]
    pub(super) store: StoreArgs,

    #[command(flatten)]
    pub(super) zoom: ZoomArgs,
}

/// Run the `import` command
pub fn run_import(args: ImportArgs) -> Result<()> {
    let range = args.zoom.range()?;

    // detect file types before anything is imported
    for path in &args.files {
        FileType::detect(path).map_err(|e| e.into_import_error(path))?;
    }

    let mut store = RocksDBStore::new(&args.store.store)?;

    let start = Instant::now();
    let mut imported = 0;

    if args.files.is_empty() {
        let points = demo_points().map_err(|e| e.into_import_error("demo data"))?;
        imported += import_points(&mut store, &points, range)
            .context("Unable to import demo data")?;
    } else {
        for path in &args.files {
            let points = read_points_from_file(path).map_err(|e| e.into_import_error(path))?;
            let n = import_points(&mut store, &points, range)
                .with_context(|| format!("Unable to import `{path}'"))?;
            info!("Imported {n} records from `{path}'");
            imported += n;
        }
    }

    eprintln!(
        "Imported {} records at zoom levels {}..={} in {}",
        imported,
        range.min(),
        range.max(),
        elapsed(start)
    );

    Ok(())
}
